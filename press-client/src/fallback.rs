//! Deterministic offline dataset
//!
//! Served whenever the store is unconfigured, nobody is signed in, a read
//! fails, or a live channel breaks. Every call returns identical data.

use chrono::{DateTime, TimeZone, Utc};
use shared::models::{Client, Job, JobStage, JobType, Quote, QuoteDraft};
use shared::pricing::PricingEngine;

fn seed_date() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

pub fn clients() -> Vec<Client> {
    vec![
        Client {
            id: "c1".into(),
            name: "Acme Corp".into(),
            email: "contact@acme.com".into(),
            phone: "555-123-4567".into(),
            website: "https://acme.com".into(),
            street: "123 Main St".into(),
            city: "Metropolis".into(),
            state: "NY".into(),
            zip: "10001".into(),
            is_tax_exempt: false,
            default_discount_rate: 0.05,
            notes: "Preferred customer".into(),
            created_at: Some(seed_date()),
        },
        Client {
            id: "c2".into(),
            name: "Globex Inc".into(),
            email: "hello@globex.com".into(),
            phone: "555-987-6543".into(),
            website: "https://globex.com".into(),
            street: "456 Market Ave".into(),
            city: "Springfield".into(),
            state: "IL".into(),
            zip: "62701".into(),
            is_tax_exempt: true,
            default_discount_rate: 0.1,
            notes: "Tax exempt - nonprofit".into(),
            created_at: Some(seed_date()),
        },
    ]
}

/// One quote for Acme: 500 x 0.50, setup 75, 10% discount, taxed at 7% (321.00)
pub fn quotes() -> Vec<Quote> {
    let clients = clients();
    let draft = QuoteDraft {
        client_id: "c1".into(),
        client_name: String::new(),
        material: "100lb Gloss Cover".into(),
        quantity: 500,
        price_per_unit: 0.50,
        size: "3.5x2".into(),
        finish_type: "Matte".into(),
        notes: "Rounded corners".into(),
        setup_fee: 75.0,
        discount_rate: Some(0.10),
    };
    let mut quote = PricingEngine::default().quote("q1", seed_date(), draft, clients.first());
    quote.created_at = Some(seed_date());
    vec![quote]
}

/// One Draft job converted from the fallback quote
pub fn jobs() -> Vec<Job> {
    quotes()
        .into_iter()
        .map(|quote| {
            let mut job = Job::new("j1", quote.client_id.clone(), seed_date());
            job.stage = JobStage::Draft;
            job.job_type = JobType::BusinessCards;
            job.quote_ids = vec![quote.quote_id.clone()];
            job.client_name = quote.client_name.clone();
            job.material = quote.material.clone();
            job.quantity = quote.quantity;
            job.size = quote.size.clone();
            job.finish_type = quote.finish_type.clone();
            job.total_price = quote.total_price();
            job.client_notes = quote.notes.clone();
            job.created_at = Some(seed_date());
            job
        })
        .collect()
}
