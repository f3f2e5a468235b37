//! Quotes service
//!
//! Totals are always produced by the pricing engine: `calculate` prices a
//! draft, and `update` re-prices before the record reaches the cache.

use crate::cache::EntityCache;
use crate::services::JobsService;
use crate::utils::validation::validate_quote_draft;
use chrono::Utc;
use press_client::RemoteStore;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Client, Job, JobType, Quote, QuoteDraft};
use shared::pricing::{PriceBreakdown, PricingEngine, PricingInputs};

fn quote_not_found(id: &str) -> AppError {
    AppError::with_message(ErrorCode::QuoteNotFound, format!("Quote {} not found", id)).with_detail("quoteId", id)
}

#[derive(Debug, Clone)]
pub struct QuotesService {
    cache: EntityCache<Quote>,
    clients: EntityCache<Client>,
    engine: PricingEngine,
}

impl QuotesService {
    /// `clients` is read to resolve discount and tax terms
    pub fn new(store: RemoteStore, clients: EntityCache<Client>, engine: PricingEngine) -> Self {
        Self {
            cache: EntityCache::new(store, "quote"),
            clients,
            engine,
        }
    }

    pub fn cache(&self) -> &EntityCache<Quote> {
        &self.cache
    }

    pub fn engine(&self) -> PricingEngine {
        self.engine
    }

    pub fn quotes(&self) -> Vec<Quote> {
        self.cache.snapshot()
    }

    pub fn get(&self, id: &str) -> Option<Quote> {
        self.cache.get(id)
    }

    /// Quotes not yet converted into a job
    pub fn pending(&self) -> Vec<Quote> {
        self.cache.filter(|q| !q.is_exported)
    }

    pub fn exported(&self) -> Vec<Quote> {
        self.cache.filter(|q| q.is_exported)
    }

    pub fn for_client(&self, client_id: &str) -> Vec<Quote> {
        self.cache.filter(|q| q.client_id == client_id)
    }

    /// Full price breakdown of a draft, without creating anything
    pub fn preview(&self, draft: &QuoteDraft) -> PriceBreakdown {
        let client = self.clients.get(&draft.client_id);
        self.engine.breakdown(&PricingInputs::from(draft), client.as_ref())
    }

    /// Price a draft into a new quote with a fresh id, dated now
    ///
    /// An unknown client prices with no discount and full tax.
    pub fn calculate(&self, draft: QuoteDraft) -> AppResult<Quote> {
        validate_quote_draft(&draft)?;
        let client = self.clients.get(&draft.client_id);
        if client.is_none() {
            tracing::warn!(client_id = %draft.client_id, "Pricing quote for unknown client");
        }
        Ok(self.engine.quote(
            shared::util::new_document_id(),
            Utc::now(),
            draft,
            client.as_ref(),
        ))
    }

    /// Calculate and add a quote
    pub fn create(&self, draft: QuoteDraft) -> AppResult<Quote> {
        let quote = self.calculate(draft)?;
        let created = self.cache.create(quote);
        tracing::info!(
            quote_id = %created.quote_id,
            client_id = %created.client_id,
            total = created.total_price(),
            "Quote created"
        );
        Ok(created)
    }

    /// Re-price from the current inputs and replace; `Ok(false)` when unknown
    pub fn update(&self, quote: Quote) -> AppResult<bool> {
        validate_quote_draft(&quote.draft())?;
        let client = self.clients.get(&quote.client_id);
        let repriced = self.engine.reprice(quote, client.as_ref());
        Ok(self.cache.update(repriced))
    }

    pub fn delete(&self, id: &str) -> bool {
        self.cache.delete(id)
    }

    pub fn mark_exported(&self, id: &str) -> AppResult<Quote> {
        let mut quote = self.cache.get(id).ok_or_else(|| quote_not_found(id))?;
        quote.is_exported = true;
        self.cache.update(quote.clone());
        Ok(quote)
    }

    /// Create a Draft job from the quote and mark the quote exported
    ///
    /// A quote converts once; a second attempt is refused.
    pub fn convert_to_job(&self, quote_id: &str, job_type: JobType, jobs: &JobsService) -> AppResult<Job> {
        let quote = self.cache.get(quote_id).ok_or_else(|| quote_not_found(quote_id))?;
        if quote.is_exported {
            return Err(AppError::new(ErrorCode::QuoteAlreadyExported).with_detail("quoteId", quote_id));
        }
        let job = jobs.create_from_quote(&quote, job_type);
        self.mark_exported(quote_id)?;
        Ok(job)
    }

    pub fn last_error(&self) -> Option<AppError> {
        self.cache.last_error()
    }
}
