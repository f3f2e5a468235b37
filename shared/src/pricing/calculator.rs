//! Quote Price Calculator
//!
//! Derives `sub_total` and `total_price` from quote inputs and client terms.
//! Arithmetic is plain f64 so that `sub_total == quantity * price_per_unit`
//! holds exactly; rust_decimal is only used to round money for display.

use crate::models::{Client, Quote, QuoteDraft};
use chrono::{DateTime, Utc};
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};

/// Sales tax applied to non-exempt clients
pub const DEFAULT_TAX_RATE: f64 = 0.07;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Round a monetary amount to cents (half away from zero)
pub fn round_money(value: f64) -> f64 {
    Decimal::from_f64(value)
        .unwrap_or_default()
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Pricing-relevant client attributes
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ClientTerms {
    pub default_discount_rate: f64,
    pub is_tax_exempt: bool,
}

impl ClientTerms {
    /// Terms for an optional client; unknown clients get no discount and pay tax
    pub fn resolve(client: Option<&Client>) -> Self {
        client.map(Self::from).unwrap_or_default()
    }
}

impl From<&Client> for ClientTerms {
    fn from(client: &Client) -> Self {
        Self {
            default_discount_rate: client.default_discount_rate,
            is_tax_exempt: client.is_tax_exempt,
        }
    }
}

/// Quote inputs the engine reads
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PricingInputs {
    pub quantity: u32,
    pub price_per_unit: f64,
    pub setup_fee: f64,
    pub discount_rate: Option<f64>,
}

impl From<&QuoteDraft> for PricingInputs {
    fn from(draft: &QuoteDraft) -> Self {
        Self {
            quantity: draft.quantity,
            price_per_unit: draft.price_per_unit,
            setup_fee: draft.setup_fee,
            discount_rate: draft.discount_rate,
        }
    }
}

impl From<&Quote> for PricingInputs {
    fn from(quote: &Quote) -> Self {
        Self {
            quantity: quote.quantity,
            price_per_unit: quote.price_per_unit,
            setup_fee: quote.setup_fee,
            discount_rate: quote.discount_rate,
        }
    }
}

/// Every intermediate value of one pricing run
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    pub sub_total: f64,
    pub discount_rate: f64,
    pub discount_amount: f64,
    pub tax_rate: f64,
    pub taxable_base: f64,
    pub tax: f64,
    /// Not clamped: negative when the discount exceeds sub-total plus setup fee
    pub total_price: f64,
}

impl PriceBreakdown {
    /// Money fields rounded to cents, rates untouched
    pub fn rounded(&self) -> Self {
        Self {
            sub_total: round_money(self.sub_total),
            discount_rate: self.discount_rate,
            discount_amount: round_money(self.discount_amount),
            tax_rate: self.tax_rate,
            taxable_base: round_money(self.taxable_base),
            tax: round_money(self.tax),
            total_price: round_money(self.total_price),
        }
    }
}

/// Compute the price breakdown
///
/// Order:
/// 1. effective discount = quote override, else client default
/// 2. sub_total = quantity * price_per_unit
/// 3. discount_amount = sub_total * discount
/// 4. tax rate = 0 for exempt clients
/// 5. taxable_base = max(sub_total - discount_amount + setup_fee, 0)
/// 6. tax = taxable_base * tax rate
/// 7. total = sub_total + setup_fee - discount_amount + tax
pub fn calculate(inputs: &PricingInputs, terms: ClientTerms, tax_rate: f64) -> PriceBreakdown {
    let discount_rate = inputs.discount_rate.unwrap_or(terms.default_discount_rate);
    let sub_total = f64::from(inputs.quantity) * inputs.price_per_unit;
    let discount_amount = sub_total * discount_rate;
    let tax_rate = if terms.is_tax_exempt { 0.0 } else { tax_rate };
    let taxable_base = (sub_total - discount_amount + inputs.setup_fee).max(0.0);
    let tax = taxable_base * tax_rate;
    let total_price = sub_total + inputs.setup_fee - discount_amount + tax;

    PriceBreakdown {
        sub_total,
        discount_rate,
        discount_amount,
        tax_rate,
        taxable_base,
        tax,
        total_price,
    }
}

/// Pricing engine bound to a tax rate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricingEngine {
    tax_rate: f64,
}

impl Default for PricingEngine {
    fn default() -> Self {
        Self::new(DEFAULT_TAX_RATE)
    }
}

impl PricingEngine {
    pub fn new(tax_rate: f64) -> Self {
        Self { tax_rate }
    }

    pub fn tax_rate(&self) -> f64 {
        self.tax_rate
    }

    /// Breakdown for raw inputs against an optional client
    pub fn breakdown(&self, inputs: &PricingInputs, client: Option<&Client>) -> PriceBreakdown {
        calculate(inputs, ClientTerms::resolve(client), self.tax_rate)
    }

    /// Build a new, not yet exported quote from a draft
    ///
    /// An empty `client_name` on the draft is filled from the client, which is
    /// the only moment the name is copied.
    pub fn quote(
        &self,
        quote_id: impl Into<String>,
        quote_date: DateTime<Utc>,
        draft: QuoteDraft,
        client: Option<&Client>,
    ) -> Quote {
        let breakdown = self.breakdown(&PricingInputs::from(&draft), client);
        let client_name = match (draft.client_name.is_empty(), client) {
            (true, Some(c)) => c.name.clone(),
            _ => draft.client_name,
        };

        Quote {
            quote_id: quote_id.into(),
            quote_date,
            client_id: draft.client_id,
            client_name,
            material: draft.material,
            quantity: draft.quantity,
            price_per_unit: draft.price_per_unit,
            size: draft.size,
            finish_type: draft.finish_type,
            notes: draft.notes,
            setup_fee: draft.setup_fee,
            discount_rate: draft.discount_rate,
            sub_total: breakdown.sub_total,
            total_price: breakdown.total_price,
            is_exported: false,
            created_at: None,
        }
    }

    /// Recompute the totals of an existing quote from its current inputs
    pub fn reprice(&self, mut quote: Quote, client: Option<&Client>) -> Quote {
        let breakdown = self.breakdown(&PricingInputs::from(&quote), client);
        quote.sub_total = breakdown.sub_total;
        quote.total_price = breakdown.total_price;
        quote
    }
}
