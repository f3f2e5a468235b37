//! Quote Model
//!
//! `sub_total` and `total_price` are private: only the pricing engine in
//! [`crate::pricing`] writes them, callers read them through accessors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Price quote for a print run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub quote_id: String,
    pub quote_date: DateTime<Utc>,

    // Client snapshot (denormalized at creation)
    pub client_id: String,
    #[serde(default)]
    pub client_name: String,

    // Production inputs
    #[serde(default)]
    pub material: String,
    pub quantity: u32,
    pub price_per_unit: f64,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub finish_type: String,
    #[serde(default)]
    pub notes: String,

    // Financial inputs
    #[serde(default)]
    pub setup_fee: f64,
    /// Overrides the client's default discount when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_rate: Option<f64>,

    // Computed by the pricing engine
    #[serde(default)]
    pub(crate) sub_total: f64,
    #[serde(default)]
    pub(crate) total_price: f64,

    #[serde(default)]
    pub is_exported: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Quote {
    /// `quantity * price_per_unit` as last computed by the pricing engine
    pub fn sub_total(&self) -> f64 {
        self.sub_total
    }

    /// Final price as last computed by the pricing engine
    pub fn total_price(&self) -> f64 {
        self.total_price
    }

    /// Extract the pricing inputs of this quote
    pub fn draft(&self) -> QuoteDraft {
        QuoteDraft {
            client_id: self.client_id.clone(),
            client_name: self.client_name.clone(),
            material: self.material.clone(),
            quantity: self.quantity,
            price_per_unit: self.price_per_unit,
            size: self.size.clone(),
            finish_type: self.finish_type.clone(),
            notes: self.notes.clone(),
            setup_fee: self.setup_fee,
            discount_rate: self.discount_rate,
        }
    }
}

/// Quote inputs, before pricing
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteDraft {
    pub client_id: String,
    /// Filled from the clients cache when empty
    #[serde(default)]
    pub client_name: String,
    #[serde(default)]
    pub material: String,
    pub quantity: u32,
    pub price_per_unit: f64,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub finish_type: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub setup_fee: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_rate: Option<f64>,
}
