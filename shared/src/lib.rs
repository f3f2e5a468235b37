//! Shared types for the print-shop workspace
//!
//! Domain models, identity types, the pricing engine and the unified
//! error system used by both the store adapter and the operations core.

pub mod auth;
pub mod error;
pub mod models;
pub mod pricing;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use auth::{UserInfo, UserRole};
pub use error::{AppError, AppResult, ErrorCategory, ErrorCode};
pub use pricing::{PriceBreakdown, PricingEngine};
