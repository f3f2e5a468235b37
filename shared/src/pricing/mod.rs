//! Pricing Engine Module
//!
//! Pure quote pricing shared by the store adapter (fallback dataset) and the
//! operations core (quote service).

mod calculator;

pub use calculator::*;
