//! Core module - configuration and application state
//!
//! - [`Config`] - process configuration
//! - [`AppState`] - explicitly constructed caches and services

pub mod config;
pub mod state;

pub use config::{Config, setup_environment};
pub use state::AppState;
