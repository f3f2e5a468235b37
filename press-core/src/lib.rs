//! Press Core - print-shop operations core
//!
//! # Overview
//!
//! Clients, quotes and jobs are each held in an [`EntityCache`] that serves
//! synchronous reads, applies mutations optimistically and reconciles with
//! the remote store in the background. Live snapshots from the store replace
//! a cache wholesale. When the store is unconfigured or nobody is signed in,
//! every cache holds the deterministic fallback dataset.
//!
//! # Module layout
//!
//! ```text
//! press-core/src/
//! ├── core/       # configuration, application state
//! ├── cache/      # entity cache
//! ├── services/   # clients, quotes, jobs
//! ├── workflow/   # drop-target lookup, Kanban board
//! ├── stats/      # summary reducers
//! └── utils/      # logger, validation
//! ```

pub mod cache;
pub mod core;
pub mod services;
pub mod stats;
pub mod utils;
pub mod workflow;

pub use cache::EntityCache;
pub use core::{AppState, Config, setup_environment};
pub use services::{ClientsService, JobsService, QuotesService};
pub use stats::{ClientStats, DashboardStats, JobStats, QuoteStats};
pub use workflow::{DropOutcome, JobBoard};

// Re-export unified error types from shared
pub use shared::error::{AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};
