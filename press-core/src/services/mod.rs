//! Domain services
//!
//! Each service owns one [`EntityCache`](crate::cache::EntityCache) and adds
//! validation, derived views and the cross-entity operations on top of it.

pub mod clients;
pub mod jobs;
pub mod quotes;

pub use clients::ClientsService;
pub use jobs::JobsService;
pub use quotes::QuotesService;
