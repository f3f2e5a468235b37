//! Press Client - remote document store adapter
//!
//! Uniform CRUD + subscribe access to the `clients`, `quotes` and `jobs`
//! collections. When the store is not configured or nobody is signed in the
//! adapter serves a deterministic fallback dataset instead of failing.

pub mod auth;
pub mod backend;
pub mod config;
pub mod document;
pub mod error;
pub mod fallback;
pub mod store;
pub mod subscription;

pub use auth::{AuthSession, describe_auth_error};
pub use backend::{DocumentBackend, InMemoryBackend, NetworkBackend, RawDocument};
pub use config::StoreConfig;
pub use document::{Direction, Document, SortKey};
pub use error::{StoreError, StoreResult, describe_remote_error};
pub use store::RemoteStore;
pub use subscription::Subscription;

// Re-export shared types for convenience
pub use shared::auth::{UserInfo, UserRole};
pub use shared::models::{Client, Job, JobStage, Quote};
