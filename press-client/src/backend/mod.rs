//! Document backends
//!
//! A backend is an opaque document store addressed by collection name. It
//! knows nothing about entity types; decoding happens in [`crate::store`].

mod http;
mod memory;

pub use http::NetworkBackend;
pub use memory::InMemoryBackend;

use crate::document::SortKey;
use crate::error::StoreResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::mpsc;

/// Capacity of a live channel before the producer waits
pub const SNAPSHOT_CHANNEL_CAPACITY: usize = 16;

/// Stored document: its id plus the body without the id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDocument {
    pub id: String,
    pub data: Value,
}

/// Live channel: each item is a full, ordered collection snapshot
pub type SnapshotReceiver = mpsc::Receiver<StoreResult<Vec<RawDocument>>>;

/// Raw document store
#[async_trait]
pub trait DocumentBackend: Send + Sync {
    /// Every document of a collection, ordered by `order`
    async fn list(&self, collection: &str, order: SortKey) -> StoreResult<Vec<RawDocument>>;

    /// Open a live channel
    ///
    /// The first item is the current snapshot. An `Err` item means the
    /// channel failed; nothing follows it.
    async fn watch(&self, collection: &str, order: SortKey) -> StoreResult<SnapshotReceiver>;

    /// Store a new document and return its id
    ///
    /// `id` is used when given, otherwise the backend assigns one. The stored
    /// copy carries a server-assigned `createdAt`.
    async fn insert(&self, collection: &str, id: Option<&str>, data: Value) -> StoreResult<String>;

    /// Replace an existing document
    async fn replace(&self, collection: &str, id: &str, data: Value) -> StoreResult<()>;

    async fn remove(&self, collection: &str, id: &str) -> StoreResult<()>;
}

/// Stable sort of raw documents by a key of their body
pub fn sort_documents(docs: &mut [RawDocument], order: SortKey) {
    docs.sort_by(|a, b| order.compare(&a.data, &b.data));
}
