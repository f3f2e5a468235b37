//! In-process document store
//!
//! Collections live in memory and every change is announced on a broadcast
//! feed, so live channels behave like a push-based remote store. Writes and
//! live channels can be made to fail on demand.

use super::{DocumentBackend, RawDocument, SNAPSHOT_CHANNEL_CAPACITY, SnapshotReceiver, sort_documents};
use crate::document::{Document, SortKey};
use crate::error::{StoreError, StoreResult};
use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{broadcast, mpsc};

/// Event on the change feed
#[derive(Debug, Clone)]
enum FeedEvent {
    /// A collection changed; watchers re-read it
    Changed(String),
    /// Every open live channel fails with this reason
    Broken(String),
}

type Collections = HashMap<String, BTreeMap<String, Value>>;

/// Document store held in process memory
#[derive(Debug, Clone)]
pub struct InMemoryBackend {
    collections: Arc<RwLock<Collections>>,
    feed: broadcast::Sender<FeedEvent>,
    fail_writes: Arc<AtomicBool>,
    fail_watch: Arc<AtomicBool>,
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryBackend {
    pub fn new() -> Self {
        let (feed, _rx) = broadcast::channel(64);
        Self {
            collections: Arc::new(RwLock::new(HashMap::new())),
            feed,
            fail_writes: Arc::new(AtomicBool::new(false)),
            fail_watch: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Make every subsequent write fail (or succeed again)
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent `watch` calls fail to open (or succeed again)
    pub fn set_fail_watch(&self, fail: bool) {
        self.fail_watch.store(fail, Ordering::SeqCst);
    }

    /// Fail every currently open live channel
    pub fn break_streams(&self, reason: impl Into<String>) {
        let reason = reason.into();
        tracing::debug!(%reason, "Breaking live channels");
        let _ = self.feed.send(FeedEvent::Broken(reason));
    }

    /// Replace a collection out of band, as another writer would
    pub fn push_snapshot<T: Document>(&self, items: &[T]) -> StoreResult<()> {
        let mut docs = BTreeMap::new();
        for item in items {
            docs.insert(item.id().to_string(), item.to_data()?);
        }
        self.collections
            .write()
            .insert(T::COLLECTION.to_string(), docs);
        self.notify(T::COLLECTION);
        Ok(())
    }

    /// Number of documents currently stored in a collection
    pub fn count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .get(collection)
            .map(BTreeMap::len)
            .unwrap_or(0)
    }

    /// Stored body of one document
    pub fn get(&self, collection: &str, id: &str) -> Option<Value> {
        self.collections
            .read()
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned()
    }

    fn snapshot(&self, collection: &str, order: SortKey) -> Vec<RawDocument> {
        let mut docs: Vec<RawDocument> = self
            .collections
            .read()
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .map(|(id, data)| RawDocument {
                        id: id.clone(),
                        data: data.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default();
        sort_documents(&mut docs, order);
        docs
    }

    fn notify(&self, collection: &str) {
        // No receivers just means nobody is watching
        let _ = self.feed.send(FeedEvent::Changed(collection.to_string()));
    }

    fn check_writable(&self) -> StoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::PermissionDenied("writes are disabled".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentBackend for InMemoryBackend {
    async fn list(&self, collection: &str, order: SortKey) -> StoreResult<Vec<RawDocument>> {
        Ok(self.snapshot(collection, order))
    }

    async fn watch(&self, collection: &str, order: SortKey) -> StoreResult<SnapshotReceiver> {
        if self.fail_watch.load(Ordering::SeqCst) {
            return Err(StoreError::PermissionDenied(format!(
                "live channel on {} refused",
                collection
            )));
        }

        let (tx, rx) = mpsc::channel(SNAPSHOT_CHANNEL_CAPACITY);
        // Subscribe before the first read so no change slips in between
        let mut feed = self.feed.subscribe();
        let backend = self.clone();
        let collection = collection.to_string();

        if tx.send(Ok(backend.snapshot(&collection, order))).await.is_err() {
            return Ok(rx);
        }

        tokio::spawn(async move {
            loop {
                let event = tokio::select! {
                    _ = tx.closed() => break,
                    event = feed.recv() => event,
                };
                let outcome = match event {
                    Ok(FeedEvent::Changed(changed)) if changed == collection => {
                        Ok(backend.snapshot(&collection, order))
                    }
                    Ok(FeedEvent::Changed(_)) => continue,
                    // Missed events only mean the next snapshot is fresher
                    Err(broadcast::error::RecvError::Lagged(_)) => {
                        Ok(backend.snapshot(&collection, order))
                    }
                    Ok(FeedEvent::Broken(reason)) => Err(StoreError::Unavailable(reason)),
                    Err(broadcast::error::RecvError::Closed) => {
                        Err(StoreError::StreamClosed("change feed closed".into()))
                    }
                };
                let failed = outcome.is_err();
                if tx.send(outcome).await.is_err() || failed {
                    break;
                }
            }
            tracing::debug!(collection = %collection, "Live channel ended");
        });

        Ok(rx)
    }

    async fn insert(&self, collection: &str, id: Option<&str>, data: Value) -> StoreResult<String> {
        self.check_writable()?;
        let mut data = data;
        let Some(body) = data.as_object_mut() else {
            return Err(StoreError::malformed(collection, "document body is not an object"));
        };
        body.insert(
            "createdAt".to_string(),
            Value::String(chrono::Utc::now().to_rfc3339()),
        );

        let id = id
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .unwrap_or_else(shared::util::new_document_id);
        self.collections
            .write()
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), data);
        self.notify(collection);
        Ok(id)
    }

    async fn replace(&self, collection: &str, id: &str, data: Value) -> StoreResult<()> {
        self.check_writable()?;
        {
            let mut collections = self.collections.write();
            let existing = collections
                .get_mut(collection)
                .and_then(|docs| docs.get_mut(id))
                .ok_or_else(|| StoreError::NotFound(format!("{}/{}", collection, id)))?;

            let created_at = existing.get("createdAt").cloned();
            let mut data = data;
            if let (Some(created_at), Some(body)) = (created_at, data.as_object_mut()) {
                body.insert("createdAt".to_string(), created_at);
            }
            *existing = data;
        }
        self.notify(collection);
        Ok(())
    }

    async fn remove(&self, collection: &str, id: &str) -> StoreResult<()> {
        self.check_writable()?;
        let removed = self
            .collections
            .write()
            .get_mut(collection)
            .and_then(|docs| docs.remove(id));
        if removed.is_none() {
            return Err(StoreError::NotFound(format!("{}/{}", collection, id)));
        }
        self.notify(collection);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use tokio::time::timeout;

    const BY_NAME: SortKey = SortKey::asc("name");

    #[tokio::test]
    async fn test_insert_assigns_id_and_created_at() {
        let backend = InMemoryBackend::new();
        let id = backend.insert("clients", None, json!({"name": "Acme"})).await.unwrap();
        assert!(!id.is_empty());
        let stored = backend.get("clients", &id).unwrap();
        assert!(stored.get("createdAt").is_some());
    }

    #[tokio::test]
    async fn test_replace_keeps_created_at() {
        let backend = InMemoryBackend::new();
        let id = backend.insert("clients", Some("c1"), json!({"name": "Acme"})).await.unwrap();
        let created = backend.get("clients", &id).unwrap()["createdAt"].clone();

        backend.replace("clients", "c1", json!({"name": "Acme Holdings"})).await.unwrap();
        let stored = backend.get("clients", "c1").unwrap();
        assert_eq!(stored["name"], "Acme Holdings");
        assert_eq!(stored["createdAt"], created);
    }

    #[tokio::test]
    async fn test_missing_documents_are_not_found() {
        let backend = InMemoryBackend::new();
        assert!(matches!(
            backend.replace("clients", "nope", json!({})).await,
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            backend.remove("clients", "nope").await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_failing_writes() {
        let backend = InMemoryBackend::new();
        backend.set_fail_writes(true);
        let result = backend.insert("clients", None, json!({"name": "Acme"})).await;
        assert!(matches!(result, Err(StoreError::PermissionDenied(_))));
        assert_eq!(backend.count("clients"), 0);
    }

    #[tokio::test]
    async fn test_watch_pushes_ordered_snapshots() {
        let backend = InMemoryBackend::new();
        backend.insert("clients", Some("b"), json!({"name": "Globex"})).await.unwrap();

        let mut rx = backend.watch("clients", BY_NAME).await.unwrap();
        let first = rx.recv().await.unwrap().unwrap();
        assert_eq!(first.len(), 1);

        backend.insert("clients", Some("a"), json!({"name": "Acme"})).await.unwrap();
        let second = timeout(Duration::from_secs(1), rx.recv())
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        let names: Vec<&str> = second.iter().map(|d| d.data["name"].as_str().unwrap()).collect();
        assert_eq!(names, ["Acme", "Globex"]);
    }

    #[tokio::test]
    async fn test_watch_ignores_other_collections() {
        let backend = InMemoryBackend::new();
        let mut rx = backend.watch("clients", BY_NAME).await.unwrap();
        rx.recv().await.unwrap().unwrap();

        backend.insert("jobs", None, json!({"stage": "Draft"})).await.unwrap();
        assert!(timeout(Duration::from_millis(50), rx.recv()).await.is_err());
    }

    #[tokio::test]
    async fn test_broken_stream_ends_with_error() {
        let backend = InMemoryBackend::new();
        let mut rx = backend.watch("clients", BY_NAME).await.unwrap();
        rx.recv().await.unwrap().unwrap();

        backend.break_streams("permission revoked");
        let item = timeout(Duration::from_secs(1), rx.recv()).await.unwrap().unwrap();
        assert!(matches!(item, Err(StoreError::Unavailable(_))));
        assert!(timeout(Duration::from_secs(1), rx.recv()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_refused_watch() {
        let backend = InMemoryBackend::new();
        backend.set_fail_watch(true);
        assert!(backend.watch("clients", BY_NAME).await.is_err());
    }
}
