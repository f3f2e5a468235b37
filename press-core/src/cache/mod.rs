//! Entity Cache - in-process collection kept in sync with the remote store
//!
//! Reads are synchronous snapshots. Mutations apply locally first, then a
//! detached task persists them; a failed write is never rolled back and only
//! shows up as the last error. Every snapshot pushed by the store replaces the
//! contents wholesale, including not yet reconciled local writes.

use parking_lot::{Mutex, RwLock};
use press_client::{Document, RemoteStore, StoreError, Subscription};
use shared::error::{AppError, ErrorCode};
use std::future::Future;
use std::sync::{Arc, Weak};
use tokio::sync::watch;
use tokio_util::task::TaskTracker;

struct CacheInner<T: Document> {
    /// Singular entity name used in messages ("client", "quote", "job")
    label: &'static str,
    store: RemoteStore,
    items: RwLock<Vec<T>>,
    last_error: RwLock<Option<AppError>>,
    revision: watch::Sender<u64>,
    writes: TaskTracker,
    subscription: Mutex<Option<Subscription>>,
}

impl<T: Document> CacheInner<T> {
    fn bump(&self) {
        self.revision.send_modify(|rev| *rev = rev.wrapping_add(1));
    }

    fn replace_all(&self, items: Vec<T>) {
        let count = items.len();
        *self.items.write() = items;
        self.bump();
        tracing::debug!(entity = self.label, count, "Cache replaced from snapshot");
    }

    fn set_error(&self, error: AppError) {
        tracing::warn!(entity = self.label, code = %error.code, message = %error.message, "Cache operation failed");
        *self.last_error.write() = Some(error);
    }

    fn write_failed(&self, verb: &str, err: StoreError) {
        let message = format!(
            "Could not {} {} ({}). {}",
            verb,
            self.label,
            err.remote_code(),
            press_client::describe_remote_error(err.remote_code())
        );
        self.set_error(AppError::with_message(err.code(), message).with_detail("reason", err.to_string()));
    }

    fn write_rejected(&self, verb: &str, id: &str) {
        let message = format!(
            "Could not {} {} (store/write-failed). {}",
            verb,
            self.label,
            ErrorCode::WriteFailed.message()
        );
        self.set_error(AppError::with_message(ErrorCode::WriteFailed, message).with_detail("id", id.to_string()));
    }
}

/// Reactive cache of one entity collection
pub struct EntityCache<T: Document> {
    inner: Arc<CacheInner<T>>,
}

impl<T: Document> Clone for EntityCache<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Document> std::fmt::Debug for EntityCache<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityCache")
            .field("entity", &self.inner.label)
            .field("len", &self.len())
            .finish()
    }
}

impl<T: Document> EntityCache<T> {
    /// Create the cache and subscribe to the store once
    ///
    /// With an inactive store the fallback dataset is loaded before this
    /// returns.
    pub fn new(store: RemoteStore, label: &'static str) -> Self {
        let (revision, _rx) = watch::channel(0);
        let inner = Arc::new(CacheInner {
            label,
            store: store.clone(),
            items: RwLock::new(Vec::new()),
            last_error: RwLock::new(None),
            revision,
            writes: TaskTracker::new(),
            subscription: Mutex::new(None),
        });

        // Weak handles: the subscription task must not keep the cache alive
        let on_next: Weak<CacheInner<T>> = Arc::downgrade(&inner);
        let on_error = on_next.clone();
        let subscription = store.subscribe::<T, _, _>(
            move |items| {
                if let Some(inner) = on_next.upgrade() {
                    inner.replace_all(items);
                }
            },
            move |err| {
                if let Some(inner) = on_error.upgrade() {
                    inner.set_error(err.into());
                }
            },
        );
        *inner.subscription.lock() = Some(subscription);

        tracing::info!(entity = label, count = inner.items.read().len(), active = store.is_active(), "Cache initialized");
        Self { inner }
    }

    pub fn label(&self) -> &'static str {
        self.inner.label
    }

    // ── Reads ───────────────────────────────────────────────────────

    /// Copy of the current contents
    pub fn snapshot(&self) -> Vec<T> {
        self.inner.items.read().clone()
    }

    /// Run `f` against the current contents without copying them
    pub fn with_items<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        f(&self.inner.items.read())
    }

    pub fn get(&self, id: &str) -> Option<T> {
        self.inner.items.read().iter().find(|item| item.id() == id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.inner.items.read().iter().any(|item| item.id() == id)
    }

    /// Items matching a predicate, in cache order
    pub fn filter(&self, predicate: impl Fn(&T) -> bool) -> Vec<T> {
        self.inner
            .items
            .read()
            .iter()
            .filter(|item| predicate(item))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.inner.items.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.items.read().is_empty()
    }

    /// Error of the most recent failed operation, cleared by the next one
    pub fn last_error(&self) -> Option<AppError> {
        self.inner.last_error.read().clone()
    }

    /// Revision counter, bumped on every local mutation and applied snapshot
    pub fn watch(&self) -> watch::Receiver<u64> {
        self.inner.revision.subscribe()
    }

    pub fn revision(&self) -> u64 {
        *self.inner.revision.borrow()
    }

    // ── Mutations ───────────────────────────────────────────────────

    /// Append an entity and persist it in the background
    ///
    /// An empty id is replaced by a generated one so the local copy and the
    /// stored document agree.
    pub fn create(&self, item: T) -> T {
        self.clear_error();
        let mut item = item;
        if item.id().is_empty() {
            item.set_id(shared::util::new_document_id());
        }

        self.inner.items.write().push(item.clone());
        self.inner.bump();
        tracing::debug!(entity = self.inner.label, id = %item.id(), "Created locally");

        let inner = self.inner.clone();
        let pending = item.clone();
        self.spawn_write(async move {
            if let Err(e) = inner.store.create(pending).await {
                inner.write_failed("save", e);
            }
        });
        item
    }

    /// Replace the entity with the same id; `false` when it is not cached
    pub fn update(&self, item: T) -> bool {
        self.clear_error();
        {
            let mut items = self.inner.items.write();
            let Some(pos) = items.iter().position(|existing| existing.id() == item.id()) else {
                drop(items);
                tracing::warn!(entity = self.inner.label, id = %item.id(), "Update of unknown id ignored");
                return false;
            };
            items[pos] = item.clone();
        }
        self.inner.bump();

        let inner = self.inner.clone();
        self.spawn_write(async move {
            if !inner.store.update(&item).await {
                inner.write_rejected("update", item.id());
            }
        });
        true
    }

    /// Remove by id; `false` when it is not cached
    pub fn delete(&self, id: &str) -> bool {
        self.clear_error();
        {
            let mut items = self.inner.items.write();
            let before = items.len();
            items.retain(|item| item.id() != id);
            if items.len() == before {
                drop(items);
                tracing::warn!(entity = self.inner.label, id = %id, "Delete of unknown id ignored");
                return false;
            }
        }
        self.inner.bump();

        let inner = self.inner.clone();
        let id = id.to_string();
        self.spawn_write(async move {
            if !inner.store.delete::<T>(&id).await {
                inner.write_rejected("delete", &id);
            }
        });
        true
    }

    /// Replace the contents wholesale, as a pushed snapshot does
    pub(crate) fn apply_snapshot(&self, items: Vec<T>) {
        self.inner.replace_all(items);
    }

    fn clear_error(&self) {
        *self.inner.last_error.write() = None;
    }

    fn spawn_write<F>(&self, write: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                self.inner.writes.spawn_on(write, &runtime);
            }
            Err(_) => {
                tracing::warn!(entity = self.inner.label, "No async runtime, change kept locally only");
            }
        }
    }

    // ── Lifecycle ───────────────────────────────────────────────────

    /// Wait for every in-flight remote write to finish
    pub async fn settle(&self) {
        self.inner.writes.close();
        self.inner.writes.wait().await;
        self.inner.writes.reopen();
    }

    /// Stop live updates and wait for pending writes
    pub async fn shutdown(&self) {
        if let Some(subscription) = self.inner.subscription.lock().take() {
            subscription.unsubscribe();
        }
        self.settle().await;
        tracing::info!(entity = self.inner.label, "Cache shut down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::Client;

    fn client(id: &str, name: &str) -> Client {
        Client {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_offline_cache_loads_fallback_synchronously() {
        let cache: EntityCache<Client> = EntityCache::new(RemoteStore::offline(), "client");
        assert_eq!(cache.len(), 2);
        assert!(cache.get("c1").is_some());
        assert!(cache.last_error().is_none());
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_bumps_revision() {
        let cache: EntityCache<Client> = EntityCache::new(RemoteStore::offline(), "client");
        let before = cache.revision();
        let created = cache.create(client("", "New Co"));
        assert!(!created.id.is_empty());
        assert_eq!(cache.revision(), before + 1);
        assert_eq!(cache.snapshot().last().map(|c| c.name.as_str()), Some("New Co"));
        cache.settle().await;
    }

    #[tokio::test]
    async fn test_update_and_delete_unknown_ids() {
        let cache: EntityCache<Client> = EntityCache::new(RemoteStore::offline(), "client");
        let revision = cache.revision();
        assert!(!cache.update(client("ghost", "Nobody")));
        assert!(!cache.delete("ghost"));
        assert_eq!(cache.revision(), revision);
        assert_eq!(cache.len(), 2);
    }

    #[tokio::test]
    async fn test_update_replaces_full_record() {
        let cache: EntityCache<Client> = EntityCache::new(RemoteStore::offline(), "client");
        assert!(cache.update(client("c1", "Acme Holdings")));
        let updated = cache.get("c1").unwrap();
        assert_eq!(updated.name, "Acme Holdings");
        // Full replace: fields not supplied are gone
        assert_eq!(updated.email, "");
        cache.settle().await;
    }

    #[test]
    fn test_mutations_without_runtime_stay_local() {
        let cache: EntityCache<Client> = EntityCache::new(RemoteStore::offline(), "client");
        assert!(cache.delete("c2"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_apply_snapshot_replaces_wholesale() {
        let cache: EntityCache<Client> = EntityCache::new(RemoteStore::offline(), "client");
        cache.apply_snapshot(vec![client("x", "Only")]);
        assert_eq!(cache.len(), 1);
        cache.apply_snapshot(Vec::new());
        assert!(cache.is_empty());
    }
}
