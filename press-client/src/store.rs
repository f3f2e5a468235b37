//! Remote store adapter
//!
//! One process-wide mode decided at construction: active (backend present and
//! a user signed in) or inactive. Inactive reads serve the fallback dataset
//! and inactive writes succeed without persisting.

use crate::auth::AuthSession;
use crate::backend::{DocumentBackend, NetworkBackend};
use crate::config::StoreConfig;
use crate::document::Document;
use crate::error::{StoreError, StoreResult};
use crate::subscription::Subscription;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

struct StoreInner {
    backend: Option<Arc<dyn DocumentBackend>>,
    active: bool,
}

/// Typed CRUD + subscribe access to the remote collections
#[derive(Clone)]
pub struct RemoteStore {
    inner: Arc<StoreInner>,
}

impl std::fmt::Debug for RemoteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteStore")
            .field("active", &self.inner.active)
            .field("has_backend", &self.inner.backend.is_some())
            .finish()
    }
}

impl RemoteStore {
    /// Store that always serves the fallback dataset
    pub fn offline() -> Self {
        Self {
            inner: Arc::new(StoreInner {
                backend: None,
                active: false,
            }),
        }
    }

    /// Connect to the network store described by `config`
    ///
    /// Missing or placeholder configuration, or an anonymous session, yields an
    /// inactive store rather than an error.
    pub fn connect(config: &StoreConfig, auth: &AuthSession) -> Self {
        if !config.is_configured() {
            tracing::warn!("Store not configured, serving fallback data");
            return Self::offline();
        }
        match NetworkBackend::new(config) {
            Ok(backend) => Self::with_backend(Arc::new(backend), auth),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to build store client, serving fallback data");
                Self::offline()
            }
        }
    }

    /// Use an explicit backend; active only when a user is signed in
    pub fn with_backend(backend: Arc<dyn DocumentBackend>, auth: &AuthSession) -> Self {
        let active = auth.is_authenticated();
        if active {
            tracing::info!("Remote store active");
        } else {
            tracing::warn!("No signed-in user, serving fallback data");
        }
        Self {
            inner: Arc::new(StoreInner {
                backend: Some(backend),
                active,
            }),
        }
    }

    pub fn is_active(&self) -> bool {
        self.inner.active
    }

    fn backend(&self) -> Option<&Arc<dyn DocumentBackend>> {
        self.inner
            .backend
            .as_ref()
            .filter(|_| self.inner.active)
    }

    /// Whole collection; any failure degrades to the fallback dataset
    pub async fn fetch_all<T: Document>(&self) -> Vec<T> {
        let Some(backend) = self.backend() else {
            return T::fallback();
        };
        let fetched = backend
            .list(T::COLLECTION, T::ORDER_BY)
            .await
            .and_then(T::from_raws);
        match fetched {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(collection = T::COLLECTION, error = %e, "Fetch failed, serving fallback data");
                T::fallback()
            }
        }
    }

    /// Register snapshot callbacks
    ///
    /// Inactive: `on_next` receives the fallback dataset once, synchronously.
    /// Active: every pushed snapshot goes to `on_next`, in delivery order. When
    /// the channel fails (or a snapshot cannot be decoded) `on_next` receives
    /// the fallback dataset once, `on_error` the cause, and delivery stops for
    /// good.
    pub fn subscribe<T, N, E>(&self, on_next: N, on_error: E) -> Subscription
    where
        T: Document,
        N: Fn(Vec<T>) + Send + Sync + 'static,
        E: Fn(StoreError) + Send + Sync + 'static,
    {
        let Some(backend) = self.backend().cloned() else {
            on_next(T::fallback());
            return Subscription::closed();
        };
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(collection = T::COLLECTION, "No async runtime, serving fallback data");
            on_next(T::fallback());
            return Subscription::closed();
        };

        let token = CancellationToken::new();
        let cancel = token.clone();
        runtime.spawn(async move {
            let fail = |e: StoreError| {
                tracing::warn!(collection = T::COLLECTION, error = %e, "Live channel failed, serving fallback data");
                on_next(T::fallback());
                on_error(e);
            };

            let opened = tokio::select! {
                _ = cancel.cancelled() => return,
                opened = backend.watch(T::COLLECTION, T::ORDER_BY) => opened,
            };
            let mut rx = match opened {
                Ok(rx) => rx,
                Err(e) => return fail(e),
            };
            tracing::debug!(collection = T::COLLECTION, "Live channel open");

            loop {
                let item = tokio::select! {
                    _ = cancel.cancelled() => break,
                    item = rx.recv() => item,
                };
                let decoded = match item {
                    Some(snapshot) => snapshot.and_then(T::from_raws),
                    None => Err(StoreError::StreamClosed(format!(
                        "{} channel ended",
                        T::COLLECTION
                    ))),
                };
                if cancel.is_cancelled() {
                    break;
                }
                match decoded {
                    Ok(items) => {
                        tracing::debug!(collection = T::COLLECTION, count = items.len(), "Snapshot received");
                        on_next(items);
                    }
                    Err(e) => {
                        fail(e);
                        break;
                    }
                }
            }
        });

        Subscription::new(token)
    }

    /// Persist a new entity and return it with its final id
    ///
    /// An entity whose id is already set keeps it. Inactive stores return the
    /// entity unchanged, or with a `mock-<millis>` id when it had none.
    pub async fn create<T: Document>(&self, item: T) -> StoreResult<T> {
        let mut item = item;
        let Some(backend) = self.backend() else {
            if item.id().is_empty() {
                item.set_id(format!("mock-{}", shared::util::now_millis()));
            }
            return Ok(item);
        };

        let requested = (!item.id().is_empty()).then(|| item.id().to_string());
        let id = backend
            .insert(T::COLLECTION, requested.as_deref(), item.to_data()?)
            .await?;
        item.set_id(id);
        Ok(item)
    }

    /// Full-record replace; `false` on any failure
    pub async fn update<T: Document>(&self, item: &T) -> bool {
        let Some(backend) = self.backend() else {
            return true;
        };
        let result = match item.to_data() {
            Ok(data) => backend.replace(T::COLLECTION, item.id(), data).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(collection = T::COLLECTION, id = %item.id(), error = %e, "Update failed");
                false
            }
        }
    }

    /// Delete by id; `false` on any failure
    pub async fn delete<T: Document>(&self, id: &str) -> bool {
        let Some(backend) = self.backend() else {
            return true;
        };
        match backend.remove(T::COLLECTION, id).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(collection = T::COLLECTION, id = %id, error = %e, "Delete failed");
                false
            }
        }
    }
}
