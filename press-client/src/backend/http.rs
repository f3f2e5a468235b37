//! Network document store over JSON REST
//!
//! | Operation | Request |
//! |-----------|---------|
//! | list      | `GET {base}/{project}/{collection}?orderBy=..&direction=..` |
//! | insert    | `POST {base}/{project}/{collection}` body `{id?, data}` |
//! | replace   | `PUT {base}/{project}/{collection}/{id}` body = data |
//! | remove    | `DELETE {base}/{project}/{collection}/{id}` |
//!
//! The live channel polls `list` and forwards a snapshot only when it differs
//! from the previous one.

use super::{DocumentBackend, RawDocument, SNAPSHOT_CHANNEL_CAPACITY, SnapshotReceiver};
use crate::config::StoreConfig;
use crate::document::{Direction, SortKey};
use crate::error::{StoreError, StoreResult, describe_http_status};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use tokio::sync::mpsc;

const API_KEY_HEADER: &str = "x-api-key";

#[derive(Serialize)]
struct InsertRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<&'a str>,
    data: Value,
}

#[derive(Deserialize)]
struct InsertResponse {
    id: String,
}

/// Error body returned by the store
#[derive(Deserialize)]
struct ApiErrorResponse {
    #[serde(default)]
    message: String,
}

/// Network document store client
#[derive(Debug, Clone)]
pub struct NetworkBackend {
    client: Client,
    base_url: String,
    api_key: String,
    poll_interval: Duration,
}

impl NetworkBackend {
    pub fn new(config: &StoreConfig) -> StoreResult<Self> {
        let client = Client::builder().timeout(config.request_timeout()).build()?;
        Ok(Self {
            client,
            base_url: format!(
                "{}/{}",
                config.base_url.trim_end_matches('/'),
                config.project_id
            ),
            api_key: config.api_key.clone(),
            poll_interval: config.poll_interval(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self, collection: &str) -> String {
        format!("{}/{}", self.base_url, collection)
    }

    fn document_url(&self, collection: &str, id: &str) -> String {
        format!("{}/{}/{}", self.base_url, collection, id)
    }

    fn authorized(&self, req: RequestBuilder) -> RequestBuilder {
        req.header(API_KEY_HEADER, &self.api_key)
    }

    async fn check_status(response: reqwest::Response) -> StoreResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await?;
        let message = serde_json::from_str::<ApiErrorResponse>(&text)
            .ok()
            .map(|e| e.message)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| describe_http_status(status.as_u16()));

        Err(match status {
            StatusCode::UNAUTHORIZED => StoreError::Unauthorized,
            StatusCode::FORBIDDEN => StoreError::PermissionDenied(message),
            StatusCode::NOT_FOUND => StoreError::NotFound(message),
            StatusCode::SERVICE_UNAVAILABLE | StatusCode::BAD_GATEWAY | StatusCode::GATEWAY_TIMEOUT => {
                StoreError::Unavailable(message)
            }
            _ => StoreError::Rejected {
                status: status.as_u16(),
                message,
            },
        })
    }

    async fn fetch(&self, collection: &str, order: SortKey) -> StoreResult<Vec<RawDocument>> {
        let direction = match order.direction {
            Direction::Ascending => "asc",
            Direction::Descending => "desc",
        };
        let req = self
            .client
            .get(self.collection_url(collection))
            .query(&[("orderBy", order.field), ("direction", direction)]);
        let response = Self::check_status(self.authorized(req).send().await?).await?;
        Ok(response.json().await?)
    }
}

#[async_trait]
impl DocumentBackend for NetworkBackend {
    async fn list(&self, collection: &str, order: SortKey) -> StoreResult<Vec<RawDocument>> {
        self.fetch(collection, order).await
    }

    async fn watch(&self, collection: &str, order: SortKey) -> StoreResult<SnapshotReceiver> {
        let first = self.fetch(collection, order).await?;
        let (tx, rx) = mpsc::channel(SNAPSHOT_CHANNEL_CAPACITY);
        if tx.send(Ok(first.clone())).await.is_err() {
            return Ok(rx);
        }

        let backend = self.clone();
        let name = collection.to_string();
        tokio::spawn(poll_changes(
            tx,
            first,
            self.poll_interval,
            collection.to_string(),
            move || {
                let backend = backend.clone();
                let name = name.clone();
                async move { backend.fetch(&name, order).await }
            },
        ));

        Ok(rx)
    }

    async fn insert(&self, collection: &str, id: Option<&str>, data: Value) -> StoreResult<String> {
        let body = InsertRequest {
            id: id.filter(|id| !id.is_empty()),
            data,
        };
        let req = self.client.post(self.collection_url(collection)).json(&body);
        let response = Self::check_status(self.authorized(req).send().await?).await?;
        let created: InsertResponse = response.json().await?;
        Ok(created.id)
    }

    async fn replace(&self, collection: &str, id: &str, data: Value) -> StoreResult<()> {
        let req = self.client.put(self.document_url(collection, id)).json(&data);
        Self::check_status(self.authorized(req).send().await?).await?;
        Ok(())
    }

    async fn remove(&self, collection: &str, id: &str) -> StoreResult<()> {
        let req = self.client.delete(self.document_url(collection, id));
        Self::check_status(self.authorized(req).send().await?).await?;
        Ok(())
    }
}

/// Poll `fetch` every `interval` and forward a snapshot only when it differs
/// from the previous one
///
/// The first failed poll is forwarded as an error and ends the channel.
async fn poll_changes<F, Fut>(
    tx: mpsc::Sender<StoreResult<Vec<RawDocument>>>,
    first: Vec<RawDocument>,
    interval: Duration,
    collection: String,
    mut fetch: F,
) where
    F: FnMut() -> Fut,
    Fut: Future<Output = StoreResult<Vec<RawDocument>>>,
{
    let mut last = first;
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    // The first tick completes immediately
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = tx.closed() => break,
            _ = ticker.tick() => {}
        }
        match fetch().await {
            Ok(snapshot) if snapshot == last => continue,
            Ok(snapshot) => {
                tracing::debug!(collection = %collection, count = snapshot.len(), "Remote snapshot changed");
                last = snapshot.clone();
                if tx.send(Ok(snapshot)).await.is_err() {
                    break;
                }
            }
            Err(e) => {
                tracing::warn!(collection = %collection, error = %e, "Live channel poll failed");
                let _ = tx.send(Err(e)).await;
                break;
            }
        }
    }
}
