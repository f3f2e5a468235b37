//! Document binding for entity types
//!
//! Ties each entity to its remote collection, its id field, the stable sort
//! key of its live channel and its slice of the fallback dataset.

use crate::backend::RawDocument;
use crate::error::{StoreError, StoreResult};
use crate::fallback;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::models::{Client, Job, Quote};
use std::cmp::Ordering;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// Field a collection is ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    /// Wire (camelCase) field name
    pub field: &'static str,
    pub direction: Direction,
}

impl SortKey {
    pub const fn asc(field: &'static str) -> Self {
        Self {
            field,
            direction: Direction::Ascending,
        }
    }

    pub const fn desc(field: &'static str) -> Self {
        Self {
            field,
            direction: Direction::Descending,
        }
    }

    /// Compare two raw documents by this key
    ///
    /// Strings compare lexically (RFC 3339 timestamps included), numbers
    /// numerically; documents missing the field sort last.
    pub fn compare(&self, a: &Value, b: &Value) -> Ordering {
        let ordering = match (a.get(self.field), b.get(self.field)) {
            (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
            (Some(Value::Number(x)), Some(Value::Number(y))) => {
                let (x, y) = (x.as_f64().unwrap_or_default(), y.as_f64().unwrap_or_default());
                x.partial_cmp(&y).unwrap_or(Ordering::Equal)
            }
            (Some(_), None) => return Ordering::Less,
            (None, Some(_)) => return Ordering::Greater,
            _ => Ordering::Equal,
        };
        match self.direction {
            Direction::Ascending => ordering,
            Direction::Descending => ordering.reverse(),
        }
    }
}

/// Entity stored in a remote collection
pub trait Document: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Remote collection name
    const COLLECTION: &'static str;
    /// Wire name of the id field
    const ID_FIELD: &'static str = "id";
    /// Ordering of the live channel
    const ORDER_BY: SortKey;

    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);

    /// This type's slice of the deterministic offline dataset
    fn fallback() -> Vec<Self>;

    /// Reject decoded documents that break an entity invariant
    fn validate(&self) -> StoreResult<()> {
        Ok(())
    }

    /// Decode one stored document, restoring its id into the body
    fn from_raw(raw: RawDocument) -> StoreResult<Self> {
        let RawDocument { id, mut data } = raw;
        let Some(body) = data.as_object_mut() else {
            return Err(StoreError::malformed(Self::COLLECTION, "document body is not an object"));
        };
        body.insert(Self::ID_FIELD.to_string(), Value::String(id));
        let doc: Self =
            serde_json::from_value(data).map_err(|e| StoreError::malformed(Self::COLLECTION, e))?;
        doc.validate()?;
        Ok(doc)
    }

    /// Decode a full snapshot; one bad document fails the whole snapshot
    fn from_raws(docs: Vec<RawDocument>) -> StoreResult<Vec<Self>> {
        docs.into_iter().map(Self::from_raw).collect()
    }

    /// Body to persist: every field except the id
    fn to_data(&self) -> StoreResult<Value> {
        let mut data = serde_json::to_value(self)?;
        if let Some(body) = data.as_object_mut() {
            body.remove(Self::ID_FIELD);
        }
        Ok(data)
    }
}

impl Document for Client {
    const COLLECTION: &'static str = "clients";
    const ORDER_BY: SortKey = SortKey::asc("name");

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn fallback() -> Vec<Self> {
        fallback::clients()
    }

    fn validate(&self) -> StoreResult<()> {
        if !self.has_valid_discount_rate() {
            return Err(StoreError::malformed(
                Self::COLLECTION,
                format!(
                    "client {} has discount rate {} outside [0, 1]",
                    self.id, self.default_discount_rate
                ),
            ));
        }
        Ok(())
    }
}

impl Document for Quote {
    const COLLECTION: &'static str = "quotes";
    const ID_FIELD: &'static str = "quoteId";
    const ORDER_BY: SortKey = SortKey::desc("createdAt");

    fn id(&self) -> &str {
        &self.quote_id
    }

    fn set_id(&mut self, id: String) {
        self.quote_id = id;
    }

    fn fallback() -> Vec<Self> {
        fallback::quotes()
    }
}

impl Document for Job {
    const COLLECTION: &'static str = "jobs";
    const ORDER_BY: SortKey = SortKey::desc("createdAt");

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn fallback() -> Vec<Self> {
        fallback::jobs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sort_key_orders_strings_and_missing_last() {
        let key = SortKey::asc("name");
        let mut docs = vec![json!({"name": "Globex"}), json!({}), json!({"name": "Acme"})];
        docs.sort_by(|a, b| key.compare(a, b));
        assert_eq!(docs[0]["name"], "Acme");
        assert_eq!(docs[1]["name"], "Globex");
        assert!(docs[2].get("name").is_none());
    }

    #[test]
    fn test_descending_created_at() {
        let key = SortKey::desc("createdAt");
        let mut docs = vec![
            json!({"createdAt": "2024-01-01T00:00:00Z"}),
            json!({"createdAt": "2024-03-01T00:00:00Z"}),
        ];
        docs.sort_by(|a, b| key.compare(a, b));
        assert_eq!(docs[0]["createdAt"], "2024-03-01T00:00:00Z");
    }

    fn raw(id: &str, data: Value) -> RawDocument {
        RawDocument {
            id: id.into(),
            data,
        }
    }

    #[test]
    fn test_client_with_bad_rate_is_malformed() {
        let err = Client::from_raw(raw("c1", json!({"name": "X", "defaultDiscountRate": 1.5})))
            .unwrap_err();
        assert!(matches!(err, StoreError::MalformedDocument { .. }));
    }

    #[test]
    fn test_snapshot_with_wrong_shape_is_malformed() {
        let result = Job::from_raws(vec![raw("j1", json!({"jobDate": 42}))]);
        assert!(matches!(result, Err(StoreError::MalformedDocument { .. })));
        let result = Job::from_raws(vec![raw("j2", json!("not an object"))]);
        assert!(result.is_err());
    }

    #[test]
    fn test_id_moves_between_key_and_body() {
        let quote = &Quote::fallback()[0];
        let data = quote.to_data().unwrap();
        assert!(data.get("quoteId").is_none());

        let decoded = Quote::from_raw(raw("q1", data)).unwrap();
        assert_eq!(&decoded, quote);
    }
}
