//! Client Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Client entity (customer of the print shop)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub website: String,

    // Address
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip: String,

    // Financial defaults
    #[serde(default)]
    pub is_tax_exempt: bool,
    /// Fraction in [0, 1], e.g. 0.1 for 10%
    #[serde(default)]
    pub default_discount_rate: f64,
    #[serde(default)]
    pub notes: String,

    /// Server-assigned creation timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Client {
    /// Whether the default discount rate respects the [0, 1] invariant
    pub fn has_valid_discount_rate(&self) -> bool {
        (0.0..=1.0).contains(&self.default_discount_rate)
    }
}

/// Create client payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientCreate {
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip: String,
    #[serde(default)]
    pub is_tax_exempt: bool,
    #[serde(default)]
    pub default_discount_rate: f64,
    #[serde(default)]
    pub notes: String,
}

impl ClientCreate {
    /// Materialize the payload into a client record with the given id
    pub fn into_client(self, id: impl Into<String>) -> Client {
        Client {
            id: id.into(),
            name: self.name,
            email: self.email,
            phone: self.phone,
            website: self.website,
            street: self.street,
            city: self.city,
            state: self.state,
            zip: self.zip,
            is_tax_exempt: self.is_tax_exempt,
            default_discount_rate: self.default_discount_rate,
            notes: self.notes,
            created_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_case_document_shape() {
        let client = ClientCreate {
            name: "Acme Corp".into(),
            is_tax_exempt: true,
            default_discount_rate: 0.05,
            ..Default::default()
        }
        .into_client("c1");

        let json = serde_json::to_value(&client).unwrap();
        assert_eq!(json["id"], "c1");
        assert_eq!(json["isTaxExempt"], true);
        assert_eq!(json["defaultDiscountRate"], 0.05);
        assert!(json.get("createdAt").is_none());
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let client: Client = serde_json::from_str(r#"{"id":"c9","name":"Bare"}"#).unwrap();
        assert_eq!(client.email, "");
        assert!(!client.is_tax_exempt);
        assert_eq!(client.default_discount_rate, 0.0);
        assert!(client.has_valid_discount_rate());
    }

    #[test]
    fn test_discount_rate_bounds() {
        let mut client = Client::default();
        client.default_discount_rate = 1.0;
        assert!(client.has_valid_discount_rate());
        client.default_discount_rate = 1.2;
        assert!(!client.has_valid_discount_rate());
        client.default_discount_rate = -0.1;
        assert!(!client.has_valid_discount_rate());
    }
}
