//! Input validation helpers
//!
//! Checks run by the services before a mutation reaches a cache. Empty
//! optional fields always pass.

use shared::error::{AppError, AppResult};
use shared::models::{Client, QuoteDraft};

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: client, material
pub const MAX_NAME_LEN: usize = 200;

/// Notes
pub const MAX_NOTE_LEN: usize = 2000;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// URLs
pub const MAX_URL_LEN: usize = 2048;

/// Smallest accepted unit price
pub const MIN_PRICE_PER_UNIT: f64 = 0.01;

// ── Field helpers ───────────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")).with_detail("field", field));
    }
    validate_optional_text(value, field, max_len)
}

/// Validate that an optional string is within the length limit.
pub fn validate_optional_text(value: &str, field: &str, max_len: usize) -> AppResult<()> {
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// `local@domain.tld` with a letters-only TLD of two or more characters
pub fn is_valid_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    let local_ok = !local.is_empty()
        && local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "._%+-".contains(c));
    let host_ok = !host.is_empty()
        && host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');
    let tld_ok = tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic());
    local_ok && host_ok && tld_ok
}

/// Ten or eleven digits once punctuation is stripped
pub fn is_valid_phone(value: &str) -> bool {
    let digits = value.chars().filter(char::is_ascii_digit).count();
    (10..=11).contains(&digits)
}

/// Absolute http(s) URL, or a bare host that becomes one with `http://`
pub fn is_valid_url(value: &str) -> bool {
    let rest = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"))
        .unwrap_or(value);
    let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
    !host.is_empty()
        && !value.chars().any(char::is_whitespace)
        && host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || ".-:".contains(c))
}

pub fn validate_rate(value: f64, field: &str) -> AppResult<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(AppError::validation(format!("{field} must be between 0 and 1"))
            .with_detail("field", field));
    }
    Ok(())
}

fn invalid_format(field: &str) -> AppError {
    AppError::validation(format!("{field} has an invalid format")).with_detail("field", field)
}

// ── Entity validation ───────────────────────────────────────────────

pub fn validate_client(client: &Client) -> AppResult<()> {
    validate_required_text(&client.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&client.email, "email", MAX_EMAIL_LEN)?;
    if !client.email.is_empty() && !is_valid_email(&client.email) {
        return Err(invalid_format("email"));
    }
    if !client.phone.is_empty() && !is_valid_phone(&client.phone) {
        return Err(invalid_format("phone"));
    }
    validate_optional_text(&client.website, "website", MAX_URL_LEN)?;
    if !client.website.is_empty() && !is_valid_url(&client.website) {
        return Err(invalid_format("website"));
    }
    validate_optional_text(&client.notes, "notes", MAX_NOTE_LEN)?;
    validate_rate(client.default_discount_rate, "defaultDiscountRate")
}

pub fn validate_quote_draft(draft: &QuoteDraft) -> AppResult<()> {
    validate_required_text(&draft.client_id, "clientId", MAX_NAME_LEN)?;
    validate_required_text(&draft.material, "material", MAX_NAME_LEN)?;
    if draft.quantity < 1 {
        return Err(AppError::validation("quantity must be at least 1").with_detail("field", "quantity"));
    }
    if !draft.price_per_unit.is_finite() || draft.price_per_unit < MIN_PRICE_PER_UNIT {
        return Err(AppError::validation(format!(
            "pricePerUnit must be at least {MIN_PRICE_PER_UNIT}"
        ))
        .with_detail("field", "pricePerUnit"));
    }
    if !draft.setup_fee.is_finite() || draft.setup_fee < 0.0 {
        return Err(AppError::validation("setupFee must not be negative").with_detail("field", "setupFee"));
    }
    if let Some(rate) = draft.discount_rate {
        validate_rate(rate, "discountRate")?;
    }
    validate_optional_text(&draft.notes, "notes", MAX_NOTE_LEN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::error::ErrorCode;

    fn client() -> Client {
        Client {
            id: "c1".into(),
            name: "Acme Corp".into(),
            email: "contact@acme.com".into(),
            phone: "555-123-4567".into(),
            website: "https://acme.com".into(),
            default_discount_rate: 0.05,
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_client_passes() {
        assert!(validate_client(&client()).is_ok());
        // Optional fields may be blank
        let bare = Client {
            name: "Bare".into(),
            ..Default::default()
        };
        assert!(validate_client(&bare).is_ok());
    }

    #[test]
    fn test_client_name_required() {
        let mut c = client();
        c.name = "   ".into();
        let err = validate_client(&c).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[test]
    fn test_email_format() {
        assert!(is_valid_email("hello@globex.com"));
        assert!(is_valid_email("first.last+tag@mail.example.org"));
        assert!(!is_valid_email("no-at-sign.com"));
        assert!(!is_valid_email("a@b.c"));
        assert!(!is_valid_email("a b@c.com"));
    }

    #[test]
    fn test_phone_digit_count() {
        assert!(is_valid_phone("555-987-6543"));
        assert!(is_valid_phone("+1 (555) 987-6543"));
        assert!(!is_valid_phone("555-6543"));
        assert!(!is_valid_phone("555 987 6543 210"));
    }

    #[test]
    fn test_url_format() {
        assert!(is_valid_url("https://acme.com"));
        assert!(is_valid_url("acme.com/about"));
        assert!(!is_valid_url("not a url"));
        assert!(!is_valid_url("https://"));
    }

    #[test]
    fn test_discount_rate_bounds() {
        let mut c = client();
        c.default_discount_rate = 1.01;
        assert!(validate_client(&c).is_err());
    }

    #[test]
    fn test_quote_draft_rules() {
        let mut draft = QuoteDraft {
            client_id: "c1".into(),
            material: "Cardstock".into(),
            quantity: 100,
            price_per_unit: 0.25,
            ..Default::default()
        };
        assert!(validate_quote_draft(&draft).is_ok());

        draft.quantity = 0;
        assert!(validate_quote_draft(&draft).is_err());
        draft.quantity = 100;
        draft.price_per_unit = 0.0;
        assert!(validate_quote_draft(&draft).is_err());
        draft.price_per_unit = 0.25;
        draft.discount_rate = Some(1.5);
        assert!(validate_quote_draft(&draft).is_err());
    }

    #[test]
    fn test_quote_draft_rejects_non_finite_amounts() {
        let draft = QuoteDraft {
            client_id: "c1".into(),
            material: "Cardstock".into(),
            quantity: 100,
            price_per_unit: 0.25,
            ..Default::default()
        };
        for bad in [f64::NAN, f64::INFINITY] {
            let err = validate_quote_draft(&QuoteDraft { price_per_unit: bad, ..draft.clone() }).unwrap_err();
            assert_eq!(err.code, ErrorCode::ValidationFailed);
            let err = validate_quote_draft(&QuoteDraft { setup_fee: bad, ..draft.clone() }).unwrap_err();
            assert_eq!(err.code, ErrorCode::ValidationFailed);
        }
        assert!(validate_quote_draft(&QuoteDraft { discount_rate: Some(f64::NAN), ..draft }).is_err());
    }
}
