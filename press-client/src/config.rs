//! Store configuration

use std::time::Duration;

/// Prefix of the placeholder values shipped in sample configuration
const PLACEHOLDER_PREFIX: &str = "YOUR_";

/// Remote document store configuration
///
/// # Environment variables
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | PRESS_STORE_URL | (empty) | Store base URL |
/// | PRESS_STORE_API_KEY | (empty) | API key sent with every request |
/// | PRESS_STORE_PROJECT | (empty) | Project id |
/// | PRESS_STORE_TIMEOUT_SECS | 30 | Request timeout |
/// | PRESS_STORE_POLL_INTERVAL_MS | 2000 | Live channel poll interval |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Base URL (e.g. "https://store.example.com/v1")
    pub base_url: String,
    pub api_key: String,
    pub project_id: String,
    /// Request timeout in seconds
    pub timeout: u64,
    /// Interval between snapshot polls of the live channel, in milliseconds
    pub poll_interval_ms: u64,
}

impl StoreConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: String::new(),
            project_id: String::new(),
            timeout: 30,
            poll_interval_ms: 2000,
        }
    }

    /// Load from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("PRESS_STORE_URL").unwrap_or_default(),
            api_key: std::env::var("PRESS_STORE_API_KEY").unwrap_or_default(),
            project_id: std::env::var("PRESS_STORE_PROJECT").unwrap_or_default(),
            timeout: std::env::var("PRESS_STORE_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            poll_interval_ms: std::env::var("PRESS_STORE_POLL_INTERVAL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(2000),
        }
    }

    /// Set the API key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    /// Set the project id
    pub fn with_project(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = project_id.into();
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Set the live channel poll interval
    pub fn with_poll_interval(mut self, millis: u64) -> Self {
        self.poll_interval_ms = millis;
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    /// Whether every value is present and none is a placeholder
    pub fn is_configured(&self) -> bool {
        [&self.base_url, &self.api_key, &self.project_id]
            .iter()
            .all(|v| !v.trim().is_empty() && !v.starts_with(PLACEHOLDER_PREFIX))
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full() -> StoreConfig {
        StoreConfig::new("https://store.example.com")
            .with_api_key("key-123")
            .with_project("print-shop")
    }

    #[test]
    fn test_complete_config_is_configured() {
        assert!(full().is_configured());
    }

    #[test]
    fn test_default_is_not_configured() {
        assert!(!StoreConfig::default().is_configured());
    }

    #[test]
    fn test_placeholder_values_are_not_configured() {
        let config = full().with_api_key("YOUR_API_KEY");
        assert!(!config.is_configured());
    }

    #[test]
    fn test_builders() {
        let config = full().with_timeout(5).with_poll_interval(250);
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert_eq!(config.poll_interval(), Duration::from_millis(250));
    }
}
