use press_client::StoreConfig;
use shared::pricing::DEFAULT_TAX_RATE;

/// Process configuration
///
/// # Environment variables
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | ENVIRONMENT | development | development, staging or production |
/// | LOG_LEVEL | info | Default log filter when RUST_LOG is unset |
/// | LOG_JSON | false | JSON console output |
/// | LOG_DIR | (none) | Directory for daily rolling log files |
/// | TAX_RATE | 0.07 | Sales tax for non-exempt clients |
/// | ADMIN_EMAILS | (none) | Comma-separated emails that sign in as admin |
/// | PRESS_USER_ID | (none) | Signed-in identity; unset means anonymous |
/// | PRESS_USER_EMAIL | (none) | Email of the signed-in identity |
/// | PRESS_USER_NAME | (none) | Display name of the signed-in identity |
///
/// Store settings come from the `PRESS_STORE_*` variables, see [`StoreConfig`].
#[derive(Debug, Clone)]
pub struct Config {
    pub environment: String,
    pub log_level: String,
    pub log_json: bool,
    pub log_dir: Option<String>,
    pub tax_rate: f64,
    pub admin_emails: Vec<String>,
    pub user_id: Option<String>,
    pub user_email: Option<String>,
    pub user_name: Option<String>,
    pub store: StoreConfig,
}

impl Config {
    /// Load from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self {
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: std::env::var("LOG_JSON")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty()),
            tax_rate: std::env::var("TAX_RATE")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|rate: &f64| (0.0..=1.0).contains(rate))
                .unwrap_or(DEFAULT_TAX_RATE),
            admin_emails: std::env::var("ADMIN_EMAILS")
                .map(|v| parse_list(&v))
                .unwrap_or_default(),
            user_id: non_empty_var("PRESS_USER_ID"),
            user_email: non_empty_var("PRESS_USER_EMAIL"),
            user_name: non_empty_var("PRESS_USER_NAME"),
            store: StoreConfig::from_env(),
        }
    }

    /// Offline configuration for tests and demos
    pub fn offline() -> Self {
        Self {
            environment: "development".into(),
            log_level: "info".into(),
            log_json: false,
            log_dir: None,
            tax_rate: DEFAULT_TAX_RATE,
            admin_emails: Vec::new(),
            user_id: None,
            user_email: None,
            user_name: None,
            store: StoreConfig::default(),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

/// Load `.env`, read the configuration and install the logger
pub fn setup_environment() -> anyhow::Result<Config> {
    // Missing .env is fine
    dotenv::dotenv().ok();
    let config = Config::from_env();
    crate::utils::logger::init_logger_with_file(
        &config.log_level,
        config.log_json,
        config.log_dir.as_deref(),
    )?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_admin_list() {
        assert_eq!(
            parse_list(" a@shop.test, ,b@shop.test "),
            vec!["a@shop.test".to_string(), "b@shop.test".to_string()]
        );
        assert!(parse_list("").is_empty());
    }

    #[test]
    fn test_offline_defaults() {
        let config = Config::offline();
        assert!(config.is_development());
        assert!(!config.store.is_configured());
        assert_eq!(config.tax_rate, 0.07);
        assert!(config.user_id.is_none());
    }
}
