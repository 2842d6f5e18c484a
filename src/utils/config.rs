use std::env;
use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::client::DEFAULT_TOTAL_PATH;
use crate::services::ResponseOrdering;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub total_path: String,
    pub ordering: ResponseOrdering,
    pub request_timeout: Option<Duration>,
    pub catalog_path: Option<PathBuf>,
    pub environment: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base_url: DEFAULT_BASE_URL.to_string(),
            total_path: DEFAULT_TOTAL_PATH.to_string(),
            ordering: ResponseOrdering::default(),
            request_timeout: None,
            catalog_path: None,
            environment: "development".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any variable source; `from_env` passes the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let ordering = match lookup("CART_RESPONSE_ORDERING") {
            Some(value) => value.parse::<ResponseOrdering>()?,
            None => defaults.ordering,
        };
        let request_timeout = match lookup("CART_REQUEST_TIMEOUT_SECS") {
            Some(value) => Some(parse_timeout(&value)?),
            None => None,
        };

        let config = Config {
            base_url: lookup("CART_BASE_URL").unwrap_or(defaults.base_url),
            total_path: lookup("CART_TOTAL_PATH").unwrap_or(defaults.total_path),
            ordering,
            request_timeout,
            catalog_path: lookup("CART_CATALOG").map(PathBuf::from),
            environment: lookup("APP_ENV").unwrap_or(defaults.environment),
        };

        config.validate()?;
        tracing::debug!("Config: loaded for {} environment", config.environment);
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        let url = self.parsed_base_url()?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(anyhow::anyhow!(
                "CART_BASE_URL must start with 'http://' or 'https://'"
            ));
        }

        if !self.total_path.starts_with('/') {
            return Err(anyhow::anyhow!("CART_TOTAL_PATH must start with '/'"));
        }

        Ok(())
    }

    pub fn parsed_base_url(&self) -> anyhow::Result<Url> {
        Url::parse(&self.base_url)
            .map_err(|e| anyhow::anyhow!("CART_BASE_URL is not a valid url ({}): {}", self.base_url, e))
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

fn parse_timeout(value: &str) -> anyhow::Result<Duration> {
    match value.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(anyhow::anyhow!(
            "CART_REQUEST_TIMEOUT_SECS must be a positive number of seconds, got '{}'",
            value
        )),
    }
}
