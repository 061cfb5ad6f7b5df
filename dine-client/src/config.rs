//! Client configuration

use std::path::PathBuf;
use std::time::Duration;

/// Development backend used when `MENU_API_URL` is not set
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Client configuration for connecting to the menu backend
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend host (e.g., "https://menu.example.com"); API calls go to `{base_url}/api`
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Directory holding the persisted table/cart/auth snapshots
    pub data_dir: PathBuf,

    /// Refresh interval of the order list poller
    pub poll_interval: Duration,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: 30,
            data_dir: PathBuf::from("./data"),
            poll_interval: Duration::from_secs(10),
        }
    }

    /// Build configuration from `MENU_*` environment variables
    pub fn from_env() -> Self {
        let base_url = std::env::var("MENU_API_URL").unwrap_or_else(|_| {
            tracing::debug!("MENU_API_URL not set, using development default");
            DEFAULT_BASE_URL.to_string()
        });

        let mut config = Self::new(base_url);
        if let Ok(dir) = std::env::var("MENU_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(timeout) = std::env::var("MENU_HTTP_TIMEOUT")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            config.timeout = timeout;
        }
        if let Some(secs) = std::env::var("MENU_POLL_INTERVAL")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|s| *s > 0)
        {
            config.poll_interval = Duration::from_secs(secs);
        }
        config
    }

    /// Set the data directory
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Set the order poll interval
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Host without trailing slash, used to resolve relative image paths
    pub fn asset_base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// API root (`{base_url}/api`)
    pub fn api_url(&self) -> String {
        format!("{}/api", self.asset_base())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
