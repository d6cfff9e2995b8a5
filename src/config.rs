use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;

/// Configuration for an extraction session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Whether the browser runs without a window
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Timeout for the static HTTP fetch
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    /// Timeout applied to each rendering command (navigate, wait, click)
    #[serde(default = "default_render_timeout_secs")]
    pub render_timeout_secs: u64,

    /// Per-target timeout when dismissing cookie banners and modals
    #[serde(default = "default_dismiss_timeout_ms")]
    pub dismiss_timeout_ms: u64,

    /// How long to wait for a pagination block to appear
    #[serde(default = "default_pagination_wait_ms")]
    pub pagination_wait_ms: u64,

    /// User agent sent with the static fetch
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl ExtractorConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;
        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Override the WebDriver URL with the `WEBDRIVER_URL` environment variable if set
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(webdriver_url) = std::env::var("WEBDRIVER_URL") {
            if !webdriver_url.is_empty() {
                self.webdriver_url = webdriver_url;
            }
        }
        self
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn render_timeout(&self) -> Duration {
        Duration::from_secs(self.render_timeout_secs)
    }

    pub fn dismiss_timeout(&self) -> Duration {
        Duration::from_millis(self.dismiss_timeout_ms)
    }

    pub fn pagination_wait(&self) -> Duration {
        Duration::from_millis(self.pagination_wait_ms)
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            webdriver_url: default_webdriver_url(),
            headless: default_headless(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            render_timeout_secs: default_render_timeout_secs(),
            dismiss_timeout_ms: default_dismiss_timeout_ms(),
            pagination_wait_ms: default_pagination_wait_ms(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_headless() -> bool {
    true
}

fn default_fetch_timeout_secs() -> u64 {
    10
}

fn default_render_timeout_secs() -> u64 {
    30
}

fn default_dismiss_timeout_ms() -> u64 {
    2000
}

fn default_pagination_wait_ms() -> u64 {
    3000
}

fn default_user_agent() -> String {
    format!("Mozilla/5.0 (compatible; yield-sections/{})", env!("CARGO_PKG_VERSION"))
}
