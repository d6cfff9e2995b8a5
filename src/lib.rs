pub mod config;
pub mod crawlers;
pub mod error;
pub mod parsers;
pub mod results;
pub mod utils;

// Re-export commonly used types for convenience
pub use config::ExtractorConfig;
pub use results::{ExtractionResult, Section, SectionType, Strategy};

use crawlers::pagination::RenderSettings;
use crawlers::surface::RenderLauncher;
use crawlers::webdriver::WebDriverLauncher;
use error::FetchError;

/// Adaptive page extractor: static fetch first, rendered pagination when needed
pub struct Extractor {
    config: ExtractorConfig,
    client: reqwest::Client,
    launcher: Box<dyn RenderLauncher>,
}

impl Extractor {
    /// Create an extractor that renders through the configured WebDriver server
    pub fn new(config: ExtractorConfig) -> Result<Self, FetchError> {
        let client = crawlers::fetch::build_client(&config)?;
        let launcher = Box::new(WebDriverLauncher::new(&config));
        Ok(Self {
            config,
            client,
            launcher,
        })
    }

    /// Replace the rendering backend
    pub fn with_launcher(mut self, launcher: impl RenderLauncher + 'static) -> Self {
        self.launcher = Box::new(launcher);
        self
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extract one URL; failures are reported inside the result
    pub async fn run(&self, url: &str) -> ExtractionResult {
        let settings = RenderSettings::from(&self.config);
        crawlers::controller::run_extraction(url, &self.client, self.launcher.as_ref(), &settings)
            .await
    }
}
