use clap::Parser;
use std::path::PathBuf;
use yield_sections::ExtractorConfig;

#[derive(Parser, Debug)]
#[command(name = "yield-sections")]
#[command(about = "Extracts typed content sections from a web page, following pagination")]
#[command(version)]
pub struct Args {
    /// Page URL to extract (http or https)
    pub url: String,

    /// JSON configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// WebDriver server URL (overrides config and WEBDRIVER_URL)
    #[arg(long)]
    pub webdriver_url: Option<String>,

    /// Static fetch timeout in seconds
    #[arg(long)]
    pub fetch_timeout: Option<u64>,

    /// Timeout for each rendering command in seconds
    #[arg(long)]
    pub render_timeout: Option<u64>,

    /// Show the browser window
    #[arg(long)]
    pub no_headless: bool,

    /// Print compact JSON instead of pretty-printed
    #[arg(long)]
    pub compact: bool,

    /// Write the result to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl Args {
    /// Apply command-line overrides on top of a loaded configuration
    pub fn apply(&self, mut config: ExtractorConfig) -> ExtractorConfig {
        if let Some(url) = &self.webdriver_url {
            config.webdriver_url = url.clone();
        }
        if let Some(secs) = self.fetch_timeout {
            config.fetch_timeout_secs = secs;
        }
        if let Some(secs) = self.render_timeout {
            config.render_timeout_secs = secs;
        }
        if self.no_headless {
            config.headless = false;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_apply_on_top_of_config() {
        let args = Args::parse_from([
            "yield-sections",
            "https://example.com",
            "--webdriver-url",
            "http://localhost:9515",
            "--render-timeout",
            "5",
            "--no-headless",
        ]);
        let config = args.apply(ExtractorConfig::default());
        assert_eq!(config.webdriver_url, "http://localhost:9515");
        assert_eq!(config.render_timeout_secs, 5);
        assert_eq!(config.fetch_timeout_secs, 10);
        assert!(!config.headless);
    }

    #[test]
    fn test_defaults_leave_config_alone() {
        let args = Args::parse_from(["yield-sections", "https://example.com"]);
        let config = args.apply(ExtractorConfig::default());
        assert!(config.headless);
        assert!(!args.compact);
        assert!(args.output.is_none());
    }
}
