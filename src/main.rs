use clap::Parser;
use std::process::ExitCode;
use yield_sections::utils::is_http_url;
use yield_sections::{Extractor, ExtractorConfig};

mod args;
use args::Args;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    env_logger::init();

    let args = Args::parse();

    if !is_http_url(&args.url) {
        eprintln!("URL must start with http:// or https://: {}", args.url);
        return ExitCode::from(2);
    }

    let config = match &args.config {
        Some(path) => match ExtractorConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                ::log::error!("Failed to load config {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => ExtractorConfig::default(),
    };
    let config = args.apply(config.with_env_overrides());

    let extractor = match Extractor::new(config) {
        Ok(extractor) => extractor,
        Err(e) => {
            ::log::error!("Failed to create HTTP client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let start_time = std::time::Instant::now();
    let result = extractor.run(&args.url).await;
    ::log::info!(
        "Extraction complete - {} sections from {} pages in {:.2} seconds",
        result.sections.len(),
        result.interactions.pages.len(),
        start_time.elapsed().as_secs_f64()
    );

    let json = if args.compact {
        serde_json::to_string(&result)
    } else {
        serde_json::to_string_pretty(&result)
    };
    let json = match json {
        Ok(json) => json,
        Err(e) => {
            ::log::error!("Failed to serialize result: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match &args.output {
        Some(path) => {
            if let Err(e) = std::fs::write(path, json) {
                ::log::error!("Failed to write {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
            ::log::info!("Wrote result to {}", path.display());
        }
        None => println!("{}", json),
    }

    ExitCode::SUCCESS
}
