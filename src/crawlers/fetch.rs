use crate::config::ExtractorConfig;
use crate::error::FetchError;
use reqwest::redirect::Policy;

/// Maximum redirects followed by the static fetch
pub const MAX_REDIRECTS: usize = 10;

/// Builds the HTTP client used for static fetches
pub fn build_client(config: &ExtractorConfig) -> Result<reqwest::Client, FetchError> {
    let client = reqwest::Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(config.fetch_timeout())
        .redirect(Policy::limited(MAX_REDIRECTS))
        .build()?;
    Ok(client)
}

/// Fetches raw markup without executing scripts
///
/// Any non-success status, 4xx included, is an error.
pub async fn fetch_static(client: &reqwest::Client, url: &str) -> Result<String, FetchError> {
    ::log::debug!("Static fetch: {}", url);
    let response = client.get(url).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            code: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
        });
    }

    let body = response.text().await?;
    ::log::debug!("Fetched {} bytes from {}", body.len(), url);
    Ok(body)
}
