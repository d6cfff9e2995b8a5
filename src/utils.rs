use url::Url;

/// Resolves `href` against `base` into an absolute URL, `None` when either is unusable
pub fn resolve_url(base: &str, href: &str) -> Option<String> {
    match Url::parse(base).and_then(|b| b.join(href)) {
        Ok(resolved) => Some(resolved.to_string()),
        Err(e) => {
            ::log::debug!("Could not resolve '{}' against '{}': {}", href, base, e);
            None
        }
    }
}

/// Cuts `text` to at most `limit` characters, reporting whether it was cut
pub fn truncate_chars(text: &str, limit: usize) -> (String, bool) {
    match text.char_indices().nth(limit) {
        Some((byte_idx, _)) => (text[..byte_idx].to_string(), true),
        None => (text.to_string(), false),
    }
}

/// Whether the string is an http(s) URL the extractor accepts
pub fn is_http_url(candidate: &str) -> bool {
    Url::parse(candidate)
        .map(|u| matches!(u.scheme(), "http" | "https") && u.has_host())
        .unwrap_or(false)
}
