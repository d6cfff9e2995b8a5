use crate::parsers::html::Document;
use scraper::Selector;
use std::sync::LazyLock;

/// Subtrees that never belong in extracted content
pub const NOISE_SELECTORS: [&str; 7] = [
    r#"[class*="cookie"]"#,
    r#"[id*="modal"]"#,
    r#"[id*="popup"]"#,
    r#"[aria-modal="true"]"#,
    r#"[role="dialog"]"#,
    ".newsletter-signup",
    ".ad-banner",
];

static NOISE: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    NOISE_SELECTORS
        .iter()
        .map(|css| Selector::parse(css).expect("noise selectors are valid CSS"))
        .collect()
});

/// Removes noise subtrees from a parsed document in place
pub fn strip_noise(doc: &mut Document) -> usize {
    let removed = doc.remove_matching(&NOISE);
    if removed > 0 {
        ::log::debug!("Removed {} noise elements", removed);
    }
    removed
}

/// Removes noise subtrees from markup and returns the serialized remainder
pub fn remove_noise(markup: &str) -> String {
    let mut doc = Document::parse(markup);
    strip_noise(&mut doc);
    doc.html()
}
