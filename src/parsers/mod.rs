pub mod classify;
pub mod content;
pub mod html;
pub mod meta;
pub mod noise;
pub mod text;


use crate::results::{Meta, Section, SectionSink};
use html::Document;
use scraper::Selector;
use std::sync::LazyLock;

/// Landmark selectors queried in this fixed order
pub const LANDMARK_SELECTORS: [&str; 5] = ["main", "section", "nav", "header", "footer"];

/// Fallback pool used when a page has no landmarks at all
pub const FALLBACK_SELECTOR: &str = "body > div";

static LANDMARKS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    LANDMARK_SELECTORS
        .iter()
        .map(|css| Selector::parse(css).expect("landmark selectors are valid CSS"))
        .collect()
});

static FALLBACK: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(FALLBACK_SELECTOR).expect("fallback selector is valid CSS")
});

/// Metadata and sections extracted from one page
#[derive(Debug)]
pub struct PageExtraction {
    pub meta: Meta,
    pub sections: Vec<Section>,
}

/// Runs the static extraction pipeline over one page of markup
///
/// Noise is removed before anything else is read. Section ids come from
/// `sink`, so indices keep counting across pages of the same session.
pub fn extract_page(markup: &str, url: &str, sink: &mut SectionSink) -> PageExtraction {
    let mut doc = Document::parse(markup);
    noise::strip_noise(&mut doc);

    let meta = meta::extract_meta(&doc, url);
    let sections = extract_sections(&doc, url, sink);

    ::log::debug!("Extracted {} sections from {}", sections.len(), url);
    PageExtraction { meta, sections }
}

/// Groups a document into sections: landmarks first, top-level divs otherwise
fn extract_sections(doc: &Document, url: &str, sink: &mut SectionSink) -> Vec<Section> {
    let mut sections = Vec::new();

    for selector in LANDMARKS.iter() {
        for el in doc.select(selector) {
            sections.push(classify::build_section(el, url, sink.next_index()));
        }
    }

    if sections.is_empty() {
        ::log::debug!("No landmarks in {}, falling back to top-level divs", url);
        for el in doc.select(&FALLBACK) {
            sections.push(classify::build_section(el, url, sink.next_index()));
        }
    }

    sections.retain(|s| !s.content.is_empty());
    sections
}
