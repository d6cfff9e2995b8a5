use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Which fetch path produced the final sections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Static,
    Rendered,
}

/// Semantic type of a section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionType {
    Hero,
    Section,
    Nav,
    Footer,
    List,
    Grid,
    Faq,
    Pricing,
    Unknown,
}

impl SectionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionType::Hero => "hero",
            SectionType::Section => "section",
            SectionType::Nav => "nav",
            SectionType::Footer => "footer",
            SectionType::List => "list",
            SectionType::Grid => "grid",
            SectionType::Faq => "faq",
            SectionType::Pricing => "pricing",
            SectionType::Unknown => "unknown",
        }
    }

    /// Types whose text counts toward the static adequacy check
    pub fn is_content_bearing(&self) -> bool {
        matches!(
            self,
            SectionType::Hero | SectionType::Section | SectionType::List | SectionType::Grid
        )
    }

    /// Fallback label used when a section has neither headings nor text
    pub fn fallback_label(&self) -> String {
        let name = self.as_str();
        let mut chars = name.chars();
        let capitalized = match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
            None => String::new(),
        };
        format!("{} Section", capitalized)
    }
}

impl fmt::Display for SectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A hyperlink found inside a section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub text: String,
    pub href: String,
}

/// An image found inside a section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub src: String,
    pub alt: String,
}

/// Extracted payload of a section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Content {
    pub headings: Vec<String>,
    pub text: String,
    pub links: Vec<Link>,
    pub images: Vec<Image>,
    pub lists: Vec<Vec<String>>,
    /// Raw table markup, not restructured into rows
    pub tables: Vec<String>,
}

impl Content {
    /// A section without text, images or links carries no signal
    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.images.is_empty() && self.links.is_empty()
    }
}

/// One classified, labeled block of page content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: String,
    #[serde(rename = "type")]
    pub section_type: SectionType,
    pub label: String,
    pub source_url: String,
    pub content: Content,
    pub raw_html: String,
    pub truncated: bool,
}

/// Page-level metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    pub title: String,
    pub description: Option<String>,
    pub language: String,
    pub canonical: Option<String>,
    pub strategy: Strategy,
}

impl Default for Meta {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: None,
            language: String::new(),
            canonical: None,
            strategy: Strategy::Static,
        }
    }
}

/// Audit trail of browser interactions in a session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Interactions {
    pub clicks: Vec<String>,
    /// Reserved for scroll-driven pagination; the click flow leaves it at zero
    pub scrolls: u32,
    pub pages: Vec<String>,
}

impl Interactions {
    /// Records a visited page, returning false if it was already listed
    pub fn record_page(&mut self, url: &str) -> bool {
        if self.has_visited(url) {
            return false;
        }
        self.pages.push(url.to_string());
        true
    }

    pub fn has_visited(&self, url: &str) -> bool {
        self.pages.iter().any(|p| p == url)
    }
}

/// Phase an error record belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPhase {
    Fetch,
    Render,
    Parse,
    Validation,
    Unknown,
    Heuristic,
}

/// A diagnostic attached to a result; never fatal on its own
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub message: String,
    pub phase: ErrorPhase,
}

impl ErrorRecord {
    pub fn new(phase: ErrorPhase, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            phase,
        }
    }
}

/// Result of one crawl session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    pub url: String,
    pub scraped_at: DateTime<Utc>,
    pub meta: Meta,
    pub sections: Vec<Section>,
    pub interactions: Interactions,
    pub errors: Vec<ErrorRecord>,
}

impl ExtractionResult {
    /// Checks the shape invariants of a finished result
    pub fn validate(&self) -> Result<(), String> {
        let mut seen_ids = HashSet::new();
        for section in &self.sections {
            if !seen_ids.insert(section.id.as_str()) {
                return Err(format!("duplicate section id '{}'", section.id));
            }
            let prefix = format!("{}-", section.section_type);
            let index_ok = section
                .id
                .strip_prefix(&prefix)
                .is_some_and(|rest| rest.parse::<usize>().is_ok());
            if !index_ok {
                return Err(format!(
                    "section id '{}' does not match its type '{}'",
                    section.id, section.section_type
                ));
            }
            for link in &section.content.links {
                if url::Url::parse(&link.href).is_err() {
                    return Err(format!("link '{}' is not absolute", link.href));
                }
            }
            for image in &section.content.images {
                if url::Url::parse(&image.src).is_err() {
                    return Err(format!("image '{}' is not absolute", image.src));
                }
            }
        }

        let mut seen_pages = HashSet::new();
        for page in &self.interactions.pages {
            if !seen_pages.insert(page.as_str()) {
                return Err(format!("page '{}' recorded twice", page));
            }
        }
        Ok(())
    }
}

/// Collects sections for one extraction pass and hands out section ids
#[derive(Debug, Default)]
pub struct SectionSink {
    sections: Vec<Section>,
    next_index: usize,
}

impl SectionSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserves the next running index; indices are never reused
    pub fn next_index(&mut self) -> usize {
        let index = self.next_index;
        self.next_index += 1;
        index
    }

    pub fn extend(&mut self, sections: impl IntoIterator<Item = Section>) {
        self.sections.extend(sections);
    }

    pub fn into_sections(self) -> Vec<Section> {
        self.sections
    }
}

/// Accumulator owned by a single crawl session
#[derive(Debug)]
pub struct ResultBuilder {
    result: ExtractionResult,
}

impl ResultBuilder {
    /// Starts a session for the seed URL, which is the first visited page
    pub fn new(url: &str) -> Self {
        let mut interactions = Interactions::default();
        interactions.record_page(url);
        Self {
            result: ExtractionResult {
                url: url.to_string(),
                scraped_at: Utc::now(),
                meta: Meta::default(),
                sections: Vec::new(),
                interactions,
                errors: Vec::new(),
            },
        }
    }

    pub fn url(&self) -> &str {
        &self.result.url
    }

    pub fn meta(&self) -> &Meta {
        &self.result.meta
    }

    pub fn sections(&self) -> &[Section] {
        &self.result.sections
    }

    pub fn interactions(&self) -> &Interactions {
        &self.result.interactions
    }

    pub fn interactions_mut(&mut self) -> &mut Interactions {
        &mut self.result.interactions
    }

    pub fn errors(&self) -> &[ErrorRecord] {
        &self.result.errors
    }

    pub fn set_meta(&mut self, meta: Meta) {
        self.result.meta = meta;
    }

    pub fn set_strategy(&mut self, strategy: Strategy) {
        self.result.meta.strategy = strategy;
    }

    pub fn set_sections(&mut self, sections: Vec<Section>) {
        self.result.sections = sections;
    }

    pub fn push_error(&mut self, phase: ErrorPhase, message: impl Into<String>) {
        let record = ErrorRecord::new(phase, message);
        ::log::debug!("[{:?}] {}", record.phase, record.message);
        self.result.errors.push(record);
    }

    pub fn touch(&mut self) {
        self.result.scraped_at = Utc::now();
    }

    /// Validates and timestamps the result; invalid output keeps meta and
    /// interactions but drops the sections
    pub fn finish(mut self) -> ExtractionResult {
        if let Err(reason) = self.result.validate() {
            ::log::warn!("Result for {} failed validation: {}", self.result.url, reason);
            self.result.sections.clear();
            self.push_error(
                ErrorPhase::Validation,
                format!("Data validation error: {}", reason),
            );
        }
        self.touch();
        self.result
    }
}
