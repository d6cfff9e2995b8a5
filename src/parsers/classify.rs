use crate::parsers::content::extract_content;
use crate::parsers::text::{LABEL_WORDS, word_summary};
use crate::results::{Section, SectionType};
use crate::utils::truncate_chars;
use regex::Regex;
use scraper::ElementRef;
use std::sync::LazyLock;

/// Maximum characters of raw markup kept per section
pub const RAW_HTML_LIMIT: usize = 500;

static HERO_PATTERN: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?i)hero|banner"));
static LAYOUT_PATTERN: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?i)grid|list|cards"));
static FAQ_PATTERN: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?i)faq"));

fn pattern(re: &str) -> Regex {
    Regex::new(re).expect("classifier patterns are valid regexes")
}

type Rule = fn(&ElementRef<'_>) -> Option<SectionType>;

/// Classification rules in priority order; the first rule that answers wins
const RULES: [(&str, Rule); 7] = [
    ("header landmark", header_landmark),
    ("navigation landmark", navigation_landmark),
    ("footer landmark", footer_landmark),
    ("content section", content_section),
    ("list container", list_container),
    ("main landmark", main_landmark),
    ("block container", block_container),
];

/// Determines the section type of an element
pub fn classify_node(el: ElementRef<'_>) -> SectionType {
    for (name, rule) in RULES.iter() {
        if let Some(section_type) = rule(&el) {
            ::log::trace!(
                "<{}> classified as {} by {} rule",
                tag(&el),
                section_type,
                name
            );
            return section_type;
        }
    }
    SectionType::Unknown
}

/// Builds a section from an element, with id `{type}-{index}`
pub fn build_section(el: ElementRef<'_>, source_url: &str, index: usize) -> Section {
    let content = extract_content(el, source_url);
    let section_type = classify_node(el);

    let label = content
        .headings
        .first()
        .cloned()
        .or_else(|| word_summary(&content.text, LABEL_WORDS))
        .unwrap_or_else(|| section_type.fallback_label());

    let (raw_html, truncated) = truncate_chars(&el.html(), RAW_HTML_LIMIT);

    Section {
        id: format!("{}-{}", section_type, index),
        section_type,
        label,
        source_url: source_url.to_string(),
        content,
        raw_html,
        truncated,
    }
}

fn tag<'a>(el: &'a ElementRef<'_>) -> &'a str {
    el.value().name()
}

fn attr<'a>(el: &'a ElementRef<'_>, name: &str) -> &'a str {
    el.value().attr(name).unwrap_or_default()
}

fn id_and_class(el: &ElementRef<'_>) -> String {
    format!("{} {}", attr(el, "id"), attr(el, "class"))
}

fn header_landmark(el: &ElementRef<'_>) -> Option<SectionType> {
    (tag(el) == "header").then_some(SectionType::Nav)
}

fn navigation_landmark(el: &ElementRef<'_>) -> Option<SectionType> {
    let is_nav = tag(el) == "nav" || attr(el, "role").eq_ignore_ascii_case("navigation");
    is_nav.then_some(SectionType::Nav)
}

fn footer_landmark(el: &ElementRef<'_>) -> Option<SectionType> {
    (tag(el) == "footer").then_some(SectionType::Footer)
}

fn content_section(el: &ElementRef<'_>) -> Option<SectionType> {
    if tag(el) != "section" {
        return None;
    }
    if HERO_PATTERN.is_match(&id_and_class(el)) {
        Some(SectionType::Hero)
    } else {
        Some(SectionType::Section)
    }
}

fn list_container(el: &ElementRef<'_>) -> Option<SectionType> {
    matches!(tag(el), "ul" | "ol").then_some(SectionType::List)
}

fn main_landmark(el: &ElementRef<'_>) -> Option<SectionType> {
    (tag(el) == "main").then_some(SectionType::Section)
}

// FAQ markers outrank layout markers, so "faq-list", "faq-grid" and "faqs"
// classify as faq rather than list or grid
fn block_container(el: &ElementRef<'_>) -> Option<SectionType> {
    if tag(el) != "div" {
        return None;
    }
    if FAQ_PATTERN.is_match(&id_and_class(el)) {
        return Some(SectionType::Faq);
    }
    let class = attr(el, "class");
    if LAYOUT_PATTERN.is_match(class) {
        return if class.contains("grid") {
            Some(SectionType::Grid)
        } else {
            Some(SectionType::List)
        };
    }
    None
}
