use crate::parsers::html::Document;
use crate::results::{Meta, Strategy};
use crate::utils::resolve_url;
use scraper::Selector;
use std::sync::LazyLock;

static TITLE: LazyLock<Selector> = LazyLock::new(|| css("title"));
static OG_TITLE: LazyLock<Selector> = LazyLock::new(|| css(r#"meta[property="og:title"]"#));
static DESCRIPTION: LazyLock<Selector> = LazyLock::new(|| css(r#"meta[name="description"]"#));
static CANONICAL: LazyLock<Selector> = LazyLock::new(|| css(r#"link[rel="canonical"]"#));

fn css(selector: &str) -> Selector {
    Selector::parse(selector).expect("metadata selectors are valid CSS")
}

/// Extracts page metadata; `url` is the base for the canonical link
pub fn extract_meta(doc: &Document, url: &str) -> Meta {
    let title = doc
        .first(&TITLE)
        .map(|el| el.text().collect::<String>().trim().to_string())
        .or_else(|| {
            doc.first(&OG_TITLE)
                .map(|el| el.value().attr("content").unwrap_or_default().to_string())
        })
        .unwrap_or_default();

    // A present tag without content is an empty description, not a missing one
    let description = doc.first(&DESCRIPTION).map(|el| {
        el.value()
            .attr("content")
            .unwrap_or_default()
            .to_string()
    });

    let language = doc.root_attr("lang").unwrap_or("en").to_string();

    let canonical = doc
        .first(&CANONICAL)
        .and_then(|el| el.value().attr("href"))
        .filter(|href| !href.is_empty())
        .and_then(|href| resolve_url(url, href));

    Meta {
        title,
        description,
        language,
        canonical,
        strategy: Strategy::Static,
    }
}
