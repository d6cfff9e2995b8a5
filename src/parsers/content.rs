use crate::parsers::text::{collapsed_text, separated_text};
use crate::results::{Content, Image, Link};
use crate::utils::resolve_url;
use scraper::{ElementRef, Selector};
use std::sync::LazyLock;

static HEADINGS: LazyLock<Selector> = LazyLock::new(|| css("h1, h2, h3, h4, h5, h6"));
static ANCHORS: LazyLock<Selector> = LazyLock::new(|| css("a[href]"));
static IMAGES: LazyLock<Selector> = LazyLock::new(|| css("img[src]"));
static LISTS: LazyLock<Selector> = LazyLock::new(|| css("ul, ol"));
static LIST_ITEMS: LazyLock<Selector> = LazyLock::new(|| css("li"));
static TABLES: LazyLock<Selector> = LazyLock::new(|| css("table"));

fn css(selector: &str) -> Selector {
    Selector::parse(selector).expect("content selectors are valid CSS")
}

/// Extracts headings, text, links, images, lists and tables from an element
///
/// Link hrefs and image sources are resolved against `base_url`; ones that
/// cannot be made absolute are skipped.
pub fn extract_content(el: ElementRef<'_>, base_url: &str) -> Content {
    let headings = el
        .select(&HEADINGS)
        .map(collapsed_text)
        .filter(|h| !h.is_empty())
        .collect();

    let text = separated_text(el);

    let links = el
        .select(&ANCHORS)
        .filter_map(|a| {
            let href = a.value().attr("href")?.trim();
            if href.is_empty() {
                return None;
            }
            let href = resolve_url(base_url, href)?;
            let text = collapsed_text(a);
            Some(Link {
                text: if text.is_empty() { href.clone() } else { text },
                href,
            })
        })
        .collect();

    let images = el
        .select(&IMAGES)
        .filter_map(|img| {
            let src = img.value().attr("src")?.trim();
            if src.is_empty() {
                return None;
            }
            Some(Image {
                src: resolve_url(base_url, src)?,
                alt: img.value().attr("alt").unwrap_or_default().to_string(),
            })
        })
        .collect();

    let lists = el
        .select(&LISTS)
        .map(|list| {
            list.select(&LIST_ITEMS)
                .map(collapsed_text)
                .filter(|item| !item.is_empty())
                .collect::<Vec<_>>()
        })
        .filter(|items| !items.is_empty())
        .collect();

    let tables = el.select(&TABLES).map(|t| t.html()).collect();

    Content {
        headings,
        text,
        links,
        images,
        lists,
        tables,
    }
}
