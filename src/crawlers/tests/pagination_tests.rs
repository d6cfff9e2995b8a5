use super::fake::{FakeControl, FakePage, FakeSite};
use crate::crawlers::pagination::{DISMISS_TARGETS, NEXT_CONTROLS, RenderSettings, render_pages};
use crate::crawlers::surface::ControlQuery;
use crate::results::{ErrorPhase, ResultBuilder, Strategy};
use std::time::Duration;

const SEED: &str = "https://shop.test/catalogue/";

fn settings() -> RenderSettings {
    RenderSettings {
        dismiss_timeout: Duration::from_millis(10),
        pagination_wait: Duration::from_millis(10),
    }
}

fn page_url(n: usize) -> String {
    if n == 1 {
        SEED.to_string()
    } else {
        format!("{}page-{}.html", SEED, n)
    }
}

fn listing(n: usize) -> String {
    format!(
        r#"<html lang="en"><head><title>Catalogue page {n}</title></head><body>
        <section><h2>Books {n}</h2><p>Listing for page {n}</p></section>
        <div class="pagination"><a href="page-{next}.html">next</a></div>
        </body></html>"#,
        n = n,
        next = n + 1
    )
}

/// A catalogue of `count` pages, each linking to the next
fn catalogue(count: usize) -> FakeSite {
    let mut site = FakeSite::new();
    for n in 1..=count {
        let mut page = FakePage::new(&page_url(n), &listing(n));
        if n < count {
            page = page.paginated().with_control(
                NEXT_CONTROLS[0],
                FakeControl::link(
                    "next",
                    &format!("page-{}.html", n + 1),
                    &page_url(n + 1),
                ),
            );
        }
        site = site.page(page);
    }
    site
}

#[tokio::test]
async fn test_follows_at_most_four_pages() {
    let site = catalogue(6);
    let mut builder = ResultBuilder::new(SEED);

    let outcome = render_pages(&site.launcher(), &mut builder, &settings()).await;

    assert!(!outcome.failed);
    assert_eq!(outcome.sections.len(), 4);
    assert_eq!(builder.interactions().pages.len(), 4);
    assert_eq!(
        builder.interactions().clicks,
        vec![
            "Followed 'next' (1)",
            "Followed 'next' (2)",
            "Followed 'next' (3)",
        ]
    );
    assert_eq!(site.clicked().len(), 3);
    assert!(builder.errors().is_empty());
    assert!(site.closed());
}

#[tokio::test]
async fn test_section_ids_keep_counting_across_pages() {
    let site = catalogue(3);
    let mut builder = ResultBuilder::new(SEED);

    let outcome = render_pages(&site.launcher(), &mut builder, &settings()).await;

    let ids: Vec<&str> = outcome.sections.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["section-0", "section-1", "section-2"]);
    assert_eq!(outcome.sections[2].source_url, page_url(3));
    assert_eq!(outcome.sections[1].label, "Books 2");
}

#[tokio::test]
async fn test_last_page_without_pagination_block() {
    let site = catalogue(2);
    let mut builder = ResultBuilder::new(SEED);

    render_pages(&site.launcher(), &mut builder, &settings()).await;

    assert_eq!(builder.interactions().pages, vec![page_url(1), page_url(2)]);
    assert_eq!(builder.errors().len(), 1);
    assert_eq!(builder.errors()[0].phase, ErrorPhase::Heuristic);
    assert_eq!(
        builder.errors()[0].message,
        "No pagination block found on page 2. Ending interaction."
    );
}

#[tokio::test]
async fn test_visited_url_ends_without_clicking() {
    let second = page_url(2);
    let site = FakeSite::new()
        .page(FakePage::new(SEED, &listing(1)).paginated().with_control(
            NEXT_CONTROLS[0],
            FakeControl::link("next", "page-2.html", &second),
        ))
        .page(FakePage::new(&second, &listing(2)).paginated().with_control(
            NEXT_CONTROLS[0],
            FakeControl::link("next", "/catalogue/", SEED),
        ));
    let mut builder = ResultBuilder::new(SEED);

    let outcome = render_pages(&site.launcher(), &mut builder, &settings()).await;

    assert_eq!(outcome.sections.len(), 2);
    assert_eq!(site.clicked(), vec!["next"]);
    assert_eq!(builder.interactions().pages, vec![SEED.to_string(), second]);
    let last = builder.errors().last().unwrap();
    assert_eq!(last.phase, ErrorPhase::Heuristic);
    assert_eq!(
        last.message,
        format!(
            "Pagination click leads to an already visited URL ({}). Ending interaction.",
            SEED
        )
    );
}

#[tokio::test]
async fn test_hidden_control_ends_interaction() {
    let site = FakeSite::new().page(FakePage::new(SEED, &listing(1)).paginated().with_control(
        NEXT_CONTROLS[0],
        FakeControl::link("next", "page-2.html", &page_url(2)).hidden(),
    ));
    let mut builder = ResultBuilder::new(SEED);

    let outcome = render_pages(&site.launcher(), &mut builder, &settings()).await;

    assert_eq!(outcome.sections.len(), 1);
    assert!(site.clicked().is_empty());
    assert_eq!(
        builder.errors()[0].message,
        "Pagination control not visible/enabled on page 1. Ending interaction."
    );
}

#[tokio::test]
async fn test_pagination_block_without_control() {
    let site = FakeSite::new().page(FakePage::new(SEED, &listing(1)).paginated());
    let mut builder = ResultBuilder::new(SEED);

    render_pages(&site.launcher(), &mut builder, &settings()).await;

    assert_eq!(
        builder.errors()[0].message,
        "Pagination control not visible/enabled on page 1. Ending interaction."
    );
}

#[tokio::test]
async fn test_load_more_button_stays_on_url() {
    let more = "catalogue-more";
    let site = FakeSite::new()
        .page(FakePage::new(SEED, &listing(1)).paginated().with_control(
            NEXT_CONTROLS[2],
            FakeControl::button("Load more").leading_to(more),
        ))
        .page_keyed(more, FakePage::new(SEED, "<main><p>More books</p></main>"));
    let mut builder = ResultBuilder::new(SEED);

    let outcome = render_pages(&site.launcher(), &mut builder, &settings()).await;

    assert_eq!(builder.interactions().clicks, vec!["Followed 'Load more' (1)"]);
    assert_eq!(builder.interactions().pages, vec![SEED.to_string()]);
    assert_eq!(outcome.sections.len(), 2);
    assert_eq!(outcome.sections[1].id, "section-1");
    assert_eq!(outcome.sections[1].content.text, "More books");
}

#[tokio::test]
async fn test_anchor_text_wins_over_aria_label() {
    let site = FakeSite::new()
        .page(
            FakePage::new(SEED, &listing(1))
                .paginated()
                .with_control(
                    NEXT_CONTROLS[0],
                    FakeControl::link("Next page", "page-2.html", &page_url(2)),
                )
                .with_control(
                    NEXT_CONTROLS[1],
                    FakeControl::link("", "page-9.html", &page_url(9)),
                ),
        )
        .page(FakePage::new(&page_url(2), &listing(2)));
    let mut builder = ResultBuilder::new(SEED);

    render_pages(&site.launcher(), &mut builder, &settings()).await;

    assert_eq!(builder.interactions().pages[1], page_url(2));
    assert_eq!(builder.interactions().clicks, vec!["Followed 'Next page' (1)"]);
}

#[tokio::test]
async fn test_label_falls_back_to_aria_label() {
    let site = FakeSite::new()
        .page(FakePage::new(SEED, &listing(1)).paginated().with_control(
            NEXT_CONTROLS[1],
            FakeControl::link("  ", "page-2.html", &page_url(2)).with_attribute("aria-label", "Next"),
        ))
        .page(FakePage::new(&page_url(2), &listing(2)));
    let mut builder = ResultBuilder::new(SEED);

    render_pages(&site.launcher(), &mut builder, &settings()).await;

    assert_eq!(builder.interactions().clicks, vec!["Followed 'Next' (1)"]);
}

#[tokio::test]
async fn test_label_falls_back_to_unknown() {
    let site = FakeSite::new()
        .page(FakePage::new(SEED, &listing(1)).paginated().with_control(
            NEXT_CONTROLS[1],
            FakeControl::link("", "page-2.html", &page_url(2)),
        ))
        .page(FakePage::new(&page_url(2), &listing(2)));
    let mut builder = ResultBuilder::new(SEED);

    render_pages(&site.launcher(), &mut builder, &settings()).await;

    assert_eq!(
        builder.interactions().clicks,
        vec!["Followed 'Unknown Link/Button' (1)"]
    );
}

#[tokio::test]
async fn test_cookie_banner_dismissed_once() {
    let site = FakeSite::new().page(FakePage::new(SEED, &listing(1)).with_control(
        ControlQuery::Css("#cookie-banner button"),
        FakeControl::button("Accept all"),
    ));
    let mut builder = ResultBuilder::new(SEED);

    render_pages(&site.launcher(), &mut builder, &settings()).await;

    assert_eq!(
        builder.interactions().clicks,
        vec!["Dismissed noise: #cookie-banner button"]
    );
    assert_eq!(site.clicked(), vec!["Accept all"]);
}

#[tokio::test]
async fn test_failed_dismissal_is_ignored() {
    let site = FakeSite::new().page(
        FakePage::new(SEED, &listing(1))
            .with_control(DISMISS_TARGETS[0], FakeControl::button("Accept").unclickable())
            .with_control(DISMISS_TARGETS[1], FakeControl::button("Got it")),
    );
    let mut builder = ResultBuilder::new(SEED);

    let outcome = render_pages(&site.launcher(), &mut builder, &settings()).await;

    assert!(!outcome.failed);
    assert_eq!(outcome.sections.len(), 1);
    assert_eq!(outcome.sections[0].label, "Books 1");
    assert_eq!(builder.interactions().clicks, vec!["Dismissed noise: .cc-revoke"]);
    assert_eq!(site.clicked(), vec!["Got it"]);
    assert!(
        builder
            .errors()
            .iter()
            .all(|e| e.phase != ErrorPhase::Render)
    );
}

#[tokio::test]
async fn test_junk_anchor_keeps_every_page() {
    let junk = listing(2).replace(
        "<p>Listing for page 2</p>",
        r#"<p>Listing for page 2 <a href="http://">home</a></p>"#,
    );
    let site = catalogue(3).page(FakePage::new(&page_url(2), &junk).paginated().with_control(
        NEXT_CONTROLS[0],
        FakeControl::link("next", "page-3.html", &page_url(3)),
    ));
    let mut builder = ResultBuilder::new(SEED);

    let outcome = render_pages(&site.launcher(), &mut builder, &settings()).await;
    assert_eq!(outcome.sections.len(), 3);
    assert!(outcome.sections[1].content.links.is_empty());
    builder.set_sections(outcome.sections);

    let result = builder.finish();
    assert_eq!(result.sections.len(), 3);
    assert!(
        result
            .errors
            .iter()
            .all(|e| e.phase != ErrorPhase::Validation)
    );
}

#[tokio::test]
async fn test_failure_mid_crawl_keeps_partial_sections() {
    let site = catalogue(3).broken(&page_url(2));
    let mut builder = ResultBuilder::new(SEED);

    let outcome = render_pages(&site.launcher(), &mut builder, &settings()).await;

    assert!(outcome.failed);
    assert_eq!(outcome.sections.len(), 1);
    assert_eq!(outcome.sections[0].label, "Books 1");
    assert_eq!(builder.interactions().pages.len(), 2);
    let render_errors: Vec<_> = builder
        .errors()
        .iter()
        .filter(|e| e.phase == ErrorPhase::Render)
        .collect();
    assert_eq!(render_errors.len(), 1);
    assert!(
        render_errors[0]
            .message
            .starts_with("Critical error during rendering: ")
    );
    assert!(site.closed());
}

#[tokio::test]
async fn test_navigation_failure_closes_surface() {
    let site = FakeSite::new();
    let mut builder = ResultBuilder::new(SEED);

    let outcome = render_pages(&site.launcher(), &mut builder, &settings()).await;

    assert!(outcome.failed);
    assert!(outcome.sections.is_empty());
    assert_eq!(site.launches(), 1);
    assert!(site.closed());
}

#[tokio::test]
async fn test_launch_failure_is_recorded() {
    let site = catalogue(2);
    let mut builder = ResultBuilder::new(SEED);

    let outcome = render_pages(&site.unavailable_launcher(), &mut builder, &settings()).await;

    assert!(outcome.failed);
    assert!(outcome.sections.is_empty());
    assert_eq!(builder.errors().len(), 1);
    assert_eq!(
        builder.errors()[0].message,
        "Critical error during rendering: browser unavailable"
    );
    assert_eq!(site.launches(), 0);
}

#[tokio::test]
async fn test_first_rendered_page_sets_meta() {
    let site = catalogue(2);
    let mut builder = ResultBuilder::new(SEED);

    render_pages(&site.launcher(), &mut builder, &settings()).await;

    assert_eq!(builder.meta().title, "Catalogue page 1");
    assert_eq!(builder.meta().language, "en");
    assert_eq!(builder.meta().strategy, Strategy::Rendered);
}
