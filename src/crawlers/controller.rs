use crate::crawlers::fetch::fetch_static;
use crate::crawlers::pagination::{RenderSettings, render_pages};
use crate::crawlers::surface::RenderLauncher;
use crate::error::FetchError;
use crate::parsers::extract_page;
use crate::results::{
    ErrorPhase, ExtractionResult, ResultBuilder, Section, SectionSink, Strategy,
};

/// Static content shorter than this (in characters) is considered too sparse
pub const MIN_STATIC_TEXT_LEN: usize = 100;

/// Link text that marks a paginated page
const NEXT_LINK_TEXT: &str = "next";

/// Stages of one extraction session
#[derive(Debug)]
enum Stage {
    StaticAttempt,
    AdequacyCheck(String),
    RenderEscalation,
    Done,
}

/// Why static output was judged insufficient
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Escalation {
    Sparse(usize),
    Pagination,
}

impl Escalation {
    fn message(&self) -> String {
        match self {
            Escalation::Sparse(len) => format!(
                "Static content too sparse ({} chars). Falling back to rendered extraction.",
                len
            ),
            Escalation::Pagination => "Static content found, but detected pagination link ('next'). Rendering to follow pagination.".to_string(),
        }
    }
}

/// Extracts one URL, escalating from a static fetch to rendering when needed
///
/// Never fails: every problem ends up in the result's error list.
pub async fn run_extraction(
    url: &str,
    client: &reqwest::Client,
    launcher: &dyn RenderLauncher,
    settings: &RenderSettings,
) -> ExtractionResult {
    ::log::info!("Starting extraction for {}", url);
    let mut builder = ResultBuilder::new(url);
    let mut stage = Stage::StaticAttempt;

    loop {
        stage = match stage {
            Stage::StaticAttempt => match fetch_static(client, url).await {
                Ok(markup) => Stage::AdequacyCheck(markup),
                Err(e) => {
                    ::log::warn!("Static fetch of {} failed: {}", url, e);
                    builder.push_error(ErrorPhase::Fetch, fetch_error_message(&e));
                    Stage::RenderEscalation
                }
            },
            Stage::AdequacyCheck(markup) => {
                let mut sink = SectionSink::new();
                let page = extract_page(&markup, url, &mut sink);
                sink.extend(page.sections);
                let mut meta = page.meta;
                meta.strategy = Strategy::Static;
                builder.set_meta(meta);
                builder.set_sections(sink.into_sections());

                match assess(builder.sections()) {
                    None => {
                        ::log::info!("Static extraction is sufficient for {}", url);
                        Stage::Done
                    }
                    Some(reason) => {
                        let message = reason.message();
                        ::log::info!("{}", message);
                        builder.push_error(ErrorPhase::Heuristic, message);
                        Stage::RenderEscalation
                    }
                }
            }
            Stage::RenderEscalation => {
                let outcome = render_pages(launcher, &mut builder, settings).await;
                builder.set_strategy(Strategy::Rendered);
                if !outcome.sections.is_empty() || !outcome.failed {
                    builder.set_sections(outcome.sections);
                } else {
                    ::log::info!("Rendering gathered nothing, keeping static sections");
                }
                Stage::Done
            }
            Stage::Done => break,
        };
    }

    let result = builder.finish();
    ::log::info!(
        "Finished {} with strategy {:?}: {} sections, {} errors",
        url,
        result.meta.strategy,
        result.sections.len(),
        result.errors.len()
    );
    result
}

fn fetch_error_message(error: &FetchError) -> String {
    match error {
        FetchError::Status { .. } => error.to_string(),
        FetchError::Transport(_) => format!("Critical error during static fetch: {}", error),
    }
}

/// Decides whether static sections need a rendering pass
///
/// Sparse content wins over a detected pagination link.
pub fn assess(sections: &[Section]) -> Option<Escalation> {
    let text_len: usize = sections
        .iter()
        .filter(|s| s.section_type.is_content_bearing())
        .map(|s| s.content.text.chars().count())
        .sum();
    if text_len < MIN_STATIC_TEXT_LEN {
        return Some(Escalation::Sparse(text_len));
    }

    let has_next_link = sections
        .iter()
        .flat_map(|s| s.content.links.iter())
        .any(|link| link.text.eq_ignore_ascii_case(NEXT_LINK_TEXT));
    if has_next_link {
        return Some(Escalation::Pagination);
    }

    None
}
