use crate::config::ExtractorConfig;
use crate::crawlers::surface::{
    ControlQuery, Milestone, PageControl, RenderLauncher, RenderSurface, locate_first,
};
use crate::error::RenderError;
use crate::parsers::extract_page;
use crate::results::{ErrorPhase, ResultBuilder, Section, SectionSink, Strategy};
use crate::utils::resolve_url;
use std::future::Future;
use std::time::Duration;

/// Pagination clicks followed after the seed page (4 pages at most)
pub const MAX_DEPTH: usize = 3;

/// Known cookie-banner and consent controls, clicked once on the seed page
pub const DISMISS_TARGETS: [ControlQuery; 4] = [
    ControlQuery::Css("#cookie-banner button"),
    ControlQuery::Css(".cc-revoke"),
    ControlQuery::XPath("//button[contains(normalize-space(.), 'Accept')]"),
    ControlQuery::Css(r#"[aria-label*="cookie"] button"#),
];

/// Region whose presence signals that the page paginates
pub const PAGINATION_REGION: ControlQuery = ControlQuery::Css(".pagination");

/// Candidate "next" controls, highest precedence first
pub const NEXT_CONTROLS: [ControlQuery; 3] = [
    ControlQuery::XPath(
        "//a[contains(translate(normalize-space(.), 'ABCDEFGHIJKLMNOPQRSTUVWXYZ', 'abcdefghijklmnopqrstuvwxyz'), 'next')]",
    ),
    ControlQuery::Css(r#"a[aria-label="Next"]"#),
    ControlQuery::XPath("//button[contains(normalize-space(.), 'Load more')]"),
];

const UNKNOWN_CONTROL_LABEL: &str = "Unknown Link/Button";

/// Short waits used by the render loop
#[derive(Debug, Clone, Copy)]
pub struct RenderSettings {
    pub dismiss_timeout: Duration,
    pub pagination_wait: Duration,
}

impl From<&ExtractorConfig> for RenderSettings {
    fn from(config: &ExtractorConfig) -> Self {
        Self {
            dismiss_timeout: config.dismiss_timeout(),
            pagination_wait: config.pagination_wait(),
        }
    }
}

/// Sections gathered by a render session and whether it ended in an error
#[derive(Debug)]
pub struct RenderOutcome {
    pub sections: Vec<Section>,
    pub failed: bool,
}

/// Renders the seed page and follows pagination, recording into `builder`
///
/// The surface is closed on every exit path. Errors inside the loop are
/// recorded once as a render error and whatever was gathered is returned.
pub async fn render_pages(
    launcher: &dyn RenderLauncher,
    builder: &mut ResultBuilder,
    settings: &RenderSettings,
) -> RenderOutcome {
    let seed = builder.url().to_string();
    ::log::info!("Rendering {} with pagination depth {}", seed, MAX_DEPTH);

    let mut sink = SectionSink::new();
    let run = match launcher.launch().await {
        Ok(surface) => {
            let run = paginate(surface.as_ref(), &seed, builder, &mut sink, settings).await;
            if let Err(e) = surface.close().await {
                ::log::warn!("Failed to close rendering surface: {}", e);
            }
            run
        }
        Err(e) => Err(e),
    };

    let failed = match run {
        Ok(()) => false,
        Err(e) => {
            ::log::warn!("Rendering {} failed: {}", seed, e);
            builder.push_error(
                ErrorPhase::Render,
                format!("Critical error during rendering: {}", e),
            );
            true
        }
    };

    builder.touch();
    RenderOutcome {
        sections: sink.into_sections(),
        failed,
    }
}

async fn paginate(
    surface: &dyn RenderSurface,
    seed: &str,
    builder: &mut ResultBuilder,
    sink: &mut SectionSink,
    settings: &RenderSettings,
) -> Result<(), RenderError> {
    surface.navigate(seed).await?;
    surface.wait_for(Milestone::NetworkIdle).await?;
    dismiss_noise(surface, builder, settings).await;

    for depth in 0..=MAX_DEPTH {
        let page_url = surface.current_url().await?;
        let markup = surface.current_markup().await?;
        let page = extract_page(&markup, &page_url, sink);
        ::log::debug!(
            "Page {} ({}) contributed {} sections",
            depth + 1,
            page_url,
            page.sections.len()
        );
        if depth == 0 {
            let mut meta = page.meta;
            meta.strategy = Strategy::Rendered;
            builder.set_meta(meta);
        }
        sink.extend(page.sections);

        if depth >= MAX_DEPTH {
            break;
        }

        let Some(control) = next_control(surface, &page_url, builder, depth, settings).await?
        else {
            break;
        };
        advance(surface, control.as_ref(), builder, depth).await?;
    }

    Ok(())
}

/// Runs a tolerated-failure step, turning any error into `None`
pub async fn best_effort<T, F>(what: &str, attempt: F) -> Option<T>
where
    F: Future<Output = Result<T, RenderError>>,
{
    match attempt.await {
        Ok(value) => Some(value),
        Err(e) => {
            ::log::debug!("Ignoring failed {}: {}", what, e);
            None
        }
    }
}

/// Clicks each known cookie/consent control that shows up
async fn dismiss_noise(
    surface: &dyn RenderSurface,
    builder: &mut ResultBuilder,
    settings: &RenderSettings,
) {
    for target in DISMISS_TARGETS {
        let dismissed = best_effort("noise dismissal", async {
            match surface.wait_for_control(target, settings.dismiss_timeout).await? {
                Some(control) => {
                    control.click().await?;
                    Ok(true)
                }
                None => Ok(false),
            }
        })
        .await;

        if dismissed == Some(true) {
            ::log::debug!("Dismissed noise via {}", target);
            builder
                .interactions_mut()
                .clicks
                .push(format!("Dismissed noise: {}", target));
        }
    }
}

/// Finds a pagination control that leads somewhere new, recording why not otherwise
async fn next_control(
    surface: &dyn RenderSurface,
    page_url: &str,
    builder: &mut ResultBuilder,
    depth: usize,
    settings: &RenderSettings,
) -> Result<Option<Box<dyn PageControl>>, RenderError> {
    let page_number = depth + 1;

    if surface
        .wait_for_control(PAGINATION_REGION, settings.pagination_wait)
        .await?
        .is_none()
    {
        builder.push_error(
            ErrorPhase::Heuristic,
            format!(
                "No pagination block found on page {}. Ending interaction.",
                page_number
            ),
        );
        return Ok(None);
    }

    let located = locate_first(surface, &NEXT_CONTROLS).await?;
    let actionable = match &located {
        Some(control) => is_actionable(control.as_ref()).await?,
        None => false,
    };
    let control = match located {
        Some(control) if actionable => control,
        _ => {
            builder.push_error(
                ErrorPhase::Heuristic,
                format!(
                    "Pagination control not visible/enabled on page {}. Ending interaction.",
                    page_number
                ),
            );
            return Ok(None);
        }
    };

    // A control without an href (e.g. "Load more") stays on the same URL and is always followed
    if let Some(href) = control.attribute("href").await? {
        if !href.trim().is_empty() {
            let href = href.trim();
            let candidate = resolve_url(page_url, href).unwrap_or_else(|| href.to_string());
            if builder.interactions().has_visited(&candidate) {
                builder.push_error(
                    ErrorPhase::Heuristic,
                    format!(
                        "Pagination click leads to an already visited URL ({}). Ending interaction.",
                        candidate
                    ),
                );
                return Ok(None);
            }
        }
    }

    Ok(Some(control))
}

/// Clicks the control, waits for the next page and records the visit
async fn advance(
    surface: &dyn RenderSurface,
    control: &dyn PageControl,
    builder: &mut ResultBuilder,
    depth: usize,
) -> Result<(), RenderError> {
    let label = control_label(control).await?;

    control.click().await?;
    surface.wait_for(Milestone::Load).await?;
    let new_url = surface.current_url().await?;

    ::log::info!("Followed '{}' to {}", label, new_url);
    let interactions = builder.interactions_mut();
    interactions
        .clicks
        .push(format!("Followed '{}' ({})", label, depth + 1));
    interactions.record_page(&new_url);
    Ok(())
}

async fn is_actionable(control: &dyn PageControl) -> Result<bool, RenderError> {
    Ok(control.is_visible().await? && control.is_enabled().await?)
}

async fn control_label(control: &dyn PageControl) -> Result<String, RenderError> {
    let text = control.text_content().await?;
    if !text.trim().is_empty() {
        return Ok(text.trim().to_string());
    }
    let aria = control.attribute("aria-label").await?.unwrap_or_default();
    if !aria.trim().is_empty() {
        return Ok(aria.trim().to_string());
    }
    Ok(UNKNOWN_CONTROL_LABEL.to_string())
}
