use crate::error::RenderError;
use async_trait::async_trait;
use std::fmt;
use std::time::Duration;

/// Page-load milestones a surface can wait for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Milestone {
    /// The document finished loading
    Load,
    /// The document loaded and network activity settled
    NetworkIdle,
}

/// How to find an element on the live page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlQuery {
    Css(&'static str),
    XPath(&'static str),
}

impl fmt::Display for ControlQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlQuery::Css(css) => f.write_str(css),
            ControlQuery::XPath(xpath) => f.write_str(xpath),
        }
    }
}

/// An element on the live page that can be inspected and clicked
#[async_trait]
pub trait PageControl: Send + Sync {
    async fn is_visible(&self) -> Result<bool, RenderError>;

    async fn is_enabled(&self) -> Result<bool, RenderError>;

    async fn attribute(&self, name: &str) -> Result<Option<String>, RenderError>;

    async fn text_content(&self) -> Result<String, RenderError>;

    async fn click(&self) -> Result<(), RenderError>;
}

/// A browser page that loads URLs and exposes its live DOM
#[async_trait]
pub trait RenderSurface: Send + Sync {
    /// Load a URL in the page
    async fn navigate(&self, url: &str) -> Result<(), RenderError>;

    /// Block until the milestone is reached or the surface's timeout expires
    async fn wait_for(&self, milestone: Milestone) -> Result<(), RenderError>;

    /// Serialized markup of the live DOM
    async fn current_markup(&self) -> Result<String, RenderError>;

    async fn current_url(&self) -> Result<String, RenderError>;

    /// First element matching the query right now, if any
    async fn locate(&self, query: ControlQuery) -> Result<Option<Box<dyn PageControl>>, RenderError>;

    /// First element matching the query within `timeout`; `None` when it never appears
    async fn wait_for_control(
        &self,
        query: ControlQuery,
        timeout: Duration,
    ) -> Result<Option<Box<dyn PageControl>>, RenderError>;

    /// Tear down the browser session
    async fn close(&self) -> Result<(), RenderError>;
}

/// Opens a fresh rendering surface for one crawl session
#[async_trait]
pub trait RenderLauncher: Send + Sync {
    async fn launch(&self) -> Result<Box<dyn RenderSurface>, RenderError>;
}

/// Resolves the first query that matches, in the order given
pub async fn locate_first(
    surface: &dyn RenderSurface,
    queries: &[ControlQuery],
) -> Result<Option<Box<dyn PageControl>>, RenderError> {
    for query in queries {
        if let Some(control) = surface.locate(*query).await? {
            ::log::debug!("Pagination control matched {}", query);
            return Ok(Some(control));
        }
    }
    Ok(None)
}
