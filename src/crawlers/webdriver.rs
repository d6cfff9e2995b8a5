use crate::config::ExtractorConfig;
use crate::crawlers::surface::{ControlQuery, Milestone, PageControl, RenderLauncher, RenderSurface};
use crate::error::RenderError;
use async_trait::async_trait;
use fantoccini::elements::Element;
use fantoccini::error::{CmdError, NewSessionError};
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::{Map, Value, json};
use std::future::Future;
use std::time::Duration;
use tokio::time::{Instant, sleep, timeout};

/// Endpoints tried when the configured WebDriver URL refuses the session
const FALLBACK_WEBDRIVER_URLS: [&str; 4] = [
    "http://localhost:9515", // ChromeDriver default
    "http://localhost:4723", // Appium default
    "http://localhost:9222", // Chrome debug port default
    "http://127.0.0.1:4444", // Try with IP instead of localhost
];

const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Quiet period after which network activity counts as settled
const NETWORK_QUIET: Duration = Duration::from_millis(500);

/// How long a click gets to replace the document before an in-page update is assumed
const NAVIGATION_GRACE: Duration = Duration::from_secs(2);

/// Tags the live document so a later load wait can tell it was replaced
const MARK_DOCUMENT: &str = "window.__yieldSectionsPending = true; return null;";
const READ_MARK: &str = "return window.__yieldSectionsPending === true;";

/// Launches browser sessions through a WebDriver server
pub struct WebDriverLauncher {
    webdriver_url: String,
    headless: bool,
    command_timeout: Duration,
}

impl WebDriverLauncher {
    pub fn new(config: &ExtractorConfig) -> Self {
        Self {
            webdriver_url: config.webdriver_url.clone(),
            headless: config.headless,
            command_timeout: config.render_timeout(),
        }
    }
}

#[async_trait]
impl RenderLauncher for WebDriverLauncher {
    async fn launch(&self) -> Result<Box<dyn RenderSurface>, RenderError> {
        let client = connect_to_webdriver(&self.webdriver_url, self.headless).await?;
        Ok(Box::new(WebDriverSurface {
            client,
            command_timeout: self.command_timeout,
        }))
    }
}

/// Connects to the WebDriver instance, trying common local endpoints on failure
async fn connect_to_webdriver(webdriver_url: &str, headless: bool) -> Result<Client, RenderError> {
    let first_error = match connect(webdriver_url, headless).await {
        Ok(client) => {
            ::log::debug!("Connected to WebDriver at {}", webdriver_url);
            return Ok(client);
        }
        Err(e) => {
            ::log::error!("Failed to connect to WebDriver at {}: {}", webdriver_url, e);
            e
        }
    };

    for url in FALLBACK_WEBDRIVER_URLS {
        if url == webdriver_url {
            continue;
        }
        ::log::info!("Trying fallback WebDriver URL: {}", url);
        // Don't log fallback errors to avoid log spam
        if let Ok(client) = connect(url, headless).await {
            ::log::debug!("Connected to fallback WebDriver at {}", url);
            return Ok(client);
        }
    }

    ::log::error!(
        "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
    );
    Err(RenderError::Session(first_error))
}

async fn connect(url: &str, headless: bool) -> Result<Client, NewSessionError> {
    let mut builder = ClientBuilder::native();
    builder.capabilities(capabilities(headless));
    builder.connect(url).await
}

fn capabilities(headless: bool) -> Map<String, Value> {
    let mut chrome_args = vec!["--disable-gpu", "--no-sandbox", "--window-size=1366,900"];
    let mut firefox_args = Vec::new();
    if headless {
        chrome_args.push("--headless=new");
        firefox_args.push("-headless");
    }

    let mut caps = Map::new();
    caps.insert("goog:chromeOptions".to_string(), json!({ "args": chrome_args }));
    caps.insert("moz:firefoxOptions".to_string(), json!({ "args": firefox_args }));
    caps
}

fn locator(query: ControlQuery) -> Locator<'static> {
    match query {
        ControlQuery::Css(css) => Locator::Css(css),
        ControlQuery::XPath(xpath) => Locator::XPath(xpath),
    }
}

/// Runs a WebDriver command, failing with `RenderError::Timeout` once `limit` passes
async fn bounded<T, F>(limit: Duration, what: &str, command: F) -> Result<T, RenderError>
where
    F: Future<Output = Result<T, CmdError>>,
{
    match timeout(limit, command).await {
        Ok(result) => Ok(result?),
        Err(_) => Err(RenderError::Timeout(limit, what.to_string())),
    }
}

/// A live browser page behind a WebDriver session
pub struct WebDriverSurface {
    client: Client,
    command_timeout: Duration,
}

impl WebDriverSurface {
    async fn ready_state(&self) -> Result<String, RenderError> {
        let state = bounded(
            self.command_timeout,
            "reading document.readyState",
            self.client.execute("return document.readyState", vec![]),
        )
        .await?;
        Ok(state.as_str().unwrap_or_default().to_string())
    }

    async fn resource_count(&self) -> Result<u64, RenderError> {
        let count = bounded(
            self.command_timeout,
            "reading resource timings",
            self.client.execute(
                "return performance.getEntriesByType('resource').length",
                vec![],
            ),
        )
        .await?;
        Ok(count.as_u64().unwrap_or_default())
    }

    /// Waits until a document marked before a click is gone, or the grace period ends
    async fn wait_for_document_swap(&self) -> Result<(), RenderError> {
        let deadline = Instant::now() + NAVIGATION_GRACE.min(self.command_timeout);
        loop {
            match bounded(
                self.command_timeout,
                "reading document mark",
                self.client.execute(READ_MARK, vec![]),
            )
            .await
            {
                Ok(mark) if document_replaced(&mark) => return Ok(()),
                Ok(_) => {}
                // Scripts can fail while the old document unloads
                Err(e) => ::log::trace!("Document mark unreadable: {}", e),
            }
            if Instant::now() >= deadline {
                ::log::debug!("Document unchanged after click, assuming in-page update");
                return Ok(());
            }
            sleep(POLL_INTERVAL).await;
        }
    }

    async fn wait_until_loaded(&self) -> Result<(), RenderError> {
        self.wait_for_document_swap().await?;
        while self.ready_state().await? != "complete" {
            sleep(POLL_INTERVAL).await;
        }
        Ok(())
    }

    async fn wait_until_idle(&self) -> Result<(), RenderError> {
        self.wait_until_loaded().await?;
        let mut last = self.resource_count().await?;
        loop {
            sleep(NETWORK_QUIET).await;
            let now = self.resource_count().await?;
            if now == last {
                return Ok(());
            }
            last = now;
        }
    }
}

#[async_trait]
impl RenderSurface for WebDriverSurface {
    async fn navigate(&self, url: &str) -> Result<(), RenderError> {
        ::log::debug!("Navigating to {}", url);
        bounded(self.command_timeout, "navigating", self.client.goto(url)).await
    }

    async fn wait_for(&self, milestone: Milestone) -> Result<(), RenderError> {
        let waiting = async {
            match milestone {
                Milestone::Load => self.wait_until_loaded().await,
                Milestone::NetworkIdle => self.wait_until_idle().await,
            }
        };
        match timeout(self.command_timeout, waiting).await {
            Ok(result) => result,
            Err(_) => Err(RenderError::Timeout(
                self.command_timeout,
                format!("waiting for {:?}", milestone),
            )),
        }
    }

    async fn current_markup(&self) -> Result<String, RenderError> {
        bounded(self.command_timeout, "reading page source", self.client.source()).await
    }

    async fn current_url(&self) -> Result<String, RenderError> {
        let url = bounded(
            self.command_timeout,
            "reading current URL",
            self.client.current_url(),
        )
        .await?;
        Ok(url.to_string())
    }

    async fn locate(&self, query: ControlQuery) -> Result<Option<Box<dyn PageControl>>, RenderError> {
        let found = bounded(
            self.command_timeout,
            "locating element",
            self.client.find_all(locator(query)),
        )
        .await?;
        Ok(found.into_iter().next().map(|element| {
            Box::new(WebDriverControl {
                element,
                client: self.client.clone(),
                command_timeout: self.command_timeout,
            }) as Box<dyn PageControl>
        }))
    }

    async fn wait_for_control(
        &self,
        query: ControlQuery,
        limit: Duration,
    ) -> Result<Option<Box<dyn PageControl>>, RenderError> {
        let deadline = Instant::now() + limit;
        loop {
            if let Some(control) = self.locate(query).await? {
                return Ok(Some(control));
            }
            if Instant::now() >= deadline {
                return Ok(None);
            }
            sleep(POLL_INTERVAL).await;
        }
    }

    async fn close(&self) -> Result<(), RenderError> {
        ::log::debug!("Closing WebDriver session");
        bounded(
            self.command_timeout,
            "closing session",
            self.client.clone().close(),
        )
        .await
    }
}

/// A document still carrying the pre-click mark has not been replaced yet
fn document_replaced(mark: &Value) -> bool {
    !mark.as_bool().unwrap_or(false)
}

/// An element handle inside a WebDriver session
struct WebDriverControl {
    element: Element,
    client: Client,
    command_timeout: Duration,
}

#[async_trait]
impl PageControl for WebDriverControl {
    async fn is_visible(&self) -> Result<bool, RenderError> {
        bounded(self.command_timeout, "checking visibility", self.element.is_displayed()).await
    }

    async fn is_enabled(&self) -> Result<bool, RenderError> {
        bounded(self.command_timeout, "checking enabled state", self.element.is_enabled()).await
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>, RenderError> {
        bounded(self.command_timeout, "reading attribute", self.element.attr(name)).await
    }

    async fn text_content(&self) -> Result<String, RenderError> {
        bounded(self.command_timeout, "reading text", self.element.text()).await
    }

    async fn click(&self) -> Result<(), RenderError> {
        bounded(
            self.command_timeout,
            "marking document",
            self.client.execute(MARK_DOCUMENT, vec![]),
        )
        .await?;
        bounded(self.command_timeout, "clicking", self.element.click()).await
    }
}
