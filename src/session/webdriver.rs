//! WebDriver-backed rendering session

use async_trait::async_trait;
use fantoccini::error::{CmdError, ErrorStatus};
use fantoccini::{Client, ClientBuilder};
use serde_json::json;
use tracing::{debug, info, instrument, warn};

use super::{Activation, Locator, RenderingSession, SessionError};

/// A rendering session on a Chrome instance driven through WebDriver
pub struct WebDriverSession {
    client: Option<Client>,
}

impl WebDriverSession {
    /// Open a new browser session on the WebDriver server at `webdriver_url`
    #[instrument]
    pub async fn connect(webdriver_url: &str, headless: bool) -> Result<Self, SessionError> {
        let mut capabilities = serde_json::Map::new();
        capabilities.insert(
            "goog:chromeOptions".to_string(),
            json!({ "args": chrome_args(headless) }),
        );

        let mut builder = ClientBuilder::native();
        builder.capabilities(capabilities);
        let client = builder.connect(webdriver_url).await?;
        info!("WebDriver session started");

        Ok(Self {
            client: Some(client),
        })
    }

    fn client(&self) -> Result<&Client, SessionError> {
        self.client.as_ref().ok_or(SessionError::Closed)
    }
}

fn chrome_args(headless: bool) -> Vec<&'static str> {
    let mut args = vec!["--disable-gpu", "--window-size=1920,1080"];
    if headless {
        args.push("--headless=new");
        args.push("--no-sandbox");
    }
    args
}

/// Errors that mean "the control is not there to click"
fn is_unavailable(err: &CmdError) -> bool {
    match err {
        CmdError::Standard(e) => matches!(
            e.error,
            ErrorStatus::NoSuchElement
                | ErrorStatus::ElementNotInteractable
                | ErrorStatus::ElementClickIntercepted
                | ErrorStatus::StaleElementReference
        ),
        _ => false,
    }
}

fn to_webdriver_locator(locator: &Locator) -> fantoccini::Locator<'_> {
    match locator {
        Locator::Id(id) => fantoccini::Locator::Id(id),
        Locator::Css(selector) => fantoccini::Locator::Css(selector),
    }
}

#[async_trait]
impl RenderingSession for WebDriverSession {
    #[instrument(skip(self))]
    async fn goto(&mut self, url: &str) -> Result<(), SessionError> {
        self.client()?.goto(url).await?;
        debug!("Navigated");
        Ok(())
    }

    async fn page_source(&mut self) -> Result<String, SessionError> {
        Ok(self.client()?.source().await?)
    }

    #[instrument(skip(self, locator), fields(locator = %locator))]
    async fn activate(&mut self, locator: &Locator) -> Result<Activation, SessionError> {
        let client = self.client()?;
        let element = match client.find(to_webdriver_locator(locator)).await {
            Ok(element) => element,
            Err(e) if is_unavailable(&e) => return Ok(Activation::Unavailable(e.to_string())),
            Err(e) => return Err(e.into()),
        };
        match element.click().await {
            Ok(()) => Ok(Activation::Activated),
            Err(e) if is_unavailable(&e) => Ok(Activation::Unavailable(e.to_string())),
            Err(e) => Err(e.into()),
        }
    }

    async fn close(&mut self) -> Result<(), SessionError> {
        let client = self.client.take().ok_or(SessionError::Closed)?;
        client.close().await?;
        info!("WebDriver session closed");
        Ok(())
    }
}

impl Drop for WebDriverSession {
    fn drop(&mut self) {
        if self.client.is_some() {
            warn!("WebDriver session dropped without being closed");
        }
    }
}
