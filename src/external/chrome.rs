use std::path::Path;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::{CaptureScreenshotFormat, EventLifecycleEvent};
use chromiumoxide::error::CdpError;
use chromiumoxide::handler::viewport::Viewport;
use chromiumoxide::listeners::EventStream;
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::Page;
use futures::StreamExt;

use crate::{
    capture::{CaptureDriver, Snapshot, VIEWPORT_HEIGHT, VIEWPORT_WIDTH},
    config::CaptureConfig,
    error::{navigation_error, render_error, timeout_error, Error},
};

// lifecycle names chrome emits for the main frame, in the order they fire
const NAVIGATION_STARTED: &str = "init";
const NETWORK_IDLE: [&str; 2] = ["networkAlmostIdle", "networkIdle"];

/// Captures pages with a headless chromium launched per call.
pub struct ChromeCapture {
    config: CaptureConfig,
}

impl ChromeCapture {
    pub fn new(config: CaptureConfig) -> Self {
        Self { config }
    }

    fn browser_config(&self, profile_dir: &Path) -> Result<BrowserConfig, Error> {
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .arg("--disable-setuid-sandbox")
            .user_data_dir(profile_dir)
            .window_size(VIEWPORT_WIDTH, VIEWPORT_HEIGHT)
            // goto waits for the load event under this limit, not ours
            .request_timeout(self.config.navigation_timeout)
            .viewport(Viewport {
                width: VIEWPORT_WIDTH,
                height: VIEWPORT_HEIGHT,
                ..Viewport::default()
            });

        if let Some(executable) = &self.config.chrome_executable {
            builder = builder.chrome_executable(executable);
        }

        builder.build().map_err(render_error)
    }

    async fn render(&self, browser: &Browser, url: &str) -> Result<Snapshot, Error> {
        let page = browser.new_page("about:blank").await.map_err(render_error)?;
        let lifecycle = page
            .event_listener::<EventLifecycleEvent>()
            .await
            .map_err(render_error)?;

        tracing::info!(url, "navigating");

        tokio::time::timeout(
            self.config.navigation_timeout,
            navigate(&page, lifecycle, url),
        )
        .await
        .map_err(|_| timeout_error())??;

        // tiles keep streaming in after the network looks idle
        tokio::time::sleep(self.config.settle_delay).await;

        let image = page
            .screenshot(
                ScreenshotParams::builder()
                    .format(CaptureScreenshotFormat::Png)
                    .build(),
            )
            .await
            .map_err(render_error)?;

        Ok(Snapshot {
            image,
            width: VIEWPORT_WIDTH,
            height: VIEWPORT_HEIGHT,
        })
    }
}

async fn navigate(
    page: &Page,
    mut lifecycle: EventStream<EventLifecycleEvent>,
    url: &str,
) -> Result<(), Error> {
    page.goto(url.to_string()).await.map_err(goto_error)?;

    let main_frame = page.mainframe().await.map_err(navigation_error)?;
    let mut started = false;

    while let Some(event) = lifecycle.next().await {
        if main_frame.as_ref() != Some(&event.frame_id) {
            continue;
        }

        if event.name == NAVIGATION_STARTED {
            started = true;
        } else if started && NETWORK_IDLE.contains(&event.name.as_str()) {
            tracing::debug!(event = %event.name, "network idle");
            return Ok(());
        }
    }

    Err(navigation_error("page closed before the network went idle"))
}

fn goto_error(err: CdpError) -> Error {
    match err {
        CdpError::Timeout => timeout_error(),
        err => navigation_error(err),
    }
}

#[async_trait]
impl CaptureDriver for ChromeCapture {
    #[tracing::instrument(skip(self))]
    async fn capture(&self, url: &str) -> Result<Snapshot, Error> {
        let profile = tempfile::Builder::new()
            .prefix("mapzones-chrome-")
            .tempdir()
            .map_err(render_error)?;

        let (mut browser, mut handler) = Browser::launch(self.browser_config(profile.path())?)
            .await
            .map_err(render_error)?;

        let events = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(err) = event {
                    tracing::debug!(error = %err, "browser handler error");
                }
            }
        });

        let result = self.render(&browser, url).await;

        // the browser goes away whatever the outcome of the capture
        if let Err(err) = browser.close().await {
            tracing::warn!(error = %err, "browser did not close cleanly");
        }
        if let Err(err) = browser.wait().await {
            tracing::warn!(error = %err, "browser process did not exit cleanly");
        }
        events.abort();

        result
    }
}

#[test]
fn slow_navigation_is_a_timeout() {
    use crate::error::ErrorKind;

    assert_eq!(goto_error(CdpError::Timeout).kind, ErrorKind::Timeout);
    assert_eq!(goto_error(CdpError::NoResponse).kind, ErrorKind::Navigation);
}
