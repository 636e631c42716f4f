use std::path::Path;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfigBuilder, BrowserConfig as ChromeConfig, HeadlessMode};
use chromiumoxide::handler::viewport::Viewport;
use futures::StreamExt;
use sprout_core::{BrowserConfig, JobError, PageDriver, PageSource, TimeoutConfig};
use tempfile::TempDir;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::page::ChromiumPage;

/// Launch options for one browser, before the executable is resolved.
///
/// The configured size is applied both to the window and to the page
/// viewport; chromiumoxide otherwise emulates an 800x600 page.
pub(crate) fn chrome_builder(config: &BrowserConfig, user_data_dir: &Path) -> BrowserConfigBuilder {
    let mut builder = ChromeConfig::builder()
        .headless_mode(if config.headless { HeadlessMode::True } else { HeadlessMode::False })
        .user_data_dir(user_data_dir);

    if let (Some(width), Some(height)) = (config.viewport_width, config.viewport_height) {
        builder = builder
            .window_size(width, height)
            .viewport(Viewport { width, height, ..Default::default() });
    }
    builder
}

/// A running Chromium instance handing out one fresh tab per product.
pub struct ChromiumSession {
    browser: Mutex<Browser>,
    handler: JoinHandle<()>,
    timeout_config: TimeoutConfig,
    // Removed on drop, after the browser is gone.
    profile_dir: TempDir,
}

impl ChromiumSession {
    pub async fn launch(config: BrowserConfig, timeout_config: TimeoutConfig) -> Result<Self, JobError> {
        let profile_dir = tempfile::Builder::new()
            .prefix("chromium-")
            .tempdir()
            .map_err(|e| JobError::browser_error(format!("Failed to create temp dir: {}", e)))?;

        let chrome_cfg = chrome_builder(&config, profile_dir.path())
            .build()
            .map_err(|e| JobError::browser_error(format!("Config failed: {}", e)))?;

        let (browser, mut handler) = Browser::launch(chrome_cfg).await
            .map_err(|e| JobError::browser_error(format!("Launch failed: {}", e)))?;

        let handler = tokio::spawn(async move { while handler.next().await.is_some() {} });
        info!(headless = config.headless, profile = %profile_dir.path().display(), "chromium launched");

        Ok(Self {
            browser: Mutex::new(browser),
            handler,
            timeout_config,
            profile_dir,
        })
    }

    pub async fn new_page(&self) -> Result<ChromiumPage, JobError> {
        let page = self.browser.lock().await.new_page("about:blank").await
            .map_err(|e| JobError::browser_error(format!("New page failed: {}", e)))?;
        Ok(ChromiumPage::new(page, self.timeout_config.clone()))
    }

    pub async fn shutdown(self) -> Result<(), JobError> {
        let Self { browser, handler, profile_dir, .. } = self;
        let mut browser = browser.into_inner();
        browser.close().await
            .map_err(|e| JobError::browser_error(format!("Close failed: {}", e)))?;
        if let Err(e) = browser.wait().await {
            debug!(error = %e, "waiting for chromium to exit failed");
        }
        handler.abort();

        let path = profile_dir.path().to_path_buf();
        if let Err(e) = profile_dir.close() {
            debug!(path = %path.display(), error = %e, "profile dir cleanup failed");
        }
        Ok(())
    }
}

#[async_trait]
impl PageSource for ChromiumSession {
    async fn open(&self) -> Result<Box<dyn PageDriver>, JobError> {
        Ok(Box::new(self.new_page().await?))
    }
}
