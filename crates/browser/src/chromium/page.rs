use async_trait::async_trait;
use chromiumoxide::page::Page;
use serde_json::{json, Value};
use sprout_core::{JobError, PageDriver, TextKind, TimeoutConfig};
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::debug;

use super::wait::WaitStrategy;
use crate::shared::errors::is_context_lost;
use crate::shared::{js, to_job_error};

/// One browser tab, owned by a single extraction at a time.
pub struct ChromiumPage {
    page: Page,
    wait_strategy: WaitStrategy,
    config: TimeoutConfig,
}

impl ChromiumPage {
    pub fn new(page: Page, config: TimeoutConfig) -> Self {
        Self {
            page,
            wait_strategy: WaitStrategy::new(config.clone()),
            config,
        }
    }

    async fn eval(&self, js: String, action: &str) -> Result<Option<Value>, JobError> {
        let result = self.page.evaluate(js).await.map_err(|e| to_job_error(e, action))?;
        Ok(result.value().cloned().filter(|v| !v.is_null()))
    }

    /// Re-runs `js` until it yields a non-null value or `timeout` elapses.
    async fn poll(&self, js: String, selector: &str, timeout: Duration, action: &str) -> Result<Value, JobError> {
        let start = Instant::now();
        loop {
            match self.page.evaluate(js.clone()).await {
                Ok(result) => {
                    if let Some(value) = result.value().filter(|v| !v.is_null()) {
                        return Ok(value.clone());
                    }
                }
                Err(e) if is_context_lost(&e) => {}
                Err(e) => return Err(to_job_error(e, action)),
            }

            if start.elapsed() >= timeout {
                return Err(JobError::timeout_error(format!("{} timed out on '{}'", action, selector))
                    .with_context(json!({ "selector": selector, "timeout_ms": timeout.as_millis() as u64 })));
            }
            sleep(self.config.check_interval).await;
        }
    }
}

#[async_trait]
impl PageDriver for ChromiumPage {
    async fn goto(&self, url: &str) -> Result<(), JobError> {
        debug!(url, "navigating");
        tokio::time::timeout(self.config.navigation, self.page.goto(url))
            .await
            .map_err(|_| {
                JobError::navigation_error(format!("Navigation to {} timed out", url))
                    .with_context(json!({ "url": url }))
            })?
            .map_err(|e| JobError::navigation_error(format!("Navigation failed: {}", e)))?;

        self.wait_strategy.wait_for_stable(&self.page, self.config.page_stable).await
    }

    async fn count(&self, selector: &str) -> Result<usize, JobError> {
        let js = js::build_js_call(js::element::COUNT, &[json!(selector)]);
        let value = self.eval(js, "Count").await?;
        Ok(value.and_then(|v| v.as_u64()).unwrap_or(0) as usize)
    }

    async fn wait_for(&self, selector: &str, timeout: Duration) -> Result<(), JobError> {
        self.wait_strategy.wait_for_element(&self.page, selector, timeout, false).await
    }

    async fn click(&self, selector: &str, timeout: Duration) -> Result<(), JobError> {
        self.wait_strategy.wait_for_element(&self.page, selector, timeout, true).await?;

        let js = js::build_js_call(js::element::SAFE_CLICK, &[json!(selector)]);
        let clicked = self
            .eval(js, "Click")
            .await?
            .and_then(|v| v.get("success").and_then(Value::as_bool))
            .unwrap_or(false);

        if !clicked {
            return Err(JobError::element_not_found(selector));
        }
        debug!(selector, "clicked");
        Ok(())
    }

    async fn text(
        &self,
        selector: &str,
        index: usize,
        kind: TextKind,
        timeout: Duration,
    ) -> Result<String, JobError> {
        let inner = kind == TextKind::Inner;
        let js = js::build_js_call(js::element::TEXT_AT, &[json!(selector), json!(index), json!(inner)]);
        let value = self.poll(js, selector, timeout, "Text").await?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    async fn attribute(
        &self,
        selector: &str,
        index: usize,
        name: &str,
        timeout: Duration,
    ) -> Result<Option<String>, JobError> {
        let js = js::build_js_call(js::element::ATTR_AT, &[json!(selector), json!(index), json!(name)]);
        let start = Instant::now();
        loop {
            if let Some(found) = self.eval(js.clone(), "Attribute").await? {
                if found.get("exists").and_then(Value::as_bool) == Some(true) {
                    return Ok(found.get("value").and_then(Value::as_str).map(str::to_string));
                }
            }
            if start.elapsed() >= timeout {
                return Err(JobError::element_not_found(selector)
                    .with_context(json!({ "selector": selector, "index": index, "attribute": name })));
            }
            sleep(self.config.check_interval).await;
        }
    }

    async fn close(&self) -> Result<(), JobError> {
        self.page
            .clone()
            .close()
            .await
            .map_err(|e| JobError::browser_error(format!("Close page failed: {}", e)))
    }
}
