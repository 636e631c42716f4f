use chromiumoxide::page::Page;
use serde_json::{json, Value};
use sprout_core::{JobError, TimeoutConfig};
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::shared::errors::is_context_lost;
use crate::shared::{js, to_job_error};

/// Snapshot of one element as reported by `CHECK_ELEMENT_STATE`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ElementState {
    pub exists: bool,
    pub visible: bool,
    pub obscured: bool,
    pub obscured_by: Option<String>,
    pub disabled: bool,
}

impl ElementState {
    pub fn from_value(value: &Value) -> Self {
        let flag = |key: &str| value.get(key).and_then(Value::as_bool).unwrap_or(false);
        Self {
            exists: flag("exists"),
            visible: flag("visible"),
            obscured: flag("obscured"),
            obscured_by: value.get("obscuredBy").and_then(Value::as_str).map(str::to_string),
            disabled: flag("disabled"),
        }
    }

    pub fn is_ready(&self, check_clickable: bool) -> bool {
        self.exists && self.visible && !self.obscured && !(check_clickable && self.disabled)
    }

    /// Error to report if the element never became ready.
    fn failure(&self, selector: &str, timeout: Duration) -> JobError {
        let timeout_ms = timeout.as_millis() as u64;
        if !self.exists {
            JobError::element_not_found(selector)
                .with_context(json!({ "selector": selector, "timeout_ms": timeout_ms }))
        } else if !self.visible {
            JobError::element_not_found(format!("Element '{}' exists but not visible", selector))
                .with_context(json!({ "selector": selector, "hint": "Element may be hidden with CSS" }))
        } else if self.obscured {
            let by = self.obscured_by.as_deref().unwrap_or("unknown");
            JobError::element_not_found(format!("Element '{}' obscured by {}", selector, by))
                .with_context(json!({ "selector": selector, "obscured_by": by }))
        } else {
            JobError::element_not_found(format!("Element '{}' is disabled", selector))
                .with_context(json!({ "selector": selector }))
        }
    }
}

pub struct WaitStrategy {
    config: TimeoutConfig,
}

impl WaitStrategy {
    pub fn new(config: TimeoutConfig) -> Self {
        Self { config }
    }

    pub async fn wait_for_element(
        &self,
        page: &Page,
        selector: &str,
        timeout: Duration,
        check_clickable: bool,
    ) -> Result<(), JobError> {
        let start = Instant::now();
        let check = js::build_js_call(js::element::CHECK_ELEMENT_STATE, &[json!(selector)]);
        let mut last_state = ElementState::default();

        loop {
            match page.evaluate(check.clone()).await {
                Ok(result) => {
                    let state = result.value().map(ElementState::from_value).unwrap_or_default();
                    if state != last_state {
                        debug!(selector, ?state, "element state changed");
                    }
                    if state.is_ready(check_clickable) {
                        return Ok(());
                    }
                    last_state = state;
                }
                // Page is navigating, poll again
                Err(e) if is_context_lost(&e) => {}
                Err(e) => return Err(to_job_error(e, "WaitFor")),
            }

            if start.elapsed() >= timeout {
                return Err(last_state.failure(selector, timeout));
            }

            sleep(self.config.check_interval).await;
        }
    }

    pub async fn wait_for_stable(&self, page: &Page, timeout: Duration) -> Result<(), JobError> {
        let start = Instant::now();
        let mut stable_checks = 0;
        let required_stable_checks = 5;

        loop {
            let probe = js::build_js_call(js::wait::CHECK_LOADING, &[]);

            match page.evaluate(probe).await {
                Ok(result) => {
                    if let Some(obj) = result.value().and_then(Value::as_object) {
                        let ready = obj.get("readyState").and_then(Value::as_str) == Some("complete");
                        let active = obj.get("activeRequests").and_then(Value::as_u64).unwrap_or(0);

                        if ready && active == 0 {
                            stable_checks += 1;
                            if stable_checks >= required_stable_checks {
                                debug!(elapsed_ms = start.elapsed().as_millis() as u64, "page stabilized");
                                sleep(self.config.settle_delay).await;
                                return Ok(());
                            }
                        } else {
                            stable_checks = 0;
                        }
                    }
                }
                Err(e) if is_context_lost(&e) => {
                    debug!("page context changed, waiting");
                    stable_checks = 0;
                }
                Err(e) => return Err(to_job_error(e, "WaitForStable")),
            }

            if start.elapsed() > timeout {
                warn!(timeout_ms = timeout.as_millis() as u64, "page stabilization timeout, continuing anyway");
                return Ok(());
            }

            sleep(self.config.check_interval.max(Duration::from_millis(100))).await;
        }
    }
}
