pub mod config;
pub mod plant;
pub mod slug;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub use config::{BrowserConfig, TimeoutConfig};
pub use plant::{Plant, PlantMetadata, PlantVariant, Planter, PlanterId, Size};
pub use slug::slugify;

/// One product page to visit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    /// Stable name for the job, also used as the output file stem (`plant-3`)
    pub id: String,
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JobResult {
    pub job_id: String,
    pub output: serde_json::Value,
}

/// Error categories for better error handling
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Network-related errors (connection failures, bad status)
    Network,
    /// Element not found or selector issues
    ElementNotFound,
    /// JavaScript execution errors
    ScriptExecution,
    /// Navigation or page load errors
    Navigation,
    /// Browser/driver errors
    Browser,
    /// Parsing errors (HTML/JSON)
    Parsing,
    /// Timeout errors
    Timeout,
    /// Filesystem or serialization errors on the output side
    Storage,
    /// Unknown or uncategorized errors
    Unknown,
}

/// Structured error with context for debugging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobError {
    /// Error category for programmatic handling
    pub category: ErrorCategory,
    /// Human-readable error message
    pub message: String,
    /// Optional context (URL, selector, timeout, etc.)
    pub context: serde_json::Value,
}

impl JobError {
    pub fn new(category: ErrorCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
            context: serde_json::json!({}),
        }
    }

    pub fn with_context(mut self, context: serde_json::Value) -> Self {
        self.context = context;
        self
    }

    // Convenience constructors
    pub fn fetch_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Network, message)
    }

    pub fn element_not_found(selector: impl Into<String>) -> Self {
        let selector = selector.into();
        Self::new(ErrorCategory::ElementNotFound, format!("Element not found: {}", selector))
            .with_context(serde_json::json!({ "selector": selector }))
    }

    pub fn timeout_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Timeout, message)
    }

    pub fn script_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::ScriptExecution, message)
    }

    pub fn navigation_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Navigation, message)
    }

    pub fn browser_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Browser, message)
    }

    pub fn parsing_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Parsing, message)
    }

    pub fn storage_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Storage, message)
    }
}

impl std::fmt::Display for JobError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.category, self.message)
    }
}

impl std::error::Error for JobError {}

/// Marker for an optional page element that is not there.
///
/// Not an error in the failure sense: a missing size control or a planter
/// that is not sold at the current size both end up here.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{what} not present")]
pub struct Absent {
    pub what: String,
    #[source]
    pub cause: Option<JobError>,
}

impl Absent {
    pub fn new(what: impl Into<String>) -> Self {
        Self { what: what.into(), cause: None }
    }
}

/// Converts driver failures on optional lookups into [`Absent`].
pub trait OrAbsent<T> {
    fn or_absent(self, what: &str) -> Result<T, Absent>;
}

impl<T> OrAbsent<T> for Result<T, JobError> {
    fn or_absent(self, what: &str) -> Result<T, Absent> {
        self.map_err(|e| Absent { what: what.to_string(), cause: Some(e) })
    }
}

/// How to read an element's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextKind {
    /// Rendered text (`innerText`)
    Inner,
    /// Raw text nodes (`textContent`)
    Content,
}

/// A live, rendered page that can be queried and clicked.
///
/// Every method is a suspend point. Element-scoped reads take the index of
/// the match among all elements matching `selector`.
#[async_trait]
pub trait PageDriver: Send + Sync {
    async fn goto(&self, url: &str) -> Result<(), JobError>;

    /// Number of elements currently matching `selector`.
    async fn count(&self, selector: &str) -> Result<usize, JobError>;

    /// Wait until `selector` is present and visible.
    async fn wait_for(&self, selector: &str, timeout: Duration) -> Result<(), JobError>;

    /// Wait until `selector` is clickable, then click it.
    async fn click(&self, selector: &str, timeout: Duration) -> Result<(), JobError>;

    async fn text(
        &self,
        selector: &str,
        index: usize,
        kind: TextKind,
        timeout: Duration,
    ) -> Result<String, JobError>;

    /// `Ok(None)` when the element exists but does not carry the attribute.
    async fn attribute(
        &self,
        selector: &str,
        index: usize,
        name: &str,
        timeout: Duration,
    ) -> Result<Option<String>, JobError>;

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    async fn close(&self) -> Result<(), JobError> {
        Ok(())
    }
}

/// Hands out fresh, exclusively owned pages.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn open(&self) -> Result<Box<dyn PageDriver>, JobError>;
}

#[async_trait]
pub trait JobWorker: Send + Sync {
    async fn execute(&self, job: &Job) -> Result<JobResult, JobError>;
}
