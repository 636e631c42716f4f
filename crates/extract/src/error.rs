use serde_json::json;
use sprout_core::{ErrorCategory, JobError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    /// The heading was missing or blank; nothing else on the page is trusted.
    #[error("plant title not found ({selector})")]
    MissingTitle {
        selector: String,
        #[source]
        cause: Option<JobError>,
    },
}

impl From<ExtractError> for JobError {
    fn from(err: ExtractError) -> Self {
        match &err {
            ExtractError::MissingTitle { selector, .. } => {
                JobError::new(ErrorCategory::ElementNotFound, err.to_string())
                    .with_context(json!({ "selector": selector, "field": "title" }))
            }
        }
    }
}
