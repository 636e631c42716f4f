use async_trait::async_trait;
use sprout_core::{Job, JobError, JobResult, JobWorker, PageDriver, PageSource};
use tracing::{debug, info};

use crate::extractor::VariantExtractor;

/// Visits one product URL on a fresh page and extracts it.
pub struct PlantWorker<S: PageSource> {
    source: S,
    extractor: VariantExtractor,
}

impl<S: PageSource> PlantWorker<S> {
    pub fn new(source: S, extractor: VariantExtractor) -> Self {
        Self { source, extractor }
    }

    /// Hands the page source back, e.g. to shut the browser down.
    pub fn into_source(self) -> S {
        self.source
    }

    async fn visit(&self, job: &Job, page: &dyn PageDriver) -> Result<serde_json::Value, JobError> {
        page.goto(&job.url).await?;
        let plant = self.extractor.extract(page).await?;
        serde_json::to_value(&plant)
            .map_err(|e| JobError::parsing_error(format!("Serialize plant failed: {}", e)))
    }
}

#[async_trait]
impl<S: PageSource> JobWorker for PlantWorker<S> {
    async fn execute(&self, job: &Job) -> Result<JobResult, JobError> {
        info!(job = %job.id, url = %job.url, "extracting plant");
        let page = self.source.open().await?;

        let outcome = self.visit(job, page.as_ref()).await;

        if let Err(e) = page.close().await {
            debug!(job = %job.id, error = %e, "page close failed");
        }

        Ok(JobResult {
            job_id: job.id.clone(),
            output: outcome?,
        })
    }
}
