use futures::stream::{FuturesUnordered, StreamExt};
use sprout_core::{Job, JobError, JobWorker};
use sprout_storage::Storage;
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tracing::{info, warn};

/// Product jobs for a list of links, numbered by position in the list.
///
/// Blank links are skipped but still consume their index, so `plant-<i>`
/// always refers to the i-th entry of `links.json`.
pub fn jobs_from_links(base_url: &str, links: &[String]) -> Vec<Job> {
    let base = base_url.trim_end_matches('/');
    links
        .iter()
        .enumerate()
        .filter_map(|(i, link)| {
            let link = link.trim();
            if link.is_empty() {
                warn!(index = i, "skipping empty product link");
                return None;
            }
            let url = if link.starts_with("http://") || link.starts_with("https://") {
                link.to_string()
            } else if link.starts_with('/') {
                format!("{}{}", base, link)
            } else {
                format!("{}/{}", base, link)
            };
            Some(Job { id: format!("plant-{}", i), url })
        })
        .collect()
}

#[derive(Debug, Default)]
pub struct RunSummary {
    pub succeeded: Vec<String>,
    pub failed: Vec<(String, JobError)>,
}

pub struct Scheduler<S: Storage + 'static> {
    worker: Arc<dyn JobWorker>,
    storage: Arc<S>,
    concurrency_limit: Arc<Semaphore>,
}

impl<S: Storage + 'static> Scheduler<S> {
    pub fn new<W: JobWorker + 'static>(worker: W, storage: S, max_concurrent: usize) -> Self {
        Self::with_shared_worker(Arc::new(worker), storage, max_concurrent)
    }

    pub fn with_shared_worker(worker: Arc<dyn JobWorker>, storage: S, max_concurrent: usize) -> Self {
        Self {
            worker,
            storage: Arc::new(storage),
            concurrency_limit: Arc::new(Semaphore::new(max_concurrent.max(1))),
        }
    }

    /// Runs every job and waits for all of them.
    pub async fn run_all(&self, jobs: Vec<Job>) -> RunSummary {
        let (sender, receiver) = mpsc::channel(jobs.len().max(1));
        for job in jobs {
            if let Err(e) = sender.try_send(job) {
                warn!(error = %e, "job queue rejected job");
            }
        }
        drop(sender);
        self.run(receiver).await
    }

    /// Drains `receiver` until every sender is gone and every job finished.
    pub async fn run(&self, mut receiver: mpsc::Receiver<Job>) -> RunSummary {
        let mut futures = FuturesUnordered::new();
        let mut summary = RunSummary::default();

        loop {
            tokio::select! {
                Some(job) = receiver.recv() => {
                    let worker = Arc::clone(&self.worker);
                    let storage = Arc::clone(&self.storage);
                    let limit = Arc::clone(&self.concurrency_limit);

                    futures.push(async move {
                        let _permit = limit.acquire_owned().await;
                        let result = match worker.execute(&job).await {
                            Ok(r) => storage
                                .save_result(&r)
                                .await
                                .map_err(|e| JobError::storage_error(e.to_string())),
                            Err(e) => Err(e),
                        };
                        (job, result)
                    });
                }
                Some((job, res)) = futures.next() => {
                    match res {
                        Ok(()) => {
                            info!(job = %job.id, url = %job.url, "job succeeded");
                            summary.succeeded.push(job.id);
                        }
                        Err(err) => {
                            warn!(job = %job.id, url = %job.url, error = %err, "job failed");
                            summary.failed.push((job.id, err));
                        }
                    }
                }
                else => break,
            }
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use sprout_core::JobResult;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default, Clone)]
    struct MemoryStorage {
        files: Arc<Mutex<HashMap<String, serde_json::Value>>>,
    }

    #[async_trait]
    impl Storage for MemoryStorage {
        async fn write(&self, file_name: &str, value: &serde_json::Value) -> anyhow::Result<()> {
            self.files.lock().unwrap().insert(file_name.to_string(), value.clone());
            Ok(())
        }
    }

    /// Fails on URLs containing "broken", tracks peak parallelism.
    #[derive(Default)]
    struct Gauge {
        running: AtomicUsize,
        peak: AtomicUsize,
    }

    #[derive(Default, Clone)]
    struct FakeWorker {
        gauge: Arc<Gauge>,
    }

    impl FakeWorker {
        fn peak(&self) -> usize {
            self.gauge.peak.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl JobWorker for FakeWorker {
        async fn execute(&self, job: &Job) -> Result<JobResult, JobError> {
            let now = self.gauge.running.fetch_add(1, Ordering::SeqCst) + 1;
            self.gauge.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            self.gauge.running.fetch_sub(1, Ordering::SeqCst);

            if job.url.contains("broken") {
                return Err(JobError::element_not_found("h1.product-overview__title"));
            }
            Ok(JobResult { job_id: job.id.clone(), output: json!({ "title": job.url }) })
        }
    }

    fn links(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn jobs_keep_link_positions() {
        let jobs = jobs_from_links(
            "https://www.livelyroot.com/",
            &links(&["/products/a", "", "products/c", "https://cdn.example/d"]),
        );
        let pairs: Vec<_> = jobs.iter().map(|j| (j.id.as_str(), j.url.as_str())).collect();
        assert_eq!(
            pairs,
            vec![
                ("plant-0", "https://www.livelyroot.com/products/a"),
                ("plant-2", "https://www.livelyroot.com/products/c"),
                ("plant-3", "https://cdn.example/d"),
            ]
        );
    }

    #[tokio::test]
    async fn failures_do_not_stop_other_jobs() {
        let storage = MemoryStorage::default();
        let scheduler = Scheduler::new(FakeWorker::default(), storage.clone(), 2);
        let jobs = jobs_from_links("https://x.test", &links(&["/a", "/broken", "/c"]));

        let summary = scheduler.run_all(jobs).await;

        assert_eq!(summary.succeeded.len(), 2);
        assert_eq!(summary.failed.len(), 1);
        assert_eq!(summary.failed[0].0, "plant-1");
        let files = storage.files.lock().unwrap();
        assert_eq!(files["plant-0.json"]["title"], "https://x.test/a");
        assert!(files.contains_key("plant-2.json"));
        assert!(!files.contains_key("plant-1.json"));
    }

    #[tokio::test]
    async fn concurrency_is_bounded() {
        let worker = FakeWorker::default();
        let scheduler = Scheduler::new(worker.clone(), MemoryStorage::default(), 2);
        let jobs = jobs_from_links("https://x.test", &links(&["/a", "/b", "/c", "/d", "/e"]));

        let summary = scheduler.run_all(jobs).await;

        assert_eq!(summary.succeeded.len(), 5);
        assert!(worker.peak() <= 2);
    }

    #[tokio::test]
    async fn one_at_a_time_by_default_limit() {
        let worker = FakeWorker::default();
        let scheduler = Scheduler::new(worker.clone(), MemoryStorage::default(), 0);
        let jobs = jobs_from_links("https://x.test", &links(&["/a", "/b", "/c"]));

        scheduler.run_all(jobs).await;

        assert_eq!(worker.peak(), 1);
    }

    #[tokio::test]
    async fn empty_job_list_finishes_immediately() {
        let scheduler = Scheduler::new(FakeWorker::default(), MemoryStorage::default(), 1);
        let summary = scheduler.run_all(Vec::new()).await;
        assert!(summary.succeeded.is_empty() && summary.failed.is_empty());
    }
}
