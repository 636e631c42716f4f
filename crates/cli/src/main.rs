use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, bail};
use browser::ChromiumSession;
use clap::{Parser, Subcommand, ValueEnum};
use sprout_core::{BrowserConfig, Job, JobWorker, TimeoutConfig};
use sprout_extract::{PlantWorker, VariantExtractor};
use sprout_parser::{DEFAULT_BASE_URL, DEFAULT_LISTING_PAGE, ListingParser, listing_url};
use sprout_scheduler::{Scheduler, jobs_from_links};
use sprout_storage::{JsonFileStorage, LINKS_FILE, LINKS_JOB_ID, Storage};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "sprout")]
#[command(about = "Collects plant products and their size/planter variants")]
struct Cli {
    /// Storefront origin
    #[arg(long, env = "SPROUT_BASE_URL", default_value = DEFAULT_BASE_URL, global = true)]
    base_url: String,

    /// Where links.json, plants/ and debug.json are written
    #[arg(long, env = "SPROUT_OUT_DIR", default_value = "./out", global = true)]
    out_dir: PathBuf,

    #[arg(long, env = "SPROUT_HEADLESS", global = true)]
    headless: bool,

    #[arg(long, value_enum, default_value_t = Timeouts::Default, global = true)]
    timeouts: Timeouts,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch one listing page and save its product links
    Links {
        #[arg(long, default_value_t = DEFAULT_LISTING_PAGE)]
        listing_page: u32,
    },
    /// Extract every product in links.json
    Plants {
        #[arg(long, env = "SPROUT_CONCURRENCY", default_value_t = 1)]
        concurrency: usize,
    },
    /// Extract a single product page into debug.json
    Plant {
        #[arg(long)]
        url: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Timeouts {
    Default,
    Fast,
    Patient,
}

impl Timeouts {
    fn config(self) -> TimeoutConfig {
        match self {
            Timeouts::Default => TimeoutConfig::default(),
            Timeouts::Fast => TimeoutConfig::fast(),
            Timeouts::Patient => TimeoutConfig::patient(),
        }
    }
}

impl Cli {
    fn browser_config(&self) -> BrowserConfig {
        BrowserConfig { headless: self.headless, ..BrowserConfig::default() }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let storage = JsonFileStorage::new(&cli.out_dir);

    match &cli.command {
        Commands::Links { listing_page } => collect_links(&cli, &storage, *listing_page).await,
        Commands::Plants { concurrency } => collect_plants(&cli, &storage, *concurrency).await,
        Commands::Plant { url } => debug_plant(&cli, &storage, url).await,
    }
}

async fn collect_links(cli: &Cli, storage: &JsonFileStorage, page: u32) -> anyhow::Result<()> {
    let job = Job { id: LINKS_JOB_ID.to_string(), url: listing_url(&cli.base_url, page) };
    let result = ListingParser::new().execute(&job).await?;
    storage.save_result(&result).await?;
    let count = result.output.as_array().map_or(0, Vec::len);
    info!(count, path = %storage.path(LINKS_FILE).display(), "saved links");
    Ok(())
}

async fn collect_plants(cli: &Cli, storage: &JsonFileStorage, concurrency: usize) -> anyhow::Result<()> {
    let Some(links) = storage.read_links().await? else {
        info!(path = %storage.path(LINKS_FILE).display(), "no links collected yet, run `sprout links` first");
        return Ok(());
    };

    let jobs = jobs_from_links(&cli.base_url, &links);
    let timeouts = cli.timeouts.config();
    let session = ChromiumSession::launch(cli.browser_config(), timeouts.clone()).await?;
    let worker = Arc::new(PlantWorker::new(session, VariantExtractor::new(timeouts)));

    let summary = {
        let scheduler = Scheduler::with_shared_worker(worker.clone(), storage.child("plants"), concurrency);
        scheduler.run_all(jobs).await
    };

    info!(succeeded = summary.succeeded.len(), failed = summary.failed.len(), "plants run finished");
    for (job_id, err) in &summary.failed {
        warn!(job = %job_id, error = %err, "not extracted");
    }

    shutdown(worker).await;
    Ok(())
}

async fn debug_plant(cli: &Cli, storage: &JsonFileStorage, url: &str) -> anyhow::Result<()> {
    let timeouts = cli.timeouts.config();
    let session = ChromiumSession::launch(cli.browser_config(), timeouts.clone()).await?;
    let worker = Arc::new(PlantWorker::new(session, VariantExtractor::new(timeouts)));

    let job = Job { id: "debug".to_string(), url: url.to_string() };
    let outcome = worker.execute(&job).await;
    shutdown(worker).await;

    let result = match outcome {
        Ok(result) => result,
        Err(e) => bail!("extracting {} failed: {}", url, e),
    };
    storage
        .write("debug.json", &serde_json::json!([result.output]))
        .await
        .context("saving debug.json")?;
    info!(path = %storage.path("debug.json").display(), "saved plant");
    Ok(())
}

async fn shutdown(worker: Arc<PlantWorker<ChromiumSession>>) {
    match Arc::try_unwrap(worker) {
        Ok(worker) => {
            if let Err(e) = worker.into_source().shutdown().await {
                warn!(error = %e, "browser shutdown failed");
            }
        }
        Err(_) => warn!("browser still in use, leaving it to exit with the process"),
    }
}
