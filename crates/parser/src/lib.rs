//! Product link collection from the server-rendered collection listing.

use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use serde_json::json;
use sprout_core::{Job, JobError, JobResult, JobWorker};
use tracing::info;

pub const DEFAULT_BASE_URL: &str = "https://www.livelyroot.com";
pub const DEFAULT_LISTING_PAGE: u32 = 7;

/// URL of one page of the all-plants collection.
pub fn listing_url(base_url: &str, page: u32) -> String {
    format!("{}/collections/all-plants?page={}", base_url.trim_end_matches('/'), page)
}

#[derive(Debug, Clone)]
pub struct ListingSelectors {
    /// One element per product tile
    pub card: String,
    /// Link inside the tile; the first match is used
    pub link: String,
}

impl Default for ListingSelectors {
    fn default() -> Self {
        Self {
            card: "card-product".to_string(),
            link: "a".to_string(),
        }
    }
}

/// Relative product URLs in page order, one per product tile.
///
/// Tiles without a link still produce an entry (an empty string) so the
/// position of every later link matches its tile.
pub fn parse_links(html: &str, selectors: &ListingSelectors) -> Result<Vec<String>, JobError> {
    let card_sel = Selector::parse(&selectors.card)
        .map_err(|e| JobError::parsing_error(e.to_string()))?;
    let link_sel = Selector::parse(&selectors.link)
        .map_err(|e| JobError::parsing_error(e.to_string()))?;

    let document = Html::parse_document(html);
    let links = document
        .select(&card_sel)
        .map(|card| {
            card.select(&link_sel)
                .next()
                .and_then(|a| a.value().attr("href"))
                .unwrap_or("")
                .to_string()
        })
        .collect();
    Ok(links)
}

pub struct ListingParser {
    client: Client,
    selectors: ListingSelectors,
}

impl Default for ListingParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ListingParser {
    pub fn new() -> Self {
        Self { client: Client::new(), selectors: ListingSelectors::default() }
    }

    pub async fn fetch_links(&self, url: &str) -> Result<Vec<String>, JobError> {
        let response = self.client
            .get(url)
            .send()
            .await
            .map_err(|e| JobError::fetch_error(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(JobError::fetch_error(format!("Listing returned {}", status))
                .with_context(json!({ "url": url, "status": status.as_u16() })));
        }

        let html = response
            .text()
            .await
            .map_err(|e| JobError::fetch_error(e.to_string()))?;

        let links = parse_links(&html, &self.selectors)?;
        info!(url, count = links.len(), "collected product links");
        Ok(links)
    }
}

#[async_trait]
impl JobWorker for ListingParser {
    async fn execute(&self, job: &Job) -> Result<JobResult, JobError> {
        let links = self.fetch_links(&job.url).await?;
        Ok(JobResult {
            job_id: job.id.clone(),
            output: json!(links),
        })
    }
}
