use sprout_core::{
    Absent, OrAbsent, PageDriver, Plant, PlantMetadata, PlantVariant, TextKind, TimeoutConfig,
};
use tracing::{debug, info, warn};

use crate::error::ExtractError;
use crate::selection::SelectionWalk;
use crate::selectors::Selectors;
use crate::text::{metadata_entry, normalize_paragraph};

/// Reads one product detail page into a [`Plant`].
///
/// Only a missing title fails the extraction. Every other element is
/// optional and simply shrinks the result when it cannot be read.
#[derive(Debug, Clone)]
pub struct VariantExtractor {
    selectors: Selectors,
    timeouts: TimeoutConfig,
}

impl VariantExtractor {
    pub fn new(timeouts: TimeoutConfig) -> Self {
        Self::with_selectors(Selectors::default(), timeouts)
    }

    pub fn with_selectors(selectors: Selectors, timeouts: TimeoutConfig) -> Self {
        Self { selectors, timeouts }
    }

    /// Extracts the product the page is currently showing.
    ///
    /// # Errors
    ///
    /// [`ExtractError::MissingTitle`] when the heading is absent or blank.
    pub async fn extract<P: PageDriver + ?Sized>(&self, page: &P) -> Result<Plant, ExtractError> {
        if let Err(absent) = self.dismiss_modal(page).await {
            debug!(reason = %absent, "no modal, continuing");
        }

        let title = self.title(page).await?;
        let description = self.description(page).await;
        let metadata = self.metadata(page).await;
        let variants = self.variants(page).await;

        info!(
            title = %title,
            paragraphs = description.len(),
            metadata = metadata.len(),
            variants = variants.len(),
            "plant extracted"
        );

        Ok(Plant {
            title,
            description,
            metadata,
            variants,
        })
    }

    async fn dismiss_modal<P: PageDriver + ?Sized>(&self, page: &P) -> Result<(), Absent> {
        let selector = &self.selectors.modal_dismiss;
        page.wait_for(selector, self.timeouts.modal).await.or_absent("modal")?;
        page.click(selector, self.timeouts.probe).await.or_absent("modal")
    }

    async fn title<P: PageDriver + ?Sized>(&self, page: &P) -> Result<String, ExtractError> {
        let selector = &self.selectors.title;
        let missing = |cause| ExtractError::MissingTitle {
            selector: selector.clone(),
            cause,
        };

        let raw = page
            .text(selector, 0, TextKind::Inner, self.timeouts.title)
            .await
            .map_err(|e| missing(Some(e)))?;
        let title = raw.trim();
        if title.is_empty() {
            return Err(missing(None));
        }
        Ok(title.to_string())
    }

    async fn description<P: PageDriver + ?Sized>(&self, page: &P) -> Vec<String> {
        let selector = &self.selectors.description_paragraphs;
        let count = page.count(selector).await.unwrap_or(0);

        let mut paragraphs = Vec::with_capacity(count);
        for index in 0..count {
            match page.text(selector, index, TextKind::Content, self.timeouts.text_read).await {
                Ok(raw) => paragraphs.extend(normalize_paragraph(&raw)),
                Err(e) => debug!(index, error = %e, "failed to read description paragraph"),
            }
        }
        paragraphs
    }

    /// Feature rows and their labels are separate lists paired by position.
    async fn metadata<P: PageDriver + ?Sized>(&self, page: &P) -> Vec<PlantMetadata> {
        let rows = &self.selectors.metadata_titles;
        let labels = &self.selectors.metadata_labels;

        let row_count = page.count(rows).await.unwrap_or(0);
        let label_count = page.count(labels).await.unwrap_or(0);
        if row_count != label_count {
            warn!(row_count, label_count, "feature rows and labels differ in length, skipping metadata");
            return Vec::new();
        }

        let mut metadata = Vec::with_capacity(row_count);
        for index in 0..row_count {
            let label = page.text(labels, index, TextKind::Inner, self.timeouts.text_read).await;
            let row = page.text(rows, index, TextKind::Content, self.timeouts.text_read).await;
            match (label, row) {
                (Ok(label), Ok(row)) => metadata.extend(metadata_entry(&label, &row)),
                (Err(e), _) | (_, Err(e)) => debug!(index, error = %e, "failed to read feature row"),
            }
        }
        metadata
    }

    async fn variants<P: PageDriver + ?Sized>(&self, page: &P) -> Vec<PlantVariant> {
        let sized = SelectionWalk::new(page, &self.selectors, &self.timeouts).run().await;
        if !sized.is_empty() {
            return sized;
        }

        // No pickers at all: a single-SKU product showing one price and image.
        match self.flat_variant(page).await {
            Ok(variant) => vec![variant],
            Err(absent) => {
                debug!(reason = %absent, "no variant data on page");
                Vec::new()
            }
        }
    }

    async fn flat_variant<P: PageDriver + ?Sized>(&self, page: &P) -> Result<PlantVariant, Absent> {
        let price = page
            .text(&self.selectors.price, 0, TextKind::Inner, self.timeouts.text_read)
            .await
            .or_absent("price")?;
        let img_src = page
            .attribute(
                &self.selectors.featured_slide_image,
                0,
                &self.selectors.image_attribute,
                self.timeouts.text_read,
            )
            .await
            .or_absent("featured image")?;

        let price = price.trim();
        match img_src.filter(|src| !src.is_empty()) {
            Some(img_src) if !price.is_empty() => Ok(PlantVariant::Flat {
                img_src,
                price: price.to_string(),
            }),
            _ => Err(Absent::new("price or featured image")),
        }
    }
}
