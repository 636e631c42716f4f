use sprout_core::{
    Absent, OrAbsent, PageDriver, PlantVariant, Planter, PlanterId, Size, TextKind, TimeoutConfig,
};
use tracing::debug;

use crate::selectors::Selectors;

/// What the variant pickers currently show, as far as our own clicks tell.
///
/// Only successful clicks move it; a failed probe leaves it untouched.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Selection {
    pub size: Option<Size>,
    pub planter: Option<PlanterId>,
}

/// Walks every size, and every planter within it, on one product page.
pub(crate) struct SelectionWalk<'a, P: PageDriver + ?Sized> {
    page: &'a P,
    selectors: &'a Selectors,
    timeouts: &'a TimeoutConfig,
    state: Selection,
}

impl<'a, P: PageDriver + ?Sized> SelectionWalk<'a, P> {
    pub fn new(page: &'a P, selectors: &'a Selectors, timeouts: &'a TimeoutConfig) -> Self {
        Self {
            page,
            selectors,
            timeouts,
            state: Selection::default(),
        }
    }

    /// Sized variants for every size the page offers, in probe order.
    pub async fn run(mut self) -> Vec<PlantVariant> {
        let mut variants = Vec::new();
        for size in Size::SCRAPE_ORDER {
            match self.visit_size(size).await {
                Ok(planters) if !planters.is_empty() => {
                    variants.push(PlantVariant::sized(size, planters));
                }
                Ok(_) => debug!(%size, "size offered but no planter had a price"),
                Err(absent) => debug!(%size, reason = %absent, "size skipped"),
            }
        }
        variants
    }

    /// Selects `size`, collects its planters, then always returns the
    /// planter picker to the baseline before the next size is probed.
    async fn visit_size(&mut self, size: Size) -> Result<Vec<Planter>, Absent> {
        self.select_size(size).await?;
        let planters = self.collect_planters().await;
        self.reset().await;
        Ok(planters)
    }

    async fn collect_planters(&mut self) -> Vec<Planter> {
        let mut planters = Vec::new();
        for planter in PlanterId::SCRAPE_ORDER {
            if self.select_planter(planter).await.is_err() {
                continue;
            }
            match self.read_offer(planter).await {
                Ok(offer) => planters.push(offer),
                Err(absent) => debug!(selection = ?self.state, reason = %absent, "planter dropped"),
            }
        }
        planters
    }

    async fn select_size(&mut self, size: Size) -> Result<(), Absent> {
        let control = self.selectors.size_control(size);
        self.page.click(&control, self.timeouts.probe).await.or_absent(&control)?;
        self.page.sleep(self.timeouts.settle_delay).await;
        self.state.size = Some(size);
        Ok(())
    }

    async fn select_planter(&mut self, planter: PlanterId) -> Result<(), Absent> {
        let control = self.selectors.planter_control(planter);
        self.page.click(&control, self.timeouts.probe).await.or_absent(&control)?;
        self.page.sleep(self.timeouts.settle_delay).await;
        self.state.planter = Some(planter);
        Ok(())
    }

    /// Price and image shown for the current size and planter.
    async fn read_offer(&self, planter: PlanterId) -> Result<Planter, Absent> {
        let price = self
            .page
            .text(&self.selectors.price, 0, TextKind::Inner, self.timeouts.text_read)
            .await
            .or_absent("price")?;
        let price = price.trim();
        if price.is_empty() {
            return Err(Absent::new("price"));
        }

        let img_src = self
            .page
            .attribute(
                &self.selectors.active_slide_image,
                0,
                &self.selectors.image_attribute,
                self.timeouts.text_read,
            )
            .await
            .or_absent("active slide image")?;

        Ok(Planter::new(planter, price, img_src))
    }

    /// Re-selects the baseline planter, which every size offers. A narrower
    /// planter left selected can hide sizes from the next probe.
    async fn reset(&mut self) {
        if self.state.planter == Some(PlanterId::BASELINE) {
            return;
        }
        if let Err(absent) = self.select_planter(PlanterId::BASELINE).await {
            debug!(selection = ?self.state, reason = %absent, "baseline planter reset failed");
        }
    }
}
