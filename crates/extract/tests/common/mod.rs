//! In-memory stand-in for a LivelyRoot product page.
//!
//! Models the picker behaviour the extractor depends on: a size must be
//! selected before its planters can be, switching size falls back to the
//! first planter that size offers, and (optionally) a selected planter hides
//! every size that does not come in it.

#![allow(dead_code)]

use async_trait::async_trait;
use sprout_core::{JobError, PageDriver, PageSource, PlanterId, Size, TextKind};
use sprout_extract::Selectors;
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Offer {
    pub size: Size,
    pub planter: PlanterId,
    pub price: String,
    pub img: Option<String>,
}

pub fn offer(size: Size, planter: PlanterId, price: &str) -> Offer {
    Offer {
        size,
        planter,
        price: price.to_string(),
        img: Some(format!("https://cdn.example/{}-{}.jpg", size.as_str(), planter.as_str())),
    }
}

#[derive(Debug, Default, Clone)]
pub struct Product {
    pub title: Option<String>,
    /// `None` entries time out when read
    pub paragraphs: Vec<Option<String>>,
    /// (label span text, whole row text)
    pub features: Vec<(String, String)>,
    pub extra_labels: usize,
    pub modal: bool,
    pub offers: Vec<Offer>,
    pub default_price: Option<String>,
    pub featured_img: Option<String>,
    pub broken_price: Vec<(Size, PlanterId)>,
    pub broken_image: Vec<(Size, PlanterId)>,
    pub planter_narrows_sizes: bool,
}

impl Product {
    pub fn titled(title: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Default)]
struct Ui {
    modal_open: bool,
    size: Option<Size>,
    planter: Option<PlanterId>,
    clicks: Vec<String>,
    attempts: Vec<String>,
    sleeps: Vec<Duration>,
    visited: Vec<String>,
}

pub struct Storefront {
    product: Product,
    selectors: Selectors,
    ui: Mutex<Ui>,
}

enum Control {
    Size(Size),
    Planter(PlanterId),
}

impl Storefront {
    pub fn new(product: Product) -> Self {
        let ui = Ui {
            modal_open: product.modal,
            ..Ui::default()
        };
        Self {
            product,
            selectors: Selectors::default(),
            ui: Mutex::new(ui),
        }
    }

    /// Selectors of every successful click, in order.
    pub fn clicks(&self) -> Vec<String> {
        self.ui.lock().unwrap().clicks.clone()
    }

    /// Selectors of every click, failed ones included.
    pub fn attempts(&self) -> Vec<String> {
        self.ui.lock().unwrap().attempts.clone()
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.ui.lock().unwrap().sleeps.clone()
    }

    pub fn visited(&self) -> Vec<String> {
        self.ui.lock().unwrap().visited.clone()
    }

    fn offer(&self, size: Size, planter: PlanterId) -> Option<&Offer> {
        self.product
            .offers
            .iter()
            .find(|o| o.size == size && o.planter == planter)
    }

    fn control(&self, selector: &str) -> Option<Control> {
        Size::SCRAPE_ORDER
            .into_iter()
            .find(|s| self.selectors.size_control(*s) == selector)
            .map(Control::Size)
            .or_else(|| {
                PlanterId::SCRAPE_ORDER
                    .into_iter()
                    .find(|p| self.selectors.planter_control(*p) == selector)
                    .map(Control::Planter)
            })
    }

    fn size_selectable(&self, ui: &Ui, size: Size) -> bool {
        let offered = self.product.offers.iter().any(|o| o.size == size);
        match (self.product.planter_narrows_sizes, ui.planter) {
            (true, Some(planter)) => offered && self.offer(size, planter).is_some(),
            _ => offered,
        }
    }

    fn planter_selectable(&self, ui: &Ui, planter: PlanterId) -> bool {
        ui.size.is_some_and(|size| self.offer(size, planter).is_some())
    }

    fn current_offer(&self, ui: &Ui) -> Option<&Offer> {
        match (ui.size, ui.planter) {
            (Some(size), Some(planter)) => self.offer(size, planter),
            _ => None,
        }
    }

    fn missing(selector: &str) -> JobError {
        JobError::element_not_found(selector)
    }

    fn timed_out(selector: &str) -> JobError {
        JobError::timeout_error(format!("Timeout waiting for element '{}'", selector))
    }
}

#[async_trait]
impl PageDriver for Storefront {
    async fn goto(&self, url: &str) -> Result<(), JobError> {
        self.ui.lock().unwrap().visited.push(url.to_string());
        Ok(())
    }

    async fn count(&self, selector: &str) -> Result<usize, JobError> {
        let ui = self.ui.lock().unwrap();
        let s = &self.selectors;
        let n = if selector == s.description_paragraphs {
            self.product.paragraphs.len()
        } else if selector == s.metadata_titles {
            self.product.features.len()
        } else if selector == s.metadata_labels {
            self.product.features.len() + self.product.extra_labels
        } else {
            match self.control(selector) {
                Some(Control::Size(size)) => usize::from(self.size_selectable(&ui, size)),
                Some(Control::Planter(p)) => usize::from(self.planter_selectable(&ui, p)),
                None => 0,
            }
        };
        Ok(n)
    }

    async fn wait_for(&self, selector: &str, _timeout: Duration) -> Result<(), JobError> {
        let ui = self.ui.lock().unwrap();
        if selector == self.selectors.modal_dismiss {
            return if ui.modal_open { Ok(()) } else { Err(Self::timed_out(selector)) };
        }
        if selector == self.selectors.title && self.product.title.is_some() {
            return Ok(());
        }
        Err(Self::timed_out(selector))
    }

    async fn click(&self, selector: &str, _timeout: Duration) -> Result<(), JobError> {
        let mut ui = self.ui.lock().unwrap();
        ui.attempts.push(selector.to_string());

        if selector == self.selectors.modal_dismiss {
            if !ui.modal_open {
                return Err(Self::missing(selector));
            }
            ui.modal_open = false;
        } else {
            match self.control(selector) {
                Some(Control::Size(size)) if self.size_selectable(&ui, size) => {
                    ui.size = Some(size);
                    if ui.planter.is_none_or(|p| self.offer(size, p).is_none()) {
                        ui.planter = PlanterId::SCRAPE_ORDER
                            .into_iter()
                            .find(|p| self.offer(size, *p).is_some());
                    }
                }
                Some(Control::Planter(planter)) if self.planter_selectable(&ui, planter) => {
                    ui.planter = Some(planter);
                }
                _ => return Err(Self::missing(selector)),
            }
        }

        ui.clicks.push(selector.to_string());
        Ok(())
    }

    async fn text(
        &self,
        selector: &str,
        index: usize,
        _kind: TextKind,
        _timeout: Duration,
    ) -> Result<String, JobError> {
        let ui = self.ui.lock().unwrap();
        let s = &self.selectors;

        if selector == s.title {
            return self.product.title.clone().ok_or_else(|| Self::timed_out(selector));
        }
        if selector == s.description_paragraphs {
            return match self.product.paragraphs.get(index) {
                Some(Some(text)) => Ok(text.clone()),
                _ => Err(Self::timed_out(selector)),
            };
        }
        if selector == s.metadata_labels {
            return match self.product.features.get(index) {
                Some((label, _)) => Ok(label.clone()),
                None if index < self.product.features.len() + self.product.extra_labels => {
                    Ok("Extra:".to_string())
                }
                None => Err(Self::timed_out(selector)),
            };
        }
        if selector == s.metadata_titles {
            return self
                .product
                .features
                .get(index)
                .map(|(_, row)| row.clone())
                .ok_or_else(|| Self::timed_out(selector));
        }
        if selector == s.price && index == 0 {
            if let Some(offer) = self.current_offer(&ui) {
                if self.product.broken_price.contains(&(offer.size, offer.planter)) {
                    return Err(Self::timed_out(selector));
                }
                return Ok(offer.price.clone());
            }
            return self.product.default_price.clone().ok_or_else(|| Self::timed_out(selector));
        }
        Err(Self::timed_out(selector))
    }

    async fn attribute(
        &self,
        selector: &str,
        index: usize,
        name: &str,
        _timeout: Duration,
    ) -> Result<Option<String>, JobError> {
        let ui = self.ui.lock().unwrap();
        if name != self.selectors.image_attribute || index != 0 {
            return Err(Self::missing(selector));
        }

        if selector == self.selectors.active_slide_image {
            let offer = self.current_offer(&ui).ok_or_else(|| Self::missing(selector))?;
            if self.product.broken_image.contains(&(offer.size, offer.planter)) {
                return Err(Self::timed_out(selector));
            }
            return Ok(offer.img.clone());
        }
        if selector == self.selectors.featured_slide_image {
            return self
                .product
                .featured_img
                .clone()
                .map(Some)
                .ok_or_else(|| Self::missing(selector));
        }
        Err(Self::missing(selector))
    }

    async fn sleep(&self, duration: Duration) {
        self.ui.lock().unwrap().sleeps.push(duration);
    }
}

/// Opens a fresh copy of the same product for every page request.
pub struct ShopSource {
    pub product: Product,
}

#[async_trait]
impl PageSource for ShopSource {
    async fn open(&self) -> Result<Box<dyn PageDriver>, JobError> {
        Ok(Box::new(Storefront::new(self.product.clone())))
    }
}
