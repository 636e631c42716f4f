//! Product page extraction for the LivelyRoot storefront.
//!
//! [`VariantExtractor`] reads a product detail page through a
//! [`PageDriver`](sprout_core::PageDriver) and assembles a
//! [`Plant`](sprout_core::Plant): title, description, metadata and the full
//! size by planter matrix with a price and image per combination.

mod error;
mod extractor;
mod selection;
pub mod selectors;
pub mod text;
mod worker;

pub use error::ExtractError;
pub use extractor::VariantExtractor;
pub use selectors::Selectors;
pub use worker::PlantWorker;
