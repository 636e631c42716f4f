//! Scraped product records and the closed option sets of the storefront

use serde::{Deserialize, Serialize};

/// Pot sizes offered by the storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Size {
    #[serde(rename = "small")]
    Small,
    #[serde(rename = "medium")]
    Medium,
    #[serde(rename = "large")]
    Large,
    #[serde(rename = "extra-large")]
    ExtraLarge,
    #[serde(rename = "oneGallon")]
    OneGallon,
    #[serde(rename = "fiveGallon")]
    FiveGallon,
}

impl Size {
    /// Order in which size controls are probed on a product page.
    pub const SCRAPE_ORDER: [Size; 6] = [
        Size::OneGallon,
        Size::FiveGallon,
        Size::Small,
        Size::Medium,
        Size::Large,
        Size::ExtraLarge,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Size::Small => "small",
            Size::Medium => "medium",
            Size::Large => "large",
            Size::ExtraLarge => "extra-large",
            Size::OneGallon => "oneGallon",
            Size::FiveGallon => "fiveGallon",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Size::Small => "S",
            Size::Medium => "M",
            Size::Large => "L",
            Size::ExtraLarge => "XL",
            Size::OneGallon => "1G",
            Size::FiveGallon => "5G",
        }
    }

    /// Value of the `for` attribute on the size picker label.
    pub fn control_id(self) -> String {
        format!("plant-{}", self.as_str())
    }
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Containers a plant can ship in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlanterId {
    #[serde(rename = "grower")]
    Grower,
    #[serde(rename = "planter-eco-planter")]
    EcoPlanter,
    #[serde(rename = "planter-naturals-basket")]
    NaturalsBasket,
    #[serde(rename = "planter-ceramic")]
    Ceramic,
}

impl PlanterId {
    pub const SCRAPE_ORDER: [PlanterId; 4] = [
        PlanterId::Grower,
        PlanterId::EcoPlanter,
        PlanterId::NaturalsBasket,
        PlanterId::Ceramic,
    ];

    /// Offered at every size, so selecting it never hides a size option.
    pub const BASELINE: PlanterId = PlanterId::Grower;

    /// Doubles as the `for` attribute of the planter picker label.
    pub fn as_str(self) -> &'static str {
        match self {
            PlanterId::Grower => "grower",
            PlanterId::EcoPlanter => "planter-eco-planter",
            PlanterId::NaturalsBasket => "planter-naturals-basket",
            PlanterId::Ceramic => "planter-ceramic",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PlanterId::Grower => "Grower",
            PlanterId::EcoPlanter => "Eco Pot",
            PlanterId::NaturalsBasket => "Baskets",
            PlanterId::Ceramic => "Ceramic",
        }
    }
}

impl std::fmt::Display for PlanterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Planter {
    pub planter_id: PlanterId,
    pub planter_label: String,
    /// Displayed price text, currency symbol included
    pub price: String,
    pub img_src: Option<String>,
}

impl Planter {
    pub fn new(planter_id: PlanterId, price: impl Into<String>, img_src: Option<String>) -> Self {
        Self {
            planter_id,
            planter_label: planter_id.label().to_string(),
            price: price.into(),
            img_src,
        }
    }
}

/// One purchasable configuration of a product.
///
/// Serialized without a tag so the JSON is either
/// `{"sizeId", "sizeLabel", "planters"}` or `{"imgSrc", "price"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged, rename_all_fields = "camelCase")]
pub enum PlantVariant {
    Sized {
        size_id: Size,
        size_label: String,
        planters: Vec<Planter>,
    },
    /// Single-SKU products with no size or planter pickers
    Flat { img_src: String, price: String },
}

impl PlantVariant {
    pub fn sized(size: Size, planters: Vec<Planter>) -> Self {
        PlantVariant::Sized {
            size_id: size,
            size_label: size.label().to_string(),
            planters,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlantMetadata {
    pub id: String,
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plant {
    pub title: String,
    pub description: Vec<String>,
    pub metadata: Vec<PlantMetadata>,
    pub variants: Vec<PlantVariant>,
}

impl Plant {
    /// True when the variants are all sized, or a lone flat entry.
    pub fn has_uniform_variants(&self) -> bool {
        let sized = self
            .variants
            .iter()
            .filter(|v| matches!(v, PlantVariant::Sized { .. }))
            .count();
        sized == self.variants.len() || (sized == 0 && self.variants.len() == 1)
    }
}
