use sprout_core::{PlanterId, Size};

/// CSS selectors for the parts of a product detail page
#[derive(Debug, Clone)]
pub struct Selectors {
    /// Close button of the newsletter overlay
    pub modal_dismiss: String,
    pub title: String,
    /// Every paragraph of the expandable description
    pub description_paragraphs: String,
    /// Feature rows, each holding its label and value text
    pub metadata_titles: String,
    /// Label span inside each feature row, same order as `metadata_titles`
    pub metadata_labels: String,
    /// First match is the price for the current selection
    pub price: String,
    /// Image link of the slide tracking the current size and planter
    pub active_slide_image: String,
    /// Image link on products without variant pickers
    pub featured_slide_image: String,
    pub image_attribute: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            modal_dismiss: r#"button[data-dismiss="modal"]"#.to_string(),
            title: "h1.product-overview__title".to_string(),
            description_paragraphs: "article.product-overview__description.read-more * p".to_string(),
            metadata_titles: "p.feature-item__title".to_string(),
            metadata_labels: "span.feature-item__label".to_string(),
            price: "span.product-price".to_string(),
            active_slide_image: r#"li.js-config-image-slide.keen-slider__slide.active a[data-fancybox="images"]"#
                .to_string(),
            featured_slide_image: r#"li.keen-slider__slide.featured.active a[data-fancybox="images"]"#.to_string(),
            image_attribute: "href".to_string(),
        }
    }
}

impl Selectors {
    pub fn size_control(&self, size: Size) -> String {
        format!(r#"label[for="{}"]"#, size.control_id())
    }

    pub fn planter_control(&self, planter: PlanterId) -> String {
        format!(r#"label[for="{}"]"#, planter.as_str())
    }
}
