mod common;

use common::{offer, Product, ShopSource};
use sprout_core::{ErrorCategory, Job, JobWorker, PlanterId, Size, TimeoutConfig};
use sprout_extract::{PlantWorker, VariantExtractor};

fn worker(product: Product) -> PlantWorker<ShopSource> {
    PlantWorker::new(ShopSource { product }, VariantExtractor::new(TimeoutConfig::instant()))
}

fn job() -> Job {
    Job {
        id: "plant-0".to_string(),
        url: "https://www.livelyroot.com/collections/all-plants/products/money-tree".to_string(),
    }
}

#[tokio::test]
async fn execute_returns_serialized_plant() {
    let mut product = Product::titled("Money Tree");
    product.offers = vec![offer(Size::Medium, PlanterId::Grower, "$45")];

    let result = worker(product).execute(&job()).await.unwrap();

    assert_eq!(result.job_id, "plant-0");
    assert_eq!(result.output["title"], "Money Tree");
    assert_eq!(result.output["variants"][0]["sizeId"], "medium");
    assert_eq!(result.output["variants"][0]["sizeLabel"], "M");
    assert_eq!(result.output["variants"][0]["planters"][0]["planterLabel"], "Grower");
}

#[tokio::test]
async fn missing_title_surfaces_as_element_not_found() {
    let err = worker(Product::default()).execute(&job()).await.unwrap_err();

    assert_eq!(err.category, ErrorCategory::ElementNotFound);
    assert_eq!(err.context["field"], "title");
}
