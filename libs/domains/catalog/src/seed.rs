//! Demo dataset for development environments: three categories and 25
//! products, enough to exercise paging and sorting from a fresh start.

use chrono::{DateTime, Duration, Utc};

use crate::error::CatalogResult;
use crate::models::{CategoryDraft, ProductDraft};
use crate::repository::CatalogRepository;

pub const SEED_PRODUCT_COUNT: u64 = 25;
pub const SEED_CATEGORY_COUNT: u64 = 3;

const DESCRIPTION: &str =
    "Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do eiusmod tempor incididunt.";

/// Days between the unix epoch and the first seed date (2020-07-13).
const BASE_DAY: i64 = 18_456;

const DEMO_PRODUCTS: &[(&str, f64)] = &[
    ("The Lord of the Rings", 90.5),
    ("Smart TV", 2190.0),
    ("Macbook Pro", 1250.0),
    ("PC Gamer", 1200.0),
    ("Rails for Dummies", 100.99),
    ("PC Gamer Ex", 1350.0),
    ("PC Gamer X", 1350.0),
    ("PC Gamer Alfa", 1850.0),
    ("PC Gamer Tera", 1950.0),
    ("PC Gamer Y", 1700.0),
    ("PC Gamer Nitro", 1450.0),
    ("PC Gamer Card", 1850.0),
    ("PC Gamer Plus", 1350.0),
    ("PC Gamer Hera", 2250.0),
    ("PC Gamer Weed", 2200.0),
    ("PC Gamer Max", 2340.0),
    ("PC Gamer Turbo", 1280.0),
    ("PC Gamer Hot", 1450.0),
    ("PC Gamer Ez", 1750.0),
    ("PC Gamer Tr", 1650.0),
    ("PC Gamer Tx", 1680.0),
    ("PC Gamer Er", 1850.0),
    ("PC Gamer Min", 2250.0),
    ("PC Gamer Boo", 1350.0),
    ("PC Gamer Foo", 1200.0),
];

/// Fills the store with the demo catalog. Intended for a fresh store;
/// running it twice inserts a second copy of everything.
pub async fn demo_catalog<R: CatalogRepository>(repo: &R) -> CatalogResult<()> {
    let books = repo.save_category(CategoryDraft::new("Books")).await?;
    let electronics = repo.save_category(CategoryDraft::new("Electronics")).await?;
    let computers = repo.save_category(CategoryDraft::new("Computers")).await?;

    for (index, (name, price)) in DEMO_PRODUCTS.iter().enumerate() {
        let categories = match *name {
            "The Lord of the Rings" => vec![books.clone()],
            "Rails for Dummies" => vec![books.clone(), computers.clone()],
            "Smart TV" => vec![electronics.clone()],
            _ => vec![computers.clone()],
        };

        repo.save(ProductDraft {
            id: None,
            name: (*name).to_string(),
            description: DESCRIPTION.to_string(),
            price: *price,
            image_url: format!("https://example.com/img/{}-big.jpg", index + 1),
            date: DateTime::<Utc>::UNIX_EPOCH + Duration::days(BASE_DAY + index as i64),
            categories,
        })
        .await?;
    }

    tracing::info!(
        products = DEMO_PRODUCTS.len(),
        categories = SEED_CATEGORY_COUNT,
        "Seeded demo catalog"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PageRequest;
    use crate::repository::InMemoryCatalog;

    #[tokio::test]
    async fn test_demo_catalog_counts() {
        let repo = InMemoryCatalog::new();
        demo_catalog(&repo).await.unwrap();

        assert_eq!(repo.count().await.unwrap(), SEED_PRODUCT_COUNT);

        let categories = repo.category_page(PageRequest::default()).await.unwrap();
        assert_eq!(categories.total_elements, SEED_CATEGORY_COUNT);
    }
}
