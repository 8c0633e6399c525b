use async_trait::async_trait;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::CatalogResult;
use crate::models::{
    Category, CategoryDraft, Page, PageRequest, Product, ProductDraft, SortDirection, SortField,
    SortKey,
};

/// What happened to a delete at the storage boundary. The store reports
/// the outcome as data; classifying it into an error is the service's job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The row existed and is gone.
    Deleted,
    /// No row with that id existed.
    NotFound,
    /// The row exists but dependent records still point at it.
    Referenced,
}

/// Repository trait for catalog persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Get a product by ID
    async fn find_by_id(&self, id: Uuid) -> CatalogResult<Option<Product>>;

    /// One page of products, ordered by the request's sort keys
    async fn find_page(&self, request: PageRequest) -> CatalogResult<Page<Product>>;

    /// Insert or replace a product; an id is assigned when the draft has none
    async fn save(&self, draft: ProductDraft) -> CatalogResult<Product>;

    /// Delete a product by ID, reporting what happened
    async fn delete_by_id(&self, id: Uuid) -> CatalogResult<DeleteOutcome>;

    /// Total number of products
    async fn count(&self) -> CatalogResult<u64>;

    /// Get a category by ID
    async fn find_category_by_id(&self, id: Uuid) -> CatalogResult<Option<Category>>;

    /// One page of categories, ordered by name
    async fn category_page(&self, request: PageRequest) -> CatalogResult<Page<Category>>;

    /// Insert or replace a category; an id is assigned when the draft has none
    async fn save_category(&self, draft: CategoryDraft) -> CatalogResult<Category>;

    /// Delete a category by ID, reporting what happened
    async fn delete_category_by_id(&self, id: Uuid) -> CatalogResult<DeleteOutcome>;
}

#[derive(Debug, Default)]
struct CatalogState {
    products: HashMap<Uuid, Product>,
    categories: HashMap<Uuid, Category>,
    /// Product ids referenced by order lines. Such products can be read
    /// but not deleted.
    order_lines: HashSet<Uuid>,
}

/// In-memory implementation of CatalogRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryCatalog {
    state: Arc<RwLock<CatalogState>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a product as referenced by an order line, which blocks its
    /// deletion until the reference is gone.
    pub async fn add_order_line(&self, product_id: Uuid) {
        let mut state = self.state.write().await;
        state.order_lines.insert(product_id);
    }
}

fn compare_products(a: &Product, b: &Product, sort: &[SortKey]) -> Ordering {
    let mut ordering = Ordering::Equal;
    for key in sort {
        let by_field = match key.field {
            SortField::Name => a.name.cmp(&b.name),
            SortField::Description => a.description.cmp(&b.description),
            SortField::Price => a.price.total_cmp(&b.price),
            SortField::Date => a.date.cmp(&b.date),
        };
        ordering = match key.direction {
            SortDirection::Asc => by_field,
            SortDirection::Desc => by_field.reverse(),
        };
        if ordering != Ordering::Equal {
            break;
        }
    }
    // Id tie-break keeps repeated identical requests returning identical
    // pages even when sort keys compare equal.
    ordering.then_with(|| a.id.cmp(&b.id))
}

fn paginate<T>(items: Vec<T>, request: &PageRequest) -> Page<T> {
    let size = request.size.max(1);
    let total_elements = items.len() as u64;
    let total_pages = total_elements.div_ceil(size);
    let content = items
        .into_iter()
        .skip(request.page.saturating_mul(size) as usize)
        .take(size as usize)
        .collect();
    Page {
        content,
        page_number: request.page,
        page_size: size,
        total_elements,
        total_pages,
    }
}

fn dedup_categories(categories: Vec<Category>) -> Vec<Category> {
    let mut seen = HashSet::new();
    categories
        .into_iter()
        .filter(|category| seen.insert(category.id))
        .collect()
}

#[async_trait]
impl CatalogRepository for InMemoryCatalog {
    async fn find_by_id(&self, id: Uuid) -> CatalogResult<Option<Product>> {
        let state = self.state.read().await;
        Ok(state.products.get(&id).cloned())
    }

    async fn find_page(&self, request: PageRequest) -> CatalogResult<Page<Product>> {
        let state = self.state.read().await;

        let mut products: Vec<Product> = state.products.values().cloned().collect();
        products.sort_by(|a, b| compare_products(a, b, &request.sort));

        Ok(paginate(products, &request))
    }

    async fn save(&self, draft: ProductDraft) -> CatalogResult<Product> {
        let mut state = self.state.write().await;

        let id = draft.id.unwrap_or_else(Uuid::now_v7);
        let product = Product {
            id,
            name: draft.name,
            description: draft.description,
            price: draft.price,
            image_url: draft.image_url,
            date: draft.date,
            categories: dedup_categories(draft.categories),
        };
        state.products.insert(id, product.clone());

        tracing::info!(product_id = %id, "Saved product");
        Ok(product)
    }

    async fn delete_by_id(&self, id: Uuid) -> CatalogResult<DeleteOutcome> {
        let mut state = self.state.write().await;

        if !state.products.contains_key(&id) {
            return Ok(DeleteOutcome::NotFound);
        }
        if state.order_lines.contains(&id) {
            return Ok(DeleteOutcome::Referenced);
        }

        state.products.remove(&id);
        tracing::info!(product_id = %id, "Deleted product");
        Ok(DeleteOutcome::Deleted)
    }

    async fn count(&self) -> CatalogResult<u64> {
        let state = self.state.read().await;
        Ok(state.products.len() as u64)
    }

    async fn find_category_by_id(&self, id: Uuid) -> CatalogResult<Option<Category>> {
        let state = self.state.read().await;
        Ok(state.categories.get(&id).cloned())
    }

    async fn category_page(&self, request: PageRequest) -> CatalogResult<Page<Category>> {
        let state = self.state.read().await;

        let direction = request
            .sort
            .iter()
            .find(|key| key.field == SortField::Name)
            .map(|key| key.direction)
            .unwrap_or_default();

        let mut categories: Vec<Category> = state.categories.values().cloned().collect();
        categories.sort_by(|a, b| {
            let by_name = match direction {
                SortDirection::Asc => a.name.cmp(&b.name),
                SortDirection::Desc => b.name.cmp(&a.name),
            };
            by_name.then_with(|| a.id.cmp(&b.id))
        });

        Ok(paginate(categories, &request))
    }

    async fn save_category(&self, draft: CategoryDraft) -> CatalogResult<Category> {
        let mut state = self.state.write().await;

        let id = draft.id.unwrap_or_else(Uuid::now_v7);
        let category = Category {
            id,
            name: draft.name,
        };
        state.categories.insert(id, category.clone());

        tracing::info!(category_id = %id, "Saved category");
        Ok(category)
    }

    async fn delete_category_by_id(&self, id: Uuid) -> CatalogResult<DeleteOutcome> {
        let mut state = self.state.write().await;

        if !state.categories.contains_key(&id) {
            return Ok(DeleteOutcome::NotFound);
        }
        let referenced = state
            .products
            .values()
            .any(|product| product.categories.iter().any(|category| category.id == id));
        if referenced {
            return Ok(DeleteOutcome::Referenced);
        }

        state.categories.remove(&id);
        tracing::info!(category_id = %id, "Deleted category");
        Ok(DeleteOutcome::Deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn draft(name: &str, price: f64) -> ProductDraft {
        ProductDraft {
            id: None,
            name: name.to_string(),
            description: format!("{name} description"),
            price,
            image_url: String::new(),
            date: DateTime::<Utc>::UNIX_EPOCH,
            categories: vec![],
        }
    }

    #[tokio::test]
    async fn test_save_assigns_id_and_find_by_id_returns_it() {
        let repo = InMemoryCatalog::new();

        let product = repo.save(draft("Smart TV", 2190.0)).await.unwrap();

        let fetched = repo.find_by_id(product.id).await.unwrap();
        assert!(fetched.is_some());
        assert_eq!(fetched.unwrap().name, "Smart TV");
    }

    #[tokio::test]
    async fn test_save_with_id_replaces_existing() {
        let repo = InMemoryCatalog::new();

        let created = repo.save(draft("PC Gamer", 1200.0)).await.unwrap();

        let mut update = draft("PC Gamer X", 1350.0);
        update.id = Some(created.id);
        let updated = repo.save(update).await.unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "PC Gamer X");
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_save_drops_duplicate_categories() {
        let repo = InMemoryCatalog::new();
        let books = repo
            .save_category(CategoryDraft::new("Books"))
            .await
            .unwrap();

        let mut input = draft("The Lord of the Rings", 90.5);
        input.categories = vec![books.clone(), books.clone()];
        let product = repo.save(input).await.unwrap();

        assert_eq!(product.categories, vec![books]);
    }

    #[tokio::test]
    async fn test_delete_outcomes() {
        let repo = InMemoryCatalog::new();

        let free = repo.save(draft("Rails for Dummies", 100.99)).await.unwrap();
        let referenced = repo.save(draft("Macbook Pro", 1250.0)).await.unwrap();
        repo.add_order_line(referenced.id).await;

        assert_eq!(
            repo.delete_by_id(free.id).await.unwrap(),
            DeleteOutcome::Deleted
        );
        assert_eq!(
            repo.delete_by_id(Uuid::now_v7()).await.unwrap(),
            DeleteOutcome::NotFound
        );
        assert_eq!(
            repo.delete_by_id(referenced.id).await.unwrap(),
            DeleteOutcome::Referenced
        );
        // The referenced product is still there.
        assert!(repo.find_by_id(referenced.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_find_page_sorts_and_slices() {
        let repo = InMemoryCatalog::new();
        for (name, price) in [
            ("Smart TV", 2190.0),
            ("Macbook Pro", 1250.0),
            ("PC Gamer", 1200.0),
        ] {
            repo.save(draft(name, price)).await.unwrap();
        }

        let request = PageRequest::new(0, 2).with_sort(vec![SortKey::asc(SortField::Name)]);
        let page = repo.find_page(request).await.unwrap();

        assert_eq!(page.total_elements, 3);
        assert_eq!(page.total_pages, 2);
        let names: Vec<_> = page.content.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Macbook Pro", "PC Gamer"]);
    }

    #[tokio::test]
    async fn test_find_page_past_the_end_keeps_totals() {
        let repo = InMemoryCatalog::new();
        repo.save(draft("PC Gamer", 1200.0)).await.unwrap();

        let page = repo.find_page(PageRequest::new(50, 10)).await.unwrap();

        assert!(page.is_empty());
        assert_eq!(page.page_number, 50);
        assert_eq!(page.total_elements, 1);
        assert_eq!(page.total_pages, 1);
    }

    #[tokio::test]
    async fn test_identical_page_requests_return_identical_pages() {
        let repo = InMemoryCatalog::new();
        // Same price everywhere, so ordering rests on the tie-break.
        for i in 0..10 {
            repo.save(draft(&format!("PC Gamer {i}"), 1350.0)).await.unwrap();
        }

        let request = PageRequest::new(1, 3).with_sort(vec![SortKey::asc(SortField::Price)]);
        let first = repo.find_page(request.clone()).await.unwrap();
        let second = repo.find_page(request).await.unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_category_delete_blocked_while_products_reference_it() {
        let repo = InMemoryCatalog::new();
        let electronics = repo
            .save_category(CategoryDraft::new("Electronics"))
            .await
            .unwrap();

        let mut input = draft("Smart TV", 2190.0);
        input.categories = vec![electronics.clone()];
        let product = repo.save(input).await.unwrap();

        assert_eq!(
            repo.delete_category_by_id(electronics.id).await.unwrap(),
            DeleteOutcome::Referenced
        );

        repo.delete_by_id(product.id).await.unwrap();
        assert_eq!(
            repo.delete_category_by_id(electronics.id).await.unwrap(),
            DeleteOutcome::Deleted
        );
    }

    #[tokio::test]
    async fn test_category_page_sorted_by_name() {
        let repo = InMemoryCatalog::new();
        for name in ["Electronics", "Books", "Computers"] {
            repo.save_category(CategoryDraft::new(name)).await.unwrap();
        }

        let page = repo
            .category_page(PageRequest::new(0, 12))
            .await
            .unwrap();

        let names: Vec<_> = page.content.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Books", "Computers", "Electronics"]);
    }
}
