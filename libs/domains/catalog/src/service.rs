use std::collections::HashSet;
use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::error::{CatalogError, CatalogResult};
use crate::models::{
    Category, CategoryDraft, CategoryDto, CategoryInput, Page, PageRequest, ProductDraft,
    ProductDto, ProductInput,
};
use crate::repository::{CatalogRepository, DeleteOutcome};

/// Product use cases on top of a [`CatalogRepository`].
#[derive(Clone)]
pub struct ProductService<R: CatalogRepository> {
    repository: Arc<R>,
}

impl<R: CatalogRepository> ProductService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// One page of products, projected to DTOs. Totals describe the whole
    /// result set, so a page index past the end comes back empty but with
    /// accurate counts.
    pub async fn find_all_paged(&self, request: PageRequest) -> CatalogResult<Page<ProductDto>> {
        let page = self.repository.find_page(request).await?;
        Ok(page.map(|product| ProductDto::from_product(&product)))
    }

    pub async fn find_by_id(&self, id: Uuid) -> CatalogResult<ProductDto> {
        let product = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(CatalogError::NotFound(id))?;
        Ok(ProductDto::from_product(&product))
    }

    /// Creates a product when `id` is `None`, otherwise replaces the
    /// product with that id. Every referenced category must exist.
    pub async fn upsert(&self, id: Option<Uuid>, input: ProductInput) -> CatalogResult<ProductDto> {
        input
            .validate()
            .map_err(|err| CatalogError::Validation(err.to_string()))?;

        if let Some(id) = id {
            self.repository
                .find_by_id(id)
                .await?
                .ok_or(CatalogError::NotFound(id))?;
        }

        let categories = self.resolve_categories(&input.category_ids).await?;
        let draft = ProductDraft {
            id,
            name: input.name,
            description: input.description,
            price: input.price,
            image_url: input.image_url,
            date: input.date,
            categories,
        };

        let product = self.repository.save(draft).await?;
        Ok(ProductDto::from_product(&product))
    }

    /// Deletes a product, classifying the store's outcome: a missing row
    /// is a not-found error, a row still referenced by order lines is an
    /// integrity violation.
    pub async fn delete(&self, id: Uuid) -> CatalogResult<()> {
        match self.repository.delete_by_id(id).await? {
            DeleteOutcome::Deleted => Ok(()),
            DeleteOutcome::NotFound => Err(CatalogError::NotFound(id)),
            DeleteOutcome::Referenced => Err(CatalogError::IntegrityViolation(id)),
        }
    }

    async fn resolve_categories(&self, ids: &[Uuid]) -> CatalogResult<Vec<Category>> {
        let mut seen = HashSet::new();
        let mut categories = Vec::new();
        for &id in ids {
            if !seen.insert(id) {
                continue;
            }
            let category = self
                .repository
                .find_category_by_id(id)
                .await?
                .ok_or(CatalogError::CategoryNotFound(id))?;
            categories.push(category);
        }
        Ok(categories)
    }
}

/// Category use cases, same shape as [`ProductService`].
#[derive(Clone)]
pub struct CategoryService<R: CatalogRepository> {
    repository: Arc<R>,
}

impl<R: CatalogRepository> CategoryService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    pub async fn find_all_paged(&self, request: PageRequest) -> CatalogResult<Page<CategoryDto>> {
        let page = self.repository.category_page(request).await?;
        Ok(page.map(|category| CategoryDto::from(&category)))
    }

    pub async fn find_by_id(&self, id: Uuid) -> CatalogResult<CategoryDto> {
        let category = self
            .repository
            .find_category_by_id(id)
            .await?
            .ok_or(CatalogError::NotFound(id))?;
        Ok(CategoryDto::from(&category))
    }

    pub async fn upsert(
        &self,
        id: Option<Uuid>,
        input: CategoryInput,
    ) -> CatalogResult<CategoryDto> {
        input
            .validate()
            .map_err(|err| CatalogError::Validation(err.to_string()))?;

        if let Some(id) = id {
            self.repository
                .find_category_by_id(id)
                .await?
                .ok_or(CatalogError::NotFound(id))?;
        }

        let category = self
            .repository
            .save_category(CategoryDraft {
                id,
                name: input.name,
            })
            .await?;
        Ok(CategoryDto::from(&category))
    }

    /// Deletes a category; one still attached to products is an integrity
    /// violation.
    pub async fn delete(&self, id: Uuid) -> CatalogResult<()> {
        match self.repository.delete_category_by_id(id).await? {
            DeleteOutcome::Deleted => Ok(()),
            DeleteOutcome::NotFound => Err(CatalogError::NotFound(id)),
            DeleteOutcome::Referenced => Err(CatalogError::IntegrityViolation(id)),
        }
    }
}
