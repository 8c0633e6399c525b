use std::collections::HashSet;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::error::CatalogError;

/// Default page size applied when a request does not specify one.
pub const DEFAULT_PAGE_SIZE: u64 = 12;

/// A category a product can be filed under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
}

/// A catalog product as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub image_url: String,
    pub date: DateTime<Utc>,
    pub categories: Vec<Category>,
}

/// A product about to be written. `id` is `None` on first save and the
/// store assigns one; on update it carries the id being replaced.
#[derive(Debug, Clone)]
pub struct ProductDraft {
    pub id: Option<Uuid>,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub image_url: String,
    pub date: DateTime<Utc>,
    pub categories: Vec<Category>,
}

/// A category about to be written, same id convention as [`ProductDraft`].
#[derive(Debug, Clone)]
pub struct CategoryDraft {
    pub id: Option<Uuid>,
    pub name: String,
}

impl CategoryDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }
}

/// Request body for creating or updating a product.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ProductInput {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[validate(range(min = 0.0, message = "Price must not be negative"))]
    pub price: f64,
    #[serde(default)]
    pub image_url: String,
    pub date: DateTime<Utc>,
    /// Categories the product belongs to. Every id must resolve to an
    /// existing category or the whole operation is rejected.
    #[serde(default)]
    pub category_ids: Vec<Uuid>,
}

/// Request body for creating or updating a category.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CategoryInput {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
}

/// Category as exposed over the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CategoryDto {
    pub id: Uuid,
    pub name: String,
}

impl From<&Category> for CategoryDto {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id,
            name: category.name.clone(),
        }
    }
}

/// Product as exposed over the API, with its categories projected in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductDto {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub image_url: String,
    pub date: DateTime<Utc>,
    pub categories: Vec<CategoryDto>,
}

impl ProductDto {
    /// Projects a product together with an externally supplied category
    /// collection. Duplicate categories collapse to a single entry; the
    /// product's own scalar fields pass through untouched.
    pub fn project(product: &Product, categories: &[Category]) -> Self {
        let mut seen = HashSet::new();
        let categories = categories
            .iter()
            .filter(|category| seen.insert(category.id))
            .map(CategoryDto::from)
            .collect();
        Self {
            id: product.id,
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
            image_url: product.image_url.clone(),
            date: product.date,
            categories,
        }
    }

    /// Projects a product with the categories it already carries.
    pub fn from_product(product: &Product) -> Self {
        Self::project(product, &product.categories)
    }
}

/// Fields a product listing can be ordered by.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    Name,
    Description,
    Price,
    Date,
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    strum::Display,
    strum::EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// One `field:direction` ordering criterion. A bare field name sorts
/// ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn asc(field: SortField) -> Self {
        Self {
            field,
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: SortField) -> Self {
        Self {
            field,
            direction: SortDirection::Desc,
        }
    }
}

impl FromStr for SortKey {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, direction) = match s.split_once(':') {
            Some((field, direction)) => (field, Some(direction)),
            None => (s, None),
        };
        let field = field
            .trim()
            .parse::<SortField>()
            .map_err(|_| CatalogError::Validation(format!("Unknown sort field: {field}")))?;
        let direction = match direction {
            Some(direction) => direction
                .trim()
                .parse::<SortDirection>()
                .map_err(|_| {
                    CatalogError::Validation(format!("Unknown sort direction: {direction}"))
                })?,
            None => SortDirection::Asc,
        };
        Ok(Self { field, direction })
    }
}

/// Validated paging and sorting parameters handed to the store.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
    /// Zero-based page index.
    pub page: u64,
    /// Page size, always at least 1.
    pub size: u64,
    /// Ordering criteria, applied in sequence.
    pub sort: Vec<SortKey>,
}

impl PageRequest {
    pub fn new(page: u64, size: u64) -> Self {
        Self {
            page,
            size,
            sort: Vec::new(),
        }
    }

    pub fn with_sort(mut self, sort: Vec<SortKey>) -> Self {
        self.sort = sort;
        self
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(0, DEFAULT_PAGE_SIZE)
    }
}

/// One page of results plus the totals describing the whole result set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Page<T> {
    pub content: Vec<T>,
    /// Zero-based index of this page.
    pub page_number: u64,
    pub page_size: u64,
    /// Total matching elements across all pages.
    pub total_elements: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    /// Maps the content while keeping every paging total intact.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            page_number: self.page_number,
            page_size: self.page_size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Raw paging query parameters as they arrive over HTTP.
#[derive(Debug, Clone, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// Zero-based page index.
    #[serde(default)]
    pub page: u64,
    /// Page size.
    #[serde(default = "default_page_size")]
    pub size: u64,
    /// Comma-separated sort criteria, e.g. `name:desc,price`.
    #[serde(default)]
    pub sort: Option<String>,
}

fn default_page_size() -> u64 {
    DEFAULT_PAGE_SIZE
}

impl TryFrom<PageQuery> for PageRequest {
    type Error = CatalogError;

    fn try_from(query: PageQuery) -> Result<Self, Self::Error> {
        if query.size == 0 {
            return Err(CatalogError::Validation(
                "Page size must be at least 1".to_string(),
            ));
        }
        let sort = match query.sort.as_deref() {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|token| !token.is_empty())
                .map(SortKey::from_str)
                .collect::<Result<Vec<_>, _>>()?,
            None => Vec::new(),
        };
        Ok(PageRequest::new(query.page, query.size).with_sort(sort))
    }
}
