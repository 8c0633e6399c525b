//! Catalog domain: products and the categories they belong to.
//!
//! The crate is layered the same way as the other domain crates in this
//! workspace:
//!
//! ```text
//! handlers  ->  service  ->  repository
//!    |             |             |
//!   HTTP       use cases     storage trait (+ in-memory store)
//! ```
//!
//! [`service::ProductService`] and [`service::CategoryService`] hold the
//! business rules (lookup semantics, category resolution, delete
//! classification) and are generic over [`repository::CatalogRepository`],
//! so they can be exercised against mocks in unit tests and against
//! [`repository::InMemoryCatalog`] everywhere else.

pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod seed;
pub mod service;

pub use error::{CatalogError, CatalogResult};
pub use models::{
    Category, CategoryDto, CategoryDraft, CategoryInput, Page, PageQuery, PageRequest, Product,
    ProductDraft, ProductDto, ProductInput, SortDirection, SortField, SortKey,
};
pub use repository::{CatalogRepository, DeleteOutcome, InMemoryCatalog};
pub use service::{CategoryService, ProductService};
