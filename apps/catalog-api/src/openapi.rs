//! OpenAPI documentation configuration

use utoipa::OpenApi;

/// Combined OpenAPI documentation for Catalog API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Catalog API",
        version = "0.1.0",
        description = "Product catalog API with paged product and category management",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    nest(
        (path = "/api/products", api = domain_catalog::handlers::ProductsApiDoc),
        (path = "/api/categories", api = domain_catalog::handlers::CategoriesApiDoc)
    ),
    tags(
        (name = domain_catalog::handlers::PRODUCTS_TAG, description = "Product catalog endpoints"),
        (name = domain_catalog::handlers::CATEGORIES_TAG, description = "Category management endpoints")
    )
)]
pub struct ApiDoc;
