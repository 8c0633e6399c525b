//! Handler tests for the catalog domain
//!
//! These tests verify that HTTP handlers work correctly:
//! - Request deserialization (JSON → Rust structs)
//! - Response serialization (Rust structs → JSON)
//! - HTTP status codes
//! - Error responses
//!
//! Unlike E2E tests, these test ONLY the catalog domain handlers,
//! not the full application with routing, docs endpoints, etc.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use domain_catalog::*;
use http_body_util::BodyExt;
use serde_json::json;
use test_utils::TestDataBuilder;
use tower::ServiceExt; // For oneshot()

// Helper to parse JSON response body
async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn seeded_products_app() -> (InMemoryCatalog, ProductService<InMemoryCatalog>, Router) {
    let repo = InMemoryCatalog::new();
    seed::demo_catalog(&repo).await.unwrap();
    let service = ProductService::new(repo.clone());
    let app = handlers::products_router(service.clone());
    (repo, service, app)
}

fn product_json(name: &str) -> serde_json::Value {
    json!({
        "name": name,
        "description": "Handler test product",
        "price": 450.0,
        "image_url": "https://example.com/img/test.jpg",
        "date": "2020-07-13T00:00:00Z"
    })
}

fn post(uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(body).unwrap()))
        .unwrap()
}

fn put(uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(body).unwrap()))
        .unwrap()
}

#[tokio::test]
async fn test_create_product_handler_returns_201() {
    let (_, _, app) = seeded_products_app().await;
    let builder = TestDataBuilder::from_test_name("handler_create_201");

    let name = builder.name("product", "created");
    let response = app.oneshot(post("/", &product_json(&name))).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let product: ProductDto = json_body(response.into_body()).await;
    assert_eq!(product.name, name);
    assert!(product.categories.is_empty());
}

#[tokio::test]
async fn test_create_product_handler_validates_input() {
    let (_, _, app) = seeded_products_app().await;

    // Invalid name (empty string)
    let response = app.oneshot(post("/", &product_json(""))).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_product_handler_rejects_unknown_category_with_422() {
    let (_, _, app) = seeded_products_app().await;

    let mut body = product_json("Orphan");
    body["category_ids"] = json!([uuid::Uuid::now_v7()]);

    let response = app.oneshot(post("/", &body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_list_products_handler_pages_and_sorts() {
    let (_, _, app) = seeded_products_app().await;

    let request = Request::builder()
        .method("GET")
        .uri("/?page=0&size=10&sort=name")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let page: Page<ProductDto> = json_body(response.into_body()).await;
    assert_eq!(page.content.len(), 10);
    assert_eq!(page.total_elements, seed::SEED_PRODUCT_COUNT);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.content[0].name, "Macbook Pro");
}

#[tokio::test]
async fn test_list_products_handler_rejects_zero_page_size() {
    let (_, _, app) = seeded_products_app().await;

    let request = Request::builder()
        .method("GET")
        .uri("/?size=0")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_products_handler_rejects_unknown_sort_field() {
    let (_, _, app) = seeded_products_app().await;

    let request = Request::builder()
        .method("GET")
        .uri("/?sort=owner")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_product_handler_returns_200() {
    let (_, service, app) = seeded_products_app().await;

    let request = PageRequest::new(0, 1).with_sort(vec![SortKey::asc(SortField::Name)]);
    let listed = service.find_all_paged(request).await.unwrap();
    let id = listed.content[0].id;

    let request = Request::builder()
        .method("GET")
        .uri(format!("/{}", id))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let product: ProductDto = json_body(response.into_body()).await;
    assert_eq!(product.id, id);
    assert_eq!(product.name, "Macbook Pro");
}

#[tokio::test]
async fn test_get_product_handler_returns_404_for_missing() {
    let (_, _, app) = seeded_products_app().await;

    let request = Request::builder()
        .method("GET")
        .uri(format!("/{}", uuid::Uuid::now_v7()))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_product_handler_returns_400_for_malformed_id() {
    let (_, _, app) = seeded_products_app().await;

    let request = Request::builder()
        .method("GET")
        .uri("/not-a-uuid")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_product_handler_returns_200() {
    let (_, service, app) = seeded_products_app().await;
    let builder = TestDataBuilder::from_test_name("handler_update");

    let request = PageRequest::new(0, 1).with_sort(vec![SortKey::asc(SortField::Name)]);
    let listed = service.find_all_paged(request).await.unwrap();
    let macbook = &listed.content[0];
    assert!(!macbook.categories.is_empty());

    let name = builder.name("product", "renamed");
    let response = app
        .oneshot(put(&format!("/{}", macbook.id), &product_json(&name)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let product: ProductDto = json_body(response.into_body()).await;
    assert_eq!(product.id, macbook.id);
    assert_eq!(product.name, name);
    // The body carried no category ids, so the former set is replaced
    // with an empty one rather than merged.
    assert!(product.categories.is_empty());
}

#[tokio::test]
async fn test_update_product_handler_returns_404_for_missing() {
    let (_, _, app) = seeded_products_app().await;

    let uri = format!("/{}", uuid::Uuid::now_v7());
    let response = app.oneshot(put(&uri, &product_json("Ghost"))).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_product_handler_returns_204() {
    let (repo, service, app) = seeded_products_app().await;

    let listed = service.find_all_paged(PageRequest::new(0, 1)).await.unwrap();
    let id = listed.content[0].id;

    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/{}", id))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(repo.count().await.unwrap(), seed::SEED_PRODUCT_COUNT - 1);
}

#[tokio::test]
async fn test_delete_product_handler_returns_404_for_missing() {
    let (_, _, app) = seeded_products_app().await;

    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/{}", uuid::Uuid::now_v7()))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_product_handler_returns_409_when_referenced() {
    let (repo, service, app) = seeded_products_app().await;

    let listed = service.find_all_paged(PageRequest::new(0, 1)).await.unwrap();
    let id = listed.content[0].id;
    repo.add_order_line(id).await;

    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/{}", id))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(repo.count().await.unwrap(), seed::SEED_PRODUCT_COUNT);
}

#[tokio::test]
async fn test_category_handlers_create_and_list() {
    let repo = InMemoryCatalog::new();
    let app = handlers::categories_router(CategoryService::new(repo));
    let builder = TestDataBuilder::from_test_name("handler_categories");

    let name = builder.name("category", "created");
    let response = app
        .clone()
        .oneshot(post("/", &json!({ "name": name })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let request = Request::builder()
        .method("GET")
        .uri("/")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let page: Page<CategoryDto> = json_body(response.into_body()).await;
    assert_eq!(page.total_elements, 1);
    assert_eq!(page.content[0].name, name);
}

#[tokio::test]
async fn test_delete_category_handler_returns_409_when_referenced() {
    let repo = InMemoryCatalog::new();
    seed::demo_catalog(&repo).await.unwrap();
    let service = CategoryService::new(repo);

    let listed = service.find_all_paged(PageRequest::default()).await.unwrap();
    let books = listed.content.iter().find(|c| c.name == "Books").unwrap().id;

    let app = handlers::categories_router(service);

    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/{}", books))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}
