pub mod api;
pub mod config;
pub mod entities;
pub mod infrastructure;
pub mod models;
pub mod services;

use crate::config::AppConfig;
use crate::models::ObjectCreated;
use crate::services::object_store::ObjectStore;
use crate::services::record_store::RecordStore;
use axum::{
    Json, Router,
    http::{Method, StatusCode},
    middleware::from_fn,
    routing::{delete, get, post},
};
use sea_orm::DatabaseConnection;
use serde_json::json;
use std::sync::Arc;
use tokio::sync::mpsc;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::handlers::products::create_product,
        api::handlers::products::list_products,
        api::handlers::products::delete_product,
        api::handlers::upload::upload_image,
        api::handlers::events::storage_event,
        api::handlers::health::health_check,
    ),
    components(
        schemas(
            api::handlers::products::CreateProductRequest,
            api::handlers::products::CreateProductResponse,
            api::handlers::products::ProductResponse,
            api::handlers::products::MessageResponse,
            api::handlers::upload::UploadImageRequest,
            api::handlers::upload::UploadImageResponse,
            api::handlers::events::EventAck,
            api::handlers::health::HealthResponse,
        )
    ),
    tags(
        (name = "products", description = "Product catalog endpoints"),
        (name = "events", description = "Storage change intake"),
        (name = "system", description = "Health and diagnostics")
    )
)]
pub struct ApiDoc;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub objects: Arc<dyn ObjectStore>,
    pub records: Arc<dyn RecordStore>,
    /// One-way submission channel into the thumbnail worker
    pub events: mpsc::Sender<ObjectCreated>,
    pub config: AppConfig,
}

async fn fallback() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "message": "The requested path is not available or not found"
        })),
    )
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(api::handlers::health::health_check))
        .route("/product", post(api::handlers::products::create_product))
        .route("/products", get(api::handlers::products::list_products))
        .route(
            "/product/:product_id",
            delete(api::handlers::products::delete_product),
        )
        .route("/product/upload", post(api::handlers::upload::upload_image))
        .route("/events/storage", post(api::handlers::events::storage_event))
        .fallback(fallback)
        .layer(from_fn(api::middleware::request_id::request_id_middleware))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
                .allow_headers(Any),
        )
        .layer(axum::extract::DefaultBodyLimit::max(
            state.config.max_upload_size,
        ))
        .with_state(state)
}
