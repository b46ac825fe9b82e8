use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::AppState;
use crate::api::error::ApiError;
use crate::entities::products;

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub product_name: String,
    #[serde(default)]
    pub product_description: String,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductResponse {
    pub product_id: String,
    pub message: String,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub product_id: String,
    pub product_name: String,
    pub product_description: String,
    pub product_image_uri: String,
}

impl From<products::Model> for ProductResponse {
    fn from(model: products::Model) -> Self {
        Self {
            product_id: model.product_id,
            product_name: model.name,
            product_description: model.description,
            product_image_uri: model.image_uri,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[utoipa::path(
    post,
    path = "/product",
    request_body = CreateProductRequest,
    responses(
        (status = 200, description = "Product created successfully", body = CreateProductResponse)
    ),
    tag = "products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    Json(req): Json<CreateProductRequest>,
) -> Result<Json<CreateProductResponse>, ApiError> {
    let product_id = Uuid::new_v4().to_string();

    state
        .records
        .create_product(&product_id, &req.product_name, &req.product_description)
        .await?;

    info!(%product_id, "🛒 Product created");

    Ok(Json(CreateProductResponse {
        product_id,
        message: "Product created successfully".to_string(),
    }))
}

#[utoipa::path(
    get,
    path = "/products",
    responses(
        (status = 200, description = "All products", body = [ProductResponse])
    ),
    tag = "products"
)]
pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductResponse>>, ApiError> {
    let products = state.records.list_products().await?;

    Ok(Json(products.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    delete,
    path = "/product/{product_id}",
    params(
        ("product_id" = String, Path, description = "Product identifier")
    ),
    responses(
        (status = 200, description = "Product deleted successfully", body = MessageResponse)
    ),
    tag = "products"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    // Stored objects are not cascade-deleted; only the record goes
    state.records.delete_product(&product_id).await?;

    info!(%product_id, "🗑️  Product deleted");

    Ok(Json(MessageResponse {
        message: "Product deleted successfully".to_string(),
    }))
}
