use axum::{Json, extract::State};
use base64::{Engine as _, engine::general_purpose};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::AppState;
use crate::api::error::ApiError;
use crate::services::thumbnail::ORIGINAL_PREFIX;

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadImageRequest {
    pub product_id: String,
    /// Base64 image payload, optionally carrying a
    /// `data:image/jpeg;base64,` style prefix
    pub image: String,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadImageResponse {
    pub message: String,
    pub bucket: String,
    pub key: String,
}

/// Writes the original image to the source bucket under a timestamped
/// key carrying the product id. The thumbnail is NOT generated here:
/// the pipeline runs off the asynchronous storage-change notification,
/// so the derivative appears seconds later and clients are expected to
/// refresh after a delay.
#[utoipa::path(
    post,
    path = "/product/upload",
    request_body = UploadImageRequest,
    responses(
        (status = 200, description = "Original image stored", body = UploadImageResponse),
        (status = 400, description = "Payload is not valid base64")
    ),
    tag = "products"
)]
pub async fn upload_image(
    State(state): State<AppState>,
    Json(req): Json<UploadImageRequest>,
) -> Result<Json<UploadImageResponse>, ApiError> {
    let encoded = strip_data_uri_prefix(&req.image);
    let bytes = general_purpose::STANDARD
        .decode(encoded.trim())
        .map_err(|e| ApiError::BadRequest(format!("invalid base64 image payload: {e}")))?;

    let key = format!(
        "{}{}/{}.jpg",
        ORIGINAL_PREFIX,
        req.product_id,
        Utc::now().timestamp_millis()
    );

    state
        .objects
        .put_object(&state.config.source_bucket, &key, bytes, "image/jpeg")
        .await?;

    info!(bucket = %state.config.source_bucket, %key, "📤 Uploaded original product image");

    Ok(Json(UploadImageResponse {
        message: "Product image uploaded successfully".to_string(),
        bucket: state.config.source_bucket.clone(),
        key,
    }))
}

/// Browsers send canvas exports as data URIs; storage wants raw base64.
fn strip_data_uri_prefix(payload: &str) -> &str {
    match payload.split_once(";base64,") {
        Some((prefix, rest)) if prefix.starts_with("data:") => rest,
        _ => payload,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_data_uri_prefix() {
        assert_eq!(
            strip_data_uri_prefix("data:image/jpeg;base64,AAAA"),
            "AAAA"
        );
        assert_eq!(strip_data_uri_prefix("data:image/png;base64,BBBB"), "BBBB");
        assert_eq!(strip_data_uri_prefix("AAAA"), "AAAA");
        // Only data URIs are stripped
        assert_eq!(
            strip_data_uri_prefix("weird;base64,AAAA"),
            "weird;base64,AAAA"
        );
    }
}
