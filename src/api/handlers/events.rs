use axum::{Json, extract::State};
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info};
use utoipa::ToSchema;

use crate::AppState;
use crate::api::error::ApiError;
use crate::models::InboundEvent;

#[derive(Serialize, ToSchema)]
pub struct EventAck {
    pub message: String,
}

/// Storage-change intake. The payload is decoded into a typed event at
/// the boundary and submitted to the worker channel; the response never
/// reflects the pipeline outcome, which is observable only in logs.
#[utoipa::path(
    post,
    path = "/events/storage",
    responses(
        (status = 200, description = "Event accepted for processing", body = EventAck),
        (status = 404, description = "Payload does not match any known event shape")
    ),
    tag = "events"
)]
pub async fn storage_event(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<Json<EventAck>, ApiError> {
    let Some(event) = InboundEvent::decode(payload) else {
        return Err(ApiError::NotFound(
            "The requested path is not available or not found".to_string(),
        ));
    };

    match event {
        InboundEvent::ObjectCreated(created) => {
            info!(bucket = %created.bucket, key = %created.key, "📦 Storage change notification received");

            if state.events.send(created).await.is_err() {
                error!("Thumbnail worker channel closed, dropping event");
            }
        }
    }

    Ok(Json(EventAck {
        message: "accepted".to_string(),
    }))
}
