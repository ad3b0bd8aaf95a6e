//! Condition JSON API
//!
//! Status mapping is a fixed passthrough: upstream 201 → 201, upstream
//! 204 → 204, anything else → 500 with a fixed message body.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::registry::{ConditionRow, NewCondition, Registry};

#[derive(Serialize)]
struct Message {
    message: &'static str,
}

/// GET /conditions/{patient_id} - Reduced condition list for a patient
pub async fn list(State(registry): State<Registry>, Path(patient_id): Path<String>) -> Response {
    match registry.conditions_for(&patient_id).await {
        Ok(conditions) => (StatusCode::OK, Json(conditions)).into_response(),
        Err(err) => {
            tracing::error!(patient_id, error = %err, "Condition list fetch failed");
            // Degrade to an empty array, not an error body
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(Vec::<ConditionRow>::new()),
            )
                .into_response()
        }
    }
}

/// POST /conditions - Create a free-text condition
pub async fn create(
    State(registry): State<Registry>,
    Json(request): Json<NewCondition>,
) -> impl IntoResponse {
    match registry.add_condition(request).await {
        Ok(()) => (
            StatusCode::CREATED,
            Json(Message {
                message: "Condition created successfully",
            }),
        ),
        Err(err) => {
            tracing::error!(error = %err, "Condition creation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(Message {
                    message: "Error creating condition",
                }),
            )
        }
    }
}

/// DELETE /conditions/{condition_id} - Proxy delete
pub async fn remove(State(registry): State<Registry>, Path(condition_id): Path<String>) -> Response {
    match registry.remove_condition(&condition_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => {
            tracing::error!(condition_id, error = %err, "Condition delete failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(Message {
                    message: "Error deleting condition",
                }),
            )
                .into_response()
        }
    }
}
