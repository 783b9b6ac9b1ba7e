pub mod extract;
pub mod switches;
#[cfg(test)]
pub(crate) mod test_support;
pub mod tunnels;
pub mod vlans;
pub mod vxlans;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;

use crate::models::{Switch, SwitchQueryError};
use crate::AppState;

/// Error response - the console frontend expects {"error": "message"}
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// API error type
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.into(),
        }
    }

    pub fn not_found(resource: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: format!("{} not found", resource),
        }
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::CONFLICT,
            message: msg.into(),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!("{}", self.message);
        }
        (
            self.status,
            Json(ErrorResponse::new(self.message)),
        )
            .into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        // Check for typed NotFoundError first (no fragile string matching)
        if let Some(nf) = err.downcast_ref::<crate::db::NotFoundError>() {
            return Self {
                status: StatusCode::NOT_FOUND,
                message: nf.to_string(),
            };
        }
        if let Some(conflict) = err.downcast_ref::<crate::db::ConflictError>() {
            return Self::conflict(conflict.to_string());
        }
        Self::internal(err.to_string())
    }
}

impl From<crate::eapi::EapiError> for ApiError {
    fn from(err: crate::eapi::EapiError) -> Self {
        Self::internal(err.to_string())
    }
}

/// Message response for simple status messages
#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(msg: impl Into<String>) -> Json<Self> {
        Json(Self { message: msg.into() })
    }
}

/// Response for a configuration batch pushed to a switch
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigResponse {
    pub message: String,
    pub switch_id: String,
    pub commands: Vec<String>,
}

/// Response helper: return 201 Created with JSON body
pub fn created<T: Serialize>(item: T) -> (StatusCode, Json<T>) {
    (StatusCode::CREATED, Json(item))
}

/// Healthcheck endpoint, returns 200 OK with status
pub async fn healthcheck() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "arista-console",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Look up a switch or fail with 404
pub async fn load_switch(state: &Arc<AppState>, id: &str) -> Result<Switch, ApiError> {
    state
        .store
        .get_switch(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Switch"))
}

/// Per-switch list read across the inventory, flattened into one list
pub async fn fan_out<T, F, Fut>(switches: Vec<Switch>, read: F) -> (Vec<T>, Vec<SwitchQueryError>)
where
    F: Fn(Switch) -> Fut,
    Fut: Future<Output = anyhow::Result<Vec<T>>>,
{
    let (found, errors) = crate::eapi::queries::read_all(switches, read).await;
    (found.into_iter().flat_map(|(_, items)| items).collect(), errors)
}
