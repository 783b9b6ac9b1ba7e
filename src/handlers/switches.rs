use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::db::ConflictError;
use crate::eapi::queries;
use crate::models::*;
use crate::utils::{is_valid_hostname, is_valid_mgmt_address};
use crate::AppState;

use super::extract::{JsonBody, PathParams};
use super::{created, load_switch, ApiError, MessageResponse};

/// List all switches
pub async fn list_switches(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<SwitchSummary>>, ApiError> {
    let switches = state.store.list_switches().await?;
    Ok(Json(switches.iter().map(SwitchSummary::from).collect()))
}

/// Get a single switch by ID
pub async fn get_switch(
    State(state): State<Arc<AppState>>,
    PathParams(id): PathParams<String>,
) -> Result<Json<SwitchSummary>, ApiError> {
    let switch = load_switch(&state, &id).await?;
    Ok(Json(SwitchSummary::from(&switch)))
}

/// Add a switch. Connectivity is tested first; nothing is stored if the
/// switch cannot be reached with the given credentials.
pub async fn create_switch(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<CreateSwitchRequest>,
) -> Result<(StatusCode, Json<SwitchSummary>), ApiError> {
    let mgmt_ip = req.mgmt_ip.as_deref().map(str::trim).unwrap_or_default();
    let username = req.username.as_deref().unwrap_or_default();
    let password = req.password.as_deref().unwrap_or_default();

    if mgmt_ip.is_empty() || username.is_empty() || password.is_empty() {
        return Err(ApiError::bad_request("mgmtIP, username, and password are required"));
    }
    if !is_valid_mgmt_address(mgmt_ip) {
        return Err(ApiError::bad_request("invalid management address"));
    }
    let hostname = req.hostname.as_deref().map(str::trim).filter(|h| !h.is_empty());
    if let Some(hostname) = hostname {
        if !is_valid_hostname(hostname) {
            return Err(ApiError::bad_request("invalid hostname: only alphanumeric, hyphens, dots, and underscores allowed"));
        }
    }

    // Skip the probe for an address that is already known. The store
    // re-checks under its lock, so a concurrent add still gets a 409.
    let existing = state.store.list_switches().await?;
    if existing.iter().any(|s| s.mgmt_ip == mgmt_ip) {
        return Err(ApiError::conflict(ConflictError::duplicate_mgmt_ip(mgmt_ip).to_string()));
    }

    let candidate = Switch::candidate(hostname, mgmt_ip, username, password);
    let runner = state.connector.connect(&candidate)?;
    let facts = queries::probe(runner.as_ref())
        .await
        .map_err(|e| ApiError::internal(format!("Failed to connect to switch: {}", e)))?;

    let switch = state.store.create_switch(&candidate, &facts).await?;
    tracing::info!("Added switch {} ({}) at {}", switch.display_name(), switch.id, switch.mgmt_ip);
    Ok(created(SwitchSummary::from(&switch)))
}

/// Update an existing switch (shallow merge)
pub async fn update_switch(
    State(state): State<Arc<AppState>>,
    PathParams(id): PathParams<String>,
    JsonBody(req): JsonBody<UpdateSwitchRequest>,
) -> Result<Json<SwitchSummary>, ApiError> {
    if let Some(ip) = req.mgmt_ip.as_deref() {
        if !is_valid_mgmt_address(ip) {
            return Err(ApiError::bad_request("invalid management address"));
        }
    }
    if let Some(hostname) = req.hostname.as_deref().filter(|h| !h.is_empty()) {
        if !is_valid_hostname(hostname) {
            return Err(ApiError::bad_request("invalid hostname: only alphanumeric, hyphens, dots, and underscores allowed"));
        }
    }
    if let Some(status) = req.status.as_deref() {
        if ![switch_status::ONLINE, switch_status::OFFLINE, switch_status::UNKNOWN].contains(&status) {
            return Err(ApiError::bad_request("status must be one of: online, offline, unknown"));
        }
    }
    if matches!(req.username.as_deref(), Some("")) || matches!(req.password.as_deref(), Some("")) {
        return Err(ApiError::bad_request("username and password cannot be empty"));
    }

    let switch = state.store.update_switch(&id, &req).await?;
    Ok(Json(SwitchSummary::from(&switch)))
}

/// Delete a switch
pub async fn delete_switch(
    State(state): State<Arc<AppState>>,
    PathParams(id): PathParams<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.store.delete_switch(&id).await?;
    tracing::info!("Deleted switch {}", id);
    Ok(MessageResponse::new("Switch deleted"))
}

/// Re-probe a switch and refresh its cached status and facts
pub async fn refresh_switch(
    State(state): State<Arc<AppState>>,
    PathParams(id): PathParams<String>,
) -> Result<Json<SwitchSummary>, ApiError> {
    let switch = load_switch(&state, &id).await?;
    let switch = crate::status::refresh_switch(&state.store, state.connector.as_ref(), &switch).await?;
    Ok(Json(SwitchSummary::from(&switch)))
}
