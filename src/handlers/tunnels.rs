use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use crate::models::*;
use crate::tunnels::{self, TunnelParams};
use crate::AppState;

use super::extract::{JsonBody, PathParams};
use super::{load_switch, ApiError};

/// Switches that can terminate a tunnel
pub async fn list_tunnel_switches(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<SwitchSummary>>, ApiError> {
    let switches = state.store.list_switches().await?;
    Ok(Json(switches.iter().map(SwitchSummary::from).collect()))
}

async fn resolve_pair(state: &Arc<AppState>, params: &TunnelParams) -> Result<(Switch, Switch), ApiError> {
    let switch_a = load_switch(state, &params.a.switch_id).await?;
    let switch_b = load_switch(state, &params.b.switch_id).await?;
    Ok((switch_a, switch_b))
}

/// Show the command batches a tunnel would push, without touching any switch
pub async fn preview_tunnel(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<CreateTunnelRequest>,
) -> Result<Json<TunnelPreview>, ApiError> {
    let params = TunnelParams::from_request(&req).map_err(ApiError::bad_request)?;
    let (switch_a, switch_b) = resolve_pair(&state, &params).await?;
    Ok(Json(tunnels::plan(&params, &switch_a, &switch_b)))
}

/// Create a tunnel. A failed run answers 500 with the full phase list.
pub async fn create_tunnel(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<CreateTunnelRequest>,
) -> Result<Response, ApiError> {
    let params = TunnelParams::from_request(&req).map_err(ApiError::bad_request)?;
    let (switch_a, switch_b) = resolve_pair(&state, &params).await?;

    let result = tunnels::create_tunnel(state.connector.as_ref(), &params, &switch_a, &switch_b).await;
    let status = if result.status == tunnel_status::SUCCESS {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    Ok((status, Json(result)).into_response())
}

/// Tunnels across the whole inventory, paired into complete/partial
pub async fn list_all_tunnels(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TunnelListResponse>, ApiError> {
    let switches = state.store.list_switches().await?;
    Ok(Json(tunnels::all_tunnels(state.connector.as_ref(), switches).await))
}

/// Tunnels configured on one switch
pub async fn list_switch_tunnels(
    State(state): State<Arc<AppState>>,
    PathParams(switch_id): PathParams<String>,
) -> Result<Json<Vec<Tunnel>>, ApiError> {
    let switch = load_switch(&state, &switch_id).await?;
    let found = tunnels::switch_tunnels(state.connector.as_ref(), &switch).await?;
    Ok(Json(found))
}
