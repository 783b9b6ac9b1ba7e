use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::eapi::commands::{self, VxlanConfig, DEFAULT_UDP_PORT};
use crate::eapi::queries;
use crate::models::*;
use crate::utils::{is_valid_interface_name, is_valid_ipv4, validate_vlan_id, validate_vni};
use crate::AppState;

use super::extract::{JsonBody, PathParams};
use super::{created, fan_out, load_switch, ApiError, ConfigResponse};

/// List VNI bindings across every switch in the inventory
pub async fn list_all_vxlans(
    State(state): State<Arc<AppState>>,
) -> Result<Json<VxlanListResponse>, ApiError> {
    let switches = state.store.list_switches().await?;
    let (vxlans, errors) = fan_out(switches, |sw| {
        let connector = state.connector.clone();
        async move {
            let runner = connector.connect(&sw)?;
            let vxlan = queries::show_vxlan(runner.as_ref()).await?;
            Ok::<_, anyhow::Error>(queries::project_vxlans(&sw, &vxlan))
        }
    })
    .await;
    Ok(Json(VxlanListResponse { vxlans, errors }))
}

/// List VNI bindings on one switch
pub async fn list_switch_vxlans(
    State(state): State<Arc<AppState>>,
    PathParams(switch_id): PathParams<String>,
) -> Result<Json<Vec<Vxlan>>, ApiError> {
    let switch = load_switch(&state, &switch_id).await?;
    let runner = state.connector.connect(&switch)?;
    let vxlan = queries::show_vxlan(runner.as_ref()).await?;
    Ok(Json(queries::project_vxlans(&switch, &vxlan)))
}

/// Map a VLAN to a VNI on a switch, optionally seeding the flood list
pub async fn create_vxlan(
    State(state): State<Arc<AppState>>,
    PathParams(switch_id): PathParams<String>,
    JsonBody(req): JsonBody<CreateVxlanRequest>,
) -> Result<(StatusCode, Json<ConfigResponse>), ApiError> {
    let vni = req
        .vni
        .and_then(validate_vni)
        .ok_or_else(|| ApiError::bad_request("vni must be between 1 and 16777215"))?;
    let vlan_id = req
        .vlan_id
        .and_then(validate_vlan_id)
        .ok_or_else(|| ApiError::bad_request("vlanId must be between 1 and 4094"))?;
    let source_interface = req
        .source_interface
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());
    if let Some(src) = source_interface {
        if !is_valid_interface_name(src) {
            return Err(ApiError::bad_request("sourceInterface is not a valid interface name"));
        }
    }
    let flood_vteps = req.flood_vteps.unwrap_or_default();
    if let Some(bad) = flood_vteps.iter().find(|v| !is_valid_ipv4(v)) {
        return Err(ApiError::bad_request(format!("invalid flood VTEP address: {}", bad)));
    }
    if req.udp_port == Some(0) {
        return Err(ApiError::bad_request("udpPort must be between 1 and 65535"));
    }

    let switch = load_switch(&state, &switch_id).await?;
    let cmds = commands::configure_vxlan(&VxlanConfig {
        vni,
        vlan_id,
        source_interface,
        udp_port: req.udp_port.unwrap_or(DEFAULT_UDP_PORT),
        flood_vteps: &flood_vteps,
        create_vlan: false,
    });
    let runner = state.connector.connect(&switch)?;
    queries::apply(runner.as_ref(), &cmds).await?;

    tracing::info!("Mapped VLAN {} to VNI {} on {}", vlan_id, vni, switch.display_name());
    Ok(created(ConfigResponse {
        message: format!("VNI {} mapped to VLAN {}", vni, vlan_id),
        switch_id: switch.id,
        commands: cmds,
    }))
}

/// Remove a VNI mapping (and its flood list) from a switch
pub async fn delete_vxlan(
    State(state): State<Arc<AppState>>,
    PathParams((switch_id, vni)): PathParams<(String, i64)>,
) -> Result<Json<ConfigResponse>, ApiError> {
    let vni = validate_vni(vni)
        .ok_or_else(|| ApiError::bad_request("vni must be between 1 and 16777215"))?;

    let switch = load_switch(&state, &switch_id).await?;
    let runner = state.connector.connect(&switch)?;
    let vxlan = queries::show_vxlan(runner.as_ref()).await?;
    let binding = vxlan
        .bindings
        .iter()
        .find(|b| b.vni == vni)
        .ok_or_else(|| ApiError::not_found("VNI"))?;

    let cmds = commands::remove_vxlan(binding.vlan_id, vni);
    queries::apply(runner.as_ref(), &cmds).await?;

    tracing::info!("Removed VNI {} from {}", vni, switch.display_name());
    Ok(Json(ConfigResponse {
        message: format!("VNI {} removed", vni),
        switch_id: switch.id,
        commands: cmds,
    }))
}
