//! Point-to-point VXLAN tunnels between two inventory switches.
//!
//! A tunnel is never stored. Creation pushes a mirrored command batch to
//! each side (A first, then B) and reports progress as an ordered list of
//! phases; listing derives tunnels from the live flood lists.

use std::collections::HashMap;

use crate::eapi::commands::{self, VxlanConfig, DEFAULT_UDP_PORT};
use crate::eapi::queries::{self, VxlanState};
use crate::eapi::Connector;
use crate::models::*;
use crate::utils::{is_valid_interface_name, is_valid_ipv4, validate_vlan_id, validate_vni};

pub const PHASE_SESSIONS: &str = "Creating configuration sessions";
pub const PHASE_VERIFY: &str = "Verifying configuration";

/// One side of a validated tunnel request
#[derive(Debug, Clone)]
pub struct TunnelEndpoint {
    pub switch_id: String,
    pub vtep_ip: String,
    pub source_interface: Option<String>,
}

/// A tunnel request that passed validation
#[derive(Debug, Clone)]
pub struct TunnelParams {
    pub vni: u32,
    pub vlan_id: u16,
    pub a: TunnelEndpoint,
    pub b: TunnelEndpoint,
    pub rollback_on_failure: bool,
}

impl TunnelParams {
    /// Validate a request. The error is a client-facing message.
    pub fn from_request(req: &CreateTunnelRequest) -> Result<Self, String> {
        let (switch_a, switch_b) = match (non_blank(&req.switch_a), non_blank(&req.switch_b)) {
            (Some(a), Some(b)) => (a, b),
            _ => return Err("switchA and switchB are required".to_string()),
        };
        if switch_a == switch_b {
            return Err("switchA and switchB must be different switches".to_string());
        }
        let vni = req
            .vni
            .and_then(validate_vni)
            .ok_or("vni must be between 1 and 16777215")?;
        let vlan_id = req
            .vlan_id
            .and_then(validate_vlan_id)
            .ok_or("vlanId must be between 1 and 4094")?;
        let (vtep_a, vtep_b) = match (non_blank(&req.vtep_ip_a), non_blank(&req.vtep_ip_b)) {
            (Some(a), Some(b)) if is_valid_ipv4(a) && is_valid_ipv4(b) => (a, b),
            _ => return Err("vtepIpA and vtepIpB must be valid IPv4 addresses".to_string()),
        };
        if vtep_a == vtep_b {
            return Err("vtepIpA and vtepIpB must differ".to_string());
        }

        let source_a = normalize_interface(req.source_interface_a.as_deref(), "sourceInterfaceA")?;
        let source_b = normalize_interface(req.source_interface_b.as_deref(), "sourceInterfaceB")?;

        Ok(Self {
            vni,
            vlan_id,
            a: TunnelEndpoint {
                switch_id: switch_a.to_string(),
                vtep_ip: vtep_a.to_string(),
                source_interface: source_a,
            },
            b: TunnelEndpoint {
                switch_id: switch_b.to_string(),
                vtep_ip: vtep_b.to_string(),
                source_interface: source_b,
            },
            rollback_on_failure: req.rollback_on_failure.unwrap_or(true),
        })
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn normalize_interface(value: Option<&str>, field: &str) -> Result<Option<String>, String> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(name) if is_valid_interface_name(name) => Ok(Some(name.to_string())),
        Some(_) => Err(format!("{} is not a valid interface name", field)),
    }
}

fn side_commands(params: &TunnelParams, local: &TunnelEndpoint, remote: &TunnelEndpoint) -> Vec<String> {
    let flood = [remote.vtep_ip.clone()];
    commands::configure_vxlan(&VxlanConfig {
        vni: params.vni,
        vlan_id: params.vlan_id,
        source_interface: local.source_interface.as_deref(),
        udp_port: DEFAULT_UDP_PORT,
        flood_vteps: &flood,
        create_vlan: true,
    })
}

fn endpoint_plan(
    params: &TunnelParams,
    switch: &Switch,
    local: &TunnelEndpoint,
    remote: &TunnelEndpoint,
) -> TunnelEndpointPlan {
    TunnelEndpointPlan {
        switch_id: switch.id.clone(),
        hostname: switch.display_name().to_string(),
        mgmt_ip: switch.mgmt_ip.clone(),
        vtep_ip: local.vtep_ip.clone(),
        remote_vtep_ip: remote.vtep_ip.clone(),
        commands: side_commands(params, local, remote),
    }
}

/// Build both command batches without touching either switch
pub fn plan(params: &TunnelParams, switch_a: &Switch, switch_b: &Switch) -> TunnelPreview {
    TunnelPreview {
        vni: params.vni,
        vlan_id: params.vlan_id,
        switch_a: endpoint_plan(params, switch_a, &params.a, &params.b),
        switch_b: endpoint_plan(params, switch_b, &params.b, &params.a),
    }
}

fn phase(name: &str, status: &str, progress: u8, error: Option<String>) -> TunnelPhase {
    TunnelPhase {
        name: name.to_string(),
        status: status.to_string(),
        progress,
        error,
    }
}

async fn push(connector: &dyn Connector, switch: &Switch, cmds: &[String]) -> anyhow::Result<()> {
    let runner = connector.connect(switch)?;
    queries::apply(runner.as_ref(), cmds).await?;
    Ok(())
}

/// Configure both sides of a tunnel, A then B.
///
/// The first failure stops the sequence: phases already run are kept and a
/// failed phase is appended last. If B fails after A succeeded, B's VTEP is
/// taken back out of A's flood list (when enabled) and reported separately.
pub async fn create_tunnel(
    connector: &dyn Connector,
    params: &TunnelParams,
    switch_a: &Switch,
    switch_b: &Switch,
) -> TunnelResult {
    let preview = plan(params, switch_a, switch_b);
    let mut phases = vec![phase(PHASE_SESSIONS, phase_status::COMPLETED, 25, None)];

    let name_a = format!("Configuring {}", switch_a.display_name());
    if let Err(e) = push(connector, switch_a, &preview.switch_a.commands).await {
        let message = e.to_string();
        tracing::error!("Tunnel VNI {}: switch {} failed: {}", params.vni, switch_a.id, message);
        phases.push(phase(&name_a, phase_status::FAILED, 50, Some(message.clone())));
        return failed(phases, message, None);
    }
    phases.push(phase(&name_a, phase_status::COMPLETED, 50, None));

    let name_b = format!("Configuring {}", switch_b.display_name());
    if let Err(e) = push(connector, switch_b, &preview.switch_b.commands).await {
        let message = e.to_string();
        tracing::error!("Tunnel VNI {}: switch {} failed: {}", params.vni, switch_b.id, message);
        phases.push(phase(&name_b, phase_status::FAILED, 75, Some(message.clone())));

        let rollback = if params.rollback_on_failure {
            Some(roll_back(connector, params, switch_a).await)
        } else {
            tracing::warn!(
                "Tunnel VNI {}: rollback disabled, {} keeps a one-sided flood entry",
                params.vni,
                switch_a.id
            );
            None
        };
        return failed(phases, message, rollback);
    }
    phases.push(phase(&name_b, phase_status::COMPLETED, 75, None));

    phases.push(phase(PHASE_VERIFY, phase_status::COMPLETED, 100, None));
    tracing::info!(
        "Tunnel VNI {} created between {} and {}",
        params.vni,
        switch_a.display_name(),
        switch_b.display_name()
    );

    TunnelResult {
        status: tunnel_status::SUCCESS.to_string(),
        phases,
        tunnel: Some(preview),
        error: None,
        rollback: None,
    }
}

fn failed(phases: Vec<TunnelPhase>, error: String, rollback: Option<RollbackReport>) -> TunnelResult {
    TunnelResult {
        status: tunnel_status::FAILED.to_string(),
        phases,
        tunnel: None,
        error: Some(error),
        rollback,
    }
}

async fn roll_back(connector: &dyn Connector, params: &TunnelParams, switch_a: &Switch) -> RollbackReport {
    let cmds = commands::remove_flood_vtep(params.vlan_id, &params.b.vtep_ip);
    match push(connector, switch_a, &cmds).await {
        Ok(()) => {
            tracing::info!("Tunnel VNI {}: rolled back {}", params.vni, switch_a.id);
            RollbackReport {
                switch_id: switch_a.id.clone(),
                status: phase_status::COMPLETED.to_string(),
                commands: cmds,
                error: None,
            }
        }
        Err(e) => {
            tracing::error!("Tunnel VNI {}: rollback of {} failed: {}", params.vni, switch_a.id, e);
            RollbackReport {
                switch_id: switch_a.id.clone(),
                status: phase_status::FAILED.to_string(),
                commands: cmds,
                error: Some(e.to_string()),
            }
        }
    }
}

/// Tunnels seen from one switch: one entry per (VNI, remote flood VTEP)
pub fn local_tunnels(switch: &Switch, state: &VxlanState) -> Vec<Tunnel> {
    state
        .bindings
        .iter()
        .flat_map(|b| {
            b.flood_vteps.iter().map(move |remote| Tunnel {
                id: uuid::Uuid::new_v4().to_string(),
                vni: b.vni,
                vlan_id: b.vlan_id,
                status: tunnel_status::CONFIGURED.to_string(),
                local_switch_id: switch.id.clone(),
                local_hostname: switch.display_name().to_string(),
                local_vtep: state.local_vtep.clone(),
                remote_vtep: remote.clone(),
                remote_switch_id: None,
                remote_hostname: None,
            })
        })
        .collect()
}

/// Read one switch's VXLAN state and project its tunnels
pub async fn switch_tunnels(connector: &dyn Connector, switch: &Switch) -> anyhow::Result<Vec<Tunnel>> {
    let runner = connector.connect(switch)?;
    let state = queries::show_vxlan(runner.as_ref()).await?;
    Ok(local_tunnels(switch, &state))
}

/// Pair one-sided entries across switches. Two entries form a complete
/// tunnel when they share a VNI and each floods to the other's local VTEP;
/// anything left over is partial.
pub fn pair_tunnels(states: &[(Switch, VxlanState)]) -> Vec<Tunnel> {
    let mut by_vtep: HashMap<&str, &Switch> = HashMap::new();
    for (sw, state) in states {
        if let Some(vtep) = state.local_vtep.as_deref() {
            by_vtep.insert(vtep, sw);
        }
    }

    let mut entries: Vec<Tunnel> = states
        .iter()
        .flat_map(|(sw, state)| local_tunnels(sw, state))
        .collect();

    for entry in entries.iter_mut() {
        if let Some(remote) = by_vtep.get(entry.remote_vtep.as_str()) {
            entry.remote_switch_id = Some(remote.id.clone());
            entry.remote_hostname = Some(remote.display_name().to_string());
        }
    }

    let mut used = vec![false; entries.len()];
    let mut tunnels = Vec::new();
    for i in 0..entries.len() {
        if used[i] {
            continue;
        }
        used[i] = true;
        let partner = (i + 1..entries.len()).find(|&j| {
            !used[j]
                && entries[j].vni == entries[i].vni
                && entries[i].local_vtep.as_deref() == Some(entries[j].remote_vtep.as_str())
                && entries[j].local_vtep.as_deref() == Some(entries[i].remote_vtep.as_str())
        });

        let mut tunnel = entries[i].clone();
        tunnel.status = match partner {
            Some(j) => {
                used[j] = true;
                tunnel_status::COMPLETE.to_string()
            }
            None => tunnel_status::PARTIAL.to_string(),
        };
        tunnels.push(tunnel);
    }
    tunnels
}

/// Read every switch concurrently and pair their tunnels
pub async fn all_tunnels(connector: &dyn Connector, switches: Vec<Switch>) -> TunnelListResponse {
    let (states, errors) = queries::read_all(switches, |sw| async move {
        let runner = connector.connect(&sw)?;
        queries::show_vxlan(runner.as_ref()).await
    })
    .await;

    TunnelListResponse {
        tunnels: pair_tunnels(&states),
        errors,
    }
}
