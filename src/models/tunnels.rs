use serde::{Deserialize, Serialize};

use super::SwitchQueryError;

/// Canonical phase status values
pub mod phase_status {
    pub const COMPLETED: &str = "completed";
    pub const FAILED: &str = "failed";
}

/// Canonical tunnel status values
pub mod tunnel_status {
    pub const SUCCESS: &str = "success";
    pub const FAILED: &str = "failed";
    /// Read from a single switch; the far side was not checked
    pub const CONFIGURED: &str = "configured";
    /// Both switches flood to each other for the VNI
    pub const COMPLETE: &str = "complete";
    /// Only one side floods to the other
    pub const PARTIAL: &str = "partial";
}

/// CreateTunnelRequest describes a point-to-point VXLAN tunnel between two switches
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTunnelRequest {
    #[serde(default)]
    pub switch_a: Option<String>,
    #[serde(default)]
    pub switch_b: Option<String>,
    #[serde(default, deserialize_with = "super::lenient::int")]
    pub vni: Option<i64>,
    #[serde(default, deserialize_with = "super::lenient::int")]
    pub vlan_id: Option<i64>,
    #[serde(default)]
    pub vtep_ip_a: Option<String>,
    #[serde(default)]
    pub vtep_ip_b: Option<String>,
    #[serde(default)]
    pub source_interface_a: Option<String>,
    #[serde(default)]
    pub source_interface_b: Option<String>,
    #[serde(default)]
    pub rollback_on_failure: Option<bool>,
}

/// One step of the tunnel creation flow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TunnelPhase {
    pub name: String,
    pub status: String,
    pub progress: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Commands planned for one side of a tunnel
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TunnelEndpointPlan {
    pub switch_id: String,
    pub hostname: String,
    #[serde(rename = "mgmtIP")]
    pub mgmt_ip: String,
    pub vtep_ip: String,
    pub remote_vtep_ip: String,
    pub commands: Vec<String>,
}

/// TunnelPreview is returned by the preview endpoint, no switch is touched
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TunnelPreview {
    pub vni: u32,
    pub vlan_id: u16,
    pub switch_a: TunnelEndpointPlan,
    pub switch_b: TunnelEndpointPlan,
}

/// Outcome of the compensating batch sent after a one-sided failure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollbackReport {
    pub switch_id: String,
    pub status: String,
    pub commands: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// TunnelResult is the aggregate outcome of a tunnel creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TunnelResult {
    pub status: String,
    pub phases: Vec<TunnelPhase>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tunnel: Option<TunnelPreview>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rollback: Option<RollbackReport>,
}

/// Tunnel is a synthetic view of a VNI flooded towards a remote VTEP.
/// The id is minted per request and carries no identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tunnel {
    pub id: String,
    pub vni: u32,
    pub vlan_id: u16,
    pub status: String,
    pub local_switch_id: String,
    pub local_hostname: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_vtep: Option<String>,
    pub remote_vtep: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_switch_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_hostname: Option<String>,
}

/// TunnelListResponse is the inventory-wide tunnel view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TunnelListResponse {
    pub tunnels: Vec<Tunnel>,
    pub errors: Vec<SwitchQueryError>,
}
