use serde::{Deserialize, Serialize};

use super::SwitchQueryError;

/// Vxlan is a read projection of one VNI binding on a switch
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vxlan {
    pub switch_id: String,
    pub hostname: String,
    pub vni: u32,
    pub vlan_id: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_interface: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_vtep: Option<String>,
    pub flood_vteps: Vec<String>,
}

/// CreateVxlanRequest for mapping a VLAN to a VNI on a switch
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVxlanRequest {
    #[serde(default, deserialize_with = "super::lenient::int")]
    pub vni: Option<i64>,
    #[serde(default, deserialize_with = "super::lenient::int")]
    pub vlan_id: Option<i64>,
    #[serde(default)]
    pub source_interface: Option<String>,
    #[serde(default)]
    pub flood_vteps: Option<Vec<String>>,
    #[serde(default)]
    pub udp_port: Option<u16>,
}

/// VxlanListResponse aggregates VNI bindings across the inventory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VxlanListResponse {
    pub vxlans: Vec<Vxlan>,
    pub errors: Vec<SwitchQueryError>,
}
