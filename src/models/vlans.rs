use serde::{Deserialize, Serialize};

/// Vlan is a read projection of `show vlan` on one switch
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vlan {
    pub switch_id: String,
    pub hostname: String,
    pub vlan_id: u16,
    pub name: String,
    pub status: String,
    pub interfaces: Vec<String>,
}

/// CreateVlanRequest for creating a VLAN on a switch
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVlanRequest {
    #[serde(default, deserialize_with = "super::lenient::int")]
    pub vlan_id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
}

/// A switch that could not be queried during a multi-switch read
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchQueryError {
    pub switch_id: String,
    pub hostname: String,
    pub error: String,
}

/// VlanListResponse aggregates VLANs across the inventory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VlanListResponse {
    pub vlans: Vec<Vlan>,
    pub errors: Vec<SwitchQueryError>,
}
