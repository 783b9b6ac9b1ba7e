use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Output format requested from `runCmds`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
}

// --- JSON-RPC envelope ---

#[derive(Debug, Serialize)]
pub struct RpcRequest<'a> {
    pub jsonrpc: &'static str,
    pub method: &'static str,
    pub params: RunCmdsParams<'a>,
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct RunCmdsParams<'a> {
    pub version: u32,
    pub cmds: &'a [String],
    pub format: OutputFormat,
}

impl<'a> RpcRequest<'a> {
    pub fn run_cmds(cmds: &'a [String], format: OutputFormat) -> Self {
        Self {
            jsonrpc: "2.0",
            method: "runCmds",
            params: RunCmdsParams {
                version: 1,
                cmds,
                format,
            },
            id: uuid::Uuid::new_v4().to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RpcResponse {
    #[serde(default)]
    pub result: Option<Vec<Value>>,
    #[serde(default)]
    pub error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
pub struct RpcError {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Vec<Value>,
}

impl RpcError {
    /// Per-command error strings carried in `error.data[*].errors`
    pub fn command_errors(&self) -> Vec<String> {
        self.data
            .iter()
            .filter_map(|entry| entry.get("errors").and_then(Value::as_array))
            .flatten()
            .filter_map(|e| e.as_str().map(str::to_string))
            .collect()
    }
}

// --- Command outputs (only the fields we read) ---

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShowVersion {
    pub model_name: String,
    pub version: String,
    pub uptime: f64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ShowHostname {
    pub hostname: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ShowVlan {
    /// Keyed by VLAN id as a string
    pub vlans: BTreeMap<String, VlanEntry>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct VlanEntry {
    pub name: String,
    pub status: String,
    pub interfaces: BTreeMap<String, Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShowVxlanVni {
    /// Keyed by interface name, e.g. `Vxlan1`
    pub vxlan_intfs: BTreeMap<String, VxlanIntfVnis>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VxlanIntfVnis {
    /// Keyed by VNI as a string
    pub vni_bindings: BTreeMap<String, VniBindingEntry>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct VniBindingEntry {
    pub vlan: Option<u16>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ShowInterfacesVxlan {
    pub interfaces: BTreeMap<String, VxlanInterface>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VxlanInterface {
    pub src_ip_intf: String,
    pub src_ip_addr: String,
    /// Keyed by VLAN id as a string
    pub vlan_to_vni_map: BTreeMap<String, VlanVni>,
    /// Keyed by VLAN id as a string
    pub vlan_to_vtep_list: BTreeMap<String, VtepList>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct VlanVni {
    pub vni: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VtepList {
    pub remote_vtep_addr: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_envelope() {
        let cmds = vec!["show version".to_string()];
        let req = RpcRequest::run_cmds(&cmds, OutputFormat::Json);
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["jsonrpc"], "2.0");
        assert_eq!(value["method"], "runCmds");
        assert_eq!(value["params"], json!({"version": 1, "cmds": ["show version"], "format": "json"}));
        assert!(value["id"].is_string());
    }

    #[test]
    fn test_command_errors() {
        let err: RpcError = serde_json::from_value(json!({
            "code": 1002,
            "message": "CLI command 3 of 3 'vlan 5000' failed: invalid command",
            "data": [{}, {}, {"errors": ["Invalid input (at token 1: '5000')"]}]
        }))
        .unwrap();
        assert_eq!(err.command_errors(), vec!["Invalid input (at token 1: '5000')"]);
    }

    #[test]
    fn test_parse_show_vlan() {
        let out: ShowVlan = serde_json::from_value(json!({
            "vlans": {
                "1": {"name": "default", "status": "active", "interfaces": {"Ethernet1": {"privatePromoted": false}}},
                "10": {"name": "TENANT_A", "status": "active", "interfaces": {}}
            },
            "sourceDetail": ""
        }))
        .unwrap();
        assert_eq!(out.vlans.len(), 2);
        assert_eq!(out.vlans["10"].name, "TENANT_A");
        assert!(out.vlans["1"].interfaces.contains_key("Ethernet1"));
    }

    #[test]
    fn test_parse_interfaces_vxlan() {
        let out: ShowInterfacesVxlan = serde_json::from_value(json!({
            "interfaces": {
                "Vxlan1": {
                    "srcIpIntf": "Loopback1",
                    "srcIpAddr": "1.1.1.1",
                    "udpPort": 4789,
                    "vlanToVniMap": {"10": {"vni": 10010}},
                    "vlanToVtepList": {"10": {"remoteVtepAddr": ["2.2.2.2"]}}
                }
            }
        }))
        .unwrap();
        let intf = &out.interfaces["Vxlan1"];
        assert_eq!(intf.src_ip_intf, "Loopback1");
        assert_eq!(intf.vlan_to_vni_map["10"].vni, Some(10010));
        assert_eq!(intf.vlan_to_vtep_list["10"].remote_vtep_addr, vec!["2.2.2.2"]);
    }
}
