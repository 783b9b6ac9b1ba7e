//! CLI command batches sent through `runCmds`.
//!
//! Every configuration batch is wrapped in `enable` / `configure` ... `end`
//! so it runs as a single privileged config session.

/// The VXLAN interface every batch targets
pub const VXLAN_INTERFACE: &str = "Vxlan1";

/// IANA VXLAN port
pub const DEFAULT_UDP_PORT: u16 = 4789;

fn config_session(body: Vec<String>) -> Vec<String> {
    let mut cmds = Vec::with_capacity(body.len() + 3);
    cmds.push("enable".to_string());
    cmds.push("configure".to_string());
    cmds.extend(body);
    cmds.push("end".to_string());
    cmds
}

pub fn create_vlan(vlan_id: u16, name: Option<&str>) -> Vec<String> {
    let mut body = vec![format!("vlan {}", vlan_id)];
    if let Some(name) = name {
        body.push(format!("name {}", name));
    }
    config_session(body)
}

pub fn delete_vlan(vlan_id: u16) -> Vec<String> {
    config_session(vec![format!("no vlan {}", vlan_id)])
}

/// Parameters for a VLAN-to-VNI mapping on the VXLAN interface
#[derive(Debug, Clone)]
pub struct VxlanConfig<'a> {
    pub vni: u32,
    pub vlan_id: u16,
    pub source_interface: Option<&'a str>,
    pub udp_port: u16,
    pub flood_vteps: &'a [String],
    /// Also create the VLAN before mapping it
    pub create_vlan: bool,
}

pub fn configure_vxlan(cfg: &VxlanConfig<'_>) -> Vec<String> {
    let mut body = Vec::new();
    if cfg.create_vlan {
        body.push(format!("vlan {}", cfg.vlan_id));
    }
    body.push(format!("interface {}", VXLAN_INTERFACE));
    if let Some(src) = cfg.source_interface {
        body.push(format!("vxlan source-interface {}", src));
    }
    body.push(format!("vxlan udp-port {}", cfg.udp_port));
    body.push(format!("vxlan vlan {} vni {}", cfg.vlan_id, cfg.vni));
    if !cfg.flood_vteps.is_empty() {
        body.push(format!(
            "vxlan vlan {} flood vtep add {}",
            cfg.vlan_id,
            cfg.flood_vteps.join(" ")
        ));
    }
    config_session(body)
}

/// Drop a VNI mapping and its flood list
pub fn remove_vxlan(vlan_id: u16, vni: u32) -> Vec<String> {
    config_session(vec![
        format!("interface {}", VXLAN_INTERFACE),
        format!("no vxlan vlan {} flood vtep", vlan_id),
        format!("no vxlan vlan {} vni {}", vlan_id, vni),
    ])
}

/// Take a single remote VTEP out of a VLAN's flood list
pub fn remove_flood_vtep(vlan_id: u16, vtep: &str) -> Vec<String> {
    config_session(vec![
        format!("interface {}", VXLAN_INTERFACE),
        format!("vxlan vlan {} flood vtep remove {}", vlan_id, vtep),
    ])
}
