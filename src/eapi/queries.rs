use anyhow::{Context, Result};
use futures::future::join_all;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::future::Future;

use super::client::CommandRunner;
use super::error::EapiError;
use super::types::*;
use crate::models::{Switch, SwitchFacts, SwitchQueryError, Vlan, Vxlan};
use crate::utils::format_uptime;

/// Run one show command and decode its JSON output
pub async fn run_json<T: DeserializeOwned>(runner: &dyn CommandRunner, cmd: &str) -> Result<T> {
    let mut out = runner
        .run_cmds(&[cmd.to_string()], OutputFormat::Json)
        .await?;
    let value = out.pop().unwrap_or_default();
    serde_json::from_value(value)
        .with_context(|| format!("Unexpected '{}' output from {}", cmd, runner.host()))
}

/// Push a configuration batch, discarding the (empty) per-command results
pub async fn apply(runner: &dyn CommandRunner, cmds: &[String]) -> Result<(), EapiError> {
    runner.run_cmds(cmds, OutputFormat::Json).await.map(|_| ())
}

/// Run a read against every switch concurrently. Switches that fail are
/// logged and returned as errors instead of failing the whole read.
pub async fn read_all<T, F, Fut>(switches: Vec<Switch>, read: F) -> (Vec<(Switch, T)>, Vec<SwitchQueryError>)
where
    F: Fn(Switch) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let reads = join_all(switches.iter().cloned().map(read)).await;

    let mut found = Vec::new();
    let mut errors = Vec::new();
    for (switch, read) in switches.into_iter().zip(reads) {
        match read {
            Ok(value) => found.push((switch, value)),
            Err(e) => {
                tracing::warn!("Failed to query switch {}: {}", switch.id, e);
                errors.push(SwitchQueryError {
                    switch_id: switch.id,
                    hostname: switch.hostname,
                    error: e.to_string(),
                });
            }
        }
    }
    (found, errors)
}

/// Read identity facts used for inventory and status
pub async fn probe(runner: &dyn CommandRunner) -> Result<SwitchFacts> {
    let cmds = vec!["show version".to_string(), "show hostname".to_string()];
    let mut out = runner.run_cmds(&cmds, OutputFormat::Json).await?;
    let hostname: ShowHostname = serde_json::from_value(out.pop().unwrap_or_default())
        .with_context(|| format!("Unexpected 'show hostname' output from {}", runner.host()))?;
    let version: ShowVersion = serde_json::from_value(out.pop().unwrap_or_default())
        .with_context(|| format!("Unexpected 'show version' output from {}", runner.host()))?;

    Ok(SwitchFacts {
        hostname: hostname.hostname,
        model: version.model_name,
        eos_version: version.version,
        uptime: format_uptime(version.uptime),
    })
}

/// VLANs configured on a switch, ordered by id
pub async fn show_vlans(runner: &dyn CommandRunner, switch: &Switch) -> Result<Vec<Vlan>> {
    let out: ShowVlan = run_json(runner, "show vlan").await?;
    Ok(project_vlans(switch, out))
}

fn project_vlans(switch: &Switch, out: ShowVlan) -> Vec<Vlan> {
    let mut vlans: Vec<Vlan> = out
        .vlans
        .into_iter()
        .filter_map(|(id, entry)| {
            let vlan_id = id.parse::<u16>().ok()?;
            Some(Vlan {
                switch_id: switch.id.clone(),
                hostname: switch.hostname.clone(),
                vlan_id,
                name: entry.name,
                status: entry.status,
                interfaces: entry.interfaces.into_keys().collect(),
            })
        })
        .collect();
    vlans.sort_by_key(|v| v.vlan_id);
    vlans
}

/// One VNI bound to a VLAN, with its head-end replication list
#[derive(Debug, Clone, PartialEq)]
pub struct VniBinding {
    pub vni: u32,
    pub vlan_id: u16,
    pub flood_vteps: Vec<String>,
}

/// VXLAN state of one switch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VxlanState {
    pub source_interface: Option<String>,
    pub local_vtep: Option<String>,
    pub bindings: Vec<VniBinding>,
}

/// Read VNI bindings and flood lists. A switch without a VXLAN interface
/// yields an empty state rather than an error.
pub async fn show_vxlan(runner: &dyn CommandRunner) -> Result<VxlanState> {
    let vnis: ShowVxlanVni = run_json(runner, "show vxlan vni").await?;
    let intf_name = match vnis.vxlan_intfs.keys().next() {
        Some(name) => name.clone(),
        None => return Ok(VxlanState::default()),
    };
    let intfs: ShowInterfacesVxlan =
        run_json(runner, &format!("show interfaces {}", intf_name)).await?;
    Ok(merge_vxlan(vnis, intfs))
}

/// Combine `show vxlan vni` with `show interfaces VxlanN`
pub fn merge_vxlan(vnis: ShowVxlanVni, intfs: ShowInterfacesVxlan) -> VxlanState {
    let mut state = VxlanState::default();
    let mut flood_by_vlan: BTreeMap<u16, Vec<String>> = BTreeMap::new();
    let mut vni_by_vlan: BTreeMap<u16, u32> = BTreeMap::new();

    if let Some(intf) = intfs.interfaces.into_values().next() {
        if !intf.src_ip_intf.is_empty() {
            state.source_interface = Some(intf.src_ip_intf);
        }
        if !intf.src_ip_addr.is_empty() && intf.src_ip_addr != "0.0.0.0" {
            state.local_vtep = Some(intf.src_ip_addr);
        }
        for (vlan, list) in intf.vlan_to_vtep_list {
            if let Ok(vlan) = vlan.parse::<u16>() {
                flood_by_vlan.insert(vlan, list.remote_vtep_addr);
            }
        }
        for (vlan, map) in intf.vlan_to_vni_map {
            if let (Ok(vlan), Some(vni)) = (vlan.parse::<u16>(), map.vni) {
                vni_by_vlan.insert(vlan, vni);
            }
        }
    }

    for intf in vnis.vxlan_intfs.into_values() {
        for (vni, binding) in intf.vni_bindings {
            if let (Ok(vni), Some(vlan)) = (vni.parse::<u32>(), binding.vlan) {
                vni_by_vlan.insert(vlan, vni);
            }
        }
    }

    state.bindings = vni_by_vlan
        .into_iter()
        .map(|(vlan_id, vni)| VniBinding {
            vni,
            vlan_id,
            flood_vteps: flood_by_vlan.remove(&vlan_id).unwrap_or_default(),
        })
        .collect();
    state.bindings.sort_by_key(|b| b.vni);
    state
}

/// Project a switch's VXLAN state into API records
pub fn project_vxlans(switch: &Switch, state: &VxlanState) -> Vec<Vxlan> {
    state
        .bindings
        .iter()
        .map(|b| Vxlan {
            switch_id: switch.id.clone(),
            hostname: switch.hostname.clone(),
            vni: b.vni,
            vlan_id: b.vlan_id,
            source_interface: state.source_interface.clone(),
            local_vtep: state.local_vtep.clone(),
            flood_vteps: b.flood_vteps.clone(),
        })
        .collect()
}
