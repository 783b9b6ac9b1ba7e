//! In-memory switches for tests: records every batch and replays canned output.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::client::{CommandRunner, Connector};
use super::error::EapiError;
use super::types::OutputFormat;
use crate::models::Switch;

#[derive(Default)]
struct FakeState {
    calls: Vec<(String, Vec<String>)>,
    /// (host, command that triggers the failure) -> message
    failures: HashMap<(String, String), String>,
    /// (host, command) -> JSON output
    responses: HashMap<(String, String), Value>,
}

#[derive(Clone, Default)]
pub struct FakeConnector {
    state: Arc<Mutex<FakeState>>,
}

impl FakeConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Any batch sent to `host` that contains `cmd` fails with `message`.
    /// Rules for different commands on one host accumulate.
    pub fn fail_on(&self, host: &str, cmd: &str, message: &str) {
        self.state
            .lock()
            .unwrap()
            .failures
            .insert((host.to_string(), cmd.to_string()), message.to_string());
    }

    pub fn respond(&self, host: &str, cmd: &str, output: Value) {
        self.state
            .lock()
            .unwrap()
            .responses
            .insert((host.to_string(), cmd.to_string()), output);
    }

    /// Standard identity output for `show version` / `show hostname`
    pub fn respond_identity(&self, host: &str, hostname: &str) {
        self.respond(host, "show hostname", json!({"hostname": hostname, "fqdn": hostname}));
        self.respond(
            host,
            "show version",
            json!({"modelName": "cEOSLab", "version": "4.30.1F", "uptime": 7200.0}),
        );
    }

    pub fn calls(&self) -> Vec<(String, Vec<String>)> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn calls_to(&self, host: &str) -> Vec<Vec<String>> {
        self.calls()
            .into_iter()
            .filter(|(h, _)| h == host)
            .map(|(_, cmds)| cmds)
            .collect()
    }
}

impl Connector for FakeConnector {
    fn connect(&self, switch: &Switch) -> anyhow::Result<Arc<dyn CommandRunner>> {
        Ok(Arc::new(FakeRunner {
            host: switch.mgmt_ip.clone(),
            state: self.state.clone(),
        }))
    }
}

struct FakeRunner {
    host: String,
    state: Arc<Mutex<FakeState>>,
}

#[async_trait]
impl CommandRunner for FakeRunner {
    async fn run_cmds(&self, cmds: &[String], _format: OutputFormat) -> Result<Vec<Value>, EapiError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push((self.host.clone(), cmds.to_vec()));

        let failure = cmds
            .iter()
            .find_map(|c| state.failures.get(&(self.host.clone(), c.clone())));
        if let Some(message) = failure {
            return Err(EapiError::Rpc {
                host: self.host.clone(),
                code: 1002,
                message: message.clone(),
                details: vec![],
            });
        }

        Ok(cmds
            .iter()
            .map(|c| {
                state
                    .responses
                    .get(&(self.host.clone(), c.clone()))
                    .cloned()
                    .unwrap_or_else(|| json!({}))
            })
            .collect())
    }

    fn host(&self) -> &str {
        &self.host
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn switch(ip: &str) -> Switch {
        Switch::candidate(None, ip, "admin", "pw")
    }

    #[tokio::test]
    async fn test_failure_rules_accumulate_per_host() {
        let fake = FakeConnector::new();
        fake.fail_on("10.0.0.1", "show vlan", "vlan read failed");
        fake.fail_on("10.0.0.1", "show version", "version read failed");
        let runner = fake.connect(&switch("10.0.0.1")).unwrap();

        let err = runner
            .run_cmds(&["show vlan".to_string()], OutputFormat::Json)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("vlan read failed"));

        let err = runner
            .run_cmds(&["show version".to_string()], OutputFormat::Json)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("version read failed"));

        let ok = runner
            .run_cmds(&["show hostname".to_string()], OutputFormat::Json)
            .await
            .unwrap();
        assert_eq!(ok, vec![json!({})]);
    }
}
