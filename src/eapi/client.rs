use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use super::error::EapiError;
use super::types::*;
use crate::models::Switch;

/// Executes batched CLI commands on one switch
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `cmds` in order and return one result per command
    async fn run_cmds(&self, cmds: &[String], format: OutputFormat) -> Result<Vec<Value>, EapiError>;

    /// Address of the switch this runner talks to
    fn host(&self) -> &str;
}

/// Builds a `CommandRunner` for an inventory switch
pub trait Connector: Send + Sync {
    fn connect(&self, switch: &Switch) -> anyhow::Result<Arc<dyn CommandRunner>>;
}

/// Arista eAPI client (JSON-RPC `runCmds` over HTTP(S) with basic auth)
pub struct EapiClient {
    host: String,
    endpoint: String,
    username: String,
    password: String,
    client: Client,
}

impl EapiClient {
    pub fn new(client: Client, protocol: &str, host: &str, username: &str, password: &str) -> Self {
        Self {
            host: host.to_string(),
            endpoint: format!("{}://{}/command-api", protocol, host),
            username: username.to_string(),
            password: password.to_string(),
            client,
        }
    }

    fn transport_error(&self, err: reqwest::Error) -> EapiError {
        let message = if err.is_timeout() {
            format!("timed out: {}", err)
        } else if err.is_connect() {
            format!("connection failed: {}", err)
        } else {
            err.to_string()
        };
        EapiError::Transport {
            host: self.host.clone(),
            message,
        }
    }
}

#[async_trait]
impl CommandRunner for EapiClient {
    async fn run_cmds(&self, cmds: &[String], format: OutputFormat) -> Result<Vec<Value>, EapiError> {
        tracing::debug!("eAPI {} runCmds {:?}", self.host, cmds);

        let resp = self
            .client
            .post(&self.endpoint)
            .basic_auth(&self.username, Some(&self.password))
            .json(&RpcRequest::run_cmds(cmds, format))
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| self.transport_error(e))?;

        // eAPI reports command failures inside a 200 body, but some EOS
        // releases answer with a 500 carrying a JSON-RPC error
        let parsed: Option<RpcResponse> = serde_json::from_str(&body).ok();
        if !status.is_success() && parsed.as_ref().and_then(|r| r.error.as_ref()).is_none() {
            return Err(EapiError::Http {
                host: self.host.clone(),
                status: status.as_u16(),
                body,
            });
        }

        let parsed = parsed.ok_or_else(|| EapiError::Malformed {
            host: self.host.clone(),
            message: format!("body is not a JSON-RPC response: {}", truncate(&body, 200)),
        })?;

        if let Some(err) = parsed.error {
            return Err(EapiError::Rpc {
                host: self.host.clone(),
                code: err.code,
                details: err.command_errors(),
                message: err.message,
            });
        }

        let result = parsed.result.ok_or_else(|| EapiError::Malformed {
            host: self.host.clone(),
            message: "missing result".to_string(),
        })?;

        if result.len() != cmds.len() {
            return Err(EapiError::Malformed {
                host: self.host.clone(),
                message: format!("expected {} results, got {}", cmds.len(), result.len()),
            });
        }

        Ok(result)
    }

    fn host(&self) -> &str {
        &self.host
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Connector that builds real eAPI clients sharing one HTTP connection pool
pub struct EapiConnector {
    protocol: String,
    client: Client,
}

impl EapiConnector {
    pub fn new(protocol: &str, insecure: bool, timeout_secs: u64) -> anyhow::Result<Self> {
        let mut builder = Client::builder().danger_accept_invalid_certs(insecure);
        if timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(timeout_secs));
        }
        let client = builder
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {}", e))?;

        Ok(Self {
            protocol: protocol.to_string(),
            client,
        })
    }
}

impl Connector for EapiConnector {
    fn connect(&self, switch: &Switch) -> anyhow::Result<Arc<dyn CommandRunner>> {
        if switch.mgmt_ip.is_empty() {
            anyhow::bail!("Switch {} has no management address", switch.id);
        }
        Ok(Arc::new(EapiClient::new(
            self.client.clone(),
            &self.protocol,
            &switch.mgmt_ip,
            &switch.username,
            &switch.password,
        )))
    }
}
