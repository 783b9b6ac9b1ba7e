use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Canonical switch status values
pub mod switch_status {
    pub const ONLINE: &str = "online";
    pub const OFFLINE: &str = "offline";
    pub const UNKNOWN: &str = "unknown";
}

/// Switch is one inventory record, as persisted in the switches file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Switch {
    pub id: String,
    #[serde(default)]
    pub hostname: String,
    #[serde(rename = "mgmtIP")]
    pub mgmt_ip: String,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub eos_version: String,
    #[serde(default)]
    pub uptime: String,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_seen: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_status() -> String {
    switch_status::UNKNOWN.to_string()
}

impl Switch {
    /// A switch that is not in the inventory yet; the store assigns its id
    pub fn candidate(hostname: Option<&str>, mgmt_ip: &str, username: &str, password: &str) -> Self {
        Self {
            id: String::new(),
            hostname: hostname.unwrap_or_default().to_string(),
            mgmt_ip: mgmt_ip.to_string(),
            username: username.to_string(),
            password: password.to_string(),
            model: String::new(),
            eos_version: String::new(),
            uptime: String::new(),
            status: default_status(),
            last_seen: None,
            last_error: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Hostname if known, otherwise the management address
    pub fn display_name(&self) -> &str {
        if self.hostname.is_empty() {
            &self.mgmt_ip
        } else {
            &self.hostname
        }
    }
}

/// SwitchSummary is the API view of a switch (credentials stripped)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchSummary {
    pub id: String,
    pub hostname: String,
    #[serde(rename = "mgmtIP")]
    pub mgmt_ip: String,
    pub username: String,
    pub model: String,
    pub eos_version: String,
    pub uptime: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_seen: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<&Switch> for SwitchSummary {
    fn from(sw: &Switch) -> Self {
        Self {
            id: sw.id.clone(),
            hostname: sw.hostname.clone(),
            mgmt_ip: sw.mgmt_ip.clone(),
            username: sw.username.clone(),
            model: sw.model.clone(),
            eos_version: sw.eos_version.clone(),
            uptime: sw.uptime.clone(),
            status: sw.status.clone(),
            last_seen: sw.last_seen,
            last_error: sw.last_error.clone(),
            created_at: sw.created_at,
            updated_at: sw.updated_at,
        }
    }
}

/// CreateSwitchRequest for adding a switch to the inventory
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSwitchRequest {
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default, rename = "mgmtIP")]
    pub mgmt_ip: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// UpdateSwitchRequest is a shallow merge: only provided fields change
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSwitchRequest {
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default, rename = "mgmtIP")]
    pub mgmt_ip: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub eos_version: Option<String>,
    #[serde(default)]
    pub uptime: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Facts reported by a switch when probed over eAPI
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchFacts {
    pub hostname: String,
    pub model: String,
    pub eos_version: String,
    pub uptime: String,
}
