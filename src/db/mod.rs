mod switches;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::Mutex;

use crate::models::Switch;

/// Typed error for "resource not found"; the API error handler
/// downcasts to it to answer 404.
#[derive(Debug)]
pub struct NotFoundError {
    pub resource: String,
    pub id: String,
}

impl NotFoundError {
    pub fn new(resource: &str, id: &str) -> Self {
        Self {
            resource: resource.to_string(),
            id: id.to_string(),
        }
    }
}

impl std::fmt::Display for NotFoundError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} not found: {}", self.resource, self.id)
    }
}

impl std::error::Error for NotFoundError {}

/// Typed error for a write that would break a uniqueness rule; maps to 409
#[derive(Debug)]
pub struct ConflictError {
    pub message: String,
}

impl ConflictError {
    pub fn duplicate_mgmt_ip(mgmt_ip: &str) -> Self {
        Self {
            message: format!("switch with management address {} already exists", mgmt_ip),
        }
    }
}

impl std::fmt::Display for ConflictError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ConflictError {}

/// On-disk shape of the switches file
#[derive(Debug, Default, Serialize, Deserialize)]
struct Inventory {
    #[serde(default)]
    switches: Vec<Switch>,
}

/// Store persists the switch inventory as a single JSON file.
/// Every operation re-reads the whole file; mutations rewrite it.
#[derive(Clone)]
pub struct Store {
    path: Arc<PathBuf>,
    write_lock: Arc<Mutex<()>>,
}

impl Store {
    /// Open the inventory at `path`, creating an empty one if absent
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .await
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
        }

        let store = Self {
            path: Arc::new(path),
            write_lock: Arc::new(Mutex::new(())),
        };

        if fs::metadata(store.path()).await.is_err() {
            tracing::info!("Creating empty switch inventory at {}", store.path().display());
            store.save(&Inventory::default()).await?;
        }

        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Inventory> {
        let data = fs::read_to_string(self.path())
            .await
            .with_context(|| format!("Failed to read {}", self.path().display()))?;

        if data.trim().is_empty() {
            return Ok(Inventory::default());
        }

        serde_json::from_str(&data)
            .with_context(|| format!("Failed to parse {}", self.path().display()))
    }

    /// Write to a sibling temp file, then rename over the inventory
    async fn save(&self, inventory: &Inventory) -> Result<()> {
        let data = serde_json::to_string_pretty(inventory)?;
        let file_name = self
            .path()
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "switches.json".to_string());
        let tmp = self.path().with_file_name(format!(".{}.tmp", file_name));

        fs::write(&tmp, data)
            .await
            .with_context(|| format!("Failed to write {}", tmp.display()))?;
        fs::rename(&tmp, self.path())
            .await
            .with_context(|| format!("Failed to replace {}", self.path().display()))?;
        Ok(())
    }

    /// Run a read-modify-write cycle under the store's write lock
    async fn mutate<T>(&self, f: impl FnOnce(&mut Inventory) -> Result<T>) -> Result<T> {
        let _guard = self.write_lock.lock().await;
        let mut inventory = self.load().await?;
        let out = f(&mut inventory)?;
        self.save(&inventory).await?;
        Ok(out)
    }
}
