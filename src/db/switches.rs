use anyhow::Result;
use chrono::Utc;

use crate::models::*;

use super::{ConflictError, Inventory, NotFoundError, Store};

/// Mint a timestamp-based id that is unique within the inventory
fn next_switch_id(inventory: &Inventory) -> String {
    let mut candidate = Utc::now().timestamp_millis();
    while inventory.switches.iter().any(|s| s.id == candidate.to_string()) {
        candidate += 1;
    }
    candidate.to_string()
}

impl Store {
    pub async fn list_switches(&self) -> Result<Vec<Switch>> {
        Ok(self.load().await?.switches)
    }

    pub async fn get_switch(&self, id: &str) -> Result<Option<Switch>> {
        Ok(self
            .load()
            .await?
            .switches
            .into_iter()
            .find(|s| s.id == id))
    }

    /// Persist a switch whose connectivity has already been verified.
    /// Management addresses are unique across the inventory.
    pub async fn create_switch(&self, candidate: &Switch, facts: &SwitchFacts) -> Result<Switch> {
        self.mutate(|inventory| {
            if inventory.switches.iter().any(|s| s.mgmt_ip == candidate.mgmt_ip) {
                return Err(ConflictError::duplicate_mgmt_ip(&candidate.mgmt_ip).into());
            }

            let now = Utc::now();
            let hostname = if candidate.hostname.is_empty() {
                facts.hostname.clone()
            } else {
                candidate.hostname.clone()
            };

            let switch = Switch {
                id: next_switch_id(inventory),
                hostname,
                mgmt_ip: candidate.mgmt_ip.clone(),
                username: candidate.username.clone(),
                password: candidate.password.clone(),
                model: facts.model.clone(),
                eos_version: facts.eos_version.clone(),
                uptime: facts.uptime.clone(),
                status: switch_status::ONLINE.to_string(),
                last_seen: Some(now),
                last_error: None,
                created_at: Some(now),
                updated_at: Some(now),
            };
            inventory.switches.push(switch.clone());
            Ok(switch)
        })
        .await
    }

    pub async fn update_switch(&self, id: &str, req: &UpdateSwitchRequest) -> Result<Switch> {
        self.mutate(|inventory| {
            if let Some(ip) = &req.mgmt_ip {
                if inventory.switches.iter().any(|s| s.id != id && &s.mgmt_ip == ip) {
                    return Err(ConflictError::duplicate_mgmt_ip(ip).into());
                }
            }

            let switch = inventory
                .switches
                .iter_mut()
                .find(|s| s.id == id)
                .ok_or_else(|| NotFoundError::new("Switch", id))?;

            if let Some(v) = &req.hostname {
                switch.hostname = v.clone();
            }
            if let Some(v) = &req.mgmt_ip {
                switch.mgmt_ip = v.clone();
            }
            if let Some(v) = &req.username {
                switch.username = v.clone();
            }
            if let Some(v) = &req.password {
                switch.password = v.clone();
            }
            if let Some(v) = &req.model {
                switch.model = v.clone();
            }
            if let Some(v) = &req.eos_version {
                switch.eos_version = v.clone();
            }
            if let Some(v) = &req.uptime {
                switch.uptime = v.clone();
            }
            if let Some(v) = &req.status {
                switch.status = v.clone();
            }
            switch.updated_at = Some(Utc::now());
            Ok(switch.clone())
        })
        .await
    }

    /// Record the outcome of a connectivity probe
    pub async fn update_switch_status(
        &self,
        id: &str,
        status: &str,
        facts: Option<&SwitchFacts>,
        error: Option<&str>,
    ) -> Result<Switch> {
        self.mutate(|inventory| {
            let switch = inventory
                .switches
                .iter_mut()
                .find(|s| s.id == id)
                .ok_or_else(|| NotFoundError::new("Switch", id))?;

            switch.status = status.to_string();
            switch.last_error = error.map(|e| e.to_string());
            if let Some(facts) = facts {
                if switch.hostname.is_empty() {
                    switch.hostname = facts.hostname.clone();
                }
                if !facts.model.is_empty() {
                    switch.model = facts.model.clone();
                }
                if !facts.eos_version.is_empty() {
                    switch.eos_version = facts.eos_version.clone();
                }
                switch.uptime = facts.uptime.clone();
                switch.last_seen = Some(Utc::now());
            }
            Ok(switch.clone())
        })
        .await
    }

    pub async fn delete_switch(&self, id: &str) -> Result<()> {
        self.mutate(|inventory| {
            let before = inventory.switches.len();
            inventory.switches.retain(|s| s.id != id);
            if inventory.switches.len() == before {
                return Err(NotFoundError::new("Switch", id).into());
            }
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn create_req(ip: &str) -> Switch {
        Switch::candidate(None, ip, "admin", "arista")
    }

    fn facts(hostname: &str) -> SwitchFacts {
        SwitchFacts {
            hostname: hostname.to_string(),
            model: "cEOSLab".to_string(),
            eos_version: "4.30.1F".to_string(),
            uptime: "1h 2m".to_string(),
        }
    }

    #[tokio::test]
    async fn test_open_creates_empty_inventory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config").join("switches.json");
        let store = Store::open(&path).await.unwrap();

        let raw = tokio::fs::read_to_string(&path).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value, serde_json::json!({ "switches": [] }));
        assert!(store.list_switches().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_open_keeps_existing_inventory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("switches.json");
        tokio::fs::write(
            &path,
            r#"{"switches":[{"id":"1","hostname":"leaf1","mgmtIP":"10.0.0.1","username":"admin","password":"pw"}]}"#,
        )
        .await
        .unwrap();

        let store = Store::open(&path).await.unwrap();
        let switches = store.list_switches().await.unwrap();
        assert_eq!(switches.len(), 1);
        assert_eq!(switches[0].status, switch_status::UNKNOWN);
    }

    #[tokio::test]
    async fn test_create_uses_probed_hostname() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("switches.json")).await.unwrap();

        let sw = store.create_switch(&create_req("10.0.0.1"), &facts("leaf1")).await.unwrap();
        assert_eq!(sw.hostname, "leaf1");
        assert_eq!(sw.status, switch_status::ONLINE);
        assert_eq!(sw.eos_version, "4.30.1F");

        let fetched = store.get_switch(&sw.id).await.unwrap().unwrap();
        assert_eq!(fetched.mgmt_ip, "10.0.0.1");
        assert_eq!(fetched.password, "arista");
    }

    #[tokio::test]
    async fn test_ids_are_unique() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("switches.json")).await.unwrap();

        let a = store.create_switch(&create_req("10.0.0.1"), &facts("a")).await.unwrap();
        let b = store.create_switch(&create_req("10.0.0.2"), &facts("b")).await.unwrap();
        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn test_update_is_shallow_merge() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("switches.json")).await.unwrap();
        let sw = store.create_switch(&create_req("10.0.0.1"), &facts("leaf1")).await.unwrap();

        let req = UpdateSwitchRequest {
            hostname: Some("leaf1-renamed".to_string()),
            ..Default::default()
        };
        let updated = store.update_switch(&sw.id, &req).await.unwrap();
        assert_eq!(updated.hostname, "leaf1-renamed");
        assert_eq!(updated.mgmt_ip, "10.0.0.1");
        assert_eq!(updated.password, "arista");
        assert_eq!(updated.model, "cEOSLab");
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("switches.json")).await.unwrap();

        let err = store
            .update_switch("nope", &UpdateSwitchRequest::default())
            .await
            .unwrap_err();
        assert!(err.downcast_ref::<NotFoundError>().is_some());
    }

    #[tokio::test]
    async fn test_update_status_records_error() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("switches.json")).await.unwrap();
        let sw = store.create_switch(&create_req("10.0.0.1"), &facts("leaf1")).await.unwrap();

        let updated = store
            .update_switch_status(&sw.id, switch_status::OFFLINE, None, Some("connection refused"))
            .await
            .unwrap();
        assert_eq!(updated.status, switch_status::OFFLINE);
        assert_eq!(updated.last_error.as_deref(), Some("connection refused"));
        assert_eq!(updated.uptime, "1h 2m");
    }

    #[tokio::test]
    async fn test_delete() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("switches.json")).await.unwrap();
        let sw = store.create_switch(&create_req("10.0.0.1"), &facts("leaf1")).await.unwrap();

        tokio_test::assert_ok!(store.delete_switch(&sw.id).await);
        assert!(store.get_switch(&sw.id).await.unwrap().is_none());

        let err = store.delete_switch(&sw.id).await.unwrap_err();
        assert!(err.downcast_ref::<NotFoundError>().is_some());
    }

    #[tokio::test]
    async fn test_concurrent_creates_are_all_persisted() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("switches.json")).await.unwrap();

        let mut handles = Vec::new();
        for i in 0..8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                let req = create_req(&format!("10.0.0.{}", i + 1));
                store.create_switch(&req, &facts(&format!("sw{}", i))).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let switches = store.list_switches().await.unwrap();
        assert_eq!(switches.len(), 8);
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_mgmt_ip() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("switches.json")).await.unwrap();
        store.create_switch(&create_req("10.0.0.1"), &facts("leaf1")).await.unwrap();

        let err = store
            .create_switch(&create_req("10.0.0.1"), &facts("leaf1-again"))
            .await
            .unwrap_err();
        assert!(err.downcast_ref::<ConflictError>().is_some());
        assert_eq!(store.list_switches().await.unwrap().len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creates_of_one_address_store_one() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("switches.json")).await.unwrap();

        let mut handles = Vec::new();
        for i in 0..8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.create_switch(&create_req("10.0.0.9"), &facts(&format!("sw{}", i))).await
            }));
        }
        let mut stored = 0;
        let mut conflicts = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => stored += 1,
                Err(e) if e.downcast_ref::<ConflictError>().is_some() => conflicts += 1,
                Err(e) => panic!("unexpected error: {}", e),
            }
        }
        assert_eq!((stored, conflicts), (1, 7));
        assert_eq!(store.list_switches().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_rejects_address_of_another_switch() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("switches.json")).await.unwrap();
        let a = store.create_switch(&create_req("10.0.0.1"), &facts("a")).await.unwrap();
        store.create_switch(&create_req("10.0.0.2"), &facts("b")).await.unwrap();

        let req = UpdateSwitchRequest {
            mgmt_ip: Some("10.0.0.2".to_string()),
            ..Default::default()
        };
        let err = store.update_switch(&a.id, &req).await.unwrap_err();
        assert!(err.downcast_ref::<ConflictError>().is_some());

        // Keeping its own address is not a conflict
        let req = UpdateSwitchRequest {
            mgmt_ip: Some("10.0.0.1".to_string()),
            ..Default::default()
        };
        tokio_test::assert_ok!(store.update_switch(&a.id, &req).await);
    }
}
