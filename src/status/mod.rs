use futures::future::join_all;
use std::sync::Arc;
use tokio::time::{interval, Duration};

use crate::db::Store;
use crate::eapi::{queries, Connector};
use crate::models::{switch_status, Switch};

/// Status checker periodically probes switches over eAPI to refresh cached status
pub struct StatusChecker {
    store: Store,
    connector: Arc<dyn Connector>,
    interval_secs: u64,
    stop_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl StatusChecker {
    pub fn new(store: Store, connector: Arc<dyn Connector>, interval_secs: u64) -> Self {
        Self {
            store,
            connector,
            interval_secs,
            stop_tx: None,
        }
    }

    /// Start the status checker. An interval of zero leaves it disabled.
    pub fn start(&mut self) {
        if self.interval_secs == 0 {
            tracing::info!("Status checker disabled");
            return;
        }

        let (stop_tx, mut stop_rx) = tokio::sync::oneshot::channel();
        self.stop_tx = Some(stop_tx);

        let store = self.store.clone();
        let connector = self.connector.clone();
        let interval_secs = self.interval_secs;

        tokio::spawn(async move {
            let mut ticker = interval(Duration::from_secs(interval_secs));

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if let Err(e) = check_all_switches(&store, connector.as_ref()).await {
                            tracing::warn!("Error checking switch status: {}", e);
                        }
                    }
                    _ = &mut stop_rx => {
                        tracing::info!("Status checker stopped");
                        break;
                    }
                }
            }
        });
    }

    /// Stop the status checker
    pub fn stop(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
    }
}

async fn check_all_switches(store: &Store, connector: &dyn Connector) -> anyhow::Result<()> {
    let switches = store.list_switches().await?;

    let results = join_all(switches.iter().map(|sw| refresh_switch(store, connector, sw))).await;
    for (sw, result) in switches.iter().zip(results) {
        if let Err(e) = result {
            tracing::warn!("Failed to record status for switch {}: {}", sw.id, e);
        }
    }

    Ok(())
}

/// Probe one switch and persist the outcome. A probe failure is not an
/// error here: the switch is stored as offline with the failure text.
pub async fn refresh_switch(store: &Store, connector: &dyn Connector, switch: &Switch) -> anyhow::Result<Switch> {
    let probe = match connector.connect(switch) {
        Ok(runner) => queries::probe(runner.as_ref()).await,
        Err(e) => Err(e),
    };

    match probe {
        Ok(facts) => {
            if switch.status != switch_status::ONLINE {
                tracing::info!("Switch {} ({}) is online", switch.display_name(), switch.id);
            }
            store
                .update_switch_status(&switch.id, switch_status::ONLINE, Some(&facts), None)
                .await
        }
        Err(e) => {
            if switch.status != switch_status::OFFLINE {
                tracing::warn!("Switch {} ({}) is offline: {}", switch.display_name(), switch.id, e);
            }
            store
                .update_switch_status(&switch.id, switch_status::OFFLINE, None, Some(&e.to_string()))
                .await
        }
    }
}
