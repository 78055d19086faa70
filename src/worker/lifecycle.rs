//! Worker lifecycle: install, activate and skip-waiting.

use serde::Serialize;
use tracing::{error, info};

use crate::error::Result;
use crate::worker::ServiceWorker;

/// Lifecycle states. Fetches are only intercepted once `Activated`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkerState {
    Parsed,
    Installing,
    /// Installed and waiting to activate
    Installed,
    Activating,
    Activated,
    /// Install failed; this worker never serves requests
    Redundant,
}

impl ServiceWorker {
    /// Pre-caches the static routes into the static partition and marks the
    /// worker to activate without waiting.
    ///
    /// Fails, leaving the worker redundant, if any route cannot be fetched.
    pub async fn install(&self) -> Result<()> {
        self.set_state(WorkerState::Installing).await;

        let requests = match self.static_requests() {
            Ok(requests) => requests,
            Err(e) => {
                self.set_state(WorkerState::Redundant).await;
                return Err(e);
            }
        };

        if let Err(e) = self
            .storage()
            .add_all(self.static_cache(), &requests, self.network())
            .await
        {
            error!(error = %e, "install failed, static assets not cached");
            self.set_state(WorkerState::Redundant).await;
            return Err(e);
        }

        info!(
            partition = self.static_cache(),
            count = requests.len(),
            "static assets pre-cached"
        );
        self.set_state(WorkerState::Installed).await;
        self.skip_waiting();
        Ok(())
    }

    /// Deletes every partition that is not a current one, then claims all
    /// clients. Returns the names of the deleted partitions.
    pub async fn activate(&self) -> Vec<String> {
        self.set_state(WorkerState::Activating).await;

        let mut deleted = Vec::new();
        for name in self.storage().keys().await {
            if name != self.static_cache() && name != self.dynamic_cache() {
                self.storage().delete(&name).await;
                info!(partition = %name, "deleted old cache partition");
                deleted.push(name);
            }
        }

        self.claim_clients();
        self.set_state(WorkerState::Activated).await;
        info!("worker activated");
        deleted
    }

    /// Installs then, as skip-waiting is always requested, activates.
    pub async fn start(&self) -> Result<Vec<String>> {
        self.install().await?;
        Ok(self.activate().await)
    }
}
