//! Orchestrates instance provisioning and deprovisioning.
//!
//! The provisioning workflow submits a create request, then polls the
//! provider at a fixed cadence until the instance reports the active
//! status. Transient fetch failures are expected while the provider is
//! still converging and do not abort the loop; the attempt budget bounds
//! the total wait to `budget x interval`. Once active, the instance's
//! address and identifier are persisted through the credentials writer.

use std::time::Duration;

use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::backend::{InstanceBackend, InstanceHandle, InstanceSnapshot, InstanceSpec};
use crate::credentials::{CredentialsError, CredentialsWriter};

/// Status string the provider reports once provisioning has finished.
const ACTIVE_STATUS: &str = "active";

const POLL_INTERVAL: Duration = Duration::from_secs(5);
const POLL_BUDGET: u32 = 60;

/// Errors surfaced while provisioning or deprovisioning an instance.
#[derive(Debug, Error)]
pub enum ProvisionError<BackendError>
where
    BackendError: std::error::Error + 'static,
{
    /// Raised when the create request fails.
    #[error("failed to create instance: {0}")]
    Create(#[source] BackendError),
    /// Raised when the poll budget is exhausted without an active
    /// instance, or the active instance never exposes an address. An
    /// instance without a resolvable address is useless to the caller
    /// regardless of its reported status.
    #[error("instance {instance_id} had no usable address after {attempts} polls")]
    AddressUnresolved {
        /// Provider instance identifier.
        instance_id: String,
        /// Number of fetch attempts performed.
        attempts: u32,
    },
    /// Raised when the credentials artifact cannot be written.
    #[error("failed to record instance credentials: {0}")]
    Persist(#[source] CredentialsError),
    /// Raised when the delete request fails.
    #[error("failed to destroy instance: {0}")]
    Destroy(#[source] BackendError),
}

/// Successful provisioning result.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProvisionedHost {
    /// Provider instance identifier.
    pub instance_id: String,
    /// Primary IPv4 address of the instance.
    pub address: String,
}

/// Drives the provisioning state machine using the provided backend and
/// credentials writer.
#[derive(Debug)]
pub struct ProvisionOrchestrator<B, W> {
    backend: B,
    writer: W,
    poll_interval: Duration,
    poll_budget: u32,
}

impl<B, W> ProvisionOrchestrator<B, W>
where
    B: InstanceBackend,
    W: CredentialsWriter,
{
    /// Creates a new orchestrator with the default polling policy.
    #[must_use]
    pub const fn new(backend: B, writer: W) -> Self {
        Self {
            backend,
            writer,
            poll_interval: POLL_INTERVAL,
            poll_budget: POLL_BUDGET,
        }
    }

    /// Overrides the inter-attempt polling delay.
    ///
    /// This is primarily used by tests to keep timeout scenarios fast.
    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Overrides the maximum number of fetch attempts.
    ///
    /// This is primarily used by tests to keep timeout scenarios fast.
    #[must_use]
    pub const fn with_poll_budget(mut self, budget: u32) -> Self {
        self.poll_budget = budget;
        self
    }

    /// Provisions an instance and records its credentials once active.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisionError`] when the create call fails, the instance
    /// never reports a usable address within the poll budget, or the
    /// credentials artifact cannot be written. No artifact is written on
    /// any failure path.
    pub async fn provision(
        &self,
        spec: &InstanceSpec,
    ) -> Result<ProvisionedHost, ProvisionError<B::Error>> {
        let handle = self
            .backend
            .create(spec)
            .await
            .map_err(ProvisionError::Create)?;
        info!(instance_id = %handle.id, "instance created, waiting for it to become active");

        let (snapshot, attempts) = self.wait_for_active(&handle).await?;
        let Some(address) = snapshot.main_ip.filter(|ip| !ip.is_empty()) else {
            return Err(ProvisionError::AddressUnresolved {
                instance_id: handle.id,
                attempts,
            });
        };

        let path = self
            .writer
            .write(&address, &handle.id)
            .map_err(ProvisionError::Persist)?;
        info!(instance_id = %handle.id, %address, %path, "instance active, credentials written");

        Ok(ProvisionedHost {
            instance_id: handle.id,
            address,
        })
    }

    /// Deletes an instance.
    ///
    /// A delete failure is surfaced immediately; the target state (absence
    /// of the resource) cannot be confirmed without a fetch this workflow
    /// does not perform.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisionError::Destroy`] when the delete call fails.
    pub async fn deprovision(&self, instance_id: &str) -> Result<(), ProvisionError<B::Error>> {
        let handle = InstanceHandle {
            id: instance_id.to_owned(),
        };
        self.backend
            .destroy(handle)
            .await
            .map_err(ProvisionError::Destroy)?;
        info!(%instance_id, "instance deleted");
        Ok(())
    }

    /// Polls the backend until the instance reports the active status,
    /// returning the snapshot together with the number of attempts spent.
    ///
    /// The first active snapshot ends polling immediately. A failed fetch
    /// is logged and tolerated; the loop only gives up once the attempt
    /// budget is spent.
    async fn wait_for_active(
        &self,
        handle: &InstanceHandle,
    ) -> Result<(InstanceSnapshot, u32), ProvisionError<B::Error>> {
        for attempt in 1..=self.poll_budget {
            sleep(self.poll_interval).await;

            match self.backend.fetch(handle).await {
                Ok(snapshot) if snapshot.status == ACTIVE_STATUS => {
                    debug!(attempt, instance_id = %handle.id, "instance reported active");
                    return Ok((snapshot, attempt));
                }
                Ok(snapshot) => {
                    debug!(attempt, instance_id = %handle.id, status = %snapshot.status, "instance not active yet");
                }
                Err(err) => {
                    warn!(attempt, instance_id = %handle.id, error = %err, "instance fetch failed, will retry");
                }
            }
        }

        Err(ProvisionError::AddressUnresolved {
            instance_id: handle.id.clone(),
            attempts: self.poll_budget,
        })
    }
}
