//! Instance resource operations against the Vultr API.
//!
//! Each operation is a single request/response mapping with no retry logic
//! of its own; retry policy lives in the provisioning workflow.

use reqwest::StatusCode;
use uuid::Uuid;

use crate::backend::InstanceSpec;

use super::types::{CreateInstanceRequest, Instance, InstanceEnvelope};
use super::{VultrApi, VultrApiError, decode};

pub(super) fn create_payload(spec: &InstanceSpec) -> CreateInstanceRequest {
    let label = spec
        .label
        .clone()
        .unwrap_or_else(|| format!("spinup-{}", Uuid::new_v4().simple()));
    CreateInstanceRequest {
        os_id: spec.os_id,
        label: Some(label),
        hostname: spec.hostname.clone(),
        region: spec.region.clone(),
        plan: spec.plan.clone(),
        backups: if spec.backups { "enabled" } else { "disabled" }.to_owned(),
        sshkey_id: spec.ssh_key_ids.clone(),
    }
}

impl VultrApi {
    /// Submits a create-instance request.
    ///
    /// The provider queues provisioning asynchronously and answers 202
    /// Accepted with an initial snapshot of the instance, including the
    /// one-time default password. The body is encoded before any request
    /// is built, so an encoding failure never reaches the network.
    ///
    /// # Errors
    ///
    /// Returns [`VultrApiError`] when the spec fails validation, the body
    /// cannot be encoded, the transport fails, the status is not 202, or
    /// the response does not decode.
    pub async fn create_instance(&self, spec: &InstanceSpec) -> Result<Instance, VultrApiError> {
        spec.validate()?;
        let url = format!("{}/instances", self.base_url);
        let body = serde_json::to_vec(&create_payload(spec))
            .map_err(|err| VultrApiError::RequestBuild(err.to_string()))?;

        let bytes = self
            .send_checked(self.client.post(&url).body(body), StatusCode::ACCEPTED)
            .await?;
        let parsed: InstanceEnvelope = decode(&bytes)?;
        Ok(parsed.instance)
    }

    /// Fetches a fresh snapshot of an instance by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`VultrApiError`] when the transport fails, the status is
    /// not 200, or the response does not decode.
    pub async fn get_instance(&self, id: &str) -> Result<Instance, VultrApiError> {
        let url = format!("{}/instances/{id}", self.base_url);
        let bytes = self
            .send_checked(self.client.get(&url), StatusCode::OK)
            .await?;
        let parsed: InstanceEnvelope = decode(&bytes)?;
        Ok(parsed.instance)
    }

    /// Deletes an instance by identifier.
    ///
    /// The provider answers 204 No Content once deletion is enacted; no
    /// body is decoded.
    ///
    /// # Errors
    ///
    /// Returns [`VultrApiError`] when the transport fails or the status is
    /// not 204.
    pub async fn delete_instance(&self, id: &str) -> Result<(), VultrApiError> {
        let url = format!("{}/instances/{id}", self.base_url);
        self.send_checked(self.client.delete(&url), StatusCode::NO_CONTENT)
            .await?;
        Ok(())
    }
}
