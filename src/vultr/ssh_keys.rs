//! SSH key resource operations against the Vultr API.

use reqwest::StatusCode;

use super::types::SshKeyList;
use super::{VultrApi, VultrApiError, decode};

impl VultrApi {
    /// Lists the SSH keys registered with the account.
    ///
    /// Only the first page is fetched; the pagination cursor is part of the
    /// returned metadata but is not followed automatically.
    ///
    /// # Errors
    ///
    /// Returns [`VultrApiError`] when the transport fails, the status is
    /// not 200, or the response does not decode.
    pub async fn list_ssh_keys(&self) -> Result<SshKeyList, VultrApiError> {
        let url = format!("{}/ssh-keys", self.base_url);
        let bytes = self
            .send_checked(self.client.get(&url), StatusCode::OK)
            .await?;
        decode(&bytes)
    }
}
