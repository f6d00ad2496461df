//! Vultr backend implementation of the instance lifecycle.
//!
//! All requests go through one [`reqwest::Client`] constructed with the
//! backend; the client owns the connection pool and is safe to reuse across
//! sequential calls, so it must not be rebuilt per request.

mod error;
mod instances;
mod ssh_keys;
mod types;

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

use crate::backend::{
    BackendFuture, InstanceBackend, InstanceHandle, InstanceSnapshot, InstanceSpec,
};

pub use error::VultrApiError;
pub use types::{Instance, ListLinks, ListMeta, SshKey, SshKeyList};

const VULTR_API_BASE: &str = "https://api.vultr.com/v2";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the Vultr v2 HTTP API.
#[derive(Clone)]
pub struct VultrApi {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl VultrApi {
    /// Constructs a new client with connection pooling and timeouts.
    ///
    /// The caller must have validated the token already; an empty token is
    /// rejected at configuration load, before any request is built.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(HTTP_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            client,
            api_key: api_key.into(),
            base_url: VULTR_API_BASE.to_owned(),
        }
    }

    /// Overrides the API base URL.
    ///
    /// This is primarily used by tests to point the client at a local
    /// server.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let mut base = base_url.into();
        while base.ends_with('/') {
            base.pop();
        }
        self.base_url = base;
        self
    }

    /// Attaches the bearer-token authorization header and JSON content
    /// type to an outgoing request. The token itself is never logged.
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .bearer_auth(&self.api_key)
            .header(CONTENT_TYPE, "application/json")
    }

    /// Sends an authorized request, validates the response status, and
    /// returns the raw body for the caller to decode.
    pub(crate) async fn send_checked(
        &self,
        request: RequestBuilder,
        expected: StatusCode,
    ) -> Result<Vec<u8>, VultrApiError> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|err| VultrApiError::Transport(err.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| VultrApiError::Transport(err.to_string()))?;

        check_status(status, expected, &String::from_utf8_lossy(&body))?;
        Ok(body.to_vec())
    }
}

/// Validates a response status against the code the operation expects.
///
/// Runs before any attempt to decode the body; decoding a non-success body
/// as a success schema is undefined and must be prevented. HTTP 401 maps to
/// the dedicated [`VultrApiError::Unauthorized`] kind for every operation,
/// since the remediation (allow-listing the caller's address) is
/// endpoint-independent.
pub(crate) fn check_status(
    got: StatusCode,
    expected: StatusCode,
    body: &str,
) -> Result<(), VultrApiError> {
    if got == expected {
        return Ok(());
    }
    if got == StatusCode::UNAUTHORIZED {
        return Err(VultrApiError::Unauthorized);
    }
    Err(VultrApiError::UnexpectedStatus {
        got: got.as_u16(),
        expected: expected.as_u16(),
        body: body.to_owned(),
    })
}

/// Decodes a response body into the expected envelope type.
pub(crate) fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, VultrApiError> {
    serde_json::from_slice(body).map_err(|err| VultrApiError::Decode(err.to_string()))
}

fn snapshot_of(instance: Instance) -> InstanceSnapshot {
    // The API reports an empty string (or 0.0.0.0) until an address is
    // actually assigned.
    let main_ip = Some(instance.main_ip).filter(|ip| !ip.is_empty() && ip != "0.0.0.0");
    InstanceSnapshot {
        id: instance.id,
        status: instance.status,
        main_ip,
    }
}

impl InstanceBackend for VultrApi {
    type Error = VultrApiError;

    fn create<'a>(
        &'a self,
        spec: &'a InstanceSpec,
    ) -> BackendFuture<'a, InstanceHandle, Self::Error> {
        Box::pin(async move {
            let instance = self.create_instance(spec).await?;
            Ok(InstanceHandle { id: instance.id })
        })
    }

    fn fetch<'a>(
        &'a self,
        handle: &'a InstanceHandle,
    ) -> BackendFuture<'a, InstanceSnapshot, Self::Error> {
        Box::pin(async move {
            let instance = self.get_instance(&handle.id).await?;
            Ok(snapshot_of(instance))
        })
    }

    fn destroy(&self, handle: InstanceHandle) -> BackendFuture<'_, (), Self::Error> {
        Box::pin(async move { self.delete_instance(&handle.id).await })
    }
}
