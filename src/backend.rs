//! Backend abstraction for provisioning disposable virtual machines.

use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

/// Parameters required to create a new instance.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InstanceSpec {
    /// Provider identifier of the operating system image to install.
    pub os_id: u32,
    /// Target region code (for example `fra`).
    pub region: String,
    /// Plan or SKU code describing the instance sizing (for example
    /// `vc2-1c-1gb`).
    pub plan: String,
    /// Optional human readable label shown in the provider console.
    pub label: Option<String>,
    /// Optional hostname assigned inside the guest.
    pub hostname: Option<String>,
    /// Whether provider-side backups are enabled. Backups make the
    /// instance more expensive.
    pub backups: bool,
    /// SSH key identifiers seeded into the instance on first boot.
    pub ssh_key_ids: Vec<String>,
}

impl InstanceSpec {
    /// Starts a builder for an [`InstanceSpec`].
    #[must_use]
    pub fn builder() -> InstanceSpecBuilder {
        InstanceSpecBuilder::new()
    }

    /// Validates the spec, returning a descriptive error when a required
    /// field is missing.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Validation`] when the region or plan is
    /// empty.
    pub fn validate(&self) -> Result<(), BackendError> {
        if self.region.is_empty() {
            return Err(BackendError::Validation("region".to_owned()));
        }
        if self.plan.is_empty() {
            return Err(BackendError::Validation("plan".to_owned()));
        }
        Ok(())
    }
}

/// Builder for [`InstanceSpec`] that defers trimming and validation to
/// construction.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct InstanceSpecBuilder {
    os_id: u32,
    region: String,
    plan: String,
    label: Option<String>,
    hostname: Option<String>,
    backups: bool,
    ssh_key_ids: Vec<String>,
}

impl InstanceSpecBuilder {
    /// Creates an empty builder; fields must be populated before build.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the operating system image identifier.
    #[must_use]
    pub const fn os_id(mut self, value: u32) -> Self {
        self.os_id = value;
        self
    }

    /// Sets the target region code.
    #[must_use]
    pub fn region(mut self, value: impl Into<String>) -> Self {
        self.region = value.into();
        self
    }

    /// Sets the plan code.
    #[must_use]
    pub fn plan(mut self, value: impl Into<String>) -> Self {
        self.plan = value.into();
        self
    }

    /// Sets the optional label.
    #[must_use]
    pub fn label(mut self, value: Option<String>) -> Self {
        self.label = value;
        self
    }

    /// Sets the optional hostname.
    #[must_use]
    pub fn hostname(mut self, value: Option<String>) -> Self {
        self.hostname = value;
        self
    }

    /// Enables or disables provider-side backups.
    #[must_use]
    pub const fn backups(mut self, value: bool) -> Self {
        self.backups = value;
        self
    }

    /// Sets the SSH key identifiers to seed on first boot.
    #[must_use]
    pub fn ssh_key_ids(mut self, value: Vec<String>) -> Self {
        self.ssh_key_ids = value;
        self
    }

    /// Builds and validates the [`InstanceSpec`], trimming string inputs.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Validation`] when a required field is empty.
    pub fn build(self) -> Result<InstanceSpec, BackendError> {
        let spec = InstanceSpec {
            os_id: self.os_id,
            region: self.region.trim().to_owned(),
            plan: self.plan.trim().to_owned(),
            label: self.label.map(|value| value.trim().to_owned()),
            hostname: self.hostname.map(|value| value.trim().to_owned()),
            backups: self.backups,
            ssh_key_ids: self
                .ssh_key_ids
                .into_iter()
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
                .collect(),
        };
        spec.validate()?;
        Ok(spec)
    }
}

/// Handle returned by a backend once an instance has been created.
///
/// The identifier is assigned by the provider and is the sole key used for
/// all subsequent fetches and deletes.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InstanceHandle {
    /// Provider specific identifier for the instance.
    pub id: String,
}

/// Point-in-time view of an instance as reported by the provider.
///
/// Snapshots are never mutated in place; each poll produces a fresh one.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InstanceSnapshot {
    /// Provider specific identifier for the instance.
    pub id: String,
    /// Provider-defined lifecycle status string.
    pub status: String,
    /// Primary IPv4 address, `None` until the provider assigns one.
    pub main_ip: Option<String>,
}

/// Errors raised by backends.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum BackendError {
    /// Raised when a spec is missing a required field.
    #[error("missing or empty field: {0}")]
    Validation(String),
}

/// Future returned by backend operations.
pub type BackendFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// Minimal interface implemented by cloud backends.
pub trait InstanceBackend {
    /// Provider specific error type returned by the backend.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Creates a new instance and returns a handle used for subsequent calls.
    fn create<'a>(
        &'a self,
        spec: &'a InstanceSpec,
    ) -> BackendFuture<'a, InstanceHandle, Self::Error>;

    /// Fetches a fresh snapshot of the instance's provider-side state.
    fn fetch<'a>(
        &'a self,
        handle: &'a InstanceHandle,
    ) -> BackendFuture<'a, InstanceSnapshot, Self::Error>;

    /// Destroys the instance. Deletion is the terminal transition; no
    /// further fetch on the handle is expected to succeed.
    fn destroy(&self, handle: InstanceHandle) -> BackendFuture<'_, (), Self::Error>;
}
