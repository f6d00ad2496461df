//! Core library for the spinup provisioning tool.
//!
//! The crate exposes a backend abstraction for provisioning short-lived
//! virtual machines and a Vultr implementation that powers the CLI
//! lifecycle (create → poll until active → record address, or delete).

pub mod backend;
pub mod config;
pub mod credentials;
pub mod provision;
pub mod vultr;

pub use backend::{
    BackendError, BackendFuture, InstanceBackend, InstanceHandle, InstanceSnapshot, InstanceSpec,
    InstanceSpecBuilder,
};
pub use config::{ConfigError, VultrConfig};
pub use credentials::{
    CredentialsError, CredentialsFile, CredentialsWriter, DEFAULT_CREDENTIALS_FILE,
};
pub use provision::{ProvisionError, ProvisionOrchestrator, ProvisionedHost};
pub use vultr::{Instance, ListLinks, ListMeta, SshKey, SshKeyList, VultrApi, VultrApiError};
