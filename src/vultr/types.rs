//! Wire types for the Vultr v2 API.
//!
//! Field names mirror the provider's snake_case JSON keys exactly; renaming
//! any of them breaks compatibility. Responses nest the substantive payload
//! under a named envelope field (`instance`, `ssh_keys`), so every decode
//! goes through one of the envelope structs below.

use serde::{Deserialize, Serialize};

/// Body of a create-instance request.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub(crate) struct CreateInstanceRequest {
    pub(crate) os_id: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) hostname: Option<String>,
    pub(crate) region: String,
    pub(crate) plan: String,
    /// `"enabled"` or `"disabled"` on the wire.
    pub(crate) backups: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) sshkey_id: Vec<String>,
}

/// Instance representation returned by the provider.
///
/// Missing fields decode to their defaults; the provider omits some of them
/// depending on the endpoint and instance state.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default)]
pub struct Instance {
    /// Provider-assigned unique identifier.
    pub id: String,
    /// Operating system label.
    pub os: String,
    /// RAM in megabytes.
    pub ram: u32,
    /// Disk size in gigabytes.
    pub disk: u32,
    /// Primary IPv4 address; empty until the provider assigns one.
    pub main_ip: String,
    /// Number of virtual CPUs.
    pub vcpu_count: u32,
    /// Region code the instance runs in.
    pub region: String,
    /// Plan code the instance was created with.
    pub plan: String,
    /// Creation timestamp as reported by the provider.
    pub date_created: String,
    /// Provider-defined lifecycle status (`pending`, `active`, ...).
    pub status: String,
    /// Allowed monthly bandwidth in gigabytes.
    pub allowed_bandwidth: u32,
    /// IPv4 netmask.
    pub netmask_v4: String,
    /// IPv4 gateway.
    pub gateway_v4: String,
    /// Power state of the underlying host (`running`, `stopped`, ...).
    pub power_status: String,
    /// Provider-side server health status.
    pub server_status: String,
    /// IPv6 network prefix.
    pub v6_network: String,
    /// Primary IPv6 address.
    pub v6_main_ip: String,
    /// IPv6 network size.
    pub v6_network_size: u32,
    /// Human readable label.
    pub label: String,
    /// Internal (private network) IP address.
    pub internal_ip: String,
    /// URL of the provider's KVM console.
    pub kvm: String,
    /// Hostname assigned inside the guest.
    pub hostname: String,
    /// Legacy single tag.
    pub tag: String,
    /// Tags attached to the instance.
    pub tags: Vec<String>,
    /// Operating system identifier.
    pub os_id: u32,
    /// Marketplace application identifier, zero when unused.
    pub app_id: u32,
    /// Marketplace image identifier, empty when unused.
    pub image_id: String,
    /// Firewall group the instance belongs to.
    pub firewall_group_id: String,
    /// Feature flags enabled on the instance.
    pub features: Vec<String>,
    /// One-time default root password; present only on the creation
    /// response and never returned again.
    pub default_password: Option<String>,
}

/// Envelope wrapping a single instance.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub(crate) struct InstanceEnvelope {
    pub(crate) instance: Instance,
}

/// SSH key registered with the provider account.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default)]
pub struct SshKey {
    /// Provider-assigned unique identifier.
    pub id: String,
    /// Creation timestamp as reported by the provider.
    pub date_created: String,
    /// Human readable key name.
    pub name: String,
    /// Public key material.
    pub ssh_key: String,
}

/// First page of the account's SSH keys plus pagination metadata.
///
/// The continuation cursor is surfaced but not followed automatically.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default)]
pub struct SshKeyList {
    /// Keys in provider order.
    pub ssh_keys: Vec<SshKey>,
    /// Pagination metadata for the listing.
    pub meta: ListMeta,
}

/// Pagination metadata attached to listing responses.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default)]
pub struct ListMeta {
    /// Total number of records across all pages.
    pub total: u32,
    /// Continuation cursors.
    pub links: ListLinks,
}

/// Continuation cursors for paged listings.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default)]
pub struct ListLinks {
    /// Cursor for the next page, empty on the last page.
    pub next: String,
    /// Cursor for the previous page, empty on the first page.
    pub prev: String,
}
