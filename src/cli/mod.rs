//! Command-line interface definitions for the `spinup` binary.
//!
//! This module centralises the clap parser structures so both the main
//! binary and the build script can reuse them when generating the manual
//! page.

use clap::Parser;

/// Top-level CLI for the `spinup` binary.
#[derive(Debug, Parser)]
#[command(
    name = "spinup",
    about = "Provision a Vultr VM, wait for it to come up, and record its address",
    arg_required_else_help = true
)]
pub(crate) enum Cli {
    /// Create an instance and poll until it is active.
    #[command(
        name = "create",
        about = "Create an instance and poll until it is active"
    )]
    Create(CreateCommand),
    /// Delete an instance by identifier.
    #[command(name = "delete", about = "Delete an instance by identifier")]
    Delete(DeleteCommand),
    /// List the account's SSH keys.
    #[command(name = "list-keys", about = "List the account's SSH keys")]
    ListKeys(ListKeysCommand),
}

/// Arguments for the `spinup create` subcommand.
#[derive(Debug, Parser)]
pub(crate) struct CreateCommand {
    /// Override the target region for this run.
    #[arg(long, value_name = "REGION")]
    pub(crate) region: Option<String>,
    /// Override the plan (instance sizing) for this run.
    #[arg(long, value_name = "PLAN")]
    pub(crate) plan: Option<String>,
    /// Override the operating system identifier for this run.
    #[arg(long, value_name = "OS_ID")]
    pub(crate) os_id: Option<u32>,
    /// Label shown in the provider console; generated when omitted.
    #[arg(long, value_name = "LABEL")]
    pub(crate) label: Option<String>,
    /// Hostname assigned inside the guest.
    #[arg(long, value_name = "HOSTNAME")]
    pub(crate) hostname: Option<String>,
    /// SSH key identifier to seed on first boot; repeatable.
    #[arg(long = "ssh-key", value_name = "ID")]
    pub(crate) ssh_keys: Vec<String>,
    /// Enable provider-side backups for this instance (more expensive).
    #[arg(long)]
    pub(crate) backups: bool,
}

/// Arguments for the `spinup delete` subcommand.
#[derive(Debug, Parser)]
pub(crate) struct DeleteCommand {
    /// Identifier of the instance to delete.
    #[arg(value_name = "INSTANCE_ID")]
    pub(crate) instance_id: String,
}

/// Arguments for the `spinup list-keys` subcommand.
#[derive(Debug, Parser)]
pub(crate) struct ListKeysCommand {}
