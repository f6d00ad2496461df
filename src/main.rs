//! Binary entry point for the spinup CLI.

use std::io::{self, Write};
use std::process;

use clap::Parser;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use spinup::{
    CredentialsFile, InstanceSpec, ProvisionError, ProvisionOrchestrator, VultrApi, VultrApiError,
    VultrConfig,
};

mod cli;

use cli::{Cli, CreateCommand, DeleteCommand, ListKeysCommand};

#[derive(Debug, Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error(transparent)]
    Api(#[from] VultrApiError),
    #[error(transparent)]
    Provision(#[from] ProvisionError<VultrApiError>),
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();
    let exit_code = match dispatch(cli).await {
        Ok(code) => code,
        Err(err) => {
            report_error(&err);
            1
        }
    };

    process::exit(exit_code);
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();
}

async fn dispatch(cli: Cli) -> Result<i32, CliError> {
    match cli {
        Cli::Create(args) => run_create(args).await,
        Cli::Delete(args) => run_delete(args).await,
        Cli::ListKeys(args) => run_list_keys(args).await,
    }
}

async fn run_create(args: CreateCommand) -> Result<i32, CliError> {
    let config = load_config()?;
    let spec = build_spec(&config, &args)?;

    let api = VultrApi::new(&config.api_key);
    let writer = CredentialsFile::new(config.credentials_file.clone());
    let orchestrator = ProvisionOrchestrator::new(api, writer);

    let host = orchestrator.provision(&spec).await?;
    writeln!(io::stdout(), "{}", host.address).ok();
    Ok(0)
}

async fn run_delete(args: DeleteCommand) -> Result<i32, CliError> {
    let config = load_config()?;

    let api = VultrApi::new(&config.api_key);
    let writer = CredentialsFile::new(config.credentials_file.clone());
    let orchestrator = ProvisionOrchestrator::new(api, writer);

    orchestrator.deprovision(&args.instance_id).await?;
    Ok(0)
}

async fn run_list_keys(_args: ListKeysCommand) -> Result<i32, CliError> {
    let config = load_config()?;

    let api = VultrApi::new(&config.api_key);
    let listing = api.list_ssh_keys().await?;

    let mut stdout = io::stdout();
    for key in &listing.ssh_keys {
        writeln!(stdout, "{}\t{}\t{}", key.id, key.name, key.date_created).ok();
    }
    Ok(0)
}

fn load_config() -> Result<VultrConfig, CliError> {
    let config =
        VultrConfig::load_without_cli_args().map_err(|err| CliError::Config(err.to_string()))?;
    config
        .validate()
        .map_err(|err| CliError::Config(err.to_string()))?;
    Ok(config)
}

fn build_spec(config: &VultrConfig, args: &CreateCommand) -> Result<InstanceSpec, CliError> {
    let mut ssh_keys = args.ssh_keys.clone();
    if ssh_keys.is_empty() {
        ssh_keys.extend(config.default_ssh_key_id.clone());
    }

    InstanceSpec::builder()
        .os_id(args.os_id.unwrap_or(config.default_os_id))
        .region(
            args.region
                .clone()
                .unwrap_or_else(|| config.default_region.clone()),
        )
        .plan(
            args.plan
                .clone()
                .unwrap_or_else(|| config.default_plan.clone()),
        )
        .label(args.label.clone())
        .hostname(args.hostname.clone())
        .backups(args.backups || config.backups)
        .ssh_key_ids(ssh_keys)
        .build()
        .map_err(|err| CliError::Config(err.to_string()))
}

fn report_error(err: &CliError) {
    write_error(io::stderr(), err);
}

fn write_error(mut target: impl Write, err: &CliError) {
    writeln!(target, "{err}").ok();
}
