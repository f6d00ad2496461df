//! Configuration loading via `ortho-config`.

use crate::backend::InstanceSpec;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

/// Vultr specific configuration derived from environment variables,
/// configuration files, and CLI flags.
#[derive(Clone, Debug, Deserialize, OrthoConfig, PartialEq, Eq)]
#[ortho_config(prefix = "VULTR")]
pub struct VultrConfig {
    /// Personal access token used to authenticate against the API. This
    /// value is required and is never logged.
    pub api_key: String,
    /// Region code where new instances are deployed. Defaults to `fra`
    /// (Frankfurt).
    #[ortho_config(default = "fra".to_owned())]
    pub default_region: String,
    /// Plan code for new instances. Defaults to `vc2-1c-1gb` to minimise
    /// cost.
    #[ortho_config(default = "vc2-1c-1gb".to_owned())]
    pub default_plan: String,
    /// Operating system identifier for new instances. Defaults to `447`
    /// (FreeBSD 13 x64).
    #[ortho_config(default = 447)]
    pub default_os_id: u32,
    /// SSH key identifier seeded into new instances by default.
    pub default_ssh_key_id: Option<String>,
    /// Whether provider-side backups are enabled for new instances.
    /// Defaults to disabled; backups make the instance more expensive.
    #[ortho_config(default = false)]
    pub backups: bool,
    /// Path of the credentials file written after a successful run.
    #[ortho_config(default = crate::credentials::DEFAULT_CREDENTIALS_FILE.to_owned())]
    pub credentials_file: String,
}

/// Metadata for a configuration field, used to generate actionable error messages.
struct FieldMetadata {
    description: &'static str,
    env_var: &'static str,
    toml_key: &'static str,
    section: &'static str,
}

impl FieldMetadata {
    const fn new(
        description: &'static str,
        env_var: &'static str,
        toml_key: &'static str,
        section: &'static str,
    ) -> Self {
        Self {
            description,
            env_var,
            toml_key,
            section,
        }
    }
}

impl VultrConfig {
    fn require_field(value: &str, metadata: &FieldMetadata) -> Result<(), ConfigError> {
        if value.trim().is_empty() {
            return Err(ConfigError::MissingField(format!(
                "missing {}: set {} or add {} to [{}] in spinup.toml",
                metadata.description, metadata.env_var, metadata.toml_key, metadata.section
            )));
        }
        Ok(())
    }

    /// Loads configuration using the `ortho-config` derive. Values merge
    /// defaults, configuration files, environment variables, and CLI flags
    /// in that order of precedence.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the loader fails to merge
    /// sources.
    pub fn load_from_sources() -> Result<Self, ConfigError> {
        Self::load().map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Loads configuration without attempting to parse CLI arguments.
    /// Values still merge defaults, configuration files, and environment
    /// variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the merge fails.
    pub fn load_without_cli_args() -> Result<Self, ConfigError> {
        Self::load_from_iter([std::ffi::OsString::from("spinup")])
            .map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Builds an [`InstanceSpec`] using the configured defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when validation fails.
    pub fn as_spec(&self) -> Result<InstanceSpec, ConfigError> {
        self.validate()?;
        InstanceSpec::builder()
            .os_id(self.default_os_id)
            .region(&self.default_region)
            .plan(&self.default_plan)
            .backups(self.backups)
            .ssh_key_ids(self.default_ssh_key_id.clone().into_iter().collect())
            .build()
            .map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Performs semantic validation on required fields. Error messages
    /// include guidance on how to provide missing values via environment
    /// variables or configuration files.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] when a required field is
    /// empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        Self::require_field(
            &self.api_key,
            &FieldMetadata::new("Vultr API token", "VULTR_API_KEY", "api_key", "vultr"),
        )?;
        Self::require_field(
            &self.default_region,
            &FieldMetadata::new("region", "VULTR_DEFAULT_REGION", "default_region", "vultr"),
        )?;
        Self::require_field(
            &self.default_plan,
            &FieldMetadata::new("plan", "VULTR_DEFAULT_PLAN", "default_plan", "vultr"),
        )?;
        Self::require_field(
            &self.credentials_file,
            &FieldMetadata::new(
                "credentials file path",
                "VULTR_CREDENTIALS_FILE",
                "credentials_file",
                "vultr",
            ),
        )?;
        Ok(())
    }
}

/// Errors raised during configuration loading and validation.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum ConfigError {
    /// Indicates a required configuration field is empty or missing.
    #[error("missing configuration field: {0}")]
    MissingField(String),
    /// Surfaces errors from the `ortho-config` loader.
    #[error("configuration parsing failed: {0}")]
    Parse(String),
}

impl From<ortho_config::OrthoError> for ConfigError {
    fn from(value: ortho_config::OrthoError) -> Self {
        Self::Parse(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> VultrConfig {
        VultrConfig {
            api_key: String::from("token"),
            default_region: String::from("fra"),
            default_plan: String::from("vc2-1c-1gb"),
            default_os_id: 447,
            default_ssh_key_id: None,
            backups: false,
            credentials_file: String::from("vm_credentials.secrets"),
        }
    }

    #[test]
    fn validate_accepts_complete_config() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn validate_rejects_missing_api_key() {
        let mut incomplete = config();
        incomplete.api_key = String::from("  ");
        let err = incomplete.validate().expect_err("blank token should fail");
        assert!(
            matches!(err, ConfigError::MissingField(ref message) if message.contains("VULTR_API_KEY")),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn as_spec_uses_configured_defaults() {
        let mut with_key = config();
        with_key.default_ssh_key_id = Some(String::from("key-1"));
        let spec = with_key
            .as_spec()
            .unwrap_or_else(|err| panic!("as_spec failed: {err}"));

        assert_eq!(spec.os_id, 447);
        assert_eq!(spec.region, "fra");
        assert_eq!(spec.plan, "vc2-1c-1gb");
        assert_eq!(spec.ssh_key_ids, vec![String::from("key-1")]);
        assert!(!spec.backups);
    }
}
