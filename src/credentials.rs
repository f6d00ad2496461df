//! Credentials artifact written after a successful provisioning run.
//!
//! The file is a plain key=value text file consumed by downstream shell
//! automation. It is written only once an instance has reached the active
//! state with a usable address, and is readable by the owner only.

use std::io;
use std::os::unix::fs::PermissionsExt;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8::Dir};
use thiserror::Error;

/// Default location of the credentials file, relative to the working
/// directory.
pub const DEFAULT_CREDENTIALS_FILE: &str = "vm_credentials.secrets";

const FILE_MODE: u32 = 0o400;

/// Errors raised while writing the credentials file.
#[derive(Debug, Error)]
pub enum CredentialsError {
    /// Raised when the target path has no filename component.
    #[error("credentials path {path} is missing a filename")]
    InvalidPath {
        /// Path that could not be used.
        path: Utf8PathBuf,
    },
    /// Raised when file system operations fail.
    #[error("failed to write {path}: {message}")]
    Io {
        /// Path that could not be written.
        path: Utf8PathBuf,
        /// Human-readable error message.
        message: String,
    },
}

/// Abstraction over credentials writers for dependency injection.
pub trait CredentialsWriter {
    /// Persists the resolved address and instance identifier, returning the
    /// path that was written.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialsError`] when the file cannot be written.
    fn write(&self, address: &str, instance_id: &str) -> Result<Utf8PathBuf, CredentialsError>;
}

/// Writes the credentials artifact to a fixed path with owner-read-only
/// permissions.
#[derive(Clone, Debug)]
pub struct CredentialsFile {
    path: Utf8PathBuf,
}

impl CredentialsFile {
    /// Creates a writer targeting the given path.
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path this writer targets.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

impl Default for CredentialsFile {
    fn default() -> Self {
        Self::new(DEFAULT_CREDENTIALS_FILE)
    }
}

impl CredentialsWriter for CredentialsFile {
    fn write(&self, address: &str, instance_id: &str) -> Result<Utf8PathBuf, CredentialsError> {
        let parent = self
            .path
            .parent()
            .filter(|dir| !dir.as_str().is_empty())
            .unwrap_or_else(|| Utf8Path::new("."));
        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| CredentialsError::InvalidPath {
                path: self.path.clone(),
            })?;

        let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(|err| {
            CredentialsError::Io {
                path: parent.to_path_buf(),
                message: err.to_string(),
            }
        })?;

        // A file left behind by a previous run is read-only, so it has to be
        // removed before the new content can land.
        remove_stale(&dir, file_name, &self.path)?;

        let contents = format!("USER=root\nHOST={address}\nINSTANCE_ID={instance_id}\n");
        dir.write(file_name, contents.into_bytes())
            .map_err(|err| CredentialsError::Io {
                path: self.path.clone(),
                message: err.to_string(),
            })?;

        dir.set_permissions(
            file_name,
            cap_std::fs::Permissions::from_std(std::fs::Permissions::from_mode(FILE_MODE)),
        )
        .map_err(|err| CredentialsError::Io {
            path: self.path.clone(),
            message: err.to_string(),
        })?;

        Ok(self.path.clone())
    }
}

fn remove_stale(dir: &Dir, file_name: &str, path: &Utf8Path) -> Result<(), CredentialsError> {
    match dir.remove_file(file_name) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(CredentialsError::Io {
            path: path.to_path_buf(),
            message: err.to_string(),
        }),
    }
}
