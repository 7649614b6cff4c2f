//! Job configuration and validation.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::password::DEFAULT_PASSWORD_LENGTH;

/// Configuration for one protection run over a directory tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtectJob {
    /// Source directory root containing the PDFs.
    pub input_dir: PathBuf,
    /// Destination directory root; created if missing.
    pub output_dir: PathBuf,
    /// Descend into subdirectories.
    pub recursive: bool,
    /// Character length of the generated owner passwords.
    pub password_length: usize,
    /// Stamp invoice metadata parsed from the file name into each PDF's
    /// info dictionary before protecting it.
    pub stamp_info: bool,
}

impl ProtectJob {
    /// Creates a job with default options for the given directories.
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            recursive: false,
            password_length: DEFAULT_PASSWORD_LENGTH,
            stamp_info: false,
        }
    }

    /// Validates the job. The input root must be an existing directory and
    /// the password length must be nonzero.
    pub fn validate(&self) -> Result<()> {
        if !self.input_dir.is_dir() {
            return Err(Error::InvalidInputRoot(self.input_dir.clone()));
        }
        if self.password_length == 0 {
            return Err(Error::Config("Password length must be at least 1".into()));
        }
        Ok(())
    }
}
