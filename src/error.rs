//! Error types for pdflock.
//!
//! Fatal errors abort the run; per-file errors are caught at the file
//! boundary, recorded in the summary and never stop processing.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Custom result type for protection runs
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal error: aborts the whole run.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("Input directory does not exist or is not a directory: {}", .0.display())]
    InvalidInputRoot(PathBuf),

    #[error("Cannot create output directory {}: {}", .path.display(), .source)]
    OutputRootUncreatable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Cryptographic error: {0}")]
    Crypto(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Per-file error: recovered at the file-processing boundary.
///
/// Messages never contain the generated password.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum FileError {
    #[error("Source unreadable: {0}")]
    SourceUnreadable(String),

    #[error("Source is already encrypted")]
    AlreadyEncrypted,

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Output write failed: {0}")]
    OutputWrite(String),
}
