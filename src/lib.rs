//! Batch owner-password write-protection for PDF directory trees.
//!
//! Walks an input directory, mirrors its structure into an output directory,
//! and re-encodes every unprotected PDF with a freshly generated owner
//! password. Reading stays open (empty user password); modification,
//! annotation, form-filling and high-resolution printing require the owner
//! password, which is never recorded anywhere.

pub mod config;
pub mod docinfo;
pub mod error;
pub mod password;
pub mod protector;
pub mod walker;

// Re-exports for crate consumers
pub use config::ProtectJob;
pub use error::{Error, FileError, Result};
pub use password::{DEFAULT_PASSWORD_LENGTH, PASSWORD_CHARSET};
pub use protector::{FailedFile, Protector, RunSummary};
pub use walker::FileTask;
