//! The Protector: walks the input tree and write-protects each PDF.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use lopdf::encryption::crypt_filters::{Aes128CryptFilter, CryptFilter};
use lopdf::{Document, EncryptionState, EncryptionVersion, Object, Permissions, StringFormat};
use ring::rand::{SecureRandom, SystemRandom};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::config::ProtectJob;
use crate::docinfo;
use crate::error::{Error, FileError, Result};
use crate::password;
use crate::walker::{self, FileTask};

/// Per-file outcome of one protection attempt.
#[derive(Debug)]
enum Outcome {
    Protected,
    SkippedAlreadyProtected,
    SkippedNotPdf,
    Failed(String),
}

/// One failed file and the reason, as reported in the summary.
#[derive(Debug, Clone, Serialize)]
pub struct FailedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Aggregated per-outcome counts for one run. The summary is the only
/// user-visible result besides the per-file progress and error lines.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub protected: usize,
    pub skipped_already_protected: usize,
    pub skipped_not_pdf: usize,
    pub failed: usize,
    pub failures: Vec<FailedFile>,
}

impl RunSummary {
    fn record(&mut self, relative_path: &Path, outcome: Outcome) {
        match outcome {
            Outcome::Protected => {
                info!("🔒 Protected: {}", relative_path.display());
                self.protected += 1;
            }
            Outcome::SkippedAlreadyProtected => {
                info!("⏭️  Skipped (already protected): {}", relative_path.display());
                self.skipped_already_protected += 1;
            }
            Outcome::SkippedNotPdf => {
                debug!("📄 Skipped (not a PDF): {}", relative_path.display());
                self.skipped_not_pdf += 1;
            }
            Outcome::Failed(reason) => {
                error!("❌ Failed: {}: {}", relative_path.display(), reason);
                self.failed += 1;
                self.failures.push(FailedFile {
                    path: relative_path.to_path_buf(),
                    reason,
                });
            }
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", "=".repeat(50))?;
        writeln!(f, "✅ Files protected: {}", self.protected)?;
        writeln!(
            f,
            "⏭️  Files skipped (already protected): {}",
            self.skipped_already_protected
        )?;
        writeln!(f, "📄 Files skipped (not PDF): {}", self.skipped_not_pdf)?;
        if self.failed > 0 {
            writeln!(f, "❌ Failures: {}", self.failed)?;
            for failure in &self.failures {
                writeln!(f, "   {}: {}", failure.path.display(), failure.reason)?;
            }
        }
        write!(f, "{}", "=".repeat(50))
    }
}

/// Sequentially protects every PDF under the job's input root.
#[derive(Debug)]
pub struct Protector {
    job: ProtectJob,
}

impl Protector {
    pub fn new(job: ProtectJob) -> Self {
        Self { job }
    }

    /// Runs the whole job. Per-file failures are recorded and never abort
    /// the run; only an invalid input root or an uncreatable output root is
    /// fatal.
    pub fn run(&self) -> Result<RunSummary> {
        self.job.validate()?;
        fs::create_dir_all(&self.job.output_dir).map_err(|e| Error::OutputRootUncreatable {
            path: self.job.output_dir.clone(),
            source: e,
        })?;

        let tasks = walker::collect_files(&self.job.input_dir, self.job.recursive)?;
        info!("📂 Input directory: {}", self.job.input_dir.display());
        info!("📂 Output directory: {}", self.job.output_dir.display());
        info!("📁 {} file(s) found", tasks.len());

        let mut summary = RunSummary::default();
        for task in &tasks {
            let outcome = self.process_file(task);
            summary.record(&task.relative_path, outcome);
        }
        Ok(summary)
    }

    fn process_file(&self, task: &FileTask) -> Outcome {
        if !is_pdf(&task.input_path) {
            return Outcome::SkippedNotPdf;
        }

        let output_path = self.job.output_dir.join(&task.relative_path);
        if output_path.exists() {
            // Never overwrite: the existing file's password is already lost,
            // and re-protecting would orphan it.
            return Outcome::SkippedAlreadyProtected;
        }

        match self.protect_one(&task.input_path, &output_path) {
            Ok(()) => Outcome::Protected,
            Err(FileError::AlreadyEncrypted) => Outcome::SkippedAlreadyProtected,
            Err(e) => Outcome::Failed(e.to_string()),
        }
    }

    /// Protects a single PDF. The owner password lives and dies inside this
    /// function: generated here, handed to the encryption call by reference,
    /// and dropped when the function returns. It is never stored, logged or
    /// returned.
    fn protect_one(&self, input: &Path, output: &Path) -> std::result::Result<(), FileError> {
        let mut doc =
            Document::load(input).map_err(|e| FileError::SourceUnreadable(e.to_string()))?;
        if doc.is_encrypted() {
            return Err(FileError::AlreadyEncrypted);
        }

        if self.job.stamp_info {
            if let Some(name) = input.file_name().and_then(|n| n.to_str()) {
                match docinfo::parse_file_name(name) {
                    Some(info) => docinfo::stamp(&mut doc, &info),
                    None => warn!("⚠️  Unrecognized file name format, not stamping: {name}"),
                }
            }
        }

        ensure_document_id(&mut doc)?;
        ensure_min_version(&mut doc);

        if let Some(parent) = output.parent() {
            fs::create_dir_all(parent).map_err(|e| FileError::OutputWrite(e.to_string()))?;
        }

        let owner_password = password::generate(self.job.password_length)
            .map_err(|e| FileError::EncryptionFailed(e.to_string()))?;
        let crypt_filter: Arc<dyn CryptFilter> = Arc::new(Aes128CryptFilter);
        let version = EncryptionVersion::V4 {
            document: &doc,
            encrypt_metadata: true,
            crypt_filters: BTreeMap::from([(b"StdCF".to_vec(), crypt_filter)]),
            stream_filter: b"StdCF".to_vec(),
            string_filter: b"StdCF".to_vec(),
            owner_password: &owner_password,
            user_password: "",
            permissions: read_only_permissions(),
        };
        let state = EncryptionState::try_from(version)
            .map_err(|e| FileError::EncryptionFailed(e.to_string()))?;
        doc.encrypt(&state)
            .map_err(|e| FileError::EncryptionFailed(e.to_string()))?;
        doc.save(output)
            .map_err(|e| FileError::OutputWrite(e.to_string()))?;
        Ok(())
    }
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}

/// Reading stays open. Granted: low-resolution printing, copy/extract and
/// accessibility extraction. Denied: modification, annotation, form-filling,
/// assembly and high-resolution printing.
fn read_only_permissions() -> Permissions {
    Permissions::PRINTABLE | Permissions::COPYABLE | Permissions::COPYABLE_FOR_ACCESSIBILITY
}

// Encryption requires a trailer /ID; documents that lack one get a random
// identifier.
fn ensure_document_id(doc: &mut Document) -> std::result::Result<(), FileError> {
    if doc.trailer.get(b"ID").is_ok() {
        return Ok(());
    }
    let rng = SystemRandom::new();
    let mut id = [0u8; 16];
    rng.fill(&mut id)
        .map_err(|_| FileError::EncryptionFailed("document ID generation failed".into()))?;
    doc.trailer.set(
        "ID",
        Object::Array(vec![
            Object::String(id.to_vec(), StringFormat::Literal),
            Object::String(id.to_vec(), StringFormat::Literal),
        ]),
    );
    Ok(())
}

// The AES-128 (V4) security handler needs PDF 1.5.
fn ensure_min_version(doc: &mut Document) {
    let current: f32 = doc.version.parse().unwrap_or(0.0);
    if current < 1.5 {
        doc.version = "1.5".into();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pdf_extension_is_case_insensitive() {
        assert!(is_pdf(Path::new("a.pdf")));
        assert!(is_pdf(Path::new("a.PDF")));
        assert!(is_pdf(Path::new("dir/b.Pdf")));
        assert!(!is_pdf(Path::new("notes.txt")));
        assert!(!is_pdf(Path::new("pdf")));
    }

    #[test]
    fn permissions_deny_modification() {
        let permissions = read_only_permissions();
        assert!(permissions.contains(Permissions::PRINTABLE));
        assert!(permissions.contains(Permissions::COPYABLE));
        assert!(!permissions.contains(Permissions::MODIFIABLE));
        assert!(!permissions.contains(Permissions::ANNOTABLE));
        assert!(!permissions.contains(Permissions::PRINTABLE_IN_HIGH_QUALITY));
    }

    #[test]
    fn missing_document_id_gets_generated() {
        let mut doc = Document::with_version("1.5");
        assert!(doc.trailer.get(b"ID").is_err());
        ensure_document_id(&mut doc).unwrap();
        let id = doc.trailer.get(b"ID").unwrap();
        match id {
            Object::Array(parts) => assert_eq!(parts.len(), 2),
            other => panic!("unexpected ID object: {other:?}"),
        }
    }

    #[test]
    fn old_versions_are_bumped() {
        let mut doc = Document::with_version("1.4");
        ensure_min_version(&mut doc);
        assert_eq!(doc.version, "1.5");

        let mut doc = Document::with_version("1.7");
        ensure_min_version(&mut doc);
        assert_eq!(doc.version, "1.7");
    }
}
