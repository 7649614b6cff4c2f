//! Input tree enumeration.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::Result;

/// One input file queued for processing. Ephemeral: produced by the walker,
/// consumed by the protector, discarded after the file is handled.
#[derive(Debug, Clone)]
pub struct FileTask {
    /// Path of the source file.
    pub input_path: PathBuf,
    /// Path relative to the input root; mirrored under the output root.
    pub relative_path: PathBuf,
}

/// Enumerates regular files under `root`, descending into subdirectories
/// when `recursive` is set. Entries come back in deterministic (sorted)
/// order. Unreadable subdirectories are logged and skipped; only the root
/// itself is fatal.
pub fn collect_files(root: &Path, recursive: bool) -> Result<Vec<FileTask>> {
    let mut tasks = Vec::new();
    walk_dir(root, root, recursive, &mut tasks)?;
    tasks.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    Ok(tasks)
}

fn walk_dir(root: &Path, dir: &Path, recursive: bool, tasks: &mut Vec<FileTask>) -> Result<()> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if dir != root => {
            warn!("⚠️  Skipping unreadable directory {}: {}", dir.display(), e);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("⚠️  Skipping unreadable entry in {}: {}", dir.display(), e);
                continue;
            }
        };
        let path = entry.path();
        let file_type = match entry.file_type() {
            Ok(file_type) => file_type,
            Err(e) => {
                warn!("⚠️  Skipping {}: {}", path.display(), e);
                continue;
            }
        };

        if file_type.is_dir() {
            if recursive {
                walk_dir(root, &path, recursive, tasks)?;
            }
        } else if file_type.is_file() {
            let relative_path = path.strip_prefix(root).unwrap_or(&path).to_path_buf();
            tasks.push(FileTask {
                input_path: path,
                relative_path,
            });
        }
        // Symlinks and other special files are ignored.
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path) {
        fs::write(path, b"x").unwrap();
    }

    #[test]
    fn flat_walk_ignores_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("a.pdf"));
        touch(&dir.path().join("notes.txt"));
        fs::create_dir(dir.path().join("sub")).unwrap();
        touch(&dir.path().join("sub").join("c.pdf"));

        let tasks = collect_files(dir.path(), false).unwrap();
        let names: Vec<_> = tasks.iter().map(|t| t.relative_path.clone()).collect();
        assert_eq!(names, vec![PathBuf::from("a.pdf"), PathBuf::from("notes.txt")]);
    }

    #[test]
    fn recursive_walk_preserves_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("sub/deep")).unwrap();
        touch(&dir.path().join("a.pdf"));
        touch(&dir.path().join("sub").join("b.pdf"));
        touch(&dir.path().join("sub/deep").join("c.pdf"));

        let tasks = collect_files(dir.path(), true).unwrap();
        let names: Vec<_> = tasks.iter().map(|t| t.relative_path.clone()).collect();
        assert_eq!(
            names,
            vec![
                PathBuf::from("a.pdf"),
                PathBuf::from("sub/b.pdf"),
                PathBuf::from("sub/deep/c.pdf"),
            ]
        );
    }

    #[test]
    fn missing_root_is_fatal() {
        assert!(collect_files(Path::new("/definitely/not/here"), true).is_err());
    }
}
