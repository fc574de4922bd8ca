//! Atomic output files.
//!
//! Contents go to a sibling temp file which is synced and then renamed over
//! the destination, so readers see either the previous file or the complete
//! new one.

use anyhow::{Context, Result, bail};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

pub fn write_atomic(path: &Path, contents: &str, overwrite: bool) -> Result<()> {
    if !overwrite && path.exists() {
        bail!("Refusing to overwrite existing file: {}", path.display());
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
    }

    let tmp = temp_path(path);
    let result = write_synced(&tmp, contents).and_then(|()| {
        std::fs::rename(&tmp, path)
            .with_context(|| format!("Failed to atomically replace output file: {}", path.display()))
    });
    if result.is_err() {
        let _ = std::fs::remove_file(&tmp);
    }
    result
}

fn write_synced(tmp: &Path, contents: &str) -> Result<()> {
    let mut file = File::create(tmp).with_context(|| format!("Failed to create temp file: {}", tmp.display()))?;
    file.write_all(contents.as_bytes())
        .with_context(|| format!("Failed to write temp file: {}", tmp.display()))?;
    file.sync_all()
        .with_context(|| format!("Failed to sync temp file: {}", tmp.display()))?;
    Ok(())
}

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Unique per call so concurrent writers of one destination never share a
/// temp file.
fn temp_path(path: &Path) -> PathBuf {
    let n = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    let mut tmp = path.as_os_str().to_os_string();
    tmp.push(format!(".{}.{n}.tmp", std::process::id()));
    PathBuf::from(tmp)
}

pub fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_and_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("org/example/A.java");
        write_atomic(&path, "class A {}\n", false).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "class A {}\n");
        let leftovers: Vec<_> = std::fs::read_dir(path.parent().unwrap())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());

        write_atomic(&path, "class B {}\n", true).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "class B {}\n");
    }

    #[test]
    fn existing_file_needs_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("A.java");
        std::fs::write(&path, "old").unwrap();
        let err = write_atomic(&path, "new", false).unwrap_err();
        assert!(err.to_string().contains("Refusing to overwrite"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "old");
    }

    #[test]
    fn failed_rename_keeps_destination_and_removes_temp() {
        let dir = tempfile::tempdir().unwrap();
        // A non-empty directory cannot be replaced by a file.
        let path = dir.path().join("A.java");
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("keep.txt"), "old").unwrap();

        let err = write_atomic(&path, "new", true).unwrap_err();
        assert!(err.to_string().contains("Failed to atomically replace"));
        assert_eq!(std::fs::read_to_string(path.join("keep.txt")).unwrap(), "old");
        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn hash_is_sha256_hex() {
        assert_eq!(
            hash_content(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
