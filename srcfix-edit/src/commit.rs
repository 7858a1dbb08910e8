//! Atomic file replacement: write a temp file beside the target, then rename.
//!
//! Until [`StagedWrite::commit`] runs, the target is untouched. Dropping a
//! [`StagedWrite`] removes its temp file.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

const TEMP_PREFIX: &str = ".srcfix-";
const TEMP_SUFFIX: &str = ".tmp";

/// New contents written and synced to a temp file, not yet visible at the target.
#[derive(Debug)]
pub struct StagedWrite {
    target: Utf8PathBuf,
    temp: NamedTempFile,
}

/// Write `contents` to a temp file in the target's directory.
///
/// The temp file takes the target's permissions when the target exists.
pub fn stage_write(target: &Utf8Path, contents: &[u8]) -> anyhow::Result<StagedWrite> {
    let dir = parent_dir(target);
    let mut temp = tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .suffix(TEMP_SUFFIX)
        .tempfile_in(dir)
        .with_context(|| format!("create temp file in {}", dir))?;

    temp.write_all(contents)
        .with_context(|| format!("write temp file for {}", target))?;
    temp.as_file()
        .sync_all()
        .with_context(|| format!("sync temp file for {}", target))?;

    if let Ok(meta) = fs::metadata(target.as_std_path()) {
        fs::set_permissions(temp.path(), meta.permissions())
            .with_context(|| format!("copy permissions of {}", target))?;
    }

    debug!(target = %target, temp = %temp.path().display(), "staged write");
    Ok(StagedWrite {
        target: target.to_path_buf(),
        temp,
    })
}

impl StagedWrite {
    pub fn temp_path(&self) -> &Path {
        self.temp.path()
    }

    /// Replace the target with the staged contents in one rename.
    pub fn commit(self) -> anyhow::Result<()> {
        let Self { target, temp } = self;
        temp.persist(&target)
            .map_err(|e| e.error)
            .with_context(|| format!("rename into {}", target))?;
        sync_dir(parent_dir(&target));
        Ok(())
    }
}

/// Stage and commit in one step.
pub fn write_atomic(target: &Utf8Path, contents: &[u8]) -> anyhow::Result<()> {
    stage_write(target, contents)?.commit()
}

fn parent_dir(path: &Utf8Path) -> &Utf8Path {
    match path.parent() {
        Some(p) if !p.as_str().is_empty() => p,
        _ => Utf8Path::new("."),
    }
}

#[cfg(unix)]
fn sync_dir(dir: &Utf8Path) {
    // Best effort: the rename is already visible.
    if let Err(e) = fs::File::open(dir.as_std_path()).and_then(|d| d.sync_all()) {
        debug!(dir = %dir, error = %e, "directory sync failed");
    }
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Utf8Path) {}

#[cfg(test)]
mod tests {
    use super::*;

    fn utf8(path: &Path) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(path.to_path_buf()).expect("utf8 path")
    }

    #[test]
    fn write_atomic_replaces_contents() {
        let td = tempfile::tempdir().unwrap();
        let target = utf8(&td.path().join("a.cpp"));
        std::fs::write(&target, "old").unwrap();

        write_atomic(&target, b"new").unwrap();

        assert_eq!(std::fs::read_to_string(&target).unwrap(), "new");
        let leftovers: Vec<_> = std::fs::read_dir(td.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with(TEMP_PREFIX))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn dropped_stage_leaves_target_untouched() {
        let td = tempfile::tempdir().unwrap();
        let target = utf8(&td.path().join("a.cpp"));
        std::fs::write(&target, b"original \xB0 bytes").unwrap();

        let staged = stage_write(&target, b"replacement").unwrap();
        let temp_path = staged.temp_path().to_path_buf();
        assert_eq!(temp_path.parent(), Some(td.path()));
        assert!(temp_path.exists());

        drop(staged);

        assert_eq!(std::fs::read(&target).unwrap(), b"original \xB0 bytes");
        assert!(!temp_path.exists());
    }

    #[cfg(unix)]
    #[test]
    fn commit_preserves_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let td = tempfile::tempdir().unwrap();
        let target = utf8(&td.path().join("run.sh"));
        std::fs::write(&target, "echo old").unwrap();
        std::fs::set_permissions(&target, std::fs::Permissions::from_mode(0o755)).unwrap();

        write_atomic(&target, b"echo new").unwrap();

        let mode = std::fs::metadata(&target).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }

    #[test]
    fn stage_fails_when_directory_missing() {
        let td = tempfile::tempdir().unwrap();
        let target = utf8(&td.path().join("missing").join("a.cpp"));
        let err = stage_write(&target, b"x").unwrap_err();
        assert!(format!("{err:#}").contains("create temp file"));
    }
}
