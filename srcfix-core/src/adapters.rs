//! Default port implementations.

use crate::ports::FileStore;
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use std::collections::BTreeMap;
use std::sync::Mutex;

/// Filesystem-backed store; writes go through `srcfix_edit::write_atomic`.
#[derive(Debug, Clone, Default)]
pub struct FsFileStore;

impl FileStore for FsFileStore {
    fn exists(&self, path: &Utf8Path) -> anyhow::Result<bool> {
        path.try_exists()
            .with_context(|| format!("stat {}", path))
    }

    fn read(&self, path: &Utf8Path) -> anyhow::Result<Vec<u8>> {
        Ok(fs::read(path.as_std_path())?)
    }

    fn write_atomic(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()> {
        srcfix_edit::write_atomic(path, contents)
    }

    fn create_dir_all(&self, path: &Utf8Path) -> anyhow::Result<()> {
        fs::create_dir_all(path.as_std_path())?;
        Ok(())
    }
}

/// In-memory store for embedding and testing.
#[derive(Debug, Default)]
pub struct InMemoryFileStore {
    files: Mutex<BTreeMap<Utf8PathBuf, Vec<u8>>>,
}

impl InMemoryFileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, path: impl Into<Utf8PathBuf>, contents: impl Into<Vec<u8>>) {
        self.lock().insert(path.into(), contents.into());
    }

    pub fn get(&self, path: &Utf8Path) -> Option<Vec<u8>> {
        self.lock().get(path).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<Utf8PathBuf, Vec<u8>>> {
        self.files.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl FileStore for InMemoryFileStore {
    fn exists(&self, path: &Utf8Path) -> anyhow::Result<bool> {
        Ok(self.lock().contains_key(path))
    }

    fn read(&self, path: &Utf8Path) -> anyhow::Result<Vec<u8>> {
        self.get(path)
            .with_context(|| format!("read {}: not found", path))
    }

    fn write_atomic(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()> {
        self.insert(path.to_path_buf(), contents.to_vec());
        Ok(())
    }

    fn create_dir_all(&self, _path: &Utf8Path) -> anyhow::Result<()> {
        Ok(())
    }
}
