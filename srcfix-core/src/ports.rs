//! Port traits abstracting all I/O away from the runner.

use camino::Utf8Path;

/// Path-addressable file access used by the runner and artifact writer.
pub trait FileStore {
    fn exists(&self, path: &Utf8Path) -> anyhow::Result<bool>;
    fn read(&self, path: &Utf8Path) -> anyhow::Result<Vec<u8>>;
    /// Replace `path` so readers see either the old or the new contents, never a mix.
    fn write_atomic(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()>;
    fn create_dir_all(&self, path: &Utf8Path) -> anyhow::Result<()>;
}
