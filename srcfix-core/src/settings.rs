//! Clap-free settings for the run pipeline.

use crate::config::CONFIG_FILE_NAME;
use camino::Utf8PathBuf;

/// Per-run behaviour of the runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    /// Report what would change without writing.
    pub dry_run: bool,
    /// Re-apply each fix set to its own output and warn if anything matches again.
    pub verify_idempotence: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            verify_idempotence: true,
        }
    }
}

/// Settings for the apply pipeline.
#[derive(Debug, Clone)]
pub struct ApplySettings {
    pub config_path: Utf8PathBuf,
    pub base_dir: Option<Utf8PathBuf>,
    pub select: Vec<String>,
    pub options: RunOptions,
}

impl Default for ApplySettings {
    fn default() -> Self {
        Self {
            config_path: Utf8PathBuf::from(CONFIG_FILE_NAME),
            base_dir: None,
            select: Vec::new(),
            options: RunOptions::default(),
        }
    }
}
