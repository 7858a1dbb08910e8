//! Error types for srcfix-core.
//!
//! Only [`ConfigError`] aborts a run, and it always does so before any target
//! file is touched. Per-file and per-rule failures are recorded in the run
//! summary instead.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config file {path}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config file {path}: {message}")]
    Parse { path: String, message: String },

    #[error("base directory {path} cannot be used: {reason}")]
    BaseDir { path: String, reason: String },

    #[error("fix set `{fix_set}` is malformed: {reason}")]
    InvalidFixSet { fix_set: String, reason: String },

    #[error("fix set `{0}` is declared more than once")]
    DuplicateFixSet(String),

    #[error("unknown fix set `{0}`")]
    UnknownFixSet(String),

    #[error("configuration declares no fix sets")]
    NoFixSets,
}

/// Pipeline error.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0:#}")]
    Internal(#[from] anyhow::Error),

    /// Raised by callers that treat recorded file or rule errors as failure.
    #[error("run recorded {errored} file error(s) and {rule_errors} rule error(s)")]
    ErrorsRecorded { errored: u64, rule_errors: u64 },
}

impl ToolError {
    pub fn is_config(&self) -> bool {
        matches!(self, ToolError::Config(_))
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            ToolError::Config(_) | ToolError::Internal(_) => 1,
            ToolError::ErrorsRecorded { .. } => 2,
        }
    }
}
