//! Embeddable core library for srcfix.
//!
//! Provides a clap-free, I/O-abstracted patch runner.
//!
//! # Port traits
//!
//! All file access goes through [`FileStore`](ports::FileStore). The
//! [`adapters`] module provides a filesystem-backed implementation with atomic
//! writes and an in-memory one.
//!
//! # Entry points
//!
//! - [`PatchRunner`](runner::PatchRunner): run resolved fix sets against a store
//! - [`run_apply`](pipeline::run_apply): load a config file, resolve, run
//! - [`write_run_artifacts`](pipeline::write_run_artifacts): persist the report

pub mod adapters;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod ports;
pub mod reporter;
pub mod runner;
pub mod settings;

pub use config::{Overrides, ResolvedConfig};
pub use error::{ConfigError, ToolError};
pub use runner::{PatchJob, PatchRunner, RunOutcome};
pub use settings::{ApplySettings, RunOptions};
