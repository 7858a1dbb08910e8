//! Shared DTOs (schemas-as-code) for the srcfix workspace.
//!
//! # Design constraints
//! - [`config`] types are read from user-authored files (TOML, JSON, YAML).
//! - [`report`] types are serialized to disk and consumed by test harnesses.
//! - Prefer adding optional fields over changing semantics.

pub mod config;
pub mod report;

/// Schema identifiers.
pub mod schema {
    pub const SRCFIX_RUN_V1: &str = "srcfix.run.v1";
}
