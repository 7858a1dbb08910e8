//! Declarative fix configuration as written by users.
//!
//! These are raw, unvalidated records. Validation and rule compilation happen
//! in `srcfix-core` and `srcfix-edit`.

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatchConfig {
    /// Directory that relative target paths resolve against.
    /// Relative values resolve against the config file's own directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_dir: Option<Utf8PathBuf>,

    #[serde(default)]
    pub decode_fallback: DecodeFallback,

    #[serde(default)]
    pub fix_sets: Vec<FixSetDef>,
}

/// What to do with byte sequences that are not valid UTF-8.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecodeFallback {
    /// Discard undecodable bytes.
    #[default]
    Drop,
    /// Substitute U+FFFD for each undecodable sequence.
    Replace,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FixSetDef {
    #[serde(alias = "name")]
    pub id: String,

    #[serde(default)]
    pub description: String,

    pub target_files: Vec<Utf8PathBuf>,

    pub rules: Vec<FixRuleDef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FixRuleDef {
    pub id: String,

    #[serde(default)]
    pub description: String,

    pub pattern: String,

    pub replacement: String,

    #[serde(default)]
    pub kind: PatternKind,

    #[serde(default, skip_serializing_if = "is_false")]
    pub case_insensitive: bool,

    /// `.` also matches `\n`.
    #[serde(default, skip_serializing_if = "is_false")]
    pub dot_all: bool,

    /// `^` and `$` match at line boundaries.
    #[serde(default, skip_serializing_if = "is_false")]
    pub multi_line: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guard: Option<GuardDef>,

    /// Record a warning when the rule finds nothing to replace.
    #[serde(default, skip_serializing_if = "is_false")]
    pub expect_match: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    /// Regular expression; the replacement may reference groups (`$1`, `${name}`).
    #[default]
    Regex,
    /// Verbatim substring; the replacement is inserted verbatim.
    Literal,
}

/// Presence check that marks a rule as already applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardDef {
    Contains(String),
    Regex(String),
}

fn is_false(b: &bool) -> bool {
    !*b
}
