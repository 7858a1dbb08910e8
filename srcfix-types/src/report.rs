use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Structured result of one run. Besides the patched files themselves this is
/// the only artifact a run produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub schema: String,
    pub started_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,

    pub dry_run: bool,
    pub counts: SummaryCounts,

    /// One entry per job, in job order.
    #[serde(default)]
    pub files: Vec<FileReport>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryCounts {
    pub changed: u64,
    pub unchanged: u64,
    pub missing: u64,
    pub errored: u64,

    /// Rules that failed inside otherwise successful jobs.
    #[serde(default)]
    pub rule_errors: u64,

    #[serde(default)]
    pub warnings: u64,
}

impl RunSummary {
    pub fn new(started_at: DateTime<Utc>, dry_run: bool) -> Self {
        Self {
            schema: crate::schema::SRCFIX_RUN_V1.to_string(),
            started_at,
            ended_at: None,
            dry_run,
            counts: SummaryCounts::default(),
            files: vec![],
        }
    }

    /// True when any file or rule failed.
    pub fn has_errors(&self) -> bool {
        self.counts.errored > 0 || self.counts.rule_errors > 0
    }

    pub fn changed_files(&self) -> impl Iterator<Item = &FileReport> {
        self.files.iter().filter(|f| f.outcome == FileOutcome::Changed)
    }
}

/// Outcome of one (target file, fix set) job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReport {
    /// Target path as written in the configuration.
    pub path: String,
    pub fix_set: String,
    pub outcome: FileOutcome,
    pub exists: bool,

    /// Content after the fix set differs from the content read.
    pub changed: bool,

    /// The change was committed to disk (false on dry runs).
    #[serde(default)]
    pub written: bool,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<RuleReport>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<Warning>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256_before: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256_after: Option<String>,
}

impl FileReport {
    pub fn total_matches(&self) -> u64 {
        self.rules.iter().map(|r| r.matches).sum()
    }

    pub fn rule_errors(&self) -> u64 {
        self.rules
            .iter()
            .filter(|r| r.status == RuleStatus::Failed)
            .count() as u64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileOutcome {
    Changed,
    Unchanged,
    Missing,
    ReadError,
    WriteError,
}

impl FileOutcome {
    pub fn is_error(self) -> bool {
        matches!(self, FileOutcome::ReadError | FileOutcome::WriteError)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleReport {
    pub rule_id: String,

    #[serde(default)]
    pub description: String,

    pub status: RuleStatus,

    /// Non-overlapping replacements performed.
    pub matches: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleStatus {
    Applied,
    NoMatch,
    /// Guard held; the rule's effect is already present.
    Guarded,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    MissingFile,
    Decode,
    NoMatch,
    NonIdempotent,
}
