//! Sequential patch runner.
//!
//! Each job moves from pending to exactly one of
//! `Missing | ReadError | Changed | Unchanged | WriteError`. A failing job
//! never stops the run.
//!
//! On dry runs, a job whose file was already changed earlier in the run reads
//! that uncommitted output instead of the store, so the preview matches a real
//! run.

use crate::config::ResolvedConfig;
use crate::ports::FileStore;
use crate::reporter::Reporter;
use crate::settings::RunOptions;
use camino::{Utf8Path, Utf8PathBuf};
use std::collections::BTreeMap;
use srcfix_edit::{FileDiff, FixSet, decode_lossy, render_patch, sha256_hex};
use srcfix_types::report::{FileOutcome, FileReport, RunSummary, Warning, WarningKind};
use tracing::{debug, info, warn};

/// One (target file, fix set) pairing.
#[derive(Debug, Clone)]
pub struct PatchJob<'a> {
    /// Target as written in the configuration.
    pub target: &'a Utf8Path,
    /// Target resolved against the base directory.
    pub path: Utf8PathBuf,
    pub fix_set: &'a FixSet,
}

/// Outcome of `PatchRunner::run`.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub summary: RunSummary,
    /// Unified diff of every change, committed or (on dry runs) pending.
    pub patch: String,
}

struct PendingDiff {
    key: Utf8PathBuf,
    path: String,
    before: String,
    after: String,
}

/// State carried across the jobs of one run.
#[derive(Default)]
struct RunState {
    /// Uncommitted contents by resolved path, read back by later jobs on dry runs.
    overlay: BTreeMap<Utf8PathBuf, String>,
    /// One diff per file: first `before`, last `after`.
    diffs: Vec<PendingDiff>,
}

impl RunState {
    fn record_diff(&mut self, job: &PatchJob<'_>, before: String, after: String) {
        if let Some(diff) = self.diffs.iter_mut().find(|d| d.key == job.path) {
            diff.after = after;
        } else {
            self.diffs.push(PendingDiff {
                key: job.path.clone(),
                path: job.target.to_string(),
                before,
                after,
            });
        }
    }
}

pub struct PatchRunner<'a> {
    config: &'a ResolvedConfig,
    store: &'a dyn FileStore,
    options: RunOptions,
}

impl<'a> PatchRunner<'a> {
    pub fn new(config: &'a ResolvedConfig, store: &'a dyn FileStore) -> Self {
        Self {
            config,
            store,
            options: RunOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RunOptions) -> Self {
        self.options = options;
        self
    }

    /// Jobs in execution order: fix sets as declared, targets as listed.
    pub fn jobs(&self) -> Vec<PatchJob<'a>> {
        let config = self.config;
        config
            .fix_sets
            .iter()
            .flat_map(|set| {
                set.targets.iter().map(move |target| PatchJob {
                    target,
                    path: config.target_path(target),
                    fix_set: set,
                })
            })
            .collect()
    }

    pub fn run(&self) -> RunOutcome {
        let mut reporter = Reporter::new(self.options.dry_run);
        let mut state = RunState::default();

        for job in self.jobs() {
            let report = self.run_job(&job, &mut state);
            reporter.record(report);
        }

        let summary = reporter.finish();
        info!(
            changed = summary.counts.changed,
            unchanged = summary.counts.unchanged,
            missing = summary.counts.missing,
            errored = summary.counts.errored,
            dry_run = summary.dry_run,
            "run finished"
        );

        let patch = render_patch(state.diffs.iter().map(|d| FileDiff {
            path: &d.path,
            before: &d.before,
            after: &d.after,
        }));
        RunOutcome { summary, patch }
    }

    fn run_job(&self, job: &PatchJob<'_>, state: &mut RunState) -> FileReport {
        let set = job.fix_set;
        let mut report = FileReport {
            path: job.target.to_string(),
            fix_set: set.id.clone(),
            outcome: FileOutcome::Unchanged,
            exists: true,
            changed: false,
            written: false,
            rules: vec![],
            warnings: vec![],
            error: None,
            sha256_before: None,
            sha256_after: None,
        };

        let text = match state.overlay.get(&job.path) {
            Some(pending) => {
                debug!(path = %job.path, "reading uncommitted contents from earlier fix set");
                report.sha256_before = Some(sha256_hex(pending.as_bytes()));
                pending.clone()
            }
            None => match self.load(job, &mut report) {
                Some(text) => text,
                None => return report,
            },
        };

        let pass = set.apply(&text);
        for rule in &pass.rules {
            debug!(
                path = %job.path,
                rule = %rule.rule_id,
                status = ?rule.status,
                matches = rule.matches,
                "rule evaluated"
            );
        }
        report.warnings.extend(pass.warnings);

        if self.options.verify_idempotence {
            let again = set.apply(&pass.text);
            for rule in again.rules.iter().filter(|r| r.matches > 0) {
                warn!(path = %job.path, rule = %rule.rule_id, "rule matches its own output");
                report.warnings.push(Warning {
                    kind: WarningKind::NonIdempotent,
                    message: format!(
                        "rule `{}` would match {} more time(s) on a second run",
                        rule.rule_id, rule.matches
                    ),
                    rule_id: Some(rule.rule_id.clone()),
                });
            }
        }

        report.rules = pass.rules;
        report.changed = pass.text != text;

        if !report.changed {
            report.sha256_after = report.sha256_before.clone();
            debug!(path = %job.path, "no changes");
            return report;
        }

        report.sha256_after = Some(sha256_hex(pass.text.as_bytes()));

        if self.options.dry_run {
            state.overlay.insert(job.path.clone(), pass.text.clone());
        } else {
            if let Err(e) = self.store.write_atomic(&job.path, pass.text.as_bytes()) {
                warn!(path = %job.path, error = %format!("{e:#}"), "write failed; original left untouched");
                report.outcome = FileOutcome::WriteError;
                report.error = Some(format!("{e:#}"));
                return report;
            }
            report.written = true;
        }

        info!(
            path = %job.path,
            fix_set = %set.id,
            matches = report.total_matches(),
            written = report.written,
            "patched"
        );
        report.outcome = FileOutcome::Changed;
        state.record_diff(job, text, pass.text);
        report
    }

    /// Read and decode the target, recording missing or unreadable files on `report`.
    fn load(&self, job: &PatchJob<'_>, report: &mut FileReport) -> Option<String> {
        let set = job.fix_set;
        match self.store.exists(&job.path) {
            Ok(true) => {}
            Ok(false) => {
                warn!(path = %job.path, fix_set = %set.id, "target file not found");
                report.outcome = FileOutcome::Missing;
                report.exists = false;
                report.warnings.push(Warning {
                    kind: WarningKind::MissingFile,
                    message: format!("file not found: {}", job.path),
                    rule_id: None,
                });
                return None;
            }
            Err(e) => {
                read_failed(report, &e);
                return None;
            }
        }

        let bytes = match self.store.read(&job.path) {
            Ok(bytes) => bytes,
            Err(e) => {
                read_failed(report, &e);
                return None;
            }
        };
        report.sha256_before = Some(sha256_hex(&bytes));

        let decoded = decode_lossy(&bytes, self.config.decode_fallback);
        if decoded.is_lossy() {
            warn!(
                path = %job.path,
                invalid_sequences = decoded.invalid_sequences,
                "file is not valid UTF-8; decoded lossily"
            );
            report.warnings.push(Warning {
                kind: WarningKind::Decode,
                message: format!(
                    "{} invalid UTF-8 sequence(s) handled with {:?} fallback",
                    decoded.invalid_sequences, self.config.decode_fallback
                ),
                rule_id: None,
            });
        }

        Some(decoded.text)
    }
}

fn read_failed(report: &mut FileReport, err: &anyhow::Error) {
    warn!(path = %report.path, error = %format!("{err:#}"), "read failed");
    report.outcome = FileOutcome::ReadError;
    report.error = Some(format!("{err:#}"));
}
