//! Aggregates per-job reports into a [`RunSummary`]. No filesystem access.

use chrono::Utc;
use srcfix_types::report::{FileOutcome, FileReport, RunSummary};

#[derive(Debug)]
pub struct Reporter {
    summary: RunSummary,
}

impl Reporter {
    pub fn new(dry_run: bool) -> Self {
        Self {
            summary: RunSummary::new(Utc::now(), dry_run),
        }
    }

    /// Record the report for the next job. Call once per job, in job order.
    pub fn record(&mut self, report: FileReport) {
        let counts = &mut self.summary.counts;
        match report.outcome {
            FileOutcome::Changed => counts.changed += 1,
            FileOutcome::Unchanged => counts.unchanged += 1,
            FileOutcome::Missing => counts.missing += 1,
            FileOutcome::ReadError | FileOutcome::WriteError => counts.errored += 1,
        }
        counts.rule_errors += report.rule_errors();
        counts.warnings += report.warnings.len() as u64;
        self.summary.files.push(report);
    }

    pub fn finish(mut self) -> RunSummary {
        self.summary.ended_at = Some(Utc::now());
        self.summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use srcfix_types::report::{RuleReport, RuleStatus, SummaryCounts, Warning, WarningKind};

    fn report(path: &str, outcome: FileOutcome) -> FileReport {
        FileReport {
            path: path.to_string(),
            fix_set: "set".to_string(),
            outcome,
            exists: outcome != FileOutcome::Missing,
            changed: outcome == FileOutcome::Changed,
            written: outcome == FileOutcome::Changed,
            rules: vec![],
            warnings: vec![],
            error: None,
            sha256_before: None,
            sha256_after: None,
        }
    }

    #[test]
    fn counts_every_outcome_and_keeps_job_order() {
        let mut reporter = Reporter::new(false);
        reporter.record(report("c.cpp", FileOutcome::Changed));
        reporter.record(report("u.cpp", FileOutcome::Unchanged));

        let mut missing = report("m.cpp", FileOutcome::Missing);
        missing.warnings.push(Warning {
            kind: WarningKind::MissingFile,
            message: "file not found".to_string(),
            rule_id: None,
        });
        reporter.record(missing);

        reporter.record(report("r.cpp", FileOutcome::ReadError));

        let mut write_failed = report("w.cpp", FileOutcome::WriteError);
        write_failed.rules.push(RuleReport {
            rule_id: "bad".to_string(),
            description: String::new(),
            status: RuleStatus::Failed,
            matches: 0,
            message: Some("invalid pattern".to_string()),
        });
        reporter.record(write_failed);

        let summary = reporter.finish();
        assert_eq!(
            summary.counts,
            SummaryCounts {
                changed: 1,
                unchanged: 1,
                missing: 1,
                errored: 2,
                rule_errors: 1,
                warnings: 1,
            }
        );
        let order: Vec<_> = summary.files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(order, vec!["c.cpp", "u.cpp", "m.cpp", "r.cpp", "w.cpp"]);
        assert!(summary.ended_at.is_some());
        assert!(summary.has_errors());
    }
}
