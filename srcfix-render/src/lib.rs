//! Rendering helpers for human-readable run summaries.

use srcfix_types::report::{FileOutcome, FileReport, RuleStatus, RunSummary};

/// Plain-text summary for the console.
pub fn render_summary_text(summary: &RunSummary) -> String {
    let mut out = String::new();
    let c = &summary.counts;

    out.push_str(if summary.dry_run {
        "srcfix run (dry run, nothing written)\n"
    } else {
        "srcfix run\n"
    });
    out.push_str(&format!(
        "  changed: {}  unchanged: {}  missing: {}  errored: {}  rule errors: {}  warnings: {}\n",
        c.changed, c.unchanged, c.missing, c.errored, c.rule_errors, c.warnings
    ));

    let changed: Vec<_> = summary.changed_files().collect();
    if !changed.is_empty() {
        out.push_str(if summary.dry_run {
            "\nWould modify:\n"
        } else {
            "\nModified:\n"
        });
        for f in changed {
            out.push_str(&format!("  [OK] {} ({})\n", f.path, f.fix_set));
            for r in f.rules.iter().filter(|r| r.matches > 0) {
                out.push_str(&format!(
                    "       - {}: {} ({})\n",
                    r.rule_id,
                    rule_label(&r.description, &r.rule_id),
                    r.matches
                ));
            }
        }
    }

    let unchanged: Vec<_> = files_with(summary, FileOutcome::Unchanged).collect();
    if !unchanged.is_empty() {
        out.push_str("\nNo changes:\n");
        for f in unchanged {
            out.push_str(&format!("  - {} ({})\n", f.path, f.fix_set));
        }
    }

    let problems: Vec<_> = summary
        .files
        .iter()
        .filter(|f| f.outcome == FileOutcome::Missing || f.outcome.is_error())
        .collect();
    if !problems.is_empty() {
        out.push_str("\nProblems:\n");
        for f in problems {
            let tag = if f.outcome.is_error() { "ERR" } else { "WARN" };
            let detail = f
                .error
                .clone()
                .unwrap_or_else(|| outcome_label(f.outcome).to_string());
            out.push_str(&format!("  [{}] {} ({}): {}\n", tag, f.path, f.fix_set, detail));
        }
    }

    let notes: Vec<_> = summary.files.iter().flat_map(file_notes).collect();
    if !notes.is_empty() {
        out.push_str("\nNotes:\n");
        for n in notes {
            out.push_str(&format!("  {}\n", n));
        }
    }

    out
}

pub fn render_summary_md(summary: &RunSummary) -> String {
    let mut out = String::new();
    let c = &summary.counts;
    out.push_str("# srcfix run\n\n");
    out.push_str(&format!("- Dry run: `{}`\n", summary.dry_run));
    out.push_str(&format!(
        "- Changed: {}\n- Unchanged: {}\n- Missing: {}\n- Errored: {}\n- Rule errors: {}\n- Warnings: {}\n\n",
        c.changed, c.unchanged, c.missing, c.errored, c.rule_errors, c.warnings
    ));

    out.push_str("## Files\n\n");
    if summary.files.is_empty() {
        out.push_str("_No jobs ran._\n");
        return out;
    }

    for (i, f) in summary.files.iter().enumerate() {
        out.push_str(&format!("### {}. {}\n\n", i + 1, f.path));
        out.push_str(&format!("- Fix set: `{}`\n", f.fix_set));
        out.push_str(&format!("- Outcome: `{}`\n", outcome_label(f.outcome)));
        if f.outcome == FileOutcome::Changed {
            out.push_str(&format!("- Written: `{}`\n", f.written));
        }
        if let (Some(before), Some(after)) = (&f.sha256_before, &f.sha256_after)
            && before != after
        {
            out.push_str(&format!("- sha256: {} → {}\n", before, after));
        }
        if let Some(err) = &f.error {
            out.push_str(&format!("- Error: {}\n", err));
        }

        if !f.rules.is_empty() {
            out.push_str("\n| Rule | Status | Matches |\n|------|--------|---------|\n");
            for r in &f.rules {
                out.push_str(&format!(
                    "| `{}` {} | {} | {} |\n",
                    md_cell(&r.rule_id),
                    md_cell(&r.description),
                    status_label(r.status),
                    r.matches
                ));
            }
        }

        if !f.warnings.is_empty() {
            out.push_str("\n**Warnings**\n\n");
            for w in &f.warnings {
                out.push_str(&format!("- {}\n", w.message));
            }
        }
        out.push('\n');
    }

    out
}

fn files_with(summary: &RunSummary, outcome: FileOutcome) -> impl Iterator<Item = &FileReport> {
    summary.files.iter().filter(move |f| f.outcome == outcome)
}

fn file_notes(f: &FileReport) -> Vec<String> {
    let mut notes = Vec::new();
    for r in f.rules.iter().filter(|r| r.status == RuleStatus::Failed) {
        notes.push(format!(
            "[ERR] {}: {}",
            f.path,
            r.message.as_deref().unwrap_or(r.rule_id.as_str())
        ));
    }
    // Missing-file warnings are already listed under problems.
    for w in f
        .warnings
        .iter()
        .filter(|w| w.kind != srcfix_types::report::WarningKind::MissingFile)
    {
        notes.push(format!("[WARN] {}: {}", f.path, w.message));
    }
    notes
}

/// Escape text for a Markdown table cell.
fn md_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

fn rule_label<'a>(description: &'a str, rule_id: &'a str) -> &'a str {
    if description.is_empty() {
        rule_id
    } else {
        description
    }
}

fn outcome_label(o: FileOutcome) -> &'static str {
    match o {
        FileOutcome::Changed => "changed",
        FileOutcome::Unchanged => "unchanged",
        FileOutcome::Missing => "missing",
        FileOutcome::ReadError => "read_error",
        FileOutcome::WriteError => "write_error",
    }
}

fn status_label(s: RuleStatus) -> &'static str {
    match s {
        RuleStatus::Applied => "applied",
        RuleStatus::NoMatch => "no_match",
        RuleStatus::Guarded => "guarded",
        RuleStatus::Failed => "failed",
    }
}
