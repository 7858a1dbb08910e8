use chrono::Utc;
use pretty_assertions::assert_eq;
use srcfix_types::config::{DecodeFallback, GuardDef, PatchConfig, PatternKind};
use srcfix_types::report::{
    FileOutcome, FileReport, RuleReport, RuleStatus, RunSummary, WarningKind,
};

const TOML_CONFIG: &str = r#"
base_dir = "source"

[[fix_sets]]
id = "cmake-nominmax"
description = "Add NOMINMAX to VACore"
target_files = ["VACore/CMakeLists.txt"]

[[fix_sets.rules]]
id = "nominmax"
pattern = '(target_compile_definitions\s*\(\s*VACore\s+PUBLIC[^)]*PRIVATE)'
replacement = '$1\n        NOMINMAX'
dot_all = true
guard = { contains = "NOMINMAX" }
expect_match = true

[[fix_sets.rules]]
id = "degrees"
pattern = "°"
replacement = " degrees"
kind = "literal"
"#;

#[test]
fn toml_config_parses_all_rule_fields() {
    let cfg: PatchConfig = toml::from_str(TOML_CONFIG).expect("parse toml");

    assert_eq!(cfg.base_dir.as_deref().map(|p| p.as_str()), Some("source"));
    assert_eq!(cfg.decode_fallback, DecodeFallback::Drop);
    assert_eq!(cfg.fix_sets.len(), 1);

    let set = &cfg.fix_sets[0];
    assert_eq!(set.id, "cmake-nominmax");
    assert_eq!(set.target_files.len(), 1);

    let nominmax = &set.rules[0];
    assert_eq!(nominmax.kind, PatternKind::Regex);
    assert!(nominmax.dot_all);
    assert!(!nominmax.case_insensitive);
    assert!(nominmax.expect_match);
    assert_eq!(
        nominmax.guard,
        Some(GuardDef::Contains("NOMINMAX".to_string()))
    );

    let degrees = &set.rules[1];
    assert_eq!(degrees.kind, PatternKind::Literal);
    assert_eq!(degrees.guard, None);
    assert_eq!(degrees.description, "");
}

#[test]
fn json_config_accepts_name_alias_and_regex_guard() {
    let json = r#"{
        "decode_fallback": "replace",
        "fix_sets": [{
            "name": "evdl",
            "target_files": ["a.cpp", "b.cpp"],
            "rules": [{
                "id": "switch",
                "pattern": "CITAVariableDelayLine::SWITCH",
                "replacement": "EVDLAlgorithm::SWITCH",
                "guard": {"regex": "EVDLAlgorithm::SWITCH\\b"}
            }]
        }]
    }"#;

    let cfg: PatchConfig = serde_json::from_str(json).expect("parse json");
    assert_eq!(cfg.decode_fallback, DecodeFallback::Replace);
    assert_eq!(cfg.fix_sets[0].id, "evdl");
    assert_eq!(
        cfg.fix_sets[0].rules[0].guard,
        Some(GuardDef::Regex("EVDLAlgorithm::SWITCH\\b".to_string()))
    );
}

#[test]
fn yaml_config_parses() {
    let yaml = r#"
fix_sets:
  - id: macro
    target_files: [VACore/src/DataHistory/VADataHistoryModel_impl.h]
    rules:
      - id: not-implemented
        pattern: 'VA_EXCEPT_NOT_IMPLEMENTED\s*\(\s*\)\s*;'
        replacement: 'throw CVAException( CVAException::NOT_IMPLEMENTED, "Not implemented" );'
"#;
    let cfg: PatchConfig = serde_yaml::from_str(yaml).expect("parse yaml");
    assert_eq!(cfg.fix_sets[0].rules[0].id, "not-implemented");
    assert_eq!(cfg.base_dir, None);
}

#[test]
fn unknown_rule_fields_are_rejected() {
    let toml_str = r#"
[[fix_sets]]
id = "x"
target_files = ["a"]

[[fix_sets.rules]]
id = "r"
pattern = "a"
replacement = "b"
flags = "DOTALL"
"#;
    let err = toml::from_str::<PatchConfig>(toml_str).unwrap_err();
    assert!(err.to_string().contains("flags"));
}

#[test]
fn rule_and_outcome_enums_serialize_snake_case() {
    assert_eq!(
        serde_json::to_value(RuleStatus::NoMatch).unwrap(),
        serde_json::json!("no_match")
    );
    assert_eq!(
        serde_json::to_value(FileOutcome::WriteError).unwrap(),
        serde_json::json!("write_error")
    );
    assert_eq!(
        serde_json::to_value(WarningKind::NonIdempotent).unwrap(),
        serde_json::json!("non_idempotent")
    );
}

#[test]
fn file_report_omits_empty_optional_fields() {
    let report = FileReport {
        path: "a.cpp".to_string(),
        fix_set: "evdl".to_string(),
        outcome: FileOutcome::Unchanged,
        exists: true,
        changed: false,
        written: false,
        rules: vec![RuleReport {
            rule_id: "switch".to_string(),
            description: String::new(),
            status: RuleStatus::NoMatch,
            matches: 0,
            message: None,
        }],
        warnings: vec![],
        error: None,
        sha256_before: None,
        sha256_after: None,
    };

    let value = serde_json::to_value(&report).expect("serialize");
    assert!(value.get("warnings").is_none());
    assert!(value.get("error").is_none());
    assert!(value["rules"][0].get("message").is_none());
    assert_eq!(report.total_matches(), 0);
}

#[test]
fn run_summary_has_errors_counts_rule_failures() {
    let mut summary = RunSummary::new(Utc::now(), false);
    assert_eq!(summary.schema, "srcfix.run.v1");
    assert!(!summary.has_errors());

    summary.counts.rule_errors = 1;
    assert!(summary.has_errors());
}
