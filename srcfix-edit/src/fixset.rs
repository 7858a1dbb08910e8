//! Ordered, named collections of rules bound to target files.

use crate::error::RuleError;
use crate::rule::FixRule;
use camino::Utf8PathBuf;
use srcfix_types::config::FixSetDef;
use srcfix_types::report::{RuleReport, RuleStatus, Warning, WarningKind};

#[derive(Debug, Clone)]
pub struct FixSet {
    pub id: String,
    pub description: String,
    pub targets: Vec<Utf8PathBuf>,
    rules: Vec<RuleEntry>,
}

/// A declared rule: compiled, or the reason it could not be.
#[derive(Debug, Clone)]
pub struct RuleEntry {
    pub id: String,
    pub description: String,
    pub rule: Result<FixRule, RuleError>,
}

/// Result of one pass of a fix set over a text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetApplication {
    pub text: String,
    /// One entry per declared rule, in declared order.
    pub rules: Vec<RuleReport>,
    pub warnings: Vec<Warning>,
}

impl SetApplication {
    pub fn total_matches(&self) -> u64 {
        self.rules.iter().map(|r| r.matches).sum()
    }
}

impl FixSet {
    pub fn new(id: impl Into<String>, targets: Vec<Utf8PathBuf>) -> Self {
        Self {
            id: id.into(),
            description: String::new(),
            targets,
            rules: vec![],
        }
    }

    /// Compile every rule of `def`. Rules that fail to compile are kept as
    /// broken entries so they show up in every report for this set.
    pub fn compile(def: &FixSetDef) -> Self {
        let mut set = Self::new(def.id.clone(), def.target_files.clone());
        set.description = def.description.clone();
        for rule_def in &def.rules {
            set.rules.push(RuleEntry {
                id: rule_def.id.clone(),
                description: rule_def.description.clone(),
                rule: FixRule::compile(rule_def),
            });
        }
        set
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn push_rule(&mut self, rule: FixRule) {
        self.rules.push(RuleEntry {
            id: rule.id().to_string(),
            description: rule.description().to_string(),
            rule: Ok(rule),
        });
    }

    pub fn rules(&self) -> &[RuleEntry] {
        &self.rules
    }

    pub fn broken_rules(&self) -> impl Iterator<Item = &RuleError> {
        self.rules.iter().filter_map(|e| e.rule.as_ref().err())
    }

    /// Run the rules in declared order, each over the previous rule's output.
    pub fn apply(&self, text: &str) -> SetApplication {
        let mut current = text.to_string();
        let mut rules = Vec::with_capacity(self.rules.len());
        let mut warnings = Vec::new();

        for entry in &self.rules {
            let rule = match &entry.rule {
                Ok(rule) => rule,
                Err(err) => {
                    rules.push(RuleReport {
                        rule_id: entry.id.clone(),
                        description: entry.description.clone(),
                        status: RuleStatus::Failed,
                        matches: 0,
                        message: Some(err.to_string()),
                    });
                    continue;
                }
            };

            let applied = rule.apply(&current);
            let status = if applied.guarded {
                RuleStatus::Guarded
            } else if applied.matches == 0 {
                RuleStatus::NoMatch
            } else {
                RuleStatus::Applied
            };
            let matches = applied.matches;
            if matches > 0 {
                current = applied.text.into_owned();
            }

            if status == RuleStatus::NoMatch && rule.expect_match() {
                warnings.push(Warning {
                    kind: WarningKind::NoMatch,
                    message: format!("rule `{}` matched nothing; manual edit required", entry.id),
                    rule_id: Some(entry.id.clone()),
                });
            }

            rules.push(RuleReport {
                rule_id: entry.id.clone(),
                description: entry.description.clone(),
                status,
                matches,
                message: None,
            });
        }

        SetApplication {
            text: current,
            rules,
            warnings,
        }
    }
}
