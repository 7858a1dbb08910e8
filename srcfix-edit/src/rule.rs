//! A single pattern/replacement transformation.
//!
//! Every rule compiles to one [`Regex`]. Literal rules escape their pattern
//! and insert their replacement verbatim; regex rules expand `$1` / `${name}`
//! group references. A rule never touches the filesystem.

use crate::error::RuleError;
use regex::{NoExpand, Regex, RegexBuilder};
use srcfix_types::config::{FixRuleDef, GuardDef, PatternKind};
use std::borrow::Cow;

#[derive(Debug, Clone)]
pub struct FixRule {
    id: String,
    description: String,
    regex: Regex,
    replacement: String,
    expand: bool,
    guard: Option<Guard>,
    expect_match: bool,
}

/// Presence check meaning "already applied": when it holds, the rule is skipped.
#[derive(Debug, Clone)]
pub enum Guard {
    Contains(String),
    Pattern(Regex),
}

impl Guard {
    pub fn holds(&self, text: &str) -> bool {
        match self {
            Guard::Contains(marker) => text.contains(marker.as_str()),
            Guard::Pattern(re) => re.is_match(text),
        }
    }
}

/// Result of running one rule over a text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleApplication<'t> {
    pub text: Cow<'t, str>,
    /// Non-overlapping replacements performed.
    pub matches: u64,
    pub guarded: bool,
}

#[derive(Debug, Clone, Copy, Default)]
struct Flags {
    case_insensitive: bool,
    dot_all: bool,
    multi_line: bool,
}

impl FixRule {
    /// Regex rule whose replacement may reference capture groups.
    pub fn regex(
        id: impl Into<String>,
        pattern: &str,
        replacement: impl Into<String>,
    ) -> Result<Self, RuleError> {
        let id = id.into();
        let regex = build_regex(&id, pattern, Flags::default())?;
        Ok(Self::from_parts(id, regex, replacement.into(), true))
    }

    /// Verbatim substring rule.
    pub fn literal(
        id: impl Into<String>,
        pattern: &str,
        replacement: impl Into<String>,
    ) -> Result<Self, RuleError> {
        let id = id.into();
        let regex = build_regex(&id, &regex::escape(pattern), Flags::default())?;
        Ok(Self::from_parts(id, regex, replacement.into(), false))
    }

    pub fn compile(def: &FixRuleDef) -> Result<Self, RuleError> {
        let flags = Flags {
            case_insensitive: def.case_insensitive,
            dot_all: def.dot_all,
            multi_line: def.multi_line,
        };
        let (source, expand) = match def.kind {
            PatternKind::Regex => (Cow::Borrowed(def.pattern.as_str()), true),
            PatternKind::Literal => (Cow::Owned(regex::escape(&def.pattern)), false),
        };
        let regex = build_regex(&def.id, &source, flags)?;

        let guard = match &def.guard {
            None => None,
            Some(GuardDef::Contains(marker)) => Some(Guard::Contains(marker.clone())),
            Some(GuardDef::Regex(pattern)) => {
                let re = Regex::new(pattern).map_err(|e| RuleError::InvalidGuard {
                    rule_id: def.id.clone(),
                    message: e.to_string(),
                })?;
                Some(Guard::Pattern(re))
            }
        };

        let mut rule = Self::from_parts(def.id.clone(), regex, def.replacement.clone(), expand);
        rule.description = def.description.clone();
        rule.guard = guard;
        rule.expect_match = def.expect_match;
        Ok(rule)
    }

    fn from_parts(id: String, regex: Regex, replacement: String, expand: bool) -> Self {
        Self {
            id,
            description: String::new(),
            regex,
            replacement,
            expand,
            guard: None,
            expect_match: false,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_guard(mut self, guard: Guard) -> Self {
        self.guard = Some(guard);
        self
    }

    pub fn expecting_match(mut self) -> Self {
        self.expect_match = true;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn expect_match(&self) -> bool {
        self.expect_match
    }

    pub fn apply<'t>(&self, text: &'t str) -> RuleApplication<'t> {
        if let Some(guard) = &self.guard
            && guard.holds(text)
        {
            return RuleApplication {
                text: Cow::Borrowed(text),
                matches: 0,
                guarded: true,
            };
        }

        let matches = self.regex.find_iter(text).count() as u64;
        if matches == 0 {
            return RuleApplication {
                text: Cow::Borrowed(text),
                matches: 0,
                guarded: false,
            };
        }

        let replaced = if self.expand {
            self.regex.replace_all(text, self.replacement.as_str())
        } else {
            self.regex
                .replace_all(text, NoExpand(self.replacement.as_str()))
        };

        RuleApplication {
            text: replaced,
            matches,
            guarded: false,
        }
    }
}

/// Escape `text` so a regex rule inserts it verbatim.
pub fn escape_replacement(text: &str) -> String {
    text.replace('$', "$$")
}

fn build_regex(rule_id: &str, pattern: &str, flags: Flags) -> Result<Regex, RuleError> {
    let invalid = |message: String| RuleError::InvalidPattern {
        rule_id: rule_id.to_string(),
        message,
    };

    if pattern.is_empty() {
        return Err(invalid("pattern is empty".to_string()));
    }

    let re = RegexBuilder::new(pattern)
        .case_insensitive(flags.case_insensitive)
        .dot_matches_new_line(flags.dot_all)
        .multi_line(flags.multi_line)
        .build()
        .map_err(|e| invalid(e.to_string()))?;

    // A pattern that matches "" matches between every character.
    if re.is_match("") {
        return Err(invalid("pattern matches the empty string".to_string()));
    }

    Ok(re)
}
