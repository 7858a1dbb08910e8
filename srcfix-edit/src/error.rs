//! Error types for srcfix-edit.

use thiserror::Error;

/// A rule definition that could not be compiled.
///
/// Rule errors are scoped to a single rule: the rest of its fix set still runs.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RuleError {
    #[error("rule `{rule_id}`: invalid pattern: {message}")]
    InvalidPattern { rule_id: String, message: String },

    #[error("rule `{rule_id}`: invalid guard: {message}")]
    InvalidGuard { rule_id: String, message: String },
}

impl RuleError {
    pub fn rule_id(&self) -> &str {
        match self {
            RuleError::InvalidPattern { rule_id, .. } | RuleError::InvalidGuard { rule_id, .. } => {
                rule_id
            }
        }
    }
}
