//! Configuration loading, validation and resolution.
//!
//! A configuration file is parsed into [`PatchConfig`], validated, and then
//! resolved into a [`ResolvedConfig`]: an absolute base directory plus the
//! selected fix sets with their rules compiled.

use crate::error::ConfigError;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use srcfix_edit::FixSet;
use srcfix_types::config::{DecodeFallback, FixSetDef, PatchConfig};
use std::collections::BTreeSet;
use tracing::debug;

/// The config file name looked up when none is given.
pub const CONFIG_FILE_NAME: &str = "srcfix.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
    Yaml,
}

impl ConfigFormat {
    /// Pick a format from the file extension; TOML when unknown.
    pub fn from_path(path: &Utf8Path) -> Self {
        match path.extension().map(|e| e.to_ascii_lowercase()).as_deref() {
            Some("json") => ConfigFormat::Json,
            Some("yaml") | Some("yml") => ConfigFormat::Yaml,
            _ => ConfigFormat::Toml,
        }
    }
}

/// Caller overrides applied on top of the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub base_dir: Option<Utf8PathBuf>,
    /// Fix set ids to run. Empty means all.
    pub select: Vec<String>,
}

/// Validated configuration, ready to hand to a runner.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub base_dir: Utf8PathBuf,
    pub decode_fallback: DecodeFallback,
    /// Selected fix sets, in declared order.
    pub fix_sets: Vec<FixSet>,
}

impl ResolvedConfig {
    /// Resolve a target against the base directory.
    pub fn target_path(&self, target: &Utf8Path) -> Utf8PathBuf {
        if target.is_absolute() {
            target.to_path_buf()
        } else {
            self.base_dir.join(target)
        }
    }
}

pub fn load_config(path: &Utf8Path) -> Result<PatchConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_string(),
        source,
    })?;
    debug!(path = %path, "loaded config file");
    parse_config(&contents, ConfigFormat::from_path(path)).map_err(|e| match e {
        ConfigError::Parse { message, .. } => ConfigError::Parse {
            path: path.to_string(),
            message,
        },
        other => other,
    })
}

pub fn parse_config(contents: &str, format: ConfigFormat) -> Result<PatchConfig, ConfigError> {
    let parsed = match format {
        ConfigFormat::Toml => toml::from_str(contents).map_err(|e| e.to_string()),
        ConfigFormat::Json => serde_json::from_str(contents).map_err(|e| e.to_string()),
        ConfigFormat::Yaml => serde_yaml::from_str(contents).map_err(|e| e.to_string()),
    };
    parsed.map_err(|message| ConfigError::Parse {
        path: "<inline>".to_string(),
        message,
    })
}

/// Structural checks. Regex validity is not checked here: a rule that fails
/// to compile is a per-rule error, not a configuration error.
pub fn validate(config: &PatchConfig) -> Result<(), ConfigError> {
    if config.fix_sets.is_empty() {
        return Err(ConfigError::NoFixSets);
    }

    let mut seen = BTreeSet::new();
    for set in &config.fix_sets {
        if !seen.insert(set.id.as_str()) {
            return Err(ConfigError::DuplicateFixSet(set.id.clone()));
        }
        validate_fix_set(set)?;
    }
    Ok(())
}

fn validate_fix_set(set: &FixSetDef) -> Result<(), ConfigError> {
    let malformed = |reason: String| ConfigError::InvalidFixSet {
        fix_set: set.id.clone(),
        reason,
    };

    if set.id.trim().is_empty() {
        return Err(malformed("id is empty".to_string()));
    }
    if set.target_files.is_empty() {
        return Err(malformed("no target files".to_string()));
    }
    if set.rules.is_empty() {
        return Err(malformed("no rules".to_string()));
    }

    let mut targets = BTreeSet::new();
    for target in &set.target_files {
        if target.as_str().trim().is_empty() {
            return Err(malformed("empty target path".to_string()));
        }
        if !targets.insert(target.as_str()) {
            return Err(malformed(format!("target `{target}` listed twice")));
        }
    }

    let mut rule_ids = BTreeSet::new();
    for rule in &set.rules {
        if rule.id.trim().is_empty() {
            return Err(malformed("rule id is empty".to_string()));
        }
        if !rule_ids.insert(rule.id.as_str()) {
            return Err(malformed(format!("rule `{}` declared twice", rule.id)));
        }
        if rule.pattern.is_empty() {
            return Err(malformed(format!("rule `{}` has an empty pattern", rule.id)));
        }
    }
    Ok(())
}

/// Validate `config`, resolve its base directory and compile the selected
/// fix sets.
///
/// `config_dir` is the directory relative `base_dir` values resolve against.
pub fn resolve(
    config: &PatchConfig,
    config_dir: Option<&Utf8Path>,
    overrides: &Overrides,
) -> Result<ResolvedConfig, ConfigError> {
    validate(config)?;

    for id in &overrides.select {
        if !config.fix_sets.iter().any(|s| &s.id == id) {
            return Err(ConfigError::UnknownFixSet(id.clone()));
        }
    }

    let config_dir = match config_dir {
        Some(dir) if !dir.as_str().is_empty() => dir,
        _ => Utf8Path::new("."),
    };
    let base_dir = match (&overrides.base_dir, &config.base_dir) {
        (Some(cli), _) => cli.clone(),
        (None, Some(file)) if file.is_absolute() => file.clone(),
        (None, Some(file)) => config_dir.join(file),
        (None, None) => config_dir.to_path_buf(),
    };
    let base_dir = resolve_base_dir(&base_dir)?;

    let fix_sets = config
        .fix_sets
        .iter()
        .filter(|s| overrides.select.is_empty() || overrides.select.contains(&s.id))
        .map(FixSet::compile)
        .collect::<Vec<_>>();

    for set in &fix_sets {
        for err in set.broken_rules() {
            debug!(fix_set = %set.id, error = %err, "rule will be reported as failed");
        }
    }

    debug!(base_dir = %base_dir, fix_sets = fix_sets.len(), "resolved config");
    Ok(ResolvedConfig {
        base_dir,
        decode_fallback: config.decode_fallback,
        fix_sets,
    })
}

fn resolve_base_dir(path: &Utf8Path) -> Result<Utf8PathBuf, ConfigError> {
    let base_dir_error = |reason: String| ConfigError::BaseDir {
        path: path.to_string(),
        reason,
    };
    let canonical = path
        .canonicalize_utf8()
        .map_err(|e| base_dir_error(e.to_string()))?;
    if !canonical.is_dir() {
        return Err(base_dir_error("not a directory".to_string()));
    }
    Ok(canonical)
}
