//! Merges CLI arguments into pipeline settings.
//!
//! The config file itself is loaded by `srcfix-core`; this module only decides
//! which file to load and which values the command line overrides.

use camino::Utf8PathBuf;
use srcfix_core::config::CONFIG_FILE_NAME;
use srcfix_core::{ApplySettings, RunOptions};
use tracing::debug;

/// CLI values that feed [`ApplySettings`].
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub config: Option<Utf8PathBuf>,
    pub base_dir: Option<Utf8PathBuf>,
    pub select: Vec<String>,
    pub dry_run: bool,
    pub no_verify_idempotence: bool,
}

/// Config path to load: the explicit one, else `srcfix.toml` in the working directory.
pub fn config_path(explicit: Option<Utf8PathBuf>) -> Utf8PathBuf {
    explicit.unwrap_or_else(|| Utf8PathBuf::from(CONFIG_FILE_NAME))
}

pub fn apply_settings(cli: CliOverrides) -> ApplySettings {
    let mut select = cli.select;
    // Keep first occurrence; the run order comes from the file anyway.
    let mut seen = std::collections::BTreeSet::new();
    select.retain(|id| seen.insert(id.clone()));

    let settings = ApplySettings {
        config_path: config_path(cli.config),
        base_dir: cli.base_dir,
        select,
        options: RunOptions {
            dry_run: cli.dry_run,
            verify_idempotence: !cli.no_verify_idempotence,
        },
    };
    debug!(
        config = %settings.config_path,
        base_dir = ?settings.base_dir,
        select = ?settings.select,
        "merged cli settings"
    );
    settings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_config_in_working_directory() {
        let settings = apply_settings(CliOverrides::default());
        assert_eq!(settings.config_path, "srcfix.toml");
        assert!(settings.base_dir.is_none());
        assert!(settings.select.is_empty());
        assert_eq!(settings.options, RunOptions::default());
    }

    #[test]
    fn flags_override_defaults() {
        let settings = apply_settings(CliOverrides {
            config: Some("fixes/va.toml".into()),
            base_dir: Some("/src/VA".into()),
            select: vec!["evdl".to_string(), "includes".to_string(), "evdl".to_string()],
            dry_run: true,
            no_verify_idempotence: true,
        });
        assert_eq!(settings.config_path, "fixes/va.toml");
        assert_eq!(settings.base_dir.as_deref().map(|p| p.as_str()), Some("/src/VA"));
        assert_eq!(settings.select, vec!["evdl", "includes"]);
        assert!(settings.options.dry_run);
        assert!(!settings.options.verify_idempotence);
    }
}
