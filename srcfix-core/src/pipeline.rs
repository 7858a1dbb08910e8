//! Config-file driven entry points, extracted from the CLI.

use crate::config::{Overrides, ResolvedConfig, load_config, resolve};
use crate::error::ToolError;
use crate::ports::FileStore;
use crate::runner::{PatchRunner, RunOutcome};
use crate::settings::ApplySettings;
use anyhow::Context;
use camino::Utf8Path;
use tracing::debug;

/// Load and resolve the configuration named by `settings`.
///
/// Fails before any target file is read.
pub fn load_resolved(settings: &ApplySettings) -> Result<ResolvedConfig, ToolError> {
    let config = load_config(&settings.config_path)?;
    let overrides = Overrides {
        base_dir: settings.base_dir.clone(),
        select: settings.select.clone(),
    };
    Ok(resolve(&config, settings.config_path.parent(), &overrides)?)
}

/// Run the apply pipeline.
pub fn run_apply(settings: &ApplySettings, store: &dyn FileStore) -> Result<RunOutcome, ToolError> {
    let resolved = load_resolved(settings)?;
    debug!(
        config = %settings.config_path,
        base_dir = %resolved.base_dir,
        dry_run = settings.options.dry_run,
        "starting run"
    );
    let runner = PatchRunner::new(&resolved, store).with_options(settings.options);
    Ok(runner.run())
}

/// Write `report.json`, `summary.md` and `patch.diff` to `out_dir`.
pub fn write_run_artifacts(
    outcome: &RunOutcome,
    out_dir: &Utf8Path,
    store: &dyn FileStore,
) -> anyhow::Result<()> {
    store.create_dir_all(out_dir)?;

    let json = serde_json::to_string_pretty(&outcome.summary).context("serialize run summary")?;
    store
        .write_atomic(&out_dir.join("report.json"), json.as_bytes())
        .context("write report.json")?;

    #[cfg(feature = "reporting")]
    {
        let md = srcfix_render::render_summary_md(&outcome.summary);
        store
            .write_atomic(&out_dir.join("summary.md"), md.as_bytes())
            .context("write summary.md")?;
    }

    store
        .write_atomic(&out_dir.join("patch.diff"), outcome.patch.as_bytes())
        .context("write patch.diff")?;
    Ok(())
}
