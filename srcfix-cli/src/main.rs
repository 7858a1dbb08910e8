mod config;

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use config::CliOverrides;
use srcfix_core::adapters::FsFileStore;
use srcfix_core::config::{load_config, validate};
use srcfix_core::pipeline::{load_resolved, run_apply, write_run_artifacts};
use srcfix_core::{RunOutcome, ToolError};
use srcfix_edit::FixSet;
use srcfix_render::render_summary_text;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "srcfix",
    version,
    about = "Idempotent, config-driven source patching for repairing third-party builds."
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Apply the configured fix sets to their target files.
    Apply(ApplyArgs),
    /// Validate the configuration and compile every rule without touching files.
    Check(CheckArgs),
    /// List the configured fix sets, their targets and rules.
    List(ListArgs),
}

#[derive(Debug, Parser)]
struct ApplyArgs {
    /// Config file (default: srcfix.toml in the current directory).
    #[arg(long, env = "SRCFIX_CONFIG")]
    config: Option<Utf8PathBuf>,

    /// Base directory for relative target paths (overrides `base_dir` in the config).
    #[arg(long)]
    base_dir: Option<Utf8PathBuf>,

    /// Only run the named fix set. May be repeated.
    #[arg(long = "set", value_name = "ID")]
    select: Vec<String>,

    /// Report what would change without writing anything.
    #[arg(long, default_value_t = false)]
    dry_run: bool,

    /// Skip the second pass that checks every rule is a no-op on its own output.
    #[arg(long, default_value_t = false)]
    no_verify_idempotence: bool,

    /// Output format (text, json).
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Write report.json, summary.md and patch.diff to this directory.
    #[arg(long)]
    out_dir: Option<Utf8PathBuf>,

    /// Exit with code 2 if any file or rule error was recorded.
    #[arg(long, default_value_t = false)]
    strict: bool,
}

#[derive(Debug, Parser)]
struct CheckArgs {
    /// Config file (default: srcfix.toml in the current directory).
    #[arg(long, env = "SRCFIX_CONFIG")]
    config: Option<Utf8PathBuf>,

    /// Base directory for relative target paths (overrides `base_dir` in the config).
    #[arg(long)]
    base_dir: Option<Utf8PathBuf>,
}

#[derive(Debug, Parser)]
struct ListArgs {
    /// Config file (default: srcfix.toml in the current directory).
    #[arg(long, env = "SRCFIX_CONFIG")]
    config: Option<Utf8PathBuf>,

    /// Output format (text, json).
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    if let Err(e) = real_main() {
        eprintln!("srcfix: {:#}", e);
        return ExitCode::from(e.exit_code());
    }
    ExitCode::from(0)
}

fn real_main() -> Result<(), ToolError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Apply(args) => cmd_apply(args),
        Command::Check(args) => cmd_check(args),
        Command::List(args) => cmd_list(args),
    }
}

fn cmd_apply(args: ApplyArgs) -> Result<(), ToolError> {
    let settings = config::apply_settings(CliOverrides {
        config: args.config,
        base_dir: args.base_dir,
        select: args.select,
        dry_run: args.dry_run,
        no_verify_idempotence: args.no_verify_idempotence,
    });

    let store = FsFileStore;
    let outcome = run_apply(&settings, &store)?;

    if let Some(out_dir) = &args.out_dir {
        write_run_artifacts(&outcome, out_dir, &store)
            .with_context(|| format!("write artifacts to {}", out_dir))?;
        info!("wrote run artifacts to {}", out_dir);
    }

    print_outcome(&outcome, args.format)?;

    let counts = outcome.summary.counts;
    if args.strict && outcome.summary.has_errors() {
        return Err(ToolError::ErrorsRecorded {
            errored: counts.errored,
            rule_errors: counts.rule_errors,
        });
    }
    Ok(())
}

fn print_outcome(outcome: &RunOutcome, format: OutputFormat) -> Result<(), ToolError> {
    match format {
        OutputFormat::Text => print!("{}", render_summary_text(&outcome.summary)),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&outcome.summary)
                .context("serialize run summary")?;
            println!("{}", json);
        }
    }
    Ok(())
}

fn cmd_check(args: CheckArgs) -> Result<(), ToolError> {
    let settings = config::apply_settings(CliOverrides {
        config: args.config,
        base_dir: args.base_dir,
        ..CliOverrides::default()
    });
    let resolved = load_resolved(&settings)?;

    let mut rules = 0;
    let mut broken = 0;
    let mut targets = 0;
    let mut missing = 0;
    for set in &resolved.fix_sets {
        rules += set.rules().len();
        for err in set.broken_rules() {
            broken += 1;
            println!("  [ERR] {}: {}", set.id, err);
        }
        for target in &set.targets {
            targets += 1;
            if !resolved.target_path(target).exists() {
                missing += 1;
                println!("  [WARN] {}: target not found: {}", set.id, target);
            }
        }
    }

    println!(
        "{}: {} fix set(s), {} rule(s), {} target(s), base dir {}",
        settings.config_path,
        resolved.fix_sets.len(),
        rules,
        targets,
        resolved.base_dir
    );
    if missing > 0 {
        println!("{} target(s) missing; they will be skipped with a warning", missing);
    }
    if broken > 0 {
        return Err(ToolError::ErrorsRecorded {
            errored: 0,
            rule_errors: broken,
        });
    }
    println!("ok");
    Ok(())
}

fn cmd_list(args: ListArgs) -> Result<(), ToolError> {
    let path = config::config_path(args.config);
    let file = load_config(&path)?;
    validate(&file)?;
    let sets: Vec<FixSet> = file.fix_sets.iter().map(FixSet::compile).collect();

    match args.format {
        OutputFormat::Text => {
            for set in &sets {
                if set.description.is_empty() {
                    println!("{}", set.id);
                } else {
                    println!("{}  {}", set.id, set.description);
                }
                println!("  targets:");
                for target in &set.targets {
                    println!("    {}", target);
                }
                println!("  rules:");
                for entry in set.rules() {
                    let state = if entry.rule.is_ok() { "" } else { " [invalid]" };
                    println!("    {:<24} {}{}", entry.id, entry.description, state);
                }
            }
        }
        OutputFormat::Json => {
            let listing: Vec<_> = sets
                .iter()
                .map(|set| {
                    serde_json::json!({
                        "id": set.id,
                        "description": set.description,
                        "target_files": set.targets,
                        "rules": set.rules().iter().map(|entry| serde_json::json!({
                            "id": entry.id,
                            "description": entry.description,
                            "valid": entry.rule.is_ok(),
                            "error": entry.rule.as_ref().err().map(|e| e.to_string()),
                        })).collect::<Vec<_>>(),
                    })
                })
                .collect();
            let json = serde_json::to_string_pretty(&listing).context("serialize fix sets")?;
            println!("{}", json);
        }
    }
    Ok(())
}
