//! Schema Typegen CLI
//!
//! Generates TypeScript types for a project, checks them for drift, and
//! shows or initializes configuration.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use schema_typegen::generator::{count_by_source, SkippedSchema};
use schema_typegen::{Typegen, TypegenConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "schema-typegen")]
#[command(about = "Generate TypeScript interfaces from content-type schemas")]
#[command(version)]
struct Cli {
    /// Project root (contains src/api and src/components)
    #[arg(short, long, default_value = ".", global = true)]
    root: PathBuf,

    /// Config file to load in addition to the defaults
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate all type files (default)
    Generate {
        /// Show what would be written without touching the disk
        #[arg(long)]
        dry_run: bool,
    },

    /// Report generated files that are missing or out of date
    Check {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Print unified diffs for changed files
        #[arg(long)]
        diff: bool,
    },

    /// View and manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the effective configuration as TOML
    Show,

    /// Write a default config file
    Init {
        /// Output path, relative to the project root
        #[arg(short, long, default_value = "typegen.toml")]
        output: PathBuf,
    },

    /// Validate configuration
    Validate,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<i32> {
    match cli.command.unwrap_or(Commands::Generate { dry_run: false }) {
        Commands::Generate { dry_run } => {
            let typegen = load(&cli.root, cli.config.as_deref())?;
            run_generate(&typegen, dry_run)
        }
        Commands::Check { format, diff } => {
            let typegen = load(&cli.root, cli.config.as_deref())?;
            run_check(&typegen, &format, diff)
        }
        Commands::Config { command } => run_config(&cli.root, cli.config, command),
    }
}

fn load(root: &Path, config_path: Option<&Path>) -> anyhow::Result<Typegen> {
    let config = TypegenConfig::load_from(root, config_path).context("failed to load configuration")?;
    Ok(Typegen::new(root, config))
}

fn run_generate(typegen: &Typegen, dry_run: bool) -> anyhow::Result<i32> {
    let plan = typegen.plan();

    if dry_run {
        println!("🔍 Dry run - {} files planned", plan.files.len());
        for (kind, count) in count_by_source(&plan) {
            println!("  {}: {}", kind, count);
        }
        for file in &plan.files {
            println!("  - {}", typegen.output_dir().join(&file.path).display());
        }
        print_skipped(&plan.skipped);
        return Ok(0);
    }

    let report = typegen.write(&plan).context("failed to write generated types")?;
    println!(
        "✅ {} written, {} unchanged, {} skipped",
        report.written.len(),
        report.unchanged,
        report.skipped.len()
    );
    print_skipped(&report.skipped);
    Ok(0)
}

fn run_check(typegen: &Typegen, format: &str, diff: bool) -> anyhow::Result<i32> {
    let plan = typegen.plan();
    let report = typegen.check(&plan).context("failed to read generated types")?;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for path in &report.missing {
            println!("  ➕ missing: {}", path.display());
        }
        for drift in &report.changed {
            println!(
                "  ✏️  changed: {} (+{} -{})",
                drift.path.display(),
                drift.added,
                drift.removed
            );
            if diff {
                println!("{}", drift.diff);
            }
        }
        print_skipped(&report.skipped);
    }

    if report.has_drift() {
        eprintln!(
            "\n⚠️  {} missing, {} changed - run `schema-typegen generate`",
            report.missing.len(),
            report.changed.len()
        );
        Ok(1)
    } else {
        eprintln!("\n✅ {} files up to date", report.up_to_date);
        Ok(0)
    }
}

fn run_config(
    root: &Path,
    config_path: Option<PathBuf>,
    command: ConfigCommands,
) -> anyhow::Result<i32> {
    match command {
        ConfigCommands::Show => {
            let config = TypegenConfig::load_from(root, config_path.as_deref())?;
            println!("{}", config.to_toml()?);
        }

        ConfigCommands::Init { output } => {
            let path = root.join(output);
            if path.exists() {
                anyhow::bail!("{} already exists", path.display());
            }
            TypegenConfig::default().save(&path)?;
            println!("✅ Created config file: {}", path.display());
        }

        ConfigCommands::Validate => match TypegenConfig::load_from(root, config_path.as_deref()) {
            Ok(config) => {
                println!("✅ Configuration is valid");
                println!("   API dir: {}", config.paths.api_dir.display());
                println!("   Components dir: {}", config.paths.components_dir.display());
                println!("   Output dir: {}", config.paths.output_dir.display());
                println!("   Includes: {}", config.include.len());
            }
            Err(e) => {
                eprintln!("❌ Configuration error: {}", e);
                return Ok(1);
            }
        },
    }
    Ok(0)
}

fn print_skipped(skipped: &[SkippedSchema]) {
    for schema in skipped {
        println!("  ⚠️  skipped {}: {}", schema.path.display(), schema.reason);
    }
}
