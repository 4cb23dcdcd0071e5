use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use kitscope_core::storage::{read_records, write_rows};
use kitscope_core::{AppConfig, ExitCode, KitscopeError, MatchStrategy};
use kitscope_dedup::{
    DedupError, DedupReport, MatchSettings, SuggestedChangeRow, canonical_manufacturers,
    manufacturer_needs_update, normalize_manufacturer, normalize_model_exact,
    normalize_model_fuzzy,
};

// ─── CLI Definition ─────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "kitscope",
    about = "Equipment catalog normalization and duplicate review",
    version,
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output in JSON format.
    /// Also enabled by setting KITSCOPE_JSON=1.
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a catalog CSV and write review files.
    Scan {
        /// Catalog CSV with id, uuid, equipment_type, manufacturer, model columns.
        input: PathBuf,
        /// Matching strategy: exact or fuzzy.
        #[arg(long)]
        strategy: Option<String>,
        /// Fuzzy similarity threshold (0-100).
        #[arg(long)]
        threshold: Option<u8>,
        /// Directory for the review files.
        #[arg(long)]
        out_dir: Option<PathBuf>,
        /// Compute and print the summary without writing files.
        #[arg(long)]
        dry_run: bool,
    },

    /// Show the canonical forms of a manufacturer (and optionally a model).
    Normalize {
        manufacturer: String,
        #[arg(long)]
        model: Option<String>,
    },

    /// List the canonical manufacturer names the alias table maps to.
    Manufacturers,

    /// Config management.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Show version information.
    Version,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration.
    Show,
    /// Print the config file path.
    Path,
    /// Write a default config file.
    Init {
        #[arg(long)]
        force: bool,
    },
}

// ─── Main ────────────────────────────────────────────────────────────────────

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        std::process::exit(exit_code_for(&err) as i32);
    }
}

fn run() -> Result<()> {
    let start = Instant::now();
    let cli = Cli::parse();

    let json_output = cli.json || std::env::var("KITSCOPE_JSON").as_deref() == Ok("1");

    let mut config = AppConfig::load()?;
    init_logging(&config);

    match cli.command {
        Commands::Scan {
            input,
            strategy,
            threshold,
            out_dir,
            dry_run,
        } => {
            if let Some(s) = strategy {
                config.matching.strategy = s.parse::<MatchStrategy>()?;
            }
            if let Some(t) = threshold {
                config.matching.threshold = t;
            }
            if let Some(dir) = out_dir {
                config.output.directory = dir.to_string_lossy().to_string();
            }
            config.validate()?;

            let settings = MatchSettings::try_from(&config.matching)?;
            let catalog = read_records(&input)
                .with_context(|| format!("reading catalog {}", input.display()))?;
            let report = kitscope_dedup::run(catalog.records(), settings);

            let written = if dry_run {
                Vec::new()
            } else {
                write_report(&config, &report)?
            };
            let dur = start.elapsed().as_millis();
            tracing::info!(dry_run, files = written.len(), duration_ms = dur as u64, "scan finished");

            if json_output {
                print_json(&serde_json::json!({
                    "status": "ok",
                    "data": {
                        "settings": report.settings,
                        "summary": report.summary,
                        "manufacturer_changes": report.manufacturer_changes,
                        "files": written,
                    },
                    "meta": { "duration_ms": dur }
                }))?;
            } else {
                print_summary(&report, &written);
            }
        }

        Commands::Normalize {
            manufacturer,
            model,
        } => {
            let normalized = normalize_manufacturer(&manufacturer);
            let needs_update = manufacturer_needs_update(&manufacturer);
            let known = canonical_manufacturers().iter().any(|name| *name == normalized);
            let model_forms = model.as_deref().map(|m| {
                (normalize_model_exact(m), normalize_model_fuzzy(m))
            });
            let dur = start.elapsed().as_millis();

            if json_output {
                print_json(&serde_json::json!({
                    "status": "ok",
                    "data": {
                        "manufacturer": manufacturer,
                        "normalized_manufacturer": normalized,
                        "needs_update": needs_update,
                        "known": known,
                        "model_exact": model_forms.as_ref().map(|(e, _)| e),
                        "model_fuzzy": model_forms.as_ref().map(|(_, f)| f),
                    },
                    "meta": { "duration_ms": dur }
                }))?;
            } else {
                println!("Manufacturer: {manufacturer} → {normalized}");
                println!("  Needs update: {}", if needs_update { "yes" } else { "no" });
                println!("  Known manufacturer: {}", if known { "yes" } else { "no" });
                if let Some((exact, fuzzy)) = model_forms {
                    println!("  Model (exact key): {exact}");
                    println!("  Model (fuzzy key): {fuzzy}");
                }
            }
        }

        Commands::Manufacturers => {
            let names = canonical_manufacturers();
            if json_output {
                print_json(&serde_json::json!({"status":"ok","data":names}))?;
            } else {
                for name in names {
                    println!("{name}");
                }
            }
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => {
                if json_output {
                    print_json(&serde_json::json!({"status":"ok","data":config}))?;
                } else {
                    print!("{}", toml::to_string_pretty(&config)?);
                }
            }
            ConfigAction::Path => {
                let path = AppConfig::config_path();
                if json_output {
                    print_json(&serde_json::json!({"status":"ok","data":{"path":path,"exists":path.exists()}}))?;
                } else {
                    println!("{}", path.display());
                }
            }
            ConfigAction::Init { force } => {
                let path = AppConfig::config_path();
                if path.exists() && !force {
                    eprintln!("Config already exists: {} (use --force to overwrite)", path.display());
                    std::process::exit(ExitCode::InvalidArgs as i32);
                }
                AppConfig::default().save_to(&path)?;
                if json_output {
                    print_json(&serde_json::json!({"status":"ok","data":{"path":path}}))?;
                } else {
                    println!("Wrote default config: {}", path.display());
                }
            }
        },

        Commands::Version => {
            let version = env!("CARGO_PKG_VERSION");
            let dur = start.elapsed().as_millis();
            if json_output {
                print_json(&serde_json::json!({"status":"ok","data":{"version":version},"meta":{"duration_ms":dur}}))?;
            } else {
                println!("kitscope v{version}");
            }
        }
    }

    Ok(())
}

// ─── Helpers ────────────────────────────────────────────────────────────────

fn init_logging(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn write_report(config: &AppConfig, report: &DedupReport) -> Result<Vec<PathBuf>> {
    let changes: Vec<SuggestedChangeRow> = report.changes.iter().map(SuggestedChangeRow::from).collect();

    let mut written = Vec::new();
    write_file(&config.changes_path(), &changes, &mut written)?;
    write_file(&config.mapping_path(), &report.manufacturer_changes, &mut written)?;
    write_file(&config.updates_path(), &report.manufacturer_updates, &mut written)?;
    write_file(&config.review_path(), &report.review, &mut written)?;
    Ok(written)
}

fn write_file<T: serde::Serialize>(path: &Path, rows: &[T], written: &mut Vec<PathBuf>) -> Result<()> {
    write_rows(path, rows).with_context(|| format!("writing {}", path.display()))?;
    written.push(path.to_path_buf());
    Ok(())
}

fn print_summary(report: &DedupReport, written: &[PathBuf]) {
    let s = &report.summary;
    println!("SUMMARY ({} matching, threshold {})", report.settings.strategy, report.settings.threshold);
    println!("  Total records:            {}", s.total_records);
    println!("  DELETE (duplicates):      {} ({:.1}%)", s.deletes, s.duplicate_rate());
    println!("  UPDATE (normalization):   {}", s.updates);
    println!("  KEEP (no changes):        {}", s.keeps);
    println!("  Unique after dedup:       {}", s.unique_after_dedup);

    if !s.duplicates_by_type.is_empty() {
        println!("\n  Duplicates by equipment type:");
        for t in &s.duplicates_by_type {
            println!("    - {}: {}", t.equipment_type, t.duplicates);
        }
    }

    println!("\n  Manufacturer variations:  {}", s.manufacturer_variations);
    println!("  Records needing update:   {}", s.records_needing_update);
    for change in &report.manufacturer_changes {
        println!(
            "    - {} → {}: {} records",
            change.original_value, change.normalized_value, change.record_count
        );
    }

    if written.is_empty() {
        println!("\nDry run: no files written.");
    } else {
        println!("\nOutput files:");
        for path in written {
            println!("  - {}", path.display());
        }
        println!("\nReview the suggested changes before applying them to the database.");
    }
}

fn print_json(val: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(val)?);
    Ok(())
}

fn exit_code_for(err: &anyhow::Error) -> ExitCode {
    if let Some(e) = err.downcast_ref::<KitscopeError>() {
        return e.exit_code();
    }
    if err.downcast_ref::<DedupError>().is_some() {
        return ExitCode::InvalidArgs;
    }
    ExitCode::GeneralError
}
