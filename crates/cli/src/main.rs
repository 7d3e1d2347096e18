// DealProof CLI - headless bill-back reconciliation runs.

mod exit_codes;
mod report;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use dealproof_engine::ReconConfig;
use dealproof_io::extract::{extract_claims, extract_deals};
use dealproof_io::enrich::{
    enrich_claims, enrich_deals, filter_cohort_claims, filter_cohort_deals, ItemRef,
};
use dealproof_io::states::StatesRef;
use dealproof_io::table::Table;
use dealproof_io::IoError;

use exit_codes::{
    EXIT_GROUP_WARNINGS, EXIT_INVALID_CONFIG, EXIT_RUNTIME, EXIT_SUCCESS, EXIT_VARIANCE,
};

#[derive(Parser)]
#[command(name = "dproof")]
#[command(about = "Bill-back vs deal reconciliation (CLI mode, headless)")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a reconciliation from a TOML config file
    #[command(after_help = "\
Examples:
  dproof run audit.toml
  dproof run audit.toml --json
  dproof run audit.toml --output result.json
  dproof run audit.toml --report markdown --report-output summary.md")]
    Run {
        /// Path to the .toml config file
        config: PathBuf,

        /// Output full result JSON to stdout instead of the human summary
        #[arg(long)]
        json: bool,

        /// Write full result JSON to file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Render a summary report in the given format
        #[arg(long)]
        report: Option<ReportFormat>,

        /// Write the report to file instead of stdout
        #[arg(long)]
        report_output: Option<PathBuf>,
    },

    /// Validate a config without running
    Validate {
        /// Path to the .toml config file
        config: PathBuf,
    },

    /// Show availability of the data files a config references
    Sources {
        /// Path to the .toml config file
        config: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ReportFormat {
    Text,
    Markdown,
}

struct CliError {
    code: u8,
    message: String,
    hint: Option<String>,
}

fn cli_err(code: u8, message: impl Into<String>) -> CliError {
    CliError { code, message: message.into(), hint: None }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Run { config, json, output, report, report_output } => {
            cmd_run(config, json, output, report, report_output)
        }
        Commands::Validate { config } => cmd_validate(config),
        Commands::Sources { config } => cmd_sources(config),
    };

    match outcome {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => {
            eprintln!("error: {}", e.message);
            if let Some(hint) = &e.hint {
                eprintln!("hint: {hint}");
            }
            ExitCode::from(e.code)
        }
    }
}

/// Load a source table, dispatching on file extension: `.csv` goes through
/// the CSV reader, everything else through the workbook reader.
fn load_table(path: &Path, sheet: Option<&str>) -> Result<Table, IoError> {
    let is_csv = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);
    if is_csv {
        dealproof_io::csv::load_csv(path)
    } else {
        dealproof_io::sheet::load_sheet(path, sheet)
    }
}

fn read_config(config_path: &Path) -> Result<(ReconConfig, PathBuf), CliError> {
    let config_str = std::fs::read_to_string(config_path)
        .map_err(|e| cli_err(EXIT_RUNTIME, format!("cannot read config: {e}")))?;
    let config = ReconConfig::from_toml(&config_str)
        .map_err(|e| cli_err(EXIT_INVALID_CONFIG, e.to_string()))?;
    // Data files resolve relative to the config file's directory.
    let base_dir = config_path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();
    Ok((config, base_dir))
}

fn cmd_run(
    config_path: PathBuf,
    json_output: bool,
    output_file: Option<PathBuf>,
    report: Option<ReportFormat>,
    report_output: Option<PathBuf>,
) -> Result<(), CliError> {
    let (config, base_dir) = read_config(&config_path)?;
    let runtime_err = |e: IoError| cli_err(EXIT_RUNTIME, e.to_string());

    // Load + extract both sides.
    let claim_table = load_table(&base_dir.join(&config.claims.file), config.claims.sheet.as_deref())
        .map_err(runtime_err)?;
    let mut claims = extract_claims(&claim_table, &config.claims.columns).map_err(runtime_err)?;

    let deal_table = load_table(&base_dir.join(&config.deals.file), config.deals.sheet.as_deref())
        .map_err(runtime_err)?;
    let mut deals = extract_deals(&deal_table, &config.deals.columns).map_err(runtime_err)?;

    // Reference tables are optional; when present they must load cleanly.
    let states = match &config.references.states {
        Some(source) => {
            let table = load_table(&base_dir.join(&source.file), source.sheet.as_deref())
                .map_err(runtime_err)?;
            Some(StatesRef::from_table(&table, &source.columns).map_err(runtime_err)?)
        }
        None => None,
    };
    let item_ref = match &config.references.item_ref {
        Some(source) => {
            let table = load_table(&base_dir.join(&source.file), source.sheet.as_deref())
                .map_err(runtime_err)?;
            Some(ItemRef::from_table(&table, &source.columns).map_err(runtime_err)?)
        }
        None => None,
    };

    enrich_claims(&mut claims, item_ref.as_ref(), states.as_ref());
    enrich_deals(&mut deals);

    let claims = filter_cohort_claims(claims, &config.cohort);
    let deals = filter_cohort_deals(deals, &config.cohort);

    eprintln!(
        "cohort '{}': {} claim rows, {} deal rows",
        config.cohort.brand_pack,
        claims.len(),
        deals.len(),
    );

    let claim_records: Vec<_> = claims.iter().map(|r| r.record.clone()).collect();
    let deal_records: Vec<_> = deals.iter().map(|r| r.record.clone()).collect();
    let result = dealproof_engine::run(&config, &claim_records, &deal_records);

    for w in &result.warnings {
        eprintln!("warning: material '{}' skipped: {}", w.material_id, w.message);
    }

    // Exports configured in the file, then the command-line flags.
    if let Some(ref csv_path) = config.output.csv {
        let path = base_dir.join(csv_path);
        dealproof_io::export::write_results_csv(&path, &result.rows).map_err(runtime_err)?;
        eprintln!("wrote {}", path.display());
    }
    if let Some(ref json_path) = config.output.json {
        let path = base_dir.join(json_path);
        dealproof_io::export::write_result_json(&path, &result).map_err(runtime_err)?;
        eprintln!("wrote {}", path.display());
    }
    if let Some(ref path) = output_file {
        dealproof_io::export::write_result_json(path, &result).map_err(runtime_err)?;
        eprintln!("wrote {}", path.display());
    }

    if json_output {
        let value = dealproof_io::export::result_json(&result);
        let json_str = serde_json::to_string_pretty(&value)
            .map_err(|e| cli_err(EXIT_RUNTIME, format!("JSON serialization error: {e}")))?;
        println!("{json_str}");
    }

    if let Some(format) = report {
        let generated_at = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let rendered = match format {
            ReportFormat::Text => report::render_text(&result, &generated_at),
            ReportFormat::Markdown => report::render_markdown(&result, &generated_at),
        };
        match &report_output {
            Some(path) => {
                std::fs::write(path, rendered)
                    .map_err(|e| cli_err(EXIT_RUNTIME, format!("cannot write report: {e}")))?;
                eprintln!("wrote {}", path.display());
            }
            None => println!("{rendered}"),
        }
    }

    // Human summary to stderr.
    let s = &result.summary;
    eprintln!(
        "recon '{}': {} records, {} perfect, {} mismatched, {} missing deals, {} PPM only, net variance ${:.2}",
        result.meta.config_name,
        s.total_records,
        s.perfect_matches,
        s.field_mismatches,
        s.missing_deals,
        s.ppm_only,
        s.total_variance,
    );

    if s.field_mismatches + s.missing_deals + s.ppm_only > 0 {
        return Err(CliError {
            code: EXIT_VARIANCE,
            message: "variances found".to_string(),
            hint: Some("rerun with --report text for a breakdown".to_string()),
        });
    }
    if !result.warnings.is_empty() {
        return Err(cli_err(EXIT_GROUP_WARNINGS, "material groups skipped"));
    }

    Ok(())
}

fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let (config, _) = read_config(&config_path)?;
    eprintln!(
        "valid: '{}', cohort '{}', threshold {}",
        config.name, config.cohort.brand_pack, config.matching.close_threshold,
    );
    Ok(())
}

fn cmd_sources(config_path: PathBuf) -> Result<(), CliError> {
    let (config, base_dir) = read_config(&config_path)?;

    let mut entries: Vec<(&str, &str)> = vec![
        ("Bill back", config.claims.file.as_str()),
        ("PPM", config.deals.file.as_str()),
    ];
    if let Some(ref states) = config.references.states {
        entries.push(("States", states.file.as_str()));
    }
    if let Some(ref item_ref) = config.references.item_ref {
        entries.push(("Item x Ref", item_ref.file.as_str()));
    }

    println!("{:<12} {:<10} {:<17} {}", "Source", "Status", "Modified", "Path");
    for (name, file) in entries {
        let path = base_dir.join(file);
        let (status, modified) = match std::fs::metadata(&path) {
            Ok(meta) => {
                let modified = meta
                    .modified()
                    .ok()
                    .map(|t| {
                        chrono::DateTime::<chrono::Local>::from(t)
                            .format("%Y-%m-%d %H:%M")
                            .to_string()
                    })
                    .unwrap_or_else(|| "unknown".to_string());
                ("Available", modified)
            }
            Err(_) => ("Missing", String::new()),
        };
        println!("{:<12} {:<10} {:<17} {}", name, status, modified, path.display());
    }

    Ok(())
}
