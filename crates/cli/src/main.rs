//! Simulator counter-dump analysis CLI.
//!
//! This binary provides one subcommand per report artifact. It performs:
//! 1. **CPI breakdown:** Parse `stats.txt` of each run directory and write the CPI attribution CSV.
//! 2. **Collect:** Read a run table and write the per-run miss-rate/predictor metrics CSV.
//! 3. **Gains:** Render relative-gain tables per program, CPU, and dataset.
//! 4. **Efficiency:** Render IPC/mW tables per core.
//!
//! Tables go to stdout or to files; diagnostics go to stderr.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use simstats_core::aggregate;
use simstats_core::output::{check_destination, write_atomic};
use simstats_core::render::{self, DecimalSeparator};
use simstats_core::{AnalysisError, CpiModel, ReportConfig, Result};

const DEFAULT_CAPTION: &str =
    "Estimated memory-penalty contribution to CPI for Blowfish runs (gem5 miss-latency accounting).";

#[derive(Parser, Debug)]
#[command(
    name = "simstats",
    author,
    version,
    about = "Derive CPI, MPKI and gain tables from simulator counter dumps",
    long_about = "Derive CPI, MPKI and gain tables from simulator counter dumps.\n\nExamples:\n  simstats cpi --base runs --latex\n  simstats collect --dir dijkstra/plots_L1_A7\n  simstats gains --root . --out docs/sections/gains.tex\n  simstats efficiency --root . --out docs/sections/efficiency.tex"
)]
struct Cli {
    /// Log debug events (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// CPI attribution by memory level for a set of run directories.
    Cpi {
        /// Directory containing the run folders.
        #[arg(long, default_value = ".")]
        base: PathBuf,

        /// CSV output file.
        #[arg(long, default_value = "blowfish_mem_cpi.csv")]
        out: PathBuf,

        /// Also render the typeset table.
        #[arg(long)]
        latex: bool,

        /// Write the typeset table here instead of stdout.
        #[arg(long, requires = "latex")]
        latex_out: Option<PathBuf>,

        /// Caption of the typeset table.
        #[arg(long, default_value = DEFAULT_CAPTION)]
        caption: String,

        /// Prefix removed from folder names to form case labels.
        #[arg(long, default_value = "m5")]
        prefix: String,

        /// Run folders to process (each must contain stats.txt).
        #[arg(default_values = ["m5bfA7_small", "m5bfA15_small", "m5bfA7_large", "m5bfA15_large"])]
        dirs: Vec<String>,
    },

    /// Collect miss-rate and branch-predictor metrics for every run in a run table.
    Collect {
        /// Run table; defaults to the first resultats_*.csv in --dir.
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Directory searched when --csv is not given.
        #[arg(long, default_value = ".")]
        dir: PathBuf,

        /// Metrics output file; defaults to metrics_<suffix>.csv next to the run table.
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Relative gain tables against a baseline L1 size.
    Gains {
        /// Directory the metrics paths are relative to.
        #[arg(long, default_value = ".")]
        root: PathBuf,

        /// JSON report configuration; built-in layout when absent.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output file; stdout when absent.
        #[arg(long)]
        out: Option<PathBuf>,

        /// Add a generation timestamp to the header.
        #[arg(long)]
        timestamp: bool,
    },

    /// Energy-efficiency (IPC/mW) tables per core.
    Efficiency {
        /// Directory the metrics paths are relative to.
        #[arg(long, default_value = ".")]
        root: PathBuf,

        /// JSON report configuration; built-in layout when absent.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output file.
        #[arg(long)]
        out: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Cpi {
            base,
            out,
            latex,
            latex_out,
            caption,
            prefix,
            dirs,
        } => cmd_cpi(&base, &out, latex, latex_out.as_deref(), &caption, &prefix, &dirs),
        Commands::Collect { csv, dir, out } => cmd_collect(csv, &dir, out),
        Commands::Gains {
            root,
            config,
            out,
            timestamp,
        } => cmd_gains(&root, config.as_deref(), out.as_deref(), timestamp),
        Commands::Efficiency { root, config, out } => {
            cmd_efficiency(&root, config.as_deref(), &out)
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", failure_message(&e));
            ExitCode::FAILURE
        }
    }
}

/// Line printed to stderr for a fatal error, independent of the log filter.
fn failure_message(e: &AnalysisError) -> String {
    format!("Error: {e}")
}

/// Installs a stderr subscriber; `RUST_LOG` takes precedence over `--verbose`.
fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Computes the CPI breakdown for `dirs`, writes the CSV, and prints it.
///
/// Destinations are checked and every run is parsed and validated before anything
/// is written.
fn cmd_cpi(
    base: &Path,
    out: &Path,
    latex: bool,
    latex_out: Option<&Path>,
    caption: &str,
    prefix: &str,
    dirs: &[String],
) -> Result<()> {
    let _ = check_destination(out)?;
    if let Some(path) = latex_out {
        let _ = check_destination(path)?;
    }

    let model = CpiModel::default();
    let rows = aggregate::cpi_breakdown(base, dirs, prefix, &model)?;
    let csv_text =
        render::csv::cpi_table(&rows, &model).map_err(|e| AnalysisError::csv(out, e))?;
    let table = latex.then(|| {
        render::latex::cpi_table(
            &rows,
            model.first_label(),
            model.deepest_label(),
            caption,
            DecimalSeparator::Point,
        )
    });

    write_atomic(out, &csv_text)?;
    print!("{csv_text}");
    if let Some(table) = table {
        match latex_out {
            Some(path) => write_atomic(path, &table)?,
            None => print!("\n{table}"),
        }
    }
    Ok(())
}

/// Collects metrics for every run of a run table and writes the metrics CSV.
fn cmd_collect(csv: Option<PathBuf>, dir: &Path, out: Option<PathBuf>) -> Result<()> {
    let run_table = match csv {
        Some(path) => path,
        None => aggregate::discover_input(dir, "resultats_")?,
    };
    let out = out.unwrap_or_else(|| aggregate::default_metrics_path(&run_table));

    let records = aggregate::collect_metrics(&run_table)?;
    let text = render::csv::metrics_table(&records).map_err(|e| AnalysisError::csv(&out, e))?;
    write_atomic(&out, &text)?;
    info!(path = %out.display(), rows = records.len(), "metrics table written");
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<ReportConfig> {
    path.map_or_else(|| Ok(ReportConfig::default()), ReportConfig::from_path)
}

/// Renders the gain tables to `out` or stdout.
fn cmd_gains(root: &Path, config: Option<&Path>, out: Option<&Path>, timestamp: bool) -> Result<()> {
    let config = load_config(config)?;
    let generated = timestamp.then(|| chrono::Local::now().naive_local());
    let text = aggregate::gain_report(&config, root, generated)?;
    match out {
        Some(path) => write_atomic(path, &text),
        None => {
            print!("{text}");
            Ok(())
        }
    }
}

/// Renders the efficiency tables to `out`.
fn cmd_efficiency(root: &Path, config: Option<&Path>, out: &Path) -> Result<()> {
    let config = load_config(config)?;
    let text = aggregate::efficiency_report(&config, root)?;
    write_atomic(out, &text)
}
