//! Ripple Plot — coupled-inductor current ripple figures.
//!
//! Plots output ripple ΔIout and per-leg ripple ΔIleg against coupling
//! factor k, one curve pair per duty cycle.
//!
//! Usage:
//!   ripple-plot                          (same as `ripple-plot plot`)
//!   ripple-plot plot [--output FILE]
//!   ripple-plot table [--csv FILE]
//!   ripple-plot probe --k K --duty D
//!   ripple-plot summary
//!
//! Shared options select a preset (`--figure absolute|normalized|dual-axis`),
//! load parameters from JSON (`--params FILE`) and override single values
//! (`--vin`, `--fs`, `--l-self`, `--k-max`, `--duties`, `--samples`).

mod render;
mod stroke;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use ripple_core::figure::{FigureKind, FigureSpec, Series};
use ripple_core::output;
use ripple_core::params::RippleConfig;
use ripple_core::ripple::{self, Scale, Sweep};

/// Coupled-inductor current ripple versus coupling factor
#[derive(Parser)]
#[command(name = "ripple-plot", version)]
struct Cli {
    #[command(flatten)]
    figure: FigureArgs,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Render the figure to SVG and print the parameters used
    Plot {
        /// Output SVG path [default: ripple_<figure>.svg]
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Write the sampled curves as CSV
    Table {
        /// Write to this file instead of stdout
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Evaluate both ripple expressions at one point
    Probe {
        /// Coupling factor
        #[arg(long, allow_negative_numbers = true)]
        k: f64,
        /// Duty cycle
        #[arg(long)]
        duty: f64,
    },
    /// Print the parameter summary only
    Summary,
}

#[derive(Clone, Copy, ValueEnum)]
enum FigureChoice {
    Absolute,
    Normalized,
    DualAxis,
}

impl From<FigureChoice> for FigureKind {
    fn from(choice: FigureChoice) -> Self {
        match choice {
            FigureChoice::Absolute => FigureKind::Absolute,
            FigureChoice::Normalized => FigureKind::Normalized,
            FigureChoice::DualAxis => FigureKind::DualAxis,
        }
    }
}

#[derive(Args)]
struct FigureArgs {
    /// Figure preset
    #[arg(long, value_enum, default_value_t = FigureChoice::Absolute, global = true)]
    figure: FigureChoice,

    /// JSON parameter file replacing the preset's parameters
    #[arg(long, global = true)]
    params: Option<PathBuf>,

    /// Input voltage (V)
    #[arg(long, global = true)]
    vin: Option<f64>,

    /// Switching frequency (Hz)
    #[arg(long, global = true)]
    fs: Option<f64>,

    /// Self inductance (H)
    #[arg(long, global = true)]
    l_self: Option<f64>,

    /// Half-width of the k domain, below 1
    #[arg(long, global = true)]
    k_max: Option<f64>,

    /// Duty cycles, comma separated
    #[arg(long, value_delimiter = ',', global = true)]
    duties: Option<Vec<f64>>,

    /// Samples per curve
    #[arg(long, global = true)]
    samples: Option<usize>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let figure = build_figure(&cli.figure)?;

    match cli.command.unwrap_or(Command::Plot { output: None }) {
        Command::Plot { output } => cmd_plot(&figure, output),
        Command::Table { csv } => cmd_table(&figure, csv),
        Command::Probe { k, duty } => cmd_probe(&figure, k, duty),
        Command::Summary => cmd_summary(&figure),
    }
}

/// Preset, then parameter file, then single-value overrides.
fn build_figure(args: &FigureArgs) -> Result<FigureSpec> {
    let mut figure = FigureKind::from(args.figure).preset();

    if let Some(path) = &args.params {
        figure.config = RippleConfig::load(path)
            .with_context(|| format!("loading parameters from {}", path.display()))?;
    }

    let config = &mut figure.config;
    if let Some(vin) = args.vin {
        config.converter.vin = Some(vin);
    }
    if let Some(fs) = args.fs {
        config.converter.fs = fs;
    }
    if let Some(l_self) = args.l_self {
        config.converter.l_self = l_self;
    }
    if let Some(k_max) = args.k_max {
        config.sweep.k_max = k_max;
    }
    if let Some(duties) = &args.duties {
        config.sweep.duties = duties.clone();
    }
    if let Some(samples) = args.samples {
        config.sweep.samples = samples;
    }

    config.validate().context("invalid parameters")?;
    tracing::debug!(figure = figure.kind.name(), config = ?figure.config, "parameters resolved");
    Ok(figure)
}

fn evaluate(figure: &FigureSpec) -> Result<(Scale, Sweep)> {
    let scale = figure.config.scale()?;
    let sweep = ripple::sweep(&scale, figure.config.domain(), &figure.config.sweep.duties);
    Ok((scale, sweep))
}

// ─── Plot ───────────────────────────────────────────────────────────────────

fn cmd_plot(figure: &FigureSpec, output: Option<PathBuf>) -> Result<()> {
    let path = output.unwrap_or_else(|| PathBuf::from(format!("ripple_{}.svg", figure.kind.name())));
    let (scale, sweep) = evaluate(figure)?;

    render::render_svg(&path, figure, &scale, &sweep)
        .map_err(|e| anyhow!("rendering {} failed: {e}", path.display()))?;

    print_summary(figure, &scale)
}

// ─── Table ──────────────────────────────────────────────────────────────────

fn cmd_table(figure: &FigureSpec, csv: Option<PathBuf>) -> Result<()> {
    let (_, sweep) = evaluate(figure)?;

    match csv {
        Some(path) => {
            let file = File::create(&path)
                .with_context(|| format!("creating {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            output::write_csv(&sweep, &mut writer)?;
            writer.flush()?;
            tracing::info!(path = %path.display(), rows = sweep.k.len(), "CSV written");
        }
        None => {
            let mut writer = BufWriter::new(io::stdout().lock());
            output::write_csv(&sweep, &mut writer)?;
            writer.flush()?;
        }
    }
    Ok(())
}

// ─── Probe ──────────────────────────────────────────────────────────────────

fn cmd_probe(figure: &FigureSpec, k: f64, duty: f64) -> Result<()> {
    let scale = figure.config.scale()?;
    let unit = figure.config.unit();

    if k.abs() >= 1.0 {
        tracing::warn!(k, "coupling factor at or beyond a pole");
    }

    println!("Ripple at k = {k}, D = {duty} ({})", figure.kind.name());
    for series in [Series::OutputRipple, Series::LegRipple] {
        let value = output::series_value(&scale, series, k, duty);
        println!("  {}:  {value:.6} {unit}", series.label());
    }
    Ok(())
}

// ─── Summary ────────────────────────────────────────────────────────────────

fn cmd_summary(figure: &FigureSpec) -> Result<()> {
    let scale = figure.config.scale()?;
    print_summary(figure, &scale)
}

fn print_summary(figure: &FigureSpec, scale: &Scale) -> Result<()> {
    let mut stdout = io::stdout().lock();
    output::write_summary(figure, scale, &mut stdout)?;
    Ok(())
}
