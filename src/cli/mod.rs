//! Command-line parsing for the peak growth analyzer.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! segmentation and fitting code. Handlers in `app` turn these structs into
//! plain configuration before any pipeline code runs.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::domain::{DEFAULT_MIN_HEIGHT, DEFAULT_REL_HEIGHT};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "pgrowth",
    version,
    about = "Peak segmentation and logistic growth-curve fitting for three-channel series"
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). `RUST_LOG` overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract every peak into raw and zero-origined CSV tables.
    Extract(ExtractArgs),
    /// Fit the growth curve to every peak and report big K.
    Fit(FitArgs),
    /// Count height steps per peak and write a histogram.
    Histogram(HistogramArgs),
    /// Print width and height gained for each peak table in a directory.
    Stats(StatsArgs),
    /// Re-render the big K plot from a saved JSON summary.
    Plot(PlotArgs),
    /// Write a synthetic three-column series.
    Generate(GenerateArgs),
}

/// Peak detection options shared by the analysis commands.
#[derive(Debug, Args, Clone, Copy)]
pub struct SegmentArgs {
    /// Relative height at which peak width is measured (0 < t <= 1).
    #[arg(
        short = 't',
        long = "threshold",
        env = "PEAK_GROWTH_REL_HEIGHT",
        default_value_t = DEFAULT_REL_HEIGHT
    )]
    pub rel_height: f64,

    /// Peaks must rise strictly above this value in `m`.
    #[arg(long, env = "PEAK_GROWTH_MIN_HEIGHT", default_value_t = DEFAULT_MIN_HEIGHT)]
    pub min_height: f64,
}

#[derive(Debug, Args, Clone)]
pub struct ExtractArgs {
    /// Input table: whitespace-separated columns `x h m`.
    pub input: PathBuf,

    /// Output directory (created if missing).
    #[arg(short, long, env = "PEAK_GROWTH_OUTPUT_DIR")]
    pub output_dir: PathBuf,

    /// File name prefix for the peak tables.
    #[arg(short, long, default_value = "group")]
    pub prefix: String,

    #[command(flatten)]
    pub segment: SegmentArgs,
}

#[derive(Debug, Args, Clone)]
pub struct FitArgs {
    /// Input table: whitespace-separated columns `x h m`.
    pub input: PathBuf,

    #[command(flatten)]
    pub segment: SegmentArgs,

    /// Export per-peak parameters and big K to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export a JSON run summary (re-plot with `pgrowth plot`).
    #[arg(long = "export-summary")]
    pub export_summary: Option<PathBuf>,

    /// Directory for SVG plots of the peak traces and big K.
    #[arg(long)]
    pub plot_dir: Option<PathBuf>,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 80)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,
}

#[derive(Debug, Args, Clone)]
pub struct HistogramArgs {
    /// Input table: whitespace-separated columns `x h m`.
    pub input: PathBuf,

    /// Output directory for `<stem>_histogram.svg`.
    #[arg(short, long, env = "PEAK_GROWTH_OUTPUT_DIR")]
    pub output_dir: PathBuf,

    #[command(flatten)]
    pub segment: SegmentArgs,

    /// Number of histogram bins.
    #[arg(short, long, default_value_t = 20)]
    pub bin_count: usize,

    /// Step counts above this value are reported as overflow.
    #[arg(long, default_value_t = 100)]
    pub max_bin: usize,
}

#[derive(Debug, Args, Clone)]
pub struct StatsArgs {
    /// Directory holding peak tables (`*.csv`).
    #[arg(long, env = "PEAK_GROWTH_OUTPUT_DIR")]
    pub dir: PathBuf,
}

#[derive(Debug, Args, Clone)]
pub struct PlotArgs {
    /// Summary JSON produced by `pgrowth fit --export-summary`.
    #[arg(long, value_name = "JSON")]
    pub summary: PathBuf,

    /// Plot width (columns).
    #[arg(long, default_value_t = 80)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,
}

#[derive(Debug, Args, Clone)]
pub struct GenerateArgs {
    /// Output file.
    pub output: PathBuf,

    /// Number of events.
    #[arg(long, default_value_t = 5)]
    pub peaks: usize,

    /// Number of rows.
    #[arg(long, default_value_t = 500)]
    pub samples: usize,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Standard deviation of the jitter added to `h`.
    #[arg(long, default_value_t = 0.0)]
    pub noise: f64,
}
