//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and sets up logging
//! - parses CLI arguments into plain configuration
//! - runs the pipeline for the chosen subcommand
//! - prints reports/plots and writes optional exports

use std::path::Path;

use clap::Parser;
use log::info;

use crate::cli::{
    Command, ExtractArgs, FitArgs, GenerateArgs, HistogramArgs, PlotArgs, SegmentArgs, StatsArgs,
};
use crate::domain::{ExtractConfig, HistogramConfig, RunConfig, SegmentConfig};
use crate::error::{AppError, PeakError};

pub mod pipeline;

/// Size of the SVG files written by `fit --plot-dir`.
const SVG_SIZE: (u32, u32) = (1024, 640);

/// Entry point for the `pgrowth` binary.
pub fn run() -> Result<(), AppError> {
    // `.env` may supply the PEAK_GROWTH_* defaults read by clap.
    dotenvy::dotenv().ok();
    let cli = crate::cli::Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Extract(args) => handle_extract(args),
        Command::Fit(args) => handle_fit(args),
        Command::Histogram(args) => handle_histogram(args),
        Command::Stats(args) => handle_stats(args),
        Command::Plot(args) => handle_plot(args),
        Command::Generate(args) => handle_generate(args),
    }
}

fn init_logging(verbose: u8) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .try_init();
}

fn handle_extract(args: ExtractArgs) -> Result<(), AppError> {
    let config = ExtractConfig {
        input_path: args.input,
        output_dir: args.output_dir,
        prefix: args.prefix,
        segment: segment_config(&args.segment)?,
    };
    let written = pipeline::run_extract(&config)?;
    for path in &written {
        println!("Saved {}", path.display());
    }
    println!("Extracted {} peaks into {}", written.len() / 2, config.output_dir.display());
    Ok(())
}

fn handle_fit(args: FitArgs) -> Result<(), AppError> {
    let config = run_config_from_args(&args)?;
    let run = pipeline::run_fit(&config)?;
    let analysis = &run.analysis;
    let big_k = analysis.big_k_values();

    println!(
        "{}",
        crate::report::format_run_header(&config.input_path, run.samples, &config.segment, analysis.fits.len())
    );
    println!("{}", crate::report::format_fit_table(&analysis.fits));
    println!("{}", crate::report::format_big_k(&big_k));

    if config.plot {
        println!();
        println!(
            "{}",
            crate::plot::render_big_k_plot(&big_k, config.plot_width, config.plot_height)
        );
    }

    // Optional exports.
    if let Some(path) = &config.export_big_k {
        crate::io::write_big_k_csv(path, &analysis.fits)?;
        info!("wrote big K table to '{}'", path.display());
    }
    if let Some(path) = &config.export_summary {
        let summary =
            crate::io::build_summary(&config.input_path, &config.segment, run.samples, &analysis.fits);
        crate::io::write_summary_json(path, &summary)?;
        info!("wrote summary to '{}'", path.display());
    }
    if let Some(dir) = &config.plot_dir {
        std::fs::create_dir_all(dir).map_err(|e| PeakError::io(dir, e))?;
        let stem = file_stem(&config.input_path);
        let traces = dir.join(format!("{stem}_peaks.svg"));
        let big_k_svg = dir.join(format!("{stem}_big_k.svg"));
        crate::plot::draw_m_traces(&traces, &analysis.peaks, SVG_SIZE)?;
        crate::plot::draw_big_k(&big_k_svg, &big_k, SVG_SIZE)?;
        println!("Saved {}", traces.display());
        println!("Saved {}", big_k_svg.display());
    }

    Ok(())
}

fn handle_histogram(args: HistogramArgs) -> Result<(), AppError> {
    let config = HistogramConfig {
        input_path: args.input,
        output_dir: args.output_dir,
        segment: segment_config(&args.segment)?,
        bin_count: args.bin_count,
        max_bin: args.max_bin,
    };
    let out = pipeline::run_histogram(&config)?;

    println!("Total number of steps: {}", out.total_steps());
    println!("{}", crate::report::format_histogram(&out.histogram, 40));
    println!("Saved {}", out.svg_path.display());
    Ok(())
}

fn handle_stats(args: StatsArgs) -> Result<(), AppError> {
    for (name, group) in pipeline::run_stats(&args.dir)? {
        println!("{}", crate::report::format_group_measure(&name, &group));
    }
    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let summary = crate::io::read_summary_json(&args.summary)?;
    let plot = crate::plot::render_big_k_plot(&summary.big_k_values(), args.width, args.height);

    println!("{}", crate::report::format_big_k(&summary.big_k_values()));
    println!("{plot}");
    Ok(())
}

fn handle_generate(args: GenerateArgs) -> Result<(), AppError> {
    let config = crate::data::SampleConfig {
        peaks: args.peaks,
        samples: args.samples,
        seed: args.seed,
        noise: args.noise,
    };
    let data = crate::data::generate_series(&config)?;
    crate::data::write_series(&args.output, &data.series)?;
    println!(
        "Wrote {} rows with {} events to {}",
        data.series.len(),
        data.events.len(),
        args.output.display()
    );
    Ok(())
}

fn segment_config(args: &SegmentArgs) -> Result<SegmentConfig, PeakError> {
    SegmentConfig::new(args.min_height, args.rel_height)
}

pub fn run_config_from_args(args: &FitArgs) -> Result<RunConfig, PeakError> {
    Ok(RunConfig {
        input_path: args.input.clone(),
        segment: segment_config(&args.segment)?,
        plot: !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        plot_dir: args.plot_dir.clone(),
        export_big_k: args.export.clone(),
        export_summary: args.export_summary.clone(),
    })
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "series".to_string())
}
