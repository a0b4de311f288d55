//! Shared pipeline logic used by the CLI handlers and the integration tests.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! load -> segment -> extract -> fit (parallel) -> report
//!
//! The handlers in `app` then focus on presentation (printing, plots, exports).

use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use crate::domain::{
    ExtractConfig, ExtractedPeak, HistogramConfig, PeakFit, PeakSpan, RunConfig, SegmentConfig, Series,
};
use crate::error::PeakError;
use crate::fit::fit_all;
use crate::io::{load_series, read_peak_table, write_peak_tables};
use crate::peaks::extract_all_with;
use crate::plot::draw_histogram;
use crate::report::{GroupMeasure, Histogram, histogram, measure_group, step_counts};

/// Segmentation, extraction and fits for one series.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub spans: Vec<PeakSpan>,
    pub peaks: Vec<ExtractedPeak>,
    pub fits: Vec<PeakFit>,
}

impl Analysis {
    pub fn big_k_values(&self) -> Vec<Option<f64>> {
        self.fits.iter().map(PeakFit::big_k).collect()
    }
}

/// All computed outputs of a single `pgrowth fit` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub samples: usize,
    pub analysis: Analysis,
}

/// Outputs of the step histogram tool.
#[derive(Debug, Clone)]
pub struct HistogramOutput {
    pub step_counts: Vec<usize>,
    pub histogram: Histogram,
    pub svg_path: PathBuf,
}

impl HistogramOutput {
    pub fn total_steps(&self) -> usize {
        self.step_counts.iter().sum()
    }
}

/// Segment the `m` channel, extract every span and fit each peak.
pub fn analyze(series: &Series, segment: &SegmentConfig) -> Result<Analysis, PeakError> {
    let extracted = extract_all_with(series, segment)?;
    let fits = fit_all(&extracted);
    let (spans, peaks) = extracted.into_iter().unzip();
    Ok(Analysis { spans, peaks, fits })
}

/// Load, extract and write raw plus zero-origined peak tables.
pub fn run_extract(config: &ExtractConfig) -> Result<Vec<PathBuf>, PeakError> {
    let series = load_series(&config.input_path)?;
    let peaks: Vec<ExtractedPeak> = extract_all_with(&series, &config.segment)?
        .into_iter()
        .map(|(_, peak)| peak)
        .collect();
    info!("extracted {} peaks from '{}'", peaks.len(), config.input_path.display());
    write_peak_tables(&config.output_dir, &config.prefix, &peaks)
}

/// Load and analyze; exports are the caller's concern.
pub fn run_fit(config: &RunConfig) -> Result<RunOutput, PeakError> {
    let series = load_series(&config.input_path)?;
    let analysis = analyze(&series, &config.segment)?;
    Ok(RunOutput {
        samples: series.len(),
        analysis,
    })
}

/// Count height steps per peak, bin them, and write `<stem>_histogram.svg`.
pub fn run_histogram(config: &HistogramConfig) -> Result<HistogramOutput, PeakError> {
    let series = load_series(&config.input_path)?;
    let peaks: Vec<ExtractedPeak> = extract_all_with(&series, &config.segment)?
        .into_iter()
        .map(|(_, peak)| peak)
        .collect();
    let counts = step_counts(&peaks);
    let values: Vec<f64> = counts.iter().map(|&c| c as f64).collect();
    let hist = histogram(&values, config.bin_count, config.max_bin as f64);

    fs::create_dir_all(&config.output_dir).map_err(|e| PeakError::io(&config.output_dir, e))?;
    let stem = config
        .input_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "series".to_string());
    let svg_path = config.output_dir.join(format!("{stem}_histogram.svg"));
    draw_histogram(&svg_path, &hist, (800, 600))?;

    Ok(HistogramOutput {
        step_counts: counts,
        histogram: hist,
        svg_path,
    })
}

/// Measure every `*.csv` peak table in `dir`, sorted by file name.
pub fn run_stats(dir: &Path) -> Result<Vec<(String, GroupMeasure)>, PeakError> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(|e| PeakError::io(dir, e))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "csv"))
        .collect();
    paths.sort();

    paths
        .iter()
        .map(|path| {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let table = read_peak_table(path)?;
            Ok((name, measure_group(&table)?))
        })
        .collect()
}
