//! SVG charts via the plotters SVG backend.
//!
//! - overlaid `m` traces of the extracted peaks (zero-origined `x` vs `m`)
//! - big K against peak ordinal
//! - step-count histogram

use std::error::Error;
use std::path::Path;

use log::debug;
use plotters::prelude::*;

use crate::domain::ExtractedPeak;
use crate::error::PeakError;
use crate::report::Histogram;

type DrawResult = Result<(), Box<dyn Error>>;

/// Overlay every peak's `m` trace, each shifted so it starts at `x = 0`.
pub fn draw_m_traces(path: &Path, peaks: &[ExtractedPeak], size: (u32, u32)) -> Result<(), PeakError> {
    let traces: Vec<Vec<(f64, f64)>> = peaks
        .iter()
        .filter(|p| !p.is_empty())
        .map(|p| {
            let x0 = p.x_values[0];
            p.x_values
                .iter()
                .zip(&p.m_values)
                .map(|(&x, &m)| (x - x0, m))
                .collect()
        })
        .collect();

    let x_max = traces
        .iter()
        .flatten()
        .map(|&(x, _)| x)
        .fold(0.0_f64, f64::max);
    let (y_min, y_max) = bounds(traces.iter().flatten().map(|&(_, m)| m));

    draw(path, || {
        let root = SVGBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Extracted peaks", ("sans-serif", 20))
            .margin(10)
            .x_label_area_size(35)
            .y_label_area_size(50)
            .build_cartesian_2d(0.0..x_max.max(1.0), y_min..y_max)?;

        chart.configure_mesh().x_desc("x - x0").y_desc("m").draw()?;

        for (i, trace) in traces.iter().enumerate() {
            chart.draw_series(LineSeries::new(trace.iter().copied(), Palette99::pick(i).stroke_width(1)))?;
        }

        root.present()?;
        Ok(())
    })
}

/// Big K against peak ordinal; failed fits leave a gap.
pub fn draw_big_k(path: &Path, values: &[Option<f64>], size: (u32, u32)) -> Result<(), PeakError> {
    let points: Vec<(f64, f64)> = values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.filter(|k| k.is_finite()).map(|k| (i as f64, k)))
        .collect();
    let x_max = values.len().saturating_sub(1).max(1) as f64;
    let (y_min, y_max) = bounds(points.iter().map(|&(_, k)| k));

    draw(path, || {
        let root = SVGBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption("big K per peak", ("sans-serif", 20))
            .margin(10)
            .x_label_area_size(35)
            .y_label_area_size(50)
            .build_cartesian_2d(-0.5..x_max + 0.5, y_min..y_max)?;

        chart.configure_mesh().x_desc("peak").y_desc("big K").draw()?;

        chart.draw_series(LineSeries::new(points.iter().copied(), &BLUE))?;
        chart.draw_series(points.iter().map(|&p| Circle::new(p, 3, BLUE.filled())))?;

        root.present()?;
        Ok(())
    })
}

/// Step-count histogram as filled bars.
pub fn draw_histogram(path: &Path, hist: &Histogram, size: (u32, u32)) -> Result<(), PeakError> {
    let x_min = hist.edges.first().copied().unwrap_or(0.0);
    let x_max = hist.edges.last().copied().unwrap_or(1.0);
    let y_max = hist.counts.iter().copied().max().unwrap_or(0).max(1) as f64;

    draw(path, || {
        let root = SVGBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Steps per peak", ("sans-serif", 20))
            .margin(10)
            .x_label_area_size(35)
            .y_label_area_size(50)
            .build_cartesian_2d(x_min..x_max, 0.0..y_max * 1.05)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc("steps")
            .y_desc("peaks")
            .draw()?;

        chart.draw_series(hist.counts.iter().enumerate().map(|(i, &c)| {
            Rectangle::new(
                [(hist.edges[i], 0.0), (hist.edges[i + 1], c as f64)],
                BLUE.mix(0.6).filled(),
            )
        }))?;

        root.present()?;
        Ok(())
    })
}

fn draw(path: &Path, render: impl FnOnce() -> DrawResult) -> Result<(), PeakError> {
    render().map_err(|e| PeakError::io(path, e))?;
    debug!("wrote '{}'", path.display());
    Ok(())
}

/// Padded `(min, max)` of the values, `(0, 1)` when there are none.
fn bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !(lo.is_finite() && hi.is_finite()) {
        return (0.0, 1.0);
    }
    if hi == lo {
        return (lo - 0.5, hi + 0.5);
    }
    let pad = (hi - lo) * 0.05;
    (lo - pad, hi + pad)
}
