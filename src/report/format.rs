//! Formatted terminal output.
//!
//! All formatting lives here so the segmentation and fitting code stays free
//! of presentation concerns.

use std::path::Path;

use crate::domain::{PeakFit, SegmentConfig};
use crate::report::{GroupMeasure, Histogram};

/// Header printed before a fit table.
pub fn format_run_header(input: &Path, samples: usize, segment: &SegmentConfig, peaks: usize) -> String {
    let mut out = String::new();
    out.push_str("=== pgrowth - logistic growth fit ===\n");
    out.push_str(&format!("Input: {}\n", input.display()));
    out.push_str(&format!(
        "Samples: n={samples} | min_height={} | rel_height={}\n",
        segment.min_height, segment.rel_height
    ));
    out.push_str(&format!("Peaks: {peaks}\n"));
    out
}

/// One row per peak: ordinal, span, apex, parameters and big K, or the
/// failure reason.
pub fn format_fit_table(fits: &[PeakFit]) -> String {
    let mut out = String::new();
    out.push_str(
        format!(
            "{:>4} {:<14} {:>6} {:>12} {:>10} {:>10} {:>12}",
            "#", "span", "apex", "a", "k", "xc", "big_k"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!(
            "{:->4} {:-<14} {:->6} {:->12} {:->10} {:->10} {:->12}",
            "", "", "", "", "", "", ""
        )
        .trim_end(),
    );
    out.push('\n');

    for fit in fits {
        let (span, apex) = match fit.span {
            Some(s) => (format!("[{}, {})", s.left_index, s.right_index), s.apex_index.to_string()),
            None => ("-".to_string(), "-".to_string()),
        };
        let line = match &fit.outcome {
            Ok(r) => format!(
                "{:>4} {:<14} {:>6} {:>12.4} {:>10.4} {:>10.4} {:>12.4}",
                fit.ordinal,
                span,
                apex,
                r.params.a,
                r.params.k,
                r.params.xc,
                r.big_k()
            ),
            Err(e) => format!("{:>4} {:<14} {:>6} failed: {e}", fit.ordinal, span, apex),
        };
        out.push_str(line.trim_end());
        out.push('\n');
    }

    out
}

/// The sequence of big K values; failed fits are shown as `-`.
pub fn format_big_k(values: &[Option<f64>]) -> String {
    let parts: Vec<String> = values
        .iter()
        .map(|v| match v {
            Some(k) => format!("{k:.4}"),
            None => "-".to_string(),
        })
        .collect();
    format!("big K: [{}]", parts.join(", "))
}

/// Text histogram, one line per bin with a bar of `#`s scaled to `bar_width`.
pub fn format_histogram(hist: &Histogram, bar_width: usize) -> String {
    let mut out = String::new();
    let peak = hist.counts.iter().copied().max().unwrap_or(0).max(1);
    let last = hist.counts.len().saturating_sub(1);

    for (i, &count) in hist.counts.iter().enumerate() {
        let close = if i == last { ']' } else { ')' };
        let bar = "#".repeat(count * bar_width / peak);
        let line = format!(
            "[{:>8.2}, {:>8.2}{close} {:>5} {bar}",
            hist.edges[i],
            hist.edges[i + 1],
            count
        );
        out.push_str(line.trim_end());
        out.push('\n');
    }
    if hist.overflow > 0 {
        out.push_str(&format!("overflow: {}\n", hist.overflow));
    }
    out
}

/// `name: W=.., H=..`
pub fn format_group_measure(name: &str, group: &GroupMeasure) -> String {
    format!("{name}: W={}, H={}", group.width, group.height)
}
