//! Read/write JSON run summaries.
//!
//! A summary records the detection settings and every peak's fit outcome,
//! so the big K plot can be re-rendered without re-running the fits.

use std::fs::File;
use std::path::Path;

use crate::domain::{PeakFit, PeakSummary, SegmentConfig, SummaryFile};
use crate::error::PeakError;

impl From<&PeakFit> for PeakSummary {
    fn from(fit: &PeakFit) -> Self {
        let ok = fit.outcome.as_ref().ok();
        PeakSummary {
            ordinal: fit.ordinal,
            span: fit.span,
            params: ok.map(|r| r.params),
            quality: ok.map(|r| r.quality.clone()),
            big_k: fit.big_k(),
            error: fit.outcome.as_ref().err().map(|e| e.to_string()),
        }
    }
}

/// Assemble a summary stamped with the current time.
pub fn build_summary(
    input: &Path,
    segment: &SegmentConfig,
    samples: usize,
    fits: &[PeakFit],
) -> SummaryFile {
    SummaryFile {
        tool: env!("CARGO_PKG_NAME").to_string(),
        generated_at: chrono::Utc::now(),
        input: input.to_path_buf(),
        min_height: segment.min_height,
        rel_height: segment.rel_height,
        samples,
        peaks: fits.iter().map(PeakSummary::from).collect(),
    }
}

/// Write a summary JSON file.
pub fn write_summary_json(path: &Path, summary: &SummaryFile) -> Result<(), PeakError> {
    let file = File::create(path).map_err(|e| PeakError::io(path, e))?;
    serde_json::to_writer_pretty(file, summary).map_err(|e| PeakError::io(path, e))?;
    Ok(())
}

/// Read a summary JSON file.
pub fn read_summary_json(path: &Path) -> Result<SummaryFile, PeakError> {
    let file = File::open(path).map_err(|e| PeakError::io(path, e))?;
    serde_json::from_reader(file).map_err(|e| PeakError::io(path, format!("invalid summary JSON: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FitQuality, FitResult, LogisticParams, PeakSpan};
    use crate::error::FitFailure;

    #[test]
    fn summary_survives_a_round_trip_through_disk() {
        let fits = vec![
            PeakFit {
                ordinal: 0,
                span: Some(PeakSpan {
                    peak_index: 2,
                    apex_index: 4,
                    left_index: 2,
                    right_index: 8,
                }),
                outcome: Ok(FitResult {
                    params: LogisticParams {
                        a: 1.0,
                        k: 2.0,
                        xc: 0.75,
                    },
                    quality: FitQuality {
                        sse: 1e-4,
                        rmse: 4e-3,
                        n: 6,
                        iterations: 7,
                        evaluations: 9,
                    },
                }),
            },
            PeakFit {
                ordinal: 1,
                span: None,
                outcome: Err(FitFailure::SingularJacobian.into()),
            },
        ];
        let summary = build_summary(Path::new("run.dat"), &SegmentConfig::default(), 120, &fits);
        assert_eq!(summary.big_k_values(), vec![Some(3.0), None]);
        assert!(summary.peaks[1].error.as_deref().unwrap_or("").contains("singular"));

        let path = std::env::temp_dir().join(format!("peak-growth-summary-{}.json", std::process::id()));
        write_summary_json(&path, &summary).unwrap();
        let back = read_summary_json(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(back, summary);
    }

    #[test]
    fn invalid_json_is_reported_with_path() {
        let path = std::env::temp_dir().join(format!("peak-growth-bad-{}.json", std::process::id()));
        std::fs::write(&path, "{ not json").unwrap();
        let err = read_summary_json(&path).unwrap_err();
        std::fs::remove_file(&path).unwrap();
        assert!(err.to_string().contains("invalid summary JSON"));
    }
}
