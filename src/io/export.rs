//! Peak table and big K CSV exports.
//!
//! Peak tables carry the three channels `x,h,m` with a header row. Each
//! extracted peak is written twice: as cut from the series and zero-origined.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use log::info;
use serde::Serialize;

use crate::domain::{ExtractedPeak, PeakFit, PeakRow};
use crate::error::PeakError;

/// Write one peak as a `x,h,m` CSV table.
pub fn write_peak_table(path: &Path, peak: &ExtractedPeak) -> Result<(), PeakError> {
    let file = File::create(path).map_err(|e| PeakError::io(path, e))?;
    let mut writer = csv::Writer::from_writer(file);
    for ((&x, &h), &m) in peak.x_values.iter().zip(&peak.h_values).zip(&peak.m_values) {
        writer
            .serialize(PeakRow { x, h, m })
            .map_err(|e| PeakError::io(path, e))?;
    }
    writer.flush().map_err(|e| PeakError::io(path, e))?;
    Ok(())
}

/// Read a `x,h,m` CSV table back into a peak.
pub fn read_peak_table(path: &Path) -> Result<ExtractedPeak, PeakError> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| PeakError::io(path, e))?;
    let mut peak = ExtractedPeak::default();
    for (idx, row) in reader.deserialize::<PeakRow>().enumerate() {
        // +2: header is line 1.
        let row = row.map_err(|e| PeakError::MalformedRow {
            line: idx + 2,
            reason: format!("{}: {e}", path.display()),
        })?;
        peak.x_values.push(row.x);
        peak.h_values.push(row.h);
        peak.m_values.push(row.m);
    }
    Ok(peak)
}

/// `{prefix}_{i}.csv`
pub fn peak_file_name(prefix: &str, ordinal: usize) -> String {
    format!("{prefix}_{ordinal}.csv")
}

/// `rescaled_{prefix}_{i}.csv`
pub fn rescaled_file_name(prefix: &str, ordinal: usize) -> String {
    format!("rescaled_{prefix}_{ordinal}.csv")
}

/// Write every peak and its zero-origined counterpart into `dir`.
///
/// The directory is created if missing. Returns the written paths in
/// detection order, raw before rescaled for each peak.
pub fn write_peak_tables(
    dir: &Path,
    prefix: &str,
    peaks: &[ExtractedPeak],
) -> Result<Vec<PathBuf>, PeakError> {
    fs::create_dir_all(dir).map_err(|e| PeakError::io(dir, e))?;

    let mut written = Vec::with_capacity(peaks.len() * 2);
    for (i, peak) in peaks.iter().enumerate() {
        let raw = dir.join(peak_file_name(prefix, i));
        write_peak_table(&raw, peak)?;
        info!("saved peak {i} to '{}'", raw.display());
        written.push(raw);

        let rescaled = dir.join(rescaled_file_name(prefix, i));
        write_peak_table(&rescaled, &peak.rescaled()?)?;
        info!("saved rescaled peak {i} to '{}'", rescaled.display());
        written.push(rescaled);
    }
    Ok(written)
}

#[derive(Debug, Serialize)]
struct BigKRow {
    ordinal: usize,
    left: Option<usize>,
    right: Option<usize>,
    a: Option<f64>,
    k: Option<f64>,
    xc: Option<f64>,
    big_k: Option<f64>,
    error: Option<String>,
}

/// Write per-peak parameters and big K to CSV. Failed fits leave the numeric
/// columns empty and fill `error`.
pub fn write_big_k_csv(path: &Path, fits: &[PeakFit]) -> Result<(), PeakError> {
    let file = File::create(path).map_err(|e| PeakError::io(path, e))?;
    let mut writer = csv::Writer::from_writer(file);

    for fit in fits {
        let params = fit.outcome.as_ref().ok().map(|r| r.params);
        let row = BigKRow {
            ordinal: fit.ordinal,
            left: fit.span.map(|s| s.left_index),
            right: fit.span.map(|s| s.right_index),
            a: params.map(|p| p.a),
            k: params.map(|p| p.k),
            xc: params.map(|p| p.xc),
            big_k: fit.big_k(),
            error: fit.outcome.as_ref().err().map(|e| e.to_string()),
        };
        writer.serialize(row).map_err(|e| PeakError::io(path, e))?;
    }
    writer.flush().map_err(|e| PeakError::io(path, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FitQuality, FitResult, LogisticParams, PeakSpan};
    use crate::error::FitFailure;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "peak-growth-export-{name}-{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn peak() -> ExtractedPeak {
        ExtractedPeak {
            x_values: vec![10.0, 11.0, 12.0],
            h_values: vec![5.0, 5.5, 7.0],
            m_values: vec![0.2, 1.4, 0.3],
        }
    }

    #[test]
    fn peak_table_reads_back() {
        let dir = scratch_dir("table");
        let path = dir.join("p.csv");
        write_peak_table(&path, &peak()).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("x,h,m\n"), "{text}");
        assert_eq!(read_peak_table(&path).unwrap(), peak());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn tables_are_written_in_pairs_with_reference_names() {
        let dir = scratch_dir("pairs").join("nested");
        let peaks = vec![peak(), peak()];
        let written = write_peak_tables(&dir, "group", &peaks).unwrap();

        let names: Vec<String> = written
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec!["group_0.csv", "rescaled_group_0.csv", "group_1.csv", "rescaled_group_1.csv"]
        );

        let rescaled = read_peak_table(&written[1]).unwrap();
        assert_eq!(rescaled.x_values, vec![0.0, 1.0, 2.0]);
        assert_eq!(rescaled.h_values, vec![0.0, 0.5, 2.0]);

        fs::remove_dir_all(dir.parent().unwrap()).unwrap();
    }

    #[test]
    fn big_k_csv_leaves_failures_blank() {
        let dir = scratch_dir("bigk");
        let path = dir.join("k.csv");
        let span = PeakSpan {
            peak_index: 3,
            apex_index: 5,
            left_index: 3,
            right_index: 9,
        };
        let fits = vec![
            PeakFit {
                ordinal: 0,
                span: Some(span),
                outcome: Ok(FitResult {
                    params: LogisticParams {
                        a: 2.0,
                        k: 0.5,
                        xc: 3.0,
                    },
                    quality: FitQuality {
                        sse: 0.0,
                        rmse: 0.0,
                        n: 6,
                        iterations: 4,
                        evaluations: 5,
                    },
                }),
            },
            PeakFit {
                ordinal: 1,
                span: None,
                outcome: Err(FitFailure::Stalled.into()),
            },
        ];
        write_big_k_csv(&path, &fits).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "ordinal,left,right,a,k,xc,big_k,error");
        assert_eq!(lines[1], "0,3,9,2.0,0.5,3.0,3.0,");
        assert!(lines[2].starts_with("1,,,,,,,"), "{}", lines[2]);

        fs::remove_dir_all(&dir).unwrap();
    }
}
