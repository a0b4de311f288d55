//! Series ingest.
//!
//! Input is a whitespace-separated text table with exactly three numeric
//! tokens per line, in column order `x h m`. Blank lines are skipped; any
//! other malformed line aborts the file with its 1-based line number.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::{debug, info};

use crate::domain::Series;
use crate::error::PeakError;

/// Number of tokens on every data line.
const COLUMNS: usize = 3;

/// Read a series from a file on disk.
pub fn load_series(path: &Path) -> Result<Series, PeakError> {
    let file = File::open(path).map_err(|e| PeakError::io(path, e))?;
    let series = parse_series(BufReader::new(file)).map_err(|e| match e {
        PeakError::Io { message, .. } => PeakError::io(path, message),
        other => other,
    })?;
    info!("loaded {} samples from '{}'", series.len(), path.display());
    Ok(series)
}

/// Parse a series from any buffered reader.
pub fn parse_series<R: BufRead>(reader: R) -> Result<Series, PeakError> {
    let mut x = Vec::new();
    let mut h = Vec::new();
    let mut m = Vec::new();
    let mut skipped = 0usize;

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.map_err(|e| PeakError::io("<input>", e))?;
        if line.trim().is_empty() {
            skipped += 1;
            continue;
        }
        let [xv, hv, mv] = parse_row(&line, line_no)?;
        x.push(xv);
        h.push(hv);
        m.push(mv);
    }

    if skipped > 0 {
        debug!("skipped {skipped} blank lines");
    }
    Series::new(x, h, m)
}

fn parse_row(line: &str, line_no: usize) -> Result<[f64; COLUMNS], PeakError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() != COLUMNS {
        return Err(PeakError::MalformedRow {
            line: line_no,
            reason: format!("expected {COLUMNS} columns, found {}", tokens.len()),
        });
    }

    let mut out = [0.0; COLUMNS];
    for (slot, (token, name)) in out.iter_mut().zip(tokens.iter().zip(["x", "h", "m"])) {
        *slot = token.parse::<f64>().map_err(|e| PeakError::MalformedRow {
            line: line_no,
            reason: format!("column {name}: cannot parse '{token}' as a number ({e})"),
        })?;
    }
    Ok(out)
}
