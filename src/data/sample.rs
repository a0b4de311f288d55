//! Synthetic series generation.
//!
//! Each event is a Gaussian bump in `m` with a logistic rise in `h` centred
//! on the same position. Rises accumulate, so `h` is non-decreasing apart
//! from the optional Gaussian jitter.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::info;
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::Series;
use crate::error::PeakError;
use crate::models::sigmoid;

/// Fewest samples allotted to each event.
const MIN_SAMPLES_PER_PEAK: usize = 16;

/// Settings for [`generate_series`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleConfig {
    pub peaks: usize,
    pub samples: usize,
    pub seed: u64,
    /// Standard deviation of the jitter added to `h`.
    pub noise: f64,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            peaks: 5,
            samples: 500,
            seed: 42,
            noise: 0.0,
        }
    }
}

/// Ground truth of one generated event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyntheticEvent {
    pub center: f64,
    /// Height of the `m` bump.
    pub amplitude: f64,
    pub sigma: f64,
    /// Height gained in `h` across the event.
    pub rise: f64,
    pub rate: f64,
}

#[derive(Debug, Clone)]
pub struct SampleData {
    pub series: Series,
    pub events: Vec<SyntheticEvent>,
}

pub fn generate_series(config: &SampleConfig) -> Result<SampleData, PeakError> {
    if config.peaks == 0 {
        return Err(PeakError::InvalidSample("peak count must be > 0".to_string()));
    }
    if config.samples < config.peaks * MIN_SAMPLES_PER_PEAK {
        return Err(PeakError::InvalidSample(format!(
            "{} samples cannot hold {} peaks (need at least {} per peak)",
            config.samples, config.peaks, MIN_SAMPLES_PER_PEAK
        )));
    }
    if !(config.noise.is_finite() && config.noise >= 0.0) {
        return Err(PeakError::InvalidSample(format!(
            "noise must be finite and >= 0, got {}",
            config.noise
        )));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let jitter = Normal::new(0.0, config.noise)
        .map_err(|e| PeakError::InvalidSample(format!("noise distribution: {e}")))?;

    let spacing = config.samples as f64 / config.peaks as f64;
    let events: Vec<SyntheticEvent> = (0..config.peaks)
        .map(|j| SyntheticEvent {
            center: (j as f64 + 0.5) * spacing,
            amplitude: rng.gen_range(3.0..6.0),
            sigma: spacing / 8.0,
            rise: rng.gen_range(5.0..15.0),
            rate: rng.gen_range(8.0..16.0) / spacing,
        })
        .collect();

    let x: Vec<f64> = (0..config.samples).map(|i| i as f64).collect();
    let m: Vec<f64> = x
        .iter()
        .map(|&xi| {
            events
                .iter()
                .map(|e| e.amplitude * (-0.5 * ((xi - e.center) / e.sigma).powi(2)).exp())
                .sum()
        })
        .collect();
    let h: Vec<f64> = x
        .iter()
        .map(|&xi| {
            let level: f64 = events
                .iter()
                .map(|e| e.rise * sigmoid(e.rate * (xi - e.center)))
                .sum();
            level + jitter.sample(&mut rng)
        })
        .collect();

    info!(
        "generated {} samples with {} events (seed {})",
        config.samples, config.peaks, config.seed
    );
    Ok(SampleData {
        series: Series::new(x, h, m)?,
        events,
    })
}

/// Write a series as a three-column whitespace table (`x h m`).
pub fn write_series(path: &Path, series: &Series) -> Result<(), PeakError> {
    let file = File::create(path).map_err(|e| PeakError::io(path, e))?;
    let mut out = BufWriter::new(file);
    for ((x, h), m) in series.x().iter().zip(series.h()).zip(series.m()) {
        writeln!(out, "{x:.6} {h:.6} {m:.6}").map_err(|e| PeakError::io(path, e))?;
    }
    out.flush().map_err(|e| PeakError::io(path, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SegmentConfig;
    use crate::io::load_series;
    use crate::peaks::segment_with;

    #[test]
    fn same_seed_same_series() {
        let config = SampleConfig {
            noise: 0.1,
            ..SampleConfig::default()
        };
        let a = generate_series(&config).unwrap();
        let b = generate_series(&config).unwrap();
        assert_eq!(a.series, b.series);
        assert_eq!(a.events, b.events);

        let c = generate_series(&SampleConfig { seed: 7, ..config }).unwrap();
        assert_ne!(a.series, c.series);
    }

    #[test]
    fn every_event_is_detected_once() {
        let config = SampleConfig {
            peaks: 4,
            samples: 400,
            seed: 3,
            noise: 0.0,
        };
        let data = generate_series(&config).unwrap();
        let spans = segment_with(data.series.m(), &SegmentConfig::default()).unwrap();

        assert_eq!(spans.len(), 4);
        for (span, event) in spans.iter().zip(&data.events) {
            assert!((span.apex_index as f64 - event.center).abs() <= 1.0);
            assert!(span.contains(span.apex_index));
        }
    }

    #[test]
    fn heights_rise_across_the_series() {
        let data = generate_series(&SampleConfig::default()).unwrap();
        let h = data.series.h();
        let total: f64 = data.events.iter().map(|e| e.rise).sum();
        assert!(h.windows(2).all(|w| w[1] >= w[0]));
        let gained = h[h.len() - 1] - h[0];
        assert!(gained > 0.9 * total && gained <= total, "{gained} vs {total}");
    }

    #[test]
    fn invalid_settings_are_rejected() {
        for config in [
            SampleConfig {
                peaks: 0,
                ..SampleConfig::default()
            },
            SampleConfig {
                samples: 10,
                ..SampleConfig::default()
            },
            SampleConfig {
                noise: -1.0,
                ..SampleConfig::default()
            },
        ] {
            assert!(matches!(
                generate_series(&config),
                Err(PeakError::InvalidSample(_))
            ));
        }
    }

    #[test]
    fn written_series_loads_back() {
        let data = generate_series(&SampleConfig {
            peaks: 2,
            samples: 64,
            ..SampleConfig::default()
        })
        .unwrap();
        let path = std::env::temp_dir().join(format!("peak-growth-sample-{}.dat", std::process::id()));
        write_series(&path, &data.series).unwrap();
        let back = load_series(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(back.len(), 64);
        for (a, b) in back.m().iter().zip(data.series.m()) {
            assert!((a - b).abs() < 1e-6);
        }
    }
}
