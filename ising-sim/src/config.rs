use validator::{Validate, ValidationError};

use crate::error::SimError;
use crate::spins::lattice::checked_side;

/// `count` linearly spaced temperatures from `start` to `stop`, both ends
/// included.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureRange {
    pub start: f64,
    pub stop: f64,
    pub count: usize,
}

impl TemperatureRange {
    pub fn new(start: f64, stop: f64, count: usize) -> Self {
        Self { start, stop, count }
    }

    /// A single temperature.
    pub fn single(temperature: f64) -> Self {
        Self::new(temperature, temperature, 1)
    }

    pub fn values(&self) -> Vec<f64> {
        match self.count {
            0 => vec![],
            1 => vec![self.start],
            n => {
                let step = (self.stop - self.start) / (n - 1) as f64;
                (0..n)
                    .map(|k| {
                        if k == n - 1 {
                            self.stop
                        } else {
                            self.start + step * k as f64
                        }
                    })
                    .collect()
            }
        }
    }
}

impl Default for TemperatureRange {
    fn default() -> Self {
        Self::new(0.1, 4.0, 128)
    }
}

fn validate_scan_config(cfg: &ScanConfig) -> Result<(), ValidationError> {
    if cfg.steps_per_sample < 1 {
        return Err(ValidationError::new("steps_per_sample must be >= 1"));
    }
    if cfg.samples_per_temperature < 1 {
        return Err(ValidationError::new("samples_per_temperature must be >= 1"));
    }
    if cfg.temperatures.count < 1 {
        return Err(ValidationError::new("temperature count must be >= 1"));
    }
    if !cfg.temperatures.start.is_finite() || !cfg.temperatures.stop.is_finite() {
        return Err(ValidationError::new("temperature range bounds must be finite"));
    }
    Ok(())
}

/// Everything a temperature scan needs.
///
/// Temperatures inside the range that are not strictly positive are not a
/// configuration error: the scan skips them and carries on.
#[derive(Debug, Clone, Validate)]
#[validate(schema(function = "validate_scan_config"))]
pub struct ScanConfig {
    /// Lattice side length `L`.
    pub lattice_size: i64,
    pub temperatures: TemperatureRange,
    /// Single-spin trials between two recorded magnetizations.
    pub steps_per_sample: usize,
    /// Magnetizations recorded per temperature.
    pub samples_per_temperature: usize,
    /// Temperature `k` of the range is simulated with seed `seed + k`.
    pub seed: u64,
    /// Run temperatures on the current thread instead of the rayon pool.
    pub sequential: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            lattice_size: 16,
            temperatures: TemperatureRange::default(),
            steps_per_sample: 2000,
            samples_per_temperature: 500,
            seed: 42,
            sequential: false,
        }
    }
}

impl ScanConfig {
    /// Validate the configuration, reporting a bad lattice size as
    /// [`SimError::InvalidSize`] and everything else as
    /// [`SimError::InvalidConfig`].
    pub fn check(&self) -> crate::error::Result<()> {
        checked_side(self.lattice_size)?;
        self.validate()?;
        Ok(())
    }

    pub fn n_sites(&self) -> usize {
        let side = self.lattice_size.max(0) as usize;
        side.saturating_mul(side)
    }

    /// Total samples across the whole scan (used for progress reporting).
    pub fn total_samples(&self) -> u64 {
        (self.temperatures.count as u64).saturating_mul(self.samples_per_temperature as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linspace_matches_endpoints() {
        let v = TemperatureRange::new(0.1, 4.0, 128).values();
        assert_eq!(v.len(), 128);
        assert_eq!(v[0], 0.1);
        assert_eq!(v[127], 4.0);
        let step = (4.0 - 0.1) / 127.0;
        assert!((v[1] - v[0] - step).abs() < 1e-12);

        assert_eq!(TemperatureRange::single(2.0).values(), vec![2.0]);
        assert!(TemperatureRange::new(1.0, 2.0, 0).values().is_empty());
        assert_eq!(TemperatureRange::new(1.0, 2.0, 3).values(), vec![1.0, 1.5, 2.0]);
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(ScanConfig::default().check().is_ok());
        assert_eq!(ScanConfig::default().total_samples(), 128 * 500);
    }

    #[test]
    fn test_invalid_size_is_reported_as_such() {
        let cfg = ScanConfig {
            lattice_size: 0,
            ..Default::default()
        };
        assert_eq!(cfg.check(), Err(SimError::InvalidSize { size: 0 }));

        let cfg = ScanConfig {
            lattice_size: i64::MAX,
            ..Default::default()
        };
        assert_eq!(cfg.check(), Err(SimError::InvalidSize { size: i64::MAX }));
    }

    #[test]
    fn test_huge_scans_do_not_overflow_counts() {
        let cfg = ScanConfig {
            lattice_size: i64::MAX,
            temperatures: TemperatureRange::new(1.0, 2.0, usize::MAX),
            samples_per_temperature: usize::MAX,
            ..Default::default()
        };
        assert_eq!(cfg.total_samples(), u64::MAX);
        assert_eq!(cfg.n_sites(), usize::MAX);
    }

    #[test]
    fn test_schema_violations() {
        let bad = [
            ScanConfig {
                steps_per_sample: 0,
                ..Default::default()
            },
            ScanConfig {
                samples_per_temperature: 0,
                ..Default::default()
            },
            ScanConfig {
                temperatures: TemperatureRange::new(0.1, 4.0, 0),
                ..Default::default()
            },
            ScanConfig {
                temperatures: TemperatureRange::new(f64::NAN, 4.0, 4),
                ..Default::default()
            },
        ];
        for cfg in bad {
            assert!(matches!(cfg.check(), Err(SimError::InvalidConfig(_))));
        }
    }

    #[test]
    fn test_non_positive_temperatures_are_not_a_config_error() {
        let cfg = ScanConfig {
            temperatures: TemperatureRange::new(-1.0, 1.0, 3),
            ..Default::default()
        };
        assert!(cfg.check().is_ok());
    }
}
