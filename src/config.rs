use crate::cli::ScanArgs;
use crate::error::Result;
use ising_sim::{ScanConfig, TemperatureRange};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct FileTemperatureRange {
    pub start: f64,
    pub stop: f64,
    pub count: usize,
}

impl Default for FileTemperatureRange {
    fn default() -> Self {
        let r = TemperatureRange::default();
        Self {
            start: r.start,
            stop: r.stop,
            count: r.count,
        }
    }
}

/// On-disk configuration. Missing keys fall back to the defaults of
/// [`ScanConfig`] and an output directory of `Data`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case", default)]
pub struct FileConfig {
    pub lattice_size: i64,
    pub steps_per_sample: usize,
    pub samples_per_temperature: usize,
    pub seed: u64,
    pub sequential: bool,
    pub output_dir: PathBuf,
    pub temperature: FileTemperatureRange,
}

impl Default for FileConfig {
    fn default() -> Self {
        let core = ScanConfig::default();
        Self {
            lattice_size: core.lattice_size,
            steps_per_sample: core.steps_per_sample,
            samples_per_temperature: core.samples_per_temperature,
            seed: core.seed,
            sequential: core.sequential,
            output_dir: PathBuf::from("Data"),
            temperature: FileTemperatureRange::default(),
        }
    }
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        debug!("Loading configuration from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Defaults, then the file named by `--config`, then individual flags.
    pub fn resolve(args: &ScanArgs) -> Result<Self> {
        let mut cfg = match &args.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        cfg.apply_overrides(args);
        Ok(cfg)
    }

    pub fn apply_overrides(&mut self, args: &ScanArgs) {
        if let Some(size) = args.size {
            self.lattice_size = size;
        }
        if let Some(start) = args.t_start {
            self.temperature.start = start;
        }
        if let Some(stop) = args.t_stop {
            self.temperature.stop = stop;
        }
        if let Some(count) = args.t_count {
            self.temperature.count = count;
        }
        if let Some(steps) = args.steps_per_sample {
            self.steps_per_sample = steps;
        }
        if let Some(samples) = args.samples {
            self.samples_per_temperature = samples;
        }
        if let Some(seed) = args.seed {
            self.seed = seed;
        }
        if args.sequential {
            self.sequential = true;
        }
        if let Some(dir) = &args.output {
            self.output_dir = dir.clone();
        }
    }

    pub fn scan_config(&self) -> ScanConfig {
        ScanConfig {
            lattice_size: self.lattice_size,
            temperatures: TemperatureRange::new(
                self.temperature.start,
                self.temperature.stop,
                self.temperature.count,
            ),
            steps_per_sample: self.steps_per_sample,
            samples_per_temperature: self.samples_per_temperature,
            seed: self.seed,
            sequential: self.sequential,
        }
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;

    #[test]
    fn defaults_match_reference_run() {
        let cfg = FileConfig::default().scan_config();
        assert_eq!(cfg.lattice_size, 16);
        assert_eq!(cfg.temperatures, TemperatureRange::new(0.1, 4.0, 128));
        assert_eq!(cfg.steps_per_sample, 2000);
        assert_eq!(cfg.samples_per_temperature, 500);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.toml");
        std::fs::write(
            &path,
            "lattice-size = 32\n\n[temperature]\ncount = 16\n",
        )
        .unwrap();

        let cfg = FileConfig::load(&path).unwrap();
        assert_eq!(cfg.lattice_size, 32);
        assert_eq!(cfg.temperature.count, 16);
        assert_eq!(cfg.temperature.start, 0.1);
        assert_eq!(cfg.samples_per_temperature, 500);
        assert_eq!(cfg.output_dir, PathBuf::from("Data"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.toml");
        std::fs::write(&path, "magnetic-field = 0.5\n").unwrap();
        assert!(matches!(
            FileConfig::load(&path),
            Err(CliError::ConfigParse(_))
        ));
    }

    #[test]
    fn flags_override_file_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.toml");
        std::fs::write(&path, "lattice-size = 32\nseed = 1\n").unwrap();

        let args = ScanArgs {
            config: Some(path),
            size: Some(8),
            t_stop: Some(3.0),
            sequential: true,
            output: Some(PathBuf::from("out")),
            ..Default::default()
        };
        let cfg = FileConfig::resolve(&args).unwrap();
        assert_eq!(cfg.lattice_size, 8);
        assert_eq!(cfg.seed, 1);
        assert_eq!(cfg.temperature.stop, 3.0);
        assert!(cfg.sequential);
        assert_eq!(cfg.output_dir, PathBuf::from("out"));
    }

    #[test]
    fn rendered_toml_round_trips() {
        let cfg = FileConfig::default();
        let text = cfg.to_toml().unwrap();
        assert!(text.contains("lattice-size = 16"));
        assert_eq!(toml::from_str::<FileConfig>(&text).unwrap(), cfg);
    }
}
