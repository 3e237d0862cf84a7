pub mod driver;
pub mod sink;

pub use driver::{DriverState, RunSummary, TemperatureScanDriver};
pub use sink::{MagnetizationSink, MagnetizationSeries};

use std::sync::atomic::AtomicBool;

use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;
use tracing::{info, warn};

use crate::config::ScanConfig;
use crate::error::{Result, SimError};
use crate::parallel::par_over_temperatures;

/// Outcome of one temperature of a scan.
#[derive(Debug, Clone, PartialEq)]
pub enum RunStatus {
    Completed,
    /// The temperature was rejected (e.g. `T <= 0`); the scan moved on.
    Skipped(SimError),
}

/// Everything a scan produces for one temperature.
#[derive(Debug, Clone, PartialEq)]
pub struct TemperatureRun {
    /// Position of the temperature in the configured range.
    pub index: usize,
    pub temperature: f64,
    pub series: MagnetizationSeries,
    pub acceptance_rate: f64,
    pub status: RunStatus,
}

impl TemperatureRun {
    pub fn is_completed(&self) -> bool {
        self.status == RunStatus::Completed
    }
}

/// Seed of the independent random stream used for temperature `index`.
pub fn temperature_seed(base_seed: u64, index: usize) -> u64 {
    base_seed.wrapping_add(index as u64)
}

/// Simulate one temperature of the scan with its own driver and RNG.
///
/// An invalid temperature is reported as [`RunStatus::Skipped`] rather than
/// an error; interruption and sink failures propagate.
pub fn run_temperature(
    config: &ScanConfig,
    index: usize,
    temperature: f64,
    interrupted: &AtomicBool,
    on_sample: &(dyn Fn() + Sync),
) -> Result<TemperatureRun> {
    let rng = Xoshiro256StarStar::seed_from_u64(temperature_seed(config.seed, index));
    let mut driver = TemperatureScanDriver::from_config(config, rng)?;
    let mut series = MagnetizationSeries {
        temperature,
        values: Vec::with_capacity(config.samples_per_temperature),
    };

    match driver.run_temperature(temperature, &mut series, interrupted, on_sample) {
        Ok(summary) => Ok(TemperatureRun {
            index,
            temperature,
            series,
            acceptance_rate: summary.acceptance_rate,
            status: RunStatus::Completed,
        }),
        Err(e @ SimError::InvalidTemperature { .. }) => {
            warn!(index, temperature, "skipping temperature: {e}");
            Ok(TemperatureRun {
                index,
                temperature,
                series,
                acceptance_rate: 0.0,
                status: RunStatus::Skipped(e),
            })
        }
        Err(e) => Err(e),
    }
}

/// Run every temperature of `config` independently, one task per
/// temperature.
///
/// Temperature `k` gets a freshly randomized lattice and its own
/// `Xoshiro256StarStar` seeded with `seed + k`, so results do not depend on
/// scheduling. `on_sample` is called once per recorded sample (useful for
/// progress bars). Runs are returned in temperature order.
pub fn run_scan(
    config: &ScanConfig,
    interrupted: &AtomicBool,
    on_sample: &(dyn Fn() + Sync),
) -> Result<Vec<TemperatureRun>> {
    config.check()?;
    let temperatures = config.temperatures.values();
    info!(
        lattice_size = config.lattice_size,
        n_temps = temperatures.len(),
        steps_per_sample = config.steps_per_sample,
        samples_per_temperature = config.samples_per_temperature,
        sequential = config.sequential,
        "starting temperature scan"
    );

    let runs: Vec<Result<TemperatureRun>> =
        par_over_temperatures(&temperatures, config.sequential, |index, temperature| {
            run_temperature(config, index, temperature, interrupted, on_sample)
        });
    let runs = runs.into_iter().collect::<Result<Vec<_>>>()?;

    let skipped = runs.iter().filter(|r| !r.is_completed()).count();
    info!(
        completed = runs.len() - skipped,
        skipped, "temperature scan finished"
    );
    Ok(runs)
}
