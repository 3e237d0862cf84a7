//! Single-spin Metropolis Monte Carlo for the 2-D Ising ferromagnet.
//!
//! The lattice is an `L x L` torus of +1/-1 spins with coupling `J = 1` and
//! `k_B = 1`. A [`TemperatureScanDriver`] owns one lattice, its
//! [`EnergyField`] and a [`MetropolisUpdater`] per temperature;
//! [`run_scan`] runs every temperature of a range independently, in
//! parallel, and returns one magnetization series per temperature.

pub mod config;
pub mod error;
pub mod geometry;
pub mod mcmc;
pub mod simulation;
pub mod spins;
pub mod statistics;

mod parallel;

pub use config::{ScanConfig, TemperatureRange};
pub use error::{Result, SimError};
pub use mcmc::{MetropolisUpdater, SweepScheduler};
pub use simulation::{
    run_scan, run_temperature, DriverState, MagnetizationSeries, MagnetizationSink, RunStatus,
    TemperatureRun, TemperatureScanDriver,
};
pub use spins::{EnergyField, Lattice, SpinSystem};
pub use statistics::{SeriesSummary, CRITICAL_TEMPERATURE};
