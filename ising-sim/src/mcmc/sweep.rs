use rand::Rng;

use super::metropolis::MetropolisUpdater;
use crate::spins::{EnergyField, SpinSystem};

/// Drives single-spin Metropolis trials at a fixed temperature.
///
/// One step is one single-spin trial. A sweep (`L^2` trials) and a sample
/// (`n` trials) are aggregations chosen by the caller. The scheduler keeps
/// no history beyond a running step count.
#[derive(Debug, Default, Clone)]
pub struct SweepScheduler {
    steps: u64,
}

impl SweepScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total single-spin trials performed by this scheduler.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// One choose/propose/decide/commit cycle. Returns the magnetization
    /// after the trial.
    #[cfg_attr(feature = "profile", inline(never))]
    pub fn run_step<S, R>(
        &mut self,
        system: &mut S,
        field: &mut EnergyField,
        updater: &mut MetropolisUpdater,
        rng: &mut R,
    ) -> i64
    where
        S: SpinSystem + ?Sized,
        R: Rng + ?Sized,
    {
        debug_assert_eq!(field.values().len(), system.n_sites());
        updater.attempt(system, field, rng);
        self.steps += 1;
        system.magnetization()
    }

    /// `n_steps` consecutive trials. Returns the final magnetization.
    pub fn run_steps<S, R>(
        &mut self,
        n_steps: usize,
        system: &mut S,
        field: &mut EnergyField,
        updater: &mut MetropolisUpdater,
        rng: &mut R,
    ) -> i64
    where
        S: SpinSystem + ?Sized,
        R: Rng + ?Sized,
    {
        for _ in 0..n_steps {
            updater.attempt(system, field, rng);
        }
        self.steps += n_steps as u64;
        system.magnetization()
    }

    /// One sweep: `L^2` trials at randomly chosen sites.
    pub fn run_sweep<S, R>(
        &mut self,
        system: &mut S,
        field: &mut EnergyField,
        updater: &mut MetropolisUpdater,
        rng: &mut R,
    ) -> i64
    where
        S: SpinSystem + ?Sized,
        R: Rng + ?Sized,
    {
        let n_sites = system.n_sites();
        self.run_steps(n_sites, system, field, updater, rng)
    }
}
