use std::sync::atomic::{AtomicBool, Ordering};

use rand::Rng;
use tracing::{debug, instrument};

use super::sink::MagnetizationSink;
use crate::config::ScanConfig;
use crate::error::{check_temperature, Result, SimError};
use crate::mcmc::{MetropolisUpdater, SweepScheduler};
use crate::spins::lattice::checked_side;
use crate::spins::{EnergyField, Lattice};

/// Observable state of a [`TemperatureScanDriver`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DriverState {
    /// No lattice exists.
    Idle,
    /// A lattice and energy field exist for `temperature`.
    Running {
        temperature: f64,
        samples_taken: usize,
    },
}

/// Bookkeeping of the last temperature that ran to completion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    pub temperature: f64,
    pub samples: usize,
    pub steps: u64,
    pub acceptance_rate: f64,
}

/// Simulation context owned by the driver while a temperature is running.
struct ActiveRun {
    lattice: Lattice,
    field: EnergyField,
    updater: MetropolisUpdater,
    scheduler: SweepScheduler,
    samples_taken: usize,
    opened: bool,
}

/// Runs one temperature at a time: fresh random lattice, fixed number of
/// samples, then back to idle.
///
/// Each [`start_temperature`](Self::start_temperature) builds an independent
/// lattice; nothing carries over from the previous temperature except the
/// random stream the driver owns.
pub struct TemperatureScanDriver<R> {
    lattice_size: i64,
    steps_per_sample: usize,
    samples_per_temperature: usize,
    rng: R,
    active: Option<ActiveRun>,
    last_run: Option<RunSummary>,
}

impl<R: Rng> TemperatureScanDriver<R> {
    pub fn new(
        lattice_size: i64,
        steps_per_sample: usize,
        samples_per_temperature: usize,
        rng: R,
    ) -> Result<Self> {
        checked_side(lattice_size)?;
        if steps_per_sample < 1 || samples_per_temperature < 1 {
            return Err(SimError::InvalidConfig(format!(
                "steps_per_sample ({steps_per_sample}) and samples_per_temperature \
                 ({samples_per_temperature}) must both be >= 1"
            )));
        }
        Ok(Self {
            lattice_size,
            steps_per_sample,
            samples_per_temperature,
            rng,
            active: None,
            last_run: None,
        })
    }

    pub fn from_config(config: &ScanConfig, rng: R) -> Result<Self> {
        Self::new(
            config.lattice_size,
            config.steps_per_sample,
            config.samples_per_temperature,
            rng,
        )
    }

    pub fn state(&self) -> DriverState {
        match &self.active {
            None => DriverState::Idle,
            Some(run) => DriverState::Running {
                temperature: run.updater.temperature(),
                samples_taken: run.samples_taken,
            },
        }
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    pub fn lattice(&self) -> Option<&Lattice> {
        self.active.as_ref().map(|run| &run.lattice)
    }

    pub fn energy_field(&self) -> Option<&EnergyField> {
        self.active.as_ref().map(|run| &run.field)
    }

    pub fn last_run(&self) -> Option<RunSummary> {
        self.last_run
    }

    /// Idle -> Running(T). Any run in progress is discarded first, so an
    /// invalid temperature always leaves the driver idle.
    pub fn start_temperature(&mut self, temperature: f64) -> Result<()> {
        self.active = None;
        let temperature = check_temperature(temperature)?;

        let updater = MetropolisUpdater::new(temperature)?;
        let lattice = Lattice::randomized(self.lattice_size, &mut self.rng)?;
        let field = EnergyField::new(&lattice);
        debug!(
            temperature,
            magnetization = lattice.magnetization(),
            energy = field.bond_energy(),
            "initialized random lattice"
        );

        self.active = Some(ActiveRun {
            lattice,
            field,
            updater,
            scheduler: SweepScheduler::new(),
            samples_taken: 0,
            opened: false,
        });
        Ok(())
    }

    /// A single-spin trial on the running lattice.
    pub fn run_step(&mut self) -> Result<i64> {
        let run = self.active.as_mut().ok_or(SimError::NotRunning)?;
        Ok(run
            .scheduler
            .run_step(&mut run.lattice, &mut run.field, &mut run.updater, &mut self.rng))
    }

    /// `steps_per_sample` trials, then hand the magnetization to `sink`.
    ///
    /// After the last sample of the temperature the sink is closed and the
    /// driver returns to idle.
    pub fn run_sample<K: MagnetizationSink + ?Sized>(&mut self, sink: &mut K) -> Result<i64> {
        let run = self.active.as_mut().ok_or(SimError::NotRunning)?;

        if !run.opened {
            sink.begin_temperature(run.updater.temperature())?;
            run.opened = true;
        }

        let m = run.scheduler.run_steps(
            self.steps_per_sample,
            &mut run.lattice,
            &mut run.field,
            &mut run.updater,
            &mut self.rng,
        );
        sink.record(m)?;
        run.samples_taken += 1;

        if run.samples_taken >= self.samples_per_temperature {
            sink.end_temperature()?;
            self.last_run = Some(RunSummary {
                temperature: run.updater.temperature(),
                samples: run.samples_taken,
                steps: run.scheduler.steps(),
                acceptance_rate: run.updater.acceptance_rate(),
            });
            self.active = None;
        }
        Ok(m)
    }

    /// Run a whole temperature: start, sample until idle.
    ///
    /// `interrupted` is polled between samples; on interruption the driver
    /// stays in `Running` with a consistent lattice and field.
    #[instrument(skip(self, sink, interrupted, on_sample), fields(size = self.lattice_size))]
    pub fn run_temperature<K: MagnetizationSink + ?Sized>(
        &mut self,
        temperature: f64,
        sink: &mut K,
        interrupted: &AtomicBool,
        on_sample: &(dyn Fn() + Sync),
    ) -> Result<RunSummary> {
        self.start_temperature(temperature)?;
        while self.is_running() {
            if interrupted.load(Ordering::Relaxed) {
                return Err(SimError::Interrupted);
            }
            self.run_sample(sink)?;
            on_sample();
        }
        let summary = self.last_run.ok_or(SimError::NotRunning)?;
        debug!(
            acceptance_rate = summary.acceptance_rate,
            steps = summary.steps,
            "temperature finished"
        );
        Ok(summary)
    }
}
