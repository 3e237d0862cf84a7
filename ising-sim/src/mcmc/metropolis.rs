use rand::Rng;

use crate::error::{check_temperature, Result};
use crate::spins::{EnergyField, SpinSystem};

/// A single-spin flip under consideration.
///
/// Flipping `s` negates its product with the unchanged neighbor sum, so the
/// site's energy after the flip is `-old_local` and
/// `delta = new_local - old_local = -2 * old_local`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Proposal {
    /// Flat row-major index of the site.
    pub site: usize,
    pub old_local: i32,
    pub new_local: i32,
    pub delta: i32,
}

/// Result of one choose/propose/decide/commit cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepOutcome {
    pub site: usize,
    pub delta: i32,
    pub accepted: bool,
}

/// `exp(-delta / T)` clamped into `[0, 1]`. Underflow for huge `delta / T`
/// yields exactly 0 rather than an error.
#[inline]
fn boltzmann_factor(delta: i32, temperature: f64) -> f64 {
    let p = (-(delta as f64) / temperature).exp();
    if p.is_nan() {
        0.0
    } else {
        p.clamp(0.0, 1.0)
    }
}

/// Metropolis acceptance probability: 1 for `delta < 0`, otherwise
/// `exp(-delta / T)`.
pub fn acceptance_probability(delta: i32, temperature: f64) -> Result<f64> {
    let temperature = check_temperature(temperature)?;
    if delta < 0 {
        return Ok(1.0);
    }
    Ok(boltzmann_factor(delta, temperature))
}

/// Metropolis decision for an energy change `delta` at `temperature`.
///
/// Energy-lowering moves are always accepted; otherwise a uniform draw in
/// `[0, 1)` is compared against `exp(-delta / T)`. Fails for `T <= 0`.
pub fn decide<R: Rng + ?Sized>(delta: i32, temperature: f64, rng: &mut R) -> Result<bool> {
    let temperature = check_temperature(temperature)?;
    if delta < 0 {
        return Ok(true);
    }
    Ok(rng.gen::<f64>() < boltzmann_factor(delta, temperature))
}

/// Single-spin Metropolis updater at a fixed temperature.
///
/// On the square lattice the only positive energy changes are 4 and 8, so
/// their Boltzmann factors are computed once at construction.
#[derive(Debug, Clone)]
pub struct MetropolisUpdater {
    temperature: f64,
    /// `[exp(-4/T), exp(-8/T)]`.
    boltzmann: [f64; 2],
    attempts: u64,
    accepted: u64,
}

impl MetropolisUpdater {
    pub fn new(temperature: f64) -> Result<Self> {
        let temperature = check_temperature(temperature)?;
        Ok(Self {
            temperature,
            boltzmann: [
                boltzmann_factor(4, temperature),
                boltzmann_factor(8, temperature),
            ],
            attempts: 0,
            accepted: 0,
        })
    }

    #[inline]
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Pick `(i, j)` uniformly over all `L^2` sites.
    #[inline]
    pub fn choose_site<S: SpinSystem + ?Sized, R: Rng + ?Sized>(
        &self,
        system: &S,
        rng: &mut R,
    ) -> (usize, usize) {
        let side = system.side();
        (rng.gen_range(0..side), rng.gen_range(0..side))
    }

    #[inline]
    pub fn propose_flip(&self, field: &EnergyField, i: usize, j: usize) -> Proposal {
        let site = i * field.side() + j;
        let old_local = field.local_energy_at(site);
        let new_local = -old_local;
        Proposal {
            site,
            old_local,
            new_local,
            delta: new_local - old_local,
        }
    }

    #[inline]
    pub fn acceptance_probability(&self, delta: i32) -> f64 {
        match delta {
            d if d <= 0 => 1.0,
            4 => self.boltzmann[0],
            8 => self.boltzmann[1],
            d => boltzmann_factor(d, self.temperature),
        }
    }

    #[inline]
    pub fn decide<R: Rng + ?Sized>(&self, delta: i32, rng: &mut R) -> bool {
        delta < 0 || rng.gen::<f64>() < self.acceptance_probability(delta)
    }

    /// Apply an accepted proposal to the lattice and patch the field around
    /// the flipped site. A rejected proposal leaves both untouched.
    #[inline]
    pub fn commit<S: SpinSystem + ?Sized>(
        &self,
        system: &mut S,
        field: &mut EnergyField,
        proposal: &Proposal,
        accepted: bool,
    ) {
        if accepted {
            system.flip_at(proposal.site);
            field.refresh_site(system, proposal.site);
        }
    }

    /// One full choose, propose, decide, commit cycle.
    pub fn attempt<S: SpinSystem + ?Sized, R: Rng + ?Sized>(
        &mut self,
        system: &mut S,
        field: &mut EnergyField,
        rng: &mut R,
    ) -> StepOutcome {
        let (i, j) = self.choose_site(system, rng);
        let proposal = self.propose_flip(field, i, j);
        let accepted = self.decide(proposal.delta, rng);
        self.commit(system, field, &proposal, accepted);

        self.attempts += 1;
        self.accepted += accepted as u64;

        StepOutcome {
            site: proposal.site,
            delta: proposal.delta,
            accepted,
        }
    }

    pub fn attempts(&self) -> u64 {
        self.attempts
    }

    pub fn accepted(&self) -> u64 {
        self.accepted
    }

    /// Fraction of accepted proposals so far, 0 before the first attempt.
    pub fn acceptance_rate(&self) -> f64 {
        if self.attempts == 0 {
            return 0.0;
        }
        self.accepted as f64 / self.attempts as f64
    }

    pub fn reset_counters(&mut self) {
        self.attempts = 0;
        self.accepted = 0;
    }
}
