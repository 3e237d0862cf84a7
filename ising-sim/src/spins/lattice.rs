use rand::Rng;

use crate::error::{Result, SimError};
use crate::geometry::{Torus, MAX_SIDE};

/// Read/flip access to a periodic spin configuration.
///
/// This is the only surface the Metropolis updater and the energy field rely
/// on. Sites are addressed by flat row-major index.
pub trait SpinSystem {
    /// Number of sites along each axis.
    fn side(&self) -> usize;

    fn n_sites(&self) -> usize {
        self.side() * self.side()
    }

    /// Spin at flat index `idx`, always +1 or -1.
    fn spin_at(&self, idx: usize) -> i8;

    /// Negate the spin at flat index `idx`.
    fn flip_at(&mut self, idx: usize);

    /// Flat indices of the four periodic neighbors of `idx`.
    fn neighbors_of(&self, idx: usize) -> [usize; 4];

    /// Signed spin sum.
    fn magnetization(&self) -> i64 {
        (0..self.n_sites()).map(|i| self.spin_at(i) as i64).sum()
    }
}

/// Square `L x L` grid of +1/-1 spins with periodic boundaries.
///
/// The signed spin sum is cached and kept in step with every mutation, so
/// [`Lattice::magnetization`] is O(1).
#[derive(Debug, Clone)]
pub struct Lattice {
    topology: Torus,
    spins: Vec<i8>,
    magnetization: i64,
}

impl Lattice {
    /// Allocate an `size x size` lattice with every spin up.
    ///
    /// `size` is signed so that zero and negative requests can be reported
    /// as [`SimError::InvalidSize`] instead of being unrepresentable.
    pub fn create(size: i64) -> Result<Self> {
        let side = checked_side(size)?;
        let topology = Torus::new(side);
        let n_sites = topology.n_sites;
        Ok(Self {
            topology,
            spins: vec![1; n_sites],
            magnetization: n_sites as i64,
        })
    }

    /// Create and immediately [`randomize`](Self::randomize).
    pub fn randomized<R: Rng + ?Sized>(size: i64, rng: &mut R) -> Result<Self> {
        let mut lattice = Self::create(size)?;
        lattice.randomize(rng);
        Ok(lattice)
    }

    /// Fully aligned lattice; `up` selects the all +1 or all -1 ground state.
    pub fn aligned(size: i64, up: bool) -> Result<Self> {
        let mut lattice = Self::create(size)?;
        if !up {
            lattice.spins.fill(-1);
            lattice.magnetization = -lattice.magnetization;
        }
        Ok(lattice)
    }

    /// Build a lattice from an explicit row-major spin configuration.
    pub fn from_spins(size: i64, spins: Vec<i8>) -> Result<Self> {
        let side = checked_side(size)?;
        if spins.len() != side * side {
            return Err(SimError::InvalidConfig(format!(
                "expected {} spins for a {side}x{side} lattice, got {}",
                side * side,
                spins.len()
            )));
        }
        if let Some(bad) = spins.iter().find(|&&s| s != 1 && s != -1) {
            return Err(SimError::InvalidConfig(format!(
                "spin values must be +1 or -1, got {bad}"
            )));
        }
        let magnetization = spins.iter().map(|&s| s as i64).sum();
        Ok(Self {
            topology: Torus::new(side),
            spins,
            magnetization,
        })
    }

    /// Assign every site +1 or -1 independently with probability 1/2.
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for s in self.spins.iter_mut() {
            *s = if rng.gen::<f32>() < 0.5 { -1 } else { 1 };
        }
        self.magnetization = self.recount_magnetization();
    }

    #[inline]
    pub fn side(&self) -> usize {
        self.topology.side
    }

    #[inline]
    pub fn n_sites(&self) -> usize {
        self.topology.n_sites
    }

    pub fn topology(&self) -> &Torus {
        &self.topology
    }

    /// Row-major view of all spins.
    pub fn spins(&self) -> &[i8] {
        &self.spins
    }

    #[inline]
    pub fn spin(&self, i: usize, j: usize) -> i8 {
        self.spins[self.topology.index(i, j)]
    }

    /// The four periodic neighbors of `(i, j)`: up, down, left, right.
    pub fn neighbors(&self, i: usize, j: usize) -> [(usize, usize); 4] {
        self.topology.neighbors(i, j)
    }

    /// Negate the spin at `(i, j)` unconditionally.
    pub fn flip(&mut self, i: usize, j: usize) {
        let idx = self.topology.index(i, j);
        self.flip_at(idx);
    }

    /// Signed sum of all spins, bounded by `n_sites` in absolute value.
    #[inline]
    pub fn magnetization(&self) -> i64 {
        self.magnetization
    }

    /// Recompute the spin sum from scratch.
    pub fn recount_magnetization(&self) -> i64 {
        self.spins.iter().map(|&s| s as i64).sum()
    }
}

impl SpinSystem for Lattice {
    #[inline]
    fn side(&self) -> usize {
        self.topology.side
    }

    #[inline]
    fn spin_at(&self, idx: usize) -> i8 {
        self.spins[idx]
    }

    #[inline]
    fn flip_at(&mut self, idx: usize) {
        let s = self.spins[idx];
        self.spins[idx] = -s;
        self.magnetization -= 2 * s as i64;
    }

    #[inline]
    fn neighbors_of(&self, idx: usize) -> [usize; 4] {
        self.topology.neighbors_flat(idx)
    }

    #[inline]
    fn magnetization(&self) -> i64 {
        self.magnetization
    }
}

/// Side length as `usize`, rejecting sizes outside `1..=MAX_SIDE`.
pub(crate) fn checked_side(size: i64) -> Result<usize> {
    match usize::try_from(size) {
        Ok(side) if (1..=MAX_SIDE).contains(&side) => Ok(side),
        _ => Err(SimError::InvalidSize { size }),
    }
}
