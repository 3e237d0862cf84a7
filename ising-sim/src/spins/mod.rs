pub mod energy;
pub mod lattice;

pub use energy::{site_energy, EnergyField};
pub use lattice::{Lattice, SpinSystem};
