pub mod metropolis;
pub mod sweep;

pub use metropolis::{acceptance_probability, decide, MetropolisUpdater, Proposal, StepOutcome};
pub use sweep::SweepScheduler;
