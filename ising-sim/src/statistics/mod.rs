pub mod autocorrelation;
pub mod onsager;
pub mod summary;

pub use autocorrelation::{sokal_tau, AutocorrAccum};
pub use onsager::{onsager_magnetization, CRITICAL_TEMPERATURE};
pub use summary::{binder_cumulant, SeriesSummary, Statistics};
