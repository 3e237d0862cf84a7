use thiserror::Error;

pub type Result<T> = std::result::Result<T, SimError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    #[error("lattice side length must be in 1..=65536, got {size}")]
    InvalidSize { size: i64 },

    #[error("temperature must be finite and > 0, got {temperature}")]
    InvalidTemperature { temperature: f64 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("no temperature is running; call start_temperature first")]
    NotRunning,

    #[error("data sink failed: {0}")]
    Sink(String),

    #[error("interrupted")]
    Interrupted,
}

impl From<std::io::Error> for SimError {
    fn from(e: std::io::Error) -> Self {
        Self::Sink(e.to_string())
    }
}

impl From<validator::ValidationErrors> for SimError {
    fn from(e: validator::ValidationErrors) -> Self {
        Self::InvalidConfig(format!("{e}"))
    }
}

/// Reject zero, negative and non-finite temperatures.
pub(crate) fn check_temperature(temperature: f64) -> Result<f64> {
    if temperature.is_finite() && temperature > 0.0 {
        Ok(temperature)
    } else {
        Err(SimError::InvalidTemperature { temperature })
    }
}
