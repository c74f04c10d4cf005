//! Crate error types.

use std::fmt;
use std::io;

use thiserror::Error;

use crate::config::ConfigError;

/// A non-empty collection of configuration violations.
///
/// Validation reports every problem at once rather than stopping at the
/// first, so the whole list travels inside [`EpsError::Config`].
#[derive(Debug, Clone)]
pub struct ConfigErrors(pub Vec<ConfigError>);

impl fmt::Display for ConfigErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for e in &self.0 {
            if !first {
                writeln!(f)?;
            }
            write!(f, "{e}")?;
            first = false;
        }
        Ok(())
    }
}

/// Errors surfaced by the power budget, router, integrator, and exporters.
#[derive(Debug, Error)]
pub enum EpsError {
    /// Scenario configuration is invalid; the run never starts.
    #[error("{0}")]
    Config(ConfigErrors),

    /// A computed or supplied quantity was NaN or infinite.
    #[error("numeric anomaly: {quantity} is not finite ({value})")]
    NonFinite {
        /// Name of the offending quantity.
        quantity: &'static str,
        /// The offending value.
        value: f64,
    },

    /// Trace export failed at the I/O layer.
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    /// Trace export failed in the CSV writer.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

impl From<Vec<ConfigError>> for EpsError {
    fn from(errors: Vec<ConfigError>) -> Self {
        Self::Config(ConfigErrors(errors))
    }
}

impl From<ConfigError> for EpsError {
    fn from(error: ConfigError) -> Self {
        Self::Config(ConfigErrors(vec![error]))
    }
}

/// Returns `value` unchanged if it is finite, otherwise a [`EpsError::NonFinite`].
///
/// # Errors
///
/// Returns `EpsError::NonFinite` naming `quantity` when `value` is NaN or infinite.
pub fn ensure_finite(quantity: &'static str, value: f64) -> Result<f64, EpsError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EpsError::NonFinite { quantity, value })
    }
}
