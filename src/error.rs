//! Error types
//!
//! Numerical degeneracies (zero-length segments, coincident centres) are not
//! errors; they are handled in place by the solver. Errors here cover the
//! driver-facing surface: construction parameters, handles and snapshots.

use thiserror::Error;

use crate::sim::{BodyId, SpringId};

/// Errors raised by world construction, stepping and snapshot I/O
#[derive(Error, Debug)]
pub enum SimError {
    /// A physical or configuration parameter is out of range
    #[error("invalid {name}: {value}")]
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// Rejected value
        value: f32,
    },

    /// Timestep passed to a tick is not positive and finite
    #[error("timestep must be positive and finite, got {0}")]
    InvalidTimestep(f32),

    /// Handle does not refer to a live body
    #[error("unknown body {0:?}")]
    UnknownBody(BodyId),

    /// Handle does not refer to a live spring
    #[error("unknown spring {0:?}")]
    UnknownSpring(SpringId),

    /// Both ends of a spring are the same body
    #[error("a spring needs two distinct bodies")]
    SelfSpring,

    /// Snapshot spring points at a body index that is not in the snapshot
    #[error("snapshot spring {spring} references missing body {body}")]
    DanglingSpring {
        /// Spring index in the snapshot
        spring: usize,
        /// Body index that could not be resolved
        body: usize,
    },

    /// Malformed JSON record or snapshot
    #[error("malformed record: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;

/// Reject values that are not finite or not strictly positive
pub(crate) fn ensure_positive(name: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidParameter { name, value })
    }
}

/// Reject values that are not finite or are negative
pub(crate) fn ensure_non_negative(name: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidParameter { name, value })
    }
}

/// Reject values outside [0, 1]
pub(crate) fn ensure_unit(name: &'static str, value: f32) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(SimError::InvalidParameter { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_positive() {
        assert!(ensure_positive("mass", 1.0).is_ok());
        assert!(ensure_positive("mass", 0.0).is_err());
        assert!(ensure_positive("mass", -2.0).is_err());
        assert!(ensure_positive("mass", f32::NAN).is_err());
        assert!(ensure_positive("mass", f32::INFINITY).is_err());
    }

    #[test]
    fn test_ensure_non_negative() {
        assert!(ensure_non_negative("damping", 0.0).is_ok());
        assert!(ensure_non_negative("damping", 3.0).is_ok());
        assert!(ensure_non_negative("damping", -0.1).is_err());
        assert!(ensure_non_negative("damping", f32::NAN).is_err());
    }

    #[test]
    fn test_ensure_unit() {
        assert!(ensure_unit("friction", 0.0).is_ok());
        assert!(ensure_unit("friction", 1.0).is_ok());
        assert!(ensure_unit("friction", 1.5).is_err());
        assert!(ensure_unit("friction", f32::NAN).is_err());
    }

    #[test]
    fn test_error_messages() {
        let err = SimError::InvalidParameter { name: "radius", value: -1.0 };
        assert_eq!(err.to_string(), "invalid radius: -1");
        assert_eq!(SimError::InvalidTimestep(0.0).to_string(), "timestep must be positive and finite, got 0");
    }
}
