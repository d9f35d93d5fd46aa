/// Error types for the pricing library and the runner.
/// Every call either returns a complete result or fails as a whole:
/// - Out-of-domain inputs are rejected, never clamped
/// - Degenerate but valid inputs (T = 0, sigma = 0) are not errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PricingError {
    #[error("invalid parameter {name}={value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("unsupported option type: {0:?} (expected \"call\" or \"put\")")]
    UnsupportedOptionType(String),

    #[error("shape mismatch: {name} has {found} elements, expected {expected}")]
    ShapeMismatch {
        name: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("config error: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for PricingError {
    fn from(e: serde_json::Error) -> Self {
        PricingError::Serialization(e.to_string())
    }
}

pub type PricingResult<T> = Result<T, PricingError>;

/// Reject NaN and infinities.
#[inline]
pub(crate) fn ensure_finite(name: &'static str, value: f64) -> PricingResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(PricingError::InvalidParameter {
            name,
            value,
            reason: "must be finite",
        })
    }
}

/// Finite and strictly greater than zero.
#[inline]
pub(crate) fn ensure_positive(name: &'static str, value: f64) -> PricingResult<f64> {
    ensure_finite(name, value)?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err(PricingError::InvalidParameter {
            name,
            value,
            reason: "must be > 0",
        })
    }
}

/// Finite and greater than or equal to zero.
#[inline]
pub(crate) fn ensure_non_negative(name: &'static str, value: f64) -> PricingResult<f64> {
    ensure_finite(name, value)?;
    if value >= 0.0 {
        Ok(value)
    } else {
        Err(PricingError::InvalidParameter {
            name,
            value,
            reason: "must be >= 0",
        })
    }
}
