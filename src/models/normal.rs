use statrs::distribution::{Continuous, ContinuousCDF, Normal};

/// Standard normal N(0, 1).
///
/// Degenerate pricing inputs push d1/d2 to +/-infinity, so both functions
/// return the exact limits there instead of relying on erfc at the edges.
#[derive(Debug, Clone, Copy)]
pub struct StandardNormal {
    normal: Normal,
}

impl StandardNormal {
    pub fn new() -> Self {
        Self {
            normal: Normal::standard(),
        }
    }

    /// Phi(x)
    #[inline]
    pub fn cdf(&self, x: f64) -> f64 {
        if x == f64::INFINITY {
            1.0
        } else if x == f64::NEG_INFINITY {
            0.0
        } else {
            self.normal.cdf(x)
        }
    }

    /// phi(x)
    #[inline]
    pub fn pdf(&self, x: f64) -> f64 {
        if x.is_infinite() {
            0.0
        } else {
            self.normal.pdf(x)
        }
    }
}

impl Default for StandardNormal {
    fn default() -> Self {
        Self::new()
    }
}
