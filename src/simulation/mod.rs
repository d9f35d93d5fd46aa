pub mod brownian;
pub mod monte_carlo;
pub mod riskfree;

pub use brownian::{brownian_motion, white_noise, WhiteNoise};
pub use monte_carlo::{monte_carlo_paths, terminal_prices, PathMatrix};
pub use riskfree::{risk_free_value, risk_free_values};

use crate::errors::{PricingError, PricingResult};
use statrs::statistics::Statistics;

/// Descriptive statistics for a simulated sample.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct SampleSummary {
    pub count: usize,
    pub mean: f64,
    /// Sample (n - 1) standard deviation. NaN below two observations.
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl SampleSummary {
    pub fn from_samples(samples: &[f64]) -> Self {
        Self {
            count: samples.len(),
            mean: Statistics::mean(samples.iter()),
            std_dev: Statistics::std_dev(samples.iter()),
            min: Statistics::min(samples.iter()),
            max: Statistics::max(samples.iter()),
        }
    }
}

/// Step and path counts must be at least one.
pub(crate) fn ensure_count(name: &'static str, value: usize) -> PricingResult<usize> {
    if value == 0 {
        return Err(PricingError::InvalidParameter {
            name,
            value: 0.0,
            reason: "must be >= 1",
        });
    }
    Ok(value)
}
