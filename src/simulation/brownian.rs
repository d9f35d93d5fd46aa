use crate::errors::{ensure_positive, PricingResult};
use crate::simulation::ensure_count;
use rand::Rng;
use statrs::distribution::Normal;

/// Gaussian increments on an even time grid.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct WhiteNoise {
    /// Start of each interval: 0, dt, 2*dt, ...
    pub times: Vec<f64>,
    /// dX_i = Z_i * sqrt(dt)
    pub increments: Vec<f64>,
    pub dt: f64,
}

/// Draw `steps` increments over `[0, horizon)`.
pub fn white_noise<R: Rng + ?Sized>(
    horizon: f64,
    steps: usize,
    rng: &mut R,
) -> PricingResult<WhiteNoise> {
    ensure_positive("horizon", horizon)?;
    ensure_count("steps", steps)?;

    let dt = horizon / steps as f64;
    let sqrt_dt = dt.sqrt();
    let normal = Normal::standard();

    let times = (0..steps).map(|i| i as f64 * dt).collect();
    let increments = (0..steps).map(|_| rng.sample(normal) * sqrt_dt).collect();

    tracing::debug!(horizon, steps, dt, "white noise drawn");

    Ok(WhiteNoise {
        times,
        increments,
        dt,
    })
}

/// Standard Brownian motion as the running sum of its increments.
pub fn brownian_motion(increments: &[f64]) -> Vec<f64> {
    increments
        .iter()
        .scan(0.0, |acc, dx| {
            *acc += dx;
            Some(*acc)
        })
        .collect()
}
