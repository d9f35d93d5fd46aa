use crate::errors::{ensure_finite, ensure_non_negative, ensure_positive, PricingError, PricingResult};
use crate::simulation::ensure_count;
use rand::Rng;
use statrs::distribution::Normal;

/// Geometric Brownian motion paths, `(steps + 1) x paths`, row-major by time.
///
/// S[t] = S[t-1] * exp((mu - sigma^2/2)*dt + sigma*sqrt(dt)*Z)
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct PathMatrix {
    pub steps: usize,
    pub paths: usize,
    pub dt: f64,
    values: Vec<f64>,
}

impl PathMatrix {
    /// Cross-section of all paths at time index `t` (0 = initial price).
    pub fn step(&self, t: usize) -> Option<&[f64]> {
        if t > self.steps {
            return None;
        }
        self.values.get(t * self.paths..(t + 1) * self.paths)
    }

    /// Prices at the horizon.
    pub fn terminal(&self) -> &[f64] {
        let start = self.steps * self.paths;
        &self.values[start..start + self.paths]
    }

    /// One full path from t = 0 to the horizon.
    pub fn path(&self, j: usize) -> Option<Vec<f64>> {
        if j >= self.paths {
            return None;
        }
        Some((0..=self.steps).map(|t| self.values[t * self.paths + j]).collect())
    }
}

/// Simulate `paths` GBM paths of `steps` steps over `horizon` years.
pub fn monte_carlo_paths<R: Rng + ?Sized>(
    initial_price: f64,
    drift: f64,
    volatility: f64,
    horizon: f64,
    steps: usize,
    paths: usize,
    rng: &mut R,
) -> PricingResult<PathMatrix> {
    ensure_positive("initial_price", initial_price)?;
    ensure_finite("drift", drift)?;
    ensure_non_negative("volatility", volatility)?;
    ensure_positive("horizon", horizon)?;
    ensure_count("steps", steps)?;
    ensure_count("paths", paths)?;

    let dt = horizon / steps as f64;
    let mean = (drift - 0.5 * volatility * volatility) * dt;
    let scale = volatility * dt.sqrt();
    let normal = Normal::standard();

    let len = steps
        .checked_add(1)
        .and_then(|rows| rows.checked_mul(paths))
        .ok_or(PricingError::InvalidParameter {
            name: "paths",
            value: paths as f64,
            reason: "(steps + 1) * paths overflows usize",
        })?;
    let mut values = Vec::with_capacity(len);
    values.resize(paths, initial_price);

    for t in 1..=steps {
        let prev = (t - 1) * paths;
        for j in 0..paths {
            let z: f64 = rng.sample(normal);
            let next = values[prev + j] * (mean + scale * z).exp();
            values.push(next);
        }
    }

    tracing::debug!(steps, paths, dt, "monte carlo paths simulated");

    Ok(PathMatrix {
        steps,
        paths,
        dt,
        values,
    })
}

/// One-step GBM draw of `n` prices at the horizon.
pub fn terminal_prices<R: Rng + ?Sized>(
    initial_price: f64,
    drift: f64,
    volatility: f64,
    horizon: f64,
    n: usize,
    rng: &mut R,
) -> PricingResult<Vec<f64>> {
    ensure_positive("initial_price", initial_price)?;
    ensure_finite("drift", drift)?;
    ensure_non_negative("volatility", volatility)?;
    ensure_positive("horizon", horizon)?;
    ensure_count("samples", n)?;

    let mean = (drift - 0.5 * volatility * volatility) * horizon;
    let scale = volatility * horizon.sqrt();
    let normal = Normal::standard();

    Ok((0..n)
        .map(|_| initial_price * (mean + scale * rng.sample(normal)).exp())
        .collect())
}
