use crate::errors::{PricingError, PricingResult};
use crate::models::OptionType;

/// Grid is steps x steps points per surface.
const MAX_GRID_STEPS: usize = 2_000;
/// Upper bound on prices held by one simulation.
const MAX_SIM_CELLS: usize = 50_000_000;
/// Years; tabulated at 0.1-year spacing.
const MAX_RISKFREE_HORIZON: f64 = 10_000.0;

/// Runner configuration, read from the environment (and `.env` if present).
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub grid: GridConfig,
    pub simulation: SimulationConfig,
}

/// Parameters for the option value and Greeks surfaces.
#[derive(Debug, Clone, PartialEq)]
pub struct GridConfig {
    pub strike: f64,
    pub risk_free_rate: f64,
    pub volatility: f64,
    pub spot_min: f64,
    pub spot_max: f64,
    pub maturity_min: f64,
    pub maturity_max: f64,
    pub steps: usize,
    pub option_types: Vec<OptionType>,
}

/// Parameters for the underlying asset simulators.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub initial_price: f64,
    pub drift: f64,
    pub volatility: f64,
    pub horizon: f64,
    /// Trading days per horizon.
    pub steps: usize,
    pub paths: usize,
    pub noise_steps: usize,
    pub seed: Option<u64>,
    pub risk_free_initial: f64,
    pub risk_free_rate: f64,
    /// Years of risk-free growth to tabulate.
    pub risk_free_horizon: f64,
}

impl AppConfig {
    pub fn from_env() -> PricingResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> PricingResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let grid = GridConfig {
            strike: parse_or(&lookup, "BS_STRIKE", 100.0)?,
            risk_free_rate: parse_or(&lookup, "BS_RATE", 0.01)?,
            volatility: parse_or(&lookup, "BS_VOLATILITY", 0.25)?,
            spot_min: parse_or(&lookup, "BS_SPOT_MIN", 0.000001)?,
            spot_max: parse_or(&lookup, "BS_SPOT_MAX", 200.0)?,
            maturity_min: parse_or(&lookup, "BS_MATURITY_MIN", 0.0)?,
            maturity_max: parse_or(&lookup, "BS_MATURITY_MAX", 1.0)?,
            steps: parse_or(&lookup, "BS_GRID_STEPS", 100)?,
            option_types: option_types(&lookup)?,
        };

        let seed = match lookup("SIM_SEED") {
            Some(raw) => Some(
                raw.trim()
                    .parse::<u64>()
                    .map_err(|e| PricingError::Config(format!("SIM_SEED: {e}")))?,
            ),
            None => None,
        };

        let simulation = SimulationConfig {
            initial_price: parse_or(&lookup, "SIM_INITIAL_PRICE", 100.0)?,
            drift: parse_or(&lookup, "SIM_DRIFT", 0.1)?,
            volatility: parse_or(&lookup, "SIM_VOLATILITY", 0.23)?,
            horizon: parse_or(&lookup, "SIM_HORIZON", 1.0)?,
            steps: parse_or(&lookup, "SIM_STEPS", 252)?,
            paths: parse_or(&lookup, "SIM_PATHS", 10_000)?,
            noise_steps: parse_or(&lookup, "SIM_NOISE_STEPS", 10_000)?,
            seed,
            risk_free_initial: parse_or(&lookup, "RISKFREE_INITIAL", 100.0)?,
            risk_free_rate: parse_or(&lookup, "RISKFREE_RATE", 0.04)?,
            risk_free_horizon: parse_or(&lookup, "RISKFREE_HORIZON", 100.0)?,
        };

        let cfg = Self { grid, simulation };
        cfg.check_ranges()?;
        Ok(cfg)
    }

    fn check_ranges(&self) -> PricingResult<()> {
        let g = &self.grid;
        if g.spot_min > g.spot_max {
            return Err(PricingError::Config(format!(
                "BS_SPOT_MIN ({}) > BS_SPOT_MAX ({})",
                g.spot_min, g.spot_max
            )));
        }
        if g.maturity_min > g.maturity_max {
            return Err(PricingError::Config(format!(
                "BS_MATURITY_MIN ({}) > BS_MATURITY_MAX ({})",
                g.maturity_min, g.maturity_max
            )));
        }
        if g.steps == 0 || g.steps > MAX_GRID_STEPS {
            return Err(PricingError::Config(format!(
                "BS_GRID_STEPS must be in 1..={MAX_GRID_STEPS}, got {}",
                g.steps
            )));
        }

        let s = &self.simulation;
        // Also rejects NaN and infinities
        if !(0.0..=MAX_RISKFREE_HORIZON).contains(&s.risk_free_horizon) {
            return Err(PricingError::Config(format!(
                "RISKFREE_HORIZON must be finite and in 0..={MAX_RISKFREE_HORIZON}, got {}",
                s.risk_free_horizon
            )));
        }
        if s.noise_steps > MAX_SIM_CELLS {
            return Err(PricingError::Config(format!(
                "SIM_NOISE_STEPS must be <= {MAX_SIM_CELLS}, got {}",
                s.noise_steps
            )));
        }
        // PathMatrix holds (steps + 1) * paths prices
        let cells = s.steps.checked_add(1).and_then(|rows| rows.checked_mul(s.paths));
        if !matches!(cells, Some(n) if n <= MAX_SIM_CELLS) {
            return Err(PricingError::Config(format!(
                "SIM_STEPS x SIM_PATHS ({} x {}) exceeds {MAX_SIM_CELLS} simulated prices",
                s.steps, s.paths
            )));
        }
        Ok(())
    }
}

/// `BS_OPTION_TYPES`, comma separated, defaults to both sides.
fn option_types<F>(lookup: &F) -> PricingResult<Vec<OptionType>>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup("BS_OPTION_TYPES") {
        None => Ok(vec![OptionType::Call, OptionType::Put]),
        Some(raw) => raw.split(',').map(|s| s.trim().parse::<OptionType>()).collect(),
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> PricingResult<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| PricingError::Config(format!("{key}: {e}"))),
    }
}
