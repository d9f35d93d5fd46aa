//! Runner output: summaries of the pricing surfaces and the simulators.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::batch::surface::{greeks_surface, price_surface};
use crate::batch::{linspace, Surface};
use crate::config::{AppConfig, GridConfig, SimulationConfig};
use crate::errors::{PricingError, PricingResult};
use crate::models::black_scholes::BlackScholes;
use crate::models::{ContractParameters, MarketParameters, OptionType, Valuation};
use crate::simulation::{
    brownian_motion, monte_carlo_paths, risk_free_values, terminal_prices, white_noise,
    SampleSummary,
};

const MAX_RISK_FREE_POINTS: usize = 1_000_000;

#[derive(Debug, Clone, serde::Serialize)]
pub struct Report {
    pub generated_at: String,
    pub grid: GridExtent,
    pub surfaces: Vec<SurfaceReport>,
    pub simulation: SimulationReport,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct GridExtent {
    pub strike: f64,
    pub risk_free_rate: f64,
    pub volatility: f64,
    pub spot: (f64, f64),
    pub maturity: (f64, f64),
    pub steps: usize,
}

#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct Range {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl From<&Surface> for Range {
    fn from(surface: &Surface) -> Self {
        Self {
            min: surface.min(),
            max: surface.max(),
        }
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct SurfaceReport {
    pub option_type: OptionType,
    pub price: Range,
    pub delta: Range,
    pub theta: Range,
    pub gamma: Range,
    /// Spot = strike at the longest maturity.
    pub at_the_money: Valuation,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct SimulationReport {
    pub seed: Option<u64>,
    pub brownian_motion: BrownianReport,
    pub monte_carlo: MonteCarloReport,
    pub risky_asset: MonteCarloReport,
    pub risk_free: RiskFreeReport,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct BrownianReport {
    pub steps: usize,
    pub dt: f64,
    pub increments: SampleSummary,
    pub terminal: f64,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct MonteCarloReport {
    pub steps: usize,
    pub paths: usize,
    pub terminal: SampleSummary,
    /// S0 * e^(mu * T)
    pub expected_mean: f64,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct RiskFreeReport {
    pub initial_value: f64,
    pub rate: f64,
    pub horizon: f64,
    pub final_value: f64,
}

impl Report {
    pub fn to_json(&self) -> PricingResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

pub fn build_report(cfg: &AppConfig) -> PricingResult<Report> {
    let surfaces = cfg
        .grid
        .option_types
        .iter()
        .map(|&option_type| surface_report(&cfg.grid, option_type))
        .collect::<PricingResult<Vec<_>>>()?;

    let simulation = simulation_report(&cfg.simulation)?;

    Ok(Report {
        generated_at: chrono::Utc::now().to_rfc3339(),
        grid: GridExtent {
            strike: cfg.grid.strike,
            risk_free_rate: cfg.grid.risk_free_rate,
            volatility: cfg.grid.volatility,
            spot: (cfg.grid.spot_min, cfg.grid.spot_max),
            maturity: (cfg.grid.maturity_min, cfg.grid.maturity_max),
            steps: cfg.grid.steps,
        },
        surfaces,
        simulation,
    })
}

fn surface_report(grid: &GridConfig, option_type: OptionType) -> PricingResult<SurfaceReport> {
    let spots = linspace(grid.spot_min, grid.spot_max, grid.steps);
    let maturities = linspace(grid.maturity_min, grid.maturity_max, grid.steps);

    let prices = price_surface(
        &spots,
        &maturities,
        grid.strike,
        grid.risk_free_rate,
        grid.volatility,
        option_type,
    )?;
    let greeks = greeks_surface(
        &spots,
        &maturities,
        grid.strike,
        grid.risk_free_rate,
        grid.volatility,
        option_type,
    )?;

    let at_the_money = BlackScholes::new().valuation(
        &MarketParameters::new(grid.strike, grid.risk_free_rate, grid.volatility),
        &ContractParameters::new(grid.strike, grid.maturity_max, option_type),
    )?;

    tracing::info!(
        %option_type,
        atm_price = at_the_money.price,
        atm_delta = at_the_money.greeks.delta,
        atm_gamma = at_the_money.greeks.gamma,
        "surface evaluated"
    );

    Ok(SurfaceReport {
        option_type,
        price: (&prices).into(),
        delta: (&greeks.delta).into(),
        theta: (&greeks.theta).into(),
        gamma: (&greeks.gamma).into(),
        at_the_money,
    })
}

fn simulation_report(sim: &SimulationConfig) -> PricingResult<SimulationReport> {
    let mut rng = match sim.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let noise = white_noise(sim.horizon, sim.noise_steps, &mut rng)?;
    let walk = brownian_motion(&noise.increments);
    let brownian = BrownianReport {
        steps: sim.noise_steps,
        dt: noise.dt,
        increments: SampleSummary::from_samples(&noise.increments),
        terminal: walk.last().copied().unwrap_or(0.0),
    };

    let expected_mean = sim.initial_price * (sim.drift * sim.horizon).exp();

    let paths = monte_carlo_paths(
        sim.initial_price,
        sim.drift,
        sim.volatility,
        sim.horizon,
        sim.steps,
        sim.paths,
        &mut rng,
    )?;
    let monte_carlo = MonteCarloReport {
        steps: sim.steps,
        paths: sim.paths,
        terminal: SampleSummary::from_samples(paths.terminal()),
        expected_mean,
    };

    let terminal = terminal_prices(
        sim.initial_price,
        sim.drift,
        sim.volatility,
        sim.horizon,
        sim.paths,
        &mut rng,
    )?;
    let risky_asset = MonteCarloReport {
        steps: 1,
        paths: sim.paths,
        terminal: SampleSummary::from_samples(&terminal),
        expected_mean,
    };

    let points = risk_free_points(sim.risk_free_horizon)?;
    let times = linspace(0.0, sim.risk_free_horizon, points);
    let growth = risk_free_values(sim.risk_free_initial, sim.risk_free_rate, &times)?;
    let risk_free = RiskFreeReport {
        initial_value: sim.risk_free_initial,
        rate: sim.risk_free_rate,
        horizon: sim.risk_free_horizon,
        final_value: growth.last().copied().unwrap_or(sim.risk_free_initial),
    };

    tracing::info!(
        mc_mean = monte_carlo.terminal.mean,
        risky_mean = risky_asset.terminal.mean,
        expected_mean,
        "simulations complete"
    );

    Ok(SimulationReport {
        seed: sim.seed,
        brownian_motion: brownian,
        monte_carlo,
        risky_asset,
        risk_free,
    })
}

/// Tabulation points at 0.1-year spacing, endpoints included.
fn risk_free_points(horizon: f64) -> PricingResult<usize> {
    let intervals = (horizon * 10.0).round().max(1.0);
    if !intervals.is_finite() || intervals >= MAX_RISK_FREE_POINTS as f64 {
        return Err(PricingError::Config(format!(
            "RISKFREE_HORIZON {horizon} gives too many tabulation points"
        )));
    }
    Ok(intervals as usize + 1)
}
