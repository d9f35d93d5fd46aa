//! Maturity x spot grids, evaluated row-parallel.

use rayon::prelude::*;

use crate::errors::{ensure_finite, ensure_non_negative, ensure_positive, PricingResult};
use crate::models::black_scholes::{price_from_terms, terms_unchecked};
use crate::models::greeks::greeks_from_terms;
use crate::models::normal::StandardNormal;
use crate::models::{
    ensure_discount_finite, ContractParameters, GreeksResult, MarketParameters, OptionType,
};

/// `n` evenly spaced points from `start` to `end` inclusive.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            let mut out: Vec<f64> = (0..n).map(|i| start + step * i as f64).collect();
            out[n - 1] = end;
            out
        }
    }
}

/// Values on a grid of maturities (rows) by spots (columns), row-major.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Surface {
    pub maturities: Vec<f64>,
    pub spots: Vec<f64>,
    pub values: Vec<f64>,
}

impl Surface {
    /// (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        (self.maturities.len(), self.spots.len())
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.maturities.len() || col >= self.spots.len() {
            return None;
        }
        self.values.get(row * self.spots.len() + col).copied()
    }

    /// Value against spot at one maturity.
    pub fn row(&self, row: usize) -> Option<&[f64]> {
        let width = self.spots.len();
        if row >= self.maturities.len() {
            return None;
        }
        self.values.get(row * width..(row + 1) * width)
    }

    /// Value against maturity at one spot.
    pub fn column(&self, col: usize) -> Option<Vec<f64>> {
        if col >= self.spots.len() {
            return None;
        }
        Some(
            (0..self.maturities.len())
                .map(|row| self.values[row * self.spots.len() + col])
                .collect(),
        )
    }

    pub fn min(&self) -> Option<f64> {
        self.values.iter().copied().reduce(f64::min)
    }

    pub fn max(&self) -> Option<f64> {
        self.values.iter().copied().reduce(f64::max)
    }

    fn from_rows(maturities: &[f64], spots: &[f64], rows: Vec<Vec<f64>>) -> Self {
        Self {
            maturities: maturities.to_vec(),
            spots: spots.to_vec(),
            values: rows.into_iter().flatten().collect(),
        }
    }
}

/// Delta, theta and gamma over the same grid.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct GreeksSurface {
    pub delta: Surface,
    pub theta: Surface,
    pub gamma: Surface,
}

/// Option value for every (maturity, spot) pair.
pub fn price_surface(
    spots: &[f64],
    maturities: &[f64],
    strike: f64,
    risk_free_rate: f64,
    volatility: f64,
    option_type: OptionType,
) -> PricingResult<Surface> {
    let grid = Grid::new(spots, maturities, strike, risk_free_rate, volatility, option_type)?;
    let normal = StandardNormal::new();

    let rows = grid.rows(|market, contract| {
        let terms = terms_unchecked(market, contract);
        price_from_terms(&normal, market, contract, &terms)
    });

    Ok(Surface::from_rows(maturities, spots, rows))
}

/// Greeks for every (maturity, spot) pair.
pub fn greeks_surface(
    spots: &[f64],
    maturities: &[f64],
    strike: f64,
    risk_free_rate: f64,
    volatility: f64,
    option_type: OptionType,
) -> PricingResult<GreeksSurface> {
    let grid = Grid::new(spots, maturities, strike, risk_free_rate, volatility, option_type)?;
    let normal = StandardNormal::new();

    let rows: Vec<Vec<GreeksResult>> = grid.rows(|market, contract| {
        let terms = terms_unchecked(market, contract);
        greeks_from_terms(&normal, market, contract, &terms)
    });

    let pick = |f: fn(&GreeksResult) -> f64| {
        let values = rows.iter().map(|row| row.iter().map(f).collect()).collect();
        Surface::from_rows(maturities, spots, values)
    };

    Ok(GreeksSurface {
        delta: pick(|g| g.delta),
        theta: pick(|g| g.theta),
        gamma: pick(|g| g.gamma),
    })
}

/// Validated grid axes. Every element is checked before any evaluation.
struct Grid {
    markets: Vec<MarketParameters>,
    contracts: Vec<ContractParameters>,
}

impl Grid {
    fn new(
        spots: &[f64],
        maturities: &[f64],
        strike: f64,
        risk_free_rate: f64,
        volatility: f64,
        option_type: OptionType,
    ) -> PricingResult<Self> {
        // Shared scalars are checked even when an axis is empty.
        ensure_positive("strike", strike)?;
        ensure_finite("risk_free_rate", risk_free_rate)?;
        ensure_non_negative("volatility", volatility)?;

        let markets = spots
            .iter()
            .map(|&s| {
                let market = MarketParameters::new(s, risk_free_rate, volatility);
                market.validate().map(|_| market)
            })
            .collect::<PricingResult<Vec<_>>>()?;

        let contracts = maturities
            .iter()
            .map(|&t| {
                let contract = ContractParameters::new(strike, t, option_type);
                contract.validate()?;
                ensure_discount_finite(risk_free_rate, t)?;
                Ok(contract)
            })
            .collect::<PricingResult<Vec<_>>>()?;

        tracing::debug!(
            rows = contracts.len(),
            cols = markets.len(),
            %option_type,
            "evaluating grid"
        );

        Ok(Self { markets, contracts })
    }

    fn rows<T, F>(&self, f: F) -> Vec<Vec<T>>
    where
        T: Send,
        F: Fn(&MarketParameters, &ContractParameters) -> T + Sync,
    {
        self.contracts
            .par_iter()
            .map(|contract| self.markets.iter().map(|market| f(market, contract)).collect())
            .collect()
    }
}
