pub mod black_scholes;
pub mod greeks;
pub mod normal;

use crate::errors::{ensure_finite, ensure_non_negative, ensure_positive, PricingError, PricingResult};
use std::str::FromStr;

/// Closed-form pricing models implement this trait.
/// price() must be a pure function: deterministic output from inputs only.
/// Send + Sync so one instance can be shared across grid worker threads.
pub trait PricingModel: Send + Sync {
    fn name(&self) -> &'static str;

    /// Fair value of the contract under the given market. Never negative.
    fn price(&self, market: &MarketParameters, contract: &ContractParameters) -> PricingResult<f64>;
}

// ── Option type ──

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    /// +1.0 for calls, -1.0 for puts.
    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            Self::Call => 1.0,
            Self::Put => -1.0,
        }
    }

    /// Payoff at expiry for a given terminal spot.
    #[inline]
    pub fn intrinsic(self, spot: f64, strike: f64) -> f64 {
        match self {
            Self::Call => (spot - strike).max(0.0),
            Self::Put => (strike - spot).max(0.0),
        }
    }
}

impl std::fmt::Display for OptionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Call => write!(f, "call"),
            Self::Put => write!(f, "put"),
        }
    }
}

/// Exact match only: "Call", "CALL" or " call" are rejected rather than guessed.
impl FromStr for OptionType {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "call" => Ok(Self::Call),
            "put" => Ok(Self::Put),
            other => Err(PricingError::UnsupportedOptionType(other.to_string())),
        }
    }
}

// ── Inputs ──

/// Market side of a valuation: S, r, sigma.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MarketParameters {
    pub spot: f64,
    /// Annualized, continuously compounded. May be negative.
    pub risk_free_rate: f64,
    /// Annualized standard deviation of log-returns.
    pub volatility: f64,
}

impl MarketParameters {
    pub fn new(spot: f64, risk_free_rate: f64, volatility: f64) -> Self {
        Self {
            spot,
            risk_free_rate,
            volatility,
        }
    }

    pub fn validate(&self) -> PricingResult<()> {
        ensure_positive("spot", self.spot)?;
        ensure_finite("risk_free_rate", self.risk_free_rate)?;
        ensure_non_negative("volatility", self.volatility)?;
        Ok(())
    }
}

/// Contract side of a valuation: K, T, call/put.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ContractParameters {
    pub strike: f64,
    /// Years. T = 0 means at expiry.
    pub time_to_maturity: f64,
    pub option_type: OptionType,
}

impl ContractParameters {
    pub fn new(strike: f64, time_to_maturity: f64, option_type: OptionType) -> Self {
        Self {
            strike,
            time_to_maturity,
            option_type,
        }
    }

    pub fn validate(&self) -> PricingResult<()> {
        ensure_positive("strike", self.strike)?;
        ensure_non_negative("time_to_maturity", self.time_to_maturity)?;
        Ok(())
    }
}

/// Both sides valid, and e^(-rT) representable as a finite f64.
pub(crate) fn validate_pair(market: &MarketParameters, contract: &ContractParameters) -> PricingResult<()> {
    market.validate()?;
    contract.validate()?;
    ensure_discount_finite(market.risk_free_rate, contract.time_to_maturity)
}

/// An overflowing discount factor would turn prices into inf or NaN.
pub(crate) fn ensure_discount_finite(risk_free_rate: f64, time_to_maturity: f64) -> PricingResult<()> {
    if (-risk_free_rate * time_to_maturity).exp().is_finite() {
        Ok(())
    } else {
        Err(PricingError::InvalidParameter {
            name: "risk_free_rate",
            value: risk_free_rate,
            reason: "discount factor e^(-rT) overflows",
        })
    }
}

// ── Derived quantities ──

/// Standardized risk-neutral distances. Invariant: d2 = d1 - sigma * sqrt(T).
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct RiskNeutralTerms {
    pub d1: f64,
    pub d2: f64,
}

/// First and second order sensitivities.
/// delta in [0, 1] for calls and [-1, 0] for puts; gamma >= 0; theta per year.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct GreeksResult {
    pub delta: f64,
    pub theta: f64,
    pub gamma: f64,
}

/// Price and Greeks from a single d1/d2 evaluation.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct Valuation {
    pub price: f64,
    pub greeks: GreeksResult,
}
