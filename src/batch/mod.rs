//! Elementwise evaluation over scalar-or-array arguments.
//!
//! Every argument broadcasts: scalars repeat, arrays must all share one length.
//! A batch either succeeds for every element or fails as a whole.

pub mod surface;

use crate::errors::{ensure_finite, ensure_non_negative, ensure_positive, PricingError, PricingResult};
use crate::models::black_scholes::{price_from_terms, terms_unchecked};
use crate::models::greeks::{self, ensure_not_nan, greeks_from_terms};
use crate::models::normal::StandardNormal;
use crate::models::{
    validate_pair, ContractParameters, GreeksResult, MarketParameters, OptionType, RiskNeutralTerms,
};

pub use surface::{linspace, GreeksSurface, Surface};

/// A scalar or a borrowed array of values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Arg<'a> {
    Scalar(f64),
    Array(&'a [f64]),
}

impl Arg<'_> {
    /// None for scalars.
    #[inline]
    pub fn len(&self) -> Option<usize> {
        match self {
            Self::Scalar(_) => None,
            Self::Array(values) => Some(values.len()),
        }
    }

    /// Caller guarantees `i` is within the broadcast length.
    #[inline]
    pub(crate) fn at(&self, i: usize) -> f64 {
        match self {
            Self::Scalar(v) => *v,
            Self::Array(values) => values[i],
        }
    }

    /// Apply `check` to a scalar once, so it is rejected even when every
    /// array argument is empty. Array elements are checked per element.
    pub(crate) fn check_scalar(
        &self,
        name: &'static str,
        check: fn(&'static str, f64) -> PricingResult<f64>,
    ) -> PricingResult<()> {
        if let Self::Scalar(v) = self {
            check(name, *v)?;
        }
        Ok(())
    }
}

impl From<f64> for Arg<'_> {
    fn from(v: f64) -> Self {
        Self::Scalar(v)
    }
}

impl<'a> From<&'a [f64]> for Arg<'a> {
    fn from(values: &'a [f64]) -> Self {
        Self::Array(values)
    }
}

impl<'a> From<&'a Vec<f64>> for Arg<'a> {
    fn from(values: &'a Vec<f64>) -> Self {
        Self::Array(values.as_slice())
    }
}

impl<'a, const N: usize> From<&'a [f64; N]> for Arg<'a> {
    fn from(values: &'a [f64; N]) -> Self {
        Self::Array(values.as_slice())
    }
}

/// Common length of all array arguments, or 1 when every argument is scalar.
pub fn broadcast_len(args: &[(&'static str, Arg<'_>)]) -> PricingResult<usize> {
    let mut expected: Option<usize> = None;

    for &(name, arg) in args {
        let Some(found) = arg.len() else { continue };
        match expected {
            None => expected = Some(found),
            Some(expected) if expected != found => {
                return Err(PricingError::ShapeMismatch {
                    name,
                    expected,
                    found,
                });
            }
            Some(_) => {}
        }
    }

    Ok(expected.unwrap_or(1))
}

/// Elementwise `price(S, K, T, r, sigma, type)`.
pub fn price_batch<'a>(
    spot: impl Into<Arg<'a>>,
    strike: impl Into<Arg<'a>>,
    time_to_maturity: impl Into<Arg<'a>>,
    risk_free_rate: impl Into<Arg<'a>>,
    volatility: impl Into<Arg<'a>>,
    option_type: OptionType,
) -> PricingResult<Vec<f64>> {
    let inputs = Inputs::new(
        spot.into(),
        strike.into(),
        time_to_maturity.into(),
        risk_free_rate.into(),
        volatility.into(),
        option_type,
    )?;
    let normal = StandardNormal::new();

    inputs.map(|market, contract| {
        let terms = terms_unchecked(market, contract);
        price_from_terms(&normal, market, contract, &terms)
    })
}

/// Elementwise `risk_neutral_terms(S, K, r, T, sigma)`.
pub fn risk_neutral_terms_batch<'a>(
    spot: impl Into<Arg<'a>>,
    strike: impl Into<Arg<'a>>,
    risk_free_rate: impl Into<Arg<'a>>,
    time_to_maturity: impl Into<Arg<'a>>,
    volatility: impl Into<Arg<'a>>,
) -> PricingResult<Vec<RiskNeutralTerms>> {
    let inputs = Inputs::new(
        spot.into(),
        strike.into(),
        time_to_maturity.into(),
        risk_free_rate.into(),
        volatility.into(),
        OptionType::Call,
    )?;

    inputs.map(terms_unchecked)
}

/// Elementwise Greeks, one d1/d2 evaluation per element.
pub fn greeks_batch<'a>(
    spot: impl Into<Arg<'a>>,
    strike: impl Into<Arg<'a>>,
    time_to_maturity: impl Into<Arg<'a>>,
    risk_free_rate: impl Into<Arg<'a>>,
    volatility: impl Into<Arg<'a>>,
    option_type: OptionType,
) -> PricingResult<Vec<GreeksResult>> {
    let inputs = Inputs::new(
        spot.into(),
        strike.into(),
        time_to_maturity.into(),
        risk_free_rate.into(),
        volatility.into(),
        option_type,
    )?;
    let normal = StandardNormal::new();

    inputs.map(|market, contract| {
        let terms = terms_unchecked(market, contract);
        greeks_from_terms(&normal, market, contract, &terms)
    })
}

/// Elementwise `delta(type, d1)`.
pub fn delta_batch<'a>(option_type: OptionType, d1: impl Into<Arg<'a>>) -> PricingResult<Vec<f64>> {
    let d1 = d1.into();
    let n = broadcast_len(&[("d1", d1)])?;

    (0..n).map(|i| greeks::delta(option_type, d1.at(i))).collect()
}

/// Elementwise `gamma(S, T, sigma, d1)`.
pub fn gamma_batch<'a>(
    spot: impl Into<Arg<'a>>,
    time_to_maturity: impl Into<Arg<'a>>,
    volatility: impl Into<Arg<'a>>,
    d1: impl Into<Arg<'a>>,
) -> PricingResult<Vec<f64>> {
    let (spot, t, sigma, d1) = (spot.into(), time_to_maturity.into(), volatility.into(), d1.into());
    let n = broadcast_len(&[
        ("spot", spot),
        ("time_to_maturity", t),
        ("volatility", sigma),
        ("d1", d1),
    ])?;
    spot.check_scalar("spot", ensure_positive)?;
    t.check_scalar("time_to_maturity", ensure_non_negative)?;
    sigma.check_scalar("volatility", ensure_non_negative)?;
    d1.check_scalar("d1", ensure_not_nan)?;

    (0..n)
        .map(|i| greeks::gamma(spot.at(i), t.at(i), sigma.at(i), d1.at(i)))
        .collect()
}

/// Elementwise `theta(type, d1, d2, S, K, r, T, sigma)`.
#[allow(clippy::too_many_arguments)]
pub fn theta_batch<'a>(
    option_type: OptionType,
    d1: impl Into<Arg<'a>>,
    d2: impl Into<Arg<'a>>,
    spot: impl Into<Arg<'a>>,
    strike: impl Into<Arg<'a>>,
    risk_free_rate: impl Into<Arg<'a>>,
    time_to_maturity: impl Into<Arg<'a>>,
    volatility: impl Into<Arg<'a>>,
) -> PricingResult<Vec<f64>> {
    let (d1, d2) = (d1.into(), d2.into());
    let (spot, strike, r, t, sigma) = (
        spot.into(),
        strike.into(),
        risk_free_rate.into(),
        time_to_maturity.into(),
        volatility.into(),
    );
    let n = broadcast_len(&[
        ("d1", d1),
        ("d2", d2),
        ("spot", spot),
        ("strike", strike),
        ("risk_free_rate", r),
        ("time_to_maturity", t),
        ("volatility", sigma),
    ])?;
    d1.check_scalar("d1", ensure_not_nan)?;
    d2.check_scalar("d2", ensure_not_nan)?;
    spot.check_scalar("spot", ensure_positive)?;
    strike.check_scalar("strike", ensure_positive)?;
    r.check_scalar("risk_free_rate", ensure_finite)?;
    t.check_scalar("time_to_maturity", ensure_non_negative)?;
    sigma.check_scalar("volatility", ensure_non_negative)?;

    (0..n)
        .map(|i| {
            greeks::theta(
                option_type,
                d1.at(i),
                d2.at(i),
                spot.at(i),
                strike.at(i),
                r.at(i),
                t.at(i),
                sigma.at(i),
            )
        })
        .collect()
}

/// Broadcast market and contract arguments.
struct Inputs<'a> {
    spot: Arg<'a>,
    strike: Arg<'a>,
    time_to_maturity: Arg<'a>,
    risk_free_rate: Arg<'a>,
    volatility: Arg<'a>,
    option_type: OptionType,
    len: usize,
}

impl<'a> Inputs<'a> {
    fn new(
        spot: Arg<'a>,
        strike: Arg<'a>,
        time_to_maturity: Arg<'a>,
        risk_free_rate: Arg<'a>,
        volatility: Arg<'a>,
        option_type: OptionType,
    ) -> PricingResult<Self> {
        let len = broadcast_len(&[
            ("spot", spot),
            ("strike", strike),
            ("time_to_maturity", time_to_maturity),
            ("risk_free_rate", risk_free_rate),
            ("volatility", volatility),
        ])?;
        spot.check_scalar("spot", ensure_positive)?;
        strike.check_scalar("strike", ensure_positive)?;
        time_to_maturity.check_scalar("time_to_maturity", ensure_non_negative)?;
        risk_free_rate.check_scalar("risk_free_rate", ensure_finite)?;
        volatility.check_scalar("volatility", ensure_non_negative)?;
        tracing::debug!(len, %option_type, "batch evaluation");

        Ok(Self {
            spot,
            strike,
            time_to_maturity,
            risk_free_rate,
            volatility,
            option_type,
            len,
        })
    }

    /// Validate each element and apply `f`; the first invalid element fails the batch.
    fn map<T, F>(&self, f: F) -> PricingResult<Vec<T>>
    where
        F: Fn(&MarketParameters, &ContractParameters) -> T,
    {
        (0..self.len)
            .map(|i| {
                let market = MarketParameters::new(
                    self.spot.at(i),
                    self.risk_free_rate.at(i),
                    self.volatility.at(i),
                );
                let contract = ContractParameters::new(
                    self.strike.at(i),
                    self.time_to_maturity.at(i),
                    self.option_type,
                );
                validate_pair(&market, &contract)?;
                Ok(f(&market, &contract))
            })
            .collect()
    }
}
