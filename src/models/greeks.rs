use crate::errors::{ensure_non_negative, ensure_positive, PricingError, PricingResult};
use crate::models::black_scholes::terms_unchecked;
use crate::models::normal::StandardNormal;
use crate::models::{
    validate_pair, ContractParameters, GreeksResult, MarketParameters, OptionType, RiskNeutralTerms,
};

/// Black-Scholes Greeks: delta, gamma, theta.
///
/// delta_call = Phi(d1)              delta_put = Phi(d1) - 1
/// gamma      = phi(d1) / (S * sigma * sqrt(T))
/// theta      = -sigma*S*phi(d1) / (2*sqrt(T)) - s*r*K*e^(-rT)*Phi(s*d2),  s = +1 call / -1 put
///
/// Every quantity is passed explicitly; d1/d2 come from `risk_neutral_terms`.
/// Theta is per year of calendar time (dV/dt = -dV/dT).
pub fn delta(option_type: OptionType, d1: f64) -> PricingResult<f64> {
    ensure_not_nan("d1", d1)?;
    Ok(delta_unchecked(&StandardNormal::new(), option_type, d1))
}

/// Same for calls and puts, so the option type is not an input.
/// Returns 0 when T = 0 or sigma = 0.
pub fn gamma(spot: f64, time_to_maturity: f64, volatility: f64, d1: f64) -> PricingResult<f64> {
    ensure_positive("spot", spot)?;
    ensure_non_negative("time_to_maturity", time_to_maturity)?;
    ensure_non_negative("volatility", volatility)?;
    ensure_not_nan("d1", d1)?;
    Ok(gamma_unchecked(&StandardNormal::new(), spot, time_to_maturity, volatility, d1))
}

/// When T = 0 or sigma = 0 the diffusion term is dropped and only the
/// discounting carry remains, evaluated at the limiting d2.
///
/// At T = 0 with S = K and sigma > 0 the diffusion term diverges to -inf.
/// It is dropped there as well, so the result is the half carry -s*r*K/2.
#[allow(clippy::too_many_arguments)]
pub fn theta(
    option_type: OptionType,
    d1: f64,
    d2: f64,
    spot: f64,
    strike: f64,
    risk_free_rate: f64,
    time_to_maturity: f64,
    volatility: f64,
) -> PricingResult<f64> {
    ensure_not_nan("d1", d1)?;
    ensure_not_nan("d2", d2)?;
    let market = MarketParameters::new(spot, risk_free_rate, volatility);
    let contract = ContractParameters::new(strike, time_to_maturity, option_type);
    validate_pair(&market, &contract)?;

    let terms = RiskNeutralTerms { d1, d2 };
    Ok(theta_unchecked(&StandardNormal::new(), &market, &contract, &terms))
}

/// All three Greeks from one d1/d2 evaluation.
pub fn greeks(market: &MarketParameters, contract: &ContractParameters) -> PricingResult<GreeksResult> {
    validate_pair(market, contract)?;

    let terms = terms_unchecked(market, contract);
    Ok(greeks_from_terms(&StandardNormal::new(), market, contract, &terms))
}

/// Inputs must already be validated.
pub(crate) fn greeks_from_terms(
    normal: &StandardNormal,
    market: &MarketParameters,
    contract: &ContractParameters,
    terms: &RiskNeutralTerms,
) -> GreeksResult {
    GreeksResult {
        delta: delta_unchecked(normal, contract.option_type, terms.d1),
        theta: theta_unchecked(normal, market, contract, terms),
        gamma: gamma_unchecked(
            normal,
            market.spot,
            contract.time_to_maturity,
            market.volatility,
            terms.d1,
        ),
    }
}

#[inline]
pub(crate) fn delta_unchecked(normal: &StandardNormal, option_type: OptionType, d1: f64) -> f64 {
    match option_type {
        OptionType::Call => normal.cdf(d1),
        OptionType::Put => normal.cdf(d1) - 1.0,
    }
}

#[inline]
pub(crate) fn gamma_unchecked(normal: &StandardNormal, spot: f64, t: f64, sigma: f64, d1: f64) -> f64 {
    let denom = spot * sigma * t.sqrt();
    if denom <= 0.0 {
        tracing::trace!(spot, t, sigma, "degenerate gamma, returning 0");
        return 0.0;
    }
    normal.pdf(d1) / denom
}

#[inline]
pub(crate) fn theta_unchecked(
    normal: &StandardNormal,
    market: &MarketParameters,
    contract: &ContractParameters,
    terms: &RiskNeutralTerms,
) -> f64 {
    let s = market.spot;
    let k = contract.strike;
    let r = market.risk_free_rate;
    let sigma = market.volatility;
    let t = contract.time_to_maturity;
    let sign = contract.option_type.sign();

    let carry = -sign * r * k * (-r * t).exp() * normal.cdf(sign * terms.d2);

    let sqrt_t = t.sqrt();
    if sigma * sqrt_t <= 0.0 {
        tracing::trace!(spot = s, strike = k, t, sigma, "degenerate theta, carry term only");
        return carry;
    }

    -(sigma * s * normal.pdf(terms.d1)) / (2.0 * sqrt_t) + carry
}

/// d1/d2 may legitimately be infinite at degenerate inputs, but never NaN.
#[inline]
pub(crate) fn ensure_not_nan(name: &'static str, value: f64) -> PricingResult<f64> {
    if value.is_nan() {
        return Err(PricingError::InvalidParameter {
            name,
            value,
            reason: "must not be NaN",
        });
    }
    Ok(value)
}
