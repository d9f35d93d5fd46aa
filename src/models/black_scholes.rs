use crate::errors::PricingResult;
use crate::models::greeks;
use crate::models::normal::StandardNormal;
use crate::models::{
    validate_pair, ContractParameters, MarketParameters, OptionType, PricingModel, RiskNeutralTerms,
    Valuation,
};

/// Black-Scholes pricing for European calls and puts (no dividends).
///
/// d1 = (ln(S/K) + (r + sigma^2/2)*T) / (sigma * sqrt(T))
/// d2 = d1 - sigma * sqrt(T)
///
/// Call = S*Phi(d1) - K*e^(-rT)*Phi(d2)
/// Put  = K*e^(-rT)*Phi(-d2) - S*Phi(-d1)
///
/// T = 0 prices at intrinsic value, sigma = 0 at the discounted deterministic payoff.
pub struct BlackScholes {
    /// Standard normal (created once, reused)
    normal: StandardNormal,
}

impl BlackScholes {
    pub fn new() -> Self {
        Self {
            normal: StandardNormal::new(),
        }
    }

    /// Price and Greeks sharing one d1/d2 evaluation.
    pub fn valuation(
        &self,
        market: &MarketParameters,
        contract: &ContractParameters,
    ) -> PricingResult<Valuation> {
        validate_pair(market, contract)?;

        let terms = terms_unchecked(market, contract);
        let price = price_from_terms(&self.normal, market, contract, &terms);
        let greeks = greeks::greeks_from_terms(&self.normal, market, contract, &terms);

        Ok(Valuation { price, greeks })
    }
}

impl Default for BlackScholes {
    fn default() -> Self {
        Self::new()
    }
}

impl PricingModel for BlackScholes {
    #[inline]
    fn name(&self) -> &'static str {
        "Black-Scholes"
    }

    fn price(&self, market: &MarketParameters, contract: &ContractParameters) -> PricingResult<f64> {
        validate_pair(market, contract)?;

        let terms = terms_unchecked(market, contract);
        Ok(price_from_terms(&self.normal, market, contract, &terms))
    }
}

/// Compute (d1, d2). The single implementation shared by pricing and Greeks.
///
/// Argument order is (S, K, r, T, sigma). When T = 0 or sigma = 0 the
/// quotient has no finite value, so both terms take the limit
/// sign(ln(S/K) + r*T) * infinity (0 when exactly at the forward).
pub fn risk_neutral_terms(
    spot: f64,
    strike: f64,
    risk_free_rate: f64,
    time_to_maturity: f64,
    volatility: f64,
) -> PricingResult<RiskNeutralTerms> {
    let market = MarketParameters::new(spot, risk_free_rate, volatility);
    // The option side does not enter d1/d2.
    let contract = ContractParameters::new(strike, time_to_maturity, OptionType::Call);
    market.validate()?;
    contract.validate()?;

    Ok(terms_unchecked(&market, &contract))
}

/// Price a European option.
///
/// Argument order is (S, K, T, r, sigma, type).
pub fn price(
    spot: f64,
    strike: f64,
    time_to_maturity: f64,
    risk_free_rate: f64,
    volatility: f64,
    option_type: OptionType,
) -> PricingResult<f64> {
    let market = MarketParameters::new(spot, risk_free_rate, volatility);
    let contract = ContractParameters::new(strike, time_to_maturity, option_type);
    BlackScholes::new().price(&market, &contract)
}

/// Inputs must already be validated.
#[inline]
pub(crate) fn terms_unchecked(
    market: &MarketParameters,
    contract: &ContractParameters,
) -> RiskNeutralTerms {
    let s = market.spot;
    let k = contract.strike;
    let r = market.risk_free_rate;
    let sigma = market.volatility;
    let t = contract.time_to_maturity;

    let sigma_sqrt_t = sigma * t.sqrt();
    let ln_s_k = (s / k).ln();

    if sigma_sqrt_t <= 0.0 {
        let moneyness = ln_s_k + r * t;
        let d = if moneyness > 0.0 {
            f64::INFINITY
        } else if moneyness < 0.0 {
            f64::NEG_INFINITY
        } else {
            0.0
        };
        tracing::trace!(spot = s, strike = k, t, sigma, d, "degenerate d1/d2");
        return RiskNeutralTerms { d1: d, d2: d };
    }

    let d1 = (ln_s_k + (r + 0.5 * sigma * sigma) * t) / sigma_sqrt_t;
    let d2 = d1 - sigma_sqrt_t;

    RiskNeutralTerms { d1, d2 }
}

/// Inputs must already be validated.
#[inline]
pub(crate) fn price_from_terms(
    normal: &StandardNormal,
    market: &MarketParameters,
    contract: &ContractParameters,
    terms: &RiskNeutralTerms,
) -> f64 {
    let s = market.spot;
    let k = contract.strike;
    let r = market.risk_free_rate;
    let t = contract.time_to_maturity;

    // At expiry: intrinsic value, no discounting.
    if t == 0.0 {
        tracing::trace!(spot = s, strike = k, "zero maturity, intrinsic value");
        return contract.option_type.intrinsic(s, k);
    }

    let discounted_strike = k * (-r * t).exp();

    // No diffusion: the forward is known, payoff is deterministic.
    if market.volatility == 0.0 {
        tracing::trace!(spot = s, strike = k, t, "zero volatility, discounted payoff");
        return contract.option_type.intrinsic(s, discounted_strike);
    }

    let value = match contract.option_type {
        OptionType::Call => s * normal.cdf(terms.d1) - discounted_strike * normal.cdf(terms.d2),
        OptionType::Put => discounted_strike * normal.cdf(-terms.d2) - s * normal.cdf(-terms.d1),
    };

    // Round-off can leave deep out-of-the-money values at -1e-17. NaN passes through.
    if value < 0.0 {
        0.0
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::PricingError;

    #[test]
    fn test_reference_atm_call() {
        // S=100, K=100, T=1, r=1%, sigma=25%
        let call = price(100.0, 100.0, 1.0, 0.01, 0.25, OptionType::Call).unwrap();
        assert!((call - 10.403539).abs() < 1e-5, "ATM call={call} should be ~10.4035");
    }

    #[test]
    fn test_reference_atm_put() {
        let put = price(100.0, 100.0, 1.0, 0.01, 0.25, OptionType::Put).unwrap();
        assert!((put - 9.408523).abs() < 1e-5, "ATM put={put} should be ~9.4085");
    }

    #[test]
    fn test_terms_reference() {
        let terms = risk_neutral_terms(100.0, 100.0, 0.01, 1.0, 0.25).unwrap();
        assert!((terms.d1 - 0.165).abs() < 1e-12, "d1={}", terms.d1);
        assert!((terms.d2 + 0.085).abs() < 1e-12, "d2={}", terms.d2);
    }

    #[test]
    fn test_terms_invariant() {
        let sigma: f64 = 0.4;
        let t: f64 = 2.5;
        let terms = risk_neutral_terms(80.0, 120.0, 0.03, t, sigma).unwrap();
        assert!((terms.d2 - (terms.d1 - sigma * t.sqrt())).abs() < 1e-14);
    }

    #[test]
    fn test_put_call_parity() {
        let (s, k, t, r, sigma) = (95.0, 105.0, 0.75, 0.04, 0.3);
        let call = price(s, k, t, r, sigma, OptionType::Call).unwrap();
        let put = price(s, k, t, r, sigma, OptionType::Put).unwrap();
        let forward_gap = s - k * f64::exp(-r * t);
        assert!((call - put - forward_gap).abs() < 1e-9, "parity violated: {call} - {put} != {forward_gap}");
    }

    #[test]
    fn test_zero_maturity_is_intrinsic() {
        for s in [50.0, 100.0, 150.0] {
            let call = price(s, 100.0, 0.0, 0.05, 0.25, OptionType::Call).unwrap();
            let put = price(s, 100.0, 0.0, 0.05, 0.25, OptionType::Put).unwrap();
            assert_eq!(call, f64::max(s - 100.0, 0.0));
            assert_eq!(put, f64::max(100.0 - s, 0.0));
        }
    }

    #[test]
    fn test_zero_volatility_is_discounted_payoff() {
        let (k, t, r) = (100.0, 2.0, 0.05);
        let df_k = k * f64::exp(-r * t);
        let call = price(95.0, k, t, r, 0.0, OptionType::Call).unwrap();
        let put = price(95.0, k, t, r, 0.0, OptionType::Put).unwrap();
        assert!((call - (95.0 - df_k).max(0.0)).abs() < 1e-12, "call={call}");
        assert!((put - (df_k - 95.0).max(0.0)).abs() < 1e-12, "put={put}");
        assert!(call.is_finite() && put.is_finite());
    }

    #[test]
    fn test_degenerate_terms_are_signed_infinities() {
        let itm = risk_neutral_terms(120.0, 100.0, 0.01, 0.0, 0.25).unwrap();
        assert_eq!(itm.d1, f64::INFINITY);
        assert_eq!(itm.d2, f64::INFINITY);

        let otm = risk_neutral_terms(80.0, 100.0, 0.01, 1.0, 0.0).unwrap();
        assert_eq!(otm.d1, f64::NEG_INFINITY);

        let atm = risk_neutral_terms(100.0, 100.0, 0.0, 1.0, 0.0).unwrap();
        assert_eq!(atm.d1, 0.0);
        assert_eq!(atm.d2, 0.0);
    }

    #[test]
    fn test_deep_itm_and_otm_limits() {
        let (k, t, r, sigma) = (100.0, 1.0, 0.01, 0.25);
        let df_k = k * f64::exp(-r * t);

        let big = 1e6;
        let call = price(big, k, t, r, sigma, OptionType::Call).unwrap();
        let put = price(big, k, t, r, sigma, OptionType::Put).unwrap();
        assert!((call - (big - df_k)).abs() < 1e-6, "deep ITM call={call}");
        assert!(put.abs() < 1e-9, "deep OTM put={put}");

        let tiny = 1e-6;
        let call = price(tiny, k, t, r, sigma, OptionType::Call).unwrap();
        let put = price(tiny, k, t, r, sigma, OptionType::Put).unwrap();
        assert!(call.abs() < 1e-9, "deep OTM call={call}");
        assert!((put - (df_k - tiny)).abs() < 1e-6, "deep ITM put={put}");
    }

    #[test]
    fn test_negative_rate_is_accepted() {
        let call = price(100.0, 100.0, 1.0, -0.02, 0.2, OptionType::Call).unwrap();
        assert!(call > 0.0 && call.is_finite());
    }

    #[test]
    fn test_overflowing_discount_rejected() {
        // e^(800) is not representable; the price must not collapse to 0.
        for option_type in [OptionType::Call, OptionType::Put] {
            let err = price(100.0, 100.0, 1.0, -800.0, 0.25, option_type).unwrap_err();
            assert!(
                matches!(err, PricingError::InvalidParameter { name: "risk_free_rate", .. }),
                "{option_type}: {err:?}"
            );
        }

        let market = MarketParameters::new(100.0, -800.0, 0.25);
        let contract = ContractParameters::new(100.0, 1.0, OptionType::Call);
        assert!(BlackScholes::new().valuation(&market, &contract).is_err());

        // d1/d2 do not involve the discount factor
        assert!(risk_neutral_terms(100.0, 100.0, -800.0, 1.0, 0.25).is_ok());
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        let err = price(-5.0, 100.0, 1.0, 0.01, 0.25, OptionType::Call).unwrap_err();
        assert!(matches!(err, PricingError::InvalidParameter { name: "spot", .. }));

        let err = price(100.0, 0.0, 1.0, 0.01, 0.25, OptionType::Call).unwrap_err();
        assert!(matches!(err, PricingError::InvalidParameter { name: "strike", .. }));

        let err = price(100.0, 100.0, -1.0, 0.01, 0.25, OptionType::Put).unwrap_err();
        assert!(matches!(err, PricingError::InvalidParameter { name: "time_to_maturity", .. }));

        let err = price(100.0, 100.0, 1.0, 0.01, -0.25, OptionType::Put).unwrap_err();
        assert!(matches!(err, PricingError::InvalidParameter { name: "volatility", .. }));

        assert!(risk_neutral_terms(100.0, 100.0, f64::NAN, 1.0, 0.2).is_err());
    }

    #[test]
    fn test_valuation_matches_free_functions() {
        let model = BlackScholes::new();
        let market = MarketParameters::new(100.0, 0.01, 0.25);
        let contract = ContractParameters::new(100.0, 1.0, OptionType::Call);
        let v = model.valuation(&market, &contract).unwrap();
        let px = price(100.0, 100.0, 1.0, 0.01, 0.25, OptionType::Call).unwrap();
        assert_eq!(v.price, px);
        assert_eq!(model.name(), "Black-Scholes");
        assert!((v.greeks.delta - 0.565528).abs() < 1e-6);
    }
}
