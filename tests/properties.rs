use proptest::prelude::*;

use vanilla_bs::{
    delta, gamma, greeks, price, price_batch, risk_neutral_terms, theta, ContractParameters,
    MarketParameters, OptionType, PricingError,
};

fn spot() -> impl Strategy<Value = f64> {
    1.0..500.0f64
}

fn strike() -> impl Strategy<Value = f64> {
    1.0..500.0f64
}

fn maturity() -> impl Strategy<Value = f64> {
    0.01..5.0f64
}

fn rate() -> impl Strategy<Value = f64> {
    -0.05..0.10f64
}

fn volatility() -> impl Strategy<Value = f64> {
    0.05..1.0f64
}

fn option_type() -> impl Strategy<Value = OptionType> {
    prop_oneof![Just(OptionType::Call), Just(OptionType::Put)]
}

proptest! {
    /// C - P = S - K e^(-rT)
    #[test]
    fn prop_put_call_parity(s in spot(), k in strike(), t in maturity(), r in rate(), v in volatility()) {
        let call = price(s, k, t, r, v, OptionType::Call).unwrap();
        let put = price(s, k, t, r, v, OptionType::Put).unwrap();
        let forward = s - k * (-r * t).exp();
        let tol = 1e-8 * (s + k);
        prop_assert!((call - put - forward).abs() < tol, "C={call} P={put} S-Ke^-rT={forward}");
    }

    #[test]
    fn prop_prices_within_no_arbitrage_bounds(
        s in spot(), k in strike(), t in maturity(), r in rate(), v in volatility(), ty in option_type()
    ) {
        let p = price(s, k, t, r, v, ty).unwrap();
        let discounted_strike = k * (-r * t).exp();
        prop_assert!(p >= 0.0);
        match ty {
            OptionType::Call => {
                prop_assert!(p <= s + 1e-9 * s, "call {p} above spot {s}");
            }
            OptionType::Put => {
                prop_assert!(p <= discounted_strike + 1e-9 * k, "put {p} above {discounted_strike}");
            }
        }
    }

    #[test]
    fn prop_delta_bounds(s in spot(), k in strike(), t in maturity(), r in rate(), v in volatility()) {
        let terms = risk_neutral_terms(s, k, r, t, v).unwrap();
        let call = delta(OptionType::Call, terms.d1).unwrap();
        let put = delta(OptionType::Put, terms.d1).unwrap();
        prop_assert!((0.0..=1.0).contains(&call), "call delta {call}");
        prop_assert!((-1.0..=0.0).contains(&put), "put delta {put}");
        prop_assert!((call - put - 1.0).abs() < 1e-12);
    }

    #[test]
    fn prop_gamma_symmetric_and_non_negative(
        s in spot(), k in strike(), t in maturity(), r in rate(), v in volatility()
    ) {
        let market = MarketParameters::new(s, r, v);
        let call = greeks(&market, &ContractParameters::new(k, t, OptionType::Call)).unwrap();
        let put = greeks(&market, &ContractParameters::new(k, t, OptionType::Put)).unwrap();
        prop_assert!(call.gamma >= 0.0);
        prop_assert_eq!(call.gamma, put.gamma);

        let terms = risk_neutral_terms(s, k, r, t, v).unwrap();
        prop_assert_eq!(gamma(s, t, v, terms.d1).unwrap(), call.gamma);
    }

    /// Theta_call - Theta_put = -r K e^(-rT)
    #[test]
    fn prop_theta_parity(s in spot(), k in strike(), t in maturity(), r in rate(), v in volatility()) {
        let terms = risk_neutral_terms(s, k, r, t, v).unwrap();
        let call = theta(OptionType::Call, terms.d1, terms.d2, s, k, r, t, v).unwrap();
        let put = theta(OptionType::Put, terms.d1, terms.d2, s, k, r, t, v).unwrap();
        let carry = -r * k * (-r * t).exp();
        prop_assert!((call - put - carry).abs() < 1e-8 * (s + k), "{call} - {put} != {carry}");
    }

    #[test]
    fn prop_delta_matches_finite_difference(
        s in 20.0..200.0f64, k in 20.0..200.0f64, t in 0.1..3.0f64, r in rate(), v in 0.1..0.8f64, ty in option_type()
    ) {
        let h = 1e-4 * s;
        let up = price(s + h, k, t, r, v, ty).unwrap();
        let down = price(s - h, k, t, r, v, ty).unwrap();
        let fd = (up - down) / (2.0 * h);

        let terms = risk_neutral_terms(s, k, r, t, v).unwrap();
        let analytic = delta(ty, terms.d1).unwrap();
        prop_assert!((fd - analytic).abs() < 1e-5, "fd {fd} vs analytic {analytic}");
    }

    #[test]
    fn prop_gamma_matches_finite_difference(
        s in 20.0..200.0f64, k in 20.0..200.0f64, t in 0.1..3.0f64, r in rate(), v in 0.1..0.8f64
    ) {
        let h = 1e-3 * s;
        let d = |x: f64| {
            let terms = risk_neutral_terms(x, k, r, t, v).unwrap();
            delta(OptionType::Call, terms.d1).unwrap()
        };
        let fd = (d(s + h) - d(s - h)) / (2.0 * h);

        let terms = risk_neutral_terms(s, k, r, t, v).unwrap();
        let analytic = gamma(s, t, v, terms.d1).unwrap();
        prop_assert!((fd - analytic).abs() < 1e-3 * analytic + 1e-7, "fd {fd} vs analytic {analytic}");
    }

    /// (P(S+h) - 2P(S) + P(S-h)) / h^2 approximates gamma
    #[test]
    fn prop_gamma_matches_price_second_difference(
        s in 20.0..200.0f64, k in 20.0..200.0f64, t in 0.25..3.0f64, r in rate(), v in 0.15..0.8f64, ty in option_type()
    ) {
        let h = 1e-3 * s;
        let up = price(s + h, k, t, r, v, ty).unwrap();
        let mid = price(s, k, t, r, v, ty).unwrap();
        let down = price(s - h, k, t, r, v, ty).unwrap();
        let fd = (up - 2.0 * mid + down) / (h * h);

        let terms = risk_neutral_terms(s, k, r, t, v).unwrap();
        let analytic = gamma(s, t, v, terms.d1).unwrap();
        prop_assert!((fd - analytic).abs() < 1e-2 * analytic + 1e-6, "fd {fd} vs analytic {analytic}");
    }

    #[test]
    fn prop_expiry_price_is_intrinsic(s in spot(), k in strike(), r in rate(), v in volatility(), ty in option_type()) {
        let p = price(s, k, 0.0, r, v, ty).unwrap();
        prop_assert_eq!(p, ty.intrinsic(s, k));
    }

    #[test]
    fn prop_batch_agrees_with_scalar(
        spots in proptest::collection::vec(spot(), 1..20), k in strike(), t in maturity(), r in rate(), v in volatility()
    ) {
        let batch = price_batch(&spots, k, t, r, v, OptionType::Put).unwrap();
        prop_assert_eq!(batch.len(), spots.len());
        for (s, p) in spots.iter().zip(&batch) {
            prop_assert_eq!(*p, price(*s, k, t, r, v, OptionType::Put).unwrap());
        }
    }
}

#[test]
fn test_negative_spot_rejected() {
    let err = price(-5.0, 100.0, 1.0, 0.01, 0.25, OptionType::Call).unwrap_err();
    assert!(
        matches!(err, PricingError::InvalidParameter { name: "spot", .. }),
        "unexpected error: {err:?}"
    );
}

#[test]
fn test_unknown_option_type_rejected() {
    let err = "foo".parse::<OptionType>().unwrap_err();
    assert_eq!(err, PricingError::UnsupportedOptionType("foo".into()));
}

#[test]
fn test_batch_fails_as_a_whole() {
    let spots = [100.0, -1.0, 120.0];
    let err = price_batch(&spots, 100.0, 1.0, 0.01, 0.25, OptionType::Call).unwrap_err();
    assert!(matches!(err, PricingError::InvalidParameter { name: "spot", .. }));

    let strikes = [90.0, 100.0];
    let err = price_batch(&spots, &strikes, 1.0, 0.01, 0.25, OptionType::Call).unwrap_err();
    assert!(matches!(err, PricingError::ShapeMismatch { .. }));
}
