use crate::batch::{broadcast_len, Arg};
use crate::errors::{ensure_finite, ensure_non_negative, PricingResult};

/// Continuously compounded growth of a risk-free deposit: V(t) = V0 * e^(r*t).
pub fn risk_free_value(initial_value: f64, risk_free_rate: f64, t: f64) -> PricingResult<f64> {
    ensure_finite("initial_value", initial_value)?;
    ensure_finite("risk_free_rate", risk_free_rate)?;
    ensure_non_negative("t", t)?;
    Ok(initial_value * (risk_free_rate * t).exp())
}

/// Elementwise `risk_free_value`.
pub fn risk_free_values<'a>(
    initial_value: impl Into<Arg<'a>>,
    risk_free_rate: impl Into<Arg<'a>>,
    t: impl Into<Arg<'a>>,
) -> PricingResult<Vec<f64>> {
    let (v0, r, t) = (initial_value.into(), risk_free_rate.into(), t.into());
    let n = broadcast_len(&[("initial_value", v0), ("risk_free_rate", r), ("t", t)])?;
    v0.check_scalar("initial_value", ensure_finite)?;
    r.check_scalar("risk_free_rate", ensure_finite)?;
    t.check_scalar("t", ensure_non_negative)?;
    (0..n)
        .map(|i| risk_free_value(v0.at(i), r.at(i), t.at(i)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::linspace;

    #[test]
    fn test_growth() {
        assert_eq!(risk_free_value(100.0, 0.04, 0.0).unwrap(), 100.0);
        let v = risk_free_value(100.0, 0.04, 10.0).unwrap();
        assert!((v - 149.18246976412703).abs() < 1e-9, "v={v}");
    }

    #[test]
    fn test_negative_rate_decays() {
        let v = risk_free_value(100.0, -0.01, 5.0).unwrap();
        assert!(v < 100.0);
    }

    #[test]
    fn test_batch_is_monotone() {
        let times = linspace(0.0, 100.0, 1000);
        let values = risk_free_values(100.0, 0.04, &times).unwrap();
        assert_eq!(values.len(), 1000);
        assert!(values.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn test_rejects_negative_time() {
        assert!(risk_free_value(100.0, 0.04, -1.0).is_err());
    }

    #[test]
    fn test_invalid_scalar_rejected_with_no_times() {
        let times: [f64; 0] = [];
        assert!(risk_free_values(100.0, f64::NAN, &times).is_err());
        assert_eq!(risk_free_values(100.0, 0.04, &times).unwrap(), Vec::<f64>::new());
    }
}
