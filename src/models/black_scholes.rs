use crate::errors::DomainError;
use crate::models::GreeksModel;
use crate::state::{GreeksResult, OptionKind, OptionParameters};
use statrs::distribution::{Continuous, ContinuousCDF, Normal};

/// Black-Scholes closed form for European calls and puts.
///
/// d1 = (ln(S/K) + (r + sigma^2/2)*T) / (sigma * sqrt(T))
/// d2 = d1 - sigma * sqrt(T)
///
/// Both prices are always produced; the Greeks follow the requested kind.
/// Vega and Rho are scaled per 1 percentage point, Theta per calendar day.
pub struct BlackScholes {
    /// Standard normal distribution (created once, reused)
    normal: Normal,
}

impl BlackScholes {
    pub fn new() -> Self {
        Self {
            normal: Normal::standard(),
        }
    }
}

impl Default for BlackScholes {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-evaluation intermediates shared by the price and Greek formulas.
#[derive(Debug, Clone, Copy)]
struct Terms {
    sqrt_t: f64,
    d1: f64,
    d2: f64,
    /// K * e^(-rT)
    discounted_strike: f64,
}

impl Terms {
    #[inline]
    fn new(p: &OptionParameters) -> Self {
        let sqrt_t = p.expiry.sqrt();
        let sigma_sqrt_t = p.sigma * sqrt_t;
        let d1 = ((p.spot / p.strike).ln() + (p.rate + 0.5 * p.sigma * p.sigma) * p.expiry)
            / sigma_sqrt_t;
        Self {
            sqrt_t,
            d1,
            d2: d1 - sigma_sqrt_t,
            discounted_strike: p.strike * (-p.rate * p.expiry).exp(),
        }
    }
}

impl GreeksModel for BlackScholes {
    #[inline]
    fn name(&self) -> &'static str {
        "Black-Scholes"
    }

    fn evaluate(&self, p: &OptionParameters) -> Result<GreeksResult, DomainError> {
        p.validate()?;

        let Terms {
            sqrt_t,
            d1,
            d2,
            discounted_strike,
        } = Terms::new(p);

        let n = &self.normal;
        let cdf_d1 = n.cdf(d1);
        let cdf_d2 = n.cdf(d2);
        let cdf_neg_d1 = n.cdf(-d1);
        let cdf_neg_d2 = n.cdf(-d2);
        let pdf_d1 = n.pdf(d1);

        let call_price = p.spot * cdf_d1 - discounted_strike * cdf_d2;
        let put_price = discounted_strike * cdf_neg_d2 - p.spot * cdf_neg_d1;

        let gamma = pdf_d1 / (p.spot * p.sigma * sqrt_t);
        let vega = p.spot * pdf_d1 * sqrt_t;
        let decay = -p.spot * pdf_d1 * p.sigma / (2.0 * sqrt_t);

        let (delta, theta, rho) = match p.kind {
            OptionKind::Call => (
                cdf_d1,
                decay - p.rate * discounted_strike * cdf_d2,
                p.expiry * discounted_strike * cdf_d2,
            ),
            // -Phi(-d1) rather than Phi(d1) - 1: stays below zero until Phi(-d1) underflows
            OptionKind::Put => (
                -cdf_neg_d1,
                decay + p.rate * discounted_strike * cdf_neg_d2,
                -p.expiry * discounted_strike * cdf_neg_d2,
            ),
        };

        let result = GreeksResult {
            call_price,
            put_price,
            delta,
            gamma,
            vega: vega / 100.0,
            theta: theta / 365.0,
            rho: rho / 100.0,
        };

        // Extreme but valid inputs can still overflow (e.g. huge r*T)
        if !result.is_finite() {
            return Err(DomainError::new("result is not finite"));
        }

        Ok(result)
    }
}

/// Evaluate a single contract with the Black-Scholes engine.
pub fn evaluate(
    spot: f64,
    strike: f64,
    expiry: f64,
    rate: f64,
    sigma: f64,
    kind: OptionKind,
) -> Result<GreeksResult, DomainError> {
    BlackScholes::new().evaluate(&OptionParameters::new(spot, strike, expiry, rate, sigma, kind))
}

#[cfg(test)]
mod tests {
    use super::*;

    const GRID_SPOTS: [f64; 5] = [50.0, 90.0, 100.0, 110.0, 200.0];
    const GRID_EXPIRIES: [f64; 3] = [0.01, 0.5, 3.0];
    const GRID_RATES: [f64; 3] = [-0.01, 0.0, 0.08];
    const GRID_SIGMAS: [f64; 3] = [0.05, 0.2, 0.9];

    fn for_each_grid_point(mut f: impl FnMut(f64, f64, f64, f64)) {
        for &s in &GRID_SPOTS {
            for &t in &GRID_EXPIRIES {
                for &r in &GRID_RATES {
                    for &v in &GRID_SIGMAS {
                        f(s, t, r, v);
                    }
                }
            }
        }
    }

    fn assert_close(actual: f64, expected: f64, tol: f64, what: &str) {
        assert!(
            (actual - expected).abs() < tol,
            "{what}: got {actual}, expected {expected} (tol {tol})"
        );
    }

    #[test]
    fn test_reference_call() {
        let g = evaluate(100.0, 100.0, 1.0, 0.05, 0.2, OptionKind::Call).unwrap();
        assert_close(g.call_price, 10.4506, 1e-3, "call price");
        assert_close(g.put_price, 5.5735, 1e-3, "put price");
        assert_close(g.delta, 0.6368, 1e-3, "delta");
        assert_close(g.gamma, 0.0188, 1e-3, "gamma");
        assert_close(g.vega, 0.3752, 1e-3, "vega");
        assert_close(g.theta, -0.0176, 1e-3, "theta");
        assert_close(g.rho, 0.5323, 1e-3, "rho");
    }

    #[test]
    fn test_put_kind_reports_same_prices() {
        let call = evaluate(100.0, 100.0, 1.0, 0.05, 0.2, OptionKind::Call).unwrap();
        let put = evaluate(100.0, 100.0, 1.0, 0.05, 0.2, OptionKind::Put).unwrap();
        assert_eq!(call.call_price, put.call_price);
        assert_eq!(call.put_price, put.put_price);
        assert_close(put.delta, call.delta - 1.0, 1e-12, "put delta");
        assert!(put.rho < 0.0, "put rho={} should be negative", put.rho);
    }

    #[test]
    fn test_put_call_parity() {
        for_each_grid_point(|s, t, r, v| {
            let g = evaluate(s, 100.0, t, r, v, OptionKind::Call).unwrap();
            let forward_gap = s - 100.0 * (-r * t).exp();
            assert_close(
                g.call_price - g.put_price,
                forward_gap,
                1e-6,
                &format!("parity at S={s} T={t} r={r} sigma={v}"),
            );
        });
    }

    #[test]
    fn test_delta_bounds() {
        // Moderate inputs: strictly inside the open intervals
        for &s in &[80.0, 100.0, 125.0] {
            for &v in &[0.1, 0.3] {
                let call = evaluate(s, 100.0, 1.0, 0.03, v, OptionKind::Call).unwrap();
                let put = evaluate(s, 100.0, 1.0, 0.03, v, OptionKind::Put).unwrap();
                assert!(call.delta > 0.0 && call.delta < 1.0, "call delta={}", call.delta);
                assert!(put.delta > -1.0 && put.delta < 0.0, "put delta={}", put.delta);
            }
        }

        // Whole grid, including deep ITM/OTM where f64 saturates at the bounds
        for_each_grid_point(|s, t, r, v| {
            let call = evaluate(s, 100.0, t, r, v, OptionKind::Call).unwrap();
            let put = evaluate(s, 100.0, t, r, v, OptionKind::Put).unwrap();
            assert!((0.0..=1.0).contains(&call.delta), "call delta={} at S={s} T={t}", call.delta);
            assert!((-1.0..=0.0).contains(&put.delta), "put delta={} at S={s} T={t}", put.delta);
            assert!(
                (call.delta - put.delta - 1.0).abs() < 1e-12,
                "delta parity at S={s} T={t} r={r} sigma={v}"
            );
        });
    }

    #[test]
    fn test_deep_itm_put_delta_stays_negative() {
        // d1 ~ 10: Phi(d1) rounds to 1.0, so Phi(d1) - 1 would be exactly zero
        let put = evaluate(270.0, 100.0, 1.0, 0.0, 0.1, OptionKind::Put).unwrap();
        assert!(put.delta < 0.0, "put delta={} should stay below zero", put.delta);
        assert!(put.delta > -1e-20, "put delta={} should be tiny", put.delta);
    }

    #[test]
    fn test_reference_put() {
        let g = evaluate(100.0, 100.0, 1.0, 0.05, 0.2, OptionKind::Put).unwrap();
        assert_close(g.delta, -0.36317, 1e-4, "put delta");
        assert_close(g.gamma, 0.018762, 1e-5, "put gamma");
        assert_close(g.vega, 0.37524, 1e-4, "put vega");
        assert_close(g.theta, -0.0045421, 1e-6, "put theta");
        assert_close(g.rho, -0.41890, 1e-4, "put rho");
    }

    #[test]
    fn test_gamma_vega_non_negative_and_kind_invariant() {
        for_each_grid_point(|s, t, r, v| {
            let call = evaluate(s, 100.0, t, r, v, OptionKind::Call).unwrap();
            let put = evaluate(s, 100.0, t, r, v, OptionKind::Put).unwrap();
            assert!(call.gamma >= 0.0, "gamma={} at S={s}", call.gamma);
            assert!(call.vega >= 0.0, "vega={} at S={s}", call.vega);
            assert_eq!(call.gamma, put.gamma);
            assert_eq!(call.vega, put.vega);
        });
    }

    #[test]
    fn test_rejects_invalid_inputs() {
        let cases = [
            (0.0, 100.0, 1.0, 0.2, "price/strike must be positive"),
            (100.0, 0.0, 1.0, 0.2, "price/strike must be positive"),
            (100.0, 100.0, 0.0, 0.2, "time to expiry must be positive"),
            (100.0, 100.0, 1.0, 0.0, "volatility must be positive"),
        ];
        for (s, k, t, v, reason) in cases {
            let err = evaluate(s, k, t, 0.05, v, OptionKind::Call).unwrap_err();
            assert_eq!(err.reason, reason);
        }
        let err = "straddle".parse::<OptionKind>().unwrap_err();
        assert_eq!(err.reason, "unknown option kind");
    }

    #[test]
    fn test_overflow_is_rejected_not_returned() {
        let res = evaluate(100.0, 100.0, 1.0, -1000.0, 0.2, OptionKind::Put);
        assert_eq!(res.unwrap_err().reason, "result is not finite");
    }

    #[test]
    fn test_model_name() {
        assert_eq!(BlackScholes::new().name(), "Black-Scholes");
    }
}
