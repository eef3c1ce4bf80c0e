//! Text renderings of core results. All functions are pure.

use crate::state::{GreeksResult, SweepSeries};
use std::fmt::Write;

/// Result fields in display order, with their labels.
pub fn labelled(g: &GreeksResult) -> [(&'static str, f64); 7] {
    [
        ("Call Price", g.call_price),
        ("Put Price", g.put_price),
        ("Delta", g.delta),
        ("Gamma", g.gamma),
        ("Vega", g.vega),
        ("Theta", g.theta),
        ("Rho", g.rho),
    ]
}

/// One `Label: value` line per field, 4 decimals.
pub fn render_plain(g: &GreeksResult) -> String {
    let mut out = String::new();
    for (label, value) in labelled(g) {
        let _ = writeln!(out, "{label}: {value:.4}");
    }
    out
}

/// Greeks first, then both prices with a currency prefix.
pub fn render_summary(g: &GreeksResult, spot: f64, live: bool, currency: &str) -> String {
    let mut out = String::new();
    let source = if live { "Live" } else { "Manual" };
    let _ = writeln!(out, "(Using {source} Price: {currency}{spot:.2})");
    for (label, value) in labelled(g).into_iter().skip(2) {
        let _ = writeln!(out, "{label}: {value:.4}");
    }
    let _ = writeln!(out, "Call Option Price: {currency}{:.4}", g.call_price);
    let _ = writeln!(out, "Put Option Price: {currency}{:.4}", g.put_price);
    out
}

pub const SWEEP_CSV_HEADER: &str = "spot,call_price,put_price,delta,gamma,vega,theta,rho";

pub fn sweep_csv(s: &SweepSeries) -> String {
    let mut out = String::with_capacity(64 * (s.spot.len() + 1));
    out.push_str(SWEEP_CSV_HEADER);
    out.push('\n');
    for i in 0..s.spot.len() {
        let _ = writeln!(
            out,
            "{:.4},{:.6},{:.6},{:.6},{:.6},{:.6},{:.6},{:.6}",
            s.spot[i],
            s.call_price[i],
            s.put_price[i],
            s.delta[i],
            s.gamma[i],
            s.vega[i],
            s.theta[i],
            s.rho[i],
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::black_scholes::evaluate;
    use crate::models::sweep::sweep_black_scholes;
    use crate::state::OptionKind;

    fn reference() -> GreeksResult {
        evaluate(100.0, 100.0, 1.0, 0.05, 0.2, OptionKind::Call).unwrap()
    }

    #[test]
    fn test_plain_lines() {
        let text = render_plain(&reference());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[0], "Call Price: 10.4506");
        assert_eq!(lines[1], "Put Price: 5.5735");
        assert!(lines[2].starts_with("Delta: 0.63"), "{}", lines[2]);
        assert!(lines[5].starts_with("Theta: -0.01"), "{}", lines[5]);
    }

    #[test]
    fn test_summary_prefixes_prices() {
        let text = render_summary(&reference(), 100.0, false, "$");
        assert!(text.starts_with("(Using Manual Price: $100.00)"));
        assert!(text.contains("Call Option Price: $10.4506"));
        assert!(text.contains("Put Option Price: $5.5735"));
        assert!(!text.contains("Call Price:"), "prices should only appear with currency");
    }

    #[test]
    fn test_sweep_csv_rows() {
        let res =
            sweep_black_scholes(100.0, 100.0, 1.0, 0.05, 0.2, OptionKind::Call, 0.8, 1.2, 5).unwrap();
        let csv = sweep_csv(&res.to_series());
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], SWEEP_CSV_HEADER);
        assert!(lines[1].starts_with("80.0000,"), "{}", lines[1]);
        assert!(lines[5].starts_with("120.0000,"), "{}", lines[5]);
    }
}
