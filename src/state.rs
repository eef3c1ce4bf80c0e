use crate::config::AppConfig;
use crate::errors::DomainError;
use crate::feeds::quote_api::QuoteClient;
use portable_atomic::{AtomicU64, Ordering};
use std::str::FromStr;
use std::sync::Arc;

// ── Option kind ──

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    Call,
    Put,
}

impl FromStr for OptionKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "call" => Ok(Self::Call),
            "put" => Ok(Self::Put),
            _ => Err(DomainError::new("unknown option kind")),
        }
    }
}

impl std::fmt::Display for OptionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Call => write!(f, "call"),
            Self::Put => write!(f, "put"),
        }
    }
}

// ── Inputs ──

/// One European option contract under Black-Scholes.
/// Validation happens at evaluation time, not construction.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct OptionParameters {
    pub spot: f64,
    pub strike: f64,
    /// Time to expiry in years
    pub expiry: f64,
    /// Continuously compounded risk-free rate (decimal)
    pub rate: f64,
    /// Annualized volatility (decimal)
    pub sigma: f64,
    pub kind: OptionKind,
}

impl OptionParameters {
    pub fn new(spot: f64, strike: f64, expiry: f64, rate: f64, sigma: f64, kind: OptionKind) -> Self {
        Self {
            spot,
            strike,
            expiry,
            rate,
            sigma,
            kind,
        }
    }

    /// Build from user input where the kind is still text. The numeric
    /// preconditions are checked first, the kind last.
    pub fn from_input(
        spot: f64,
        strike: f64,
        expiry: f64,
        rate: f64,
        sigma: f64,
        kind: &str,
    ) -> Result<Self, DomainError> {
        let mut params = Self::new(spot, strike, expiry, rate, sigma, OptionKind::Call);
        params.validate()?;
        params.kind = kind.parse()?;
        Ok(params)
    }

    /// Same contract, different underlying price.
    #[inline]
    pub fn with_spot(&self, spot: f64) -> Self {
        Self { spot, ..*self }
    }

    /// Check every precondition of the closed form.
    /// Non-finite inputs fail with the same reason as non-positive ones.
    pub fn validate(&self) -> Result<(), DomainError> {
        if !is_positive(self.spot) || !is_positive(self.strike) {
            return Err(DomainError::new("price/strike must be positive"));
        }
        if !is_positive(self.expiry) {
            return Err(DomainError::new("time to expiry must be positive"));
        }
        if !is_positive(self.sigma) {
            return Err(DomainError::new("volatility must be positive"));
        }
        if !self.rate.is_finite() {
            return Err(DomainError::new("risk-free rate must be finite"));
        }
        Ok(())
    }
}

#[inline]
fn is_positive(x: f64) -> bool {
    x.is_finite() && x > 0.0
}

// ── Outputs ──

/// Prices and Greeks for one evaluation.
/// Vega and Rho are per 1 percentage point, Theta per calendar day.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct GreeksResult {
    pub call_price: f64,
    pub put_price: f64,
    pub delta: f64,
    pub gamma: f64,
    pub vega: f64,
    pub theta: f64,
    pub rho: f64,
}

impl GreeksResult {
    pub fn is_finite(&self) -> bool {
        [
            self.call_price,
            self.put_price,
            self.delta,
            self.gamma,
            self.vega,
            self.theta,
            self.rho,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

/// One sweep sample.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct SweepPoint {
    pub spot: f64,
    pub greeks: GreeksResult,
}

/// Ordered (spot, result) pairs, ascending in spot.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct SweepResult {
    pub kind: OptionKind,
    pub points: Vec<SweepPoint>,
}

/// Column-oriented view of a sweep for charting. All vectors share indices.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct SweepSeries {
    pub spot: Vec<f64>,
    pub call_price: Vec<f64>,
    pub put_price: Vec<f64>,
    pub delta: Vec<f64>,
    pub gamma: Vec<f64>,
    pub vega: Vec<f64>,
    pub theta: Vec<f64>,
    pub rho: Vec<f64>,
}

impl SweepResult {
    pub fn spots(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.spot).collect()
    }

    pub fn to_series(&self) -> SweepSeries {
        let n = self.points.len();
        let mut s = SweepSeries {
            spot: Vec::with_capacity(n),
            call_price: Vec::with_capacity(n),
            put_price: Vec::with_capacity(n),
            delta: Vec::with_capacity(n),
            gamma: Vec::with_capacity(n),
            vega: Vec::with_capacity(n),
            theta: Vec::with_capacity(n),
            rho: Vec::with_capacity(n),
        };
        for p in &self.points {
            s.spot.push(p.spot);
            s.call_price.push(p.greeks.call_price);
            s.put_price.push(p.greeks.put_price);
            s.delta.push(p.greeks.delta);
            s.gamma.push(p.greeks.gamma);
            s.vega.push(p.greeks.vega);
            s.theta.push(p.greeks.theta);
            s.rho.push(p.greeks.rho);
        }
        s
    }
}

// ── Request Counters (lock-free) ──

pub struct RequestCounters {
    pub greeks_served: AtomicU64,
    pub sweeps_served: AtomicU64,
    pub quotes_fetched: AtomicU64,
    pub domain_errors: AtomicU64,
    pub upstream_errors: AtomicU64,
}

impl RequestCounters {
    pub fn new() -> Self {
        Self {
            greeks_served: AtomicU64::new(0),
            sweeps_served: AtomicU64::new(0),
            quotes_fetched: AtomicU64::new(0),
            domain_errors: AtomicU64::new(0),
            upstream_errors: AtomicU64::new(0),
        }
    }
}

impl Default for RequestCounters {
    fn default() -> Self {
        Self::new()
    }
}

// ── Application shared state ──

/// Shared by all HTTP handlers. Holds no market state: every request
/// carries its own spot.
pub struct AppState {
    pub config: AppConfig,
    pub quotes: QuoteClient,
    pub counters: RequestCounters,
}

impl AppState {
    pub fn new(config: AppConfig) -> Arc<Self> {
        let quotes = QuoteClient::new(&config.quote_api_base_url);
        Arc::new(Self {
            config,
            quotes,
            counters: RequestCounters::new(),
        })
    }

    #[inline]
    pub fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }
}
