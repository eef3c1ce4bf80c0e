use crate::errors::DomainError;
use crate::models::black_scholes::BlackScholes;
use crate::models::GreeksModel;
use crate::state::{OptionKind, OptionParameters, SweepPoint, SweepResult};

pub const DEFAULT_LOW_FRAC: f64 = 0.8;
pub const DEFAULT_HIGH_FRAC: f64 = 1.2;
pub const DEFAULT_STEPS: usize = 50;
/// Upper bound on caller-supplied `steps`.
pub const MAX_STEPS: usize = 10_000;

/// Underlying-price interval for a sweep, as fractions of the base spot.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct SweepRange {
    pub low_frac: f64,
    pub high_frac: f64,
    pub steps: usize,
}

impl Default for SweepRange {
    fn default() -> Self {
        Self {
            low_frac: DEFAULT_LOW_FRAC,
            high_frac: DEFAULT_HIGH_FRAC,
            steps: DEFAULT_STEPS,
        }
    }
}

impl SweepRange {
    /// Evenly spaced spots over [low_frac*base, high_frac*base], both ends included.
    /// The lower bound is itself a price and must stay positive.
    pub fn spots(&self, base_spot: f64) -> Result<Vec<f64>, DomainError> {
        if self.steps < 2 {
            return Err(DomainError::new("sweep needs at least two steps"));
        }
        if self.steps > MAX_STEPS {
            return Err(DomainError::new("sweep has too many steps"));
        }
        if !(self.low_frac < self.high_frac) {
            return Err(DomainError::new("sweep range must be increasing"));
        }

        let lo = self.low_frac * base_spot;
        let hi = self.high_frac * base_spot;
        if !lo.is_finite() || lo <= 0.0 {
            return Err(DomainError::new("sweep lower bound must be positive"));
        }
        if !hi.is_finite() {
            return Err(DomainError::new("sweep upper bound must be finite"));
        }

        let last = self.steps - 1;
        let step = (hi - lo) / last as f64;
        Ok((0..self.steps)
            .map(|i| if i == last { hi } else { lo + step * i as f64 })
            .collect())
    }
}

/// Evaluate `model` at every spot of `range` around `base.spot`, ascending.
/// Any failing point fails the whole sweep; points are never skipped or clamped.
pub fn sweep(
    model: &dyn GreeksModel,
    base: &OptionParameters,
    range: SweepRange,
) -> Result<SweepResult, DomainError> {
    base.validate()?;
    let spots = range.spots(base.spot)?;

    let points = spots
        .into_iter()
        .map(|spot| {
            model
                .evaluate(&base.with_spot(spot))
                .map(|greeks| SweepPoint { spot, greeks })
        })
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!(
        model = model.name(),
        kind = %base.kind,
        low = points.first().map(|p| p.spot),
        high = points.last().map(|p| p.spot),
        points = points.len(),
        "sweep evaluated"
    );

    Ok(SweepResult {
        kind: base.kind,
        points,
    })
}

/// Black-Scholes sweep from loose arguments.
#[allow(clippy::too_many_arguments)]
pub fn sweep_black_scholes(
    base_spot: f64,
    strike: f64,
    expiry: f64,
    rate: f64,
    sigma: f64,
    kind: OptionKind,
    low_frac: f64,
    high_frac: f64,
    steps: usize,
) -> Result<SweepResult, DomainError> {
    let base = OptionParameters::new(base_spot, strike, expiry, rate, sigma, kind);
    let range = SweepRange {
        low_frac,
        high_frac,
        steps,
    };
    sweep(&BlackScholes::new(), &base, range)
}
