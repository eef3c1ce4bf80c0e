pub mod black_scholes;
pub mod sweep;

use crate::errors::DomainError;
use crate::state::{GreeksResult, OptionParameters};

/// All Greeks engines implement this trait.
/// evaluate() must be a pure function: deterministic output from inputs only,
/// and it must reject invalid inputs instead of returning NaN/Inf.
/// Send + Sync required for use from axum handlers.
pub trait GreeksModel: Send + Sync {
    fn name(&self) -> &'static str;

    fn evaluate(&self, params: &OptionParameters) -> Result<GreeksResult, DomainError>;
}
