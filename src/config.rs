use crate::errors::{EngineError, EngineResult};
use crate::models::sweep::{SweepRange, DEFAULT_HIGH_FRAC, DEFAULT_LOW_FRAC, DEFAULT_STEPS};
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server_port: u16,
    pub quote_api_base_url: String,
    pub currency_symbol: String,
    /// Range used when a sweep request leaves the bounds out
    pub default_sweep: SweepRange,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_port: 3001,
            quote_api_base_url: "https://query1.finance.yahoo.com".to_string(),
            currency_symbol: "$".to_string(),
            default_sweep: SweepRange::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> EngineResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Unset keys fall back to defaults;
    /// set but unparseable keys are errors.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> EngineResult<Self> {
        let defaults = Self::default();

        let server_port = parse_or(&lookup, "SERVER_PORT", defaults.server_port)?;
        let low_frac = parse_or(&lookup, "SWEEP_LOW_FRAC", DEFAULT_LOW_FRAC)?;
        let high_frac = parse_or(&lookup, "SWEEP_HIGH_FRAC", DEFAULT_HIGH_FRAC)?;
        let steps = parse_or(&lookup, "SWEEP_STEPS", DEFAULT_STEPS)?;

        let default_sweep = SweepRange {
            low_frac,
            high_frac,
            steps,
        };
        // Every sweep request without explicit bounds uses this range
        default_sweep
            .spots(1.0)
            .map_err(|e| EngineError::Config(format!("SWEEP_*: {e}")))?;

        Ok(Self {
            server_port,
            quote_api_base_url: lookup("QUOTE_API_BASE_URL")
                .unwrap_or(defaults.quote_api_base_url),
            currency_symbol: lookup("CURRENCY_SYMBOL").unwrap_or(defaults.currency_symbol),
            default_sweep,
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> EngineResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| EngineError::Config(format!("{key}: {e}"))),
        None => Ok(default),
    }
}
