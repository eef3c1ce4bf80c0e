/// Precondition violation raised by the pricing core.
/// Carries only the human-readable reason; there is no retryable variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{reason}")]
pub struct DomainError {
    pub reason: String,
}

impl DomainError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

/// Application-level errors. The core only ever produces `Domain`;
/// the rest come from the collaborator surfaces (feed, config, prompt).
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("network error: {0}")]
    Network(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("price feed error: {0}")]
    PriceFeed(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(String),
}

impl From<reqwest::Error> for EngineError {
    fn from(e: reqwest::Error) -> Self {
        EngineError::Network(e.to_string())
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(e: serde_json::Error) -> Self {
        EngineError::Parse(e.to_string())
    }
}

impl From<std::io::Error> for EngineError {
    fn from(e: std::io::Error) -> Self {
        EngineError::Io(e.to_string())
    }
}

pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_error_displays_bare_reason() {
        let e = DomainError::new("volatility must be positive");
        assert_eq!(e.to_string(), "volatility must be positive");
    }

    #[test]
    fn test_domain_error_converts_into_engine_error() {
        let e: EngineError = DomainError::new("unknown option kind").into();
        assert!(matches!(e, EngineError::Domain(_)));
        assert_eq!(e.to_string(), "domain error: unknown option kind");
    }
}
