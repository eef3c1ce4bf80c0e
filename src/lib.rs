//! Black-Scholes pricing and Greeks for European options, with a
//! spot-price sensitivity sweep for charting.
//!
//! The core is [`models::black_scholes`] and [`models::sweep`]; everything
//! else (HTTP API, prompt, quote feed, text reports) only feeds parameters
//! in or renders results out.

pub mod cli;
pub mod config;
pub mod errors;
pub mod feeds;
pub mod models;
pub mod report;
pub mod server;
pub mod state;

pub use errors::{DomainError, EngineError, EngineResult};
pub use models::black_scholes::{evaluate, BlackScholes};
pub use models::sweep::{sweep, sweep_black_scholes, SweepRange};
pub use models::GreeksModel;
pub use state::{GreeksResult, OptionKind, OptionParameters, SweepResult, SweepSeries};
