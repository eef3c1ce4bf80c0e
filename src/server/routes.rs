use crate::errors::{EngineError, EngineResult};
use crate::feeds::quote_api::LiveQuote;
use crate::models::black_scholes::BlackScholes;
use crate::models::sweep::{self, SweepRange};
use crate::models::GreeksModel;
use crate::state::{AppState, GreeksResult, OptionKind, OptionParameters, SweepSeries};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use portable_atomic::AtomicU64;
use std::sync::Arc;

#[derive(Debug, Clone, serde::Deserialize)]
pub struct GreeksQuery {
    pub spot: f64,
    pub strike: f64,
    pub expiry: f64,
    pub rate: f64,
    pub sigma: f64,
    pub kind: String,
}

impl GreeksQuery {
    fn params(&self) -> EngineResult<OptionParameters> {
        OptionParameters::from_input(
            self.spot,
            self.strike,
            self.expiry,
            self.rate,
            self.sigma,
            &self.kind,
        )
        .map_err(EngineError::from)
    }
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct SweepQuery {
    pub spot: f64,
    pub strike: f64,
    pub expiry: f64,
    pub rate: f64,
    pub sigma: f64,
    pub kind: String,
    pub low_frac: Option<f64>,
    pub high_frac: Option<f64>,
    pub steps: Option<usize>,
}

#[derive(Debug, serde::Serialize)]
pub struct SweepResponse {
    pub kind: OptionKind,
    pub range: SweepRange,
    pub series: SweepSeries,
}

impl IntoResponse for EngineError {
    fn into_response(self) -> Response {
        let (status, msg) = match &self {
            EngineError::Domain(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            EngineError::PriceFeed(_) | EngineError::Network(_) => {
                (StatusCode::BAD_GATEWAY, self.to_string())
            }
            _ => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };
        (status, Json(serde_json::json!({ "error": msg }))).into_response()
    }
}

/// Count the outcome against the right counter, log rejections.
fn record<T>(state: &AppState, served: &AtomicU64, res: EngineResult<T>) -> EngineResult<T> {
    match &res {
        Ok(_) => AppState::bump(served),
        Err(EngineError::Domain(e)) => {
            AppState::bump(&state.counters.domain_errors);
            tracing::info!(reason = %e, "request rejected");
        }
        Err(e) => {
            AppState::bump(&state.counters.upstream_errors);
            tracing::warn!(error = %e, "request failed");
        }
    }
    res
}

/// GET /api/greeks -- single evaluation
pub async fn get_greeks(
    State(state): State<Arc<AppState>>,
    Query(q): Query<GreeksQuery>,
) -> EngineResult<Json<GreeksResult>> {
    let res = q
        .params()
        .and_then(|p| BlackScholes::new().evaluate(&p).map_err(EngineError::from));
    record(&state, &state.counters.greeks_served, res).map(Json)
}

/// GET /api/sweep -- chart series around the given spot
pub async fn get_sweep(
    State(state): State<Arc<AppState>>,
    Query(q): Query<SweepQuery>,
) -> EngineResult<Json<SweepResponse>> {
    let defaults = state.config.default_sweep;
    let range = SweepRange {
        low_frac: q.low_frac.unwrap_or(defaults.low_frac),
        high_frac: q.high_frac.unwrap_or(defaults.high_frac),
        steps: q.steps.unwrap_or(defaults.steps),
    };

    let res = OptionParameters::from_input(q.spot, q.strike, q.expiry, q.rate, q.sigma, &q.kind)
        .map_err(EngineError::from)
        .and_then(|base| {
            let result = sweep::sweep(&BlackScholes::new(), &base, range)?;
            Ok(SweepResponse {
                kind: result.kind,
                range,
                series: result.to_series(),
            })
        });
    record(&state, &state.counters.sweeps_served, res).map(Json)
}

/// GET /api/quote/{ticker} -- live spot for seeding the parameters
pub async fn get_quote(
    State(state): State<Arc<AppState>>,
    Path(ticker): Path<String>,
) -> EngineResult<Json<LiveQuote>> {
    let res = state.quotes.latest_close(&ticker).await;
    record(&state, &state.counters.quotes_fetched, res).map(Json)
}

/// GET /api/counters -- request counters (lock-free reads)
pub async fn get_counters(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    use portable_atomic::Ordering::Relaxed;
    Json(serde_json::json!({
        "greeks_served": state.counters.greeks_served.load(Relaxed),
        "sweeps_served": state.counters.sweeps_served.load(Relaxed),
        "quotes_fetched": state.counters.quotes_fetched.load(Relaxed),
        "domain_errors": state.counters.domain_errors.load(Relaxed),
        "upstream_errors": state.counters.upstream_errors.load(Relaxed),
    }))
}
