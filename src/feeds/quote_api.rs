use crate::errors::{EngineError, EngineResult};
use reqwest::Client;

/// Last observed price for a ticker.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct LiveQuote {
    pub ticker: String,
    pub price: f64,
    pub fetched_at: chrono::DateTime<chrono::Utc>,
}

/// Chart-API client used to seed the spot price. Never cached: every
/// call hits the endpoint, and callers pass the result on explicitly.
#[derive(Clone)]
pub struct QuoteClient {
    client: Client,
    base_url: String,
}

impl QuoteClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(5))
                .user_agent("Mozilla/5.0 (greeks_desk)")
                .build()
                .unwrap_or_default(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn latest_close(&self, ticker: &str) -> EngineResult<LiveQuote> {
        let ticker = normalize_ticker(ticker)?;
        let url = format!(
            "{}/v8/finance/chart/{ticker}?range=1d&interval=1d",
            self.base_url
        );

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| EngineError::PriceFeed(format!("request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(EngineError::PriceFeed(format!("HTTP {status}: {body}")));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| EngineError::PriceFeed(format!("read body: {e}")))?;
        let price = parse_chart_close(&body)?;

        tracing::info!(ticker = %ticker, price, "live quote fetched");

        Ok(LiveQuote {
            ticker,
            price,
            fetched_at: chrono::Utc::now(),
        })
    }
}

fn normalize_ticker(ticker: &str) -> EngineResult<String> {
    let t = ticker.trim().to_ascii_uppercase();
    if t.is_empty() || !t.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '=')) {
        return Err(EngineError::PriceFeed(format!("invalid ticker: {ticker:?}")));
    }
    Ok(t)
}

// Response shape (fields we read):
// {
//   "chart": {
//     "result": [{
//       "meta": { "symbol": "AAPL", "regularMarketPrice": 189.84 },
//       "indicators": { "quote": [{ "close": [188.1, null, 189.84] }] }
//     }],
//     "error": null
//   }
// }

#[derive(serde::Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(serde::Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(serde::Deserialize)]
struct ChartError {
    code: Option<String>,
    description: Option<String>,
}

#[derive(serde::Deserialize)]
struct ChartResult {
    meta: Option<ChartMeta>,
    indicators: Option<Indicators>,
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    regular_market_price: Option<f64>,
}

#[derive(serde::Deserialize)]
struct Indicators {
    quote: Option<Vec<QuoteBars>>,
}

#[derive(serde::Deserialize)]
struct QuoteBars {
    close: Option<Vec<Option<f64>>>,
}

/// Last non-null close of the day, else the meta market price.
pub fn parse_chart_close(body: &str) -> EngineResult<f64> {
    let data: ChartResponse = serde_json::from_str(body)
        .map_err(|e| EngineError::PriceFeed(format!("parse: {e}")))?;

    if let Some(err) = data.chart.error {
        return Err(EngineError::PriceFeed(format!(
            "{}: {}",
            err.code.unwrap_or_default(),
            err.description.unwrap_or_default()
        )));
    }

    let result = data
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| EngineError::PriceFeed("empty chart result".into()))?;

    let last_close = result
        .indicators
        .and_then(|i| i.quote)
        .and_then(|q| q.into_iter().next())
        .and_then(|bars| bars.close)
        .and_then(|closes| closes.into_iter().rev().flatten().next());

    let price = last_close
        .or_else(|| result.meta.and_then(|m| m.regular_market_price))
        .ok_or_else(|| EngineError::PriceFeed("no close price in response".into()))?;

    if price <= 0.0 || !price.is_finite() {
        return Err(EngineError::PriceFeed(format!("invalid price: {price}")));
    }

    Ok(price)
}
