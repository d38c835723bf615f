//! Yahoo Finance history provider.
//!
//! Fetches daily bars from Yahoo's v8 chart API using a `range=Nd` lookback,
//! parses the response and drops non-trading rows.
//!
//! Yahoo Finance has no official API and is subject to unannounced format changes.
//! Every failure is returned as a `DataError` and handled per instrument by the fetcher.

use super::provider::{DataError, DataSource, HistoryProvider, RawBar};
use serde::Deserialize;
use std::time::Duration;

const CHART_BASE_URL: &str = "https://query2.finance.yahoo.com/v8/finance/chart";

/// Yahoo Finance v8 chart API response.
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    #[serde(default)]
    meta: Option<ChartMeta>,
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    /// Exchange offset from UTC in seconds.
    #[serde(default)]
    gmtoffset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
}

/// Yahoo Finance history provider.
pub struct YahooProvider {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl YahooProvider {
    /// Build a provider with a 30 second request timeout.
    pub fn new() -> Result<Self, DataError> {
        Self::with_base_url(CHART_BASE_URL)
    }

    /// Build a provider against a different chart endpoint (mirrors, proxies).
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .map_err(|e| DataError::Other(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Build the chart API URL for a symbol and trailing window.
    fn chart_url(&self, symbol: &str, days: u32) -> String {
        format!(
            "{}/{symbol}?range={days}d&interval=1d",
            self.base_url.trim_end_matches('/')
        )
    }

    /// Parse the chart API response into RawBars.
    fn parse_response(symbol: &str, days: u32, resp: ChartResponse) -> Result<Vec<RawBar>, DataError> {
        let result = resp.chart.result.ok_or_else(|| {
            if let Some(err) = resp.chart.error {
                if err.code == "Not Found" {
                    DataError::SymbolNotFound {
                        symbol: symbol.to_string(),
                    }
                } else {
                    DataError::ResponseFormat(format!(
                        "{}: {}",
                        err.code,
                        err.description.unwrap_or_default()
                    ))
                }
            } else {
                DataError::ResponseFormat("empty result with no error".into())
            }
        })?;

        let data = result
            .into_iter()
            .next()
            .ok_or_else(|| DataError::ResponseFormat("result array is empty".into()))?;

        // A valid symbol with no trading inside the window comes back without timestamps.
        let timestamps = data.timestamp.unwrap_or_default();

        let quote = data
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| DataError::ResponseFormat("no quote data".into()))?;

        // Bars are dated in exchange-local time.
        let offset = data.meta.and_then(|m| m.gmtoffset).unwrap_or(0);

        let mut bars = Vec::with_capacity(timestamps.len());

        for (i, &ts) in timestamps.iter().enumerate() {
            let date = ts
                .checked_add(offset)
                .and_then(|local| chrono::DateTime::from_timestamp(local, 0))
                .map(|dt| dt.naive_utc().date())
                .ok_or_else(|| DataError::ResponseFormat(format!("invalid timestamp: {ts}")))?;

            // Holidays and halted sessions come back with a null close.
            let Some(close) = quote.close.get(i).copied().flatten() else {
                continue;
            };

            bars.push(RawBar {
                date,
                open: quote.open.get(i).copied().flatten().unwrap_or(f64::NAN),
                high: quote.high.get(i).copied().flatten().unwrap_or(f64::NAN),
                low: quote.low.get(i).copied().flatten().unwrap_or(f64::NAN),
                close,
            });
        }

        if bars.is_empty() {
            return Err(DataError::EmptyHistory {
                symbol: symbol.to_string(),
                days,
            });
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }
}

impl HistoryProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    fn source(&self) -> DataSource {
        DataSource::YahooFinance
    }

    fn get_history(&self, symbol: &str, days: u32) -> Result<Vec<RawBar>, DataError> {
        let url = self.chart_url(symbol, days);
        log::debug!("GET {url}");

        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|e| DataError::NetworkUnreachable(e.to_string()))?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }
        if !status.is_success() {
            return Err(DataError::Http {
                status: status.as_u16(),
                symbol: symbol.to_string(),
            });
        }

        let chart: ChartResponse = resp.json().map_err(|e| {
            DataError::ResponseFormat(format!("failed to parse response for {symbol}: {e}"))
        })?;

        Self::parse_response(symbol, days, chart)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn parse(json: &str) -> Result<Vec<RawBar>, DataError> {
        let resp: ChartResponse = serde_json::from_str(json).unwrap();
        YahooProvider::parse_response("AAPL", 5, resp)
    }

    #[test]
    fn chart_url_uses_day_range() {
        let provider = YahooProvider::with_base_url("http://localhost:9/chart/").unwrap();
        assert_eq!(
            provider.chart_url("GOOGL", 20),
            "http://localhost:9/chart/GOOGL?range=20d&interval=1d"
        );
    }

    #[test]
    fn parses_closes_and_skips_null_rows() {
        // 2024-03-04, 2024-03-05, 2024-03-06 at 14:30 UTC
        let json = r#"{"chart":{"result":[{
            "timestamp":[1709562600,1709649000,1709735400],
            "indicators":{"quote":[{
                "open":[170.0,null,169.0],
                "high":[171.0,null,170.5],
                "low":[169.5,null,168.0],
                "close":[170.5,null,169.8]
            }]}
        }],"error":null}}"#;

        let bars = parse(json).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());
        assert_eq!(bars[0].close, 170.5);
        assert_eq!(bars[1].date, NaiveDate::from_ymd_opt(2024, 3, 6).unwrap());
    }

    #[test]
    fn bar_dates_follow_exchange_offset() {
        // 2024-03-03 15:00 UTC is already 2024-03-04 in Tokyo (+9 h);
        // 2024-03-05 02:00 UTC is still 2024-03-04 in New York (-5 h).
        let tokyo = r#"{"chart":{"result":[{
            "meta":{"gmtoffset":32400},
            "timestamp":[1709478000],
            "indicators":{"quote":[{"close":[2800.0]}]}
        }],"error":null}}"#;
        let new_york = r#"{"chart":{"result":[{
            "meta":{"gmtoffset":-18000,"currency":"USD"},
            "timestamp":[1709604000],
            "indicators":{"quote":[{"close":[170.0]}]}
        }],"error":null}}"#;

        let march_4 = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        assert_eq!(parse(tokyo).unwrap()[0].date, march_4);
        assert_eq!(parse(new_york).unwrap()[0].date, march_4);
    }

    #[test]
    fn not_found_error_maps_to_symbol_not_found() {
        let json = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        assert_eq!(
            parse(json).unwrap_err(),
            DataError::SymbolNotFound {
                symbol: "AAPL".into()
            }
        );
    }

    #[test]
    fn missing_timestamps_is_empty_history() {
        let json = r#"{"chart":{"result":[{"indicators":{"quote":[{}]}}],"error":null}}"#;
        assert_eq!(
            parse(json).unwrap_err(),
            DataError::EmptyHistory {
                symbol: "AAPL".into(),
                days: 5
            }
        );
    }

    #[test]
    fn other_error_codes_are_format_errors() {
        let json = r#"{"chart":{"result":null,"error":{"code":"Bad Request","description":null}}}"#;
        assert!(matches!(parse(json), Err(DataError::ResponseFormat(_))));
    }
}
