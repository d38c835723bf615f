//! History provider trait and structured error types.
//!
//! The HistoryProvider trait abstracts over data sources (Yahoo Finance, the
//! synthetic random walk) so we can swap implementations and mock for tests.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raw daily bar from a history provider. Only `close` is consumed downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

/// Structured error types for data operations.
///
/// These are designed to be displayable in both CLI and TUI contexts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("HTTP {status} for {symbol}")]
    Http { status: u16, symbol: String },

    #[error("response format changed: {0}")]
    ResponseFormat(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("no price history for {symbol} in the last {days} days")]
    EmptyHistory { symbol: String, days: u32 },

    #[error("lookback window must be at least one day (got {0})")]
    InvalidLookback(u32),

    #[error("data error: {0}")]
    Other(String),
}

/// Where the data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataSource {
    YahooFinance,
    Synthetic,
}

/// Trait for history providers.
///
/// The query cache sits above this trait; providers don't know about it.
pub trait HistoryProvider {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Which source the bars come from.
    fn source(&self) -> DataSource;

    /// Fetch daily bars for the trailing `days` calendar days, sorted by date.
    fn get_history(&self, symbol: &str, days: u32) -> Result<Vec<RawBar>, DataError>;
}

impl<P: HistoryProvider + ?Sized> HistoryProvider for Box<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn source(&self) -> DataSource {
        (**self).source()
    }

    fn get_history(&self, symbol: &str, days: u32) -> Result<Vec<RawBar>, DataError> {
        (**self).get_history(symbol, days)
    }
}
