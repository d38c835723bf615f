//! Deterministic synthetic history provider.
//!
//! Generates a random-walk close series per symbol for offline runs. The seed for
//! each symbol is derived from `(master_seed, symbol)` via BLAKE3, so a symbol's
//! series does not depend on which other symbols were requested or in what order.

use super::provider::{DataError, DataSource, HistoryProvider, RawBar};
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

/// Offline provider producing seeded random-walk closes on weekdays.
#[derive(Debug, Clone)]
pub struct SyntheticProvider {
    master_seed: u64,
    end: NaiveDate,
    failing: HashSet<String>,
}

impl SyntheticProvider {
    /// Series end on `end` (inclusive), usually today.
    pub fn new(master_seed: u64, end: NaiveDate) -> Self {
        Self {
            master_seed,
            end,
            failing: HashSet::new(),
        }
    }

    /// Make every request for `symbol` fail with `SymbolNotFound`.
    pub fn failing_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.failing.insert(symbol.into());
        self
    }

    /// Derive the per-symbol seed.
    pub fn symbol_seed(&self, symbol: &str) -> u64 {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.master_seed.to_le_bytes());
        hasher.update(symbol.as_bytes());
        let hash = hasher.finalize();
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&hash.as_bytes()[..8]);
        u64::from_le_bytes(bytes)
    }
}

impl HistoryProvider for SyntheticProvider {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn source(&self) -> DataSource {
        DataSource::Synthetic
    }

    fn get_history(&self, symbol: &str, days: u32) -> Result<Vec<RawBar>, DataError> {
        if days == 0 {
            return Err(DataError::InvalidLookback(days));
        }
        if self.failing.contains(symbol) {
            return Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }

        let mut rng = StdRng::seed_from_u64(self.symbol_seed(symbol));
        // Windows reaching past the calendar's first representable date are rejected.
        let start = self
            .end
            .checked_sub_signed(Duration::days(i64::from(days) - 1))
            .ok_or(DataError::InvalidLookback(days))?;

        // Start somewhere in the range most large caps trade in.
        let mut close: f64 = rng.gen_range(80.0..600.0);
        let mut bars = Vec::new();

        let mut date = start;
        while date <= self.end {
            if !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
                let open = close;
                let change: f64 = rng.gen_range(-0.025..0.025);
                close = (open * (1.0 + change)).max(1.0);
                let wick: f64 = rng.gen_range(0.0..0.01);
                bars.push(RawBar {
                    date,
                    open,
                    high: open.max(close) * (1.0 + wick),
                    low: open.min(close) * (1.0 - wick),
                    close,
                });
            }
            date += Duration::days(1);
        }

        if bars.is_empty() {
            return Err(DataError::EmptyHistory {
                symbol: symbol.to_string(),
                days,
            });
        }

        Ok(bars)
    }
}
