//! Market data fetcher: one history request per instrument, folded into a wide table.
//!
//! Instruments are fetched sequentially in registry order. A failure for one
//! instrument becomes a `FetchWarning` and never stops the others.

use std::fmt;
use std::sync::Arc;

use super::cache::{CacheKey, CacheStats, QueryCache};
use super::provider::{DataError, HistoryProvider, RawBar};
use super::registry::{Instrument, InstrumentRegistry};
use super::table::{PriceRow, PriceTable};

/// Outcome of fetching a single instrument.
#[derive(Debug, Clone, PartialEq)]
pub enum InstrumentFetch {
    Fetched {
        instrument: Instrument,
        bars: Vec<RawBar>,
    },
    Failed {
        instrument: Instrument,
        reason: DataError,
    },
}

/// Non-fatal report that one instrument could not be retrieved.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchWarning {
    pub name: String,
    pub symbol: String,
    pub reason: DataError,
}

impl fmt::Display for FetchWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "could not retrieve data for {} ({}): {}",
            self.name, self.symbol, self.reason
        )
    }
}

/// A built table plus the instruments that did not make it in.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedTable {
    pub table: PriceTable,
    pub warnings: Vec<FetchWarning>,
}

/// Progress callback for multi-instrument fetches.
pub trait FetchProgress {
    /// Called when starting to fetch an instrument.
    fn on_start(&self, instrument: &Instrument, index: usize, total: usize);

    /// Called when an instrument fetch completes.
    fn on_complete(&self, result: &InstrumentFetch, index: usize, total: usize);

    /// Called when the entire batch is done.
    fn on_batch_complete(&self, succeeded: usize, failed: usize, total: usize);
}

/// Progress reporter that writes to the `log` facade.
pub struct LogProgress;

impl FetchProgress for LogProgress {
    fn on_start(&self, instrument: &Instrument, index: usize, total: usize) {
        log::debug!(
            "[{}/{}] fetching {} ({})",
            index + 1,
            total,
            instrument.name,
            instrument.symbol
        );
    }

    fn on_complete(&self, result: &InstrumentFetch, _index: usize, _total: usize) {
        match result {
            InstrumentFetch::Fetched { instrument, bars } => {
                log::debug!("  ok: {} ({} bars)", instrument.name, bars.len())
            }
            InstrumentFetch::Failed { instrument, reason } => {
                log::warn!(
                    "could not retrieve data for {} ({}): {reason}",
                    instrument.name,
                    instrument.symbol
                )
            }
        }
    }

    fn on_batch_complete(&self, succeeded: usize, failed: usize, total: usize) {
        log::info!("fetch complete: {succeeded}/{total} succeeded, {failed} failed");
    }
}

/// Fetch one instrument, converting every failure into a value.
pub fn fetch_instrument(
    provider: &dyn HistoryProvider,
    instrument: &Instrument,
    days: u32,
) -> InstrumentFetch {
    let result = provider
        .get_history(&instrument.symbol, days)
        .and_then(|bars| {
            if bars.iter().any(|b| b.close.is_finite()) {
                Ok(bars)
            } else {
                Err(DataError::EmptyHistory {
                    symbol: instrument.symbol.clone(),
                    days,
                })
            }
        });

    match result {
        Ok(bars) => InstrumentFetch::Fetched {
            instrument: instrument.clone(),
            bars,
        },
        Err(reason) => InstrumentFetch::Failed {
            instrument: instrument.clone(),
            reason,
        },
    }
}

/// Fold per-instrument results into a table, collecting failures as warnings.
pub fn build_table(results: impl IntoIterator<Item = InstrumentFetch>) -> FetchedTable {
    let mut table = PriceTable::new();
    let mut warnings = Vec::new();

    for result in results {
        match result {
            InstrumentFetch::Fetched { instrument, bars } => {
                table.push_row(PriceRow::from_bars(instrument.name, &bars));
            }
            InstrumentFetch::Failed { instrument, reason } => warnings.push(FetchWarning {
                name: instrument.name,
                symbol: instrument.symbol,
                reason,
            }),
        }
    }

    FetchedTable { table, warnings }
}

/// Fetch every instrument in `registry` for the trailing `days` and build the table.
///
/// Only an invalid window is an error; provider failures become warnings.
pub fn fetch_table(
    provider: &dyn HistoryProvider,
    days: u32,
    registry: &InstrumentRegistry,
    progress: &dyn FetchProgress,
) -> Result<FetchedTable, DataError> {
    if days == 0 {
        return Err(DataError::InvalidLookback(days));
    }

    let total = registry.len();
    log::info!(
        "fetching {total} instruments over {days} days from {}",
        provider.name()
    );
    let mut results = Vec::with_capacity(total);
    let mut failed = 0;

    for (i, instrument) in registry.iter().enumerate() {
        progress.on_start(instrument, i, total);
        let result = fetch_instrument(provider, instrument, days);
        progress.on_complete(&result, i, total);
        if matches!(result, InstrumentFetch::Failed { .. }) {
            failed += 1;
        }
        results.push(result);
    }

    progress.on_batch_complete(total - failed, failed, total);
    Ok(build_table(results))
}

/// What a fetch call hands back to the caller.
#[derive(Debug, Clone)]
pub struct FetchReport {
    pub table: Arc<FetchedTable>,
    pub from_cache: bool,
}

impl FetchReport {
    pub fn table(&self) -> &PriceTable {
        &self.table.table
    }

    pub fn warnings(&self) -> &[FetchWarning] {
        &self.table.warnings
    }
}

/// Memoizing fetcher: identical `(days, registry)` never queries the provider twice.
pub struct MarketDataFetcher<P> {
    provider: P,
    cache: QueryCache,
}

impl<P: HistoryProvider> MarketDataFetcher<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            cache: QueryCache::new(),
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn fetch(
        &mut self,
        days: u32,
        registry: &InstrumentRegistry,
    ) -> Result<FetchReport, DataError> {
        self.fetch_with_progress(days, registry, &LogProgress)
    }

    /// Cached fetch. Warnings from the original computation are replayed on a hit.
    pub fn fetch_with_progress(
        &mut self,
        days: u32,
        registry: &InstrumentRegistry,
        progress: &dyn FetchProgress,
    ) -> Result<FetchReport, DataError> {
        let key = CacheKey::new(days, registry);
        let provider = &self.provider;
        let (table, from_cache) = self
            .cache
            .get_or_try_insert_with(key, || fetch_table(provider, days, registry, progress))?;

        if from_cache {
            log::debug!("query cache hit for {days} days");
        }

        Ok(FetchReport { table, from_cache })
    }
}
