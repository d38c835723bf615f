//! One interaction cycle: fetch → filter → reshape.
//!
//! The dashboard owns the memoizing fetcher; everything else about a cycle comes
//! in through `DashboardInput` and goes out through `CycleReport`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::DashboardConfig;
use crate::data::fetch::{FetchProgress, FetchReport, FetchWarning, LogProgress, MarketDataFetcher};
use crate::data::provider::{DataError, HistoryProvider};
use crate::data::table::PriceTable;
use crate::reshape::{reshape, RangeBound, ReshapeOutcome, Selection};

/// User-controlled state for one cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardInput {
    pub days: u32,
    pub selection: Selection,
    pub range: RangeBound,
}

/// Failures that abort a whole cycle.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("failed to fetch market data: {0}")]
    Fetch(#[from] DataError),

    #[error("instrument registry is empty")]
    EmptyRegistry,
}

impl DashboardError {
    /// Generic diagnostic shown by a rendering surface.
    pub fn user_message(&self) -> String {
        format!("Something went wrong: {self}")
    }
}

/// Result of a successful cycle.
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub fetch: FetchReport,
    pub outcome: ReshapeOutcome,
}

impl CycleReport {
    pub fn table(&self) -> &PriceTable {
        self.fetch.table()
    }

    pub fn warnings(&self) -> &[FetchWarning] {
        self.fetch.warnings()
    }

    pub fn from_cache(&self) -> bool {
        self.fetch.from_cache
    }
}

pub struct Dashboard<P> {
    config: DashboardConfig,
    fetcher: MarketDataFetcher<P>,
}

impl<P: HistoryProvider> Dashboard<P> {
    pub fn new(config: DashboardConfig, provider: P) -> Self {
        Self {
            config,
            fetcher: MarketDataFetcher::new(provider),
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn fetcher(&self) -> &MarketDataFetcher<P> {
        &self.fetcher
    }

    /// Run one full cycle for `input`. Per-instrument failures come back as
    /// warnings in the report; only cycle-level failures are `Err`.
    pub fn run_cycle(&mut self, input: &DashboardInput) -> Result<CycleReport, DashboardError> {
        self.run_cycle_with_progress(input, &LogProgress)
    }

    pub fn run_cycle_with_progress(
        &mut self,
        input: &DashboardInput,
        progress: &dyn FetchProgress,
    ) -> Result<CycleReport, DashboardError> {
        if self.config.registry.is_empty() {
            return Err(DashboardError::EmptyRegistry);
        }

        let fetch = self
            .fetcher
            .fetch_with_progress(input.days, &self.config.registry, progress)?;
        let outcome = reshape(fetch.table(), &input.selection, input.range);

        log::debug!(
            "cycle: days={} selected={} rows={} records={} cached={}",
            input.days,
            input.selection.len(),
            fetch.table().len(),
            outcome.records().len(),
            fetch.from_cache
        );

        Ok(CycleReport { fetch, outcome })
    }
}
