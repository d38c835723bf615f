//! Shared fixtures for TUI unit tests.

use chrono::NaiveDate;
use tickerboard_core::data::{HistoryProvider, InstrumentRegistry, SyntheticProvider};
use tickerboard_core::{Dashboard, DashboardConfig};

use crate::app::AppState;

fn friday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 8).unwrap()
}

fn app_with(provider: SyntheticProvider) -> AppState {
    let provider: Box<dyn HistoryProvider> = Box::new(provider);
    AppState::new(Dashboard::new(DashboardConfig::default(), provider))
}

/// App backed by the synthetic provider, no cycle run yet.
pub fn offline_app() -> AppState {
    app_with(SyntheticProvider::new(42, friday()))
}

/// Same as `offline_app`, but `symbol` always fails to fetch.
pub fn app_with_failing(symbol: &str) -> AppState {
    app_with(SyntheticProvider::new(42, friday()).failing_symbol(symbol))
}

/// App whose config has no instruments, so every cycle fails.
pub fn app_without_instruments() -> AppState {
    let config = DashboardConfig {
        registry: InstrumentRegistry::from_pairs(Vec::<(&str, &str)>::new()),
        ..DashboardConfig::default()
    };
    let provider: Box<dyn HistoryProvider> = Box::new(SyntheticProvider::new(42, friday()));
    AppState::new(Dashboard::new(config, provider))
}
