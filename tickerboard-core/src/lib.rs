//! Tickerboard Core: price history acquisition and chart reshaping.
//!
//! This crate contains everything a dashboard surface needs except drawing:
//! - History providers (Yahoo Finance, deterministic synthetic)
//! - The fixed instrument registry
//! - A memoizing fetcher that builds the wide per-date price table
//! - The selection & reshape pipeline (filter, sort, melt)
//! - A dashboard cycle tying fetch → filter → reshape together

pub mod config;
pub mod dashboard;
pub mod data;
pub mod reshape;

pub use config::DashboardConfig;
pub use dashboard::{CycleReport, Dashboard, DashboardError, DashboardInput};
pub use reshape::{
    melt, reshape, ChartSpec, EmptyReason, LongRecord, RangeBound, ReshapeOutcome, Selection,
};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: the values a surface holds across frames are Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<data::PriceTable>();
        require_sync::<data::PriceTable>();
        require_send::<data::FetchReport>();
        require_sync::<data::FetchReport>();
        require_send::<ChartSpec>();
        require_sync::<ChartSpec>();
        require_send::<DashboardInput>();
        require_sync::<DashboardInput>();
        require_send::<DashboardError>();
        require_sync::<DashboardError>();
        require_send::<data::YahooProvider>();
        require_sync::<data::YahooProvider>();
        require_send::<data::SyntheticProvider>();
        require_sync::<data::SyntheticProvider>();
    }

    /// The fetcher works through a boxed trait object, which is how the
    /// binaries choose between live and offline providers at runtime.
    #[test]
    fn boxed_provider_drives_a_dashboard() {
        let provider: Box<dyn data::HistoryProvider> = Box::new(data::SyntheticProvider::new(
            1,
            chrono::NaiveDate::from_ymd_opt(2024, 3, 8).unwrap(),
        ));
        let mut dash = Dashboard::new(DashboardConfig::default(), provider);
        let input = dash.config().default_input();
        let report = dash.run_cycle(&input).unwrap();
        assert_eq!(report.table().len(), 5);
    }
}
