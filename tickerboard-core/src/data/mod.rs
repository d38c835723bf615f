//! Data acquisition: providers, registry, the wide price table and the query cache.

pub mod cache;
pub mod fetch;
pub mod provider;
pub mod registry;
pub mod synthetic;
pub mod table;
pub mod yahoo;

pub use cache::{CacheKey, CacheStats, QueryCache};
pub use fetch::{
    build_table, fetch_instrument, fetch_table, FetchProgress, FetchReport, FetchWarning,
    FetchedTable, InstrumentFetch, LogProgress, MarketDataFetcher,
};
pub use provider::{DataError, DataSource, HistoryProvider, RawBar};
pub use registry::{Instrument, InstrumentRegistry};
pub use synthetic::SyntheticProvider;
pub use table::{date_label, PriceRow, PriceTable, DATE_LABEL_FORMAT};
pub use yahoo::YahooProvider;
