//! Instrument registry: the fixed, ordered display-name → ticker-symbol mapping.

use serde::{Deserialize, Serialize};

/// A tradable equity: display name plus provider symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Instrument {
    pub name: String,
    pub symbol: String,
}

/// Ordered set of instruments with unique display names.
///
/// Iteration order is insertion order; the fetcher preserves it in the table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstrumentRegistry {
    instruments: Vec<Instrument>,
}

impl InstrumentRegistry {
    /// Build a registry from (name, symbol) pairs.
    ///
    /// A later pair with an already-seen name replaces the earlier symbol in place.
    pub fn from_pairs<N, S>(pairs: impl IntoIterator<Item = (N, S)>) -> Self
    where
        N: Into<String>,
        S: Into<String>,
    {
        let mut instruments: Vec<Instrument> = Vec::new();
        for (name, symbol) in pairs {
            let name = name.into();
            let symbol = symbol.into();
            match instruments.iter_mut().find(|i| i.name == name) {
                Some(existing) => existing.symbol = symbol,
                None => instruments.push(Instrument { name, symbol }),
            }
        }
        Self { instruments }
    }

    /// The five large-cap US names the dashboard tracks.
    pub fn default_us() -> Self {
        Self::from_pairs([
            ("apple", "AAPL"),
            ("google", "GOOGL"),
            ("microsoft", "MSFT"),
            ("netflix", "NFLX"),
            ("amazon", "AMZN"),
        ])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Instrument> {
        self.instruments.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.instruments.iter().map(|i| i.name.as_str()).collect()
    }

    pub fn symbol_for(&self, name: &str) -> Option<&str> {
        self.instruments
            .iter()
            .find(|i| i.name == name)
            .map(|i| i.symbol.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.symbol_for(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }
}

impl Default for InstrumentRegistry {
    fn default() -> Self {
        Self::default_us()
    }
}
