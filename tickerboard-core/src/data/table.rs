//! Wide price table: one row per instrument, one column per calendar date.
//!
//! Rows are keyed by display name and keep the order they were appended in.
//! Column sets may differ between rows; a missing date is an absent cell.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use super::provider::RawBar;

/// Human-readable column label format, e.g. "05 March 2024".
pub const DATE_LABEL_FORMAT: &str = "%d %B %Y";

/// Format a date as a column label.
pub fn date_label(date: NaiveDate) -> String {
    date.format(DATE_LABEL_FORMAT).to_string()
}

/// One instrument's closes keyed by date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceRow {
    pub name: String,
    pub closes: BTreeMap<NaiveDate, f64>,
}

impl PriceRow {
    /// Keep only the close of each bar. Non-finite closes are dropped so the
    /// table never holds a non-numeric cell.
    pub fn from_bars(name: impl Into<String>, bars: &[RawBar]) -> Self {
        let closes = bars
            .iter()
            .filter(|b| b.close.is_finite())
            .map(|b| (b.date, b.close))
            .collect();
        Self {
            name: name.into(),
            closes,
        }
    }

    pub fn close_on(&self, date: NaiveDate) -> Option<f64> {
        self.closes.get(&date).copied()
    }

    pub fn column_count(&self) -> usize {
        self.closes.len()
    }
}

/// Immutable-after-build table of closing prices.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PriceTable {
    rows: Vec<PriceRow>,
}

impl PriceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row. A row with the same name replaces the existing one in place.
    pub fn push_row(&mut self, row: PriceRow) {
        match self.rows.iter_mut().find(|r| r.name == row.name) {
            Some(existing) => *existing = row,
            None => self.rows.push(row),
        }
    }

    pub fn rows(&self) -> &[PriceRow] {
        &self.rows
    }

    pub fn row(&self, name: &str) -> Option<&PriceRow> {
        self.rows.iter().find(|r| r.name == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.name.as_str()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.row(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Union of all rows' dates, chronological.
    pub fn columns(&self) -> Vec<NaiveDate> {
        let dates: BTreeSet<NaiveDate> = self
            .rows
            .iter()
            .flat_map(|r| r.closes.keys().copied())
            .collect();
        dates.into_iter().collect()
    }

    /// Column labels in chronological order.
    pub fn column_labels(&self) -> Vec<String> {
        self.columns().into_iter().map(date_label).collect()
    }

    /// Number of present cells across all rows.
    pub fn cell_count(&self) -> usize {
        self.rows.iter().map(PriceRow::column_count).sum()
    }

    /// Rows whose name satisfies `keep`, original order.
    pub fn filter_rows(&self, mut keep: impl FnMut(&str) -> bool) -> PriceTable {
        PriceTable {
            rows: self
                .rows
                .iter()
                .filter(|r| keep(&r.name))
                .cloned()
                .collect(),
        }
    }

    /// Rows sorted lexically by name.
    pub fn sorted_by_name(mut self) -> PriceTable {
        self.rows.sort_by(|a, b| a.name.cmp(&b.name));
        self
    }
}
