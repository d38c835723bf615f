//! Selection & reshape pipeline: filter the wide table to the chosen rows and
//! melt it into long `(date, name, price)` records for a line chart.
//!
//! Stateless. The range bound is carried through as the chart's Y domain and
//! never drops data.

use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::data::table::{date_label, PriceTable};

/// Column-axis variable name used when melting.
pub const PIVOT_KEY: &str = "Date";

/// The set of display names the user has chosen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection(BTreeSet<String>);

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.0.insert(name.into())
    }

    pub fn remove(&mut self, name: &str) -> bool {
        self.0.remove(name)
    }

    /// Flip membership; returns whether `name` is selected afterwards.
    pub fn toggle(&mut self, name: &str) -> bool {
        if self.0.remove(name) {
            false
        } else {
            self.0.insert(name.to_string());
            true
        }
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Names in lexical order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for Selection {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Y-axis clamp `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeBound {
    pub min: f64,
    pub max: f64,
}

impl RangeBound {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Swap the ends if they arrive reversed.
    pub fn ordered(self) -> Self {
        if self.min <= self.max {
            self
        } else {
            Self {
                min: self.max,
                max: self.min,
            }
        }
    }

    pub fn contains(&self, price: f64) -> bool {
        price >= self.min && price <= self.max
    }
}

impl Default for RangeBound {
    fn default() -> Self {
        Self::new(0.0, 3500.0)
    }
}

/// One melted cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LongRecord {
    pub date: String,
    pub name: String,
    pub price: f64,
}

/// Everything a rendering surface needs to draw the selected series.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    /// Selected rows, sorted by name, for the tabular display.
    pub view: PriceTable,
    /// Long-form records, row then column order.
    pub records: Vec<LongRecord>,
    /// Chronological X domain covering every record's date.
    pub dates: Vec<NaiveDate>,
    pub y_domain: RangeBound,
    /// Selected names that have no row in the table.
    pub missing: Vec<String>,
}

/// Why there is nothing to chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmptyReason {
    NoSelection,
    NothingSelectedAvailable { missing: Vec<String> },
}

impl fmt::Display for EmptyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmptyReason::NoSelection => write!(f, "Select at least one company."),
            EmptyReason::NothingSelectedAvailable { missing } => write!(
                f,
                "No data available for the selected companies: {}",
                missing.join(", ")
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReshapeOutcome {
    Chart(ChartSpec),
    Empty(EmptyReason),
}

impl ReshapeOutcome {
    /// Records to plot; empty for the `Empty` outcome.
    pub fn records(&self) -> &[LongRecord] {
        match self {
            ReshapeOutcome::Chart(spec) => &spec.records,
            ReshapeOutcome::Empty(_) => &[],
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ReshapeOutcome::Empty(_))
    }
}

/// Unpivot a wide table: one record per present cell, row then column.
pub fn melt(table: &PriceTable) -> Vec<LongRecord> {
    table
        .rows()
        .iter()
        .flat_map(|row| {
            row.closes.iter().map(move |(&date, &price)| LongRecord {
                date: date_label(date),
                name: row.name.clone(),
                price,
            })
        })
        .collect()
}

/// Filter `table` to `selection` and melt it for charting with Y clamped to `range`.
pub fn reshape(table: &PriceTable, selection: &Selection, range: RangeBound) -> ReshapeOutcome {
    if selection.is_empty() {
        return ReshapeOutcome::Empty(EmptyReason::NoSelection);
    }

    let missing: Vec<String> = selection
        .iter()
        .filter(|name| !table.contains(name))
        .map(String::from)
        .collect();

    let view = table
        .filter_rows(|name| selection.contains(name))
        .sorted_by_name();

    if view.is_empty() {
        return ReshapeOutcome::Empty(EmptyReason::NothingSelectedAvailable { missing });
    }

    let records = melt(&view);
    let dates = view.columns();

    ReshapeOutcome::Chart(ChartSpec {
        view,
        records,
        dates,
        y_domain: range,
        missing,
    })
}
