//! Property tests for the reshape pipeline.
//!
//! Uses proptest to verify:
//! 1. Dense tables melt to exactly |rows| × |columns| records
//! 2. Ragged tables melt to exactly the number of present cells
//! 3. Record names are always a subset of the selection
//! 4. The range bound never changes which records are produced

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use std::collections::BTreeMap;
use tickerboard_core::data::{PriceRow, PriceTable};
use tickerboard_core::{melt, reshape, RangeBound, Selection};

const NAMES: [&str; 5] = ["apple", "google", "microsoft", "netflix", "amazon"];

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_price() -> impl Strategy<Value = f64> {
    (1.0..3000.0_f64).prop_map(|p| (p * 100.0).round() / 100.0)
}

/// Per-row presence masks over `cols` dates, with prices.
fn arb_ragged(rows: usize, cols: usize) -> impl Strategy<Value = Vec<Vec<Option<f64>>>> {
    prop::collection::vec(
        prop::collection::vec(prop::option::of(arb_price()), cols),
        rows,
    )
}

fn build(cells: &[Vec<Option<f64>>]) -> PriceTable {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let mut table = PriceTable::new();
    for (name, row) in NAMES.iter().zip(cells) {
        let closes: BTreeMap<NaiveDate, f64> = row
            .iter()
            .enumerate()
            .filter_map(|(i, p)| p.map(|p| (start + Duration::days(i as i64), p)))
            .collect();
        table.push_row(PriceRow {
            name: name.to_string(),
            closes,
        });
    }
    table
}

fn arb_selection() -> impl Strategy<Value = Selection> {
    prop::collection::vec(prop::sample::select(NAMES.to_vec()), 0..=5)
        .prop_map(|names| names.into_iter().collect())
}

// ── Properties ───────────────────────────────────────────────────────

proptest! {
    #[test]
    fn dense_table_melts_to_rows_times_columns(
        rows in 1usize..=5,
        cols in 1usize..=50,
        price in arb_price(),
    ) {
        let cells = vec![vec![Some(price); cols]; rows];
        let table = build(&cells);
        prop_assert_eq!(melt(&table).len(), rows * cols);
    }

    #[test]
    fn ragged_table_melts_to_present_cells(cells in arb_ragged(5, 30)) {
        let table = build(&cells);
        let present: usize = cells.iter().map(|r| r.iter().filter(|c| c.is_some()).count()).sum();
        let records = melt(&table);
        prop_assert_eq!(records.len(), present);
        prop_assert!(records.iter().all(|r| r.price.is_finite()));
    }

    #[test]
    fn record_names_are_within_selection(
        cells in arb_ragged(5, 10),
        selection in arb_selection(),
    ) {
        let table = build(&cells);
        let outcome = reshape(&table, &selection, RangeBound::default());
        for record in outcome.records() {
            prop_assert!(selection.contains(&record.name));
        }
        if selection.is_empty() {
            prop_assert!(outcome.is_empty());
        }
    }

    #[test]
    fn range_bound_does_not_filter(
        cells in arb_ragged(5, 10),
        selection in arb_selection(),
        lo in 0.0..1500.0_f64,
        hi in 1500.0..3500.0_f64,
    ) {
        let table = build(&cells);
        let wide = reshape(&table, &selection, RangeBound::new(0.0, 3500.0));
        let narrow = reshape(&table, &selection, RangeBound::new(lo, hi));
        prop_assert_eq!(wide.records(), narrow.records());
    }
}
