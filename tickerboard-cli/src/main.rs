//! Tickerboard CLI: print the fetched price table or the melted chart records.
//!
//! Commands:
//! - `registry`: list the configured companies and their ticker symbols
//! - `table`: fetch the window and print the wide closing-price table
//! - `chart`: run a full cycle and print the long-form chart records

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::io::{self, Write};
use tickerboard_core::data::{
    date_label, FetchProgress, HistoryProvider, Instrument, InstrumentFetch, PriceTable,
    SyntheticProvider, YahooProvider,
};
use tickerboard_core::reshape::PIVOT_KEY;
use tickerboard_core::{
    ChartSpec, CycleReport, Dashboard, DashboardConfig, DashboardInput, LongRecord, RangeBound,
    ReshapeOutcome, Selection,
};

#[derive(Parser)]
#[command(
    name = "tickerboard",
    about = "Tickerboard CLI — daily closing prices for a fixed set of companies"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Use deterministic synthetic prices instead of Yahoo Finance.
    #[arg(long, global = true)]
    offline: bool,

    /// Seed for the synthetic provider.
    #[arg(long, global = true, default_value_t = 42)]
    seed: u64,

    /// Ticker symbol the synthetic provider should fail (repeatable).
    #[arg(long = "fail", global = true, requires = "offline")]
    fail: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the configured companies.
    Registry,
    /// Print the wide table of closing prices.
    Table {
        /// Trailing window in days. Clamped to 1..=50.
        #[arg(long, default_value_t = 20)]
        days: u32,

        /// Output format.
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Print the long-form records that would be charted.
    Chart {
        /// Trailing window in days. Clamped to 1..=50.
        #[arg(long, default_value_t = 20)]
        days: u32,

        /// Companies to include. Defaults to google and amazon; pass the flag
        /// with no names to select nothing.
        #[arg(long, num_args = 0.., value_delimiter = ',')]
        select: Option<Vec<String>>,

        /// Lower Y-axis bound.
        #[arg(long, default_value_t = 0.0)]
        min: f64,

        /// Upper Y-axis bound.
        #[arg(long, default_value_t = 3500.0)]
        max: f64,

        /// Output format.
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
    Csv,
}

/// Exit status for a cycle that produced nothing to chart.
const EXIT_EMPTY: i32 = 2;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = DashboardConfig::default();

    match cli.command {
        Commands::Registry => {
            let mut out = io::stdout().lock();
            write_registry(&mut out, config.registry.iter())?;
        }
        Commands::Table { days, format } => {
            let provider = build_provider(cli.offline, cli.seed, &cli.fail)?;
            let mut dashboard = Dashboard::new(config, provider);
            let input = DashboardInput {
                days,
                ..dashboard.config().default_input()
            };
            let report = run_cycle(&mut dashboard, input);
            let mut out = io::stdout().lock();
            write_table(&mut out, report.table(), format)?;
        }
        Commands::Chart {
            days,
            select,
            min,
            max,
            format,
        } => {
            let provider = build_provider(cli.offline, cli.seed, &cli.fail)?;
            let mut dashboard = Dashboard::new(config, provider);
            let defaults = dashboard.config().default_input();
            let input = DashboardInput {
                days,
                selection: select
                    .map(|names| names.into_iter().collect::<Selection>())
                    .unwrap_or(defaults.selection),
                range: RangeBound::new(min, max),
            };
            let report = run_cycle(&mut dashboard, input);

            match &report.outcome {
                ReshapeOutcome::Empty(reason) => {
                    eprintln!("{reason}");
                    std::process::exit(EXIT_EMPTY);
                }
                ReshapeOutcome::Chart(spec) => {
                    if !spec.missing.is_empty() {
                        eprintln!("No data for: {}", spec.missing.join(", "));
                    }
                    let mut out = io::stdout().lock();
                    write_chart(&mut out, spec, format)?;
                }
            }
        }
    }

    Ok(())
}

fn build_provider(offline: bool, seed: u64, fail: &[String]) -> Result<Box<dyn HistoryProvider>> {
    if offline {
        let today = chrono::Local::now().date_naive();
        let provider = fail
            .iter()
            .fold(SyntheticProvider::new(seed, today), |p, symbol| {
                p.failing_symbol(symbol.as_str())
            });
        Ok(Box::new(provider))
    } else {
        let provider = YahooProvider::new().context("building HTTP client")?;
        Ok(Box::new(provider))
    }
}

/// Clamp `input`, run one cycle and report warnings on stderr. Cycle failures
/// end the process with the generic diagnostic.
fn run_cycle(
    dashboard: &mut Dashboard<Box<dyn HistoryProvider>>,
    input: DashboardInput,
) -> CycleReport {
    let input = dashboard.config().clamp_input(input);
    log::info!("Command line input recorded: {input:?}");

    match dashboard.run_cycle_with_progress(&input, &StderrProgress) {
        Ok(report) => {
            for warning in report.warnings() {
                eprintln!("Warning: {warning}");
            }
            report
        }
        Err(err) => {
            log::error!("dashboard cycle failed: {err}");
            eprintln!("{}", err.user_message());
            std::process::exit(1);
        }
    }
}

/// Progress reporter that writes to stderr so stdout stays machine-readable.
struct StderrProgress;

impl FetchProgress for StderrProgress {
    fn on_start(&self, instrument: &Instrument, index: usize, total: usize) {
        eprintln!(
            "[{}/{}] Fetching {} ({})...",
            index + 1,
            total,
            instrument.name,
            instrument.symbol
        );
    }

    fn on_complete(&self, result: &InstrumentFetch, _index: usize, _total: usize) {
        match result {
            InstrumentFetch::Fetched { instrument, bars } => {
                eprintln!("  OK: {} ({} bars)", instrument.name, bars.len())
            }
            InstrumentFetch::Failed { instrument, reason } => {
                eprintln!("  FAIL: {}: {reason}", instrument.name)
            }
        }
    }

    fn on_batch_complete(&self, succeeded: usize, failed: usize, total: usize) {
        eprintln!("Fetch complete: {succeeded}/{total} succeeded, {failed} failed");
    }
}

fn write_registry<'a>(
    out: &mut impl Write,
    instruments: impl Iterator<Item = &'a Instrument>,
) -> Result<()> {
    for instrument in instruments {
        writeln!(out, "{:<12} {}", instrument.name, instrument.symbol)?;
    }
    Ok(())
}

/// Wide table as written by `table --format json`: one close (or null) per column.
#[derive(Serialize)]
struct WideTable<'a> {
    columns: Vec<String>,
    rows: Vec<WideRow<'a>>,
}

#[derive(Serialize)]
struct WideRow<'a> {
    name: &'a str,
    closes: Vec<Option<f64>>,
}

fn write_table(out: &mut impl Write, table: &PriceTable, format: Format) -> Result<()> {
    let columns = table.columns();
    match format {
        Format::Json => {
            let wide = WideTable {
                columns: columns.iter().copied().map(date_label).collect(),
                rows: table
                    .rows()
                    .iter()
                    .map(|row| WideRow {
                        name: &row.name,
                        closes: columns.iter().map(|d| row.close_on(*d)).collect(),
                    })
                    .collect(),
            };
            serde_json::to_writer_pretty(&mut *out, &wide)?;
            writeln!(out)?;
        }
        Format::Csv => {
            let mut wtr = csv::Writer::from_writer(out);
            let mut header = vec!["name".to_string()];
            header.extend(columns.iter().copied().map(date_label));
            wtr.write_record(&header)?;
            for row in table.rows() {
                let mut record = vec![row.name.clone()];
                record.extend(
                    columns
                        .iter()
                        .map(|d| row.close_on(*d).map(|p| p.to_string()).unwrap_or_default()),
                );
                wtr.write_record(&record)?;
            }
            wtr.flush()?;
        }
        Format::Text => {
            write!(out, "{:<12}", "Company")?;
            for date in &columns {
                write!(out, " {:>17}", date_label(*date))?;
            }
            writeln!(out)?;
            for row in table.rows() {
                write!(out, "{:<12}", row.name)?;
                for date in &columns {
                    match row.close_on(*date) {
                        Some(close) => write!(out, " {close:>17.2}")?,
                        None => write!(out, " {:>17}", "-")?,
                    }
                }
                writeln!(out)?;
            }
        }
    }
    Ok(())
}

fn write_chart(out: &mut impl Write, spec: &ChartSpec, format: Format) -> Result<()> {
    match format {
        Format::Json => {
            serde_json::to_writer_pretty(&mut *out, &spec.records)?;
            writeln!(out)?;
        }
        Format::Csv => {
            let mut wtr = csv::Writer::from_writer(out);
            wtr.write_record([PIVOT_KEY, "name", "price"])?;
            for LongRecord { date, name, price } in &spec.records {
                wtr.write_record([date.as_str(), name.as_str(), price.to_string().as_str()])?;
            }
            wtr.flush()?;
        }
        Format::Text => {
            writeln!(
                out,
                "# y axis {:.0}..{:.0}, {} records",
                spec.y_domain.min,
                spec.y_domain.max,
                spec.records.len()
            )?;
            writeln!(out, "{:<18} {:<12} {:>10}", PIVOT_KEY, "name", "price")?;
            for record in &spec.records {
                writeln!(
                    out,
                    "{:<18} {:<12} {:>10.2}",
                    record.date, record.name, record.price
                )?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tickerboard_core::data::InstrumentRegistry;

    fn offline_report(selection: &[&str]) -> CycleReport {
        let end = NaiveDate::from_ymd_opt(2024, 3, 8).unwrap();
        let provider: Box<dyn HistoryProvider> = Box::new(SyntheticProvider::new(7, end));
        let mut dashboard = Dashboard::new(DashboardConfig::default(), provider);
        let input = DashboardInput {
            days: 5,
            selection: selection.iter().copied().collect(),
            range: RangeBound::default(),
        };
        dashboard.run_cycle(&input).unwrap()
    }

    fn chart_spec(report: &CycleReport) -> &ChartSpec {
        match &report.outcome {
            ReshapeOutcome::Chart(spec) => spec,
            other => panic!("expected chart, got {other:?}"),
        }
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn select_flag_without_names_means_empty_selection() {
        let cli = Cli::try_parse_from(["tickerboard", "chart", "--select"]).unwrap();
        let Commands::Chart { select, .. } = cli.command else {
            panic!("expected chart");
        };
        assert_eq!(select, Some(Vec::new()));

        let cli = Cli::try_parse_from(["tickerboard", "chart", "--select", "apple,netflix"]).unwrap();
        let Commands::Chart { select, .. } = cli.command else {
            panic!("expected chart");
        };
        assert_eq!(select, Some(vec!["apple".to_string(), "netflix".to_string()]));
    }

    #[test]
    fn fail_requires_offline() {
        assert!(Cli::try_parse_from(["tickerboard", "table", "--fail", "AAPL"]).is_err());
        assert!(
            Cli::try_parse_from(["tickerboard", "table", "--offline", "--fail", "AAPL"]).is_ok()
        );
    }

    #[test]
    fn registry_lists_all_companies() {
        let registry = InstrumentRegistry::default_us();
        let mut out = Vec::new();
        write_registry(&mut out, registry.iter()).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 5);
        assert!(text.contains("netflix      NFLX"));
    }

    #[test]
    fn chart_csv_uses_pivot_key_header() {
        let report = offline_report(&["google", "amazon"]);
        let spec = chart_spec(&report);
        let mut out = Vec::new();
        write_chart(&mut out, spec, Format::Csv).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("Date,name,price"));
        assert_eq!(lines.count(), spec.records.len());
    }

    #[test]
    fn chart_json_round_trips_records() {
        let report = offline_report(&["apple"]);
        let spec = chart_spec(&report);
        let mut out = Vec::new();
        write_chart(&mut out, spec, Format::Json).unwrap();
        let parsed: Vec<LongRecord> = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed.len(), spec.records.len());
        assert!(parsed.iter().all(|r| r.name == "apple"));
        assert_eq!(parsed[0].date, spec.records[0].date);
    }

    #[test]
    fn table_text_has_one_line_per_row_plus_header() {
        let report = offline_report(&["apple"]);
        let mut out = Vec::new();
        write_table(&mut out, report.table(), Format::Text).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 1 + report.table().len());
        assert!(text.starts_with("Company"));
        assert!(text.contains("08 March 2024"));
    }

    #[test]
    fn table_csv_leaves_missing_cells_blank() {
        let mut table = PriceTable::new();
        let d1 = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        table.push_row(tickerboard_core::data::PriceRow {
            name: "apple".into(),
            closes: [(d1, 170.0), (d2, 171.5)].into_iter().collect(),
        });
        table.push_row(tickerboard_core::data::PriceRow {
            name: "google".into(),
            closes: [(d2, 140.0)].into_iter().collect(),
        });
        let mut out = Vec::new();
        write_table(&mut out, &table, Format::Csv).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "name,04 March 2024,05 March 2024\napple,170,171.5\ngoogle,,140\n"
        );
    }

    #[test]
    fn table_json_uses_date_labels_and_nulls_for_gaps() {
        let mut table = PriceTable::new();
        let d1 = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        table.push_row(tickerboard_core::data::PriceRow {
            name: "google".into(),
            closes: [(d2, 140.0)].into_iter().collect(),
        });
        table.push_row(tickerboard_core::data::PriceRow {
            name: "apple".into(),
            closes: [(d1, 170.0), (d2, 171.5)].into_iter().collect(),
        });
        let mut out = Vec::new();
        write_table(&mut out, &table, Format::Json).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(
            value["columns"],
            serde_json::json!(["04 March 2024", "05 March 2024"])
        );
        assert_eq!(value["rows"][0]["name"], "google");
        assert_eq!(value["rows"][0]["closes"], serde_json::json!([null, 140.0]));
        assert_eq!(value["rows"][1]["closes"], serde_json::json!([170.0, 171.5]));
    }
}
