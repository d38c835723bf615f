//! Line chart: one series per selected company, Y axis fixed to the chosen range.

use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph, Wrap};
use ratatui::Frame;

use tickerboard_core::data::date_label;
use tickerboard_core::{ChartSpec, ReshapeOutcome};

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    match app.report.as_ref().map(|r| &r.outcome) {
        Some(ReshapeOutcome::Chart(spec)) if !spec.records.is_empty() => {
            render_chart(f, area, spec)
        }
        Some(ReshapeOutcome::Empty(reason)) => {
            render_message(f, area, &reason.to_string(), theme::warning())
        }
        Some(ReshapeOutcome::Chart(_)) => {
            render_message(f, area, "No prices in this window.", theme::muted())
        }
        None => render_message(f, area, "No data loaded.", theme::muted()),
    }
}

fn chart_block() -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(false))
        .title(" Price (USD) ")
        .title_style(theme::panel_title(false))
}

fn render_message(f: &mut Frame, area: Rect, msg: &str, style: Style) {
    let lines = vec![Line::from(""), Line::from(Span::styled(msg.to_string(), style))];
    let para = Paragraph::new(lines)
        .block(chart_block())
        .wrap(Wrap { trim: true });
    f.render_widget(para, area);
}

/// `(x, y)` points per view row; x is the position of the date in `spec.dates`.
fn series(spec: &ChartSpec) -> Vec<(String, Vec<(f64, f64)>)> {
    spec.view
        .rows()
        .iter()
        .map(|row| {
            let points = spec
                .dates
                .iter()
                .enumerate()
                .filter_map(|(i, d)| row.close_on(*d).map(|p| (i as f64, p)))
                .collect();
            (row.name.clone(), points)
        })
        .collect()
}

fn render_chart(f: &mut Frame, area: Rect, spec: &ChartSpec) {
    let series = series(spec);

    let datasets: Vec<Dataset> = series
        .iter()
        .enumerate()
        .map(|(i, (name, points))| {
            Dataset::default()
                .name(name.as_str())
                .marker(symbols::Marker::Braille)
                .style(Style::default().fg(theme::series_color(i)))
                .graph_type(GraphType::Line)
                .data(points)
        })
        .collect();

    let x_max = spec.dates.len().saturating_sub(1) as f64;
    let x_labels: Vec<Span> = match (spec.dates.first(), spec.dates.last()) {
        (Some(first), Some(last)) if first != last => vec![
            Span::styled(date_label(*first), theme::muted()),
            Span::styled(date_label(*last), theme::muted()),
        ],
        (Some(only), _) => vec![Span::styled(date_label(*only), theme::muted())],
        _ => Vec::new(),
    };

    let y = spec.y_domain;
    // A zero-height domain still needs a drawable axis.
    let y_max = if y.max > y.min { y.max } else { y.min + 1.0 };
    let y_mid = (y.min + y_max) / 2.0;

    let chart = Chart::new(datasets)
        .block(chart_block())
        .x_axis(
            Axis::default()
                .title(Span::styled("Date", theme::muted()))
                .style(theme::muted())
                .bounds([0.0, x_max.max(1.0)])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .title(Span::styled("Price", theme::muted()))
                .style(theme::muted())
                .bounds([y.min, y_max])
                .labels(vec![
                    Span::styled(format!("{:.0}", y.min), theme::muted()),
                    Span::styled(format!("{y_mid:.0}"), theme::muted()),
                    Span::styled(format!("{y_max:.0}"), theme::muted()),
                ]),
        );

    f.render_widget(chart, area);
}
