//! Wide price table for the selected companies, most recent sessions rightmost.

use ratatui::layout::{Constraint, Rect};
use ratatui::style::Modifier;
use ratatui::text::Span;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;

use tickerboard_core::data::{date_label, PriceTable};
use tickerboard_core::ReshapeOutcome;

use crate::app::AppState;
use crate::theme;

const NAME_WIDTH: u16 = 12;
const COLUMN_SPACING: u16 = 1;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(false))
        .title(" Closing prices ")
        .title_style(theme::panel_title(false));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let view = match app.report.as_ref().map(|r| &r.outcome) {
        Some(ReshapeOutcome::Chart(spec)) => &spec.view,
        _ => {
            let msg = Paragraph::new(Span::styled("Nothing to show.", theme::muted()));
            f.render_widget(msg, inner);
            return;
        }
    };

    render_table(f, inner, view);
}

fn render_table(f: &mut Frame, area: Rect, view: &PriceTable) {
    let columns = view.columns();
    let labels: Vec<String> = columns.iter().map(|d| date_label(*d)).collect();
    let col_width = labels.iter().map(|l| l.len()).max().unwrap_or(8) as u16;

    // Keep the most recent columns that fit beside the name column.
    let room = area.width.saturating_sub(NAME_WIDTH);
    let fit = (room / (col_width + COLUMN_SPACING)) as usize;
    let skip = columns.len().saturating_sub(fit);

    let header = Row::new(
        std::iter::once(Cell::from("Company"))
            .chain(labels[skip..].iter().map(|l| Cell::from(l.clone()))),
    )
    .style(theme::neutral().add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = view
        .rows()
        .iter()
        .map(|row| {
            let cells = std::iter::once(Cell::from(row.name.clone()).style(theme::accent()))
                .chain(columns[skip..].iter().map(|date| match row.close_on(*date) {
                    Some(close) => Cell::from(format!("{close:>width$.2}", width = col_width as usize))
                        .style(theme::text()),
                    None => Cell::from(format!("{:>width$}", "-", width = col_width as usize))
                        .style(theme::muted()),
                }));
            Row::new(cells)
        })
        .collect();

    let widths = std::iter::once(Constraint::Length(NAME_WIDTH))
        .chain(std::iter::repeat(Constraint::Length(col_width)).take(columns.len() - skip));

    let table = Table::new(rows, widths).header(header).column_spacing(COLUMN_SPACING);
    f.render_widget(table, area);
}
