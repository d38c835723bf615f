//! Top-level UI layout: controls sidebar, main view and status bar.

pub mod chart_panel;
pub mod companies;
pub mod overlays;
pub mod sidebar;
pub mod status_bar;
pub mod table_panel;
pub mod widgets;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use tickerboard_core::data::HistoryProvider;

use crate::app::{AppState, Overlay};
use crate::theme;

const SIDEBAR_WIDTH: u16 = 32;

/// Draw the entire UI.
pub fn draw(f: &mut Frame, app: &AppState) {
    // Split: main area + 1-line status bar.
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(f.area());

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(20)])
        .split(chunks[0]);

    sidebar::render(f, body[0], app);
    draw_main(f, body[1], app);
    status_bar::render(f, chunks[1], app);

    // Draw overlays on top.
    match app.overlay {
        Overlay::Help => overlays::render_help(f, chunks[0]),
        Overlay::ErrorHistory => overlays::render_error_history(f, chunks[0], app),
        Overlay::None => {}
    }
}

fn draw_main(f: &mut Frame, area: Rect, app: &AppState) {
    let companies_height = app.company_options().len().max(1) as u16 + 2;
    let table_height = app
        .report
        .as_ref()
        .map_or(0, |r| r.table().len())
        .max(1) as u16
        + 4;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(companies_height),
            Constraint::Length(table_height),
            Constraint::Min(8),
        ])
        .split(area);

    let header = Line::from(vec![
        Span::styled(format!(" Past {} days", app.input.days), theme::accent_bold()),
        Span::styled(
            format!("  via {}", app.dashboard.fetcher().provider().name()),
            theme::muted(),
        ),
    ]);
    f.render_widget(Paragraph::new(header), chunks[0]);

    companies::render(f, chunks[1], app);
    table_panel::render(f, chunks[2], app);
    chart_panel::render(f, chunks[3], app);
}

/// Compute a centered rect for overlays.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
pub(crate) fn render_to_string(app: &AppState, width: u16, height: u16) -> String {
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
    terminal.draw(|f| draw(f, app)).unwrap();
    let buffer = terminal.backend().buffer();
    let mut out = String::new();
    for y in 0..height {
        for x in 0..width {
            out.push_str(buffer[(x, y)].symbol());
        }
        out.push('\n');
    }
    out
}
