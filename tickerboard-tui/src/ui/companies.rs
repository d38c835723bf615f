//! Company multiselect: one checkbox line per fetched row.

use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::app::{AppState, Focus};
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let active = app.focus == Focus::Companies;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(active))
        .title(format!(" Companies ({} selected) ", app.input.selection.len()))
        .title_style(theme::panel_title(active));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let options = app.company_options();
    if options.is_empty() {
        let msg = Paragraph::new(Span::styled("No companies loaded.", theme::muted()));
        f.render_widget(msg, inner);
        return;
    }

    let lines: Vec<Line> = options
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let selected = app.input.selection.contains(name);
            let under_cursor = active && i == app.company_cursor;
            let check = if selected { "[x] " } else { "[ ] " };
            let mut style = if selected {
                theme::positive()
            } else {
                theme::muted()
            };
            if under_cursor {
                style = style.add_modifier(Modifier::REVERSED);
            }
            let symbol = app
                .dashboard
                .config()
                .registry
                .symbol_for(name)
                .unwrap_or_default();
            Line::from(vec![
                Span::raw(" "),
                Span::styled(format!("{check}{name}"), style),
                Span::styled(format!("  {symbol}"), theme::muted()),
            ])
        })
        .collect();

    f.render_widget(Paragraph::new(lines), inner);
}
