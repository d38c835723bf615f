//! Left sidebar: the window-length slider and the two-handle price range.

use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::app::{AppState, Focus};
use crate::theme;
use crate::ui::widgets::slider::{render_range_inline, render_slider_inline};

const BAR_WIDTH: usize = 20;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let active = app.focus != Focus::Companies;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(active))
        .title(" Controls ")
        .title_style(theme::panel_title(active));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let config = app.dashboard.config();
    let days = config.days;
    let price = config.price;
    let range = app.input.range;

    let mut lines: Vec<Line> = Vec::new();

    lines.push(label_line("Days", app.focus == Focus::Days));
    lines.push(Line::from(vec![
        Span::raw(" "),
        Span::styled(
            render_slider_inline(
                f64::from(app.input.days),
                f64::from(days.min),
                f64::from(days.max),
                BAR_WIDTH,
            ),
            bar_style(app.focus == Focus::Days),
        ),
        Span::styled(format!(" {}", app.input.days), theme::text()),
    ]));
    lines.push(Line::from(Span::styled(
        format!(" {}..{}", days.min, days.max),
        theme::muted(),
    )));
    lines.push(Line::from(""));

    let range_focused = matches!(app.focus, Focus::RangeMin | Focus::RangeMax);
    lines.push(label_line("Price range", range_focused));
    lines.push(Line::from(vec![
        Span::raw(" "),
        Span::styled(
            render_range_inline(range.min, range.max, price.min, price.max, BAR_WIDTH),
            bar_style(range_focused),
        ),
    ]));
    lines.push(Line::from(vec![
        Span::raw(" "),
        Span::styled(
            format!("min {:.0}", range.min),
            handle_style(app.focus == Focus::RangeMin),
        ),
        Span::raw("  "),
        Span::styled(
            format!("max {:.0}", range.max),
            handle_style(app.focus == Focus::RangeMax),
        ),
    ]));
    lines.push(Line::from(""));

    let stats = app.dashboard.fetcher().cache_stats();
    lines.push(Line::from(Span::styled(
        format!(
            " cache: {} entries, {} hits / {} misses",
            stats.entries, stats.hits, stats.misses
        ),
        theme::muted(),
    )));

    f.render_widget(Paragraph::new(lines), inner);
}

fn label_line(label: &str, focused: bool) -> Line<'static> {
    let marker = if focused { "> " } else { "  " };
    Line::from(Span::styled(
        format!("{marker}{label}"),
        if focused {
            theme::accent_bold()
        } else {
            theme::neutral()
        },
    ))
}

fn bar_style(focused: bool) -> ratatui::style::Style {
    if focused {
        theme::accent()
    } else {
        theme::muted()
    }
}

fn handle_style(focused: bool) -> ratatui::style::Style {
    if focused {
        theme::accent().add_modifier(Modifier::REVERSED)
    } else {
        theme::text()
    }
}
