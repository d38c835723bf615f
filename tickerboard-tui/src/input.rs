//! Keyboard input dispatch: overlays → global keys → focused control.
//!
//! Handlers only edit `AppState::input`; the event loop runs the cycle.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{AppState, Focus, Overlay};

const DAYS_STEP: u32 = 1;
const DAYS_BIG_STEP: u32 = 10;
const PRICE_STEP: f64 = 50.0;
const PRICE_BIG_STEP: f64 = 500.0;

/// Handle a key event.
pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }

    // 1. Overlays consume input first.
    match app.overlay {
        Overlay::Help => {
            app.overlay = Overlay::None;
            return;
        }
        Overlay::ErrorHistory => {
            handle_error_overlay(app, key);
            return;
        }
        Overlay::None => {}
    }

    // 2. Global keys.
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => {
            app.running = false;
            return;
        }
        KeyCode::Char('?') => {
            app.overlay = Overlay::Help;
            return;
        }
        KeyCode::Char('e') => {
            app.error_scroll = 0;
            app.overlay = Overlay::ErrorHistory;
            return;
        }
        KeyCode::Char('r') => {
            let defaults = app.dashboard.config().default_input();
            app.update_input(defaults);
            return;
        }
        KeyCode::Tab => {
            app.focus = app.focus.next();
            return;
        }
        KeyCode::BackTab => {
            app.focus = app.focus.prev();
            return;
        }
        _ => {}
    }

    // 3. Focused control.
    match app.focus {
        Focus::Days | Focus::RangeMin | Focus::RangeMax => handle_slider_key(app, key),
        Focus::Companies => handle_companies_key(app, key),
    }
}

fn handle_error_overlay(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('e') => {
            app.overlay = Overlay::None;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            if app.error_scroll + 1 < app.error_history.len() {
                app.error_scroll += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.error_scroll = app.error_scroll.saturating_sub(1);
        }
        _ => {}
    }
}

/// -1, 0 or +1 for left/right keys; uppercase or shift means a big step.
fn slider_direction(key: &KeyEvent) -> Option<(i8, bool)> {
    let big = key.modifiers.contains(KeyModifiers::SHIFT);
    match key.code {
        KeyCode::Char('h') | KeyCode::Left => Some((-1, big)),
        KeyCode::Char('l') | KeyCode::Right => Some((1, big)),
        KeyCode::Char('H') => Some((-1, true)),
        KeyCode::Char('L') => Some((1, true)),
        _ => None,
    }
}

fn handle_slider_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            app.focus = app.focus.next();
            return;
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.focus = app.focus.prev();
            return;
        }
        _ => {}
    }

    let Some((dir, big)) = slider_direction(&key) else {
        return;
    };

    let mut input = app.input.clone();
    match app.focus {
        Focus::Days => {
            let step = if big { DAYS_BIG_STEP } else { DAYS_STEP };
            input.days = if dir < 0 {
                input.days.saturating_sub(step)
            } else {
                input.days.saturating_add(step)
            };
        }
        Focus::RangeMin => {
            let step = if big { PRICE_BIG_STEP } else { PRICE_STEP };
            // The min handle cannot pass the max handle.
            input.range.min = (input.range.min + f64::from(dir) * step).min(input.range.max);
        }
        Focus::RangeMax => {
            let step = if big { PRICE_BIG_STEP } else { PRICE_STEP };
            input.range.max = (input.range.max + f64::from(dir) * step).max(input.range.min);
        }
        Focus::Companies => return,
    }
    app.update_input(input);
}

fn handle_companies_key(app: &mut AppState, key: KeyEvent) {
    let options = app.company_options();

    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            if app.company_cursor + 1 < options.len() {
                app.company_cursor += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.company_cursor = app.company_cursor.saturating_sub(1);
        }
        KeyCode::Char(' ') | KeyCode::Enter => {
            let Some(name) = options.get(app.company_cursor) else {
                app.set_warning("No companies available to select");
                return;
            };
            let mut input = app.input.clone();
            input.selection.toggle(name);
            app.update_input(input);
        }
        KeyCode::Char('a') => {
            let mut input = app.input.clone();
            for name in &options {
                input.selection.insert(name.clone());
            }
            app.update_input(input);
        }
        KeyCode::Char('d') => {
            let mut input = app.input.clone();
            input.selection.clear();
            app.update_input(input);
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::offline_app;
    use crossterm::event::KeyEventState;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn ready_app() -> AppState {
        let mut app = offline_app();
        app.refresh();
        app
    }

    #[test]
    fn quit_keys() {
        let mut app = ready_app();
        handle_key(&mut app, press(KeyCode::Char('q')));
        assert!(!app.running);
    }

    #[test]
    fn release_events_are_ignored() {
        let mut app = ready_app();
        let mut key = press(KeyCode::Char('q'));
        key.kind = KeyEventKind::Release;
        handle_key(&mut app, key);
        assert!(app.running);
    }

    #[test]
    fn days_slider_moves_and_clamps() {
        let mut app = ready_app();
        handle_key(&mut app, press(KeyCode::Right));
        assert_eq!(app.input.days, 21);
        assert!(app.dirty);

        for _ in 0..10 {
            handle_key(&mut app, press(KeyCode::Char('L')));
        }
        assert_eq!(app.input.days, 50);

        for _ in 0..10 {
            handle_key(&mut app, press(KeyCode::Char('H')));
        }
        assert_eq!(app.input.days, 1);
    }

    #[test]
    fn range_handles_cannot_cross() {
        let mut app = ready_app();
        handle_key(&mut app, press(KeyCode::Tab)); // RangeMin
        assert_eq!(app.focus, Focus::RangeMin);
        for _ in 0..20 {
            handle_key(&mut app, press(KeyCode::Char('L')));
        }
        assert_eq!(app.input.range.min, 3500.0);
        assert_eq!(app.input.range.max, 3500.0);

        handle_key(&mut app, press(KeyCode::Tab)); // RangeMax
        handle_key(&mut app, press(KeyCode::Left));
        assert_eq!(app.input.range.max, 3500.0);
        assert!(app.input.range.min <= app.input.range.max);
    }

    #[test]
    fn space_toggles_company_under_cursor() {
        let mut app = ready_app();
        app.focus = Focus::Companies;
        // Cursor starts on "apple", which is not in the default selection.
        handle_key(&mut app, press(KeyCode::Char(' ')));
        assert!(app.input.selection.contains("apple"));
        handle_key(&mut app, press(KeyCode::Char(' ')));
        assert!(!app.input.selection.contains("apple"));
    }

    #[test]
    fn select_all_and_clear() {
        let mut app = ready_app();
        app.focus = Focus::Companies;
        handle_key(&mut app, press(KeyCode::Char('a')));
        assert_eq!(app.input.selection.len(), 5);
        handle_key(&mut app, press(KeyCode::Char('d')));
        assert!(app.input.selection.is_empty());
    }

    #[test]
    fn reset_restores_defaults() {
        let mut app = ready_app();
        handle_key(&mut app, press(KeyCode::Right));
        handle_key(&mut app, press(KeyCode::Char('r')));
        assert_eq!(app.input, app.dashboard.config().default_input());
    }

    #[test]
    fn error_overlay_opens_and_closes() {
        let mut app = ready_app();
        handle_key(&mut app, press(KeyCode::Char('e')));
        assert_eq!(app.overlay, Overlay::ErrorHistory);
        handle_key(&mut app, press(KeyCode::Esc));
        assert_eq!(app.overlay, Overlay::None);
        assert!(app.running);
    }
}
