//! Keyboard input handling.
//!
//! Maps terminal key events to [`App`] actions.  Adding a new keybinding is
//! a single match arm in [`handle_key_event`].
//!
//! ## For contributors
//!
//! To add a new keybinding:
//!
//! 1. Add a method on [`App`] for the action (if one doesn't exist).
//! 2. Add a `KeyCode` match arm in the normal-mode handler that calls it.
//! 3. Update the help text in [`crate::ui`].

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{App, InputMode};
use crate::facets::FacetField;

/// Process a single key event, updating app state accordingly.
///
/// Only reacts to key-press events (ignoring release / repeat) so that each
/// physical keypress triggers exactly one action.
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.quit = true;
        return;
    }

    match app.input_mode {
        InputMode::Normal => handle_normal(app, key),
        InputMode::Search => handle_search(app, key),
    }
}

fn handle_normal(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit = true,
        KeyCode::Char('/') => app.input_mode = InputMode::Search,
        KeyCode::Char('x') => app.clear_search(),
        KeyCode::Char('c') => app.cycle_facet(FacetField::Category),
        KeyCode::Char('p') => app.cycle_facet(FacetField::Priority),
        KeyCode::Char('s') => app.cycle_sort_key(),
        KeyCode::Char('o') => app.toggle_sort_order(),
        KeyCode::Char('n') | KeyCode::PageDown => app.next_page(),
        KeyCode::Char('b') | KeyCode::PageUp => app.prev_page(),
        KeyCode::Char('r') => app.refresh(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Up | KeyCode::Char('k') => app.select_previous(),
        KeyCode::Home | KeyCode::Char('g') => app.select_first(),
        KeyCode::End | KeyCode::Char('G') => app.select_last(),
        _ => {}
    }
}

fn handle_search(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter | KeyCode::Esc => app.input_mode = InputMode::Normal,
        KeyCode::Backspace => app.pop_search_char(),
        KeyCode::Char(c) => app.push_search_char(c),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::PaginationMode;
    use crate::query::{SortKey, SortOrder};

    fn press(app: &mut App, code: KeyCode) {
        handle_key_event(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn search_mode_captures_letters() {
        let mut app = App::new(PaginationMode::Client, 10);
        press(&mut app, KeyCode::Char('/'));
        for c in "qso".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        assert_eq!(app.spec().search, "qso");
        assert!(!app.quit, "q is text while searching");

        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.spec().search, "qs");
        assert_eq!(app.input_mode, InputMode::Normal);

        press(&mut app, KeyCode::Char('x'));
        assert!(app.spec().search.is_empty());
    }

    #[test]
    fn sort_keys() {
        let mut app = App::new(PaginationMode::Client, 10);
        press(&mut app, KeyCode::Char('s'));
        press(&mut app, KeyCode::Char('o'));
        assert_eq!(app.spec().sort_key, SortKey::Title);
        assert_eq!(app.spec().sort_order, SortOrder::Asc);
    }

    #[test]
    fn q_and_ctrl_c_quit() {
        let mut app = App::new(PaginationMode::Client, 10);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.quit);

        let mut app = App::new(PaginationMode::Client, 10);
        app.input_mode = InputMode::Search;
        handle_key_event(&mut app, KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.quit);
    }

    #[test]
    fn release_events_are_ignored() {
        let mut app = App::new(PaginationMode::Client, 10);
        let mut key = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        key.kind = KeyEventKind::Release;
        handle_key_event(&mut app, key);
        assert!(!app.quit);
    }
}
