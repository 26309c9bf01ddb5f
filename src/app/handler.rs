//! Input handling: maps key/mouse events to state mutations.

use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect;

use super::settings::SETTINGS_ITEMS;
use super::state::{ActiveView, AppState};
use crate::config::Action;
use crate::ui::layout::AppLayout;

/// Process a key event, dispatching based on the active view.
pub fn handle_key(state: &mut AppState, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }
    // Ctrl+c always quits, regardless of view.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }

    match state.active_view {
        ActiveView::Page => handle_page_key(state, key),
        ActiveView::SettingsMenu => handle_settings_key(state, key),
    }
}

// ── Page view (configurable bindings) ───────────────────────────

fn handle_page_key(state: &mut AppState, key: KeyEvent) {
    let Some(action) = state.config.match_key(key) else {
        return;
    };

    let step = state.config.scroll_step as f64;
    // Page moves keep two rows of overlap for orientation.
    let page_rows = (state.page.viewport_height() - 2.0).max(1.0);

    match action {
        Action::ScrollUp => state.scroll_by(-step),
        Action::ScrollDown => state.scroll_by(step),
        Action::PageUp => state.scroll_by(-page_rows),
        Action::PageDown => state.scroll_by(page_rows),
        Action::JumpTop => state.scroll_to(0.0),
        Action::JumpBottom => {
            let bottom = state.page.max_scroll();
            state.scroll_to(bottom);
        }
        Action::OpenSettings => {
            state.active_view = ActiveView::SettingsMenu;
            state.settings_selected = 0;
        }
        Action::Quit => state.should_quit = true,
    }
}

// ── Settings menu (hardcoded navigation) ────────────────────────

fn handle_settings_key(state: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => {
            state.settings_selected = state.settings_selected.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if state.settings_selected + 1 < SETTINGS_ITEMS.len() {
                state.settings_selected += 1;
            }
        }
        KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Right | KeyCode::Char('l') => {
            if let Some(item) = SETTINGS_ITEMS.get(state.settings_selected) {
                item.activate(state);
            }
        }
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') | KeyCode::Left | KeyCode::Char('h') => {
            state.active_view = ActiveView::Page;
        }
        _ => {}
    }
}

// ── Mouse ───────────────────────────────────────────────────────

pub fn handle_mouse(state: &mut AppState, mouse: MouseEvent) {
    if state.active_view != ActiveView::Page {
        return;
    }

    let step = state.config.scroll_step as f64;
    match mouse.kind {
        MouseEventKind::ScrollDown => state.scroll_by(step),
        MouseEventKind::ScrollUp => state.scroll_by(-step),
        MouseEventKind::Down(MouseButton::Left) => {
            let layout = AppLayout::from_area(state.terminal_area);
            if !point_in_rect(layout.page_area, mouse.column, mouse.row)
                || !state.page.geometry().intersects_viewport()
            {
                return;
            }
            let transforms = state.drawn_transforms();
            let hit = state
                .stack_geometry()
                .hit_test(&transforms, mouse.column, mouse.row);
            if let Some(index) = hit {
                let total = state.deck().len();
                if let Some(card) = state.deck().get(index) {
                    state.status_message =
                        Some(format!("Card {}/{}: {}", index + 1, total, card.title));
                }
            }
        }
        _ => {}
    }
}

fn point_in_rect(area: Rect, col: u16, row: u16) -> bool {
    col >= area.x && col < area.right() && row >= area.y && row < area.bottom()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::app::state::tests::state;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn arrows_and_pages_scroll() {
        let mut s = state();
        handle_key(&mut s, press(KeyCode::Down));
        assert_eq!(s.page.scroll_offset(), 3.0);
        handle_key(&mut s, press(KeyCode::PageDown));
        assert_eq!(s.page.scroll_offset(), 41.0);
        handle_key(&mut s, press(KeyCode::End));
        assert_eq!(s.page.scroll_offset(), s.page.max_scroll());
        handle_key(&mut s, press(KeyCode::Home));
        assert_eq!(s.page.scroll_offset(), 0.0);
    }

    #[test]
    fn released_keys_are_ignored() {
        let mut s = state();
        let mut key = press(KeyCode::Down);
        key.kind = KeyEventKind::Release;
        handle_key(&mut s, key);
        assert_eq!(s.page.scroll_offset(), 0.0);
    }

    #[test]
    fn ctrl_c_quits_from_settings() {
        let mut s = state();
        handle_key(&mut s, press(KeyCode::Char('?')));
        assert_eq!(s.active_view, ActiveView::SettingsMenu);
        handle_key(&mut s, KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(s.should_quit);
    }

    #[test]
    fn settings_navigation_is_bounded() {
        let mut s = state();
        handle_key(&mut s, press(KeyCode::Char('?')));
        for _ in 0..20 {
            handle_key(&mut s, press(KeyCode::Down));
        }
        assert_eq!(s.settings_selected, SETTINGS_ITEMS.len() - 1);
        handle_key(&mut s, press(KeyCode::Esc));
        assert_eq!(s.active_view, ActiveView::Page);
    }

    #[test]
    fn wheel_scrolls_by_step() {
        let mut s = state();
        handle_mouse(&mut s, mouse(MouseEventKind::ScrollDown, 10, 10));
        handle_mouse(&mut s, mouse(MouseEventKind::ScrollDown, 10, 10));
        handle_mouse(&mut s, mouse(MouseEventKind::ScrollUp, 10, 10));
        assert_eq!(s.page.scroll_offset(), 3.0);
    }

    #[test]
    fn clicking_a_revealed_card_reports_it() {
        let mut s = state();
        s.scroll_to(s.page.hero_height() + s.page.section_height() / 2.0);
        s.frame(Duration::from_secs(2));

        let transforms = s.drawn_transforms();
        let geometry = s.stack_geometry();
        let (index, rect) = (0..transforms.len())
            .rev()
            .find_map(|i| {
                let t = &transforms[i];
                if !t.pointer_interactive {
                    return None;
                }
                geometry.card_rect(t).map(|r| (i, r))
            })
            .unwrap();

        let (col, row) = (rect.x + rect.width / 2, rect.y + rect.height / 2);
        handle_mouse(&mut s, mouse(MouseEventKind::Down(MouseButton::Left), col, row));
        let expected = format!("Card {}/5: card {}", index + 1, index);
        assert_eq!(s.status_message.as_deref(), Some(expected.as_str()));
    }
}
