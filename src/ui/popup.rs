//! Settings popup overlay.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget},
};

use crate::app::settings::SETTINGS_ITEMS;
use crate::app::state::AppState;
use crate::config::Action;

const POPUP_WIDTH: u16 = 48;

/// Settings menu plus a read-only legend of the current key bindings.
pub struct SettingsPopup<'a> {
    pub state: &'a AppState,
    pub selected: usize,
}

impl Widget for SettingsPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // items + legend + blanks + hint + border
        let height = (SETTINGS_ITEMS.len() + Action::ALL.len()) as u16 + 8;
        let popup = centered_fixed(POPUP_WIDTH, height, area);
        Clear.render(popup, buf);

        let block = Block::default()
            .title(" Settings ")
            .title_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray));

        let inner = block.inner(popup);
        block.render(popup, buf);

        let dim = Style::default().fg(Color::DarkGray);
        let inner_width = inner.width as usize;
        let mut lines = vec![Line::raw("")];

        for (i, item) in SETTINGS_ITEMS.iter().enumerate() {
            let is_selected = i == self.selected;
            let (prefix, style) = if is_selected {
                (
                    " ▸ ",
                    Style::default()
                        .fg(Color::White)
                        .bg(Color::DarkGray)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                ("   ", Style::default().fg(Color::White))
            };

            let value = item.value(self.state);
            let value_style = match value.as_str() {
                "ON" => Style::default().fg(Color::Green),
                "OFF" => dim,
                _ => Style::default().fg(Color::Yellow),
            };

            let label_col = format!("{prefix}{:<22}", item.label());
            let value_width = inner_width.saturating_sub(label_col.chars().count()).max(1);
            lines.push(Line::from(vec![
                Span::styled(label_col, style),
                Span::styled(format!("{value:>value_width$}"), value_style),
            ]));
        }

        // ── Key legend ──────────────────────────────────────────
        lines.push(Line::raw(""));
        for &action in Action::ALL {
            let label_col = format!("   {:<22}", action.label());
            let keys_width = inner_width.saturating_sub(label_col.chars().count()).max(1);
            let keys = self.state.config.display_bindings(action);
            lines.push(Line::from(vec![
                Span::styled(label_col, dim),
                Span::styled(format!("{keys:>keys_width$}"), dim),
            ]));
        }

        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(
            "  Enter/Space: change  Esc: close",
            dim,
        )));

        Paragraph::new(lines).render(inner, buf);
    }
}

/// Create a centered rectangle with fixed dimensions, clamped to the available area.
fn centered_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w)) / 2;
    let y = area.y + (area.height.saturating_sub(h)) / 2;
    Rect::new(x, y, w, h)
}
