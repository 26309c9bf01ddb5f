//! Colour palette and text styles used across the UI.

use ratatui::style::{Color, Modifier, Style};

/// Central theme: change colours here and they propagate everywhere.
pub struct Theme;

impl Theme {
    // ── cards ──────────────────────────────────────────────────

    /// Map a card background reference to a terminal colour.  Accepts the
    /// palette names below or `#rrggbb`.
    pub fn card_background(name: &str) -> Color {
        match name.trim().to_lowercase().as_str() {
            "indigo" => Color::Rgb(49, 46, 129),
            "teal" => Color::Rgb(17, 94, 89),
            "crimson" => Color::Rgb(127, 29, 29),
            "gold" => Color::Rgb(133, 77, 14),
            "blue" => Color::Rgb(30, 64, 175),
            "green" => Color::Rgb(22, 101, 52),
            "purple" => Color::Rgb(88, 28, 135),
            "slate" => Color::Rgb(51, 65, 85),
            hex => parse_hex(hex).unwrap_or(Color::DarkGray),
        }
    }

    pub fn card_title_style() -> Style {
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    }

    pub fn card_subtitle_style() -> Style {
        Style::default().fg(Color::Gray)
    }

    pub fn card_border_style() -> Style {
        Style::default().fg(Color::Gray)
    }

    pub fn badge_style() -> Style {
        Style::default()
            .fg(Color::Black)
            .bg(Color::White)
            .add_modifier(Modifier::BOLD)
    }

    // ── page ───────────────────────────────────────────────────
    pub fn hero_style() -> Style {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    }

    pub fn muted_style() -> Style {
        Style::default().fg(Color::DarkGray)
    }

    // ── chrome ─────────────────────────────────────────────────
    pub fn status_bar_style() -> Style {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    }

    pub fn progress_style() -> Style {
        Style::default().fg(Color::Yellow)
    }
}

fn parse_hex(s: &str) -> Option<Color> {
    let hex = s.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?))
}
