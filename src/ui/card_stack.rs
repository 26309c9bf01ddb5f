//! Card renderer: paints a stack section's cards from their transforms.
//!
//! Transforms are expressed in pixels; the renderer maps them onto terminal
//! cells with a fixed pixel-per-cell ratio, lays every card over a centred
//! container inside the sticky viewport, and paints in ascending stacking
//! order so later cards cover earlier ones.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget, Wrap},
};

use super::theme::Theme;
use super::transition::OPACITY_EPSILON;
use crate::core::card::{Card, CardDeck};
use crate::core::tokens::SizeToken;
use crate::core::transform::CardTransform;

/// Pixels per terminal row.
pub const PX_PER_ROW: f64 = 15.0;
/// Pixels per terminal column.
pub const PX_PER_COL: f64 = 8.0;

const CONTAINER_MAX_WIDTH_PX: f64 = 1024.0;
const CONTAINER_PADDING_COLS: f64 = 4.0;
/// Cards are centred, then nudged left so the rightward fan stays centred.
const CARD_SHIFT_LEFT_PX: f64 = 80.0;

// ───────────────────────────────────────── geometry ──────────

/// Screen placement of one stack section.
#[derive(Debug, Clone, Copy)]
pub struct StackGeometry {
    /// Visible page area; everything is clipped to it.
    pub clip: Rect,
    /// Top of the sticky container, in rows relative to `clip.y`.  Negative
    /// when the container is partly scrolled off the top.
    pub sticky_top: f64,
    /// Card height in rows before scaling.
    pub card_rows: f64,
}

impl StackGeometry {
    pub fn new(clip: Rect, sticky_top: f64, card_height: SizeToken) -> Self {
        let viewport_px = clip.height as f64 * PX_PER_ROW;
        Self {
            clip,
            sticky_top,
            card_rows: card_height.resolve(viewport_px) / PX_PER_ROW,
        }
    }

    /// Container box `(x, y, w, h)` in fractional cells.
    fn container(&self) -> (f64, f64, f64, f64) {
        let clip_w = self.clip.width as f64;
        let w = (clip_w - 2.0 * CONTAINER_PADDING_COLS)
            .min(CONTAINER_MAX_WIDTH_PX / PX_PER_COL)
            .max(0.0);
        let x = self.clip.x as f64 + (clip_w - w) / 2.0;
        let y = self.clip.y as f64
            + self.sticky_top
            + (self.clip.height as f64 - self.card_rows) / 2.0;
        (x, y, w, self.card_rows)
    }

    /// On-screen rectangle of a card, clipped; `None` when fully off screen.
    pub fn card_rect(&self, t: &CardTransform) -> Option<Rect> {
        let (x, y, w, h) = self.container();
        let cx = x + w / 2.0 + (t.translate_x - CARD_SHIFT_LEFT_PX) / PX_PER_COL;
        let cy = y + h / 2.0 + t.translate_y / PX_PER_ROW;
        let (sw, sh) = (w * t.scale, h * t.scale);
        clip_rect(cx - sw / 2.0, cy - sh / 2.0, sw, sh, self.clip)
    }

    /// Topmost pointer-interactive card under `(col, row)`.
    pub fn hit_test(&self, transforms: &[CardTransform], col: u16, row: u16) -> Option<usize> {
        let mut order: Vec<usize> = (0..transforms.len()).collect();
        order.sort_by_key(|&i| std::cmp::Reverse(transforms[i].z_index));
        order.into_iter().find(|&i| {
            let t = &transforms[i];
            t.pointer_interactive
                && self.card_rect(t).is_some_and(|r| {
                    col >= r.x && col < r.right() && row >= r.y && row < r.bottom()
                })
        })
    }
}

fn clip_rect(x: f64, y: f64, w: f64, h: f64, clip: Rect) -> Option<Rect> {
    let left = x.round().max(clip.x as f64);
    let top = y.round().max(clip.y as f64);
    let right = (x + w).round().min(clip.right() as f64);
    let bottom = (y + h).round().min(clip.bottom() as f64);
    if !(right - left >= 1.0 && bottom - top >= 1.0) {
        return None;
    }
    Some(Rect::new(
        left as u16,
        top as u16,
        (right - left) as u16,
        (bottom - top) as u16,
    ))
}

// ───────────────────────────────────────── widget ────────────

/// Paints every drawable card of a deck.
pub struct CardStack<'a> {
    deck: &'a CardDeck,
    transforms: &'a [CardTransform],
    geometry: StackGeometry,
}

impl<'a> CardStack<'a> {
    pub fn new(deck: &'a CardDeck, transforms: &'a [CardTransform], geometry: StackGeometry) -> Self {
        Self {
            deck,
            transforms,
            geometry,
        }
    }
}

impl Widget for CardStack<'_> {
    fn render(self, _area: Rect, buf: &mut Buffer) {
        let count = self.transforms.len().min(self.deck.len());
        let mut order: Vec<usize> = (0..count).collect();
        order.sort_by_key(|&i| self.transforms[i].z_index);

        for i in order {
            let t = &self.transforms[i];
            if !t.visible || t.opacity <= OPACITY_EPSILON {
                continue;
            }
            let (Some(card), Some(rect)) = (self.deck.get(i), self.geometry.card_rect(t)) else {
                continue;
            };
            let background = Theme::card_background(self.deck.background_for(i));
            let mut base = Style::default().bg(background);
            if t.opacity < 1.0 {
                base = base.add_modifier(Modifier::DIM);
            }
            render_card(card, base, rect, buf);
        }
    }
}

fn render_card(card: &Card, base: Style, area: Rect, buf: &mut Buffer) {
    Clear.render(area, buf);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(base.patch(Theme::card_border_style()))
        .style(base);
    let inner = block.inner(area);
    block.render(area, buf);

    if let Some(badge) = &card.badge {
        let label = format!(" {badge} ");
        let width = label.chars().count() as u16;
        if area.width > width + 4 {
            buf.set_string(area.right() - width - 2, area.y, &label, Theme::badge_style());
        }
    }

    let lines: Vec<Line> = match &card.content {
        Some(content) => content
            .lines()
            .map(|l| Line::styled(l.to_string(), Theme::card_subtitle_style()))
            .collect(),
        None => {
            let mut lines = vec![Line::styled(card.title.clone(), Theme::card_title_style())];
            if let Some(sub) = &card.subtitle {
                lines.push(Line::raw(""));
                lines.push(Line::styled(sub.clone(), Theme::card_subtitle_style()));
            }
            lines
        }
    };

    // Body text is vertically centred with a little side padding.
    let body_width = inner.width.saturating_sub(4);
    if body_width == 0 || inner.height == 0 {
        return;
    }
    let text_height = (lines.len() as u16).min(inner.height);
    let body = Rect::new(
        inner.x + 2,
        inner.y + (inner.height - text_height) / 2,
        body_width,
        inner.height - (inner.height - text_height) / 2,
    );
    Paragraph::new(lines)
        .style(base)
        .wrap(Wrap { trim: true })
        .render(body, buf);
}
