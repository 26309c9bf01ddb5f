//! The scrolling page: hero, sticky card stack, footer.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::Line,
    widgets::Widget,
};

use super::card_stack::{CardStack, StackGeometry};
use super::theme::Theme;
use crate::app::page::Page;
use crate::core::card::CardDeck;
use crate::core::tokens::SizeToken;
use crate::core::transform::CardTransform;

/// Renders the whole page at its current scroll offset.
pub struct PageView<'a> {
    pub page: &'a Page,
    pub deck: &'a CardDeck,
    /// Transforms as currently drawn (mid-transition, not targets).
    pub transforms: &'a [CardTransform],
    pub card_height: SizeToken,
    pub title: &'a str,
}

impl PageView<'_> {
    pub fn stack_geometry(page: &Page, area: Rect, card_height: SizeToken) -> StackGeometry {
        StackGeometry::new(area, page.sticky_top(), card_height)
    }
}

impl Widget for PageView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        // ── hero ───────────────────────────────────────────────
        let hero_top = self.page.hero_top();
        let hero_mid = hero_top + self.page.hero_height() / 2.0;
        put_centered(buf, area, hero_mid - 1.0, self.title, Theme::hero_style());
        let hint = format!("scroll to reveal {} cards", self.deck.len());
        put_centered(buf, area, hero_mid + 1.0, &hint, Theme::muted_style());
        put_centered(
            buf,
            area,
            hero_top + self.page.hero_height() - 2.0,
            "↓",
            Theme::muted_style(),
        );

        // ── stack ──────────────────────────────────────────────
        // Cards live inside the section; none are drawn once it is off screen.
        if self.page.geometry().intersects_viewport() {
            let geometry = Self::stack_geometry(self.page, area, self.card_height);
            CardStack::new(self.deck, self.transforms, geometry).render(area, buf);
        }

        // ── footer ─────────────────────────────────────────────
        let footer_mid = self.page.footer_top() + self.page.footer_height() / 2.0;
        put_centered(buf, area, footer_mid, "· end of page ·", Theme::muted_style());
    }
}

/// Draw `text` centred on page row `y` (viewport-relative) if it is on
/// screen.
fn put_centered(buf: &mut Buffer, area: Rect, y: f64, text: &str, style: Style) {
    let y = y.round();
    if y < 0.0 || y >= area.height as f64 {
        return;
    }
    let width = (text.chars().count() as u16).min(area.width);
    let x = area.x + (area.width - width) / 2;
    buf.set_line(x, area.y + y as u16, &Line::styled(text.to_string(), style), width);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::card::Card;
    use crate::core::transform::compute_transform;

    fn rendered(page: &Page) -> String {
        let deck = CardDeck::new(vec![Card::new("About")]);
        let transforms = vec![compute_transform(0, Some(0))];
        let area = Rect::new(0, 0, 100, 30);
        let mut buf = Buffer::empty(area);
        PageView {
            page,
            deck: &deck,
            transforms: &transforms,
            card_height: SizeToken::default(),
            title: "Portfolio",
        }
        .render(area, &mut buf);
        buf.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn top_of_page_shows_hero_only() {
        let text = rendered(&Page::new(30.0, 3.0));
        assert!(text.contains("Portfolio"));
        assert!(!text.contains("About"));
    }

    #[test]
    fn inside_section_shows_pinned_cards() {
        let mut page = Page::new(30.0, 3.0);
        page.scroll_to(60.0);
        let text = rendered(&page);
        assert!(!text.contains("Portfolio"));
        assert!(text.contains("About"));
    }

    #[test]
    fn bottom_of_page_shows_footer() {
        let mut page = Page::new(30.0, 3.0);
        page.scroll_to(page.max_scroll());
        let text = rendered(&page);
        assert!(text.contains("end of page"));
        assert!(!text.contains("About"));
    }
}
