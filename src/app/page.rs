//! Page scroll model: hero, stack section, footer.
//!
//! Units are terminal rows.  The page is the geometry source for the stack
//! section: it knows where the section sits relative to the viewport at any
//! scroll offset.

use crate::core::controller::ViewportSource;
use crate::core::progress::SectionGeometry;

/// Vertical layout of the scrolling page.
#[derive(Debug, Clone)]
pub struct Page {
    scroll_offset: f64,
    viewport_height: f64,
    multiplier: f64,
}

impl Page {
    pub fn new(viewport_height: f64, multiplier: f64) -> Self {
        Self {
            scroll_offset: 0.0,
            viewport_height: viewport_height.max(0.0),
            multiplier,
        }
    }

    pub fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    pub fn scroll_offset(&self) -> f64 {
        self.scroll_offset
    }

    /// The hero and footer are one viewport tall each.
    pub fn hero_height(&self) -> f64 {
        self.viewport_height
    }

    pub fn footer_height(&self) -> f64 {
        self.viewport_height
    }

    pub fn section_height(&self) -> f64 {
        self.multiplier * self.viewport_height
    }

    pub fn total_height(&self) -> f64 {
        self.hero_height() + self.section_height() + self.footer_height()
    }

    pub fn max_scroll(&self) -> f64 {
        (self.total_height() - self.viewport_height).max(0.0)
    }

    /// Returns `true` when the offset actually moved.
    pub fn scroll_by(&mut self, delta: f64) -> bool {
        self.scroll_to(self.scroll_offset + delta)
    }

    pub fn scroll_to(&mut self, offset: f64) -> bool {
        let clamped = offset.clamp(0.0, self.max_scroll());
        let moved = clamped != self.scroll_offset;
        self.scroll_offset = clamped;
        moved
    }

    /// New viewport height; the offset is re-clamped to the new page.
    pub fn resize(&mut self, viewport_height: f64) {
        self.viewport_height = viewport_height.max(0.0);
        self.scroll_to(self.scroll_offset);
    }

    pub fn set_multiplier(&mut self, multiplier: f64) {
        self.multiplier = multiplier;
        self.scroll_to(self.scroll_offset);
    }

    /// Viewport-relative top of the hero.
    pub fn hero_top(&self) -> f64 {
        -self.scroll_offset
    }

    /// Viewport-relative top of the footer.
    pub fn footer_top(&self) -> f64 {
        self.geometry().bottom
    }

    pub fn geometry(&self) -> SectionGeometry {
        SectionGeometry::new(
            self.hero_height() - self.scroll_offset,
            self.section_height(),
            self.viewport_height,
        )
    }

    /// Viewport-relative top of the sticky card container: pinned at the
    /// viewport top while the section spans it, otherwise riding along with
    /// the section's top or bottom edge.
    pub fn sticky_top(&self) -> f64 {
        let g = self.geometry();
        g.top.max(0.0).min(g.bottom - self.viewport_height)
    }
}

impl ViewportSource for Page {
    fn section_geometry(&self) -> Option<SectionGeometry> {
        (self.viewport_height > 0.0).then(|| self.geometry())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_hero_section_footer() {
        let page = Page::new(40.0, 3.0);
        assert_eq!(page.section_height(), 120.0);
        assert_eq!(page.total_height(), 200.0);
        assert_eq!(page.max_scroll(), 160.0);
        assert_eq!(page.geometry().top, 40.0);
        assert_eq!(page.footer_top(), 160.0);
    }

    #[test]
    fn scrolling_is_clamped() {
        let mut page = Page::new(40.0, 3.0);
        assert!(!page.scroll_by(-5.0));
        assert!(page.scroll_by(500.0));
        assert_eq!(page.scroll_offset(), 160.0);
        assert!(!page.scroll_by(1.0));
    }

    #[test]
    fn sticky_container_pins_inside_section() {
        let mut page = Page::new(40.0, 3.0);
        // Section below the fold: container rides its top edge.
        assert_eq!(page.sticky_top(), 40.0);
        page.scroll_to(90.0);
        assert_eq!(page.sticky_top(), 0.0);
        // Past the section: container rides the bottom edge upward.
        page.scroll_to(150.0);
        assert_eq!(page.sticky_top(), -30.0);
    }

    #[test]
    fn resize_reclamps_offset() {
        let mut page = Page::new(40.0, 3.0);
        page.scroll_to(160.0);
        page.resize(20.0);
        assert_eq!(page.scroll_offset(), 80.0);
    }

    #[test]
    fn zero_height_viewport_has_no_geometry() {
        assert!(Page::new(0.0, 3.0).section_geometry().is_none());
        assert!(Page::new(10.0, 3.0).section_geometry().is_some());
    }
}
