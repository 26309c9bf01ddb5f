//! Screen regions: the scrolling page above a one-row status bar.

use ratatui::layout::{Constraint, Layout, Rect};

/// Rows reserved for the status bar at the bottom of the screen.
pub const STATUS_BAR_ROWS: u16 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppLayout {
    pub page_area: Rect,
    pub status_area: Rect,
}

impl AppLayout {
    /// Split `area`. A terminal too short for both regions gives every row
    /// to the page and leaves the status bar empty.
    pub fn from_area(area: Rect) -> Self {
        if area.height <= STATUS_BAR_ROWS {
            return Self {
                page_area: area,
                status_area: Rect::new(area.x, area.bottom(), area.width, 0),
            };
        }
        let [page_area, status_area] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(STATUS_BAR_ROWS)]).areas(area);
        Self {
            page_area,
            status_area,
        }
    }

    /// Height of the page viewport in rows, the unit all page geometry uses.
    pub fn viewport_rows(&self) -> f64 {
        f64::from(self.page_area.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_bar_takes_the_last_row() {
        let layout = AppLayout::from_area(Rect::new(0, 0, 80, 24));
        assert_eq!(layout.page_area, Rect::new(0, 0, 80, 23));
        assert_eq!(layout.status_area, Rect::new(0, 23, 80, 1));
        assert_eq!(layout.viewport_rows(), 23.0);
    }

    #[test]
    fn single_row_terminal_is_all_page() {
        let layout = AppLayout::from_area(Rect::new(0, 0, 40, 1));
        assert_eq!(layout.page_area.height, 1);
        assert_eq!(layout.status_area.height, 0);

        let empty = AppLayout::from_area(Rect::new(0, 0, 40, 0));
        assert_eq!(empty.viewport_rows(), 0.0);
    }
}
