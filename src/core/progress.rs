//! Scroll geometry → normalized progress → active card index.
//!
//! All inputs are a single geometry snapshot taken at frame time.  The
//! functions here are pure: they never mutate the snapshot and always return
//! a finite value, whatever the geometry looks like.

/// Hard cap on how many cards a stack section considers.
pub const MAX_CARDS: usize = 5;

/// Section bounding box relative to the viewport, plus viewport height.
///
/// `bottom` is carried separately from `height` because hosts report them
/// independently (bounding rect vs. layout height); the progress math
/// consults each where the host would.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionGeometry {
    /// Top edge of the section, relative to the viewport top (negative once
    /// scrolled above it).
    pub top: f64,
    /// Bottom edge of the section, relative to the viewport top.
    pub bottom: f64,
    /// Layout height of the section.
    pub height: f64,
    /// Height of the viewport.
    pub viewport_height: f64,
}

impl SectionGeometry {
    /// Build a snapshot from the section's top edge and layout height.
    pub fn new(top: f64, height: f64, viewport_height: f64) -> Self {
        Self {
            top,
            bottom: top + height,
            height,
            viewport_height,
        }
    }

    /// True when any part of the section overlaps the viewport.
    pub fn intersects_viewport(&self) -> bool {
        self.bottom > 0.0 && self.top < self.viewport_height
    }
}

/// Number of cards that take part in the math: `min(card_count, 5)`.
pub fn effective_card_count(card_count: usize) -> usize {
    card_count.min(MAX_CARDS)
}

/// Fraction of the section's scrollable extent consumed, in `[0, 1]`.
///
/// 1. Section bottom at or above the viewport top → `1`.
/// 2. Section not yet reached (`top >= viewport_height`) → `0`.
/// 3. Otherwise `max(0, -top) / (height - viewport_height)`, clamped.
///
/// A section no taller than the viewport has no scrollable extent; it
/// resolves to `1`, as does any ratio that comes out non-finite.
pub fn compute_progress(geom: &SectionGeometry) -> f64 {
    if geom.bottom <= 0.0 {
        return 1.0;
    }
    if geom.top >= geom.viewport_height {
        return 0.0;
    }

    let scrolled = (-geom.top).max(0.0);
    let total = geom.height - geom.viewport_height;
    if !(total > 0.0) {
        return 1.0;
    }

    let ratio = scrolled / total;
    if !ratio.is_finite() {
        return 1.0;
    }
    ratio.clamp(0.0, 1.0)
}

/// `floor(progress × count)` clamped to `[0, count - 1]`.
///
/// `None` for an empty deck.  Non-finite progress is treated as `0`.
pub fn active_index(progress: f64, effective_count: usize) -> Option<usize> {
    if effective_count == 0 {
        return None;
    }
    let progress = if progress.is_finite() {
        progress.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let raw = (progress * effective_count as f64).floor() as usize;
    Some(raw.min(effective_count - 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geom(top: f64) -> SectionGeometry {
        SectionGeometry::new(top, 4000.0, 1000.0)
    }

    #[test]
    fn tenth_of_the_way_keeps_first_card() {
        let g = geom(-300.0);
        let p = compute_progress(&g);
        assert!((p - 0.1).abs() < 1e-12);
        assert_eq!(active_index(p, 5), Some(0));
    }

    #[test]
    fn halfway_reveals_three_cards() {
        let p = compute_progress(&geom(-1500.0));
        assert!((p - 0.5).abs() < 1e-12);
        assert_eq!(active_index(p, 5), Some(2));
    }

    #[test]
    fn scrolled_past_is_complete_regardless_of_other_fields() {
        let g = SectionGeometry {
            top: 250.0,
            bottom: 0.0,
            height: 10.0,
            viewport_height: 0.0,
        };
        assert_eq!(compute_progress(&g), 1.0);
    }

    #[test]
    fn below_viewport_is_zero() {
        assert_eq!(compute_progress(&geom(1000.0)), 0.0);
        assert_eq!(compute_progress(&geom(1200.0)), 0.0);
    }

    #[test]
    fn entering_from_below_is_zero() {
        assert_eq!(compute_progress(&geom(400.0)), 0.0);
    }

    #[test]
    fn short_section_resolves_to_finite_one() {
        for height in [0.0, 500.0, 1000.0] {
            let p = compute_progress(&SectionGeometry::new(-10.0, height, 1000.0));
            assert!(p.is_finite());
            assert_eq!(p, 1.0);
        }
    }

    #[test]
    fn nan_geometry_stays_finite() {
        let g = SectionGeometry::new(f64::NAN, f64::NAN, 1000.0);
        let p = compute_progress(&g);
        assert!((0.0..=1.0).contains(&p));
    }

    #[test]
    fn active_index_is_monotonic_and_saturates() {
        for count in 1..=MAX_CARDS {
            let mut last = 0;
            for step in 0..=1000 {
                let p = step as f64 / 1000.0;
                let idx = active_index(p, count).unwrap();
                assert!(idx >= last);
                assert!(idx < count);
                last = idx;
            }
            assert_eq!(active_index(1.0, count), Some(count - 1));
            assert_eq!(active_index(0.0, count), Some(0));
        }
    }

    #[test]
    fn empty_deck_has_no_active_index() {
        assert_eq!(active_index(0.7, 0), None);
    }

    #[test]
    fn effective_count_caps_at_five() {
        assert_eq!(effective_card_count(0), 0);
        assert_eq!(effective_card_count(3), 3);
        assert_eq!(effective_card_count(5), 5);
        assert_eq!(effective_card_count(12), 5);
    }
}
