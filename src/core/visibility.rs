//! Intersection gate: decides whether the stack section is "in view".
//!
//! Mirrors a browser intersection observer with a shrunken root: the bottom
//! 20% of the viewport does not count, so a section only counts as visible
//! once it has climbed a little way up the screen.

use super::progress::SectionGeometry;
use crate::error::{StackError, StackResult};

/// Share of the viewport height trimmed from the bottom of the root box.
pub const ROOT_MARGIN_BOTTOM: f64 = 0.2;

/// Default visible share needed before a section counts as intersecting.
pub const DEFAULT_THRESHOLD: f64 = 0.1;

/// Tracks the intersecting flag for one section and reports flips.
#[derive(Debug, Clone)]
pub struct VisibilityGate {
    threshold: f64,
    intersecting: bool,
}

impl VisibilityGate {
    pub fn new(threshold: f64) -> StackResult<Self> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(StackError::option(
                "intersection_threshold",
                format!("{threshold} is outside [0, 1]"),
            ));
        }
        Ok(Self {
            threshold,
            intersecting: false,
        })
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn is_intersecting(&self) -> bool {
        self.intersecting
    }

    /// Feed a geometry snapshot.  Returns `Some(flag)` only when the
    /// intersecting state changed.
    pub fn observe(&mut self, geom: &SectionGeometry) -> Option<bool> {
        let now = intersects(geom, self.threshold);
        if now == self.intersecting {
            return None;
        }
        self.intersecting = now;
        Some(now)
    }
}

/// Share of the section's height inside the margin-trimmed root box.
pub fn visible_ratio(geom: &SectionGeometry) -> f64 {
    if !(geom.height > 0.0) {
        return 0.0;
    }
    let root_bottom = geom.viewport_height * (1.0 - ROOT_MARGIN_BOTTOM);
    let overlap = geom.bottom.min(root_bottom) - geom.top.max(0.0);
    if !(overlap > 0.0) {
        return 0.0;
    }
    (overlap / geom.height).clamp(0.0, 1.0)
}

/// A section taller than the root box can never be fully visible, so the
/// threshold is capped at the largest share it can actually reach.
fn intersects(geom: &SectionGeometry, threshold: f64) -> bool {
    let ratio = visible_ratio(geom);
    if ratio <= 0.0 {
        return false;
    }
    let root_height = geom.viewport_height * (1.0 - ROOT_MARGIN_BOTTOM);
    let reachable = (root_height / geom.height).clamp(0.0, 1.0);
    ratio >= threshold.min(reachable)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tall(top: f64) -> SectionGeometry {
        SectionGeometry::new(top, 3000.0, 1000.0)
    }

    #[test]
    fn rejects_thresholds_outside_unit_range() {
        assert!(VisibilityGate::new(-0.1).is_err());
        assert!(VisibilityGate::new(1.5).is_err());
        assert!(VisibilityGate::new(0.1).is_ok());
    }

    #[test]
    fn bottom_margin_is_excluded() {
        // Top edge inside the trimmed strip: nothing visible yet.
        assert_eq!(visible_ratio(&tall(850.0)), 0.0);
        assert!(visible_ratio(&tall(500.0)) > 0.0);
    }

    #[test]
    fn reports_only_flips() {
        let mut gate = VisibilityGate::new(DEFAULT_THRESHOLD).unwrap();
        assert_eq!(gate.observe(&tall(2000.0)), None);
        assert_eq!(gate.observe(&tall(-500.0)), Some(true));
        assert_eq!(gate.observe(&tall(-600.0)), None);
        assert_eq!(gate.observe(&tall(-5000.0)), Some(false));
        assert!(!gate.is_intersecting());
    }

    #[test]
    fn very_tall_sections_still_intersect() {
        // 10 viewports tall: at most 8% can ever be inside the root box.
        let geom = SectionGeometry::new(-2000.0, 10_000.0, 1000.0);
        let mut gate = VisibilityGate::new(0.5).unwrap();
        assert_eq!(gate.observe(&geom), Some(true));
    }

    #[test]
    fn zero_height_section_is_never_visible() {
        let mut gate = VisibilityGate::new(0.0).unwrap();
        assert_eq!(gate.observe(&SectionGeometry::new(100.0, 0.0, 1000.0)), None);
    }
}
