//! Per-card layout transform derived from the active index.

use std::fmt;

const HIDDEN_TRANSLATE_Y: f64 = 100.0;
const BASE_SCALE: f64 = 0.9;
const SCALE_STEP: f64 = 0.05;
const BASE_TRANSLATE_Y: f64 = 90.0;
const TRANSLATE_Y_STEP: f64 = 20.0;
const TRANSLATE_X_STEP: f64 = 40.0;
const BASE_Z: i32 = 10;
const Z_STEP: i32 = 10;
/// The first card sits slightly translucent as a visual accent.
const FIRST_CARD_OPACITY: f64 = 0.9;

/// Visual placement parameters for one card at one point in time.
/// Offsets are in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardTransform {
    pub visible: bool,
    pub translate_x: f64,
    pub translate_y: f64,
    pub scale: f64,
    pub opacity: f64,
    pub z_index: i32,
    pub pointer_interactive: bool,
}

/// Transform for card `index` given the current active index.
///
/// Pure: the same inputs always give the same output.  `active_index` of
/// `None` (empty or not-yet-computed deck) hides every card.
pub fn compute_transform(index: usize, active_index: Option<usize>) -> CardTransform {
    let visible = active_index.is_some_and(|active| active >= index);
    let i = index as f64;
    let scale = BASE_SCALE + i * SCALE_STEP;
    let z_index = BASE_Z + (index as i32) * Z_STEP;

    if visible {
        CardTransform {
            visible,
            translate_x: i * TRANSLATE_X_STEP,
            translate_y: BASE_TRANSLATE_Y - i * TRANSLATE_Y_STEP,
            scale,
            opacity: if index == 0 { FIRST_CARD_OPACITY } else { 1.0 },
            z_index,
            pointer_interactive: true,
        }
    } else {
        CardTransform {
            visible,
            translate_x: 0.0,
            translate_y: HIDDEN_TRANSLATE_Y,
            scale,
            opacity: 0.0,
            z_index,
            pointer_interactive: false,
        }
    }
}

/// Renders the CSS `transform` value a web renderer would apply.
impl fmt::Display for CardTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "translateY({}px) translateX({}px) scale({})",
            self.translate_y, self.translate_x, self.scale
        )
    }
}
