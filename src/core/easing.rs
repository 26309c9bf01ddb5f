//! CSS-style `cubic-bezier()` timing curves.
//!
//! Renderers use these to ease a card from its old transform to the new
//! one; the progress math never looks at them.

/// A `cubic-bezier(x1, y1, x2, y2)` timing function with fixed endpoints
/// `(0, 0)` and `(1, 1)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
}

/// Strong ease-out used for card transitions.
pub const CARD_TRANSITION: CubicBezier = CubicBezier {
    x1: 0.19,
    y1: 1.0,
    x2: 0.22,
    y2: 1.0,
};

const NEWTON_ITERATIONS: usize = 8;
const BISECTION_ITERATIONS: usize = 32;
const EPSILON: f64 = 1e-7;

impl CubicBezier {
    /// Control-point x values are clamped to `[0, 1]` so the curve stays a
    /// function of time.
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            x1: x1.clamp(0.0, 1.0),
            y1,
            x2: x2.clamp(0.0, 1.0),
            y2,
        }
    }

    fn sample(a1: f64, a2: f64, t: f64) -> f64 {
        // B(t) = 3(1-t)²t·a1 + 3(1-t)t²·a2 + t³
        let u = 1.0 - t;
        3.0 * u * u * t * a1 + 3.0 * u * t * t * a2 + t * t * t
    }

    fn slope(a1: f64, a2: f64, t: f64) -> f64 {
        let u = 1.0 - t;
        3.0 * u * u * a1 + 6.0 * u * t * (a2 - a1) + 3.0 * t * t * (1.0 - a2)
    }

    /// Find the curve parameter whose x equals `x`.
    fn solve_t(&self, x: f64) -> f64 {
        let mut t = x;
        for _ in 0..NEWTON_ITERATIONS {
            let err = Self::sample(self.x1, self.x2, t) - x;
            if err.abs() < EPSILON {
                return t;
            }
            let d = Self::slope(self.x1, self.x2, t);
            if d.abs() < 1e-6 {
                break;
            }
            t -= err / d;
        }

        // Newton stalled on a flat spot; fall back to bisection.
        let (mut lo, mut hi) = (0.0, 1.0);
        t = x;
        for _ in 0..BISECTION_ITERATIONS {
            let sx = Self::sample(self.x1, self.x2, t);
            if (sx - x).abs() < EPSILON {
                break;
            }
            if sx < x {
                lo = t;
            } else {
                hi = t;
            }
            t = (lo + hi) / 2.0;
        }
        t
    }

    /// Eased value for linear time `x ∈ [0, 1]`.
    pub fn apply(&self, x: f64) -> f64 {
        let x = if x.is_finite() { x.clamp(0.0, 1.0) } else { 1.0 };
        if x == 0.0 || x == 1.0 {
            return x;
        }
        Self::sample(self.y1, self.y2, self.solve_t(x))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_stable() {
        assert_eq!(CARD_TRANSITION.apply(0.0), 0.0);
        assert_eq!(CARD_TRANSITION.apply(1.0), 1.0);
        assert_eq!(CARD_TRANSITION.apply(-3.0), 0.0);
        assert_eq!(CARD_TRANSITION.apply(f64::NAN), 1.0);
    }

    #[test]
    fn linear_curve_is_identity() {
        let linear = CubicBezier::new(0.0, 0.0, 1.0, 1.0);
        for step in 1..10 {
            let x = step as f64 / 10.0;
            assert!((linear.apply(x) - x).abs() < 1e-5);
        }
    }

    #[test]
    fn card_transition_front_loads_motion() {
        // Strong ease-out: most of the distance is covered early.
        assert!(CARD_TRANSITION.apply(0.25) > 0.7);
        let a = CARD_TRANSITION.apply(0.2);
        let b = CARD_TRANSITION.apply(0.5);
        let c = CARD_TRANSITION.apply(0.8);
        assert!(a < b && b < c);
    }
}
