//! Card transitions with a strong ease-out.
//!
//! When the controller hands out a new target transform, the card starts a
//! fresh transition from wherever it is currently drawn.  Each frame
//! advances the clock; offsets, scale and opacity follow the easing curve,
//! while stacking order and pointer interactivity switch immediately.

use std::time::Duration;

use crate::core::easing::{CubicBezier, CARD_TRANSITION};
use crate::core::transform::CardTransform;

/// Below this opacity a fading card is no longer drawn.
pub const OPACITY_EPSILON: f64 = 0.02;

/// One card's animation from `from` to `to`.
#[derive(Debug, Clone)]
pub struct CardTransition {
    from: CardTransform,
    to: CardTransform,
    elapsed: Duration,
    duration: Duration,
    curve: CubicBezier,
}

impl CardTransition {
    /// A transition that has already arrived at `at`.
    pub fn settled(at: CardTransform, duration: Duration) -> Self {
        Self {
            from: at,
            to: at,
            elapsed: duration,
            duration,
            curve: CARD_TRANSITION,
        }
    }

    /// Start moving toward `to` from the currently drawn transform.
    pub fn retarget(&mut self, to: CardTransform) {
        if to == self.to {
            return;
        }
        self.from = self.current();
        self.to = to;
        self.elapsed = Duration::ZERO;
    }

    /// Advance by one frame.
    pub fn tick(&mut self, dt: Duration) {
        self.elapsed = (self.elapsed + dt).min(self.duration);
    }

    pub fn set_duration(&mut self, duration: Duration) {
        self.duration = duration;
        self.elapsed = self.elapsed.min(duration);
    }

    pub fn is_animating(&self) -> bool {
        self.elapsed < self.duration && self.from != self.to
    }

    pub fn target(&self) -> CardTransform {
        self.to
    }

    /// Transform to draw right now.
    pub fn current(&self) -> CardTransform {
        if !self.is_animating() {
            return self.to;
        }
        let t = self.elapsed.as_secs_f64() / self.duration.as_secs_f64();
        let e = self.curve.apply(t);
        let lerp = |a: f64, b: f64| a + (b - a) * e;

        let opacity = lerp(self.from.opacity, self.to.opacity);
        CardTransform {
            // A card fading out stays drawn until it is actually gone.
            visible: self.to.visible || opacity > OPACITY_EPSILON,
            translate_x: lerp(self.from.translate_x, self.to.translate_x),
            translate_y: lerp(self.from.translate_y, self.to.translate_y),
            scale: lerp(self.from.scale, self.to.scale),
            opacity,
            z_index: self.to.z_index,
            pointer_interactive: self.to.pointer_interactive,
        }
    }
}

/// Transitions for every card in a section, in index order.
#[derive(Debug, Clone, Default)]
pub struct TransitionSet {
    cards: Vec<CardTransition>,
    duration: Duration,
}

impl TransitionSet {
    pub fn new(targets: &[CardTransform], duration: Duration) -> Self {
        Self {
            cards: targets
                .iter()
                .map(|&t| CardTransition::settled(t, duration))
                .collect(),
            duration,
        }
    }

    /// Point every card at its new target.  A change in card count (the
    /// section was remounted with another deck) snaps instead of animating.
    pub fn retarget(&mut self, targets: &[CardTransform]) {
        if targets.len() != self.cards.len() {
            *self = Self::new(targets, self.duration);
            return;
        }
        for (card, &to) in self.cards.iter_mut().zip(targets) {
            card.retarget(to);
        }
    }

    pub fn tick(&mut self, dt: Duration) {
        for card in &mut self.cards {
            card.tick(dt);
        }
    }

    pub fn set_duration(&mut self, duration: Duration) {
        self.duration = duration;
        for card in &mut self.cards {
            card.set_duration(duration);
        }
    }

    pub fn is_animating(&self) -> bool {
        self.cards.iter().any(CardTransition::is_animating)
    }

    pub fn current(&self) -> Vec<CardTransform> {
        self.cards.iter().map(CardTransition::current).collect()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::transform::compute_transform;

    const HALF_SECOND: Duration = Duration::from_millis(500);

    #[test]
    fn starts_at_origin_and_lands_on_target() {
        let hidden = compute_transform(2, Some(0));
        let shown = compute_transform(2, Some(2));
        let mut tr = CardTransition::settled(hidden, HALF_SECOND);
        tr.retarget(shown);
        assert_eq!(tr.current().translate_y, hidden.translate_y);
        assert!(tr.is_animating());

        tr.tick(Duration::from_millis(100));
        let mid = tr.current();
        assert!(mid.translate_y < hidden.translate_y && mid.translate_y > shown.translate_y);
        assert!(mid.pointer_interactive);

        tr.tick(Duration::from_secs(5));
        assert_eq!(tr.current(), shown);
        assert!(!tr.is_animating());
    }

    #[test]
    fn fading_card_stays_drawn_until_transparent() {
        let shown = compute_transform(1, Some(1));
        let hidden = compute_transform(1, Some(0));
        let mut tr = CardTransition::settled(shown, HALF_SECOND);
        tr.retarget(hidden);
        tr.tick(Duration::from_millis(20));
        let c = tr.current();
        assert!(c.visible);
        assert!(!c.pointer_interactive);
        assert!(c.opacity > 0.0 && c.opacity < 1.0);
    }

    #[test]
    fn zero_duration_snaps() {
        let mut tr = CardTransition::settled(compute_transform(0, None), Duration::ZERO);
        let to = compute_transform(0, Some(0));
        tr.retarget(to);
        assert_eq!(tr.current(), to);
    }

    #[test]
    fn set_resizes_on_new_deck() {
        let a: Vec<_> = (0..3).map(|i| compute_transform(i, Some(0))).collect();
        let b: Vec<_> = (0..5).map(|i| compute_transform(i, Some(4))).collect();
        let mut set = TransitionSet::new(&a, HALF_SECOND);
        set.retarget(&b);
        assert_eq!(set.len(), 5);
        assert!(!set.is_animating());
        assert_eq!(set.current(), b);
    }

    #[test]
    fn retarget_mid_flight_starts_from_drawn_position() {
        let a = compute_transform(3, Some(0));
        let b = compute_transform(3, Some(4));
        let mut tr = CardTransition::settled(a, HALF_SECOND);
        tr.retarget(b);
        tr.tick(Duration::from_millis(50));
        let drawn = tr.current();
        tr.retarget(a);
        assert_eq!(tr.current().translate_y, drawn.translate_y);
    }
}
