//! Scroll progress controller: the single owner of a stack section's
//! reveal state.
//!
//! The state machine is a pure reducer, [`reduce`], over explicit
//! [`ControllerState`]; [`ScrollProgressController`] wraps it with logging
//! and accessors so any event loop (terminal, browser binding, test harness,
//! simulation driver) can drive it with plain calls.
//!
//! Scroll and resize bursts are coalesced: the first event arms a frame, and
//! every further event before that frame runs is dropped.  The frame itself
//! takes one geometry snapshot and recomputes once.

use tracing::{debug, trace};

use super::progress::{active_index, compute_progress, effective_card_count, SectionGeometry};
use super::transform::{compute_transform, CardTransform};
use crate::error::{StackError, StackResult};

/// Default section height, in viewport heights.
pub const DEFAULT_SECTION_HEIGHT_MULTIPLIER: f64 = 3.0;

/// Supplies geometry on demand.  `None` means the host cannot measure the
/// section right now (not laid out, detached); the controller then keeps its
/// last state.
pub trait ViewportSource {
    fn section_geometry(&self) -> Option<SectionGeometry>;
}

/// Inputs the controller reacts to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StackEvent {
    Scroll,
    Resize,
    /// An animation frame fired; carries the geometry snapshot taken for it.
    Frame(Option<SectionGeometry>),
    /// The visibility gate flipped.
    Intersection(bool),
}

/// Whether recomputation is skipped while the section is out of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GatePolicy {
    /// Frames are dropped while the gate reports the section hidden and no
    /// part of it is on screen; re-entering the viewport schedules a resync
    /// frame.  A section the gate calls hidden but that still overlaps the
    /// viewport (inside the bottom margin, or under the threshold) keeps
    /// recomputing, so nothing drawn is ever stale.
    #[default]
    SkipWhileHidden,
    /// Every frame recomputes; the intersection flag is bookkeeping only.
    AlwaysListen,
}

/// What the host should do after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Nothing to do (event dropped or ignored).
    Idle,
    /// Request one animation frame.
    ScheduleFrame,
    /// A frame ran but did not recompute.
    Skipped,
    /// A frame recomputed; `changed` when the active index moved.
    Recomputed { changed: bool },
}

/// Progress and the card it reveals up to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollState {
    pub progress: f64,
    /// `None` only for an empty deck.
    pub active_index: Option<usize>,
}

impl ScrollState {
    pub fn initial(effective_count: usize) -> Self {
        Self {
            progress: 0.0,
            active_index: active_index(0.0, effective_count),
        }
    }
}

/// Everything the reducer reads and writes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerState {
    pub scroll: ScrollState,
    /// A frame has been requested and not yet run.
    pub frame_pending: bool,
    /// Last flag reported by the visibility gate.
    pub intersecting: bool,
    /// Between mount and unmount.
    pub listening: bool,
}

impl ControllerState {
    pub fn new(effective_count: usize) -> Self {
        Self {
            scroll: ScrollState::initial(effective_count),
            frame_pending: false,
            intersecting: false,
            listening: false,
        }
    }
}

/// `(state, event) → (state, effect)`.  `effective_count` must already be
/// capped (see [`effective_card_count`]).
pub fn reduce(
    mut state: ControllerState,
    event: StackEvent,
    effective_count: usize,
    gate: GatePolicy,
) -> (ControllerState, Effect) {
    if !state.listening {
        return (state, Effect::Idle);
    }

    match event {
        StackEvent::Scroll | StackEvent::Resize => {
            if state.frame_pending {
                return (state, Effect::Idle);
            }
            state.frame_pending = true;
            (state, Effect::ScheduleFrame)
        }
        StackEvent::Intersection(now) => {
            let entered = now && !state.intersecting;
            state.intersecting = now;
            if gate == GatePolicy::SkipWhileHidden && entered && !state.frame_pending {
                state.frame_pending = true;
                return (state, Effect::ScheduleFrame);
            }
            (state, Effect::Idle)
        }
        StackEvent::Frame(geom) => {
            if !state.frame_pending {
                return (state, Effect::Idle);
            }
            state.frame_pending = false;
            let Some(geom) = geom else {
                return (state, Effect::Skipped);
            };
            if gate == GatePolicy::SkipWhileHidden
                && !state.intersecting
                && !geom.intersects_viewport()
            {
                return (state, Effect::Skipped);
            }
            let progress = compute_progress(&geom);
            let next = ScrollState {
                progress,
                active_index: active_index(progress, effective_count),
            };
            let changed = next.active_index != state.scroll.active_index;
            state.scroll = next;
            (state, Effect::Recomputed { changed })
        }
    }
}

/// Controller options that shape the host section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerOptions {
    /// Section height in viewport heights; gives the gesture room to walk
    /// through every card.
    pub section_height_multiplier: f64,
    pub gate: GatePolicy,
}

impl ControllerOptions {
    pub fn new(section_height_multiplier: f64, gate: GatePolicy) -> StackResult<Self> {
        if !(section_height_multiplier.is_finite() && section_height_multiplier > 0.0) {
            return Err(StackError::option(
                "section_height_multiplier",
                format!("{section_height_multiplier} is not a positive number"),
            ));
        }
        Ok(Self {
            section_height_multiplier,
            gate,
        })
    }

    /// Synthetic section height for a given viewport.
    pub fn section_height(&self, viewport_height: f64) -> f64 {
        self.section_height_multiplier * viewport_height
    }
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            section_height_multiplier: DEFAULT_SECTION_HEIGHT_MULTIPLIER,
            gate: GatePolicy::default(),
        }
    }
}

/// One controller per mounted stack section.
#[derive(Debug, Clone)]
pub struct ScrollProgressController {
    card_count: usize,
    options: ControllerOptions,
    state: ControllerState,
    recomputations: u64,
}

impl ScrollProgressController {
    pub fn new(card_count: usize, options: ControllerOptions) -> Self {
        let card_count = effective_card_count(card_count);
        Self {
            card_count,
            options,
            state: ControllerState::new(card_count),
            recomputations: 0,
        }
    }

    /// Start listening and request the initial measurement.
    pub fn mount(&mut self) -> Effect {
        self.state.listening = true;
        self.state.frame_pending = true;
        debug!(cards = self.card_count, "stack controller mounted");
        Effect::ScheduleFrame
    }

    /// Stop listening.  A pending frame is released and state is frozen.
    pub fn unmount(&mut self) {
        if self.state.listening {
            debug!(
                pending = self.state.frame_pending,
                "stack controller unmounted"
            );
        }
        self.state.listening = false;
        self.state.frame_pending = false;
    }

    pub fn handle(&mut self, event: StackEvent) -> Effect {
        let section_top = match event {
            StackEvent::Frame(Some(g)) => Some(g.top),
            _ => None,
        };
        let (next, effect) = reduce(self.state, event, self.card_count, self.options.gate);
        self.state = next;

        match effect {
            Effect::Recomputed { changed } => {
                self.recomputations += 1;
                if next.scroll.progress > 0.0 {
                    debug!(
                        progress = next.scroll.progress,
                        active = ?next.scroll.active_index,
                        section_top = ?section_top,
                        changed,
                        "scroll progress"
                    );
                }
            }
            Effect::Skipped => trace!(intersecting = next.intersecting, "frame skipped"),
            Effect::Idle | Effect::ScheduleFrame => {}
        }
        effect
    }

    pub fn on_scroll(&mut self) -> Effect {
        self.handle(StackEvent::Scroll)
    }

    pub fn on_resize(&mut self) -> Effect {
        self.handle(StackEvent::Resize)
    }

    pub fn on_intersection(&mut self, intersecting: bool) -> Effect {
        self.handle(StackEvent::Intersection(intersecting))
    }

    /// Run a frame against a live geometry source.
    pub fn on_frame(&mut self, source: &dyn ViewportSource) -> Effect {
        // Only measure when a frame is actually owed.
        if !self.state.frame_pending {
            return Effect::Idle;
        }
        self.handle(StackEvent::Frame(source.section_geometry()))
    }

    pub fn set_gate_policy(&mut self, gate: GatePolicy) {
        self.options.gate = gate;
    }

    pub fn options(&self) -> &ControllerOptions {
        &self.options
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    pub fn progress(&self) -> f64 {
        self.state.scroll.progress
    }

    pub fn active_index(&self) -> Option<usize> {
        self.state.scroll.active_index
    }

    /// Effective (capped) number of cards.
    pub fn card_count(&self) -> usize {
        self.card_count
    }

    pub fn is_mounted(&self) -> bool {
        self.state.listening
    }

    pub fn is_frame_pending(&self) -> bool {
        self.state.frame_pending
    }

    /// Frames that actually recomputed since construction.
    pub fn recomputations(&self) -> u64 {
        self.recomputations
    }

    /// Transform for one card, `None` past the effective count.
    pub fn transform(&self, index: usize) -> Option<CardTransform> {
        (index < self.card_count).then(|| compute_transform(index, self.active_index()))
    }

    /// One transform per effective card, in index order.
    pub fn transforms(&self) -> Vec<CardTransform> {
        (0..self.card_count)
            .map(|i| compute_transform(i, self.active_index()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Option<SectionGeometry>);

    impl ViewportSource for Fixed {
        fn section_geometry(&self) -> Option<SectionGeometry> {
            self.0
        }
    }

    fn at(top: f64) -> Fixed {
        Fixed(Some(SectionGeometry::new(top, 4000.0, 1000.0)))
    }

    fn always_listening(cards: usize) -> ScrollProgressController {
        let opts = ControllerOptions::new(4.0, GatePolicy::AlwaysListen).unwrap();
        let mut c = ScrollProgressController::new(cards, opts);
        assert_eq!(c.mount(), Effect::ScheduleFrame);
        c
    }

    #[test]
    fn starts_at_zero_with_first_card_active() {
        let c = ScrollProgressController::new(5, ControllerOptions::default());
        assert_eq!(c.progress(), 0.0);
        assert_eq!(c.active_index(), Some(0));
        let t = c.transforms();
        assert!(t[0].visible);
        assert!(t[1..].iter().all(|t| !t.visible));
    }

    #[test]
    fn events_before_mount_are_ignored() {
        let mut c = ScrollProgressController::new(5, ControllerOptions::default());
        assert_eq!(c.on_scroll(), Effect::Idle);
        assert!(!c.is_frame_pending());
    }

    #[test]
    fn burst_of_scrolls_recomputes_once() {
        let mut c = always_listening(5);
        assert_eq!(c.on_frame(&at(0.0)), Effect::Recomputed { changed: false });

        assert_eq!(c.on_scroll(), Effect::ScheduleFrame);
        for _ in 0..50 {
            assert_eq!(c.on_scroll(), Effect::Idle);
            assert_eq!(c.on_resize(), Effect::Idle);
        }
        assert_eq!(c.on_frame(&at(-1500.0)), Effect::Recomputed { changed: true });
        assert_eq!(c.on_frame(&at(-3000.0)), Effect::Idle);
        assert_eq!(c.recomputations(), 2);
        assert_eq!(c.active_index(), Some(2));
    }

    #[test]
    fn halfway_reveals_first_three_cards() {
        let mut c = always_listening(5);
        c.on_frame(&at(-1500.0));
        let t = c.transforms();
        assert!(t[..3].iter().all(|t| t.visible));
        assert!(t[3..].iter().all(|t| !t.visible));
        assert_eq!(t[0].opacity, 0.9);
        assert_eq!(t[1].opacity, 1.0);
        assert_eq!(t[2].opacity, 1.0);
    }

    #[test]
    fn more_than_five_cards_are_capped() {
        let mut c = always_listening(9);
        c.on_frame(&at(-9000.0));
        assert_eq!(c.card_count(), 5);
        assert_eq!(c.active_index(), Some(4));
        assert_eq!(c.transforms().len(), 5);
        assert!(c.transform(5).is_none());
    }

    #[test]
    fn empty_deck_exposes_no_transforms() {
        let mut c = always_listening(0);
        assert_eq!(c.on_frame(&at(-1500.0)), Effect::Recomputed { changed: false });
        assert_eq!(c.active_index(), None);
        assert!(c.transforms().is_empty());
    }

    #[test]
    fn missing_geometry_keeps_last_state() {
        let mut c = always_listening(5);
        c.on_frame(&at(-1500.0));
        c.on_scroll();
        assert_eq!(c.on_frame(&Fixed(None)), Effect::Skipped);
        assert_eq!(c.active_index(), Some(2));
        assert!(!c.is_frame_pending());
    }

    #[test]
    fn unmount_releases_pending_frame_and_freezes() {
        let mut c = always_listening(5);
        c.on_frame(&at(-1500.0));
        c.on_scroll();
        assert!(c.is_frame_pending());
        c.unmount();
        assert!(!c.is_frame_pending());
        assert_eq!(c.on_scroll(), Effect::Idle);
        assert_eq!(c.on_frame(&at(-3900.0)), Effect::Idle);
        assert_eq!(c.active_index(), Some(2));
    }

    #[test]
    fn gated_controller_skips_off_screen_frames() {
        let mut c = ScrollProgressController::new(5, ControllerOptions::default());
        c.mount();
        assert_eq!(c.on_frame(&at(1200.0)), Effect::Skipped);
        assert_eq!(c.active_index(), Some(0));

        // Entering the viewport schedules a resync.
        assert_eq!(c.on_intersection(true), Effect::ScheduleFrame);
        assert_eq!(c.on_frame(&at(-1500.0)), Effect::Recomputed { changed: true });
        assert_eq!(c.active_index(), Some(2));

        c.on_intersection(false);
        c.on_scroll();
        assert_eq!(c.on_frame(&at(-4500.0)), Effect::Skipped);
        assert_eq!(c.active_index(), Some(2));
    }

    #[test]
    fn gated_controller_recomputes_while_hidden_but_on_screen() {
        let mut c = ScrollProgressController::new(5, ControllerOptions::default());
        c.mount();
        c.on_intersection(true);
        c.on_frame(&at(-1500.0));

        // Gate already reports hidden, but 100 units of the section remain
        // at the top of the viewport.
        c.on_intersection(false);
        c.on_scroll();
        assert_eq!(c.on_frame(&at(-3900.0)), Effect::Recomputed { changed: true });
        assert_eq!(c.progress(), 1.0);
        assert_eq!(c.active_index(), Some(4));
    }

    #[test]
    fn always_listen_treats_intersection_as_bookkeeping() {
        let mut c = always_listening(5);
        assert_eq!(c.on_intersection(true), Effect::Idle);
        assert_eq!(c.on_frame(&at(-3000.0)), Effect::Recomputed { changed: true });
        c.on_intersection(false);
        c.on_scroll();
        assert_eq!(c.on_frame(&at(-3000.0)), Effect::Recomputed { changed: false });
    }

    #[test]
    fn reducer_is_pure() {
        let s = ControllerState {
            listening: true,
            frame_pending: true,
            ..ControllerState::new(5)
        };
        let ev = StackEvent::Frame(Some(SectionGeometry::new(-1500.0, 4000.0, 1000.0)));
        let a = reduce(s, ev, 5, GatePolicy::AlwaysListen);
        let b = reduce(s, ev, 5, GatePolicy::AlwaysListen);
        assert_eq!(a, b);
        assert!(s.frame_pending);
    }

    #[test]
    fn options_reject_non_positive_multipliers() {
        assert!(ControllerOptions::new(0.0, GatePolicy::default()).is_err());
        assert!(ControllerOptions::new(f64::NAN, GatePolicy::default()).is_err());
        let opts = ControllerOptions::new(3.0, GatePolicy::default()).unwrap();
        assert_eq!(opts.section_height(800.0), 2400.0);
    }
}
