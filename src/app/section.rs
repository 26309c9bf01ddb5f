//! A mounted stack section: deck + controller + visibility gate + the
//! listeners it holds.
//!
//! Mounting subscribes to scroll, resize and intersection and schedules the
//! initial measurement.  Dropping the section unmounts the controller and
//! releases every subscription, even with a frame still pending.

use tracing::debug;

use super::subscription::{Channel, ListenerRegistry, Subscription};
use crate::core::card::CardDeck;
use crate::core::controller::{ControllerOptions, Effect, ScrollProgressController, ViewportSource};
use crate::core::transform::CardTransform;
use crate::core::visibility::VisibilityGate;
use crate::error::StackResult;

pub struct StackSection {
    deck: CardDeck,
    controller: ScrollProgressController,
    gate: VisibilityGate,
    subscriptions: Vec<Subscription>,
}

impl StackSection {
    /// Mount a section.  The returned effect is the initial frame request.
    pub fn mount(
        deck: CardDeck,
        options: ControllerOptions,
        intersection_threshold: f64,
        registry: &ListenerRegistry,
    ) -> StackResult<(Self, Effect)> {
        let gate = VisibilityGate::new(intersection_threshold)?;
        let mut controller = ScrollProgressController::new(deck.len(), options);
        let effect = controller.mount();
        let subscriptions = [Channel::Scroll, Channel::Resize, Channel::Intersection]
            .into_iter()
            .map(|c| registry.subscribe(c))
            .collect();

        Ok((
            Self {
                deck,
                controller,
                gate,
                subscriptions,
            },
            effect,
        ))
    }

    pub fn on_scroll(&mut self) -> Effect {
        self.controller.on_scroll()
    }

    pub fn on_resize(&mut self) -> Effect {
        self.controller.on_resize()
    }

    /// One animation frame: update the gate first so a section that just
    /// came into view recomputes in the same frame.
    pub fn on_frame(&mut self, source: &dyn ViewportSource) -> Effect {
        if let Some(geom) = source.section_geometry() {
            if let Some(flag) = self.gate.observe(&geom) {
                debug!(intersecting = flag, "stack visibility changed");
                self.controller.on_intersection(flag);
            }
        }
        self.controller.on_frame(source)
    }

    pub fn deck(&self) -> &CardDeck {
        &self.deck
    }

    pub fn controller(&self) -> &ScrollProgressController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut ScrollProgressController {
        &mut self.controller
    }

    pub fn is_intersecting(&self) -> bool {
        self.gate.is_intersecting()
    }

    pub fn transforms(&self) -> Vec<CardTransform> {
        self.controller.transforms()
    }
}

impl Drop for StackSection {
    fn drop(&mut self) {
        self.controller.unmount();
        self.subscriptions.clear();
    }
}
