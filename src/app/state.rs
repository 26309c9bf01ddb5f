//! Central application state.
//!
//! All mutable state lives here so that the rest of the app can be pure
//! functions over `&AppState` (rendering) or `&mut AppState` (event handling).

use std::time::Duration;

use ratatui::layout::Rect;
use tracing::warn;

use super::page::Page;
use super::section::StackSection;
use super::subscription::{Channel, ListenerRegistry};
use crate::config::AppConfig;
use crate::core::card::CardDeck;
use crate::core::controller::Effect;
use crate::core::transform::CardTransform;
use crate::error::StackResult;
use crate::ui::card_stack::StackGeometry;
use crate::ui::layout::AppLayout;
use crate::ui::page::PageView;
use crate::ui::transition::TransitionSet;

/// Which view / overlay is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveView {
    #[default]
    Page,
    SettingsMenu,
}

/// Top-level application state.
pub struct AppState {
    /// Scroll model of the whole page.
    pub page: Page,
    /// The mounted stack section, if any.
    pub section: Option<StackSection>,
    /// Listener table the section subscribes through.
    pub registry: ListenerRegistry,
    /// What is actually drawn, easing toward the controller's targets.
    pub transitions: TransitionSet,
    pub config: AppConfig,
    /// Headline shown in the hero.
    pub title: String,
    /// Full terminal area, refreshed on resize.
    pub terminal_area: Rect,
    /// Controls the main event loop.
    pub should_quit: bool,
    /// An optional status message shown in the bottom bar.
    pub status_message: Option<String>,
    pub active_view: ActiveView,
    /// Currently highlighted item in the settings menu.
    pub settings_selected: usize,
    /// Write config changes back to disk.
    pub persist_config: bool,
    /// Kept so the section can be remounted with new options.
    deck: CardDeck,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        deck: CardDeck,
        terminal_area: Rect,
        title: impl Into<String>,
    ) -> StackResult<Self> {
        let layout = AppLayout::from_area(terminal_area);
        let page = Page::new(layout.viewport_rows(), config.section_height_multiplier);
        let mut state = Self {
            page,
            section: None,
            registry: ListenerRegistry::new(),
            transitions: TransitionSet::default(),
            config,
            title: title.into(),
            terminal_area,
            should_quit: false,
            status_message: None,
            active_view: ActiveView::default(),
            settings_selected: 0,
            persist_config: false,
            deck,
        };
        state.mount_section()?;
        Ok(state)
    }

    /// (Re)mount the stack section from the current config.  The previous
    /// section is dropped first so its listeners are gone before the new
    /// ones register.
    pub fn mount_section(&mut self) -> StackResult<()> {
        self.section = None;
        let options = self.config.controller_options()?;
        self.page.set_multiplier(options.section_height_multiplier);
        // The initial frame request is honoured by the next tick.
        let (section, _initial) = StackSection::mount(
            self.deck.clone(),
            options,
            self.config.intersection_threshold,
            &self.registry,
        )?;
        self.transitions = TransitionSet::new(&section.transforms(), self.config.animation_duration);
        self.section = Some(section);
        Ok(())
    }

    pub fn deck(&self) -> &CardDeck {
        &self.deck
    }

    pub fn scroll_by(&mut self, rows: f64) {
        if self.page.scroll_by(rows) {
            self.dispatch(Channel::Scroll);
        }
    }

    pub fn scroll_to(&mut self, offset: f64) {
        if self.page.scroll_to(offset) {
            self.dispatch(Channel::Scroll);
        }
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.terminal_area = Rect::new(0, 0, width, height);
        let layout = AppLayout::from_area(self.terminal_area);
        self.page.resize(layout.viewport_rows());
        self.dispatch(Channel::Resize);
    }

    /// Forward a host event to the section if anything listens for it.
    fn dispatch(&mut self, channel: Channel) {
        if !self.registry.has_listeners(channel) {
            return;
        }
        if let Some(section) = self.section.as_mut() {
            match channel {
                Channel::Scroll => section.on_scroll(),
                Channel::Resize => section.on_resize(),
                Channel::Intersection => Effect::Idle,
            };
        }
    }

    /// One animation frame: let the section recompute (at most once), then
    /// advance the drawn transitions by `dt`.
    pub fn frame(&mut self, dt: Duration) {
        if let Some(section) = self.section.as_mut() {
            if let Effect::Recomputed { .. } = section.on_frame(&self.page) {
                self.transitions.retarget(&section.transforms());
            }
        }
        self.transitions.tick(dt);
    }

    /// Transforms as currently drawn.
    pub fn drawn_transforms(&self) -> Vec<CardTransform> {
        self.transitions.current()
    }

    pub fn stack_geometry(&self) -> StackGeometry {
        let layout = AppLayout::from_area(self.terminal_area);
        PageView::stack_geometry(&self.page, layout.page_area, self.config.card_height)
    }

    pub fn set_gate_on_visibility(&mut self, on: bool) {
        self.config.gate_on_visibility = on;
        let policy = self.config.gate_policy();
        if let Some(section) = self.section.as_mut() {
            section.controller_mut().set_gate_policy(policy);
        }
        // Resync in case frames were skipped while gated.
        self.dispatch(Channel::Resize);
    }

    pub fn set_animation_duration(&mut self, duration: Duration) {
        self.config.animation_duration = duration;
        self.transitions.set_duration(duration);
    }

    /// Save the config if persistence is enabled.  Failures are logged, not
    /// fatal.
    pub fn persist(&self) {
        if !self.persist_config {
            return;
        }
        if let Err(err) = self.config.save() {
            warn!(%err, "failed to save config");
        }
    }

    /// Summary for the status bar: progress, active card, visibility.
    pub fn stack_summary(&self) -> String {
        let Some(section) = self.section.as_ref() else {
            return "no stack mounted".into();
        };
        let c = section.controller();
        let card = match c.active_index() {
            Some(i) => format!("card {}/{}", i + 1, c.card_count()),
            None => "no cards".into(),
        };
        let view = if section.is_intersecting() {
            "in view"
        } else {
            "out of view"
        };
        format!("{:>3.0}% · {card} · {view}", c.progress() * 100.0)
    }
}
