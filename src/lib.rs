//! Scroll-driven card stack.
//!
//! A stack section reveals up to five cards one after another as the page
//! scrolls through it.  [`core`] holds the environment-agnostic controller
//! and math; [`app`] and [`ui`] bind it to a terminal page.

pub mod app;
pub mod config;
pub mod core;
pub mod error;
pub mod ui;

pub use crate::core::card::{Card, CardDeck};
pub use crate::core::controller::{
    ControllerOptions, Effect, GatePolicy, ScrollProgressController, StackEvent, ViewportSource,
};
pub use crate::core::progress::{SectionGeometry, MAX_CARDS};
pub use crate::core::transform::CardTransform;
pub use crate::error::{StackError, StackResult};
