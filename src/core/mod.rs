//! Core algorithms – scroll progress, card transforms, and visibility.
//!
//! Nothing in this module depends on any TUI or async crate.  Every function
//! works on plain numbers so it can be driven from any event loop.

pub mod card;
pub mod controller;
pub mod easing;
pub mod progress;
pub mod tokens;
pub mod transform;
pub mod visibility;
