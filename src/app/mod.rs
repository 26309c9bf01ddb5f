//! Application orchestration: the page model, the mounted stack section,
//! event loop plumbing and input handling.

pub mod demo;
pub mod event;
pub mod handler;
pub mod page;
pub mod section;
pub mod settings;
pub mod simulate;
pub mod state;
pub mod subscription;
