//! UI / rendering layer: everything that touches Ratatui widgets.
//!
//! This layer takes the *core* data structures and turns them into cells on
//! the terminal.  No controller state is mutated here.

pub mod card_stack;
pub mod layout;
pub mod page;
pub mod popup;
pub mod theme;
pub mod transition;
