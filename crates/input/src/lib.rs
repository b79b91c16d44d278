//! Terminal input module.
//!
//! Maps `crossterm` key events into [`crate::types::DrillAction`]s. Kept apart
//! from the session logic so the core never depends on a terminal backend.

pub mod map;

pub use drill_types as types;

pub use map::{handle_key_event, should_quit};
