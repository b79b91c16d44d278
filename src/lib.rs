//! Multiplication drill (workspace facade crate).
//!
//! Re-exports the workspace crates under one name so callers can write
//! `tables_drill::{core, engine, input, types}`; the implementation lives in
//! dedicated crates under `crates/`.

pub use drill_core as core;
pub use drill_engine as engine;
pub use drill_input as input;
pub use drill_types as types;
