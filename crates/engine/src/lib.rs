//! Engine module - runs sessions in real time and hands results to storage
//!
//! [`SessionController`] is the entry point: it validates a
//! [`SessionConfig`](drill_core::SessionConfig), spawns one tokio task that owns
//! the session and its one-second clock, and forwards player actions to it.
//! When a round ends the task evaluates badges against what the
//! [`AchievementStore`] reports as already owned, then writes back the newly
//! earned badges and the final score.
//!
//! # Example
//!
//! ```no_run
//! use drill_core::SessionConfig;
//! use drill_engine::{InMemoryStore, SessionController};
//!
//! # async fn demo() {
//! let store = InMemoryStore::new();
//! let mut controller = SessionController::spawn(SessionConfig::challenge(), store.clone())
//!     .expect("default config is valid");
//!
//! controller.start();
//! let state = controller.wait_for(|s| s.session.result.is_some()).await;
//! println!("{:?}", state.map(|s| s.session.result));
//! # }
//! ```

pub mod controller;
pub mod store;

pub use drill_core as core;
pub use drill_types as types;

pub use controller::{ControllerState, SessionController};
pub use store::{AchievementStore, BadgeAward, InMemoryStore, ScoreRecord};
