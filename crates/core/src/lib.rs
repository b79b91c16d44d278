//! Core drill logic - pure, deterministic, and testable
//!
//! This crate contains the game rules, session state and scoring. It has no
//! dependencies on terminals, timers or storage, making it:
//!
//! - **Deterministic**: the same seed serves the same questions
//! - **Testable**: every rule is a plain function or a synchronous transition
//! - **Portable**: the session is driven by whoever owns it (a tokio task, a test, a bench)
//!
//! # Module Structure
//!
//! - [`question`]: multiplication facts within operand bounds
//! - [`rng`]: seedable random source
//! - [`scoring`]: correctness, streaks, accuracy and bonuses
//! - [`badges`]: declarative badge table and the unlock evaluator
//! - [`session`]: the practice/challenge state machine
//! - [`snapshot`]: observable state and terminal results
//! - [`config`]: session configuration and validation
//!
//! # Example
//!
//! ```
//! use drill_core::{Session, SessionConfig};
//! use drill_core::types::Phase;
//!
//! let mut session = Session::new(SessionConfig::practice(3).with_seed(7)).unwrap();
//! session.start();
//!
//! let q = session.question().unwrap();
//! for c in q.answer.to_string().chars() {
//!     session.append_digit(c.to_digit(10).unwrap() as u8);
//! }
//! session.submit();
//!
//! assert_eq!(session.score(), 1);
//! assert_eq!(session.phase(), Phase::Playing);
//! ```
//!
//! # Timing
//!
//! Challenge sessions expect one [`Session::tick`] per elapsed second while
//! [`Session::needs_clock`] is true. Practice sessions ignore ticks.

pub mod badges;
pub mod config;
pub mod error;
pub mod question;
pub mod rng;
pub mod scoring;
pub mod session;
pub mod snapshot;

pub use drill_types as types;

// Re-export commonly used types for convenience
pub use badges::{evaluate, BadgeCatalog, BadgeRule, EarnedBadge, BUILTIN_BADGES};
pub use config::{OperandRange, SessionConfig};
pub use error::{ConfigError, ScoringError};
pub use question::QuestionGenerator;
pub use rng::{RandomSource, SimpleRng};
pub use scoring::{
    calculate_accuracy, calculate_bonus, calculate_score, check_answer, check_perfect,
    update_streak,
};
pub use session::{Session, SessionEvent, MAX_PENDING_EVENTS};
pub use snapshot::{ChallengeResult, PracticeResult, ResultSnapshot, SessionView, TimersView};
