//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are plain data with no behaviour beyond parsing and formatting,
//! making them usable in any context (session logic, controller, key mapping).
//!
//! # Defaults
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_GLOBAL_TIME_SECS` | 180 | Challenge time budget |
//! | `DEFAULT_QUESTION_TIME_SECS` | 5 | Per-question budget in challenge mode |
//! | `DEFAULT_QUESTIONS_PER_TABLE` | 10 | Practice questions per table |
//! | `MAX_ANSWER_DIGITS` | 3 | Answer buffer capacity |
//! | `TICK_MS` | 1000 | Challenge clock resolution |
//!
//! # Scoring constants
//!
//! - `STREAK_BONUS_THRESHOLD`: 3 - streak length at which the streak bonus starts
//! - `STREAK_BONUS_STEP`: 10 - points per streak step past the threshold minus one
//! - `PERFECT_BONUS`: 50 - flat bonus for a run without mistakes
//!
//! # Examples
//!
//! ```
//! use drill_types::{DrillAction, Mode, Question, MAX_ANSWER_DIGITS};
//!
//! let mode = Mode::from_str("Challenge").unwrap();
//! assert_eq!(mode, Mode::Challenge);
//!
//! let q = Question::new(7, 8);
//! assert_eq!(q.answer, 56);
//!
//! assert_eq!(DrillAction::from_str("7"), Some(DrillAction::Digit(7)));
//! assert_eq!(DrillAction::from_str("submit"), Some(DrillAction::Submit));
//!
//! assert_eq!(MAX_ANSWER_DIGITS, 3);
//! ```

use serde::{Deserialize, Serialize};

/// Challenge time budget in seconds (3 minutes)
pub const DEFAULT_GLOBAL_TIME_SECS: u32 = 180;

/// Per-question time budget in seconds
pub const DEFAULT_QUESTION_TIME_SECS: u32 = 5;

/// Questions served per practice table
pub const DEFAULT_QUESTIONS_PER_TABLE: u32 = 10;

/// Smallest operand served by default
pub const DEFAULT_OPERAND_MIN: u32 = 1;

/// Largest operand served by default
pub const DEFAULT_OPERAND_MAX: u32 = 10;

/// Maximum number of digits the answer buffer holds
pub const MAX_ANSWER_DIGITS: usize = 3;

/// Challenge clock resolution in milliseconds (one tick per second)
pub const TICK_MS: u64 = 1000;

/// Streak length at which the streak bonus starts paying out
pub const STREAK_BONUS_THRESHOLD: u32 = 3;

/// Points per streak step
pub const STREAK_BONUS_STEP: u32 = 10;

/// Flat bonus for a perfect run
pub const PERFECT_BONUS: u32 = 50;


/// Game variant
///
/// - **Practice**: untimed, one table, fixed question count
/// - **Challenge**: global time budget plus a per-question budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Practice,
    Challenge,
}

impl Mode {
    /// Parse mode from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use drill_types::Mode;
    ///
    /// assert_eq!(Mode::from_str("practice"), Some(Mode::Practice));
    /// assert_eq!(Mode::from_str("CHALLENGE"), Some(Mode::Challenge));
    /// assert_eq!(Mode::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "practice" => Some(Mode::Practice),
            "challenge" => Some(Mode::Challenge),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Practice => "practice",
            Mode::Challenge => "challenge",
        }
    }

    /// Whether this mode runs the one-second clock
    pub fn is_timed(&self) -> bool {
        matches!(self, Mode::Challenge)
    }
}

/// Session lifecycle phase
///
/// The cycle goes: Ready → Playing → GameOver, with `replay` returning to Ready.
/// `Halted` is entered only when the session detects a broken invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    Ready,
    Playing,
    GameOver,
    Halted,
}

impl Phase {
    /// Mode-specific name (practice uses idle/active/completed)
    pub fn label(&self, mode: Mode) -> &'static str {
        match (self, mode) {
            (Phase::Ready, Mode::Challenge) => "ready",
            (Phase::Ready, Mode::Practice) => "idle",
            (Phase::Playing, Mode::Challenge) => "playing",
            (Phase::Playing, Mode::Practice) => "active",
            (Phase::GameOver, Mode::Challenge) => "gameOver",
            (Phase::GameOver, Mode::Practice) => "completed",
            (Phase::Halted, _) => "halted",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::GameOver | Phase::Halted)
    }
}

/// A single multiplication fact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Question {
    pub a: u32,
    pub b: u32,
    pub answer: u32,
}

impl Question {
    /// Build a question; the answer is always `a * b`
    pub fn new(a: u32, b: u32) -> Self {
        Self {
            a,
            b,
            answer: a * b,
        }
    }
}

impl std::fmt::Display for Question {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} x {}", self.a, self.b)
    }
}

/// Player actions that drive a session
///
/// These actions are shared by keyboard input and programmatic callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrillAction {
    /// Append a digit (0-9) to the answer buffer
    Digit(u8),
    /// Remove the last digit of the answer buffer
    Delete,
    /// Submit the buffered answer
    Submit,
    /// Leave the ready phase and serve the first question
    Start,
    /// Reset the session for another round with the same settings
    Replay,
}

impl DrillAction {
    /// Parse action from string
    ///
    /// Single digits map to [`DrillAction::Digit`]; names are case-insensitive.
    ///
    /// # Examples
    ///
    /// ```
    /// use drill_types::DrillAction;
    ///
    /// assert_eq!(DrillAction::from_str("3"), Some(DrillAction::Digit(3)));
    /// assert_eq!(DrillAction::from_str("Delete"), Some(DrillAction::Delete));
    /// assert_eq!(DrillAction::from_str("replay"), Some(DrillAction::Replay));
    /// assert_eq!(DrillAction::from_str("jump"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.len() == 1 {
            if let Some(d) = s.chars().next().and_then(|c| c.to_digit(10)) {
                return Some(DrillAction::Digit(d as u8));
            }
        }
        match s.to_lowercase().as_str() {
            "delete" => Some(DrillAction::Delete),
            "submit" => Some(DrillAction::Submit),
            "start" => Some(DrillAction::Start),
            "replay" => Some(DrillAction::Replay),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        const DIGITS: [&str; 10] = ["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"];
        match self {
            DrillAction::Digit(d) => DIGITS.get(*d as usize).copied().unwrap_or("?"),
            DrillAction::Delete => "delete",
            DrillAction::Submit => "submit",
            DrillAction::Start => "start",
            DrillAction::Replay => "replay",
        }
    }
}
