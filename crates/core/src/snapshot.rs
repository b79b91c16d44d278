//! Snapshot module - observable session state and terminal results
//!
//! [`SessionView`] is a plain `Copy` value taken after every transition, so
//! observers never borrow the session. [`ResultSnapshot`] is produced once at
//! game over and is what badge evaluation and the score sink consume.

use arrayvec::ArrayString;
use serde::{Deserialize, Serialize};

use crate::types::{Mode, Phase, Question, MAX_ANSWER_DIGITS};

/// Terminal summary of a practice run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeResult {
    pub table: Option<u32>,
    pub correct_answers: u32,
    pub total_questions: u32,
    pub current_streak: u32,
    pub max_streak: u32,
}

/// Terminal summary of a challenge run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeResult {
    pub correct_answers: u32,
    pub total_questions: u32,
    pub accuracy: f64,
    pub max_streak: u32,
    pub time_bonus: u32,
    /// Streak bonus plus the perfect-run bonus.
    pub streak_bonus: u32,
    pub perfect: bool,
    pub total_score: u32,
}

/// Immutable result handed to badge evaluation and the score sink.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum ResultSnapshot {
    Practice(PracticeResult),
    Challenge(ChallengeResult),
}

impl ResultSnapshot {
    pub fn mode(&self) -> Mode {
        match self {
            ResultSnapshot::Practice(_) => Mode::Practice,
            ResultSnapshot::Challenge(_) => Mode::Challenge,
        }
    }

    pub fn correct_answers(&self) -> u32 {
        match self {
            ResultSnapshot::Practice(r) => r.correct_answers,
            ResultSnapshot::Challenge(r) => r.correct_answers,
        }
    }

    pub fn total_questions(&self) -> u32 {
        match self {
            ResultSnapshot::Practice(r) => r.total_questions,
            ResultSnapshot::Challenge(r) => r.total_questions,
        }
    }

    pub fn max_streak(&self) -> u32 {
        match self {
            ResultSnapshot::Practice(r) => r.max_streak,
            ResultSnapshot::Challenge(r) => r.max_streak,
        }
    }

    /// Score persisted for the run (correct answers in practice)
    pub fn final_score(&self) -> u32 {
        match self {
            ResultSnapshot::Practice(r) => r.correct_answers,
            ResultSnapshot::Challenge(r) => r.total_score,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimersView {
    pub global_secs: u32,
    pub question_secs: u32,
}

/// Observable session state, copied out after every transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionView {
    pub mode: Mode,
    pub phase: Phase,
    pub question: Option<Question>,
    pub question_id: u32,
    pub answer: ArrayString<MAX_ANSWER_DIGITS>,
    pub score: u32,
    pub total: u32,
    pub streak: u32,
    pub max_streak: u32,
    /// Challenge clocks; `None` in practice.
    pub timers: Option<TimersView>,
    /// Practice position out of `questions_per_table`; `None` in challenge.
    pub position: Option<(u32, u32)>,
    pub result: Option<ResultSnapshot>,
}

impl SessionView {
    pub fn phase_label(&self) -> &'static str {
        self.phase.label(self.mode)
    }

    pub fn accepts_input(&self) -> bool {
        self.phase == Phase::Playing && self.question.is_some()
    }
}
