//! Error types for scoring invariants and session configuration.

use thiserror::Error;

/// Invariant violations detected by the scoring engine.
///
/// These indicate caller misuse, never a player mistake. A session that hits
/// one halts instead of carrying on with corrupt totals.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoringError {
    #[error("correct answers ({correct}) exceed questions answered ({total})")]
    CorrectExceedsTotal { correct: u32, total: u32 },

    #[error("streak counter overflowed at {streak}")]
    StreakOverflow { streak: u32 },
}

/// Rejected session configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("operand range {min}..={max} is empty")]
    EmptyOperandRange { min: u32, max: u32 },

    #[error("operand range {min}..={max} produces answers longer than {digits} digits")]
    AnswerTooLong { min: u32, max: u32, digits: usize },

    #[error("table {table} is outside the operand range {min}..={max}")]
    TableOutOfRange { table: u32, min: u32, max: u32 },

    #[error("practice needs at least one question per table")]
    NoQuestions,

    #[error("{field} must be at least one second")]
    ZeroTimeBudget { field: &'static str },

    #[error("question budget ({question}s) exceeds the global budget ({global}s)")]
    QuestionBudgetTooLong { question: u32, global: u32 },
}
