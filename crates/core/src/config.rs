//! Session configuration.
//!
//! A [`SessionConfig`] fully determines a session: mode, operand bounds,
//! budgets and the RNG seed. `replay` reuses the same configuration.

use crate::error::ConfigError;
use crate::types::{
    Mode, DEFAULT_GLOBAL_TIME_SECS, DEFAULT_OPERAND_MAX, DEFAULT_OPERAND_MIN,
    DEFAULT_QUESTIONS_PER_TABLE, DEFAULT_QUESTION_TIME_SECS, MAX_ANSWER_DIGITS,
};

/// Inclusive operand bounds for generated questions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperandRange {
    pub min: u32,
    pub max: u32,
}

impl OperandRange {
    pub fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: u32) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Number of distinct operands (0 when the range is empty)
    pub fn span(&self) -> u32 {
        if self.max < self.min {
            0
        } else {
            self.max - self.min + 1
        }
    }
}

impl Default for OperandRange {
    fn default() -> Self {
        Self::new(DEFAULT_OPERAND_MIN, DEFAULT_OPERAND_MAX)
    }
}

/// Everything needed to create (and recreate) a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub mode: Mode,
    /// Fixed multiplicand for practice. Ignored in challenge mode.
    pub table: Option<u32>,
    pub questions_per_table: u32,
    pub global_time_secs: u32,
    pub question_time_secs: u32,
    pub operands: OperandRange,
    pub seed: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Challenge,
            table: None,
            questions_per_table: DEFAULT_QUESTIONS_PER_TABLE,
            global_time_secs: DEFAULT_GLOBAL_TIME_SECS,
            question_time_secs: DEFAULT_QUESTION_TIME_SECS,
            operands: OperandRange::default(),
            seed: 1,
        }
    }
}

impl SessionConfig {
    /// Timed challenge with default budgets
    pub fn challenge() -> Self {
        Self::default()
    }

    /// Untimed practice of a single table
    pub fn practice(table: u32) -> Self {
        Self {
            mode: Mode::Practice,
            table: Some(table),
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    /// Create from environment variables, falling back to defaults.
    ///
    /// - `DRILL_MODE`: `practice` or `challenge`
    /// - `DRILL_TABLE`: practice table; without it practice uses random operands
    /// - `DRILL_QUESTIONS_PER_TABLE`
    /// - `DRILL_GLOBAL_TIME`, `DRILL_QUESTION_TIME`: seconds
    /// - `DRILL_SEED`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// [`from_env`](Self::from_env) over any key lookup.
    ///
    /// Missing or unparsable values keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let parsed =
            |key: &str| -> Option<u32> { lookup(key).and_then(|s| s.trim().parse().ok()) };

        let defaults = Self::default();
        let mode = lookup("DRILL_MODE")
            .and_then(|s| Mode::from_str(s.trim()))
            .unwrap_or(defaults.mode);

        Self {
            mode,
            table: match mode {
                Mode::Practice => parsed("DRILL_TABLE"),
                Mode::Challenge => None,
            },
            questions_per_table: parsed("DRILL_QUESTIONS_PER_TABLE")
                .unwrap_or(defaults.questions_per_table),
            global_time_secs: parsed("DRILL_GLOBAL_TIME").unwrap_or(defaults.global_time_secs),
            question_time_secs: parsed("DRILL_QUESTION_TIME")
                .unwrap_or(defaults.question_time_secs),
            operands: defaults.operands,
            seed: parsed("DRILL_SEED").unwrap_or(defaults.seed),
        }
    }

    /// Check bounds and budgets before a session is built from this config
    pub fn validate(&self) -> Result<(), ConfigError> {
        let OperandRange { min, max } = self.operands;
        if self.operands.span() == 0 {
            return Err(ConfigError::EmptyOperandRange { min, max });
        }
        let largest = u64::from(max) * u64::from(max);
        if largest.to_string().len() > MAX_ANSWER_DIGITS {
            return Err(ConfigError::AnswerTooLong {
                min,
                max,
                digits: MAX_ANSWER_DIGITS,
            });
        }

        match self.mode {
            Mode::Practice => {
                if let Some(table) = self.table {
                    if !self.operands.contains(table) {
                        return Err(ConfigError::TableOutOfRange { table, min, max });
                    }
                }
                if self.questions_per_table == 0 {
                    return Err(ConfigError::NoQuestions);
                }
            }
            Mode::Challenge => {
                if self.global_time_secs == 0 {
                    return Err(ConfigError::ZeroTimeBudget {
                        field: "global_time_secs",
                    });
                }
                if self.question_time_secs == 0 {
                    return Err(ConfigError::ZeroTimeBudget {
                        field: "question_time_secs",
                    });
                }
                if self.question_time_secs > self.global_time_secs {
                    return Err(ConfigError::QuestionBudgetTooLong {
                        question: self.question_time_secs,
                        global: self.global_time_secs,
                    });
                }
            }
        }
        Ok(())
    }
}
