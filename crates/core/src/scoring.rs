//! Scoring module - correctness, streaks, accuracy and bonuses
//!
//! Every function here is pure. Guards that return [`ScoringError`] catch
//! caller misuse (more correct answers than questions, a streak counter that
//! cannot grow); they are never triggered by what a player types.
//!
//! Bonus rules:
//! - Streak bonus starts at a streak of 3 and pays `(streak - 2) * 10`.
//! - A perfect run (at least one question, no mistakes) adds a flat 50.
//! - Both bonuses are additive and independent.

use crate::error::ScoringError;
use crate::snapshot::{ChallengeResult, PracticeResult};
use crate::types::{PERFECT_BONUS, STREAK_BONUS_STEP, STREAK_BONUS_THRESHOLD};

/// Strict equality between the player's answer and the expected product
pub fn check_answer(user: u32, correct: u32) -> bool {
    user == correct
}

/// Next streak value: +1 on a correct answer, 0 otherwise
pub fn update_streak(current: u32, correct: bool) -> Result<u32, ScoringError> {
    if !correct {
        return Ok(0);
    }
    current
        .checked_add(1)
        .ok_or(ScoringError::StreakOverflow { streak: current })
}

/// Share of correct answers in `[0, 1]`, rounded to two decimals.
///
/// Returns `0.0` when nothing was answered.
pub fn calculate_accuracy(correct: u32, total: u32) -> Result<f64, ScoringError> {
    ensure_correct_within_total(correct, total)?;
    if total == 0 {
        return Ok(0.0);
    }
    let ratio = f64::from(correct) / f64::from(total);
    Ok((ratio * 100.0).round() / 100.0)
}

/// A run is perfect when at least one question was answered and none were missed
pub fn check_perfect(correct: u32, total: u32) -> bool {
    total > 0 && correct == total
}

/// Streak bonus plus perfect-run bonus
pub fn calculate_bonus(streak: u32, is_perfect: bool) -> u32 {
    let streak_bonus = if streak >= STREAK_BONUS_THRESHOLD {
        (streak - (STREAK_BONUS_THRESHOLD - 1)).saturating_mul(STREAK_BONUS_STEP)
    } else {
        0
    };
    let perfect_bonus = if is_perfect { PERFECT_BONUS } else { 0 };
    streak_bonus.saturating_add(perfect_bonus)
}

/// Base score: one point per correct answer
pub fn calculate_score(correct: u32, total: u32) -> Result<u32, ScoringError> {
    ensure_correct_within_total(correct, total)?;
    Ok(correct)
}

/// Seconds left on the question clock when a correct answer landed
pub fn calculate_time_bonus(question_time_remaining: u32) -> u32 {
    question_time_remaining
}

/// Fold final challenge totals into the terminal result.
///
/// `total_score = calculate_score + calculate_bonus(max_streak, perfect) + time_bonus`
pub fn summarize_challenge(
    correct: u32,
    total: u32,
    max_streak: u32,
    time_bonus: u32,
) -> Result<ChallengeResult, ScoringError> {
    let base = calculate_score(correct, total)?;
    let accuracy = calculate_accuracy(correct, total)?;
    let perfect = check_perfect(correct, total);
    let streak_bonus = calculate_bonus(max_streak, perfect);

    Ok(ChallengeResult {
        correct_answers: correct,
        total_questions: total,
        accuracy,
        max_streak,
        time_bonus,
        streak_bonus,
        perfect,
        total_score: base.saturating_add(streak_bonus).saturating_add(time_bonus),
    })
}

/// Fold final practice totals into the terminal result
pub fn summarize_practice(
    table: Option<u32>,
    correct: u32,
    total: u32,
    current_streak: u32,
    max_streak: u32,
) -> Result<PracticeResult, ScoringError> {
    let correct_answers = calculate_score(correct, total)?;
    Ok(PracticeResult {
        table,
        correct_answers,
        total_questions: total,
        current_streak,
        max_streak,
    })
}

fn ensure_correct_within_total(correct: u32, total: u32) -> Result<(), ScoringError> {
    if correct > total {
        return Err(ScoringError::CorrectExceedsTotal { correct, total });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_answer() {
        assert!(check_answer(56, 56));
        assert!(!check_answer(54, 56));
        assert!(!check_answer(0, 1));
    }

    #[test]
    fn test_update_streak() {
        assert_eq!(update_streak(0, true), Ok(1));
        assert_eq!(update_streak(4, true), Ok(5));
        assert_eq!(update_streak(9, false), Ok(0));
        assert_eq!(update_streak(0, false), Ok(0));
        assert_eq!(
            update_streak(u32::MAX, true),
            Err(ScoringError::StreakOverflow { streak: u32::MAX })
        );
    }

    #[test]
    fn test_accuracy() {
        assert_eq!(calculate_accuracy(0, 0), Ok(0.0));
        assert_eq!(calculate_accuracy(1, 3), Ok(0.33));
        assert_eq!(calculate_accuracy(2, 3), Ok(0.67));
        assert_eq!(calculate_accuracy(10, 10), Ok(1.0));
        assert_eq!(calculate_accuracy(0, 7), Ok(0.0));
        assert!(calculate_accuracy(4, 3).is_err());
    }

    #[test]
    fn test_check_perfect() {
        assert!(!check_perfect(0, 0));
        assert!(check_perfect(5, 5));
        assert!(!check_perfect(4, 5));
    }

    #[test]
    fn test_bonus_table() {
        assert_eq!(calculate_bonus(0, false), 0);
        assert_eq!(calculate_bonus(2, false), 0);
        assert_eq!(calculate_bonus(3, false), 10);
        assert_eq!(calculate_bonus(5, false), 30);
        assert_eq!(calculate_bonus(0, true), 50);
        assert_eq!(calculate_bonus(5, true), 80);
        assert_eq!(calculate_bonus(u32::MAX, true), u32::MAX);
    }

    #[test]
    fn test_calculate_score() {
        assert_eq!(calculate_score(0, 0), Ok(0));
        assert_eq!(calculate_score(7, 10), Ok(7));
        assert_eq!(
            calculate_score(11, 10),
            Err(ScoringError::CorrectExceedsTotal {
                correct: 11,
                total: 10
            })
        );
    }

    #[test]
    fn test_summarize_challenge() {
        let result = summarize_challenge(8, 10, 5, 17).unwrap();
        assert_eq!(result.accuracy, 0.8);
        assert!(!result.perfect);
        assert_eq!(result.streak_bonus, 30);
        assert_eq!(result.total_score, 8 + 30 + 17);
    }

    #[test]
    fn test_summarize_challenge_perfect_run() {
        let result = summarize_challenge(4, 4, 4, 8).unwrap();
        assert!(result.perfect);
        assert_eq!(result.accuracy, 1.0);
        assert_eq!(result.streak_bonus, 20 + 50);
        assert_eq!(result.total_score, 4 + 70 + 8);
    }

    #[test]
    fn test_summarize_empty_challenge() {
        let result = summarize_challenge(0, 0, 0, 0).unwrap();
        assert_eq!(result.total_score, 0);
        assert_eq!(result.accuracy, 0.0);
        assert!(!result.perfect);
    }

    #[test]
    fn test_summaries_reject_impossible_totals() {
        assert!(summarize_challenge(3, 2, 0, 0).is_err());
        assert!(summarize_practice(Some(2), 3, 2, 0, 0).is_err());
    }
}
