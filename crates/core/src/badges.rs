//! Badge rule evaluation
//!
//! Badges are a declarative table of `{id, mode, predicate}` rows. A single
//! evaluator folds the table over a [`ResultSnapshot`]: a row unlocks when its
//! mode matches, its predicate holds, and the player does not already own it.
//!
//! The evaluator never touches the owned set. Persisting the union is the
//! store's job; evaluating again against `owned ∪ unlocked` yields nothing.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::snapshot::ResultSnapshot;
use crate::types::Mode;

/// One row of the badge table
#[derive(Debug, Clone, Copy)]
pub struct BadgeRule {
    pub id: &'static str,
    pub mode: Mode,
    pub title: &'static str,
    pub predicate: fn(&ResultSnapshot) -> bool,
}

impl BadgeRule {
    pub fn is_met(&self, snapshot: &ResultSnapshot) -> bool {
        self.mode == snapshot.mode() && (self.predicate)(snapshot)
    }
}

/// A badge owned by a player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarnedBadge {
    pub id: String,
    pub mode: Mode,
    pub earned_at: DateTime<Utc>,
}

fn perfect(s: &ResultSnapshot) -> bool {
    crate::scoring::check_perfect(s.correct_answers(), s.total_questions())
}

fn sharpshooter(s: &ResultSnapshot) -> bool {
    match s {
        ResultSnapshot::Challenge(r) => r.total_questions >= 10 && r.accuracy >= 0.9,
        ResultSnapshot::Practice(_) => false,
    }
}

fn high_score(s: &ResultSnapshot) -> bool {
    match s {
        ResultSnapshot::Challenge(r) => r.total_score >= 100,
        ResultSnapshot::Practice(_) => false,
    }
}

pub const BUILTIN_BADGES: &[BadgeRule] = &[
    BadgeRule {
        id: "practice-first-correct",
        mode: Mode::Practice,
        title: "First Steps",
        predicate: |s| s.correct_answers() >= 1,
    },
    BadgeRule {
        id: "practice-five-correct",
        mode: Mode::Practice,
        title: "High Five",
        predicate: |s| s.correct_answers() >= 5,
    },
    BadgeRule {
        id: "practice-perfect-table",
        mode: Mode::Practice,
        title: "Table Master",
        predicate: perfect,
    },
    BadgeRule {
        id: "practice-streak-5",
        mode: Mode::Practice,
        title: "On a Roll",
        predicate: |s| s.max_streak() >= 5,
    },
    BadgeRule {
        id: "challenge-first-run",
        mode: Mode::Challenge,
        title: "Challenger",
        predicate: |s| s.total_questions() >= 1,
    },
    BadgeRule {
        id: "challenge-20-questions",
        mode: Mode::Challenge,
        title: "Quick Thinker",
        predicate: |s| s.total_questions() >= 20,
    },
    BadgeRule {
        id: "challenge-50-questions",
        mode: Mode::Challenge,
        title: "Lightning Brain",
        predicate: |s| s.total_questions() >= 50,
    },
    BadgeRule {
        id: "challenge-streak-10",
        mode: Mode::Challenge,
        title: "Unstoppable",
        predicate: |s| s.max_streak() >= 10,
    },
    BadgeRule {
        id: "challenge-perfect",
        mode: Mode::Challenge,
        title: "Flawless",
        predicate: perfect,
    },
    BadgeRule {
        id: "challenge-sharpshooter",
        mode: Mode::Challenge,
        title: "Sharpshooter",
        predicate: sharpshooter,
    },
    BadgeRule {
        id: "challenge-score-100",
        mode: Mode::Challenge,
        title: "Century",
        predicate: high_score,
    },
];

/// An ordered set of badge rules
#[derive(Debug, Clone, Copy)]
pub struct BadgeCatalog {
    rules: &'static [BadgeRule],
}

impl BadgeCatalog {
    pub const fn new(rules: &'static [BadgeRule]) -> Self {
        Self { rules }
    }

    pub const fn builtin() -> Self {
        Self::new(BUILTIN_BADGES)
    }

    pub fn rules(&self) -> &'static [BadgeRule] {
        self.rules
    }

    pub fn get(&self, id: &str) -> Option<&'static BadgeRule> {
        self.rules.iter().find(|rule| rule.id == id)
    }

    /// Ids unlocked by `snapshot` that are not in `owned`, in table order.
    ///
    /// An empty `owned` slice means the player owns nothing yet.
    pub fn evaluate<S: AsRef<str>>(
        &self,
        snapshot: &ResultSnapshot,
        owned: &[S],
    ) -> Vec<&'static str> {
        let owned: HashSet<&str> = owned.iter().map(|s| s.as_ref()).collect();
        self.rules
            .iter()
            .filter(|rule| rule.is_met(snapshot) && !owned.contains(rule.id))
            .map(|rule| rule.id)
            .collect()
    }

    /// [`evaluate`](Self::evaluate), stamped into records for the badge sink
    pub fn award<S: AsRef<str>>(
        &self,
        snapshot: &ResultSnapshot,
        owned: &[S],
        earned_at: DateTime<Utc>,
    ) -> Vec<EarnedBadge> {
        let mode = snapshot.mode();
        self.evaluate(snapshot, owned)
            .into_iter()
            .map(|id| EarnedBadge {
                id: id.to_string(),
                mode,
                earned_at,
            })
            .collect()
    }
}

impl Default for BadgeCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Evaluate against the built-in catalog
pub fn evaluate<S: AsRef<str>>(snapshot: &ResultSnapshot, owned: &[S]) -> Vec<&'static str> {
    BadgeCatalog::builtin().evaluate(snapshot, owned)
}
