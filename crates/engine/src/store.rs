//! Persistence seam for badges and scores.
//!
//! The controller reads the owned badge ids once per finished session and
//! writes back a single append. Atomicity of that append across concurrent
//! sessions of the same player belongs to the store implementation.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};

use drill_core::{EarnedBadge, ResultSnapshot};

use crate::types::Mode;

/// Newly earned badges for one finished session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadgeAward {
    pub mode: Mode,
    pub earned: Vec<EarnedBadge>,
}

/// Final score of one finished session
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreRecord {
    pub mode: Mode,
    pub round: u32,
    pub result: ResultSnapshot,
    pub recorded_at: DateTime<Utc>,
}

/// External collaborator that owns the player's badges and scores.
///
/// Writes are fire-and-forget from the controller's point of view: failures
/// are logged and never retried.
pub trait AchievementStore: Send + Sync + 'static {
    fn owned_badge_ids(&self, mode: Mode) -> impl Future<Output = Result<Vec<String>>> + Send;

    fn append_badges(&self, award: BadgeAward) -> impl Future<Output = Result<()>> + Send;

    fn record_score(&self, record: ScoreRecord) -> impl Future<Output = Result<()>> + Send;
}

#[derive(Debug, Default)]
struct Records {
    badges: Vec<EarnedBadge>,
    scores: Vec<ScoreRecord>,
}

/// Process-local store; clones share the same records.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    records: Arc<Mutex<Records>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with badges the player already owns
    pub fn with_badges(badges: Vec<EarnedBadge>) -> Self {
        Self {
            records: Arc::new(Mutex::new(Records {
                badges,
                scores: Vec::new(),
            })),
        }
    }

    pub fn badges(&self) -> Vec<EarnedBadge> {
        self.read().badges.clone()
    }

    pub fn scores(&self) -> Vec<ScoreRecord> {
        self.read().scores.clone()
    }

    fn read(&self) -> MutexGuard<'_, Records> {
        self.records.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> Result<MutexGuard<'_, Records>> {
        self.records
            .lock()
            .map_err(|_| anyhow!("badge store lock poisoned"))
    }
}

impl AchievementStore for InMemoryStore {
    async fn owned_badge_ids(&self, mode: Mode) -> Result<Vec<String>> {
        Ok(self
            .read()
            .badges
            .iter()
            .filter(|badge| badge.mode == mode)
            .map(|badge| badge.id.clone())
            .collect())
    }

    async fn append_badges(&self, award: BadgeAward) -> Result<()> {
        let mut records = self.write()?;
        // Read-filter-append under one lock keeps ids unique per player.
        for badge in award.earned {
            if !records.badges.iter().any(|owned| owned.id == badge.id) {
                records.badges.push(badge);
            }
        }
        Ok(())
    }

    async fn record_score(&self, record: ScoreRecord) -> Result<()> {
        self.write()?.scores.push(record);
        Ok(())
    }
}
