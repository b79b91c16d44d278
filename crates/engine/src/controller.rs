//! Session controller - owns one session, its clock, and the result hand-off.
//!
//! Each controller runs a single tokio task that exclusively owns its
//! [`Session`]. Player actions arrive over an unbounded channel and the
//! challenge clock is a [`tokio::time::Interval`] that exists only while the
//! session is playing. Every action and every tick is applied to completion
//! before the next one is taken.
//!
//! Ordering: the task's `select!` is biased towards actions, so a submit queued
//! in the same scheduling turn as a tick is applied first. The expiring
//! question is answered, not skipped, and the tick then counts against the
//! newly served question.
//!
//! Cancellation: game over, replay and shutdown drop the interval. Dropping the
//! controller aborts the task, so no tick can outlive its owner.

use std::time::Duration;

use chrono::Utc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

use drill_core::{
    BadgeCatalog, ConfigError, EarnedBadge, ResultSnapshot, Session, SessionConfig, SessionEvent,
    SessionView,
};

use crate::store::{AchievementStore, BadgeAward, ScoreRecord};
use crate::types::{DrillAction, TICK_MS};

/// Command delivered to the session task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Action(DrillAction),
    SubmitFor(u32),
    Shutdown,
}

/// State published after every applied command or tick
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerState {
    pub session: SessionView,
    /// Badges unlocked by the last finished round (cleared on replay).
    pub earned: Vec<EarnedBadge>,
}

/// Handle to a running session.
pub struct SessionController {
    cmd_tx: mpsc::UnboundedSender<Command>,
    state_rx: watch::Receiver<ControllerState>,
    task: Option<JoinHandle<()>>,
}

impl SessionController {
    /// Validate `config` and spawn the session task on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime, like [`tokio::spawn`].
    pub fn spawn<S: AchievementStore>(config: SessionConfig, store: S) -> Result<Self, ConfigError> {
        Self::spawn_with(config, store, BadgeCatalog::builtin())
    }

    /// [`spawn`](Self::spawn) with a custom badge table
    pub fn spawn_with<S: AchievementStore>(
        config: SessionConfig,
        store: S,
        catalog: BadgeCatalog,
    ) -> Result<Self, ConfigError> {
        let session = Session::new(config)?;
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(ControllerState {
            session: session.view(),
            earned: Vec::new(),
        });

        let driver = Driver {
            session,
            store,
            catalog,
            cmd_rx,
            state_tx,
            clock: None,
            period: Duration::from_millis(TICK_MS),
            earned: Vec::new(),
        };
        let task = tokio::spawn(driver.run());

        Ok(Self {
            cmd_tx,
            state_rx,
            task: Some(task),
        })
    }

    pub fn apply(&self, action: DrillAction) {
        self.send(Command::Action(action));
    }

    pub fn start(&self) {
        self.apply(DrillAction::Start);
    }

    pub fn append_digit(&self, digit: u8) {
        self.apply(DrillAction::Digit(digit));
    }

    pub fn delete_digit(&self) {
        self.apply(DrillAction::Delete);
    }

    pub fn submit(&self) {
        self.apply(DrillAction::Submit);
    }

    /// Submit only if `question_id` is still being shown when the task gets to it
    pub fn submit_for(&self, question_id: u32) {
        self.send(Command::SubmitFor(question_id));
    }

    pub fn replay(&self) {
        self.apply(DrillAction::Replay);
    }

    /// Latest published session state
    pub fn view(&self) -> SessionView {
        self.state_rx.borrow().session
    }

    /// Badges unlocked by the last finished round
    pub fn earned_badges(&self) -> Vec<EarnedBadge> {
        self.state_rx.borrow().earned.clone()
    }

    /// Wait for the next published state. `None` once the task has stopped.
    pub async fn changed(&mut self) -> Option<ControllerState> {
        self.state_rx.changed().await.ok()?;
        Some(self.state_rx.borrow_and_update().clone())
    }

    /// Wait until the published state satisfies `pred`.
    pub async fn wait_for<F>(&mut self, mut pred: F) -> Option<ControllerState>
    where
        F: FnMut(&ControllerState) -> bool,
    {
        self.state_rx
            .wait_for(|state| pred(state))
            .await
            .ok()
            .map(|state| state.clone())
    }

    /// Stop the task after it finishes any queued commands.
    pub async fn shutdown(mut self) {
        self.send(Command::Shutdown);
        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                log::warn!("session task ended abnormally: {}", err);
            }
        }
    }

    fn send(&self, command: Command) {
        if self.cmd_tx.send(command).is_err() {
            log::debug!("session task gone; dropping {:?}", command);
        }
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

struct Driver<S> {
    session: Session,
    store: S,
    catalog: BadgeCatalog,
    cmd_rx: mpsc::UnboundedReceiver<Command>,
    state_tx: watch::Sender<ControllerState>,
    clock: Option<Interval>,
    period: Duration,
    earned: Vec<EarnedBadge>,
}

impl<S: AchievementStore> Driver<S> {
    async fn run(mut self) {
        loop {
            tokio::select! {
                biased;

                cmd = self.cmd_rx.recv() => {
                    let applied = match cmd {
                        Some(Command::Action(action)) => self.session.apply_action(action),
                        Some(Command::SubmitFor(id)) => self.session.submit_for(id),
                        Some(Command::Shutdown) | None => break,
                    };
                    if applied {
                        self.settle().await;
                    }
                }
                _ = next_tick(&mut self.clock) => {
                    if self.session.tick() {
                        self.settle().await;
                    }
                }
            }
        }
        self.clock = None;
        log::debug!(
            "{} session task stopped (round {})",
            self.session.mode().as_str(),
            self.session.round()
        );
    }

    /// React to the events of the last transition, re-arm or drop the clock,
    /// and publish the new state.
    async fn settle(&mut self) {
        let events: Vec<SessionEvent> = self.session.drain_events().collect();
        for event in events {
            match event {
                SessionEvent::Finished(snapshot) => self.hand_off(snapshot).await,
                SessionEvent::Replayed { .. } => self.earned.clear(),
                SessionEvent::Halted(err) => {
                    log::warn!("session halted ({}); waiting for replay", err);
                }
                _ => {}
            }
        }

        if self.session.needs_clock() {
            if self.clock.is_none() {
                let mut clock = interval_at(Instant::now() + self.period, self.period);
                clock.set_missed_tick_behavior(MissedTickBehavior::Burst);
                self.clock = Some(clock);
            }
        } else {
            self.clock = None;
        }

        self.state_tx.send_replace(ControllerState {
            session: self.session.view(),
            earned: self.earned.clone(),
        });
    }

    /// Evaluate badges against what the player owns and write the results back.
    async fn hand_off(&mut self, snapshot: ResultSnapshot) {
        let mode = snapshot.mode();
        let owned = match self.store.owned_badge_ids(mode).await {
            Ok(ids) => ids,
            Err(err) => {
                log::warn!("could not read owned {} badges: {:#}", mode.as_str(), err);
                Vec::new()
            }
        };

        let now = Utc::now();
        let earned = self.catalog.award(&snapshot, &owned, now);
        if !earned.is_empty() {
            log::info!(
                "unlocked {} badge(s): {}",
                earned.len(),
                earned
                    .iter()
                    .map(|badge| badge.id.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
            let award = BadgeAward {
                mode,
                earned: earned.clone(),
            };
            if let Err(err) = self.store.append_badges(award).await {
                log::warn!("could not store earned badges: {:#}", err);
            }
        }
        self.earned = earned;

        let record = ScoreRecord {
            mode,
            round: self.session.round(),
            result: snapshot,
            recorded_at: now,
        };
        if let Err(err) = self.store.record_score(record).await {
            log::warn!("could not store final score: {:#}", err);
        }
    }
}

async fn next_tick(clock: &mut Option<Interval>) {
    match clock {
        Some(clock) => {
            clock.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}
