//! Session module - the drill state machine
//!
//! Ties together question generation, scoring and the result snapshot. The
//! session is driven by discrete player actions and, in challenge mode, by a
//! one-second `tick`. Nothing here sleeps or spawns: whoever owns the session
//! decides when a second has passed (see the controller in `drill-engine`).
//!
//! Lifecycle: `Ready → Playing → GameOver`, `replay` returns to `Ready`.
//! `Halted` is entered when a scoring invariant breaks; only `replay` leaves it.

use std::collections::VecDeque;

use arrayvec::ArrayString;

use crate::config::SessionConfig;
use crate::error::{ConfigError, ScoringError};
use crate::question::QuestionGenerator;
use crate::rng::SimpleRng;
use crate::scoring::{
    calculate_time_bonus, check_answer, summarize_challenge, summarize_practice, update_streak,
};
use crate::snapshot::{ResultSnapshot, SessionView, TimersView};
use crate::types::{DrillAction, Mode, Phase, Question, MAX_ANSWER_DIGITS};

/// Events kept when the owner stops draining; older ones are dropped first.
pub const MAX_PENDING_EVENTS: usize = 64;

/// Transition record, drained by the session owner.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Started { round: u32 },
    Answered { question: Question, correct: bool, streak: u32 },
    AutoSkipped { question: Question },
    Finished(ResultSnapshot),
    Halted(ScoringError),
    Replayed { round: u32 },
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct Session {
    config: SessionConfig,
    generator: QuestionGenerator,
    rng: SimpleRng,
    phase: Phase,
    question: Option<Question>,
    /// Monotonic id of the served question (increments on every serve).
    question_id: u32,
    answer: ArrayString<MAX_ANSWER_DIGITS>,
    score: u32,
    total: u32,
    streak: u32,
    max_streak: u32,
    global_secs: u32,
    question_secs: u32,
    time_bonus: u32,
    /// Practice questions answered so far.
    position: u32,
    result: Option<ResultSnapshot>,
    fault: Option<ScoringError>,
    /// Monotonic round id (increments on replay).
    round: u32,
    /// Pending events, capped at [`MAX_PENDING_EVENTS`].
    events: VecDeque<SessionEvent>,
}

impl Session {
    /// Create a session in the ready phase
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let generator = match (config.mode, config.table) {
            (Mode::Practice, Some(table)) => QuestionGenerator::for_table(config.operands, table),
            _ => QuestionGenerator::new(config.operands),
        };

        Ok(Self {
            rng: SimpleRng::new(config.seed),
            generator,
            phase: Phase::Ready,
            question: None,
            question_id: 0,
            answer: ArrayString::new(),
            score: 0,
            total: 0,
            streak: 0,
            max_streak: 0,
            global_secs: config.global_time_secs,
            question_secs: config.question_time_secs,
            time_bonus: 0,
            position: 0,
            result: None,
            fault: None,
            round: 0,
            events: VecDeque::new(),
            config,
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn mode(&self) -> Mode {
        self.config.mode
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn question(&self) -> Option<Question> {
        self.question
    }

    pub fn question_id(&self) -> u32 {
        self.question_id
    }

    pub fn answer(&self) -> &str {
        self.answer.as_str()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn max_streak(&self) -> u32 {
        self.max_streak
    }

    pub fn time_bonus(&self) -> u32 {
        self.time_bonus
    }

    pub fn global_time_remaining(&self) -> Option<u32> {
        self.config.mode.is_timed().then_some(self.global_secs)
    }

    pub fn question_time_remaining(&self) -> Option<u32> {
        self.config.mode.is_timed().then_some(self.question_secs)
    }

    pub fn position(&self) -> u32 {
        self.position
    }

    pub fn result(&self) -> Option<&ResultSnapshot> {
        self.result.as_ref()
    }

    pub fn fault(&self) -> Option<&ScoringError> {
        self.fault.as_ref()
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    /// Whether the owner should be delivering one-second ticks
    pub fn needs_clock(&self) -> bool {
        self.config.mode.is_timed() && self.phase == Phase::Playing
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            mode: self.config.mode,
            phase: self.phase,
            question: self.question,
            question_id: self.question_id,
            answer: self.answer,
            score: self.score,
            total: self.total,
            streak: self.streak,
            max_streak: self.max_streak,
            timers: self.config.mode.is_timed().then_some(TimersView {
                global_secs: self.global_secs,
                question_secs: self.question_secs,
            }),
            position: match self.config.mode {
                Mode::Practice => Some((self.position, self.config.questions_per_table)),
                Mode::Challenge => None,
            },
            result: self.result,
        }
    }

    /// Take all events recorded since the last drain.
    ///
    /// Owners that never drain only see the last [`MAX_PENDING_EVENTS`].
    pub fn drain_events(&mut self) -> std::collections::vec_deque::Drain<'_, SessionEvent> {
        self.events.drain(..)
    }

    /// Leave the ready phase and serve the first question
    pub fn start(&mut self) -> bool {
        if self.phase != Phase::Ready {
            return false;
        }
        self.phase = Phase::Playing;
        self.global_secs = self.config.global_time_secs;
        self.position = 0;
        self.generator.reset();
        self.serve_question();

        log::info!(
            "{} session started (round {}, seed {})",
            self.config.mode.as_str(),
            self.round,
            self.config.seed
        );
        self.record(SessionEvent::Started { round: self.round });
        true
    }

    /// Append a digit to the answer buffer. Ignored past the buffer cap.
    pub fn append_digit(&mut self, digit: u8) -> bool {
        if self.phase != Phase::Playing || digit > 9 {
            return false;
        }
        self.answer.try_push(char::from(b'0' + digit)).is_ok()
    }

    pub fn delete_digit(&mut self) -> bool {
        if self.phase != Phase::Playing {
            return false;
        }
        self.answer.pop().is_some()
    }

    /// Submit the buffered answer. An empty buffer is ignored.
    pub fn submit(&mut self) -> bool {
        if self.phase != Phase::Playing || self.answer.is_empty() {
            return false;
        }
        let Some(question) = self.question else {
            return false;
        };
        let Ok(value) = self.answer.parse::<u32>() else {
            return false;
        };

        let correct = check_answer(value, question.answer);
        let streak = match update_streak(self.streak, correct) {
            Ok(streak) => streak,
            Err(err) => {
                self.halt(err);
                return true;
            }
        };

        self.streak = streak;
        self.max_streak = self.max_streak.max(streak);
        self.total += 1;
        if correct {
            self.score += 1;
            if self.config.mode.is_timed() {
                self.time_bonus += calculate_time_bonus(self.question_secs);
            }
        }
        self.answer.clear();

        log::debug!(
            "q#{} {} = {} ({}), streak {}",
            self.question_id,
            question,
            value,
            if correct { "correct" } else { "wrong" },
            streak
        );
        self.record(SessionEvent::Answered {
            question,
            correct,
            streak,
        });

        match self.config.mode {
            Mode::Practice => {
                self.position += 1;
                if self.position >= self.config.questions_per_table {
                    self.finish();
                } else {
                    self.serve_question();
                }
            }
            Mode::Challenge => self.serve_question(),
        }
        true
    }

    /// Submit only if `question_id` is still the question being shown.
    ///
    /// Input aimed at a question that was already auto-skipped is dropped.
    pub fn submit_for(&mut self, question_id: u32) -> bool {
        if question_id != self.question_id {
            log::debug!(
                "dropping submit for stale q#{} (current q#{})",
                question_id,
                self.question_id
            );
            return false;
        }
        self.submit()
    }

    /// Advance the challenge clocks by one second.
    ///
    /// The global clock is checked first: when it runs out the game ends and
    /// the in-flight question is discarded without being counted. Otherwise an
    /// expired question clock auto-skips the question.
    pub fn tick(&mut self) -> bool {
        if !self.needs_clock() {
            return false;
        }

        self.global_secs = self.global_secs.saturating_sub(1);
        self.question_secs = self.question_secs.saturating_sub(1);

        if self.global_secs == 0 {
            self.finish();
        } else if self.question_secs == 0 {
            self.auto_skip();
        }
        true
    }

    /// Reset every field for another round with the same configuration.
    ///
    /// The RNG keeps its position, so the new round serves fresh questions.
    pub fn replay(&mut self) -> bool {
        let round = self.round.wrapping_add(1);
        self.phase = Phase::Ready;
        self.question = None;
        self.question_id = 0;
        self.answer.clear();
        self.score = 0;
        self.total = 0;
        self.streak = 0;
        self.max_streak = 0;
        self.global_secs = self.config.global_time_secs;
        self.question_secs = self.config.question_time_secs;
        self.time_bonus = 0;
        self.position = 0;
        self.result = None;
        self.fault = None;
        self.round = round;

        log::debug!("{} session reset (round {})", self.config.mode.as_str(), round);
        self.record(SessionEvent::Replayed { round });
        true
    }

    /// Stop the session on a broken scoring invariant.
    ///
    /// Every action except [`replay`](Self::replay) is ignored afterwards.
    /// Returns `false` if the session was already halted.
    pub fn halt(&mut self, err: ScoringError) -> bool {
        if self.phase == Phase::Halted {
            return false;
        }
        log::error!(
            "{} session halted in round {}: {}",
            self.config.mode.as_str(),
            self.round,
            err
        );
        self.phase = Phase::Halted;
        self.question = None;
        self.answer.clear();
        self.fault = Some(err.clone());
        self.record(SessionEvent::Halted(err));
        true
    }

    /// Apply a player action
    pub fn apply_action(&mut self, action: DrillAction) -> bool {
        match action {
            DrillAction::Digit(d) => self.append_digit(d),
            DrillAction::Delete => self.delete_digit(),
            DrillAction::Submit => self.submit(),
            DrillAction::Start => self.start(),
            DrillAction::Replay => self.replay(),
        }
    }

    fn serve_question(&mut self) {
        self.question = Some(self.generator.generate(&mut self.rng));
        self.question_id = self.question_id.wrapping_add(1);
        self.question_secs = self.config.question_time_secs;
        self.answer.clear();
    }

    fn auto_skip(&mut self) {
        let Some(question) = self.question else {
            return;
        };
        self.total += 1;
        self.streak = 0;

        log::debug!("q#{} {} timed out", self.question_id, question);
        self.record(SessionEvent::AutoSkipped { question });
        self.serve_question();
    }

    fn finish(&mut self) {
        let summary = match self.config.mode {
            Mode::Practice => summarize_practice(
                self.config.table,
                self.score,
                self.total,
                self.streak,
                self.max_streak,
            )
            .map(ResultSnapshot::Practice),
            Mode::Challenge => {
                summarize_challenge(self.score, self.total, self.max_streak, self.time_bonus)
                    .map(ResultSnapshot::Challenge)
            }
        };

        match summary {
            Ok(snapshot) => {
                self.phase = Phase::GameOver;
                self.question = None;
                self.answer.clear();
                self.result = Some(snapshot);

                log::info!(
                    "{} session finished: {}/{} correct, score {}",
                    self.config.mode.as_str(),
                    self.score,
                    self.total,
                    snapshot.final_score()
                );
                self.record(SessionEvent::Finished(snapshot));
            }
            Err(err) => {
                self.halt(err);
            }
        }
    }
    fn record(&mut self, event: SessionEvent) {
        if self.events.len() >= MAX_PENDING_EVENTS {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

}
