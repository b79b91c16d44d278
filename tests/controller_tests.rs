//! Controller tests on tokio's paused clock

use std::time::Duration;

use chrono::Utc;
use tokio::time::sleep;

use tables_drill::core::{EarnedBadge, ResultSnapshot, SessionConfig};
use tables_drill::engine::{InMemoryStore, SessionController};
use tables_drill::types::{Mode, Phase};

fn challenge() -> SessionConfig {
    SessionConfig::challenge().with_seed(42)
}

fn type_answer(controller: &SessionController, value: u32) {
    for c in value.to_string().chars() {
        controller.append_digit(c.to_digit(10).unwrap() as u8);
    }
}

/// Let the session task drain its queue without moving the clock.
async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test(start_paused = true)]
async fn test_question_auto_skips_after_five_seconds() {
    let store = InMemoryStore::new();
    let controller = SessionController::spawn(challenge(), store).unwrap();
    controller.start();

    sleep(Duration::from_millis(4500)).await;
    let view = controller.view();
    assert_eq!(view.total, 0);
    assert_eq!(view.timers.unwrap().question_secs, 1);

    sleep(Duration::from_millis(1000)).await;
    let view = controller.view();
    assert_eq!(view.total, 1);
    assert_eq!(view.score, 0);
    assert_eq!(view.question_id, 2);
    assert_eq!(view.timers.unwrap().question_secs, 5);
    assert_eq!(view.timers.unwrap().global_secs, 175);
}

#[tokio::test(start_paused = true)]
async fn test_submit_beats_expiring_tick() {
    let controller = SessionController::spawn(challenge(), InMemoryStore::new()).unwrap();
    controller.start();

    sleep(Duration::from_millis(4500)).await;
    let question = controller.view().question.unwrap();
    type_answer(&controller, question.answer);
    controller.submit();
    tokio::time::advance(Duration::from_millis(500)).await;
    sleep(Duration::from_millis(100)).await;

    let view = controller.view();
    assert_eq!(view.score, 1);
    assert_eq!(view.total, 1);
    assert_eq!(view.streak, 1);
    let timers = view.timers.unwrap();
    assert_eq!(timers.global_secs, 175);
    assert_eq!(timers.question_secs, 4);
}

#[tokio::test(start_paused = true)]
async fn test_stale_submit_is_dropped() {
    let controller = SessionController::spawn(challenge(), InMemoryStore::new()).unwrap();
    controller.start();
    settle().await;
    let first = controller.view().question_id;

    sleep(Duration::from_millis(5500)).await;
    type_answer(&controller, 7);
    controller.submit_for(first);
    settle().await;

    let view = controller.view();
    assert_eq!(view.total, 1);
    assert_eq!(view.answer.as_str(), "7");
}

#[tokio::test(start_paused = true)]
async fn test_replay_restarts_the_clock_once() {
    let controller = SessionController::spawn(challenge(), InMemoryStore::new()).unwrap();
    controller.start();

    sleep(Duration::from_millis(2500)).await;
    assert_eq!(controller.view().timers.unwrap().global_secs, 178);

    controller.replay();
    settle().await;
    let view = controller.view();
    assert_eq!(view.phase, Phase::Ready);
    assert_eq!(view.timers.unwrap().global_secs, 180);

    // Nothing ticks while the replayed round waits in ready.
    sleep(Duration::from_millis(3000)).await;
    assert_eq!(controller.view().timers.unwrap().global_secs, 180);

    controller.start();
    sleep(Duration::from_millis(1500)).await;
    let view = controller.view();
    assert_eq!(view.phase, Phase::Playing);
    assert_eq!(view.timers.unwrap().global_secs, 179);
}

#[tokio::test(start_paused = true)]
async fn test_challenge_game_over_hands_off_results() {
    let store = InMemoryStore::new();
    let mut controller = SessionController::spawn(challenge(), store.clone()).unwrap();
    controller.start();

    let state = controller
        .wait_for(|s| s.session.phase == Phase::GameOver)
        .await
        .unwrap();

    match state.session.result {
        Some(ResultSnapshot::Challenge(r)) => {
            assert_eq!(r.total_questions, 35);
            assert_eq!(r.correct_answers, 0);
        }
        other => panic!("unexpected result: {:?}", other),
    }
    let ids: Vec<&str> = state.earned.iter().map(|b| b.id.as_str()).collect();
    assert_eq!(ids, vec!["challenge-first-run", "challenge-20-questions"]);

    let scores = store.scores();
    assert_eq!(scores.len(), 1);
    assert_eq!(scores[0].mode, Mode::Challenge);
    assert_eq!(store.badges().len(), 2);

    // The clock is gone once the game is over.
    sleep(Duration::from_secs(10)).await;
    assert_eq!(controller.view().timers.unwrap().global_secs, 0);
    assert_eq!(store.scores().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_owned_badges_are_not_awarded_again() {
    let store = InMemoryStore::with_badges(vec![EarnedBadge {
        id: "challenge-first-run".to_string(),
        mode: Mode::Challenge,
        earned_at: Utc::now(),
    }]);
    let mut config = challenge();
    config.global_time_secs = 4;
    config.question_time_secs = 3;
    let mut controller = SessionController::spawn(config, store.clone()).unwrap();
    controller.start();

    let state = controller
        .wait_for(|s| s.session.result.is_some())
        .await
        .unwrap();
    // One skipped question, the second discarded when the clock ran out.
    assert_eq!(state.session.result.unwrap().total_questions(), 1);
    assert!(state.earned.is_empty());
    assert_eq!(store.badges().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_practice_round_through_controller() {
    let store = InMemoryStore::new();
    let mut controller =
        SessionController::spawn(SessionConfig::practice(4).with_seed(9), store.clone()).unwrap();
    controller.start();

    for i in 1..=10u32 {
        let state = controller
            .wait_for(|s| s.session.question_id == i)
            .await
            .unwrap();
        let question = state.session.question.unwrap();
        type_answer(&controller, question.answer);
        controller.submit();
    }

    let state = controller
        .wait_for(|s| s.session.phase == Phase::GameOver)
        .await
        .unwrap();
    assert_eq!(state.session.phase_label(), "completed");
    assert_eq!(state.session.score, 10);
    assert!(state.session.timers.is_none());

    let ids: Vec<&str> = state.earned.iter().map(|b| b.id.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            "practice-first-correct",
            "practice-five-correct",
            "practice-perfect-table",
            "practice-streak-5"
        ]
    );
    assert_eq!(store.scores().len(), 1);

    controller.replay();
    let state = controller
        .wait_for(|s| s.session.phase == Phase::Ready)
        .await
        .unwrap();
    assert!(state.earned.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_dropping_controller_cancels_timers() {
    let store = InMemoryStore::new();
    let mut config = challenge();
    config.global_time_secs = 2;
    config.question_time_secs = 2;
    let controller = SessionController::spawn(config, store.clone()).unwrap();
    controller.start();
    settle().await;
    assert_eq!(controller.view().phase, Phase::Playing);

    drop(controller);
    sleep(Duration::from_secs(5)).await;
    assert!(store.scores().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_waits_for_task() {
    let store = InMemoryStore::new();
    let controller = SessionController::spawn(challenge(), store.clone()).unwrap();
    controller.start();
    controller.shutdown().await;
    assert!(store.scores().is_empty());
}

#[tokio::test]
async fn test_changed_reports_transitions() {
    let mut controller =
        SessionController::spawn(SessionConfig::practice(2), InMemoryStore::new()).unwrap();
    controller.start();
    let state = controller.changed().await.unwrap();
    assert_eq!(state.session.phase, Phase::Playing);
    assert_eq!(state.session.question.unwrap().a, 2);
}

#[test]
fn test_invalid_config_is_rejected() {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    let _guard = rt.enter();

    let mut config = SessionConfig::challenge();
    config.question_time_secs = 0;
    assert!(SessionController::spawn(config, InMemoryStore::new()).is_err());
    assert!(SessionController::spawn(SessionConfig::practice(11), InMemoryStore::new()).is_err());
}
