//! Integration tests for the drill session lifecycle

use tables_drill::core::{ResultSnapshot, Session, SessionConfig, SessionEvent};
use tables_drill::types::{DrillAction, Mode, Phase, DEFAULT_QUESTIONS_PER_TABLE};

fn type_number(session: &mut Session, n: u32) {
    for c in n.to_string().chars() {
        session.apply_action(DrillAction::Digit(c.to_digit(10).unwrap() as u8));
    }
}

fn answer_correctly(session: &mut Session) {
    let expected = session.question().unwrap().answer;
    type_number(session, expected);
    assert!(session.apply_action(DrillAction::Submit));
}

fn answer_wrong(session: &mut Session) {
    let expected = session.question().unwrap().answer;
    type_number(session, expected + 1);
    assert!(session.apply_action(DrillAction::Submit));
}

#[test]
fn test_practice_lifecycle() {
    let mut session = Session::new(SessionConfig::practice(7).with_seed(99)).unwrap();
    assert_eq!(session.phase(), Phase::Ready);
    assert_eq!(session.view().phase_label(), "idle");
    assert!(session.question().is_none());

    assert!(session.apply_action(DrillAction::Start));
    assert_eq!(session.view().phase_label(), "active");

    for _ in 0..DEFAULT_QUESTIONS_PER_TABLE {
        let q = session.question().unwrap();
        assert_eq!(q.a, 7);
        answer_correctly(&mut session);
    }

    assert_eq!(session.phase(), Phase::GameOver);
    assert_eq!(session.view().phase_label(), "completed");
    match session.result() {
        Some(ResultSnapshot::Practice(r)) => {
            assert_eq!(r.table, Some(7));
            assert_eq!(r.correct_answers, 10);
            assert_eq!(r.total_questions, 10);
            assert_eq!(r.max_streak, 10);
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_score_never_exceeds_total() {
    let mut session = Session::new(SessionConfig::challenge().with_seed(3)).unwrap();
    session.start();

    for i in 0..40 {
        if i % 3 == 0 {
            answer_wrong(&mut session);
        } else {
            answer_correctly(&mut session);
        }
        assert!(session.score() <= session.total());
        assert!(session.streak() <= session.max_streak());
    }
    assert_eq!(session.total(), 40);
}

#[test]
fn test_wrong_answer_resets_streak() {
    let mut session = Session::new(SessionConfig::challenge().with_seed(5)).unwrap();
    session.start();

    answer_correctly(&mut session);
    answer_correctly(&mut session);
    answer_correctly(&mut session);
    assert_eq!(session.streak(), 3);

    answer_wrong(&mut session);
    assert_eq!(session.streak(), 0);
    assert_eq!(session.max_streak(), 3);
    assert_eq!(session.score(), 3);
    assert_eq!(session.total(), 4);
}

#[test]
fn test_input_is_ignored_outside_play() {
    let mut session = Session::new(SessionConfig::challenge()).unwrap();

    assert!(!session.apply_action(DrillAction::Digit(4)));
    assert!(!session.apply_action(DrillAction::Submit));
    assert!(!session.tick());
    assert_eq!(session.total(), 0);

    session.start();
    // Empty buffer is not a submission.
    assert!(!session.apply_action(DrillAction::Submit));
    assert_eq!(session.total(), 0);
}

#[test]
fn test_answer_buffer_is_capped() {
    let mut session = Session::new(SessionConfig::challenge()).unwrap();
    session.start();

    for d in [1, 2, 3, 4] {
        session.append_digit(d);
    }
    assert_eq!(session.answer(), "123");
    assert!(session.delete_digit());
    assert_eq!(session.answer(), "12");
}

#[test]
fn test_challenge_runs_out_of_time() {
    let mut session = Session::new(SessionConfig::challenge().with_seed(11)).unwrap();
    session.start();

    let mut ticks = 0;
    while session.phase() == Phase::Playing {
        assert!(session.tick());
        ticks += 1;
    }

    assert_eq!(ticks, 180);
    assert_eq!(session.phase(), Phase::GameOver);
    assert!(!session.needs_clock());
    match session.result() {
        Some(ResultSnapshot::Challenge(r)) => {
            assert_eq!(r.correct_answers, 0);
            assert_eq!(r.total_questions, 35);
            assert_eq!(r.accuracy, 0.0);
            assert_eq!(r.total_score, 0);
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_time_bonus_counts_seconds_left() {
    let mut session = Session::new(SessionConfig::challenge().with_seed(21)).unwrap();
    session.start();

    // Answer with 5 seconds left, then with 3 left.
    answer_correctly(&mut session);
    session.tick();
    session.tick();
    answer_correctly(&mut session);
    assert_eq!(session.time_bonus(), 8);

    while session.phase() == Phase::Playing {
        session.tick();
    }
    let result = session.result().copied().unwrap();
    match result {
        ResultSnapshot::Challenge(r) => {
            assert_eq!(r.correct_answers, 2);
            assert_eq!(r.time_bonus, 8);
            assert!(!r.perfect);
            assert_eq!(r.total_score, 2 + r.streak_bonus + 8);
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_stale_submit_is_dropped() {
    let mut session = Session::new(SessionConfig::challenge().with_seed(8)).unwrap();
    session.start();
    let first = session.question_id();

    for _ in 0..5 {
        session.tick();
    }
    assert_eq!(session.total(), 1);
    assert_ne!(session.question_id(), first);

    type_number(&mut session, 1);
    assert!(!session.submit_for(first));
    assert_eq!(session.total(), 1);
    assert_eq!(session.answer(), "1");
}

#[test]
fn test_replay_resets_round() {
    let mut session = Session::new(SessionConfig::practice(2).with_seed(4)).unwrap();
    session.start();
    answer_correctly(&mut session);
    answer_wrong(&mut session);
    session.drain_events().for_each(drop);

    assert!(session.apply_action(DrillAction::Replay));
    assert_eq!(session.phase(), Phase::Ready);
    assert_eq!(session.score(), 0);
    assert_eq!(session.total(), 0);
    assert_eq!(session.max_streak(), 0);
    assert_eq!(session.round(), 1);
    assert!(session.result().is_none());

    let events: Vec<SessionEvent> = session.drain_events().collect();
    assert_eq!(events, vec![SessionEvent::Replayed { round: 1 }]);
    assert_eq!(session.mode(), Mode::Practice);
}

#[test]
fn test_same_seed_same_questions() {
    let mut a = Session::new(SessionConfig::challenge().with_seed(1234)).unwrap();
    let mut b = Session::new(SessionConfig::challenge().with_seed(1234)).unwrap();
    a.start();
    b.start();

    for _ in 0..20 {
        assert_eq!(a.question(), b.question());
        answer_correctly(&mut a);
        answer_correctly(&mut b);
    }
}

#[test]
fn test_result_serializes_with_mode_tag() {
    let mut session = Session::new(SessionConfig::challenge().with_seed(2)).unwrap();
    session.start();
    answer_correctly(&mut session);
    while session.phase() == Phase::Playing {
        session.tick();
    }

    let json = serde_json::to_value(session.result().unwrap()).unwrap();
    assert_eq!(json["mode"], "challenge");
    assert_eq!(json["correctAnswers"], 1);
    assert_eq!(json["timeBonus"], 5);
    assert!(json["accuracy"].as_f64().unwrap() > 0.0);

    let back: ResultSnapshot = serde_json::from_value(json).unwrap();
    assert_eq!(Some(&back), session.result());
}
