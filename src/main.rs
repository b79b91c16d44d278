//! Terminal drill runner (default binary).
//!
//! A thin driver around [`SessionController`]: reads keys with crossterm,
//! forwards them as actions and prints one status line per state change.
//!
//! Usage: `tables-drill [practice <table> | challenge]`. Without arguments the
//! session is configured from `DRILL_*` environment variables.

use std::io::{self, Write};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::style::Print;
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::{cursor, queue};

use tables_drill::core::{ResultSnapshot, SessionConfig, SessionView};
use tables_drill::engine::{InMemoryStore, SessionController};
use tables_drill::input::{handle_key_event, should_quit};
use tables_drill::types::{Mode, Phase};

const POLL_MS: u64 = 50;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = parse_args(&args)?;
    log::info!(
        "starting {} session (seed {})",
        config.mode.as_str(),
        config.seed
    );

    let rt = tokio::runtime::Runtime::new().context("failed to create tokio runtime")?;
    let _guard = rt.enter();

    let store = InMemoryStore::new();
    let controller = SessionController::spawn(config, store.clone())?;

    terminal::enable_raw_mode()?;
    let result = run(&controller);
    // Always try to restore terminal state.
    let _ = terminal::disable_raw_mode();
    println!();

    rt.block_on(controller.shutdown());
    for badge in store.badges() {
        println!("badge: {} ({})", badge.id, badge.mode.as_str());
    }
    result
}

fn parse_args(args: &[String]) -> Result<SessionConfig> {
    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(1);

    match args.first().map(String::as_str) {
        None => Ok(SessionConfig::from_env()),
        Some("challenge") => Ok(SessionConfig::challenge().with_seed(seed)),
        Some("practice") => {
            let table = args
                .get(1)
                .ok_or_else(|| anyhow!("practice: missing table number"))?;
            let table = table
                .parse::<u32>()
                .map_err(|_| anyhow!("practice: invalid table: {}", table))?;
            Ok(SessionConfig::practice(table).with_seed(seed))
        }
        Some(other) => Err(anyhow!("unknown mode: {}", other)),
    }
}

fn run(controller: &SessionController) -> Result<()> {
    let mut out = io::stdout();
    let mut last: Option<SessionView> = None;

    loop {
        let view = controller.view();
        if last != Some(view) {
            draw(&mut out, &view)?;
            last = Some(view);
        }

        if !event::poll(Duration::from_millis(POLL_MS))? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if should_quit(key) {
                return Ok(());
            }
            if let Some(action) = handle_key_event(key) {
                controller.apply(action);
            }
        }
    }
}

fn draw(out: &mut impl Write, view: &SessionView) -> Result<()> {
    queue!(
        out,
        cursor::MoveToColumn(0),
        Clear(ClearType::CurrentLine),
        Print(status_line(view))
    )?;
    if view.phase == Phase::GameOver {
        queue!(out, Print("\r\n"))?;
    }
    out.flush()?;
    Ok(())
}

fn status_line(view: &SessionView) -> String {
    let label = view.phase_label();
    match (view.phase, view.question) {
        (Phase::Ready, _) => format!("[{}] press space to start, q to quit", label),
        (Phase::Playing, Some(q)) => {
            let mut line = format!(
                "[{}] {} = {:<3}  score {}/{}  streak {}",
                label,
                q,
                view.answer.as_str(),
                view.score,
                view.total,
                view.streak
            );
            if let Some(timers) = view.timers {
                line.push_str(&format!(
                    "  time {}s  question {}s",
                    timers.global_secs, timers.question_secs
                ));
            }
            if let (Mode::Practice, Some((done, of))) = (view.mode, view.position) {
                line.push_str(&format!("  {}/{}", done, of));
            }
            line
        }
        (Phase::GameOver, _) => match view.result {
            Some(ResultSnapshot::Challenge(r)) => format!(
                "[{}] {}/{} correct ({:.0}%), best streak {}, score {}  (r: replay, q: quit)",
                label,
                r.correct_answers,
                r.total_questions,
                r.accuracy * 100.0,
                r.max_streak,
                r.total_score
            ),
            Some(ResultSnapshot::Practice(r)) => format!(
                "[{}] {}/{} correct, best streak {}  (r: replay, q: quit)",
                label, r.correct_answers, r.total_questions, r.max_streak
            ),
            None => format!("[{}]", label),
        },
        _ => format!("[{}] press r to start over", label),
    }
}
