//! Run-It headless runner
//!
//! Plays the game without a window: the autopilot steers by default, or
//! `--manual` reads key presses from stdin (empty line jumps). Game-over
//! screens are printed as text and world snapshots can be streamed as JSON
//! lines.

use std::io::BufRead;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::Duration;

use clap::Parser;

use run_it::consts::SIM_DT;
use run_it::platform::InputEvent;
use run_it::settings::BackendKind;
use run_it::{App, Screen, Settings};

/// Name typed by the autopilot when none is configured
const AUTOPILOT_NAME: &str = "AUTOPILOT";

#[derive(Parser, Debug)]
#[command(name = "run-it", version, about = "Two-lane endless runner (headless)")]
struct Cli {
    /// Settings file
    #[arg(long, default_value = Settings::DEFAULT_PATH)]
    config: PathBuf,

    /// RNG seed (random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Player name for the leaderboard
    #[arg(long)]
    name: Option<String>,

    /// Stop a run after this many simulated seconds
    #[arg(long, default_value_t = 300.0)]
    max_seconds: f64,

    /// Number of runs to play
    #[arg(long, default_value_t = 1)]
    runs: u32,

    /// Play without a leaderboard
    #[arg(long)]
    offline: bool,

    /// Read input from stdin instead of using the autopilot
    #[arg(long)]
    manual: bool,

    /// Print a JSON world snapshot every N ticks
    #[arg(long, value_name = "N")]
    snapshot_every: Option<u64>,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    log::info!("Run-It (headless) starting...");

    let mut settings = Settings::load(&cli.config);
    settings.apply_env();
    if let Some(name) = &cli.name {
        settings.player_name = Some(name.clone());
    }
    if cli.offline {
        settings.leaderboard.backend = BackendKind::Disabled;
    }

    let seed = cli.seed.unwrap_or_else(rand::random);
    let mut app = App::new(seed, &settings);
    app.set_idle_mode(!cli.manual);

    let stdin_events = cli.manual.then(spawn_stdin_reader);
    let wait = Duration::from_secs(settings.leaderboard.timeout_secs * 3);
    let max_ticks = (cli.max_seconds / SIM_DT as f64).ceil() as u64;
    let mut last_printed_tick = None;
    let mut shown_game_over = false;

    while !app.should_quit() {
        if let Some(events) = &stdin_events {
            for event in events.try_iter() {
                app.handle_event(event);
            }
            thread::sleep(Duration::from_secs_f32(SIM_DT));
        }

        match app.screen() {
            Screen::Playing => {
                app.update(SIM_DT);
                let tick = app.state().time_ticks;
                if let Some(every) = cli.snapshot_every.filter(|n| *n > 0) {
                    if tick % every == 0 && last_printed_tick != Some(tick) {
                        print_snapshot(&app);
                        last_printed_tick = Some(tick);
                    }
                }
                if tick >= max_ticks && !app.state().is_over() {
                    log::info!("Run stopped after {:.0}s without crashing", cli.max_seconds);
                    break;
                }
            }
            Screen::EnteringName => {
                if stdin_events.is_none() {
                    for c in AUTOPILOT_NAME.chars() {
                        app.handle_event(InputEvent::Char(c));
                    }
                    app.handle_event(InputEvent::Confirm);
                } else {
                    app.update(SIM_DT);
                }
            }
            Screen::Leaderboard => {
                if !shown_game_over {
                    if !app.wait_for_sync(wait) {
                        log::warn!("Leaderboard still busy after {}s", wait.as_secs());
                    }
                    app.update(SIM_DT);
                    if let Some(view) = app.game_over_view() {
                        println!();
                        for line in view.lines() {
                            println!("{line}");
                        }
                    }
                    shown_game_over = true;
                }
                if app.runs() >= cli.runs {
                    break;
                }
                if stdin_events.is_none() {
                    app.handle_event(InputEvent::Activate);
                }
                if app.screen() == Screen::Playing {
                    shown_game_over = false;
                    last_printed_tick = None;
                }
            }
        }
    }

    app.wait_for_sync(wait);
    log::info!("Goodbye after {} run(s)", app.runs());
}

fn print_snapshot(app: &App) {
    match serde_json::to_string(&app.snapshot()) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Snapshot serialization failed: {e}"),
    }
}

/// Forward stdin lines as input events. An empty line jumps; otherwise each
/// word is a key name (`Enter`, `Backspace`, `Escape`) or text to type.
fn spawn_stdin_reader() -> Receiver<InputEvent> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            let events = parse_line(&line);
            if events.into_iter().any(|e| tx.send(e).is_err()) {
                break;
            }
        }
    });
    rx
}

fn parse_line(line: &str) -> Vec<InputEvent> {
    let line = line.trim();
    if line.is_empty() {
        return vec![InputEvent::Activate];
    }
    line.split_whitespace()
        .flat_map(|word| match InputEvent::from_key(word) {
            Some(event) => vec![event],
            None => word.chars().map(InputEvent::Char).collect(),
        })
        .collect()
}
