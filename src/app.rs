//! Session flow around the simulation
//!
//! Runs the fixed-timestep loop, routes input to the active screen and hands
//! finished runs to the leaderboard sync:
//!
//! ```text
//! Playing --crash--> EnteringName (no name yet) --confirm--> Leaderboard
//! Playing --crash--> Leaderboard (name known)
//! Leaderboard --activate--> Playing (fresh run)
//! ```

use std::time::Duration;

use serde::Serialize;

use crate::consts::*;
use crate::highscores::{HighScoreEntry, LeaderboardState};
use crate::persistence::{LeaderboardBackend, LeaderboardSync, build_backend};
use crate::platform::InputEvent;
use crate::settings::Settings;
use crate::sim::{GameState, TickInput, WorldSnapshot, tick};
use crate::ui::{GameOverView, NameEntry};

/// Longest frame delta fed to the accumulator (seconds)
const MAX_FRAME_DT: f32 = 0.1;

/// Which screen has input focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Screen {
    Playing,
    EnteringName,
    /// Game over with the global rankings
    Leaderboard,
}

/// Game session
pub struct App {
    state: GameState,
    screen: Screen,
    accumulator: f32,
    input: TickInput,
    board: LeaderboardState,
    sync: Option<LeaderboardSync>,
    player_name: Option<String>,
    name_entry: NameEntry,
    /// Personal best known when the last run ended
    best_at_crash: u64,
    runs: u32,
    quit: bool,
}

impl App {
    /// Session using the configured leaderboard backend
    pub fn new(seed: u64, settings: &Settings) -> Self {
        Self::with_backend(
            seed,
            settings.player_name.clone(),
            build_backend(&settings.leaderboard),
        )
    }

    /// Session with an explicit backend (`None` plays offline). The
    /// leaderboard is fetched once up front.
    pub fn with_backend(
        seed: u64,
        player_name: Option<String>,
        backend: Option<Box<dyn LeaderboardBackend>>,
    ) -> Self {
        let sync = backend.and_then(|backend| match LeaderboardSync::spawn(backend) {
            Ok(mut sync) => {
                sync.request_fetch();
                Some(sync)
            }
            Err(e) => {
                log::warn!("Leaderboard sync unavailable: {e}");
                None
            }
        });

        log::info!("New session, seed {seed}");
        Self {
            state: GameState::new(seed),
            screen: Screen::Playing,
            accumulator: 0.0,
            input: TickInput::default(),
            board: LeaderboardState::default(),
            sync,
            player_name: player_name.and_then(|raw| {
                let name = NameEntry::accept(&raw);
                if name.is_none() {
                    log::warn!("Ignoring configured player name {raw:?}");
                }
                name
            }),
            name_entry: NameEntry::new(),
            best_at_crash: 0,
            runs: 1,
            quit: false,
        }
    }

    /// Let the autopilot play
    pub fn set_idle_mode(&mut self, idle: bool) {
        self.input.idle_mode = idle;
    }

    /// Route one input event to the active screen
    pub fn handle_event(&mut self, event: InputEvent) {
        match (self.screen, event) {
            (_, InputEvent::Quit) => self.quit = true,
            (Screen::Playing, InputEvent::Activate) => self.input.activate = true,
            (Screen::EnteringName, InputEvent::Char(c)) => {
                self.name_entry.push(c);
            }
            (Screen::EnteringName, InputEvent::Backspace) => self.name_entry.backspace(),
            (Screen::EnteringName, InputEvent::Activate | InputEvent::Confirm) => {
                if let Some(name) = self.name_entry.confirm() {
                    log::info!("Player name set to {name}");
                    self.player_name = Some(name);
                    self.submit_run();
                    self.screen = Screen::Leaderboard;
                }
            }
            (Screen::Leaderboard, InputEvent::Activate) => self.restart(),
            _ => {}
        }
    }

    /// Advance by a frame delta (seconds). Finished leaderboard jobs are
    /// applied first. Returns the number of simulation ticks run.
    pub fn update(&mut self, dt: f32) -> u32 {
        if let Some(sync) = self.sync.as_mut() {
            sync.poll(&mut self.board);
        }

        if self.screen != Screen::Playing {
            self.accumulator = 0.0;
            return 0;
        }

        self.accumulator += dt.clamp(0.0, MAX_FRAME_DT);
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut self.state, &self.input);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // One-shot input
            self.input.activate = false;

            if self.state.is_over() {
                self.on_crash();
                break;
            }
        }
        substeps
    }

    fn on_crash(&mut self) {
        self.accumulator = 0.0;
        self.best_at_crash = self.board.personal_best;
        if self.player_name.is_some() {
            self.submit_run();
            self.screen = Screen::Leaderboard;
        } else {
            self.name_entry = NameEntry::new();
            self.screen = Screen::EnteringName;
        }
    }

    /// Upload the finished run, then re-fetch the rankings
    fn submit_run(&mut self) {
        let (Some(score), Some(name)) = (self.state.final_score, self.player_name.as_ref()) else {
            return;
        };
        let Some(sync) = self.sync.as_mut() else {
            return;
        };
        let entry = HighScoreEntry::new(
            name.clone(),
            score,
            self.state.coins,
            self.state.survival_secs(),
            self.state.player.jumps,
            crate::timestamp_now(),
        );
        sync.submit(self.board.submission(entry));
        sync.request_fetch();
    }

    /// Start a fresh run
    pub fn restart(&mut self) {
        self.state.restart();
        self.screen = Screen::Playing;
        self.accumulator = 0.0;
        self.input.activate = false;
        self.runs += 1;
        log::info!("Run {} started", self.runs);
    }

    /// Block until queued leaderboard jobs finish (used on shutdown)
    pub fn wait_for_sync(&mut self, timeout: Duration) -> bool {
        match self.sync.as_mut() {
            Some(sync) => sync.wait(&mut self.board, timeout),
            None => true,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn board(&self) -> &LeaderboardState {
        &self.board
    }

    pub fn player_name(&self) -> Option<&str> {
        self.player_name.as_deref()
    }

    pub fn name_entry(&self) -> &NameEntry {
        &self.name_entry
    }

    pub fn runs(&self) -> u32 {
        self.runs
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// A leaderboard fetch is outstanding
    pub fn is_loading(&self) -> bool {
        self.sync.as_ref().is_some_and(LeaderboardSync::is_loading)
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        self.state.snapshot()
    }

    /// Game-over screen, once a run has ended and the name is known
    pub fn game_over_view(&self) -> Option<GameOverView> {
        if self.screen != Screen::Leaderboard {
            return None;
        }
        let score = self.state.final_score?;
        Some(GameOverView::build(
            score,
            self.best_at_crash,
            &self.board,
            self.is_loading(),
            self.player_name.as_deref(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Lane, Obstacle};

    /// Put a spike on the player so the next tick ends the run
    fn force_crash(app: &mut App) {
        let x = PLAYER_X + app.state.scroll_speed;
        app.state.obstacles.push(Obstacle::new(Lane::Bottom, x));
        app.update(SIM_DT);
    }

    #[test]
    fn test_accumulator_runs_fixed_ticks() {
        let mut app = App::with_backend(1, None, None);
        assert_eq!(app.update(SIM_DT * 3.5), 3);
        assert_eq!(app.state().time_ticks, 3);
        // Large frame deltas are capped at MAX_FRAME_DT
        let mut app = App::with_backend(1, None, None);
        let ticks = app.update(5.0);
        assert!((5..=6).contains(&ticks), "{ticks} ticks");
    }

    #[test]
    fn test_activate_is_one_shot() {
        let mut app = App::with_backend(1, None, None);
        app.handle_event(InputEvent::Activate);
        app.update(SIM_DT * 4.0);
        assert_eq!(app.state().player.jumps, 1);
    }

    #[test]
    fn test_first_crash_asks_for_name() {
        let mut app = App::with_backend(1, None, None);
        force_crash(&mut app);
        assert_eq!(app.screen(), Screen::EnteringName);
        assert!(app.game_over_view().is_none());

        // Space does not confirm a one-letter name
        app.handle_event(InputEvent::Char('z'));
        app.handle_event(InputEvent::Activate);
        assert_eq!(app.screen(), Screen::EnteringName);

        app.handle_event(InputEvent::Char('o'));
        app.handle_event(InputEvent::Confirm);
        assert_eq!(app.screen(), Screen::Leaderboard);
        assert_eq!(app.player_name(), Some("ZO"));
        assert!(app.game_over_view().is_some());
    }

    #[test]
    fn test_known_name_skips_entry_and_restarts() {
        let mut app = App::with_backend(1, Some("ANNA".into()), None);
        force_crash(&mut app);
        assert_eq!(app.screen(), Screen::Leaderboard);

        // Simulation stays frozen on the game-over screen
        assert_eq!(app.update(1.0), 0);

        app.handle_event(InputEvent::Activate);
        assert_eq!(app.screen(), Screen::Playing);
        assert_eq!(app.runs(), 2);
        assert!(!app.state().is_over());
        assert_eq!(app.state().time_ticks, 0);
    }

    #[test]
    fn test_configured_name_follows_entry_rules() {
        let app = App::with_backend(1, Some(" ann a ".into()), None);
        assert_eq!(app.player_name(), Some("ANNA"));

        for raw in ["x", "", "   ", "sixteen_chars_xx"] {
            let app = App::with_backend(1, Some(raw.into()), None);
            assert_eq!(app.player_name(), None, "{raw:?}");
        }

        // A rejected name is asked for after the crash
        let mut app = App::with_backend(1, Some("x".into()), None);
        force_crash(&mut app);
        assert_eq!(app.screen(), Screen::EnteringName);
    }

    #[test]
    fn test_quit_from_any_screen() {
        let mut app = App::with_backend(1, None, None);
        app.handle_event(InputEvent::Quit);
        assert!(app.should_quit());
    }
}
