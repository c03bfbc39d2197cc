//! Run-It - A two-lane endless runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (lanes, spike patterns, power-ups, scoring)
//! - `highscores`: Leaderboard model (dedupe per name, top 10)
//! - `persistence`: Leaderboard backends and background sync
//! - `platform`: Input events from the render/input layer
//! - `ui`: Name entry and game-over screen models
//! - `app`: Session flow around the simulation

pub mod app;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod ui;

pub use app::{App, Screen};
pub use highscores::{HighScoreEntry, HighScores, LeaderboardState};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Simulation rate (ticks per second)
    pub const TICK_RATE: u32 = 60;
    /// Fixed simulation timestep
    pub const SIM_DT: f32 = 1.0 / TICK_RATE as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Screen dimensions
    pub const SCREEN_WIDTH: f32 = 500.0;
    pub const SCREEN_HEIGHT: f32 = 800.0;

    /// Player sprite (12x14 at 4x)
    pub const PLAYER_WIDTH: f32 = 48.0;
    pub const PLAYER_HEIGHT: f32 = 56.0;
    pub const PLAYER_X: f32 = 50.0;
    /// Margin between the lanes and the screen edges
    pub const LANE_MARGIN: f32 = 40.0;
    /// Rest position of the ceiling lane
    pub const TOP_REST_Y: f32 = LANE_MARGIN;
    /// Rest position of the floor lane
    pub const BOTTOM_REST_Y: f32 = SCREEN_HEIGHT - PLAYER_HEIGHT - LANE_MARGIN;

    /// Baseline transit physics
    pub const BASE_MOVEMENT_SPEED: f32 = 0.6;
    pub const BASE_ACCELERATION: f32 = 7.0;
    /// Velocity multiplier for a mid-air direction change
    pub const AIR_REDIRECT_BOOST: f32 = 1.2;

    /// Spike sprite (16x12 at 3x, square hitbox)
    pub const SPIKE_SIZE: f32 = 48.0;
    pub const SPIKE_TOP_Y: f32 = LANE_MARGIN;
    pub const SPIKE_BOTTOM_Y: f32 = SCREEN_HEIGHT - SPIKE_SIZE - 34.0;
    /// Horizontal stagger of the second spike in a dual placement
    pub const SPIKE_PAIR_OFFSET: f32 = SPIKE_SIZE + 10.0;
    /// Hitbox inset on each side (fraction of sprite size)
    pub const HITBOX_INSET: f32 = 0.1;

    /// Spike spawn cadence (ticks)
    pub const SPIKE_INTERVAL_START: u32 = 45;
    pub const SPIKE_INTERVAL_MIN: u32 = 15;
    pub const SPIKE_INTERVAL_STEP: u32 = 5;

    /// Coin sprite and spawn cadence (ticks)
    pub const COIN_SIZE: f32 = 48.0;
    pub const COIN_TOP_Y: f32 = LANE_MARGIN;
    pub const COIN_BOTTOM_Y: f32 = SCREEN_HEIGHT - COIN_SIZE - LANE_MARGIN;
    pub const COIN_INTERVAL_START: u32 = 150;
    pub const COIN_INTERVAL_MIN: u32 = 50;
    pub const COIN_INTERVAL_STEP: u32 = 10;

    /// Global scroll speed escalation
    pub const SCROLL_SPEED_START: f32 = 6.0;
    pub const SCROLL_SPEED_PER_TICK: f32 = 0.001;
    pub const SCROLL_SPEED_PER_JUMP: f32 = 0.01;
    pub const SCROLL_SPEED_PER_COIN: f32 = 0.1;

    /// Power-up tokens
    pub const POWERUP_SIZE: f32 = 48.0;
    pub const POWERUP_TOP_Y: f32 = 60.0;
    pub const POWERUP_BOTTOM_Y: f32 = SCREEN_HEIGHT - POWERUP_SIZE - 60.0;
    /// Effect duration (10 seconds)
    pub const POWERUP_DURATION_TICKS: u32 = 10 * TICK_RATE;
    /// Shared spawn cooldown after any successful token spawn (1 second)
    pub const POWERUP_SPAWN_COOLDOWN: u32 = TICK_RATE;
    /// Re-randomized spawn interval bounds (30-60 seconds)
    pub const POWERUP_INTERVAL_MIN: u32 = 30 * TICK_RATE;
    pub const POWERUP_INTERVAL_MAX: u32 = 60 * TICK_RATE;
    /// Tokens are not placed this close to a live spike
    pub const POWERUP_CLEARANCE_X: f32 = 200.0;
    pub const POWERUP_CLEARANCE_Y: f32 = 100.0;

    /// Pickups needed for full difficulty
    pub const DIFFICULTY_FULL_PICKUPS: f32 = 10.0;

    /// Width of one ground/ceiling scenery tile
    pub const SCENERY_TILE_WIDTH: f32 = 96.0;
}

/// Convert a tick count to seconds of simulated time
#[inline]
pub fn ticks_to_secs(ticks: u64) -> f64 {
    ticks as f64 / consts::TICK_RATE as f64
}

/// Current local time formatted the way leaderboard dates are stored
pub fn timestamp_now() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M").to_string()
}
