//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering, network or platform dependencies

pub mod collision;
pub mod difficulty;
pub mod pattern;
pub mod physics;
pub mod powerup;
pub mod scoring;
pub mod snapshot;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::{Rect, overlaps, player_hits_spike};
pub use difficulty::{DifficultyBand, difficulty};
pub use pattern::{LaneHistory, Pattern, PatternCursor, choose_next_pattern};
pub use physics::{JumpOutcome, Physics, PhysicsConstants};
pub use powerup::{PowerUpController, PowerUpKind};
pub use scoring::calculate_score;
pub use snapshot::{Hud, WorldSnapshot};
pub use spawner::{CoinSpawner, ObstacleSpawner};
pub use state::{Coin, GameEvent, GamePhase, GameState, Lane, Obstacle, Player, Transit};
pub use tick::{TickInput, tick};
