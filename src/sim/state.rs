//! Game state and core simulation types
//!
//! Everything one run needs lives in [`GameState`]; the tick functions take it
//! by `&mut` and nothing in the simulation touches globals.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::pattern::PatternCursor;
use super::physics::Physics;
use super::powerup::{PowerUpController, PowerUpKind};
use super::spawner::{CoinSpawner, ObstacleSpawner};
use crate::consts::*;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Running,
    /// Player hit a spike, simulation frozen
    GameOver,
}

/// One of the two resting lanes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Lane {
    Top,
    Bottom,
}

impl Lane {
    pub fn opposite(self) -> Self {
        match self {
            Lane::Top => Lane::Bottom,
            Lane::Bottom => Lane::Top,
        }
    }

    /// Player rest position for this lane
    pub fn rest_y(self) -> f32 {
        match self {
            Lane::Top => TOP_REST_Y,
            Lane::Bottom => BOTTOM_REST_Y,
        }
    }

    /// Spike position for this lane
    pub fn spike_y(self) -> f32 {
        match self {
            Lane::Top => SPIKE_TOP_Y,
            Lane::Bottom => SPIKE_BOTTOM_Y,
        }
    }

    pub fn coin_y(self) -> f32 {
        match self {
            Lane::Top => COIN_TOP_Y,
            Lane::Bottom => COIN_BOTTOM_Y,
        }
    }

    pub fn powerup_y(self) -> f32 {
        match self {
            Lane::Top => POWERUP_TOP_Y,
            Lane::Bottom => POWERUP_BOTTOM_Y,
        }
    }
}

/// Direction of an in-progress lane change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transit {
    /// Moving toward the ceiling lane
    Rising,
    /// Moving toward the floor lane
    Falling,
}

impl Transit {
    pub fn destination(self) -> Lane {
        match self {
            Transit::Rising => Lane::Top,
            Transit::Falling => Lane::Bottom,
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            Transit::Rising => Transit::Falling,
            Transit::Falling => Transit::Rising,
        }
    }
}

/// The player sprite
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner of the sprite
    pub pos: Vec2,
    /// Current transit velocity (pixels per tick)
    pub velocity: f32,
    /// Lane change in progress, if any
    pub transit: Option<Transit>,
    /// Set once a transit has been reversed mid-air
    pub air_redirect_used: bool,
    /// Lane changes started or reversed this run
    pub jumps: u32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::new(PLAYER_X, BOTTOM_REST_Y),
            velocity: BASE_MOVEMENT_SPEED,
            transit: None,
            air_redirect_used: false,
            jumps: 0,
        }
    }
}

impl Player {
    /// Resting exactly on one of the two lanes with no transit flag set
    pub fn is_grounded(&self) -> bool {
        self.transit.is_none() && self.resting_lane().is_some()
    }

    /// Lane whose rest offset the player is sitting on exactly
    pub fn resting_lane(&self) -> Option<Lane> {
        if self.pos.y == TOP_REST_Y {
            Some(Lane::Top)
        } else if self.pos.y == BOTTOM_REST_Y {
            Some(Lane::Bottom)
        } else {
            None
        }
    }

    /// Sprite faces the ceiling while heading for (or resting on) the top lane
    pub fn facing_up(&self) -> bool {
        match self.transit {
            Some(t) => t == Transit::Rising,
            None => self.pos.y < (TOP_REST_Y + BOTTOM_REST_Y) / 2.0,
        }
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT)
    }
}

/// Spike sprite orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpikeVariant {
    /// Standing on the floor
    Upright,
    /// Hanging from the ceiling
    Hanging,
}

/// A spike obstacle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub pos: Vec2,
    pub lane: Lane,
    pub variant: SpikeVariant,
}

impl Obstacle {
    pub fn new(lane: Lane, x: f32) -> Self {
        let variant = match lane {
            Lane::Top => SpikeVariant::Hanging,
            Lane::Bottom => SpikeVariant::Upright,
        };
        Self {
            pos: Vec2::new(x, lane.spike_y()),
            lane,
            variant,
        }
    }

    pub fn is_offscreen(&self) -> bool {
        self.pos.x < -SPIKE_SIZE
    }
}

/// The single live coin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coin {
    pub pos: Vec2,
    pub lane: Lane,
}

/// Something notable that happened during a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Jumped { air_redirect: bool },
    CoinCollected { total: u32 },
    PowerUpSpawned(PowerUpKind),
    PowerUpCollected(PowerUpKind),
    PowerUpExpired(PowerUpKind),
    PhysicsRestored,
    Crashed { score: u64 },
}

/// Complete state of one run (the simulation context)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the RNG stream was created from
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    /// Simulation ticks survived this run
    pub time_ticks: u64,
    /// Global horizontal scroll speed (pixels per tick)
    pub scroll_speed: f32,
    /// Coins collected this run
    pub coins: u32,
    pub player: Player,
    pub physics: Physics,
    /// Live spikes in spawn order
    pub obstacles: Vec<Obstacle>,
    pub coin: Option<Coin>,
    pub powerups: PowerUpController,
    pub spike_spawner: ObstacleSpawner,
    pub coin_spawner: CoinSpawner,
    /// Ground/ceiling tile scroll offset
    pub scenery_offset: f32,
    /// Score computed on the crash tick
    pub final_score: Option<u64>,
    /// Events produced by the last tick
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new run with the given seed
    pub fn new(seed: u64) -> Self {
        Self::with_rng(seed, Pcg32::seed_from_u64(seed))
    }

    /// Fresh run drawing from an existing RNG stream
    fn with_rng(seed: u64, mut rng: Pcg32) -> Self {
        let powerups = PowerUpController::new(&mut rng);
        Self {
            seed,
            rng,
            phase: GamePhase::Running,
            time_ticks: 0,
            scroll_speed: SCROLL_SPEED_START,
            coins: 0,
            player: Player::default(),
            physics: Physics::default(),
            obstacles: Vec::new(),
            coin: None,
            powerups,
            spike_spawner: ObstacleSpawner::default(),
            coin_spawner: CoinSpawner::default(),
            scenery_offset: 0.0,
            final_score: None,
            events: Vec::new(),
        }
    }

    /// Reset everything for a fresh run, continuing the RNG stream
    pub fn restart(&mut self) {
        *self = Self::with_rng(self.seed, self.rng.clone());
    }

    /// Survival time in seconds
    pub fn survival_secs(&self) -> f64 {
        crate::ticks_to_secs(self.time_ticks)
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Pattern currently driving spike placement
    pub fn pattern(&self) -> &PatternCursor {
        &self.spike_spawner.cursor
    }
}
