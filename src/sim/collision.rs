//! Axis-aligned collision detection
//!
//! Sprites are rectangles anchored at their top-left corner. Spike contact
//! uses hitboxes inset by 10% on every side so grazing a sprite corner is
//! forgiven; coins and power-ups use the full sprite.

use glam::Vec2;

use super::state::{Coin, Obstacle, Player};
use crate::consts::*;

/// Axis-aligned rectangle (top-left origin, y down)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    /// Shrink by `fraction` of the size on every side
    pub fn inset(&self, fraction: f32) -> Self {
        Self {
            min: self.min + self.size * fraction,
            size: self.size * (1.0 - 2.0 * fraction),
        }
    }
}

/// Strict overlap test (touching edges do not collide)
#[inline]
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    let (a_max, b_max) = (a.max(), b.max());
    a.min.x < b_max.x && a_max.x > b.min.x && a.min.y < b_max.y && a_max.y > b.min.y
}

/// Player hitbox used against spikes
pub fn player_hitbox(player: &Player) -> Rect {
    Rect::new(player.pos, player.size()).inset(HITBOX_INSET)
}

pub fn spike_hitbox(obstacle: &Obstacle) -> Rect {
    Rect::new(obstacle.pos, Vec2::splat(SPIKE_SIZE)).inset(HITBOX_INSET)
}

pub fn coin_rect(coin: &Coin) -> Rect {
    Rect::new(coin.pos, Vec2::splat(COIN_SIZE))
}

/// First spike the player is touching, if any
pub fn player_hits_spike<'a>(player: &Player, obstacles: &'a [Obstacle]) -> Option<&'a Obstacle> {
    let hitbox = player_hitbox(player);
    obstacles.iter().find(|o| overlaps(&hitbox, &spike_hitbox(o)))
}

pub fn player_touches_coin(player: &Player, coin: &Coin) -> bool {
    overlaps(&Rect::new(player.pos, player.size()), &coin_rect(coin))
}
