//! Lane-transit physics
//!
//! The player rests on one of two lanes and jumps between them. A transit
//! starts at the current movement speed and accelerates every tick until it
//! lands exactly on the destination lane. Power-ups rescale the constants;
//! only one scaling is ever in force and it is only undone while grounded.

use serde::{Deserialize, Serialize};

use super::powerup::PowerUpKind;
use super::state::{Lane, Player, Transit};
use crate::consts::*;

/// Movement speed / acceleration pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicsConstants {
    /// Initial transit velocity (pixels per tick)
    pub movement_speed: f32,
    /// Velocity gained per tick while in transit
    pub acceleration: f32,
}

impl PhysicsConstants {
    pub const BASELINE: Self = Self {
        movement_speed: BASE_MOVEMENT_SPEED,
        acceleration: BASE_ACCELERATION,
    };

    /// Constants with a power-up's scaling applied
    pub fn scaled(self, kind: PowerUpKind) -> Self {
        let (speed_scale, accel_scale) = kind.physics_scale();
        Self {
            movement_speed: self.movement_speed * speed_scale,
            acceleration: self.acceleration * accel_scale,
        }
    }
}

/// Baseline and in-force physics constants
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Physics {
    pub baseline: PhysicsConstants,
    pub current: PhysicsConstants,
    /// Power-up whose scaling is currently applied
    pub modifier: Option<PowerUpKind>,
    /// Modifier expired mid-transit; revert on next grounded tick
    pub pending_reset: bool,
}

impl Default for Physics {
    fn default() -> Self {
        Self {
            baseline: PhysicsConstants::BASELINE,
            current: PhysicsConstants::BASELINE,
            modifier: None,
            pending_reset: false,
        }
    }
}

impl Physics {
    /// Scale the baseline constants for a collected power-up
    pub fn apply(&mut self, kind: PowerUpKind) {
        self.current = self.baseline.scaled(kind);
        self.modifier = Some(kind);
        // A fresh modifier supersedes a deferred revert of the previous one
        self.pending_reset = false;
    }

    /// Restore the baseline constants
    pub fn reset(&mut self) {
        self.current = self.baseline;
        self.modifier = None;
        self.pending_reset = false;
    }

    /// Revert now if grounded, otherwise defer until the player lands.
    /// Returns true if the constants were restored immediately.
    pub fn expire(&mut self, grounded: bool) -> bool {
        if grounded {
            self.reset();
            true
        } else {
            self.pending_reset = true;
            false
        }
    }

    /// Complete a deferred revert once grounded. Returns true if it fired.
    pub fn settle(&mut self, grounded: bool) -> bool {
        if self.pending_reset && grounded {
            self.reset();
            true
        } else {
            false
        }
    }

    pub fn is_modified(&self) -> bool {
        self.modifier.is_some()
    }
}

/// Result of a jump input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpOutcome {
    /// Left a resting lane
    Started(Transit),
    /// Reversed direction mid-air
    Redirected(Transit),
    /// Already redirected during this transit
    Ignored,
}

impl JumpOutcome {
    pub fn accepted(self) -> bool {
        !matches!(self, JumpOutcome::Ignored)
    }
}

/// Handle a jump input. Accepted jumps increment the jump counter; the caller
/// applies the scroll-speed bump.
pub fn jump(player: &mut Player, physics: &Physics) -> JumpOutcome {
    match player.transit {
        None => {
            let Some(lane) = player.resting_lane() else {
                return JumpOutcome::Ignored;
            };
            let transit = match lane {
                Lane::Bottom => Transit::Rising,
                Lane::Top => Transit::Falling,
            };
            player.transit = Some(transit);
            player.air_redirect_used = false;
            player.velocity = physics.current.movement_speed;
            player.jumps += 1;
            JumpOutcome::Started(transit)
        }
        Some(transit) if !player.air_redirect_used => {
            let reversed = transit.reversed();
            player.transit = Some(reversed);
            player.velocity = physics.current.movement_speed * AIR_REDIRECT_BOOST;
            player.air_redirect_used = true;
            player.jumps += 1;
            JumpOutcome::Redirected(reversed)
        }
        Some(_) => JumpOutcome::Ignored,
    }
}

/// Advance an in-progress transit by one tick. Returns true on landing.
pub fn advance(player: &mut Player, physics: &Physics) -> bool {
    let Some(transit) = player.transit else {
        return false;
    };
    let target = transit.destination().rest_y();

    let arrived = match transit {
        Transit::Rising => {
            player.pos.y -= player.velocity;
            player.pos.y <= target
        }
        Transit::Falling => {
            player.pos.y += player.velocity;
            player.pos.y >= target
        }
    };
    player.velocity += physics.current.acceleration;

    if arrived {
        player.pos.y = target;
        player.transit = None;
        player.air_redirect_used = false;
        player.velocity = physics.current.movement_speed;
    }
    arrived
}

#[cfg(test)]
mod tests {
    use super::*;

    fn land(player: &mut Player, physics: &Physics) -> u32 {
        let mut ticks = 0;
        while !advance(player, physics) {
            ticks += 1;
            assert!(ticks < 1000, "transit never landed");
        }
        ticks + 1
    }

    #[test]
    fn test_jump_from_floor_rises() {
        let mut player = Player::default();
        let physics = Physics::default();

        let outcome = jump(&mut player, &physics);
        assert_eq!(outcome, JumpOutcome::Started(Transit::Rising));
        assert_eq!(player.jumps, 1);
        assert_eq!(player.velocity, BASE_MOVEMENT_SPEED);
        assert!(!player.is_grounded());
    }

    #[test]
    fn test_transit_lands_exactly_on_rest_offset() {
        let mut player = Player::default();
        let physics = Physics::default();
        jump(&mut player, &physics);

        land(&mut player, &physics);
        assert_eq!(player.pos.y, TOP_REST_Y);
        assert!(player.is_grounded());
        assert!(!player.air_redirect_used);
        assert_eq!(player.velocity, BASE_MOVEMENT_SPEED);

        assert_eq!(jump(&mut player, &physics), JumpOutcome::Started(Transit::Falling));
        land(&mut player, &physics);
        assert_eq!(player.resting_lane(), Some(Lane::Bottom));
    }

    #[test]
    fn test_air_redirect_once_per_transit() {
        let mut player = Player::default();
        let physics = Physics::default();
        jump(&mut player, &physics);
        advance(&mut player, &physics);
        advance(&mut player, &physics);

        let outcome = jump(&mut player, &physics);
        assert_eq!(outcome, JumpOutcome::Redirected(Transit::Falling));
        assert!((player.velocity - BASE_MOVEMENT_SPEED * AIR_REDIRECT_BOOST).abs() < 1e-6);
        assert_eq!(player.jumps, 2);

        // Second redirect in the same transit is ignored
        assert_eq!(jump(&mut player, &physics), JumpOutcome::Ignored);
        assert_eq!(player.jumps, 2);

        land(&mut player, &physics);
        assert_eq!(player.resting_lane(), Some(Lane::Bottom));
        assert!(!player.air_redirect_used);
    }

    #[test]
    fn test_scaled_transit_is_slower() {
        let mut normal = Player::default();
        let mut slowed = Player::default();
        let base = Physics::default();
        let mut slow = Physics::default();
        slow.apply(PowerUpKind::Slow);

        jump(&mut normal, &base);
        jump(&mut slowed, &slow);
        assert!(land(&mut slowed, &slow) > land(&mut normal, &base));
    }

    #[test]
    fn test_expire_defers_until_grounded() {
        let mut physics = Physics::default();
        physics.apply(PowerUpKind::Fast);
        let fast = physics.current;

        assert!(!physics.expire(false));
        assert!(physics.pending_reset);
        assert_eq!(physics.current, fast);

        assert!(!physics.settle(false));
        assert_eq!(physics.current, fast);

        assert!(physics.settle(true));
        assert_eq!(physics.current, PhysicsConstants::BASELINE);
        assert!(!physics.pending_reset);
    }

    #[test]
    fn test_apply_clears_pending_reset() {
        let mut physics = Physics::default();
        physics.apply(PowerUpKind::Slow);
        physics.expire(false);
        physics.apply(PowerUpKind::Fast);
        assert!(!physics.settle(true));
        assert_eq!(physics.modifier, Some(PowerUpKind::Fast));
    }

    #[test]
    fn test_scaling_factors() {
        let slow = PhysicsConstants::BASELINE.scaled(PowerUpKind::Slow);
        let fast = PhysicsConstants::BASELINE.scaled(PowerUpKind::Fast);
        assert!((slow.movement_speed - 0.3).abs() < 1e-6);
        assert!((slow.acceleration - 2.8).abs() < 1e-5);
        assert!((fast.movement_speed - 1.08).abs() < 1e-6);
        assert!((fast.acceleration - 17.5).abs() < 1e-5);
    }
}
