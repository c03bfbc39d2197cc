//! Timed clock power-ups
//!
//! Two tokens are scheduled independently: the slow clock softens transit
//! physics, the fast clock sharpens it. Each kind moves through
//! `unspawned -> on screen -> active -> expired`. Both tokens may be on screen
//! together, but only one effect can be active at a time: touching a token
//! while either effect runs does nothing.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::{Rect, overlaps};
use super::physics::Physics;
use super::state::{GameEvent, Lane, Obstacle, Player};
use crate::consts::*;

/// Power-up kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Beneficial: slower, more controllable transits
    Slow,
    /// Adverse: faster, harder to control transits
    Fast,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 2] = [PowerUpKind::Slow, PowerUpKind::Fast];

    /// (movement speed, acceleration) multipliers
    pub fn physics_scale(self) -> (f32, f32) {
        match self {
            PowerUpKind::Slow => (0.5, 0.4),
            PowerUpKind::Fast => (1.8, 2.5),
        }
    }

    /// HUD label
    pub fn label(self) -> &'static str {
        match self {
            PowerUpKind::Slow => "SLOW TIME",
            PowerUpKind::Fast => "SPEED CHAOS",
        }
    }
}

/// Per-kind scheduling and effect state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUpSlot {
    pub kind: PowerUpKind,
    /// Token position while on screen
    pub token: Option<Vec2>,
    pub active: bool,
    /// Effect ticks left while active
    pub remaining_ticks: u32,
    /// Ticks since the last spawn attempt
    pub spawn_timer: u32,
    /// Ticks between spawn attempts (re-rolled after every attempt)
    pub spawn_interval: u32,
}

impl PowerUpSlot {
    fn new(kind: PowerUpKind, rng: &mut impl Rng) -> Self {
        Self {
            kind,
            token: None,
            active: false,
            remaining_ticks: 0,
            spawn_timer: 0,
            spawn_interval: roll_interval(rng),
        }
    }

    pub fn token_rect(&self) -> Option<Rect> {
        self.token.map(|pos| Rect::new(pos, Vec2::splat(POWERUP_SIZE)))
    }

    /// Seconds of effect left, for the HUD
    pub fn remaining_secs(&self) -> f32 {
        self.remaining_ticks as f32 * SIM_DT
    }
}

fn roll_interval(rng: &mut impl Rng) -> u32 {
    rng.random_range(POWERUP_INTERVAL_MIN..=POWERUP_INTERVAL_MAX)
}

/// Both power-up slots plus the shared spawn cooldown
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUpController {
    pub slow: PowerUpSlot,
    pub fast: PowerUpSlot,
    /// Ticks until any token may spawn again
    pub spawn_cooldown: u32,
}

impl PowerUpController {
    pub fn new(rng: &mut impl Rng) -> Self {
        Self {
            slow: PowerUpSlot::new(PowerUpKind::Slow, rng),
            fast: PowerUpSlot::new(PowerUpKind::Fast, rng),
            spawn_cooldown: 0,
        }
    }

    pub fn slot(&self, kind: PowerUpKind) -> &PowerUpSlot {
        match kind {
            PowerUpKind::Slow => &self.slow,
            PowerUpKind::Fast => &self.fast,
        }
    }

    pub fn slot_mut(&mut self, kind: PowerUpKind) -> &mut PowerUpSlot {
        match kind {
            PowerUpKind::Slow => &mut self.slow,
            PowerUpKind::Fast => &mut self.fast,
        }
    }

    /// Effect currently in force, if any
    pub fn active(&self) -> Option<&PowerUpSlot> {
        [&self.slow, &self.fast].into_iter().find(|s| s.active)
    }

    pub fn any_active(&self) -> bool {
        self.slow.active || self.fast.active
    }

    /// Try to put a token on screen. The interval is re-rolled whether or not
    /// the attempt succeeds. Returns true if a token was placed.
    pub fn try_spawn(
        &mut self,
        kind: PowerUpKind,
        rng: &mut impl Rng,
        obstacles: &[Obstacle],
    ) -> bool {
        let cooldown_clear = self.spawn_cooldown == 0;
        let slot = self.slot_mut(kind);
        let mut placed = false;

        if slot.token.is_none() && cooldown_clear {
            let lane = if rng.random_bool(0.5) {
                Lane::Top
            } else {
                Lane::Bottom
            };
            let candidate = Vec2::new(SCREEN_WIDTH, lane.powerup_y());
            let blocked = obstacles.iter().any(|o| {
                (o.pos.x - candidate.x).abs() < POWERUP_CLEARANCE_X
                    && (o.pos.y - candidate.y).abs() < POWERUP_CLEARANCE_Y
            });
            if !blocked {
                slot.token = Some(candidate);
                placed = true;
            }
        }

        slot.spawn_timer = 0;
        slot.spawn_interval = roll_interval(rng);

        if placed {
            self.spawn_cooldown = POWERUP_SPAWN_COOLDOWN;
        }
        placed
    }

    /// Activate a kind's effect (token collected)
    fn activate(&mut self, kind: PowerUpKind, physics: &mut Physics) {
        let slot = self.slot_mut(kind);
        slot.token = None;
        slot.active = true;
        slot.remaining_ticks = POWERUP_DURATION_TICKS;
        physics.apply(kind);
    }

    /// Advance scheduling, token movement, collection and expiry by one tick
    pub fn update(
        &mut self,
        rng: &mut impl Rng,
        obstacles: &[Obstacle],
        player: &Player,
        physics: &mut Physics,
        scroll_speed: f32,
        events: &mut Vec<GameEvent>,
    ) {
        self.spawn_cooldown = self.spawn_cooldown.saturating_sub(1);

        for kind in PowerUpKind::ALL {
            let slot = self.slot_mut(kind);
            slot.spawn_timer += 1;
            if slot.spawn_timer >= slot.spawn_interval && self.try_spawn(kind, rng, obstacles) {
                log::debug!("{:?} clock spawned", kind);
                events.push(GameEvent::PowerUpSpawned(kind));
            }
        }

        for kind in PowerUpKind::ALL {
            let slot = self.slot_mut(kind);
            if let Some(pos) = slot.token.as_mut() {
                pos.x -= scroll_speed;
                if pos.x < -POWERUP_SIZE {
                    slot.token = None;
                }
            }
        }

        let player_rect = Rect::new(player.pos, player.size());
        for kind in PowerUpKind::ALL {
            if self.any_active() {
                break;
            }
            let touched = self
                .slot(kind)
                .token_rect()
                .is_some_and(|r| overlaps(&player_rect, &r));
            if touched {
                self.activate(kind, physics);
                log::debug!("{:?} clock collected", kind);
                events.push(GameEvent::PowerUpCollected(kind));
            }
        }

        let grounded = player.is_grounded();
        for kind in PowerUpKind::ALL {
            let slot = self.slot_mut(kind);
            if !slot.active {
                continue;
            }
            slot.remaining_ticks = slot.remaining_ticks.saturating_sub(1);
            if slot.remaining_ticks == 0 {
                slot.active = false;
                events.push(GameEvent::PowerUpExpired(kind));
                if physics.expire(grounded) {
                    events.push(GameEvent::PhysicsRestored);
                } else {
                    log::debug!("{:?} expired mid-transit, revert deferred", kind);
                }
            }
        }

        if physics.settle(grounded) {
            events.push(GameEvent::PhysicsRestored);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Transit;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn controller() -> (PowerUpController, Pcg32) {
        let mut rng = Pcg32::seed_from_u64(3);
        (PowerUpController::new(&mut rng), rng)
    }

    /// Token placed right on top of the player
    fn token_on_player(player: &Player) -> Option<Vec2> {
        Some(player.pos)
    }

    #[test]
    fn test_initial_intervals_in_range() {
        let (ctl, _) = controller();
        for slot in [&ctl.slow, &ctl.fast] {
            assert!(slot.spawn_interval >= POWERUP_INTERVAL_MIN);
            assert!(slot.spawn_interval <= POWERUP_INTERVAL_MAX);
            assert!(slot.token.is_none());
        }
    }

    #[test]
    fn test_spawn_sets_shared_cooldown() {
        let (mut ctl, mut rng) = controller();
        assert!(ctl.try_spawn(PowerUpKind::Slow, &mut rng, &[]));
        assert_eq!(ctl.spawn_cooldown, POWERUP_SPAWN_COOLDOWN);

        // Other kind blocked by cooldown, but its interval is still re-rolled
        ctl.fast.spawn_timer = 99;
        assert!(!ctl.try_spawn(PowerUpKind::Fast, &mut rng, &[]));
        assert!(ctl.fast.token.is_none());
        assert_eq!(ctl.fast.spawn_timer, 0);
    }

    #[test]
    fn test_spawn_rejected_near_obstacle() {
        let (mut ctl, mut rng) = controller();
        let obstacles = vec![
            Obstacle::new(Lane::Top, SCREEN_WIDTH - 50.0),
            Obstacle::new(Lane::Bottom, SCREEN_WIDTH - 50.0),
        ];
        assert!(!ctl.try_spawn(PowerUpKind::Fast, &mut rng, &obstacles));
        assert!(ctl.fast.token.is_none());
        assert_eq!(ctl.spawn_cooldown, 0);
    }

    #[test]
    fn test_spawn_ignored_while_token_on_screen() {
        let (mut ctl, mut rng) = controller();
        ctl.slow.token = Some(Vec2::new(200.0, POWERUP_TOP_Y));
        assert!(!ctl.try_spawn(PowerUpKind::Slow, &mut rng, &[]));
        assert_eq!(ctl.slow.token, Some(Vec2::new(200.0, POWERUP_TOP_Y)));
    }

    #[test]
    fn test_collect_applies_scaling() {
        let (mut ctl, mut rng) = controller();
        let player = Player::default();
        let mut physics = Physics::default();
        let mut events = Vec::new();
        ctl.slow.token = token_on_player(&player);

        ctl.update(&mut rng, &[], &player, &mut physics, 0.0, &mut events);

        assert!(ctl.slow.active);
        assert!(ctl.slow.token.is_none());
        assert_eq!(ctl.slow.remaining_ticks, POWERUP_DURATION_TICKS - 1);
        assert_eq!(physics.modifier, Some(PowerUpKind::Slow));
        assert!(events.contains(&GameEvent::PowerUpCollected(PowerUpKind::Slow)));
    }

    #[test]
    fn test_collection_blocked_while_other_active() {
        let (mut ctl, mut rng) = controller();
        let player = Player::default();
        let mut physics = Physics::default();
        let mut events = Vec::new();
        ctl.slow.token = token_on_player(&player);
        ctl.fast.token = token_on_player(&player);

        ctl.update(&mut rng, &[], &player, &mut physics, 0.0, &mut events);
        assert!(ctl.slow.active);
        assert!(!ctl.fast.active);
        // The fast token stays on screen, untouched
        assert!(ctl.fast.token.is_some());
    }

    #[test]
    fn test_expiry_while_grounded_reverts_immediately() {
        let (mut ctl, mut rng) = controller();
        let player = Player::default();
        let mut physics = Physics::default();
        let mut events = Vec::new();
        ctl.fast.active = true;
        ctl.fast.remaining_ticks = 1;
        physics.apply(PowerUpKind::Fast);

        ctl.update(&mut rng, &[], &player, &mut physics, 0.0, &mut events);
        assert!(!ctl.fast.active);
        assert!(!physics.is_modified());
        assert!(events.contains(&GameEvent::PhysicsRestored));
    }

    #[test]
    fn test_expiry_mid_transit_defers_revert() {
        let (mut ctl, mut rng) = controller();
        let mut player = Player::default();
        player.transit = Some(Transit::Rising);
        player.pos.y = 400.0;
        let mut physics = Physics::default();
        let mut events = Vec::new();
        ctl.slow.active = true;
        ctl.slow.remaining_ticks = 1;
        physics.apply(PowerUpKind::Slow);
        let slowed = physics.current;

        ctl.update(&mut rng, &[], &player, &mut physics, 0.0, &mut events);
        assert!(!ctl.slow.active);
        assert!(physics.pending_reset);
        assert_eq!(physics.current, slowed);

        player.transit = None;
        player.pos.y = TOP_REST_Y;
        events.clear();
        ctl.update(&mut rng, &[], &player, &mut physics, 0.0, &mut events);
        assert_eq!(physics.current, physics.baseline);
        assert_eq!(events, vec![GameEvent::PhysicsRestored]);
    }

    #[test]
    fn test_tokens_scroll_off_screen() {
        let (mut ctl, mut rng) = controller();
        let player = Player::default();
        let mut physics = Physics::default();
        let mut events = Vec::new();
        ctl.fast.token = Some(Vec2::new(-POWERUP_SIZE + 1.0, POWERUP_TOP_Y));

        ctl.update(&mut rng, &[], &player, &mut physics, 6.0, &mut events);
        assert!(ctl.fast.token.is_none());
    }

    proptest! {
        #[test]
        fn prop_never_both_active(seed in any::<u64>(), ticks in 1usize..4000) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut ctl = PowerUpController::new(&mut rng);
            let player = Player::default();
            let mut physics = Physics::default();
            let mut events = Vec::new();
            for i in 0..ticks {
                // Keep dropping tokens onto the player to force contention
                if i % 7 == 0 { ctl.slow.token = Some(player.pos); }
                if i % 11 == 0 { ctl.fast.token = Some(player.pos); }
                ctl.update(&mut rng, &[], &player, &mut physics, 0.0, &mut events);
                prop_assert!(!(ctl.slow.active && ctl.fast.active));
                prop_assert_eq!(physics.is_modified(), ctl.any_active());
            }
        }
    }
}
