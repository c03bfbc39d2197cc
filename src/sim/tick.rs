//! Fixed timestep simulation tick
//!
//! Order within a tick: input, power-ups, player transit, spike spawning and
//! scrolling, coin spawning and pickup, spike collision, clocks.

use super::collision::{player_hits_spike, player_touches_coin};
use super::difficulty::difficulty;
use super::physics;
use super::scoring::calculate_score;
use super::spawner::{scroll_coin, scroll_obstacles};
use super::state::{GameEvent, GamePhase, GameState, Obstacle};
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Jump / switch lanes
    pub activate: bool,
    /// Idle/demo mode - AI plays the game
    pub idle_mode: bool,
}

/// How far ahead of the player the autopilot looks for spikes
const AUTOPILOT_LOOKAHEAD: f32 = 120.0;

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    state.events.clear();

    if state.phase == GamePhase::GameOver {
        return;
    }

    let activate = input.activate || (input.idle_mode && autopilot_wants_jump(state));
    if activate {
        let outcome = physics::jump(&mut state.player, &state.physics);
        if outcome.accepted() {
            state.scroll_speed += SCROLL_SPEED_PER_JUMP;
            state.events.push(GameEvent::Jumped {
                air_redirect: matches!(outcome, physics::JumpOutcome::Redirected(_)),
            });
        }
    }

    state.powerups.update(
        &mut state.rng,
        &state.obstacles,
        &state.player,
        &mut state.physics,
        state.scroll_speed,
        &mut state.events,
    );

    if physics::advance(&mut state.player, &state.physics)
        && state.physics.settle(state.player.is_grounded())
    {
        state.events.push(GameEvent::PhysicsRestored);
    }

    state.spike_spawner.update(
        difficulty(state.coins),
        &mut state.rng,
        &mut state.obstacles,
    );
    scroll_obstacles(&mut state.obstacles, state.scroll_speed);

    state
        .coin_spawner
        .update(&mut state.coin, &mut state.rng, &state.obstacles);
    scroll_coin(&mut state.coin, state.scroll_speed);
    if state
        .coin
        .as_ref()
        .is_some_and(|c| player_touches_coin(&state.player, c))
    {
        collect_coin(state);
    }

    if player_hits_spike(&state.player, &state.obstacles).is_some() {
        crash(state);
        return;
    }

    state.scenery_offset =
        (state.scenery_offset - state.scroll_speed).rem_euclid(SCENERY_TILE_WIDTH);
    state.time_ticks += 1;
    state.scroll_speed += SCROLL_SPEED_PER_TICK;
}

fn collect_coin(state: &mut GameState) {
    state.coin = None;
    state.coins += 1;
    state.scroll_speed += SCROLL_SPEED_PER_COIN;
    state.coin_spawner.tighten();
    state.spike_spawner.tighten();
    log::debug!(
        "coin {} collected, speed {:.2}, spike interval {}",
        state.coins,
        state.scroll_speed,
        state.spike_spawner.interval
    );
    state.events.push(GameEvent::CoinCollected { total: state.coins });
}

/// Terminal collision: freeze the world and compute the score once
fn crash(state: &mut GameState) {
    let score = calculate_score(state.coins, state.survival_secs(), state.player.jumps);
    state.final_score = Some(score);
    state.phase = GamePhase::GameOver;
    state.scroll_speed = 0.0;
    log::info!(
        "crashed after {:.1}s: {} coins, {} jumps, score {}",
        state.survival_secs(),
        state.coins,
        state.player.jumps,
        score
    );
    state.events.push(GameEvent::Crashed { score });
}

/// Jump when a spike is closing in on our lane and the other lane is clear
fn autopilot_wants_jump(state: &GameState) -> bool {
    let player = &state.player;
    let Some(lane) = player.resting_lane() else {
        return false;
    };
    if !player.is_grounded() {
        return false;
    }

    let near = |o: &Obstacle| {
        o.pos.x + SPIKE_SIZE > PLAYER_X && o.pos.x < PLAYER_X + PLAYER_WIDTH + AUTOPILOT_LOOKAHEAD
    };
    let threatened = state.obstacles.iter().any(|o| o.lane == lane && near(o));
    let other_blocked = state
        .obstacles
        .iter()
        .any(|o| o.lane == lane.opposite() && near(o));

    threatened && !other_blocked
}
