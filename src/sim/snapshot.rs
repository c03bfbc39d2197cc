//! Per-tick world snapshot for the render/input layer

use glam::Vec2;
use serde::Serialize;

use super::powerup::PowerUpKind;
use super::state::{GamePhase, GameState, SpikeVariant};

#[derive(Debug, Clone, Serialize)]
pub struct SpikeView {
    pub pos: Vec2,
    pub variant: SpikeVariant,
}

#[derive(Debug, Clone, Serialize)]
pub struct TokenView {
    pub kind: PowerUpKind,
    pub pos: Vec2,
}

/// Active effect banner
#[derive(Debug, Clone, Serialize)]
pub struct EffectView {
    pub kind: PowerUpKind,
    pub label: &'static str,
    pub remaining_secs: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct Hud {
    /// Survival time rounded to a tenth of a second
    pub time: f64,
    pub coins: u32,
    pub jumps: u32,
    pub effect: Option<EffectView>,
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, Serialize)]
pub struct WorldSnapshot {
    pub tick: u64,
    pub phase: GamePhase,
    pub player: Vec2,
    pub player_facing_up: bool,
    pub spikes: Vec<SpikeView>,
    pub coin: Option<Vec2>,
    pub tokens: Vec<TokenView>,
    pub scenery_offset: f32,
    pub hud: Hud,
}

impl GameState {
    pub fn snapshot(&self) -> WorldSnapshot {
        let tokens = PowerUpKind::ALL
            .iter()
            .filter_map(|&kind| {
                self.powerups
                    .slot(kind)
                    .token
                    .map(|pos| TokenView { kind, pos })
            })
            .collect();

        let effect = self.powerups.active().map(|slot| EffectView {
            kind: slot.kind,
            label: slot.kind.label(),
            remaining_secs: slot.remaining_secs(),
        });

        WorldSnapshot {
            tick: self.time_ticks,
            phase: self.phase,
            player: self.player.pos,
            player_facing_up: self.player.facing_up(),
            spikes: self
                .obstacles
                .iter()
                .map(|o| SpikeView {
                    pos: o.pos,
                    variant: o.variant,
                })
                .collect(),
            coin: self.coin.as_ref().map(|c| c.pos),
            tokens,
            scenery_offset: self.scenery_offset,
            hud: Hud {
                time: (self.survival_secs() * 10.0).round() / 10.0,
                coins: self.coins,
                jumps: self.player.jumps,
                effect,
            },
        }
    }
}
