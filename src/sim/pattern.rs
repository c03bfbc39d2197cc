//! Procedural spike patterns
//!
//! Spikes arrive in short named patterns rather than one at a time. A
//! pattern has a length (number of spawn steps) and each step emits zero,
//! one or two spikes. The selector picks the next pattern from a set gated by
//! difficulty and narrows it when the recent placements keep hitting the same
//! lane.

use std::collections::VecDeque;

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use super::difficulty::DifficultyBand;
use super::state::Lane;
use crate::consts::SPIKE_PAIR_OFFSET;

/// Spike pattern kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pattern {
    /// One ceiling spike per step
    SingleTop,
    /// One floor spike per step
    SingleBottom,
    /// Ceiling on even steps, floor on odd steps
    Alternating,
    /// Floor spike, ceiling left open
    GapTop,
    /// Ceiling spike, floor left open
    GapBottom,
    /// Four fixed steps: both, top, bottom, both
    DoubleGap,
    /// No spikes (breather)
    SafeZone,
}

/// A single spike to place on a spawn step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub lane: Lane,
    /// Horizontal offset from the spawn edge
    pub x_offset: f32,
}

const TOP: Placement = Placement {
    lane: Lane::Top,
    x_offset: 0.0,
};
const BOTTOM: Placement = Placement {
    lane: Lane::Bottom,
    x_offset: 0.0,
};
const BOTH: [Placement; 2] = [
    TOP,
    Placement {
        lane: Lane::Bottom,
        x_offset: SPIKE_PAIR_OFFSET,
    },
];

/// Fixed length of a double-gap pattern
pub const DOUBLE_GAP_LENGTH: u32 = 4;

impl Pattern {
    pub const ALL: [Pattern; 7] = [
        Pattern::SingleTop,
        Pattern::SingleBottom,
        Pattern::Alternating,
        Pattern::GapTop,
        Pattern::GapBottom,
        Pattern::DoubleGap,
        Pattern::SafeZone,
    ];

    /// Allowed at low difficulty
    pub const LOW: [Pattern; 5] = [
        Pattern::SingleTop,
        Pattern::SingleBottom,
        Pattern::SafeZone,
        Pattern::GapTop,
        Pattern::GapBottom,
    ];

    /// Allowed at medium difficulty
    pub const MEDIUM: [Pattern; 6] = [
        Pattern::SingleTop,
        Pattern::SingleBottom,
        Pattern::Alternating,
        Pattern::GapTop,
        Pattern::GapBottom,
        Pattern::DoubleGap,
    ];

    /// Forced set after a same-lane streak
    pub const STREAK_BREAKERS: [Pattern; 3] =
        [Pattern::Alternating, Pattern::SafeZone, Pattern::DoubleGap];

    /// Patterns eligible for a difficulty band
    pub fn eligible(band: DifficultyBand) -> &'static [Pattern] {
        match band {
            DifficultyBand::Low => &Self::LOW,
            DifficultyBand::Medium => &Self::MEDIUM,
            DifficultyBand::High => &Self::ALL,
        }
    }

    /// Roll a length (spawn steps) for this pattern
    pub fn roll_length(self, rng: &mut impl Rng) -> u32 {
        match self {
            Pattern::SafeZone => rng.random_range(2..=4),
            Pattern::Alternating => rng.random_range(3..=6),
            Pattern::DoubleGap => DOUBLE_GAP_LENGTH,
            Pattern::SingleTop | Pattern::SingleBottom | Pattern::GapTop | Pattern::GapBottom => {
                rng.random_range(1..=3)
            }
        }
    }

    /// Spikes emitted at the given step of this pattern
    pub fn spawn_step(self, progress: u32) -> &'static [Placement] {
        match self {
            Pattern::SafeZone => &[],
            Pattern::SingleTop => &[TOP],
            Pattern::SingleBottom => &[BOTTOM],
            Pattern::Alternating => {
                if progress % 2 == 0 {
                    &[TOP]
                } else {
                    &[BOTTOM]
                }
            }
            // The "gap" is the open lane, so the spike sits opposite the name
            Pattern::GapTop => &[BOTTOM],
            Pattern::GapBottom => &[TOP],
            Pattern::DoubleGap => {
                debug_assert!(progress < DOUBLE_GAP_LENGTH, "double-gap step {progress}");
                match progress {
                    0 | 3 => &BOTH,
                    1 => &[TOP],
                    _ => &[BOTTOM],
                }
            }
        }
    }
}

/// Number of recent single-lane placements remembered
pub const HISTORY_LEN: usize = 5;
/// Run length of same-lane placements that forces a streak breaker
pub const STREAK_LIMIT: usize = 3;

/// Rolling window of recent single-lane spike placements
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LaneHistory {
    recent: VecDeque<Lane>,
}

impl LaneHistory {
    pub fn record(&mut self, lane: Lane) {
        self.recent.push_back(lane);
        if self.recent.len() > HISTORY_LEN {
            self.recent.pop_front();
        }
    }

    /// Length of the same-lane run at the end of the window
    pub fn streak(&self) -> usize {
        let Some(last) = self.recent.back() else {
            return 0;
        };
        self.recent.iter().rev().take_while(|l| *l == last).count()
    }

    pub fn streak_exceeded(&self) -> bool {
        self.streak() >= STREAK_LIMIT
    }

    pub fn recent(&self) -> impl Iterator<Item = &Lane> {
        self.recent.iter()
    }
}

/// Choose the next pattern and its length
pub fn choose_next_pattern(
    history: &LaneHistory,
    difficulty: f32,
    rng: &mut impl Rng,
) -> (Pattern, u32) {
    let pool: &[Pattern] = if history.streak_exceeded() {
        &Pattern::STREAK_BREAKERS
    } else {
        Pattern::eligible(DifficultyBand::from_difficulty(difficulty))
    };
    let pattern = *pool.choose(rng).unwrap_or(&Pattern::SafeZone);
    (pattern, pattern.roll_length(rng))
}

/// The pattern in play and how far through it spawning has got
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatternCursor {
    pub pattern: Option<Pattern>,
    pub length: u32,
    pub progress: u32,
}

impl PatternCursor {
    /// A new pattern must be chosen before the next spawn
    pub fn is_finished(&self) -> bool {
        self.pattern.is_none() || self.progress >= self.length
    }

    pub fn start(&mut self, pattern: Pattern, length: u32) {
        debug_assert!(length > 0, "zero-length pattern {pattern:?}");
        self.pattern = Some(pattern);
        self.length = length;
        self.progress = 0;
    }

    pub fn advance(&mut self) {
        self.progress += 1;
        debug_assert!(self.progress <= self.length);
    }
}
