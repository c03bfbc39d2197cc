//! Difficulty model
//!
//! Difficulty is driven purely by coins collected: it ramps linearly from 0
//! to 1 over the first ten coins and gates which spike patterns may appear.

use serde::{Deserialize, Serialize};

use crate::consts::DIFFICULTY_FULL_PICKUPS;

/// Normalized difficulty in [0, 1] for a pickup count
pub fn difficulty(pickups: u32) -> f32 {
    (pickups as f32 / DIFFICULTY_FULL_PICKUPS).min(1.0)
}

/// Coarse difficulty band used for pattern gating
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DifficultyBand {
    Low,
    Medium,
    High,
}

impl DifficultyBand {
    pub fn from_difficulty(d: f32) -> Self {
        if d < 0.3 {
            DifficultyBand::Low
        } else if d < 0.6 {
            DifficultyBand::Medium
        } else {
            DifficultyBand::High
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_difficulty_values() {
        assert_eq!(difficulty(0), 0.0);
        assert!((difficulty(5) - 0.5).abs() < 1e-6);
        assert_eq!(difficulty(10), 1.0);
        assert_eq!(difficulty(250), 1.0);
    }

    #[test]
    fn test_bands() {
        assert_eq!(DifficultyBand::from_difficulty(difficulty(0)), DifficultyBand::Low);
        assert_eq!(DifficultyBand::from_difficulty(difficulty(2)), DifficultyBand::Low);
        assert_eq!(DifficultyBand::from_difficulty(difficulty(3)), DifficultyBand::Medium);
        assert_eq!(DifficultyBand::from_difficulty(difficulty(5)), DifficultyBand::Medium);
        assert_eq!(DifficultyBand::from_difficulty(difficulty(6)), DifficultyBand::High);
        assert_eq!(DifficultyBand::from_difficulty(1.0), DifficultyBand::High);
    }

    proptest! {
        #[test]
        fn prop_difficulty_matches_formula(p in 0u32..100_000) {
            let expected = (p as f32 / 10.0).min(1.0);
            prop_assert_eq!(difficulty(p), expected);
            prop_assert!(difficulty(p) <= 1.0);
        }

        #[test]
        fn prop_difficulty_monotonic(p in 0u32..100_000) {
            prop_assert!(difficulty(p) <= difficulty(p + 1));
        }
    }
}
