//! Spike and coin spawning
//!
//! Both spawners count ticks toward an interval that tightens as coins are
//! collected. The spike spawner runs one pattern step per interval; the coin
//! spawner keeps at most one coin alive.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::pattern::{LaneHistory, PatternCursor, choose_next_pattern};
use super::state::{Coin, Lane, Obstacle};
use crate::consts::*;

/// Drives spike placement from the current pattern
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObstacleSpawner {
    /// Ticks counted toward the next spawn step
    pub timer: u32,
    /// Ticks between spawn steps
    pub interval: u32,
    pub cursor: PatternCursor,
    pub history: LaneHistory,
}

impl Default for ObstacleSpawner {
    fn default() -> Self {
        Self {
            timer: 0,
            interval: SPIKE_INTERVAL_START,
            cursor: PatternCursor::default(),
            history: LaneHistory::default(),
        }
    }
}

impl ObstacleSpawner {
    /// Count one tick; run a spawn step when the interval is reached.
    /// Returns the number of spikes placed.
    pub fn update(
        &mut self,
        difficulty: f32,
        rng: &mut impl Rng,
        obstacles: &mut Vec<Obstacle>,
    ) -> usize {
        let mut placed = 0;
        if self.timer >= self.interval {
            placed = self.spawn_step(difficulty, rng, obstacles);
            self.timer = 0;
        }
        self.timer += 1;
        placed
    }

    /// Emit the current pattern step, choosing a new pattern first if the
    /// previous one is used up
    pub fn spawn_step(
        &mut self,
        difficulty: f32,
        rng: &mut impl Rng,
        obstacles: &mut Vec<Obstacle>,
    ) -> usize {
        if self.cursor.is_finished() {
            let (pattern, length) = choose_next_pattern(&self.history, difficulty, rng);
            log::debug!(
                "pattern {:?} x{} (difficulty {:.1}, streak {})",
                pattern,
                length,
                difficulty,
                self.history.streak()
            );
            self.cursor.start(pattern, length);
        }

        let Some(pattern) = self.cursor.pattern else {
            return 0;
        };
        let placements = pattern.spawn_step(self.cursor.progress);
        for p in placements {
            obstacles.push(Obstacle::new(p.lane, SCREEN_WIDTH + p.x_offset));
        }
        if let [single] = placements {
            self.history.record(single.lane);
        }
        self.cursor.advance();
        placements.len()
    }

    /// Tighten the cadence after a coin pickup
    pub fn tighten(&mut self) {
        self.interval = tightened(self.interval, SPIKE_INTERVAL_STEP, SPIKE_INTERVAL_MIN);
    }
}

/// Spawns and tracks the single coin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoinSpawner {
    pub timer: u32,
    pub interval: u32,
}

impl Default for CoinSpawner {
    fn default() -> Self {
        Self {
            timer: 0,
            interval: COIN_INTERVAL_START,
        }
    }
}

impl CoinSpawner {
    /// Count one tick; attempt a placement when due and no coin is live
    pub fn update(&mut self, coin: &mut Option<Coin>, rng: &mut impl Rng, obstacles: &[Obstacle]) {
        if self.timer >= self.interval && coin.is_none() {
            let lane = if rng.random_bool(0.5) {
                Lane::Top
            } else {
                Lane::Bottom
            };
            let x = SCREEN_WIDTH;
            let blocked = obstacles.iter().any(|o| {
                o.lane == lane && o.pos.x < x + COIN_SIZE && o.pos.x + SPIKE_SIZE > x
            });
            if !blocked {
                *coin = Some(Coin {
                    pos: Vec2::new(x, lane.coin_y()),
                    lane,
                });
            }
            self.timer = 0;
        }
        self.timer += 1;
    }

    pub fn tighten(&mut self) {
        self.interval = tightened(self.interval, COIN_INTERVAL_STEP, COIN_INTERVAL_MIN);
    }
}

/// Shorten an interval by `step`, never below `floor` and never lengthening it
fn tightened(interval: u32, step: u32, floor: u32) -> u32 {
    interval.saturating_sub(step).max(floor).min(interval)
}

/// Scroll spikes left and drop the ones past the left edge
pub fn scroll_obstacles(obstacles: &mut Vec<Obstacle>, speed: f32) {
    for o in obstacles.iter_mut() {
        o.pos.x -= speed;
    }
    obstacles.retain(|o| !o.is_offscreen());
}

/// Scroll the coin, clearing it once off screen
pub fn scroll_coin(coin: &mut Option<Coin>, speed: f32) {
    if let Some(c) = coin.as_mut() {
        c.pos.x -= speed;
        if c.pos.x < -COIN_SIZE {
            *coin = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::pattern::Pattern;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_spawns_on_interval() {
        let mut spawner = ObstacleSpawner::default();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut obstacles = Vec::new();

        // First step fires once the timer reaches the interval
        let mut steps = 0;
        for _ in 0..=SPIKE_INTERVAL_START {
            if spawner.cursor.pattern.is_some() {
                break;
            }
            spawner.update(0.0, &mut rng, &mut obstacles);
            steps += 1;
        }
        assert_eq!(steps, SPIKE_INTERVAL_START + 1);
        assert_eq!(spawner.cursor.progress, 1);
    }

    #[test]
    fn test_new_pattern_chosen_when_exhausted() {
        let mut spawner = ObstacleSpawner::default();
        let mut rng = Pcg32::seed_from_u64(2);
        let mut obstacles = Vec::new();
        spawner.cursor.start(Pattern::SingleTop, 1);

        spawner.spawn_step(0.0, &mut rng, &mut obstacles);
        assert!(spawner.cursor.is_finished());
        assert_eq!(obstacles.len(), 1);
        assert_eq!(obstacles[0].lane, Lane::Top);

        spawner.spawn_step(0.0, &mut rng, &mut obstacles);
        assert_eq!(spawner.cursor.progress, 1);
    }

    #[test]
    fn test_double_gap_places_pair_and_skips_history() {
        let mut spawner = ObstacleSpawner::default();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut obstacles = Vec::new();
        spawner.cursor.start(Pattern::DoubleGap, 4);

        spawner.spawn_step(1.0, &mut rng, &mut obstacles);
        assert_eq!(obstacles.len(), 2);
        assert_eq!(obstacles[1].pos.x, SCREEN_WIDTH + SPIKE_PAIR_OFFSET);
        assert_eq!(spawner.history.recent().count(), 0);

        spawner.spawn_step(1.0, &mut rng, &mut obstacles);
        assert_eq!(spawner.history.recent().copied().collect::<Vec<_>>(), vec![Lane::Top]);
    }

    #[test]
    fn test_tighten_floors() {
        let mut spawner = ObstacleSpawner::default();
        for _ in 0..100 {
            spawner.tighten();
        }
        assert_eq!(spawner.interval, SPIKE_INTERVAL_MIN);

        let mut coins = CoinSpawner::default();
        coins.tighten();
        assert_eq!(coins.interval, COIN_INTERVAL_START - COIN_INTERVAL_STEP);
        for _ in 0..100 {
            coins.tighten();
        }
        assert_eq!(coins.interval, COIN_INTERVAL_MIN);
    }

    #[test]
    fn test_tightened_never_lengthens() {
        assert_eq!(tightened(45, 20, 80), 45);
        assert_eq!(tightened(100, 20, 80), 80);
    }

    #[test]
    fn test_scroll_removes_offscreen() {
        let mut obstacles = vec![
            Obstacle::new(Lane::Top, -SPIKE_SIZE + 1.0),
            Obstacle::new(Lane::Bottom, 200.0),
        ];
        scroll_obstacles(&mut obstacles, 5.0);
        assert_eq!(obstacles.len(), 1);
        assert_eq!(obstacles[0].pos.x, 195.0);
    }

    #[test]
    fn test_coin_spawn_blocked_by_same_lane_spike() {
        let mut spawner = CoinSpawner {
            timer: COIN_INTERVAL_START,
            interval: COIN_INTERVAL_START,
        };
        let obstacles = vec![
            Obstacle::new(Lane::Top, SCREEN_WIDTH),
            Obstacle::new(Lane::Bottom, SCREEN_WIDTH),
        ];
        let mut coin = None;
        let mut rng = Pcg32::seed_from_u64(4);
        spawner.update(&mut coin, &mut rng, &obstacles);
        assert!(coin.is_none());
        assert_eq!(spawner.timer, 1);
    }

    #[test]
    fn test_coin_spawns_when_clear() {
        let mut spawner = CoinSpawner {
            timer: COIN_INTERVAL_START,
            interval: COIN_INTERVAL_START,
        };
        let mut coin = None;
        let mut rng = Pcg32::seed_from_u64(4);
        spawner.update(&mut coin, &mut rng, &[]);
        let coin = coin.expect("coin placed");
        assert_eq!(coin.pos.x, SCREEN_WIDTH);
        assert_eq!(coin.pos.y, coin.lane.coin_y());
    }

    /// A two-long run, a three-step single-lane pattern, then an alternating
    /// opener on the same lane
    const STREAK_RUN_BOUND: usize = 7;

    proptest! {
        #[test]
        fn prop_progress_never_exceeds_length(seed in any::<u64>(), coins in 0u32..15) {
            let mut spawner = ObstacleSpawner::default();
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut obstacles = Vec::new();
            let difficulty = crate::sim::difficulty::difficulty(coins);
            for _ in 0..200 {
                let was_finished = spawner.cursor.is_finished();
                let before = spawner.cursor.pattern;
                let before_len = spawner.cursor.length;
                spawner.spawn_step(difficulty, &mut rng, &mut obstacles);
                prop_assert!(spawner.cursor.progress <= spawner.cursor.length);
                if !was_finished {
                    // Same pattern continues until exhausted
                    prop_assert_eq!(spawner.cursor.pattern, before);
                    prop_assert_eq!(spawner.cursor.length, before_len);
                } else {
                    prop_assert_eq!(spawner.cursor.progress, 1);
                }
                obstacles.clear();
            }
        }

        #[test]
        fn prop_no_unbounded_same_lane_streak(seed in any::<u64>()) {
            let mut spawner = ObstacleSpawner::default();
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut obstacles = Vec::new();
            let mut run = 0usize;
            let mut last = None;
            for _ in 0..500 {
                obstacles.clear();
                spawner.spawn_step(1.0, &mut rng, &mut obstacles);
                if let [single] = obstacles.as_slice() {
                    if last == Some(single.lane) { run += 1 } else { run = 1 }
                    last = Some(single.lane);
                    prop_assert!(run < STREAK_RUN_BOUND);
                } else if !obstacles.is_empty() {
                    run = 0;
                    last = None;
                }
            }
        }
    }
}
