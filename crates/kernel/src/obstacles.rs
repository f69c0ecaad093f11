use glam::Vec3;
use meadowrun_common::Obstacle;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::config::CorridorConfig;

/// Height every obstacle is placed at.
pub const OBSTACLE_Y: f32 = 0.5;

/// Scatter `count` obstacles over the corridor: `x ~ U(-half_width, half_width)`,
/// `z ~ U(-length, 0)`, `y = OBSTACLE_Y`. The same seed always yields the same list.
pub fn generate(half_width: f32, length: f32, count: usize, seed: u64) -> Vec<Obstacle> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let x = rng.gen_range(-half_width..=half_width);
            let z = rng.gen_range(-length..=0.0);
            Obstacle::new(Vec3::new(x, OBSTACLE_Y, z))
        })
        .collect()
}

/// Seed derived from the wall clock, used when no fixed seed is configured.
pub fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}

/// Per-round seed for a fixed base seed, so restarts vary but replay identically.
pub fn round_seed(base: u64, round: u64) -> u64 {
    splitmix64(base ^ round)
}

/// Scrambles `base ^ round` so neighbouring rounds get unrelated scatters.
fn splitmix64(mut state: u64) -> u64 {
    state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut z = state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

/// The obstacle list for one round, with the seed that produced it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObstacleField {
    obstacles: Vec<Obstacle>,
    seed: u64,
}

impl ObstacleField {
    pub fn generate(corridor: &CorridorConfig, seed: u64) -> Self {
        let obstacles = generate(corridor.half_width, corridor.length, corridor.count, seed);
        tracing::debug!(count = obstacles.len(), seed, "generated obstacle field");
        Self { obstacles, seed }
    }

    pub fn from_obstacles(obstacles: Vec<Obstacle>) -> Self {
        Self { obstacles, seed: 0 }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn as_slice(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    pub fn positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.obstacles.iter().map(|o| o.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_stay_inside_corridor() {
        for seed in 0..200 {
            let obstacles = generate(1.8, 35.0, 5, seed);
            assert_eq!(obstacles.len(), 5);
            for o in &obstacles {
                let p = o.position;
                assert!((-1.8..=1.8).contains(&p.x), "seed {seed}: x={}", p.x);
                assert!((-35.0..=0.0).contains(&p.z), "seed {seed}: z={}", p.z);
                assert_eq!(p.y, OBSTACLE_Y);
            }
        }
    }

    #[test]
    fn zero_count_is_empty() {
        assert!(generate(1.8, 35.0, 0, 9).is_empty());
    }

    #[test]
    fn same_seed_same_field() {
        assert_eq!(generate(1.8, 35.0, 5, 42), generate(1.8, 35.0, 5, 42));
        assert_ne!(generate(1.8, 35.0, 5, 42), generate(1.8, 35.0, 5, 43));
    }

    #[test]
    fn degenerate_corridor_pins_x() {
        for o in generate(0.0, 10.0, 8, 3) {
            assert_eq!(o.position.x, 0.0);
        }
    }

    #[test]
    fn round_seeds_diverge() {
        assert_ne!(round_seed(42, 0), round_seed(42, 1));
        assert_eq!(round_seed(42, 3), round_seed(42, 3));
        assert_ne!(round_seed(42, 0), 42);
        let first = ObstacleField::generate(&CorridorConfig::default(), round_seed(42, 0));
        let second = ObstacleField::generate(&CorridorConfig::default(), round_seed(42, 1));
        assert_ne!(first.positions().collect::<Vec<_>>(), second.positions().collect::<Vec<_>>());
    }

    #[test]
    fn field_records_seed() {
        let field = ObstacleField::generate(&CorridorConfig::default(), 11);
        assert_eq!(field.seed(), 11);
        assert_eq!(field.len(), 5);
        assert_eq!(field.positions().count(), 5);
    }
}
