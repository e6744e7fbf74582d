//! Arcade meteor spawning and difficulty ramp
//!
//! Larger tiers unlock with session time and the speed ceiling rises
//! linearly, so the game gets harder the longer it runs.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::projectile::Projectile;
use crate::consts::*;
use crate::planet_center;

/// Seconds before MEDIUM meteors can appear
pub const MEDIUM_UNLOCK_SECS: f32 = 15.0;
/// Seconds before BIG meteors can appear
pub const BIG_UNLOCK_SECS: f32 = 30.0;
/// Speed ceiling at t = 0 (pixels per tick)
pub const BASE_MAX_SPEED: f32 = 1.5;
/// Speed ceiling gained per second of play
pub const SPEED_RAMP_PER_SEC: f32 = 0.03;

/// Meteor size class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tier {
    Small,
    Medium,
    Big,
}

impl Tier {
    /// Clicks needed to destroy
    pub fn hit_points(&self) -> u8 {
        match self {
            Tier::Small => 1,
            Tier::Medium => 2,
            Tier::Big => 3,
        }
    }

    /// Collision/draw radius in pixels
    pub fn radius(&self) -> f32 {
        match self {
            Tier::Small => 24.0,
            Tier::Medium => 36.0,
            Tier::Big => 48.0,
        }
    }

    /// Tiers available after `elapsed` seconds
    pub fn unlocked(elapsed: f32) -> &'static [Tier] {
        if elapsed < MEDIUM_UNLOCK_SECS {
            &[Tier::Small]
        } else if elapsed < BIG_UNLOCK_SECS {
            &[Tier::Small, Tier::Medium]
        } else {
            &[Tier::Small, Tier::Medium, Tier::Big]
        }
    }
}

/// Pick a tier uniformly from those unlocked at `elapsed`
pub fn choose_tier<R: Rng>(rng: &mut R, elapsed: f32) -> Tier {
    let tiers = Tier::unlocked(elapsed);
    tiers[rng.random_range(0..tiers.len())]
}

/// Upper bound of the speed draw at `elapsed` seconds
#[inline]
pub fn max_speed(elapsed: f32) -> f32 {
    BASE_MAX_SPEED + elapsed.max(0.0) * SPEED_RAMP_PER_SEC
}

/// Speed drawn uniformly from [1, max_speed(elapsed)]
pub fn draw_speed<R: Rng>(rng: &mut R, elapsed: f32) -> f32 {
    rng.random_range(1.0..=max_speed(elapsed))
}

/// What the spawner decided for one meteor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnPlan {
    pub pos: Vec2,
    pub tier: Tier,
    pub speed: f32,
}

impl SpawnPlan {
    /// Roll position, tier and speed for a meteor spawned at `elapsed`
    pub fn roll<R: Rng>(rng: &mut R, elapsed: f32) -> Self {
        let x = rng.random_range(METEOR_SPAWN_INSET..=ARCADE_WIDTH as i32 - METEOR_SPAWN_INSET);
        let tier = choose_tier(rng, elapsed);
        let speed = draw_speed(rng, elapsed);
        Self {
            pos: Vec2::new(x as f32, 0.0),
            tier,
            speed,
        }
    }

    /// Projectile heading for the planet center, if the geometry allows it
    pub fn projectile(&self) -> Option<Projectile> {
        Projectile::aimed(self.pos, planet_center(), self.speed, self.tier.radius())
    }
}

/// Periodic spawn clock driven by session time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnTimer {
    pub interval: f32,
    /// Session time of the next spawn
    pub next_at: f32,
}

impl SpawnTimer {
    /// First spawn fires one interval after `start`
    pub fn new(interval: f32, start: f32) -> Self {
        Self {
            interval,
            next_at: start + interval,
        }
    }

    /// Number of spawns due by `now`; advances the schedule
    pub fn poll(&mut self, now: f32) -> u32 {
        if self.interval <= 0.0 {
            return 0;
        }
        let mut due = 0;
        while now >= self.next_at {
            self.next_at += self.interval;
            due += 1;
        }
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_tier_stats() {
        assert_eq!((Tier::Small.hit_points(), Tier::Small.radius()), (1, 24.0));
        assert_eq!((Tier::Medium.hit_points(), Tier::Medium.radius()), (2, 36.0));
        assert_eq!((Tier::Big.hit_points(), Tier::Big.radius()), (3, 48.0));
    }

    #[test]
    fn test_tier_unlock_boundaries() {
        assert_eq!(Tier::unlocked(14.99), &[Tier::Small]);
        assert_eq!(Tier::unlocked(15.0), &[Tier::Small, Tier::Medium]);
        assert_eq!(Tier::unlocked(29.99), &[Tier::Small, Tier::Medium]);
        assert_eq!(Tier::unlocked(30.0).len(), 3);
    }

    #[test]
    fn test_all_tiers_eventually_drawn() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut seen = [false; 3];
        for _ in 0..300 {
            match choose_tier(&mut rng, 45.0) {
                Tier::Small => seen[0] = true,
                Tier::Medium => seen[1] = true,
                Tier::Big => seen[2] = true,
            }
        }
        assert_eq!(seen, [true, true, true]);
    }

    #[test]
    fn test_spawn_plan_in_field() {
        let mut rng = Pcg32::seed_from_u64(42);
        for _ in 0..200 {
            let plan = SpawnPlan::roll(&mut rng, 10.0);
            assert!(plan.pos.x >= 40.0 && plan.pos.x <= 860.0);
            assert_eq!(plan.pos.y, 0.0);
            let p = plan.projectile().unwrap();
            assert!((p.vel.length() - plan.speed).abs() < 1e-4);
            // Heading down toward the planet
            assert!(p.vel.y > 0.0);
        }
    }

    #[test]
    fn test_spawn_timer() {
        let mut timer = SpawnTimer::new(2.0, 0.0);
        assert_eq!(timer.poll(1.99), 0);
        assert_eq!(timer.poll(2.0), 1);
        assert_eq!(timer.poll(3.0), 0);
        // A long stall catches up
        assert_eq!(timer.poll(8.5), 3);
        assert_eq!(timer.next_at, 10.0);
    }

    proptest! {
        #[test]
        fn prop_no_medium_or_big_before_15s(seed in any::<u64>(), elapsed in 0.0f32..15.0) {
            let mut rng = Pcg32::seed_from_u64(seed);
            prop_assert_eq!(choose_tier(&mut rng, elapsed), Tier::Small);
        }

        #[test]
        fn prop_no_big_before_30s(seed in any::<u64>(), elapsed in 0.0f32..30.0) {
            let mut rng = Pcg32::seed_from_u64(seed);
            for _ in 0..8 {
                prop_assert_ne!(choose_tier(&mut rng, elapsed), Tier::Big);
            }
        }

        #[test]
        fn prop_speed_within_ramp(seed in any::<u64>(), elapsed in 0.0f32..600.0) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let speed = draw_speed(&mut rng, elapsed);
            prop_assert!(speed >= 1.0);
            prop_assert!(speed <= 1.5 + elapsed * 0.03 + 1e-4);
        }
    }
}
