//! Show state and entity records
//!
//! Entities are plain data; the step functions in `tick` mutate them.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::pool::{Pool, Trail};
use crate::consts::*;
use crate::{distance, heading, random_between};

/// A rising trail fired toward a target point
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    /// Launch point; arrival is always measured from here
    pub origin: Vec2,
    pub target: Vec2,
    /// Direction origin -> target (radians)
    pub heading: f32,
    pub speed: f32,
    pub trail: Trail<PROJECTILE_TRAIL_LEN>,
    pub distance_traveled: f32,
    pub distance_to_target: f32,
    /// HSL lightness (percent)
    pub brightness: f32,
}

impl Projectile {
    pub fn new<R: Rng + ?Sized>(origin: Vec2, target: Vec2, rng: &mut R) -> Self {
        Self {
            pos: origin,
            origin,
            target,
            heading: heading(origin, target),
            speed: PROJECTILE_START_SPEED,
            trail: Trail::filled(origin),
            distance_traveled: 0.0,
            distance_to_target: distance(origin, target),
            brightness: random_between(rng, PROJECTILE_BRIGHTNESS.0, PROJECTILE_BRIGHTNESS.1),
        }
    }
}

/// A decaying ember thrown out by a burst
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spark {
    pub pos: Vec2,
    /// Direction of travel (radians), fixed for life
    pub angle: f32,
    pub speed: f32,
    pub trail: Trail<SPARK_TRAIL_LEN>,
    /// HSL hue (degrees, unwrapped)
    pub hue: f32,
    /// HSL lightness (percent)
    pub brightness: f32,
    /// Opacity in [0, 1]
    pub alpha: f64,
    /// Alpha lost per frame; also the "vanished" floor
    pub decay: f64,
    /// Re-roll brightness every frame
    pub flicker: bool,
}

impl Spark {
    /// Spark at `pos` with every property randomized around the show hue
    pub fn random<R: Rng + ?Sized>(pos: Vec2, show_hue: f32, rng: &mut R) -> Self {
        Self {
            pos,
            angle: random_between(rng, 0.0, std::f32::consts::TAU),
            speed: random_between(rng, SPARK_SPEED.0, SPARK_SPEED.1),
            trail: Trail::filled(pos),
            hue: random_between(rng, show_hue - SPARK_HUE_SPREAD, show_hue + SPARK_HUE_SPREAD),
            brightness: random_between(rng, SPARK_BRIGHTNESS.0, SPARK_BRIGHTNESS.1),
            alpha: 1.0,
            decay: SPARK_DECAY.0 + rng.random::<f64>() * (SPARK_DECAY.1 - SPARK_DECAY.0),
            flicker: rng.random_bool(FLICKER_CHANCE),
        }
    }
}

/// Everything one show owns between frames
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShowState {
    /// Global hue, drifts upward forever
    pub hue: f32,
    /// Frames since the last autonomous launch
    pub launch_timer: u32,
    /// Frames simulated
    pub frame: u64,
    pub projectiles: Pool<Projectile>,
    pub sparks: Pool<Spark>,
    /// Projectiles created (periodic + pointer)
    pub launched: u64,
    /// Projectiles that reached their target
    pub bursts: u64,
}

impl Default for ShowState {
    fn default() -> Self {
        Self::new(INITIAL_HUE)
    }
}

impl ShowState {
    pub fn new(initial_hue: f32) -> Self {
        Self {
            hue: initial_hue,
            launch_timer: 0,
            frame: 0,
            projectiles: Pool::new(),
            sparks: Pool::with_capacity(BURST_SIZE * 4),
            launched: 0,
            bursts: 0,
        }
    }

    /// Cosmetic colour drift, once per frame
    pub fn advance_hue(&mut self, drift: f32) {
        self.hue += drift;
    }

    /// Live entities of both kinds
    pub fn live_count(&self) -> usize {
        self.projectiles.len() + self.sparks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_projectile_new() {
        let mut rng = Pcg32::seed_from_u64(1);
        let p = Projectile::new(Vec2::new(100.0, 500.0), Vec2::new(100.0, 100.0), &mut rng);
        assert_eq!(p.pos, p.origin);
        assert!((p.distance_to_target - 400.0).abs() < 1e-4);
        assert!((p.heading + std::f32::consts::FRAC_PI_2).abs() < 1e-6);
        assert_eq!(p.distance_traveled, 0.0);
        assert!((60.0..80.0).contains(&p.brightness));
        assert!(p.trail.points().iter().all(|&t| t == p.origin));
    }

    #[test]
    fn test_spark_random_ranges() {
        let mut rng = Pcg32::seed_from_u64(2);
        let at = Vec2::new(30.0, 40.0);
        let mut flickers = 0;
        for _ in 0..500 {
            let s = Spark::random(at, 200.0, &mut rng);
            assert_eq!(s.pos, at);
            assert_eq!(s.alpha, 1.0);
            assert!((0.0..std::f32::consts::TAU).contains(&s.angle));
            assert!((2.0..12.0).contains(&s.speed));
            assert!((150.0..250.0).contains(&s.hue));
            assert!((50.0..80.0).contains(&s.brightness));
            assert!((0.005..0.015).contains(&s.decay));
            if s.flicker {
                flickers += 1;
            }
        }
        // ~50% flicker
        assert!((150..350).contains(&flickers));
    }

    #[test]
    fn test_hue_drift_monotonic() {
        let mut show = ShowState::default();
        assert_eq!(show.hue, INITIAL_HUE);
        for _ in 0..10 {
            let before = show.hue;
            show.advance_hue(HUE_DRIFT);
            assert!(show.hue > before);
        }
    }
}
