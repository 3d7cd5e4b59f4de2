//! Launch and burst creation
//!
//! Two launch sources share one origin: the periodic counter and pointer
//! selections. Bursts are requested by the simulation step on arrival.

use glam::Vec2;
use rand::Rng;

use super::pool::Pool;
use super::state::{Projectile, ShowState, Spark};
use crate::random_between;

/// Fixed launch point: bottom-center of the surface
pub fn launch_origin(width: f32, height: f32) -> Vec2 {
    Vec2::new(width / 2.0, height)
}

/// Autonomous target: middle 60% of the width, between 10% and 50% of the height
pub fn random_target<R: Rng + ?Sized>(rng: &mut R, width: f32, height: f32) -> Vec2 {
    Vec2::new(
        random_between(rng, width * 0.2, width * 0.8),
        random_between(rng, height * 0.1, height * 0.5),
    )
}

/// Create one projectile from `origin` to `target`
pub fn launch_toward<R: Rng + ?Sized>(show: &mut ShowState, origin: Vec2, target: Vec2, rng: &mut R) {
    show.projectiles.insert(Projectile::new(origin, target, rng));
    show.launched += 1;
}

/// Periodic launch check, once per frame.
///
/// When the counter has reached `interval` a projectile is launched and the
/// counter resets, otherwise the counter advances. Returns true on launch.
pub fn periodic_launch<R: Rng + ?Sized>(
    show: &mut ShowState,
    interval: u32,
    width: f32,
    height: f32,
    rng: &mut R,
) -> bool {
    if show.launch_timer >= interval {
        let target = random_target(rng, width, height);
        launch_toward(show, launch_origin(width, height), target, rng);
        show.launch_timer = 0;
        true
    } else {
        show.launch_timer += 1;
        false
    }
}

/// Throw `count` sparks out of `at`
pub fn burst<R: Rng + ?Sized>(sparks: &mut Pool<Spark>, at: Vec2, show_hue: f32, count: usize, rng: &mut R) {
    for _ in 0..count {
        sparks.insert(Spark::random(at, show_hue, rng));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{BURST_SIZE, LAUNCH_INTERVAL};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_burst_size_and_position() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut sparks = Pool::new();
        let at = Vec2::new(320.0, 120.0);
        burst(&mut sparks, at, 120.0, BURST_SIZE, &mut rng);
        assert_eq!(sparks.len(), 120);
        assert!(sparks.iter().all(|s| s.pos == at && s.trail.oldest() == at));
    }

    #[test]
    fn test_random_target_region() {
        let mut rng = Pcg32::seed_from_u64(4);
        for _ in 0..1000 {
            let t = random_target(&mut rng, 1000.0, 600.0);
            assert!(t.x >= 200.0 && t.x <= 800.0);
            assert!(t.y >= 60.0 && t.y <= 300.0);
        }
    }

    #[test]
    fn test_periodic_launch_cadence() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut show = ShowState::default();
        let mut launch_frames = Vec::new();
        for frame in 0..200 {
            if periodic_launch(&mut show, LAUNCH_INTERVAL, 800.0, 600.0, &mut rng) {
                launch_frames.push(frame);
            }
        }
        // Counter climbs 0..=40 before firing: one launch every 41 frames
        assert_eq!(launch_frames, vec![40, 81, 122, 163]);
        assert_eq!(show.projectiles.len(), 4);
        assert!(
            show.projectiles
                .iter()
                .all(|p| p.origin == Vec2::new(400.0, 600.0))
        );
    }

    #[test]
    fn test_zero_sized_surface_does_not_panic() {
        let mut rng = Pcg32::seed_from_u64(6);
        let t = random_target(&mut rng, 0.0, 0.0);
        assert_eq!(t, Vec2::ZERO);
    }
}
