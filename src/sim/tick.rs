//! Per-frame simulation step
//!
//! Advances every live entity by one frame, retires the expired ones in the
//! same frame they cross their threshold, and bursts arrived projectiles.

use rand::Rng;

use super::spawn::{burst, periodic_launch};
use super::state::{Projectile, ShowState, Spark};
use crate::consts::*;
use crate::settings::Settings;
use crate::{distance, polar_to_cartesian, random_between};

/// Host facts the step needs for this frame
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Current surface width (px)
    pub width: f32,
    /// Current surface height (px)
    pub height: f32,
}

/// Outcome of advancing one projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectileStep {
    Flying,
    /// Reached (or would pass) its target; retire and burst
    Arrived,
}

/// Outcome of advancing one spark
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SparkStep {
    Burning,
    /// Alpha fell to or below its decay rate; retire
    Vanished,
}

/// What happened during one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub arrivals: usize,
    pub vanished: usize,
    pub launched: bool,
}

/// Advance a projectile by one frame.
///
/// Distance is measured from the launch origin to where the projectile
/// would be after this frame. On arrival the position is left unchanged so
/// the streak never overshoots its target.
pub fn step_projectile(p: &mut Projectile) -> ProjectileStep {
    p.trail.push_front(p.pos);

    p.speed *= PROJECTILE_ACCELERATION;
    let vel = polar_to_cartesian(p.speed, p.heading);

    p.distance_traveled = distance(p.origin, p.pos + vel);

    if p.distance_traveled >= p.distance_to_target {
        ProjectileStep::Arrived
    } else {
        p.pos += vel;
        ProjectileStep::Flying
    }
}

/// Advance a spark by one frame: friction, ballistic drop, fade, flicker
pub fn step_spark<R: Rng + ?Sized>(s: &mut Spark, rng: &mut R) -> SparkStep {
    s.trail.push_front(s.pos);

    s.speed *= SPARK_FRICTION;
    s.pos.x += s.angle.cos() * s.speed;
    s.pos.y += s.angle.sin() * s.speed + SPARK_GRAVITY;

    s.alpha -= s.decay;

    if s.flicker {
        s.brightness = random_between(rng, FLICKER_BRIGHTNESS.0, FLICKER_BRIGHTNESS.1);
    }

    if s.alpha <= s.decay {
        SparkStep::Vanished
    } else {
        SparkStep::Burning
    }
}

/// Advance the whole show by one frame.
///
/// Projectiles first (bursts land in the spark pool and are stepped this
/// same frame), then sparks, then the periodic launch check. Both pools are
/// scanned from the highest index down so removal is safe.
pub fn tick<R: Rng + ?Sized>(
    show: &mut ShowState,
    input: &TickInput,
    settings: &Settings,
    rng: &mut R,
) -> TickReport {
    let mut report = TickReport::default();
    show.frame += 1;

    for i in (0..show.projectiles.len()).rev() {
        if step_projectile(&mut show.projectiles[i]) == ProjectileStep::Arrived {
            let arrived = show.projectiles.remove(i);
            burst(&mut show.sparks, arrived.target, show.hue, BURST_SIZE, rng);
            show.bursts += 1;
            report.arrivals += 1;
        }
    }

    for i in (0..show.sparks.len()).rev() {
        if step_spark(&mut show.sparks[i], rng) == SparkStep::Vanished {
            show.sparks.remove(i);
            report.vanished += 1;
        }
    }

    report.launched = periodic_launch(show, settings.launch_interval, input.width, input.height, rng);

    if report.arrivals > 0 {
        log::debug!(
            "frame {}: {} burst(s), {} sparks live",
            show.frame,
            report.arrivals,
            show.sparks.len()
        );
    }

    report
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use glam::Vec2;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    proptest! {
        #[test]
        fn projectile_never_passes_target(
            ox in 0.0f32..1600.0,
            oy in 0.0f32..900.0,
            tx in 0.0f32..1600.0,
            ty in 0.0f32..900.0,
            seed in any::<u64>()
        ) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let origin = Vec2::new(ox, oy);
            let mut p = Projectile::new(origin, Vec2::new(tx, ty), &mut rng);

            let mut last = 0.0;
            let mut arrived = false;
            for _ in 0..300 {
                let step = step_projectile(&mut p);
                prop_assert!(p.distance_traveled >= last);
                last = p.distance_traveled;
                prop_assert!(distance(origin, p.pos) < p.distance_to_target || p.pos == origin);
                if step == ProjectileStep::Arrived {
                    arrived = true;
                    break;
                }
            }
            prop_assert!(arrived);
        }

        #[test]
        fn spark_fades_until_floor(seed in any::<u64>(), hue in 0.0f32..720.0) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut s = Spark::random(Vec2::new(400.0, 300.0), hue, &mut rng);
            prop_assert!((SPARK_DECAY.0..=SPARK_DECAY.1).contains(&s.decay));

            let mut alpha = s.alpha;
            let mut steps = 0;
            while step_spark(&mut s, &mut rng) == SparkStep::Burning {
                prop_assert!(s.alpha < alpha);
                prop_assert!(s.alpha > s.decay);
                alpha = s.alpha;
                steps += 1;
                prop_assert!(steps < 1000);
            }
            prop_assert!(s.alpha <= s.decay);
            // Lifetime is about 1/decay frames
            prop_assert!(steps as f64 <= 1.0 / s.decay);
        }

        #[test]
        fn burst_sparks_start_at_target(
            count in 1usize..300,
            x in -100.0f32..2000.0,
            y in -100.0f32..2000.0,
            hue in 0.0f32..1000.0,
            seed in any::<u64>()
        ) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut sparks = crate::sim::Pool::new();
            burst(&mut sparks, Vec2::new(x, y), hue, count, &mut rng);
            prop_assert_eq!(sparks.len(), count);
            for s in &sparks {
                prop_assert_eq!(s.pos, Vec2::new(x, y));
                prop_assert_eq!(s.alpha, 1.0);
                prop_assert!((s.hue - hue).abs() <= SPARK_HUE_SPREAD + 1e-3);
                prop_assert!((SPARK_SPEED.0..SPARK_SPEED.1 + 1e-4).contains(&s.speed));
            }
        }
    }
}
