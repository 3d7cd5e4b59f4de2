//! Tet Fireworks - the particle show behind the countdown calendar
//!
//! Core modules:
//! - `sim`: Entity pools, simulation step and spawner (no rendering or platform code)
//! - `renderer`: Drawing-surface seam, fade/additive render pass, software rasterizer
//! - `session`: Start/stop lifecycle, per-frame cycle, pointer forwarding
//! - `settings`: Tunable show parameters (JSON)
//! - `platform`: Fixed-rate native runner and browser canvas glue

pub mod platform;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;

pub use session::{Phase, Session, SessionError, Subscription};
pub use settings::{Settings, SettingsError};

use glam::Vec2;
use rand::Rng;

/// Show constants
pub mod consts {
    /// Native fixed-rate timer step (~60 Hz, stands in for display refresh)
    pub const FRAME_DT: f32 = 1.0 / 60.0;

    /// Projectile trail capacity (positions kept, newest first)
    pub const PROJECTILE_TRAIL_LEN: usize = 3;
    /// Initial projectile speed (px/frame)
    pub const PROJECTILE_START_SPEED: f32 = 2.0;
    /// Per-frame speed multiplier - super-linear "whoosh"
    pub const PROJECTILE_ACCELERATION: f32 = 1.03;
    pub const PROJECTILE_BRIGHTNESS: (f32, f32) = (60.0, 80.0);

    /// Spark trail capacity
    pub const SPARK_TRAIL_LEN: usize = 6;
    pub const SPARK_SPEED: (f32, f32) = (2.0, 12.0);
    /// Per-frame speed multiplier (< 1)
    pub const SPARK_FRICTION: f32 = 0.93;
    /// Added to vertical velocity every frame (screen y points down)
    pub const SPARK_GRAVITY: f32 = 0.8;
    /// Spark hue is drawn from `show hue ± SPARK_HUE_SPREAD`
    pub const SPARK_HUE_SPREAD: f32 = 50.0;
    pub const SPARK_BRIGHTNESS: (f32, f32) = (50.0, 80.0);
    /// Brightness range re-rolled every frame by flickering sparks
    pub const FLICKER_BRIGHTNESS: (f32, f32) = (50.0, 100.0);
    pub const FLICKER_CHANCE: f64 = 0.5;
    /// Alpha lost per frame, fixed per spark at creation
    /// Kept in f64 with the spark's alpha so retirement lands on the exact frame
    pub const SPARK_DECAY: (f64, f64) = (0.005, 0.015);

    /// Sparks per burst
    pub const BURST_SIZE: usize = 120;
    /// Frames the launch counter must reach before an autonomous launch
    pub const LAUNCH_INTERVAL: u32 = 40;

    pub const INITIAL_HUE: f32 = 120.0;
    /// Global hue advance per frame
    pub const HUE_DRIFT: f32 = 0.2;
    /// Opacity of the erase rectangle drawn each frame
    pub const FADE_ALPHA: f32 = 0.2;
    /// Stroke width for every trail segment
    pub const LINE_WIDTH: f32 = 1.5;
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// Direction from `from` to `to` in radians
#[inline]
pub fn heading(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

/// Convert polar (speed, angle) to a cartesian velocity
#[inline]
pub fn polar_to_cartesian(speed: f32, angle: f32) -> Vec2 {
    Vec2::new(speed * angle.cos(), speed * angle.sin())
}

/// Uniform value in `[min, max)`; returns `min` when the range is empty
#[inline]
pub fn random_between<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    min + rng.random::<f32>() * (max - min)
}
