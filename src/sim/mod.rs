//! Fireworks simulation module
//!
//! Everything that moves lives here:
//! - Frame-based steps only (one call per displayed frame)
//! - Caller-owned RNG
//! - Pools scanned high-to-low so removal during the scan is safe
//! - No rendering or platform dependencies

pub mod pool;
pub mod spawn;
pub mod state;
pub mod tick;

pub use pool::{Pool, Trail};
pub use spawn::{burst, launch_origin, launch_toward, periodic_launch, random_target};
pub use state::{Projectile, ShowState, Spark};
pub use tick::{ProjectileStep, SparkStep, TickInput, TickReport, step_projectile, step_spark, tick};
