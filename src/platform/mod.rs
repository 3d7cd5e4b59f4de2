//! Platform integration
//!
//! - `native`: fixed-rate (~60 Hz) timer loop standing in for display refresh
//! - `web`: browser canvas surface, listeners and `requestAnimationFrame`

#[cfg(not(target_arch = "wasm32"))]
pub mod native;
#[cfg(target_arch = "wasm32")]
pub mod web;
