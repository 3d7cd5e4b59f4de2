//! Animation session
//!
//! Owns the surface, the show state and the RNG for one running show and
//! drives the per-frame cycle: hue drift, render, simulation step, periodic
//! launch. Hosts deliver frames, resizes and pointer selections; anything
//! they register with the session is released again by `stop()`.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use thiserror::Error;

use crate::renderer::{self, Surface};
use crate::settings::Settings;
use crate::sim::{self, ShowState, TickInput, TickReport};

/// Lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Created, no surface yet
    Idle,
    /// Rendering a frame per host tick
    Running,
    /// Surface and host registrations released; terminal
    Stopped,
}

/// Lifecycle failures
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("surface has no area ({width}x{height})")]
    InvalidSurface { width: u32, height: u32 },
    #[error("drawing surface unavailable: {0}")]
    SurfaceUnavailable(String),
    #[error("session is already running")]
    AlreadyRunning,
    #[error("session has been stopped")]
    Stopped,
}

/// A host registration (event listener, frame request) the session must
/// release on stop
pub trait Subscription {
    fn cancel(self: Box<Self>);
}

/// One fireworks show bound to one surface
pub struct Session<S: Surface> {
    phase: Phase,
    settings: Settings,
    show: ShowState,
    rng: Pcg32,
    surface: Option<S>,
    subscriptions: Vec<Box<dyn Subscription>>,
}

impl<S: Surface> Session<S> {
    pub fn new(settings: Settings, seed: u64) -> Self {
        Self {
            phase: Phase::Idle,
            show: ShowState::new(settings.initial_hue),
            settings,
            rng: Pcg32::seed_from_u64(seed),
            surface: None,
            subscriptions: Vec::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn show(&self) -> &ShowState {
        &self.show
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    /// Take ownership of `surface` and begin running.
    ///
    /// A zero-area surface is rejected and the session stays idle.
    pub fn start(&mut self, surface: S) -> Result<(), SessionError> {
        match self.phase {
            Phase::Running => return Err(SessionError::AlreadyRunning),
            Phase::Stopped => return Err(SessionError::Stopped),
            Phase::Idle => {}
        }

        let (width, height) = surface.size();
        if width == 0 || height == 0 {
            log::warn!("Refusing to start on a {}x{} surface", width, height);
            return Err(SessionError::InvalidSurface { width, height });
        }

        self.surface = Some(surface);
        self.phase = Phase::Running;
        log::info!("Fireworks running on {}x{} surface", width, height);
        Ok(())
    }

    /// Register a host handle to be released on stop.
    ///
    /// A stopped session cancels it straight away.
    pub fn attach(&mut self, subscription: Box<dyn Subscription>) {
        if self.phase == Phase::Stopped {
            subscription.cancel();
            return;
        }
        self.subscriptions.push(subscription);
    }

    /// Run one frame. Returns None unless running.
    pub fn frame(&mut self) -> Option<TickReport> {
        if self.phase != Phase::Running {
            return None;
        }
        let surface = self.surface.as_mut()?;
        let (width, height) = surface.size();

        self.show.advance_hue(self.settings.hue_drift);
        renderer::render(surface, &self.show, &self.settings);

        let input = TickInput {
            width: width as f32,
            height: height as f32,
        };
        Some(sim::tick(&mut self.show, &input, &self.settings, &mut self.rng))
    }

    /// Launch a projectile toward a selected point (surface coordinates).
    ///
    /// The projectile is in the pool before the next render; the periodic
    /// launch counter is untouched. Not rate-limited. Returns false when the
    /// session isn't running or the point isn't finite.
    pub fn forward_pointer_event(&mut self, x: f32, y: f32) -> bool {
        if !(x.is_finite() && y.is_finite()) {
            log::warn!("Ignoring non-finite pointer at ({}, {})", x, y);
            return false;
        }
        let Some(surface) = self.surface.as_ref().filter(|_| self.phase == Phase::Running) else {
            log::debug!("Ignoring pointer at ({}, {}) while {:?}", x, y, self.phase);
            return false;
        };
        let (width, height) = surface.size();
        let origin = sim::launch_origin(width as f32, height as f32);
        sim::launch_toward(&mut self.show, origin, Vec2::new(x, y), &mut self.rng);
        true
    }

    /// New surface dimensions from the host.
    ///
    /// Live entities keep their coordinates; only the surface changes.
    pub fn resize(&mut self, width: u32, height: u32) {
        match self.surface.as_mut() {
            Some(surface) if self.phase == Phase::Running => {
                surface.resize(width, height);
                log::debug!("Surface resized to {}x{}", width, height);
            }
            _ => log::debug!("Ignoring resize while {:?}", self.phase),
        }
    }

    /// Stop the show: release host registrations and the surface.
    ///
    /// Irreversible and idempotent; entities are left as they are.
    pub fn stop(&mut self) {
        let released = self.subscriptions.len();
        for subscription in self.subscriptions.drain(..) {
            subscription.cancel();
        }
        self.surface = None;

        if self.phase != Phase::Stopped {
            self.phase = Phase::Stopped;
            log::info!(
                "Fireworks stopped after {} frames ({} subscriptions released)",
                self.show.frame,
                released
            );
        }
    }
}

impl<S: Surface> Drop for Session<S> {
    fn drop(&mut self) {
        self.stop();
    }
}
