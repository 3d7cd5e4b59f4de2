//! Headless runner
//!
//! Drives a session from a fixed-rate timer instead of a display. Pointer
//! selections can be scripted per frame.

use std::thread;
use std::time::{Duration, Instant};

use glam::Vec2;

use crate::renderer::Surface;
use crate::session::Session;

/// Frames averaged for the FPS readout
const FPS_WINDOW: usize = 60;

/// A pointer selection delivered before the given frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScriptedClick {
    pub frame: u64,
    pub at: Vec2,
}

/// What a run did
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunStats {
    pub frames: u64,
    pub arrivals: u64,
    pub clicks: u64,
    pub fps: f32,
}

/// Rolling frames-per-second over the last `FPS_WINDOW` frames
#[derive(Debug)]
struct FpsCounter {
    frame_times: [Option<Instant>; FPS_WINDOW],
    frame_index: usize,
    fps: f32,
}

impl FpsCounter {
    fn new() -> Self {
        Self {
            frame_times: [None; FPS_WINDOW],
            frame_index: 0,
            fps: 0.0,
        }
    }

    fn record(&mut self, now: Instant) {
        self.frame_times[self.frame_index] = Some(now);
        self.frame_index = (self.frame_index + 1) % FPS_WINDOW;

        // Oldest slot is the one we'll overwrite next
        if let Some(oldest) = self.frame_times[self.frame_index] {
            let elapsed = now.duration_since(oldest).as_secs_f32();
            if elapsed > 0.0 {
                self.fps = (FPS_WINDOW - 1) as f32 / elapsed;
            }
        }
    }
}

/// Run up to `frames` frames at one frame per `frame_dt`.
///
/// Stops early if the session leaves `Running`. A zero `frame_dt` runs as
/// fast as possible.
pub fn run_fixed_rate<S: Surface>(
    session: &mut Session<S>,
    frames: u64,
    frame_dt: Duration,
    clicks: &[ScriptedClick],
) -> RunStats {
    let mut stats = RunStats::default();
    let mut fps = FpsCounter::new();
    let mut next_frame = Instant::now();

    while session.is_running() && stats.frames < frames {
        for click in clicks.iter().filter(|c| c.frame == stats.frames) {
            if session.forward_pointer_event(click.at.x, click.at.y) {
                stats.clicks += 1;
            }
        }

        let Some(report) = session.frame() else {
            break;
        };
        stats.frames += 1;
        stats.arrivals += report.arrivals as u64;

        let now = Instant::now();
        fps.record(now);
        stats.fps = fps.fps;

        if stats.frames % FPS_WINDOW as u64 == 0 {
            let show = session.show();
            log::info!(
                "frame {:>5} | {:>5.1} fps | {:>3} rising | {:>5} sparks | {} bursts",
                stats.frames,
                fps.fps,
                show.projectiles.len(),
                show.sparks.len(),
                show.bursts
            );
        }

        if !frame_dt.is_zero() {
            next_frame += frame_dt;
            let now = Instant::now();
            if next_frame > now {
                thread::sleep(next_frame - now);
            } else {
                // Fell behind; don't try to catch up
                next_frame = now;
            }
        }
    }

    stats
}
