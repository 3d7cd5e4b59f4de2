//! Tet Fireworks entry point
//!
//! Native: runs the show headless on a software surface at ~60 Hz.
//!
//! ```text
//! tet-fireworks [FRAMES] [SETTINGS_JSON] [SNAPSHOT_PAM]
//! ```
//!
//! The web build is driven from JavaScript through `startFireworks`.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::fs::File;
    use std::io::BufWriter;
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    use glam::Vec2;
    use tet_fireworks::consts::FRAME_DT;
    use tet_fireworks::platform::native::{ScriptedClick, run_fixed_rate};
    use tet_fireworks::renderer::PixelSurface;
    use tet_fireworks::{Session, Settings};

    const DEFAULT_FRAMES: u64 = 600;
    const WIDTH: u32 = 1280;
    const HEIGHT: u32 = 720;

    pub fn run() -> Result<(), Box<dyn std::error::Error>> {
        let mut args = std::env::args().skip(1);
        let frames = match args.next() {
            Some(arg) => arg.parse::<u64>()?,
            None => DEFAULT_FRAMES,
        };
        let settings = match args.next() {
            Some(path) => Settings::load_from_path(&path).unwrap_or_else(|e| {
                log::warn!("{}; using default settings", e);
                Settings::default()
            }),
            None => Settings::default(),
        };
        let snapshot = args.next();

        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();

        let mut session = Session::new(settings, seed);
        session.start(PixelSurface::new(WIDTH, HEIGHT))?;

        // A couple of "clicks" so the pointer path shows up alongside the timer
        let clicks = [
            ScriptedClick {
                frame: 10,
                at: Vec2::new(WIDTH as f32 * 0.3, HEIGHT as f32 * 0.25),
            },
            ScriptedClick {
                frame: 25,
                at: Vec2::new(WIDTH as f32 * 0.7, HEIGHT as f32 * 0.2),
            },
        ];

        log::info!("Running {} frames (seed {})", frames, seed);
        let stats = run_fixed_rate(
            &mut session,
            frames,
            Duration::from_secs_f32(FRAME_DT),
            &clicks,
        );
        log::info!(
            "Done: {} frames, {} bursts, {} pointer launches, {:.1} fps, {} live entities",
            stats.frames,
            stats.arrivals,
            stats.clicks,
            stats.fps,
            session.show().live_count()
        );

        // The surface is released on stop, so snapshot first
        if let (Some(path), Some(surface)) = (snapshot, session.surface()) {
            surface.write_pam(BufWriter::new(File::create(&path)?))?;
            log::info!("Wrote final frame to {}", path);
        }

        session.stop();
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Tet Fireworks (native) starting...");

    if let Err(e) = headless::run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is startFireworks, this is just to satisfy the compiler
}
