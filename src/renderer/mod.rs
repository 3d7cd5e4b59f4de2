//! Rendering module
//!
//! The show never clears its surface. Each frame erases a little of what is
//! already there, then adds new streaks on top with additive blending, which
//! leaves glowing trails behind everything that moves.

pub mod color;
pub mod raster;

pub use color::Hsla;
pub use raster::PixelSurface;

use glam::Vec2;

use crate::settings::Settings;
use crate::sim::{Projectile, ShowState, Spark};

/// How a new fill/stroke combines with pixels already on the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    /// Normal painting
    #[default]
    SourceOver,
    /// Erase the destination in proportion to source alpha
    DestinationOut,
    /// Add source to destination (overlaps brighten)
    Lighter,
}

impl BlendMode {
    /// Canvas `globalCompositeOperation` name
    pub fn as_str(&self) -> &'static str {
        match self {
            BlendMode::SourceOver => "source-over",
            BlendMode::DestinationOut => "destination-out",
            BlendMode::Lighter => "lighter",
        }
    }
}

/// Axis-aligned rectangle in surface pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Line style
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Hsla,
    pub width: f32,
}

/// A drawing surface sized to the viewport.
///
/// Implemented by the browser canvas and by [`PixelSurface`].
pub trait Surface {
    /// Current pixel dimensions
    fn size(&self) -> (u32, u32);

    /// Change pixel dimensions (content may be discarded)
    fn resize(&mut self, width: u32, height: u32);

    fn fill_rect(&mut self, rect: Rect, color: Hsla, blend: BlendMode);

    fn stroke_line(&mut self, from: Vec2, to: Vec2, stroke: Stroke, blend: BlendMode);
}

/// Dim everything already drawn
pub fn fade<S: Surface + ?Sized>(surface: &mut S, alpha: f32) {
    let (w, h) = surface.size();
    surface.fill_rect(
        Rect::new(0.0, 0.0, w as f32, h as f32),
        Hsla::black(alpha),
        BlendMode::DestinationOut,
    );
}

/// Streak from the oldest trail point to the current position.
/// Zero-length segments draw nothing, as on a canvas with butt caps.
fn streak<S: Surface + ?Sized>(surface: &mut S, from: Vec2, to: Vec2, stroke: Stroke) {
    if from.distance_squared(to) <= f32::EPSILON {
        return;
    }
    surface.stroke_line(from, to, stroke, BlendMode::Lighter);
}

/// Projectiles take the show's global hue and their own brightness
pub fn draw_projectile<S: Surface + ?Sized>(surface: &mut S, p: &Projectile, show_hue: f32, width: f32) {
    let stroke = Stroke {
        color: Hsla::vivid(show_hue, p.brightness, 1.0),
        width,
    };
    streak(surface, p.trail.oldest(), p.pos, stroke);
}

/// Sparks use their own hue; alpha drives stroke opacity directly
pub fn draw_spark<S: Surface + ?Sized>(surface: &mut S, s: &Spark, width: f32) {
    let stroke = Stroke {
        color: Hsla::vivid(s.hue, s.brightness, s.alpha as f32),
        width,
    };
    streak(surface, s.trail.oldest(), s.pos, stroke);
}

/// Draw one frame of the show (fade pass, then every live entity).
///
/// Reads the pools only; entities are drawn at their pre-step positions.
pub fn render<S: Surface + ?Sized>(surface: &mut S, show: &ShowState, settings: &Settings) {
    fade(surface, settings.fade_alpha);

    for p in show.projectiles.iter().rev() {
        draw_projectile(surface, p, show.hue, settings.line_width);
    }
    for s in show.sparks.iter().rev() {
        draw_spark(surface, s, settings.line_width);
    }
}
