//! Software rasterizer
//!
//! An RGBA buffer that implements [`Surface`] with the same compositing the
//! browser canvas uses. Pixels are stored premultiplied, so erase and add
//! are plain per-channel arithmetic.

use std::io::{self, Write};

use glam::Vec2;

use super::{BlendMode, Hsla, Rect, Stroke, Surface};

/// CPU-side drawing surface
#[derive(Debug, Clone)]
pub struct PixelSurface {
    width: u32,
    height: u32,
    /// Premultiplied RGBA, row-major
    pixels: Vec<[f32; 4]>,
}

impl PixelSurface {
    /// Transparent surface of the given size
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0.0; 4]; width as usize * height as usize],
        }
    }

    /// Premultiplied RGBA at (x, y)
    pub fn pixel(&self, x: u32, y: u32) -> Option<[f32; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[(y * self.width + x) as usize])
    }

    /// Sum of alpha over the whole surface (how much is "lit")
    pub fn total_alpha(&self) -> f32 {
        self.pixels.iter().map(|p| p[3]).sum()
    }

    /// Straight-alpha 8-bit RGBA
    pub fn to_rgba8(&self) -> Vec<[u8; 4]> {
        self.pixels
            .iter()
            .map(|&[r, g, b, a]| {
                let unmul = |c: f32| if a > 0.0 { (c / a).min(1.0) } else { 0.0 };
                [
                    to_u8(unmul(r)),
                    to_u8(unmul(g)),
                    to_u8(unmul(b)),
                    to_u8(a),
                ]
            })
            .collect()
    }

    /// Write the surface as a PAM (`P7`, RGB_ALPHA) image
    pub fn write_pam<W: Write>(&self, mut out: W) -> io::Result<()> {
        write!(
            out,
            "P7\nWIDTH {}\nHEIGHT {}\nDEPTH 4\nMAXVAL 255\nTUPLTYPE RGB_ALPHA\nENDHDR\n",
            self.width, self.height
        )?;
        let rgba = self.to_rgba8();
        out.write_all(bytemuck::cast_slice(&rgba))?;
        out.flush()
    }

    fn blend_at(&mut self, x: u32, y: u32, src: [f32; 4], blend: BlendMode) {
        let dst = &mut self.pixels[(y * self.width + x) as usize];
        match blend {
            BlendMode::SourceOver => {
                let keep = 1.0 - src[3];
                for c in 0..4 {
                    dst[c] = src[c] + dst[c] * keep;
                }
            }
            BlendMode::DestinationOut => {
                let keep = 1.0 - src[3];
                for c in dst.iter_mut() {
                    *c *= keep;
                }
            }
            BlendMode::Lighter => {
                for c in 0..4 {
                    dst[c] = (dst[c] + src[c]).min(1.0);
                }
            }
        }
    }
}

fn to_u8(c: f32) -> u8 {
    (c.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Distance from `p` to the segment `a`-`b`
fn segment_distance(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

impl Surface for PixelSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Reallocates and clears, like setting a canvas' width/height
    fn resize(&mut self, width: u32, height: u32) {
        *self = Self::new(width, height);
    }

    fn fill_rect(&mut self, rect: Rect, color: Hsla, blend: BlendMode) {
        let x0 = rect.x.floor().max(0.0) as u32;
        let y0 = rect.y.floor().max(0.0) as u32;
        let x1 = ((rect.x + rect.width).ceil().max(0.0) as u32).min(self.width);
        let y1 = ((rect.y + rect.height).ceil().max(0.0) as u32).min(self.height);
        let src = color.premultiplied();

        for y in y0..y1 {
            for x in x0..x1 {
                self.blend_at(x, y, src, blend);
            }
        }
    }

    /// Anti-aliased by distance from each pixel centre to the segment
    fn stroke_line(&mut self, from: Vec2, to: Vec2, stroke: Stroke, blend: BlendMode) {
        if self.width == 0 || self.height == 0 {
            return;
        }
        let half = stroke.width / 2.0;
        let reach = half + 1.0;
        let min = from.min(to) - Vec2::splat(reach);
        let max = from.max(to) + Vec2::splat(reach);
        if max.x < 0.0 || max.y < 0.0 || min.x >= self.width as f32 || min.y >= self.height as f32 {
            return;
        }

        let x0 = min.x.floor().max(0.0) as u32;
        let y0 = min.y.floor().max(0.0) as u32;
        let x1 = (max.x.ceil() as u32).min(self.width - 1);
        let y1 = (max.y.ceil() as u32).min(self.height - 1);
        let src = stroke.color.premultiplied();

        for y in y0..=y1 {
            for x in x0..=x1 {
                let center = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let coverage = (half + 0.5 - segment_distance(center, from, to)).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    let covered = src.map(|c| c * coverage);
                    self.blend_at(x, y, covered, blend);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn white(a: f32) -> Stroke {
        Stroke {
            color: Hsla::vivid(0.0, 100.0, a),
            width: 1.5,
        }
    }

    #[test]
    fn test_line_lights_its_path_only() {
        let mut s = PixelSurface::new(32, 32);
        s.stroke_line(Vec2::new(2.0, 16.5), Vec2::new(30.0, 16.5), white(1.0), BlendMode::Lighter);

        assert_eq!(s.pixel(10, 16).unwrap()[3], 1.0);
        assert_eq!(s.pixel(20, 16).unwrap()[3], 1.0);
        assert_eq!(s.pixel(10, 5).unwrap()[3], 0.0);
        assert_eq!(s.pixel(10, 25).unwrap()[3], 0.0);
    }

    #[test]
    fn test_destination_out_fades() {
        let mut s = PixelSurface::new(8, 8);
        s.fill_rect(Rect::new(0.0, 0.0, 8.0, 8.0), Hsla::vivid(0.0, 100.0, 1.0), BlendMode::SourceOver);
        assert_eq!(s.pixel(3, 3).unwrap(), [1.0; 4]);

        s.fill_rect(Rect::new(0.0, 0.0, 8.0, 8.0), Hsla::black(0.2), BlendMode::DestinationOut);
        let p = s.pixel(3, 3).unwrap();
        assert!((p[3] - 0.8).abs() < 1e-6);
        assert!((p[0] - 0.8).abs() < 1e-6);

        // Repeated fades approach zero, never go negative
        for _ in 0..100 {
            s.fill_rect(Rect::new(0.0, 0.0, 8.0, 8.0), Hsla::black(0.2), BlendMode::DestinationOut);
        }
        let p = s.pixel(3, 3).unwrap();
        assert!(p[3] >= 0.0 && p[3] < 1e-6);
    }

    #[test]
    fn test_lighter_accumulates() {
        let mut s = PixelSurface::new(16, 16);
        let dim = Stroke {
            color: Hsla::vivid(0.0, 50.0, 0.3),
            width: 1.5,
        };
        s.stroke_line(Vec2::new(0.0, 8.5), Vec2::new(16.0, 8.5), dim, BlendMode::Lighter);
        let once = s.pixel(8, 8).unwrap();
        s.stroke_line(Vec2::new(0.0, 8.5), Vec2::new(16.0, 8.5), dim, BlendMode::Lighter);
        let twice = s.pixel(8, 8).unwrap();
        assert!(twice[0] > once[0]);
        assert!((twice[3] - 0.6).abs() < 1e-5);
    }

    #[test]
    fn test_offscreen_and_clipped_draws() {
        let mut s = PixelSurface::new(10, 10);
        s.stroke_line(Vec2::new(-50.0, -50.0), Vec2::new(-20.0, -40.0), white(1.0), BlendMode::Lighter);
        assert_eq!(s.total_alpha(), 0.0);

        s.stroke_line(Vec2::new(-5.0, 5.5), Vec2::new(50.0, 5.5), white(1.0), BlendMode::Lighter);
        assert!(s.total_alpha() > 0.0);

        s.fill_rect(Rect::new(-100.0, -100.0, 1000.0, 1000.0), Hsla::black(1.0), BlendMode::DestinationOut);
        assert_eq!(s.total_alpha(), 0.0);
    }

    #[test]
    fn test_resize_clears() {
        let mut s = PixelSurface::new(4, 4);
        s.fill_rect(Rect::new(0.0, 0.0, 4.0, 4.0), Hsla::black(1.0), BlendMode::SourceOver);
        s.resize(6, 3);
        assert_eq!(s.size(), (6, 3));
        assert_eq!(s.total_alpha(), 0.0);
        assert!(s.pixel(5, 2).is_some());
        assert!(s.pixel(0, 3).is_none());

        s.resize(0, 0);
        s.stroke_line(Vec2::ZERO, Vec2::ONE, white(1.0), BlendMode::Lighter);
        s.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), Hsla::black(1.0), BlendMode::Lighter);
    }

    #[test]
    fn test_pam_export() {
        let mut s = PixelSurface::new(2, 1);
        s.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), Hsla::vivid(0.0, 50.0, 0.5), BlendMode::SourceOver);
        let mut out = Vec::new();
        s.write_pam(&mut out).unwrap();
        let header = b"P7\nWIDTH 2\nHEIGHT 1\nDEPTH 4\nMAXVAL 255\nTUPLTYPE RGB_ALPHA\nENDHDR\n";
        assert!(out.starts_with(header));
        assert_eq!(&out[header.len()..], &[255, 0, 0, 128, 0, 0, 0, 0]);
    }
}
