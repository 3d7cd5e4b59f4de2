//! HSL colours, as the show thinks about them

/// Hue/saturation/lightness/alpha colour.
///
/// `h` in degrees (any value, wrapped on conversion), `s` and `l` in
/// percent, `a` in [0, 1] - the same units as a CSS `hsla()`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsla {
    pub h: f32,
    pub s: f32,
    pub l: f32,
    pub a: f32,
}

impl Hsla {
    pub const fn new(h: f32, s: f32, l: f32, a: f32) -> Self {
        Self { h, s, l, a }
    }

    /// Fully saturated colour at the given lightness
    pub const fn vivid(h: f32, l: f32, a: f32) -> Self {
        Self::new(h, 100.0, l, a)
    }

    /// Black with the given opacity
    pub const fn black(a: f32) -> Self {
        Self::new(0.0, 0.0, 0.0, a)
    }

    /// Straight (non-premultiplied) RGBA, each channel in [0, 1]
    pub fn to_rgba(self) -> [f32; 4] {
        let h = self.h.rem_euclid(360.0) / 60.0;
        let s = (self.s / 100.0).clamp(0.0, 1.0);
        let l = (self.l / 100.0).clamp(0.0, 1.0);

        let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let x = c * (1.0 - (h % 2.0 - 1.0).abs());
        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let m = l - c / 2.0;
        [r + m, g + m, b + m, self.a.clamp(0.0, 1.0)]
    }

    /// RGBA with colour channels scaled by alpha
    pub fn premultiplied(self) -> [f32; 4] {
        let [r, g, b, a] = self.to_rgba();
        [r * a, g * a, b * a, a]
    }

    /// CSS form for canvas fill/stroke styles
    pub fn css(&self) -> String {
        format!(
            "hsla({}, {}%, {}%, {})",
            self.h.rem_euclid(360.0),
            self.s,
            self.l,
            self.a.clamp(0.0, 1.0)
        )
    }
}
