use palette::{FromColor, LinSrgba, Srgba};

use crate::scene::ColorLinPremul;

impl ColorLinPremul {
    pub const BLACK: Self = Self { r: 0.0, g: 0.0, b: 0.0, a: 1.0 };

    /// Create from unit-range sRGB floats, the form design documents store.
    /// Components are clamped to `[0, 1]` before conversion.
    pub fn from_srgb_f32(r: f32, g: f32, b: f32, a: f32) -> Self {
        let unit = |v: f32| v.clamp(0.0, 1.0);
        let s = Srgba::new(unit(r), unit(g), unit(b), unit(a));
        let lin: LinSrgba = LinSrgba::from_color(s);
        Self {
            r: lin.red * lin.alpha,
            g: lin.green * lin.alpha,
            b: lin.blue * lin.alpha,
            a: lin.alpha,
        }
    }
}
