use engine_core::{ColorLinPremul, Transform2D};
use serde::{Deserialize, Serialize};

use crate::schema::matrix_rows;

fn one() -> f32 {
    1.0
}

/// Straight-alpha sRGB color with channels in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Default for Rgba {
    fn default() -> Self {
        Self::BLACK
    }
}

impl Rgba {
    pub const BLACK: Rgba = Rgba { r: 0.0, g: 0.0, b: 0.0, a: 1.0 };

    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Linear premultiplied color with `opacity` folded into alpha.
    pub fn to_color(self, opacity: f32) -> ColorLinPremul {
        ColorLinPremul::from_srgb_f32(self.r, self.g, self.b, self.a * opacity)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolidFill {
    pub color: Rgba,
    #[serde(default = "one")]
    pub opacity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    pub position: f32,
    pub color: Rgba,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientFill {
    #[serde(default)]
    pub stops: Vec<GradientStop>,
    #[serde(default, with = "matrix_rows")]
    pub transform: Transform2D,
    #[serde(default = "one")]
    pub opacity: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageFill {
    /// Content hash into the document's image assets.
    pub image_id: String,
    #[serde(default = "one")]
    pub opacity: f32,
}

/// One entry of a node's `fills`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Paint {
    Solid(SolidFill),
    GradientLinear(GradientFill),
    GradientRadial(GradientFill),
    Image(ImageFill),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokePaint {
    #[serde(default)]
    pub fills: Vec<Paint>,
    #[serde(default = "one")]
    pub width: f32,
    #[serde(default)]
    pub cap: LineCap,
    #[serde(default)]
    pub join: LineJoin,
    #[serde(default)]
    pub dash: Vec<f32>,
    #[serde(default = "one")]
    pub opacity: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropShadow {
    pub color: Rgba,
    #[serde(default)]
    pub offset_x: f32,
    #[serde(default)]
    pub offset_y: f32,
    #[serde(default)]
    pub blur: f32,
    #[serde(default)]
    pub spread: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Blur {
    pub radius: f32,
}

/// Effects are carried through load and save; the renderer ignores them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Effect {
    DropShadow(DropShadow),
    LayerBlur(Blur),
    BackgroundBlur(Blur),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Style {
    #[serde(default)]
    pub fills: Vec<Paint>,
    #[serde(default)]
    pub strokes: Vec<StrokePaint>,
    #[serde(default)]
    pub effects: Vec<Effect>,
}

impl Style {
    /// First solid fill color, used for text runs.
    pub fn first_solid(&self) -> Option<&SolidFill> {
        match self.fills.first() {
            Some(Paint::Solid(fill)) => Some(fill),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn paints_decode_by_type_tag() {
        let fills: Vec<Paint> = serde_json::from_value(json!([
            { "type": "SOLID", "color": { "r": 1, "g": 0, "b": 0, "a": 1 }, "opacity": 0.5 },
            {
                "type": "GRADIENT_RADIAL",
                "stops": [],
                "transform": [[1, 0, 0], [0, 1, 0]],
                "opacity": 1
            },
            { "type": "IMAGE", "imageId": "abc" }
        ]))
        .unwrap();
        assert!(matches!(fills[0], Paint::Solid(ref s) if s.opacity == 0.5));
        assert!(matches!(fills[1], Paint::GradientRadial(_)));
        assert!(matches!(fills[2], Paint::Image(ref i) if i.image_id == "abc" && i.opacity == 1.0));
    }

    #[test]
    fn stroke_enums_use_uppercase_names() {
        let stroke: StrokePaint = serde_json::from_value(json!({
            "fills": [], "width": 2, "cap": "ROUND", "join": "BEVEL", "dash": [4, 2], "opacity": 1
        }))
        .unwrap();
        assert_eq!(stroke.cap, LineCap::Round);
        assert_eq!(stroke.join, LineJoin::Bevel);
        assert_eq!(stroke.dash, vec![4.0, 2.0]);
    }

    #[test]
    fn effects_round_trip() {
        let effects = vec![
            Effect::DropShadow(DropShadow {
                color: Rgba::BLACK,
                offset_x: 1.0,
                offset_y: 2.0,
                blur: 4.0,
                spread: 0.0,
            }),
            Effect::LayerBlur(Blur { radius: 3.0 }),
        ];
        let value = serde_json::to_value(&effects).unwrap();
        assert_eq!(value[0]["type"], "DROP_SHADOW");
        assert_eq!(value[0]["offsetX"], 1.0);
        assert_eq!(value[1]["type"], "LAYER_BLUR");
        let back: Vec<Effect> = serde_json::from_value(value).unwrap();
        assert_eq!(back, effects);
    }

    #[test]
    fn opacity_folds_into_alpha() {
        let c = Rgba::new(1.0, 1.0, 1.0, 1.0).to_color(0.5);
        assert!((c.a - 0.5).abs() < 1e-6);
        assert!((c.r - 0.5).abs() < 1e-4);
    }
}
