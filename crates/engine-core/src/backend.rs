//! The narrow interface the scene renderer draws through.
//!
//! A backend builds opaque primitives (paths, paints, shaders, paragraphs)
//! that the caller is free to cache, and then draws them on a surface with a
//! save/restore transform and clip stack.

use crate::scene::{ColorLinPremul, FillRule, Rect, RoundedRect, Transform2D};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum StrokeCap {
    #[default]
    Butt,
    Round,
    Square,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum StrokeJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct StrokeStyle {
    pub width: f32,
    pub cap: StrokeCap,
    pub join: StrokeJoin,
    /// Alternating on/off lengths; empty for a solid stroke.
    pub dash: Vec<f32>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum PaintStyle {
    Fill,
    Stroke(StrokeStyle),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GradientKind {
    /// From `(0,0)` to `(1,0)` in gradient space.
    Linear,
    /// Centered at `(0,0)` with radius `0.5` in gradient space.
    Radial,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GradientSpec {
    pub kind: GradientKind,
    /// `(position, color)` pairs, positions in `[0, 1]`.
    pub stops: Vec<(f32, ColorLinPremul)>,
    /// Maps gradient space into the shape's local space.
    pub transform: Transform2D,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextAlign {
    #[default]
    Left,
    Right,
    Center,
    Justified,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ParagraphSpec {
    pub text: String,
    pub font_family: String,
    pub font_size: f32,
    /// Absolute line height in pixels.
    pub line_height: f32,
    pub letter_spacing: f32,
    pub align: TextAlign,
    pub color: ColorLinPremul,
}

/// Drawing backend consumed by the scene renderer.
///
/// Primitive builders take `&mut self` so backends can own GPU or font
/// resources; the returned values are opaque handles the renderer caches.
pub trait DrawBackend {
    type Path;
    type Paint;
    type Shader;
    type Paragraph;

    /// Build a fillable/strokeable path from path notation.
    fn make_path(&mut self, data: &str) -> Self::Path;
    fn set_fill_rule(&mut self, path: &mut Self::Path, rule: FillRule);
    fn make_paint(
        &mut self,
        style: &PaintStyle,
        color: ColorLinPremul,
        shader: Option<&Self::Shader>,
    ) -> Self::Paint;
    fn make_gradient_shader(&mut self, gradient: &GradientSpec) -> Self::Shader;
    /// Lay out a paragraph constrained to `max_width`.
    fn layout_paragraph(&mut self, spec: &ParagraphSpec, max_width: f32) -> Self::Paragraph;

    fn clear(&mut self);
    fn save(&mut self);
    fn restore(&mut self);
    /// Pre-multiply the current transform by `t` (children inside `t`).
    fn concat(&mut self, t: Transform2D);
    fn clip_rect(&mut self, rect: Rect);

    fn draw_path(&mut self, path: &Self::Path, paint: &Self::Paint);
    fn draw_rect(&mut self, rect: Rect, paint: &Self::Paint);
    fn draw_rounded_rect(&mut self, rrect: RoundedRect, paint: &Self::Paint);
    fn draw_paragraph(&mut self, paragraph: &Self::Paragraph, origin: [f32; 2]);

    /// Finish the frame.
    fn present(&mut self);
}
