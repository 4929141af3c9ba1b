use engine_core::{FillRule, Rect, RoundedRadii, Transform2D};
use serde::{Deserialize, Serialize};

use crate::style::Style;

pub type NodeId = String;

/// Serde adapter storing a [`Transform2D`] as two rows of three numbers.
pub mod matrix_rows {
    use engine_core::Transform2D;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(t: &Transform2D, s: S) -> Result<S::Ok, S::Error> {
        t.to_rows().serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Transform2D, D::Error> {
        let rows = <[[f32; 3]; 2]>::deserialize(d)?;
        Ok(Transform2D::from_rows(rows))
    }
}

/// Serde adapter storing a [`Rect`] as `{x, y, width, height}`.
pub mod rect_bounds {
    use engine_core::Rect;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    struct Bounds {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    }

    pub fn serialize<S: Serializer>(r: &Rect, s: S) -> Result<S::Ok, S::Error> {
        Bounds { x: r.x, y: r.y, width: r.w, height: r.h }.serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Rect, D::Error> {
        let b = Bounds::deserialize(d)?;
        Ok(Rect::new(b.x, b.y, b.width, b.height))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WindingRule {
    #[default]
    NonZero,
    EvenOdd,
}

impl From<WindingRule> for FillRule {
    fn from(rule: WindingRule) -> Self {
        match rule {
            WindingRule::NonZero => FillRule::NonZero,
            WindingRule::EvenOdd => FillRule::EvenOdd,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SvgPaths {
    #[serde(default)]
    pub paths: Vec<String>,
    #[serde(default)]
    pub winding_rules: Vec<WindingRule>,
}

/// Path strings paired 1:1 with winding rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Geometry {
    #[serde(default)]
    pub svg_paths: SvgPaths,
}

impl Geometry {
    pub fn paths(&self) -> &[String] {
        &self.svg_paths.paths
    }

    /// Fill rule for path `index`; a missing rule means nonzero.
    pub fn fill_rule(&self, index: usize) -> FillRule {
        self.svg_paths
            .winding_rules
            .get(index)
            .copied()
            .unwrap_or_default()
            .into()
    }
}

/// A text metric that is either one value for the whole run or differs
/// across it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMetric", into = "RawMetric")]
pub enum TextMetric {
    Uniform(f32),
    Mixed,
}

impl TextMetric {
    pub fn uniform(self) -> Option<f32> {
        match self {
            TextMetric::Uniform(v) => Some(v),
            TextMetric::Mixed => None,
        }
    }

    pub fn unwrap_or(self, fallback: f32) -> f32 {
        self.uniform().unwrap_or(fallback)
    }
}

const MIXED_MARKER: &str = "MIXED";

#[derive(Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawMetric {
    Number(f32),
    Marker(String),
}

impl TryFrom<RawMetric> for TextMetric {
    type Error = String;

    fn try_from(raw: RawMetric) -> Result<Self, Self::Error> {
        match raw {
            RawMetric::Number(v) => Ok(TextMetric::Uniform(v)),
            RawMetric::Marker(m) if m == MIXED_MARKER => Ok(TextMetric::Mixed),
            RawMetric::Marker(m) => Err(format!(
                "expected a number or \"{MIXED_MARKER}\", got {m:?}"
            )),
        }
    }
}

impl From<TextMetric> for RawMetric {
    fn from(metric: TextMetric) -> Self {
        match metric {
            TextMetric::Uniform(v) => RawMetric::Number(v),
            TextMetric::Mixed => RawMetric::Marker(MIXED_MARKER.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontRef {
    pub family: String,
    #[serde(default, alias = "postScriptName")]
    pub face_name: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TextAlign {
    #[default]
    Left,
    Right,
    Center,
    Justified,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CornerRadius {
    pub top_left: f32,
    pub top_right: f32,
    pub bottom_right: f32,
    pub bottom_left: f32,
}

impl From<CornerRadius> for RoundedRadii {
    fn from(c: CornerRadius) -> Self {
        RoundedRadii { tl: c.top_left, tr: c.top_right, br: c.bottom_right, bl: c.bottom_left }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameData {
    #[serde(default)]
    pub children: Vec<NodeId>,
    #[serde(default)]
    pub clips_content: bool,
    #[serde(default)]
    pub style: Style,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupData {
    #[serde(default)]
    pub children: Vec<NodeId>,
    #[serde(default)]
    pub clips_content: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RectangleData {
    #[serde(default)]
    pub corner_radius: CornerRadius,
    #[serde(default)]
    pub style: Style,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextData {
    #[serde(default)]
    pub characters: String,
    #[serde(default)]
    pub font: FontRef,
    pub font_size: TextMetric,
    pub line_height: TextMetric,
    pub letter_spacing: TextMetric,
    #[serde(default)]
    pub text_align: TextAlign,
    #[serde(default)]
    pub style: Style,
}

impl TextData {
    pub fn resolved_font_size(&self, default_size: f32) -> f32 {
        self.font_size.unwrap_or(default_size)
    }

    /// Line height in pixels; a mixed value becomes `factor` times the font size.
    pub fn resolved_line_height(&self, default_size: f32, factor: f32) -> f32 {
        self.line_height
            .unwrap_or(self.resolved_font_size(default_size) * factor)
    }

    pub fn resolved_letter_spacing(&self) -> f32 {
        self.letter_spacing.unwrap_or(0.0)
    }
}

/// Which document tag a vector shape was exported under.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum VectorKind {
    #[default]
    Vector,
    BooleanOperation,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VectorData {
    #[serde(skip)]
    pub kind: VectorKind,
    #[serde(default)]
    pub geometry: Geometry,
    #[serde(default)]
    pub style: Style,
}

/// The variant half of a node, discriminated by the document's `type` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawKind", into = "RawKind")]
pub enum NodeKind {
    Frame(FrameData),
    Group(GroupData),
    Rectangle(RectangleData),
    Text(TextData),
    Vector(VectorData),
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
enum RawKind {
    Frame(FrameData),
    Group(GroupData),
    Rectangle(RectangleData),
    Text(TextData),
    Vector(VectorData),
    BooleanOperation(VectorData),
}

impl From<RawKind> for NodeKind {
    fn from(raw: RawKind) -> Self {
        match raw {
            RawKind::Frame(d) => NodeKind::Frame(d),
            RawKind::Group(d) => NodeKind::Group(d),
            RawKind::Rectangle(d) => NodeKind::Rectangle(d),
            RawKind::Text(d) => NodeKind::Text(d),
            RawKind::Vector(d) => NodeKind::Vector(VectorData { kind: VectorKind::Vector, ..d }),
            RawKind::BooleanOperation(d) => {
                NodeKind::Vector(VectorData { kind: VectorKind::BooleanOperation, ..d })
            }
        }
    }
}

impl From<NodeKind> for RawKind {
    fn from(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Frame(d) => RawKind::Frame(d),
            NodeKind::Group(d) => RawKind::Group(d),
            NodeKind::Rectangle(d) => RawKind::Rectangle(d),
            NodeKind::Text(d) => RawKind::Text(d),
            NodeKind::Vector(d) => match d.kind {
                VectorKind::Vector => RawKind::Vector(d),
                VectorKind::BooleanOperation => RawKind::BooleanOperation(d),
            },
        }
    }
}

fn default_visible() -> bool {
    true
}

fn default_opacity() -> f32 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneNode {
    pub id: NodeId,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default = "default_opacity")]
    pub opacity: f32,
    #[serde(default, with = "matrix_rows")]
    pub relative_transform: Transform2D,
    #[serde(default)]
    pub size: Size,
    #[serde(default, with = "rect_bounds")]
    pub local_bounds: Rect,
    /// World-space bounds cached at export and shifted by edits.
    #[serde(default, with = "rect_bounds")]
    pub abs_bounds: Rect,
    #[serde(flatten)]
    pub kind: NodeKind,
}

impl SceneNode {
    /// Ordered child ids; empty for leaf nodes.
    pub fn children(&self) -> &[NodeId] {
        match &self.kind {
            NodeKind::Frame(f) => &f.children,
            NodeKind::Group(g) => &g.children,
            _ => &[],
        }
    }

    pub fn clips_content(&self) -> bool {
        match &self.kind {
            NodeKind::Frame(f) => f.clips_content,
            NodeKind::Group(g) => g.clips_content,
            _ => false,
        }
    }

    pub fn as_vector(&self) -> Option<&VectorData> {
        match &self.kind {
            NodeKind::Vector(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_vector_mut(&mut self) -> Option<&mut VectorData> {
        match &mut self.kind {
            NodeKind::Vector(v) => Some(v),
            _ => None,
        }
    }

    /// Document tag for this node.
    pub fn type_name(&self) -> &'static str {
        match &self.kind {
            NodeKind::Frame(_) => "FRAME",
            NodeKind::Group(_) => "GROUP",
            NodeKind::Rectangle(_) => "RECTANGLE",
            NodeKind::Text(_) => "TEXT",
            NodeKind::Vector(v) => match v.kind {
                VectorKind::Vector => "VECTOR",
                VectorKind::BooleanOperation => "BOOLEAN_OPERATION",
            },
        }
    }

    /// Box `(0, 0, width, height)` in the node's own space.
    pub fn size_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.size.width, self.size.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn vector_json(tag: &str) -> serde_json::Value {
        json!({
            "id": "v1",
            "name": "Star",
            "type": tag,
            "visible": true,
            "opacity": 1,
            "relativeTransform": [[1, 0, 10], [0, 1, 20]],
            "size": { "width": 10, "height": 10 },
            "localBounds": { "x": 0, "y": 0, "width": 10, "height": 10 },
            "absBounds": { "x": 10, "y": 20, "width": 10, "height": 10 },
            "geometry": {
                "svgPaths": { "paths": ["M0 0 L10 0 L10 10 Z"], "windingRules": ["EVENODD"] }
            },
            "style": { "fills": [], "strokes": [], "effects": [] }
        })
    }

    #[test]
    fn vector_and_boolean_operation_share_one_variant() {
        let vector: SceneNode = serde_json::from_value(vector_json("VECTOR")).unwrap();
        let boolean: SceneNode = serde_json::from_value(vector_json("BOOLEAN_OPERATION")).unwrap();
        assert_eq!(vector.as_vector().unwrap().kind, VectorKind::Vector);
        assert_eq!(boolean.as_vector().unwrap().kind, VectorKind::BooleanOperation);
        assert_eq!(boolean.type_name(), "BOOLEAN_OPERATION");
        assert_eq!(boolean.as_vector().unwrap().geometry.fill_rule(0), FillRule::EvenOdd);
        assert_eq!(boolean.as_vector().unwrap().geometry.fill_rule(5), FillRule::NonZero);
    }

    #[test]
    fn tag_and_matrix_survive_serialization() {
        let node: SceneNode = serde_json::from_value(vector_json("BOOLEAN_OPERATION")).unwrap();
        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(value["type"], "BOOLEAN_OPERATION");
        assert_eq!(value["relativeTransform"], json!([[1.0, 0.0, 10.0], [0.0, 1.0, 20.0]]));
        assert_eq!(value["absBounds"]["width"], 10.0);
        let back: SceneNode = serde_json::from_value(value).unwrap();
        assert_eq!(back, node);
    }

    #[test]
    fn matrix_rows_map_to_transform() {
        let node: SceneNode = serde_json::from_value(vector_json("VECTOR")).unwrap();
        assert_eq!(node.relative_transform.apply([1.0, 1.0]), [11.0, 21.0]);
    }

    #[test]
    fn text_metrics_accept_numbers_and_mixed_marker() {
        let text: TextData = serde_json::from_value(json!({
            "characters": "Hello",
            "font": { "family": "Inter", "postScriptName": "Inter-Regular" },
            "fontSize": "MIXED",
            "lineHeight": "MIXED",
            "letterSpacing": 0.5,
            "textAlign": "CENTER"
        }))
        .unwrap();
        assert_eq!(text.font.face_name, "Inter-Regular");
        assert_eq!(text.font_size, TextMetric::Mixed);
        assert_eq!(text.resolved_font_size(12.0), 12.0);
        assert!((text.resolved_line_height(12.0, 1.2) - 14.4).abs() < 1e-5);
        assert_eq!(text.resolved_letter_spacing(), 0.5);
        assert_eq!(text.text_align, TextAlign::Center);
    }

    #[test]
    fn unknown_metric_marker_is_rejected() {
        let err = serde_json::from_value::<TextMetric>(json!("AUTO"));
        assert!(err.is_err());
    }

    #[test]
    fn leaves_have_no_children() {
        let node: SceneNode = serde_json::from_value(vector_json("VECTOR")).unwrap();
        assert!(node.children().is_empty());
        assert!(!node.clips_content());
    }
}
