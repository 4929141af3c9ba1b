//! Scene renderer.
//!
//! Walks the document from the root, pushing each node's local transform on
//! the backend's stack, and draws through the [`RenderCache`] so unchanged
//! content is never rebuilt. The selection overlay is drawn last, in canvas
//! space.

use std::collections::HashSet;

use engine_core::{
    ColorLinPremul, DrawBackend, GradientKind, GradientSpec, PaintStyle, ParagraphSpec, Rect,
    RoundedRect, StrokeCap, StrokeJoin, StrokeStyle, TextAlign as ParagraphAlign,
};
use vellum_doc::{
    Document, GradientFill, LineCap, LineJoin, NodeId, NodeKind, Paint, Rgba, SceneNode,
    StrokePaint, Style, TextAlign, TextData, VectorData,
};

use crate::cache::{PrimitiveStore, RenderCache, fingerprint};
use crate::control_points::PointRole;
use crate::interaction::DisplayedPoint;
use crate::settings::EditorSettings;

/// Editor state drawn on top of the scene.
#[derive(Debug, Clone, Copy, Default)]
pub struct Overlay<'a> {
    pub selected: Option<&'a SceneNode>,
    pub control_points: &'a [DisplayedPoint],
}

#[derive(Clone, Copy)]
enum Shape {
    Rect(Rect),
    Rounded(RoundedRect),
}

pub struct Renderer<B: DrawBackend> {
    cache: RenderCache<B>,
    settings: EditorSettings,
}

impl<B: DrawBackend> Renderer<B> {
    pub fn new(settings: EditorSettings) -> Self {
        Self {
            cache: RenderCache::new(),
            settings,
        }
    }

    pub fn cache(&self) -> &RenderCache<B> {
        &self.cache
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Draw one frame: clear, scene, overlay, present.
    pub fn render(&mut self, backend: &mut B, doc: &Document, overlay: &Overlay<'_>) {
        backend.clear();
        if let Some(root) = doc.root() {
            let mut visited = HashSet::new();
            self.draw_node(backend, doc, root, &mut visited);
        }
        self.draw_overlay(backend, overlay);
        backend.present();
    }

    fn draw_node<'a>(
        &mut self,
        backend: &mut B,
        doc: &'a Document,
        node: &'a SceneNode,
        visited: &mut HashSet<&'a NodeId>,
    ) {
        if !visited.insert(&node.id) {
            return;
        }
        if !node.visible || node.opacity == 0.0 {
            return;
        }

        backend.save();
        backend.concat(node.relative_transform);
        let clip = node.clips_content();
        if clip {
            backend.save();
            backend.clip_rect(node.size_rect());
        }

        match &node.kind {
            NodeKind::Frame(frame) => {
                self.draw_style(backend, &node.id, &frame.style, Shape::Rect(node.size_rect()));
                self.draw_children(backend, doc, node, visited);
            }
            NodeKind::Group(_) => self.draw_children(backend, doc, node, visited),
            NodeKind::Rectangle(rect) => {
                let rrect = RoundedRect {
                    rect: node.size_rect(),
                    radii: rect.corner_radius.into(),
                };
                self.draw_style(backend, &node.id, &rect.style, Shape::Rounded(rrect));
            }
            NodeKind::Vector(vector) => self.draw_vector(backend, &node.id, vector),
            NodeKind::Text(text) => self.draw_text(backend, node, text),
        }

        if clip {
            backend.restore();
        }
        backend.restore();
    }

    fn draw_children<'a>(
        &mut self,
        backend: &mut B,
        doc: &'a Document,
        node: &'a SceneNode,
        visited: &mut HashSet<&'a NodeId>,
    ) {
        for child_id in node.children() {
            if let Some(child) = doc.node(child_id) {
                self.draw_node(backend, doc, child, visited);
            }
        }
    }

    fn draw_style(&mut self, backend: &mut B, id: &str, style: &Style, shape: Shape) {
        let RenderCache { paints, shaders, .. } = &mut self.cache;
        for (index, fill) in style.fills.iter().enumerate() {
            let paint = fill_paint(paints, shaders, backend, fill, &format!("{id}:fill:{index}"));
            draw_shape(backend, shape, paint);
        }
        for (index, stroke) in style.strokes.iter().enumerate() {
            let prefix = format!("{id}:stroke:{index}");
            let paint = stroke_paint(paints, shaders, backend, stroke, &prefix);
            draw_shape(backend, shape, paint);
        }
    }

    fn draw_vector(&mut self, backend: &mut B, id: &str, vector: &VectorData) {
        let RenderCache { paths, paints, shaders, .. } = &mut self.cache;
        for (index, data) in vector.geometry.paths().iter().enumerate() {
            let rule = vector.geometry.fill_rule(index);
            let path = paths.get(format!("{id}:path:{index}:{rule:?}:{data}"), || {
                let mut path = backend.make_path(data);
                backend.set_fill_rule(&mut path, rule);
                path
            });
            for (fill_index, fill) in vector.style.fills.iter().enumerate() {
                let prefix = format!("{id}:fill:{fill_index}");
                let paint = fill_paint(paints, shaders, backend, fill, &prefix);
                backend.draw_path(path, paint);
            }
            for (stroke_index, stroke) in vector.style.strokes.iter().enumerate() {
                let prefix = format!("{id}:stroke:{stroke_index}");
                let paint = stroke_paint(paints, shaders, backend, stroke, &prefix);
                backend.draw_path(path, paint);
            }
        }
    }

    fn draw_text(&mut self, backend: &mut B, node: &SceneNode, text: &TextData) {
        let width = node.size.width;
        let key = format!("{}:paragraph:{width}:{}", node.id, fingerprint(text));
        let settings = &self.settings;
        let paragraph = self.cache.paragraphs.get(key, || {
            let color = text
                .style
                .first_solid()
                .map(|fill| fill.color.to_color(fill.opacity))
                .unwrap_or_else(|| ColorLinPremul::BLACK);
            let spec = ParagraphSpec {
                text: text.characters.clone(),
                font_family: text.font.family.clone(),
                font_size: text.resolved_font_size(settings.default_font_size),
                line_height: text
                    .resolved_line_height(settings.default_font_size, settings.line_height_factor),
                letter_spacing: text.resolved_letter_spacing(),
                align: paragraph_align(text.text_align),
                color,
            };
            backend.layout_paragraph(&spec, width)
        });
        backend.draw_paragraph(paragraph, [0.0, 0.0]);
    }

    fn draw_overlay(&mut self, backend: &mut B, overlay: &Overlay<'_>) {
        let settings = &self.settings;
        let paints = &mut self.cache.paints;

        if let Some(node) = overlay.selected {
            let bounds = node.abs_bounds;
            let color = settings.selection_color;
            let outline = paints.get(format!("overlay:selection:stroke:{color:?}"), || {
                let style = PaintStyle::Stroke(StrokeStyle { width: 1.0, ..Default::default() });
                backend.make_paint(&style, color, None)
            });
            backend.draw_rect(bounds, outline);

            let handle = paints.get(format!("overlay:selection:handle:{color:?}"), || {
                backend.make_paint(&PaintStyle::Fill, color, None)
            });
            let size = settings.selection_handle_size;
            let corners = [
                [bounds.x, bounds.y],
                [bounds.x + bounds.w, bounds.y],
                [bounds.x, bounds.y + bounds.h],
                [bounds.x + bounds.w, bounds.y + bounds.h],
            ];
            for [x, y] in corners {
                backend.draw_rect(centered_square(x, y, size), handle);
            }
        }

        if overlay.control_points.is_empty() {
            return;
        }
        let size = settings.control_point_size;
        for point in overlay.control_points {
            let color = match point.role {
                PointRole::Anchor => settings.anchor_color,
                PointRole::Control => settings.control_color,
            };
            let paint = paints.get(format!("overlay:point:{:?}:{color:?}", point.role), || {
                backend.make_paint(&PaintStyle::Fill, color, None)
            });
            backend.draw_rect(centered_square(point.x, point.y, size), paint);
        }
    }
}

fn centered_square(x: f32, y: f32, size: f32) -> Rect {
    Rect::new(x - size / 2.0, y - size / 2.0, size, size)
}

fn draw_shape<B: DrawBackend>(backend: &mut B, shape: Shape, paint: &B::Paint) {
    match shape {
        Shape::Rect(rect) => backend.draw_rect(rect, paint),
        Shape::Rounded(rrect) => backend.draw_rounded_rect(rrect, paint),
    }
}

fn fill_paint<'p, B: DrawBackend>(
    paints: &'p mut PrimitiveStore<B::Paint>,
    shaders: &mut PrimitiveStore<B::Shader>,
    backend: &mut B,
    fill: &Paint,
    prefix: &str,
) -> &'p B::Paint {
    let key = format!("{prefix}:fill:{}", fingerprint(fill));
    paints.get(key, || build_paint(shaders, backend, &PaintStyle::Fill, Some(fill), 1.0, prefix))
}

fn stroke_paint<'p, B: DrawBackend>(
    paints: &'p mut PrimitiveStore<B::Paint>,
    shaders: &mut PrimitiveStore<B::Shader>,
    backend: &mut B,
    stroke: &StrokePaint,
    prefix: &str,
) -> &'p B::Paint {
    let key = format!("{prefix}:stroke:{}", fingerprint(stroke));
    paints.get(key, || {
        let style = PaintStyle::Stroke(StrokeStyle {
            width: stroke.width,
            cap: stroke_cap(stroke.cap),
            join: stroke_join(stroke.join),
            dash: stroke.dash.clone(),
        });
        build_paint(shaders, backend, &style, stroke.fills.first(), stroke.opacity, prefix)
    })
}

/// Paint for one fill. Image fills and strokes without fills fall back to
/// black at the fill's opacity.
fn build_paint<B: DrawBackend>(
    shaders: &mut PrimitiveStore<B::Shader>,
    backend: &mut B,
    style: &PaintStyle,
    fill: Option<&Paint>,
    opacity: f32,
    prefix: &str,
) -> B::Paint {
    match fill {
        Some(Paint::Solid(solid)) => {
            backend.make_paint(style, solid.color.to_color(solid.opacity * opacity), None)
        }
        Some(Paint::GradientLinear(gradient)) => {
            let shader =
                gradient_shader(shaders, backend, GradientKind::Linear, gradient, opacity, prefix);
            backend.make_paint(style, ColorLinPremul::BLACK, Some(shader))
        }
        Some(Paint::GradientRadial(gradient)) => {
            let shader =
                gradient_shader(shaders, backend, GradientKind::Radial, gradient, opacity, prefix);
            backend.make_paint(style, ColorLinPremul::BLACK, Some(shader))
        }
        Some(Paint::Image(image)) => {
            backend.make_paint(style, Rgba::BLACK.to_color(image.opacity * opacity), None)
        }
        None => backend.make_paint(style, Rgba::BLACK.to_color(opacity), None),
    }
}

fn gradient_shader<'s, B: DrawBackend>(
    shaders: &'s mut PrimitiveStore<B::Shader>,
    backend: &mut B,
    kind: GradientKind,
    gradient: &GradientFill,
    opacity: f32,
    prefix: &str,
) -> &'s B::Shader {
    let key = format!("{prefix}:shader:{kind:?}:{opacity}:{}", fingerprint(gradient));
    shaders.get(key, || {
        let alpha = gradient.opacity * opacity;
        let stops: Vec<(f32, ColorLinPremul)> = gradient
            .stops
            .iter()
            .map(|stop| (stop.position, stop.color.to_color(alpha)))
            .collect();
        backend.make_gradient_shader(&GradientSpec { kind, stops, transform: gradient.transform })
    })
}

fn stroke_cap(cap: LineCap) -> StrokeCap {
    match cap {
        LineCap::Butt => StrokeCap::Butt,
        LineCap::Round => StrokeCap::Round,
        LineCap::Square => StrokeCap::Square,
    }
}

fn stroke_join(join: LineJoin) -> StrokeJoin {
    match join {
        LineJoin::Miter => StrokeJoin::Miter,
        LineJoin::Round => StrokeJoin::Round,
        LineJoin::Bevel => StrokeJoin::Bevel,
    }
}

fn paragraph_align(align: TextAlign) -> ParagraphAlign {
    match align {
        TextAlign::Left => ParagraphAlign::Left,
        TextAlign::Right => ParagraphAlign::Right,
        TextAlign::Center => ParagraphAlign::Center,
        TextAlign::Justified => ParagraphAlign::Justified,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{doc, frame, group, rect, text, vector, with_fills, with_transform};
    use engine_core::{Command, Painter, Transform2D};
    use serde_json::json;

    fn red() -> serde_json::Value {
        json!([{ "type": "SOLID", "color": { "r": 1, "g": 0, "b": 0, "a": 1 }, "opacity": 0.5 }])
    }

    fn render(d: &Document) -> (Renderer<Painter>, Painter) {
        let mut renderer = Renderer::new(EditorSettings::default());
        let mut painter = Painter::new();
        renderer.render(&mut painter, d, &Overlay::default());
        (renderer, painter)
    }

    #[test]
    fn draws_in_tree_order_with_world_transforms() {
        let d = doc(
            "root",
            vec![
                with_transform(group("root", &["a", "b"]), [[1.0, 0.0, 10.0], [0.0, 1.0, 0.0]]),
                with_fills(rect("a", 5.0, 5.0), red()),
                with_fills(
                    with_transform(rect("b", 5.0, 5.0), [[1.0, 0.0, 0.0], [0.0, 1.0, 7.0]]),
                    red(),
                ),
            ],
        );
        let (_, painter) = render(&d);
        let origins: Vec<[f32; 2]> = painter
            .display_list()
            .draw_commands()
            .map(|c| match c {
                Command::DrawRoundedRect { transform, .. } => transform.apply([0.0, 0.0]),
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(origins, vec![[10.0, 0.0], [10.0, 7.0]]);
    }

    #[test]
    fn hidden_and_transparent_nodes_are_skipped() {
        let mut d = doc(
            "root",
            vec![
                group("root", &["a", "b", "c"]),
                with_fills(rect("a", 5.0, 5.0), red()),
                with_fills(rect("b", 5.0, 5.0), red()),
                with_fills(rect("c", 5.0, 5.0), red()),
            ],
        );
        d.node_mut("a").unwrap().visible = false;
        d.node_mut("b").unwrap().opacity = 0.0;
        let (_, painter) = render(&d);
        assert_eq!(painter.display_list().draw_commands().count(), 1);
    }

    #[test]
    fn singular_nodes_still_draw() {
        let d = doc(
            "root",
            vec![
                group("root", &["flat"]),
                with_fills(
                    with_transform(rect("flat", 5.0, 5.0), [[0.0, 0.0, 0.0], [0.0, 1.0, 0.0]]),
                    red(),
                ),
            ],
        );
        let (_, painter) = render(&d);
        assert_eq!(painter.display_list().draw_commands().count(), 1);
    }

    #[test]
    fn clipping_containers_clip_to_their_size() {
        let mut root = frame("root", 40.0, 30.0, &["a"]);
        root["clipsContent"] = json!(true);
        let d = doc("root", vec![root, with_fills(rect("a", 100.0, 100.0), red())]);
        let (_, painter) = render(&d);
        let clip = painter.display_list().commands.iter().find_map(|c| match c {
            Command::ClipRect { rect, .. } => Some(*rect),
            _ => None,
        });
        assert_eq!(clip, Some(Rect::new(0.0, 0.0, 40.0, 30.0)));
    }

    #[test]
    fn vector_draws_fills_then_strokes_per_path() {
        let mut v = with_fills(
            vector("v", &["M0 0 L1 0 L1 1 Z", "M2 2 L3 3"], &["EVENODD", "NONZERO"]),
            red(),
        );
        v["style"]["strokes"] = json!([{
            "fills": [],
            "width": 2,
            "cap": "ROUND",
            "join": "BEVEL",
            "dash": [],
            "opacity": 1
        }]);
        let d = doc("root", vec![group("root", &["v"]), v]);
        let (_, painter) = render(&d);
        let draws: Vec<(String, bool)> = painter
            .display_list()
            .draw_commands()
            .map(|c| match c {
                Command::DrawPath { path, paint, .. } => {
                    (path.data.clone(), matches!(paint.style, PaintStyle::Stroke(_)))
                }
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(
            draws,
            vec![
                ("M0 0 L1 0 L1 1 Z".to_string(), false),
                ("M0 0 L1 0 L1 1 Z".to_string(), true),
                ("M2 2 L3 3".to_string(), false),
                ("M2 2 L3 3".to_string(), true),
            ]
        );
        let first = painter.display_list().draw_commands().next().cloned();
        assert!(matches!(
            first,
            Some(Command::DrawPath { path, .. }) if path.fill_rule == engine_core::FillRule::EvenOdd
        ));
    }

    #[test]
    fn gradient_fills_build_shaders() {
        let fills = json!([{
            "type": "GRADIENT_RADIAL",
            "stops": [
                { "position": 0, "color": { "r": 1, "g": 1, "b": 1, "a": 1 } },
                { "position": 1, "color": { "r": 0, "g": 0, "b": 0, "a": 1 } }
            ],
            "transform": [[10, 0, 5], [0, 10, 5]],
            "opacity": 0.5
        }]);
        let d = doc("root", vec![group("root", &["r"]), with_fills(rect("r", 10.0, 10.0), fills)]);
        let (_, painter) = render(&d);
        let shader = painter.display_list().draw_commands().find_map(|c| match c {
            Command::DrawRoundedRect { paint, .. } => paint.shader.clone(),
            _ => None,
        });
        let gradient = shader.expect("gradient shader").gradient;
        assert_eq!(gradient.kind, GradientKind::Radial);
        assert_eq!(gradient.stops.len(), 2);
        assert!((gradient.stops[0].1.a - 0.5).abs() < 1e-6);
        assert_eq!(
            gradient.transform,
            Transform2D::from_rows([[10.0, 0.0, 5.0], [0.0, 10.0, 5.0]])
        );
    }

    #[test]
    fn text_uses_node_width_and_first_solid_fill() {
        let d = doc(
            "root",
            vec![group("root", &["t"]), with_fills(text("t", "one two three four", 30.0), red())],
        );
        let (_, painter) = render(&d);
        let lines: Vec<(String, f32)> = painter
            .display_list()
            .draw_commands()
            .map(|c| match c {
                Command::DrawTextLine { text, color, .. } => (text.clone(), color.a),
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        // 10px text averages 5.5px per char: 30px holds 5 chars per line.
        assert_eq!(
            lines.iter().map(|(t, _)| t.as_str()).collect::<Vec<_>>(),
            vec!["one", "two", "three", "four"]
        );
        assert!(lines.iter().all(|(_, a)| (*a - 0.5).abs() < 1e-6));
    }

    #[test]
    fn second_frame_rebuilds_nothing() {
        let d = doc(
            "root",
            vec![
                group("root", &["r", "v", "t"]),
                with_fills(rect("r", 5.0, 5.0), red()),
                with_fills(vector("v", &["M0 0 L1 1"], &["NONZERO"]), red()),
                text("t", "hi", 50.0),
            ],
        );
        let mut renderer = Renderer::new(EditorSettings::default());
        let mut painter = Painter::new();
        renderer.render(&mut painter, &d, &Overlay::default());
        let after_first = painter.display_list().stats;
        renderer.render(&mut painter, &d, &Overlay::default());
        assert_eq!(painter.display_list().stats, after_first);
        assert_eq!(after_first.paths, 1);
        assert_eq!(after_first.paragraphs, 1);
    }

    #[test]
    fn changed_fill_builds_a_new_paint() {
        let mut d = doc(
            "root",
            vec![group("root", &["r"]), with_fills(rect("r", 5.0, 5.0), red())],
        );
        let mut renderer = Renderer::new(EditorSettings::default());
        let mut painter = Painter::new();
        renderer.render(&mut painter, &d, &Overlay::default());
        if let NodeKind::Rectangle(r) = &mut d.node_mut("r").unwrap().kind {
            if let Paint::Solid(s) = &mut r.style.fills[0] {
                s.opacity = 1.0;
            }
        }
        renderer.render(&mut painter, &d, &Overlay::default());
        assert_eq!(painter.display_list().stats.paints, 2);
        assert_eq!(renderer.cache().paints.len(), 2);
    }

    #[test]
    fn overlay_draws_bounds_handles_and_points() {
        let d = doc("root", vec![group("root", &["r"]), rect("r", 10.0, 10.0)]);
        let points = [
            DisplayedPoint { x: 1.0, y: 1.0, role: PointRole::Anchor },
            DisplayedPoint { x: 2.0, y: 2.0, role: PointRole::Control },
        ];
        let overlay = Overlay { selected: d.node("r"), control_points: &points };
        let mut renderer = Renderer::new(EditorSettings::default());
        let mut painter = Painter::new();
        renderer.render(&mut painter, &d, &overlay);
        let rects: Vec<Rect> = painter
            .display_list()
            .draw_commands()
            .filter_map(|c| match c {
                Command::DrawRect { rect, .. } => Some(*rect),
                _ => None,
            })
            .collect();
        // outline + 4 handles + 2 points
        assert_eq!(rects.len(), 7);
        assert_eq!(rects[0], Rect::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(rects[1], Rect::new(-3.0, -3.0, 6.0, 6.0));
        assert_eq!(rects[5], Rect::new(-1.5, -1.5, 5.0, 5.0));
    }
}
