//! Pointer state machine.
//!
//! Pointer-down selects (or, in path-edit mode, grabs a control point),
//! pointer-move drags the selection or moves the grabbed point, pointer-up
//! ends either. Displayed control points are recomputed from the selected
//! node's current geometry after every transition that can change them.

use engine_core::{hull_bounds, serialize_path};
use tracing::debug;
use vellum_doc::{Document, NodeId};

use crate::cache::GeometryCache;
use crate::control_points::{ControlPoint, PointRole, extract, update_point};
use crate::hit_test::hit_test;
use crate::settings::EditorSettings;
use crate::traverse::subtree;
use crate::world::WorldTransforms;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum EditorMode {
    #[default]
    Select,
    EditPath,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum PointerState {
    #[default]
    Idle,
    Dragging {
        node: NodeId,
        last: [f32; 2],
    },
    EditingPoint {
        node: NodeId,
        /// Index into the displayed control points.
        index: usize,
        last: [f32; 2],
    },
}

/// A control point of the selection in canvas space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayedPoint {
    pub x: f32,
    pub y: f32,
    pub role: PointRole,
}

/// The scene state a pointer event reads and mutates.
pub struct SceneMut<'a> {
    pub doc: &'a mut Document,
    pub world: &'a mut WorldTransforms,
    pub geometry: &'a mut GeometryCache,
}

#[derive(Debug, Clone)]
pub struct InteractionController {
    mode: EditorMode,
    state: PointerState,
    selected: Option<NodeId>,
    /// Local-space references, parallel to `displayed`.
    points: Vec<ControlPoint>,
    displayed: Vec<DisplayedPoint>,
    hit_radius: f32,
    flatten_tolerance: f32,
}

impl InteractionController {
    pub fn new(settings: &EditorSettings) -> Self {
        Self {
            mode: EditorMode::Select,
            state: PointerState::Idle,
            selected: None,
            points: Vec::new(),
            displayed: Vec::new(),
            hit_radius: settings.hit_radius,
            flatten_tolerance: settings.flatten_tolerance,
        }
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn state(&self) -> &PointerState {
        &self.state
    }

    pub fn selection(&self) -> Option<&NodeId> {
        self.selected.as_ref()
    }

    pub fn displayed_points(&self) -> &[DisplayedPoint] {
        &self.displayed
    }

    /// Drop selection, pointer state and control points; the mode is kept.
    pub fn reset(&mut self) {
        self.state = PointerState::Idle;
        self.selected = None;
        self.points.clear();
        self.displayed.clear();
    }

    pub fn toggle_mode(&mut self, scene: SceneMut<'_>) -> EditorMode {
        self.mode = match self.mode {
            EditorMode::Select => EditorMode::EditPath,
            EditorMode::EditPath => EditorMode::Select,
        };
        debug!(mode = ?self.mode, "mode changed");
        self.refresh_control_points(scene.doc, scene.world, scene.geometry);
        self.mode
    }

    pub fn pointer_down(&mut self, scene: SceneMut<'_>, point: [f32; 2]) {
        if self.mode == EditorMode::EditPath {
            if let (Some(node), Some(index)) = (self.selected.clone(), self.point_near(point)) {
                debug!(node = %node, index, "editing control point");
                self.state = PointerState::EditingPoint { node, index, last: point };
                return;
            }
        }

        match hit_test(scene.doc, scene.world, scene.geometry, point, self.flatten_tolerance) {
            Some(node) => {
                debug!(node = %node, "selected");
                self.selected = Some(node.clone());
                self.state = PointerState::Dragging { node, last: point };
            }
            None => {
                if self.selected.take().is_some() {
                    debug!("selection cleared");
                }
                self.state = PointerState::Idle;
            }
        }
        self.refresh_control_points(scene.doc, scene.world, scene.geometry);
    }

    /// Returns whether the document changed.
    pub fn pointer_move(&mut self, mut scene: SceneMut<'_>, point: [f32; 2]) -> bool {
        match &mut self.state {
            PointerState::Idle => false,
            PointerState::Dragging { node, last } => {
                let (dx, dy) = (point[0] - last[0], point[1] - last[1]);
                *last = point;
                let node = node.clone();
                if dx == 0.0 && dy == 0.0 {
                    return false;
                }
                translate_node(scene.doc, &node, dx, dy);
                *scene.world = WorldTransforms::resolve(scene.doc);
                if self.mode == EditorMode::EditPath {
                    self.refresh_control_points(scene.doc, scene.world, scene.geometry);
                }
                true
            }
            PointerState::EditingPoint { node, index, last } => {
                *last = point;
                let (node, index) = (node.clone(), *index);
                let changed = self.move_point(&mut scene, &node, index, point);
                self.refresh_control_points(scene.doc, scene.world, scene.geometry);
                changed
            }
        }
    }

    pub fn pointer_up(&mut self) {
        if self.state != PointerState::Idle {
            debug!("pointer released");
        }
        self.state = PointerState::Idle;
    }

    /// Re-derive the control points of the selection from its geometry.
    /// Empty outside path-edit mode or when the selection is not a vector.
    pub fn refresh_control_points(
        &mut self,
        doc: &Document,
        world: &WorldTransforms,
        geometry: &mut GeometryCache,
    ) {
        self.points.clear();
        self.displayed.clear();
        if self.mode != EditorMode::EditPath {
            return;
        }
        let Some(id) = &self.selected else {
            return;
        };
        let vector = doc.node(id).and_then(|n| n.as_vector());
        let (Some(vector), Some(transform)) = (vector, world.get(id)) else {
            return;
        };
        for (path_index, data) in vector.geometry.paths().iter().enumerate() {
            let commands = geometry.commands(id, path_index, data);
            for point in extract(path_index, &commands) {
                let [x, y] = transform.apply([point.x, point.y]);
                self.displayed.push(DisplayedPoint { x, y, role: point.role });
                self.points.push(point);
            }
        }
    }

    fn point_near(&self, p: [f32; 2]) -> Option<usize> {
        let r2 = self.hit_radius * self.hit_radius;
        self.displayed.iter().position(|d| {
            let (dx, dy) = (d.x - p[0], d.y - p[1]);
            dx * dx + dy * dy <= r2
        })
    }

    fn move_point(
        &self,
        scene: &mut SceneMut<'_>,
        node: &str,
        index: usize,
        pointer: [f32; 2],
    ) -> bool {
        let Some(point) = self.points.get(index) else {
            return false;
        };
        let Some([x, y]) = scene.world.get(node).and_then(|t| t.inverse_apply(pointer)) else {
            debug!(node = %node, "no invertible world transform; point edit ignored");
            return false;
        };
        edit_point(scene.doc, scene.world, scene.geometry, node, point, x, y)
    }
}

/// Shift a node's local transform and the absolute bounds of the node and
/// every descendant by `(dx, dy)`.
///
/// Bounds are shifted rather than recomputed, which is exact only while the
/// editor produces pure translations.
pub fn translate_node(doc: &mut Document, id: &str, dx: f32, dy: f32) {
    let ids: Vec<NodeId> = subtree(doc, id).into_iter().cloned().collect();
    if let Some(node) = doc.node_mut(id) {
        node.relative_transform.translate_by(dx, dy);
    }
    for id in ids {
        if let Some(node) = doc.node_mut(&id) {
            node.abs_bounds = node.abs_bounds.translated(dx, dy);
        }
    }
}

/// Replace point `point` of a vector node's path with `(x, y)` in local
/// space, store the re-serialized path and grow the cached bounds to cover
/// the new control hull. Returns false when nothing changed.
pub fn edit_point(
    doc: &mut Document,
    world: &WorldTransforms,
    geometry: &mut GeometryCache,
    id: &str,
    point: &ControlPoint,
    x: f32,
    y: f32,
) -> bool {
    let Some(transform) = world.get(id) else {
        return false;
    };
    let Some(node) = doc.node_mut(id) else {
        return false;
    };
    let Some(vector) = node.as_vector_mut() else {
        return false;
    };
    let Some(data) = vector.geometry.svg_paths.paths.get_mut(point.path_index) else {
        return false;
    };
    let commands = geometry.commands(id, point.path_index, data.as_str());
    let updated = update_point(&commands, point, x, y);
    if updated.as_slice() == &*commands {
        return false;
    }
    let serialized = serialize_path(&updated);
    let hull = hull_bounds(&updated);
    geometry.store_commands(id, point.path_index, &serialized, updated);
    *data = serialized;

    if let Some(hull) = hull {
        node.local_bounds = node.local_bounds.union(hull);
        node.abs_bounds = node.abs_bounds.union(transform.map_rect(hull));
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{doc, group, rect, vector, with_abs, with_transform};
    use engine_core::Rect;

    struct Session {
        doc: Document,
        world: WorldTransforms,
        geometry: GeometryCache,
        ctl: InteractionController,
    }

    impl Session {
        fn new(doc: Document) -> Self {
            let world = WorldTransforms::resolve(&doc);
            Self {
                doc,
                world,
                geometry: GeometryCache::new(),
                ctl: InteractionController::new(&EditorSettings::default()),
            }
        }

        fn scene(&mut self) -> (SceneMut<'_>, &mut InteractionController) {
            let scene = SceneMut {
                doc: &mut self.doc,
                world: &mut self.world,
                geometry: &mut self.geometry,
            };
            (scene, &mut self.ctl)
        }

        fn down(&mut self, p: [f32; 2]) {
            let (scene, ctl) = self.scene();
            ctl.pointer_down(scene, p);
        }

        fn drag(&mut self, p: [f32; 2]) -> bool {
            let (scene, ctl) = self.scene();
            ctl.pointer_move(scene, p)
        }

        fn toggle(&mut self) -> EditorMode {
            let (scene, ctl) = self.scene();
            ctl.toggle_mode(scene)
        }

        fn path(&self, id: &str) -> String {
            self.doc.node(id).and_then(|n| n.as_vector()).unwrap().geometry.paths()[0].clone()
        }
    }

    fn triangle_doc(rows: [[f32; 3]; 2], abs: Rect) -> Document {
        doc(
            "root",
            vec![
                group("root", &["tri"]),
                with_abs(
                    with_transform(vector("tri", &["M0 0 L10 0 L10 10 Z"], &["NONZERO"]), rows),
                    abs.x,
                    abs.y,
                    abs.w,
                    abs.h,
                ),
            ],
        )
    }

    const IDENTITY: [[f32; 3]; 2] = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];

    #[test]
    fn hit_starts_drag_and_miss_clears_selection() {
        let mut s = Session::new(doc("root", vec![group("root", &["r"]), rect("r", 100.0, 100.0)]));
        s.down([50.0, 50.0]);
        assert_eq!(s.ctl.selection().map(String::as_str), Some("r"));
        assert!(matches!(s.ctl.state(), PointerState::Dragging { node, .. } if node == "r"));
        s.ctl.pointer_up();
        s.down([150.0, 150.0]);
        assert_eq!(s.ctl.selection(), None);
        assert_eq!(s.ctl.state(), &PointerState::Idle);
    }

    #[test]
    fn drag_moves_node_bounds_and_world() {
        let mut s = Session::new(doc("root", vec![group("root", &["r"]), rect("r", 100.0, 100.0)]));
        s.down([50.0, 50.0]);
        assert!(s.drag([55.0, 47.0]));
        let r = s.doc.node("r").unwrap();
        assert_eq!(r.relative_transform.translation(), [5.0, -3.0]);
        assert_eq!(r.abs_bounds, Rect::new(5.0, -3.0, 100.0, 100.0));
        assert_eq!(s.world.get("r").unwrap().apply([0.0, 0.0]), [5.0, -3.0]);
        // deltas are measured from the previous move, not the press
        assert!(s.drag([56.0, 47.0]));
        assert_eq!(s.doc.node("r").unwrap().relative_transform.translation(), [6.0, -3.0]);
        assert!(!s.drag([56.0, 47.0]));
    }

    #[test]
    fn translate_shifts_descendant_bounds_only() {
        let mut d = doc(
            "root",
            vec![
                group("root", &["g"]),
                with_abs(group("g", &["a", "b"]), 0.0, 0.0, 30.0, 30.0),
                with_transform(rect("a", 10.0, 10.0), [[2.0, 0.0, 1.0], [0.0, 2.0, 1.0]]),
                with_abs(rect("b", 10.0, 10.0), 20.0, 20.0, 10.0, 10.0),
            ],
        );
        let a_before = d.node("a").unwrap().relative_transform;
        translate_node(&mut d, "g", 5.0, -3.0);
        assert_eq!(d.node("g").unwrap().relative_transform.translation(), [5.0, -3.0]);
        assert_eq!(d.node("g").unwrap().abs_bounds, Rect::new(5.0, -3.0, 30.0, 30.0));
        assert_eq!(d.node("a").unwrap().abs_bounds, Rect::new(5.0, -3.0, 10.0, 10.0));
        assert_eq!(d.node("b").unwrap().abs_bounds, Rect::new(25.0, 17.0, 10.0, 10.0));
        assert_eq!(d.node("a").unwrap().relative_transform, a_before);
        assert_eq!(d.node("root").unwrap().abs_bounds, Rect::new(0.0, 0.0, 0.0, 0.0));
    }

    #[test]
    fn control_points_show_only_in_edit_mode() {
        let mut s = Session::new(triangle_doc(IDENTITY, Rect::new(0.0, 0.0, 10.0, 10.0)));
        s.down([8.0, 2.0]);
        assert!(s.ctl.displayed_points().is_empty());
        assert_eq!(s.toggle(), EditorMode::EditPath);
        let shown: Vec<[f32; 2]> = s.ctl.displayed_points().iter().map(|p| [p.x, p.y]).collect();
        assert_eq!(shown, vec![[0.0, 0.0], [10.0, 0.0], [10.0, 10.0]]);
        assert_eq!(s.toggle(), EditorMode::Select);
        assert!(s.ctl.displayed_points().is_empty());
    }

    #[test]
    fn dragging_an_anchor_rewrites_the_path() {
        let mut s = Session::new(triangle_doc(IDENTITY, Rect::new(0.0, 0.0, 10.0, 10.0)));
        s.toggle();
        s.down([8.0, 2.0]);
        s.ctl.pointer_up();

        s.down([10.5, 0.5]);
        assert!(matches!(s.ctl.state(), PointerState::EditingPoint { index: 1, .. }));
        assert!(s.drag([20.0, 0.0]));
        assert_eq!(s.path("tri"), "M0 0 L20 0 L10 10 Z");
        assert_eq!(
            s.ctl.displayed_points()[1],
            DisplayedPoint { x: 20.0, y: 0.0, role: PointRole::Anchor }
        );

        let tri = s.doc.node("tri").unwrap();
        assert_eq!(tri.abs_bounds, Rect::new(0.0, 0.0, 20.0, 10.0));
        assert_eq!(tri.local_bounds, Rect::new(0.0, 0.0, 20.0, 10.0));

        s.ctl.pointer_up();
        assert_eq!(s.ctl.state(), &PointerState::Idle);
        assert_eq!(s.ctl.mode(), EditorMode::EditPath);
    }

    #[test]
    fn anchors_of_a_later_path_edit_that_path_only() {
        let two = vector(
            "v",
            &["M0 0 L10 0 L10 10 Z", "M20 0 L30 0 L30 10 Z"],
            &["NONZERO", "NONZERO"],
        );
        let mut s = Session::new(doc(
            "root",
            vec![group("root", &["v"]), with_abs(two, 0.0, 0.0, 30.0, 10.0)],
        ));
        s.toggle();
        s.down([28.0, 2.0]);
        s.ctl.pointer_up();
        assert_eq!(s.ctl.selection().map(String::as_str), Some("v"));
        assert_eq!(s.ctl.displayed_points().len(), 6);

        s.down([30.5, 0.5]);
        assert!(matches!(s.ctl.state(), PointerState::EditingPoint { index: 4, .. }));
        assert!(s.drag([40.0, 0.0]));
        let paths = s.doc.node("v").and_then(|n| n.as_vector()).unwrap().geometry.paths().to_vec();
        assert_eq!(paths, vec!["M0 0 L10 0 L10 10 Z", "M20 0 L40 0 L30 10 Z"]);
        assert_eq!(
            s.ctl.displayed_points()[4],
            DisplayedPoint { x: 40.0, y: 0.0, role: PointRole::Anchor }
        );
        assert_eq!(
            s.ctl.displayed_points()[1],
            DisplayedPoint { x: 10.0, y: 0.0, role: PointRole::Anchor }
        );
        assert_eq!(s.doc.node("v").unwrap().abs_bounds, Rect::new(0.0, 0.0, 40.0, 10.0));
    }

    #[test]
    fn point_edits_map_through_the_world_transform() {
        let rows = [[2.0, 0.0, 100.0], [0.0, 2.0, 0.0]];
        let mut s = Session::new(triangle_doc(rows, Rect::new(100.0, 0.0, 20.0, 20.0)));
        s.toggle();
        s.down([116.0, 4.0]);
        s.ctl.pointer_up();
        assert_eq!(s.ctl.displayed_points()[2].x, 120.0);

        s.down([120.0, 1.0]);
        s.drag([140.0, 0.0]);
        assert_eq!(s.path("tri"), "M0 0 L20 0 L10 10 Z");
        assert_eq!(s.doc.node("tri").unwrap().abs_bounds, Rect::new(100.0, 0.0, 40.0, 20.0));
    }

    #[test]
    fn press_away_from_points_falls_back_to_selection() {
        let mut s = Session::new(doc(
            "root",
            vec![
                group("root", &["tri", "r"]),
                with_abs(
                    vector("tri", &["M0 0 L10 0 L10 10 Z"], &["NONZERO"]),
                    0.0,
                    0.0,
                    10.0,
                    10.0,
                ),
                with_abs(
                    with_transform(rect("r", 10.0, 10.0), [[1.0, 0.0, 50.0], [0.0, 1.0, 0.0]]),
                    50.0,
                    0.0,
                    10.0,
                    10.0,
                ),
            ],
        ));
        s.toggle();
        s.down([8.0, 2.0]);
        assert_eq!(s.ctl.displayed_points().len(), 3);
        s.ctl.pointer_up();
        s.down([55.0, 5.0]);
        assert_eq!(s.ctl.selection().map(String::as_str), Some("r"));
        assert!(s.ctl.displayed_points().is_empty());
    }

    #[test]
    fn stale_point_reference_is_a_no_op() {
        let mut s = Session::new(triangle_doc(IDENTITY, Rect::new(0.0, 0.0, 10.0, 10.0)));
        let stale = ControlPoint {
            path_index: 3,
            command_index: 0,
            offset: 0,
            role: PointRole::Anchor,
            x: 0.0,
            y: 0.0,
        };
        assert!(!edit_point(&mut s.doc, &s.world, &mut s.geometry, "tri", &stale, 5.0, 5.0));
        assert_eq!(s.path("tri"), "M0 0 L10 0 L10 10 Z");
    }
}
