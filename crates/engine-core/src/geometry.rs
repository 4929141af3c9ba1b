//! Path outlines for containment queries.
//!
//! Parsed commands are turned into a lyon path once; containment flattens the
//! curves and sums the crossing winding number of a +X ray from the query
//! point, then applies the fill rule.

use lyon_geom::{CubicBezierSegment, QuadraticBezierSegment, point};
use lyon_path::{Path as LyonPath, PathEvent};
use lyon_path::math::Point;

use crate::path::PathCommand;
use crate::scene::{FillRule, Rect};

/// A built, fill-rule-tagged outline ready for point-in-path tests.
#[derive(Clone, Debug)]
pub struct Outline {
    path: LyonPath,
    fill_rule: FillRule,
}

impl Outline {
    pub fn from_commands(commands: &[PathCommand], fill_rule: FillRule) -> Self {
        let mut builder = LyonPath::builder();
        let mut started = false;
        let mut cursor = [0.0f32, 0.0];
        let mut subpath_start = cursor;
        for cmd in commands {
            match *cmd {
                PathCommand::Move([x, y]) => {
                    if started {
                        builder.end(false);
                    }
                    builder.begin(point(x, y));
                    started = true;
                    cursor = [x, y];
                    subpath_start = cursor;
                }
                PathCommand::Line([x, y]) => {
                    if !started {
                        builder.begin(point(cursor[0], cursor[1]));
                        started = true;
                    }
                    builder.line_to(point(x, y));
                    cursor = [x, y];
                }
                PathCommand::Quadratic([cx, cy, x, y]) => {
                    if !started {
                        builder.begin(point(cursor[0], cursor[1]));
                        started = true;
                    }
                    builder.quadratic_bezier_to(point(cx, cy), point(x, y));
                    cursor = [x, y];
                }
                PathCommand::Cubic([c1x, c1y, c2x, c2y, x, y]) => {
                    if !started {
                        builder.begin(point(cursor[0], cursor[1]));
                        started = true;
                    }
                    builder.cubic_bezier_to(point(c1x, c1y), point(c2x, c2y), point(x, y));
                    cursor = [x, y];
                }
                PathCommand::Close => {
                    if started {
                        builder.end(true);
                        started = false;
                    }
                    cursor = subpath_start;
                }
            }
        }
        // If the last sub-path wasn't explicitly closed, end it as open.
        if started {
            builder.end(false);
        }
        Self { path: builder.build(), fill_rule }
    }

    pub fn fill_rule(&self) -> FillRule {
        self.fill_rule
    }

    /// Winding number of the outline around `p`. Open sub-paths are treated
    /// as implicitly closed, as filling does.
    pub fn winding_number(&self, p: [f32; 2], tolerance: f32) -> i32 {
        let pt = point(p[0], p[1]);
        let tolerance = if tolerance.is_finite() && tolerance > 0.0 { tolerance } else { 0.05 };
        let mut winding = 0i32;
        for event in self.path.iter() {
            match event {
                PathEvent::Begin { .. } => {}
                PathEvent::Line { from, to } => {
                    winding += crossing(from, to, pt);
                }
                PathEvent::Quadratic { from, ctrl, to } => {
                    let seg = QuadraticBezierSegment { from, ctrl, to };
                    let mut prev = from;
                    for next in seg.flattened(tolerance) {
                        winding += crossing(prev, next, pt);
                        prev = next;
                    }
                }
                PathEvent::Cubic { from, ctrl1, ctrl2, to } => {
                    let seg = CubicBezierSegment { from, ctrl1, ctrl2, to };
                    let mut prev = from;
                    for next in seg.flattened(tolerance) {
                        winding += crossing(prev, next, pt);
                        prev = next;
                    }
                }
                PathEvent::End { last, first, .. } => {
                    winding += crossing(last, first, pt);
                }
            }
        }
        winding
    }

    /// Point-in-path under the outline's fill rule.
    pub fn contains(&self, p: [f32; 2], tolerance: f32) -> bool {
        self.fill_rule.is_inside(self.winding_number(p, tolerance))
    }
}

/// Winding contribution of the edge `a -> b` for a +X ray from `p`.
fn crossing(a: Point, b: Point, p: Point) -> i32 {
    let side = (b.x - a.x) * (p.y - a.y) - (p.x - a.x) * (b.y - a.y);
    if a.y <= p.y {
        if b.y > p.y && side > 0.0 {
            return 1;
        }
    } else if b.y <= p.y && side < 0.0 {
        return -1;
    }
    0
}

/// Bounding box of every coordinate the commands mention, control handles
/// included. Conservative for curves.
pub fn hull_bounds(commands: &[PathCommand]) -> Option<Rect> {
    Rect::from_points(
        commands
            .iter()
            .flat_map(|c| c.points().chunks_exact(2).map(|p| [p[0], p[1]])),
    )
}
