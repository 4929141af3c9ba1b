//! Editable points derived from parsed path commands.
//!
//! Control points are a view, never stored: they are re-extracted whenever
//! the geometry or the selection changes. Their order is the contract the
//! interaction controller uses to map a picked index back to a coordinate
//! slot.

use engine_core::PathCommand;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointRole {
    /// On-curve end point.
    Anchor,
    /// Off-curve curve handle.
    Control,
}

/// A reference to one `x, y` slot pair inside a path's command list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlPoint {
    pub path_index: usize,
    pub command_index: usize,
    /// Index of the `x` coordinate within the command's point list.
    pub offset: usize,
    pub role: PointRole,
    pub x: f32,
    pub y: f32,
}

/// Control points of one path, in command order. Move and line give one
/// anchor; a quadratic gives a handle then an anchor; a cubic gives two
/// handles then an anchor; close gives nothing.
pub fn extract(path_index: usize, commands: &[PathCommand]) -> Vec<ControlPoint> {
    let mut out = Vec::new();
    for (command_index, cmd) in commands.iter().enumerate() {
        let pts = cmd.points();
        let pairs = pts.len() / 2;
        for pair in 0..pairs {
            let offset = pair * 2;
            let role = if pair + 1 == pairs { PointRole::Anchor } else { PointRole::Control };
            out.push(ControlPoint {
                path_index,
                command_index,
                offset,
                role,
                x: pts[offset],
                y: pts[offset + 1],
            });
        }
    }
    out
}

/// Copy of `commands` with the slot pair named by `point` set to `(x, y)`.
///
/// A reference that no longer fits the list (stale command index or offset)
/// returns an unchanged copy.
pub fn update_point(
    commands: &[PathCommand],
    point: &ControlPoint,
    x: f32,
    y: f32,
) -> Vec<PathCommand> {
    let mut updated = commands.to_vec();
    if let Some(slots) = updated
        .get_mut(point.command_index)
        .and_then(|cmd| cmd.points_mut().get_mut(point.offset..point.offset + 2))
    {
        slots[0] = x;
        slots[1] = y;
    }
    updated
}
