//! engine-core: geometry primitives and the drawing seam for the vector scene engine.
//!
//! Everything here is independent of the document format: transforms,
//! rectangles and colors, the path-notation grammar, point-in-path outlines,
//! and the [`DrawBackend`] trait the editor renders through. [`Painter`] is a
//! recording backend that produces a [`DisplayList`].

mod backend;
mod color;
mod display_list;
mod geometry;
mod painter;
mod path;
mod scene;
mod text_layout;

pub use backend::*;
pub use display_list::*;
pub use geometry::{Outline, hull_bounds};
pub use painter::*;
pub use path::{PathCommand, PathError, parse_path, parse_path_strict, serialize_path};
pub use scene::*;
pub use text_layout::{WrappedText, render_wrapped_text, wrap_text_fast};
