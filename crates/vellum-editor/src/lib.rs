//! vellum-editor: the interactive vector scene engine.
//!
//! An [`Editor`] owns one open [`vellum_doc::Document`] and everything
//! derived from it: world transforms, parsed geometry, backend primitives
//! and the pointer state machine. Drawing goes through any
//! [`engine_core::DrawBackend`].

pub mod cache;
pub mod control_points;
pub mod editor;
pub mod interaction;
pub mod render;
pub mod settings;
pub mod traverse;
pub mod world;

#[cfg(test)]
mod test_support;

pub use cache::{GeometryCache, PrimitiveStore, RenderCache, fingerprint};
pub use control_points::{ControlPoint, PointRole, extract, update_point};
pub use editor::Editor;
pub use hit_test::hit_test;
pub use interaction::{
    DisplayedPoint, EditorMode, InteractionController, PointerState, SceneMut, edit_point,
    translate_node,
};
pub use render::{Overlay, Renderer};
pub use settings::EditorSettings;
pub use traverse::{pre_order, subtree, visible_pre_order};
pub use world::WorldTransforms;
