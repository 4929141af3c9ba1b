//! The editing session: one open document with its derived state.

use std::path::Path;

use anyhow::{Context, Result};
use engine_core::DrawBackend;
use tracing::debug;
use vellum_doc::{Document, NodeId};

use crate::cache::GeometryCache;
use crate::interaction::{DisplayedPoint, EditorMode, InteractionController, PointerState, SceneMut};
use crate::render::{Overlay, Renderer};
use crate::settings::EditorSettings;
use crate::world::WorldTransforms;

/// Owns the document, the world transforms, both caches and the pointer
/// state machine. Pointer handlers run to completion before the next
/// [`Editor::frame`] reads the document.
pub struct Editor<B: DrawBackend> {
    doc: Document,
    world: WorldTransforms,
    geometry: GeometryCache,
    renderer: Renderer<B>,
    controller: InteractionController,
}

impl<B: DrawBackend> Editor<B> {
    pub fn new(doc: Document, settings: EditorSettings) -> Self {
        let world = WorldTransforms::resolve(&doc);
        Self {
            doc,
            world,
            geometry: GeometryCache::new(),
            renderer: Renderer::new(settings.clone()),
            controller: InteractionController::new(&settings),
        }
    }

    /// Load a document from disk and start a session on it.
    pub fn from_path(path: &Path, settings: EditorSettings) -> Result<Self> {
        let doc = Document::from_path(path)
            .with_context(|| format!("failed to open editor session for {}", path.display()))?;
        Ok(Self::new(doc, settings))
    }

    /// Replace the open document, discarding every cache, the selection and
    /// any in-progress gesture.
    pub fn open(&mut self, doc: Document) -> Document {
        debug!(root = %doc.root_id, nodes = doc.nodes.len(), "opening document");
        let previous = std::mem::replace(&mut self.doc, doc);
        self.geometry.clear();
        self.renderer.clear_cache();
        self.controller.reset();
        self.world = WorldTransforms::resolve(&self.doc);
        previous
    }

    /// Resolve world transforms and draw the scene plus overlay.
    pub fn frame(&mut self, backend: &mut B) {
        self.world = WorldTransforms::resolve(&self.doc);
        let overlay = Overlay {
            selected: self.controller.selection().and_then(|id| self.doc.node(id)),
            control_points: self.controller.displayed_points(),
        };
        self.renderer.render(backend, &self.doc, &overlay);
    }

    pub fn pointer_down(&mut self, point: [f32; 2]) {
        let scene = SceneMut {
            doc: &mut self.doc,
            world: &mut self.world,
            geometry: &mut self.geometry,
        };
        self.controller.pointer_down(scene, point);
    }

    /// Returns whether the document changed.
    pub fn pointer_move(&mut self, point: [f32; 2]) -> bool {
        let scene = SceneMut {
            doc: &mut self.doc,
            world: &mut self.world,
            geometry: &mut self.geometry,
        };
        self.controller.pointer_move(scene, point)
    }

    pub fn pointer_up(&mut self) {
        self.controller.pointer_up();
    }

    pub fn toggle_mode(&mut self) -> EditorMode {
        let scene = SceneMut {
            doc: &mut self.doc,
            world: &mut self.world,
            geometry: &mut self.geometry,
        };
        self.controller.toggle_mode(scene)
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn world(&self) -> &WorldTransforms {
        &self.world
    }

    pub fn selection(&self) -> Option<&NodeId> {
        self.controller.selection()
    }

    pub fn mode(&self) -> EditorMode {
        self.controller.mode()
    }

    pub fn pointer_state(&self) -> &PointerState {
        self.controller.state()
    }

    pub fn control_points(&self) -> &[DisplayedPoint] {
        self.controller.displayed_points()
    }

    pub fn renderer(&self) -> &Renderer<B> {
        &self.renderer
    }

    pub fn geometry(&self) -> &GeometryCache {
        &self.geometry
    }
}
