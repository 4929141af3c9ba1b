//! Content-addressed caches for derived drawing objects.
//!
//! Keys are built from the node id, the role of the object and a
//! serialization of whatever content the object is built from. Changed
//! content therefore lands under a new key; nothing is invalidated or
//! evicted while a document is open.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt::Debug;
use std::rc::Rc;

use engine_core::{DrawBackend, FillRule, Outline, PathCommand, parse_path};
use serde::Serialize;
use tracing::trace;

/// One key → value store with build counting.
pub struct PrimitiveStore<V> {
    label: &'static str,
    entries: HashMap<String, V>,
    builds: usize,
}

impl<V> PrimitiveStore<V> {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            entries: HashMap::new(),
            builds: 0,
        }
    }

    /// Existing entry for `key`, or the result of `build` stored under it.
    pub fn get<F>(&mut self, key: String, build: F) -> &V
    where
        F: FnOnce() -> V,
    {
        match self.entries.entry(key) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                trace!(store = self.label, key = %entry.key(), "cache miss");
                self.builds += 1;
                entry.insert(build())
            }
        }
    }

    /// Store a value built elsewhere.
    pub fn insert(&mut self, key: String, value: V) {
        self.entries.insert(key, value);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of times a builder ran.
    pub fn builds(&self) -> usize {
        self.builds
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Stable text form of `value` for use in a cache key.
pub fn fingerprint<T: Serialize + Debug>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| format!("{value:?}"))
}

/// Backend primitives: paths, paints, shaders and paragraph layouts.
pub struct RenderCache<B: DrawBackend> {
    pub paths: PrimitiveStore<B::Path>,
    pub paints: PrimitiveStore<B::Paint>,
    pub shaders: PrimitiveStore<B::Shader>,
    pub paragraphs: PrimitiveStore<B::Paragraph>,
}

impl<B: DrawBackend> Default for RenderCache<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: DrawBackend> RenderCache<B> {
    pub fn new() -> Self {
        Self {
            paths: PrimitiveStore::new("path"),
            paints: PrimitiveStore::new("paint"),
            shaders: PrimitiveStore::new("shader"),
            paragraphs: PrimitiveStore::new("paragraph"),
        }
    }

    pub fn clear(&mut self) {
        self.paths.clear();
        self.paints.clear();
        self.shaders.clear();
        self.paragraphs.clear();
    }

    pub fn len(&self) -> usize {
        self.paths.len() + self.paints.len() + self.shaders.len() + self.paragraphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Parsed commands and containment outlines, shared by the hit-tester and
/// the interaction controller.
pub struct GeometryCache {
    commands: PrimitiveStore<Rc<[PathCommand]>>,
    outlines: PrimitiveStore<Rc<Outline>>,
}

impl Default for GeometryCache {
    fn default() -> Self {
        Self {
            commands: PrimitiveStore::new("commands"),
            outlines: PrimitiveStore::new("outline"),
        }
    }
}

fn commands_key(node: &str, path_index: usize, data: &str) -> String {
    format!("{node}:{path_index}:{data}")
}

impl GeometryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parsed commands of path `path_index` of `node` whose text is `data`.
    pub fn commands(&mut self, node: &str, path_index: usize, data: &str) -> Rc<[PathCommand]> {
        self.commands
            .get(commands_key(node, path_index, data), || parse_path(data).into())
            .clone()
    }

    /// Record commands produced by an edit under the key of their serialized text.
    pub fn store_commands(
        &mut self,
        node: &str,
        path_index: usize,
        data: &str,
        commands: Vec<PathCommand>,
    ) {
        self.commands.insert(commands_key(node, path_index, data), commands.into());
    }

    pub fn outline(
        &mut self,
        node: &str,
        path_index: usize,
        data: &str,
        rule: FillRule,
    ) -> Rc<Outline> {
        let commands = self.commands(node, path_index, data);
        let key = format!("{node}:hit:{path_index}:{rule:?}:{data}");
        self.outlines
            .get(key, || Rc::new(Outline::from_commands(&commands, rule)))
            .clone()
    }

    pub fn command_builds(&self) -> usize {
        self.commands.builds()
    }

    pub fn outline_builds(&self) -> usize {
        self.outlines.builds()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
        self.outlines.clear();
    }
}
