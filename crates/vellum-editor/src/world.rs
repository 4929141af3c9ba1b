use std::collections::HashMap;

use engine_core::Transform2D;
use tracing::debug;
use vellum_doc::{Document, NodeId};

/// Absolute transform of every node reachable from the root.
///
/// Recomputed from scratch after each transform edit and once per frame;
/// nodes outside the root's tree have no entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorldTransforms {
    map: HashMap<NodeId, Transform2D>,
}

impl WorldTransforms {
    pub fn resolve(doc: &Document) -> Self {
        let mut map = HashMap::new();
        let mut stack: Vec<(&NodeId, Transform2D)> = vec![(&doc.root_id, Transform2D::identity())];
        while let Some((id, parent)) = stack.pop() {
            if map.contains_key(id) {
                debug!(node = %id, "node reached twice; keeping first world transform");
                continue;
            }
            let Some(node) = doc.node(id) else {
                continue;
            };
            let world = parent.concat(node.relative_transform);
            map.insert(id.clone(), world);
            for child in node.children().iter().rev() {
                stack.push((child, world));
            }
        }
        Self { map }
    }

    pub fn get(&self, id: &str) -> Option<Transform2D> {
        self.map.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.map.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
