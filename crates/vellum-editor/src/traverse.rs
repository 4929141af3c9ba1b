//! Scene walks over the id tree.
//!
//! Every walk keeps a visited set: a node reached a second time (through a
//! cycle or a shared child id) is not descended into again.

use std::collections::HashSet;

use tracing::debug;
use vellum_doc::{Document, NodeId};

fn walk<'a>(doc: &'a Document, start: &'a NodeId, skip_hidden: bool) -> Vec<&'a NodeId> {
    let mut order = Vec::new();
    let mut visited: HashSet<&NodeId> = HashSet::new();
    let mut stack = vec![start];
    while let Some(id) = stack.pop() {
        if !visited.insert(id) {
            debug!(node = %id, "node already visited; skipping");
            continue;
        }
        let Some(node) = doc.node(id) else {
            continue;
        };
        if skip_hidden && !node.visible {
            continue;
        }
        order.push(id);
        // Reversed so children pop in declared order.
        stack.extend(node.children().iter().rev());
    }
    order
}

/// Reachable nodes from the root in pre-order, children in declared order.
/// Later entries draw on top of earlier ones.
pub fn pre_order(doc: &Document) -> Vec<&NodeId> {
    walk(doc, &doc.root_id, false)
}

/// Like [`pre_order`], but hidden nodes and their subtrees are left out.
pub fn visible_pre_order(doc: &Document) -> Vec<&NodeId> {
    walk(doc, &doc.root_id, true)
}

/// `id` followed by all of its descendants.
pub fn subtree<'a>(doc: &'a Document, id: &str) -> Vec<&'a NodeId> {
    match doc.nodes.get_key_value(id) {
        Some((key, _)) => walk(doc, key, false),
        None => Vec::new(),
    }
}
