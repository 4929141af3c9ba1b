use std::collections::{HashMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::schema::{FontRef, NodeId, SceneNode};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Assets {
    /// Base64 image payloads keyed by content hash.
    #[serde(default)]
    pub images: HashMap<String, String>,
    #[serde(default)]
    pub fonts: Vec<FontRef>,
}

/// A loaded scene: a root id and a flat id → node map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default = "default_version")]
    pub version: u32,
    pub root_id: NodeId,
    #[serde(default)]
    pub nodes: HashMap<NodeId, SceneNode>,
    #[serde(default)]
    pub assets: Assets,
}

fn default_version() -> u32 {
    1
}

/// Structural problems found in a loaded document. None of them stop
/// loading; traversal skips what they point at.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentIssue {
    #[error("root node `{root}` is not in the node map")]
    MissingRoot { root: NodeId },
    #[error("node `{parent}` references missing child `{child}`")]
    DanglingChild { parent: NodeId, child: NodeId },
    #[error("node `{node}` is its own ancestor")]
    Cycle { node: NodeId },
    #[error("node `{node}` has {paths} paths but {rules} winding rules")]
    WindingRuleMismatch { node: NodeId, paths: usize, rules: usize },
}

impl Document {
    /// Parse a document from JSON text. Structural issues are logged, not returned.
    pub fn from_json_str(source: &str) -> Result<Self> {
        let document: Document =
            serde_json::from_str(source).context("failed to parse scene document JSON")?;
        for issue in document.validate() {
            warn!(%issue, "scene document issue");
        }
        debug!(
            root = %document.root_id,
            nodes = document.nodes.len(),
            "scene document loaded"
        );
        Ok(document)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_json_str(&source)
            .with_context(|| format!("failed to load scene document {}", path.display()))
    }

    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to serialize scene document")
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = self.to_json_string()?;
        std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
    }

    pub fn root(&self) -> Option<&SceneNode> {
        self.nodes.get(&self.root_id)
    }

    pub fn node(&self, id: &str) -> Option<&SceneNode> {
        self.nodes.get(id)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id)
    }

    /// Collect structural issues: a missing root, dangling child ids,
    /// child links back to an ancestor, and path/winding-rule count mismatches.
    pub fn validate(&self) -> Vec<DocumentIssue> {
        let mut issues = Vec::new();
        if !self.nodes.contains_key(&self.root_id) {
            issues.push(DocumentIssue::MissingRoot { root: self.root_id.clone() });
        }

        let mut ids: Vec<&NodeId> = self.nodes.keys().collect();
        ids.sort();
        for id in &ids {
            let Some(node) = self.nodes.get(*id) else { continue };
            for child in node.children() {
                if !self.nodes.contains_key(child) {
                    issues.push(DocumentIssue::DanglingChild {
                        parent: node.id.clone(),
                        child: child.clone(),
                    });
                }
            }
            if let Some(vector) = node.as_vector() {
                let paths = vector.geometry.svg_paths.paths.len();
                let rules = vector.geometry.svg_paths.winding_rules.len();
                if paths != rules {
                    issues.push(DocumentIssue::WindingRuleMismatch {
                        node: node.id.clone(),
                        paths,
                        rules,
                    });
                }
            }
        }

        // Back edges from the root, depth first.
        let mut on_path = HashSet::new();
        let mut done = HashSet::new();
        let mut reported = HashSet::new();
        if self.nodes.contains_key(&self.root_id) {
            self.find_cycles(&self.root_id, &mut on_path, &mut done, &mut reported, &mut issues);
        }
        issues
    }

    fn find_cycles<'a>(
        &'a self,
        id: &'a NodeId,
        on_path: &mut HashSet<&'a NodeId>,
        done: &mut HashSet<&'a NodeId>,
        reported: &mut HashSet<&'a NodeId>,
        issues: &mut Vec<DocumentIssue>,
    ) {
        let Some(node) = self.nodes.get(id) else { return };
        on_path.insert(id);
        for child in node.children() {
            if on_path.contains(child) {
                if reported.insert(child) {
                    issues.push(DocumentIssue::Cycle { node: child.clone() });
                }
                continue;
            }
            if !done.contains(child) {
                self.find_cycles(child, on_path, done, reported, issues);
            }
        }
        on_path.remove(id);
        done.insert(id);
    }
}
