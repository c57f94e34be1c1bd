//! Raw key-value node tree as returned by the etcd v2 keys API.

use serde::{Deserialize, Serialize};

/// One node of the store's key-value tree.
///
/// Interior nodes carry `dir = true` and children in `nodes`; leaf nodes
/// carry a raw string value. Values are opaque here; interpreting them is the
/// snapshot parser's job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Node {
    /// Hierarchical key, e.g. `/v1/toggles/checkout/featureA`.
    pub key: String,
    /// Raw string value; absent on directory nodes.
    pub value: Option<String>,
    /// Whether this node is a directory.
    pub dir: bool,
    /// Child nodes of a directory.
    pub nodes: Vec<Node>,
    /// Store revision at which this node was last modified.
    pub modified_index: u64,
    /// Store revision at which this node was created.
    pub created_index: u64,
}

impl Node {
    /// Creates a leaf node holding a raw value.
    pub fn leaf(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: Some(value.into()),
            ..Self::default()
        }
    }

    /// Creates a directory node with the given children.
    pub fn dir(key: impl Into<String>, nodes: Vec<Node>) -> Self {
        Self {
            key: key.into(),
            dir: true,
            nodes,
            ..Self::default()
        }
    }

    /// Returns all leaf nodes in the tree, depth-first, children in store
    /// order.
    pub fn leaves(&self) -> Vec<&Node> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a Node>) {
        if self.dir {
            for child in &self.nodes {
                child.collect_leaves(out);
            }
        } else {
            out.push(self);
        }
    }
}

/// Top-level response envelope of the etcd v2 keys API.
#[derive(Debug, Clone, Deserialize)]
pub struct KeysResponse {
    /// The action the store performed, e.g. `get`.
    pub action: String,
    /// Root of the returned node tree.
    pub node: Node,
}
