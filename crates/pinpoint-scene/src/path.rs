//! Node paths and accumulated transforms

use crate::node::NodeRef;
use glam::DAffine3;
use pinpoint_core::NodeId;
use std::fmt;
use std::rc::Rc;

/// Chain of nodes from a root down to a descendant.
///
/// Equality is node identity at each position, so two paths built from
/// distinct vectors compare equal when they walk the same nodes. This is what
/// separates two placements of one shared mesh.
#[derive(Clone, Default)]
pub struct NodePath {
    nodes: Vec<NodeRef>,
}

impl NodePath {
    pub fn new(nodes: Vec<NodeRef>) -> Self {
        Self { nodes }
    }

    pub fn push(&mut self, node: NodeRef) {
        self.nodes.push(node);
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes root-first
    pub fn nodes(&self) -> &[NodeRef] {
        &self.nodes
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &NodeRef> {
        self.nodes.iter()
    }

    /// The deepest node
    pub fn leaf(&self) -> Option<&NodeRef> {
        self.nodes.last()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.iter().any(|n| n.id() == id)
    }
}

impl PartialEq for NodePath {
    fn eq(&self, other: &Self) -> bool {
        self.nodes.len() == other.nodes.len()
            && self
                .nodes
                .iter()
                .zip(&other.nodes)
                .all(|(a, b)| Rc::ptr_eq(a, b))
    }
}

impl Eq for NodePath {}

impl fmt::Debug for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.nodes.iter().map(|n| n.name()).collect();
        write!(f, "NodePath({})", names.join("/"))
    }
}

impl FromIterator<NodeRef> for NodePath {
    fn from_iter<I: IntoIterator<Item = NodeRef>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Object-to-world transform of the path's leaf: product of every transform
/// node along the path, root first.
pub fn calc_total_transform(path: &NodePath) -> DAffine3 {
    path.iter()
        .filter_map(|node| node.local_transform())
        .fold(DAffine3::IDENTITY, |acc, local| acc * local)
}
