//! Vertex identity keyed on scene path

use glam::Vec3;
use pinpoint_scene::NodePath;
use std::rc::Rc;

/// One vertex occurrence: the path to the shape holding it plus the vertex index.
///
/// The path sits behind a shared handle so identities on the same mesh
/// placement can alias one path object. Equality accepts either the same
/// handle or structurally equal paths, together with a matching index. The
/// cached world position is display data only and takes no part in equality,
/// so a vertex keeps its identity when the mesh moves.
#[derive(Debug, Clone)]
pub struct VertexIdentity {
    path: Rc<NodePath>,
    vertex_index: usize,
    position: Vec3,
}

impl VertexIdentity {
    /// Returns `None` for an empty path, which cannot name a vertex.
    pub fn new(path: Rc<NodePath>, vertex_index: usize, position: Vec3) -> Option<Self> {
        if path.is_empty() {
            return None;
        }
        Some(Self {
            path,
            vertex_index,
            position,
        })
    }

    pub fn path(&self) -> &Rc<NodePath> {
        &self.path
    }

    pub fn vertex_index(&self) -> usize {
        self.vertex_index
    }

    /// World-space position captured when the vertex was last hovered
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Whether `other` refers to the same path, shared or not
    pub fn same_path(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.path, &other.path) || *self.path == *other.path
    }

    /// Copy of this identity that uses `path` as its path handle.
    ///
    /// Callers pass a handle whose path equals this one's.
    pub(crate) fn with_shared_path(&self, path: Rc<NodePath>) -> Self {
        debug_assert!(*path == *self.path);
        Self {
            path,
            vertex_index: self.vertex_index,
            position: self.position,
        }
    }
}

impl PartialEq for VertexIdentity {
    fn eq(&self, other: &Self) -> bool {
        self.same_path(other) && self.vertex_index == other.vertex_index
    }
}

impl Eq for VertexIdentity {}
