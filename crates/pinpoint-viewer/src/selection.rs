//! Ordered multi-vertex selection driven by primary-button presses

use crate::identity::VertexIdentity;
use glam::Vec3;
use pinpoint_scene::NodeRef;

/// What a press did to the selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionChange {
    /// Nothing changed and no redraw was requested
    Unchanged,
    /// Everything was deselected
    Cleared,
    /// The selection was replaced by the hovered vertex
    Replaced,
    /// The hovered vertex was appended
    Added,
    /// The hovered vertex was deselected
    Removed,
}

impl SelectionChange {
    pub fn is_changed(self) -> bool {
        self != SelectionChange::Unchanged
    }
}

/// Selected vertices in selection order, without duplicates.
///
/// Mirrors its contents into a point marker, one point per vertex.
#[derive(Debug)]
pub struct SelectionSet {
    vertices: Vec<VertexIdentity>,
    marker: NodeRef,
}

impl SelectionSet {
    /// `marker` must be a point-set node.
    pub fn new(marker: NodeRef) -> Self {
        debug_assert!(marker.as_point_set().is_some());
        Self {
            vertices: Vec::new(),
            marker,
        }
    }

    pub fn vertices(&self) -> &[VertexIdentity] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// World positions in selection order
    pub fn points(&self) -> Vec<Vec3> {
        self.vertices.iter().map(VertexIdentity::position).collect()
    }

    pub fn marker(&self) -> &NodeRef {
        &self.marker
    }

    /// Apply a primary-button press.
    ///
    /// | hovered | multi-select | effect |
    /// |---|---|---|
    /// | no  | no  | clear (if anything is selected) |
    /// | no  | yes | nothing |
    /// | yes | no  | select only the hovered vertex |
    /// | yes | yes | toggle the hovered vertex |
    pub fn on_primary_press(
        &mut self,
        hovered: Option<&VertexIdentity>,
        multi_select: bool,
    ) -> SelectionChange {
        let change = match (hovered, multi_select) {
            (None, false) => {
                if self.vertices.is_empty() {
                    SelectionChange::Unchanged
                } else {
                    self.vertices.clear();
                    SelectionChange::Cleared
                }
            }
            (None, true) => SelectionChange::Unchanged,
            (Some(vertex), false) => {
                self.vertices.clear();
                self.vertices.push(vertex.clone());
                SelectionChange::Replaced
            }
            (Some(vertex), true) => self.toggle(vertex),
        };

        if change.is_changed() {
            log::debug!("selection {:?}: {} vertices", change, self.vertices.len());
            self.update_marker();
        }
        change
    }

    /// Deselect everything. Returns whether anything was selected.
    pub fn clear(&mut self) -> bool {
        if self.vertices.is_empty() {
            return false;
        }
        self.vertices.clear();
        self.update_marker();
        true
    }

    fn toggle(&mut self, vertex: &VertexIdentity) -> SelectionChange {
        let mut shared_path = None;
        for (i, selected) in self.vertices.iter().enumerate() {
            if selected == vertex {
                self.vertices.remove(i);
                return SelectionChange::Removed;
            }
            if shared_path.is_none() && selected.same_path(vertex) {
                shared_path = Some(selected.path().clone());
            }
        }

        // Identities on one placement share a single path handle
        let added = match shared_path {
            Some(path) => vertex.with_shared_path(path),
            None => vertex.clone(),
        };
        self.vertices.push(added);
        SelectionChange::Added
    }

    fn update_marker(&self) {
        if let Some(plot) = self.marker.as_point_set() {
            let mut points = plot.vertices_mut();
            points.clear();
            points.extend(self.vertices.iter().map(VertexIdentity::position));
        }
        self.marker.notify_update();
    }
}
