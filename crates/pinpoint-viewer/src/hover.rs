//! Hovered-vertex tracking and its one-point marker

use crate::identity::VertexIdentity;
use crate::picking::{world_position, VertexLocator};
use glam::{DAffine3, DVec3, Vec3};
use pinpoint_scene::{NodePath, NodeRef};
use std::rc::Rc;

/// Geometry under the pointer that is eligible for hovering
#[derive(Debug, Clone, Copy)]
pub struct HoverCandidate<'a> {
    pub path: &'a NodePath,
    pub vertices: &'a [Vec3],
    pub world_transform: DAffine3,
}

/// Tracks the vertex under the pointer and mirrors it into a point marker.
#[derive(Debug)]
pub struct HoverTracker {
    current: Option<VertexIdentity>,
    marker: NodeRef,
}

impl HoverTracker {
    /// `marker` must be a point-set node.
    pub fn new(marker: NodeRef) -> Self {
        debug_assert!(marker.as_point_set().is_some());
        Self {
            current: None,
            marker,
        }
    }

    pub fn current(&self) -> Option<&VertexIdentity> {
        self.current.as_ref()
    }

    pub fn is_hovering(&self) -> bool {
        self.current.is_some()
    }

    pub fn marker(&self) -> &NodeRef {
        &self.marker
    }

    /// Update from a pointer move. `None` means the pointer is not over an
    /// eligible shape. Returns whether a vertex is hovered afterwards.
    pub fn on_pointer_move(
        &mut self,
        locator: &VertexLocator,
        candidate: Option<HoverCandidate<'_>>,
        point: DVec3,
    ) -> bool {
        let Some(candidate) = candidate else {
            self.clear();
            return false;
        };

        let result = locator.locate(candidate.vertices, &candidate.world_transform, point);
        let Some(index) = result.accepted_index() else {
            log::trace!(
                "no vertex within {} of {:?} (nearest {:?} at {})",
                locator.threshold(),
                point,
                result.nearest,
                result.world_distance
            );
            self.clear();
            return false;
        };

        let position =
            world_position(&candidate.world_transform, candidate.vertices[index]).as_vec3();
        self.current = VertexIdentity::new(Rc::new(candidate.path.clone()), index, position);
        if self.current.is_none() {
            self.clear();
            return false;
        }
        log::trace!("hovering vertex {} of {:?}", index, candidate.path);

        if let Some(plot) = self.marker.as_point_set() {
            let mut vertices = plot.vertices_mut();
            vertices.clear();
            vertices.push(position);
        }
        self.marker.notify_update();
        true
    }

    /// Forget the hovered vertex and empty the marker
    pub fn clear(&mut self) {
        self.current = None;
        self.clear_marker();
    }

    /// Pointer left the surface: empties the marker only. The tracked
    /// identity is left for the next pointer move to resolve.
    pub fn on_pointer_leave(&mut self) {
        self.clear_marker();
    }

    fn clear_marker(&self) {
        let Some(plot) = self.marker.as_point_set() else {
            return;
        };
        if !plot.is_empty() {
            plot.vertices_mut().clear();
            self.marker.notify_update();
        }
    }
}
