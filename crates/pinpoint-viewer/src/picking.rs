//! Nearest-vertex picking
//!
//! The candidate search runs in the mesh's local frame; acceptance is then
//! decided by the world-space distance between the candidate and the pick
//! point, so non-uniform scaling cannot make a far vertex look close.

use glam::{DAffine3, DVec3, Vec3};
use pinpoint_core::NodeId;
use pinpoint_scene::{calc_total_transform, Mesh, NodePath};
use std::collections::HashSet;
use std::rc::Rc;

/// World-space distance below which a nearest vertex counts as picked
pub const DEFAULT_PICK_THRESHOLD: f64 = 0.01;

/// Outcome of [`VertexLocator::locate`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocateResult {
    /// Index of the vertex nearest to the pick point in local space
    pub nearest: Option<usize>,
    /// World-space distance from that vertex to the pick point
    pub world_distance: f64,
    /// Whether `world_distance` is below the threshold
    pub accepted: bool,
}

impl LocateResult {
    const MISS: Self = Self {
        nearest: None,
        world_distance: f64::INFINITY,
        accepted: false,
    };

    /// The nearest index, only if accepted
    pub fn accepted_index(&self) -> Option<usize> {
        if self.accepted {
            self.nearest
        } else {
            None
        }
    }
}

/// Finds the mesh vertex nearest to a world-space point.
///
/// The threshold is a fixed world-space length and does not scale with
/// camera distance or zoom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexLocator {
    threshold: f64,
}

impl Default for VertexLocator {
    fn default() -> Self {
        Self::new(DEFAULT_PICK_THRESHOLD)
    }
}

impl VertexLocator {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Locate the vertex of `vertices` (object-local) nearest to `world_point`.
    ///
    /// Ties go to the lowest index. An empty buffer or a singular transform
    /// yields no candidate.
    pub fn locate(
        &self,
        vertices: &[Vec3],
        world_transform: &DAffine3,
        world_point: DVec3,
    ) -> LocateResult {
        let det = world_transform.matrix3.determinant();
        if det == 0.0 || !det.is_finite() {
            return LocateResult::MISS;
        }
        let local_point = world_transform.inverse().transform_point3(world_point).as_vec3();

        let mut nearest: Option<(usize, f32)> = None;
        for (i, v) in vertices.iter().enumerate() {
            let distance = v.distance(local_point);
            if nearest.map_or(distance.is_finite(), |(_, best)| distance < best) {
                nearest = Some((i, distance));
            }
        }

        let Some((index, _)) = nearest else {
            return LocateResult::MISS;
        };

        let world_distance = world_position(world_transform, vertices[index]).distance(world_point);
        LocateResult {
            nearest: Some(index),
            world_distance,
            accepted: world_distance < self.threshold,
        }
    }
}

/// Transform an object-local vertex into world space
pub fn world_position(world_transform: &DAffine3, vertex: Vec3) -> DVec3 {
    world_transform.transform_point3(vertex.as_dvec3())
}

/// Geometry resolved for a pick attempt on a path's leaf
#[derive(Debug, Clone)]
pub struct PickTarget {
    pub mesh: Rc<Mesh>,
    pub world_transform: DAffine3,
}

/// Decide whether `path` may be picked against `targets`.
///
/// Some node on the path (searched leaf to root) must be a target, and the
/// leaf must be a shape carrying a mesh. Targets that left the scene simply
/// never match.
pub fn resolve_pick_target(path: &NodePath, targets: &HashSet<NodeId>) -> Option<PickTarget> {
    if !path.iter().rev().any(|node| targets.contains(&node.id())) {
        return None;
    }
    let mesh = path.leaf()?.as_shape()?.mesh()?;
    Some(PickTarget {
        mesh,
        world_transform: calc_total_transform(path),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pinpoint_scene::SceneNode;

    fn line() -> Vec<Vec3> {
        vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
        ]
    }

    #[test]
    fn test_locate_accepts_close_vertex() {
        let point = DVec3::new(1.005, 0.0, 0.0);
        let result = VertexLocator::default().locate(&line(), &DAffine3::IDENTITY, point);
        assert_eq!(result.nearest, Some(1));
        assert!(result.accepted);
        assert!((result.world_distance - 0.005).abs() < 1e-6);
        assert_eq!(result.accepted_index(), Some(1));
    }

    #[test]
    fn test_locate_tie_prefers_lowest_index_and_rejects_far() {
        let point = DVec3::new(1.5, 0.0, 0.0);
        let result = VertexLocator::default().locate(&line(), &DAffine3::IDENTITY, point);
        assert_eq!(result.nearest, Some(1));
        assert!(!result.accepted);
        assert_eq!(result.accepted_index(), None);
    }

    #[test]
    fn test_locate_threshold_is_strict() {
        let vertices = [Vec3::ZERO];
        let locator = VertexLocator::new(0.5);
        let at = locator.locate(&vertices, &DAffine3::IDENTITY, DVec3::new(0.5, 0.0, 0.0));
        assert!(!at.accepted, "distance equal to threshold is rejected");
        let inside = locator.locate(&vertices, &DAffine3::IDENTITY, DVec3::new(0.25, 0.0, 0.0));
        assert!(inside.accepted);
    }

    #[test]
    fn test_locate_empty_buffer() {
        let result = VertexLocator::default().locate(&[], &DAffine3::IDENTITY, DVec3::ZERO);
        assert_eq!(result, LocateResult::MISS);
    }

    #[test]
    fn test_locate_singular_transform_misses() {
        let flatten = DAffine3::from_scale(DVec3::new(0.0, 1.0, 1.0));
        let result = VertexLocator::default().locate(&line(), &flatten, DVec3::ZERO);
        assert_eq!(result, LocateResult::MISS);
    }

    #[test]
    fn test_locate_rechecks_in_world_space() {
        // Shrunk mesh: local distance looks large, world distance is tiny
        let shrink = DAffine3::from_scale(DVec3::splat(0.001));
        let vertices = [Vec3::new(1.0, 0.0, 0.0)];
        let result =
            VertexLocator::default().locate(&vertices, &shrink, DVec3::new(0.0015, 0.0, 0.0));
        assert_eq!(result.nearest, Some(0));
        assert!(result.accepted);

        // Enlarged mesh: world distance exceeds threshold
        let grow = DAffine3::from_scale(DVec3::splat(100.0));
        let result = VertexLocator::default().locate(&vertices, &grow, DVec3::new(100.5, 0.0, 0.0));
        assert_eq!(result.nearest, Some(0));
        assert!(!result.accepted);
    }

    #[test]
    fn test_locate_with_translation() {
        let t = DAffine3::from_translation(DVec3::new(5.0, 0.0, 0.0));
        let result = VertexLocator::default().locate(&line(), &t, DVec3::new(7.0, 0.001, 0.0));
        assert_eq!(result.accepted_index(), Some(2));
        assert_eq!(world_position(&t, line()[2]), DVec3::new(7.0, 0.0, 0.0));
    }

    #[test]
    fn test_resolve_requires_target_on_path() {
        let root = SceneNode::group("root");
        let assembly = SceneNode::transform("assembly", DAffine3::from_translation(DVec3::Y));
        let shape = SceneNode::shape("shape", Some(Rc::new(Mesh::new(line()))));
        let path = NodePath::new(vec![root.clone(), assembly.clone(), shape.clone()]);

        assert!(resolve_pick_target(&path, &HashSet::new()).is_none());

        let targets: HashSet<NodeId> = [assembly.id()].into_iter().collect();
        let target = resolve_pick_target(&path, &targets).unwrap();
        assert_eq!(target.world_transform.translation, DVec3::Y);
        assert_eq!(target.mesh.vertices().len(), 3);
    }

    #[test]
    fn test_resolve_requires_shape_leaf_with_mesh() {
        let root = SceneNode::group("root");
        let bare = SceneNode::shape("bare", None);
        let targets: HashSet<NodeId> = [root.id()].into_iter().collect();

        let no_mesh = NodePath::new(vec![root.clone(), bare]);
        assert!(resolve_pick_target(&no_mesh, &targets).is_none());

        let group_leaf = NodePath::new(vec![root.clone()]);
        assert!(resolve_pick_target(&group_leaf, &targets).is_none());
    }
}
