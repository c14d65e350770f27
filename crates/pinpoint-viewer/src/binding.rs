//! Per-surface activation state of an interaction mode
//!
//! A mode can be active on several surfaces at once. For each surface it has
//! touched, the binding keeps one record: the pickable target nodes chosen at
//! activation and a hook that drops the record when the surface is destroyed.
//! Records live until surface teardown, so deactivating and re-activating
//! reuses the same record.

use crate::event::SurfaceEvent;
use crate::host::{DecorationGroupId, SceneSurface, TargetNodeProvider};
use crate::picking::{resolve_pick_target, PickTarget};
use pinpoint_core::{NodeId, SurfaceId};
use pinpoint_scene::{NodePath, NodeRef, PolygonElements, SceneNode, Subscription};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

struct SurfaceRecord {
    active: bool,
    targets: HashSet<NodeId>,
    _destroyed: Subscription,
}

type Records = Rc<RefCell<HashMap<SurfaceId, SurfaceRecord>>>;

#[derive(Default)]
pub struct ViewportBinding {
    records: Records,
}

impl std::fmt::Debug for ViewportBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewportBinding")
            .field("surfaces", &self.records.borrow().keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ViewportBinding {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `overlay` to the event's surface and highlight the targets
    /// `provider` reports. Targets from an earlier activation on the same
    /// surface are replaced.
    pub fn activate(
        &self,
        event: &SurfaceEvent<'_>,
        overlay: &NodeRef,
        provider: &dyn TargetNodeProvider,
        group: DecorationGroupId,
    ) {
        let surface = event.surface();
        let surface_id = surface.surface_id();
        self.ensure_record(surface);

        if let Err(e) = surface.system_node_group().add_child_once(overlay.clone()) {
            log::error!("cannot attach overlay to surface {}: {}", surface_id, e);
        }

        let renderer = surface.renderer();
        renderer.clear_node_decorations(group);

        let nodes = provider.target_scene_nodes(event);
        for node in &nodes {
            renderer.add_node_decoration(node, Box::new(highlight_decoration), group);
        }

        let targets: HashSet<NodeId> = nodes.iter().map(|n| n.id()).collect();
        log::debug!("activated on surface {} with {} targets", surface_id, targets.len());
        if let Some(record) = self.records.borrow_mut().get_mut(&surface_id) {
            record.active = true;
            record.targets = targets;
        }
    }

    /// Undo [`activate`](Self::activate) on `surface`. A surface the binding
    /// never saw is left alone.
    pub fn deactivate(
        &self,
        surface: &dyn SceneSurface,
        overlay: &NodeRef,
        group: DecorationGroupId,
    ) {
        let surface_id = surface.surface_id();
        if !self.records.borrow().contains_key(&surface_id) {
            return;
        }
        surface.system_node_group().remove_child(overlay);
        surface.renderer().clear_node_decorations(group);
        if let Some(record) = self.records.borrow_mut().get_mut(&surface_id) {
            record.active = false;
            record.targets.clear();
        }
        log::debug!("deactivated on surface {}", surface_id);
    }

    /// Geometry to pick against if `path` leads into one of the surface's targets
    pub fn resolve(&self, surface_id: SurfaceId, path: &NodePath) -> Option<PickTarget> {
        let records = self.records.borrow();
        resolve_pick_target(path, &records.get(&surface_id)?.targets)
    }

    /// Whether the surface has been activated and not deactivated since
    pub fn is_active_on(&self, surface_id: SurfaceId) -> bool {
        self.records
            .borrow()
            .get(&surface_id)
            .is_some_and(|r| r.active)
    }

    pub fn targets(&self, surface_id: SurfaceId) -> Vec<NodeId> {
        self.records
            .borrow()
            .get(&surface_id)
            .map(|r| r.targets.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Number of surfaces with a live record
    pub fn surface_count(&self) -> usize {
        self.records.borrow().len()
    }

    fn ensure_record(&self, surface: &dyn SceneSurface) {
        let surface_id = surface.surface_id();
        if self.records.borrow().contains_key(&surface_id) {
            return;
        }

        let weak = Rc::downgrade(&self.records);
        let destroyed = surface.sig_destroyed().connect(move |id: &SurfaceId| {
            if let Some(records) = weak.upgrade() {
                if records.borrow_mut().remove(id).is_some() {
                    log::debug!("surface {} destroyed, record dropped", id);
                }
            }
        });
        self.records.borrow_mut().insert(
            surface_id,
            SurfaceRecord {
                active: false,
                targets: HashSet::new(),
                _destroyed: destroyed,
            },
        );
    }
}

/// Draw faces, edges and vertices of the decorated node
fn highlight_decoration(node: &NodeRef) -> pinpoint_core::Result<NodeRef> {
    let style = SceneNode::polygon_draw_style(
        format!("{} highlight", node.name()),
        PolygonElements::FACE | PolygonElements::EDGE | PolygonElements::VERTEX,
    );
    style.set_single_child(node.clone())?;
    Ok(style)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessSurface;
    use crate::host::{FnTargets, NoTargets};
    use glam::Vec3;
    use pinpoint_scene::Mesh;

    fn shape() -> NodeRef {
        SceneNode::shape("tri", Some(Rc::new(Mesh::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y]))))
    }

    #[test]
    fn test_activate_installs_overlay_and_decorations() {
        let surface = HeadlessSurface::new();
        let overlay = SceneNode::overlay("overlay");
        let target = shape();
        let t = target.clone();
        let provider = FnTargets::new(move |_| vec![t.clone()]);
        let binding = ViewportBinding::new();

        binding.activate(&SurfaceEvent::new(&surface), &overlay, &provider, 1);
        binding.activate(&SurfaceEvent::new(&surface), &overlay, &provider, 1);

        assert_eq!(surface.system_node_group().num_children(), 1, "overlay attached once");
        assert_eq!(surface.headless_renderer().decorated_nodes(1), vec![target.id()]);
        let style = surface.headless_renderer().decoration(1, target.id()).unwrap();
        assert_eq!(
            style.polygon_elements(),
            Some(PolygonElements::FACE | PolygonElements::EDGE | PolygonElements::VERTEX)
        );
        assert!(style.contains_child(&target));
        assert_eq!(binding.targets(surface.surface_id()), vec![target.id()]);
        assert!(binding.is_active_on(surface.surface_id()));
    }

    #[test]
    fn test_deactivate_clears_surface() {
        let surface = HeadlessSurface::new();
        let overlay = SceneNode::overlay("overlay");
        let target = shape();
        let t = target.clone();
        let provider = FnTargets::new(move |_| vec![t.clone()]);
        let binding = ViewportBinding::new();

        binding.activate(&SurfaceEvent::new(&surface), &overlay, &provider, 1);
        binding.deactivate(&surface, &overlay, 1);

        assert_eq!(surface.system_node_group().num_children(), 0);
        assert!(surface.headless_renderer().decorated_nodes(1).is_empty());
        assert!(!binding.is_active_on(surface.surface_id()));
        assert_eq!(binding.surface_count(), 1, "record survives deactivation");

        let path = NodePath::new(vec![target]);
        assert!(binding.resolve(surface.surface_id(), &path).is_none());
    }

    #[test]
    fn test_active_without_targets() {
        let surface = HeadlessSurface::new();
        let overlay = SceneNode::overlay("overlay");
        let binding = ViewportBinding::new();

        binding.activate(&SurfaceEvent::new(&surface), &overlay, &NoTargets, 1);
        assert!(surface.system_node_group().contains_child(&overlay));
        assert!(binding.is_active_on(surface.surface_id()));
        assert!(binding.targets(surface.surface_id()).is_empty());

        binding.deactivate(&surface, &overlay, 1);
        assert!(!binding.is_active_on(surface.surface_id()));
    }

    #[test]
    fn test_deactivate_unknown_surface_is_noop() {
        let surface = HeadlessSurface::new();
        let overlay = SceneNode::overlay("overlay");
        surface.renderer().add_node_decoration(&shape(), Box::new(highlight_decoration), 1);

        ViewportBinding::new().deactivate(&surface, &overlay, 1);
        assert_eq!(surface.headless_renderer().decorated_nodes(1).len(), 1);
    }

    #[test]
    fn test_targets_are_per_surface() {
        let left = HeadlessSurface::new();
        let right = HeadlessSurface::new();
        let overlay = SceneNode::overlay("overlay");
        let a = shape();
        let b = shape();
        let (a2, b2) = (a.clone(), b.clone());
        let binding = ViewportBinding::new();

        let left_targets = FnTargets::new(move |_| vec![a2.clone()]);
        let right_targets = FnTargets::new(move |_| vec![b2.clone()]);
        binding.activate(&SurfaceEvent::new(&left), &overlay, &left_targets, 1);
        binding.activate(&SurfaceEvent::new(&right), &overlay, &right_targets, 1);

        assert!(binding.resolve(left.surface_id(), &NodePath::new(vec![a.clone()])).is_some());
        assert!(binding.resolve(left.surface_id(), &NodePath::new(vec![b.clone()])).is_none());
        assert!(binding.resolve(right.surface_id(), &NodePath::new(vec![b])).is_some());
        assert!(binding.resolve(right.surface_id(), &NodePath::new(vec![a])).is_none());
    }

    #[test]
    fn test_destroyed_surface_drops_record() {
        let binding = ViewportBinding::new();
        let overlay = SceneNode::overlay("overlay");
        let surface = HeadlessSurface::new();
        let id = surface.surface_id();

        binding.activate(&SurfaceEvent::new(&surface), &overlay, &NoTargets, 1);
        assert_eq!(binding.surface_count(), 1);

        drop(surface);
        assert_eq!(binding.surface_count(), 0);
        assert!(!binding.is_active_on(id));
    }
}
