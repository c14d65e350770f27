//! In-process surface and renderer without a window or GPU
//!
//! Decorations are built eagerly and kept per group so callers can inspect
//! what would be drawn. The surface counts redraw requests coming up from its
//! system layer.

use crate::host::{DecorationFactory, DecorationGroupId, SceneRenderer, SceneSurface};
use pinpoint_core::{ModeId, NodeId, SurfaceId};
use pinpoint_scene::{NodeRef, SceneNode, Signal, Subscription};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    decorations: RefCell<HashMap<DecorationGroupId, Vec<(NodeId, NodeRef)>>>,
}

impl HeadlessRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decorated nodes of `group` in installation order
    pub fn decorated_nodes(&self, group: DecorationGroupId) -> Vec<NodeId> {
        self.decorations
            .borrow()
            .get(&group)
            .map(|entries| entries.iter().map(|(id, _)| *id).collect())
            .unwrap_or_default()
    }

    /// The stand-in node built for `node` under `group`
    pub fn decoration(&self, group: DecorationGroupId, node: NodeId) -> Option<NodeRef> {
        self.decorations
            .borrow()
            .get(&group)?
            .iter()
            .find(|(id, _)| *id == node)
            .map(|(_, decoration)| decoration.clone())
    }
}

impl SceneRenderer for HeadlessRenderer {
    fn add_node_decoration(
        &self,
        node: &NodeRef,
        decorate: DecorationFactory,
        group: DecorationGroupId,
    ) {
        match decorate(node) {
            Ok(decoration) => {
                let mut decorations = self.decorations.borrow_mut();
                let entries = decorations.entry(group).or_default();
                entries.retain(|(id, _)| *id != node.id());
                entries.push((node.id(), decoration));
            }
            Err(e) => log::error!("decoration for {} failed: {}", node.name(), e),
        }
    }

    fn clear_node_decorations(&self, group: DecorationGroupId) {
        self.decorations.borrow_mut().remove(&group);
    }
}

/// Surface with settable mode state that announces its own teardown on drop
pub struct HeadlessSurface {
    id: SurfaceId,
    edit_mode: Cell<bool>,
    active_mode: Cell<ModeId>,
    renderer: HeadlessRenderer,
    system_group: NodeRef,
    sig_destroyed: Signal<SurfaceId>,
    redraws: Rc<Cell<usize>>,
    _redraw_hook: Subscription,
}

impl HeadlessSurface {
    /// A surface in edit mode with no custom mode selected
    pub fn new() -> Self {
        let system_group = SceneNode::group("system");
        let redraws = Rc::new(Cell::new(0));
        let counter = redraws.clone();
        let redraw_hook = system_group
            .sig_updated()
            .connect(move |_| counter.set(counter.get() + 1));
        Self {
            id: SurfaceId::new(),
            edit_mode: Cell::new(true),
            active_mode: Cell::new(ModeId::default()),
            renderer: HeadlessRenderer::new(),
            system_group,
            sig_destroyed: Signal::new(),
            redraws,
            _redraw_hook: redraw_hook,
        }
    }

    pub fn set_edit_mode(&self, edit_mode: bool) {
        self.edit_mode.set(edit_mode);
    }

    pub fn set_active_custom_mode(&self, mode: ModeId) {
        self.active_mode.set(mode);
    }

    pub fn headless_renderer(&self) -> &HeadlessRenderer {
        &self.renderer
    }

    /// Redraw requests seen so far: every update under the system layer
    pub fn redraw_count(&self) -> usize {
        self.redraws.get()
    }
}

impl Default for HeadlessSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneSurface for HeadlessSurface {
    fn surface_id(&self) -> SurfaceId {
        self.id
    }

    fn is_edit_mode(&self) -> bool {
        self.edit_mode.get()
    }

    fn active_custom_mode(&self) -> ModeId {
        self.active_mode.get()
    }

    fn renderer(&self) -> &dyn SceneRenderer {
        &self.renderer
    }

    fn system_node_group(&self) -> &NodeRef {
        &self.system_group
    }

    fn sig_destroyed(&self) -> &Signal<SurfaceId> {
        &self.sig_destroyed
    }
}

impl Drop for HeadlessSurface {
    fn drop(&mut self) {
        self.sig_destroyed.emit(&self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pinpoint_core::Color;

    #[test]
    fn test_redraw_counts_system_layer_updates() {
        let surface = HeadlessSurface::new();
        let plot = SceneNode::point_set("plot", 10.0, Color::RED);
        surface.system_node_group().add_child(plot.clone()).unwrap();
        assert_eq!(surface.redraw_count(), 1);

        plot.notify_update();
        assert_eq!(surface.redraw_count(), 2);

        surface.system_node_group().remove_child(&plot);
        plot.notify_update();
        assert_eq!(surface.redraw_count(), 3, "detached children no longer count");
    }

    #[test]
    fn test_renderer_groups() {
        let renderer = HeadlessRenderer::new();
        let node = SceneNode::group("n");
        renderer.add_node_decoration(&node, Box::new(|n: &NodeRef| Ok(n.clone())), 1);
        renderer.add_node_decoration(&node, Box::new(|n: &NodeRef| Ok(n.clone())), 1);
        renderer.add_node_decoration(&node, Box::new(|n: &NodeRef| Ok(n.clone())), 2);
        assert_eq!(renderer.decorated_nodes(1), vec![node.id()]);

        renderer.clear_node_decorations(1);
        assert!(renderer.decorated_nodes(1).is_empty());
        assert_eq!(renderer.decorated_nodes(2), vec![node.id()]);
    }

    #[test]
    fn test_failed_decoration_is_skipped() {
        let renderer = HeadlessRenderer::new();
        let node = SceneNode::group("n");
        // a shape cannot wrap the node
        let wrap_in_shape = |n: &NodeRef| -> pinpoint_core::Result<NodeRef> {
            let shape = SceneNode::shape("wrapper", None);
            shape.set_single_child(n.clone())?;
            Ok(shape)
        };
        renderer.add_node_decoration(&node, Box::new(wrap_in_shape), 1);
        assert!(renderer.decorated_nodes(1).is_empty());
    }

    #[test]
    fn test_drop_announces_destruction() {
        let seen = Rc::new(Cell::new(None));
        let surface = HeadlessSurface::new();
        let id = surface.surface_id();
        let s = seen.clone();
        let _sub = surface.sig_destroyed().connect(move |id: &SurfaceId| s.set(Some(*id)));
        drop(surface);
        assert_eq!(seen.get(), Some(id));
    }
}
