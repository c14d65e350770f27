//! Contracts between interaction modes and the hosting viewer

use crate::event::SurfaceEvent;
use pinpoint_core::{ModeId, Result, SurfaceId};
use pinpoint_scene::{NodeRef, Signal};

/// Key under which a set of node decorations is installed and later cleared
pub type DecorationGroupId = i32;

/// Builds the decorated stand-in for a node (for example a style wrapper
/// whose single child is the node)
pub type DecorationFactory = Box<dyn Fn(&NodeRef) -> Result<NodeRef>>;

/// Rendering side of a surface
pub trait SceneRenderer {
    /// Render `node` through the node produced by `decorate` until the group is cleared
    fn add_node_decoration(
        &self,
        node: &NodeRef,
        decorate: DecorationFactory,
        group: DecorationGroupId,
    );

    /// Drop every decoration installed under `group`
    fn clear_node_decorations(&self, group: DecorationGroupId);
}

/// One rendering surface (viewer widget) of the host
pub trait SceneSurface {
    fn surface_id(&self) -> SurfaceId;

    /// Whether the surface accepts interactive editing
    fn is_edit_mode(&self) -> bool;

    /// Custom interaction mode currently selected on the surface
    fn active_custom_mode(&self) -> ModeId;

    fn renderer(&self) -> &dyn SceneRenderer;

    /// Always-rendered layer for overlays owned by modes and tools
    fn system_node_group(&self) -> &NodeRef;

    /// Fired once when the surface is torn down
    fn sig_destroyed(&self) -> &Signal<SurfaceId>;
}

/// Declares which scene nodes are pickable while a mode is active.
///
/// Queried once per activation, so the answer may depend on application state
/// at that moment.
pub trait TargetNodeProvider {
    fn target_scene_nodes(&self, event: &SurfaceEvent<'_>) -> Vec<NodeRef>;
}

/// Adapts a closure into a [`TargetNodeProvider`]
pub struct FnTargets(Box<dyn Fn(&SurfaceEvent<'_>) -> Vec<NodeRef>>);

impl FnTargets {
    pub fn new(f: impl Fn(&SurfaceEvent<'_>) -> Vec<NodeRef> + 'static) -> Self {
        Self(Box::new(f))
    }
}

impl TargetNodeProvider for FnTargets {
    fn target_scene_nodes(&self, event: &SurfaceEvent<'_>) -> Vec<NodeRef> {
        (self.0)(event)
    }
}

/// Provider that exposes no targets
#[derive(Debug, Default, Clone, Copy)]
pub struct NoTargets;

impl TargetNodeProvider for NoTargets {
    fn target_scene_nodes(&self, _event: &SurfaceEvent<'_>) -> Vec<NodeRef> {
        Vec::new()
    }
}
