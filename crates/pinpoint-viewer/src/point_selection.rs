//! Point selection mode
//!
//! Hover a vertex of a target mesh to preview it, press the primary button to
//! select it, hold the multi-select modifier to toggle vertices in and out of
//! the selection. Selected vertices are returned in the order they were
//! picked.

use crate::binding::ViewportBinding;
use crate::config::PointSelectionConfig;
use crate::event::{PointerButton, SurfaceEvent};
use crate::host::{FnTargets, NoTargets, SceneSurface, TargetNodeProvider};
use crate::hover::{HoverCandidate, HoverTracker};
use crate::identity::VertexIdentity;
use crate::mode::InteractionMode;
use crate::picking::VertexLocator;
use crate::selection::SelectionSet;
use glam::Vec3;
use pinpoint_core::{ModeId, Result};
use pinpoint_scene::{NodeRef, SceneNode};

pub struct PointSelectionMode {
    mode_id: ModeId,
    config: PointSelectionConfig,
    locator: VertexLocator,
    overlay: NodeRef,
    hover: HoverTracker,
    selection: SelectionSet,
    binding: ViewportBinding,
    targets: Box<dyn TargetNodeProvider>,
}

impl std::fmt::Debug for PointSelectionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PointSelectionMode")
            .field("mode_id", &self.mode_id)
            .field("hover", &self.hover.current())
            .field("selected", &self.selection.len())
            .field("binding", &self.binding)
            .finish()
    }
}

impl PointSelectionMode {
    /// Build the mode and its overlay: a hover marker and a selection marker.
    pub fn new(config: PointSelectionConfig) -> Result<Self> {
        config.validate()?;

        let hover_marker = SceneNode::point_set(
            "hover marker",
            config.hover_marker.point_size,
            config.hover_marker.color,
        );
        let selection_marker = SceneNode::point_set(
            "selection marker",
            config.selection_marker.point_size,
            config.selection_marker.color,
        );
        let overlay = SceneNode::overlay("point selection");
        overlay.add_child(hover_marker.clone())?;
        overlay.add_child(selection_marker.clone())?;

        Ok(Self {
            mode_id: ModeId::default(),
            locator: VertexLocator::new(config.pick_threshold),
            config,
            overlay,
            hover: HoverTracker::new(hover_marker),
            selection: SelectionSet::new(selection_marker),
            binding: ViewportBinding::new(),
            targets: Box::new(NoTargets),
        })
    }

    pub fn with_target_provider(mut self, provider: impl TargetNodeProvider + 'static) -> Self {
        self.set_target_provider(provider);
        self
    }

    /// Replace the provider consulted at the next activation
    pub fn set_target_provider(&mut self, provider: impl TargetNodeProvider + 'static) {
        self.targets = Box::new(provider);
    }

    pub fn set_target_nodes_fn(&mut self, f: impl Fn(&SurfaceEvent<'_>) -> Vec<NodeRef> + 'static) {
        self.set_target_provider(FnTargets::new(f));
    }

    /// Identifier the host uses to select this mode on a surface
    pub fn set_custom_mode_id(&mut self, id: ModeId) {
        self.mode_id = id;
    }

    pub fn custom_mode_id(&self) -> ModeId {
        self.mode_id
    }

    /// World positions of the selected vertices in selection order
    pub fn selected_points(&self) -> Vec<Vec3> {
        self.selection.points()
    }

    pub fn selected_vertices(&self) -> &[VertexIdentity] {
        self.selection.vertices()
    }

    pub fn hovered_vertex(&self) -> Option<&VertexIdentity> {
        self.hover.current()
    }

    /// Drop the whole selection, redrawing only if something was selected.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Node attached to each surface's system layer while active
    pub fn overlay(&self) -> &NodeRef {
        &self.overlay
    }

    pub fn binding(&self) -> &ViewportBinding {
        &self.binding
    }

    fn wants_activation(&self, surface: &dyn SceneSurface) -> bool {
        surface.active_custom_mode() == self.mode_id && surface.is_edit_mode()
    }
}

impl InteractionMode for PointSelectionMode {
    fn name(&self) -> &str {
        "point selection"
    }

    fn on_scene_mode_changed(&mut self, event: &SurfaceEvent<'_>) {
        let surface = event.surface();
        let group = self.config.decoration_group;
        if self.wants_activation(surface) {
            self.binding.activate(event, &self.overlay, self.targets.as_ref(), group);
        } else {
            self.binding.deactivate(surface, &self.overlay, group);
        }
    }

    fn on_pointer_move(&mut self, event: &SurfaceEvent<'_>) -> bool {
        let surface = event.surface();
        if !surface.is_edit_mode() {
            return false;
        }

        let path = event.node_path();
        match self.binding.resolve(surface.surface_id(), path) {
            Some(target) => {
                let vertices = target.mesh.vertices();
                let candidate = HoverCandidate {
                    path,
                    vertices: &vertices,
                    world_transform: target.world_transform,
                };
                self.hover.on_pointer_move(&self.locator, Some(candidate), event.point());
            }
            None => {
                self.hover.on_pointer_move(&self.locator, None, event.point());
            }
        }
        true
    }

    fn on_pointer_leave(&mut self, _event: &SurfaceEvent<'_>) {
        self.hover.on_pointer_leave();
    }

    fn on_button_press(&mut self, event: &SurfaceEvent<'_>) -> bool {
        if event.button() != Some(PointerButton::Primary) {
            return false;
        }
        let multi_select = event
            .modifiers()
            .contains(self.config.multi_select_modifier.flag());
        self.selection.on_primary_press(self.hover.current(), multi_select);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{ModifierKey, Modifiers};
    use crate::headless::HeadlessSurface;
    use glam::{DAffine3, DVec3};
    use pinpoint_scene::{Mesh, NodePath};
    use std::cell::Cell;
    use std::rc::Rc;

    const MODE: ModeId = ModeId(7);

    struct Scene {
        root: NodeRef,
        placement: NodeRef,
        shape: NodeRef,
    }

    impl Scene {
        /// Triangle at (0,0,0), (1,0,0), (0,1,0), lifted by `offset`
        fn new(offset: DVec3) -> Self {
            let root = SceneNode::group("root");
            let placement = SceneNode::transform("placement", DAffine3::from_translation(offset));
            let mesh = Rc::new(Mesh::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y]));
            let shape = SceneNode::shape("triangle", Some(mesh));
            placement.add_child(shape.clone()).unwrap();
            root.add_child(placement.clone()).unwrap();
            Self { root, placement, shape }
        }

        fn path(&self) -> NodePath {
            NodePath::new(vec![self.root.clone(), self.placement.clone(), self.shape.clone()])
        }
    }

    fn active_mode(surface: &HeadlessSurface, scene: &Scene) -> PointSelectionMode {
        let target = scene.shape.clone();
        let mut mode = PointSelectionMode::new(PointSelectionConfig::default())
            .unwrap()
            .with_target_provider(FnTargets::new(move |_| vec![target.clone()]));
        mode.set_custom_mode_id(MODE);
        surface.set_active_custom_mode(MODE);
        mode.on_scene_mode_changed(&SurfaceEvent::new(surface));
        mode
    }

    fn hover(
        mode: &mut PointSelectionMode,
        surface: &HeadlessSurface,
        scene: &Scene,
        point: DVec3,
    ) -> bool {
        mode.on_pointer_move(&SurfaceEvent::pointer_move(surface, scene.path(), point))
    }

    fn press(
        mode: &mut PointSelectionMode,
        surface: &HeadlessSurface,
        modifiers: Modifiers,
    ) -> bool {
        let event = SurfaceEvent::button_press(surface, PointerButton::Primary, modifiers);
        mode.on_button_press(&event)
    }

    #[test]
    fn test_activation_attaches_overlay_and_highlights_targets() {
        let surface = HeadlessSurface::new();
        let scene = Scene::new(DVec3::ZERO);
        let mode = active_mode(&surface, &scene);

        assert!(surface.system_node_group().contains_child(mode.overlay()));
        assert_eq!(mode.overlay().num_children(), 2);
        assert_eq!(surface.headless_renderer().decorated_nodes(1), vec![scene.shape.id()]);
        assert!(mode.binding().is_active_on(surface.surface_id()));
    }

    #[test]
    fn test_other_mode_or_view_mode_deactivates() {
        let surface = HeadlessSurface::new();
        let scene = Scene::new(DVec3::ZERO);
        let mut mode = active_mode(&surface, &scene);

        surface.set_active_custom_mode(ModeId(8));
        mode.on_scene_mode_changed(&SurfaceEvent::new(&surface));
        assert!(!surface.system_node_group().contains_child(mode.overlay()));
        assert!(surface.headless_renderer().decorated_nodes(1).is_empty());

        surface.set_active_custom_mode(MODE);
        surface.set_edit_mode(false);
        mode.on_scene_mode_changed(&SurfaceEvent::new(&surface));
        assert!(!mode.binding().is_active_on(surface.surface_id()));
    }

    #[test]
    fn test_reactivation_queries_provider_again() {
        let surface = HeadlessSurface::new();
        let calls = Rc::new(Cell::new(0));
        let c = calls.clone();
        let mut mode = PointSelectionMode::new(PointSelectionConfig::default()).unwrap();
        mode.set_target_nodes_fn(move |_| {
            c.set(c.get() + 1);
            Vec::new()
        });
        surface.set_active_custom_mode(mode.custom_mode_id());

        mode.on_scene_mode_changed(&SurfaceEvent::new(&surface));
        surface.set_edit_mode(false);
        mode.on_scene_mode_changed(&SurfaceEvent::new(&surface));
        surface.set_edit_mode(true);
        mode.on_scene_mode_changed(&SurfaceEvent::new(&surface));
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_pointer_move_consumption() {
        let surface = HeadlessSurface::new();
        let scene = Scene::new(DVec3::ZERO);
        let mut mode = active_mode(&surface, &scene);

        assert!(hover(&mut mode, &surface, &scene, DVec3::new(5.0, 5.0, 0.0)));
        assert!(mode.hovered_vertex().is_none());

        surface.set_edit_mode(false);
        assert!(!hover(&mut mode, &surface, &scene, DVec3::X));
        assert!(mode.hovered_vertex().is_none());
    }

    #[test]
    fn test_hover_uses_world_transform() {
        let surface = HeadlessSurface::new();
        let scene = Scene::new(DVec3::new(0.0, 0.0, 2.0));
        let mut mode = active_mode(&surface, &scene);

        hover(&mut mode, &surface, &scene, DVec3::new(1.0, 0.0, 2.005));
        let hovered = mode.hovered_vertex().unwrap();
        assert_eq!(hovered.vertex_index(), 1);
        assert_eq!(hovered.position(), Vec3::new(1.0, 0.0, 2.0));
    }

    #[test]
    fn test_non_target_is_not_hoverable() {
        let surface = HeadlessSurface::new();
        let scene = Scene::new(DVec3::ZERO);
        let other = Scene::new(DVec3::ZERO);
        let mut mode = active_mode(&surface, &scene);

        hover(&mut mode, &surface, &other, DVec3::X);
        assert!(mode.hovered_vertex().is_none());
        assert!(press(&mut mode, &surface, Modifiers::empty()));
        assert!(mode.selected_points().is_empty());
    }

    #[test]
    fn test_select_toggle_scenario() {
        let surface = HeadlessSurface::new();
        let scene = Scene::new(DVec3::ZERO);
        let mut mode = active_mode(&surface, &scene);

        hover(&mut mode, &surface, &scene, DVec3::new(0.001, 0.0, 0.0));
        press(&mut mode, &surface, Modifiers::empty());
        assert_eq!(mode.selected_points(), vec![Vec3::ZERO]);

        hover(&mut mode, &surface, &scene, DVec3::new(0.0, 1.0, 0.002));
        press(&mut mode, &surface, Modifiers::CTRL);
        assert_eq!(mode.selected_points(), vec![Vec3::ZERO, Vec3::Y]);

        hover(&mut mode, &surface, &scene, DVec3::ZERO);
        press(&mut mode, &surface, Modifiers::CTRL);
        assert_eq!(mode.selected_points(), vec![Vec3::Y]);
        assert_eq!(mode.selected_vertices()[0].vertex_index(), 2);
    }

    #[test]
    fn test_empty_press_does_not_redraw() {
        let surface = HeadlessSurface::new();
        let scene = Scene::new(DVec3::ZERO);
        let mut mode = active_mode(&surface, &scene);
        let before = surface.redraw_count();

        assert!(press(&mut mode, &surface, Modifiers::empty()));
        assert_eq!(surface.redraw_count(), before);
    }

    #[test]
    fn test_only_primary_button_is_handled() {
        let surface = HeadlessSurface::new();
        let scene = Scene::new(DVec3::ZERO);
        let mut mode = active_mode(&surface, &scene);
        hover(&mut mode, &surface, &scene, DVec3::ZERO);

        let event =
            SurfaceEvent::button_press(&surface, PointerButton::Secondary, Modifiers::empty());
        assert!(!mode.on_button_press(&event));
        assert!(mode.selected_points().is_empty());
    }

    #[test]
    fn test_configured_modifier() {
        let surface = HeadlessSurface::new();
        let scene = Scene::new(DVec3::ZERO);
        let target = scene.shape.clone();
        let config = PointSelectionConfig {
            multi_select_modifier: ModifierKey::Shift,
            ..Default::default()
        };
        let mut mode = PointSelectionMode::new(config)
            .unwrap()
            .with_target_provider(FnTargets::new(move |_| vec![target.clone()]));
        mode.on_scene_mode_changed(&SurfaceEvent::new(&surface));

        hover(&mut mode, &surface, &scene, DVec3::ZERO);
        press(&mut mode, &surface, Modifiers::empty());
        hover(&mut mode, &surface, &scene, DVec3::X);
        press(&mut mode, &surface, Modifiers::CTRL);
        assert_eq!(mode.selected_points(), vec![Vec3::X], "ctrl is a plain press here");

        hover(&mut mode, &surface, &scene, DVec3::Y);
        press(&mut mode, &surface, Modifiers::SHIFT);
        assert_eq!(mode.selected_points(), vec![Vec3::X, Vec3::Y]);
    }

    #[test]
    fn test_leave_keeps_selection() {
        let surface = HeadlessSurface::new();
        let scene = Scene::new(DVec3::ZERO);
        let mut mode = active_mode(&surface, &scene);
        hover(&mut mode, &surface, &scene, DVec3::ZERO);
        press(&mut mode, &surface, Modifiers::empty());

        mode.on_pointer_leave(&SurfaceEvent::new(&surface));
        assert_eq!(mode.selected_points(), vec![Vec3::ZERO]);

        mode.clear_selection();
        assert!(mode.selected_points().is_empty());
    }

    #[test]
    fn test_surface_teardown_drops_binding() {
        let scene = Scene::new(DVec3::ZERO);
        let surface = HeadlessSurface::new();
        let mode = active_mode(&surface, &scene);
        assert_eq!(mode.binding().surface_count(), 1);

        drop(surface);
        assert_eq!(mode.binding().surface_count(), 0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = PointSelectionConfig {
            pick_threshold: 0.0,
            ..Default::default()
        };
        assert!(PointSelectionMode::new(config).is_err());
    }
}
