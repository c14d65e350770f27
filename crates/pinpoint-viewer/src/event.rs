//! Events delivered by the hosting viewer

use crate::host::SceneSurface;
use bitflags::bitflags;
use glam::DVec3;
use pinpoint_scene::NodePath;
use serde::{Deserialize, Serialize};

/// Pointer button identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerButton {
    /// Primary (left) button
    #[default]
    Primary,
    /// Secondary (right) button
    Secondary,
    /// Middle button (wheel click)
    Middle,
}

bitflags! {
    /// Keyboard modifiers held while an event was produced
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const CTRL = 1 << 0;
        const SHIFT = 1 << 1;
        const ALT = 1 << 2;
        const META = 1 << 3;
    }
}

/// A single modifier key, as named in configuration files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModifierKey {
    #[default]
    Ctrl,
    Shift,
    Alt,
    Meta,
}

impl ModifierKey {
    pub fn flag(self) -> Modifiers {
        match self {
            ModifierKey::Ctrl => Modifiers::CTRL,
            ModifierKey::Shift => Modifiers::SHIFT,
            ModifierKey::Alt => Modifiers::ALT,
            ModifierKey::Meta => Modifiers::META,
        }
    }
}

/// Event on one rendering surface.
///
/// Which fields are meaningful depends on the notification: pointer moves
/// carry the node path under the cursor and the world-space hit point,
/// button presses carry the button and modifiers.
pub struct SurfaceEvent<'a> {
    surface: &'a dyn SceneSurface,
    node_path: NodePath,
    point: DVec3,
    button: Option<PointerButton>,
    modifiers: Modifiers,
}

impl<'a> SurfaceEvent<'a> {
    pub fn new(surface: &'a dyn SceneSurface) -> Self {
        Self {
            surface,
            node_path: NodePath::default(),
            point: DVec3::ZERO,
            button: None,
            modifiers: Modifiers::empty(),
        }
    }

    /// Pointer-move event over `node_path` at world position `point`
    pub fn pointer_move(surface: &'a dyn SceneSurface, node_path: NodePath, point: DVec3) -> Self {
        Self::new(surface).with_node_path(node_path).with_point(point)
    }

    /// Button-press event
    pub fn button_press(
        surface: &'a dyn SceneSurface,
        button: PointerButton,
        modifiers: Modifiers,
    ) -> Self {
        Self::new(surface).with_button(button).with_modifiers(modifiers)
    }

    pub fn with_node_path(mut self, node_path: NodePath) -> Self {
        self.node_path = node_path;
        self
    }

    pub fn with_point(mut self, point: DVec3) -> Self {
        self.point = point;
        self
    }

    pub fn with_button(mut self, button: PointerButton) -> Self {
        self.button = Some(button);
        self
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn surface(&self) -> &'a dyn SceneSurface {
        self.surface
    }

    /// Root-to-leaf path of the node under the pointer (empty when over background)
    pub fn node_path(&self) -> &NodePath {
        &self.node_path
    }

    /// World-space point under the pointer
    pub fn point(&self) -> DVec3 {
        self.point
    }

    pub fn button(&self) -> Option<PointerButton> {
        self.button
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }
}
