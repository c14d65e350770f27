//! Pinpoint Viewer - interactive vertex point selection
//!
//! A custom interaction mode for 3D viewers. While active on a surface it
//! highlights the target meshes, marks the vertex under the pointer and keeps
//! an ordered multi-selection driven by primary-button presses. The host
//! viewer is reached only through the traits in [`host`]; [`headless`]
//! implements them in-process.

mod binding;
pub mod config;
pub mod event;
pub mod headless;
pub mod host;
mod hover;
mod identity;
pub mod mode;
pub mod picking;
mod point_selection;
mod selection;

pub use binding::ViewportBinding;
pub use config::{MarkerStyle, PointSelectionConfig};
pub use event::{ModifierKey, Modifiers, PointerButton, SurfaceEvent};
pub use headless::{HeadlessRenderer, HeadlessSurface};
pub use host::{
    DecorationFactory, DecorationGroupId, FnTargets, NoTargets, SceneRenderer, SceneSurface,
    TargetNodeProvider,
};
pub use hover::{HoverCandidate, HoverTracker};
pub use identity::VertexIdentity;
pub use mode::InteractionMode;
pub use picking::{LocateResult, PickTarget, VertexLocator, DEFAULT_PICK_THRESHOLD};
pub use point_selection::PointSelectionMode;
pub use selection::{SelectionChange, SelectionSet};
