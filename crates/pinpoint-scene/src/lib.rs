//! Pinpoint Scene - a small retained scene graph
//!
//! Just enough structure for interactive picking: shared nodes with
//! identity, paths from a root to a drawable leaf, accumulated transforms,
//! point-marker buffers and synchronous update notification.

mod node;
mod path;
mod signal;

pub use node::{
    Mesh, NodeRef, PointSet, PolygonElements, SceneNode, SceneUpdate, Shape, UpdateAction,
};
pub use path::{calc_total_transform, NodePath};
pub use signal::{Signal, Subscription};
