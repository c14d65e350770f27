//! Pinpoint Core - Foundational types for the Pinpoint toolkit
//!
//! This crate provides the core types that all other Pinpoint crates depend on:
//! - `NodeId`, `SurfaceId`, `ModeId` - Stable identifiers
//! - `Transform`, `Color` - Spatial and display types
//! - Error types and Result alias

mod error;
mod id;
mod types;

pub use error::{PinpointError, Result};
pub use id::{ModeId, NodeId, SurfaceId};
pub use types::{Color, Transform};
