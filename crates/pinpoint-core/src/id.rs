//! Stable identifiers for scene nodes, rendering surfaces and interaction modes

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Global counter for node identifiers
static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

/// Global counter for surface identifiers
static NEXT_SURFACE_ID: AtomicU64 = AtomicU64::new(1);

macro_rules! counted_id {
    ($(#[$meta:meta])* $name:ident, $counter:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            /// Allocate a fresh, process-unique identifier
            pub fn new() -> Self {
                Self($counter.fetch_add(1, Ordering::Relaxed))
            }

            /// Create an identifier from a raw value (for testing)
            pub fn from_raw(id: u64) -> Self {
                Self(id)
            }

            /// Get the raw u64 value
            pub fn raw(&self) -> u64 {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($label, "({})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

counted_id!(
    /// Identity of a scene node.
    ///
    /// Two node handles are the same node iff their ids match; this is what
    /// target-set lookups and path comparisons key on.
    NodeId,
    NEXT_NODE_ID,
    "NodeId"
);

counted_id!(
    /// Identity of a rendering surface (one viewer widget).
    SurfaceId,
    NEXT_SURFACE_ID,
    "SurfaceId"
);

/// Custom interaction-mode id assigned by the hosting viewer.
///
/// A viewer may host many custom modes; each mode answers only to the id
/// it has been given.
#[derive(Clone, Copy, Debug, Default, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModeId(pub i32);

impl fmt::Display for ModeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
