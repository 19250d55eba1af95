use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a fresh, globally unique id
            pub fn new() -> Self {
                Self(generate_id())
            }

            pub fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "-{}"), self.0.simple())
            }
        }
    };
}

define_id!(
    /// Identifies a stroke. Hold frames share the ids of their keyframe's strokes.
    StrokeId,
    "stroke"
);
define_id!(
    /// Identifies a layer across every frame of the layer stack
    LayerId,
    "layer"
);
define_id!(
    /// Identifies a frame on the timeline
    FrameId,
    "frame"
);

// Single source for all element ids
pub fn generate_id() -> Uuid {
    Uuid::new_v4()
}
