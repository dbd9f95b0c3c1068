//! Opaque resource handles.
//!
//! Handles are generational arena indices: a handle outlives the resource it
//! names only as a stale value, never as a dangling reference. Backends report
//! stale handles as [`GfxError::InvalidHandle`](super::GfxError::InvalidHandle).

use generational_arena::Index;

macro_rules! handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
        pub struct $name(pub(crate) Index);

        impl From<$name> for ResourceId {
            fn from(id: $name) -> Self {
                ResourceId::$name(id)
            }
        }
    };
}

handle!(
    /// Vertex, index or constant buffer.
    BufferId
);
handle!(
    /// Compiled shader module bound to one stage.
    ShaderId
);
handle!(
    /// Vertex input layout.
    LayoutId
);
handle!(
    /// Sampled 2D texture.
    TextureId
);
handle!(
    /// Sampler state.
    SamplerId
);

/// Any resource handle, used for release and error reporting.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ResourceId {
    BufferId(BufferId),
    ShaderId(ShaderId),
    LayoutId(LayoutId),
    TextureId(TextureId),
    SamplerId(SamplerId),
}

impl ResourceId {
    pub(crate) fn index(self) -> Index {
        match self {
            ResourceId::BufferId(BufferId(i))
            | ResourceId::ShaderId(ShaderId(i))
            | ResourceId::LayoutId(LayoutId(i))
            | ResourceId::TextureId(TextureId(i))
            | ResourceId::SamplerId(SamplerId(i)) => i,
        }
    }
}
