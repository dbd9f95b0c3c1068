use super::handle::ResourceId;

/// Failures reported by a [`Device`](super::Device) implementation.
#[derive(Debug, thiserror::Error)]
pub enum GfxError {
    /// The handle was released, never existed, or names a different kind of resource.
    #[error("invalid or released resource handle: {0:?}")]
    InvalidHandle(ResourceId),

    #[error("shader `{label}` failed to compile:\n{message}")]
    ShaderCompile { label: String, message: String },

    #[error("shader `{label}` has no {stage} entry point named `{entry}`")]
    MissingEntryPoint {
        label: String,
        entry: String,
        stage: &'static str,
    },

    /// The vertex shader consumes an input location no layout element provides.
    #[error("input layout provides no element for vertex input location {location} of `{shader}`")]
    SignatureMismatch { shader: String, location: u32 },

    #[error("invalid input layout: {0}")]
    InvalidLayout(String),

    #[error("{kind} slot {slot} is not supported by this device")]
    UnsupportedSlot { kind: &'static str, slot: u32 },

    #[error("buffer {0:?} is not a {1} buffer")]
    WrongBufferKind(super::handle::BufferId, &'static str),

    #[error("texture of {width}x{height} cannot hold {len} bytes of RGBA8 pixels")]
    InvalidTexture { width: u32, height: u32, len: usize },

    #[error("cannot create an empty {0} buffer")]
    EmptyBuffer(&'static str),

    #[error("constant payload of {size} bytes exceeds the {max}-byte slot")]
    ConstantTooLarge { size: usize, max: usize },

    /// `draw_indexed` was issued before the named pipeline state was bound.
    #[error("draw issued without a bound {0}")]
    IncompleteState(&'static str),
}
