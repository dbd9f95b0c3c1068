use std::path::PathBuf;

use crate::gfx::GfxError;

use super::drawable::TypeKey;

/// Failures raised while building or drawing scene content.
///
/// None of these are retried. The host treats any of them as fatal for the
/// scene; they are values rather than aborts so tests can observe them.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error(transparent)]
    Gfx(#[from] GfxError),

    #[error("file not found: `{}`", .0.display())]
    FileNotFound(PathBuf),

    #[error("failed to read `{}`", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode image `{}`", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to import `{}`: {message}", path.display())]
    Import { path: PathBuf, message: String },

    #[error("`{}` contains no meshes", .0.display())]
    EmptyScene(PathBuf),

    #[error("face {face} of mesh `{mesh}` has {arity} indices; only triangles are supported")]
    NonTriangulatedFace {
        mesh: String,
        face: usize,
        arity: usize,
    },

    #[error("mesh `{mesh}` has {count} vertices, more than 16-bit indices can address")]
    TooManyVertices { mesh: String, count: usize },

    #[error("mesh `{0}` carries no normals")]
    MissingNormals(String),

    #[error("draw issued before an index buffer was set")]
    MissingIndexBuffer,

    #[error("index buffer set twice on one binding list")]
    IndexBufferAlreadySet,

    #[error("index buffers must be attached with `set_index_buffer`")]
    IndexBufferAsBindable,

    #[error("shared slot for {0} is already populated")]
    SharedSlotAlreadySet(TypeKey),

    #[error("no shared slot registered for {0}")]
    MissingSharedSlot(TypeKey),
}
