//! 3D scene rendering on top of the [`Device`](crate::gfx::Device) boundary.
//!
//! - [`bindable`]: one slice of pipeline state each, with a uniform `apply`.
//! - [`drawable`]: objects owning an ordered binding list plus a reference to
//!   the shared list of their kind.
//! - [`shapes`]: recipes that build those lists for each kind.
//! - [`Graphics`]: the context holding device, caches and registries.
//! - [`Scene`]: the per-frame loop.

pub mod bindable;
pub mod cache;
pub mod camera;
pub mod color;
pub mod context;
pub mod drawable;
pub mod error;
pub mod image;
pub mod import;
pub mod light;
pub mod scene;
pub mod shapes;

pub use cache::{CacheStats, ResourceCache};
pub use camera::{projection, SceneCamera};
pub use color::Rgba8;
pub use context::{Graphics, GraphicsConfig};
pub use drawable::{Bindings, Drawable, Instance, Motion, TypeKey};
pub use error::RenderError;
pub use image::Image;
pub use import::{ImportedMesh, ImportedScene, Importer, MeshCache, ObjImporter};
pub use light::{LightParams, PointLight};
pub use scene::{Scene, SceneSettings};
