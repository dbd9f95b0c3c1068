//! Mesh import behind a swappable [`Importer`], plus a cache that parses
//! each file once.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use super::error::RenderError;

/// Flattened mesh streams as produced by an importer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportedMesh {
    pub name: String,
    pub positions: Vec<[f32; 3]>,
    /// Empty when the source carries no normals; otherwise parallel to `positions`.
    pub normals: Vec<[f32; 3]>,
    pub faces: Vec<Vec<u32>>,
}

impl ImportedMesh {
    /// Flatten the faces into a 16-bit triangle list.
    pub fn triangle_indices(&self) -> Result<Vec<u16>, RenderError> {
        if self.positions.len() > u16::MAX as usize + 1 {
            return Err(RenderError::TooManyVertices {
                mesh: self.name.clone(),
                count: self.positions.len(),
            });
        }
        let mut indices = Vec::with_capacity(self.faces.len() * 3);
        for (face, corners) in self.faces.iter().enumerate() {
            if corners.len() != 3 {
                return Err(RenderError::NonTriangulatedFace {
                    mesh: self.name.clone(),
                    face,
                    arity: corners.len(),
                });
            }
            for &i in corners {
                let index = u16::try_from(i).map_err(|_| RenderError::TooManyVertices {
                    mesh: self.name.clone(),
                    count: i as usize + 1,
                })?;
                indices.push(index);
            }
        }
        Ok(indices)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportedScene {
    pub meshes: Vec<ImportedMesh>,
}

impl ImportedScene {
    /// The mesh the shape recipes consume.
    pub fn first_mesh(&self, path: &Path) -> Result<&ImportedMesh, RenderError> {
        self.meshes
            .first()
            .ok_or_else(|| RenderError::EmptyScene(path.to_path_buf()))
    }
}

pub trait Importer {
    fn import(&mut self, path: &Path) -> Result<ImportedScene, RenderError>;
}

/// Wavefront OBJ through `tobj`, triangulated with a single index stream.
#[derive(Debug, Default, Copy, Clone)]
pub struct ObjImporter;

fn triples(flat: &[f32]) -> Vec<[f32; 3]> {
    flat.chunks_exact(3).map(|c| [c[0], c[1], c[2]]).collect()
}

impl Importer for ObjImporter {
    fn import(&mut self, path: &Path) -> Result<ImportedScene, RenderError> {
        let (models, _materials) =
            tobj::load_obj(path, &tobj::GPU_LOAD_OPTIONS).map_err(|e| RenderError::Import {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        let meshes = models
            .into_iter()
            .map(|model| {
                let mesh = model.mesh;
                let faces = if mesh.face_arities.is_empty() {
                    mesh.indices.chunks(3).map(<[u32]>::to_vec).collect()
                } else {
                    let mut rest = mesh.indices.as_slice();
                    mesh.face_arities
                        .iter()
                        .map(|&n| {
                            let (face, tail) = rest.split_at((n as usize).min(rest.len()));
                            rest = tail;
                            face.to_vec()
                        })
                        .collect()
                };
                ImportedMesh {
                    name: model.name,
                    positions: triples(&mesh.positions),
                    normals: triples(&mesh.normals),
                    faces,
                }
            })
            .collect();
        Ok(ImportedScene { meshes })
    }
}

/// Imported scenes keyed by a hash of the path string.
pub struct MeshCache {
    importer: Box<dyn Importer>,
    scenes: HashMap<u64, Rc<ImportedScene>>,
}

impl Default for MeshCache {
    fn default() -> Self {
        Self::new(Box::new(ObjImporter))
    }
}

fn path_hash(path: &Path) -> u64 {
    let mut hasher = DefaultHasher::new();
    path.to_string_lossy().hash(&mut hasher);
    hasher.finish()
}

impl MeshCache {
    pub fn new(importer: Box<dyn Importer>) -> Self {
        Self {
            importer,
            scenes: HashMap::new(),
        }
    }

    pub fn load(&mut self, path: &Path) -> Result<Rc<ImportedScene>, RenderError> {
        let key = path_hash(path);
        if let Some(scene) = self.scenes.get(&key) {
            return Ok(Rc::clone(scene));
        }
        if !path.exists() {
            return Err(RenderError::FileNotFound(PathBuf::from(path)));
        }
        let scene = Rc::new(self.importer.import(path)?);
        log::debug!(
            "imported `{}`: {} meshes",
            path.display(),
            scene.meshes.len()
        );
        self.scenes.insert(key, Rc::clone(&scene));
        Ok(scene)
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }
}
