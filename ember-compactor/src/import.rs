use crate::error::{EmberError, EmberResult};
use crate::extract::{ImportedMesh, ImportedScene};

/// Loads an OBJ scene into the neutral [`ImportedScene`] shape.
///
/// `single_index` gives one index per corner addressing position, normal
/// and UV together, and `triangulate` splits polygon faces upstream — the
/// extractor still verifies the 3-corner invariant afterwards.
pub fn load_scene(path: &str) -> EmberResult<ImportedScene> {
    let load_options = tobj::LoadOptions {
        single_index: true,
        triangulate: true,
        ..Default::default()
    };

    let (models, _materials) =
        tobj::load_obj(path, &load_options).map_err(|err| EmberError::SceneLoad {
            path: path.to_string(),
            detail: err.to_string(),
        })?;

    log::debug!("loaded {} model(s) from {}", models.len(), path);

    let meshes = models
        .into_iter()
        .map(|model| ImportedMesh {
            name: model.name,
            positions: model.mesh.positions,
            normals: model.mesh.normals,
            texcoords: model.mesh.texcoords,
            indices: model.mesh.indices,
            face_arities: model.mesh.face_arities,
        })
        .collect();

    Ok(ImportedScene {
        path: path.to_string(),
        meshes,
    })
}
