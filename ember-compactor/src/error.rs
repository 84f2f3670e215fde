use std::fmt;

#[derive(Debug)]
pub enum EmberError {
    SceneLoad {
        path: String,
        detail: String,
    },
    MeshIndexOutOfRange {
        path: String,
        requested: usize,
        available: usize,
    },
    MissingTextureChannel {
        path: String,
        mesh_index: usize,
    },
    NonTriangularFace {
        path: String,
        face_index: usize,
        corners: usize,
    },
    VertexIndexOutOfRange {
        path: String,
        face_index: usize,
        vertex_index: u32,
        vertex_count: usize,
    },
    WriterFailure {
        path: String,
        detail: String,
    },
}

impl fmt::Display for EmberError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmberError::SceneLoad { path, detail } => {
                write!(f, "Failed to load model {}: {}", path, detail)
            }
            EmberError::MeshIndexOutOfRange {
                path,
                requested,
                available,
            } => {
                write!(
                    f,
                    "There is no mesh #{} in model ({} only), fname = {}",
                    requested, available, path
                )
            }
            EmberError::MissingTextureChannel { path, mesh_index } => {
                write!(
                    f,
                    "Mesh #{} has no texture coordinate channel, fname = {}",
                    mesh_index, path
                )
            }
            EmberError::NonTriangularFace {
                path,
                face_index,
                corners,
            } => {
                write!(
                    f,
                    "Face #{} has {} corner indices (3 expected), fname = {}",
                    face_index, corners, path
                )
            }
            EmberError::VertexIndexOutOfRange {
                path,
                face_index,
                vertex_index,
                vertex_count,
            } => {
                write!(
                    f,
                    "Face #{} references vertex {} ({} vertices only), fname = {}",
                    face_index, vertex_index, vertex_count, path
                )
            }
            EmberError::WriterFailure { path, detail } => {
                write!(f, "Failed to write model {}: {}", path, detail)
            }
        }
    }
}

impl std::error::Error for EmberError {}

pub type EmberResult<T> = Result<T, EmberError>;
