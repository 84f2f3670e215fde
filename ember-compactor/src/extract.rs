use glam::{Vec3, Vec4};

use crate::error::{EmberError, EmberResult};
use crate::{EmdVertex, FLOATS_PER_VERTEX};

const VERTICES_PER_FACE: usize = 3;

/// Mesh geometry as handed over by the import step: flat per-vertex
/// channels plus per-face corner counts. This is the shape tobj produces,
/// kept as plain data so malformed scenes can be built by hand.
#[derive(Debug, Clone, Default)]
pub struct ImportedMesh {
    pub name: String,
    pub positions: Vec<f32>,
    pub normals: Vec<f32>,
    /// UV 通道，为空表示该 mesh 没有贴图坐标
    pub texcoords: Vec<f32>,
    pub indices: Vec<u32>,
    /// 每个面的角数；为空表示三角化之后全部是三角形（tobj 的约定）
    pub face_arities: Vec<u32>,
}

#[derive(Debug, Clone, Default)]
pub struct ImportedScene {
    /// Source file, carried along for error context only.
    pub path: String,
    pub meshes: Vec<ImportedMesh>,
}

/// Flat face-major, corner-minor stream of vertex records. One record per
/// (face, corner), duplicates and all; welding happens later in `compact`.
#[derive(Debug, Clone, Default)]
pub struct TriangleSoup {
    pub vertices: Vec<EmdVertex>,
}

impl TriangleSoup {
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn face_count(&self) -> usize {
        self.vertices.len() / VERTICES_PER_FACE
    }

    /// Uncompacted size of the stream in bytes.
    pub fn raw_size_bytes(&self) -> usize {
        self.vertices.len() * FLOATS_PER_VERTEX * std::mem::size_of::<f32>()
    }

    /// 包围球 (cx, cy, cz, r)，写进 EMD 头，运行时做粗剔除用
    pub fn bounding_sphere(&self) -> Vec4 {
        if self.vertices.is_empty() {
            return Vec4::ZERO;
        }

        let mut min_p = Vec3::splat(f32::MAX);
        let mut max_p = Vec3::splat(f32::MIN);
        for v in &self.vertices {
            let p = Vec3::from_array(v.position);
            min_p = min_p.min(p);
            max_p = max_p.max(p);
        }

        let center = (min_p + max_p) * 0.5;
        let radius = (max_p - center).length();
        center.extend(radius)
    }
}

/// Flattens one mesh of the scene into a [`TriangleSoup`].
///
/// Records are emitted face by face, corner by corner, with no
/// deduplication: corners that share an imported vertex index stay separate
/// records, so downstream welding is driven purely by numeric closeness.
/// V 坐标翻转成 `1 - v`，把贴图原点挪到左上角（OBJ 导入路径的约定）。
pub fn extract_triangle_soup(
    scene: &ImportedScene,
    mesh_index: usize,
) -> EmberResult<TriangleSoup> {
    if mesh_index >= scene.meshes.len() {
        return Err(EmberError::MeshIndexOutOfRange {
            path: scene.path.clone(),
            requested: mesh_index,
            available: scene.meshes.len(),
        });
    }

    let mesh = &scene.meshes[mesh_index];
    if mesh.texcoords.is_empty() {
        return Err(EmberError::MissingTextureChannel {
            path: scene.path.clone(),
            mesh_index,
        });
    }

    // A vertex only exists if every present channel covers it; a shorter
    // normal or UV channel shrinks the addressable range.
    let mut vertex_count = mesh.positions.len() / 3;
    if !mesh.normals.is_empty() {
        vertex_count = vertex_count.min(mesh.normals.len() / 3);
    }
    vertex_count = vertex_count.min(mesh.texcoords.len() / 2);

    let uniform_triangles = mesh.face_arities.is_empty();

    let face_count = if uniform_triangles {
        mesh.indices.len() / VERTICES_PER_FACE
    } else {
        mesh.face_arities.len()
    };

    // A trailing partial face means the index buffer itself is broken.
    if uniform_triangles && mesh.indices.len() % VERTICES_PER_FACE != 0 {
        return Err(EmberError::NonTriangularFace {
            path: scene.path.clone(),
            face_index: face_count,
            corners: mesh.indices.len() % VERTICES_PER_FACE,
        });
    }

    let mut vertices = Vec::with_capacity(face_count * VERTICES_PER_FACE);
    let mut cursor = 0usize;

    for face_index in 0..face_count {
        let corners = if uniform_triangles {
            VERTICES_PER_FACE
        } else {
            mesh.face_arities[face_index] as usize
        };

        if corners != VERTICES_PER_FACE {
            return Err(EmberError::NonTriangularFace {
                path: scene.path.clone(),
                face_index,
                corners,
            });
        }
        if cursor + corners > mesh.indices.len() {
            return Err(EmberError::NonTriangularFace {
                path: scene.path.clone(),
                face_index,
                corners: mesh.indices.len() - cursor,
            });
        }

        for corner in 0..corners {
            let index = mesh.indices[cursor + corner];
            let i = index as usize;
            if i >= vertex_count {
                return Err(EmberError::VertexIndexOutOfRange {
                    path: scene.path.clone(),
                    face_index,
                    vertex_index: index,
                    vertex_count,
                });
            }

            vertices.push(EmdVertex {
                position: [
                    mesh.positions[i * 3],
                    mesh.positions[i * 3 + 1],
                    mesh.positions[i * 3 + 2],
                ],
                normal: if !mesh.normals.is_empty() {
                    [
                        mesh.normals[i * 3],
                        mesh.normals[i * 3 + 1],
                        mesh.normals[i * 3 + 2],
                    ]
                } else {
                    [0.0, 1.0, 0.0]
                },
                uv: [mesh.texcoords[i * 2], 1.0 - mesh.texcoords[i * 2 + 1]],
            });
        }

        cursor += corners;
    }

    log::debug!(
        "extracted {} vertex records from {} faces of mesh #{} ({})",
        vertices.len(),
        face_count,
        mesh_index,
        mesh.name
    );

    Ok(TriangleSoup { vertices })
}
