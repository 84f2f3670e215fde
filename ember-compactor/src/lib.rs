use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

pub mod compact;
pub mod error;
pub mod extract;
pub mod format;
pub mod import;

pub use compact::{CompactionStats, IndexWidth, IndexedMesh, MERGE_EPSILON, compact};
pub use error::{EmberError, EmberResult};
pub use extract::{ImportedMesh, ImportedScene, TriangleSoup, extract_triangle_soup};
pub use format::{EmdAsset, EmdFlatModel, EmdHeader, EmdIndexSlice, write_model};
pub use import::load_scene;

/// 3 position + 3 normal + 2 UV
pub const FLOATS_PER_VERTEX: usize = 8;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct EmdVertex {
    pub position: [f32; 3], // 12字节
    pub normal: [f32; 3],   // 12字节
    pub uv: [f32; 2],       // 8字节，总计 32 字节 (完美对齐)
}

impl EmdVertex {
    /// 按 X, Y, Z, NX, NY, NZ, U, V 的固定顺序平铺成 8 个分量
    #[inline]
    pub fn components(&self) -> &[f32; FLOATS_PER_VERTEX] {
        bytemuck::cast_ref(self)
    }
}
