use serde::{Deserialize, Serialize};

use crate::extract::TriangleSoup;
use crate::{EmdVertex, FLOATS_PER_VERTEX};

/// Absolute per-component welding tolerance.
/// 真实案例：1.0 和 0.999969 应当视为同一个顶点
pub const MERGE_EPSILON: f32 = 5.0e-5;

/// Unique vertex table plus the index stream that replays the original
/// triangle soup. `indices` is exactly as long as the soup was; the table
/// keeps first-occurrence order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexedMesh {
    pub vertices: Vec<EmdVertex>,
    pub indices: Vec<u32>,
}

impl IndexedMesh {
    pub fn unique_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn stats(&self, width: IndexWidth) -> CompactionStats {
        CompactionStats::new(self.indices.len(), self.vertices.len(), width)
    }
}

/// On-disk width of one index entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndexWidth {
    U8 = 1,
    U16 = 2,
    U32 = 4,
}

impl Default for IndexWidth {
    fn default() -> Self {
        IndexWidth::U32
    }
}

impl IndexWidth {
    /// Narrowest width for a vertex count. The count passed in is the
    /// pre-compaction one: a streaming writer has to commit to a width
    /// before the unique count is known, so the choice is deliberately
    /// conservative near the 255/65535 boundaries.
    pub fn for_vertex_count(count: usize) -> Self {
        if count <= u8::MAX as usize {
            IndexWidth::U8
        } else if count <= u16::MAX as usize {
            IndexWidth::U16
        } else {
            IndexWidth::U32
        }
    }

    pub fn bytes(self) -> usize {
        self as usize
    }

    pub fn max_index(self) -> u32 {
        match self {
            IndexWidth::U8 => u8::MAX as u32,
            IndexWidth::U16 => u16::MAX as u32,
            IndexWidth::U32 => u32::MAX,
        }
    }
}

/// Size accounting for one conversion. Informational only, never gates
/// success or failure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompactionStats {
    pub raw_size: usize,
    pub compacted_size: usize,
    pub ratio: f32,
}

impl CompactionStats {
    pub fn new(soup_len: usize, unique: usize, width: IndexWidth) -> Self {
        let float_size = std::mem::size_of::<f32>();
        let raw_size = soup_len * FLOATS_PER_VERTEX * float_size;
        let compacted_size = unique * FLOATS_PER_VERTEX * float_size + soup_len * width.bytes();
        let ratio = if raw_size == 0 {
            0.0
        } else {
            compacted_size as f32 * 100.0 / raw_size as f32
        };

        CompactionStats {
            raw_size,
            compacted_size,
            ratio,
        }
    }
}

/// Welds the soup into an [`IndexedMesh`].
///
/// 逐条扫描已收录的顶点表，8 个分量全部落在 [`MERGE_EPSILON`] 之内才算同一个
/// 顶点；命中多个候选时取表里最早的那个（first-match-wins），这样同样的输入
/// 顺序永远得到同样的结果。O(n·u)，对去重率低的病态输入会退化成平方级。
pub fn compact(soup: &TriangleSoup) -> IndexedMesh {
    let mut vertices: Vec<EmdVertex> = Vec::new();
    let mut indices: Vec<u32> = Vec::with_capacity(soup.len());

    for v in &soup.vertices {
        match vertices.iter().position(|u| within_tolerance(u, v)) {
            Some(found) => indices.push(found as u32),
            None => {
                vertices.push(*v);
                indices.push((vertices.len() - 1) as u32);
            }
        }
    }

    log::debug!(
        "welded {} vertex records into {} unique entries",
        indices.len(),
        vertices.len()
    );

    IndexedMesh { vertices, indices }
}

#[inline]
fn within_tolerance(a: &EmdVertex, b: &EmdVertex) -> bool {
    a.components()
        .iter()
        .zip(b.components().iter())
        .all(|(x, y)| (x - y).abs() <= MERGE_EPSILON)
}
