use bytemuck::{Pod, Zeroable, cast_slice};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

use memmap2::Mmap;

use anyhow::{Context, Result};

use crate::compact::{IndexWidth, IndexedMesh};
use crate::error::{EmberError, EmberResult};
use crate::EmdVertex;

pub const EMD_MAGIC: [u8; 4] = *b"EEMD";
pub const EMD_VERSION: u32 = 1;

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable, Serialize, Deserialize)]
pub struct EmdHeader {
    pub magic: [u8; 4], // "EEMD"
    pub version: u32,
    pub vertex_count: u64, // 去重后的顶点表长度
    pub index_count: u64,  // 压缩前的顶点数 = 索引数组长度
    pub index_width: u32,  // 1 | 2 | 4
    pub _padding: [u32; 1],
    pub center_radius: [f32; 4],
}

/// Owned, header-less model ready to be written out.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmdFlatModel {
    pub vertices: Vec<EmdVertex>,
    pub indices: Vec<u32>,
    pub index_width: IndexWidth,
    pub center_radius: [f32; 4],
}

impl EmdFlatModel {
    pub fn from_indexed(mesh: IndexedMesh, index_width: IndexWidth, center_radius: [f32; 4]) -> Self {
        EmdFlatModel {
            vertices: mesh.vertices,
            indices: mesh.indices,
            index_width,
            center_radius,
        }
    }
}

/// Index array borrowed straight from the mapped file, at whatever width
/// the header declares.
#[derive(Debug, Clone, Copy)]
pub enum EmdIndexSlice {
    U8(&'static [u8]),
    U16(&'static [u16]),
    U32(&'static [u32]),
}

impl EmdIndexSlice {
    pub fn len(&self) -> usize {
        match self {
            EmdIndexSlice::U8(s) => s.len(),
            EmdIndexSlice::U16(s) => s.len(),
            EmdIndexSlice::U32(s) => s.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn index(&self, i: usize) -> u32 {
        match self {
            EmdIndexSlice::U8(s) => s[i] as u32,
            EmdIndexSlice::U16(s) => s[i] as u32,
            EmdIndexSlice::U32(s) => s[i],
        }
    }

    pub fn to_vec(&self) -> Vec<u32> {
        match self {
            EmdIndexSlice::U8(s) => s.iter().map(|&i| i as u32).collect(),
            EmdIndexSlice::U16(s) => s.iter().map(|&i| i as u32).collect(),
            EmdIndexSlice::U32(s) => s.to_vec(),
        }
    }
}

/// 零拷贝模型资产：顶点表和索引数组直接借用磁盘映射
pub struct EmdAsset {
    _mmap: Mmap,
    pub header: EmdHeader,
    pub vertices: &'static [EmdVertex],
    pub indices: EmdIndexSlice,
}

impl EmdAsset {
    /// 直接映射磁盘二进制块到内存，不复制顶点数据
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())
            .with_context(|| format!("Failed to open model file: {:?}", path.as_ref()))?;
        let mmap = unsafe { Mmap::map(&file)? };

        if mmap.len() < std::mem::size_of::<EmdHeader>() {
            anyhow::bail!("File too small to be an EMD file");
        }

        let header = *unsafe { &*(mmap.as_ptr() as *const EmdHeader) };
        if header.magic != EMD_MAGIC {
            anyhow::bail!("Invalid EMD magic header. Did you re-convert the model?");
        }
        if header.version != EMD_VERSION {
            anyhow::bail!(
                "Unsupported EMD version {} (expected {})",
                header.version,
                EMD_VERSION
            );
        }
        let width = match header.index_width {
            1 => IndexWidth::U8,
            2 => IndexWidth::U16,
            4 => IndexWidth::U32,
            w => anyhow::bail!("Unsupported index width {} in EMD header", w),
        };

        // 长度校验用 u128，头里吹出来的天文数字不会回绕
        let expected = std::mem::size_of::<EmdHeader>() as u128
            + header.vertex_count as u128 * std::mem::size_of::<EmdVertex>() as u128
            + header.index_count as u128 * width.bytes() as u128;
        if (mmap.len() as u128) < expected {
            anyhow::bail!(
                "EMD file truncated: {} bytes on disk, header claims {}",
                mmap.len(),
                expected
            );
        }

        let vertex_count = header.vertex_count as usize;
        let index_count = header.index_count as usize;
        let mut offset = std::mem::size_of::<EmdHeader>();

        let vertices_ptr = unsafe { mmap.as_ptr().add(offset) as *const EmdVertex };
        let vertices = unsafe { std::slice::from_raw_parts(vertices_ptr, vertex_count) };
        offset += vertex_count * std::mem::size_of::<EmdVertex>();

        // 头 48 字节、顶点 32 字节，索引段的偏移对 2/4 字节天然对齐
        let indices = unsafe {
            match width {
                IndexWidth::U8 => EmdIndexSlice::U8(std::mem::transmute(
                    std::slice::from_raw_parts(mmap.as_ptr().add(offset), index_count),
                )),
                IndexWidth::U16 => EmdIndexSlice::U16(std::mem::transmute(
                    std::slice::from_raw_parts(mmap.as_ptr().add(offset) as *const u16, index_count),
                )),
                IndexWidth::U32 => EmdIndexSlice::U32(std::mem::transmute(
                    std::slice::from_raw_parts(mmap.as_ptr().add(offset) as *const u32, index_count),
                )),
            }
        };

        Ok(Self {
            _mmap: mmap,
            header,
            vertices: unsafe { std::mem::transmute(vertices) },
            indices,
        })
    }

    /// 将压缩后的模型写成 EMD：头 + 顶点表 + 按声明宽度收窄的索引数组
    pub fn save_to_file<P: AsRef<Path>>(model: &EmdFlatModel, path: P) -> Result<()> {
        let width = model.index_width;

        // The writer is the last line of defense: an index past the vertex
        // table or too wide for the declared width makes the file unreadable.
        for (at, &index) in model.indices.iter().enumerate() {
            if index as usize >= model.vertices.len() {
                anyhow::bail!(
                    "Index {} at position {} exceeds vertex table length {}",
                    index,
                    at,
                    model.vertices.len()
                );
            }
            if index > width.max_index() {
                anyhow::bail!(
                    "Index {} at position {} does not fit a {}-byte index",
                    index,
                    at,
                    width.bytes()
                );
            }
        }

        let header = EmdHeader {
            magic: EMD_MAGIC,
            version: EMD_VERSION,
            vertex_count: model.vertices.len() as u64,
            index_count: model.indices.len() as u64,
            index_width: width.bytes() as u32,
            _padding: [0; 1],
            center_radius: model.center_radius,
        };

        let file = File::create(path.as_ref())
            .with_context(|| format!("Failed to create model file: {:?}", path.as_ref()))?;
        let mut writer = std::io::BufWriter::with_capacity(1024 * 1024, file);

        writer.write_all(cast_slice(&[header]))?;
        writer.write_all(cast_slice(&model.vertices))?;
        match width {
            IndexWidth::U8 => {
                let narrow: Vec<u8> = model.indices.iter().map(|&i| i as u8).collect();
                writer.write_all(&narrow)?;
            }
            IndexWidth::U16 => {
                let narrow: Vec<u16> = model.indices.iter().map(|&i| i as u16).collect();
                writer.write_all(cast_slice(&narrow))?;
            }
            IndexWidth::U32 => {
                writer.write_all(cast_slice(&model.indices))?;
            }
        }

        writer.flush()?;
        Ok(())
    }
}

/// Handoff point of the pipeline: delegates to the EMD writer and surfaces
/// its verdict unchanged as a [`EmberError::WriterFailure`].
pub fn write_model(model: &EmdFlatModel, path: &str) -> EmberResult<()> {
    EmdAsset::save_to_file(model, path).map_err(|err| EmberError::WriterFailure {
        path: path.to_string(),
        detail: format!("{err:#}"),
    })
}
