//! Integration tests for the EMD container: save → zero-copy load
//! round-trips and rejection of malformed files.

use std::fs;

use ember_compactor::{EmdAsset, EmdFlatModel, EmdVertex, IndexWidth};

fn vert(x: f32, v: f32) -> EmdVertex {
    EmdVertex {
        position: [x, 0.0, 0.0],
        normal: [0.0, 1.0, 0.0],
        uv: [0.0, v],
    }
}

fn small_model(width: IndexWidth) -> EmdFlatModel {
    EmdFlatModel {
        vertices: vec![vert(0.0, 0.0), vert(1.0, 0.5), vert(2.0, 1.0)],
        indices: vec![0, 1, 2, 2, 1, 0],
        index_width: width,
        center_radius: [1.0, 0.0, 0.0, 1.0],
    }
}

fn save_and_load(model: &EmdFlatModel) -> EmdAsset {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.emd");
    EmdAsset::save_to_file(model, &path).unwrap();
    EmdAsset::load_from_file(&path).unwrap()
}

#[test]
fn round_trip_u8() {
    let model = small_model(IndexWidth::U8);
    let asset = save_and_load(&model);
    assert_eq!(&asset.header.magic, b"EEMD");
    assert_eq!(asset.header.version, 1);
    assert_eq!(asset.header.vertex_count, 3);
    assert_eq!(asset.header.index_count, 6);
    assert_eq!(asset.header.index_width, 1);
    assert_eq!(asset.vertices, model.vertices.as_slice());
    assert_eq!(asset.indices.to_vec(), model.indices);
}

#[test]
fn round_trip_u16() {
    let model = small_model(IndexWidth::U16);
    let asset = save_and_load(&model);
    assert_eq!(asset.header.index_width, 2);
    assert_eq!(asset.indices.to_vec(), model.indices);
}

#[test]
fn round_trip_u32() {
    let model = small_model(IndexWidth::U32);
    let asset = save_and_load(&model);
    assert_eq!(asset.header.index_width, 4);
    assert_eq!(asset.indices.to_vec(), model.indices);
}

#[test]
fn bounding_sphere_survives_the_trip() {
    let model = small_model(IndexWidth::U8);
    let asset = save_and_load(&model);
    assert_eq!(asset.header.center_radius, [1.0, 0.0, 0.0, 1.0]);
}

#[test]
fn file_size_matches_the_header() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.emd");
    let model = small_model(IndexWidth::U16);
    EmdAsset::save_to_file(&model, &path).unwrap();
    let on_disk = fs::metadata(&path).unwrap().len() as usize;
    // 48-byte header + 3 vertices * 32 bytes + 6 indices * 2 bytes.
    assert_eq!(on_disk, 48 + 3 * 32 + 6 * 2);
}

#[test]
fn writer_rejects_index_past_vertex_table() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.emd");
    let mut model = small_model(IndexWidth::U32);
    model.indices[3] = 7;
    assert!(EmdAsset::save_to_file(&model, &path).is_err());
    assert!(!path.exists());
}

#[test]
fn writer_rejects_index_wider_than_declared() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.emd");
    let model = EmdFlatModel {
        vertices: (0..300).map(|i| vert(i as f32, 0.0)).collect(),
        indices: vec![0, 299, 1],
        index_width: IndexWidth::U8,
        center_radius: [0.0; 4],
    };
    assert!(EmdAsset::save_to_file(&model, &path).is_err());
}

#[test]
fn load_rejects_wrong_magic() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.emd");
    let model = small_model(IndexWidth::U8);
    EmdAsset::save_to_file(&model, &path).unwrap();

    let mut bytes = fs::read(&path).unwrap();
    bytes[0..4].copy_from_slice(b"XXXX");
    fs::write(&path, &bytes).unwrap();

    assert!(EmdAsset::load_from_file(&path).is_err());
}

#[test]
fn load_rejects_unknown_index_width() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.emd");
    let model = small_model(IndexWidth::U8);
    EmdAsset::save_to_file(&model, &path).unwrap();

    // index_width lives at byte offset 24 of the header.
    let mut bytes = fs::read(&path).unwrap();
    bytes[24] = 3;
    fs::write(&path, &bytes).unwrap();

    assert!(EmdAsset::load_from_file(&path).is_err());
}

#[test]
fn load_rejects_truncated_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.emd");
    let model = small_model(IndexWidth::U8);
    EmdAsset::save_to_file(&model, &path).unwrap();

    let bytes = fs::read(&path).unwrap();
    fs::write(&path, &bytes[..bytes.len() - 8]).unwrap();

    assert!(EmdAsset::load_from_file(&path).is_err());
}

#[test]
fn load_rejects_tiny_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.emd");
    fs::write(&path, b"EEMD").unwrap();
    assert!(EmdAsset::load_from_file(&path).is_err());
}
