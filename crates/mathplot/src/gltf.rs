//! glTF 2.0 export.
//!
//! Writes the scene as a single JSON file with buffers embedded as base64
//! data URIs: one node and one mesh per model, with POSITION, NORMAL and
//! COLOR_0 attributes plus an index accessor. Only the translation column
//! of each model's view matrix is carried into the node, so rotated models
//! appear axis-aligned in the export.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::json;

use mathplot_core::Result;

use crate::visual::Visual;

const ELEMENT_ARRAY_BUFFER: u32 = 34963;
const ARRAY_BUFFER: u32 = 34962;
const UNSIGNED_INT: u32 = 5125;
const FLOAT: u32 = 5126;

fn data_uri(bytes: &[u8]) -> String {
    format!(
        "data:application/octet-stream;base64,{}",
        STANDARD.encode(bytes)
    )
}

fn f32_bytes(data: &[f32]) -> Vec<u8> {
    data.iter().flat_map(|v| v.to_le_bytes()).collect()
}

fn u32_bytes(data: &[u32]) -> Vec<u8> {
    data.iter().flat_map(|v| v.to_le_bytes()).collect()
}

/// One-pass min/max over a flat stride-3 sequence, required by the glTF
/// spec for POSITION accessors.
fn vertex_extents(positions: &[f32]) -> ([f32; 3], [f32; 3]) {
    let mut min = [f32::MAX; 3];
    let mut max = [f32::MIN; 3];
    for p in positions.chunks_exact(3) {
        for k in 0..3 {
            min[k] = min[k].min(p[k]);
            max[k] = max[k].max(p[k]);
        }
    }
    (min, max)
}

/// Builds the glTF document for the scene's models.
pub fn build_gltf(visual: &Visual) -> serde_json::Value {
    let mut nodes = Vec::new();
    let mut meshes = Vec::new();
    let mut buffers = Vec::new();
    let mut buffer_views = Vec::new();
    let mut accessors = Vec::new();

    for index in 0..visual.num_models() {
        let Some(model) = visual.model(index) else {
            continue;
        };
        let common = model.common();
        let vb = &common.buffers;
        if vb.is_empty() {
            continue;
        }
        let translation = common.view_matrix.w_axis.truncate();
        let vertex_count = vb.vertex_count();
        let base_buffer = buffers.len();
        let base_accessor = accessors.len();

        let byte_streams: [(Vec<u8>, u32); 4] = [
            (u32_bytes(&vb.indices), ELEMENT_ARRAY_BUFFER),
            (f32_bytes(&vb.positions), ARRAY_BUFFER),
            (f32_bytes(&vb.normals), ARRAY_BUFFER),
            (f32_bytes(&vb.colors), ARRAY_BUFFER),
        ];
        for (bytes, target) in &byte_streams {
            buffers.push(json!({
                "byteLength": bytes.len(),
                "uri": data_uri(bytes),
            }));
            buffer_views.push(json!({
                "buffer": buffers.len() - 1,
                "byteOffset": 0,
                "byteLength": bytes.len(),
                "target": target,
            }));
        }

        accessors.push(json!({
            "bufferView": base_buffer,
            "componentType": UNSIGNED_INT,
            "count": vb.indices.len(),
            "type": "SCALAR",
        }));
        let (min, max) = vertex_extents(&vb.positions);
        accessors.push(json!({
            "bufferView": base_buffer + 1,
            "componentType": FLOAT,
            "count": vertex_count,
            "type": "VEC3",
            "min": min,
            "max": max,
        }));
        accessors.push(json!({
            "bufferView": base_buffer + 2,
            "componentType": FLOAT,
            "count": vertex_count,
            "type": "VEC3",
        }));
        accessors.push(json!({
            "bufferView": base_buffer + 3,
            "componentType": FLOAT,
            "count": vertex_count,
            "type": "VEC3",
        }));

        nodes.push(json!({
            "name": model.name(),
            "mesh": meshes.len(),
            "translation": [translation.x, translation.y, translation.z],
        }));
        meshes.push(json!({
            "primitives": [{
                "attributes": {
                    "POSITION": base_accessor + 1,
                    "NORMAL": base_accessor + 2,
                    "COLOR_0": base_accessor + 3,
                },
                "indices": base_accessor,
                "material": 0,
            }],
        }));
    }

    let node_indices: Vec<usize> = (0..nodes.len()).collect();
    json!({
        "asset": {
            "generator": concat!("mathplot ", env!("CARGO_PKG_VERSION")),
            "version": "2.0",
        },
        "scene": 0,
        "scenes": [{ "nodes": node_indices }],
        "nodes": nodes,
        "meshes": meshes,
        "buffers": buffers,
        "bufferViews": buffer_views,
        "accessors": accessors,
        "materials": [{ "doubleSided": true }],
    })
}

/// Writes the scene as a glTF 2.0 file.
pub fn export_gltf(visual: &Visual, path: &str) -> Result<()> {
    let document = build_gltf(visual);
    std::fs::write(path, serde_json::to_string_pretty(&document)?)?;
    Ok(())
}
