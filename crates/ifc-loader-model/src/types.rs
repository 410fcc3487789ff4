// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types shared across the native boundary
//!
//! `Vertex` and `Color` are laid out exactly like their native counterparts
//! so that engine-owned arrays can be viewed as Rust slices without copying.

use nalgebra::Matrix4;
use serde::{Deserialize, Serialize};

/// Vertex as stored by the engine: position followed by normal
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Vertex {
    pub position: [f64; 3],
    pub normal: [f64; 3],
}

impl Vertex {
    /// Create a new vertex
    pub fn new(position: [f64; 3], normal: [f64; 3]) -> Self {
        Self { position, normal }
    }
}

/// RGBA color with components in 0.0-1.0
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Color {
    /// Create a new color
    pub fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Build from a native `[R, G, B, A]` array
    pub fn from_array(rgba: [f64; 4]) -> Self {
        Self::new(rgba[0], rgba[1], rgba[2], rgba[3])
    }

    /// Components as `[R, G, B, A]`
    pub fn to_array(self) -> [f64; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Components narrowed to `f32` for GPU upload
    pub fn to_f32(self) -> [f32; 4] {
        [self.r as f32, self.g as f32, self.b as f32, self.a as f32]
    }

    /// Check whether the color needs blending
    pub fn is_transparent(self) -> bool {
        self.a < 1.0
    }
}

impl Default for Color {
    fn default() -> Self {
        // Native `Color()` zero-initializes every component
        Self::new(0.0, 0.0, 0.0, 0.0)
    }
}

/// Number of doubles in a native mesh transform
pub const TRANSFORM_LEN: usize = 16;

/// Build a transform from the engine's flat column-major 4x4 array
pub fn transform_from_column_slice(values: &[f64; TRANSFORM_LEN]) -> Matrix4<f64> {
    Matrix4::from_column_slice(values)
}

/// Owned triangle mesh copied out of engine memory
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshData {
    /// Vertex positions as flattened [x, y, z, x, y, z, ...]
    pub positions: Vec<f32>,
    /// Vertex normals as flattened [nx, ny, nz, nx, ny, nz, ...]
    pub normals: Vec<f32>,
    /// Triangle indices
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Create mesh with pre-allocated capacity
    pub fn with_capacity(vertex_count: usize, index_count: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertex_count * 3),
            normals: Vec::with_capacity(vertex_count * 3),
            indices: Vec::with_capacity(index_count),
        }
    }

    /// Copy interleaved native vertices and indices into flat buffers
    pub fn from_native(vertices: &[Vertex], indices: &[u32]) -> Self {
        let mut mesh = Self::with_capacity(vertices.len(), indices.len());
        for v in vertices {
            mesh.positions.extend(v.position.iter().map(|&c| c as f32));
            mesh.normals.extend(v.normal.iter().map(|&c| c as f32));
        }
        mesh.indices.extend_from_slice(indices);
        mesh
    }

    /// Check if mesh is empty
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Get vertex count
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Get triangle count
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Owned snapshot of the metadata resolved for one geometry
///
/// Holds no native resources and can outlive the engine.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GeometryInfo {
    /// Mesh identifier reported by the engine
    pub id: u32,
    /// Number of child meshes
    pub mesh_count: i32,
    /// IFC GlobalId (22 character base64 string), empty if unresolved
    pub guid: String,
    /// IFC entity type name, e.g. `IFCWALL`, empty if unresolved
    pub entity_type: String,
    /// Schema type code of the entity
    pub entity_type_id: u32,
    /// Express id (`#N`) of the entity
    pub entity_label: u32,
}
