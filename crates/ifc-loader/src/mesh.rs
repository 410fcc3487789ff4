// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Placed meshes of a geometry

use ifc_loader_model::{
    transform_from_column_slice, ApiPtr, Color, MeshData, MeshPtr, NativeLibrary, Vertex,
    TRANSFORM_LEN,
};
use nalgebra::Matrix4;
use std::fmt;

/// One placed mesh owned by the engine
///
/// Created on demand by [`crate::GeometryHandle`]. Every accessor is a fresh
/// native call; slices borrow engine memory and stay valid for as long as
/// the engine is alive (`'a`).
pub struct MeshHandle<'a, L: NativeLibrary + ?Sized> {
    lib: &'a L,
    api: ApiPtr,
    mesh: MeshPtr,
}

impl<'a, L: NativeLibrary + ?Sized> MeshHandle<'a, L> {
    /// Wrap a mesh handle returned by `GetMesh`
    ///
    /// # Safety
    ///
    /// `api` must be a live engine of `lib` and `mesh` a non-null mesh it
    /// owns, both valid for `'a`.
    pub unsafe fn new(lib: &'a L, api: ApiPtr, mesh: MeshPtr) -> Self {
        Self { lib, api, mesh }
    }

    /// Engine instance the mesh belongs to
    pub fn engine(&self) -> ApiPtr {
        self.api
    }

    /// Raw mesh handle
    pub fn as_ptr(&self) -> MeshPtr {
        self.mesh
    }

    /// Express id of the representation item the mesh was built from
    pub fn id(&self) -> u32 {
        // SAFETY: handle validity guaranteed by `new`
        unsafe { self.lib.mesh_id(self.api, self.mesh) }
    }

    /// Placement of the mesh (column-major 4x4)
    pub fn transform(&self) -> Matrix4<f64> {
        // SAFETY: handle validity guaranteed by `new`
        let ptr = unsafe { self.lib.mesh_transform(self.api, self.mesh) };
        if ptr.is_null() {
            return Matrix4::identity();
        }
        // SAFETY: the engine stores exactly 16 doubles per mesh
        let values = unsafe { &*(ptr as *const [f64; TRANSFORM_LEN]) };
        transform_from_column_slice(values)
    }

    /// Surface color
    pub fn color(&self) -> Color {
        // SAFETY: handle validity guaranteed by `new`
        let ptr = unsafe { self.lib.mesh_color(self.api, self.mesh) };
        if ptr.is_null() {
            return Color::default();
        }
        // SAFETY: points at four packed doubles owned by the mesh
        unsafe { ptr.read() }
    }

    /// Vertices in local coordinates, shared with the engine
    pub fn vertices(&self) -> &'a [Vertex] {
        // SAFETY: handle validity guaranteed by `new`
        unsafe {
            let len = self.lib.num_vertices(self.api, self.mesh);
            native_slice(self.lib.vertices(self.api, self.mesh), len)
        }
    }

    /// Triangle indices into [`MeshHandle::vertices`], shared with the engine
    pub fn indices(&self) -> &'a [u32] {
        // SAFETY: handle validity guaranteed by `new`
        unsafe {
            let len = self.lib.num_indices(self.api, self.mesh);
            native_slice(self.lib.indices(self.api, self.mesh), len)
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices().len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices().len() / 3
    }

    /// Copy vertices and indices out of engine memory
    pub fn to_mesh_data(&self) -> MeshData {
        MeshData::from_native(self.vertices(), self.indices())
    }
}

impl<L: NativeLibrary + ?Sized> Clone for MeshHandle<'_, L> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<L: NativeLibrary + ?Sized> Copy for MeshHandle<'_, L> {}

impl<L: NativeLibrary + ?Sized> PartialEq for MeshHandle<'_, L> {
    fn eq(&self, other: &Self) -> bool {
        self.api == other.api && self.mesh == other.mesh
    }
}

impl<L: NativeLibrary + ?Sized> Eq for MeshHandle<'_, L> {}

impl<L: NativeLibrary + ?Sized> fmt::Debug for MeshHandle<'_, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MeshHandle")
            .field("api", &self.api)
            .field("mesh", &self.mesh)
            .finish()
    }
}

/// View an engine-owned array as a slice, empty for null or non-positive length
unsafe fn native_slice<'a, T>(ptr: *const T, len: i32) -> &'a [T] {
    if ptr.is_null() || len <= 0 {
        return &[];
    }
    std::slice::from_raw_parts(ptr, len as usize)
}
