// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Native engine contract
//!
//! One method per exported C function of the web-ifc wrapper DLL. Methods are
//! `unsafe` because every implementation that talks to real native code
//! dereferences the handles it is given.

use crate::{ApiPtr, Color, GeometryPtr, MeshPtr, ModelPtr, Vertex};
use std::os::raw::c_char;

/// Foreign geometry engine
///
/// Implemented by the `extern "C"` binding of the real DLL and by in-process
/// fakes. Wrappers only hold a shared reference, so implementations needing
/// bookkeeping use interior mutability.
///
/// # Safety
///
/// Unless stated otherwise, every handle argument must have been produced by
/// the same implementation and must still be alive: the engine has not been
/// finalized and, for geometry/mesh handles, the owning model is still
/// loaded.
pub trait NativeLibrary {
    /// `InitializeApi`: create an engine instance
    ///
    /// # Safety
    /// The result must be released with [`NativeLibrary::finalize_api`].
    unsafe fn initialize_api(&self) -> ApiPtr;

    /// `FinalizeApi`: destroy an engine instance and every model it loaded
    ///
    /// # Safety
    /// `api` must not be used afterwards.
    unsafe fn finalize_api(&self, api: ApiPtr);

    /// `LoadModel`: parse an IFC file and precompute its geometry
    ///
    /// # Safety
    /// `file_name` must point to a NUL-terminated string.
    unsafe fn load_model(&self, api: ApiPtr, file_name: *const c_char) -> ModelPtr;

    /// `GetNumGeometries`
    ///
    /// # Safety
    /// See trait-level requirements.
    unsafe fn num_geometries(&self, api: ApiPtr, model: ModelPtr) -> i32;

    /// `GetGeometryFromIndex`: no range check on the native side
    ///
    /// # Safety
    /// `index` must be in `0..num_geometries`.
    unsafe fn geometry_from_index(&self, api: ApiPtr, model: ModelPtr, index: i32) -> GeometryPtr;

    /// `GetGeometryFromId`: null if the express id has no geometry
    ///
    /// # Safety
    /// See trait-level requirements.
    unsafe fn geometry_from_id(&self, api: ApiPtr, model: ModelPtr, id: u32) -> GeometryPtr;

    /// `GetGeometryId`: express id of the element owning the geometry
    ///
    /// # Safety
    /// `geometry` must be non-null.
    unsafe fn geometry_id(&self, api: ApiPtr, geometry: GeometryPtr) -> u32;

    /// `GetMeshId` as issued for a geometry handle
    ///
    /// # Safety
    /// See trait-level requirements. Implementations decide how a null
    /// geometry is answered.
    unsafe fn geometry_mesh_id(&self, api: ApiPtr, geometry: GeometryPtr) -> u32;

    /// `GetNumMeshes`
    ///
    /// # Safety
    /// See trait-level requirements.
    unsafe fn num_meshes(&self, api: ApiPtr, geometry: GeometryPtr) -> i32;

    /// `GetMesh`: no range check on the native side
    ///
    /// # Safety
    /// `index` must be in `0..num_meshes`.
    unsafe fn mesh(&self, api: ApiPtr, geometry: GeometryPtr, index: i32) -> MeshPtr;

    /// `GetMeshId`
    ///
    /// # Safety
    /// `mesh` must be non-null.
    unsafe fn mesh_id(&self, api: ApiPtr, mesh: MeshPtr) -> u32;

    /// `GetTransform`: 16 doubles, column-major, owned by the mesh
    ///
    /// # Safety
    /// `mesh` must be non-null.
    unsafe fn mesh_transform(&self, api: ApiPtr, mesh: MeshPtr) -> *const f64;

    /// `GetColor`: RGBA doubles owned by the mesh
    ///
    /// # Safety
    /// `mesh` must be non-null.
    unsafe fn mesh_color(&self, api: ApiPtr, mesh: MeshPtr) -> *const Color;

    /// `GetNumVertices`
    ///
    /// # Safety
    /// `mesh` must be non-null.
    unsafe fn num_vertices(&self, api: ApiPtr, mesh: MeshPtr) -> i32;

    /// `GetVertices`: array of `num_vertices` entries owned by the engine
    ///
    /// # Safety
    /// `mesh` must be non-null.
    unsafe fn vertices(&self, api: ApiPtr, mesh: MeshPtr) -> *const Vertex;

    /// `GetNumIndices`
    ///
    /// # Safety
    /// `mesh` must be non-null.
    unsafe fn num_indices(&self, api: ApiPtr, mesh: MeshPtr) -> i32;

    /// `GetIndices`: array of `num_indices` entries owned by the engine
    ///
    /// # Safety
    /// `mesh` must be non-null.
    unsafe fn indices(&self, api: ApiPtr, mesh: MeshPtr) -> *const u32;

    /// `GetGuid`: heap string to be released with [`NativeLibrary::free_string`]
    ///
    /// # Safety
    /// `geometry` must be non-null.
    unsafe fn guid(&self, model: ModelPtr, geometry: GeometryPtr) -> *const c_char;

    /// `GetEntityType`: heap string to be released with [`NativeLibrary::free_string`]
    ///
    /// # Safety
    /// `geometry` must be non-null.
    unsafe fn entity_type(&self, model: ModelPtr, geometry: GeometryPtr) -> *const c_char;

    /// `GetEntityTypeId`
    ///
    /// # Safety
    /// `geometry` must be non-null.
    unsafe fn entity_type_id(&self, model: ModelPtr, geometry: GeometryPtr) -> u32;

    /// Express id (`#N`) of the element owning the geometry
    ///
    /// The wrapper DLL has no dedicated export for this. Bindings answer it
    /// with the geometry's own id, the value `GetGeometryId` returns.
    ///
    /// # Safety
    /// `geometry` must be non-null.
    unsafe fn entity_label(&self, model: ModelPtr, geometry: GeometryPtr) -> u32;

    /// `FreeString`
    ///
    /// # Safety
    /// `ptr` must come from [`NativeLibrary::guid`] or
    /// [`NativeLibrary::entity_type`] and must not be freed twice.
    unsafe fn free_string(&self, ptr: *const c_char);
}

impl<L: NativeLibrary + ?Sized> NativeLibrary for &L {
    unsafe fn initialize_api(&self) -> ApiPtr {
        (**self).initialize_api()
    }

    unsafe fn finalize_api(&self, api: ApiPtr) {
        (**self).finalize_api(api)
    }

    unsafe fn load_model(&self, api: ApiPtr, file_name: *const c_char) -> ModelPtr {
        (**self).load_model(api, file_name)
    }

    unsafe fn num_geometries(&self, api: ApiPtr, model: ModelPtr) -> i32 {
        (**self).num_geometries(api, model)
    }

    unsafe fn geometry_from_index(&self, api: ApiPtr, model: ModelPtr, index: i32) -> GeometryPtr {
        (**self).geometry_from_index(api, model, index)
    }

    unsafe fn geometry_from_id(&self, api: ApiPtr, model: ModelPtr, id: u32) -> GeometryPtr {
        (**self).geometry_from_id(api, model, id)
    }

    unsafe fn geometry_id(&self, api: ApiPtr, geometry: GeometryPtr) -> u32 {
        (**self).geometry_id(api, geometry)
    }

    unsafe fn geometry_mesh_id(&self, api: ApiPtr, geometry: GeometryPtr) -> u32 {
        (**self).geometry_mesh_id(api, geometry)
    }

    unsafe fn num_meshes(&self, api: ApiPtr, geometry: GeometryPtr) -> i32 {
        (**self).num_meshes(api, geometry)
    }

    unsafe fn mesh(&self, api: ApiPtr, geometry: GeometryPtr, index: i32) -> MeshPtr {
        (**self).mesh(api, geometry, index)
    }

    unsafe fn mesh_id(&self, api: ApiPtr, mesh: MeshPtr) -> u32 {
        (**self).mesh_id(api, mesh)
    }

    unsafe fn mesh_transform(&self, api: ApiPtr, mesh: MeshPtr) -> *const f64 {
        (**self).mesh_transform(api, mesh)
    }

    unsafe fn mesh_color(&self, api: ApiPtr, mesh: MeshPtr) -> *const Color {
        (**self).mesh_color(api, mesh)
    }

    unsafe fn num_vertices(&self, api: ApiPtr, mesh: MeshPtr) -> i32 {
        (**self).num_vertices(api, mesh)
    }

    unsafe fn vertices(&self, api: ApiPtr, mesh: MeshPtr) -> *const Vertex {
        (**self).vertices(api, mesh)
    }

    unsafe fn num_indices(&self, api: ApiPtr, mesh: MeshPtr) -> i32 {
        (**self).num_indices(api, mesh)
    }

    unsafe fn indices(&self, api: ApiPtr, mesh: MeshPtr) -> *const u32 {
        (**self).indices(api, mesh)
    }

    unsafe fn guid(&self, model: ModelPtr, geometry: GeometryPtr) -> *const c_char {
        (**self).guid(model, geometry)
    }

    unsafe fn entity_type(&self, model: ModelPtr, geometry: GeometryPtr) -> *const c_char {
        (**self).entity_type(model, geometry)
    }

    unsafe fn entity_type_id(&self, model: ModelPtr, geometry: GeometryPtr) -> u32 {
        (**self).entity_type_id(model, geometry)
    }

    unsafe fn entity_label(&self, model: ModelPtr, geometry: GeometryPtr) -> u32 {
        (**self).entity_label(model, geometry)
    }

    unsafe fn free_string(&self, ptr: *const c_char) {
        (**self).free_string(ptr)
    }
}
