// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `extern "C"` declarations and the [`NativeLibrary`] implementation on top

use ifc_loader_model::{
    ApiPtr, Color, GeometryPtr, MeshPtr, ModelPtr, NativeLibrary, RawApi, RawGeometry, RawMesh,
    RawModel, Vertex,
};
use std::os::raw::c_char;

#[allow(non_snake_case)]
extern "C" {
    pub fn InitializeApi() -> *mut RawApi;
    pub fn FinalizeApi(api: *mut RawApi);
    pub fn LoadModel(api: *mut RawApi, file_name: *const c_char) -> *mut RawModel;
    pub fn GetGeometryFromId(api: *mut RawApi, model: *const RawModel, id: u32)
        -> *mut RawGeometry;
    pub fn GetNumGeometries(api: *mut RawApi, model: *const RawModel) -> i32;
    pub fn GetGeometryFromIndex(
        api: *mut RawApi,
        model: *const RawModel,
        index: i32,
    ) -> *mut RawGeometry;
    pub fn GetNumMeshes(api: *mut RawApi, geom: *const RawGeometry) -> i32;
    pub fn GetGeometryId(api: *mut RawApi, geom: *const RawGeometry) -> u32;
    pub fn GetMesh(api: *mut RawApi, geom: *const RawGeometry, index: i32) -> *mut RawMesh;
    pub fn GetMeshId(api: *mut RawApi, mesh: *const RawMesh) -> u32;
    pub fn GetTransform(api: *mut RawApi, mesh: *mut RawMesh) -> *mut f64;
    pub fn GetColor(api: *mut RawApi, mesh: *mut RawMesh) -> *mut f64;
    pub fn GetNumVertices(api: *mut RawApi, mesh: *const RawMesh) -> i32;
    pub fn GetVertices(api: *mut RawApi, mesh: *const RawMesh) -> *mut Vertex;
    pub fn GetNumIndices(api: *mut RawApi, mesh: *const RawMesh) -> i32;
    pub fn GetIndices(api: *mut RawApi, mesh: *const RawMesh) -> *mut u32;
    pub fn GetGuid(model: *const RawModel, geom: *const RawGeometry) -> *const c_char;
    pub fn GetEntityType(model: *const RawModel, geom: *const RawGeometry) -> *const c_char;
    pub fn GetEntityTypeId(model: *const RawModel, geom: *const RawGeometry) -> u32;
    pub fn FreeString(ptr: *const c_char);
}

/// The linked web-ifc wrapper DLL
#[derive(Clone, Copy, Debug, Default)]
pub struct WebIfcLibrary;

impl NativeLibrary for WebIfcLibrary {
    unsafe fn initialize_api(&self) -> ApiPtr {
        ApiPtr::from_raw(InitializeApi())
    }

    unsafe fn finalize_api(&self, api: ApiPtr) {
        FinalizeApi(api.as_raw())
    }

    unsafe fn load_model(&self, api: ApiPtr, file_name: *const c_char) -> ModelPtr {
        ModelPtr::from_raw(LoadModel(api.as_raw(), file_name))
    }

    unsafe fn num_geometries(&self, api: ApiPtr, model: ModelPtr) -> i32 {
        GetNumGeometries(api.as_raw(), model.as_raw())
    }

    unsafe fn geometry_from_index(&self, api: ApiPtr, model: ModelPtr, index: i32) -> GeometryPtr {
        GeometryPtr::from_raw(GetGeometryFromIndex(api.as_raw(), model.as_raw(), index))
    }

    unsafe fn geometry_from_id(&self, api: ApiPtr, model: ModelPtr, id: u32) -> GeometryPtr {
        GeometryPtr::from_raw(GetGeometryFromId(api.as_raw(), model.as_raw(), id))
    }

    unsafe fn geometry_id(&self, api: ApiPtr, geometry: GeometryPtr) -> u32 {
        GetGeometryId(api.as_raw(), geometry.as_raw())
    }

    unsafe fn geometry_mesh_id(&self, api: ApiPtr, geometry: GeometryPtr) -> u32 {
        // The exported `GetMeshId` reads a `Mesh*`; the id stored on a
        // `Geometry*` is only reachable through `GetGeometryId`. Neither export
        // checks for null.
        if geometry.is_null() {
            return 0;
        }
        GetGeometryId(api.as_raw(), geometry.as_raw())
    }

    unsafe fn num_meshes(&self, api: ApiPtr, geometry: GeometryPtr) -> i32 {
        if geometry.is_null() {
            return 0;
        }
        GetNumMeshes(api.as_raw(), geometry.as_raw())
    }

    unsafe fn mesh(&self, api: ApiPtr, geometry: GeometryPtr, index: i32) -> MeshPtr {
        MeshPtr::from_raw(GetMesh(api.as_raw(), geometry.as_raw(), index))
    }

    unsafe fn mesh_id(&self, api: ApiPtr, mesh: MeshPtr) -> u32 {
        GetMeshId(api.as_raw(), mesh.as_raw())
    }

    unsafe fn mesh_transform(&self, api: ApiPtr, mesh: MeshPtr) -> *const f64 {
        GetTransform(api.as_raw(), mesh.as_raw())
    }

    unsafe fn mesh_color(&self, api: ApiPtr, mesh: MeshPtr) -> *const Color {
        // `GetColor` returns the address of the first of four packed doubles
        GetColor(api.as_raw(), mesh.as_raw()) as *const Color
    }

    unsafe fn num_vertices(&self, api: ApiPtr, mesh: MeshPtr) -> i32 {
        GetNumVertices(api.as_raw(), mesh.as_raw())
    }

    unsafe fn vertices(&self, api: ApiPtr, mesh: MeshPtr) -> *const Vertex {
        GetVertices(api.as_raw(), mesh.as_raw())
    }

    unsafe fn num_indices(&self, api: ApiPtr, mesh: MeshPtr) -> i32 {
        GetNumIndices(api.as_raw(), mesh.as_raw())
    }

    unsafe fn indices(&self, api: ApiPtr, mesh: MeshPtr) -> *const u32 {
        GetIndices(api.as_raw(), mesh.as_raw())
    }

    unsafe fn guid(&self, model: ModelPtr, geometry: GeometryPtr) -> *const c_char {
        GetGuid(model.as_raw(), geometry.as_raw())
    }

    unsafe fn entity_type(&self, model: ModelPtr, geometry: GeometryPtr) -> *const c_char {
        GetEntityType(model.as_raw(), geometry.as_raw())
    }

    unsafe fn entity_type_id(&self, model: ModelPtr, geometry: GeometryPtr) -> u32 {
        GetEntityTypeId(model.as_raw(), geometry.as_raw())
    }

    unsafe fn entity_label(&self, _model: ModelPtr, geometry: GeometryPtr) -> u32 {
        // The DLL has no label export. The label is the element's express id,
        // which `GetGeometryId` reads from the geometry without touching `api`.
        GetGeometryId(std::ptr::null_mut(), geometry.as_raw())
    }

    unsafe fn free_string(&self, ptr: *const c_char) {
        FreeString(ptr)
    }
}
