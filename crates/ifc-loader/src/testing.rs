// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-process stand-in for the native engine
//!
//! Objects are heap-allocated and handed out as raw addresses the same way
//! the DLL does. Every call is recorded. Strings returned by `guid` and
//! `entity_type` are tracked: freeing poisons the bytes (the memory itself is
//! kept until the fake drops) and freeing twice or freeing an unknown
//! pointer panics.

use ifc_loader_model::{
    ApiPtr, Color, GeometryPtr, MeshPtr, ModelPtr, NativeLibrary, RawApi, RawGeometry, RawMesh,
    RawModel, Vertex, TRANSFORM_LEN,
};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;

/// Byte written over released string buffers
pub const POISON: u8 = 0xDD;

pub const IDENTITY: [f64; TRANSFORM_LEN] = [
    1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0,
];

/// Native call as seen by the fake
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    InitializeApi,
    FinalizeApi,
    LoadModel(String),
    NumGeometries,
    GeometryFromIndex(i32),
    GeometryFromId(u32),
    GeometryId,
    GeometryMeshId,
    NumMeshes,
    Mesh(i32),
    MeshId,
    Transform,
    Color,
    NumVertices,
    Vertices,
    NumIndices,
    Indices,
    Guid,
    EntityType,
    EntityTypeId,
    EntityLabel,
    FreeString,
}

#[derive(Clone, Debug)]
pub struct FakeMesh {
    pub id: u32,
    pub transform: [f64; TRANSFORM_LEN],
    pub color: Color,
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl FakeMesh {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            transform: IDENTITY,
            color: Color::new(0.8, 0.8, 0.8, 1.0),
            vertices: Vec::new(),
            indices: Vec::new(),
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_translation(mut self, x: f64, y: f64, z: f64) -> Self {
        self.transform[12] = x;
        self.transform[13] = y;
        self.transform[14] = z;
        self
    }

    /// Unit right triangle in the XY plane
    pub fn with_triangle(mut self) -> Self {
        let up = [0.0, 0.0, 1.0];
        self.vertices = vec![
            Vertex::new([0.0, 0.0, 0.0], up),
            Vertex::new([1.0, 0.0, 0.0], up),
            Vertex::new([0.0, 1.0, 0.0], up),
        ];
        self.indices = vec![0, 1, 2];
        self
    }
}

#[derive(Clone, Debug)]
pub struct FakeGeometry {
    pub express_id: u32,
    pub mesh_id: u32,
    pub guid: Option<String>,
    pub entity_type: Option<String>,
    pub entity_type_id: u32,
    pub entity_label: u32,
    pub meshes: Vec<FakeMesh>,
}

impl FakeGeometry {
    pub fn new(express_id: u32) -> Self {
        Self {
            express_id,
            mesh_id: express_id,
            guid: None,
            entity_type: None,
            entity_type_id: 0,
            entity_label: express_id,
            meshes: Vec::new(),
        }
    }

    pub fn with_mesh_id(mut self, id: u32) -> Self {
        self.mesh_id = id;
        self
    }

    pub fn with_guid(mut self, guid: &str) -> Self {
        self.guid = Some(guid.to_string());
        self
    }

    pub fn with_entity_type(mut self, name: &str, type_id: u32) -> Self {
        self.entity_type = Some(name.to_string());
        self.entity_type_id = type_id;
        self
    }

    pub fn with_entity_label(mut self, label: u32) -> Self {
        self.entity_label = label;
        self
    }

    pub fn with_mesh(mut self, mesh: FakeMesh) -> Self {
        self.meshes.push(mesh);
        self
    }

    /// Append `count` meshes with ids `base, base + 1, ...`
    pub fn with_meshes(mut self, base: u32, count: u32) -> Self {
        self.meshes
            .extend((0..count).map(|i| FakeMesh::new(base + i).with_triangle()));
        self
    }
}

struct NativeModel {
    geometries: Vec<*mut FakeGeometry>,
}

struct StringRecord {
    len: usize,
    freed: bool,
}

#[derive(Default)]
struct FakeState {
    calls: Vec<Call>,
    files: HashMap<String, Vec<FakeGeometry>>,
    apis: Vec<*mut u8>,
    finalized: Vec<*mut u8>,
    models: Vec<*mut NativeModel>,
    geometries: Vec<*mut FakeGeometry>,
    strings: HashMap<usize, StringRecord>,
}

/// Handles of a model loaded outside of the safe wrappers
pub struct Fixture {
    pub api: ApiPtr,
    pub model: ModelPtr,
    pub geometries: Vec<GeometryPtr>,
}

#[derive(Default)]
pub struct FakeLibrary {
    state: Mutex<FakeState>,
}

impl FakeLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `path` loadable through `load_model`
    pub fn register_file(&self, path: &str, geometries: Vec<FakeGeometry>) {
        self.state.lock().files.insert(path.to_string(), geometries);
    }

    /// Initialize an engine and load `geometries` without recording calls
    pub fn fixture(&self, geometries: Vec<FakeGeometry>) -> Fixture {
        let mut state = self.state.lock();
        let api = Box::into_raw(Box::new(0u8));
        state.apis.push(api);
        let model = Self::build_model(&mut state, geometries);
        // SAFETY: just allocated above
        let geometries = unsafe { &(*model).geometries }
            .iter()
            .map(|&g| GeometryPtr::from_raw(g as *mut RawGeometry))
            .collect();
        Fixture {
            api: ApiPtr::from_raw(api as *mut RawApi),
            model: ModelPtr::from_raw(model as *mut RawModel),
            geometries,
        }
    }

    /// Allocate a string the way `GetGuid` does
    pub fn alloc_string(&self, text: &str) -> *const c_char {
        self.alloc_bytes(text.as_bytes())
    }

    pub fn alloc_bytes(&self, bytes: &[u8]) -> *const c_char {
        Self::track_string(&mut self.state.lock(), bytes)
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().calls.clone()
    }

    pub fn count_calls(&self, call: &Call) -> usize {
        self.state.lock().calls.iter().filter(|c| *c == call).count()
    }

    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }

    /// Indices passed to `GetMesh`, in call order
    pub fn mesh_fetches(&self) -> Vec<i32> {
        self.state
            .lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                Call::Mesh(i) => Some(*i),
                _ => None,
            })
            .collect()
    }

    pub fn strings_allocated(&self) -> usize {
        self.state.lock().strings.len()
    }

    pub fn strings_freed(&self) -> usize {
        self.state.lock().strings.values().filter(|s| s.freed).count()
    }

    pub fn outstanding_strings(&self) -> usize {
        self.strings_allocated() - self.strings_freed()
    }

    pub fn is_freed(&self, ptr: *const c_char) -> bool {
        self.state
            .lock()
            .strings
            .get(&(ptr as usize))
            .is_some_and(|s| s.freed)
    }

    /// Raw bytes behind a tracked string, poisoned once freed
    pub fn raw_bytes(&self, ptr: *const c_char) -> Vec<u8> {
        let state = self.state.lock();
        let record = state
            .strings
            .get(&(ptr as usize))
            .unwrap_or_else(|| panic!("unknown native string {ptr:p}"));
        // SAFETY: tracked buffers stay allocated until the fake drops
        unsafe { std::slice::from_raw_parts(ptr as *const u8, record.len) }.to_vec()
    }

    pub fn live_apis(&self) -> usize {
        let state = self.state.lock();
        state.apis.len() - state.finalized.len()
    }

    pub fn finalized_apis(&self) -> usize {
        self.state.lock().finalized.len()
    }

    fn record(&self, call: Call) {
        self.state.lock().calls.push(call);
    }

    fn track_string(state: &mut FakeState, bytes: &[u8]) -> *const c_char {
        let len = bytes.len();
        let owned = CString::new(bytes).unwrap_or_else(|e| panic!("interior NUL: {e}"));
        let ptr = owned.into_raw() as *const c_char;
        state
            .strings
            .insert(ptr as usize, StringRecord { len, freed: false });
        ptr
    }

    fn build_model(state: &mut FakeState, geometries: Vec<FakeGeometry>) -> *mut NativeModel {
        let geometries: Vec<*mut FakeGeometry> = geometries
            .into_iter()
            .map(|g| Box::into_raw(Box::new(g)))
            .collect();
        state.geometries.extend_from_slice(&geometries);
        let model = Box::into_raw(Box::new(NativeModel { geometries }));
        state.models.push(model);
        model
    }

    unsafe fn geometry<'a>(geometry: GeometryPtr) -> &'a FakeGeometry {
        assert!(!geometry.is_null(), "fake engine dereferenced a null geometry");
        &*(geometry.as_raw() as *const FakeGeometry)
    }

    unsafe fn model<'a>(model: ModelPtr) -> &'a NativeModel {
        assert!(!model.is_null(), "fake engine dereferenced a null model");
        &*(model.as_raw() as *const NativeModel)
    }

    unsafe fn mesh_ref<'a>(mesh: MeshPtr) -> &'a FakeMesh {
        assert!(!mesh.is_null(), "fake engine dereferenced a null mesh");
        &*(mesh.as_raw() as *const FakeMesh)
    }

    fn optional_string(&self, text: Option<&str>) -> *const c_char {
        match text {
            Some(text) => self.alloc_string(text),
            None => std::ptr::null(),
        }
    }
}

impl NativeLibrary for FakeLibrary {
    unsafe fn initialize_api(&self) -> ApiPtr {
        let mut state = self.state.lock();
        state.calls.push(Call::InitializeApi);
        let api = Box::into_raw(Box::new(0u8));
        state.apis.push(api);
        ApiPtr::from_raw(api as *mut RawApi)
    }

    unsafe fn finalize_api(&self, api: ApiPtr) {
        let mut state = self.state.lock();
        state.calls.push(Call::FinalizeApi);
        let raw = api.as_raw() as *mut u8;
        assert!(state.apis.contains(&raw), "finalizing unknown engine {api:?}");
        assert!(!state.finalized.contains(&raw), "engine {api:?} finalized twice");
        state.finalized.push(raw);
    }

    unsafe fn load_model(&self, api: ApiPtr, file_name: *const c_char) -> ModelPtr {
        assert!(!api.is_null(), "fake engine dereferenced a null engine");
        let path = CStr::from_ptr(file_name).to_string_lossy().into_owned();
        let mut state = self.state.lock();
        state.calls.push(Call::LoadModel(path.clone()));
        let registered = state.files.get(&path).cloned();
        match registered {
            Some(geometries) => {
                ModelPtr::from_raw(Self::build_model(&mut state, geometries) as *mut RawModel)
            }
            None => ModelPtr::null(),
        }
    }

    unsafe fn num_geometries(&self, _api: ApiPtr, model: ModelPtr) -> i32 {
        self.record(Call::NumGeometries);
        Self::model(model).geometries.len() as i32
    }

    unsafe fn geometry_from_index(&self, _api: ApiPtr, model: ModelPtr, index: i32) -> GeometryPtr {
        self.record(Call::GeometryFromIndex(index));
        let geometry = Self::model(model).geometries[index as usize];
        GeometryPtr::from_raw(geometry as *mut RawGeometry)
    }

    unsafe fn geometry_from_id(&self, _api: ApiPtr, model: ModelPtr, id: u32) -> GeometryPtr {
        self.record(Call::GeometryFromId(id));
        Self::model(model)
            .geometries
            .iter()
            .find(|&&g| (*g).express_id == id)
            .map_or(GeometryPtr::null(), |&g| {
                GeometryPtr::from_raw(g as *mut RawGeometry)
            })
    }

    unsafe fn geometry_id(&self, _api: ApiPtr, geometry: GeometryPtr) -> u32 {
        self.record(Call::GeometryId);
        Self::geometry(geometry).express_id
    }

    unsafe fn geometry_mesh_id(&self, _api: ApiPtr, geometry: GeometryPtr) -> u32 {
        self.record(Call::GeometryMeshId);
        if geometry.is_null() {
            return 0;
        }
        Self::geometry(geometry).mesh_id
    }

    unsafe fn num_meshes(&self, _api: ApiPtr, geometry: GeometryPtr) -> i32 {
        self.record(Call::NumMeshes);
        if geometry.is_null() {
            return 0;
        }
        Self::geometry(geometry).meshes.len() as i32
    }

    unsafe fn mesh(&self, _api: ApiPtr, geometry: GeometryPtr, index: i32) -> MeshPtr {
        self.record(Call::Mesh(index));
        let mesh = &Self::geometry(geometry).meshes[index as usize];
        MeshPtr::from_raw(mesh as *const FakeMesh as *mut RawMesh)
    }

    unsafe fn mesh_id(&self, _api: ApiPtr, mesh: MeshPtr) -> u32 {
        self.record(Call::MeshId);
        Self::mesh_ref(mesh).id
    }

    unsafe fn mesh_transform(&self, _api: ApiPtr, mesh: MeshPtr) -> *const f64 {
        self.record(Call::Transform);
        Self::mesh_ref(mesh).transform.as_ptr()
    }

    unsafe fn mesh_color(&self, _api: ApiPtr, mesh: MeshPtr) -> *const Color {
        self.record(Call::Color);
        &Self::mesh_ref(mesh).color
    }

    unsafe fn num_vertices(&self, _api: ApiPtr, mesh: MeshPtr) -> i32 {
        self.record(Call::NumVertices);
        Self::mesh_ref(mesh).vertices.len() as i32
    }

    unsafe fn vertices(&self, _api: ApiPtr, mesh: MeshPtr) -> *const Vertex {
        self.record(Call::Vertices);
        Self::mesh_ref(mesh).vertices.as_ptr()
    }

    unsafe fn num_indices(&self, _api: ApiPtr, mesh: MeshPtr) -> i32 {
        self.record(Call::NumIndices);
        Self::mesh_ref(mesh).indices.len() as i32
    }

    unsafe fn indices(&self, _api: ApiPtr, mesh: MeshPtr) -> *const u32 {
        self.record(Call::Indices);
        Self::mesh_ref(mesh).indices.as_ptr()
    }

    unsafe fn guid(&self, _model: ModelPtr, geometry: GeometryPtr) -> *const c_char {
        self.record(Call::Guid);
        self.optional_string(Self::geometry(geometry).guid.as_deref())
    }

    unsafe fn entity_type(&self, _model: ModelPtr, geometry: GeometryPtr) -> *const c_char {
        self.record(Call::EntityType);
        self.optional_string(Self::geometry(geometry).entity_type.as_deref())
    }

    unsafe fn entity_type_id(&self, _model: ModelPtr, geometry: GeometryPtr) -> u32 {
        self.record(Call::EntityTypeId);
        Self::geometry(geometry).entity_type_id
    }

    unsafe fn entity_label(&self, _model: ModelPtr, geometry: GeometryPtr) -> u32 {
        self.record(Call::EntityLabel);
        Self::geometry(geometry).entity_label
    }

    unsafe fn free_string(&self, ptr: *const c_char) {
        let mut state = self.state.lock();
        state.calls.push(Call::FreeString);
        let record = state
            .strings
            .get_mut(&(ptr as usize))
            .unwrap_or_else(|| panic!("freeing unknown native string {ptr:p}"));
        assert!(!record.freed, "native string {ptr:p} freed twice");
        record.freed = true;
        std::ptr::write_bytes(ptr as *mut u8, POISON, record.len);
    }
}

impl Drop for FakeLibrary {
    fn drop(&mut self) {
        let state = self.state.get_mut();
        // SAFETY: every pointer below was produced by `Box::into_raw` or
        // `CString::into_raw` in this module and is released once here.
        unsafe {
            for &ptr in state.strings.keys() {
                drop(CString::from_raw(ptr as *mut c_char));
            }
            for &geometry in &state.geometries {
                drop(Box::from_raw(geometry));
            }
            for &model in &state.models {
                drop(Box::from_raw(model));
            }
            for &api in &state.apis {
                drop(Box::from_raw(api));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_poisons_buffer() {
        let lib = FakeLibrary::new();
        let ptr = lib.alloc_string("IFCDOOR");

        unsafe { lib.free_string(ptr) };

        assert!(lib.is_freed(ptr));
        assert_eq!(lib.raw_bytes(ptr), vec![POISON; 7]);
    }

    #[test]
    #[should_panic(expected = "freed twice")]
    fn test_double_free_panics() {
        let lib = FakeLibrary::new();
        let ptr = lib.alloc_string("IFCDOOR");
        unsafe {
            lib.free_string(ptr);
            lib.free_string(ptr);
        }
    }
}
