// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geometry of one IFC element and lazy access to its meshes

use crate::{MeshHandle, NativeString};
use ifc_loader_model::{ApiPtr, GeometryInfo, GeometryPtr, ModelPtr, NativeLibrary};
use std::fmt;
use std::iter::FusedIterator;

/// Metadata snapshot of a native geometry object
///
/// All fields are resolved once, at construction, and never change. The
/// engine keeps ownership of the geometry; dropping the handle frees nothing
/// native.
pub struct GeometryHandle<'a, L: NativeLibrary + ?Sized> {
    lib: &'a L,
    api: ApiPtr,
    geometry: GeometryPtr,
    id: u32,
    mesh_count: i32,
    guid: String,
    entity_type: String,
    entity_type_id: u32,
    entity_label: u32,
}

impl<'a, L: NativeLibrary + ?Sized> GeometryHandle<'a, L> {
    /// Resolve the metadata of `geometry`
    ///
    /// A null `geometry` still queries the id and mesh count, then falls back
    /// to empty strings and zero ids without touching `model`.
    ///
    /// # Safety
    ///
    /// `api` must be a live engine of `lib`, and `model` the model that owns
    /// `geometry`. The engine must outlive `'a`.
    pub unsafe fn new(lib: &'a L, api: ApiPtr, geometry: GeometryPtr, model: ModelPtr) -> Self {
        let id = lib.geometry_mesh_id(api, geometry);
        let mesh_count = lib.num_meshes(api, geometry);

        if geometry.is_null() {
            log::debug!("Null geometry handle, entity metadata left empty (id {id})");
            return Self {
                lib,
                api,
                geometry,
                id,
                mesh_count,
                guid: String::new(),
                entity_type: String::new(),
                entity_type_id: 0,
                entity_label: 0,
            };
        }

        let guid = NativeString::copy_and_free(lib, lib.guid(model, geometry));
        let entity_type = NativeString::copy_and_free(lib, lib.entity_type(model, geometry));
        let entity_type_id = lib.entity_type_id(model, geometry);
        let entity_label = lib.entity_label(model, geometry);

        Self {
            lib,
            api,
            geometry,
            id,
            mesh_count,
            guid,
            entity_type,
            entity_type_id,
            entity_label,
        }
    }

    /// Engine instance the geometry belongs to
    pub fn engine(&self) -> ApiPtr {
        self.api
    }

    /// Raw geometry handle
    pub fn geometry(&self) -> GeometryPtr {
        self.geometry
    }

    /// Check for a geometry built from the null sentinel
    pub fn is_null(&self) -> bool {
        self.geometry.is_null()
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    /// IFC GlobalId, empty if the engine could not resolve one
    pub fn guid(&self) -> &str {
        &self.guid
    }

    /// IFC entity type name, e.g. `IFCWALL`
    pub fn entity_type(&self) -> &str {
        &self.entity_type
    }

    pub fn entity_type_id(&self) -> u32 {
        self.entity_type_id
    }

    /// Express id (`#N`) of the element
    pub fn entity_label(&self) -> u32 {
        self.entity_label
    }

    /// Mesh count reported by the engine at construction
    pub fn num_meshes(&self) -> i32 {
        self.mesh_count
    }

    /// Fetch mesh `index` from the engine
    ///
    /// # Panics
    ///
    /// Panics if `index` is not below [`GeometryHandle::num_meshes`].
    pub fn mesh(&self, index: usize) -> MeshHandle<'a, L> {
        assert!(
            index < self.len(),
            "mesh index out of bounds: the len is {} but the index is {}",
            self.len(),
            index
        );
        // SAFETY: range checked above, handles valid per `new`
        unsafe { self.mesh_unchecked(index) }
    }

    /// Fetch mesh `index` without a range check, straight through `GetMesh`
    ///
    /// # Safety
    ///
    /// `index` must be below [`GeometryHandle::num_meshes`]; the engine does
    /// not check it either. That bound also keeps it within `i32`, the
    /// native index type; larger values are not representable.
    pub unsafe fn mesh_unchecked(&self, index: usize) -> MeshHandle<'a, L> {
        debug_assert!(
            i32::try_from(index).is_ok(),
            "mesh index {index} does not fit the native index type"
        );
        log::trace!("Fetching mesh {index} of geometry {}", self.id);
        let mesh = self.lib.mesh(self.api, self.geometry, index as i32);
        MeshHandle::new(self.lib, self.api, mesh)
    }

    /// Iterate the meshes in index order, fetching each one when reached
    ///
    /// Every call starts a new traversal from index 0.
    pub fn meshes(&self) -> Meshes<'_, 'a, L> {
        Meshes {
            geometry: self,
            front: 0,
            back: self.len(),
        }
    }

    /// Owned copy of the resolved metadata
    pub fn info(&self) -> GeometryInfo {
        GeometryInfo {
            id: self.id,
            mesh_count: self.mesh_count,
            guid: self.guid.clone(),
            entity_type: self.entity_type.clone(),
            entity_type_id: self.entity_type_id,
            entity_label: self.entity_label,
        }
    }

    /// Mesh count as an index bound; a negative native count means none
    fn len(&self) -> usize {
        usize::try_from(self.mesh_count).unwrap_or(0)
    }
}

impl<L: NativeLibrary + ?Sized> fmt::Debug for GeometryHandle<'_, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeometryHandle")
            .field("geometry", &self.geometry)
            .field("id", &self.id)
            .field("mesh_count", &self.mesh_count)
            .field("guid", &self.guid)
            .field("entity_type", &self.entity_type)
            .field("entity_type_id", &self.entity_type_id)
            .field("entity_label", &self.entity_label)
            .finish()
    }
}

impl<'g, 'a, L: NativeLibrary + ?Sized> IntoIterator for &'g GeometryHandle<'a, L> {
    type Item = MeshHandle<'a, L>;
    type IntoIter = Meshes<'g, 'a, L>;

    fn into_iter(self) -> Self::IntoIter {
        self.meshes()
    }
}

/// Lazy iterator over the meshes of a [`GeometryHandle`]
pub struct Meshes<'g, 'a, L: NativeLibrary + ?Sized> {
    geometry: &'g GeometryHandle<'a, L>,
    front: usize,
    back: usize,
}

impl<'a, L: NativeLibrary + ?Sized> Iterator for Meshes<'_, 'a, L> {
    type Item = MeshHandle<'a, L>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        let index = self.front;
        self.front += 1;
        // SAFETY: index below the cached mesh count
        Some(unsafe { self.geometry.mesh_unchecked(index) })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl<L: NativeLibrary + ?Sized> DoubleEndedIterator for Meshes<'_, '_, L> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        // SAFETY: index below the cached mesh count
        Some(unsafe { self.geometry.mesh_unchecked(self.back) })
    }
}

impl<L: NativeLibrary + ?Sized> ExactSizeIterator for Meshes<'_, '_, L> {}

impl<L: NativeLibrary + ?Sized> FusedIterator for Meshes<'_, '_, L> {}
