// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Engine and model lifecycle

use crate::GeometryHandle;
use ifc_loader_model::{ApiPtr, LoaderError, ModelPtr, NativeLibrary, Result};
use std::ffi::CString;
use std::fmt;
use std::iter::FusedIterator;
use std::path::{Path, PathBuf};

/// An initialized native engine
///
/// Finalized exactly once, on drop. Everything handed out by the engine
/// (models, geometries, meshes, vertex buffers) borrows the `Api` and cannot
/// outlive it.
pub struct Api<L: NativeLibrary> {
    lib: L,
    api: ApiPtr,
}

impl<L: NativeLibrary> Api<L> {
    /// Start an engine instance through `InitializeApi`
    pub fn new(lib: L) -> Result<Self> {
        // SAFETY: no preconditions, the result is finalized in `Drop`
        let api = unsafe { lib.initialize_api() };
        if api.is_null() {
            return Err(LoaderError::ApiInitFailed);
        }
        log::debug!("Initialized native engine {api:?}");
        Ok(Self { lib, api })
    }

    pub fn library(&self) -> &L {
        &self.lib
    }

    /// Raw engine handle, valid while `self` is alive
    pub fn as_ptr(&self) -> ApiPtr {
        self.api
    }

    /// Parse an IFC file and precompute its geometry
    pub fn load_model(&self, path: impl AsRef<Path>) -> Result<Model<'_, L>> {
        let path = path.as_ref();
        let file_name = path_to_cstring(path)?;

        let start = std::time::Instant::now();
        // SAFETY: live engine, NUL-terminated file name
        let model = unsafe { self.lib.load_model(self.api, file_name.as_ptr()) };
        if model.is_null() {
            return Err(LoaderError::model_load_failed(path));
        }

        let model = Model {
            api: self,
            model,
            path: path.to_path_buf(),
        };
        log::info!(
            "Loaded {:?}: {} geometries in {} ms",
            path,
            model.num_geometries(),
            start.elapsed().as_millis()
        );
        Ok(model)
    }
}

impl<L: NativeLibrary> Drop for Api<L> {
    fn drop(&mut self) {
        log::debug!("Finalizing native engine {:?}", self.api);
        // SAFETY: initialized in `new`, and no borrow of `self` survives
        unsafe { self.lib.finalize_api(self.api) };
    }
}

impl<L: NativeLibrary> fmt::Debug for Api<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Api").field("api", &self.api).finish()
    }
}

/// The native loader takes a narrow C string
fn path_to_cstring(path: &Path) -> Result<CString> {
    let text = path
        .to_str()
        .ok_or_else(|| LoaderError::invalid_path(path, "path is not valid UTF-8"))?;
    CString::new(text).map_err(|e| LoaderError::invalid_path(path, e.to_string()))
}

/// A model loaded by an [`Api`]
///
/// The engine exports no call to unload a single model; it is released
/// together with the engine.
pub struct Model<'a, L: NativeLibrary> {
    api: &'a Api<L>,
    model: ModelPtr,
    path: PathBuf,
}

impl<'a, L: NativeLibrary> Model<'a, L> {
    /// Raw model handle
    pub fn as_ptr(&self) -> ModelPtr {
        self.model
    }

    /// File the model was loaded from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of elements with geometry
    pub fn num_geometries(&self) -> usize {
        // SAFETY: live engine and model
        let count = unsafe { self.api.lib.num_geometries(self.api.api, self.model) };
        usize::try_from(count).unwrap_or(0)
    }

    /// Geometry at `index`, in the engine's element order
    pub fn geometry(&self, index: usize) -> Option<GeometryHandle<'a, L>> {
        if index >= self.num_geometries() {
            return None;
        }
        Some(self.geometry_at(index))
    }

    /// Geometry of the element with express id `express_id`
    pub fn geometry_by_id(&self, express_id: u32) -> Option<GeometryHandle<'a, L>> {
        let lib = &self.api.lib;
        // SAFETY: live engine and model
        let geometry = unsafe { lib.geometry_from_id(self.api.api, self.model, express_id) };
        if geometry.is_null() {
            log::trace!("No geometry for #{express_id}");
            return None;
        }
        // SAFETY: geometry owned by this model
        Some(unsafe { GeometryHandle::new(lib, self.api.api, geometry, self.model) })
    }

    /// Express id of the element owning `geometry`, 0 for a null geometry
    pub fn geometry_id(&self, geometry: &GeometryHandle<'a, L>) -> u32 {
        if geometry.is_null() {
            return 0;
        }
        // SAFETY: non-null geometry created against this engine
        unsafe { self.api.lib.geometry_id(self.api.api, geometry.geometry()) }
    }

    /// Iterate all geometries, resolving each one when reached
    pub fn geometries(&self) -> Geometries<'_, 'a, L> {
        Geometries {
            model: self,
            index: 0,
            len: self.num_geometries(),
        }
    }

    fn geometry_at(&self, index: usize) -> GeometryHandle<'a, L> {
        log::trace!("Fetching geometry {index} of {:?}", self.path);
        let lib = &self.api.lib;
        // SAFETY: index below `num_geometries`, geometry owned by this model
        unsafe {
            let geometry = lib.geometry_from_index(self.api.api, self.model, index as i32);
            GeometryHandle::new(lib, self.api.api, geometry, self.model)
        }
    }
}

impl<L: NativeLibrary> fmt::Debug for Model<'_, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("model", &self.model)
            .field("path", &self.path)
            .finish()
    }
}

/// Lazy iterator over the geometries of a [`Model`]
pub struct Geometries<'m, 'a, L: NativeLibrary> {
    model: &'m Model<'a, L>,
    index: usize,
    len: usize,
}

impl<'a, L: NativeLibrary> Iterator for Geometries<'_, 'a, L> {
    type Item = GeometryHandle<'a, L>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.len {
            return None;
        }
        let geometry = self.model.geometry_at(self.index);
        self.index += 1;
        Some(geometry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len - self.index;
        (remaining, Some(remaining))
    }
}

impl<L: NativeLibrary> ExactSizeIterator for Geometries<'_, '_, L> {}

impl<L: NativeLibrary> FusedIterator for Geometries<'_, '_, L> {}
