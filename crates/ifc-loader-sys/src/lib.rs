// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC Loader Sys - Raw bindings to the web-ifc wrapper DLL
//!
//! The DLL wraps the web-ifc `ModelManager` behind a flat C ABI: an engine
//! instance (`Api*`) loads models, a model owns one `Geometry*` per IFC
//! element, and each geometry owns its placed `Mesh*` list. All objects stay
//! owned by the engine; only the strings returned by `GetGuid` and
//! `GetEntityType` are handed to the caller and must go back through
//! `FreeString`.
//!
//! # Linking
//!
//! Enable the `native` feature to link. `build.rs` reads:
//!
//! - `WEB_IFC_LIB_DIR` - directory added to the native search path
//! - `WEB_IFC_LIB_NAME` - library name, `WebIfcDll` by default
//!
//! Without the feature the `extern` block and `WebIfcLibrary` are compiled
//! out, which keeps downstream crates testable against fakes on machines
//! without the DLL.
//!
//! The package's `links = "WebIfcDll"` key only names the native dependency
//! for cargo (one crate per build may claim it). The library actually linked
//! is whatever `WEB_IFC_LIB_NAME` selects.
//!
//! # Exported surface
//!
//! Only the symbols in [`EXPORTED_SYMBOLS`] are declared, since a missing
//! export fails the whole link. The element label has no export of its own
//! and is answered through `GetGeometryId`.

#[cfg(feature = "native")]
mod bindings;

#[cfg(feature = "native")]
pub use bindings::*;

/// Functions exported by the wrapper DLL's `extern "C"` block
pub const EXPORTED_SYMBOLS: &[&str] = &[
    "InitializeApi",
    "FinalizeApi",
    "LoadModel",
    "GetGeometryFromId",
    "GetNumGeometries",
    "GetGeometryFromIndex",
    "GetNumMeshes",
    "GetGeometryId",
    "GetMesh",
    "GetMeshId",
    "GetTransform",
    "GetColor",
    "GetNumVertices",
    "GetVertices",
    "GetNumIndices",
    "GetIndices",
    "GetGuid",
    "GetEntityType",
    "GetEntityTypeId",
    "FreeString",
];

pub use ifc_loader_model::{
    ApiPtr, Color, GeometryPtr, MeshPtr, ModelPtr, NativeLibrary, RawApi, RawGeometry, RawMesh,
    RawModel, Vertex,
};
