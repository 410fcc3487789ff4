// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC Loader - Safe access to geometry computed by the web-ifc native engine
//!
//! The engine does all the IFC work (parsing, BRep/CSG evaluation,
//! triangulation). This crate marshals its opaque handles and C strings into
//! Rust values with lifetimes that keep every borrowed handle inside the
//! lifetime of the engine.
//!
//! # Features
//!
//! - **Owned metadata** - GUID and entity type are copied out of native
//!   memory and the native buffers are freed immediately
//! - **Lazy meshes** - [`GeometryHandle::meshes`] fetches each mesh when the
//!   iterator reaches it
//! - **Zero-copy buffers** - vertex and index arrays are borrowed from the
//!   engine
//! - **Pluggable backend** - everything is generic over
//!   [`NativeLibrary`]; enable the `native` feature for the real DLL
//!
//! # Example
//!
//! ```ignore
//! use ifc_loader::{Api, WebIfcLibrary};
//!
//! let api = Api::new(WebIfcLibrary)?;
//! let model = api.load_model("duplex.ifc")?;
//!
//! for geometry in model.geometries() {
//!     println!("{} {}", geometry.entity_type(), geometry.guid());
//!     for mesh in &geometry {
//!         println!("  mesh {} with {} triangles", mesh.id(), mesh.triangle_count());
//!     }
//! }
//! ```

mod api;
mod geometry;
mod mesh;
mod native_string;

#[cfg(test)]
mod testing;

pub use api::{Api, Geometries, Model};
pub use geometry::{GeometryHandle, Meshes};
pub use mesh::MeshHandle;
pub use native_string::NativeString;

pub use ifc_loader_model::{
    ApiPtr, Color, GeometryInfo, GeometryPtr, LoaderError, MeshData, MeshPtr, ModelPtr,
    NativeLibrary, Result, Vertex,
};

#[cfg(feature = "native")]
pub use ifc_loader_sys::WebIfcLibrary;
