// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC Loader Model - Boundary contract and shared types for the native engine
//!
//! This crate describes the C ABI surface of the web-ifc wrapper DLL without
//! linking against it. Safe wrappers are written against the
//! [`NativeLibrary`] trait, so they can run on top of the real library or on
//! top of an in-process fake.
//!
//! # Architecture
//!
//! - [`handles`] - Non-owning opaque pointer types (`ApiPtr`, `ModelPtr`, ...)
//! - [`types`] - `#[repr(C)]` mirrors of native structs and owned value types
//! - [`native`] - The [`NativeLibrary`] trait, one method per exported call
//! - [`error`] - Errors raised by the owning wrappers
//!
//! # Example
//!
//! ```ignore
//! use ifc_loader_model::{ApiPtr, GeometryPtr, NativeLibrary};
//!
//! fn mesh_count(lib: &impl NativeLibrary, api: ApiPtr, geom: GeometryPtr) -> i32 {
//!     unsafe { lib.num_meshes(api, geom) }
//! }
//! ```

pub mod error;
pub mod handles;
pub mod native;
pub mod types;

// Re-export all public types
pub use error::*;
pub use handles::*;
pub use native::*;
pub use types::*;
