// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Opaque native handles
//!
//! Every object the engine hands out (engine instance, model, geometry, mesh)
//! is an address owned by the native side. The wrappers in this module never
//! dereference those addresses and never free them; they only carry them
//! back across the boundary.

use std::fmt;
use std::marker::{PhantomData, PhantomPinned};

macro_rules! opaque_handle {
    ($(#[$doc:meta])* $handle:ident => $raw:ident) => {
        /// Native object behind the handle; never constructed on the Rust side.
        #[repr(C)]
        pub struct $raw {
            _data: [u8; 0],
            _marker: PhantomData<(*mut u8, PhantomPinned)>,
        }

        $(#[$doc])*
        #[repr(transparent)]
        #[derive(Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $handle(*mut $raw);

        impl $handle {
            /// Null sentinel
            pub const fn null() -> Self {
                Self(std::ptr::null_mut())
            }

            /// Wrap a raw pointer received from the native library
            pub const fn from_raw(ptr: *mut $raw) -> Self {
                Self(ptr)
            }

            /// Raw pointer to pass back across the boundary
            pub const fn as_raw(self) -> *mut $raw {
                self.0
            }

            /// Check for the null sentinel
            pub fn is_null(self) -> bool {
                self.0.is_null()
            }
        }

        impl Default for $handle {
            fn default() -> Self {
                Self::null()
            }
        }

        impl fmt::Debug for $handle {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({:p})", stringify!($handle), self.0)
            }
        }
    };
}

opaque_handle!(
    /// Handle to a native engine instance (`Api*`)
    ApiPtr => RawApi
);

opaque_handle!(
    /// Handle to a model loaded by the engine (`Model*`)
    ModelPtr => RawModel
);

opaque_handle!(
    /// Handle to the geometry of one IFC element (`Geometry*`)
    GeometryPtr => RawGeometry
);

opaque_handle!(
    /// Handle to one placed mesh of a geometry (`Mesh*`)
    MeshPtr => RawMesh
);
