// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scoped ownership of strings allocated by the native engine

use ifc_loader_model::NativeLibrary;
use std::borrow::Cow;
use std::ffi::CStr;
use std::os::raw::c_char;

/// A C string allocated on the engine heap
///
/// The buffer is released through [`NativeLibrary::free_string`] exactly once,
/// when the guard drops. That includes unwinding out of a copy. A null
/// pointer owns nothing: it reads as an empty string and is never freed.
pub struct NativeString<'a, L: NativeLibrary + ?Sized> {
    lib: &'a L,
    ptr: *const c_char,
}

impl<'a, L: NativeLibrary + ?Sized> NativeString<'a, L> {
    /// Take ownership of a string returned by the engine
    ///
    /// # Safety
    ///
    /// `ptr` must be null or a NUL-terminated buffer returned by `lib` that
    /// must be released with `lib.free_string` and has not been freed yet.
    pub unsafe fn acquire(lib: &'a L, ptr: *const c_char) -> Self {
        Self { lib, ptr }
    }

    /// Check whether the engine returned no string
    pub fn is_null(&self) -> bool {
        self.ptr.is_null()
    }

    /// Borrow the native bytes, without the trailing NUL
    pub fn as_bytes(&self) -> &[u8] {
        if self.ptr.is_null() {
            return &[];
        }
        // SAFETY: non-null and NUL-terminated per `acquire`, and the buffer
        // stays alive until `self` drops.
        unsafe { CStr::from_ptr(self.ptr) }.to_bytes()
    }

    /// Decode the native bytes, replacing invalid UTF-8
    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        let text = String::from_utf8_lossy(self.as_bytes());
        if let Cow::Owned(_) = text {
            log::warn!("Native string is not valid UTF-8, replaced invalid bytes: {text:?}");
        }
        text
    }

    /// Copy into an owned string and release the native buffer
    pub fn into_string(self) -> String {
        self.to_string_lossy().into_owned()
    }

    /// Copy the string at `ptr` and free it right away
    ///
    /// # Safety
    ///
    /// Same contract as [`NativeString::acquire`].
    pub unsafe fn copy_and_free(lib: &'a L, ptr: *const c_char) -> String {
        Self::acquire(lib, ptr).into_string()
    }
}

impl<L: NativeLibrary + ?Sized> Drop for NativeString<'_, L> {
    fn drop(&mut self) {
        if self.ptr.is_null() {
            return;
        }
        // SAFETY: `acquire` transferred ownership of the buffer to us and
        // nothing reads it past this point.
        unsafe { self.lib.free_string(self.ptr) };
    }
}
