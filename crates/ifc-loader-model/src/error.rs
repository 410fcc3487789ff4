// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for engine and model lifecycle operations

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for loader operations
pub type Result<T> = std::result::Result<T, LoaderError>;

/// Errors that can occur while driving the native engine
///
/// Geometry metadata lookups never fail; only the owning wrappers around
/// engine startup and model loading report errors.
#[derive(Error, Debug)]
pub enum LoaderError {
    /// `InitializeApi` returned a null engine
    #[error("Native engine failed to initialize")]
    ApiInitFailed,

    /// Path cannot be passed to the native loader as a C string
    #[error("Invalid model path {path:?}: {reason}")]
    InvalidPath { path: PathBuf, reason: String },

    /// `LoadModel` returned a null model
    #[error("Native engine failed to load model from {path:?}")]
    ModelLoadFailed { path: PathBuf },
}

impl LoaderError {
    /// Create a new invalid path error
    pub fn invalid_path(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        LoaderError::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a new model load error
    pub fn model_load_failed(path: impl Into<PathBuf>) -> Self {
        LoaderError::ModelLoadFailed { path: path.into() }
    }
}
