//! Error Types
//!
//! This module defines the error types used throughout the engine core.
//!
//! # Overview
//!
//! The main error type [`EngineError`] covers every failure mode of the
//! pools, registries and scene managers:
//! - Invalid inputs (empty slices, ranges outside live storage)
//! - Out-of-range or unknown ids
//! - Storage growth failures
//! - Operations that require a current selection when none is set
//!
//! Physics and creature operations treat a missing creature as a harmless
//! no-op rather than an error, so they rarely surface anything from here.
//!
//! # Usage
//!
//! All public APIs return [`Result<T>`] which is an alias for
//! `std::result::Result<T, EngineError>`.
//!
//! ```rust,ignore
//! use kestrel::errors::{EngineError, Result};
//!
//! fn select_player(engine: &mut Engine, id: u32) -> Result<()> {
//!     engine.creature_use(id)?;
//!     Ok(())
//! }
//! ```

use std::fmt;

use thiserror::Error;

/// Which "current selection" an operation was missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectionKind {
    Camera,
    Shader,
    Model,
    Texture,
    Light,
    Creature,
    Barrier,
}

impl fmt::Display for SelectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Camera => "camera",
            Self::Shader => "shader",
            Self::Model => "model",
            Self::Texture => "texture",
            Self::Light => "light",
            Self::Creature => "creature",
            Self::Barrier => "barrier",
        };
        f.write_str(name)
    }
}

/// The main error type for the engine core.
#[derive(Error, Debug)]
pub enum EngineError {
    // ========================================================================
    // Input Errors
    // ========================================================================
    /// A required input was empty, or a range did not lie within live storage.
    #[error("Invalid pointer: {0}")]
    InvalidPointer(&'static str),

    /// Out-of-range id, bad enum value, non-positive size, or a rejected
    /// configuration value.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    // ========================================================================
    // Storage Errors
    // ========================================================================
    /// Growing a pool's backing storage failed. The existing elements are
    /// left untouched.
    #[error("Allocation failed while reserving {requested} elements")]
    AllocationFailed {
        /// Total capacity that was being reserved
        requested: usize,
    },

    // ========================================================================
    // Registry Errors
    // ========================================================================
    /// The operation works on the current selection but nothing is selected.
    #[error("No current {0} is set")]
    NotSet(SelectionKind),

    /// No element with the given id lives in the registry.
    #[error("No {kind} with id {id}")]
    NotFound {
        /// Registry that was searched
        kind: SelectionKind,
        /// The id that was looked up
        id: u32,
    },

    // ========================================================================
    // Collaborator Errors
    // ========================================================================
    /// The render backend rejected a request.
    #[error("Render backend error: {0}")]
    Backend(String),

    /// Settings could not be parsed.
    #[error("Config parse error: {0}")]
    Config(#[from] serde_json::Error),
}

impl EngineError {
    /// Shorthand for [`EngineError::InvalidParameter`].
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidParameter(message.into())
    }
}

/// Alias for `Result<T, EngineError>`.
pub type Result<T> = std::result::Result<T, EngineError>;
