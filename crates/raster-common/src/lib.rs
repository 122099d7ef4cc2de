//! Shared types for the raster-catalog workspace.
//!
//! Provides the key-tuple value type used to address datasets and the
//! common error type shared between the store and its consumers.

pub mod error;
pub mod keys;

pub use error::{RasterError, RasterResult};
pub use keys::KeyTuple;
