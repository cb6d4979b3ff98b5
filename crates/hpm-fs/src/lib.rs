//! Filesystem abstraction for the Houdini package manager
//!
//! Provides slash-normalized paths and safe JSON I/O operations.

pub mod error;
pub mod io;
pub mod json;
pub mod path;

pub use error::{Error, Result};
pub use json::{JsonStore, to_pretty_string};
pub use path::NormalizedPath;
