//! Houdini package config loading and resolution
//!
//! A package is a JSON file in a Houdini `packages` directory that registers
//! one or more plugin directories. This crate turns such a file into a
//! [`PackageRecord`]:
//!
//! 1. [`flatten`] the document into ordered leaves
//! 2. [`resolve`] `$NAME` variable calls against the config's own
//!    declarations and the [`HostEnvironment`]
//! 3. [`extract`] the plugin paths the config claims and the host confirms
//!
//! Broken JSON is repaired where possible and circular variables stop
//! resolution; both end up as warnings on the record instead of errors.

pub mod collection;
pub mod error;
pub mod extract;
pub mod flatten;
pub mod host;
pub mod record;
pub mod repair;
pub mod resolver;
pub mod template;

pub use collection::PackageCollection;
pub use error::{Error, Result};
pub use extract::{extract, split_path_list};
pub use flatten::{FlattenedConfig, FlattenedEntry, Scalar, Segment, flatten};
pub use host::HostEnvironment;
pub use record::{PackageRecord, PackageState};
pub use resolver::{ResolutionFailure, resolve, resolve_with_env};
