//! Git inspection for the Houdini package manager
//!
//! Only two facts are read from a plugin's local clone: the URL of its
//! remote repository and the most recent tag reachable from HEAD.

pub mod error;
pub mod identity;
pub mod local;
pub mod project;

pub use error::{Error, Result};
pub use identity::RepoIdentity;
pub use local::LocalRepo;
pub use project::GitProject;
