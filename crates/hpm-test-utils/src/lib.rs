//! Shared test utilities for the houdini-package-manager workspace.
//!
//! Standardised fixtures used across crate test suites. Dev-dependency only,
//! never published.
//!
//! # Modules
//!
//! - [`git`]: git repository fixtures (empty, tagged history, remotes)
//! - [`packages`]: [`TestPackages`](packages::TestPackages) builder for a
//!   Houdini user preference directory with package configs and plugin folders

pub mod git;
pub mod packages;
