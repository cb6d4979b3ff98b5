//! Command implementations for hpm-cli

pub mod create;
pub mod enable;
pub mod scan;
pub mod tags;

pub use create::run_create;
pub use enable::run_set_enable;
pub use scan::{run_scan, run_show};
pub use tags::{run_sync, run_tags};
