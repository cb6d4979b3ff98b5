//! Settings every command runs with
//!
//! Resolved once from the command line (and its environment fallbacks):
//! which host environment to use, where the packages live, where the tag
//! cache is and which API to ask.

use hpm_fs::NormalizedPath;
use hpm_package::{HostEnvironment, PackageCollection, PackageRecord};
use hpm_tags::TagCache;

use crate::cli::Cli;
use crate::error::{CliError, Result};

/// Resolved settings for one invocation.
#[derive(Debug)]
pub struct Context {
    pub host: HostEnvironment,
    pub packages_dir: NormalizedPath,
    pub cache: TagCache,
    pub api_url: String,
}

impl Context {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let host = match &cli.host_env {
            Some(path) => HostEnvironment::from_hconfig_file(&NormalizedPath::new(path))?,
            None => HostEnvironment::from_process_env(),
        };

        let packages_dir = match &cli.packages_dir {
            Some(dir) => NormalizedPath::new(dir),
            None => host.packages_dir().map_err(|_| {
                CliError::user(
                    "Cannot locate the packages directory: set HOUDINI_USER_PREF_DIR or pass --packages-dir",
                )
            })?,
        };

        let cache_path = match &cli.cache {
            Some(path) => NormalizedPath::new(path),
            None => TagCache::default_path().ok_or_else(|| {
                CliError::user("Cannot locate a data directory for the tag cache: pass --cache")
            })?,
        };

        tracing::debug!(
            packages_dir = %packages_dir,
            cache = %cache_path,
            api = %cli.api_url,
            "Resolved settings"
        );

        Ok(Self {
            host,
            packages_dir,
            cache: TagCache::new(cache_path),
            api_url: cli.api_url.clone(),
        })
    }

    /// Scan the packages directory.
    pub fn packages(&self) -> Result<PackageCollection> {
        Ok(PackageCollection::scan(&self.packages_dir, &self.host)?)
    }
}

/// Look a package up by name, with a hint listing the known names.
pub fn find_package<'a>(collection: &'a PackageCollection, name: &str) -> Result<&'a PackageRecord> {
    collection.get(name).ok_or_else(|| unknown_package(collection, name))
}

pub fn unknown_package(collection: &PackageCollection, name: &str) -> CliError {
    let known: Vec<&str> = collection.names().collect();
    if known.is_empty() {
        CliError::user(format!(
            "Unknown package '{name}': {} has no package configs",
            collection.packages_dir()
        ))
    } else {
        CliError::user(format!(
            "Unknown package '{name}'. Known packages: {}",
            known.join(", ")
        ))
    }
}
