//! All package configs of one Houdini installation

use std::collections::{BTreeMap, BTreeSet};
use std::fs;

use hpm_fs::NormalizedPath;

use crate::host::HostEnvironment;
use crate::record::PackageRecord;
use crate::{Error, Result};

/// The package records found in a packages directory, keyed by name.
#[derive(Debug)]
pub struct PackageCollection {
    packages_dir: NormalizedPath,
    host_paths: BTreeSet<NormalizedPath>,
    packages: BTreeMap<String, PackageRecord>,
}

impl PackageCollection {
    /// Load every `*.json` file in `packages_dir`, creating the directory
    /// when it is missing.
    ///
    /// A config that cannot be read is logged and left out; one that reads
    /// but is broken is kept with warnings.
    pub fn scan(packages_dir: &NormalizedPath, host: &HostEnvironment) -> Result<Self> {
        let native = packages_dir.to_native();
        if !packages_dir.exists() {
            fs::create_dir_all(&native).map_err(|e| hpm_fs::Error::io(&native, e))?;
            tracing::debug!(path = %packages_dir, "Created missing packages folder");
        }
        if !packages_dir.is_dir() {
            return Err(Error::PackagesDirNotFound { path: native });
        }

        let host = host.clone().with_package_path(packages_dir);
        let host_paths = host.plugin_paths();

        let mut packages = BTreeMap::new();
        for config_path in config_files(packages_dir)? {
            match PackageRecord::load(&config_path, host.vars(), &host_paths) {
                Ok(record) => {
                    packages.insert(record.name().to_string(), record);
                }
                Err(e) => {
                    tracing::warn!(path = %config_path, error = %e, "Skipping unreadable package config");
                }
            }
        }

        tracing::debug!(
            path = %packages_dir,
            packages = packages.len(),
            host_paths = host_paths.len(),
            "Scanned packages"
        );

        Ok(Self {
            packages_dir: packages_dir.clone(),
            host_paths,
            packages,
        })
    }

    pub fn packages_dir(&self) -> &NormalizedPath {
        &self.packages_dir
    }

    /// Plugin directories the host reported, used to validate every record.
    pub fn host_paths(&self) -> &BTreeSet<NormalizedPath> {
        &self.host_paths
    }

    pub fn get(&self, name: &str) -> Option<&PackageRecord> {
        self.packages.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut PackageRecord> {
        self.packages.get_mut(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.packages.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PackageRecord> {
        self.packages.values()
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

/// `*.json` files directly inside `dir`, sorted by path.
fn config_files(dir: &NormalizedPath) -> Result<Vec<NormalizedPath>> {
    let native = dir.to_native();
    let entries = fs::read_dir(&native).map_err(|e| hpm_fs::Error::io(&native, e))?;

    let mut files: Vec<NormalizedPath> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| NormalizedPath::new(entry.path()))
        .filter(|path| path.is_file() && path.extension() == Some("json"))
        .collect();
    files.sort();
    Ok(files)
}
