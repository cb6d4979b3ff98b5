//! Houdini environment as reported by the host
//!
//! The variables come either from the process environment of a Houdini
//! shell or from a captured `hconfig` dump (`NAME := 'value'` lines).

use std::collections::{BTreeMap, BTreeSet};

use hpm_fs::{NormalizedPath, io};

use crate::extract::split_path_list;
use crate::{Error, Result};

pub const HOUDINI_PATH: &str = "HOUDINI_PATH";
pub const HOUDINI_USER_PREF_DIR: &str = "HOUDINI_USER_PREF_DIR";
pub const HOUDINI_PACKAGE_PATH: &str = "HOUDINI_PACKAGE_PATH";

const HCONFIG_SEPARATOR: &str = " := ";

/// Environment variables of one Houdini installation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostEnvironment {
    vars: BTreeMap<String, String>,
}

impl HostEnvironment {
    pub fn new(vars: BTreeMap<String, String>) -> Self {
        Self { vars }
    }

    /// Variables of the current process.
    pub fn from_process_env() -> Self {
        Self::new(std::env::vars().collect())
    }

    /// Parse `hconfig` output. Lines without ` := ` are ignored and one pair
    /// of surrounding quotes is stripped from each value.
    pub fn parse_hconfig(text: &str) -> Self {
        let vars = text
            .lines()
            .filter_map(|line| line.split_once(HCONFIG_SEPARATOR))
            .map(|(name, value)| (name.trim().to_string(), unquote(value.trim()).to_string()))
            .filter(|(name, _)| !name.is_empty())
            .collect();
        Self::new(vars)
    }

    /// Read and parse a captured `hconfig` dump.
    pub fn from_hconfig_file(path: &NormalizedPath) -> Result<Self> {
        let text = io::read_text(path)?;
        let env = Self::parse_hconfig(&text);
        tracing::debug!(%path, vars = env.vars.len(), "Read hconfig dump");
        Ok(env)
    }

    pub fn vars(&self) -> &BTreeMap<String, String> {
        &self.vars
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// `$HOUDINI_USER_PREF_DIR/packages`
    pub fn packages_dir(&self) -> Result<NormalizedPath> {
        let pref_dir = self
            .get(HOUDINI_USER_PREF_DIR)
            .ok_or_else(|| Error::MissingHostVariable {
                name: HOUDINI_USER_PREF_DIR.to_string(),
            })?;
        Ok(NormalizedPath::new(pref_dir).join("packages"))
    }

    /// Declare `HOUDINI_PACKAGE_PATH` as `packages_dir` unless the host
    /// already does. `hconfig` does not report it.
    pub fn with_package_path(mut self, packages_dir: &NormalizedPath) -> Self {
        self.vars
            .entry(HOUDINI_PACKAGE_PATH.to_string())
            .or_insert_with(|| packages_dir.to_string());
        self
    }

    /// Plugin directories from `HOUDINI_PATH` that exist on disk.
    pub fn plugin_paths(&self) -> BTreeSet<NormalizedPath> {
        let Some(houdini_path) = self.get(HOUDINI_PATH) else {
            tracing::debug!("Host environment has no HOUDINI_PATH");
            return BTreeSet::new();
        };
        split_path_list(houdini_path)
            .into_iter()
            .map(NormalizedPath::new)
            .filter(NormalizedPath::exists)
            .collect()
    }
}

fn unquote(value: &str) -> &str {
    let quoted = value.len() >= 2
        && value.starts_with(['\'', '"'])
        && value.ends_with(['\'', '"']);
    if quoted { &value[1..value.len() - 1] } else { value }
}
