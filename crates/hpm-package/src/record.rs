//! One package config file and everything derived from it

use std::cell::OnceCell;
use std::collections::{BTreeMap, BTreeSet};

use hpm_fs::{NormalizedPath, io, to_pretty_string};
use hpm_git::GitProject;
use serde_json::Value;

use crate::extract::extract;
use crate::flatten::{FlattenedConfig, Scalar, flatten};
use crate::repair::parse_repaired;
use crate::resolver::resolve_with_env;
use crate::{Error, Result};

/// Warning recorded when a config had to be repaired or replaced.
pub const INVALID_JSON_WARNING: &str = "Invalid JSON! Fix errors and refresh.";

/// How far construction got.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageState {
    Loaded,
    Flattened,
    Resolved,
    /// Plugin paths were matched against the host
    Extracted,
    /// A circular variable reference stopped resolution
    Failed,
}

/// A package config file loaded, resolved and matched against the host's
/// plugin paths.
///
/// Construction runs every step once. To pick up changes on disk, build a
/// new record.
#[derive(Debug)]
pub struct PackageRecord {
    config_path: NormalizedPath,
    raw: Value,
    config: FlattenedConfig,
    state: PackageState,
    warnings: Vec<String>,
    plugin_paths: Vec<NormalizedPath>,
    git_project: OnceCell<GitProject>,
}

impl PackageRecord {
    /// Load the config at `config_path`.
    ///
    /// Only a failure to read the file is an error. Broken JSON and
    /// circular variables end up in [`warnings`](Self::warnings).
    pub fn load(
        config_path: &NormalizedPath,
        env: &BTreeMap<String, String>,
        host_paths: &BTreeSet<NormalizedPath>,
    ) -> Result<Self> {
        let text = io::read_text(config_path)?;
        Ok(Self::from_text(config_path.clone(), &text, env, host_paths))
    }

    /// Build a record from config text already read from `config_path`.
    pub fn from_text(
        config_path: NormalizedPath,
        text: &str,
        env: &BTreeMap<String, String>,
        host_paths: &BTreeSet<NormalizedPath>,
    ) -> Self {
        let mut warnings = Vec::new();
        let raw = parse_config(&config_path, text, &mut warnings);
        let mut record = Self {
            config_path,
            raw,
            config: FlattenedConfig::default(),
            state: PackageState::Loaded,
            warnings,
            plugin_paths: Vec::new(),
            git_project: OnceCell::new(),
        };

        record.config = flatten(&record.raw);
        record.state = PackageState::Flattened;

        match resolve_with_env(&record.config, env) {
            Ok(resolved) => {
                record.config = resolved;
                record.state = PackageState::Resolved;
            }
            Err(failure) => {
                tracing::warn!(
                    path = %record.config_path,
                    variable = %failure.variable,
                    "Package config has a circular variable reference"
                );
                record.warnings.push(format!("Can't process package! {failure}"));
                record.config = failure.partial;
                record.state = PackageState::Failed;
                return record;
            }
        }

        record.plugin_paths = extract(&record.config, host_paths);
        record.state = PackageState::Extracted;

        tracing::debug!(
            path = %record.config_path,
            plugins = record.plugin_paths.len(),
            warnings = record.warnings.len(),
            "Loaded package"
        );
        record
    }

    pub fn config_path(&self) -> &NormalizedPath {
        &self.config_path
    }

    /// Package name: the config file stem.
    pub fn name(&self) -> &str {
        self.config_path.file_stem().unwrap_or_default()
    }

    /// The document as parsed (or repaired) from disk.
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// The flattened config, resolved as far as resolution got.
    pub fn config(&self) -> &FlattenedConfig {
        &self.config
    }

    pub fn state(&self) -> PackageState {
        self.state
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Plugin directories claimed by this config and reported by the host.
    pub fn plugin_paths(&self) -> &[NormalizedPath] {
        &self.plugin_paths
    }

    /// Whether Houdini loads this package, from the top-level `enable` key.
    ///
    /// A string other than `"true"`/`"false"` is a conditional expression
    /// Houdini evaluates itself and counts as enabled.
    pub fn enable(&self) -> bool {
        match self.config.top_level("enable") {
            None => true,
            Some(Scalar::Bool(enabled)) => *enabled,
            Some(Scalar::String(text)) => !text.eq_ignore_ascii_case("false"),
            Some(Scalar::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
            Some(Scalar::Null) => false,
        }
    }

    /// Set the top-level `enable` key and rewrite the config file.
    pub fn set_enable(&mut self, enable: bool) -> Result<()> {
        let Value::Object(map) = &mut self.raw else {
            return Err(Error::NotAnObject {
                path: self.config_path.to_native(),
            });
        };
        map.insert("enable".to_string(), Value::Bool(enable));
        self.config.set_top_level("enable", enable);

        let text = to_pretty_string(&self.raw).map_err(|source| Error::Serialize {
            path: self.config_path.to_native(),
            source,
        })?;
        io::write_text(&self.config_path, &text)?;

        tracing::debug!(path = %self.config_path, enable, "Saved package enable state");
        Ok(())
    }

    /// Local git data of the first plugin path, read on first access.
    pub fn git_project(&self) -> &GitProject {
        self.git_project.get_or_init(|| {
            let Some(path) = self.plugin_paths.first() else {
                return GitProject::default();
            };
            GitProject::inspect(path).unwrap_or_else(|e| {
                tracing::warn!(%path, error = %e, "Failed to read local git data");
                GitProject::default()
            })
        })
    }

    /// Remote owner of the plugin's clone.
    pub fn author(&self) -> Option<&str> {
        self.git_project().owner()
    }

    /// Latest tag in the local clone.
    pub fn installed_version(&self) -> Option<&str> {
        self.git_project().local_tag.as_deref()
    }

    pub fn remote_url(&self) -> Option<&str> {
        self.git_project().remote_url.as_deref()
    }
}

/// Parse config text, falling back to the repair pass and finally to an
/// empty object.
fn parse_config(path: &NormalizedPath, text: &str, warnings: &mut Vec<String>) -> Value {
    match serde_json::from_str(text) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(%path, error = %e, "Invalid json (might fail to resolve/parse)");
            warnings.push(INVALID_JSON_WARNING.to_string());
            parse_repaired(text).unwrap_or_else(|e| {
                tracing::debug!(%path, error = %e, "Repair failed, using an empty config");
                Value::Object(Default::default())
            })
        }
    }
}
