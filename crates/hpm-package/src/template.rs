//! Package config templates for new plugins

use hpm_fs::{NormalizedPath, io, to_pretty_string};
use serde_json::{Value, json};

use crate::{Error, Result};

/// The standard config for a plugin directory laid out the way Houdini
/// expects (`otls/`, `scripts/`, `toolbar/`, `vex/`).
///
/// `HOUDINI_VEX_PATH` is listed explicitly since `vex/` is not picked up
/// through `hpath`, and `hpath` is used instead of `HOUDINI_PATH` so that
/// `USER_DATA` can be referenced from the vex path.
pub fn standard(plugin_dir: &NormalizedPath) -> Value {
    json!({
        "env": [
            {"USER_DATA": plugin_dir.as_str()},
            {"HOUDINI_VEX_PATH": "$USER_DATA/vex"}
        ],
        "hpath": "$USER_DATA;"
    })
}

/// Where the config for `plugin_dir` goes inside `packages_dir`:
/// `<packages_dir>/<plugin dir name>.json`.
pub fn config_path_for(packages_dir: &NormalizedPath, plugin_dir: &NormalizedPath) -> Option<NormalizedPath> {
    let name = plugin_dir.file_name()?;
    Some(packages_dir.join(&format!("{name}.json")))
}

/// How many of the configs [`create_package_configs`] would write already
/// exist.
pub fn count_overwrites(packages_dirs: &[NormalizedPath], plugin_dirs: &[NormalizedPath]) -> usize {
    packages_dirs
        .iter()
        .flat_map(|packages_dir| {
            plugin_dirs
                .iter()
                .filter_map(move |plugin_dir| config_path_for(packages_dir, plugin_dir))
        })
        .filter(NormalizedPath::exists)
        .count()
}

/// Write a standard config for every plugin into every packages directory.
///
/// Existing configs are only replaced when `overwrite` is set; otherwise
/// nothing is written. Returns the paths written.
pub fn create_package_configs(
    packages_dirs: &[NormalizedPath],
    plugin_dirs: &[NormalizedPath],
    overwrite: bool,
) -> Result<Vec<NormalizedPath>> {
    let mut targets = Vec::new();
    for plugin_dir in plugin_dirs {
        if !plugin_dir.is_dir() {
            return Err(Error::PluginDirNotFound {
                path: plugin_dir.to_native(),
            });
        }
        for packages_dir in packages_dirs {
            let Some(path) = config_path_for(packages_dir, plugin_dir) else {
                tracing::warn!(%plugin_dir, "Plugin directory has no name, skipping");
                continue;
            };
            if path.exists() && !overwrite {
                return Err(Error::ConfigExists {
                    path: path.to_native(),
                });
            }
            targets.push((path, plugin_dir));
        }
    }

    let mut written = Vec::new();
    for (path, plugin_dir) in targets {
        let text = to_pretty_string(&standard(plugin_dir)).map_err(|source| Error::Serialize {
            path: path.to_native(),
            source,
        })?;
        io::write_text(&path, &text)?;
        written.push(path);
    }

    tracing::debug!(
        configs = written.len(),
        directories = packages_dirs.len(),
        "Created package configs"
    );
    Ok(written)
}
