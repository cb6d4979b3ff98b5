//! Plugin path extraction from resolved configs

use std::collections::{BTreeSet, HashSet};

use hpm_fs::NormalizedPath;

use crate::flatten::FlattenedConfig;

/// Keys Houdini accepts for plugin search paths. Matched case-sensitively.
pub const PATH_KEYS: [&str; 3] = ["HOUDINI_PATH", "path", "hpath"];

/// Split a `;`-delimited path list, dropping one trailing `;&` or `;`
/// sentinel and any empty pieces.
pub fn split_path_list(value: &str) -> Vec<&str> {
    let trimmed = value
        .strip_suffix(";&")
        .or_else(|| value.strip_suffix(';'))
        .unwrap_or(value);

    trimmed.split(';').filter(|piece| !piece.is_empty()).collect()
}

/// Every path the config claims, deduplicated in config order.
pub fn claimed_paths(resolved: &FlattenedConfig) -> Vec<NormalizedPath> {
    let mut seen = HashSet::new();
    resolved
        .iter()
        .filter(|entry| PATH_KEYS.iter().any(|key| entry.has_key_segment(key)))
        .filter_map(|entry| entry.value.as_str())
        .flat_map(split_path_list)
        .map(NormalizedPath::new)
        .filter(|path| seen.insert(path.clone()))
        .collect()
}

/// Paths the config claims that the host also reports, in config order.
pub fn extract(
    resolved: &FlattenedConfig,
    host_paths: &BTreeSet<NormalizedPath>,
) -> Vec<NormalizedPath> {
    claimed_paths(resolved)
        .into_iter()
        .filter(|path| host_paths.contains(path))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flatten::flatten;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("C:/a;C:/b;&", vec!["C:/a", "C:/b"])]
    #[case("C:/a;C:/b;", vec!["C:/a", "C:/b"])]
    #[case("C:/a", vec!["C:/a"])]
    #[case("C:/a;;C:/b", vec!["C:/a", "C:/b"])]
    #[case(";&", vec![])]
    #[case("", vec![])]
    fn splits_path_lists(#[case] value: &str, #[case] expected: Vec<&str>) {
        assert_eq!(split_path_list(value), expected);
    }

    #[test]
    fn only_path_keys_are_considered() {
        let config = flatten(&json!({
            "env": [{"BASE": "/plugins/base"}, {"HOUDINI_PATH": "/plugins/env"}],
            "hpath": ["/plugins/a", "/plugins/b;/plugins/a"],
            "PATH": "/plugins/wrong-case",
            "enable": true
        }));

        assert_eq!(
            claimed_paths(&config),
            vec![
                NormalizedPath::new("/plugins/env"),
                NormalizedPath::new("/plugins/a"),
                NormalizedPath::new("/plugins/b"),
            ]
        );
    }

    #[test]
    fn conditional_path_objects_are_searched() {
        let config = flatten(&json!({
            "path": [{"houdini_version >= '19.5'": "/plugins/new"}]
        }));
        assert_eq!(claimed_paths(&config), vec![NormalizedPath::new("/plugins/new")]);
    }

    #[test]
    fn intersects_with_host_paths_in_config_order() {
        let config = flatten(&json!({"hpath": "/p/c;/p/a;/p/b/"}));
        let host: BTreeSet<_> = ["/p/a", "/p/b", "/p/z"].into_iter().map(NormalizedPath::new).collect();

        assert_eq!(
            extract(&config, &host),
            vec![NormalizedPath::new("/p/a"), NormalizedPath::new("/p/b")]
        );
    }
}
