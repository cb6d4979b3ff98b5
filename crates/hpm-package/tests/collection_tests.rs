//! Scanning a packages directory against a host environment

use std::collections::BTreeMap;

use hpm_fs::NormalizedPath;
use hpm_package::host::{HOUDINI_PACKAGE_PATH, HOUDINI_PATH};
use hpm_package::{HostEnvironment, PackageCollection};
use hpm_test_utils::packages::TestPackages;
use pretty_assertions::assert_eq;
use serde_json::json;

fn host_with_path(houdini_path: String) -> HostEnvironment {
    HostEnvironment::new(BTreeMap::from([(HOUDINI_PATH.to_string(), houdini_path)]))
}

#[test]
fn scan_matches_configs_to_existing_host_paths() {
    let packages = TestPackages::new();
    let mops = packages.plugin_dir("MOPS");
    let labs = packages.plugin_dir("SideFXLabs");
    let missing = format!("{}/plugins/missing", packages.root().display());

    packages.write_config(
        "MOPS.json",
        &json!({"env": [{"MOPS": &mops}], "hpath": "$MOPS"}),
    );
    packages.write_config("labs.json", &json!({"hpath": format!("{labs};{missing}")}));
    packages.write_raw_config("notes.txt", "not a package");

    let host = host_with_path(format!("{mops};{labs};{missing};&"));
    let dir = NormalizedPath::new(packages.packages_dir());
    let collection = PackageCollection::scan(&dir, &host).unwrap();

    assert_eq!(collection.names().collect::<Vec<_>>(), vec!["MOPS", "labs"]);
    assert_eq!(
        collection.get("MOPS").unwrap().plugin_paths(),
        &[NormalizedPath::new(&mops)]
    );
    assert_eq!(
        collection.get("labs").unwrap().plugin_paths(),
        &[NormalizedPath::new(&labs)]
    );
    assert_eq!(collection.host_paths().len(), 2);
}

#[test]
fn scan_declares_package_path() {
    let packages = TestPackages::new();
    let plugin = packages.plugin_dir("tools");
    let dir = NormalizedPath::new(packages.packages_dir());
    packages.write_config(
        "tools.json",
        &json!({"hpath": format!("${HOUDINI_PACKAGE_PATH}/../plugins/tools")}),
    );

    let collection = PackageCollection::scan(&dir, &host_with_path(plugin)).unwrap();
    let record = collection.get("tools").unwrap();

    assert_eq!(
        record.config().top_level("hpath").and_then(|v| v.as_str()),
        Some(format!("{dir}/../plugins/tools").as_str())
    );
}

#[test]
fn scan_creates_missing_directory() {
    let packages = TestPackages::new();
    let dir = NormalizedPath::new(packages.root()).join("houdini20.0/packages");

    let collection = PackageCollection::scan(&dir, &HostEnvironment::default()).unwrap();
    assert!(collection.is_empty());
    assert!(dir.is_dir());
}

#[test]
fn broken_configs_do_not_stop_the_scan() {
    let packages = TestPackages::new();
    packages.write_config("cycle.json", &json!({"A": "$B", "B": "$A"}));
    packages.write_raw_config("broken.json", "{{{");
    packages.write_config("fine.json", &json!({"enable": false}));

    let dir = NormalizedPath::new(packages.packages_dir());
    let collection = PackageCollection::scan(&dir, &HostEnvironment::default()).unwrap();

    assert_eq!(collection.len(), 3);
    assert_eq!(collection.get("cycle").unwrap().warnings().len(), 1);
    assert_eq!(collection.get("broken").unwrap().warnings().len(), 1);
    assert!(collection.get("fine").unwrap().warnings().is_empty());
    assert!(!collection.get("fine").unwrap().enable());
}
