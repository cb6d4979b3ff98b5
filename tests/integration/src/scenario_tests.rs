//! Package directory scenarios
//!
//! Mixed directories as they show up on real installations: broken files,
//! disabled packages, circular variables and freshly created configs.

use std::collections::BTreeMap;

use hpm_fs::NormalizedPath;
use hpm_package::record::INVALID_JSON_WARNING;
use hpm_package::template::create_package_configs;
use hpm_package::{HostEnvironment, PackageCollection, PackageState};
use hpm_test_utils::packages::TestPackages;
use pretty_assertions::assert_eq;
use serde_json::json;

fn host_with_path(paths: &[&str]) -> HostEnvironment {
    let mut houdini_path = paths.join(";");
    houdini_path.push_str(";&");
    HostEnvironment::new(BTreeMap::from([(
        "HOUDINI_PATH".to_string(),
        houdini_path,
    )]))
}

#[test]
fn test_mixed_directory() {
    let packages = TestPackages::new();
    let mops = packages.plugin_dir("MOPS");
    let labs = packages.plugin_dir("SideFXLabs");

    packages.write_raw_config(
        "MOPS.json",
        &format!("{{\n    \"hpath\": \"{mops}\",\n}}"),
    );
    packages.write_config(
        "loop.json",
        &json!({"env": [{"A": "$B/x"}, {"B": "$A/y"}], "hpath": "$A"}),
    );
    packages.write_raw_config("hopeless.json", "this is not json");
    packages.write_config(
        "SideFXLabs.json",
        &json!({
            "enable": "houdini_version >= '19.5'",
            "env": [{"SIDEFXLABS": &labs}],
            "path": "$SIDEFXLABS"
        }),
    );
    packages.write_raw_config("notes.txt", "ignored");

    let host = host_with_path(&[&mops, &labs]);
    let collection =
        PackageCollection::scan(&NormalizedPath::new(packages.packages_dir()), &host).unwrap();

    assert_eq!(collection.len(), 4);

    let repaired = collection.get("MOPS").unwrap();
    assert_eq!(repaired.state(), PackageState::Extracted);
    assert_eq!(repaired.warnings(), [INVALID_JSON_WARNING.to_string()]);
    assert_eq!(repaired.plugin_paths(), [NormalizedPath::new(&mops)]);

    let cyclic = collection.get("loop").unwrap();
    assert_eq!(cyclic.state(), PackageState::Failed);
    assert!(cyclic.plugin_paths().is_empty());
    assert!(cyclic.warnings()[0].contains("Circular reference"));

    let hopeless = collection.get("hopeless").unwrap();
    assert_eq!(hopeless.raw(), &json!({}));
    assert!(hopeless.plugin_paths().is_empty());
    assert!(hopeless.enable());

    let labs_record = collection.get("SideFXLabs").unwrap();
    assert!(labs_record.enable());
    assert_eq!(labs_record.plugin_paths(), [NormalizedPath::new(&labs)]);
}

#[test]
fn test_unregistered_plugin_path_is_not_claimed() {
    let packages = TestPackages::new();
    let registered = packages.plugin_dir("registered");
    let unregistered = packages.plugin_dir("unregistered");
    packages.write_config(
        "tools.json",
        &json!({"hpath": [&registered, &unregistered]}),
    );

    let host = host_with_path(&[&registered]);
    let collection =
        PackageCollection::scan(&NormalizedPath::new(packages.packages_dir()), &host).unwrap();

    assert_eq!(
        collection.get("tools").unwrap().plugin_paths(),
        [NormalizedPath::new(&registered)]
    );
}

#[test]
fn test_created_configs_are_found_by_scan() {
    let packages = TestPackages::new();
    let mops = packages.plugin_dir("MOPS");
    let qlib = packages.plugin_dir("qLib");
    let packages_dir = NormalizedPath::new(packages.packages_dir());

    let written = create_package_configs(
        std::slice::from_ref(&packages_dir),
        &[NormalizedPath::new(&mops), NormalizedPath::new(&qlib)],
        false,
    )
    .unwrap();
    assert_eq!(written.len(), 2);

    let host = host_with_path(&[&mops, &qlib]);
    let collection = PackageCollection::scan(&packages_dir, &host).unwrap();

    let record = collection.get("MOPS").unwrap();
    assert_eq!(record.state(), PackageState::Extracted);
    assert_eq!(record.plugin_paths(), [NormalizedPath::new(&mops)]);
    assert_eq!(
        record
            .config()
            .iter()
            .find(|entry| entry.has_key_segment("HOUDINI_VEX_PATH"))
            .map(|entry| entry.value.render()),
        Some(format!("{mops}/vex"))
    );
}

#[test]
fn test_enable_round_trip_through_rescan() {
    let packages = TestPackages::new();
    let mops = packages.plugin_dir("MOPS");
    packages.write_config("MOPS.json", &json!({"hpath": &mops}));
    let packages_dir = NormalizedPath::new(packages.packages_dir());
    let host = host_with_path(&[&mops]);

    let mut collection = PackageCollection::scan(&packages_dir, &host).unwrap();
    collection.get_mut("MOPS").unwrap().set_enable(false).unwrap();

    let rescanned = PackageCollection::scan(&packages_dir, &host).unwrap();
    let record = rescanned.get("MOPS").unwrap();
    assert!(!record.enable());
    assert_eq!(record.plugin_paths(), [NormalizedPath::new(&mops)]);
    assert_eq!(packages.read_config("MOPS.json")["hpath"], json!(mops));
}
