//! End-to-end integration test for the vertical slice
//!
//! This test exercises the complete flow: hconfig dump -> package scan ->
//! local git data -> remote tag sync -> cached latest version.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Mutex;

use hpm_fs::NormalizedPath;
use hpm_package::{HostEnvironment, PackageCollection, PackageState};
use hpm_tags::{
    BatchEvent, BatchOptions, BatchRequest, Error, HttpResponse, Reconciled, Result, TagCache,
    TagSet, TagTransport, fetch_batch,
};
use hpm_test_utils::git::{add_remote, tagged_git_repo};
use hpm_test_utils::packages::TestPackages;
use pretty_assertions::assert_eq;
use serde_json::json;

const API: &str = "https://api.test";

/// Answers each URL with a fixed status and tag list.
#[derive(Default)]
struct FakeApi {
    routes: HashMap<String, (u16, Vec<&'static str>)>,
    hits: Mutex<Vec<String>>,
}

impl FakeApi {
    fn tags(mut self, repo: &str, tags: Vec<&'static str>) -> Self {
        self.routes
            .insert(format!("{API}/repos/{repo}/tags"), (200, tags));
        self
    }

    fn status(mut self, repo: &str, status: u16) -> Self {
        self.routes
            .insert(format!("{API}/repos/{repo}/tags"), (status, Vec::new()));
        self
    }

    fn hits(&self) -> usize {
        self.hits.lock().unwrap().len()
    }
}

impl TagTransport for FakeApi {
    fn get(&self, url: &str, _query: &[(&str, String)]) -> Result<HttpResponse> {
        self.hits.lock().unwrap().push(url.to_string());
        match self.routes.get(url) {
            Some((200, tags)) => {
                let body: Vec<_> = tags.iter().map(|name| json!({"name": name})).collect();
                Ok(HttpResponse::new(200, serde_json::to_string(&body).unwrap()))
            }
            Some((status, _)) => Ok(HttpResponse::new(*status, "{}")),
            None => Err(Error::Connection {
                url: url.to_string(),
                message: "no route".to_string(),
            }),
        }
    }
}

/// Preference dir with two cloned plugins and one plain folder, all on
/// `HOUDINI_PATH`.
fn setup_installation() -> (TestPackages, HostEnvironment) {
    let packages = TestPackages::new();

    let mops = packages.plugin_dir("MOPS");
    let repo = tagged_git_repo(Path::new(&mops), &["v1.0", "v1.1"]);
    add_remote(&repo, "origin", "https://github.com/toadstorm/MOPS.git");

    let qlib = packages.plugin_dir("qLib");
    let repo = tagged_git_repo(Path::new(&qlib), &["v0.2.200"]);
    add_remote(&repo, "origin", "git@github.com:qLab/qLib.git");

    let local = packages.plugin_dir("local_tools");

    packages.write_config(
        "MOPS.json",
        &json!({
            "env": [{"MOPS": &mops}],
            "hpath": "$MOPS"
        }),
    );
    packages.write_config(
        "qLib.json",
        &json!({
            "enable": false,
            "env": [{"QLIB": &qlib}, {"QOTL": "$QLIB/otls"}],
            "path": "$QLIB"
        }),
    );
    packages.write_config("local_tools.json", &json!({"hpath": &local}));

    let dump = format!(
        "HOUDINI_USER_PREF_DIR := '{}'\nHOUDINI_PATH := '{mops};{qlib};{local};&'\n",
        packages.root().to_string_lossy().replace('\\', "/")
    );
    let dump_path = packages.root().join("hconfig.txt");
    fs::write(&dump_path, dump).unwrap();
    let host = HostEnvironment::from_hconfig_file(&NormalizedPath::new(&dump_path)).unwrap();

    (packages, host)
}

fn cache_in(packages: &TestPackages) -> TagCache {
    TagCache::new(NormalizedPath::new(packages.root()).join("cache/package_repo_data.json"))
}

#[test]
fn test_scan_from_hconfig_dump() {
    let (packages, host) = setup_installation();

    let packages_dir = host.packages_dir().unwrap();
    assert_eq!(packages_dir, NormalizedPath::new(packages.packages_dir()));

    let collection = PackageCollection::scan(&packages_dir, &host).unwrap();
    assert_eq!(
        collection.names().collect::<Vec<_>>(),
        vec!["MOPS", "local_tools", "qLib"]
    );

    for record in collection.iter() {
        assert_eq!(record.state(), PackageState::Extracted);
        assert!(record.warnings().is_empty());
        assert_eq!(record.plugin_paths().len(), 1, "{}", record.name());
    }

    let qlib = collection.get("qLib").unwrap();
    assert!(!qlib.enable());
    assert_eq!(qlib.author(), Some("qLab"));
    assert_eq!(qlib.installed_version(), Some("v0.2.200"));

    let mops = collection.get("MOPS").unwrap();
    assert!(mops.enable());
    assert_eq!(mops.author(), Some("toadstorm"));
    assert_eq!(mops.installed_version(), Some("v1.1"));

    let local = collection.get("local_tools").unwrap();
    assert_eq!(local.author(), None);
    assert_eq!(local.git_project().identity, None);
}

#[test]
fn test_full_vertical_slice() {
    let (packages, host) = setup_installation();
    let collection = PackageCollection::scan(&host.packages_dir().unwrap(), &host).unwrap();
    let cache = cache_in(&packages);

    // 1. Build one request per package
    let requests: Vec<BatchRequest> = collection
        .iter()
        .map(|record| BatchRequest::new(record.name(), record.git_project().identity.clone()))
        .collect();
    for record in collection.iter().filter(|r| r.git_project().identity.is_some()) {
        cache
            .set_local_config_path(record.name(), record.config_path())
            .unwrap();
    }

    // 2. Sync against the API
    let api = FakeApi::default()
        .tags("toadstorm/MOPS", vec!["v1.2", "v1.1", "v1.0"])
        .tags("qLab/qLib", vec!["v0.2.200"]);
    let options = BatchOptions {
        api_base: API.to_string(),
        paginate: true,
    };
    let events = fetch_batch(&requests, &cache, &api, &options).unwrap();

    assert_eq!(
        events.iter().map(BatchEvent::name).collect::<Vec<_>>(),
        vec!["MOPS", "local_tools", "qLib"]
    );
    assert!(matches!(events[1], BatchEvent::Skipped { .. }));
    assert_eq!(api.hits(), 2);

    // 3. Installed and latest versions line up per package
    let mops = collection.get("MOPS").unwrap();
    assert_eq!(cache.latest("MOPS").unwrap().as_deref(), Some("v1.2"));
    assert_ne!(mops.installed_version(), Some("v1.2"));

    let qlib = collection.get("qLib").unwrap();
    assert_eq!(
        cache.latest("qLib").unwrap().as_deref(),
        qlib.installed_version()
    );

    let entry = cache.get("MOPS").unwrap().unwrap();
    assert_eq!(entry.local_config_path, mops.config_path().as_str());
    assert!(entry.last_synced.is_some());
    assert_eq!(cache.get("local_tools").unwrap(), None);

    // 4. A second sync that returns the same list stores nothing new
    let again = fetch_batch(&requests, &cache, &api, &options).unwrap();
    assert!(again.iter().all(|event| match event {
        BatchEvent::Fetched { reconciled, .. } => !reconciled.is_changed(),
        BatchEvent::Skipped { .. } => true,
    }));
}

#[test]
fn test_rate_limit_keeps_cached_tags() {
    let (packages, host) = setup_installation();
    let collection = PackageCollection::scan(&host.packages_dir().unwrap(), &host).unwrap();
    let cache = cache_in(&packages);
    cache.update("MOPS", &TagSet::new(["v1.1", "v1.0"])).unwrap();

    let api = FakeApi::default().status("toadstorm/MOPS", 403);
    let mops = collection.get("MOPS").unwrap();
    let requests = vec![BatchRequest::new("MOPS", mops.git_project().identity.clone())];

    let result = fetch_batch(
        &requests,
        &cache,
        &api,
        &BatchOptions {
            api_base: API.to_string(),
            paginate: true,
        },
    );

    assert!(matches!(result, Err(Error::RateLimited { .. })));
    assert_eq!(cache.latest("MOPS").unwrap().as_deref(), Some("v1.1"));
}

#[test]
fn test_rewritten_history_replaces_cache() {
    let (packages, host) = setup_installation();
    let collection = PackageCollection::scan(&host.packages_dir().unwrap(), &host).unwrap();
    let cache = cache_in(&packages);
    cache.update("MOPS", &TagSet::new(["old-1", "old-2"])).unwrap();

    let api = FakeApi::default().tags("toadstorm/MOPS", vec!["v2.0"]);
    let mops = collection.get("MOPS").unwrap();
    let requests = vec![BatchRequest::new("MOPS", mops.git_project().identity.clone())];
    let events = fetch_batch(
        &requests,
        &cache,
        &api,
        &BatchOptions {
            api_base: API.to_string(),
            paginate: false,
        },
    )
    .unwrap();

    assert!(matches!(
        &events[0],
        BatchEvent::Fetched {
            reconciled: Reconciled::Replaced(_),
            ..
        }
    ));
    assert_eq!(cache.get("MOPS").unwrap().unwrap().tags, TagSet::new(["v2.0"]));
}
