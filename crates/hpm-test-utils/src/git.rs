//! Git repository fixtures built with `git2`.
//!
//! No `git` executable is required; every fixture writes objects directly.

use std::fs;
use std::path::Path;

use git2::{Repository, Signature};

/// Initialises a real git repository using `git2` (no initial commit, no config).
///
/// Realism level: **REAL**, a valid git object store with empty history.
///
/// # Panics
/// Panics if `git2::Repository::init` fails.
pub fn real_git_repo(path: &Path) -> Repository {
    Repository::init(path).unwrap_or_else(|e| {
        panic!(
            "real_git_repo: failed to init repository at {}: {e}",
            path.display()
        )
    })
}

/// Creates one commit on HEAD containing a `README.md` with `message` as its
/// content, returning the new commit id.
///
/// # Panics
/// Panics if any git operation fails.
pub fn commit_file(repo: &Repository, message: &str) -> git2::Oid {
    let workdir = repo
        .workdir()
        .expect("commit_file: repository has no working directory");
    fs::write(workdir.join("README.md"), message)
        .unwrap_or_else(|e| panic!("commit_file: failed to write README.md: {e}"));

    let mut index = repo.index().expect("commit_file: no index");
    index
        .add_path(Path::new("README.md"))
        .expect("commit_file: failed to stage README.md");
    index.write().expect("commit_file: failed to write index");
    let tree_id = index.write_tree().expect("commit_file: failed to write tree");
    let tree = repo.find_tree(tree_id).expect("commit_file: tree missing");

    let sig = Signature::now("Test User", "test@test.com").expect("commit_file: bad signature");
    let parents = match repo.head() {
        Ok(head) => vec![head.peel_to_commit().expect("commit_file: HEAD is not a commit")],
        Err(_) => Vec::new(),
    };
    let parent_refs: Vec<&git2::Commit> = parents.iter().collect();

    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parent_refs)
        .unwrap_or_else(|e| panic!("commit_file: commit failed: {e}"))
}

/// Initialises a repository with one commit per tag, tagging each commit
/// with a lightweight tag in the given order (last tag is on HEAD).
///
/// Realism level: **REAL WITH HISTORY**.
///
/// # Panics
/// Panics if any git operation fails.
pub fn tagged_git_repo(path: &Path, tags: &[&str]) -> Repository {
    let repo = real_git_repo(path);
    if tags.is_empty() {
        commit_file(&repo, "Initial commit");
    }
    for tag in tags {
        let oid = commit_file(&repo, &format!("Release {tag}"));
        {
            let object = repo
                .find_object(oid, None)
                .unwrap_or_else(|e| panic!("tagged_git_repo: commit {oid} missing: {e}"));
            repo.tag_lightweight(tag, &object, false)
                .unwrap_or_else(|e| panic!("tagged_git_repo: failed to tag {tag}: {e}"));
        }
    }
    repo
}

/// Adds a remote named `name` pointing at `url`.
///
/// # Panics
/// Panics if the remote cannot be created.
pub fn add_remote(repo: &Repository, name: &str, url: &str) {
    repo.remote(name, url)
        .unwrap_or_else(|e| panic!("add_remote: failed to add remote {name}: {e}"));
}
