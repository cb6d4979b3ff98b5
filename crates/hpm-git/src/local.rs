//! Read-only access to a plugin's local clone

use git2::{DescribeFormatOptions, DescribeOptions, Repository};
use hpm_fs::NormalizedPath;

use crate::{Error, Result};

/// A local git clone that a package's plugin path points at.
pub struct LocalRepo {
    root: NormalizedPath,
    repo: Repository,
}

impl LocalRepo {
    /// Open the repository whose working tree root is `root`.
    ///
    /// Parent directories are not searched: a plugin folder nested inside
    /// some unrelated repository is not that repository's clone.
    pub fn open(root: &NormalizedPath) -> Result<Self> {
        let repo = Repository::open(root.to_native()).map_err(|e| {
            if e.code() == git2::ErrorCode::NotFound {
                Error::NotARepository {
                    path: root.to_native(),
                }
            } else {
                Error::Git(e)
            }
        })?;
        Ok(Self {
            root: root.clone(),
            repo,
        })
    }

    /// Open `root` if it is a git clone, `None` otherwise.
    pub fn try_open(root: &NormalizedPath) -> Result<Option<Self>> {
        match Self::open(root) {
            Ok(repo) => Ok(Some(repo)),
            Err(Error::NotARepository { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub fn root(&self) -> &NormalizedPath {
        &self.root
    }

    /// URL of the first configured remote, if any.
    pub fn remote_url(&self) -> Result<Option<String>> {
        let remotes = self.repo.remotes()?;
        let Some(name) = remotes.iter().flatten().next() else {
            return Ok(None);
        };
        let remote = self
            .repo
            .find_remote(name)
            .map_err(|_| Error::RemoteNotFound {
                name: name.to_string(),
            })?;
        Ok(remote.url().map(str::to_string))
    }

    /// The most recent tag reachable from HEAD (`git describe --tags --abbrev=0`).
    ///
    /// Returns `None` for repositories without commits or without tags.
    pub fn latest_tag(&self) -> Result<Option<String>> {
        let mut options = DescribeOptions::new();
        options.describe_tags();

        let describe = match self.repo.describe(&options) {
            Ok(describe) => describe,
            Err(e) => {
                tracing::debug!(root = %self.root, error = %e, "No tag describes HEAD");
                return Ok(None);
            }
        };

        let mut format = DescribeFormatOptions::new();
        format.abbreviated_size(0);
        Ok(Some(describe.format(Some(&format))?))
    }
}
