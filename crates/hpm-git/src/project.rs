//! Local and remote repository facts for one plugin

use hpm_fs::NormalizedPath;

use crate::{LocalRepo, RepoIdentity, Result};

/// Everything the package manager knows about a plugin's source control
/// without touching the network.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitProject {
    /// Working tree root of the local clone, when the plugin path is one
    pub local_path: Option<NormalizedPath>,

    /// URL of the clone's first remote
    pub remote_url: Option<String>,

    /// Owner and name parsed from `remote_url`
    pub identity: Option<RepoIdentity>,

    /// Most recent local tag, i.e. the installed version
    pub local_tag: Option<String>,
}

impl GitProject {
    /// Inspect `path`. A path that is not a git clone yields an empty project.
    pub fn inspect(path: &NormalizedPath) -> Result<Self> {
        let Some(repo) = LocalRepo::try_open(path)? else {
            tracing::debug!(%path, "Plugin path is not a git clone");
            return Ok(Self::default());
        };

        let remote_url = repo.remote_url()?;
        let identity = remote_url.as_deref().and_then(RepoIdentity::from_remote_url);
        let local_tag = repo.latest_tag()?;

        tracing::debug!(
            %path,
            remote = ?remote_url,
            tag = ?local_tag,
            "Read local git data"
        );

        Ok(Self {
            local_path: Some(path.clone()),
            remote_url,
            identity,
            local_tag,
        })
    }

    /// Remote owner, shown as the package author.
    pub fn owner(&self) -> Option<&str> {
        self.identity.as_ref().map(|id| id.owner.as_str())
    }

    /// Name of the remote repository.
    pub fn name(&self) -> Option<&str> {
        self.identity.as_ref().map(|id| id.name.as_str())
    }
}
