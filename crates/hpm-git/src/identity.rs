//! Remote repository identity parsed from a clone URL

use std::fmt;

/// The `(owner, name)` pair that addresses a repository on the hosting API.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoIdentity {
    pub owner: String,
    pub name: String,
}

impl RepoIdentity {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Parse the identity from a remote URL of the form `.../owner/name[.git]`.
    ///
    /// The last two `/`-separated segments are used. An scp-style URL such as
    /// `git@github.com:owner/name.git` is accepted as well since the host part
    /// ends with `:` rather than `/`.
    ///
    /// Returns `None` when fewer than two non-empty segments are present.
    pub fn from_remote_url(url: &str) -> Option<Self> {
        let trimmed = url.trim().trim_end_matches('/');
        let trimmed = trimmed.strip_suffix(".git").unwrap_or(trimmed);

        let mut segments = trimmed.rsplit(['/', ':']);
        let name = segments.next().filter(|s| !s.is_empty())?;
        let owner = segments.next().filter(|s| !s.is_empty())?;

        Some(Self::new(owner, name))
    }

    /// Path of the tag listing endpoint relative to the API base.
    pub fn tags_endpoint(&self) -> String {
        format!("repos/{}/{}/tags", self.owner, self.name)
    }
}

impl fmt::Display for RepoIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}
