//! Fetching tags from the hosting API
//!
//! Requests go through the [`TagTransport`] trait. [`ReqwestTransport`] is
//! the blocking HTTP implementation; tests substitute canned responses.

use std::time::Duration;

use hpm_git::RepoIdentity;
use serde::Deserialize;

use crate::merge::{Reconciled, reconcile};
use crate::{Error, Result, TagCache, TagSet};

/// Largest page the tags endpoint serves.
pub const PER_PAGE: usize = 100;

/// Fixed timeout of every request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

pub const DEFAULT_API_BASE: &str = "https://api.github.com";

const USER_AGENT: &str = concat!("houdini-package-manager/", env!("CARGO_PKG_VERSION"));

/// Status and body of an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Issues GET requests against the hosting API.
///
/// Implementations return [`Error::Connection`] when the host cannot be
/// reached; every HTTP status, including errors, is a response.
pub trait TagTransport {
    fn get(&self, url: &str, query: &[(&str, String)]) -> Result<HttpResponse>;
}

impl<T: TagTransport + ?Sized> TagTransport for &T {
    fn get(&self, url: &str, query: &[(&str, String)]) -> Result<HttpResponse> {
        (**self).get(url, query)
    }
}

/// Blocking `reqwest` transport.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::Client {
                message: e.to_string(),
            })?;
        Ok(Self { client })
    }
}

impl TagTransport for ReqwestTransport {
    fn get(&self, url: &str, query: &[(&str, String)]) -> Result<HttpResponse> {
        let connection = |e: reqwest::Error| {
            tracing::error!(url, error = %e, "Fetch failed! Unable to establish connection");
            Error::Connection {
                url: url.to_string(),
                message: e.to_string(),
            }
        };

        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .query(query)
            .send()
            .map_err(connection)?;
        let status = response.status().as_u16();
        let body = response.text().map_err(connection)?;
        Ok(HttpResponse { status, body })
    }
}

#[derive(Deserialize)]
struct ApiTag {
    name: String,
}

/// Fetches the tags of one remote repository.
pub struct RemoteTagFetcher<'a, T: TagTransport + ?Sized> {
    transport: &'a T,
    identity: RepoIdentity,
    api_base: String,
}

impl<'a, T: TagTransport + ?Sized> RemoteTagFetcher<'a, T> {
    pub fn new(transport: &'a T, identity: RepoIdentity) -> Self {
        Self {
            transport,
            identity,
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn identity(&self) -> &RepoIdentity {
        &self.identity
    }

    /// `{api_base}/repos/{owner}/{name}/tags`
    pub fn url(&self) -> String {
        format!(
            "{}/{}",
            self.api_base.trim_end_matches('/'),
            self.identity.tags_endpoint()
        )
    }

    /// Fetch the first page only, or every page when `paginate` is set.
    ///
    /// Pagination stops at an empty page or one shorter than [`PER_PAGE`],
    /// since the API reports no total. A 403 or connection failure aborts
    /// the whole fetch; any other unsuccessful status ends it with what was
    /// gathered so far.
    pub fn fetch_all(&self, paginate: bool) -> Result<TagSet> {
        let url = self.url();

        if !paginate {
            let query = [("per_page", PER_PAGE.to_string())];
            let tags = self.fetch_page(&url, &query)?.unwrap_or_default();
            return Ok(TagSet::new(tags));
        }

        let mut all = Vec::new();
        let mut page = 1usize;
        loop {
            let query = [("per_page", PER_PAGE.to_string()), ("page", page.to_string())];
            let Some(tags) = self.fetch_page(&url, &query)? else {
                break;
            };
            let count = tags.len();
            all.extend(tags);
            if count < PER_PAGE {
                break;
            }
            page += 1;
        }

        tracing::debug!(repo = %self.identity, tags = all.len(), pages = page, "Fetched remote tags");
        Ok(TagSet::new(all))
    }

    /// One request. `None` when the API had nothing for this repository.
    fn fetch_page(&self, url: &str, query: &[(&str, String)]) -> Result<Option<Vec<String>>> {
        let response = self.transport.get(url, query)?;

        match response.status {
            200 => match serde_json::from_str::<Vec<ApiTag>>(&response.body) {
                Ok(tags) => Ok(Some(tags.into_iter().map(|tag| tag.name).collect())),
                Err(e) => {
                    tracing::warn!(url, error = %e, "Unexpected tag list format, ignoring response");
                    Ok(None)
                }
            },
            403 => {
                tracing::warn!(url, status = 403, "Fetch failed! Rate limited while fetching tags");
                Err(Error::RateLimited {
                    url: url.to_string(),
                })
            }
            status => {
                tracing::warn!(
                    repo = %self.identity,
                    url,
                    status,
                    "Failed to fetch tags (package most likely has no remote repository)"
                );
                Ok(None)
            }
        }
    }

    /// Fetch, reconcile with the cached tags of `name`, and store the result
    /// when it changed.
    pub fn fetch_and_merge(&self, name: &str, cache: &TagCache, paginate: bool) -> Result<Reconciled> {
        let fetched = self.fetch_all(paginate)?;
        let known = cache.get(name)?.map(|entry| entry.tags).unwrap_or_default();

        let reconciled = reconcile(&known, &fetched);
        if reconciled.is_changed() {
            cache.update(name, reconciled.tags())?;
        }
        tracing::debug!(package = name, result = ?reconciled, "Reconciled remote tags");
        Ok(reconciled)
    }

    /// Fetch every page, reconcile, and return the newest known tag.
    pub fn fetch_latest(&self, name: &str, cache: &TagCache) -> Result<Option<String>> {
        let reconciled = self.fetch_and_merge(name, cache, true)?;
        Ok(reconciled.latest().map(str::to_string))
    }
}
