//! Fetching tags for many packages in a row
//!
//! Packages are fetched one at a time. The first rate limit or connection
//! failure ends the batch; whatever was stored before it stays cached.

use std::sync::mpsc::{self, Receiver};
use std::thread::{self, JoinHandle};

use hpm_git::RepoIdentity;

use crate::fetcher::{DEFAULT_API_BASE, RemoteTagFetcher, TagTransport};
use crate::merge::Reconciled;
use crate::{Error, Result, TagCache};

/// One package to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchRequest {
    pub name: String,
    /// `None` when the package has no remote repository
    pub identity: Option<RepoIdentity>,
}

impl BatchRequest {
    pub fn new(name: impl Into<String>, identity: Option<RepoIdentity>) -> Self {
        Self {
            name: name.into(),
            identity,
        }
    }
}

/// Progress of a batch, reported per package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchEvent {
    Fetched { name: String, reconciled: Reconciled },
    /// No remote repository to ask
    Skipped { name: String },
}

impl BatchEvent {
    pub fn name(&self) -> &str {
        match self {
            BatchEvent::Fetched { name, .. } | BatchEvent::Skipped { name } => name,
        }
    }
}

/// Settings shared by every fetch of a batch.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub api_base: String,
    pub paginate: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            paginate: true,
        }
    }
}

/// Fetch every request in order, reporting each outcome to `on_event`.
///
/// Stops at the first error and returns it.
pub fn fetch_batch_with<T, F>(
    requests: &[BatchRequest],
    cache: &TagCache,
    transport: &T,
    options: &BatchOptions,
    mut on_event: F,
) -> Result<()>
where
    T: TagTransport + ?Sized,
    F: FnMut(BatchEvent),
{
    for request in requests {
        let Some(identity) = &request.identity else {
            on_event(BatchEvent::Skipped {
                name: request.name.clone(),
            });
            continue;
        };

        let fetcher = RemoteTagFetcher::new(transport, identity.clone())
            .with_api_base(options.api_base.as_str());
        let reconciled = fetcher
            .fetch_and_merge(&request.name, cache, options.paginate)
            .inspect_err(|e| {
                tracing::warn!(package = %request.name, error = %e, "Batch fetch aborted");
            })?;

        on_event(BatchEvent::Fetched {
            name: request.name.clone(),
            reconciled,
        });
    }
    Ok(())
}

/// Fetch every request in order and collect the outcomes.
pub fn fetch_batch<T>(
    requests: &[BatchRequest],
    cache: &TagCache,
    transport: &T,
    options: &BatchOptions,
) -> Result<Vec<BatchEvent>>
where
    T: TagTransport + ?Sized,
{
    let mut events = Vec::new();
    fetch_batch_with(requests, cache, transport, options, |event| events.push(event))?;
    Ok(events)
}

/// A batch running on a worker thread.
///
/// Events arrive on [`events`](Self::events) as packages finish; the error
/// that ended the batch, if any, comes from [`join`](Self::join).
pub struct BackgroundBatch {
    pub events: Receiver<BatchEvent>,
    handle: JoinHandle<Result<()>>,
}

impl BackgroundBatch {
    /// Wait for the worker and return how the batch ended.
    pub fn join(self) -> Result<()> {
        self.handle.join().map_err(|_| Error::WorkerPanicked)?
    }
}

/// Run [`fetch_batch_with`] on a worker thread.
pub fn spawn_batch<T>(
    requests: Vec<BatchRequest>,
    cache: TagCache,
    transport: T,
    options: BatchOptions,
) -> BackgroundBatch
where
    T: TagTransport + Send + 'static,
{
    let (sender, events) = mpsc::channel();
    let handle = thread::spawn(move || {
        fetch_batch_with(&requests, &cache, &transport, &options, |event| {
            // A dropped receiver does not stop the batch
            let _ = sender.send(event);
        })
    });
    BackgroundBatch { events, handle }
}
