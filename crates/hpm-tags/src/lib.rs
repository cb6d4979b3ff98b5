//! Remote tag fetching and caching for Houdini packages
//!
//! The latest version of a plugin is the newest tag of its remote
//! repository. Tags are fetched from the hosting API by a
//! [`RemoteTagFetcher`], reconciled with what the [`TagCache`] already
//! knows, and stored again when the list changed.

pub mod batch;
pub mod cache;
pub mod error;
pub mod fetcher;
pub mod merge;
pub mod natural;
pub mod tagset;

pub use batch::{BackgroundBatch, BatchEvent, BatchOptions, BatchRequest, fetch_batch, spawn_batch};
pub use cache::{TagCache, TagCacheEntry};
pub use error::{Error, Result};
pub use fetcher::{HttpResponse, RemoteTagFetcher, ReqwestTransport, TagTransport};
pub use merge::{Reconciled, reconcile};
pub use tagset::TagSet;
