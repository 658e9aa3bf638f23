#![forbid(unsafe_code)]

//! Cluster result fetching and caching.
//!
//! # Role in bioscatter
//! `bioscatter-client` owns everything between the viewer and the
//! clustering backend: the HTTP (or legacy static-file) transport, the
//! persistent per-algorithm result cache, the single-flight guard that
//! collapses duplicate requests, and the cancellation token that lets a
//! newer selection abandon a stale fetch.
//!
//! # Backend-load-avoidance contract
//! [`ClusterClient::get_or_fetch`] issues zero backend calls on a cache
//! hit and exactly one on a miss; only a successful fetch writes a cache
//! entry. A corrupt entry is treated as a miss and re-fetched, never a
//! crash.

pub mod algorithm;
pub mod backend;
pub mod cache;
pub mod cancel;
pub mod client;
pub mod error;

pub use algorithm::Algorithm;
pub use backend::{ClusterBackend, ClusterRequest, HttpBackend, StaticFileBackend};
pub use cache::{CacheStore, FileCache, MemoryCache};
pub use cancel::{CancellationSource, CancellationToken};
pub use client::ClusterClient;
pub use error::{DeserializeError, FetchError};
