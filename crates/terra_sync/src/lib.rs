//! # Terra Sync
//!
//! Synchronization engine for the Terra catalog cache.
//!
//! This crate provides:
//! - [`RemoteSource`]: the authoritative full-catalog source, with an HTTP
//!   implementation ([`HttpRemoteSource`]) and a scripted mock
//! - [`CachePolicy`]: per-request choice between cached and remote data
//! - [`SyncEngine`]: runs each request as a cancellable
//!   [`ResourceStream`] of [`Resource`] states
//! - [`Catalog`]: the facade handed to UI collaborators
//!
//! ## Architecture
//!
//! A request is two sequential phases on one task:
//! 1. Read and emit from the local store (when the policy allows)
//! 2. Fetch the full remote catalog, decode it in memory, replace the local
//!    snapshot atomically, and emit the fresh data
//!
//! ## Key Invariants
//!
//! - Every request emits exactly one `Loading` first and never ends in it
//! - `Success` never carries partial or mixed data
//! - A failed, cancelled or undecodable refresh leaves the store untouched
//! - Refreshes never interleave

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod catalog;
mod config;
mod engine;
mod error;
mod http;
mod policy;
mod remote;
mod state;
mod stream;

pub use catalog::Catalog;
pub use config::{SyncConfig, DEFAULT_BASE_URL, DEFAULT_FIELDS};
pub use engine::SyncEngine;
pub use error::{SyncError, SyncResult};
pub use http::HttpRemoteSource;
pub use policy::CachePolicy;
pub use remote::{MockRemoteSource, RemoteSource};
pub use state::{Resource, SyncStats};
pub use stream::ResourceStream;
