//! # Terra Storage
//!
//! Snapshot storage backends for the Terra catalog cache.
//!
//! This crate provides the lowest-level persistence abstraction used by the
//! local catalog store and the preferences store. Backends are **opaque blob
//! stores**: they hold exactly one byte blob and replace it atomically. They
//! never interpret what they store.
//!
//! ## Design Principles
//!
//! - A backend holds at most one blob; "nothing stored yet" is distinguishable
//!   from "an empty blob was stored"
//! - `store` is all-or-nothing: readers see the old blob or the new one
//! - Must be `Send + Sync` so owners can share them behind a lock
//!
//! ## Available Backends
//!
//! - [`InMemoryBackend`] - For testing and ephemeral caches
//! - [`FileBackend`] - Persistent storage using write-then-rename swaps
//!
//! ## Example
//!
//! ```rust
//! use terra_storage::{StorageBackend, InMemoryBackend};
//!
//! let mut backend = InMemoryBackend::new();
//! assert!(backend.load().unwrap().is_none());
//!
//! backend.store(b"snapshot v1").unwrap();
//! assert_eq!(backend.load().unwrap().as_deref(), Some(&b"snapshot v1"[..]));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod error;
mod file;
mod memory;

pub use backend::StorageBackend;
pub use error::{StorageError, StorageResult};
pub use file::FileBackend;
pub use memory::InMemoryBackend;
