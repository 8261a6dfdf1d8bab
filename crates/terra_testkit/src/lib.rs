//! # Terra Testkit
//!
//! Test utilities for the Terra catalog cache.
//!
//! This crate provides:
//! - Fixtures: a sample remote payload in wire shape, its decoded records,
//!   and small record builders
//! - Property-based test generators using proptest
//!
//! ## Usage
//!
//! ```rust,ignore
//! use terra_testkit::prelude::*;
//!
//! proptest! {
//!     #[test]
//!     fn replace_is_idempotent(catalog in catalog_strategy(30)) {
//!         // ...
//!     }
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use proptest::prelude::*;
}

pub use fixtures::*;
pub use generators::*;
