#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/vendor-health/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Storage for vendor statements and metrics.
//!
//! This crate provides implementations of the [`MetricsStore`] trait from `vendor-core`:
//!
//! - [`SqliteStore`] - Persistent SQLite-based store (default, requires `sqlite` feature)
//! - [`InMemoryStore`] - Simple in-memory store for testing
//!
//! and [`TtlCache`], a keyed cache with a fixed time to live.

/// In-memory store implementation.
pub mod memory;
/// Time-to-live cache.
pub mod ttl;

/// SQLite-based store implementation.
#[cfg(feature = "sqlite")]
pub mod sqlite;

// Re-export the trait for convenience
pub use vendor_core::MetricsStore;

// Re-export implementations
pub use memory::InMemoryStore;
pub use ttl::{Cached, TtlCache};

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;
