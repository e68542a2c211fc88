//! AdsReject Core Library
//!
//! Shared definitions for the AdsReject list aggregator. The compiler crate
//! turns raw list text into these types, and the CLI crate drives the
//! pipeline and writes the artifacts.
//!
//! # Modules
//!
//! - `types`: classified lines, bucket routing and the hosts buckets
//! - `policy`: ignore/allow keyword sets injected into the normalizer

pub mod policy;
pub mod types;

// Re-export commonly used types
pub use policy::KeywordPolicy;
pub use types::{ClassifiedEntry, HostsBuckets, Route, IPV4_LOOPBACK_LINE, IPV6_LOOPBACK_LINE};
