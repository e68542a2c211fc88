//! AdsReject List Compiler
//!
//! This crate turns raw ad-blocking lists into the AdsReject artifacts:
//! hosts files with per-domain dedup and Clash rule-provider payloads.

pub mod classifier;
pub mod format;
pub mod normalizer;
pub mod ruleset;

pub use classifier::{classify_document, classify_line};
pub use format::{render_hosts, render_rule_list, update_time_utc8, ArtifactHeader};
pub use normalizer::{normalize_documents, HostsNormalizer, NormalizeStats};
pub use ruleset::{RuleSetMerger, SourceFormat};
