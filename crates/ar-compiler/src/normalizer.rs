use std::collections::HashSet;

use ar_core::policy::KeywordPolicy;
use ar_core::types::{ClassifiedEntry, HostsBuckets, Route, NULL_ROUTE_V4, NULL_ROUTE_V6};

use crate::classifier::{classify_document, strip_inline_comment};

/// Counters collected while normalizing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeStats {
    pub documents: usize,
    pub lines: usize,
    pub skipped: usize,
    pub unrecognized: usize,
    /// Hosts entries that were neither block rules nor allowed custom mappings
    pub discarded_entries: usize,
    pub ignored: usize,
    pub duplicates: usize,
    pub accepted: usize,
}

/// Stateful hosts normalizer for one run.
///
/// Entries must be fed in source order, then line order: the first occurrence
/// of a domain decides its bucket and every later occurrence is dropped.
pub struct HostsNormalizer {
    policy: KeywordPolicy,
    seen: HashSet<String>,
    buckets: HostsBuckets,
    stats: NormalizeStats,
}

impl HostsNormalizer {
    pub fn new(policy: KeywordPolicy) -> Self {
        log::debug!(
            "keyword policy: {} ignored host names, allow keywords {:?}",
            policy.ignore_keywords().count(),
            policy.allow_keywords()
        );
        Self {
            policy,
            seen: HashSet::new(),
            buckets: HostsBuckets::new(),
            stats: NormalizeStats::default(),
        }
    }

    /// Classify and ingest one whole document. Returns the number of domains accepted from it.
    pub fn ingest_document(&mut self, text: &str) -> usize {
        let before = self.stats.accepted;
        for entry in classify_document(text) {
            self.ingest(entry);
        }
        self.stats.documents += 1;

        let accepted = self.stats.accepted - before;
        log::debug!(
            "document {}: {} domains accepted, {} seen so far",
            self.stats.documents,
            accepted,
            self.seen.len()
        );
        accepted
    }

    pub fn ingest(&mut self, entry: ClassifiedEntry) {
        self.stats.lines += 1;

        match entry {
            ClassifiedEntry::Skip => self.stats.skipped += 1,
            ClassifiedEntry::Unrecognized => self.stats.unrecognized += 1,
            ClassifiedEntry::HostsEntry { ip, domains } => self.ingest_hosts_entry(&ip, &domains),
            ClassifiedEntry::AbpDomain { domain } | ClassifiedEntry::BareDomain { domain } => {
                self.accept(Route::Block, NULL_ROUTE_V4, &domain);
            }
        }
    }

    fn ingest_hosts_entry(&mut self, ip: &str, domains: &[String]) {
        let Some(route) = self.entry_route(ip, domains) else {
            self.stats.discarded_entries += 1;
            return;
        };

        for domain in domains {
            self.accept(route, ip, domain);
        }
    }

    /// Route shared by every domain of a hosts entry, or `None` to drop the entry.
    fn entry_route(&self, ip: &str, domains: &[String]) -> Option<Route> {
        if ip == NULL_ROUTE_V4 || ip == NULL_ROUTE_V6 {
            return Some(Route::Block);
        }

        // One matching domain is enough to keep the whole entry.
        if domains.iter().any(|d| self.policy.is_allowed_custom(d)) {
            return Some(Route::for_custom_ip(ip));
        }

        None
    }

    fn accept(&mut self, route: Route, ip: &str, raw_domain: &str) -> bool {
        let domain = strip_inline_comment(raw_domain).trim();
        if domain.is_empty() {
            return false;
        }

        if self.policy.is_ignored(domain) {
            self.stats.ignored += 1;
            return false;
        }

        if self.seen.contains(domain) {
            self.stats.duplicates += 1;
            return false;
        }
        self.seen.insert(domain.to_string());

        self.buckets.insert(route, ip, domain);
        self.stats.accepted += 1;
        true
    }

    pub fn stats(&self) -> NormalizeStats {
        self.stats
    }

    /// Inject the loopback lines and hand over the buckets.
    pub fn finish(mut self) -> HostsBuckets {
        self.buckets.inject_loopback();
        log::debug!("normalize stats: {:?}", self.stats);
        self.buckets
    }
}

/// Normalize `documents` in order with a fresh normalizer.
pub fn normalize_documents<I, S>(documents: I, policy: KeywordPolicy) -> (HostsBuckets, NormalizeStats)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut normalizer = HostsNormalizer::new(policy);
    for document in documents {
        normalizer.ingest_document(document.as_ref());
    }
    let stats = normalizer.stats();
    (normalizer.finish(), stats)
}
