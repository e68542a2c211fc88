//! Core type definitions for AdsReject
//!
//! A raw list line is classified into a [`ClassifiedEntry`], surviving
//! domains are routed with a [`Route`], and the resulting hosts lines are
//! collected into [`HostsBuckets`].

use std::collections::BTreeSet;

// =============================================================================
// Fixed loopback lines (injected after normalization, never parsed)
// =============================================================================

/// IPv4 loopback line placed in the custom IPv4 bucket.
pub const IPV4_LOOPBACK_LINE: &str = "127.0.0.1 localhost";

/// IPv6 loopback line placed in the custom IPv6 bucket.
pub const IPV6_LOOPBACK_LINE: &str = "::1 localhost ip6-localhost ip6-loopback";

/// Null routes that mark a hosts entry as a block rule.
pub const NULL_ROUTE_V4: &str = "0.0.0.0";
pub const NULL_ROUTE_V6: &str = "::";

// =============================================================================
// Classified lines
// =============================================================================

/// Interpretation of one stripped line of a source document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifiedEntry {
    /// Empty line, comment, section header or exception rule
    Skip,
    /// `IP domain [domain...]`
    HostsEntry { ip: String, domains: Vec<String> },
    /// `||domain^`
    AbpDomain { domain: String },
    /// A lone domain token
    BareDomain { domain: String },
    /// Anything else, dropped silently
    Unrecognized,
}

// =============================================================================
// Routing
// =============================================================================

/// Destination of a domain that survived dedup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// Allowed custom mapping with an IPv4 address (top bucket)
    Custom4,
    /// Dual-stack null route (middle bucket)
    Block,
    /// Allowed custom mapping with an IPv6 address (bottom bucket)
    Custom6,
}

impl Route {
    /// Route for an allowed custom mapping, picked by address family.
    pub fn for_custom_ip(ip: &str) -> Self {
        if ip.contains(':') {
            Self::Custom6
        } else {
            Self::Custom4
        }
    }
}

// =============================================================================
// Buckets
// =============================================================================

/// The three sections of the generated hosts file.
///
/// Sorted sets, so duplicates collapse and iteration is already in output order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostsBuckets {
    /// Custom IPv4 mappings and the IPv4 loopback
    pub top: BTreeSet<String>,
    /// `0.0.0.0` and `::` block lines
    pub middle: BTreeSet<String>,
    /// Custom IPv6 mappings and the IPv6 loopback
    pub bottom: BTreeSet<String>,
}

impl HostsBuckets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert the line(s) for `domain` according to `route`.
    ///
    /// `ip` is only used by the custom routes.
    pub fn insert(&mut self, route: Route, ip: &str, domain: &str) {
        match route {
            Route::Custom4 => {
                self.top.insert(format!("{ip} {domain}"));
            }
            Route::Custom6 => {
                self.bottom.insert(format!("{ip} {domain}"));
            }
            Route::Block => {
                self.middle.insert(format!("{NULL_ROUTE_V4} {domain}"));
                self.middle.insert(format!("{NULL_ROUTE_V6} {domain}"));
            }
        }
    }

    /// Add the fixed loopback lines.
    pub fn inject_loopback(&mut self) {
        self.top.insert(IPV4_LOOPBACK_LINE.to_string());
        self.bottom.insert(IPV6_LOOPBACK_LINE.to_string());
    }

    /// Number of lines across all buckets.
    pub fn total_lines(&self) -> usize {
        self.top.len() + self.middle.len() + self.bottom.len()
    }
}
