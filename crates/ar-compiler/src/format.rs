//! Artifact rendering: metadata header, hosts sections and rule payloads.

use std::collections::BTreeSet;

use ar_core::types::HostsBuckets;
use chrono::{DateTime, FixedOffset, Utc};

/// Offset applied to every update timestamp.
const UTC8_OFFSET_SECS: i32 = 8 * 3600;

pub const HOSTS_TITLE: &str = "Waster Ads Hosts";
pub const HOSTS_DESCRIPTION: &str = "Modified hosts file for system-wide ad blocking & GitHub acceleration.";
pub const RULES_TITLE: &str = "Waster Ads Rule";
pub const RULES_DESCRIPTION: &str = "Combined and deduplicated ad-blocking rules for Clash Meta or Premium.";

const SECTION_CUSTOM_V4: &str = "# [Custom IPv4 / Localhost]";
const SECTION_BLOCKLIST: &str = "# [Blocklist / 0.0.0.0 & ::]";
const SECTION_CUSTOM_V6: &str = "# [Custom IPv6 / Loopback]";

/// Render `now` as `YYYY-MM-DD HH:MM:SS UTC+8`, independent of the host timezone.
pub fn update_time_utc8(now: DateTime<Utc>) -> String {
    now.with_timezone(&utc8())
        .format("%Y-%m-%d %H:%M:%S UTC+8")
        .to_string()
}

fn utc8() -> FixedOffset {
    FixedOffset::east_opt(UTC8_OFFSET_SECS).expect("+08:00 is a valid offset")
}

/// Title and description written at the top of an artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactHeader {
    pub title: String,
    pub description: String,
}

impl ArtifactHeader {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn hosts() -> Self {
        Self::new(HOSTS_TITLE, HOSTS_DESCRIPTION)
    }

    pub fn rules() -> Self {
        Self::new(RULES_TITLE, RULES_DESCRIPTION)
    }

    /// Header block, ending with a newline.
    pub fn render(&self, total_lines: usize, update_time: &str) -> String {
        format!(
            "# Title: {}\n# Description: {}\n# --------------------------------------\n# Total lines: {}\n# Update time: {}\n",
            self.title, self.description, total_lines, update_time
        )
    }
}

/// Render the full hosts file.
pub fn render_hosts(buckets: &HostsBuckets, header: &ArtifactHeader, update_time: &str) -> String {
    let mut out = header.render(buckets.total_lines(), update_time);
    out.push('\n');

    push_section(&mut out, SECTION_CUSTOM_V4, &buckets.top);
    out.push('\n');
    push_section(&mut out, SECTION_BLOCKLIST, &buckets.middle);
    out.push('\n');
    push_section(&mut out, SECTION_CUSTOM_V6, &buckets.bottom);

    out
}

fn push_section(out: &mut String, title: &str, lines: &BTreeSet<String>) {
    out.push_str(title);
    out.push('\n');
    let body: Vec<&str> = lines.iter().map(String::as_str).collect();
    out.push_str(&body.join("\n"));
    out.push('\n');
}

/// Render a Clash rule-provider file with one quoted rule per payload item.
pub fn render_rule_list(rules: &BTreeSet<String>, header: &ArtifactHeader, update_time: &str) -> String {
    let mut out = header.render(rules.len(), update_time);
    out.push('\n');
    out.push_str("payload:\n");
    for rule in rules {
        out.push_str("  - '");
        out.push_str(&rule.replace('\'', "''"));
        out.push_str("'\n");
    }
    out
}
