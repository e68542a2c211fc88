//! Keyword policy applied by the hosts normalizer.

use std::collections::HashSet;

/// Host names that are never emitted, compared lowercased.
pub const DEFAULT_IGNORE_KEYWORDS: &[&str] = &[
    "localhost",
    "ip6-localhost",
    "ip6-loopback",
    "broadcasthost",
    "hostname",
    "local",
    "ip6-localnet",
    "ip6-mcastprefix",
    "ip6-allnodes",
    "ip6-allrouters",
];

/// Substrings that let a non-null hosts entry keep its own IP.
pub const DEFAULT_ALLOW_CUSTOM_KEYWORDS: &[&str] = &["github", "githubusercontent", "githubassets"];

/// Immutable ignore/allow sets for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordPolicy {
    ignore: HashSet<String>,
    allow_custom: Vec<String>,
}

impl KeywordPolicy {
    /// Build a policy from arbitrary keyword lists. Keywords are lowercased.
    pub fn new<I, A>(ignore: I, allow_custom: A) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        A: IntoIterator,
        A::Item: AsRef<str>,
    {
        let ignore = ignore
            .into_iter()
            .map(|k| k.as_ref().to_ascii_lowercase())
            .collect();
        let mut allow_custom: Vec<String> = allow_custom
            .into_iter()
            .map(|k| k.as_ref().to_ascii_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        allow_custom.sort();
        allow_custom.dedup();
        Self { ignore, allow_custom }
    }

    /// True if `domain` (any case) is a reserved host name.
    pub fn is_ignored(&self, domain: &str) -> bool {
        self.ignore.contains(&domain.to_lowercase())
    }

    /// True if `domain` (any case) contains an allow keyword.
    pub fn is_allowed_custom(&self, domain: &str) -> bool {
        let lower = domain.to_lowercase();
        self.allow_custom.iter().any(|k| lower.contains(k.as_str()))
    }

    pub fn ignore_keywords(&self) -> impl Iterator<Item = &str> {
        self.ignore.iter().map(String::as_str)
    }

    pub fn allow_keywords(&self) -> &[String] {
        &self.allow_custom
    }
}

impl Default for KeywordPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_IGNORE_KEYWORDS, DEFAULT_ALLOW_CUSTOM_KEYWORDS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ignore_case_insensitive() {
        let policy = KeywordPolicy::default();
        assert!(policy.is_ignored("localhost"));
        assert!(policy.is_ignored("LocalHost"));
        assert!(policy.is_ignored("ip6-allrouters"));
        assert!(!policy.is_ignored("localhost.example.com"));
    }

    #[test]
    fn test_default_allow_is_substring_match() {
        let policy = KeywordPolicy::default();
        assert!(policy.is_allowed_custom("raw.githubusercontent.com"));
        assert!(policy.is_allowed_custom("GITHUB.COM"));
        assert!(policy.is_allowed_custom("github.githubassets.com"));
        assert!(!policy.is_allowed_custom("gitlab.com"));
    }

    #[test]
    fn test_custom_policy() {
        let policy = KeywordPolicy::new(["Router"], ["Mirror", ""]);
        assert!(policy.is_ignored("router"));
        assert!(!policy.is_ignored("localhost"));
        assert!(policy.is_allowed_custom("cdn.mirror.net"));
        assert!(!policy.is_allowed_custom("github.com"));
        assert_eq!(policy.allow_keywords(), ["mirror".to_string()]);
    }

    #[test]
    fn test_keyword_listing() {
        let policy = KeywordPolicy::new(["Router", "router", "NAS"], ["github"]);
        let mut ignored: Vec<&str> = policy.ignore_keywords().collect();
        ignored.sort();
        assert_eq!(ignored, vec!["nas", "router"]);
        assert_eq!(KeywordPolicy::default().ignore_keywords().count(), 10);
        assert_eq!(KeywordPolicy::default().allow_keywords().len(), 3);
    }

    #[test]
    fn test_empty_policy_allows_nothing() {
        let policy = KeywordPolicy::new(Vec::<String>::new(), Vec::<String>::new());
        assert!(!policy.is_ignored("localhost"));
        assert!(!policy.is_allowed_custom("github.com"));
    }
}
