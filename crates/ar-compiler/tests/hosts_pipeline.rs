use ar_compiler::{normalize_documents, render_hosts, ArtifactHeader};
use ar_core::{KeywordPolicy, IPV4_LOOPBACK_LINE, IPV6_LOOPBACK_LINE};

const ACCELERATION: &str = "\
# GitHub520 Host Start
140.82.113.4                  github.com
2606:50c0:8000::154           github.githubassets.com
185.199.108.133               raw.githubusercontent.com #mirror
1.2.3.4                       not-allowed.com
# GitHub520 Host End
";

const DOMAINS: &str = "\
ads.example.com
tracker.example.org
github.com
";

const ABP: &str = "\
[Adblock Plus 2.0]
! Title: AWAvenue
||ads.example.com^
||pixel.example.net^
||ads.*.com^
@@||allowed.example.com^
";

const HOSTS: &str = "\
127.0.0.1 localhost myhost.local
::1 localhost ip6-localhost
0.0.0.0 0.0.0.0
0.0.0.0 pixel.example.net analytics.example.com
:: metrics.example.com
0.0.0.0 raw.githubusercontent.com
";

fn lines(text: &str, section: &str) -> Vec<String> {
    text.split("\n\n")
        .find(|block| block.starts_with(section))
        .map(|block| block.lines().skip(1).map(str::to_string).collect())
        .unwrap_or_default()
}

#[test]
fn test_sources_merge_in_order() {
    let (buckets, stats) =
        normalize_documents([ACCELERATION, DOMAINS, ABP, HOSTS], KeywordPolicy::default());

    let top: Vec<&str> = buckets.top.iter().map(String::as_str).collect();
    assert_eq!(
        top,
        vec![
            IPV4_LOOPBACK_LINE,
            "140.82.113.4 github.com",
            "185.199.108.133 raw.githubusercontent.com",
        ]
    );

    let bottom: Vec<&str> = buckets.bottom.iter().map(String::as_str).collect();
    assert_eq!(bottom, vec!["2606:50c0:8000::154 github.githubassets.com", IPV6_LOOPBACK_LINE]);

    let middle: Vec<&str> = buckets.middle.iter().map(String::as_str).collect();
    assert_eq!(
        middle,
        vec![
            "0.0.0.0 0.0.0.0",
            "0.0.0.0 ads.example.com",
            "0.0.0.0 analytics.example.com",
            "0.0.0.0 metrics.example.com",
            "0.0.0.0 pixel.example.net",
            "0.0.0.0 tracker.example.org",
            ":: 0.0.0.0",
            ":: ads.example.com",
            ":: analytics.example.com",
            ":: metrics.example.com",
            ":: pixel.example.net",
            ":: tracker.example.org",
        ]
    );

    assert_eq!(stats.documents, 4);
    assert_eq!(stats.discarded_entries, 1);
    // github.com, ads.example.com, pixel.example.net, raw.githubusercontent.com
    assert_eq!(stats.duplicates, 4);
}

#[test]
fn test_each_domain_emitted_once() {
    let (buckets, _) = normalize_documents([DOMAINS, DOMAINS, ABP, ABP], KeywordPolicy::default());
    let count = buckets
        .middle
        .iter()
        .filter(|line| line.ends_with(" ads.example.com"))
        .count();
    assert_eq!(count, 2);
}

#[test]
fn test_rendered_artifact_totals() {
    let (buckets, _) =
        normalize_documents([ACCELERATION, DOMAINS, ABP, HOSTS], KeywordPolicy::default());
    let text = render_hosts(&buckets, &ArtifactHeader::hosts(), "2025-01-01 00:00:00 UTC+8");

    let total = lines(&text, "# [Custom IPv4 / Localhost]").len()
        + lines(&text, "# [Blocklist / 0.0.0.0 & ::]").len()
        + lines(&text, "# [Custom IPv6 / Loopback]").len();
    assert_eq!(total, buckets.total_lines());
    assert!(text.contains(&format!("# Total lines: {}\n", total)));
    assert!(!text.contains("myhost.local"));
    assert!(!text.contains("not-allowed.com"));
    assert!(!text.contains('*'));
}
