use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use ar_compiler::{render_hosts, render_rule_list, update_time_utc8, HostsNormalizer, RuleSetMerger};
use ar_core::HostsBuckets;
use chrono::Utc;
use log::{error, info, warn};

use crate::cache::{read_document, CacheDir};
use crate::config::{Config, HostsConfig, RulesConfig};
use crate::error::AppError;
use crate::fetcher::{FetchedSource, Fetcher};

/// Outcome of one generator run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub sources: usize,
    pub fetched: usize,
    pub total_lines: usize,
    pub output: PathBuf,
    pub written: bool,
}

/// Fetch, normalize and write the hosts file.
pub async fn run_hosts(config: &Config, fetcher: &Fetcher) -> RunReport {
    let start = Instant::now();
    let hosts = &config.hosts;
    let fetched = fetcher.fetch_all(&hosts.sources).await;

    // Dropping the guard at the end of this function removes the cache.
    let cache = match CacheDir::create(&hosts.cache_dir) {
        Ok(cache) => Some(cache),
        Err(e) => {
            warn!("{e}; parsing downloads from memory");
            None
        }
    };
    let documents = load_documents(&fetched, cache.as_ref());

    let mut normalizer = HostsNormalizer::new(config.policy.to_policy());
    for document in &documents {
        normalizer.ingest_document(document);
    }
    let stats = normalizer.stats();
    let buckets = normalizer.finish();
    info!(
        "normalized {} lines: {} domains kept, {} duplicates, {} ignored, {} entries discarded",
        stats.lines, stats.accepted, stats.duplicates, stats.ignored, stats.discarded_entries
    );

    let written = write_hosts(hosts, &buckets);
    info!("hosts run finished in {:.1}ms", start.elapsed().as_secs_f64() * 1000.0);

    RunReport {
        sources: hosts.sources.len(),
        fetched: fetched.len(),
        total_lines: buckets.total_lines(),
        output: hosts.output.clone(),
        written,
    }
}

/// Documents in source order, read back through the cache when there is one.
fn load_documents(fetched: &[FetchedSource], cache: Option<&CacheDir>) -> Vec<String> {
    let Some(cache) = cache else {
        return fetched.iter().map(FetchedSource::text).collect();
    };

    info!("caching {} sources in {}", fetched.len(), cache.path().display());
    cache
        .store_all(fetched)
        .iter()
        .filter_map(|path| match read_document(path) {
            Ok(text) => Some(text),
            Err(e) => {
                warn!("{e}");
                None
            }
        })
        .collect()
}

fn write_hosts(hosts: &HostsConfig, buckets: &HostsBuckets) -> bool {
    let text = render_hosts(buckets, &hosts.header(), &update_time_utc8(Utc::now()));
    report_write(&hosts.output, write_artifact(&hosts.output, &text), buckets.total_lines())
}

/// Fetch, merge and write the Clash rule list.
pub async fn run_rules(config: &Config, fetcher: &Fetcher) -> RunReport {
    let start = Instant::now();
    let rules_config = &config.rules;
    let fetched = fetcher.fetch_all(&rules_config.sources).await;

    let mut merger = RuleSetMerger::new();
    for source in &fetched {
        let (format, added) = merger.ingest_document(&source.text());
        info!("parsed {} as {:?}: {} new rules", source.url, format, added);
    }
    let rules = merger.finish();

    let written = write_rules(rules_config, &rules);
    info!("rules run finished in {:.1}ms", start.elapsed().as_secs_f64() * 1000.0);

    RunReport {
        sources: rules_config.sources.len(),
        fetched: fetched.len(),
        total_lines: rules.len(),
        output: rules_config.output.clone(),
        written,
    }
}

fn write_rules(rules_config: &RulesConfig, rules: &std::collections::BTreeSet<String>) -> bool {
    let text = render_rule_list(rules, &rules_config.header(), &update_time_utc8(Utc::now()));
    report_write(&rules_config.output, write_artifact(&rules_config.output, &text), rules.len())
}

fn report_write(path: &Path, result: Result<(), AppError>, total_lines: usize) -> bool {
    match result {
        Ok(()) => {
            info!("wrote {} ({} lines)", path.display(), total_lines);
            true
        }
        Err(e) => {
            error!("{e}");
            false
        }
    }
}

pub fn write_artifact(path: &Path, text: &str) -> Result<(), AppError> {
    let output_error = |source| AppError::OutputWrite {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(output_error)?;
    }
    fs::write(path, text).map_err(output_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::test_server::{client, refused_url, serve_once};

    const ACCELERATION: &str = "140.82.113.4 github.com\n1.2.3.4 not-allowed.com\n";
    const BLOCKLIST: &str = "||ads.example.com^\n0.0.0.0 github.com tracker.example.org\n";

    fn test_config(root: &Path) -> Config {
        let mut config = Config::default();
        config.hosts.output = root.join("out").join("hosts.txt");
        config.hosts.cache_dir = root.join("download_cache");
        config.rules.output = root.join("rules.yaml");
        config
    }

    #[tokio::test]
    async fn test_run_hosts_end_to_end() {
        let root = tempfile::tempdir().unwrap();
        let mut config = test_config(root.path());
        config.hosts.sources = vec![
            serve_once("200 OK", ACCELERATION).await,
            refused_url().await,
            serve_once("200 OK", BLOCKLIST).await,
        ];

        let fetcher = Fetcher::with_client(client(), 2);
        let report = run_hosts(&config, &fetcher).await;

        assert_eq!(report.sources, 3);
        assert_eq!(report.fetched, 2);
        assert!(report.written);
        // github.com, loopback x2, ads + tracker dual-stack
        assert_eq!(report.total_lines, 7);
        assert!(!config.hosts.cache_dir.exists());

        let text = fs::read_to_string(&config.hosts.output).unwrap();
        assert!(text.contains("# Total lines: 7\n"));
        assert!(text.contains("140.82.113.4 github.com\n"));
        assert!(!text.contains("0.0.0.0 github.com"));
        assert!(text.contains(":: tracker.example.org\n"));
        assert!(text.contains(" UTC+8\n"));
    }

    #[tokio::test]
    async fn test_run_hosts_write_failure_still_cleans_cache() {
        let root = tempfile::tempdir().unwrap();
        let mut config = test_config(root.path());
        // The output path is an existing directory, so the write fails.
        config.hosts.output = root.path().to_path_buf();
        config.hosts.sources = vec![serve_once("200 OK", BLOCKLIST).await];

        let fetcher = Fetcher::with_client(client(), 1);
        let report = run_hosts(&config, &fetcher).await;

        assert!(!report.written);
        assert!(!config.hosts.cache_dir.exists());
    }

    #[tokio::test]
    async fn test_run_rules_end_to_end() {
        let root = tempfile::tempdir().unwrap();
        let mut config = test_config(root.path());
        config.rules.sources = vec![
            serve_once("200 OK", "payload:\n  - '+.ads.example.com'\n  - '+.b.com'\n").await,
            serve_once("200 OK", "# plain\n+.b.com\n+.c.com\n").await,
        ];

        let fetcher = Fetcher::with_client(client(), 2);
        let report = run_rules(&config, &fetcher).await;

        assert!(report.written);
        assert_eq!(report.total_lines, 3);
        let text = fs::read_to_string(&config.rules.output).unwrap();
        assert!(text.ends_with("payload:\n  - '+.ads.example.com'\n  - '+.b.com'\n  - '+.c.com'\n"));
    }

    #[test]
    fn test_load_documents_without_cache() {
        let fetched = vec![FetchedSource {
            index: 0,
            url: "https://example.com".to_string(),
            body: b"a.com\n".to_vec(),
        }];
        assert_eq!(load_documents(&fetched, None), vec!["a.com\n".to_string()]);
    }

    #[test]
    fn test_write_artifact_creates_parent() {
        let root = tempfile::tempdir().unwrap();
        let path = root.path().join("nested").join("hosts.txt");
        write_artifact(&path, "x\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "x\n");
    }

    #[test]
    fn test_write_artifact_error() {
        let root = tempfile::tempdir().unwrap();
        let err = write_artifact(root.path(), "x").unwrap_err();
        assert!(matches!(err, AppError::OutputWrite { .. }));
    }
}
