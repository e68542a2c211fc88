//! Run configuration.
//!
//! Every field has a built-in default, so a run needs no configuration at all.
//! A TOML file may override any subset of it.

use std::fs;
use std::path::{Path, PathBuf};

use ar_compiler::format::{HOSTS_DESCRIPTION, HOSTS_TITLE, RULES_DESCRIPTION, RULES_TITLE};
use ar_compiler::ArtifactHeader;
use ar_core::policy::{DEFAULT_ALLOW_CUSTOM_KEYWORDS, DEFAULT_IGNORE_KEYWORDS};
use ar_core::KeywordPolicy;
use serde::Deserialize;

use crate::error::AppError;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";
const DEFAULT_MAX_CONCURRENT: usize = 5;

const DEFAULT_HOSTS_OUTPUT: &str = "ads-rule-hosts.txt";
const DEFAULT_CACHE_DIR: &str = "download_cache";
const DEFAULT_RULES_OUTPUT: &str = "clash-ads-reject.yaml";

/// Hosts sources, in precedence order: earlier sources win duplicate domains.
const DEFAULT_HOSTS_SOURCES: &[&str] = &[
    "https://raw.githubusercontent.com/521xueweihan/GitHub520/main/hosts",
    "https://anti-ad.net/domains.txt",
    "https://raw.githubusercontent.com/TG-Twilight/AWAvenue-Ads-Rule/main/Filters/AWAvenue-Ads-Rule-hosts.txt",
    "https://raw.githubusercontent.com/lingeringsound/10007_auto/master/reward",
];

const DEFAULT_RULES_SOURCES: &[&str] = &[
    "https://fastly.jsdelivr.net/gh/Loyalsoldier/clash-rules@release/reject.txt",
    "https://raw.githubusercontent.com/TG-Twilight/AWAvenue-Ads-Rule/main/Filters/AWAvenue-Ads-Rule-Clash.yaml",
    "https://anti-ad.net/clash.yaml",
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub fetch: FetchConfig,
    pub policy: PolicyConfig,
    pub hosts: HostsConfig,
    pub rules: RulesConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FetchConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
    pub max_concurrent: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PolicyConfig {
    pub ignore_keywords: Vec<String>,
    pub allow_custom_keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HostsConfig {
    pub output: PathBuf,
    pub cache_dir: PathBuf,
    pub title: String,
    pub description: String,
    pub sources: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RulesConfig {
    pub output: PathBuf,
    pub title: String,
    pub description: String,
    pub sources: Vec<String>,
}

impl Config {
    /// Built-in configuration, or the TOML file at `path` layered over it.
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let content = fs::read_to_string(path).map_err(|source| AppError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| AppError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
        }
    }
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            ignore_keywords: to_strings(DEFAULT_IGNORE_KEYWORDS),
            allow_custom_keywords: to_strings(DEFAULT_ALLOW_CUSTOM_KEYWORDS),
        }
    }
}

impl PolicyConfig {
    pub fn to_policy(&self) -> KeywordPolicy {
        KeywordPolicy::new(&self.ignore_keywords, &self.allow_custom_keywords)
    }
}

impl Default for HostsConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_HOSTS_OUTPUT),
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            title: HOSTS_TITLE.to_string(),
            description: HOSTS_DESCRIPTION.to_string(),
            sources: to_strings(DEFAULT_HOSTS_SOURCES),
        }
    }
}

impl HostsConfig {
    pub fn header(&self) -> ArtifactHeader {
        ArtifactHeader::new(&self.title, &self.description)
    }
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_RULES_OUTPUT),
            title: RULES_TITLE.to_string(),
            description: RULES_DESCRIPTION.to_string(),
            sources: to_strings(DEFAULT_RULES_SOURCES),
        }
    }
}

impl RulesConfig {
    pub fn header(&self) -> ArtifactHeader {
        ArtifactHeader::new(&self.title, &self.description)
    }
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
