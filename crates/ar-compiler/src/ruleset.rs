//! Rule-list merging for Clash rule providers.
//!
//! Sources are either rule-provider YAML (`payload:` sequence) or plain text
//! with one rule per line. Rules from every source are unioned.

use std::collections::BTreeSet;

/// How a source document was interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Payload,
    PlainText,
    /// A `payload` key that does not hold a sequence; the source is dropped
    Rejected,
}

#[derive(Debug, Default)]
pub struct RuleSetMerger {
    rules: BTreeSet<String>,
}

impl RuleSetMerger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one document. Returns its format and the number of new rules.
    pub fn ingest_document(&mut self, text: &str) -> (SourceFormat, usize) {
        let before = self.rules.len();

        let format = match parse_payload(text) {
            Payload::Entries(entries) => {
                for entry in &entries {
                    self.insert(entry);
                }
                SourceFormat::Payload
            }
            Payload::Malformed => {
                log::warn!("payload is not a sequence, dropping source");
                SourceFormat::Rejected
            }
            Payload::Absent => {
                for line in text.lines() {
                    self.insert(line);
                }
                SourceFormat::PlainText
            }
        };

        (format, self.rules.len() - before)
    }

    fn insert(&mut self, raw: &str) {
        let rule = raw.trim();
        if rule.is_empty() || rule.starts_with('#') {
            return;
        }
        if !self.rules.contains(rule) {
            self.rules.insert(rule.to_string());
        }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn finish(self) -> BTreeSet<String> {
        self.rules
    }
}

enum Payload {
    Entries(Vec<String>),
    Malformed,
    Absent,
}

/// String items of a top-level `payload` sequence, if `text` is such a YAML document.
fn parse_payload(text: &str) -> Payload {
    let yaml: serde_yaml::Value = match serde_yaml::from_str(text) {
        Ok(yaml) => yaml,
        Err(e) => {
            log::debug!("not a YAML document, falling back to plain text: {e}");
            return Payload::Absent;
        }
    };

    let Some(payload) = yaml.get("payload") else {
        return Payload::Absent;
    };
    let Some(payload) = payload.as_sequence() else {
        return Payload::Malformed;
    };

    let entries: Vec<String> = payload
        .iter()
        .filter_map(|item| item.as_str().map(str::to_string))
        .collect();

    if entries.len() < payload.len() {
        log::debug!("skipping {} non-string payload entries", payload.len() - entries.len());
    }
    Payload::Entries(entries)
}
