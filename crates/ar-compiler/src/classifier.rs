use ar_core::types::ClassifiedEntry;

const LOOPBACK_IPS: [&str; 2] = ["127.0.0.1", "::1"];

/// Classify every line of `text` in file order.
pub fn classify_document(text: &str) -> impl Iterator<Item = ClassifiedEntry> + '_ {
    text.lines().map(classify_line)
}

/// Classify a single line of a source list.
///
/// Recognized dialects, tried in order:
/// - hosts syntax: `IP domain [domain...]`, IP token containing `.` or `:`
/// - ABP domain rule: `||domain^`
/// - bare domain: one token containing `.`
pub fn classify_line(raw_line: &str) -> ClassifiedEntry {
    let line = raw_line.trim();
    if line.is_empty() || is_comment_line(line) {
        return ClassifiedEntry::Skip;
    }

    let tokens: Vec<&str> = line.split_whitespace().collect();

    if let Some(entry) = parse_hosts_entry(&tokens) {
        return entry;
    }

    if let Some(rest) = line.strip_prefix("||") {
        return match normalize_domain(rest.trim_end_matches('^')) {
            Some(domain) => ClassifiedEntry::AbpDomain { domain },
            None => ClassifiedEntry::Unrecognized,
        };
    }

    if tokens.len() == 1 && line.contains('.') {
        return match normalize_domain(line) {
            Some(domain) => ClassifiedEntry::BareDomain { domain },
            None => ClassifiedEntry::Unrecognized,
        };
    }

    ClassifiedEntry::Unrecognized
}

fn is_comment_line(line: &str) -> bool {
    line.starts_with('!') || line.starts_with('#') || line.starts_with('[') || line.starts_with("@@")
}

fn parse_hosts_entry(tokens: &[&str]) -> Option<ClassifiedEntry> {
    let (&ip, rest) = tokens.split_first()?;
    if rest.is_empty() || !(ip.contains('.') || ip.contains(':')) {
        return None;
    }

    if LOOPBACK_IPS.contains(&ip) {
        return Some(ClassifiedEntry::Skip);
    }

    let domains = rest
        .iter()
        .map(|token| strip_inline_comment(token).trim())
        .filter(|domain| !domain.is_empty())
        .map(str::to_string)
        .collect();

    Some(ClassifiedEntry::HostsEntry {
        ip: ip.to_string(),
        domains,
    })
}

/// Domain of an ABP or bare-domain rule, or `None` for unsupported patterns.
fn normalize_domain(raw: &str) -> Option<String> {
    if raw.contains('/') || raw.contains('*') {
        return None;
    }

    let domain = strip_inline_comment(raw).trim();
    if domain.is_empty() {
        return None;
    }

    Some(domain.to_string())
}

/// Text before the first `#`.
pub(crate) fn strip_inline_comment(text: &str) -> &str {
    match text.find('#') {
        Some(pos) => &text[..pos],
        None => text,
    }
}
