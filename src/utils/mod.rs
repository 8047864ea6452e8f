use std::sync::OnceLock;

use regex::Regex;

static LIST_ID_RE: OnceLock<Regex> = OnceLock::new();

/// Escapes text for use inside HTML element content or a double-quoted attribute.
///
/// Mirrors `htmlspecialchars` with quote escaping enabled, which is what the
/// remote view-list engine expects when it reads hidden field values back.
pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(ch),
        }
    }
    out
}

/// List identifiers end up in element ids and in single-quoted script literals,
/// so they are limited to characters that need no escaping in either place.
pub fn is_safe_list_id(value: &str) -> bool {
    LIST_ID_RE
        .get_or_init(|| Regex::new(r"^[A-Za-z0-9_.:-]+$").expect("list id regex is valid"))
        .is_match(value)
}

/// Joins a base URL and a file name, making sure exactly one slash separates them.
pub fn join_url(base: &str, file: &str) -> String {
    let base = base.trim();
    let file = file.trim_start_matches('/');
    if base.is_empty() {
        return file.to_string();
    }
    if base.ends_with('/') {
        format!("{base}{file}")
    } else {
        format!("{base}/{file}")
    }
}

pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

pub fn normalize_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}
