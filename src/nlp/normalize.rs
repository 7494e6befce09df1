//! Ticket text normalization for recurring-issue matching.
//!
//! Variable fragments (ids, references, phone numbers, emails, dates,
//! amounts, long numbers, versions) are replaced by placeholders so that
//! two tickets describing the same problem normalize to the same text.

use std::sync::LazyLock;

use regex::Regex;

use crate::parser::types::TicketRecord;

// ── Static regex ──────────────────────────────────────────────────────────────

/// Placeholder substitutions, applied in this order on lower-cased text.
static SUBSTITUTIONS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"\b[a-z]{2,4}-\d+\b", "[ticket_id]"),
        (r"\b[a-z0-9]{8,20}\b", "[reference]"),
        (r"\b\d{10,12}\b", "[phone]"),
        (r"\b[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}\b", "[email]"),
        (r"\b\d{1,2}[/-]\d{1,2}[/-]\d{2,4}\b", "[date]"),
        (r"[₹$€£]\s*\d+[.,]?\d*", "[amount]"),
        (r"\b\d{4,}\b", "[number]"),
        (r"version\s*\d+\.\d+", "version [x.x]"),
    ]
    .into_iter()
    .map(|(pattern, replacement)| {
        (
            Regex::new(pattern).expect("SUBSTITUTIONS: invalid pattern"),
            replacement,
        )
    })
    .collect()
});

static WHITESPACE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("WHITESPACE_REGEX: invalid pattern"));

// ── Keywords ──────────────────────────────────────────────────────────────────

/// Technical keywords; the first one found is repeated at the front of the
/// normalized text to weight it in similarity.
const TECH_KEYWORDS: &[&str] = &[
    "error",
    "failed",
    "timeout",
    "connection",
    "unable",
    "cannot",
    "invalid",
    "missing",
    "not found",
    "access denied",
    "permission",
    "server",
    "database",
    "network",
    "api",
    "sync",
    "login",
    "password",
];

/// Normalize free text, truncated to `max_chars` characters.
pub fn normalize_text(text: &str, max_chars: usize) -> String {
    let mut out = text.trim().to_lowercase();

    for (regex, replacement) in SUBSTITUTIONS.iter() {
        out = regex.replace_all(&out, *replacement).into_owned();
    }

    let mut out = WHITESPACE_REGEX.replace_all(&out, " ").trim().to_string();

    if let Some(keyword) = TECH_KEYWORDS.iter().find(|k| out.contains(*k)) {
        out = format!("{} {}", keyword, out);
    }

    out.chars().take(max_chars).collect()
}

/// Subject, sub-category and resolution text joined by single spaces;
/// absent fields contribute empty strings.
pub fn combined_text(ticket: &TicketRecord) -> String {
    format!(
        "{} {} {}",
        ticket.subject.as_deref().unwrap_or(""),
        ticket.sub_category.as_deref().unwrap_or(""),
        ticket.resolution.as_deref().unwrap_or("")
    )
}
