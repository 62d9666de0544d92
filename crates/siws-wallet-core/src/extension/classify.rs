//! Reclassification of opaque extension failures
//!
//! Extensions report failures as free-form messages whose wording differs per
//! vendor and release. The rules below map known wordings onto
//! [`ExtensionErrorKind`]; rules are tried in order and the first match wins.
//! Bump [`CLASSIFICATION_TABLE_VERSION`] whenever the table changes.

use crate::{Error, ExtensionErrorKind, ProviderError};
use regex::Regex;
use std::sync::LazyLock;

/// Version of [`CLASSIFICATION_RULES`]
pub const CLASSIFICATION_TABLE_VERSION: u32 = 1;

/// Patterns mapping to one error kind
#[derive(Debug, Clone, Copy)]
pub struct ClassificationRule {
    pub kind: ExtensionErrorKind,
    pub patterns: &'static [&'static str],
}

/// Ordered classification table
pub const CLASSIFICATION_RULES: &[ClassificationRule] = &[
    ClassificationRule {
        kind: ExtensionErrorKind::PendingAuth,
        patterns: &["pending", "not been auth"],
    },
    ClassificationRule {
        kind: ExtensionErrorKind::Unauthorized,
        patterns: &["not_auth", "not allowed"],
    },
    ClassificationRule {
        kind: ExtensionErrorKind::NoAccountsAuthorized,
        patterns: &["No.*wallet accounts"],
    },
];

static COMPILED_RULES: LazyLock<Vec<(ExtensionErrorKind, Vec<Regex>)>> = LazyLock::new(|| {
    CLASSIFICATION_RULES
        .iter()
        .map(|rule| {
            let patterns = rule
                .patterns
                .iter()
                .map(|pattern| Regex::new(pattern).expect("valid classification pattern"))
                .collect();
            (rule.kind, patterns)
        })
        .collect()
});

/// Map a failure message to an error kind, falling back to `Unknown`
pub fn classify_message(message: &str) -> ExtensionErrorKind {
    COMPILED_RULES
        .iter()
        .find(|(_, patterns)| patterns.iter().any(|re| re.is_match(message)))
        .map(|(kind, _)| *kind)
        .unwrap_or(ExtensionErrorKind::Unknown)
}

/// Turn an extension failure into a classified connection error
pub fn classify(err: ProviderError) -> Error {
    let kind = classify_message(err.message());
    Error::Connection {
        kind,
        message: err.message().to_string(),
        source: Some(err),
    }
}
