//! Deciding whether a top-level token is a listener address.
//!
//! The Caddyfile grammar has no marker separating a site address from a
//! directive keyword, so the parser asks an [`AddressClassifier`]. The
//! default [`HeuristicClassifier`] looks at the token's shape only.

use std::collections::HashSet;

/// Strategy used by the parser to tell site addresses from keywords.
///
/// Implementations must be pure: the same token always gets the same
/// answer.
pub trait AddressClassifier {
    fn is_site_address(&self, token: &str) -> bool;
}

/// Shape-based classifier used by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeuristicClassifier;

impl AddressClassifier for HeuristicClassifier {
    fn is_site_address(&self, token: &str) -> bool {
        is_site_address(token)
    }
}

/// Table-driven classifier: every token is an address unless it is a
/// structural token or appears in the reserved keyword list.
///
/// Unlike the heuristic, this accepts bare host names such as `intranet`
/// as long as the caller's registry does not reserve them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryClassifier {
    keywords: HashSet<String>,
}

impl RegistryClassifier {
    /// Build a classifier from a list of reserved directive keywords.
    #[must_use]
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keywords: keywords.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether `word` is in the reserved keyword list.
    #[must_use]
    pub fn is_reserved(&self, word: &str) -> bool {
        self.keywords.contains(word)
    }
}

impl AddressClassifier for RegistryClassifier {
    fn is_site_address(&self, token: &str) -> bool {
        !is_structural(token) && !self.is_reserved(token)
    }
}

/// Whether `token` looks like a site address.
///
/// Rejects braces, snippet references `(name)` and matcher names `@name`.
/// Accepts tokens containing `.` or `:`, URLs with an `http://` or
/// `https://` scheme, `localhost` with or without a port, and dotted-quad
/// IPs. Everything else is treated as a directive keyword.
#[must_use]
pub fn is_site_address(token: &str) -> bool {
    if is_structural(token) {
        return false;
    }

    token.contains('.')
        || token.contains(':')
        || token.starts_with("http://")
        || token.starts_with("https://")
        || token == "localhost"
        || token.starts_with("localhost:")
        || is_dotted_quad(token)
}

fn is_structural(token: &str) -> bool {
    token.is_empty()
        || token == "{"
        || token == "}"
        || token.starts_with('(')
        || token.starts_with('@')
}

fn is_dotted_quad(token: &str) -> bool {
    let parts: Vec<&str> = token.split('.').collect();
    parts.len() == 4
        && parts
            .iter()
            .all(|p| !p.is_empty() && p.len() <= 3 && p.bytes().all(|b| b.is_ascii_digit()))
}
