use serde::{Deserialize, Serialize};

/// Complete Caddyfile document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caddyfile {
    pub global_options: Option<GlobalOptions>,
    pub snippets: Vec<Snippet>,
    pub sites: Vec<Site>,
}

/// Global options block: the first bare `{ ... }` at top level.
///
/// The directive tree is the only stored state. Well-known options such
/// as `email()` or `log()` are read from it on demand, see
/// [`crate::global`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalOptions {
    pub directives: Vec<Directive>,
    /// Original source text, braces included. Empty when built in code.
    pub raw_block: String,
}

/// Reusable snippet: `(name) { ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    pub name: String,
    pub directives: Vec<Directive>,
}

/// Site block: one or more listener addresses and their directives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    pub addresses: Vec<String>,
    pub directives: Vec<Directive>,
    /// Original source text from the first address through the closing
    /// brace. Empty when built in code.
    pub raw_block: String,
}

/// One configuration statement with an optional nested block.
///
/// Matcher definitions are plain directives whose name starts with `@`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directive {
    pub name: String,
    pub args: Vec<String>,
    /// Nested directives; empty when the statement had no `{ ... }` body.
    pub block: Vec<Self>,
}

impl Directive {
    /// First direct child with the given name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Self> {
        self.block.iter().find(|d| d.name == name)
    }

    /// First argument, if any.
    #[must_use]
    pub fn first_arg(&self) -> Option<&str> {
        self.args.first().map(String::as_str)
    }

    /// Whether this directive defines a named matcher (`@name ...`).
    #[must_use]
    pub fn is_matcher(&self) -> bool {
        self.name.starts_with('@')
    }
}

impl Site {
    /// Snippet names pulled in by direct-child `import` directives, in
    /// the order they appear.
    #[must_use]
    pub fn imports(&self) -> Vec<&str> {
        self.directives
            .iter()
            .filter(|d| d.name == "import")
            .filter_map(Directive::first_arg)
            .collect()
    }

    /// Whether any of the site's addresses equals `address`.
    #[must_use]
    pub fn has_address(&self, address: &str) -> bool {
        self.addresses.iter().any(|a| a == address)
    }
}

impl Caddyfile {
    /// First site listening on `address`.
    #[must_use]
    pub fn find_site(&self, address: &str) -> Option<&Site> {
        self.sites.iter().find(|s| s.has_address(address))
    }

    /// Mutable access to the first site listening on `address`.
    pub fn find_site_mut(&mut self, address: &str) -> Option<&mut Site> {
        self.sites.iter_mut().find(|s| s.has_address(address))
    }

    /// Remove and return the first site listening on `address`.
    pub fn remove_site(&mut self, address: &str) -> Option<Site> {
        let idx = self.sites.iter().position(|s| s.has_address(address))?;
        Some(self.sites.remove(idx))
    }

    /// Snippet with the given name.
    #[must_use]
    pub fn find_snippet(&self, name: &str) -> Option<&Snippet> {
        self.snippets.iter().find(|s| s.name == name)
    }

    /// Import names used by sites that match no defined snippet, in
    /// first-use order without duplicates.
    #[must_use]
    pub fn undefined_imports(&self) -> Vec<&str> {
        let mut missing: Vec<&str> = Vec::new();
        for name in self.sites.iter().flat_map(Site::imports) {
            if self.find_snippet(name).is_none() && !missing.contains(&name) {
                missing.push(name);
            }
        }
        missing
    }
}
