use crate::ast::{Caddyfile, Directive, GlobalOptions, Site, Snippet};

impl Caddyfile {
    /// Create a new empty Caddyfile.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            global_options: None,
            snippets: Vec::new(),
            sites: Vec::new(),
        }
    }

    /// Add a site block.
    #[must_use]
    pub fn site(mut self, site: Site) -> Self {
        self.sites.push(site);
        self
    }

    /// Set the global options block.
    #[must_use]
    pub fn global(mut self, opts: GlobalOptions) -> Self {
        self.global_options = Some(opts);
        self
    }

    /// Add a snippet.
    #[must_use]
    pub fn snippet(mut self, snippet: Snippet) -> Self {
        self.snippets.push(snippet);
        self
    }
}

impl Default for Caddyfile {
    fn default() -> Self {
        Self::new()
    }
}

impl Site {
    /// Create a new site block with one address.
    #[must_use]
    pub fn new(address: &str) -> Self {
        Self {
            addresses: vec![address.to_string()],
            directives: Vec::new(),
            raw_block: String::new(),
        }
    }

    /// Add another address to this site block.
    #[must_use]
    pub fn address(mut self, addr: &str) -> Self {
        self.addresses.push(addr.to_string());
        self
    }

    /// Add a directive to this site block.
    #[must_use]
    pub fn directive(mut self, d: Directive) -> Self {
        self.directives.push(d);
        self
    }

    /// Add an `import <snippet>` directive.
    #[must_use]
    pub fn import(self, snippet: &str) -> Self {
        self.directive(Directive::new("import").arg(snippet))
    }

    /// Add a `reverse_proxy` directive.
    #[must_use]
    pub fn reverse_proxy(self, upstream: &str) -> Self {
        self.directive(Directive::new("reverse_proxy").arg(upstream))
    }

    /// Import `snippet` unless it is already imported. New imports go
    /// after the last existing one, or first if there are none.
    pub fn add_import(&mut self, snippet: &str) {
        if self.imports().contains(&snippet) {
            return;
        }
        let at = self
            .directives
            .iter()
            .rposition(|d| d.name == "import")
            .map_or(0, |i| i + 1);
        self.directives.insert(at, Directive::new("import").arg(snippet));
    }

    /// Drop every `import <snippet>` directive. Returns whether any was
    /// removed.
    pub fn remove_import(&mut self, snippet: &str) -> bool {
        let before = self.directives.len();
        self.directives
            .retain(|d| !(d.name == "import" && d.first_arg() == Some(snippet)));
        before != self.directives.len()
    }
}

impl Snippet {
    /// Create an empty snippet.
    ///
    /// The name is written between parentheses as-is, so it must be
    /// non-empty and free of whitespace, quotes and braces to be read back
    /// as a snippet.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            directives: Vec::new(),
        }
    }

    /// Add a directive to this snippet.
    #[must_use]
    pub fn directive(mut self, d: Directive) -> Self {
        self.directives.push(d);
        self
    }
}

impl Directive {
    /// Create a new directive with the given name.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            args: Vec::new(),
            block: Vec::new(),
        }
    }

    /// Add an argument.
    #[must_use]
    pub fn arg(mut self, value: &str) -> Self {
        self.args.push(value.to_string());
        self
    }

    /// Add several arguments.
    #[must_use]
    pub fn args(mut self, values: &[&str]) -> Self {
        self.args.extend(values.iter().map(|v| (*v).to_string()));
        self
    }

    /// Add one nested directive.
    #[must_use]
    pub fn child(mut self, d: Self) -> Self {
        self.block.push(d);
        self
    }

    /// Set the nested block.
    #[must_use]
    pub fn block(mut self, directives: Vec<Self>) -> Self {
        self.block = directives;
        self
    }
}
