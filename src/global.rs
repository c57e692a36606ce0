//! Well-known global options.
//!
//! [`GlobalOptions`] stores its whole directive tree. The accessors here
//! read the options most callers care about out of that tree, and the
//! setters edit the tree in place, so nothing can drift out of sync.

use serde::{Deserialize, Serialize};

use crate::ast::{Directive, GlobalOptions};

/// Settings of the unnamed global `log { ... }` block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogOptions {
    /// Output arguments joined by spaces, e.g. `file /var/log/caddy.log`.
    pub output: Option<String>,
    pub format: Option<String>,
    pub level: Option<String>,
    pub roll_size: Option<String>,
    pub roll_keep: Option<String>,
}

/// Which side of its anchor an `order` option places a directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderPosition {
    Before,
    After,
}

impl OrderPosition {
    const fn keyword(self) -> &'static str {
        match self {
            Self::Before => "before",
            Self::After => "after",
        }
    }
}

impl GlobalOptions {
    /// Empty options block.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            directives: Vec::new(),
            raw_block: String::new(),
        }
    }

    /// First top-level option with the given name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Directive> {
        self.directives.iter().find(|d| d.name == name)
    }

    fn first_arg_of(&self, name: &str) -> Option<&str> {
        self.find(name).and_then(Directive::first_arg)
    }

    /// ACME account email.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.first_arg_of("email")
    }

    /// Admin endpoint address, or `off`.
    #[must_use]
    pub fn admin(&self) -> Option<&str> {
        self.first_arg_of("admin")
    }

    /// ACME directory URL.
    #[must_use]
    pub fn acme_ca(&self) -> Option<&str> {
        self.first_arg_of("acme_ca")
    }

    /// Whether a bare `debug` option is present.
    #[must_use]
    pub fn debug(&self) -> bool {
        self.directives
            .iter()
            .any(|d| d.name == "debug" && d.args.is_empty() && d.block.is_empty())
    }

    /// Directives ordered `before` another one, in declaration order.
    #[must_use]
    pub fn order_before(&self) -> Vec<&str> {
        self.ordered(OrderPosition::Before)
    }

    /// Directives ordered `after` another one, in declaration order.
    #[must_use]
    pub fn order_after(&self) -> Vec<&str> {
        self.ordered(OrderPosition::After)
    }

    fn ordered(&self, position: OrderPosition) -> Vec<&str> {
        self.directives
            .iter()
            .filter(|d| d.name == "order")
            .filter_map(|d| match d.args.as_slice() {
                [name, pos, _anchor] if pos == position.keyword() => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Settings of the unnamed `log` block, if one is present.
    ///
    /// `roll_size` and `roll_keep` are read from the `output` sub-block
    /// first, then from the `log` block itself.
    #[must_use]
    pub fn log(&self) -> Option<LogOptions> {
        let log = self
            .directives
            .iter()
            .find(|d| d.name == "log" && d.args.is_empty())?;

        let joined = |name: &str| log.find(name).map(|d| d.args.join(" "));
        let output = log.find("output");
        let rolled = |name: &str| {
            output
                .and_then(|o| o.find(name))
                .or_else(|| log.find(name))
                .and_then(Directive::first_arg)
                .map(str::to_string)
        };

        Some(LogOptions {
            output: joined("output"),
            format: joined("format"),
            level: log
                .find("level")
                .and_then(Directive::first_arg)
                .map(str::to_string),
            roll_size: rolled("roll_size"),
            roll_keep: rolled("roll_keep"),
        })
    }

    /// Set a single-valued option, replacing the first existing one or
    /// appending it.
    pub fn set_option(&mut self, name: &str, args: &[&str]) {
        let args: Vec<String> = args.iter().map(|a| (*a).to_string()).collect();
        if let Some(existing) = self.directives.iter_mut().find(|d| d.name == name) {
            existing.args = args;
            existing.block.clear();
        } else {
            self.directives.push(Directive {
                name: name.to_string(),
                args,
                block: Vec::new(),
            });
        }
    }

    /// Remove every top-level option with the given name. Returns how
    /// many were removed.
    pub fn remove_option(&mut self, name: &str) -> usize {
        let before = self.directives.len();
        self.directives.retain(|d| d.name != name);
        before - self.directives.len()
    }

    pub fn set_email(&mut self, email: &str) {
        self.set_option("email", &[email]);
    }

    pub fn set_admin(&mut self, admin: &str) {
        self.set_option("admin", &[admin]);
    }

    pub fn set_acme_ca(&mut self, url: &str) {
        self.set_option("acme_ca", &[url]);
    }

    /// Turn the bare `debug` option on or off.
    pub fn set_debug(&mut self, enabled: bool) {
        if enabled {
            if !self.debug() {
                self.set_option("debug", &[]);
            }
        } else {
            self.remove_option("debug");
        }
    }

    /// Append an `order <directive> before|after <anchor>` option, unless
    /// an identical one exists.
    pub fn add_order(&mut self, directive: &str, position: OrderPosition, anchor: &str) {
        let args = vec![
            directive.to_string(),
            position.keyword().to_string(),
            anchor.to_string(),
        ];
        if self
            .directives
            .iter()
            .any(|d| d.name == "order" && d.args == args)
        {
            return;
        }
        self.directives.push(Directive {
            name: "order".to_string(),
            args,
            block: Vec::new(),
        });
    }
}

impl Default for GlobalOptions {
    fn default() -> Self {
        Self::new()
    }
}
