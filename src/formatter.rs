//! Writer that serializes the Caddyfile model back into canonical text.
//!
//! Output is deterministic: global options first, then snippets, then
//! sites, with one blank line between top-level blocks and one indent
//! unit per nesting level.

use std::borrow::Cow;

use crate::ast::{Caddyfile, Directive, GlobalOptions, Site, Snippet};
use crate::lexer::tokenize;
use crate::token::TokenKind;

/// Indentation unit used for each nesting level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Indent {
    #[default]
    Tab,
    Spaces(usize),
}

impl Indent {
    fn unit(self) -> String {
        match self {
            Self::Tab => "\t".to_string(),
            Self::Spaces(n) => " ".repeat(n),
        }
    }
}

/// Writer settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteOptions {
    pub indent: Indent,
}

/// Write a whole Caddyfile with default options.
#[must_use]
pub fn write_caddyfile(caddyfile: &Caddyfile) -> String {
    write_caddyfile_with(caddyfile, &WriteOptions::default())
}

/// Write a whole Caddyfile.
#[must_use]
pub fn write_caddyfile_with(caddyfile: &Caddyfile, options: &WriteOptions) -> String {
    let mut writer = Writer::new(options);

    if let Some(global) = &caddyfile.global_options {
        writer.global_options(global);
    }
    for snippet in &caddyfile.snippets {
        writer.snippet(snippet);
    }
    for site in &caddyfile.sites {
        writer.site(site);
    }

    writer.finish()
}

/// Write a single snippet definition.
#[must_use]
pub fn write_snippet(snippet: &Snippet) -> String {
    write_snippet_with(snippet, &WriteOptions::default())
}

#[must_use]
pub fn write_snippet_with(snippet: &Snippet, options: &WriteOptions) -> String {
    let mut writer = Writer::new(options);
    writer.snippet(snippet);
    writer.finish()
}

/// Write a single site block.
#[must_use]
pub fn write_site(site: &Site) -> String {
    write_site_with(site, &WriteOptions::default())
}

#[must_use]
pub fn write_site_with(site: &Site, options: &WriteOptions) -> String {
    let mut writer = Writer::new(options);
    writer.site(site);
    writer.finish()
}

/// Write the global options block.
#[must_use]
pub fn write_global_options(global: &GlobalOptions) -> String {
    let mut writer = Writer::new(&WriteOptions::default());
    writer.global_options(global);
    writer.finish()
}

struct Writer {
    out: String,
    indent: String,
}

impl Writer {
    fn new(options: &WriteOptions) -> Self {
        Self {
            out: String::new(),
            indent: options.indent.unit(),
        }
    }

    fn finish(mut self) -> String {
        if !self.out.ends_with('\n') {
            self.out.push('\n');
        }
        self.out
    }

    /// Start a top-level block, separated from the previous one by a
    /// blank line.
    fn begin_block(&mut self) {
        if !self.out.is_empty() {
            self.out.push('\n');
        }
    }

    fn global_options(&mut self, global: &GlobalOptions) {
        self.begin_block();
        self.out.push_str("{\n");
        self.directives(&global.directives, 1);
        self.out.push_str("}\n");
    }

    fn snippet(&mut self, snippet: &Snippet) {
        self.begin_block();
        let header = format!("({})", snippet.name);
        if snippet.name.is_empty() || !reads_back_as_word(&header) {
            tracing::debug!(
                name = %snippet.name,
                "snippet name will not read back as a snippet header"
            );
        }
        self.out.push_str(&header);
        self.out.push_str(" {\n");
        self.directives(&snippet.directives, 1);
        self.out.push_str("}\n");
    }

    fn site(&mut self, site: &Site) {
        self.begin_block();
        let addresses: Vec<Cow<'_, str>> = site.addresses.iter().map(|a| quote(a)).collect();
        self.out.push_str(&addresses.join(" "));
        self.out.push_str(" {\n");
        self.directives(&site.directives, 1);
        self.out.push_str("}\n");
    }

    fn directives(&mut self, directives: &[Directive], depth: usize) {
        for directive in directives {
            self.directive(directive, depth);
        }
    }

    fn directive(&mut self, directive: &Directive, depth: usize) {
        let prefix = self.indent.repeat(depth);
        self.out.push_str(&prefix);
        self.out.push_str(&quote(&directive.name));

        for arg in &directive.args {
            self.out.push(' ');
            self.out.push_str(&quote(arg));
        }

        if directive.block.is_empty() {
            self.out.push('\n');
        } else {
            self.out.push_str(" {\n");
            self.directives(&directive.block, depth + 1);
            self.out.push_str(&prefix);
            self.out.push_str("}\n");
        }
    }
}

/// Return `value` as written, or double-quoted when the tokenizer would
/// not read it back as the same single word.
fn quote(value: &str) -> Cow<'_, str> {
    if reads_back_as_word(value) {
        return Cow::Borrowed(value);
    }

    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for ch in value.chars() {
        if matches!(ch, '"' | '\\') {
            quoted.push('\\');
        }
        quoted.push(ch);
    }
    quoted.push('"');
    Cow::Owned(quoted)
}

fn reads_back_as_word(value: &str) -> bool {
    // A trailing backslash would escape the separator after it.
    if value.is_empty() || value.ends_with('\\') {
        return false;
    }
    match tokenize(value).as_slice() {
        [token] => token.kind == TokenKind::Word && token.text == value,
        _ => false,
    }
}
