//! Caddyfile parser and writer.
//!
//! Turns Caddyfile text into a mutable model of global options,
//! snippets, and sites with arbitrarily nested directives, and writes
//! that model back out as canonical text that re-parses to the same
//! structure.
//!
//! The parser only checks brace structure. Everything else it does not
//! understand (stray top-level words, unterminated quotes, unknown
//! directives) is kept or skipped rather than rejected, because the
//! input is usually hand-edited.
//!
//! # Quick start
//!
//! ## Parse, edit, and write back
//!
//! ```
//! use caddyconf::{parse_all, write_caddyfile};
//!
//! let input = "example.com www.example.com {\n\treverse_proxy localhost:8080\n}\n";
//! let mut caddyfile = parse_all(input).unwrap();
//!
//! let site = caddyfile.find_site_mut("example.com").unwrap();
//! site.add_import("security_headers");
//!
//! let output = write_caddyfile(&caddyfile);
//! assert!(output.contains("\timport security_headers\n"));
//! ```
//!
//! ## Build a Caddyfile programmatically
//!
//! ```
//! use caddyconf::{Caddyfile, Directive, Site, Snippet, write_caddyfile};
//!
//! let cf = Caddyfile::new()
//!     .snippet(Snippet::new("compress").directive(Directive::new("encode").arg("gzip")))
//!     .site(Site::new("example.com")
//!         .import("compress")
//!         .reverse_proxy("app:3000"));
//!
//! let output = write_caddyfile(&cf);
//! assert!(output.starts_with("(compress) {"));
//! ```

// Allow noisy pedantic lints that don't add value for
// a library crate.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod address;
pub mod ast;
pub mod builder;
pub mod formatter;
pub mod global;
pub mod lexer;
pub mod parser;
pub mod token;

pub use address::{AddressClassifier, HeuristicClassifier, RegistryClassifier, is_site_address};
pub use ast::{Caddyfile, Directive, GlobalOptions, Site, Snippet};
pub use formatter::{
    Indent, WriteOptions, write_caddyfile, write_caddyfile_with, write_global_options,
    write_site, write_site_with, write_snippet, write_snippet_with,
};
pub use global::{LogOptions, OrderPosition};
pub use lexer::tokenize;
pub use parser::{
    ParseError, ParseErrorKind, Parser, parse_all, parse_global_options, parse_sites,
    parse_snippets,
};
pub use token::{Span, Token, TokenKind};
