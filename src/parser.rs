use std::fmt;
use std::mem;

use crate::address::{AddressClassifier, HeuristicClassifier};
use crate::ast::{Caddyfile, Directive, GlobalOptions, Site, Snippet};
use crate::lexer::tokenize;
use crate::token::{Span, Token, TokenKind};

/// Classifies a parser error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// A `}` with no open block to close.
    UnexpectedCloseBrace,
    /// A `{` where a directive name was expected.
    UnexpectedOpenBrace,
    /// Input ended before the block opened at the error span was closed.
    UnclosedBrace,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedCloseBrace => write!(f, "unexpected '}}'"),
            Self::UnexpectedOpenBrace => {
                write!(f, "unexpected '{{', expected a directive name")
            }
            Self::UnclosedBrace => write!(f, "unclosed '{{', expected '}}'"),
        }
    }
}

/// Error produced when the brace structure of the input is broken.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at line {}, column {}", span.line, span.column)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Span,
}

/// Parse every top-level block of a Caddyfile.
///
/// # Errors
///
/// Returns `ParseError` on an unmatched or unexpected brace. Unknown
/// top-level content is skipped rather than reported.
pub fn parse_all(input: &str) -> Result<Caddyfile, ParseError> {
    Parser::new().parse_all(input)
}

/// Parse only the site blocks of a Caddyfile.
pub fn parse_sites(input: &str) -> Result<Vec<Site>, ParseError> {
    Parser::new().parse_sites(input)
}

/// Parse only the snippet definitions of a Caddyfile.
pub fn parse_snippets(input: &str) -> Result<Vec<Snippet>, ParseError> {
    Parser::new().parse_snippets(input)
}

/// Parse only the global options block of a Caddyfile, if there is one.
pub fn parse_global_options(input: &str) -> Result<Option<GlobalOptions>, ParseError> {
    Parser::new().parse_global_options(input)
}

/// Caddyfile parser configured with an address classifier.
///
/// All entry points run the same top-level scan, so they always agree on
/// which block is a site, a snippet, or the global options.
#[derive(Debug, Clone, Default)]
pub struct Parser<C = HeuristicClassifier> {
    classifier: C,
}

impl Parser {
    /// Parser using the default shape-based address heuristic.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            classifier: HeuristicClassifier,
        }
    }
}

impl<C: AddressClassifier> Parser<C> {
    /// Parser that asks `classifier` whether a token is a site address.
    #[must_use]
    pub const fn with_classifier(classifier: C) -> Self {
        Self { classifier }
    }

    pub fn parse_all(&self, input: &str) -> Result<Caddyfile, ParseError> {
        let tokens = tokenize(input);
        Scanner::new(input, &tokens, &self.classifier).scan()
    }

    pub fn parse_sites(&self, input: &str) -> Result<Vec<Site>, ParseError> {
        Ok(self.parse_all(input)?.sites)
    }

    pub fn parse_snippets(&self, input: &str) -> Result<Vec<Snippet>, ParseError> {
        Ok(self.parse_all(input)?.snippets)
    }

    pub fn parse_global_options(&self, input: &str) -> Result<Option<GlobalOptions>, ParseError> {
        Ok(self.parse_all(input)?.global_options)
    }
}

/// Walks the token stream once, building directive trees for every
/// top-level block and classifying each block by its header tokens.
struct Scanner<'a, C: ?Sized> {
    source: &'a str,
    tokens: &'a [Token],
    pos: usize,
    classifier: &'a C,
}

impl<'a, C: AddressClassifier + ?Sized> Scanner<'a, C> {
    const fn new(source: &'a str, tokens: &'a [Token], classifier: &'a C) -> Self {
        Self {
            source,
            tokens,
            pos: 0,
            classifier,
        }
    }

    fn scan(mut self) -> Result<Caddyfile, ParseError> {
        let mut caddyfile = Caddyfile {
            global_options: None,
            snippets: Vec::new(),
            sites: Vec::new(),
        };

        // Header tokens seen since the last top-level block.
        let mut header: Vec<&'a Token> = Vec::new();
        let mut line_ended = false;
        let tokens = self.tokens;

        while let Some(token) = tokens.get(self.pos) {
            match token.kind {
                TokenKind::Newline => {
                    self.pos += 1;
                    line_ended = !header.is_empty();
                }
                TokenKind::Word | TokenKind::Quoted => {
                    if line_ended && !continues_header(&header) {
                        skip_header(&header);
                        header.clear();
                    }
                    line_ended = false;
                    header.push(token);
                    self.pos += 1;
                }
                TokenKind::CloseBrace => {
                    return Err(ParseError {
                        kind: ParseErrorKind::UnexpectedCloseBrace,
                        span: token.span,
                    });
                }
                TokenKind::OpenBrace => {
                    self.pos += 1;
                    let directives = self.parse_block(token)?;
                    let start = header.first().map_or(token.span.offset, |t| t.span.offset);
                    let end = tokens[self.pos - 1].span.offset + 1;
                    let raw_block = self.source[start..end].to_string();

                    self.classify(&mut caddyfile, &mem::take(&mut header), directives, raw_block);
                    line_ended = false;
                }
            }
        }

        skip_header(&header);

        Ok(caddyfile)
    }

    fn classify(
        &self,
        caddyfile: &mut Caddyfile,
        header: &[&Token],
        directives: Vec<Directive>,
        raw_block: String,
    ) {
        let line = header.first().map(|t| t.span.line);

        if header.is_empty() {
            if caddyfile.global_options.is_some() {
                tracing::debug!("ignoring additional global options block");
            } else {
                caddyfile.global_options = Some(GlobalOptions {
                    directives,
                    raw_block,
                });
            }
            return;
        }

        if let [token] = header {
            if let Some(name) = snippet_name(token) {
                if caddyfile.find_snippet(name).is_some() {
                    tracing::debug!(name, ?line, "ignoring duplicate snippet definition");
                } else {
                    caddyfile.snippets.push(Snippet {
                        name: name.to_string(),
                        directives,
                    });
                }
                return;
            }
        }

        let addresses: Vec<String> = header
            .iter()
            .map(|t| t.text.trim_end_matches(','))
            .filter(|a| !a.is_empty())
            .map(str::to_string)
            .collect();

        if !addresses.is_empty()
            && addresses
                .iter()
                .all(|a| self.classifier.is_site_address(a))
        {
            caddyfile.sites.push(Site {
                addresses,
                directives,
                raw_block,
            });
        } else {
            tracing::debug!(?line, "skipping top-level block without site addresses");
        }
    }

    /// Parse directives up to the `}` matching `open`, which has already
    /// been consumed.
    fn parse_block(&mut self, open: &Token) -> Result<Vec<Directive>, ParseError> {
        let mut directives = Vec::new();
        let tokens = self.tokens;

        loop {
            let Some(token) = tokens.get(self.pos) else {
                return Err(ParseError {
                    kind: ParseErrorKind::UnclosedBrace,
                    span: open.span,
                });
            };

            match token.kind {
                TokenKind::CloseBrace => {
                    self.pos += 1;
                    return Ok(directives);
                }
                TokenKind::OpenBrace => {
                    return Err(ParseError {
                        kind: ParseErrorKind::UnexpectedOpenBrace,
                        span: token.span,
                    });
                }
                TokenKind::Word | TokenKind::Quoted => {
                    directives.push(self.parse_directive()?);
                }
                TokenKind::Newline => self.pos += 1,
            }
        }
    }

    /// Parse one statement: a name, its arguments up to the end of the
    /// line, and an optional nested block.
    fn parse_directive(&mut self) -> Result<Directive, ParseError> {
        let name = self.tokens[self.pos].text.clone();
        self.pos += 1;

        let mut args = Vec::new();
        let tokens = self.tokens;
        let mut block = Vec::new();
        while let Some(token) = tokens.get(self.pos) {
            match token.kind {
                // A `{` on the next line belongs to no directive.
                TokenKind::Newline => {
                    self.pos += 1;
                    break;
                }
                TokenKind::CloseBrace => break,
                TokenKind::OpenBrace => {
                    self.pos += 1;
                    block = self.parse_block(token)?;
                    break;
                }
                TokenKind::Word | TokenKind::Quoted => {
                    args.push(token.text.clone());
                    self.pos += 1;
                }
            }
        }

        Ok(Directive { name, args, block })
    }
}

/// A header line ending in a comma continues onto the next line.
fn continues_header(header: &[&Token]) -> bool {
    header.last().is_some_and(|t| t.text.ends_with(','))
}

fn skip_header(header: &[&Token]) {
    if let Some(first) = header.first() {
        tracing::debug!(
            line = first.span.line,
            tokens = header.len(),
            "skipping top-level tokens not followed by a block"
        );
    }
}

/// Name inside a `(name)` snippet header token.
fn snippet_name(token: &Token) -> Option<&str> {
    if token.kind != TokenKind::Word {
        return None;
    }
    token
        .text
        .strip_prefix('(')
        .and_then(|t| t.strip_suffix(')'))
        .filter(|name| !name.is_empty())
}
