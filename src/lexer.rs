use crate::token::{Span, Token, TokenKind};

/// Tokenize a Caddyfile source string into a sequence of tokens.
///
/// Line boundaries are kept as [`TokenKind::Newline`] tokens because a
/// directive statement ends at the end of its line. Comments are dropped.
///
/// Tokenizing never fails: an unterminated quoted string swallows the
/// rest of the input so that hand-edited files stay loadable.
#[must_use]
pub fn tokenize(input: &str) -> Vec<Token> {
    Lexer::new(input).tokenize()
}

struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    line: usize,
    col: usize,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        let start = if input.starts_with('\u{FEFF}') {
            '\u{FEFF}'.len_utf8()
        } else {
            0
        };
        Self {
            input,
            pos: start,
            line: 1,
            col: 1,
        }
    }

    fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();

        while let Some(ch) = self.peek() {
            match ch {
                '\n' => {
                    tokens.push(self.make_token(TokenKind::Newline, "\n".to_string()));
                    self.advance();
                }
                '#' => self.skip_comment(),
                '{' if self.placeholder_len().is_some() => {
                    tokens.push(self.read_word());
                }
                '{' => {
                    tokens.push(self.make_token(TokenKind::OpenBrace, "{".to_string()));
                    self.advance();
                }
                '}' => {
                    tokens.push(self.make_token(TokenKind::CloseBrace, "}".to_string()));
                    self.advance();
                }
                '"' => {
                    tokens.push(self.read_quoted_string());
                }
                '\\' if self.is_line_continuation() => {
                    self.advance(); // skip backslash
                    if self.peek() == Some('\r') {
                        self.advance();
                    }
                    self.advance(); // skip newline
                }
                c if c.is_whitespace() => {
                    self.advance();
                }
                _ => {
                    tokens.push(self.read_word());
                }
            }
        }

        tokens
    }

    const fn span(&self) -> Span {
        Span {
            offset: self.pos,
            line: self.line,
            column: self.col,
        }
    }

    const fn make_token(&self, kind: TokenKind, text: String) -> Token {
        Token {
            kind,
            text,
            span: self.span(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        self.input[self.pos..].chars().nth(1)
    }

    fn advance(&mut self) {
        if let Some(ch) = self.peek() {
            if ch == '\n' {
                self.line += 1;
                self.col = 1;
            } else {
                self.col += 1;
            }
            self.pos += ch.len_utf8();
        }
    }

    fn is_line_continuation(&self) -> bool {
        let rest = &self.input[self.pos..];
        rest.starts_with("\\\n") || rest.starts_with("\\\r\n")
    }

    /// Byte length of a placeholder such as `{host}` starting at the
    /// current `{`, or `None` if this brace stands alone.
    fn placeholder_len(&self) -> Option<usize> {
        let rest = &self.input[self.pos..];
        for (idx, ch) in rest.char_indices().skip(1) {
            match ch {
                '}' if idx > 1 => return Some(idx + 1),
                '}' | '{' | '"' => return None,
                c if c.is_whitespace() => return None,
                _ => {}
            }
        }
        None
    }

    fn skip_comment(&mut self) {
        while let Some(ch) = self.peek() {
            if ch == '\n' {
                break;
            }
            self.advance();
        }
    }

    fn read_quoted_string(&mut self) -> Token {
        let span = self.span();
        self.advance(); // skip opening quote

        let mut value = String::new();
        loop {
            match self.peek() {
                None => {
                    tracing::debug!(
                        line = span.line,
                        column = span.column,
                        "unterminated quoted string runs to end of input"
                    );
                    break;
                }
                Some('\\') if matches!(self.peek_second(), Some('"' | '\\')) => {
                    self.advance();
                    if let Some(escaped) = self.peek() {
                        value.push(escaped);
                        self.advance();
                    }
                }
                Some('"') => {
                    self.advance();
                    break;
                }
                Some(c) => {
                    value.push(c);
                    self.advance();
                }
            }
        }

        Token {
            kind: TokenKind::Quoted,
            text: value,
            span,
        }
    }

    fn read_word(&mut self) -> Token {
        let span = self.span();
        let start = self.pos;

        while let Some(ch) = self.peek() {
            match ch {
                '}' => break,
                '{' => match self.placeholder_len() {
                    Some(len) => {
                        let chars = self.input[self.pos..self.pos + len].chars().count();
                        for _ in 0..chars {
                            self.advance();
                        }
                    }
                    None => break,
                },
                '\\' => {
                    // escaped character, unless the backslash
                    // continues the line
                    if self.is_line_continuation() {
                        break;
                    }
                    self.advance();
                    self.advance();
                }
                c if c.is_whitespace() => break,
                _ => self.advance(),
            }
        }

        Token {
            kind: TokenKind::Word,
            text: self.input[start..self.pos].to_string(),
            span,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(tokens: &[Token]) -> Vec<&str> {
        tokens
            .iter()
            .filter(|t| t.kind != TokenKind::Newline)
            .map(|t| t.text.as_str())
            .collect()
    }

    #[test]
    fn simple_words() {
        let tokens = tokenize("reverse_proxy localhost:8080");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].text, "reverse_proxy");
        assert_eq!(tokens[1].text, "localhost:8080");
    }

    #[test]
    fn braces_and_newlines() {
        let tokens = tokenize("example.com {\n    log\n}\n");
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Word,
                TokenKind::OpenBrace,
                TokenKind::Newline,
                TokenKind::Word,
                TokenKind::Newline,
                TokenKind::CloseBrace,
                TokenKind::Newline,
            ]
        );
    }

    #[test]
    fn brace_isolated_from_word() {
        let tokens = tokenize("log{\nformat json}");
        assert_eq!(texts(&tokens), vec!["log", "{", "format", "json", "}"]);
        assert_eq!(tokens[1].kind, TokenKind::OpenBrace);
        assert_eq!(tokens[5].kind, TokenKind::CloseBrace);
    }

    #[test]
    fn placeholder_stays_in_word() {
        let tokens = tokenize("header_up X-Real-IP {remote_host}");
        assert_eq!(texts(&tokens), vec!["header_up", "X-Real-IP", "{remote_host}"]);
        assert_eq!(tokens[2].kind, TokenKind::Word);

        let tokens = tokenize("rewrite /index.html?{query}&x=1");
        assert_eq!(tokens[1].text, "/index.html?{query}&x=1");
    }

    #[test]
    fn brace_run_without_space_is_a_placeholder() {
        let tokens = tokenize("handle {file_server}");
        assert_eq!(texts(&tokens), vec!["handle", "{file_server}"]);
        assert_eq!(tokens[1].kind, TokenKind::Word);

        let tokens = tokenize("handle { file_server }");
        assert_eq!(texts(&tokens), vec!["handle", "{", "file_server", "}"]);
        assert_eq!(tokens[1].kind, TokenKind::OpenBrace);
        assert_eq!(tokens[3].kind, TokenKind::CloseBrace);
    }

    #[test]
    fn empty_braces_are_separate() {
        let tokens = tokenize("{}");
        assert_eq!(tokens[0].kind, TokenKind::OpenBrace);
        assert_eq!(tokens[1].kind, TokenKind::CloseBrace);
    }

    #[test]
    fn quoted_string() {
        let tokens = tokenize(r#"header "X-Frame-Options" "DENY SAMEORIGIN""#);
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[1].kind, TokenKind::Quoted);
        assert_eq!(tokens[1].text, "X-Frame-Options");
        assert_eq!(tokens[2].text, "DENY SAMEORIGIN");
    }

    #[test]
    fn quoted_string_with_escapes() {
        let tokens = tokenize(r#""hello \"world\" \\ \n""#);
        assert_eq!(tokens[0].text, r#"hello "world" \ \n"#);
    }

    #[test]
    fn quoted_braces_are_not_structural() {
        let tokens = tokenize(r#"respond "{ }""#);
        assert_eq!(tokens[1].kind, TokenKind::Quoted);
        assert_eq!(tokens[1].text, "{ }");
    }

    #[test]
    fn unterminated_quote_captures_rest() {
        let tokens = tokenize("respond \"unclosed\n}\n");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1].kind, TokenKind::Quoted);
        assert_eq!(tokens[1].text, "unclosed\n}\n");
    }

    #[test]
    fn whole_line_comment() {
        let tokens = tokenize("  # just a note\nlog");
        assert_eq!(tokens[0].kind, TokenKind::Newline);
        assert_eq!(tokens[1].text, "log");
    }

    #[test]
    fn trailing_comment() {
        let tokens = tokenize("log # access log\nfile_server");
        assert_eq!(texts(&tokens), vec!["log", "file_server"]);
    }

    #[test]
    fn hash_inside_word_is_literal() {
        let tokens = tokenize("redir https://example.com/#top");
        assert_eq!(tokens[1].text, "https://example.com/#top");
    }

    #[test]
    fn line_continuation() {
        let tokens = tokenize("reverse_proxy \\\napp:3000");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1].text, "app:3000");
    }

    #[test]
    fn bom_stripping() {
        let tokens = tokenize("\u{FEFF}example.com");
        assert_eq!(tokens[0].text, "example.com");
        assert_eq!(tokens[0].span.offset, 3);
    }

    #[test]
    fn escaped_braces() {
        let tokens = tokenize(r"respond \{hello\}");
        assert_eq!(tokens[1].text, r"\{hello\}");
    }

    #[test]
    fn non_ascii_text() {
        let tokens = tokenize("respond \"héllo wörld\" ünïcode");
        assert_eq!(tokens[1].text, "héllo wörld");
        assert_eq!(tokens[2].text, "ünïcode");
    }

    #[test]
    fn span_tracking() {
        let tokens = tokenize("a\nb c");
        assert_eq!(tokens[0].span.line, 1);
        assert_eq!(tokens[0].span.column, 1);
        assert_eq!(tokens[2].span.line, 2);
        assert_eq!(tokens[2].span.column, 1);
        assert_eq!(tokens[3].span.line, 2);
        assert_eq!(tokens[3].span.column, 3);
        assert_eq!(tokens[3].span.offset, 4);
    }
}
