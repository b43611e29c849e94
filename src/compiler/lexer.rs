//! This lexer tokenizes Fe source text.
//!
//! Scanning is character by character over a borrowed buffer, with
//! 1-based line/column tracking for every token. Lexical errors are
//! never fatal: each one goes to the diagnostic sink and scanning
//! resumes, so the returned stream always ends with a single
//! `EndOfFile` token at the true end-of-input position.

use std::iter::Peekable;
use std::str::Chars;

use super::diag::{DiagKind, DiagSink, Diagnostic, Position};
use super::token::{Token, TokenKind};

/// Scan `source` into the full token sequence, reporting lexical
/// errors to `sink`.
pub fn tokenize(source: &str, sink: &mut dyn DiagSink) -> Vec<Token> {
    Scanner::new(source).run(sink)
}

struct Scanner<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
    column: usize,
    /// Rough pre-allocation hint, one token per five bytes.
    estimate: usize,
}

impl<'a> Scanner<'a> {
    fn new(source: &'a str) -> Self {
        Scanner {
            chars: source.chars().peekable(),
            line: 1,
            column: 1,
            estimate: source.len() / 5,
        }
    }

    fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    /// Consume one character. A newline bumps the line counter and
    /// resets the column; everything else bumps the column.
    fn advance(&mut self) -> Option<char> {
        let c = self.chars.next();
        match c {
            Some('\n') => {
                self.line += 1;
                self.column = 1;
            }
            Some(_) => self.column += 1,
            None => {}
        }
        c
    }

    fn run(mut self, sink: &mut dyn DiagSink) -> Vec<Token> {
        let mut tokens: Vec<Token> = Vec::with_capacity(self.estimate);

        loop {
            self.skip_whitespace_and_comments();

            let c = match self.peek() {
                Some(c) => c,
                None => break,
            };

            match c {
                '"' => tokens.push(self.string(sink)),
                '0'..='9' => tokens.push(self.number()),
                ';' => {
                    tokens.push(Token::new(TokenKind::Semicolon, ";", self.position()));
                    self.advance();
                }
                c if c.is_ascii_alphabetic() => tokens.push(self.word()),
                c => {
                    sink.report(Diagnostic::new(
                        DiagKind::UnexpectedCharacter,
                        self.position(),
                        format!("unexpected character `{}`", c),
                    ));
                    self.advance();
                }
            }
        }

        tokens.push(Token::new(TokenKind::EndOfFile, "EOF", self.position()));
        tokens
    }

    /// Skip spaces, tabs, newlines, and `//` comments through end of
    /// line. The newline closing a comment is left for the whitespace
    /// arm so line accounting stays in one place.
    fn skip_whitespace_and_comments(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.advance();
                continue;
            }
            if c == '/' && self.chars.clone().nth(1) == Some('/') {
                while let Some(c) = self.peek() {
                    if c == '\n' {
                        break;
                    }
                    self.advance();
                }
                continue;
            }
            break;
        }
    }

    /// Maximal run of ASCII decimal digits. The digit text passes
    /// through verbatim; no range or overflow check happens here or
    /// in any later pass.
    fn number(&mut self) -> Token {
        let start = self.position();
        let mut digits = String::new();
        while let Some(c) = self.peek() {
            if !c.is_ascii_digit() {
                break;
            }
            digits.push(c);
            self.advance();
        }
        Token::new(TokenKind::IntLiteral, &digits, start)
    }

    /// Maximal alphanumeric/underscore run starting with a letter,
    /// then a keyword lookup.
    fn word(&mut self) -> Token {
        let start = self.position();
        let mut word = String::new();
        while let Some(c) = self.peek() {
            if !c.is_ascii_alphanumeric() && c != '_' {
                break;
            }
            word.push(c);
            self.advance();
        }
        Token::new(keyword(&word), &word, start)
    }

    /// String literal with escape decoding. The token position is the
    /// opening quote. A newline or end of input before the closing
    /// quote yields an `Invalid` token carrying whatever was decoded,
    /// without consuming the terminator.
    fn string(&mut self, sink: &mut dyn DiagSink) -> Token {
        let start = self.position();
        self.advance(); // opening quote

        let mut value = String::new();
        loop {
            match self.peek() {
                None | Some('\n') => {
                    sink.report(Diagnostic::new(
                        DiagKind::UnterminatedString,
                        self.position(),
                        "unterminated string literal".to_string(),
                    ));
                    return Token::new(TokenKind::Invalid, &value, start);
                }
                Some('"') => {
                    self.advance();
                    return Token::new(TokenKind::StringLiteral, &value, start);
                }
                Some('\\') => {
                    self.advance();
                    match self.peek() {
                        Some('n') => value.push('\n'),
                        Some('t') => value.push('\t'),
                        Some('"') => value.push('"'),
                        Some('\\') => value.push('\\'),
                        // Unknown escape: the backslash is dropped and
                        // the character passes through.
                        Some(c) => value.push(c),
                        None => continue,
                    }
                    self.advance();
                }
                Some(c) => {
                    value.push(c);
                    self.advance();
                }
            }
        }
    }
}

/// The keyword table is fixed at build time; `return` is currently
/// the only entry.
fn keyword(word: &str) -> TokenKind {
    match word {
        "return" => TokenKind::Return,
        _ => TokenKind::Identifier,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::diag::Diagnostic;

    fn scan(source: &str) -> (Vec<Token>, Vec<Diagnostic>) {
        let mut diags: Vec<Diagnostic> = Vec::new();
        let tokens = tokenize(source, &mut diags);
        (tokens, diags)
    }

    fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
        tokens.iter().map(Token::kind).collect()
    }

    #[test]
    fn test_empty_input_yields_eof_only() {
        let (tokens, diags) = scan("");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind(), TokenKind::EndOfFile);
        assert_eq!(tokens[0].position(), Position::new(1, 1));
        assert!(diags.is_empty());
    }

    #[test]
    fn test_eof_is_always_last() {
        for source in &["", "return 42;", "@#$", "\"open", "// only a comment\n"] {
            let (tokens, _) = scan(source);
            assert_eq!(tokens.last().map(Token::kind), Some(TokenKind::EndOfFile));
            assert_eq!(
                tokens
                    .iter()
                    .filter(|t| t.kind() == TokenKind::EndOfFile)
                    .count(),
                1
            );
        }
    }

    #[test]
    fn test_return_statement() {
        let (tokens, diags) = scan("return 42;");
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Return,
                TokenKind::IntLiteral,
                TokenKind::Semicolon,
                TokenKind::EndOfFile,
            ]
        );
        assert_eq!(tokens[0].value(), "return");
        assert_eq!(tokens[1].value(), "42");
        assert_eq!(tokens[1].position(), Position::new(1, 8));
        assert!(diags.is_empty());
    }

    #[test]
    fn test_identifier_vs_keyword() {
        let (tokens, _) = scan("returns return ret_2");
        assert_eq!(tokens[0].kind(), TokenKind::Identifier);
        assert_eq!(tokens[0].value(), "returns");
        assert_eq!(tokens[1].kind(), TokenKind::Return);
        assert_eq!(tokens[2].kind(), TokenKind::Identifier);
        assert_eq!(tokens[2].value(), "ret_2");
    }

    #[test]
    fn test_positions_across_newlines() {
        let (tokens, _) = scan("return\n  42\n;");
        assert_eq!(tokens[0].position(), Position::new(1, 1));
        assert_eq!(tokens[1].position(), Position::new(2, 3));
        assert_eq!(tokens[2].position(), Position::new(3, 1));
        assert_eq!(tokens[3].position(), Position::new(3, 2));
    }

    #[test]
    fn test_comments_are_skipped() {
        let (tokens, diags) = scan("// leading comment\nreturn 1; // trailing\n// another");
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Return,
                TokenKind::IntLiteral,
                TokenKind::Semicolon,
                TokenKind::EndOfFile,
            ]
        );
        assert_eq!(tokens[0].position(), Position::new(2, 1));
        assert!(diags.is_empty());
    }

    #[test]
    fn test_plain_string_value_is_verbatim() {
        let (tokens, diags) = scan("\"hello world\"");
        assert_eq!(tokens[0].kind(), TokenKind::StringLiteral);
        assert_eq!(tokens[0].value(), "hello world");
        assert_eq!(tokens[0].position(), Position::new(1, 1));
        assert!(diags.is_empty());
    }

    #[test]
    fn test_escape_sequences() {
        let (tokens, diags) = scan(r#""a\nb\tc\"d\\e\qf""#);
        assert_eq!(tokens[0].kind(), TokenKind::StringLiteral);
        assert_eq!(tokens[0].value(), "a\nb\tc\"d\\eqf");
        assert!(diags.is_empty());
    }

    #[test]
    fn test_unterminated_string_at_eof() {
        let (tokens, diags) = scan("return \"oops");
        assert_eq!(tokens[1].kind(), TokenKind::Invalid);
        assert_eq!(tokens[1].value(), "oops");
        assert_eq!(tokens[1].position(), Position::new(1, 8));
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].kind, DiagKind::UnterminatedString);
    }

    #[test]
    fn test_unterminated_string_at_newline() {
        let (tokens, diags) = scan("\"oops\nreturn 1;");
        assert_eq!(tokens[0].kind(), TokenKind::Invalid);
        assert_eq!(tokens[0].value(), "oops");
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].kind, DiagKind::UnterminatedString);
        // The newline is not consumed by the string scan, so the rest
        // of the input still tokenizes normally.
        assert_eq!(
            kinds(&tokens[1..]),
            vec![
                TokenKind::Return,
                TokenKind::IntLiteral,
                TokenKind::Semicolon,
                TokenKind::EndOfFile,
            ]
        );
        assert_eq!(tokens[1].position(), Position::new(2, 1));
    }

    #[test]
    fn test_unexpected_characters_are_skipped() {
        let (tokens, diags) = scan("@ return 7 $;");
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Return,
                TokenKind::IntLiteral,
                TokenKind::Semicolon,
                TokenKind::EndOfFile,
            ]
        );
        assert_eq!(diags.len(), 2);
        assert_eq!(diags[0].kind, DiagKind::UnexpectedCharacter);
        assert_eq!(diags[0].pos, Position::new(1, 1));
        assert_eq!(diags[1].kind, DiagKind::UnexpectedCharacter);
        assert_eq!(diags[1].pos, Position::new(1, 12));
    }

    #[test]
    fn test_eof_position_tracks_final_scan_point() {
        let (tokens, _) = scan("return 42;\n");
        let eof = tokens.last().unwrap();
        assert_eq!(eof.kind(), TokenKind::EndOfFile);
        assert_eq!(eof.position(), Position::new(2, 1));

        let (tokens, _) = scan("return 42;");
        assert_eq!(tokens.last().unwrap().position(), Position::new(1, 11));
    }

    #[test]
    fn test_long_string_round_trips() {
        let body = "this literal is well over twenty-four bytes long";
        let (tokens, diags) = scan(&format!("\"{}\"", body));
        assert_eq!(tokens[0].kind(), TokenKind::StringLiteral);
        assert_eq!(tokens[0].value(), body);
        assert!(diags.is_empty());
    }
}
