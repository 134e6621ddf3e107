use std::str::Chars;

use peekmore::{PeekMore, PeekMoreIterator};

use crate::error::ScanError;
use crate::literal::Literal;
use crate::token::{Token, TokenKind};

/// Converts source text into an ordered token list, terminated by `Eof`.
/// A single forward pass over a `peekmore`-wrapped char iterator, so the
/// one place that needs two characters of lookahead (`number`'s `12.5`
/// vs. `12.method()`) doesn't need its own cursor bookkeeping.
pub struct Scanner<'a> {
    source: PeekMoreIterator<Chars<'a>>,
    tokens: Vec<Token>,
    errors: Vec<ScanError>,
    line: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Scanner<'a> {
        Scanner {
            source: source.chars().peekmore(),
            tokens: Vec::new(),
            errors: Vec::new(),
            line: 1,
        }
    }

    /// Scans the whole source and returns the tokens plus any scan errors.
    /// Errors do not stop scanning: every byte still gets classified.
    pub fn scan_tokens(mut self) -> (Vec<Token>, Vec<ScanError>) {
        while !self.is_at_end() {
            self.scan_token();
        }

        self.tokens.push(Token::new(TokenKind::Eof, String::new(), None, self.line));
        (self.tokens, self.errors)
    }

    fn is_at_end(&mut self) -> bool {
        self.source.peek().is_none()
    }

    fn advance(&mut self) -> Option<char> {
        self.source.next()
    }

    fn peek(&mut self) -> char {
        self.source.peek().copied().unwrap_or('\0')
    }

    fn peek_next(&mut self) -> char {
        self.source.peek_next().copied().unwrap_or('\0')
    }

    fn match_next(&mut self, expected: char) -> bool {
        if self.peek() == expected {
            self.advance();
            true
        } else {
            false
        }
    }

    fn add_token(&mut self, kind: TokenKind, lexeme: String, literal: Option<Literal>) {
        self.tokens.push(Token::new(kind, lexeme, literal, self.line));
    }

    fn scan_token(&mut self) {
        let c = match self.advance() {
            Some(c) => c,
            None => return,
        };

        match c {
            '(' => self.add_token(TokenKind::LeftParen, c.to_string(), None),
            ')' => self.add_token(TokenKind::RightParen, c.to_string(), None),
            '{' => self.add_token(TokenKind::LeftBrace, c.to_string(), None),
            '}' => self.add_token(TokenKind::RightBrace, c.to_string(), None),
            ',' => self.add_token(TokenKind::Comma, c.to_string(), None),
            '.' => self.add_token(TokenKind::Dot, c.to_string(), None),
            '-' => self.add_token(TokenKind::Minus, c.to_string(), None),
            '+' => self.add_token(TokenKind::Plus, c.to_string(), None),
            ';' => self.add_token(TokenKind::Semicolon, c.to_string(), None),
            '*' => self.add_token(TokenKind::Star, c.to_string(), None),

            '!' => {
                if self.match_next('=') {
                    self.add_token(TokenKind::BangEqual, "!=".to_string(), None);
                } else {
                    self.add_token(TokenKind::Bang, "!".to_string(), None);
                }
            }
            '=' => {
                if self.match_next('=') {
                    self.add_token(TokenKind::EqualEqual, "==".to_string(), None);
                } else {
                    self.add_token(TokenKind::Equal, "=".to_string(), None);
                }
            }
            '<' => {
                if self.match_next('=') {
                    self.add_token(TokenKind::LessEqual, "<=".to_string(), None);
                } else {
                    self.add_token(TokenKind::Less, "<".to_string(), None);
                }
            }
            '>' => {
                if self.match_next('=') {
                    self.add_token(TokenKind::GreaterEqual, ">=".to_string(), None);
                } else {
                    self.add_token(TokenKind::Greater, ">".to_string(), None);
                }
            }
            '/' => {
                if self.match_next('/') {
                    while self.peek() != '\n' && !self.is_at_end() {
                        self.advance();
                    }
                } else {
                    self.add_token(TokenKind::Slash, "/".to_string(), None);
                }
            }

            ' ' | '\r' | '\t' => {}
            '\n' => self.line += 1,

            '"' => self.string(),

            c if c.is_ascii_digit() => self.number(c),
            c if c.is_ascii_alphabetic() || c == '_' => self.identifier(c),

            other => self.errors.push(ScanError {
                line: self.line,
                message: format!("Unexpected character '{other}'"),
            }),
        }
    }

    fn string(&mut self) {
        let start_line = self.line;
        let mut value = String::new();

        while self.peek() != '"' && !self.is_at_end() {
            let c = self.advance().expect("checked not at end");
            if c == '\n' {
                self.line += 1;
            }
            value.push(c);
        }

        if self.is_at_end() {
            self.errors.push(ScanError {
                line: start_line,
                message: "Unterminated string.".to_string(),
            });
            return;
        }

        self.advance(); // closing quote

        self.add_token(TokenKind::String, value.clone(), Some(Literal::String(value)));
    }

    fn number(&mut self, first: char) {
        let mut lexeme = String::from(first);

        while self.peek().is_ascii_digit() {
            lexeme.push(self.advance().expect("checked is_ascii_digit"));
        }

        if self.peek() == '.' && self.peek_next().is_ascii_digit() {
            lexeme.push(self.advance().expect("peeked dot")); // consume '.'
            while self.peek().is_ascii_digit() {
                lexeme.push(self.advance().expect("checked is_ascii_digit"));
            }
        }

        let value: f64 = lexeme.parse().expect("scanned digits always parse as f64");
        self.add_token(TokenKind::Number, lexeme, Some(Literal::Number(value)));
    }

    fn identifier(&mut self, first: char) {
        let mut lexeme = String::from(first);

        while self.peek().is_ascii_alphanumeric() || self.peek() == '_' {
            lexeme.push(self.advance().expect("checked alphanumeric or underscore"));
        }

        let kind = keyword(&lexeme).unwrap_or(TokenKind::Identifier);
        self.add_token(kind, lexeme, None);
    }
}

fn keyword(lexeme: &str) -> Option<TokenKind> {
    use TokenKind::*;
    Some(match lexeme {
        "and" => And,
        "class" => Class,
        "else" => Else,
        "false" => False,
        "for" => For,
        "fun" => Fun,
        "if" => If,
        "nil" => Nil,
        "or" => Or,
        "print" => Print,
        "return" => Return,
        "super" => Super,
        "this" => This,
        "true" => True,
        "var" => Var,
        "while" => While,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let (tokens, errors) = Scanner::new(source).scan_tokens();
        assert!(errors.is_empty(), "unexpected scan errors: {errors:?}");
        tokens.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn empty_source_is_just_eof() {
        assert_eq!(kinds(""), vec![TokenKind::Eof]);
    }

    #[test]
    fn compound_operators_match_equals_not_self() {
        assert_eq!(
            kinds("!= <= >= =="),
            vec![
                TokenKind::BangEqual,
                TokenKind::LessEqual,
                TokenKind::GreaterEqual,
                TokenKind::EqualEqual,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn line_comment_produces_no_tokens() {
        assert_eq!(kinds("// hello\n1"), vec![TokenKind::Number, TokenKind::Eof]);
    }

    #[test]
    fn string_literal_round_trips() {
        let (tokens, errors) = Scanner::new("\"hi\"").scan_tokens();
        assert!(errors.is_empty());
        assert_eq!(tokens[0].literal, Some(Literal::String("hi".to_string())));
    }

    #[test]
    fn unterminated_string_is_reported_and_scanning_continues() {
        let (tokens, errors) = Scanner::new("\"hi").scan_tokens();
        assert_eq!(errors.len(), 1);
        assert_eq!(tokens, vec![Token::new(TokenKind::Eof, String::new(), None, 1)]);
    }

    #[test]
    fn number_requires_digit_after_dot() {
        // `1.` without a following digit is the number `1` followed by `.`
        assert_eq!(kinds("1."), vec![TokenKind::Number, TokenKind::Dot, TokenKind::Eof]);
    }

    #[test]
    fn newline_increments_line_counter() {
        let (tokens, _) = Scanner::new("1\n2").scan_tokens();
        assert_eq!(tokens[0].line, 1);
        assert_eq!(tokens[1].line, 2);
    }

    #[test]
    fn keyword_vs_identifier() {
        assert_eq!(kinds("class foo"), vec![TokenKind::Class, TokenKind::Identifier, TokenKind::Eof]);
    }

    #[test]
    fn identifiers_are_ascii_only() {
        // A non-ASCII letter ends the identifier rather than extending it.
        let (tokens, errors) = Scanner::new("caf\u{e9}").scan_tokens();
        assert_eq!(tokens[0].lexeme, "caf");
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn unexpected_character_is_reported_and_skipped() {
        let (tokens, errors) = Scanner::new("1 | 2").scan_tokens();
        assert_eq!(errors.len(), 1);
        assert_eq!(tokens.iter().map(|t| &t.kind).collect::<Vec<_>>(), vec![&TokenKind::Number, &TokenKind::Number, &TokenKind::Eof]);
    }
}
