use lazy_static::lazy_static;
use std::collections::HashMap;
use std::iter::Peekable;
use std::mem;
use std::str::Chars;

use tracing::trace;

use crate::token::TokenKind::{self, *};
use crate::token::{Token, TokenSource};

lazy_static! {
    static ref KEYWORDS: HashMap<&'static str, TokenKind> = HashMap::from([
        ("else", Else),
        ("false", False),
        ("fn", Fn),
        ("if", If),
        ("let", Let),
        ("print", Print),
        ("return", Return),
        ("true", True),
        ("while", While),
    ]);
}

pub struct Scanner<'a> {
    source: Peekable<Chars<'a>>,
    text: String,
    line: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Scanner {
            source: source.chars().peekable(),
            text: String::new(),
            line: 1,
        }
    }

    /// Scans the whole input, including the trailing `Eof` token.
    pub fn scan_all(source: &str) -> Vec<Token> {
        let mut scanner = Scanner::new(source);
        let mut tokens = Vec::new();
        loop {
            let token = scanner.next_token();
            let done = token.kind == Eof;
            tokens.push(token);
            if done {
                return tokens;
            }
        }
    }

    fn scan_token(&mut self) -> Token {
        self.skip_whitespace();

        let c = match self.source.next() {
            Some(c) => c,
            None => return Token::eof(self.line),
        };
        self.text.push(c);

        match c {
            '(' => self.make_token(LeftParen),
            ')' => self.make_token(RightParen),
            '{' => self.make_token(LeftBrace),
            '}' => self.make_token(RightBrace),
            ',' => self.make_token(Comma),
            ';' => self.make_token(Semicolon),
            '-' => self.make_token(Minus),
            '+' => self.make_token(Plus),
            '*' => self.make_token(Star),
            '/' => self.make_token(Slash),
            '!' => {
                let matched = self.match_next('=');
                self.make_token(if matched { BangEqual } else { Bang })
            }
            '=' => {
                let matched = self.match_next('=');
                self.make_token(if matched { EqualEqual } else { Assign })
            }
            '<' => {
                let matched = self.match_next('=');
                self.make_token(if matched { LessEqual } else { Less })
            }
            '>' => {
                let matched = self.match_next('=');
                self.make_token(if matched { GreaterEqual } else { Greater })
            }
            _ if c.is_ascii_digit() => self.scan_number(),
            _ if is_alpha(c) => self.scan_identifier(),
            _ => self.make_token(Illegal),
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(&c) = self.source.peek() {
            match c {
                ' ' | '\r' | '\t' => {
                    self.source.next();
                }
                '\n' => {
                    self.line += 1;
                    self.source.next();
                }
                '/' => {
                    // clone the iterator to look two characters ahead
                    let mut cloned = self.source.clone();
                    cloned.next();
                    if cloned.peek() != Some(&'/') {
                        return;
                    }
                    while let Some(&c) = self.source.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.source.next();
                    }
                }
                _ => return,
            }
        }
    }

    fn scan_number(&mut self) -> Token {
        self.advance_digits();

        // check for a fractional part
        if let Some(&c) = self.source.peek() {
            if c == '.' {
                let mut cloned = self.source.clone();
                cloned.next();
                if let Some(next_c) = cloned.peek() {
                    if next_c.is_ascii_digit() {
                        self.text.push(c);
                        self.source.next();
                        self.advance_digits();
                        return self.make_token(Float);
                    }
                }
            }
        }

        self.make_token(Int)
    }

    fn advance_digits(&mut self) {
        while let Some(&c) = self.source.peek() {
            if !c.is_ascii_digit() {
                break;
            }
            self.text.push(c);
            self.source.next();
        }
    }

    fn scan_identifier(&mut self) -> Token {
        while let Some(&c) = self.source.peek() {
            if !is_alpha(c) && !c.is_ascii_digit() {
                break;
            }
            self.text.push(c);
            self.source.next();
        }

        let kind = *KEYWORDS.get(self.text.as_str()).unwrap_or(&Identifier);
        self.make_token(kind)
    }

    fn match_next(&mut self, expected: char) -> bool {
        if self.source.peek() != Some(&expected) {
            return false;
        }
        self.source.next();
        self.text.push(expected);
        true
    }

    fn make_token(&mut self, kind: TokenKind) -> Token {
        let mut text = String::new();
        mem::swap(&mut self.text, &mut text);
        Token {
            kind,
            text,
            line: self.line,
        }
    }
}

impl TokenSource for Scanner<'_> {
    fn next_token(&mut self) -> Token {
        let token = self.scan_token();
        trace!(kind = %token.kind, text = %token.text, line = token.line, "scanned token");
        token
    }
}

fn is_alpha(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}
