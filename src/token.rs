use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // single-character operators and delimiters
    Bang,
    Plus,
    Minus,
    Slash,
    Star,
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    Assign,
    Greater,
    Less,
    Comma,
    Semicolon,

    // two-character operators
    GreaterEqual,
    LessEqual,
    EqualEqual,
    BangEqual,

    // literals
    Identifier,
    Int,
    Float,

    // keywords
    Fn,
    If,
    Else,
    Return,
    True,
    False,
    Let,
    While,
    Print,

    Eof,
    Illegal,
}

impl TokenKind {
    pub fn as_str(self) -> &'static str {
        use TokenKind::*;
        match self {
            Bang => "!",
            Plus => "+",
            Minus => "-",
            Slash => "/",
            Star => "*",
            LeftParen => "(",
            RightParen => ")",
            LeftBrace => "{",
            RightBrace => "}",
            Assign => "=",
            Greater => ">",
            Less => "<",
            Comma => ",",
            Semicolon => ";",
            GreaterEqual => ">=",
            LessEqual => "<=",
            EqualEqual => "==",
            BangEqual => "!=",
            Identifier => "IDENT",
            Int => "INT",
            Float => "FLOAT",
            Fn => "FN",
            If => "IF",
            Else => "ELSE",
            Return => "RETURN",
            True => "TRUE",
            False => "FALSE",
            Let => "LET",
            While => "WHILE",
            Print => "PRINT",
            Eof => "EOF",
            Illegal => "ILLEGAL",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, line: usize) -> Self {
        Token {
            kind,
            text: text.into(),
            line,
        }
    }

    pub fn eof(line: usize) -> Self {
        Token::new(TokenKind::Eof, "", line)
    }
}

/// Pull interface the parser reads tokens through.
///
/// Implementations must keep returning an `Eof` token once their input is
/// exhausted.
pub trait TokenSource {
    fn next_token(&mut self) -> Token;
}

/// Replays an already scanned token vector, padding the end with `Eof`.
pub struct TokenStream {
    tokens: std::vec::IntoIter<Token>,
    last_line: usize,
}

impl TokenStream {
    pub fn new(tokens: Vec<Token>) -> Self {
        TokenStream {
            tokens: tokens.into_iter(),
            last_line: 1,
        }
    }
}

impl TokenSource for TokenStream {
    fn next_token(&mut self) -> Token {
        match self.tokens.next() {
            Some(token) => {
                self.last_line = token.line;
                token
            }
            None => Token::eof(self.last_line),
        }
    }
}
