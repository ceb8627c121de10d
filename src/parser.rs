use std::collections::HashMap;

use tracing::debug;

use crate::error::ParseError;
use crate::expr::{self, Expression, InfixOperator, PrefixOperator};
use crate::scanner::Scanner;
use crate::stmt::{Block, Program, Statement};
use crate::token::TokenKind::{self, *};
use crate::token::{Token, TokenSource, TokenStream};

/// Binding power of an operator token, weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Lowest,
    Equals,
    LessGreater,
    Sum,
    Product,
    Prefix,
    Call,
}

impl Precedence {
    pub fn of(kind: TokenKind) -> Self {
        match kind {
            EqualEqual | BangEqual => Precedence::Equals,
            Less | LessEqual | Greater | GreaterEqual => Precedence::LessGreater,
            Plus | Minus => Precedence::Sum,
            Star | Slash => Precedence::Product,
            LeftParen => Precedence::Call,
            _ => Precedence::Lowest,
        }
    }
}

pub type PrefixHandler<S> = fn(&mut Parser<S>) -> Option<Expression>;
pub type InfixHandler<S> = fn(&mut Parser<S>, Expression) -> Option<Expression>;

/// Parses an already scanned token vector.
pub fn parse(tokens: Vec<Token>) -> (Program, Vec<ParseError>) {
    let mut parser = Parser::new(TokenStream::new(tokens));
    let program = parser.parse_program();
    (program, parser.into_errors())
}

/// Scans and parses `source` in one pass.
pub fn parse_source(source: &str) -> (Program, Vec<ParseError>) {
    let mut parser = Parser::new(Scanner::new(source));
    let program = parser.parse_program();
    (program, parser.into_errors())
}

pub struct Parser<S: TokenSource> {
    tokens: S,
    current: Token,
    peek: Token,
    errors: Vec<ParseError>,
    prefix_handlers: HashMap<TokenKind, PrefixHandler<S>>,
    infix_handlers: HashMap<TokenKind, InfixHandler<S>>,
}

impl<S: TokenSource> Parser<S> {
    pub fn new(mut tokens: S) -> Self {
        let current = tokens.next_token();
        let peek = tokens.next_token();

        let mut parser = Parser {
            tokens,
            current,
            peek,
            errors: Vec::new(),
            prefix_handlers: HashMap::new(),
            infix_handlers: HashMap::new(),
        };

        parser.register_prefix(Identifier, Self::parse_identifier);
        parser.register_prefix(Int, Self::parse_integer_literal);
        parser.register_prefix(True, Self::parse_boolean_literal);
        parser.register_prefix(False, Self::parse_boolean_literal);
        parser.register_prefix(Bang, Self::parse_prefix);
        parser.register_prefix(Minus, Self::parse_prefix);
        parser.register_prefix(LeftParen, Self::parse_grouped);
        parser.register_prefix(If, Self::parse_if);
        parser.register_prefix(Fn, Self::parse_function_literal);

        for kind in [
            Plus,
            Minus,
            Star,
            Slash,
            EqualEqual,
            BangEqual,
            Greater,
            GreaterEqual,
            Less,
            LessEqual,
        ] {
            parser.register_infix(kind, Self::parse_infix);
        }
        parser.register_infix(LeftParen, Self::parse_call);

        parser
    }

    pub fn register_prefix(&mut self, kind: TokenKind, handler: PrefixHandler<S>) {
        self.prefix_handlers.insert(kind, handler);
    }

    pub fn register_infix(&mut self, kind: TokenKind, handler: InfixHandler<S>) {
        self.infix_handlers.insert(kind, handler);
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<ParseError> {
        self.errors
    }

    pub fn current(&self) -> &Token {
        &self.current
    }

    pub fn peek(&self) -> &Token {
        &self.peek
    }

    pub fn next_token(&mut self) {
        let next = self.tokens.next_token();
        self.current = std::mem::replace(&mut self.peek, next);
    }

    fn current_is(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    fn peek_is(&self, kind: TokenKind) -> bool {
        self.peek.kind == kind
    }

    /// Advances past the peek token whether or not it is `kind`, recording an
    /// error on mismatch. Returns whether it matched.
    ///
    /// The reported line is the line of the mismatched token.
    pub fn expect_peek(&mut self, kind: TokenKind) -> bool {
        let matched = self.peek_is(kind);
        if !matched {
            self.errors.push(ParseError::ExpectedToken {
                expected: kind,
                found: self.peek.kind,
                line: self.peek.line,
            });
        }
        self.next_token();
        matched
    }

    fn skip_semicolon(&mut self) {
        if self.peek_is(Semicolon) {
            self.next_token();
        }
    }

    pub fn parse_program(&mut self) -> Program {
        let mut statements = Vec::new();

        while !self.current_is(Eof) {
            if let Some(statement) = self.parse_statement() {
                statements.push(statement);
            }
            self.next_token();
        }

        debug!(
            statements = statements.len(),
            errors = self.errors.len(),
            "parsed program"
        );
        Program { statements }
    }

    fn parse_statement(&mut self) -> Option<Statement> {
        match self.current.kind {
            Let => self.parse_let_statement(),
            Return => self.parse_return_statement(),
            While => self.parse_while_statement(),
            Identifier if self.peek_is(Assign) => self.parse_assignment_statement(),
            LeftBrace => Some(Statement::Block(self.parse_block())),
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_let_statement(&mut self) -> Option<Statement> {
        if !self.expect_peek(Identifier) {
            return None;
        }
        let name = expr::Identifier::new(self.current.text.clone());

        if !self.expect_peek(Assign) {
            return None;
        }
        self.next_token();

        let value = self.parse_expression(Precedence::Lowest)?;
        self.skip_semicolon();

        Some(Statement::Let { name, value })
    }

    fn parse_return_statement(&mut self) -> Option<Statement> {
        self.next_token();

        let value = self.parse_expression(Precedence::Lowest)?;
        self.skip_semicolon();

        Some(Statement::Return { value })
    }

    fn parse_while_statement(&mut self) -> Option<Statement> {
        if !self.expect_peek(LeftParen) {
            return None;
        }
        self.next_token();

        let condition = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(RightParen) || !self.expect_peek(LeftBrace) {
            return None;
        }
        let body = self.parse_block();

        Some(Statement::While { condition, body })
    }

    fn parse_assignment_statement(&mut self) -> Option<Statement> {
        let name = expr::Identifier::new(self.current.text.clone());
        // skip over the name and the '='
        self.next_token();
        self.next_token();

        let value = self.parse_expression(Precedence::Lowest)?;
        self.skip_semicolon();

        Some(Statement::Assignment { name, value })
    }

    fn parse_expression_statement(&mut self) -> Option<Statement> {
        let expression = self.parse_expression(Precedence::Lowest)?;
        self.skip_semicolon();

        Some(Statement::Expression { expression })
    }

    /// Parses statements up to the `}` matching the current `{`.
    fn parse_block(&mut self) -> Block {
        let mut statements = Vec::new();
        self.next_token();

        while !self.current_is(RightBrace) && !self.current_is(Eof) {
            if let Some(statement) = self.parse_statement() {
                statements.push(statement);
            }
            self.next_token();
        }

        if self.current_is(Eof) {
            self.errors.push(ParseError::ExpectedToken {
                expected: RightBrace,
                found: Eof,
                line: self.current.line,
            });
        }

        Block { statements }
    }

    pub fn parse_expression(&mut self, precedence: Precedence) -> Option<Expression> {
        let prefix = match self.prefix_handlers.get(&self.current.kind).copied() {
            Some(handler) => handler,
            None => {
                self.errors.push(ParseError::NoPrefixHandler {
                    kind: self.current.kind,
                    line: self.current.line,
                });
                return None;
            }
        };
        let mut left = prefix(self)?;

        while !self.peek_is(Semicolon) && precedence < Precedence::of(self.peek.kind) {
            let infix = match self.infix_handlers.get(&self.peek.kind).copied() {
                Some(handler) => handler,
                None => return Some(left),
            };
            self.next_token();
            left = infix(self, left)?;
        }

        Some(left)
    }

    fn parse_identifier(&mut self) -> Option<Expression> {
        Some(Expression::Identifier(expr::Identifier::new(
            self.current.text.clone(),
        )))
    }

    fn parse_integer_literal(&mut self) -> Option<Expression> {
        match self.current.text.parse() {
            Ok(value) => Some(Expression::IntegerLiteral(value)),
            Err(_) => {
                self.errors.push(ParseError::InvalidInteger {
                    text: self.current.text.clone(),
                    line: self.current.line,
                });
                None
            }
        }
    }

    fn parse_boolean_literal(&mut self) -> Option<Expression> {
        Some(Expression::BooleanLiteral(self.current_is(True)))
    }

    fn parse_prefix(&mut self) -> Option<Expression> {
        let operator = match self.current.kind {
            Bang => PrefixOperator::Bang,
            _ => PrefixOperator::Minus,
        };
        self.next_token();

        let right = self.parse_expression(Precedence::Prefix)?;
        Some(Expression::Prefix {
            operator,
            right: Box::new(right),
        })
    }

    fn parse_grouped(&mut self) -> Option<Expression> {
        self.next_token();

        let expression = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(RightParen) {
            return None;
        }
        Some(expression)
    }

    fn parse_if(&mut self) -> Option<Expression> {
        if !self.expect_peek(LeftParen) {
            return None;
        }
        self.next_token();

        let condition = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(RightParen) || !self.expect_peek(LeftBrace) {
            return None;
        }
        let consequence = self.parse_block();

        let alternative = if self.peek_is(Else) {
            self.next_token();
            if !self.expect_peek(LeftBrace) {
                return None;
            }
            self.parse_block()
        } else {
            Block::default()
        };

        Some(Expression::If {
            condition: Box::new(condition),
            consequence,
            alternative,
        })
    }

    fn parse_function_literal(&mut self) -> Option<Expression> {
        if !self.expect_peek(LeftParen) {
            return None;
        }
        let params = self.parse_function_parameters()?;

        if !self.expect_peek(LeftBrace) {
            return None;
        }
        let body = self.parse_block();

        Some(Expression::FunctionLiteral { params, body })
    }

    fn parse_function_parameters(&mut self) -> Option<Vec<expr::Identifier>> {
        let mut params = Vec::new();

        if self.peek_is(RightParen) {
            self.next_token();
            return Some(params);
        }

        loop {
            if !self.expect_peek(Identifier) {
                return None;
            }
            params.push(expr::Identifier::new(self.current.text.clone()));

            if !self.peek_is(Comma) {
                break;
            }
            self.next_token();
        }

        if !self.expect_peek(RightParen) {
            return None;
        }
        Some(params)
    }

    fn parse_infix(&mut self, left: Expression) -> Option<Expression> {
        let operator = match self.current.kind {
            Plus => InfixOperator::Plus,
            Minus => InfixOperator::Minus,
            Star => InfixOperator::Star,
            Slash => InfixOperator::Slash,
            EqualEqual => InfixOperator::EqualEqual,
            BangEqual => InfixOperator::BangEqual,
            Greater => InfixOperator::Greater,
            GreaterEqual => InfixOperator::GreaterEqual,
            Less => InfixOperator::Less,
            _ => InfixOperator::LessEqual,
        };
        let precedence = Precedence::of(self.current.kind);
        self.next_token();

        let right = self.parse_expression(precedence)?;
        Some(Expression::Infix {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    fn parse_call(&mut self, callee: Expression) -> Option<Expression> {
        let mut args = Vec::new();

        if self.peek_is(RightParen) {
            self.next_token();
        } else {
            self.next_token();
            args.push(self.parse_expression(Precedence::Lowest)?);

            while self.peek_is(Comma) {
                self.next_token();
                self.next_token();
                args.push(self.parse_expression(Precedence::Lowest)?);
            }

            if !self.expect_peek(RightParen) {
                return None;
            }
        }

        Some(Expression::Call {
            callee: Box::new(callee),
            args,
        })
    }
}
