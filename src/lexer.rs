use crate::error::{CalcError, Span};
use crate::expr::Expression;
use std::fmt;

/// The six operators recognized in the surface syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Plus,
    Minus,
    Star,
    Slash,
    LeftParen,
    RightParen,
}

impl Op {
    pub fn from_char(c: char) -> Option<Op> {
        match c {
            '+' => Some(Op::Plus),
            '-' => Some(Op::Minus),
            '*' => Some(Op::Star),
            '/' => Some(Op::Slash),
            '(' => Some(Op::LeftParen),
            ')' => Some(Op::RightParen),
            _ => None,
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            Op::Plus => '+',
            Op::Minus => '-',
            Op::Star => '*',
            Op::Slash => '/',
            Op::LeftParen => '(',
            Op::RightParen => ')',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TokenKind {
    Number(f64),
    Operator(Op),
}

/// A lexical unit of the expression. `depth` is meaningless until the
/// expression's depths have been annotated; bracket elimination during
/// evaluation adjusts it further.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub depth: i32,
    pub span: Span,
}

impl Token {
    pub fn number(value: f64, span: Span) -> Self {
        Self {
            kind: TokenKind::Number(value),
            depth: 0,
            span,
        }
    }

    pub fn operator(op: Op, span: Span) -> Self {
        Self {
            kind: TokenKind::Operator(op),
            depth: 0,
            span,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self.kind {
            TokenKind::Number(n) => Some(n),
            TokenKind::Operator(_) => None,
        }
    }

    pub fn is_operator(&self, op: Op) -> bool {
        self.kind == TokenKind::Operator(op)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind {
            TokenKind::Number(n) => write!(f, "{}", n),
            TokenKind::Operator(op) => write!(f, "{}", op.symbol()),
        }
    }
}

pub struct Lexer {
    source: String,
    tokens: Vec<Token>,
    start: usize,
    current: usize,
}

impl Lexer {
    pub fn new(source: String) -> Self {
        Self {
            source,
            tokens: Vec::new(),
            start: 0,
            current: 0,
        }
    }

    /// Scan the whole input into an `Expression`.
    ///
    /// Digits accumulate into a run that is closed when an operator or the
    /// end of the input is reached; each operator becomes its own token.
    /// Anything else (whitespace included) is a lexical error.
    pub fn scan_expression(&mut self) -> Result<Expression, CalcError> {
        while !self.is_at_end() {
            self.start = self.current;
            self.scan_token()?;
        }

        Ok(Expression::new(std::mem::take(&mut self.tokens)))
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    fn scan_token(&mut self) -> Result<(), CalcError> {
        let c = self.advance();

        if let Some(op) = Op::from_char(c) {
            self.tokens
                .push(Token::operator(op, Span::new(self.start, self.current)));
            return Ok(());
        }

        if c.is_ascii_digit() {
            return self.number();
        }

        Err(CalcError::lex_error(
            Span::new(self.start, self.current),
            format!("Unknown character '{}' encountered", c),
        ))
    }

    fn advance(&mut self) -> char {
        let c = self.source[self.current..].chars().next().unwrap_or('\0');
        self.current += c.len_utf8();
        c
    }

    fn peek(&self) -> char {
        self.source[self.current..].chars().next().unwrap_or('\0')
    }

    fn number(&mut self) -> Result<(), CalcError> {
        while self.peek().is_ascii_digit() {
            self.advance();
        }

        let digits = &self.source[self.start..self.current];
        let value: f64 = digits.parse().map_err(|_| {
            CalcError::lex_error(
                Span::new(self.start, self.current),
                format!("Can't convert \"{}\" to a number", digits),
            )
        })?;

        self.tokens
            .push(Token::number(value, Span::new(self.start, self.current)));
        Ok(())
    }
}
