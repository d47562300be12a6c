use crate::error::{QuillError, Span};
use lazy_static::lazy_static;
use log::{debug, trace};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Literals
    Number,
    Identifier,

    // Grouping and punctuation
    OpenParen,
    CloseParen,
    Semicolon,

    // Keywords
    Let,
    Const,

    // Operators
    Equals,
    BinaryOperator,

    // Special
    EndOfFile,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

lazy_static! {
    static ref KEYWORDS: HashMap<&'static str, TokenKind> =
        [("let", TokenKind::Let), ("const", TokenKind::Const)]
            .iter()
            .cloned()
            .collect();
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, value: String, span: Span) -> Self {
        Self { kind, value, span }
    }
}

/// Scans source text into tokens. Positions are character offsets, not bytes.
pub struct Lexer {
    source: Vec<char>,
    tokens: Vec<Token>,
    start: usize,
    current: usize,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Self {
            source: source.chars().collect(),
            tokens: Vec::new(),
            start: 0,
            current: 0,
        }
    }

    pub fn scan_tokens(mut self) -> Result<Vec<Token>, QuillError> {
        while !self.is_at_end() {
            self.start = self.current;
            self.scan_token()?;
        }

        self.tokens.push(Token::new(
            TokenKind::EndOfFile,
            "EndOfFile".to_string(),
            Span::new(self.current, self.current),
        ));

        debug!("lexed {} tokens", self.tokens.len());
        Ok(self.tokens)
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    fn scan_token(&mut self) -> Result<(), QuillError> {
        let c = self.advance();

        match c {
            '(' => self.add_token(TokenKind::OpenParen),
            ')' => self.add_token(TokenKind::CloseParen),
            ';' => self.add_token(TokenKind::Semicolon),
            '=' => self.add_token(TokenKind::Equals),
            '+' | '-' | '*' | '/' | '%' => self.add_token(TokenKind::BinaryOperator),
            ' ' | '\t' | '\n' | '\r' => {}
            c if c.is_ascii_digit() => self.number(),
            c if is_alpha(c) => self.identifier(),
            _ => {
                return Err(QuillError::lex_error(
                    Span::single(self.start),
                    format!(
                        "Unrecognized character '{}' at position {}",
                        c, self.start
                    ),
                ));
            }
        }

        Ok(())
    }

    fn advance(&mut self) -> char {
        let c = self.peek();
        self.current += 1;
        c
    }

    fn peek(&self) -> char {
        self.source.get(self.current).copied().unwrap_or('\0')
    }

    fn number(&mut self) {
        while self.peek().is_ascii_digit() {
            self.advance();
        }
        self.add_token(TokenKind::Number);
    }

    fn identifier(&mut self) {
        while is_alpha(self.peek()) {
            self.advance();
        }

        let text = self.lexeme();
        let kind = KEYWORDS
            .get(text.as_str())
            .copied()
            .unwrap_or(TokenKind::Identifier);
        self.tokens
            .push(Token::new(kind, text, Span::new(self.start, self.current)));
    }

    fn lexeme(&self) -> String {
        self.source[self.start..self.current].iter().collect()
    }

    fn add_token(&mut self, kind: TokenKind) {
        let token = Token::new(kind, self.lexeme(), Span::new(self.start, self.current));
        trace!("token {:?} {:?}", token.kind, token.value);
        self.tokens.push(token);
    }
}

/// A character counts as alphabetic when it has distinct upper and lower case forms.
fn is_alpha(c: char) -> bool {
    !c.to_uppercase().eq(c.to_lowercase())
}

pub fn tokenize(source: &str) -> Result<Vec<Token>, QuillError> {
    Lexer::new(source).scan_tokens()
}
