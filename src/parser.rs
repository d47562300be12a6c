use crate::ast::{BinaryOp, Expr, Program, Stmt};
use crate::error::{QuillError, Span};
use crate::lexer::{tokenize, Token, TokenKind};
use log::debug;
use std::collections::VecDeque;

/// Recursive-descent parser that consumes its tokens from the front of a queue.
///
/// Precedence, loosest first:
/// assignment, additive (`+ -`), multiplicative (`* / %`), primary.
///
/// Expression trees are capped at [`MAX_DEPTH`] levels so parsing and
/// evaluation stay within the native stack.
pub struct Parser {
    tokens: VecDeque<Token>,
    eof: Token,
    depth: usize,
}

/// Deepest expression tree the parser will build. Every parenthesis,
/// assignment and folded binary operator counts as one level.
pub const MAX_DEPTH: usize = 256;

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        let mut tokens = VecDeque::from(tokens);
        let terminated = tokens
            .back()
            .map_or(false, |t| t.kind == TokenKind::EndOfFile);

        if !terminated {
            let end = tokens.back().map_or(0, |t| t.span.end);
            tokens.push_back(Token::new(
                TokenKind::EndOfFile,
                "EndOfFile".to_string(),
                Span::new(end, end),
            ));
        }

        let eof = tokens
            .back()
            .cloned()
            .unwrap_or_else(|| {
                Token::new(TokenKind::EndOfFile, "EndOfFile".to_string(), Span::default())
            });
        Self {
            tokens,
            eof,
            depth: 0,
        }
    }

    pub fn parse(&mut self) -> Result<Program, QuillError> {
        let mut body = Vec::new();

        while self.not_eof() {
            body.push(self.parse_stmt()?);
        }

        debug!("parsed program with {} statements", body.len());
        Ok(Program { body })
    }

    fn parse_stmt(&mut self) -> Result<Stmt, QuillError> {
        match self.at().kind {
            TokenKind::Let | TokenKind::Const => self.parse_var_declaration(),
            _ => self.parse_expression_statement(),
        }
    }

    // let IDENT ;
    // (let | const) IDENT = EXPR ;
    fn parse_var_declaration(&mut self) -> Result<Stmt, QuillError> {
        let keyword = self.next();
        let constant = keyword.kind == TokenKind::Const;

        let identifier = self.expect_with_help(
            TokenKind::Identifier,
            &format!("after '{}'", keyword.value),
            "A variable name must follow 'let' or 'const'. Example: let total = 10;",
        )?;

        if self.at().kind == TokenKind::Semicolon {
            let semicolon = self.next();
            if constant {
                return Err(QuillError::syntax_error_with_help(
                    keyword.span.to(&semicolon.span),
                    format!("Constant '{}' requires a value", identifier.value),
                    format!(
                        "Give the constant an initial value: const {} = <expression>;",
                        identifier.value
                    ),
                ));
            }
            return Ok(Stmt::VarDeclaration {
                identifier: identifier.value,
                constant: false,
                value: None,
                span: keyword.span.to(&semicolon.span),
            });
        }

        self.expect(TokenKind::Equals, "after identifier in variable declaration")?;
        let value = self.parse_expr()?;
        let semicolon = self.expect_with_help(
            TokenKind::Semicolon,
            "at end of variable declaration",
            "Variable declarations must be terminated with ';'.",
        )?;

        Ok(Stmt::VarDeclaration {
            identifier: identifier.value,
            constant,
            value: Some(value),
            span: keyword.span.to(&semicolon.span),
        })
    }

    fn parse_expression_statement(&mut self) -> Result<Stmt, QuillError> {
        let expr = self.parse_expr()?;
        let mut span = *expr.span();

        if self.at().kind == TokenKind::Semicolon {
            span = span.to(&self.next().span);
        }

        Ok(Stmt::Expression { expr, span })
    }

    fn parse_expr(&mut self) -> Result<Expr, QuillError> {
        self.parse_assignment_expr()
    }

    // x = y = 1 + 2
    fn parse_assignment_expr(&mut self) -> Result<Expr, QuillError> {
        let left = self.parse_additive_expr()?;

        if self.at().kind != TokenKind::Equals {
            return Ok(left);
        }

        let equals = self.next();
        self.descend(equals.span)?;
        let value = self.parse_assignment_expr()?;
        self.depth -= 1;
        let span = left.span().to(value.span());

        Ok(Expr::Assignment {
            assignee: Box::new(left),
            value: Box::new(value),
            span,
        })
    }

    // 10 + 5 - 5
    fn parse_additive_expr(&mut self) -> Result<Expr, QuillError> {
        let mut left = self.parse_multiplicative_expr()?;
        let mut folded = 0;

        while let Some(operator) = self.binary_operator(&[BinaryOp::Add, BinaryOp::Subtract]) {
            let token = self.next();
            self.descend(token.span)?;
            folded += 1;
            let right = self.parse_multiplicative_expr()?;
            left = binary(left, operator, right);
        }

        self.depth -= folded;
        Ok(left)
    }

    fn parse_multiplicative_expr(&mut self) -> Result<Expr, QuillError> {
        let mut left = self.parse_primary_expr()?;
        let mut folded = 0;

        while let Some(operator) =
            self.binary_operator(&[BinaryOp::Multiply, BinaryOp::Divide, BinaryOp::Modulo])
        {
            let token = self.next();
            self.descend(token.span)?;
            folded += 1;
            let right = self.parse_primary_expr()?;
            left = binary(left, operator, right);
        }

        self.depth -= folded;
        Ok(left)
    }

    fn parse_primary_expr(&mut self) -> Result<Expr, QuillError> {
        match self.at().kind {
            TokenKind::Identifier => {
                let token = self.next();
                Ok(Expr::Identifier {
                    symbol: token.value,
                    span: token.span,
                })
            }
            TokenKind::Number => {
                let token = self.next();
                let value = token.value.parse::<f64>().map_err(|_| {
                    QuillError::syntax_error(
                        token.span,
                        format!("Invalid number literal '{}'", token.value),
                    )
                })?;
                Ok(Expr::NumericLiteral {
                    value,
                    span: token.span,
                })
            }
            TokenKind::OpenParen => {
                let open = self.next();
                self.descend(open.span)?;
                let value = self.parse_expr()?;
                self.expect_with_help(
                    TokenKind::CloseParen,
                    "after parenthesized expression",
                    "Every opening parenthesis '(' must have a matching closing parenthesis ')'.",
                )?;
                self.depth -= 1;
                Ok(value)
            }
            _ => {
                let token = self.at();
                let help = match token.kind {
                    TokenKind::CloseParen => "Found ')' without matching '('.",
                    TokenKind::EndOfFile => "Reached end of input while expecting an expression.",
                    _ => "Expected a number, a variable, or a parenthesized expression here.",
                };
                Err(QuillError::syntax_error_with_help(
                    token.span,
                    format!(
                        "Expected Identifier, Number or OpenParen, found {}",
                        describe(token)
                    ),
                    help.to_string(),
                ))
            }
        }
    }

    // Errors abort the whole parse, so the depth is only unwound on success.
    fn descend(&mut self, span: Span) -> Result<(), QuillError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(QuillError::syntax_error_with_help(
                span,
                "Expression nested too deeply".to_string(),
                format!(
                    "Expressions may nest at most {} levels. Split it into several statements.",
                    MAX_DEPTH
                ),
            ));
        }
        Ok(())
    }

    fn binary_operator(&self, accepted: &[BinaryOp]) -> Option<BinaryOp> {
        let token = self.at();
        if token.kind != TokenKind::BinaryOperator {
            return None;
        }
        BinaryOp::from_symbol(&token.value).filter(|op| accepted.contains(op))
    }

    fn not_eof(&self) -> bool {
        self.at().kind != TokenKind::EndOfFile
    }

    fn at(&self) -> &Token {
        self.tokens.front().unwrap_or(&self.eof)
    }

    // The trailing EndOfFile token is never removed from the queue.
    fn next(&mut self) -> Token {
        if !self.not_eof() {
            return self.at().clone();
        }
        self.tokens.pop_front().unwrap_or_else(|| self.eof.clone())
    }

    fn expect(&mut self, kind: TokenKind, context: &str) -> Result<Token, QuillError> {
        if self.at().kind == kind {
            Ok(self.next())
        } else {
            Err(self.unexpected(kind, context))
        }
    }

    fn expect_with_help(
        &mut self,
        kind: TokenKind,
        context: &str,
        help: &str,
    ) -> Result<Token, QuillError> {
        self.expect(kind, context).map_err(|mut error| {
            error.help = Some(help.to_string());
            error
        })
    }

    fn unexpected(&self, expected: TokenKind, context: &str) -> QuillError {
        let found = self.at();
        QuillError::syntax_error(
            found.span,
            format!("Expected {} {}, found {}", expected, context, describe(found)),
        )
    }
}

fn binary(left: Expr, operator: BinaryOp, right: Expr) -> Expr {
    let span = left.span().to(right.span());
    Expr::Binary {
        left: Box::new(left),
        operator,
        right: Box::new(right),
        span,
    }
}

fn describe(token: &Token) -> String {
    match token.kind {
        TokenKind::EndOfFile => "EndOfFile".to_string(),
        kind => format!("{} '{}'", kind, token.value),
    }
}

/// Tokenizes and parses `source` into a single program.
pub fn parse_program(source: &str) -> Result<Program, QuillError> {
    let tokens = tokenize(source)?;
    Parser::new(tokens).parse()
}
