// Quill Language Interpreter Library
//
// Lexer, parser and tree-walking evaluator for a small expression language
// with `let`/`const` bindings and arithmetic.

// Public modules
pub mod ast;
pub mod environment;
pub mod error;
pub mod evaluator;
pub mod lexer;
pub mod parser;
pub mod repl;
pub mod runner;
pub mod value;

// Re-export commonly used items
pub use ast::{BinaryOp, Expr, Program, Stmt};
pub use environment::{Environment, EnvironmentError};
pub use error::{ErrorKind, QuillError, Span};
pub use evaluator::{evaluate, Evaluator};
pub use lexer::{tokenize, Lexer, Token, TokenKind};
pub use parser::{parse_program, Parser};
pub use value::Value;

// Re-export main functions
pub use repl::start as start_repl;
pub use runner::{execute, run, RunOptions};
