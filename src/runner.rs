use crate::environment::Environment;
use crate::error::QuillError;
use crate::evaluator::evaluate;
use crate::lexer::tokenize;
use crate::parser::Parser;
use crate::value::Value;
use std::cell::RefCell;
use std::rc::Rc;

/// What to print on top of evaluating a source text.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    pub show_tokens: bool,
    pub show_ast: bool,
}

/// Runs one source text through the whole pipeline against `env`.
pub fn execute(
    source: &str,
    env: &Rc<RefCell<Environment>>,
    options: RunOptions,
) -> Result<Value, QuillError> {
    // Lexical analysis
    let tokens = tokenize(source)?;
    if options.show_tokens {
        for token in &tokens {
            println!("{:?} {:?}", token.kind, token.value);
        }
    }

    // Parsing
    let program = Parser::new(tokens).parse()?;
    if options.show_ast {
        println!("{:#?}", program);
    }

    // Evaluation
    evaluate(&program, env)
}

/// Runs a whole script in a fresh global scope, reporting any failure.
pub fn run(source: &str, filename: Option<&str>, options: RunOptions) -> Option<Value> {
    let env = Environment::global();
    match execute(source, &env, options) {
        Ok(value) => Some(value),
        Err(error) => {
            error.report(source, filename);
            None
        }
    }
}
