// Evaluation tests
//
// Programs run end to end through lexer, parser and evaluator, plus a few
// hand-built trees for shapes the grammar cannot produce.

use quill::ast::{BinaryOp, Expr, Program, Stmt};
use quill::error::{ErrorKind, QuillError, Span};
use quill::{evaluate, execute, parse_program, Environment, Evaluator, RunOptions, Value};

fn eval(source: &str) -> Result<Value, QuillError> {
    let env = Environment::global();
    execute(source, &env, RunOptions::default())
}

fn number(source: &str) -> f64 {
    match eval(source) {
        Ok(Value::Number(n)) => n,
        other => panic!("expected a number from {:?}, got {:?}", source, other),
    }
}

fn ident(symbol: &str) -> Expr {
    Expr::Identifier {
        symbol: symbol.to_string(),
        span: Span::default(),
    }
}

fn num(value: f64) -> Expr {
    Expr::NumericLiteral {
        value,
        span: Span::default(),
    }
}

fn statement(expr: Expr) -> Stmt {
    Stmt::Expression {
        expr,
        span: Span::default(),
    }
}

#[test]
fn arithmetic_precedence_and_associativity() {
    assert_eq!(number("10 - 5 - 2"), 3.0);
    assert_eq!(number("2 + 3 * 4"), 14.0);
    assert_eq!(number("(2 + 3) * 4"), 20.0);
    assert_eq!(number("100 / 10 / 5"), 2.0);
    assert_eq!(number("7 % 4 * 2"), 6.0);
    assert_eq!(number("((((42))))"), 42.0);
}

#[test]
fn division_and_remainder_follow_floating_point() {
    assert_eq!(number("7 / 2"), 3.5);
    assert_eq!(number("10 % 4"), 2.0);
    assert!(number("1 / 0").is_infinite());
    assert!(number("0 / 0").is_nan());
}

#[test]
fn declaration_then_lookup() {
    assert_eq!(eval("let x = 5; x"), Ok(Value::Number(5.0)));
    assert_eq!(eval("const x = 2 * 3; x + 1"), Ok(Value::Number(7.0)));
}

#[test]
fn declaration_yields_declared_value() {
    assert_eq!(eval("let x = 9;"), Ok(Value::Number(9.0)));
    assert_eq!(eval("let x;"), Ok(Value::Null));
}

#[test]
fn program_value_is_last_statement() {
    assert_eq!(eval(""), Ok(Value::Null));
    assert_eq!(eval("1 2 3"), Ok(Value::Number(3.0)));
    assert_eq!(eval("1; 2;"), Ok(Value::Number(2.0)));
}

#[test]
fn assignment_updates_and_returns_value() {
    assert_eq!(eval("let x = 1; x = x + 41; x"), Ok(Value::Number(42.0)));
    assert_eq!(eval("let x; x = 3"), Ok(Value::Number(3.0)));
    assert_eq!(eval("let a; let b; a = b = 4; a + b"), Ok(Value::Number(8.0)));
}

#[test]
fn assigning_to_constant_is_a_binding_error() {
    let error = eval("const x = 1; x = 2").unwrap_err();
    assert_eq!(error.kind, ErrorKind::BindingError);
    assert!(error.message.contains("constant 'x'"));
}

#[test]
fn constant_without_value_is_a_syntax_error() {
    let error = eval("const x;").unwrap_err();
    assert_eq!(error.kind, ErrorKind::SyntaxError);
}

#[test]
fn binding_errors() {
    let undefined = eval("y + 1").unwrap_err();
    assert_eq!(undefined.kind, ErrorKind::BindingError);
    assert_eq!(undefined.message, "Undefined variable 'y'");
    assert_eq!(undefined.span, Span::new(0, 1));

    let assign_undefined = eval("y = 1").unwrap_err();
    assert_eq!(assign_undefined.kind, ErrorKind::BindingError);

    let redeclared = eval("let x = 1; let x = 2;").unwrap_err();
    assert_eq!(redeclared.kind, ErrorKind::BindingError);
    assert!(redeclared.message.contains("already declared"));
}

#[test]
fn builtin_constants_are_protected() {
    let error = eval("true = 1").unwrap_err();
    assert_eq!(error.kind, ErrorKind::BindingError);
    assert_eq!(eval("true"), Ok(Value::Boolean(true)));
}

#[test]
fn non_numeric_operands_yield_null() {
    assert_eq!(eval("null + 1"), Ok(Value::Null));
    assert_eq!(eval("1 * null"), Ok(Value::Null));
    assert_eq!(eval("true - false"), Ok(Value::Null));
    assert_eq!(eval("let x; x % 2"), Ok(Value::Null));
    assert_eq!(eval("(null + 1) * 5"), Ok(Value::Null));
}

#[test]
fn invalid_assignment_target() {
    let error = eval("1 = 2").unwrap_err();
    assert_eq!(error.kind, ErrorKind::EvalError);
    assert!(error.message.contains("Invalid left-hand side"));

    let error = eval("let a = 1; a + 1 = 2").unwrap_err();
    assert_eq!(error.kind, ErrorKind::EvalError);
    assert_eq!(error.span, Span::new(11, 16));
}

#[test]
fn errors_abort_the_rest_of_the_program() {
    let env = Environment::global();
    let result = execute("let a = 1; b; let c = 3;", &env, RunOptions::default());
    assert!(result.is_err());
    assert_eq!(env.borrow().lookup_var("a"), Ok(Value::Number(1.0)));
    assert!(env.borrow().lookup_var("c").is_err());
}

#[test]
fn environment_persists_between_programs() {
    let env = Environment::global();
    let first = parse_program("let total = 10;").unwrap();
    let second = parse_program("total = total * 2; total").unwrap();

    evaluate(&first, &env).unwrap();
    assert_eq!(evaluate(&second, &env), Ok(Value::Number(20.0)));

    // A failing line leaves earlier state intact
    assert!(execute("total = nope", &env, RunOptions::default()).is_err());
    assert_eq!(env.borrow().lookup_var("total"), Ok(Value::Number(20.0)));
}

#[test]
fn hand_built_assignment_tree() {
    let env = Environment::global();
    env.borrow_mut()
        .declare_var("x", Value::Number(1.0), false)
        .unwrap();

    let program = Program {
        body: vec![statement(Expr::Assignment {
            assignee: Box::new(ident("x")),
            value: Box::new(Expr::Binary {
                left: Box::new(ident("x")),
                operator: BinaryOp::Add,
                right: Box::new(num(1.0)),
                span: Span::default(),
            }),
            span: Span::default(),
        })],
    };

    let mut evaluator = Evaluator::with_environment(env);
    assert_eq!(evaluator.evaluate_program(&program), Ok(Value::Number(2.0)));
    assert_eq!(
        evaluator.environment().borrow().lookup_var("x"),
        Ok(Value::Number(2.0))
    );
}

#[test]
fn operands_evaluate_left_before_right() {
    // The left operand fails first, so its name is the one reported.
    let error = eval("left + right").unwrap_err();
    assert_eq!(error.message, "Undefined variable 'left'");
}

#[test]
fn default_evaluator_starts_with_builtins() {
    let mut evaluator = Evaluator::default();
    let program = parse_program("false").unwrap();
    assert_eq!(evaluator.evaluate_program(&program), Ok(Value::Boolean(false)));
}

#[test]
fn runaway_nesting_fails_without_losing_the_session() {
    let env = Environment::global();
    execute("let kept = 7;", &env, RunOptions::default()).unwrap();

    let deep = "(".repeat(200_000) + "1" + &")".repeat(200_000);
    let error = execute(&deep, &env, RunOptions::default()).unwrap_err();
    assert_eq!(error.kind, ErrorKind::SyntaxError);

    assert_eq!(
        execute("kept + 1", &env, RunOptions::default()),
        Ok(Value::Number(8.0))
    );
}
