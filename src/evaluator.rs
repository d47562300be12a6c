use crate::ast::{BinaryOp, Expr, Program, Stmt};
use crate::environment::Environment;
use crate::error::{QuillError, Span};
use crate::value::Value;
use log::{debug, trace};
use std::cell::RefCell;
use std::rc::Rc;

/// Tree-walking evaluator over a caller-owned environment.
pub struct Evaluator {
    environment: Rc<RefCell<Environment>>,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::with_environment(Environment::global())
    }

    pub fn with_environment(environment: Rc<RefCell<Environment>>) -> Self {
        Self { environment }
    }

    pub fn environment(&self) -> &Rc<RefCell<Environment>> {
        &self.environment
    }

    /// Evaluates every statement in order and yields the value of the last one.
    pub fn evaluate_program(&mut self, program: &Program) -> Result<Value, QuillError> {
        debug!("evaluating {} statements", program.body.len());

        let mut last_evaluated = Value::Null;
        for statement in &program.body {
            last_evaluated = self.execute_statement(statement)?;
        }
        Ok(last_evaluated)
    }

    pub fn execute_statement(&mut self, stmt: &Stmt) -> Result<Value, QuillError> {
        match stmt {
            Stmt::Expression { expr, .. } => self.evaluate_expression(expr),
            Stmt::VarDeclaration {
                identifier,
                constant,
                value,
                span,
            } => {
                let value = match value {
                    Some(expr) => self.evaluate_expression(expr)?,
                    None => Value::Null,
                };
                self.environment
                    .borrow_mut()
                    .declare_var(identifier, value, *constant)
                    .map_err(|e| QuillError::binding_error(*span, e.to_string()))
            }
        }
    }

    pub fn evaluate_expression(&mut self, expr: &Expr) -> Result<Value, QuillError> {
        match expr {
            Expr::NumericLiteral { value, .. } => Ok(Value::Number(*value)),
            Expr::Identifier { symbol, span } => self
                .environment
                .borrow()
                .lookup_var(symbol)
                .map_err(|e| QuillError::binding_error(*span, e.to_string())),
            Expr::Assignment {
                assignee,
                value,
                span,
            } => self.evaluate_assignment(assignee, value, span),
            Expr::Binary {
                left,
                operator,
                right,
                ..
            } => {
                let left_val = self.evaluate_expression(left)?;
                let right_val = self.evaluate_expression(right)?;
                Ok(evaluate_binary_op(*operator, left_val, right_val))
            }
        }
    }

    fn evaluate_assignment(
        &mut self,
        assignee: &Expr,
        value: &Expr,
        span: &Span,
    ) -> Result<Value, QuillError> {
        let symbol = match assignee {
            Expr::Identifier { symbol, .. } => symbol,
            other => {
                return Err(QuillError::eval_error_with_help(
                    *other.span(),
                    "Invalid left-hand side in assignment".to_string(),
                    "Only variables can be assigned to. Example: x = 10".to_string(),
                ));
            }
        };

        let value = self.evaluate_expression(value)?;
        self.environment
            .borrow_mut()
            .assign_var(symbol, value)
            .map_err(|e| QuillError::binding_error(*span, e.to_string()))
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

/// Arithmetic on two numbers; any other operand combination yields null.
fn evaluate_binary_op(operator: BinaryOp, left: Value, right: Value) -> Value {
    match (left.as_number(), right.as_number()) {
        (Some(l), Some(r)) => Value::Number(operator.apply(l, r)),
        _ => {
            trace!(
                "{} {} {} is not numeric, yielding null",
                left.type_name(),
                operator,
                right.type_name()
            );
            Value::Null
        }
    }
}

/// Evaluates `program` against `env`, leaving declarations behind in `env`.
pub fn evaluate(program: &Program, env: &Rc<RefCell<Environment>>) -> Result<Value, QuillError> {
    Evaluator::with_environment(Rc::clone(env)).evaluate_program(program)
}
