use crate::value::Value;
use log::debug;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EnvironmentError {
    #[error("Cannot declare variable '{0}': it is already declared in this scope")]
    AlreadyDeclared(String),

    #[error("Undefined variable '{0}'")]
    Undefined(String),

    #[error("Cannot assign to constant '{0}'")]
    ConstantAssignment(String),
}

#[derive(Debug, Clone)]
struct Binding {
    value: Value,
    constant: bool,
}

/// A single lexical scope, optionally enclosed by a parent scope.
#[derive(Debug, Default)]
pub struct Environment {
    bindings: HashMap<String, Binding>,
    parent: Option<Rc<RefCell<Environment>>>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parent(parent: Rc<RefCell<Environment>>) -> Self {
        Self {
            bindings: HashMap::new(),
            parent: Some(parent),
        }
    }

    /// Global scope with the built-in constants `true`, `false` and `null`.
    pub fn global() -> Rc<RefCell<Environment>> {
        let mut env = Environment::new();
        for (name, value) in [
            ("true", Value::Boolean(true)),
            ("false", Value::Boolean(false)),
            ("null", Value::Null),
        ] {
            env.bindings.insert(
                name.to_string(),
                Binding {
                    value,
                    constant: true,
                },
            );
        }
        Rc::new(RefCell::new(env))
    }

    pub fn declare_var(
        &mut self,
        name: &str,
        value: Value,
        constant: bool,
    ) -> Result<Value, EnvironmentError> {
        if self.bindings.contains_key(name) {
            return Err(EnvironmentError::AlreadyDeclared(name.to_string()));
        }

        debug!("declare {} {} = {}", if constant { "const" } else { "let" }, name, value);
        self.bindings
            .insert(name.to_string(), Binding { value, constant });
        Ok(value)
    }

    pub fn assign_var(&mut self, name: &str, value: Value) -> Result<Value, EnvironmentError> {
        match self.bindings.get_mut(name) {
            Some(binding) if binding.constant => {
                Err(EnvironmentError::ConstantAssignment(name.to_string()))
            }
            Some(binding) => {
                debug!("assign {} = {}", name, value);
                binding.value = value;
                Ok(value)
            }
            None => match self.parent {
                Some(ref parent) => parent.borrow_mut().assign_var(name, value),
                None => Err(EnvironmentError::Undefined(name.to_string())),
            },
        }
    }

    pub fn lookup_var(&self, name: &str) -> Result<Value, EnvironmentError> {
        match self.bindings.get(name) {
            Some(binding) => Ok(binding.value),
            None => match self.parent {
                Some(ref parent) => parent.borrow().lookup_var(name),
                None => Err(EnvironmentError::Undefined(name.to_string())),
            },
        }
    }
}
