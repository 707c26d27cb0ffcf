use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use log::debug;

use crate::error::{QuillError, Result};
use crate::token::Token;
use crate::value::Value;

/// A scope frame: name→value bindings plus a link to the enclosing frame.
///
/// Frames are shared (`Rc<RefCell<…>>`) rather than owned because every
/// closure created inside a scope keeps that scope alive; a frame's lifetime
/// is its longest-lived holder, not its lexical extent.
#[derive(Default)]
pub struct Environment {
    values: HashMap<String, Value>,
    enclosing: Option<Rc<RefCell<Environment>>>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_enclosing(enclosing: Rc<RefCell<Environment>>) -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: Some(enclosing),
        }
    }

    /// Bind `name` in *this* scope, overwriting any same-name binding here
    /// (shadowing). Never touches enclosing scopes.
    pub fn define(&mut self, name: &str, value: Value) {
        debug!("define '{}' = {}", name, value);

        self.values.insert(name.to_string(), value);
    }

    /// Read `name`, searching this scope then the enclosing chain outward.
    pub fn get(&self, name: &Token) -> Result<Value> {
        if let Some(value) = self.values.get(&name.lexeme) {
            Ok(value.clone())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow().get(name)
        } else {
            Err(QuillError::runtime(
                name,
                format!("Undefined variable '{}'.", name.lexeme),
            ))
        }
    }

    /// Assign to an *existing* binding of `name`, searching this scope then
    /// the enclosing chain. Never creates a new binding.
    pub fn assign(&mut self, name: &Token, value: Value) -> Result<()> {
        if self.values.contains_key(&name.lexeme) {
            debug!("assign '{}' = {}", name.lexeme, value);

            self.values.insert(name.lexeme.clone(), value);
            Ok(())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow_mut().assign(name, value)
        } else {
            Err(QuillError::runtime(
                name,
                format!("Undefined variable '{}'.", name.lexeme),
            ))
        }
    }
}
