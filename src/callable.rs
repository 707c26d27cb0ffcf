//! The callable capability shared by user-defined functions and natives.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use log::debug;

use crate::environment::Environment;
use crate::error::{QuillError, Result};
use crate::interpreter::{Interpreter, Interrupt};
use crate::stmt::FunctionDecl;
use crate::token::Token;
use crate::value::Value;

/// Anything invocable from script code. `paren` is the call site's closing
/// `)` token, carried along purely for error line reporting.
///
/// The interpreter checks arity *before* dispatching, so implementations may
/// assume `arguments.len() == self.arity()`.
pub trait Callable: fmt::Debug {
    fn name(&self) -> &str;

    fn arity(&self) -> usize;

    fn call(
        &self,
        interpreter: &mut Interpreter,
        arguments: Vec<Value>,
        paren: &Token,
    ) -> Result<Value>;

    /// How the value renders in `print` output.
    fn describe(&self) -> String {
        format!("<fn {}>", self.name())
    }
}

/// Adapter that turns a parsed function declaration into a [`Callable`].
///
/// `closure` is the environment that was current when the declaration
/// executed; it is captured here once and never re-resolved at call time,
/// which is what makes the language lexically scoped.
pub struct ScriptFunction {
    declaration: Rc<FunctionDecl>,
    closure: Rc<RefCell<Environment>>,
}

impl ScriptFunction {
    pub fn new(declaration: Rc<FunctionDecl>, closure: Rc<RefCell<Environment>>) -> Self {
        Self {
            declaration,
            closure,
        }
    }
}

impl fmt::Debug for ScriptFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The closure chain may reach back to this very function; keep it
        // out of Debug output.
        f.debug_struct("ScriptFunction")
            .field("name", &self.declaration.name.lexeme)
            .field("arity", &self.declaration.params.len())
            .finish_non_exhaustive()
    }
}

impl Callable for ScriptFunction {
    fn name(&self) -> &str {
        &self.declaration.name.lexeme
    }

    fn arity(&self) -> usize {
        self.declaration.params.len()
    }

    fn call(
        &self,
        interpreter: &mut Interpreter,
        arguments: Vec<Value>,
        _paren: &Token,
    ) -> Result<Value> {
        debug!(
            "Calling '{}' with {} argument(s)",
            self.name(),
            arguments.len()
        );

        // Fresh frame whose enclosing scope is the *closure* environment,
        // not the caller's.
        let frame = Rc::new(RefCell::new(Environment::with_enclosing(Rc::clone(
            &self.closure,
        ))));

        for (param, argument) in self.declaration.params.iter().zip(arguments) {
            frame.borrow_mut().define(&param.lexeme, argument);
        }

        match interpreter.execute_block(&self.declaration.body, frame) {
            Ok(()) => Ok(Value::Nil),
            Err(Interrupt::Return(_, value)) => Ok(value),
            Err(Interrupt::Error(e)) => Err(e),
        }
    }
}

/// A host-provided function exposed to scripts by name.
///
/// The function pointer keeps natives plain data: no state, no captures.
/// Hosts needing state can close over it on their side of the sink instead.
pub struct NativeFunction {
    pub name: String,
    pub arity: usize,
    pub func: fn(&[Value]) -> std::result::Result<Value, String>,
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFunction")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

impl Callable for NativeFunction {
    fn name(&self) -> &str {
        &self.name
    }

    fn arity(&self) -> usize {
        self.arity
    }

    fn call(
        &self,
        _interpreter: &mut Interpreter,
        arguments: Vec<Value>,
        paren: &Token,
    ) -> Result<Value> {
        debug!("Calling native '{}'", self.name);

        (self.func)(&arguments).map_err(|message| QuillError::runtime(paren, message))
    }

    fn describe(&self) -> String {
        format!("<native fn {}>", self.name)
    }
}
