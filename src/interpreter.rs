//! Tree-walking evaluator for Quill programs.
//!
//! Two mutually recursive dispatches drive execution: `evaluate` maps an
//! expression to a [`Value`], `execute` runs a statement for its effects.
//! The interpreter holds the current scope frame and threads a dedicated,
//! non-user-visible signal ([`Interrupt::Return`]) from a `return` statement
//! up to the nearest enclosing function call.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

use log::{debug, info};

use crate::callable::{Callable, NativeFunction, ScriptFunction};
use crate::environment::Environment;
use crate::error::{QuillError, Result};
use crate::expr::{Expr, LiteralValue};
use crate::stmt::Stmt;
use crate::token::{Token, TokenType};
use crate::value::Value;

/// Unwinds statement execution. `Return` is control flow, not an error: it
/// is caught at the function-call boundary and must never surface to users.
pub(crate) enum Interrupt {
    Error(QuillError),

    /// Carries the `return` keyword token (for top-level escape reporting)
    /// and the returned value.
    Return(Token, Value),
}

impl From<QuillError> for Interrupt {
    fn from(e: QuillError) -> Self {
        Interrupt::Error(e)
    }
}

/// Statement execution outcome: completion, or an in-flight unwind.
type Flow<T> = std::result::Result<T, Interrupt>;

/// Destination for `print` output, one call per executed statement.
pub type PrintSink = Box<dyn FnMut(&str)>;

pub struct Interpreter {
    globals: Rc<RefCell<Environment>>,
    environment: Rc<RefCell<Environment>>,
    sink: PrintSink,
}

impl Interpreter {
    /// Creates an interpreter that prints to stdout, with the native
    /// functions pre-registered.
    pub fn new() -> Self {
        Self::with_output(Box::new(|text| println!("{}", text)))
    }

    /// Creates an interpreter whose `print` statements write to `sink`.
    pub fn with_output(sink: PrintSink) -> Self {
        info!("Initializing interpreter");

        let globals = Rc::new(RefCell::new(Environment::new()));

        let mut interpreter = Self {
            environment: Rc::clone(&globals),
            globals,
            sink,
        };

        interpreter.define_native("clock", 0, |_args| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|elapsed| Value::Number(elapsed.as_secs_f64()))
                .map_err(|e| format!("Clock error: {}", e))
        });

        interpreter
    }

    /// Registers a host function in the global environment under `name`.
    ///
    /// This is the sole extension point for exposing host functionality to
    /// scripts; call it before [`Interpreter::interpret`].
    pub fn define_native(
        &mut self,
        name: &str,
        arity: usize,
        func: fn(&[Value]) -> std::result::Result<Value, String>,
    ) {
        debug!("Registering native function '{}'", name);

        let native = NativeFunction {
            name: name.to_string(),
            arity,
            func,
        };

        self.globals
            .borrow_mut()
            .define(name, Value::Callable(Rc::new(native)));
    }

    /// Executes a program: each statement in order against the global
    /// environment. Halts at the first runtime error; the interpreter stays
    /// usable for a subsequent, independent run.
    pub fn interpret(&mut self, statements: &[Stmt]) -> Result<()> {
        info!("Interpreting {} statement(s)", statements.len());

        for statement in statements {
            match self.execute(statement) {
                Ok(()) => {}

                Err(Interrupt::Error(e)) => return Err(e),

                // A return signal that unwound past every function call.
                Err(Interrupt::Return(keyword, _)) => {
                    return Err(QuillError::runtime(
                        &keyword,
                        "Cannot return from top-level code.",
                    ));
                }
            }
        }

        info!("Interpretation completed");

        Ok(())
    }

    // ───────────────────────── statement execution ──────────────────────────

    fn execute(&mut self, statement: &Stmt) -> Flow<()> {
        match statement {
            Stmt::Expression(expr) => {
                self.evaluate(expr)?;
                Ok(())
            }

            Stmt::Print(expr) => {
                let value = self.evaluate(expr)?;
                let text = value.to_string();

                debug!("print: {}", text);

                (self.sink)(&text);
                Ok(())
            }

            Stmt::Var(name, initializer) => {
                let value = match initializer {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };

                debug!("Declaring variable '{}' = {}", name.lexeme, value);

                self.environment.borrow_mut().define(&name.lexeme, value);
                Ok(())
            }

            Stmt::Block(statements) => {
                let frame = Rc::new(RefCell::new(Environment::with_enclosing(Rc::clone(
                    &self.environment,
                ))));

                self.execute_block(statements, frame)
            }

            Stmt::If(condition, then_branch, else_branch) => {
                if is_truthy(&self.evaluate(condition)?) {
                    self.execute(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.execute(else_branch)
                } else {
                    Ok(())
                }
            }

            Stmt::While(condition, body) => {
                while is_truthy(&self.evaluate(condition)?) {
                    self.execute(body)?;
                }

                Ok(())
            }

            Stmt::Function(declaration) => {
                debug!("Defining function '{}'", declaration.name.lexeme);

                // The closure environment is fixed here, at definition time.
                let function =
                    ScriptFunction::new(Rc::clone(declaration), Rc::clone(&self.environment));

                self.environment
                    .borrow_mut()
                    .define(&declaration.name.lexeme, Value::Callable(Rc::new(function)));

                Ok(())
            }

            Stmt::Return(keyword, value) => {
                let value = match value {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };

                debug!("Return signal carrying {}", value);

                Err(Interrupt::Return(keyword.clone(), value))
            }
        }
    }

    /// Runs `statements` inside `frame`, restoring the previous environment
    /// on every exit path: normal completion, a runtime error, or an
    /// in-flight return signal.
    pub(crate) fn execute_block(
        &mut self,
        statements: &[Stmt],
        frame: Rc<RefCell<Environment>>,
    ) -> std::result::Result<(), Interrupt> {
        let previous = std::mem::replace(&mut self.environment, frame);

        let result = statements
            .iter()
            .try_for_each(|statement| self.execute(statement));

        self.environment = previous;

        result
    }

    // ───────────────────────── expression evaluation ────────────────────────

    /// Evaluates an expression to a [`Value`].
    pub fn evaluate(&mut self, expr: &Expr) -> Result<Value> {
        match expr {
            Expr::Literal(literal) => Ok(literal_value(literal)),

            Expr::Grouping(inner) => self.evaluate(inner),

            Expr::Unary(operator, right) => self.evaluate_unary(operator, right),

            Expr::Binary(left, operator, right) => self.evaluate_binary(left, operator, right),

            Expr::Logical(left, operator, right) => self.evaluate_logical(left, operator, right),

            Expr::Variable(name) => self.environment.borrow().get(name),

            Expr::Assign(name, value) => {
                let value = self.evaluate(value)?;

                self.environment.borrow_mut().assign(name, value.clone())?;

                Ok(value)
            }

            Expr::Call(callee, paren, arguments) => self.evaluate_call(callee, paren, arguments),
        }
    }

    fn evaluate_unary(&mut self, operator: &Token, right: &Expr) -> Result<Value> {
        let right = self.evaluate(right)?;

        match operator.token_type {
            TokenType::MINUS => match right {
                Value::Number(n) => Ok(Value::Number(-n)),
                _ => Err(QuillError::runtime(operator, "Operand must be a number.")),
            },

            TokenType::BANG => Ok(Value::Bool(!is_truthy(&right))),

            _ => Err(QuillError::runtime(operator, "Invalid unary operator.")),
        }
    }

    /// Short-circuiting `and` / `or`: the right operand is evaluated only
    /// when the left does not already decide the result.
    fn evaluate_logical(&mut self, left: &Expr, operator: &Token, right: &Expr) -> Result<Value> {
        let left = self.evaluate(left)?;

        match operator.token_type {
            TokenType::OR if is_truthy(&left) => Ok(left),
            TokenType::AND if !is_truthy(&left) => Ok(left),
            _ => self.evaluate(right),
        }
    }

    fn evaluate_binary(&mut self, left: &Expr, operator: &Token, right: &Expr) -> Result<Value> {
        let left = self.evaluate(left)?;
        let right = self.evaluate(right)?;

        match operator.token_type {
            TokenType::PLUS => match (left, right) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
                (Value::Str(a), Value::Str(b)) => Ok(Value::Str(a + &b)),
                _ => Err(QuillError::runtime(
                    operator,
                    "Operands must be two numbers or two strings.",
                )),
            },

            TokenType::MINUS => {
                let (a, b) = number_operands(operator, &left, &right)?;
                Ok(Value::Number(a - b))
            }

            TokenType::STAR => {
                let (a, b) = number_operands(operator, &left, &right)?;
                Ok(Value::Number(a * b))
            }

            // IEEE-754 semantics: dividing by zero yields an infinity (or
            // NaN for 0/0), not an error.
            TokenType::SLASH => {
                let (a, b) = number_operands(operator, &left, &right)?;
                Ok(Value::Number(a / b))
            }

            TokenType::GREATER => {
                let (a, b) = number_operands(operator, &left, &right)?;
                Ok(Value::Bool(a > b))
            }

            TokenType::GREATER_EQUAL => {
                let (a, b) = number_operands(operator, &left, &right)?;
                Ok(Value::Bool(a >= b))
            }

            TokenType::LESS => {
                let (a, b) = number_operands(operator, &left, &right)?;
                Ok(Value::Bool(a < b))
            }

            TokenType::LESS_EQUAL => {
                let (a, b) = number_operands(operator, &left, &right)?;
                Ok(Value::Bool(a <= b))
            }

            TokenType::EQUAL_EQUAL => Ok(Value::Bool(is_equal(&left, &right))),

            TokenType::BANG_EQUAL => Ok(Value::Bool(!is_equal(&left, &right))),

            _ => Err(QuillError::runtime(operator, "Invalid binary operator.")),
        }
    }

    fn evaluate_call(&mut self, callee: &Expr, paren: &Token, arguments: &[Expr]) -> Result<Value> {
        let callee = self.evaluate(callee)?;

        let mut values = Vec::with_capacity(arguments.len());
        for argument in arguments {
            values.push(self.evaluate(argument)?);
        }

        let Value::Callable(callable) = callee else {
            return Err(QuillError::runtime(paren, "Can only call functions."));
        };

        // Arity is checked strictly, before the body runs.
        if values.len() != callable.arity() {
            return Err(QuillError::runtime(
                paren,
                format!(
                    "Expected {} arguments but got {}.",
                    callable.arity(),
                    values.len()
                ),
            ));
        }

        debug!(
            "Invoking '{}' with {} argument(s)",
            callable.name(),
            values.len()
        );

        callable.call(self, values, paren)
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

// ───────────────────────────── value helpers ────────────────────────────────

fn literal_value(literal: &LiteralValue) -> Value {
    match literal {
        LiteralValue::Number(n) => Value::Number(*n),
        LiteralValue::Str(s) => Value::Str(s.clone()),
        LiteralValue::Bool(b) => Value::Bool(*b),
        LiteralValue::Nil => Value::Nil,
    }
}

/// `nil` is false, booleans are themselves, every other value (including
/// `0` and the empty string) is truthy.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Nil => false,
        Value::Bool(b) => *b,
        _ => true,
    }
}

/// Equality is defined for all value kinds; `nil` equals only `nil`.
fn is_equal(left: &Value, right: &Value) -> bool {
    left == right
}

fn number_operands(operator: &Token, left: &Value, right: &Value) -> Result<(f64, f64)> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok((*a, *b)),
        _ => Err(QuillError::runtime(operator, "Operands must be numbers.")),
    }
}
