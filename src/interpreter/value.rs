use super::environment::Environment;
use crate::parser::ast::Block;
use std::fmt;
use std::io::Write;
use std::rc::Rc;

/// A runtime value. Heap payloads sit behind `Rc`, so cloning a value is a
/// pointer copy and two clones of the same allocation stay identical in the
/// sense [`Value::is_identical`] measures.
///
/// `Return` and `Error` are control-flow carriers: `Return` bubbles an early
/// return through enclosing blocks until function application (or the
/// program top) unwraps it, `Error` short-circuits everything and is never
/// unwrapped.
#[derive(Debug, Clone)]
pub enum Value {
    Int(i64),
    Bool(bool),
    Str(Rc<str>),
    Null,
    Array(Rc<Vec<Value>>),
    Return(Box<Value>),
    Error(String),
    Fn(Rc<Function>),
    NativeFn(Rc<NativeFunction>),
}

pub struct Function {
    pub parameters: Vec<Rc<str>>,
    pub body: Rc<Block>,
    /// The environment the literal was evaluated in; calls chain their
    /// frame off this, which is all a closure is.
    pub env: Rc<Environment>,
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("parameters", &self.parameters)
            .field("body", &"<block>")
            .field("env", &"<env>")
            .finish()
    }
}

pub struct NativeFunction {
    pub name: &'static str,
    /// `None` means variadic; otherwise the interpreter enforces the count
    /// before the function runs.
    pub arity: Option<usize>,
    pub func: fn(&[Value], &mut dyn Write) -> Result<Value, String>,
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFunction")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish()
    }
}

impl Value {
    /// The user-visible type name; these strings appear verbatim in error
    /// messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "INTEGER",
            Value::Bool(_) => "BOOLEAN",
            Value::Null => "NULL",
            Value::Str(_) => "STRING",
            Value::Array(_) => "ARRAY",
            Value::Return(_) => "RETURN_VALUE",
            Value::Error(_) => "ERROR",
            Value::Fn(_) => "FUNCTION",
            Value::NativeFn(_) => "BUILTIN",
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    /// Only `null` and `false` are falsy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Null | Value::Bool(false))
    }

    /// Reference identity, the fallback rule behind `==`/`!=`. Booleans and
    /// null compare by their (singleton) tag; heap values compare by
    /// allocation, so two equal-looking strings built separately are *not*
    /// identical.
    pub fn is_identical(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Null, Value::Null) => true,
            (Value::Str(a), Value::Str(b)) => Rc::ptr_eq(a, b),
            (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b),
            (Value::Fn(a), Value::Fn(b)) => Rc::ptr_eq(a, b),
            (Value::NativeFn(a), Value::NativeFn(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

// Display renders the inspection form shown by the REPL and `print`.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Int(value) => write!(f, "{}", value),
            Value::Bool(value) => write!(f, "{}", value),
            Value::Null => f.write_str("null"),
            Value::Str(value) => f.write_str(value),
            Value::Array(elements) => {
                write!(f, "[")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", element)?;
                }
                write!(f, "]")
            }
            Value::Return(value) => write!(f, "{}", value),
            Value::Error(message) => write!(f, "Error: {}", message),
            Value::Fn(function) => {
                let parameters: Vec<&str> =
                    function.parameters.iter().map(|p| p.as_ref()).collect();
                let body: Vec<String> = function
                    .body
                    .statements
                    .iter()
                    .map(|s| s.to_string())
                    .collect();
                write!(
                    f,
                    "func({}) {{\n{}\n}}",
                    parameters.join(", "),
                    body.join(" ")
                )
            }
            Value::NativeFn(_) => f.write_str("builtin function"),
        }
    }
}
