use super::value::{NativeFunction, Value};
use std::io::Write;
use std::rc::Rc;

/// The fixed builtin library. The interpreter builds this table once, so a
/// builtin looked up twice is the same value both times.
pub fn all_native_functions() -> Vec<(&'static str, Value)> {
    vec![
        ("len", native_len()),
        ("first", native_first()),
        ("last", native_last()),
        ("rest", native_rest()),
        ("push", native_push()),
        ("print", native_print()),
    ]
}

fn native(
    name: &'static str,
    arity: Option<usize>,
    func: fn(&[Value], &mut dyn Write) -> Result<Value, String>,
) -> Value {
    Value::NativeFn(Rc::new(NativeFunction { name, arity, func }))
}

fn native_len() -> Value {
    native("len", Some(1), |args, _out| match &args[0] {
        Value::Str(s) => Ok(Value::Int(s.len() as i64)),
        Value::Array(elements) => Ok(Value::Int(elements.len() as i64)),
        other => Err(format!(
            "argument to `len` not supported, got {}",
            other.type_name()
        )),
    })
}

fn native_first() -> Value {
    native("first", Some(1), |args, _out| match &args[0] {
        Value::Array(elements) => Ok(elements.first().cloned().unwrap_or(Value::Null)),
        other => Err(format!(
            "argument to `first` must be an array, got {}",
            other.type_name()
        )),
    })
}

fn native_last() -> Value {
    native("last", Some(1), |args, _out| match &args[0] {
        Value::Array(elements) => Ok(elements.last().cloned().unwrap_or(Value::Null)),
        other => Err(format!(
            "argument to `last` must be an array, got {}",
            other.type_name()
        )),
    })
}

fn native_rest() -> Value {
    native("rest", Some(1), |args, _out| match &args[0] {
        Value::Array(elements) => {
            if elements.is_empty() {
                Ok(Value::Null)
            } else {
                // Fresh storage; the result must not alias the input.
                Ok(Value::Array(Rc::new(elements[1..].to_vec())))
            }
        }
        other => Err(format!(
            "argument to `rest` must be an array, got {}",
            other.type_name()
        )),
    })
}

fn native_push() -> Value {
    native("push", Some(2), |args, _out| match &args[0] {
        Value::Array(elements) => {
            let mut extended = elements.as_ref().clone();
            extended.push(args[1].clone());
            Ok(Value::Array(Rc::new(extended)))
        }
        other => Err(format!(
            "argument to `push` must be an array, got {}",
            other.type_name()
        )),
    })
}

fn native_print() -> Value {
    native("print", None, |args, out| {
        for arg in args {
            let _ = write!(out, "{}", arg);
        }
        let _ = writeln!(out);
        Ok(Value::Null)
    })
}
