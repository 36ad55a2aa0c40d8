use crate::interpreter::value::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// A lexical scope: a name→value map plus an optional link to the scope it
/// nests in. Scopes are shared through `Rc` (every closure created while a
/// scope is current keeps it alive) and the chain is a tree, so plain
/// reference counting suffices.
#[derive(Debug, Default)]
pub struct Environment {
    values: RefCell<HashMap<Rc<str>, Value>>,
    enclosing: Option<Rc<Environment>>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_with_enclosing(enclosing: Rc<Environment>) -> Self {
        Self {
            values: RefCell::new(HashMap::new()),
            enclosing: Some(enclosing),
        }
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.values.borrow().get(name) {
            return Some(value.clone());
        }
        self.enclosing.as_ref().and_then(|outer| outer.get(name))
    }

    /// Binds in this scope only. A name that shadows an outer binding hides
    /// it; there is no assignment through the chain.
    pub fn define(&self, name: impl Into<Rc<str>>, value: Value) {
        self.values.borrow_mut().insert(name.into(), value);
    }
}
