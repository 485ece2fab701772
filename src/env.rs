// ABOUTME: Lexically nested environment mapping symbol names to values

use crate::error::JkError;
use crate::lexer::Token;
use crate::value::Sexp;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// A frame of bindings plus an optional outer frame. Frames are
/// reference-counted because closures keep them alive past their
/// defining scope.
#[derive(Debug)]
pub struct Environment {
    bindings: RefCell<HashMap<String, Sexp>>,
    outer: Option<Rc<Environment>>,
}

impl Environment {
    /// Creates a root environment with no outer frame.
    pub fn new() -> Rc<Self> {
        Rc::new(Environment {
            bindings: RefCell::new(HashMap::new()),
            outer: None,
        })
    }

    /// Creates a child frame of `outer`.
    pub fn with_outer(outer: Rc<Environment>) -> Rc<Self> {
        Rc::new(Environment {
            bindings: RefCell::new(HashMap::new()),
            outer: Some(outer),
        })
    }

    /// Looks `name` up in this frame, then outward along the chain. A
    /// miss at the root raises unbound-symbol at the symbol's location.
    pub fn get(&self, name: &str, tok: Option<&Token>) -> Result<Sexp, JkError> {
        if let Some(value) = self.bindings.borrow().get(name) {
            return Ok(value.clone());
        }
        match &self.outer {
            Some(outer) => outer.get(name, tok),
            None => Err(JkError::unbound(name, tok)),
        }
    }

    /// Binds or rebinds `name` in this frame only. The chain is never
    /// mutated through: `setq` inside a `let*` shadows, it does not
    /// update the outer binding.
    pub fn set(&self, name: impl Into<String>, value: Sexp) {
        self.bindings.borrow_mut().insert(name.into(), value);
    }

    /// Bulk install, used to seed built-ins into the root frame.
    pub fn mset<I>(&self, pairs: I)
    where
        I: IntoIterator<Item = (&'static str, Sexp)>,
    {
        for (name, value) in pairs {
            self.set(name, value);
        }
    }
}
