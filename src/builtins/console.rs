//! Console output: print
//!
//! Writes the arguments space-separated with a trailing newline.
//! Strings print their raw content, without the reinstated quotes the
//! REPL printer uses. Returns nil.

use crate::env::Environment;
use crate::error::JkError;
use crate::value::{Atom, Sexp};
use std::rc::Rc;

pub fn builtin_print(args: &[Sexp]) -> Result<Sexp, JkError> {
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            print!(" ");
        }
        match arg {
            Sexp::Atom {
                val: Atom::Str(s), ..
            } => print!("{}", s),
            other => print!("{}", other),
        }
    }
    println!();
    Ok(Sexp::nil())
}

/// Register console builtins in the environment
pub fn register(env: &Rc<Environment>) {
    env.mset([("print", Sexp::builtin("print", builtin_print))]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_returns_nil() {
        assert_eq!(builtin_print(&[Sexp::int(1), Sexp::string("x")]).unwrap(), Sexp::nil());
        assert_eq!(builtin_print(&[]).unwrap(), Sexp::nil());
    }
}
