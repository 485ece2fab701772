//! List operations: car, cdr, len, cons, list
//!
//! - `car`: first element (error on an empty list)
//! - `cdr`: everything after the first; the empty list stays empty
//! - `len`: element count as an integer
//! - `cons`: prepend an element to a list
//! - `list`: build a list from the arguments

use super::check_arity;
use crate::env::Environment;
use crate::error::JkError;
use crate::value::Sexp;
use std::rc::Rc;

fn list_items<'a>(function: &'static str, arg: &'a Sexp) -> Result<&'a [Sexp], JkError> {
    match arg {
        Sexp::List { items, .. } => Ok(items),
        other => Err(JkError::argument(
            function,
            format!("expected a list, got {}", other.type_name()),
        )),
    }
}

/// Returns the first element of a list.
pub fn builtin_car(args: &[Sexp]) -> Result<Sexp, JkError> {
    check_arity("car", 1, args)?;
    let items = list_items("car", &args[0])?;
    items
        .first()
        .cloned()
        .ok_or_else(|| JkError::argument("car", "empty list"))
}

/// Returns all elements except the first.
pub fn builtin_cdr(args: &[Sexp]) -> Result<Sexp, JkError> {
    check_arity("cdr", 1, args)?;
    let items = list_items("cdr", &args[0])?;
    if items.is_empty() {
        Ok(Sexp::list(Vec::new()))
    } else {
        Ok(Sexp::list(items[1..].to_vec()))
    }
}

/// Returns the number of elements in a list.
pub fn builtin_len(args: &[Sexp]) -> Result<Sexp, JkError> {
    check_arity("len", 1, args)?;
    let items = list_items("len", &args[0])?;
    Ok(Sexp::int(items.len() as i64))
}

/// Constructs a new list by prepending an element to a list.
pub fn builtin_cons(args: &[Sexp]) -> Result<Sexp, JkError> {
    check_arity("cons", 2, args)?;
    let rest = list_items("cons", &args[1])?;
    let mut items = Vec::with_capacity(rest.len() + 1);
    items.push(args[0].clone());
    items.extend_from_slice(rest);
    Ok(Sexp::list(items))
}

/// Creates a list containing the given arguments in order.
pub fn builtin_list(args: &[Sexp]) -> Result<Sexp, JkError> {
    Ok(Sexp::list(args.to_vec()))
}

/// Register all list builtins in the environment
pub fn register(env: &Rc<Environment>) {
    env.mset([
        ("car", Sexp::builtin("car", builtin_car)),
        ("cdr", Sexp::builtin("cdr", builtin_cdr)),
        ("len", Sexp::builtin("len", builtin_len)),
        ("cons", Sexp::builtin("cons", builtin_cons)),
        ("list", Sexp::builtin("list", builtin_list)),
    ]);
}
