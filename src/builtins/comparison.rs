//! Comparison operations: =, <, >, <=, >=
//!
//! `=` is structural equality with int-to-float promotion. The
//! orderings accept two numbers or two strings.

use super::check_arity;
use crate::env::Environment;
use crate::error::JkError;
use crate::value::{Atom, Sexp};
use std::cmp::Ordering;
use std::rc::Rc;

/// Tests two values for structural equality.
pub fn builtin_eq(args: &[Sexp]) -> Result<Sexp, JkError> {
    check_arity("=", 2, args)?;
    Ok(Sexp::bool(args[0] == args[1]))
}

fn compare(function: &'static str, args: &[Sexp]) -> Result<Ordering, JkError> {
    check_arity(function, 2, args)?;
    let (a, b) = match (&args[0], &args[1]) {
        (Sexp::Atom { val: a, .. }, Sexp::Atom { val: b, .. }) => (a, b),
        (a, b) => {
            return Err(JkError::argument(
                function,
                format!("cannot compare {} and {}", a.type_name(), b.type_name()),
            ));
        }
    };

    match (a, b) {
        (Atom::Int(x), Atom::Int(y)) => Ok(x.cmp(y)),
        (Atom::Str(x), Atom::Str(y)) => Ok(x.cmp(y)),
        _ => match (a.as_number(), b.as_number()) {
            (Some(x), Some(y)) => x.partial_cmp(&y).ok_or_else(|| {
                JkError::argument(function, "cannot order nan")
            }),
            _ => Err(JkError::argument(
                function,
                format!("cannot compare {} and {}", a.type_name(), b.type_name()),
            )),
        },
    }
}

pub fn builtin_lt(args: &[Sexp]) -> Result<Sexp, JkError> {
    Ok(Sexp::bool(compare("<", args)? == Ordering::Less))
}

pub fn builtin_gt(args: &[Sexp]) -> Result<Sexp, JkError> {
    Ok(Sexp::bool(compare(">", args)? == Ordering::Greater))
}

pub fn builtin_le(args: &[Sexp]) -> Result<Sexp, JkError> {
    Ok(Sexp::bool(compare("<=", args)? != Ordering::Greater))
}

pub fn builtin_ge(args: &[Sexp]) -> Result<Sexp, JkError> {
    Ok(Sexp::bool(compare(">=", args)? != Ordering::Less))
}

/// Register all comparison builtins in the environment
pub fn register(env: &Rc<Environment>) {
    env.mset([
        ("=", Sexp::builtin("=", builtin_eq)),
        ("<", Sexp::builtin("<", builtin_lt)),
        (">", Sexp::builtin(">", builtin_gt)),
        ("<=", Sexp::builtin("<=", builtin_le)),
        (">=", Sexp::builtin(">=", builtin_ge)),
    ]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality() {
        assert_eq!(builtin_eq(&[Sexp::int(1), Sexp::int(1)]).unwrap(), Sexp::bool(true));
        assert_eq!(builtin_eq(&[Sexp::int(1), Sexp::float(1.0)]).unwrap(), Sexp::bool(true));
        assert_eq!(builtin_eq(&[Sexp::int(1), Sexp::int(2)]).unwrap(), Sexp::bool(false));
        assert_eq!(
            builtin_eq(&[Sexp::string("a"), Sexp::string("a")]).unwrap(),
            Sexp::bool(true)
        );
        assert_eq!(
            builtin_eq(&[Sexp::symbol("a"), Sexp::string("a")]).unwrap(),
            Sexp::bool(false)
        );
    }

    #[test]
    fn test_equality_is_structural_on_lists() {
        let a = Sexp::list(vec![Sexp::int(1), Sexp::list(vec![Sexp::int(2)])]);
        let b = Sexp::list(vec![Sexp::int(1), Sexp::list(vec![Sexp::int(2)])]);
        assert_eq!(builtin_eq(&[a, b]).unwrap(), Sexp::bool(true));
    }

    #[test]
    fn test_numeric_orderings_promote() {
        assert_eq!(builtin_lt(&[Sexp::int(1), Sexp::float(1.5)]).unwrap(), Sexp::bool(true));
        assert_eq!(builtin_gt(&[Sexp::int(2), Sexp::int(1)]).unwrap(), Sexp::bool(true));
        assert_eq!(builtin_le(&[Sexp::int(2), Sexp::int(2)]).unwrap(), Sexp::bool(true));
        assert_eq!(builtin_ge(&[Sexp::int(1), Sexp::int(2)]).unwrap(), Sexp::bool(false));
    }

    #[test]
    fn test_string_ordering() {
        assert_eq!(
            builtin_lt(&[Sexp::string("abc"), Sexp::string("abd")]).unwrap(),
            Sexp::bool(true)
        );
    }

    #[test]
    fn test_mixed_ordering_is_rejected() {
        assert!(matches!(
            builtin_lt(&[Sexp::int(1), Sexp::string("a")]),
            Err(JkError::IncorrectArgument { .. })
        ));
        assert!(matches!(
            builtin_gt(&[Sexp::list(vec![]), Sexp::int(1)]),
            Err(JkError::IncorrectArgument { .. })
        ));
    }
}
