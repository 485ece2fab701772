//! Arithmetic operations: +, -, *, /
//!
//! Binary operations over numeric atoms. Two integers stay integral
//! except under `/`, which always yields a float; any float operand
//! promotes the whole operation to floats.

use super::check_arity;
use crate::env::Environment;
use crate::error::JkError;
use crate::value::{Atom, Sexp};
use std::rc::Rc;

fn number_atom<'a>(
    function: &'static str,
    args: &'a [Sexp],
    index: usize,
) -> Result<&'a Atom, JkError> {
    match &args[index] {
        Sexp::Atom { val, .. } if val.as_number().is_some() => Ok(val),
        other => Err(JkError::argument(
            function,
            format!("expected a number, got {}", other.type_name()),
        )),
    }
}

fn number_pair<'a>(
    function: &'static str,
    args: &'a [Sexp],
) -> Result<(&'a Atom, &'a Atom), JkError> {
    check_arity(function, 2, args)?;
    Ok((number_atom(function, args, 0)?, number_atom(function, args, 1)?))
}

/// Adds two numbers.
pub fn builtin_add(args: &[Sexp]) -> Result<Sexp, JkError> {
    match number_pair("+", args)? {
        (Atom::Int(a), Atom::Int(b)) => a
            .checked_add(*b)
            .map(Sexp::int)
            .ok_or_else(|| JkError::argument("+", "integer overflow")),
        (a, b) => Ok(Sexp::float(as_f64(a) + as_f64(b))),
    }
}

/// Subtracts the second number from the first.
pub fn builtin_sub(args: &[Sexp]) -> Result<Sexp, JkError> {
    match number_pair("-", args)? {
        (Atom::Int(a), Atom::Int(b)) => a
            .checked_sub(*b)
            .map(Sexp::int)
            .ok_or_else(|| JkError::argument("-", "integer overflow")),
        (a, b) => Ok(Sexp::float(as_f64(a) - as_f64(b))),
    }
}

/// Multiplies two numbers.
pub fn builtin_mul(args: &[Sexp]) -> Result<Sexp, JkError> {
    match number_pair("*", args)? {
        (Atom::Int(a), Atom::Int(b)) => a
            .checked_mul(*b)
            .map(Sexp::int)
            .ok_or_else(|| JkError::argument("*", "integer overflow")),
        (a, b) => Ok(Sexp::float(as_f64(a) * as_f64(b))),
    }
}

/// True division: the result is always a float.
pub fn builtin_div(args: &[Sexp]) -> Result<Sexp, JkError> {
    let (a, b) = number_pair("/", args)?;
    let divisor = as_f64(b);
    if divisor == 0.0 {
        return Err(JkError::argument("/", "division by zero"));
    }
    Ok(Sexp::float(as_f64(a) / divisor))
}

fn as_f64(atom: &Atom) -> f64 {
    // number_pair already established both operands are numeric
    atom.as_number().unwrap_or(0.0)
}

/// Register all arithmetic builtins in the environment
pub fn register(env: &Rc<Environment>) {
    env.mset([
        ("+", Sexp::builtin("+", builtin_add)),
        ("-", Sexp::builtin("-", builtin_sub)),
        ("*", Sexp::builtin("*", builtin_mul)),
        ("/", Sexp::builtin("/", builtin_div)),
    ]);
}
