// ABOUTME: Evaluator walking S-expression trees against lexical environments

use crate::env::Environment;
use crate::error::JkError;
use crate::lexer::Token;
use crate::value::{Proc, Sexp};
use std::rc::Rc;

/// Evaluates one S-expression. Atoms are self-evaluating, symbols
/// resolve through the environment, lists are special forms or
/// applications.
pub fn eval(sexp: &Sexp, env: &Rc<Environment>) -> Result<Sexp, JkError> {
    match sexp {
        Sexp::Atom { .. } | Sexp::Proc(_) | Sexp::Builtin(_) => Ok(sexp.clone()),
        Sexp::Symbol { name, tok } => env.get(name, tok.as_ref()),
        Sexp::List { items, tok } => {
            if items.is_empty() {
                return Ok(Sexp::nil());
            }
            if let Sexp::Symbol { name, .. } = &items[0] {
                match name.as_str() {
                    "let*" => return eval_let_star(items, tok.as_ref(), env),
                    "setq" => return eval_setq(items, tok.as_ref(), env),
                    "if" => return eval_if(items, tok.as_ref(), env),
                    "progn" => return eval_progn(items, env),
                    "lambda" => return eval_lambda(items, tok.as_ref(), env),
                    "defun" => return eval_defun_or_defmacro(items, tok.as_ref(), env, false),
                    "defmacro" => return eval_defun_or_defmacro(items, tok.as_ref(), env, true),
                    "quote" => return eval_quote(items, tok.as_ref()),
                    "quasiquote" => return eval_quasiquote(items, tok.as_ref(), env),
                    "unquote" => {
                        return Err(JkError::malformed(
                            "unquote cannot be used outside a quasiquote",
                            tok.as_ref(),
                        ));
                    }
                    "eval" => return eval_eval(items, tok.as_ref(), env),
                    _ => {}
                }
            }

            let callee = eval(&items[0], env)?;
            match callee {
                Sexp::Proc(proc) if proc.is_macro => {
                    // Macros see their operands unevaluated; the expansion
                    // is then evaluated in the calling environment.
                    let expansion = apply_proc(&proc, &items[1..])?;
                    eval(&expansion, env)
                }
                Sexp::Proc(proc) => {
                    let args = eval_args(&items[1..], env)?;
                    apply_proc(&proc, &args)
                }
                Sexp::Builtin(b) => {
                    let args = eval_args(&items[1..], env)?;
                    (b.func)(&args)
                }
                other => Err(JkError::malformed(
                    format!("{} is not callable", other.type_name()),
                    items[0].tok(),
                )),
            }
        }
    }
}

fn eval_args(args: &[Sexp], env: &Rc<Environment>) -> Result<Vec<Sexp>, JkError> {
    args.iter().map(|arg| eval(arg, env)).collect()
}

/// Applies a procedure: fresh frame over the captured environment,
/// positional binding (extra arguments dropped, missing ones left
/// unbound), body forms in order, last result returned.
pub fn apply_proc(proc: &Rc<Proc>, args: &[Sexp]) -> Result<Sexp, JkError> {
    let local = Environment::with_outer(proc.env.clone());
    for (param, arg) in proc.params.iter().zip(args.iter()) {
        local.set(param.clone(), arg.clone());
    }
    let mut result = Sexp::nil();
    for form in &proc.body {
        result = eval(form, &local)?;
    }
    Ok(result)
}

fn eval_let_star(
    items: &[Sexp],
    tok: Option<&Token>,
    env: &Rc<Environment>,
) -> Result<Sexp, JkError> {
    if items.len() < 3 {
        return Err(JkError::malformed_let("bindings or body missing", tok));
    }
    let Sexp::List { items: binds, .. } = &items[1] else {
        return Err(JkError::malformed_let(
            "bindings should be a list",
            items[1].tok(),
        ));
    };

    let local = Environment::with_outer(env.clone());
    for bind in binds {
        let Sexp::List { items: pair, .. } = bind else {
            return Err(JkError::malformed_let(
                "binding should be a list",
                bind.tok(),
            ));
        };
        if pair.len() != 2 {
            return Err(JkError::malformed_let(
                "binding should be a list of two items, key and value",
                bind.tok(),
            ));
        }
        let Sexp::Symbol { name, .. } = &pair[0] else {
            return Err(JkError::malformed_let(
                "binding key should be a symbol",
                pair[0].tok(),
            ));
        };
        // Sequential: each value sees the bindings before it.
        let value = eval(&pair[1], &local)?;
        local.set(name.clone(), value);
    }

    let mut result = Sexp::nil();
    for form in &items[2..] {
        result = eval(form, &local)?;
    }
    Ok(result)
}

fn eval_setq(items: &[Sexp], tok: Option<&Token>, env: &Rc<Environment>) -> Result<Sexp, JkError> {
    if items.len() != 3 {
        return Err(JkError::malformed("setq expects a symbol and a value", tok));
    }
    let Sexp::Symbol { name, .. } = &items[1] else {
        return Err(JkError::malformed(
            "setq expects a symbol as its first operand",
            items[1].tok(),
        ));
    };
    let value = eval(&items[2], env)?;
    env.set(name.clone(), value.clone());
    Ok(value)
}

fn eval_if(items: &[Sexp], tok: Option<&Token>, env: &Rc<Environment>) -> Result<Sexp, JkError> {
    if items.len() < 3 || items.len() > 4 {
        return Err(JkError::malformed(
            "if expects a condition, a then form, and an optional else form",
            tok,
        ));
    }
    if eval(&items[1], env)?.truthy() {
        eval(&items[2], env)
    } else if items.len() == 4 {
        eval(&items[3], env)
    } else {
        Ok(Sexp::nil())
    }
}

fn eval_progn(items: &[Sexp], env: &Rc<Environment>) -> Result<Sexp, JkError> {
    let mut result = Sexp::nil();
    for form in &items[1..] {
        result = eval(form, env)?;
    }
    Ok(result)
}

/// Validates a parameter list: a list of symbols, collected by name.
fn param_names(list: &Sexp, tok: Option<&Token>) -> Result<Vec<String>, JkError> {
    let Sexp::List { items, .. } = list else {
        return Err(JkError::malformed(
            "parameter definition should be a list",
            list.tok().or(tok),
        ));
    };
    items
        .iter()
        .map(|param| match param {
            Sexp::Symbol { name, .. } => Ok(name.clone()),
            other => Err(JkError::malformed(
                "parameters should be symbols",
                other.tok().or(tok),
            )),
        })
        .collect()
}

fn eval_lambda(
    items: &[Sexp],
    tok: Option<&Token>,
    env: &Rc<Environment>,
) -> Result<Sexp, JkError> {
    if items.len() < 3 {
        return Err(JkError::malformed(
            "lambda expects a parameter list and a body",
            tok,
        ));
    }
    let params = param_names(&items[1], tok)?;
    Ok(Sexp::Proc(Rc::new(Proc {
        params,
        body: items[2..].to_vec(),
        env: env.clone(),
        is_macro: false,
    })))
}

fn eval_defun_or_defmacro(
    items: &[Sexp],
    tok: Option<&Token>,
    env: &Rc<Environment>,
    is_macro: bool,
) -> Result<Sexp, JkError> {
    if items.len() < 4 {
        return Err(JkError::malformed(
            "definition expects a name, a parameter list, and a body",
            tok,
        ));
    }
    let Sexp::Symbol { name, .. } = &items[1] else {
        return Err(JkError::malformed(
            "definition name should be a symbol",
            items[1].tok().or(tok),
        ));
    };
    let params = param_names(&items[2], tok)?;
    let proc = Sexp::Proc(Rc::new(Proc {
        params,
        body: items[3..].to_vec(),
        env: env.clone(),
        is_macro,
    }));
    env.set(name.clone(), proc.clone());
    Ok(proc)
}

fn eval_quote(items: &[Sexp], tok: Option<&Token>) -> Result<Sexp, JkError> {
    if items.len() != 2 {
        return Err(JkError::malformed("single argument expected for quote", tok));
    }
    Ok(items[1].clone())
}

fn eval_eval(items: &[Sexp], tok: Option<&Token>, env: &Rc<Environment>) -> Result<Sexp, JkError> {
    if items.len() != 2 {
        return Err(JkError::malformed("single argument expected for eval", tok));
    }
    let form = eval(&items[1], env)?;
    eval(&form, env)
}

fn eval_quasiquote(
    items: &[Sexp],
    tok: Option<&Token>,
    env: &Rc<Environment>,
) -> Result<Sexp, JkError> {
    if items.len() != 2 {
        return Err(JkError::malformed(
            "single argument expected for quasiquote",
            tok,
        ));
    }
    quasiquote(&items[1], env)
}

/// Walks a quasiquote template, producing a new tree. Lists headed by
/// the symbol `unquote` are replaced by their evaluated argument,
/// re-tagged with the template node's token; everything else copies
/// through untouched. Nested quasiquotes are not special-cased.
fn quasiquote(template: &Sexp, env: &Rc<Environment>) -> Result<Sexp, JkError> {
    let Sexp::List { items, tok } = template else {
        return Ok(template.clone());
    };

    if let Some(Sexp::Symbol { name, .. }) = items.first() {
        if name == "unquote" {
            if items.len() != 2 {
                return Err(JkError::malformed(
                    "single argument expected for unquote",
                    tok.as_ref(),
                ));
            }
            let value = eval(&items[1], env)?;
            return Ok(value.with_tok(tok.clone()));
        }
    }

    let rewritten = items
        .iter()
        .map(|child| quasiquote(child, env))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Sexp::List {
        items: rewritten,
        tok: tok.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::read_str;

    fn run(env: &Rc<Environment>, src: &str) -> Result<Sexp, JkError> {
        let forms = read_str(src)?;
        let mut result = Sexp::nil();
        for form in &forms {
            result = eval(form, env)?;
        }
        Ok(result)
    }

    fn run_ok(env: &Rc<Environment>, src: &str) -> Sexp {
        run(env, src).expect("evaluation failed")
    }

    #[test]
    fn test_atoms_self_evaluate() {
        let env = Environment::new();
        assert_eq!(run_ok(&env, "42"), Sexp::int(42));
        assert_eq!(run_ok(&env, "\"hi\""), Sexp::string("hi"));
        assert_eq!(run_ok(&env, "nil"), Sexp::nil());
    }

    #[test]
    fn test_empty_list_evaluates_to_nil() {
        let env = Environment::new();
        assert_eq!(run_ok(&env, "()"), Sexp::nil());
    }

    #[test]
    fn test_setq_binds_and_returns() {
        let env = Environment::new();
        assert_eq!(run_ok(&env, "(setq x 3)"), Sexp::int(3));
        assert_eq!(run_ok(&env, "x"), Sexp::int(3));
    }

    #[test]
    fn test_let_star_is_sequential_and_scoped() {
        let env = Environment::new();
        assert_eq!(run_ok(&env, "(let* ((a 1) (b a)) b)"), Sexp::int(1));
        // The binding does not leak out of the form.
        assert!(matches!(
            run(&env, "a"),
            Err(JkError::UnboundSymbol { .. })
        ));
    }

    #[test]
    fn test_setq_inside_let_shadows_outer_binding() {
        let env = Environment::new();
        run_ok(&env, "(setq x 1)");
        assert_eq!(run_ok(&env, "(let* ((y 2)) (setq x 99) x)"), Sexp::int(99));
        assert_eq!(run_ok(&env, "x"), Sexp::int(1));
    }

    #[test]
    fn test_malformed_let_shapes() {
        let env = Environment::new();
        assert!(matches!(
            run(&env, "(let* ((x 1)))"),
            Err(JkError::MalformedLet { .. })
        ));
        assert!(matches!(
            run(&env, "(let* x 1)"),
            Err(JkError::MalformedLet { .. })
        ));
        assert!(matches!(
            run(&env, "(let* ((x 1 2)) x)"),
            Err(JkError::MalformedLet { .. })
        ));
    }

    #[test]
    fn test_if_truthiness() {
        let env = Environment::new();
        assert_eq!(run_ok(&env, "(if 1 10 20)"), Sexp::int(10));
        assert_eq!(run_ok(&env, "(if 0 10 20)"), Sexp::int(20));
        assert_eq!(run_ok(&env, "(if nil 10 20)"), Sexp::int(20));
        assert_eq!(run_ok(&env, "(if \"\" 10 20)"), Sexp::int(20));
        assert_eq!(run_ok(&env, "(if (quote ()) 10 20)"), Sexp::int(20));
        assert_eq!(run_ok(&env, "(if false 10)"), Sexp::nil());
    }

    #[test]
    fn test_progn_returns_last() {
        let env = Environment::new();
        assert_eq!(run_ok(&env, "(progn (setq a 1) (setq a 2) a)"), Sexp::int(2));
        assert_eq!(run_ok(&env, "(progn)"), Sexp::nil());
    }

    #[test]
    fn test_lambda_application_binds_positionally() {
        let env = Environment::new();
        run_ok(&env, "(setq second (lambda (a b) b))");
        assert_eq!(run_ok(&env, "(second 1 2)"), Sexp::int(2));
        // Extra arguments are dropped.
        assert_eq!(run_ok(&env, "(second 1 2 3)"), Sexp::int(2));
        // Missing arguments leave the parameter unbound.
        assert!(matches!(
            run(&env, "(second 1)"),
            Err(JkError::UnboundSymbol { .. })
        ));
    }

    #[test]
    fn test_closure_captures_definition_env() {
        let env = Environment::new();
        run_ok(&env, "(setq f ((lambda () (let* ((x 5)) (lambda () x)))))");
        run_ok(&env, "(setq x 100)");
        assert_eq!(run_ok(&env, "(f)"), Sexp::int(5));
    }

    #[test]
    fn test_quote_returns_tree_unevaluated() {
        let env = Environment::new();
        let expected = Sexp::list(vec![
            Sexp::symbol("undefined"),
            Sexp::list(vec![Sexp::symbol("nested"), Sexp::int(1)]),
        ]);
        assert_eq!(run_ok(&env, "(quote (undefined (nested 1)))"), expected);
    }

    #[test]
    fn test_quasiquote_substitutes_only_unquote_positions() {
        let env = Environment::new();
        run_ok(&env, "(setq b 3)");
        let expected = Sexp::list(vec![Sexp::symbol("a"), Sexp::int(3), Sexp::symbol("c")]);
        assert_eq!(run_ok(&env, "`(a ,b c)"), expected);
    }

    #[test]
    fn test_quasiquote_recurses_into_nested_lists() {
        let env = Environment::new();
        run_ok(&env, "(setq n 7)");
        let expected = Sexp::list(vec![
            Sexp::int(1),
            Sexp::list(vec![Sexp::int(2), Sexp::int(7)]),
        ]);
        assert_eq!(run_ok(&env, "`(1 (2 ,n))"), expected);
    }

    #[test]
    fn test_quasiquote_leaves_template_reusable() {
        let env = Environment::new();
        run_ok(&env, "(defun pair (v) `(got ,v))");
        let first = run_ok(&env, "(pair 1)");
        let second = run_ok(&env, "(pair 2)");
        assert_eq!(
            first,
            Sexp::list(vec![Sexp::symbol("got"), Sexp::int(1)])
        );
        assert_eq!(
            second,
            Sexp::list(vec![Sexp::symbol("got"), Sexp::int(2)])
        );
    }

    #[test]
    fn test_unquote_outside_quasiquote_is_malformed() {
        let env = Environment::new();
        assert!(matches!(
            run(&env, "(unquote 1)"),
            Err(JkError::MalformedExpression { .. })
        ));
    }

    #[test]
    fn test_eval_evaluates_twice() {
        let env = Environment::new();
        run_ok(&env, "(setq x 5)");
        assert_eq!(run_ok(&env, "(eval (quote x))"), Sexp::int(5));
    }

    #[test]
    fn test_defun_binds_and_recurses() {
        let env = Environment::new();
        let proc = run_ok(&env, "(defun id (x) x)");
        assert!(matches!(proc, Sexp::Proc(_)));
        assert_eq!(run_ok(&env, "(id 9)"), Sexp::int(9));
    }

    #[test]
    fn test_macro_expansion_evaluates_in_caller_env() {
        let env = Environment::new();
        run_ok(&env, "(defmacro m () (quote z))");
        run_ok(&env, "(setq z 7)");
        assert_eq!(run_ok(&env, "(m)"), Sexp::int(7));
    }

    #[test]
    fn test_applying_non_callable_is_malformed() {
        let env = Environment::new();
        assert!(matches!(
            run(&env, "(1 2 3)"),
            Err(JkError::MalformedExpression { .. })
        ));
    }

    #[test]
    fn test_unbound_symbol_names_the_symbol() {
        let env = Environment::new();
        match run(&env, "ghost") {
            Err(JkError::UnboundSymbol { name, location }) => {
                assert_eq!(name, "ghost");
                assert!(location.contains("at character 1"));
            }
            other => panic!("expected unbound-symbol, got {other:?}"),
        }
    }
}
