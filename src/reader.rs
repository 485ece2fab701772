// ABOUTME: Reader building an S-expression forest from tokens and desugaring reader macros

use crate::error::JkError;
use crate::lexer::{lex, Token};
use crate::value::{Atom, Sexp};
use std::rc::Rc;

/// Reads source lines into a forest of located S-expressions: lex,
/// shift/reduce build, then reader-macro desugaring.
pub fn read(lines: Vec<String>) -> Result<Vec<Sexp>, JkError> {
    let src = Rc::new(lines);
    let tokens = lex(&src)?;
    let mut forest = build(tokens)?;
    expand_reader_macros(&mut forest)?;
    Ok(forest)
}

/// Convenience wrapper splitting a source string into lines.
pub fn read_str(source: &str) -> Result<Vec<Sexp>, JkError> {
    read(source.lines().map(str::to_string).collect())
}

enum StackItem {
    Open(Token),
    Exp(Sexp),
}

/// Classifies a non-paren token: integer, then float, then quoted
/// string, then the distinguished constants, then symbol.
fn read_atom(tok: Token) -> Sexp {
    if let Ok(n) = tok.val.parse::<i64>() {
        return Sexp::Atom {
            val: Atom::Int(n),
            tok: Some(tok),
        };
    }
    if let Ok(x) = tok.val.parse::<f64>() {
        return Sexp::Atom {
            val: Atom::Float(x),
            tok: Some(tok),
        };
    }
    if tok.val.len() >= 2 && tok.val.starts_with('"') && tok.val.ends_with('"') {
        let inner = tok.val[1..tok.val.len() - 1].to_string();
        return Sexp::Atom {
            val: Atom::Str(inner),
            tok: Some(tok),
        };
    }
    let constant = match tok.val.as_str() {
        "true" => Some(Atom::Bool(true)),
        "false" => Some(Atom::Bool(false)),
        "nil" => Some(Atom::Nil),
        _ => None,
    };
    match constant {
        Some(val) => Sexp::Atom {
            val,
            tok: Some(tok),
        },
        None => Sexp::Symbol {
            name: tok.val.clone(),
            tok: Some(tok),
        },
    }
}

/// Shift/reduce pass: `(` shifts, `)` reduces everything back to the
/// matching open into a list tagged with the open paren's token.
fn build(tokens: Vec<Token>) -> Result<Vec<Sexp>, JkError> {
    let mut stack: Vec<StackItem> = Vec::new();

    for tok in tokens {
        match tok.val.as_str() {
            "(" => stack.push(StackItem::Open(tok)),
            ")" => {
                let mut items = Vec::new();
                loop {
                    match stack.pop() {
                        None => return Err(JkError::parse("unbalanced ) found", Some(&tok))),
                        Some(StackItem::Exp(sexp)) => items.push(sexp),
                        Some(StackItem::Open(open)) => {
                            items.reverse();
                            stack.push(StackItem::Exp(Sexp::List {
                                items,
                                tok: Some(open),
                            }));
                            break;
                        }
                    }
                }
            }
            _ => stack.push(StackItem::Exp(read_atom(tok))),
        }
    }

    let mut forest = Vec::with_capacity(stack.len());
    for item in stack {
        match item {
            StackItem::Exp(sexp) => forest.push(sexp),
            StackItem::Open(open) => {
                return Err(JkError::parse("unbalanced ( found", Some(&open)));
            }
        }
    }
    Ok(forest)
}

fn macro_name(sym: &str) -> Option<&'static str> {
    match sym {
        "'" => Some("quote"),
        "`" => Some("quasiquote"),
        "," => Some("unquote"),
        _ => None,
    }
}

/// Rewrites `SYM X` into `(quote X)` / `(quasiquote X)` / `(unquote X)`
/// for the three sigil symbols, recursing into `X` first when it is a
/// list. The new list reuses the sigil's token.
fn expand_reader_macros(sexps: &mut Vec<Sexp>) -> Result<(), JkError> {
    let mut i = 0;
    while i < sexps.len() {
        if let Sexp::List { items, .. } = &mut sexps[i] {
            expand_reader_macros(items)?;
            i += 1;
            continue;
        }

        let hit = match &sexps[i] {
            Sexp::Symbol { name, tok } => {
                macro_name(name).map(|mapped| (mapped, name.clone(), tok.clone()))
            }
            _ => None,
        };

        if let Some((mapped, sigil, tok)) = hit {
            if i + 1 >= sexps.len() {
                return Err(JkError::malformed(
                    format!("reader macro {} with no following form", sigil),
                    tok.as_ref(),
                ));
            }
            if let Sexp::List { items, .. } = &mut sexps[i + 1] {
                expand_reader_macros(items)?;
            }
            let form = sexps.remove(i + 1);
            sexps[i] = Sexp::List {
                items: vec![
                    Sexp::Symbol {
                        name: mapped.to_string(),
                        tok: tok.clone(),
                    },
                    form,
                ],
                tok,
            };
        }
        i += 1;
    }
    Ok(())
}
