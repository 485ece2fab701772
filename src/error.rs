// ABOUTME: Error types for lexing, reading, and evaluation failures

use crate::lexer::Token;
use thiserror::Error;

/// All interpreter failures. Variants raised against a node that came out
/// of the reader carry a pre-rendered source location (caret block); the
/// location is empty for nodes synthesised at runtime.
#[allow(dead_code)]
#[derive(Error, Debug, Clone)]
pub enum JkError {
    /// Unbalanced paren or quote, or unexpected token shape.
    #[error("parse error: {message}{location}")]
    Parse { message: String, location: String },

    /// Symbol lookup walked the whole environment chain without a hit.
    #[error("unbound symbol: {name}{location}")]
    UnboundSymbol { name: String, location: String },

    /// Bindings list of a `let*` missing or shaped incorrectly.
    #[error("malformed let: {message}{location}")]
    MalformedLet { message: String, location: String },

    /// Arity or sub-shape violation in a special form.
    #[error("malformed expression: {message}{location}")]
    MalformedExpression { message: String, location: String },

    /// A host-level value with no S-expression representation.
    #[error("type not implemented: {type_name} has no expression form")]
    TypeNotImplemented { type_name: String },

    /// A built-in received an S-expression of the wrong variant.
    #[error("{function}: {message}")]
    IncorrectArgument { function: String, message: String },
}

impl JkError {
    fn render(tok: Option<&Token>) -> String {
        tok.map(Token::format_loc).unwrap_or_default()
    }

    pub fn parse(message: impl Into<String>, tok: Option<&Token>) -> Self {
        JkError::Parse {
            message: message.into(),
            location: Self::render(tok),
        }
    }

    pub fn unbound(name: impl Into<String>, tok: Option<&Token>) -> Self {
        JkError::UnboundSymbol {
            name: name.into(),
            location: Self::render(tok),
        }
    }

    pub fn malformed_let(message: impl Into<String>, tok: Option<&Token>) -> Self {
        JkError::MalformedLet {
            message: message.into(),
            location: Self::render(tok),
        }
    }

    pub fn malformed(message: impl Into<String>, tok: Option<&Token>) -> Self {
        JkError::MalformedExpression {
            message: message.into(),
            location: Self::render(tok),
        }
    }

    pub fn not_implemented(type_name: impl Into<String>) -> Self {
        JkError::TypeNotImplemented {
            type_name: type_name.into(),
        }
    }

    pub fn argument(function: &str, message: impl Into<String>) -> Self {
        JkError::IncorrectArgument {
            function: function.to_string(),
            message: message.into(),
        }
    }
}
