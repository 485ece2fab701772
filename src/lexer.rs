// ABOUTME: Lexer turning source lines into a flat stream of located tokens

use crate::error::JkError;
use nom::{
    bytes::complete::{take_while, take_while1},
    character::complete::{char, one_of},
    combinator::recognize,
    sequence::delimited,
    IResult, Parser,
};
use std::fmt;
use std::rc::Rc;

/// A located lexeme. Tokens keep a shared view of the full source so
/// diagnostics can echo the offending line.
#[derive(Debug, Clone)]
pub struct Token {
    /// The raw lexeme; string lexemes keep both surrounding quotes.
    pub val: String,
    /// 1-based column of the first character.
    pub pos: usize,
    /// 0-based line index into the source.
    pub line: usize,
    src: Rc<Vec<String>>,
}

impl Token {
    fn new(val: &str, pos: usize, line: usize, src: &Rc<Vec<String>>) -> Self {
        Token {
            val: val.to_string(),
            pos,
            line,
            src: Rc::clone(src),
        }
    }

    /// Renders the diagnostic block for this token: position, the source
    /// line, and a caret underlining the offending column. The line-number
    /// clause is omitted on line 0 (single-line REPL input).
    pub fn format_loc(&self) -> String {
        let mut out = format!(" at character {}", self.pos);
        if self.line != 0 {
            out.push_str(&format!(" on line number {}", self.line + 1));
        }
        out.push('\n');
        out.push_str(self.src.get(self.line).map_or("", String::as_str));
        out.push('\n');
        out.push_str(&"-".repeat(self.pos - 1));
        out.push_str("^\n");
        out
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.val)
    }
}

/// One of the single-character tokens: parens and reader-macro sigils.
fn punctuation(input: &str) -> IResult<&str, &str> {
    recognize(one_of("()'`,")).parse(input)
}

/// A complete string lexeme on a single line, both quotes included.
/// No escapes: the content is everything up to the next `"`.
fn string_lexeme(input: &str) -> IResult<&str, &str> {
    recognize(delimited(char('"'), take_while(|c| c != '"'), char('"'))).parse(input)
}

/// A bareword extends until a paren, a space, or end of line.
fn bareword(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| !matches!(c, '(' | ')' | ' ')).parse(input)
}

/// Tokenizes the source lines. Tokens never span lines; a `;` at the
/// start of a token position comments out the rest of the line.
pub fn lex(src: &Rc<Vec<String>>) -> Result<Vec<Token>, JkError> {
    let mut tokens = Vec::new();

    for (lineno, line) in src.iter().enumerate() {
        let mut rest = line.as_str();
        loop {
            rest = rest.trim_start_matches(' ');
            if rest.is_empty() || rest.starts_with(';') {
                break;
            }
            let col = line.len() - rest.len() + 1;

            if let Ok((next, lexeme)) = punctuation(rest) {
                tokens.push(Token::new(lexeme, col, lineno, src));
                rest = next;
                continue;
            }

            if rest.starts_with('"') {
                match string_lexeme(rest) {
                    Ok((next, lexeme)) => {
                        tokens.push(Token::new(lexeme, col, lineno, src));
                        rest = next;
                    }
                    Err(_) => {
                        // No closing quote on this line; point at the opening one.
                        let tok = Token::new(rest, col, lineno, src);
                        return Err(JkError::parse("unbalanced \" found", Some(&tok)));
                    }
                }
                continue;
            }

            // Cannot fail: rest is non-empty and its first character is not
            // one of the delimiters handled above.
            if let Ok((next, lexeme)) = bareword(rest) {
                tokens.push(Token::new(lexeme, col, lineno, src));
                rest = next;
            }
        }
    }

    Ok(tokens)
}
