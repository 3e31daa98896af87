mod lexer_tests;
mod parser_tests;

use crate::ast::Cmd;
use crate::lexer::lex;
use crate::parser::parse;

/// Lex and parse one line, panicking on syntax errors.
pub fn tree(line: &str) -> Cmd {
    parse(&lex(line).unwrap()).unwrap()
}
