use thiserror::Error;

use crate::lang::{evaluator::EvalError, lexer::LexerError, parser::ParserError};

#[derive(Debug, Error, PartialEq, Clone)]
pub enum Error {
    #[error("Lexing Error: {0}")]
    Lexer(#[from] LexerError),
    #[error("Parsing Error: {0}")]
    Parser(#[from] ParserError),
    #[error("Runtime Error: {0}")]
    Eval(#[from] EvalError),
}
