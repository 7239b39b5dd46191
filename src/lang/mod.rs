pub mod ast;
pub mod lexer;
pub mod parser;
pub mod lower;
pub mod value;
pub mod writer;
pub mod environment;
pub mod evaluator;
pub mod builtins;
