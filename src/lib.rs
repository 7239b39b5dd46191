pub mod util;
pub mod errors;
pub mod lang;

use clap::Parser as ClapParser;
use crate::errors::Error;
use crate::lang::ast::Expr;
use crate::lang::lexer::Lexer;
use crate::lang::parser::Parser;
use crate::lang::value::Value;

pub use crate::lang::builtins::root_frame;
pub use crate::lang::evaluator::evaluate;
pub use crate::lang::lower::lower_to_value;
pub use crate::lang::writer::render;

#[derive(ClapParser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Config {
    #[clap(help = "Expression to evaluate")]
    pub expression: String,

    #[clap(short, long, help = "Print verbose log output")]
    pub verbose: bool,
    #[clap(long, help = "Print the parse tree instead of evaluating")]
    pub ast: bool,
}

pub fn parse_source(source: &str) -> Result<Expr, Error> {
    Parser::new(Lexer::new(source)).parse()
}

/// Parses, lowers and evaluates `source` against a fresh root frame.
#[tracing::instrument(level = "debug", skip_all)]
pub fn run_str(source: &str) -> Result<Value, Error> {
    let value = lower_to_value(&parse_source(source)?);
    let frame = root_frame();

    Ok(evaluate(&frame, &value)?)
}

/// Runs the host with the given configuration and returns the text to print.
pub fn run(config: &Config) -> Result<String, Error> {
    if config.ast {
        return Ok(format!("{:?}", parse_source(&config.expression)?));
    }

    Ok(render(&run_str(&config.expression)?))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn config(expression: &str, ast: bool) -> Config {
        Config { expression: expression.to_owned(), verbose: false, ast }
    }

    #[test]
    fn runs_expressions() {
        assert_eq!(run(&config("1 + 2 * 3", false)), Ok(String::from("9")));
        assert_eq!(run(&config("[1, 2.5, \"x\"]", false)), Ok(String::from("[1, 2.5, \"x\"]")));
    }

    #[test]
    fn prints_the_parse_tree() {
        assert_eq!(run(&config("1 + 2 * 3", true)), Ok(String::from("((1 + 2) * 3)")));
    }

    #[test]
    fn error_text_names_the_stage() {
        let error = run(&config("a", false)).expect_err("unbound name");
        assert_eq!(error.to_string(), "Runtime Error: Name 'a' not found");

        let error = run(&config("1 +", false)).expect_err("missing operand");
        assert!(error.to_string().starts_with("Parsing Error: [line 1 column 4]"), "{}", error);
    }
}
