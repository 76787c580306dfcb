use log::debug;
use miette::Error;

pub mod eval;
pub mod lex;
pub mod parse;
pub mod print;
pub mod repl;

pub use eval::{Failure, evaluate};
pub use lex::Lexer;
pub use parse::{Parser, TokenTree};
pub use print::render;

/// Parses one line into its syntax tree.
pub fn parse(line: &str) -> Result<TokenTree<'_>, Error> {
    Parser::new(None, line).parse()
}

/// Parses, evaluates and renders one line. Only syntax errors are `Err`;
/// evaluation failures come back rendered like any other result.
pub fn interpret(filename: Option<&str>, line: &str) -> Result<String, Error> {
    let tree = Parser::new(filename, line).parse()?;
    debug!("parsed {tree}");
    let result = evaluate(&tree);
    debug!("evaluated {tree} => {result:?}");
    Ok(render(&result))
}
