use crate::error::{ErrorKind, NeonError, ParseErrorKind};
use crate::evaluator::Evaluator;
use crate::lexer::Lexer;
use crate::output::Config;
use crate::parser::Parser;
use crate::value::Value;
use log::debug;

/// Statements are newline-terminated, so a file always ends with one.
fn normalize(source: &str) -> String {
    let mut text = source.to_string();
    if !text.ends_with('\n') {
        text.push('\n');
    }
    text
}

/// Lexes, parses and evaluates a whole file with the given evaluator.
pub fn execute_with(source: &str, evaluator: &mut Evaluator) -> Result<Value, NeonError> {
    let text = normalize(source);

    let tokens = Lexer::new(&text, true).scan_tokens()?;
    let program = Parser::new(tokens).parse().map_err(unclosed_block)?;
    evaluator.evaluate_program(&program)
}

/// A file cannot continue on another line, so an open block at the end of
/// input is an ordinary parse error.
fn unclosed_block(error: NeonError) -> NeonError {
    let depth = match error.kind {
        ErrorKind::UnterminatedStatement { depth } => depth,
        _ => return error,
    };

    NeonError::new(
        ErrorKind::Parse(ParseErrorKind::ExpectedToken),
        error.span,
        error.line,
        error.column,
        error.lexeme,
        "expected '}' after block, found end of input".to_string(),
    )
    .with_help(format!("{} block(s) still open", depth))
}

pub fn execute(source: &str) -> Result<Value, NeonError> {
    execute_with(source, &mut Evaluator::new())
}

/// Runs a file and reports the first error against its source.
pub fn run(source: &str, filename: Option<&str>, config: Config) {
    debug!("running {}", filename.unwrap_or("<input>"));

    let mut evaluator = Evaluator::with_output(config.sink());
    if let Err(error) = execute_with(source, &mut evaluator) {
        error.report(&normalize(source), filename);
    }
}
