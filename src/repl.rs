use crate::ast::{Expr, Stmt};
use crate::error::{ErrorKind, NeonError};
use crate::evaluator::Evaluator;
use crate::lexer::{Lexer, Token};
use crate::output::{Config, OutputSink};
use crate::parser::Parser;
use crate::value::Value;
use log::{debug, warn};
use std::io::{self, Write};

/// What a line of interactive input amounted to.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// A block is still open; the input was buffered.
    Pending { depth: usize },
    /// The buffered input ran. Holds the value to echo, if any.
    Complete(Option<Value>),
}

/// Interactive program state: tokens of an unfinished statement, the text
/// they came from, and the evaluator whose root scope persists across lines.
pub struct Session {
    tokens: Vec<Token>,
    source: String,
    line: usize,
    evaluator: Evaluator,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Self::with_output(config.sink())
    }

    pub fn with_output(output: Box<dyn OutputSink>) -> Self {
        Self {
            tokens: Vec::new(),
            source: String::new(),
            line: 1,
            evaluator: Evaluator::with_output(output),
        }
    }

    /// Text buffered so far, which diagnostics for the next line are
    /// rendered against.
    pub fn pending_source(&self) -> &str {
        &self.source
    }

    pub fn is_pending(&self) -> bool {
        !self.tokens.is_empty()
    }

    pub fn feed(&mut self, input: &str) -> Result<Outcome, NeonError> {
        let offset = self.source.chars().count();
        self.source.push_str(input);
        self.source.push('\n');

        let mut scanned = match Lexer::new(input, false)
            .with_origin(offset, self.line)
            .scan_tokens()
        {
            Ok(tokens) => tokens,
            Err(error) => {
                self.discard();
                return Err(error);
            }
        };
        self.line += input.matches('\n').count() + 1;

        let eof = scanned.pop();
        self.tokens.extend(scanned);

        let mut buffer = self.tokens.clone();
        buffer.extend(eof);

        let program = match Parser::new(buffer).parse() {
            Ok(program) => program,
            Err(NeonError {
                kind: ErrorKind::UnterminatedStatement { depth },
                ..
            }) => {
                debug!("buffering input, {} blocks open", depth);
                return Ok(Outcome::Pending { depth });
            }
            Err(error) => {
                self.discard();
                return Err(error);
            }
        };

        self.reset();
        let value = self.evaluator.evaluate_program(&program)?;

        let echo = match program.statements.last() {
            Some(Stmt::Expression { expr }) => {
                !matches!(expr, Expr::Assign { .. }) && !value.is_nil()
            }
            _ => false,
        };

        Ok(Outcome::Complete(if echo { Some(value) } else { None }))
    }

    fn discard(&mut self) {
        if !self.tokens.is_empty() {
            warn!("discarding {} buffered tokens", self.tokens.len());
        }
        self.reset();
    }

    fn reset(&mut self) {
        self.tokens.clear();
        self.source.clear();
        self.line = 1;
    }
}

fn prompt(depth: usize) -> String {
    if depth == 0 {
        "> ".to_string()
    } else {
        format!("{} ", "..".repeat(depth))
    }
}

pub fn start(config: Config) {
    println!("Neon interpreter v{}", env!("CARGO_PKG_VERSION"));
    println!("Type 'exit' to quit, 'clear' to clear the screen");
    println!();

    let mut session = Session::new(config);
    let mut depth = 0;

    loop {
        print!("{}", prompt(depth));
        if let Err(error) = io::stdout().flush() {
            eprintln!("Error writing prompt: {}", error);
            break;
        }

        let mut line = String::new();
        match io::stdin().read_line(&mut line) {
            Ok(0) => {
                // EOF reached (Ctrl+D or piped input ended)
                println!();
                break;
            }
            Ok(_) => {
                let line = line.trim_end_matches(&['\n', '\r'][..]);

                match line.trim() {
                    "exit" => break,
                    "clear" => {
                        print!("\x1B[2J\x1B[1;1H");
                        continue;
                    }
                    _ => {}
                }

                let source = format!("{}{}\n", session.pending_source(), line);
                match session.feed(line) {
                    Ok(Outcome::Pending { depth: open }) => depth = open,
                    Ok(Outcome::Complete(value)) => {
                        depth = 0;
                        if let Some(value) = value {
                            println!("{}", value);
                        }
                    }
                    Err(error) => {
                        depth = 0;
                        error.report(&source, None);
                    }
                }
            }
            Err(error) => {
                eprintln!("Error reading input: {}", error);
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_grows_with_depth() {
        assert_eq!(prompt(0), "> ");
        assert_eq!(prompt(1), ".. ");
        assert_eq!(prompt(3), "...... ");
    }
}
