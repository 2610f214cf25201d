// Neon Language Interpreter Library
//
// Lexer, precedence-climbing parser and tree-walking evaluator for Neon,
// a small expression-oriented scripting language with newline-terminated
// statements and type-locked variables.

// Public modules
pub mod ast;
pub mod error;
pub mod evaluator;
pub mod lexer;
pub mod operators;
pub mod output;
pub mod parser;
pub mod repl;
pub mod runner;
pub mod scope;
pub mod value;

// Re-export commonly used items
pub use ast::{Expr, Program, Stmt};
pub use error::{ErrorKind, NeonError, Span};
pub use evaluator::Evaluator;
pub use lexer::{Lexer, Literal, Token, TokenType};
pub use output::{CapturedOutput, Config, OutputSink};
pub use parser::Parser;
pub use repl::{Outcome, Session};
pub use scope::ScopeArena;
pub use value::{TypeTag, Value, ValueType};

// Re-export main functions
pub use repl::start as start_repl;
pub use runner::{execute, run};
