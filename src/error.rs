use ariadne::{Color, Config, Fmt, Label, Report, ReportKind, Source};
use std::io::{self, Write};
use thiserror::Error;

use crate::lexer::Token;

/// Char offsets into the source text a token was scanned from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn single(pos: usize) -> Self {
        Self {
            start: pos,
            end: pos + 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LexErrorKind {
    #[error("unexpected character")]
    UnexpectedCharacter,
    #[error("unterminated string")]
    UnterminatedString,
    #[error("unterminated char")]
    UnterminatedChar,
    #[error("unterminated comment")]
    UnterminatedComment,
    #[error("invalid number literal")]
    InvalidNumberLiteral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("expected token")]
    ExpectedToken,
    #[error("expected expression")]
    ExpectedExpression,
    #[error("invalid assignment target")]
    InvalidAssignmentTarget,
    #[error("invalid type")]
    InvalidType,
    #[error("nesting too deep")]
    NestingTooDeep,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RuntimeErrorKind {
    #[error("not found")]
    NotFound,
    #[error("uninitialized")]
    Uninitialized,
    #[error("immutable")]
    Immutable,
    #[error("nil not allowed")]
    NilNotAllowed,
    #[error("type mismatch")]
    TypeMismatch,
    #[error("invalid operands")]
    InvalidOperands,
    #[error("division by zero")]
    DivisionByZero,
    #[error("truthy not implemented")]
    TruthyNotImplemented,
    #[error("not implemented")]
    NotImplemented,
    #[error("invalid cast")]
    InvalidCast,
    #[error("unsupported operation")]
    UnsupportedOperation,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    #[error("lexical error ({0})")]
    Lex(LexErrorKind),
    #[error("parse error ({0})")]
    Parse(ParseErrorKind),
    #[error("runtime error ({0})")]
    Runtime(RuntimeErrorKind),
    /// Input ended inside an open block; interactive mode buffers and waits.
    #[error("unterminated statement")]
    UnterminatedStatement { depth: usize },
}

#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct NeonError {
    pub kind: ErrorKind,
    pub span: Span,
    pub line: usize,
    pub column: usize,
    pub lexeme: String,
    pub message: String,
    pub help: Option<String>,
}

impl NeonError {
    pub fn new(
        kind: ErrorKind,
        span: Span,
        line: usize,
        column: usize,
        lexeme: String,
        message: String,
    ) -> Self {
        Self {
            kind,
            span,
            line,
            column,
            lexeme,
            message,
            help: None,
        }
    }

    fn at_token(kind: ErrorKind, token: &Token, message: String) -> Self {
        Self::new(
            kind,
            token.span.clone(),
            token.line,
            token.column,
            token.lexeme.clone(),
            message,
        )
    }

    pub fn with_help(mut self, help: String) -> Self {
        self.help = Some(help);
        self
    }

    pub fn lex_error(
        kind: LexErrorKind,
        span: Span,
        line: usize,
        column: usize,
        lexeme: String,
        message: String,
    ) -> Self {
        Self::new(ErrorKind::Lex(kind), span, line, column, lexeme, message)
    }

    pub fn parse_error(kind: ParseErrorKind, token: &Token, message: String) -> Self {
        Self::at_token(ErrorKind::Parse(kind), token, message)
    }

    pub fn parse_error_with_help(
        kind: ParseErrorKind,
        token: &Token,
        message: String,
        help: String,
    ) -> Self {
        Self::parse_error(kind, token, message).with_help(help)
    }

    pub fn runtime_error(kind: RuntimeErrorKind, token: &Token, message: String) -> Self {
        Self::at_token(ErrorKind::Runtime(kind), token, message)
    }

    pub fn runtime_error_with_help(
        kind: RuntimeErrorKind,
        token: &Token,
        message: String,
        help: String,
    ) -> Self {
        Self::runtime_error(kind, token, message).with_help(help)
    }

    pub fn unterminated(token: &Token, depth: usize) -> Self {
        Self::at_token(
            ErrorKind::UnterminatedStatement { depth },
            token,
            "unterminated statement".to_string(),
        )
    }

    pub fn is_unterminated(&self) -> bool {
        matches!(self.kind, ErrorKind::UnterminatedStatement { .. })
    }

    pub fn runtime_kind(&self) -> Option<RuntimeErrorKind> {
        match self.kind {
            ErrorKind::Runtime(kind) => Some(kind),
            _ => None,
        }
    }

    pub fn parse_kind(&self) -> Option<ParseErrorKind> {
        match self.kind {
            ErrorKind::Parse(kind) => Some(kind),
            _ => None,
        }
    }

    pub fn lex_kind(&self) -> Option<LexErrorKind> {
        match self.kind {
            ErrorKind::Lex(kind) => Some(kind),
            _ => None,
        }
    }

    fn write_report<W: Write>(
        &self,
        source: &str,
        filename: &str,
        color: bool,
        out: W,
    ) -> io::Result<()> {
        let (paint, kind_str) = match self.kind {
            ErrorKind::Lex(_) => (Color::Red, "Lexical Error"),
            ErrorKind::Parse(_) => (Color::Yellow, "Parse Error"),
            ErrorKind::Runtime(_) => (Color::Magenta, "Runtime Error"),
            ErrorKind::UnterminatedStatement { .. } => (Color::Blue, "Unterminated Statement"),
        };

        let title = if color {
            format!("{}: {}", kind_str.fg(paint), self.message)
        } else {
            format!("{}: {}", kind_str, self.message)
        };

        let mut report_builder = Report::build(ReportKind::Error, filename, self.span.start)
            .with_config(Config::default().with_color(color))
            .with_message(title)
            .with_label(
                Label::new((filename, self.span.start..self.span.end))
                    .with_message(format!(
                        "[line {}, column {}] {}",
                        self.line, self.column, self.kind
                    ))
                    .with_color(paint),
            );

        // Add help note if available
        if let Some(ref help_text) = self.help {
            let note = if color {
                format!("{}: {}", "help".fg(Color::Cyan), help_text)
            } else {
                format!("help: {}", help_text)
            };
            report_builder = report_builder.with_note(note);
        }

        report_builder
            .finish()
            .write((filename, Source::from(source)), out)
    }

    /// Prints the diagnostic to stderr.
    pub fn report(&self, source: &str, filename: Option<&str>) {
        let filename = filename.unwrap_or("<repl>");
        if self.write_report(source, filename, true, io::stderr()).is_err() {
            eprintln!("[line {}, column {}] {}", self.line, self.column, self.message);
        }
    }

    /// Renders the diagnostic without color.
    pub fn render(&self, source: &str, filename: Option<&str>) -> String {
        let filename = filename.unwrap_or("<repl>");
        let mut buffer = Vec::new();
        match self.write_report(source, filename, false, &mut buffer) {
            Ok(()) => String::from_utf8_lossy(&buffer).into_owned(),
            Err(_) => format!("[line {}, column {}] {}", self.line, self.column, self.message),
        }
    }
}
