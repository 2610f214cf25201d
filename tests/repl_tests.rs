// Interactive session tests: multi-line buffering, echo and recovery.

use neon::error::{LexErrorKind, RuntimeErrorKind};
use neon::output::CapturedOutput;
use neon::repl::{Outcome, Session};
use neon::value::Value;

fn session() -> (Session, CapturedOutput) {
    let output = CapturedOutput::new();
    let session = Session::with_output(Box::new(output.clone()));
    (session, output)
}

#[test]
fn open_block_waits_for_more_input() {
    let (mut session, output) = session();

    assert_eq!(session.feed("if true {").unwrap(), Outcome::Pending { depth: 1 });
    assert!(session.is_pending());
    assert_eq!(session.feed("put 1").unwrap(), Outcome::Pending { depth: 1 });
    assert!(output.lines().is_empty());

    assert_eq!(session.feed("}").unwrap(), Outcome::Complete(None));
    assert!(!session.is_pending());
    assert_eq!(output.lines(), vec!["1"]);
}

#[test]
fn depth_follows_nesting() {
    let (mut session, _) = session();

    assert_eq!(session.feed("while false {").unwrap(), Outcome::Pending { depth: 1 });
    assert_eq!(session.feed("{").unwrap(), Outcome::Pending { depth: 2 });
    assert_eq!(session.feed("}").unwrap(), Outcome::Pending { depth: 1 });
    assert_eq!(session.feed("}").unwrap(), Outcome::Complete(None));
}

#[test]
fn several_lines_in_one_feed() {
    let (mut session, output) = session();

    assert_eq!(session.feed("{\nput 1\n}").unwrap(), Outcome::Complete(None));
    assert_eq!(output.lines(), vec!["1"]);
}

#[test]
fn expressions_are_echoed() {
    let (mut session, _) = session();

    assert_eq!(
        session.feed("1 + 2").unwrap(),
        Outcome::Complete(Some(Value::Int(3)))
    );
    assert_eq!(session.feed("nil").unwrap(), Outcome::Complete(None));
    assert_eq!(session.feed("put 4").unwrap(), Outcome::Complete(None));
}

#[test]
fn declarations_persist_between_lines() {
    let (mut session, _) = session();

    assert_eq!(session.feed("let! x = 1").unwrap(), Outcome::Complete(None));
    // Assignments are not echoed
    assert_eq!(session.feed("x = 5").unwrap(), Outcome::Complete(None));
    assert_eq!(
        session.feed("x").unwrap(),
        Outcome::Complete(Some(Value::Int(5)))
    );
}

#[test]
fn parse_error_discards_buffer() {
    let (mut session, output) = session();

    assert_eq!(session.feed("{").unwrap(), Outcome::Pending { depth: 1 });
    assert!(session.feed("1 +").is_err());
    assert!(!session.is_pending());
    assert!(session.pending_source().is_empty());

    assert_eq!(session.feed("put 2").unwrap(), Outcome::Complete(None));
    assert_eq!(output.lines(), vec!["2"]);
}

#[test]
fn runtime_error_leaves_session_usable() {
    let (mut session, output) = session();

    let error = session.feed("put y").unwrap_err();
    assert_eq!(error.runtime_kind(), Some(RuntimeErrorKind::NotFound));
    assert!(!session.is_pending());

    session.feed("let y = 3").unwrap();
    session.feed("put y").unwrap();
    assert_eq!(output.lines(), vec!["3"]);
}

#[test]
fn lex_error_is_reported() {
    let (mut session, _) = session();

    let error = session.feed("\"abc").unwrap_err();
    assert_eq!(error.lex_kind(), Some(LexErrorKind::UnterminatedString));
}

#[test]
fn pending_source_accumulates_lines() {
    let (mut session, _) = session();

    session.feed("if true {").unwrap();
    session.feed("put 1").unwrap();
    assert_eq!(session.pending_source(), "if true {\nput 1\n");
}
