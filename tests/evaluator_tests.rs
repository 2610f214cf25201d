// End-to-end evaluation tests: source text in, captured `put` output and
// final values out.

use neon::error::{ErrorKind, NeonError, ParseErrorKind, RuntimeErrorKind};
use neon::evaluator::Evaluator;
use neon::output::CapturedOutput;
use neon::runner;
use neon::value::Value;

/// Runs `source` as a file and returns its result with everything it printed
fn run(source: &str) -> (Result<Value, NeonError>, Vec<String>) {
    let output = CapturedOutput::new();
    let mut evaluator = Evaluator::with_output(Box::new(output.clone()));
    let result = runner::execute_with(source, &mut evaluator);
    (result, output.lines())
}

fn printed(source: &str) -> Vec<String> {
    let (result, lines) = run(source);
    if let Err(error) = result {
        panic!("unexpected error: {}", error.message);
    }
    lines
}

fn runtime_failure(source: &str) -> RuntimeErrorKind {
    match run(source).0 {
        Ok(value) => panic!("expected a runtime error, got {}", value),
        Err(error) => match error.kind {
            ErrorKind::Runtime(kind) => kind,
            other => panic!("expected a runtime error, got {:?}: {}", other, error.message),
        },
    }
}

// ============================================================================
// Arithmetic and operators
// ============================================================================

#[test]
fn precedence() {
    assert_eq!(printed("put 1 + 2 * 3\nput (1 + 2) * 3"), vec!["7", "9"]);
    assert_eq!(printed("put 2 ** 10\nput 7 % 3"), vec!["1024", "1"]);
}

#[test]
fn integer_division_by_zero_fails() {
    assert_eq!(runtime_failure("put 10 / 0"), RuntimeErrorKind::DivisionByZero);
    assert_eq!(runtime_failure("put 10 % 0"), RuntimeErrorKind::DivisionByZero);
}

#[test]
fn float_division_by_zero_is_infinite() {
    assert_eq!(printed("put 5.0 / 0.0"), vec!["+Inf"]);
    assert_eq!(printed("put -5.0 / 0.0"), vec!["-Inf"]);
    assert_eq!(printed("put 0.0 / 0.0"), vec!["NaN"]);
}

#[test]
fn unary_plus_only_applies_to_numbers() {
    assert_eq!(printed("put +3\nput +2.5"), vec!["3", "2.5"]);
    assert_eq!(runtime_failure("put +true"), RuntimeErrorKind::UnsupportedOperation);
    assert_eq!(runtime_failure("put +\"s\""), RuntimeErrorKind::UnsupportedOperation);
}

#[test]
fn mixed_numbers_widen_to_float() {
    assert_eq!(printed("put 1 + 0.5\nput 4 / 2.0"), vec!["1.5", "2.0"]);
}

#[test]
fn logic_is_truthiness() {
    assert_eq!(printed("put true && false\nput 0 || 5"), vec!["false", "true"]);
    assert_eq!(printed("put !0\nput !true"), vec!["true", "false"]);
}

#[test]
fn strings_concatenate_but_do_not_compare() {
    assert_eq!(printed("put \"ab\" + 'c'"), vec!["abc"]);
    assert_eq!(printed("put \"a\" == \"a\""), vec!["true"]);

    let (result, _) = run("put \"a\" < \"b\"");
    let error = result.unwrap_err();
    assert_eq!(error.message, "cannot direct compare strings");
}

#[test]
fn int_and_uint_only_mix_in_comparisons() {
    assert_eq!(printed("let u = 3: uint\nput u == 3\nput u < 4"), vec!["true", "true"]);
    assert_eq!(
        runtime_failure("let u = 3: uint\nput u + 1"),
        RuntimeErrorKind::InvalidOperands
    );
}

#[test]
fn shifts_keep_left_operand_type() {
    assert_eq!(printed("put 1 << 4\nput -16 >> 2\nput 1 << 64"), vec!["16", "-4", "0"]);
    assert_eq!(
        runtime_failure("put 1.5 << 1"),
        RuntimeErrorKind::UnsupportedOperation
    );
}

#[test]
fn casts() {
    assert_eq!(
        printed("put 3: float\nput 2.9: int\nput 65: char\nput true: string\nput 0: bool"),
        vec!["3.0", "2", "A", "true", "false"]
    );
    assert_eq!(runtime_failure("put \"12\": int"), RuntimeErrorKind::InvalidCast);
    assert_eq!(runtime_failure("put 1: i8"), RuntimeErrorKind::InvalidCast);
}

#[test]
fn ternary_and_sequence() {
    assert_eq!(printed("put true ? \"y\" : \"n\""), vec!["y"]);
    assert_eq!(printed("put (1; 2)"), vec!["2"]);
}

// ============================================================================
// Variables and scopes
// ============================================================================

#[test]
fn declared_type_must_match() {
    assert_eq!(
        runtime_failure("let x: int = \"hi\""),
        RuntimeErrorKind::TypeMismatch
    );
}

#[test]
fn mutable_variables_can_be_reassigned() {
    assert_eq!(printed("let! x = 5\nx = 6\nput x"), vec!["6"]);
    assert_eq!(printed("let! s = \"a\"\ns += 'b'\nput s"), vec!["ab"]);
}

#[test]
fn immutable_variables_reject_assignment() {
    assert_eq!(runtime_failure("let x = 1\nx = 2"), RuntimeErrorKind::Immutable);
}

#[test]
fn variable_type_is_locked() {
    assert_eq!(
        runtime_failure("let! x = 1\nx = \"s\""),
        RuntimeErrorKind::TypeMismatch
    );
    assert_eq!(
        runtime_failure("let x = 5\nx = \"s\""),
        RuntimeErrorKind::TypeMismatch
    );
}

#[test]
fn redeclaring_in_same_scope_shadows() {
    assert_eq!(printed("let x = 5\nlet x = 6\nput x"), vec!["6"]);
}

#[test]
fn nil_requires_nullable() {
    assert_eq!(runtime_failure("let x = nil"), RuntimeErrorKind::NilNotAllowed);
    assert_eq!(
        runtime_failure("let! x = 1\nx = nil"),
        RuntimeErrorKind::NilNotAllowed
    );
    assert_eq!(printed("let!? x: int = nil\nx = 4\nput x"), vec!["4"]);
    assert_eq!(
        runtime_failure("let!? x: int = nil\nx = 2.5"),
        RuntimeErrorKind::TypeMismatch
    );
}

#[test]
fn reading_before_assignment_fails() {
    assert_eq!(
        runtime_failure("let! x: int\nput x"),
        RuntimeErrorKind::Uninitialized
    );
    assert_eq!(printed("let! x: int\nx = 3\nput x"), vec!["3"]);
}

#[test]
fn inner_scope_shadows_outer() {
    assert_eq!(
        printed("let x = 5\n{\n  let x = 6\n  put x\n}\nput x"),
        vec!["6", "5"]
    );
}

#[test]
fn block_bindings_are_dropped_on_exit() {
    assert_eq!(runtime_failure("{\n  let y = 1\n}\nput y"), RuntimeErrorKind::NotFound);
}

#[test]
fn inner_scope_writes_outer_variable() {
    assert_eq!(printed("let! x = 1\n{\n  x = 2\n}\nput x"), vec!["2"]);
    assert_eq!(
        runtime_failure("let x = 1\n{\n  x = 2\n}"),
        RuntimeErrorKind::Immutable
    );
}

#[test]
fn failing_block_still_releases_its_scope() {
    let output = CapturedOutput::new();
    let mut evaluator = Evaluator::with_output(Box::new(output.clone()));

    assert!(runner::execute_with("{\n  let y = 1\n  put 1 / 0\n}", &mut evaluator).is_err());
    assert_eq!(evaluator.scopes().depth(), 1);

    runner::execute_with("let y = 2\nput y", &mut evaluator).unwrap();
    assert_eq!(output.lines(), vec!["2"]);
}

// ============================================================================
// Control flow
// ============================================================================

#[test]
fn if_elif_else_picks_one_branch() {
    let source = "let x = 2\nif x == 1 {\n  put \"one\"\n} elif x == 2 {\n  put \"two\"\n} else {\n  put \"many\"\n}";
    assert_eq!(printed(source), vec!["two"]);
}

#[test]
fn while_loops_until_condition_fails() {
    assert_eq!(
        printed("let! i = 0\nwhile i < 3 {\n  put i\n  i += 1\n}"),
        vec!["0", "1", "2"]
    );
}

#[test]
fn blocks_and_ifs_are_values() {
    assert_eq!(printed("let x = if false { 1 } else { 2 }\nput x"), vec!["2"]);
    assert_eq!(printed("put {\n  1\n  2\n}"), vec!["2"]);
}

#[test]
fn char_has_no_truth_value() {
    assert_eq!(
        runtime_failure("if 'a' {\n  put 1\n}"),
        RuntimeErrorKind::TruthyNotImplemented
    );
}

// ============================================================================
// Output and program values
// ============================================================================

#[test]
fn put_expands_escapes() {
    assert_eq!(printed("put \"a\\tb\\nc\""), vec!["a\tb\nc"]);
}

#[test]
fn program_value_is_last_statement() {
    assert_eq!(runner::execute("1 + 1").unwrap(), Value::Int(2));
    assert_eq!(runner::execute("let x = 1").unwrap(), Value::Nil);
}

#[test]
fn unsupported_constructs_fail_at_runtime() {
    assert_eq!(runtime_failure("<! 1"), RuntimeErrorKind::NotImplemented);
    assert_eq!(runtime_failure("1..3"), RuntimeErrorKind::NotImplemented);
    assert_eq!(runtime_failure("[int: 2][1, 2]"), RuntimeErrorKind::NotImplemented);
}

#[test]
fn diagnostics_render_against_source() {
    let source = "let a = 1\nput nope\n";
    let error = runner::execute(source).unwrap_err();
    assert_eq!(error.line, 2);

    let rendered = error.render(source, Some("test.ne"));
    assert!(rendered.contains("variable nope not found"));
    assert!(rendered.contains("test.ne"));
}

// ============================================================================
// Nesting
// ============================================================================

#[test]
fn deeply_nested_groups_evaluate() {
    let source = "(".repeat(100) + "1" + &")".repeat(100);
    assert_eq!(runner::execute(&source).unwrap(), Value::Int(1));
}

#[test]
fn deeply_nested_blocks_evaluate() {
    let source = "{\n".repeat(100) + "put 7\n" + &"}\n".repeat(100);
    assert_eq!(printed(&source), vec!["7"]);
}

#[test]
fn nesting_past_the_limit_is_a_parse_error() {
    let groups = "(".repeat(300) + "1" + &")".repeat(300);
    let error = runner::execute(&groups).unwrap_err();
    assert_eq!(error.parse_kind(), Some(ParseErrorKind::NestingTooDeep));

    let blocks = "{\n".repeat(300) + "1\n" + &"}\n".repeat(300);
    let error = runner::execute(&blocks).unwrap_err();
    assert_eq!(error.parse_kind(), Some(ParseErrorKind::NestingTooDeep));
    assert_eq!(error.message, "expression nested too deeply");
}

#[test]
fn unclosed_block_in_a_file_expects_brace() {
    let (result, lines) = run("if true {\nput 1\n");
    let error = result.unwrap_err();
    assert_eq!(error.parse_kind(), Some(ParseErrorKind::ExpectedToken));
    assert!(error.message.contains("expected '}' after block"));
    assert!(lines.is_empty());
}
