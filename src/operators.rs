use crate::ast::{BinaryOp, OpFamily, UnaryOp};
use crate::error::{NeonError, RuntimeErrorKind};
use crate::lexer::Token;
use crate::value::{TypeTag, Value};

/// Both operands converted to one common representation.
#[derive(Debug, Clone, PartialEq)]
pub enum Promoted {
    Bool(bool, bool),
    Char(char, char),
    Int(i64, i64),
    Uint(u64, u64),
    Float(f64, f64),
    Str(String, String),
}

/// Brings two operands to a common type. Bool widens to any number, int and
/// uint widen to float, char joins a string. Mixing int with uint is only
/// allowed when `accept_uint` is set.
pub fn promote(left: &Value, right: &Value, accept_uint: bool) -> Option<Promoted> {
    use Value::*;

    let promoted = match (left, right) {
        (Bool(a), Bool(b)) => Promoted::Bool(*a, *b),
        (Bool(a), Int(b)) => Promoted::Int(*a as i64, *b),
        (Bool(a), Uint(b)) => Promoted::Uint(*a as u64, *b),
        (Bool(a), Float(b)) => Promoted::Float(bool_to_float(*a), *b),

        (Char(a), Char(b)) => Promoted::Char(*a, *b),
        (Char(a), String(b)) => Promoted::Str(a.to_string(), b.clone()),

        (Int(a), Bool(b)) => Promoted::Int(*a, *b as i64),
        (Int(a), Int(b)) => Promoted::Int(*a, *b),
        (Int(a), Uint(b)) if accept_uint => Promoted::Uint(*a as u64, *b),
        (Int(a), Float(b)) => Promoted::Float(*a as f64, *b),

        (Uint(a), Bool(b)) => Promoted::Uint(*a, *b as u64),
        (Uint(a), Int(b)) if accept_uint => Promoted::Uint(*a, *b as u64),
        (Uint(a), Uint(b)) => Promoted::Uint(*a, *b),
        (Uint(a), Float(b)) => Promoted::Float(*a as f64, *b),

        (Float(a), Bool(b)) => Promoted::Float(*a, bool_to_float(*b)),
        (Float(a), Int(b)) => Promoted::Float(*a, *b as f64),
        (Float(a), Uint(b)) => Promoted::Float(*a, *b as f64),
        (Float(a), Float(b)) => Promoted::Float(*a, *b),

        (String(a), Char(b)) => Promoted::Str(a.clone(), b.to_string()),
        (String(a), String(b)) => Promoted::Str(a.clone(), b.clone()),

        _ => return None,
    };

    Some(promoted)
}

fn bool_to_float(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}

/// Lenient shift amount: negative or fractional values count as zero.
pub fn to_uint(value: &Value) -> u64 {
    match value {
        Value::Int(n) if *n >= 0 => *n as u64,
        Value::Uint(n) => *n,
        Value::Float(f) if *f >= 0.0 && f.fract() == 0.0 => *f as u64,
        Value::Bool(b) => *b as u64,
        _ => 0,
    }
}

pub fn binary(op: BinaryOp, left: &Value, right: &Value, token: &Token) -> Result<Value, NeonError> {
    match op.family() {
        OpFamily::Term | OpFamily::Factor | OpFamily::Power => arithmetic(op, left, right, token),
        OpFamily::Bitwise => bitwise(op, left, right, token),
        OpFamily::Bitshift => bitshift(op, left, right, token),
        OpFamily::Comparison => comparison(op, left, right, token),
        OpFamily::Equality => equality(op, left, right, token),
        OpFamily::Logic => logic(op, left, right, token),
    }
}

fn arithmetic(op: BinaryOp, left: &Value, right: &Value, token: &Token) -> Result<Value, NeonError> {
    let promoted = promote(left, right, false).ok_or_else(|| invalid_operands(op, left, right, token))?;

    match promoted {
        Promoted::Int(a, b) => match op {
            BinaryOp::Add => Ok(Value::Int(a.wrapping_add(b))),
            BinaryOp::Subtract => Ok(Value::Int(a.wrapping_sub(b))),
            BinaryOp::Multiply => Ok(Value::Int(a.wrapping_mul(b))),
            BinaryOp::Divide if b == 0 => Err(division_by_zero(token)),
            BinaryOp::Divide => Ok(Value::Int(a.wrapping_div(b))),
            BinaryOp::Modulo if b == 0 => Err(division_by_zero(token)),
            BinaryOp::Modulo => Ok(Value::Int(a.wrapping_rem(b))),
            BinaryOp::Power => Ok(Value::Int((a as f64).powf(b as f64) as i64)),
            _ => Err(unsupported(op, "int", token)),
        },
        Promoted::Uint(a, b) => match op {
            BinaryOp::Add => Ok(Value::Uint(a.wrapping_add(b))),
            BinaryOp::Subtract => Ok(Value::Uint(a.wrapping_sub(b))),
            BinaryOp::Multiply => Ok(Value::Uint(a.wrapping_mul(b))),
            BinaryOp::Divide if b == 0 => Err(division_by_zero(token)),
            BinaryOp::Divide => Ok(Value::Uint(a / b)),
            BinaryOp::Modulo if b == 0 => Err(division_by_zero(token)),
            BinaryOp::Modulo => Ok(Value::Uint(a % b)),
            BinaryOp::Power => Ok(Value::Uint((a as f64).powf(b as f64) as u64)),
            _ => Err(unsupported(op, "uint", token)),
        },
        Promoted::Float(a, b) => match op {
            BinaryOp::Add => Ok(Value::Float(a + b)),
            BinaryOp::Subtract => Ok(Value::Float(a - b)),
            BinaryOp::Multiply => Ok(Value::Float(a * b)),
            BinaryOp::Divide => Ok(Value::Float(a / b)),
            BinaryOp::Power => Ok(Value::Float(a.powf(b))),
            _ => Err(unsupported(op, "float", token)),
        },
        Promoted::Str(a, b) => match op {
            BinaryOp::Add => Ok(Value::String(a + &b)),
            _ => Err(unsupported(op, "string", token)),
        },
        Promoted::Bool(..) => Err(unsupported(op, "bool", token)),
        Promoted::Char(..) => Err(unsupported(op, "char", token)),
    }
}

fn bitwise(op: BinaryOp, left: &Value, right: &Value, token: &Token) -> Result<Value, NeonError> {
    let promoted = promote(left, right, false).ok_or_else(|| invalid_operands(op, left, right, token))?;

    match promoted {
        Promoted::Bool(a, b) => {
            let result = match op {
                BinaryOp::BitAnd => a && b,
                BinaryOp::BitOr => a || b,
                BinaryOp::BitXor => a ^ b,
                BinaryOp::BitNand => !(a && b),
                BinaryOp::BitNor => !(a || b),
                BinaryOp::BitXnor => !(a ^ b),
                _ => return Err(unsupported(op, "bool", token)),
            };
            Ok(Value::Bool(result))
        }
        Promoted::Int(a, b) => {
            let result = match op {
                BinaryOp::BitAnd => a & b,
                BinaryOp::BitOr => a | b,
                BinaryOp::BitXor => a ^ b,
                BinaryOp::BitNand => !(a & b),
                BinaryOp::BitNor => !(a | b),
                BinaryOp::BitXnor => !(a ^ b),
                _ => return Err(unsupported(op, "int", token)),
            };
            Ok(Value::Int(result))
        }
        Promoted::Uint(a, b) => {
            let result = match op {
                BinaryOp::BitAnd => a & b,
                BinaryOp::BitOr => a | b,
                BinaryOp::BitXor => a ^ b,
                BinaryOp::BitNand => !(a & b),
                BinaryOp::BitNor => !(a | b),
                BinaryOp::BitXnor => !(a ^ b),
                _ => return Err(unsupported(op, "uint", token)),
            };
            Ok(Value::Uint(result))
        }
        Promoted::Float(..) => Err(runtime(token, "cannot bitwise float".to_string())),
        Promoted::Str(..) => Err(runtime(token, "cannot bitwise strings".to_string())),
        Promoted::Char(..) => Err(runtime(token, "cannot bitwise char".to_string())),
    }
}

/// Shifts keep the type of the left operand; the right one only supplies
/// the amount.
fn bitshift(op: BinaryOp, left: &Value, right: &Value, token: &Token) -> Result<Value, NeonError> {
    if promote(left, right, true).is_none() {
        return Err(invalid_operands(op, left, right, token));
    }

    let amount = to_uint(right);
    let rotation = (amount % 64) as u32;

    match left {
        Value::Int(a) => {
            let a = *a;
            let result = match op {
                BinaryOp::ShiftLeft if amount >= 64 => 0,
                BinaryOp::ShiftLeft => a << amount,
                BinaryOp::ShiftRight if amount >= 64 => {
                    if a < 0 {
                        -1
                    } else {
                        0
                    }
                }
                BinaryOp::ShiftRight => a >> amount,
                BinaryOp::RotateLeft => (a as u64).rotate_left(rotation) as i64,
                BinaryOp::RotateRight => (a as u64).rotate_right(rotation) as i64,
                _ => return Err(unsupported(op, "int", token)),
            };
            Ok(Value::Int(result))
        }
        Value::Uint(a) => {
            let a = *a;
            let result = match op {
                BinaryOp::ShiftLeft | BinaryOp::ShiftRight if amount >= 64 => 0,
                BinaryOp::ShiftLeft => a << amount,
                BinaryOp::ShiftRight => a >> amount,
                BinaryOp::RotateLeft => a.rotate_left(rotation),
                BinaryOp::RotateRight => a.rotate_right(rotation),
                _ => return Err(unsupported(op, "uint", token)),
            };
            Ok(Value::Uint(result))
        }
        other => {
            let verb = match op {
                BinaryOp::RotateLeft | BinaryOp::RotateRight => "roundshift",
                _ => "bitshift",
            };
            Err(runtime(token, format!("cannot {} {}", verb, other.value_type())))
        }
    }
}

fn comparison(op: BinaryOp, left: &Value, right: &Value, token: &Token) -> Result<Value, NeonError> {
    let promoted = promote(left, right, true).ok_or_else(|| invalid_operands(op, left, right, token))?;

    let result = match promoted {
        Promoted::Bool(a, b) => ordered(op, a as u8, b as u8),
        Promoted::Char(a, b) => ordered(op, a, b),
        Promoted::Int(a, b) => ordered(op, a, b),
        Promoted::Uint(a, b) => ordered(op, a, b),
        Promoted::Float(a, b) => ordered(op, a, b),
        Promoted::Str(..) => return Err(runtime(token, "cannot direct compare strings".to_string())),
    };

    Ok(Value::Bool(result))
}

fn ordered<T: PartialOrd>(op: BinaryOp, a: T, b: T) -> bool {
    match op {
        BinaryOp::Greater => a > b,
        BinaryOp::GreaterEqual => a >= b,
        BinaryOp::Less => a < b,
        _ => a <= b,
    }
}

fn equality(op: BinaryOp, left: &Value, right: &Value, token: &Token) -> Result<Value, NeonError> {
    let equal = if left.is_nil() || right.is_nil() {
        left.is_nil() && right.is_nil()
    } else {
        match promote(left, right, true).ok_or_else(|| invalid_operands(op, left, right, token))? {
            Promoted::Bool(a, b) => a == b,
            Promoted::Char(a, b) => a == b,
            Promoted::Int(a, b) => a == b,
            Promoted::Uint(a, b) => a == b,
            Promoted::Float(a, b) => a == b,
            Promoted::Str(a, b) => a == b,
        }
    };

    match op {
        BinaryOp::NotEqual => Ok(Value::Bool(!equal)),
        _ => Ok(Value::Bool(equal)),
    }
}

/// Both sides are already evaluated; numbers count as true when non-zero.
fn logic(op: BinaryOp, left: &Value, right: &Value, token: &Token) -> Result<Value, NeonError> {
    let promoted = promote(left, right, false).ok_or_else(|| invalid_operands(op, left, right, token))?;

    let (a, b) = match promoted {
        Promoted::Bool(a, b) => (a, b),
        Promoted::Int(a, b) => (a != 0, b != 0),
        Promoted::Uint(a, b) => (a != 0, b != 0),
        Promoted::Float(a, b) => (a != 0.0, b != 0.0),
        Promoted::Str(..) => return Err(runtime(token, "cannot use string as logic value".to_string())),
        Promoted::Char(..) => return Err(runtime(token, "cannot use char as logic value".to_string())),
    };

    match op {
        BinaryOp::Or => Ok(Value::Bool(a || b)),
        _ => Ok(Value::Bool(a && b)),
    }
}

pub fn unary(op: UnaryOp, value: &Value, token: &Token) -> Result<Value, NeonError> {
    match op {
        UnaryOp::Not => match value {
            Value::Bool(b) => Ok(Value::Bool(!b)),
            Value::Int(n) => Ok(Value::Bool(*n == 0)),
            Value::Uint(n) => Ok(Value::Bool(*n == 0)),
            Value::Float(n) => Ok(Value::Bool(*n == 0.0)),
            Value::String(s) => Err(runtime(
                token,
                format!("expect number after !, received string: \"{}\"", s),
            )),
            other => Err(runtime(token, format!("expect number after !, received: {}", other))),
        },
        UnaryOp::BitNot => match value {
            Value::Int(n) => Ok(Value::Int(!n)),
            Value::Bool(b) => Ok(Value::Bool(!b)),
            Value::Float(_) => Err(runtime(token, "operator ~ not defined on float".to_string())),
            other => Err(runtime(
                token,
                format!("operator ~ not defined on {}", other.value_type()),
            )),
        },
        UnaryOp::Plus => match value {
            Value::Int(_) | Value::Uint(_) | Value::Float(_) => Ok(value.clone()),
            other => Err(runtime(
                token,
                format!("operator + not defined on {}", other.value_type()),
            )),
        },
        UnaryOp::Negate => match value {
            Value::Int(n) => Ok(Value::Int(n.wrapping_neg())),
            Value::Float(n) => Ok(Value::Float(-n)),
            other => Err(runtime(
                token,
                format!("operator - not defined on {}", other.value_type()),
            )),
        },
        UnaryOp::GoIn => Err(NeonError::runtime_error(
            RuntimeErrorKind::NotImplemented,
            token,
            "parallelism not yet implemented".to_string(),
        )),
    }
}

pub fn cast(value: &Value, target: TypeTag, token: &Token) -> Result<Value, NeonError> {
    let converted = match (target, value) {
        (TypeTag::Bool, Value::Bool(b)) => Some(Value::Bool(*b)),
        (TypeTag::Bool, Value::Int(n)) => Some(Value::Bool(*n != 0)),
        (TypeTag::Bool, Value::Uint(n)) => Some(Value::Bool(*n != 0)),
        (TypeTag::Bool, Value::Float(n)) => Some(Value::Bool(*n != 0.0)),
        (TypeTag::Bool, Value::String(s)) => Some(Value::Bool(!s.is_empty())),

        (TypeTag::Int, Value::Bool(b)) => Some(Value::Int(*b as i64)),
        (TypeTag::Int, Value::Int(n)) => Some(Value::Int(*n)),
        (TypeTag::Int, Value::Uint(n)) => Some(Value::Int(*n as i64)),
        (TypeTag::Int, Value::Float(n)) => Some(Value::Int(*n as i64)),

        (TypeTag::Uint, Value::Bool(b)) => Some(Value::Uint(*b as u64)),
        (TypeTag::Uint, Value::Int(n)) => Some(Value::Uint(*n as u64)),
        (TypeTag::Uint, Value::Uint(n)) => Some(Value::Uint(*n)),
        (TypeTag::Uint, Value::Float(n)) => Some(Value::Uint(*n as u64)),

        (TypeTag::Float, Value::Bool(b)) => Some(Value::Float(bool_to_float(*b))),
        (TypeTag::Float, Value::Int(n)) => Some(Value::Float(*n as f64)),
        (TypeTag::Float, Value::Uint(n)) => Some(Value::Float(*n as f64)),
        (TypeTag::Float, Value::Float(n)) => Some(Value::Float(*n)),

        (TypeTag::String, Value::Bool(b)) => {
            Some(Value::String(if *b { "true" } else { "false" }.to_string()))
        }
        (TypeTag::String, other) => Some(Value::String(other.to_string())),

        (TypeTag::Char, Value::Char(c)) => Some(Value::Char(*c)),
        (TypeTag::Char, Value::Int(n)) => u32::try_from(*n).ok().and_then(char::from_u32).map(Value::Char),

        _ => None,
    };

    converted.ok_or_else(|| {
        let message = if target.is_valid_declaration() {
            format!("cannot convert {} to {}", value.value_type(), target)
        } else {
            format!("cannot cast to {}", target)
        };
        NeonError::runtime_error_with_help(
            RuntimeErrorKind::InvalidCast,
            token,
            message,
            "casts support int, uint, float, bool, char and string".to_string(),
        )
    })
}

fn runtime(token: &Token, message: String) -> NeonError {
    NeonError::runtime_error(RuntimeErrorKind::UnsupportedOperation, token, message)
}

fn unsupported(op: BinaryOp, type_name: &str, token: &Token) -> NeonError {
    runtime(token, format!("operator {} not defined on {}", op, type_name))
}

fn invalid_operands(op: BinaryOp, left: &Value, right: &Value, token: &Token) -> NeonError {
    NeonError::runtime_error(
        RuntimeErrorKind::InvalidOperands,
        token,
        format!(
            "invalid operands for {}: {} and {}",
            op,
            left.value_type(),
            right.value_type()
        ),
    )
}

fn division_by_zero(token: &Token) -> NeonError {
    NeonError::runtime_error(RuntimeErrorKind::DivisionByZero, token, "division by zero".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Span;
    use crate::lexer::TokenType;

    fn op_token() -> Token {
        Token::new(TokenType::Plus, "+".to_string(), None, 1, 1, Span::new(0, 1))
    }

    fn eval(op: BinaryOp, left: Value, right: Value) -> Result<Value, NeonError> {
        binary(op, &left, &right, &op_token())
    }

    #[test]
    fn promotion_lattice() {
        assert_eq!(
            promote(&Value::Bool(true), &Value::Int(4), false),
            Some(Promoted::Int(1, 4))
        );
        assert_eq!(
            promote(&Value::Int(2), &Value::Float(0.5), false),
            Some(Promoted::Float(2.0, 0.5))
        );
        assert_eq!(
            promote(&Value::Char('a'), &Value::String("b".to_string()), false),
            Some(Promoted::Str("a".to_string(), "b".to_string()))
        );
        assert_eq!(promote(&Value::Int(1), &Value::Uint(1), false), None);
        assert_eq!(
            promote(&Value::Int(1), &Value::Uint(1), true),
            Some(Promoted::Uint(1, 1))
        );
        assert_eq!(promote(&Value::Nil, &Value::Int(1), true), None);
    }

    #[test]
    fn integer_division_by_zero_fails_but_float_does_not() {
        let error = eval(BinaryOp::Divide, Value::Int(1), Value::Int(0)).unwrap_err();
        assert_eq!(error.runtime_kind(), Some(RuntimeErrorKind::DivisionByZero));
        let error = eval(BinaryOp::Modulo, Value::Uint(1), Value::Uint(0)).unwrap_err();
        assert_eq!(error.runtime_kind(), Some(RuntimeErrorKind::DivisionByZero));

        match eval(BinaryOp::Divide, Value::Float(5.0), Value::Float(0.0)).unwrap() {
            Value::Float(f) => assert!(f.is_infinite()),
            other => panic!("expected float, got {:?}", other),
        }
    }

    #[test]
    fn float_modulo_is_rejected() {
        let error = eval(BinaryOp::Modulo, Value::Float(5.0), Value::Float(2.0)).unwrap_err();
        assert_eq!(error.runtime_kind(), Some(RuntimeErrorKind::UnsupportedOperation));
    }

    #[test]
    fn power_truncates_to_integer() {
        assert_eq!(eval(BinaryOp::Power, Value::Int(2), Value::Int(10)).unwrap(), Value::Int(1024));
        assert_eq!(eval(BinaryOp::Power, Value::Int(2), Value::Int(-1)).unwrap(), Value::Int(0));
    }

    #[test]
    fn arithmetic_wraps() {
        assert_eq!(
            eval(BinaryOp::Add, Value::Int(i64::MAX), Value::Int(1)).unwrap(),
            Value::Int(i64::MIN)
        );
    }

    #[test]
    fn strings_concatenate_with_chars() {
        assert_eq!(
            eval(BinaryOp::Add, Value::String("ab".to_string()), Value::Char('c')).unwrap(),
            Value::String("abc".to_string())
        );
    }

    #[test]
    fn bitwise_on_bools_is_logical() {
        assert_eq!(
            eval(BinaryOp::BitNand, Value::Bool(true), Value::Bool(true)).unwrap(),
            Value::Bool(false)
        );
        assert_eq!(eval(BinaryOp::BitXor, Value::Int(6), Value::Int(3)).unwrap(), Value::Int(5));
        assert!(eval(BinaryOp::BitAnd, Value::Float(1.0), Value::Float(1.0)).is_err());
    }

    #[test]
    fn shifts_and_rotations() {
        assert_eq!(eval(BinaryOp::ShiftLeft, Value::Int(1), Value::Int(4)).unwrap(), Value::Int(16));
        assert_eq!(eval(BinaryOp::ShiftLeft, Value::Int(1), Value::Int(-3)).unwrap(), Value::Int(1));
        assert_eq!(eval(BinaryOp::ShiftLeft, Value::Int(1), Value::Int(70)).unwrap(), Value::Int(0));
        assert_eq!(eval(BinaryOp::ShiftRight, Value::Int(-8), Value::Int(99)).unwrap(), Value::Int(-1));
        assert_eq!(
            eval(BinaryOp::RotateLeft, Value::Uint(1 << 63), Value::Uint(1)).unwrap(),
            Value::Uint(1)
        );
        assert_eq!(
            eval(BinaryOp::RotateRight, Value::Int(1), Value::Int(1)).unwrap(),
            Value::Int(i64::MIN)
        );
        assert!(eval(BinaryOp::ShiftLeft, Value::Float(1.0), Value::Int(1)).is_err());
    }

    #[test]
    fn strings_cannot_be_ordered() {
        let error = eval(
            BinaryOp::Less,
            Value::String("a".to_string()),
            Value::String("b".to_string()),
        )
        .unwrap_err();
        assert_eq!(error.message, "cannot direct compare strings");
        assert_eq!(
            eval(
                BinaryOp::Equal,
                Value::String("a".to_string()),
                Value::String("a".to_string())
            )
            .unwrap(),
            Value::Bool(true)
        );
    }

    #[test]
    fn comparison_accepts_mixed_signedness() {
        assert_eq!(eval(BinaryOp::Less, Value::Int(1), Value::Uint(2)).unwrap(), Value::Bool(true));
        assert!(eval(BinaryOp::Add, Value::Int(1), Value::Uint(2)).is_err());
    }

    #[test]
    fn nil_equality_compares_nilness() {
        assert_eq!(eval(BinaryOp::Equal, Value::Nil, Value::Nil).unwrap(), Value::Bool(true));
        assert_eq!(eval(BinaryOp::NotEqual, Value::Nil, Value::Int(0)).unwrap(), Value::Bool(true));
    }

    #[test]
    fn logic_uses_truthiness() {
        assert_eq!(eval(BinaryOp::And, Value::Bool(true), Value::Bool(false)).unwrap(), Value::Bool(false));
        assert_eq!(eval(BinaryOp::Or, Value::Int(0), Value::Int(5)).unwrap(), Value::Bool(true));
        assert!(eval(BinaryOp::Or, Value::String("a".to_string()), Value::String("b".to_string())).is_err());
    }

    #[test]
    fn unary_operators() {
        let token = op_token();
        assert_eq!(unary(UnaryOp::Not, &Value::Int(0), &token).unwrap(), Value::Bool(true));
        assert_eq!(unary(UnaryOp::BitNot, &Value::Int(0), &token).unwrap(), Value::Int(-1));
        assert_eq!(unary(UnaryOp::Negate, &Value::Float(2.5), &token).unwrap(), Value::Float(-2.5));
        assert!(unary(UnaryOp::Negate, &Value::Bool(true), &token).is_err());
        let error = unary(UnaryOp::GoIn, &Value::Int(1), &token).unwrap_err();
        assert_eq!(error.runtime_kind(), Some(RuntimeErrorKind::NotImplemented));
        assert_eq!(error.message, "parallelism not yet implemented");
    }

    #[test]
    fn cast_table() {
        let token = op_token();
        assert_eq!(cast(&Value::Float(3.9), TypeTag::Int, &token).unwrap(), Value::Int(3));
        assert_eq!(
            cast(&Value::Bool(false), TypeTag::String, &token).unwrap(),
            Value::String("false".to_string())
        );
        assert_eq!(
            cast(&Value::String(String::new()), TypeTag::Bool, &token).unwrap(),
            Value::Bool(false)
        );
        assert_eq!(cast(&Value::Int(65), TypeTag::Char, &token).unwrap(), Value::Char('A'));
        let error = cast(&Value::String("1".to_string()), TypeTag::Int, &token).unwrap_err();
        assert_eq!(error.runtime_kind(), Some(RuntimeErrorKind::InvalidCast));
        let error = cast(&Value::Int(1), TypeTag::I8, &token).unwrap_err();
        assert_eq!(error.runtime_kind(), Some(RuntimeErrorKind::InvalidCast));
    }
}
