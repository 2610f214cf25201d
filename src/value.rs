use crate::error::{NeonError, RuntimeErrorKind};
use crate::lexer::{Token, TokenType};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Nil,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Char(char),
    String(String),
    /// A type keyword used as the right operand of a cast
    Type(TypeTag),
}

/// Runtime type of a value, as locked into a variable on first assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Bool,
    Char,
    Int,
    Uint,
    Float,
    String,
    Nil,
    Type,
    Undefined,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            ValueType::Bool => "bool",
            ValueType::Char => "char",
            ValueType::Int => "int",
            ValueType::Uint => "uint",
            ValueType::Float => "float",
            ValueType::String => "string",
            ValueType::Nil => "nil",
            ValueType::Type => "type",
            ValueType::Undefined => "undefined",
        };
        write!(f, "{}", name)
    }
}

/// Type keywords as they appear in source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeTag {
    Int,
    I8,
    I16,
    I32,
    I64,
    Uint,
    U8,
    U16,
    U32,
    U64,
    Float,
    F32,
    F64,
    Bool,
    Char,
    String,
    Byte,
    Any,
}

impl TypeTag {
    pub fn from_token_type(token_type: TokenType) -> Option<TypeTag> {
        let tag = match token_type {
            TokenType::Int => TypeTag::Int,
            TokenType::I8 => TypeTag::I8,
            TokenType::I16 => TypeTag::I16,
            TokenType::I32 => TypeTag::I32,
            TokenType::I64 => TypeTag::I64,
            TokenType::Uint => TypeTag::Uint,
            TokenType::U8 => TypeTag::U8,
            TokenType::U16 => TypeTag::U16,
            TokenType::U32 => TypeTag::U32,
            TokenType::U64 => TypeTag::U64,
            TokenType::Float => TypeTag::Float,
            TokenType::F32 => TypeTag::F32,
            TokenType::F64 => TypeTag::F64,
            TokenType::Bool => TypeTag::Bool,
            TokenType::Char => TypeTag::Char,
            TokenType::String => TypeTag::String,
            TokenType::Byte => TypeTag::Byte,
            TokenType::Any => TypeTag::Any,
            _ => return None,
        };
        Some(tag)
    }

    /// The runtime type a value of this tag holds, for the primitive tags.
    pub fn value_type(&self) -> Option<ValueType> {
        match self {
            TypeTag::Int => Some(ValueType::Int),
            TypeTag::Uint => Some(ValueType::Uint),
            TypeTag::Float => Some(ValueType::Float),
            TypeTag::Bool => Some(ValueType::Bool),
            TypeTag::Char => Some(ValueType::Char),
            TypeTag::String => Some(ValueType::String),
            _ => None,
        }
    }

    /// Whether a `let` annotation may name this type.
    pub fn is_valid_declaration(&self) -> bool {
        self.value_type().is_some()
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            TypeTag::Int => "int",
            TypeTag::I8 => "i8",
            TypeTag::I16 => "i16",
            TypeTag::I32 => "i32",
            TypeTag::I64 => "i64",
            TypeTag::Uint => "uint",
            TypeTag::U8 => "u8",
            TypeTag::U16 => "u16",
            TypeTag::U32 => "u32",
            TypeTag::U64 => "u64",
            TypeTag::Float => "float",
            TypeTag::F32 => "f32",
            TypeTag::F64 => "f64",
            TypeTag::Bool => "bool",
            TypeTag::Char => "char",
            TypeTag::String => "string",
            TypeTag::Byte => "byte",
            TypeTag::Any => "any",
        };
        write!(f, "{}", name)
    }
}

impl Value {
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Nil => ValueType::Nil,
            Value::Bool(_) => ValueType::Bool,
            Value::Int(_) => ValueType::Int,
            Value::Uint(_) => ValueType::Uint,
            Value::Float(_) => ValueType::Float,
            Value::Char(_) => ValueType::Char,
            Value::String(_) => ValueType::String,
            Value::Type(_) => ValueType::Type,
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Coerces the value for conditionals. `token` positions the error for
    /// values that have no truth value.
    pub fn truthy(&self, token: &Token) -> Result<bool, NeonError> {
        match self {
            Value::Nil => Ok(false),
            Value::Bool(b) => Ok(*b),
            Value::Int(n) => Ok(*n != 0),
            Value::Uint(n) => Ok(*n != 0),
            Value::Float(n) => Ok(*n != 0.0),
            Value::String(s) => Ok(!s.is_empty()),
            Value::Char(_) | Value::Type(_) => Err(NeonError::runtime_error(
                RuntimeErrorKind::TruthyNotImplemented,
                token,
                format!("no truth value defined for {}", self.value_type()),
            )),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Uint(n) => write!(f, "{}", n),
            Value::Float(n) => {
                if n.is_nan() {
                    write!(f, "NaN")
                } else if n.is_infinite() {
                    write!(f, "{}Inf", if *n > 0.0 { "+" } else { "-" })
                } else if n.fract() == 0.0 {
                    // Always show at least one decimal place for floats
                    write!(f, "{:.1}", n)
                } else {
                    write!(f, "{}", n)
                }
            }
            Value::Char(c) => write!(f, "{}", c),
            Value::String(s) => write!(f, "{}", s),
            Value::Type(tag) => write!(f, "{}", tag),
        }
    }
}
