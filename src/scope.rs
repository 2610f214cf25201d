use crate::ast::LetStmt;
use crate::error::{NeonError, RuntimeErrorKind};
use crate::lexer::Token;
use crate::value::{Value, ValueType};
use log::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeId(usize);

#[derive(Debug, Clone)]
pub struct Variable {
    pub value: Value,
    pub value_type: ValueType,
    /// Set once the type is locked, by annotation or by the first non-nil value.
    pub type_defined: bool,
    pub mutable: bool,
    pub nullable: bool,
    pub initialized: bool,
}

/// Result of a successful lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct Lookup {
    pub value_type: ValueType,
    pub value: Value,
    pub initialized: bool,
}

#[derive(Debug)]
struct Frame {
    /// Most recent binding last; an earlier binding of the same name is shadowed.
    bindings: Vec<(String, Variable)>,
    parent: Option<ScopeId>,
}

/// Owns every scope frame. Children link to their parent by id, and frames
/// are released in the reverse order they were pushed.
#[derive(Debug)]
pub struct ScopeArena {
    frames: Vec<Frame>,
}

impl Default for ScopeArena {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeArena {
    pub fn new() -> Self {
        Self {
            frames: vec![Frame {
                bindings: Vec::new(),
                parent: None,
            }],
        }
    }

    pub fn root(&self) -> ScopeId {
        ScopeId(0)
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn push(&mut self, parent: ScopeId) -> ScopeId {
        self.frames.push(Frame {
            bindings: Vec::new(),
            parent: Some(parent),
        });
        let id = ScopeId(self.frames.len() - 1);
        trace!("pushed scope {} (parent {})", id.0, parent.0);
        id
    }

    /// Drops `scope` and anything pushed after it. The root is never released.
    pub fn release(&mut self, scope: ScopeId) {
        if scope.0 > 0 && scope.0 < self.frames.len() {
            self.frames.truncate(scope.0);
            trace!("released scope {}", scope.0);
        }
    }

    pub fn define(&mut self, scope: ScopeId, decl: &LetStmt, value_type: ValueType, value: Option<Value>) {
        let type_defined = !matches!(value_type, ValueType::Undefined | ValueType::Nil);
        let variable = Variable {
            initialized: value.is_some(),
            value: value.unwrap_or(Value::Nil),
            value_type,
            type_defined,
            mutable: decl.mutable,
            nullable: decl.nullable,
        };

        debug!(
            "define {} in scope {}: {} (mutable: {}, nullable: {})",
            decl.name.lexeme, scope.0, value_type, decl.mutable, decl.nullable
        );

        if let Some(frame) = self.frames.get_mut(scope.0) {
            frame.bindings.push((decl.name.lexeme.clone(), variable));
        }
    }

    pub fn get(&self, scope: ScopeId, name: &Token) -> Result<Lookup, NeonError> {
        let (frame, index) = self.find(scope, &name.lexeme).ok_or_else(|| not_found(name))?;
        let variable = &self.frames[frame].bindings[index].1;

        Ok(Lookup {
            value_type: variable.value_type,
            value: variable.value.clone(),
            initialized: variable.initialized,
        })
    }

    /// Assigns through the nearest binding of `target`; never creates one.
    /// A type mismatch is reported ahead of immutability.
    pub fn set(&mut self, scope: ScopeId, target: &Token, value: Value) -> Result<Value, NeonError> {
        let (frame, index) = self.find(scope, &target.lexeme).ok_or_else(|| not_found(target))?;
        let variable = &mut self.frames[frame].bindings[index].1;

        let found = value.value_type();
        if !value.is_nil() && variable.type_defined && variable.value_type != found {
            return Err(NeonError::runtime_error(
                RuntimeErrorKind::TypeMismatch,
                target,
                format!(
                    "expected type to assign: {}, found: {}",
                    variable.value_type, found
                ),
            ));
        }

        if variable.initialized && !variable.mutable {
            return Err(NeonError::runtime_error_with_help(
                RuntimeErrorKind::Immutable,
                target,
                format!("cannot assign because {} is immutable", target.lexeme),
                format!("declare it with 'let! {}' to allow reassignment", target.lexeme),
            ));
        }

        if value.is_nil() && !variable.nullable {
            return Err(NeonError::runtime_error_with_help(
                RuntimeErrorKind::NilNotAllowed,
                target,
                format!("{} cannot be set to nil", target.lexeme),
                format!("declare it with 'let? {}' to allow nil", target.lexeme),
            ));
        }

        // nil leaves a locked type in place
        if !value.is_nil() {
            variable.value_type = found;
            variable.type_defined = true;
        }

        variable.initialized = true;
        variable.value = value.clone();
        trace!("set {} = {}", target.lexeme, value);

        Ok(value)
    }

    fn find(&self, scope: ScopeId, name: &str) -> Option<(usize, usize)> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let frame = self.frames.get(id.0)?;
            if let Some(index) = frame.bindings.iter().rposition(|(n, _)| n == name) {
                return Some((id.0, index));
            }
            current = frame.parent;
        }
        None
    }
}

fn not_found(name: &Token) -> NeonError {
    NeonError::runtime_error(
        RuntimeErrorKind::NotFound,
        name,
        format!("variable {} not found", name.lexeme),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Span;
    use crate::lexer::TokenType;

    fn ident(name: &str) -> Token {
        Token::new(
            TokenType::Identifier,
            name.to_string(),
            None,
            1,
            1,
            Span::new(0, name.len()),
        )
    }

    fn decl(name: &str, mutable: bool, nullable: bool) -> LetStmt {
        LetStmt {
            name: ident(name),
            mutable,
            nullable,
            declared: None,
            initializer: None,
        }
    }

    #[test]
    fn same_scope_shadowing_keeps_latest() {
        let mut arena = ScopeArena::new();
        let root = arena.root();
        arena.define(root, &decl("x", false, false), ValueType::Int, Some(Value::Int(5)));
        arena.define(root, &decl("x", false, false), ValueType::Int, Some(Value::Int(6)));
        assert_eq!(arena.get(root, &ident("x")).unwrap().value, Value::Int(6));
    }

    #[test]
    fn child_reads_parent_and_is_released() {
        let mut arena = ScopeArena::new();
        let root = arena.root();
        arena.define(root, &decl("outer", false, false), ValueType::Int, Some(Value::Int(1)));

        let child = arena.push(root);
        arena.define(child, &decl("inner", false, false), ValueType::Int, Some(Value::Int(2)));
        assert_eq!(arena.get(child, &ident("outer")).unwrap().value, Value::Int(1));
        assert_eq!(arena.depth(), 2);

        arena.release(child);
        assert_eq!(arena.depth(), 1);
        let error = arena.get(root, &ident("inner")).unwrap_err();
        assert_eq!(error.runtime_kind(), Some(RuntimeErrorKind::NotFound));
    }

    #[test]
    fn immutable_after_initialization() {
        let mut arena = ScopeArena::new();
        let root = arena.root();
        arena.define(root, &decl("x", false, false), ValueType::Undefined, None);
        assert!(!arena.get(root, &ident("x")).unwrap().initialized);

        arena.set(root, &ident("x"), Value::Int(1)).unwrap();
        let error = arena.set(root, &ident("x"), Value::Int(2)).unwrap_err();
        assert_eq!(error.runtime_kind(), Some(RuntimeErrorKind::Immutable));
    }

    #[test]
    fn type_locks_on_first_value() {
        let mut arena = ScopeArena::new();
        let root = arena.root();
        arena.define(root, &decl("x", true, false), ValueType::Undefined, None);
        arena.set(root, &ident("x"), Value::Float(1.5)).unwrap();
        let error = arena
            .set(root, &ident("x"), Value::String("s".to_string()))
            .unwrap_err();
        assert_eq!(error.runtime_kind(), Some(RuntimeErrorKind::TypeMismatch));
    }

    #[test]
    fn mismatch_wins_over_immutability() {
        let mut arena = ScopeArena::new();
        let root = arena.root();
        arena.define(root, &decl("x", false, false), ValueType::Int, Some(Value::Int(5)));

        let error = arena
            .set(root, &ident("x"), Value::String("s".to_string()))
            .unwrap_err();
        assert_eq!(error.runtime_kind(), Some(RuntimeErrorKind::TypeMismatch));
    }

    #[test]
    fn nil_requires_nullable() {
        let mut arena = ScopeArena::new();
        let root = arena.root();
        arena.define(root, &decl("a", true, false), ValueType::Int, Some(Value::Int(1)));
        arena.define(root, &decl("b", true, true), ValueType::Int, Some(Value::Int(1)));

        let error = arena.set(root, &ident("a"), Value::Nil).unwrap_err();
        assert_eq!(error.runtime_kind(), Some(RuntimeErrorKind::NilNotAllowed));

        arena.set(root, &ident("b"), Value::Nil).unwrap();
        let lookup = arena.get(root, &ident("b")).unwrap();
        assert_eq!(lookup.value, Value::Nil);
        assert_eq!(lookup.value_type, ValueType::Int);
    }

    #[test]
    fn set_never_creates() {
        let mut arena = ScopeArena::new();
        let root = arena.root();
        let error = arena.set(root, &ident("ghost"), Value::Int(1)).unwrap_err();
        assert_eq!(error.runtime_kind(), Some(RuntimeErrorKind::NotFound));
    }
}
