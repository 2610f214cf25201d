use crate::ast::{Block, ElseBranch, Expr, IfStmt, LetStmt, Program, Stmt};
use crate::error::{NeonError, RuntimeErrorKind};
use crate::lexer::Token;
use crate::operators;
use crate::output::{OutputSink, StdoutSink};
use crate::scope::{ScopeArena, ScopeId};
use crate::value::{Value, ValueType};
use log::{debug, trace};

const STACK_RED_ZONE: usize = 128 * 1024;
const STACK_GROW_SIZE: usize = 4 * 1024 * 1024;

/// Walks the syntax tree against a chain of scopes. The root scope lives as
/// long as the evaluator, so definitions persist between programs.
pub struct Evaluator {
    scopes: ScopeArena,
    current: ScopeId,
    output: Box<dyn OutputSink>,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator {
    pub fn new() -> Self {
        Self::with_output(Box::new(StdoutSink::new(true)))
    }

    pub fn with_output(output: Box<dyn OutputSink>) -> Self {
        let scopes = ScopeArena::new();
        let current = scopes.root();
        Self {
            scopes,
            current,
            output,
        }
    }

    pub fn scopes(&self) -> &ScopeArena {
        &self.scopes
    }

    /// Runs every statement and yields the value of the last one.
    pub fn evaluate_program(&mut self, program: &Program) -> Result<Value, NeonError> {
        debug!("evaluating {} statements", program.statements.len());
        self.run_statements(&program.statements)
    }

    fn run_statements(&mut self, statements: &[Stmt]) -> Result<Value, NeonError> {
        let mut last = Value::Nil;
        for statement in statements {
            last = self.execute_statement(statement)?;
        }
        Ok(last)
    }

    pub fn execute_statement(&mut self, stmt: &Stmt) -> Result<Value, NeonError> {
        trace!("execute {}", stmt);
        match stmt {
            Stmt::Expression { expr } => self.evaluate_expression(expr),
            Stmt::Put { value, .. } => {
                let value = self.evaluate_expression(value)?;
                let text = value.to_string().replace("\\n", "\n").replace("\\t", "\t");
                self.output.write_line(&text);
                Ok(Value::Nil)
            }
            Stmt::Let(decl) => self.execute_let(decl),
            Stmt::If(if_stmt) => self.execute_if(if_stmt),
            Stmt::While {
                condition, body, ..
            } => {
                loop {
                    let test = self.evaluate_expression(condition)?;
                    if !test.truthy(condition.token())? {
                        break;
                    }
                    self.execute_block(body)?;
                }
                Ok(Value::Nil)
            }
            Stmt::Block(block) => self.execute_block(block),
        }
    }

    fn execute_let(&mut self, decl: &LetStmt) -> Result<Value, NeonError> {
        let declared = decl
            .declared
            .and_then(|tag| tag.value_type())
            .unwrap_or(ValueType::Undefined);

        let initializer = match &decl.initializer {
            Some(init) => init,
            None => {
                self.scopes.define(self.current, decl, declared, None);
                return Ok(Value::Nil);
            }
        };

        let value = self.evaluate_expression(initializer)?;
        let found = value.value_type();

        if found == ValueType::Type {
            return Err(NeonError::runtime_error(
                RuntimeErrorKind::TypeMismatch,
                &decl.name,
                format!("let statement evaluates to a type: {}", value),
            ));
        }

        if value.is_nil() {
            if !decl.nullable {
                return Err(NeonError::runtime_error_with_help(
                    RuntimeErrorKind::NilNotAllowed,
                    &decl.name,
                    "non nullable let statement received nil value".to_string(),
                    format!("declare it with 'let? {}' to allow nil", decl.name.lexeme),
                ));
            }
            self.scopes.define(self.current, decl, declared, Some(value));
            return Ok(Value::Nil);
        }

        if declared != ValueType::Undefined && declared != found {
            return Err(NeonError::runtime_error(
                RuntimeErrorKind::TypeMismatch,
                &decl.name,
                format!("let statement expected {}, found {}", declared, found),
            ));
        }

        self.scopes.define(self.current, decl, found, Some(value));
        Ok(Value::Nil)
    }

    fn execute_if(&mut self, if_stmt: &IfStmt) -> Result<Value, NeonError> {
        let test = self.evaluate_expression(&if_stmt.condition)?;

        if test.truthy(if_stmt.condition.token())? {
            self.execute_block(&if_stmt.then_branch)
        } else {
            match &if_stmt.else_branch {
                Some(ElseBranch::If(elif)) => self.execute_if(elif),
                Some(ElseBranch::Block(block)) => self.execute_block(block),
                None => Ok(Value::Nil),
            }
        }
    }

    /// Runs `block` in a fresh child scope that is dropped afterwards, even
    /// when a statement fails.
    fn execute_block(&mut self, block: &Block) -> Result<Value, NeonError> {
        let previous = self.current;
        let scope = self.scopes.push(previous);
        self.current = scope;

        let result = stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || {
            self.run_statements(&block.statements)
        });

        self.scopes.release(scope);
        self.current = previous;
        result
    }

    pub fn evaluate_expression(&mut self, expr: &Expr) -> Result<Value, NeonError> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || self.evaluate_inner(expr))
    }

    fn evaluate_inner(&mut self, expr: &Expr) -> Result<Value, NeonError> {
        match expr {
            Expr::Literal { value, .. } => Ok(value.clone()),
            Expr::Type { tag, .. } => Ok(Value::Type(*tag)),
            Expr::Identifier { name } => self.read_variable(name),
            Expr::Grouping { expr } => self.evaluate_expression(expr),
            Expr::Binary {
                left,
                operator,
                right,
                token,
            } => {
                let left = self.evaluate_expression(left)?;
                let right = self.evaluate_expression(right)?;
                operators::binary(*operator, &left, &right, token)
            }
            Expr::Unary {
                operator,
                operand,
                token,
            } => {
                let value = self.evaluate_expression(operand)?;
                operators::unary(*operator, &value, token)
            }
            Expr::Ternary {
                condition,
                then_branch,
                else_branch,
                token,
            } => {
                let test = self.evaluate_expression(condition)?;
                if test.truthy(token)? {
                    self.evaluate_expression(then_branch)
                } else {
                    self.evaluate_expression(else_branch)
                }
            }
            Expr::Sequence { left, right, .. } => {
                self.evaluate_expression(left)?;
                self.evaluate_expression(right)
            }
            Expr::Assign {
                target,
                operator,
                value,
                token,
            } => {
                let value = self.evaluate_expression(value)?;
                let value = match operator {
                    Some(op) => {
                        let current = self.read_variable(target)?;
                        operators::binary(*op, &current, &value, token)?
                    }
                    None => value,
                };
                self.scopes.set(self.current, target, value)
            }
            Expr::Cast {
                expr,
                target,
                token,
            } => {
                let value = self.evaluate_expression(expr)?;
                operators::cast(&value, *target, token)
            }
            Expr::Block(block) => self.execute_block(block),
            Expr::If(if_stmt) => self.execute_if(if_stmt),
            Expr::Pointer { token, .. }
            | Expr::Increment { token, .. }
            | Expr::Range { token, .. }
            | Expr::Pipeline { token, .. }
            | Expr::Access { token, .. }
            | Expr::PositionAccess { token, .. }
            | Expr::Elvis { token, .. }
            | Expr::Check { token, .. }
            | Expr::ArrayLiteral { token, .. } => Err(NeonError::runtime_error(
                RuntimeErrorKind::NotImplemented,
                token,
                format!("{} not yet implemented", expr.kind()),
            )),
        }
    }

    fn read_variable(&self, name: &Token) -> Result<Value, NeonError> {
        let lookup = self.scopes.get(self.current, name)?;
        if !lookup.initialized {
            return Err(NeonError::runtime_error_with_help(
                RuntimeErrorKind::Uninitialized,
                name,
                format!("variable {} created but not defined", name.lexeme),
                format!("assign a value with '{} = ...' before reading it", name.lexeme),
            ));
        }
        Ok(lookup.value)
    }
}
