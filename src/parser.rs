use crate::ast::{BinaryOp, Block, ElseBranch, Expr, IfStmt, LetStmt, PointerOp, Program, Stmt, UnaryOp};
use crate::error::{NeonError, ParseErrorKind};
use crate::lexer::{Literal, Token, TokenType};
use crate::value::{TypeTag, Value};
use log::{debug, trace};

const ASSIGNMENT_TYPES: [TokenType; 17] = [
    TokenType::Assign,
    TokenType::AddAssign,
    TokenType::SubAssign,
    TokenType::MulAssign,
    TokenType::DivAssign,
    TokenType::ModAssign,
    TokenType::PowAssign,
    TokenType::ShiftLeftAssign,
    TokenType::ShiftRightAssign,
    TokenType::RoundshiftLeftAssign,
    TokenType::RoundshiftRightAssign,
    TokenType::AndAssign,
    TokenType::OrAssign,
    TokenType::XorAssign,
    TokenType::NandAssign,
    TokenType::NorAssign,
    TokenType::XnorAssign,
];

/// Deepest nesting of groups, blocks and prefix operators a program may use.
pub const MAX_NESTING: usize = 256;

const STACK_RED_ZONE: usize = 128 * 1024;
const STACK_GROW_SIZE: usize = 4 * 1024 * 1024;

pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
    /// Number of blocks currently open.
    depth: usize,
    nesting: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            current: 0,
            depth: 0,
            nesting: 0,
        }
    }

    /// Parses the whole token stream. Running out of input inside an open
    /// block yields an `UnterminatedStatement` error carrying the depth.
    pub fn parse(&mut self) -> Result<Program, NeonError> {
        let mut statements = Vec::new();

        self.skip_newlines();
        while !self.is_at_end() {
            statements.push(self.statement()?);
            self.skip_newlines();
        }

        debug!("parsed {} statements", statements.len());
        Ok(Program { statements })
    }

    fn statement(&mut self) -> Result<Stmt, NeonError> {
        let (stmt, what) = if self.match_types(&[TokenType::Put]) {
            (self.put_statement()?, "put")
        } else if self.match_types(&[TokenType::Let]) {
            (self.let_statement()?, "let declaration")
        } else if self.match_types(&[TokenType::If]) {
            (Stmt::If(self.if_statement()?), "if block")
        } else if self.match_types(&[TokenType::While]) {
            (self.while_statement()?, "while block")
        } else if self.check(&TokenType::LeftBrace) {
            (Stmt::Block(self.block()?), "block")
        } else {
            (
                Stmt::Expression {
                    expr: self.expression()?,
                },
                "expression",
            )
        };

        trace!("statement {}", stmt);
        self.end_statement(what)?;
        Ok(stmt)
    }

    /// A statement ends at a new line, at the end of input, or right before
    /// the `}` closing its block.
    fn end_statement(&mut self, what: &str) -> Result<(), NeonError> {
        if self.match_types(&[TokenType::NewLine])
            || self.check(&TokenType::RightBrace)
            || self.is_at_end()
        {
            return Ok(());
        }

        let found = describe(self.peek());
        Err(self.error_at_peek(
            ParseErrorKind::ExpectedToken,
            format!("expected new line after {}, found {}", what, found),
        ))
    }

    fn put_statement(&mut self) -> Result<Stmt, NeonError> {
        let keyword = self.previous().clone();
        let value = self.expression()?;
        Ok(Stmt::Put { value, keyword })
    }

    fn let_statement(&mut self) -> Result<Stmt, NeonError> {
        let mutable = self.match_types(&[TokenType::Bang]);
        let nullable = self.match_types(&[TokenType::Check]);

        let name = self.consume_with_help(
            TokenType::Identifier,
            "expected variable name after 'let'",
            "declarations look like: let[!][?] name[: type][= value]".to_string(),
        )?;

        let declared = if self.match_types(&[TokenType::Colon]) {
            let type_token = self.peek().clone();
            match TypeTag::from_token_type(type_token.token_type) {
                Some(tag) if tag.is_valid_declaration() => {
                    self.advance();
                    Some(tag)
                }
                _ => {
                    return Err(NeonError::parse_error_with_help(
                        ParseErrorKind::InvalidType,
                        &type_token,
                        format!("{} is not a valid variable type", describe(&type_token)),
                        "valid types are int, uint, float, bool, char and string".to_string(),
                    ));
                }
            }
        } else {
            None
        };

        let initializer = if self.match_types(&[TokenType::Assign]) {
            Some(self.expression()?)
        } else {
            None
        };

        Ok(Stmt::Let(LetStmt {
            name,
            mutable,
            nullable,
            declared,
            initializer,
        }))
    }

    fn if_statement(&mut self) -> Result<IfStmt, NeonError> {
        let keyword = self.previous().clone();
        let condition = self.expression()?;
        let then_branch = self.block()?;

        let else_branch = if self.match_after_newlines(TokenType::Elif) {
            Some(ElseBranch::If(Box::new(self.if_statement()?)))
        } else if self.match_after_newlines(TokenType::Else) {
            Some(ElseBranch::Block(self.block()?))
        } else {
            None
        };

        Ok(IfStmt {
            condition,
            then_branch,
            else_branch,
            keyword,
        })
    }

    fn while_statement(&mut self) -> Result<Stmt, NeonError> {
        let keyword = self.previous().clone();
        let condition = self.expression()?;
        let body = self.block()?;

        Ok(Stmt::While {
            condition,
            body,
            keyword,
        })
    }

    fn block(&mut self) -> Result<Block, NeonError> {
        self.nested(Self::open_block)
    }

    fn open_block(&mut self) -> Result<Block, NeonError> {
        let brace = self.consume_with_help(
            TokenType::LeftBrace,
            "expected '{'",
            "blocks open with '{' on the same line".to_string(),
        )?;
        self.depth += 1;

        let mut statements = Vec::new();
        self.skip_newlines();
        while !self.check(&TokenType::RightBrace) {
            if self.is_at_end() {
                return Err(self.error_at_peek(
                    ParseErrorKind::ExpectedToken,
                    "expected '}' after block".to_string(),
                ));
            }
            statements.push(self.statement()?);
            self.skip_newlines();
        }
        self.advance();

        self.depth -= 1;
        Ok(Block { statements, brace })
    }

    fn expression(&mut self) -> Result<Expr, NeonError> {
        self.nested(Self::sequence)
    }

    fn sequence(&mut self) -> Result<Expr, NeonError> {
        let mut expr = self.assignment()?;

        while self.match_types(&[TokenType::Semicolon]) {
            let token = self.previous().clone();
            let right = self.assignment()?;
            expr = Expr::Sequence {
                left: Box::new(expr),
                right: Box::new(right),
                token,
            };
        }

        Ok(expr)
    }

    fn assignment(&mut self) -> Result<Expr, NeonError> {
        let expr = self.pipeline()?;

        if self.match_types(&ASSIGNMENT_TYPES) {
            let token = self.previous().clone();
            let value = self.nested(Self::assignment)?;

            return match expr {
                Expr::Identifier { name } => Ok(Expr::Assign {
                    target: name,
                    operator: BinaryOp::from_assign_type(token.token_type),
                    value: Box::new(value),
                    token,
                }),
                other => Err(NeonError::parse_error_with_help(
                    ParseErrorKind::InvalidAssignmentTarget,
                    &token,
                    "invalid assignment target".to_string(),
                    format!("only a variable name can be assigned, found {}", other.kind()),
                )),
            };
        }

        Ok(expr)
    }

    fn pipeline(&mut self) -> Result<Expr, NeonError> {
        let mut expr = self.ternary()?;

        while self.match_types(&[TokenType::PipelineRight, TokenType::PipelineLeft]) {
            let token = self.previous().clone();
            let right = self.ternary()?;
            expr = Expr::Pipeline {
                left: Box::new(expr),
                right: Box::new(right),
                token,
            };
        }

        Ok(expr)
    }

    fn ternary(&mut self) -> Result<Expr, NeonError> {
        let condition = self.range()?;

        if self.match_types(&[TokenType::Check]) {
            let token = self.previous().clone();
            let then_branch = self.nested(Self::ternary)?;
            self.consume(TokenType::Colon, "expected ':' in ternary expression")?;
            let else_branch = self.nested(Self::ternary)?;

            return Ok(Expr::Ternary {
                condition: Box::new(condition),
                then_branch: Box::new(then_branch),
                else_branch: Box::new(else_branch),
                token,
            });
        }

        Ok(condition)
    }

    fn range(&mut self) -> Result<Expr, NeonError> {
        let start = self.logic()?;

        if self.match_types(&[TokenType::RangeDot]) {
            let token = self.previous().clone();
            let end = self.logic()?;
            return Ok(Expr::Range {
                start: Box::new(start),
                end: Box::new(end),
                token,
            });
        }

        Ok(start)
    }

    fn logic(&mut self) -> Result<Expr, NeonError> {
        self.binary_chain(&[TokenType::AndLogic, TokenType::OrLogic], Self::equality)
    }

    fn equality(&mut self) -> Result<Expr, NeonError> {
        self.binary_chain(&[TokenType::Equal, TokenType::NotEqual], Self::comparison)
    }

    fn comparison(&mut self) -> Result<Expr, NeonError> {
        self.binary_chain(
            &[
                TokenType::Greater,
                TokenType::GreaterEqual,
                TokenType::Less,
                TokenType::LessEqual,
            ],
            Self::bitshift,
        )
    }

    fn bitshift(&mut self) -> Result<Expr, NeonError> {
        self.binary_chain(
            &[
                TokenType::ShiftLeft,
                TokenType::ShiftRight,
                TokenType::RoundshiftLeft,
                TokenType::RoundshiftRight,
            ],
            Self::bitwise,
        )
    }

    fn bitwise(&mut self) -> Result<Expr, NeonError> {
        self.binary_chain(
            &[
                TokenType::AndBitwise,
                TokenType::OrBitwise,
                TokenType::XorBitwise,
                TokenType::NandBitwise,
                TokenType::NorBitwise,
                TokenType::XnorBitwise,
            ],
            Self::term,
        )
    }

    fn term(&mut self) -> Result<Expr, NeonError> {
        self.binary_chain(&[TokenType::Plus, TokenType::Minus], Self::factor)
    }

    fn factor(&mut self) -> Result<Expr, NeonError> {
        self.binary_chain(
            &[TokenType::Star, TokenType::Slash, TokenType::Percent],
            Self::power,
        )
    }

    fn power(&mut self) -> Result<Expr, NeonError> {
        self.binary_chain(&[TokenType::Pow], Self::increment)
    }

    /// Left-associative loop shared by every binary precedence level.
    fn binary_chain(
        &mut self,
        types: &[TokenType],
        operand: fn(&mut Self) -> Result<Expr, NeonError>,
    ) -> Result<Expr, NeonError> {
        let mut expr = operand(self)?;

        while self.match_types(types) {
            let token = self.previous().clone();
            let operator = match BinaryOp::from_token_type(token.token_type) {
                Some(op) => op,
                None => {
                    return Err(NeonError::parse_error(
                        ParseErrorKind::ExpectedExpression,
                        &token,
                        format!("'{}' is not a binary operator", token.lexeme),
                    ))
                }
            };
            let right = operand(self)?;
            expr = Expr::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
                token,
            };
        }

        Ok(expr)
    }

    fn increment(&mut self) -> Result<Expr, NeonError> {
        if self.match_types(&[TokenType::Increment, TokenType::Decrement]) {
            let token = self.previous().clone();
            let operand = self.nested(Self::increment)?;
            return Ok(Expr::Increment {
                operand: Box::new(operand),
                decrement: token.token_type == TokenType::Decrement,
                postfix: false,
                token,
            });
        }

        let expr = self.pointer()?;

        if self.match_types(&[TokenType::Increment, TokenType::Decrement]) {
            let token = self.previous().clone();
            return Ok(Expr::Increment {
                operand: Box::new(expr),
                decrement: token.token_type == TokenType::Decrement,
                postfix: true,
                token,
            });
        }

        Ok(expr)
    }

    fn pointer(&mut self) -> Result<Expr, NeonError> {
        if self.match_types(&[TokenType::Star, TokenType::AndBitwise]) {
            let token = self.previous().clone();
            let operator = if token.token_type == TokenType::Star {
                PointerOp::Deref
            } else {
                PointerOp::Ref
            };
            let operand = self.nested(Self::pointer)?;
            return Ok(Expr::Pointer {
                operator,
                operand: Box::new(operand),
                token,
            });
        }

        self.unary()
    }

    fn unary(&mut self) -> Result<Expr, NeonError> {
        if self.match_types(&[
            TokenType::Bang,
            TokenType::NotBitwise,
            TokenType::Plus,
            TokenType::Minus,
            TokenType::GoIn,
        ]) {
            let token = self.previous().clone();
            if let Some(operator) = UnaryOp::from_token_type(token.token_type) {
                let operand = self.nested(Self::unary)?;
                return Ok(Expr::Unary {
                    operator,
                    operand: Box::new(operand),
                    token,
                });
            }
        }

        self.access()
    }

    fn access(&mut self) -> Result<Expr, NeonError> {
        let mut expr = self.validate()?;

        loop {
            if self.match_types(&[TokenType::CheckNav, TokenType::BangNav, TokenType::Dot]) {
                let token = self.previous().clone();
                let member = self.validate()?;
                expr = Expr::Access {
                    object: Box::new(expr),
                    member: Box::new(member),
                    token,
                };
            } else if self.match_types(&[TokenType::LeftBracket]) {
                let token = self.previous().clone();
                let index = self.expression()?;
                self.consume(TokenType::RightBracket, "expected ']' after index")?;
                expr = Expr::PositionAccess {
                    object: Box::new(expr),
                    index: Box::new(index),
                    token,
                };
            } else {
                break;
            }
        }

        Ok(expr)
    }

    fn validate(&mut self) -> Result<Expr, NeonError> {
        let expr = self.catch()?;

        if self.match_types(&[TokenType::Elvis]) {
            let token = self.previous().clone();
            let fallback = if self.at_expression_end() {
                None
            } else {
                Some(Box::new(self.catch()?))
            };
            return Ok(Expr::Elvis {
                value: Box::new(expr),
                fallback,
                token,
            });
        }

        Ok(expr)
    }

    /// Postfix `?` only binds when nothing follows it on the line; otherwise
    /// the `?` belongs to a ternary.
    fn catch(&mut self) -> Result<Expr, NeonError> {
        let expr = self.cast()?;

        if self.check(&TokenType::Check) && self.next_ends_expression() {
            let token = self.advance().clone();
            return Ok(Expr::Check {
                value: Box::new(expr),
                fallback: None,
                token,
            });
        }

        if self.match_types(&[TokenType::CheckReturn]) {
            let token = self.previous().clone();
            let fallback = self.expression()?;
            return Ok(Expr::Check {
                value: Box::new(expr),
                fallback: Some(Box::new(fallback)),
                token,
            });
        }

        Ok(expr)
    }

    fn cast(&mut self) -> Result<Expr, NeonError> {
        let mut expr = self.primary()?;

        while self.is_cast_ahead() {
            let token = self.advance().clone();
            let type_token = self.advance().clone();
            let target = match TypeTag::from_token_type(type_token.token_type) {
                Some(tag) => tag,
                None => {
                    return Err(NeonError::parse_error(
                        ParseErrorKind::InvalidType,
                        &type_token,
                        format!("{} is not a type", describe(&type_token)),
                    ))
                }
            };
            expr = Expr::Cast {
                expr: Box::new(expr),
                target,
                token,
            };
        }

        Ok(expr)
    }

    /// `:` starts a cast only when a type keyword follows it.
    fn is_cast_ahead(&self) -> bool {
        self.check(&TokenType::Colon)
            && self
                .tokens
                .get(self.current + 1)
                .map_or(false, |t| t.token_type.is_type())
    }

    fn primary(&mut self) -> Result<Expr, NeonError> {
        if self.match_types(&[TokenType::Identifier]) {
            return Ok(Expr::Identifier {
                name: self.previous().clone(),
            });
        }

        if self.match_types(&[
            TokenType::NumberLiteral,
            TokenType::FloatLiteral,
            TokenType::StringLiteral,
            TokenType::CharLiteral,
        ]) {
            let token = self.previous().clone();
            let value = match &token.literal {
                Some(Literal::Int(n)) => Value::Int(*n),
                Some(Literal::Float(n)) => Value::Float(*n),
                Some(Literal::Str(s)) => Value::String(s.clone()),
                Some(Literal::Char(c)) => Value::Char(*c),
                _ => {
                    return Err(NeonError::parse_error(
                        ParseErrorKind::ExpectedExpression,
                        &token,
                        format!("literal {} carries no value", describe(&token)),
                    ))
                }
            };
            return Ok(Expr::Literal { value, token });
        }

        if self.match_types(&[TokenType::True]) {
            let token = self.previous().clone();
            return Ok(Expr::Literal {
                value: Value::Bool(true),
                token,
            });
        }

        if self.match_types(&[TokenType::False]) {
            let token = self.previous().clone();
            return Ok(Expr::Literal {
                value: Value::Bool(false),
                token,
            });
        }

        if self.match_types(&[TokenType::Nil]) {
            let token = self.previous().clone();
            return Ok(Expr::Literal {
                value: Value::Nil,
                token,
            });
        }

        if let Some(tag) = TypeTag::from_token_type(self.peek().token_type) {
            let token = self.advance().clone();
            return Ok(Expr::Type { tag, token });
        }

        self.array_literal()
    }

    /// `[type: size][v1, v2, ...]`
    fn array_literal(&mut self) -> Result<Expr, NeonError> {
        let is_array = self.check(&TokenType::LeftBracket)
            && self
                .tokens
                .get(self.current + 1)
                .map_or(false, |t| t.token_type.is_type());
        if !is_array {
            return self.group();
        }

        let token = self.advance().clone();
        let type_token = self.advance().clone();
        let element_type = match TypeTag::from_token_type(type_token.token_type) {
            Some(tag) => tag,
            None => {
                return Err(NeonError::parse_error(
                    ParseErrorKind::InvalidType,
                    &type_token,
                    format!("{} is not a type", describe(&type_token)),
                ))
            }
        };
        self.consume(TokenType::Colon, "expected ':' after array element type")?;
        let size = self.expression()?;
        self.consume(TokenType::RightBracket, "expected ']' after array size")?;
        self.consume(TokenType::LeftBracket, "expected '[' before array values")?;

        let mut values = Vec::new();
        if !self.check(&TokenType::RightBracket) {
            loop {
                values.push(self.expression()?);
                if !self.match_types(&[TokenType::Comma]) {
                    break;
                }
            }
        }
        self.consume(TokenType::RightBracket, "expected ']' after array values")?;

        Ok(Expr::ArrayLiteral {
            element_type,
            size: Box::new(size),
            values,
            token,
        })
    }

    fn group(&mut self) -> Result<Expr, NeonError> {
        if self.match_types(&[TokenType::LeftParen]) {
            let expr = self.expression()?;
            self.consume(TokenType::RightParen, "expected ')' after expression")?;
            return Ok(Expr::Grouping {
                expr: Box::new(expr),
            });
        }

        if self.check(&TokenType::LeftBrace) {
            return Ok(Expr::Block(self.block()?));
        }

        if self.match_types(&[TokenType::If]) {
            return Ok(Expr::If(Box::new(self.if_statement()?)));
        }

        let found = describe(self.peek());
        Err(self.error_at_peek(
            ParseErrorKind::ExpectedExpression,
            format!("expected expression, found {}", found),
        ))
    }

    /// Runs one recursive descent step, growing the stack as needed and
    /// failing once `MAX_NESTING` levels are open.
    fn nested<T>(&mut self, parse: fn(&mut Self) -> Result<T, NeonError>) -> Result<T, NeonError> {
        if self.nesting >= MAX_NESTING {
            return Err(NeonError::parse_error_with_help(
                ParseErrorKind::NestingTooDeep,
                self.peek(),
                "expression nested too deeply".to_string(),
                format!("at most {} levels of nesting are supported", MAX_NESTING),
            ));
        }

        self.nesting += 1;
        let result = stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || parse(self));
        self.nesting -= 1;
        result
    }

    fn at_expression_end(&self) -> bool {
        self.is_at_end()
            || matches!(
                self.peek().token_type,
                TokenType::NewLine
                    | TokenType::RightBrace
                    | TokenType::RightParen
                    | TokenType::RightBracket
            )
    }

    fn next_ends_expression(&self) -> bool {
        match self.tokens.get(self.current + 1) {
            Some(next) => matches!(
                next.token_type,
                TokenType::NewLine | TokenType::Eof | TokenType::RightParen | TokenType::RightBrace
            ),
            None => true,
        }
    }

    fn skip_newlines(&mut self) {
        while self.match_types(&[TokenType::NewLine]) {}
    }

    /// Matches `token_type` even when blank lines separate it from the
    /// current position, as with `}` followed by `else` on the next line.
    fn match_after_newlines(&mut self, token_type: TokenType) -> bool {
        let mut pos = self.current;
        while self
            .tokens
            .get(pos)
            .map_or(false, |t| t.token_type == TokenType::NewLine)
        {
            pos += 1;
        }

        match self.tokens.get(pos) {
            Some(token) if token.token_type == token_type => {
                self.current = pos + 1;
                true
            }
            _ => false,
        }
    }

    fn match_types(&mut self, types: &[TokenType]) -> bool {
        for token_type in types {
            if self.check(token_type) {
                self.advance();
                return true;
            }
        }
        false
    }

    fn check(&self, token_type: &TokenType) -> bool {
        if self.is_at_end() {
            false
        } else {
            &self.peek().token_type == token_type
        }
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    fn is_at_end(&self) -> bool {
        self.peek().token_type == TokenType::Eof
    }

    fn peek(&self) -> &Token {
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[self.current.min(last)]
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current.saturating_sub(1)]
    }

    fn consume(&mut self, token_type: TokenType, message: &str) -> Result<Token, NeonError> {
        if self.check(&token_type) {
            Ok(self.advance().clone())
        } else {
            let found = describe(self.peek());
            Err(self.error_at_peek(
                ParseErrorKind::ExpectedToken,
                format!("{}, found {}", message, found),
            ))
        }
    }

    fn consume_with_help(
        &mut self,
        token_type: TokenType,
        message: &str,
        help: String,
    ) -> Result<Token, NeonError> {
        self.consume(token_type, message).map_err(|err| {
            if err.is_unterminated() {
                err
            } else {
                err.with_help(help)
            }
        })
    }

    /// Input that ends inside an open block is incomplete rather than wrong.
    fn error_at_peek(&self, kind: ParseErrorKind, message: String) -> NeonError {
        let token = self.peek();
        if token.token_type == TokenType::Eof && self.depth > 0 {
            return NeonError::unterminated(token, self.depth);
        }
        NeonError::parse_error(kind, token, message)
    }
}

fn describe(token: &Token) -> String {
    match token.token_type {
        TokenType::NewLine => "new line".to_string(),
        TokenType::Eof => "end of input".to_string(),
        _ => format!("'{}'", token.lexeme),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;

    fn parse(source: &str) -> Result<Program, NeonError> {
        let tokens = Lexer::new(source, true).scan_tokens()?;
        Parser::new(tokens).parse()
    }

    fn printed(source: &str) -> Vec<String> {
        parse(source)
            .unwrap()
            .statements
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn factor_binds_tighter_than_term() {
        assert_eq!(printed("1 + 2 * 3\n"), vec!["(+ 1 (* 2 3))"]);
        assert_eq!(printed("(1 + 2) * 3\n"), vec!["(* (group (+ 1 2)) 3)"]);
    }

    #[test]
    fn assignment_is_right_associative() {
        assert_eq!(printed("a = b += 2\n"), vec!["(= a (+= b 2))"]);
    }

    #[test]
    fn cast_requires_type_keyword() {
        assert_eq!(printed("x: float\n"), vec!["(: x float)"]);
        assert_eq!(printed("c ? 1 : 2\n"), vec!["(? c 1 2)"]);
    }

    #[test]
    fn postfix_check_and_elvis() {
        assert_eq!(printed("a?\n"), vec!["(? a)"]);
        assert_eq!(printed("a ?: 3\n"), vec!["(?: a 3)"]);
        assert_eq!(printed("a ?:\n"), vec!["(?: a)"]);
    }

    #[test]
    fn array_literal_needs_type_after_bracket() {
        assert_eq!(printed("[int: 2][1, 2]\n"), vec!["([int: 2] 1 2)"]);
        assert_eq!(printed("a[1]\n"), vec!["([] a 1)"]);
    }

    #[test]
    fn let_modifiers_and_type() {
        assert_eq!(printed("let!? x: int = 3\n"), vec!["(let!? x: int 3)"]);
        assert_eq!(printed("let y\n"), vec!["(let y)"]);
    }

    #[test]
    fn invalid_let_type_is_rejected() {
        let error = parse("let x: i8 = 3\n").unwrap_err();
        assert_eq!(error.parse_kind(), Some(ParseErrorKind::InvalidType));
    }

    #[test]
    fn assignment_target_must_be_identifier() {
        let error = parse("1 + 2 = 3\n").unwrap_err();
        assert_eq!(error.parse_kind(), Some(ParseErrorKind::InvalidAssignmentTarget));
    }

    #[test]
    fn elif_chain_nests() {
        let source = "if a {\n put 1\n}\nelif b {\n put 2\n} else {\n put 3\n}\n";
        assert_eq!(
            printed(source),
            vec!["(if a (block (put 1)) (if b (block (put 2)) (block (put 3))))"]
        );
    }

    #[test]
    fn statements_need_terminators() {
        let error = parse("put 1 2\n").unwrap_err();
        assert_eq!(error.parse_kind(), Some(ParseErrorKind::ExpectedToken));
    }

    #[test]
    fn open_block_at_end_is_unterminated() {
        let tokens = Lexer::new("if true {", false).scan_tokens().unwrap();
        let error = Parser::new(tokens).parse().unwrap_err();
        assert!(matches!(
            error.kind,
            crate::error::ErrorKind::UnterminatedStatement { depth: 1 }
        ));

        let tokens = Lexer::new("while x {\n{\n", true).scan_tokens().unwrap();
        let error = Parser::new(tokens).parse().unwrap_err();
        assert!(matches!(
            error.kind,
            crate::error::ErrorKind::UnterminatedStatement { depth: 2 }
        ));
    }

    #[test]
    fn nesting_is_bounded() {
        let depth = MAX_NESTING + 10;
        let source = "(".repeat(depth) + "1" + &")".repeat(depth) + "\n";
        let error = parse(&source).unwrap_err();
        assert_eq!(error.parse_kind(), Some(ParseErrorKind::NestingTooDeep));

        let source = "!".repeat(depth) + "1\n";
        let error = parse(&source).unwrap_err();
        assert_eq!(error.parse_kind(), Some(ParseErrorKind::NestingTooDeep));
    }

    #[test]
    fn nesting_below_limit_parses() {
        let source = "(".repeat(100) + "1" + &")".repeat(100) + "\n";
        assert_eq!(parse(&source).unwrap().statements.len(), 1);

        let source = "{\n".repeat(100) + "1\n" + &"}\n".repeat(100);
        assert_eq!(parse(&source).unwrap().statements.len(), 1);
    }

    #[test]
    fn missing_operand_is_not_unterminated_at_top_level() {
        let tokens = Lexer::new("1 +", false).scan_tokens().unwrap();
        let error = Parser::new(tokens).parse().unwrap_err();
        assert_eq!(error.parse_kind(), Some(ParseErrorKind::ExpectedExpression));
    }
}
