use crate::lexer::{Token, TokenType};
use crate::value::{TypeTag, Value};
use std::fmt;

/// Syntax tree produced by the parser. Nodes keep the token of their
/// operator or keyword so the evaluator can position its errors.

#[derive(Debug, Clone)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

#[derive(Debug, Clone)]
pub enum Stmt {
    Expression {
        expr: Expr,
    },
    Put {
        value: Expr,
        keyword: Token,
    },
    Let(LetStmt),
    If(IfStmt),
    While {
        condition: Expr,
        body: Block,
        keyword: Token,
    },
    Block(Block),
}

#[derive(Debug, Clone)]
pub struct LetStmt {
    pub name: Token,
    pub mutable: bool,
    pub nullable: bool,
    /// `None` means the type is inferred from the first value.
    pub declared: Option<TypeTag>,
    pub initializer: Option<Expr>,
}

#[derive(Debug, Clone)]
pub struct IfStmt {
    pub condition: Expr,
    pub then_branch: Block,
    pub else_branch: Option<ElseBranch>,
    pub keyword: Token,
}

/// `elif` chains nest as another `if` in the else slot.
#[derive(Debug, Clone)]
pub enum ElseBranch {
    If(Box<IfStmt>),
    Block(Block),
}

#[derive(Debug, Clone)]
pub struct Block {
    pub statements: Vec<Stmt>,
    pub brace: Token,
}

#[derive(Debug, Clone)]
pub enum Expr {
    Binary {
        left: Box<Expr>,
        operator: BinaryOp,
        right: Box<Expr>,
        token: Token,
    },
    Unary {
        operator: UnaryOp,
        operand: Box<Expr>,
        token: Token,
    },
    Pointer {
        operator: PointerOp,
        operand: Box<Expr>,
        token: Token,
    },
    Increment {
        operand: Box<Expr>,
        decrement: bool,
        postfix: bool,
        token: Token,
    },
    Ternary {
        condition: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Box<Expr>,
        token: Token,
    },
    Range {
        start: Box<Expr>,
        end: Box<Expr>,
        token: Token,
    },
    Sequence {
        left: Box<Expr>,
        right: Box<Expr>,
        token: Token,
    },
    /// `operator` is set for compound forms such as `+=`.
    Assign {
        target: Token,
        operator: Option<BinaryOp>,
        value: Box<Expr>,
        token: Token,
    },
    Pipeline {
        left: Box<Expr>,
        right: Box<Expr>,
        token: Token,
    },
    Cast {
        expr: Box<Expr>,
        target: TypeTag,
        token: Token,
    },
    Access {
        object: Box<Expr>,
        member: Box<Expr>,
        token: Token,
    },
    PositionAccess {
        object: Box<Expr>,
        index: Box<Expr>,
        token: Token,
    },
    /// `value ?: fallback`, with no fallback meaning the zero value.
    Elvis {
        value: Box<Expr>,
        fallback: Option<Box<Expr>>,
        token: Token,
    },
    /// `value?` or `value ?=> fallback`
    Check {
        value: Box<Expr>,
        fallback: Option<Box<Expr>>,
        token: Token,
    },
    Identifier {
        name: Token,
    },
    Literal {
        value: Value,
        token: Token,
    },
    Type {
        tag: TypeTag,
        token: Token,
    },
    ArrayLiteral {
        element_type: TypeTag,
        size: Box<Expr>,
        values: Vec<Expr>,
        token: Token,
    },
    Grouping {
        expr: Box<Expr>,
    },
    Block(Block),
    If(Box<IfStmt>),
}

impl Expr {
    /// Static tag naming the node variant.
    pub fn kind(&self) -> &'static str {
        match self {
            Expr::Binary { operator, .. } => operator.family().name(),
            Expr::Unary { .. } => "Unary",
            Expr::Pointer { .. } => "Pointer",
            Expr::Increment { .. } => "Increment",
            Expr::Ternary { .. } => "Ternary",
            Expr::Range { .. } => "Range",
            Expr::Sequence { .. } => "Sequence",
            Expr::Assign { .. } => "Assign",
            Expr::Pipeline { .. } => "Pipeline",
            Expr::Cast { .. } => "Cast",
            Expr::Access { .. } => "Access",
            Expr::PositionAccess { .. } => "PositionAccess",
            Expr::Elvis { .. } => "Elvis",
            Expr::Check { .. } => "Check",
            Expr::Identifier { .. } => "Identifier",
            Expr::Literal { .. } => "Literal",
            Expr::Type { .. } => "Type",
            Expr::ArrayLiteral { .. } => "ArrayLiteral",
            Expr::Grouping { .. } => "Grouping",
            Expr::Block(_) => "Block",
            Expr::If(_) => "If",
        }
    }

    /// The token an error about this node is reported at.
    pub fn token(&self) -> &Token {
        match self {
            Expr::Binary { token, .. }
            | Expr::Unary { token, .. }
            | Expr::Pointer { token, .. }
            | Expr::Increment { token, .. }
            | Expr::Ternary { token, .. }
            | Expr::Range { token, .. }
            | Expr::Sequence { token, .. }
            | Expr::Assign { token, .. }
            | Expr::Pipeline { token, .. }
            | Expr::Cast { token, .. }
            | Expr::Access { token, .. }
            | Expr::PositionAccess { token, .. }
            | Expr::Elvis { token, .. }
            | Expr::Check { token, .. }
            | Expr::Literal { token, .. }
            | Expr::Type { token, .. }
            | Expr::ArrayLiteral { token, .. } => token,
            Expr::Identifier { name } => name,
            Expr::Grouping { expr } => expr.token(),
            Expr::Block(block) => &block.brace,
            Expr::If(if_stmt) => &if_stmt.keyword,
        }
    }
}

/// Precedence level a binary operator belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpFamily {
    Term,
    Factor,
    Power,
    Bitwise,
    Bitshift,
    Comparison,
    Equality,
    Logic,
}

impl OpFamily {
    pub fn name(&self) -> &'static str {
        match self {
            OpFamily::Term => "Term",
            OpFamily::Factor => "Factor",
            OpFamily::Power => "Power",
            OpFamily::Bitwise => "Bitwise",
            OpFamily::Bitshift => "Bitshift",
            OpFamily::Comparison => "Comparison",
            OpFamily::Equality => "Equality",
            OpFamily::Logic => "Logic",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Power,
    BitAnd,
    BitOr,
    BitXor,
    BitNand,
    BitNor,
    BitXnor,
    ShiftLeft,
    ShiftRight,
    RotateLeft,
    RotateRight,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,
    Equal,
    NotEqual,
    And,
    Or,
}

impl BinaryOp {
    pub fn from_token_type(token_type: TokenType) -> Option<BinaryOp> {
        let op = match token_type {
            TokenType::Plus => BinaryOp::Add,
            TokenType::Minus => BinaryOp::Subtract,
            TokenType::Star => BinaryOp::Multiply,
            TokenType::Slash => BinaryOp::Divide,
            TokenType::Percent => BinaryOp::Modulo,
            TokenType::Pow => BinaryOp::Power,
            TokenType::AndBitwise => BinaryOp::BitAnd,
            TokenType::OrBitwise => BinaryOp::BitOr,
            TokenType::XorBitwise => BinaryOp::BitXor,
            TokenType::NandBitwise => BinaryOp::BitNand,
            TokenType::NorBitwise => BinaryOp::BitNor,
            TokenType::XnorBitwise => BinaryOp::BitXnor,
            TokenType::ShiftLeft => BinaryOp::ShiftLeft,
            TokenType::ShiftRight => BinaryOp::ShiftRight,
            TokenType::RoundshiftLeft => BinaryOp::RotateLeft,
            TokenType::RoundshiftRight => BinaryOp::RotateRight,
            TokenType::Greater => BinaryOp::Greater,
            TokenType::GreaterEqual => BinaryOp::GreaterEqual,
            TokenType::Less => BinaryOp::Less,
            TokenType::LessEqual => BinaryOp::LessEqual,
            TokenType::Equal => BinaryOp::Equal,
            TokenType::NotEqual => BinaryOp::NotEqual,
            TokenType::AndLogic => BinaryOp::And,
            TokenType::OrLogic => BinaryOp::Or,
            _ => return None,
        };
        Some(op)
    }

    /// Operator a compound assignment applies before storing; `None` for plain `=`.
    pub fn from_assign_type(token_type: TokenType) -> Option<BinaryOp> {
        let op = match token_type {
            TokenType::AddAssign => BinaryOp::Add,
            TokenType::SubAssign => BinaryOp::Subtract,
            TokenType::MulAssign => BinaryOp::Multiply,
            TokenType::DivAssign => BinaryOp::Divide,
            TokenType::ModAssign => BinaryOp::Modulo,
            TokenType::PowAssign => BinaryOp::Power,
            TokenType::ShiftLeftAssign => BinaryOp::ShiftLeft,
            TokenType::ShiftRightAssign => BinaryOp::ShiftRight,
            TokenType::RoundshiftLeftAssign => BinaryOp::RotateLeft,
            TokenType::RoundshiftRightAssign => BinaryOp::RotateRight,
            TokenType::AndAssign => BinaryOp::BitAnd,
            TokenType::OrAssign => BinaryOp::BitOr,
            TokenType::XorAssign => BinaryOp::BitXor,
            TokenType::NandAssign => BinaryOp::BitNand,
            TokenType::NorAssign => BinaryOp::BitNor,
            TokenType::XnorAssign => BinaryOp::BitXnor,
            _ => return None,
        };
        Some(op)
    }

    pub fn family(&self) -> OpFamily {
        match self {
            BinaryOp::Add | BinaryOp::Subtract => OpFamily::Term,
            BinaryOp::Multiply | BinaryOp::Divide | BinaryOp::Modulo => OpFamily::Factor,
            BinaryOp::Power => OpFamily::Power,
            BinaryOp::BitAnd
            | BinaryOp::BitOr
            | BinaryOp::BitXor
            | BinaryOp::BitNand
            | BinaryOp::BitNor
            | BinaryOp::BitXnor => OpFamily::Bitwise,
            BinaryOp::ShiftLeft
            | BinaryOp::ShiftRight
            | BinaryOp::RotateLeft
            | BinaryOp::RotateRight => OpFamily::Bitshift,
            BinaryOp::Greater | BinaryOp::GreaterEqual | BinaryOp::Less | BinaryOp::LessEqual => {
                OpFamily::Comparison
            }
            BinaryOp::Equal | BinaryOp::NotEqual => OpFamily::Equality,
            BinaryOp::And | BinaryOp::Or => OpFamily::Logic,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Modulo => "%",
            BinaryOp::Power => "**",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::BitNand => "~&",
            BinaryOp::BitNor => "~|",
            BinaryOp::BitXnor => "~^",
            BinaryOp::ShiftLeft => "<<",
            BinaryOp::ShiftRight => ">>",
            BinaryOp::RotateLeft => "<<<",
            BinaryOp::RotateRight => ">>>",
            BinaryOp::Greater => ">",
            BinaryOp::GreaterEqual => ">=",
            BinaryOp::Less => "<",
            BinaryOp::LessEqual => "<=",
            BinaryOp::Equal => "==",
            BinaryOp::NotEqual => "!=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    BitNot,
    Plus,
    Negate,
    GoIn,
}

impl UnaryOp {
    pub fn from_token_type(token_type: TokenType) -> Option<UnaryOp> {
        match token_type {
            TokenType::Bang => Some(UnaryOp::Not),
            TokenType::NotBitwise => Some(UnaryOp::BitNot),
            TokenType::Plus => Some(UnaryOp::Plus),
            TokenType::Minus => Some(UnaryOp::Negate),
            TokenType::GoIn => Some(UnaryOp::GoIn),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            UnaryOp::Not => "!",
            UnaryOp::BitNot => "~",
            UnaryOp::Plus => "+",
            UnaryOp::Negate => "-",
            UnaryOp::GoIn => "<!",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerOp {
    Deref,
    Ref,
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Binary {
                left,
                operator,
                right,
                ..
            } => write!(f, "({} {} {})", operator, left, right),
            Expr::Unary {
                operator, operand, ..
            } => write!(f, "({} {})", operator.symbol(), operand),
            Expr::Pointer {
                operator, operand, ..
            } => match operator {
                PointerOp::Deref => write!(f, "(* {})", operand),
                PointerOp::Ref => write!(f, "(& {})", operand),
            },
            Expr::Increment {
                operand,
                decrement,
                postfix,
                ..
            } => {
                let symbol = if *decrement { "--" } else { "++" };
                if *postfix {
                    write!(f, "({} {})", operand, symbol)
                } else {
                    write!(f, "({} {})", symbol, operand)
                }
            }
            Expr::Ternary {
                condition,
                then_branch,
                else_branch,
                ..
            } => write!(f, "(? {} {} {})", condition, then_branch, else_branch),
            Expr::Range { start, end, .. } => write!(f, "(.. {} {})", start, end),
            Expr::Sequence { left, right, .. } => write!(f, "(; {} {})", left, right),
            Expr::Assign {
                target,
                operator,
                value,
                ..
            } => match operator {
                Some(op) => write!(f, "({}= {} {})", op, target.lexeme, value),
                None => write!(f, "(= {} {})", target.lexeme, value),
            },
            Expr::Pipeline {
                left, right, token, ..
            } => write!(f, "({} {} {})", token.lexeme, left, right),
            Expr::Cast { expr, target, .. } => write!(f, "(: {} {})", expr, target),
            Expr::Access {
                object,
                member,
                token,
            } => write!(f, "({} {} {})", token.lexeme, object, member),
            Expr::PositionAccess { object, index, .. } => write!(f, "([] {} {})", object, index),
            Expr::Elvis {
                value, fallback, ..
            } => match fallback {
                Some(fallback) => write!(f, "(?: {} {})", value, fallback),
                None => write!(f, "(?: {})", value),
            },
            Expr::Check {
                value, fallback, ..
            } => match fallback {
                Some(fallback) => write!(f, "(?=> {} {})", value, fallback),
                None => write!(f, "(? {})", value),
            },
            Expr::Identifier { name } => write!(f, "{}", name.lexeme),
            Expr::Literal { value, .. } => match value {
                Value::String(s) => write!(f, "\"{}\"", s),
                Value::Char(c) => write!(f, "'{}'", c),
                other => write!(f, "{}", other),
            },
            Expr::Type { tag, .. } => write!(f, "{}", tag),
            Expr::ArrayLiteral {
                element_type,
                size,
                values,
                ..
            } => {
                write!(f, "([{}: {}]", element_type, size)?;
                for value in values {
                    write!(f, " {}", value)?;
                }
                write!(f, ")")
            }
            Expr::Grouping { expr } => write!(f, "(group {})", expr),
            Expr::Block(block) => write!(f, "{}", block),
            Expr::If(if_stmt) => write!(f, "{}", if_stmt),
        }
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "(block")?;
        for stmt in &self.statements {
            write!(f, " {}", stmt)?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for IfStmt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "(if {} {}", self.condition, self.then_branch)?;
        match &self.else_branch {
            Some(ElseBranch::If(elif)) => write!(f, " {}", elif)?,
            Some(ElseBranch::Block(block)) => write!(f, " {}", block)?,
            None => {}
        }
        write!(f, ")")
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Stmt::Expression { expr } => write!(f, "{}", expr),
            Stmt::Put { value, .. } => write!(f, "(put {})", value),
            Stmt::Let(decl) => {
                write!(f, "(let")?;
                if decl.mutable {
                    write!(f, "!")?;
                }
                if decl.nullable {
                    write!(f, "?")?;
                }
                write!(f, " {}", decl.name.lexeme)?;
                if let Some(tag) = decl.declared {
                    write!(f, ": {}", tag)?;
                }
                if let Some(init) = &decl.initializer {
                    write!(f, " {}", init)?;
                }
                write!(f, ")")
            }
            Stmt::If(if_stmt) => write!(f, "{}", if_stmt),
            Stmt::While {
                condition, body, ..
            } => write!(f, "(while {} {})", condition, body),
            Stmt::Block(block) => write!(f, "{}", block),
        }
    }
}
