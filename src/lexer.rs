use crate::error::{LexErrorKind, NeonError, Span};
use log::{debug, trace};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    // Context
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,
    Comma,
    Dot,
    Colon,
    Semicolon,
    At,
    Tag,

    // Arithmetic
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Pow,

    // Navigation, checks, pipes and parallel markers
    Bang,
    Check,
    CheckReturn,
    RangeDot,
    Increment,
    Decrement,
    Elvis,
    CheckNav,
    BangNav,
    PipelineRight,
    PipelineLeft,
    GoIn,
    GoOut,
    GoBi,
    Arrow,

    // Comparison and equality
    Greater,
    GreaterEqual,
    Less,
    LessEqual,
    Equal,
    NotEqual,

    // Logic and bitwise
    AndLogic,
    OrLogic,
    AndBitwise,
    OrBitwise,
    XorBitwise,
    NandBitwise,
    NorBitwise,
    XnorBitwise,
    NotBitwise,
    ShiftLeft,
    ShiftRight,
    RoundshiftLeft,
    RoundshiftRight,

    // Assignment
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    ModAssign,
    PowAssign,
    ShiftLeftAssign,
    ShiftRightAssign,
    RoundshiftLeftAssign,
    RoundshiftRightAssign,
    AndAssign,
    OrAssign,
    XorAssign,
    NandAssign,
    NorAssign,
    XnorAssign,

    // Literals
    Identifier,
    StringLiteral,
    CharLiteral,
    NumberLiteral,
    FloatLiteral,

    // Keywords
    Let,
    Fn,
    Asm,
    For,
    Loop,
    While,
    Until,
    Do,
    In,
    Pulse,
    Before,
    Inside,
    After,
    Error,
    Nil,
    Case,
    Of,
    If,
    Else,
    Elif,
    Use,
    As,
    Merge,
    Obj,
    Pub,
    When,
    Trigger,
    Trait,
    This,
    Put,
    Print,
    Printf,
    Println,
    True,
    False,

    // Types
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

    // Special
    NewLine,
    Eof,
}

impl TokenType {
    pub fn is_type(&self) -> bool {
        matches!(
            self,
            TokenType::Int
                | TokenType::I8
                | TokenType::I16
                | TokenType::I32
                | TokenType::I64
                | TokenType::Uint
                | TokenType::U8
                | TokenType::U16
                | TokenType::U32
                | TokenType::U64
                | TokenType::Float
                | TokenType::F32
                | TokenType::F64
                | TokenType::Bool
                | TokenType::Char
                | TokenType::String
                | TokenType::Byte
                | TokenType::Any
        )
    }

    fn name(&self) -> &'static str {
        match self {
            TokenType::LeftParen => "LEFT_PAREN",
            TokenType::RightParen => "RIGHT_PAREN",
            TokenType::LeftBrace => "LEFT_BRACE",
            TokenType::RightBrace => "RIGHT_BRACE",
            TokenType::LeftBracket => "LEFT_BRACKET",
            TokenType::RightBracket => "RIGHT_BRACKET",
            TokenType::Comma => "COMMA",
            TokenType::Dot => "DOT",
            TokenType::Colon => "COLON",
            TokenType::Semicolon => "SEMICOLON",
            TokenType::At => "AT",
            TokenType::Tag => "TAG",
            TokenType::Plus => "PLUS",
            TokenType::Minus => "MINUS",
            TokenType::Star => "STAR",
            TokenType::Slash => "SLASH",
            TokenType::Percent => "MOD",
            TokenType::Pow => "POW",
            TokenType::Bang => "BANG",
            TokenType::Check => "CHECK",
            TokenType::CheckReturn => "CHECK_RETURN",
            TokenType::RangeDot => "RANGE_DOT",
            TokenType::Increment => "INCREMENT",
            TokenType::Decrement => "DECREMENT",
            TokenType::Elvis => "ELVIS",
            TokenType::CheckNav => "CHECK_NAV",
            TokenType::BangNav => "BANG_NAV",
            TokenType::PipelineRight => "PIPELINE_RIGHT",
            TokenType::PipelineLeft => "PIPELINE_LEFT",
            TokenType::GoIn => "GO_IN",
            TokenType::GoOut => "GO_OUT",
            TokenType::GoBi => "GO_BI",
            TokenType::Arrow => "ARROW",
            TokenType::Greater => "GREATER",
            TokenType::GreaterEqual => "GREATER_EQUAL",
            TokenType::Less => "LESS",
            TokenType::LessEqual => "LESS_EQUAL",
            TokenType::Equal => "EQUAL",
            TokenType::NotEqual => "NOT_EQUAL",
            TokenType::AndLogic => "AND_LOGIC",
            TokenType::OrLogic => "OR_LOGIC",
            TokenType::AndBitwise => "AND_BITWISE",
            TokenType::OrBitwise => "OR_BITWISE",
            TokenType::XorBitwise => "XOR_BITWISE",
            TokenType::NandBitwise => "NAND_BITWISE",
            TokenType::NorBitwise => "NOR_BITWISE",
            TokenType::XnorBitwise => "XNOR_BITWISE",
            TokenType::NotBitwise => "NOT_BITWISE",
            TokenType::ShiftLeft => "SHIFT_LEFT",
            TokenType::ShiftRight => "SHIFT_RIGHT",
            TokenType::RoundshiftLeft => "ROUNDSHIFT_LEFT",
            TokenType::RoundshiftRight => "ROUNDSHIFT_RIGHT",
            TokenType::Assign => "ASSIGN",
            TokenType::AddAssign => "ADD_ASSIGN",
            TokenType::SubAssign => "SUB_ASSIGN",
            TokenType::MulAssign => "MUL_ASSIGN",
            TokenType::DivAssign => "DIV_ASSIGN",
            TokenType::ModAssign => "MOD_ASSIGN",
            TokenType::PowAssign => "POW_ASSIGN",
            TokenType::ShiftLeftAssign => "SHIFT_LEFT_ASSIGN",
            TokenType::ShiftRightAssign => "SHIFT_RIGHT_ASSIGN",
            TokenType::RoundshiftLeftAssign => "ROUNDSHIFT_LEFT_ASSIGN",
            TokenType::RoundshiftRightAssign => "ROUNDSHIFT_RIGHT_ASSIGN",
            TokenType::AndAssign => "AND_ASSIGN",
            TokenType::OrAssign => "OR_ASSIGN",
            TokenType::XorAssign => "XOR_ASSIGN",
            TokenType::NandAssign => "NAND_ASSIGN",
            TokenType::NorAssign => "NOR_ASSIGN",
            TokenType::XnorAssign => "XNOR_ASSIGN",
            TokenType::Identifier => "IDENTIFIER",
            TokenType::StringLiteral => "STRING_LITERAL",
            TokenType::CharLiteral => "CHAR_LITERAL",
            TokenType::NumberLiteral => "NUMBER_LITERAL",
            TokenType::FloatLiteral => "FLOAT_LITERAL",
            TokenType::Let => "LET",
            TokenType::Fn => "FN",
            TokenType::Asm => "ASM",
            TokenType::For => "FOR",
            TokenType::Loop => "LOOP",
            TokenType::While => "WHILE",
            TokenType::Until => "UNTIL",
            TokenType::Do => "DO",
            TokenType::In => "IN",
            TokenType::Pulse => "PULSE",
            TokenType::Before => "BEFORE",
            TokenType::Inside => "INSIDE",
            TokenType::After => "AFTER",
            TokenType::Error => "ERROR",
            TokenType::Nil => "NIL",
            TokenType::Case => "CASE",
            TokenType::Of => "OF",
            TokenType::If => "IF",
            TokenType::Else => "ELSE",
            TokenType::Elif => "ELIF",
            TokenType::Use => "USE",
            TokenType::As => "AS",
            TokenType::Merge => "MERGE",
            TokenType::Obj => "OBJ",
            TokenType::Pub => "PUB",
            TokenType::When => "WHEN",
            TokenType::Trigger => "TRIGGER",
            TokenType::Trait => "TRAIT",
            TokenType::This => "THIS",
            TokenType::Put => "PUT",
            TokenType::Print => "PRINT",
            TokenType::Printf => "PRINTF",
            TokenType::Println => "PRINTLN",
            TokenType::True => "TRUE",
            TokenType::False => "FALSE",
            TokenType::Int => "INT",
            TokenType::I8 => "I8",
            TokenType::I16 => "I16",
            TokenType::I32 => "I32",
            TokenType::I64 => "I64",
            TokenType::Uint => "UINT",
            TokenType::U8 => "U8",
            TokenType::U16 => "U16",
            TokenType::U32 => "U32",
            TokenType::U64 => "U64",
            TokenType::Float => "FLOAT",
            TokenType::F32 => "F32",
            TokenType::F64 => "F64",
            TokenType::Bool => "BOOL",
            TokenType::Char => "CHAR",
            TokenType::String => "STRING",
            TokenType::Byte => "BYTE",
            TokenType::Any => "ANY",
            TokenType::NewLine => "NEW_LINE",
            TokenType::Eof => "EOF",
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Decoded value carried by literal and identifier tokens.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    Str(String),
    Char(char),
    Identifier(String),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Literal::Int(n) => write!(f, "{}", n),
            Literal::Float(n) => write!(f, "{}", n),
            Literal::Str(s) => write!(f, "{}", s),
            Literal::Char(c) => write!(f, "{}", c),
            Literal::Identifier(name) => write!(f, "{}", name),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub token_type: TokenType,
    pub lexeme: String,
    pub literal: Option<Literal>,
    pub line: usize,
    pub column: usize,
    pub span: Span,
}

impl Token {
    pub fn new(
        token_type: TokenType,
        lexeme: String,
        literal: Option<Literal>,
        line: usize,
        column: usize,
        span: Span,
    ) -> Self {
        Self {
            token_type,
            lexeme,
            literal,
            line,
            column,
            span,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.literal {
            Some(literal) => write!(f, "{} {} {}", self.token_type, self.lexeme, literal),
            None => write!(f, "{} {}", self.token_type, self.lexeme),
        }
    }
}

pub struct Lexer {
    source: Vec<char>,
    tokens: Vec<Token>,
    start: usize,
    current: usize,
    line: usize,
    column: usize,
    start_line: usize,
    start_column: usize,
    /// Char offset of `source` inside the text that diagnostics are rendered against.
    offset: usize,
    is_file: bool,
    keywords: HashMap<&'static str, TokenType>,
}

impl Lexer {
    pub fn new(source: &str, is_file: bool) -> Self {
        let mut keywords = HashMap::new();
        keywords.insert("let", TokenType::Let);
        keywords.insert("fn", TokenType::Fn);
        keywords.insert("asm", TokenType::Asm);
        keywords.insert("for", TokenType::For);
        keywords.insert("loop", TokenType::Loop);
        keywords.insert("while", TokenType::While);
        keywords.insert("until", TokenType::Until);
        keywords.insert("do", TokenType::Do);
        keywords.insert("in", TokenType::In);
        keywords.insert("pulse", TokenType::Pulse);
        keywords.insert("before", TokenType::Before);
        keywords.insert("inside", TokenType::Inside);
        keywords.insert("after", TokenType::After);
        keywords.insert("error", TokenType::Error);
        keywords.insert("nil", TokenType::Nil);
        keywords.insert("case", TokenType::Case);
        keywords.insert("of", TokenType::Of);
        keywords.insert("if", TokenType::If);
        keywords.insert("else", TokenType::Else);
        keywords.insert("elif", TokenType::Elif);
        keywords.insert("use", TokenType::Use);
        keywords.insert("as", TokenType::As);
        keywords.insert("merge", TokenType::Merge);
        keywords.insert("obj", TokenType::Obj);
        keywords.insert("pub", TokenType::Pub);
        keywords.insert("when", TokenType::When);
        keywords.insert("trigger", TokenType::Trigger);
        keywords.insert("trait", TokenType::Trait);
        keywords.insert("this", TokenType::This);
        keywords.insert("put", TokenType::Put);
        keywords.insert("print", TokenType::Print);
        keywords.insert("printf", TokenType::Printf);
        keywords.insert("println", TokenType::Println);
        keywords.insert("true", TokenType::True);
        keywords.insert("false", TokenType::False);
        keywords.insert("int", TokenType::Int);
        keywords.insert("i8", TokenType::I8);
        keywords.insert("i16", TokenType::I16);
        keywords.insert("i32", TokenType::I32);
        keywords.insert("i64", TokenType::I64);
        keywords.insert("uint", TokenType::Uint);
        keywords.insert("u8", TokenType::U8);
        keywords.insert("u16", TokenType::U16);
        keywords.insert("u32", TokenType::U32);
        keywords.insert("u64", TokenType::U64);
        keywords.insert("float", TokenType::Float);
        keywords.insert("f32", TokenType::F32);
        keywords.insert("f64", TokenType::F64);
        keywords.insert("bool", TokenType::Bool);
        keywords.insert("char", TokenType::Char);
        keywords.insert("string", TokenType::String);
        keywords.insert("byte", TokenType::Byte);
        keywords.insert("any", TokenType::Any);

        Self {
            source: source.chars().collect(),
            tokens: Vec::new(),
            start: 0,
            current: 0,
            line: 1,
            column: 1,
            start_line: 1,
            start_column: 1,
            offset: 0,
            is_file,
            keywords,
        }
    }

    /// Positions the scan after text that was already consumed, so spans and
    /// line numbers stay valid against the accumulated interactive buffer.
    pub fn with_origin(mut self, offset: usize, line: usize) -> Self {
        self.offset = offset;
        self.line = line;
        self
    }

    pub fn scan_tokens(&mut self) -> Result<Vec<Token>, NeonError> {
        while !self.is_at_end() {
            self.start = self.current;
            self.start_line = self.line;
            self.start_column = self.column;
            self.scan_token()?;
        }

        // Interactive input is a single line; terminate its statement.
        if !self.is_file && self.tokens.last().map(|t| t.token_type) != Some(TokenType::NewLine) {
            self.start = self.current;
            self.start_line = self.line;
            self.start_column = self.column;
            self.add_token_with_literal(TokenType::NewLine, String::new(), None);
        }

        let end = self.offset + self.current;
        self.tokens.push(Token::new(
            TokenType::Eof,
            String::new(),
            None,
            self.line,
            self.column,
            Span::single(end),
        ));

        debug!("scanned {} tokens", self.tokens.len());
        Ok(std::mem::take(&mut self.tokens))
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    fn scan_token(&mut self) -> Result<(), NeonError> {
        let c = self.advance();

        match c {
            '(' => self.add_token(TokenType::LeftParen),
            ')' => self.add_token(TokenType::RightParen),
            '{' => self.add_token(TokenType::LeftBrace),
            '}' => self.add_token(TokenType::RightBrace),
            '[' => self.add_token(TokenType::LeftBracket),
            ']' => self.add_token(TokenType::RightBracket),
            ',' => self.add_token(TokenType::Comma),
            ':' => self.add_token(TokenType::Colon),
            ';' => self.add_token(TokenType::Semicolon),
            '@' => self.add_token(TokenType::At),
            '#' => self.add_token(TokenType::Tag),
            '.' => self.longest(&[(".", TokenType::RangeDot)], TokenType::Dot),
            '+' => self.longest(
                &[("+", TokenType::Increment), ("=", TokenType::AddAssign)],
                TokenType::Plus,
            ),
            '-' => self.longest(
                &[("-", TokenType::Decrement), ("=", TokenType::SubAssign)],
                TokenType::Minus,
            ),
            '*' => self.longest(
                &[
                    ("*=", TokenType::PowAssign),
                    ("*", TokenType::Pow),
                    ("=", TokenType::MulAssign),
                ],
                TokenType::Star,
            ),
            '%' => self.longest(&[("=", TokenType::ModAssign)], TokenType::Percent),
            '&' => self.longest(
                &[("&", TokenType::AndLogic), ("=", TokenType::AndAssign)],
                TokenType::AndBitwise,
            ),
            '|' => self.longest(
                &[
                    ("|", TokenType::OrLogic),
                    (">", TokenType::PipelineRight),
                    ("=", TokenType::OrAssign),
                ],
                TokenType::OrBitwise,
            ),
            '^' => self.longest(&[("=", TokenType::XorAssign)], TokenType::XorBitwise),
            '~' => self.longest(
                &[
                    ("&=", TokenType::NandAssign),
                    ("|=", TokenType::NorAssign),
                    ("^=", TokenType::XnorAssign),
                    ("&", TokenType::NandBitwise),
                    ("|", TokenType::NorBitwise),
                    ("^", TokenType::XnorBitwise),
                ],
                TokenType::NotBitwise,
            ),
            '<' => self.longest(
                &[
                    ("<<=", TokenType::RoundshiftLeftAssign),
                    ("!>", TokenType::GoBi),
                    ("<<", TokenType::RoundshiftLeft),
                    ("<=", TokenType::ShiftLeftAssign),
                    ("<", TokenType::ShiftLeft),
                    ("=", TokenType::LessEqual),
                    ("!", TokenType::GoIn),
                    ("|", TokenType::PipelineLeft),
                ],
                TokenType::Less,
            ),
            '>' => self.longest(
                &[
                    (">>=", TokenType::RoundshiftRightAssign),
                    (">>", TokenType::RoundshiftRight),
                    (">=", TokenType::ShiftRightAssign),
                    (">", TokenType::ShiftRight),
                    ("=", TokenType::GreaterEqual),
                ],
                TokenType::Greater,
            ),
            '!' => self.longest(
                &[
                    (".", TokenType::BangNav),
                    (">", TokenType::GoOut),
                    ("=", TokenType::NotEqual),
                ],
                TokenType::Bang,
            ),
            '?' => self.longest(
                &[
                    ("=>", TokenType::CheckReturn),
                    (".", TokenType::CheckNav),
                    (":", TokenType::Elvis),
                ],
                TokenType::Check,
            ),
            '=' => self.longest(
                &[("=", TokenType::Equal), (">", TokenType::Arrow)],
                TokenType::Assign,
            ),
            '/' => {
                if self.match_char('/') {
                    // Comment goes until end of line
                    while self.peek() != '\n' && !self.is_at_end() {
                        self.advance();
                    }
                } else if self.match_char('*') {
                    self.block_comment()?;
                } else if self.match_char('=') {
                    self.add_token(TokenType::DivAssign);
                } else {
                    self.add_token(TokenType::Slash);
                }
            }
            ' ' | '\r' | '\t' => {
                // Ignore whitespace
            }
            '\n' => {
                self.add_token(TokenType::NewLine);
                self.line += 1;
                self.column = 1;
            }
            '"' => self.string()?,
            '\'' => self.char_literal()?,
            c if c.is_ascii_digit() => self.number()?,
            c if c.is_alphabetic() || c == '_' => self.identifier(),
            _ => {
                return Err(self.error(
                    LexErrorKind::UnexpectedCharacter,
                    format!("unexpected '{}'", c),
                ));
            }
        }

        Ok(())
    }

    fn advance(&mut self) -> char {
        let c = self.source.get(self.current).copied().unwrap_or('\0');
        self.current += 1;
        self.column += 1;
        c
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.is_at_end() || self.peek() != expected {
            false
        } else {
            self.advance();
            true
        }
    }

    fn match_str(&mut self, expected: &str) -> bool {
        let mut pos = self.current;
        for c in expected.chars() {
            if self.source.get(pos) != Some(&c) {
                return false;
            }
            pos += 1;
        }
        let consumed = pos - self.current;
        self.current = pos;
        self.column += consumed;
        true
    }

    /// Emits the first pattern that matches after the already consumed char,
    /// `patterns` being ordered longest first.
    fn longest(&mut self, patterns: &[(&str, TokenType)], fallback: TokenType) {
        for (pattern, token_type) in patterns {
            if self.match_str(pattern) {
                self.add_token(*token_type);
                return;
            }
        }
        self.add_token(fallback);
    }

    fn peek(&self) -> char {
        self.source.get(self.current).copied().unwrap_or('\0')
    }

    fn peek_next(&self) -> char {
        self.source.get(self.current + 1).copied().unwrap_or('\0')
    }

    fn block_comment(&mut self) -> Result<(), NeonError> {
        loop {
            if self.is_at_end() {
                return Err(self.error(
                    LexErrorKind::UnterminatedComment,
                    "unterminated block comment".to_string(),
                ));
            }
            if self.peek() == '*' && self.peek_next() == '/' {
                self.advance();
                self.advance();
                return Ok(());
            }
            if self.advance() == '\n' {
                self.line += 1;
                self.column = 1;
            }
        }
    }

    fn string(&mut self) -> Result<(), NeonError> {
        while self.peek() != '"' {
            if self.is_at_end() || self.peek() == '\n' {
                return Err(self.error(
                    LexErrorKind::UnterminatedString,
                    "unterminated string".to_string(),
                ));
            }
            self.advance();
        }

        // The closing "
        self.advance();

        let content: String = self.source[self.start + 1..self.current - 1].iter().collect();
        let lexeme = self.lexeme();
        self.add_token_with_literal(TokenType::StringLiteral, lexeme, Some(Literal::Str(content)));
        Ok(())
    }

    fn char_literal(&mut self) -> Result<(), NeonError> {
        if self.is_at_end() || self.peek() == '\n' || self.peek() == '\'' {
            return Err(self.error(
                LexErrorKind::UnterminatedChar,
                "empty or unterminated char literal".to_string(),
            ));
        }

        let mut value = self.advance();
        if value == '\\' {
            value = match self.advance() {
                'n' => '\n',
                't' => '\t',
                '0' => '\0',
                other => other,
            };
        }

        if !self.match_char('\'') {
            return Err(self.error(
                LexErrorKind::UnterminatedChar,
                "unterminated char literal".to_string(),
            ));
        }

        let lexeme = self.lexeme();
        self.add_token_with_literal(TokenType::CharLiteral, lexeme, Some(Literal::Char(value)));
        Ok(())
    }

    fn number(&mut self) -> Result<(), NeonError> {
        while self.peek().is_ascii_digit() {
            self.advance();
        }

        let mut is_float = false;

        // Look for fractional part
        if self.peek() == '.' && self.peek_next().is_ascii_digit() {
            is_float = true;
            // Consume the "."
            self.advance();

            while self.peek().is_ascii_digit() {
                self.advance();
            }
        }

        let lexeme = self.lexeme();

        if is_float {
            let value = lexeme.parse::<f64>().map_err(|_| {
                self.error(
                    LexErrorKind::InvalidNumberLiteral,
                    format!("invalid float literal: {}", lexeme),
                )
            })?;
            self.add_token_with_literal(TokenType::FloatLiteral, lexeme, Some(Literal::Float(value)));
        } else {
            let value = lexeme.parse::<i64>().map_err(|_| {
                self.error(
                    LexErrorKind::InvalidNumberLiteral,
                    format!("invalid integer literal: {}", lexeme),
                )
            })?;
            self.add_token_with_literal(TokenType::NumberLiteral, lexeme, Some(Literal::Int(value)));
        }

        Ok(())
    }

    fn identifier(&mut self) {
        while self.peek().is_alphanumeric() || self.peek() == '_' {
            self.advance();
        }

        let text = self.lexeme();
        match self.keywords.get(text.as_str()).copied() {
            Some(token_type) => self.add_token_with_literal(token_type, text, None),
            None => {
                let literal = Some(Literal::Identifier(text.clone()));
                self.add_token_with_literal(TokenType::Identifier, text, literal);
            }
        }
    }

    fn lexeme(&self) -> String {
        self.source[self.start..self.current].iter().collect()
    }

    fn add_token(&mut self, token_type: TokenType) {
        let text = self.lexeme();
        self.add_token_with_literal(token_type, text, None);
    }

    fn add_token_with_literal(&mut self, token_type: TokenType, lexeme: String, literal: Option<Literal>) {
        let token = Token::new(
            token_type,
            lexeme,
            literal,
            self.start_line,
            self.start_column,
            Span::new(self.offset + self.start, self.offset + self.current),
        );
        trace!("token {}", token);
        self.tokens.push(token);
    }

    /// Errors point at the start of the construct being scanned.
    fn error(&self, kind: LexErrorKind, message: String) -> NeonError {
        let end = self.current.min(self.source.len()).max(self.start + 1);
        NeonError::lex_error(
            kind,
            Span::new(self.offset + self.start, self.offset + end),
            self.start_line,
            self.start_column,
            self.source[self.start..self.current.min(self.source.len())]
                .iter()
                .collect(),
            message,
        )
    }
}
