use miette::SourceSpan;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

impl From<Span> for SourceSpan {
    fn from(span: Span) -> Self {
        SourceSpan::new(span.start.into(), span.end - span.start)
    }
}

/// A single lexeme: the raw text it was scanned from and its category.
///
/// `line` is the scanner's line counter at the moment the lexeme was
/// completed, which is the line diagnostics are reported against.
#[derive(Debug, Clone)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub lexeme: &'a str,
    pub line: usize,
    pub span: Span,
}

impl PartialEq for Token<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.lexeme == other.lexeme
    }
}

impl Eq for Token<'_> {}

impl<'a> Token<'a> {
    pub fn new(kind: TokenKind, lexeme: &'a str, line: usize, span: Span) -> Self {
        Self {
            kind,
            lexeme,
            line,
            span,
        }
    }
}

impl std::fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(\"{}\", {})", self.lexeme, self.kind)
    }
}

#[derive(Debug, Eq, PartialEq, Clone, Copy, Hash)]
pub enum TokenKind {
    // Specials
    EndOfFile,
    InvalidToken,
    UnexpectedEof,

    // Symbols
    Comma,
    Semicolon,
    LParen,
    RParen,
    LBrace,
    RBrace,
    Comment,

    // Operators
    Assign,
    Eq,
    Neq,
    Lt,
    Gt,
    Le,
    Ge,
    Plus,
    Minus,
    Mul,
    Div,
    And,
    Or,
    Not,

    // Keywords
    App,
    Var,
    Init,
    Return,
    Integer,
    Real,
    If,
    Else,
    Then,
    End,
    Repeat,
    Until,
    Read,
    Write,

    // Literals
    Name,
    IntLiteral,
    RealLiteral,
    Text,
}

impl TokenKind {
    pub fn is_relational(self) -> bool {
        matches!(
            self,
            TokenKind::Eq
                | TokenKind::Neq
                | TokenKind::Lt
                | TokenKind::Gt
                | TokenKind::Le
                | TokenKind::Ge
        )
    }

    /// Whether a lexeme of this kind can begin a simple expression.
    pub fn starts_expression(self) -> bool {
        matches!(
            self,
            TokenKind::Name
                | TokenKind::IntLiteral
                | TokenKind::RealLiteral
                | TokenKind::LParen
                | TokenKind::Not
                | TokenKind::Minus
        )
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                TokenKind::EndOfFile => "END_OF_FILE",
                TokenKind::InvalidToken => "INVALID_TOKEN",
                TokenKind::UnexpectedEof => "UNEXPECTED_EOF",
                TokenKind::Comma => "COMMA",
                TokenKind::Semicolon => "SEMICOLON",
                TokenKind::LParen => "OPEN_PAR",
                TokenKind::RParen => "CLOSE_PAR",
                TokenKind::LBrace => "OPEN_CUR",
                TokenKind::RBrace => "CLOSE_CUR",
                TokenKind::Comment => "COMMENT",
                TokenKind::Assign => "ASSIGN",
                TokenKind::Eq => "EQUAL",
                TokenKind::Neq => "NOT_EQUAL",
                TokenKind::Lt => "LOWER_THAN",
                TokenKind::Gt => "GREATER_THAN",
                TokenKind::Le => "LOWER_EQUAL",
                TokenKind::Ge => "GREATER_EQUAL",
                TokenKind::Plus => "ADD",
                TokenKind::Minus => "SUB",
                TokenKind::Mul => "MUL",
                TokenKind::Div => "DIV",
                TokenKind::And => "AND",
                TokenKind::Or => "OR",
                TokenKind::Not => "NOT",
                TokenKind::App => "APP",
                TokenKind::Var => "VAR",
                TokenKind::Init => "INIT",
                TokenKind::Return => "RETURN",
                TokenKind::Integer => "INTEGER",
                TokenKind::Real => "REAL",
                TokenKind::If => "IF",
                TokenKind::Else => "ELSE",
                TokenKind::Then => "THEN",
                TokenKind::End => "END",
                TokenKind::Repeat => "REPEAT",
                TokenKind::Until => "UNTIL",
                TokenKind::Read => "READ",
                TokenKind::Write => "WRITE",
                TokenKind::Name => "NAME",
                TokenKind::IntLiteral => "INT_NUMBER",
                TokenKind::RealLiteral => "REAL_NUMBER",
                TokenKind::Text => "TEXT",
            }
        )
    }
}
