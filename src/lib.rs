use thiserror::Error;

pub mod lexer;
pub mod parser;
pub mod sema;

pub use lexer::{Lexer, LexerError, Token, TokenKind};
pub use parser::{Checked, Output, Parser, ParserError};
pub use sema::{SemaError, ValueType, VarTable};

/// Stage of the pipeline a source diagnostic comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Lexical,
    Syntax,
    Semantic,
}

/// Failure of a whole run: either the environment (reading the input) or the
/// program text itself.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("internal error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Source(#[from] ParserError),
}

impl From<LexerError> for CompileError {
    fn from(e: LexerError) -> Self {
        CompileError::Source(e.into())
    }
}

impl CompileError {
    /// Process exit status: 2 for environment failures, 1 for source errors.
    pub fn exit_code(&self) -> i32 {
        match self {
            CompileError::Io(_) => 2,
            CompileError::Source(_) => 1,
        }
    }
}

/// Scans, parses and checks `source` with a fresh parser, stopping at the
/// first error.
pub fn check(source: &str) -> Result<Checked<'_>, ParserError> {
    Parser::new(source).parse()
}
