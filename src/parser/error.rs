use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

use crate::ErrorKind;
use crate::lexer::LexerError;
use crate::sema::SemaError;

#[derive(Debug, Clone, Error, Diagnostic)]
pub enum ParserError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    LexerError(#[from] LexerError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    SemaError(#[from] SemaError),

    #[diagnostic(code(parser::unexpected_lexeme))]
    #[error("Unexpected lexeme [{lexeme}]")]
    UnexpectedLexeme {
        lexeme: String,
        line: usize,
        #[label]
        span: SourceSpan,
    },

    #[diagnostic(code(parser::unexpected_eof))]
    #[error("Unexpected end of file")]
    UnexpectedEof {
        line: usize,
        #[label]
        span: SourceSpan,
    },
}

impl ParserError {
    pub fn line(&self) -> usize {
        match self {
            ParserError::LexerError(e) => e.line(),
            ParserError::SemaError(e) => e.line(),
            ParserError::UnexpectedLexeme { line, .. }
            | ParserError::UnexpectedEof { line, .. } => *line,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ParserError::LexerError(e) => e.kind(),
            ParserError::SemaError(e) => e.kind(),
            ParserError::UnexpectedLexeme { .. } | ParserError::UnexpectedEof { .. } => {
                ErrorKind::Syntax
            }
        }
    }
}
