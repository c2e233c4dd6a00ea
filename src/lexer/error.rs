use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

use super::{Token, TokenKind};
use crate::ErrorKind;

#[derive(Debug, Clone, Error, Diagnostic)]
pub enum LexerError {
    #[diagnostic(code(lexer::invalid_token))]
    #[error("Invalid lexeme [{lexeme}]")]
    InvalidToken {
        lexeme: String,
        line: usize,
        #[label]
        span: SourceSpan,
    },

    #[diagnostic(code(lexer::unterminated_text))]
    #[error("Unexpected end of file inside text block")]
    UnterminatedText {
        line: usize,
        #[label("text starts here")]
        span: SourceSpan,
    },
}

impl LexerError {
    /// Turns an INVALID_TOKEN or UNEXPECTED_EOF lexeme into the matching error.
    pub fn from_token(tok: &Token<'_>) -> Option<Self> {
        match tok.kind {
            TokenKind::InvalidToken => Some(LexerError::InvalidToken {
                lexeme: tok.lexeme.to_string(),
                line: tok.line,
                span: tok.span.into(),
            }),
            TokenKind::UnexpectedEof => Some(LexerError::UnterminatedText {
                line: tok.line,
                span: tok.span.into(),
            }),
            _ => None,
        }
    }

    pub fn line(&self) -> usize {
        match self {
            LexerError::InvalidToken { line, .. } | LexerError::UnterminatedText { line, .. } => {
                *line
            }
        }
    }

    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Lexical
    }
}
