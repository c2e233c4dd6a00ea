use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

use super::ValueType;
use crate::ErrorKind;

#[derive(Debug, Clone, Error, Diagnostic)]
pub enum SemaError {
    #[diagnostic(code(sema::not_declared))]
    #[error("Variable '{name}' not declared")]
    NotDeclared {
        name: String,
        line: usize,
        #[label]
        span: SourceSpan,
    },

    #[diagnostic(code(sema::already_declared))]
    #[error("Variable '{name}' already declared")]
    AlreadyDeclared {
        name: String,
        line: usize,
        #[label]
        span: SourceSpan,
    },

    #[diagnostic(code(sema::reserved_name))]
    #[error("Reserved word '{name}' cannot name a variable")]
    ReservedName {
        name: String,
        line: usize,
        #[label]
        span: SourceSpan,
    },

    #[diagnostic(code(sema::program_name_misuse))]
    #[error("The program name cannot be used {usage}")]
    ProgramNameMisuse {
        usage: &'static str,
        line: usize,
        #[label]
        span: SourceSpan,
    },

    #[diagnostic(code(sema::type_mismatch))]
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: ValueType,
        line: usize,
        #[label]
        span: SourceSpan,
    },

    #[diagnostic(code(sema::not_boolean))]
    #[error("Condition must be boolean, found {found}")]
    NotBoolean {
        found: ValueType,
        line: usize,
        #[label]
        span: SourceSpan,
    },
}

impl SemaError {
    pub fn line(&self) -> usize {
        match self {
            SemaError::NotDeclared { line, .. }
            | SemaError::AlreadyDeclared { line, .. }
            | SemaError::ReservedName { line, .. }
            | SemaError::ProgramNameMisuse { line, .. }
            | SemaError::TypeMismatch { line, .. }
            | SemaError::NotBoolean { line, .. } => *line,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Semantic
    }
}
