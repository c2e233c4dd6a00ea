mod error;
mod vars;

pub use error::SemaError;
pub use vars::{Var, VarTable};

use crate::lexer::{ReservedTable, Span};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Program,
    Integer,
    Real,
    Boolean,
}

impl ValueType {
    pub fn is_numeric(self) -> bool {
        matches!(self, ValueType::Integer | ValueType::Real)
    }

    pub fn name(self) -> &'static str {
        match self {
            ValueType::Program => "program name",
            ValueType::Integer => "integer",
            ValueType::Real => "real",
            ValueType::Boolean => "boolean",
        }
    }
}

impl std::fmt::Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
    Or,
    And,
}

/// Where a check was triggered: the scanner line at detection time and the
/// source range of the offending construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub line: usize,
    pub span: Span,
}

impl Location {
    pub fn new(line: usize, span: Span) -> Self {
        Self { line, span }
    }
}

/// Type inference and checking rules applied by the parser as productions
/// complete. Owns the variable table for a single program.
#[derive(Debug, Clone, Default)]
pub struct Sema {
    reserved: ReservedTable,
    vars: VarTable,
}

impl Sema {
    pub fn new() -> Self {
        Sema::default()
    }

    pub fn vars(&self) -> &VarTable {
        &self.vars
    }

    pub fn declare_var(
        &mut self,
        name: &str,
        ty: ValueType,
        at: Location,
    ) -> Result<(), SemaError> {
        if self.reserved.contains(name) {
            return Err(SemaError::ReservedName {
                name: name.to_string(),
                line: at.line,
                span: at.span.into(),
            });
        }

        if !self.vars.insert(name, ty) {
            return Err(SemaError::AlreadyDeclared {
                name: name.to_string(),
                line: at.line,
                span: at.span.into(),
            });
        }

        Ok(())
    }

    pub fn require_declared(&self, name: &str, at: Location) -> Result<ValueType, SemaError> {
        self.vars
            .type_of(name)
            .ok_or_else(|| SemaError::NotDeclared {
                name: name.to_string(),
                line: at.line,
                span: at.span.into(),
            })
    }

    // Integer values widen into real targets; every other pair must match.
    pub fn check_assign(
        &self,
        name: &str,
        rhs: ValueType,
        at: Location,
    ) -> Result<(), SemaError> {
        let target = self.require_declared(name, at)?;

        match (target, rhs) {
            (ValueType::Program, _) => Err(program_name_misuse("as an assignment target", at)),
            (ValueType::Real, ValueType::Integer) => Ok(()),
            (target, rhs) if target == rhs => Ok(()),
            (target, rhs) => Err(type_mismatch(target.name(), rhs, at)),
        }
    }

    pub fn check_read(&self, name: &str, at: Location) -> Result<(), SemaError> {
        match self.require_declared(name, at)? {
            ValueType::Program => Err(program_name_misuse("as a read target", at)),
            _ => Ok(()),
        }
    }

    pub fn combine(
        &self,
        lhs: ValueType,
        rhs: ValueType,
        op: BinaryOperator,
        at: Location,
    ) -> Result<ValueType, SemaError> {
        match op {
            BinaryOperator::Or => match (lhs, rhs) {
                (ValueType::Boolean, ValueType::Boolean) => Ok(ValueType::Boolean),
                (ValueType::Boolean, other) | (other, _) => {
                    Err(type_mismatch(ValueType::Boolean.name(), other, at))
                }
            },
            BinaryOperator::And => self.logical(lhs, rhs, at),
            BinaryOperator::Add
            | BinaryOperator::Sub
            | BinaryOperator::Mul
            | BinaryOperator::Div => {
                if lhs == ValueType::Program || rhs == ValueType::Program {
                    return Err(program_name_misuse("in an arithmetic operation", at));
                }

                if lhs == ValueType::Real || rhs == ValueType::Real {
                    Ok(ValueType::Real)
                } else {
                    Ok(ValueType::Integer)
                }
            }
        }
    }

    pub fn compare(
        &self,
        lhs: ValueType,
        rhs: ValueType,
        at: Location,
    ) -> Result<ValueType, SemaError> {
        if lhs == ValueType::Program || rhs == ValueType::Program {
            return Err(program_name_misuse("in a comparison", at));
        }

        Ok(ValueType::Boolean)
    }

    pub fn logical(
        &self,
        lhs: ValueType,
        rhs: ValueType,
        at: Location,
    ) -> Result<ValueType, SemaError> {
        match (lhs, rhs) {
            (ValueType::Program, _) | (_, ValueType::Program) => {
                Err(program_name_misuse("in a logical operation", at))
            }
            (ValueType::Boolean, ValueType::Boolean) => Ok(ValueType::Boolean),
            (ValueType::Boolean, other) | (other, _) => {
                Err(type_mismatch(ValueType::Boolean.name(), other, at))
            }
        }
    }

    pub fn check_unary_numeric(
        &self,
        ty: ValueType,
        at: Location,
    ) -> Result<ValueType, SemaError> {
        match ty {
            ValueType::Program => Err(program_name_misuse("in an arithmetic operation", at)),
            ty if ty.is_numeric() => Ok(ty),
            ty => Err(type_mismatch("integer or real", ty, at)),
        }
    }

    pub fn require_boolean(&self, ty: ValueType, at: Location) -> Result<ValueType, SemaError> {
        match ty {
            ValueType::Boolean => Ok(ty),
            found => Err(SemaError::NotBoolean {
                found,
                line: at.line,
                span: at.span.into(),
            }),
        }
    }
}

fn program_name_misuse(usage: &'static str, at: Location) -> SemaError {
    SemaError::ProgramNameMisuse {
        usage,
        line: at.line,
        span: at.span.into(),
    }
}

fn type_mismatch(expected: &'static str, found: ValueType, at: Location) -> SemaError {
    SemaError::TypeMismatch {
        expected,
        found,
        line: at.line,
        span: at.span.into(),
    }
}
