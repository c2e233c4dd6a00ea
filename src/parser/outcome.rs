use crate::sema::{ValueType, VarTable};

/// What a `write` statement prints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output<'a> {
    Text(&'a str),
    Expr { source: &'a str, ty: ValueType },
}

/// Summary of an accepted program.
#[derive(Debug, Clone)]
pub struct Checked<'a> {
    pub name: &'a str,
    pub vars: VarTable,
    pub outputs: Vec<Output<'a>>,
}
