use std::collections::HashMap;

use super::ValueType;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Var {
    pub name: String,
    pub ty: ValueType,
}

/// Flat, program-wide table of declared names and their types, kept in
/// declaration order.
#[derive(Debug, Clone, Default)]
pub struct VarTable {
    entries: Vec<Var>,
    index: HashMap<String, usize>,
}

impl VarTable {
    pub fn new() -> Self {
        VarTable::default()
    }

    /// Adds `name` unless it is already present. Returns whether it was added.
    pub fn insert(&mut self, name: &str, ty: ValueType) -> bool {
        if self.index.contains_key(name) {
            return false;
        }

        self.index.insert(name.to_string(), self.entries.len());
        self.entries.push(Var {
            name: name.to_string(),
            ty,
        });
        true
    }

    fn get(&self, name: &str) -> Option<&Var> {
        self.index.get(name).map(|&i| &self.entries[i])
    }

    pub fn type_of(&self, name: &str) -> Option<ValueType> {
        self.get(name).map(|var| var.ty)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Var> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
