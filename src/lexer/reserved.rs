use std::collections::HashMap;

use super::TokenKind;

/// Fixed mapping from the exact spelling of every symbol, operator and
/// keyword to its token category.
#[derive(Debug, Clone)]
pub struct ReservedTable {
    words: HashMap<&'static str, TokenKind>,
}

impl ReservedTable {
    pub fn new() -> Self {
        let words = HashMap::from([
            // Symbols
            (";", TokenKind::Semicolon),
            (",", TokenKind::Comma),
            ("(", TokenKind::LParen),
            (")", TokenKind::RParen),
            ("{", TokenKind::LBrace),
            ("}", TokenKind::RBrace),
            ("%", TokenKind::Comment),
            // Operators
            (":=", TokenKind::Assign),
            ("!", TokenKind::Not),
            ("=", TokenKind::Eq),
            (">", TokenKind::Gt),
            (">=", TokenKind::Ge),
            ("<", TokenKind::Lt),
            ("<=", TokenKind::Le),
            ("!=", TokenKind::Neq),
            ("+", TokenKind::Plus),
            ("-", TokenKind::Minus),
            ("||", TokenKind::Or),
            ("*", TokenKind::Mul),
            ("/", TokenKind::Div),
            ("&&", TokenKind::And),
            // Keywords
            ("app", TokenKind::App),
            ("var", TokenKind::Var),
            ("init", TokenKind::Init),
            ("return", TokenKind::Return),
            ("integer", TokenKind::Integer),
            ("real", TokenKind::Real),
            ("if", TokenKind::If),
            ("else", TokenKind::Else),
            ("then", TokenKind::Then),
            ("end", TokenKind::End),
            ("repeat", TokenKind::Repeat),
            ("until", TokenKind::Until),
            ("read", TokenKind::Read),
            ("write", TokenKind::Write),
        ]);

        ReservedTable { words }
    }

    pub fn contains(&self, spelling: &str) -> bool {
        self.words.contains_key(spelling)
    }

    /// Category of `spelling`, or [`TokenKind::Name`] when it is not reserved.
    pub fn find(&self, spelling: &str) -> TokenKind {
        self.words
            .get(spelling)
            .copied()
            .unwrap_or(TokenKind::Name)
    }
}

impl Default for ReservedTable {
    fn default() -> Self {
        ReservedTable::new()
    }
}
