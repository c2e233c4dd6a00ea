mod error;
mod reserved;
mod symbols;
mod token;

pub use error::LexerError;
pub use reserved::ReservedTable;
pub use symbols::SymbolTable;
pub use token::{Span, Token, TokenKind};

/// Lexical context the scanner is in while building a single lexeme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Start,
    Identifier,
    Integer,
    FractionStart,
    Fraction,
    Relational,
    Colon,
    Pipe,
    Ampersand,
    Comment,
    Text,
}

/// Finite-state scanner producing one lexeme per call to [`Lexer::next_token`].
///
/// Lexemes borrow their text from the input. At most one character is ever
/// pushed back, so a token boundary is always decided by a single character
/// of lookahead.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    input: &'a str,
    idx: usize,
    line: usize,
    pushed_back: bool,
    reserved: ReservedTable,
    symbols: SymbolTable,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            idx: 0,
            line: 1,
            pushed_back: false,
            reserved: ReservedTable::new(),
            symbols: SymbolTable::new(),
        }
    }

    pub fn lex(&mut self) -> Result<Vec<Token<'a>>, LexerError> {
        self.by_ref().collect()
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn next_token(&mut self) -> Token<'a> {
        let mut state = State::Start;
        let mut start = self.idx;

        loop {
            let c = self.next_char();

            match state {
                State::Start => match c {
                    None => return self.token(TokenKind::EndOfFile, start),
                    Some(' ' | '\t' | '\r' | '\n') => start = self.idx,
                    Some(c) if c.is_alphabetic() || c == '_' => state = State::Identifier,
                    Some(c) if c.is_ascii_digit() => state = State::Integer,
                    Some('<' | '>' | '!') => state = State::Relational,
                    Some(':') => state = State::Colon,
                    Some('|') => state = State::Pipe,
                    Some('&') => state = State::Ampersand,
                    Some('%') => state = State::Comment,
                    Some('{') => {
                        start = self.idx;
                        state = State::Text;
                    }
                    Some(';' | ',' | '=' | '+' | '-' | '*' | '/' | '(' | ')') => {
                        return self.accept(start);
                    }
                    Some(_) => return self.token(TokenKind::InvalidToken, start),
                },

                State::Identifier => match c {
                    Some(c) if c.is_alphanumeric() || c == '_' => {}
                    _ => {
                        self.unget(c);
                        return self.accept(start);
                    }
                },

                State::Integer => match c {
                    Some(c) if c.is_ascii_digit() => {}
                    Some('.') => state = State::FractionStart,
                    _ => {
                        self.unget(c);
                        return self.token(TokenKind::IntLiteral, start);
                    }
                },

                // A '.' must be followed by at least one digit.
                State::FractionStart => match c {
                    Some(c) if c.is_ascii_digit() => state = State::Fraction,
                    _ => {
                        self.unget(c);
                        return self.token(TokenKind::InvalidToken, start);
                    }
                },

                State::Fraction => match c {
                    Some(c) if c.is_ascii_digit() => {}
                    _ => {
                        self.unget(c);
                        return self.token(TokenKind::RealLiteral, start);
                    }
                },

                State::Relational => {
                    if c != Some('=') {
                        self.unget(c);
                    }
                    return self.accept(start);
                }

                State::Colon => return self.complete_pair(c, '=', start),
                State::Pipe => return self.complete_pair(c, '|', start),
                State::Ampersand => return self.complete_pair(c, '&', start),

                State::Comment => match c {
                    None => return self.token(TokenKind::EndOfFile, self.idx),
                    Some('\n') => {
                        start = self.idx;
                        state = State::Start;
                    }
                    Some(_) => {}
                },

                State::Text => match c {
                    None => return self.token(TokenKind::UnexpectedEof, start),
                    Some('}') => {
                        let end = self.idx - 1;
                        return Token::new(
                            TokenKind::Text,
                            &self.input[start..end],
                            self.line,
                            Span::new(start, end),
                        );
                    }
                    Some(_) => {}
                },
            }
        }
    }

    fn next_char(&mut self) -> Option<char> {
        let c = self.input[self.idx..].chars().next()?;
        self.idx += c.len_utf8();
        self.pushed_back = false;
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn unget(&mut self, c: Option<char>) {
        let Some(c) = c else {
            return;
        };

        debug_assert!(!self.pushed_back, "pushback holds a single character");
        self.pushed_back = true;
        self.idx -= c.len_utf8();
        if c == '\n' {
            self.line -= 1;
        }
    }

    // `:`, `|` and `&` are only valid when doubled into their second half.
    fn complete_pair(&mut self, c: Option<char>, second: char, start: usize) -> Token<'a> {
        if c == Some(second) {
            self.accept(start)
        } else {
            self.unget(c);
            self.token(TokenKind::InvalidToken, start)
        }
    }

    fn accept(&mut self, start: usize) -> Token<'a> {
        let lexeme = &self.input[start..self.idx];
        let kind = self.reserved.find(lexeme);
        if kind == TokenKind::Name {
            self.symbols.register(lexeme);
        }
        self.token(kind, start)
    }

    fn token(&self, kind: TokenKind, start: usize) -> Token<'a> {
        Token::new(
            kind,
            &self.input[start..self.idx],
            self.line,
            Span::new(start, self.idx),
        )
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token<'a>, LexerError>;

    fn next(&mut self) -> Option<Self::Item> {
        let tok = self.next_token();
        if tok.kind == TokenKind::EndOfFile {
            return None;
        }

        match LexerError::from_token(&tok) {
            Some(err) => Some(Err(err)),
            None => Some(Ok(tok)),
        }
    }
}
