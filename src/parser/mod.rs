mod error;
mod outcome;

pub use error::ParserError;
pub use outcome::{Checked, Output};

use crate::lexer::{Lexer, LexerError, Span, SymbolTable, Token, TokenKind};
use crate::sema::{BinaryOperator, Location, Sema, ValueType, VarTable};

/// Predictive recursive-descent parser with the semantic checks applied
/// inline as each production completes.
///
/// Tokens are pulled from the lexer one at a time; `tok` is the only
/// lookahead ever held.
pub struct Parser<'a> {
    input: &'a str,
    lexer: Lexer<'a>,
    tok: Token<'a>,
    prev_end: usize,
    sema: Sema,
    outputs: Vec<Output<'a>>,
    trace: Option<Vec<String>>,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        let mut lexer = Lexer::new(input);
        let tok = lexer.next_token();

        Parser {
            input,
            lexer,
            tok,
            prev_end: 0,
            sema: Sema::new(),
            outputs: Vec::new(),
            trace: None,
        }
    }

    /// Records every production entered and every lexeme expected or
    /// consumed, readable through [`Parser::trace`].
    pub fn with_trace(mut self) -> Self {
        self.trace = Some(Vec::new());
        self
    }

    pub fn trace(&self) -> &[String] {
        self.trace.as_deref().unwrap_or_default()
    }

    pub fn symbols(&self) -> &SymbolTable {
        self.lexer.symbols()
    }

    pub fn vars(&self) -> &VarTable {
        self.sema.vars()
    }

    // <program> ::= "app" <name> <body>
    pub fn parse(&mut self) -> Result<Checked<'a>, ParserError> {
        self.enter("program");
        self.expect(TokenKind::App)?;

        let name = self.expect(TokenKind::Name)?;
        let at = self.at(&name);
        self.sema.declare_var(name.lexeme, ValueType::Program, at)?;

        self.parse_body()?;
        self.expect(TokenKind::EndOfFile)?;

        Ok(Checked {
            name: name.lexeme,
            vars: self.sema.vars().clone(),
            outputs: std::mem::take(&mut self.outputs),
        })
    }

    fn enter(&mut self, production: &str) {
        if let Some(trace) = self.trace.as_mut() {
            trace.push(production.to_string());
        }
    }

    fn advance(&mut self) -> Token<'a> {
        if let Some(trace) = self.trace.as_mut() {
            trace.push(format!("advanced {}", self.tok));
        }

        let next = self.lexer.next_token();
        let tok = std::mem::replace(&mut self.tok, next);
        self.prev_end = tok.span.end;
        tok
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token<'a>, ParserError> {
        if let Some(trace) = self.trace.as_mut() {
            trace.push(format!("expected {}, found {}", kind, self.tok));
        }

        if self.tok.kind == kind {
            Ok(self.advance())
        } else {
            Err(self.unexpected())
        }
    }

    fn unexpected(&self) -> ParserError {
        if let Some(err) = LexerError::from_token(&self.tok) {
            return err.into();
        }

        match self.tok.kind {
            TokenKind::EndOfFile => ParserError::UnexpectedEof {
                line: self.lexer.line(),
                span: self.tok.span.into(),
            },
            _ => ParserError::UnexpectedLexeme {
                lexeme: self.tok.lexeme.to_string(),
                line: self.lexer.line(),
                span: self.tok.span.into(),
            },
        }
    }

    fn at(&self, tok: &Token<'_>) -> Location {
        Location::new(self.lexer.line(), tok.span)
    }

    // Covers everything consumed since `start`.
    fn since(&self, start: usize) -> Location {
        Location::new(self.lexer.line(), Span::new(start, self.prev_end.max(start)))
    }

    // <body> ::= [ "var" <decl-list> ] "init" <stmt-list> "return"
    fn parse_body(&mut self) -> Result<(), ParserError> {
        self.enter("body");
        if self.tok.kind == TokenKind::Var {
            self.advance();
            self.parse_decl_list()?;
        }

        self.expect(TokenKind::Init)?;
        self.parse_stmt_list()?;
        self.expect(TokenKind::Return)?;
        Ok(())
    }

    // <decl-list> ::= <decl> { ";" <decl> }
    fn parse_decl_list(&mut self) -> Result<(), ParserError> {
        self.enter("decl-list");
        self.parse_decl()?;

        while self.tok.kind == TokenKind::Semicolon {
            self.advance();
            if self.tok.kind == TokenKind::Init {
                break;
            }
            self.parse_decl()?;
        }
        Ok(())
    }

    // <decl> ::= <type> <ident-list>
    fn parse_decl(&mut self) -> Result<(), ParserError> {
        self.enter("decl");
        let ty = self.parse_type()?;
        self.parse_ident_list(ty)
    }

    // <type> ::= "integer" | "real"
    fn parse_type(&mut self) -> Result<ValueType, ParserError> {
        self.enter("type");
        let ty = match self.tok.kind {
            TokenKind::Integer => ValueType::Integer,
            TokenKind::Real => ValueType::Real,
            _ => return Err(self.unexpected()),
        };

        self.advance();
        Ok(ty)
    }

    // <ident-list> ::= <name> { "," <name> }
    fn parse_ident_list(&mut self, ty: ValueType) -> Result<(), ParserError> {
        self.enter("ident-list");
        loop {
            let name = self.expect(TokenKind::Name)?;
            let at = self.at(&name);
            self.sema.declare_var(name.lexeme, ty, at)?;

            if self.tok.kind != TokenKind::Comma {
                return Ok(());
            }
            self.advance();
        }
    }

    // <stmt-list> ::= <stmt> { ";" <stmt> }
    fn parse_stmt_list(&mut self) -> Result<(), ParserError> {
        self.enter("stmt-list");
        self.parse_stmt()?;

        while self.tok.kind == TokenKind::Semicolon {
            self.advance();
            self.parse_stmt()?;
        }
        Ok(())
    }

    // <stmt> ::= <assign-stmt> | <if-stmt> | <repeat-stmt> | <read-stmt> | <write-stmt>
    fn parse_stmt(&mut self) -> Result<(), ParserError> {
        self.enter("stmt");
        match self.tok.kind {
            TokenKind::Name => self.parse_assign_stmt(),
            TokenKind::If => self.parse_if_stmt(),
            TokenKind::Repeat => self.parse_repeat_stmt(),
            TokenKind::Read => self.parse_read_stmt(),
            TokenKind::Write => self.parse_write_stmt(),
            _ => Err(self.unexpected()),
        }
    }

    // <assign-stmt> ::= <name> ":=" <simple-expr>
    fn parse_assign_stmt(&mut self) -> Result<(), ParserError> {
        self.enter("assign-stmt");
        let name = self.expect(TokenKind::Name)?;
        let at = self.at(&name);
        self.sema.require_declared(name.lexeme, at)?;

        self.expect(TokenKind::Assign)?;
        let rhs = self.parse_simple_expr()?;

        let at = self.at(&name);
        self.sema.check_assign(name.lexeme, rhs, at)?;
        Ok(())
    }

    // <if-stmt> ::= "if" <condition> "then" <stmt-list> [ "else" <stmt-list> ] "end"
    fn parse_if_stmt(&mut self) -> Result<(), ParserError> {
        self.enter("if-stmt");
        self.expect(TokenKind::If)?;
        self.parse_condition()?;
        self.expect(TokenKind::Then)?;
        self.parse_stmt_list()?;

        if self.tok.kind == TokenKind::Else {
            self.advance();
            self.parse_stmt_list()?;
        }

        self.expect(TokenKind::End)?;
        Ok(())
    }

    // <repeat-stmt> ::= "repeat" <stmt-list> "until" <condition>
    fn parse_repeat_stmt(&mut self) -> Result<(), ParserError> {
        self.enter("repeat-stmt");
        self.expect(TokenKind::Repeat)?;
        self.parse_stmt_list()?;
        self.expect(TokenKind::Until)?;
        self.parse_condition()?;
        Ok(())
    }

    // <read-stmt> ::= "read" "(" <name> ")"
    fn parse_read_stmt(&mut self) -> Result<(), ParserError> {
        self.enter("read-stmt");
        self.expect(TokenKind::Read)?;
        self.expect(TokenKind::LParen)?;

        let name = self.expect(TokenKind::Name)?;
        let at = self.at(&name);
        self.sema.check_read(name.lexeme, at)?;

        self.expect(TokenKind::RParen)?;
        Ok(())
    }

    // <write-stmt> ::= "write" "(" <writable> ")"
    // <writable>   ::= <simple-expr> | <text>
    fn parse_write_stmt(&mut self) -> Result<(), ParserError> {
        self.enter("write-stmt");
        self.expect(TokenKind::Write)?;
        self.expect(TokenKind::LParen)?;

        let output = match self.tok.kind {
            TokenKind::Text => Output::Text(self.advance().lexeme),
            kind if kind.starts_expression() => {
                let start = self.tok.span.start;
                let ty = self.parse_simple_expr()?;
                let input = self.input;
                Output::Expr {
                    source: &input[start..self.prev_end],
                    ty,
                }
            }
            _ => return Err(self.unexpected()),
        };

        self.expect(TokenKind::RParen)?;
        self.outputs.push(output);
        Ok(())
    }

    // <condition> ::= <expression>
    fn parse_condition(&mut self) -> Result<ValueType, ParserError> {
        self.enter("condition");
        let start = self.tok.span.start;
        let ty = self.parse_expr()?;

        let at = self.since(start);
        Ok(self.sema.require_boolean(ty, at)?)
    }

    // <expression> ::= <simple-expr> [ <relop> <simple-expr> ]
    fn parse_expr(&mut self) -> Result<ValueType, ParserError> {
        self.enter("expression");
        let start = self.tok.span.start;
        let lhs = self.parse_simple_expr()?;

        if !self.tok.kind.is_relational() {
            return Ok(lhs);
        }

        self.advance();
        let rhs = self.parse_simple_expr()?;

        let at = self.since(start);
        Ok(self.sema.compare(lhs, rhs, at)?)
    }

    // <simple-expr> ::= <term> { ( "+" | "-" | "||" ) <term> }
    fn parse_simple_expr(&mut self) -> Result<ValueType, ParserError> {
        self.enter("simple-expr");
        let start = self.tok.span.start;
        let mut ty = self.parse_term()?;

        loop {
            let op = match self.tok.kind {
                TokenKind::Plus => BinaryOperator::Add,
                TokenKind::Minus => BinaryOperator::Sub,
                TokenKind::Or => BinaryOperator::Or,
                _ => return Ok(ty),
            };

            self.advance();
            let rhs = self.parse_term()?;

            let at = self.since(start);
            ty = self.sema.combine(ty, rhs, op, at)?;
        }
    }

    // <term> ::= <factor-a> { ( "*" | "/" | "&&" ) <factor-a> }
    fn parse_term(&mut self) -> Result<ValueType, ParserError> {
        self.enter("term");
        let start = self.tok.span.start;
        let mut ty = self.parse_unary()?;

        loop {
            let op = match self.tok.kind {
                TokenKind::Mul => BinaryOperator::Mul,
                TokenKind::Div => BinaryOperator::Div,
                TokenKind::And => BinaryOperator::And,
                _ => return Ok(ty),
            };

            self.advance();
            let rhs = self.parse_unary()?;

            let at = self.since(start);
            ty = self.sema.combine(ty, rhs, op, at)?;
        }
    }

    // <factor-a> ::= <factor> | "!" <factor> | "-" <factor>
    fn parse_unary(&mut self) -> Result<ValueType, ParserError> {
        self.enter("factor-a");
        let start = self.tok.span.start;

        match self.tok.kind {
            TokenKind::Not => {
                self.advance();
                let ty = self.parse_factor()?;
                let at = self.since(start);
                Ok(self.sema.require_boolean(ty, at)?)
            }
            TokenKind::Minus => {
                self.advance();
                let ty = self.parse_factor()?;
                let at = self.since(start);
                Ok(self.sema.check_unary_numeric(ty, at)?)
            }
            _ => self.parse_factor(),
        }
    }

    // <factor> ::= <name> | <int> | <real> | "(" <expression> ")"
    fn parse_factor(&mut self) -> Result<ValueType, ParserError> {
        self.enter("factor");
        match self.tok.kind {
            TokenKind::Name => {
                let name = self.advance();
                let at = self.at(&name);
                Ok(self.sema.require_declared(name.lexeme, at)?)
            }
            TokenKind::IntLiteral => {
                self.advance();
                Ok(ValueType::Integer)
            }
            TokenKind::RealLiteral => {
                self.advance();
                Ok(ValueType::Real)
            }
            TokenKind::LParen => {
                self.advance();
                let ty = self.parse_expr()?;
                self.expect(TokenKind::RParen)?;
                Ok(ty)
            }
            _ => Err(self.unexpected()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use crate::sema::SemaError;

    fn parse(input: &str) -> Result<Checked<'_>, ParserError> {
        Parser::new(input).parse()
    }

    fn expr(source: &str, ty: ValueType) -> Output<'_> {
        Output::Expr { source, ty }
    }

    #[test]
    fn minimal_program() {
        let checked = parse("app T init write({hi}) return").unwrap();

        assert_eq!(checked.name, "T");
        assert_eq!(checked.vars.type_of("T"), Some(ValueType::Program));
        assert_eq!(checked.outputs, vec![Output::Text("hi")]);
    }

    #[test]
    fn declarations_and_write() {
        let checked = parse("app T var integer a; init a := 1; write(a) return").unwrap();

        assert_eq!(checked.vars.len(), 2);
        assert_eq!(checked.vars.type_of("a"), Some(ValueType::Integer));
        assert_eq!(checked.outputs, vec![expr("a", ValueType::Integer)]);
    }

    #[test]
    fn declaration_lists() {
        let checked = parse(
            "app Calc
             var integer a, b, c; real x, y
             init
               a := 1;
               x := a * 2.5
             return",
        )
        .unwrap();

        let types: Vec<_> = checked.vars.iter().map(|var| (var.name.as_str(), var.ty)).collect();
        assert_eq!(
            types,
            vec![
                ("Calc", ValueType::Program),
                ("a", ValueType::Integer),
                ("b", ValueType::Integer),
                ("c", ValueType::Integer),
                ("x", ValueType::Real),
                ("y", ValueType::Real),
            ]
        );
    }

    #[test]
    fn control_flow() {
        let checked = parse(
            "app Loop
             var integer i, n; real avg
             init
               read(n);
               i := 0;
               avg := 0;
               repeat
                 i := i + 1;
                 if (i > 10) || !(i != n) then
                   write({done})
                 else
                   avg := (avg + i) / 2
                 end
               until i >= n;
               write(avg * 1.5)
             return",
        )
        .unwrap();

        assert_eq!(
            checked.outputs,
            vec![Output::Text("done"), expr("avg * 1.5", ValueType::Real)]
        );
    }

    #[test]
    fn write_expression_source() {
        let checked = parse("app T var integer a init write(-a + (2 * a)) return").unwrap();

        assert_eq!(checked.outputs, vec![expr("-a + (2 * a)", ValueType::Integer)]);
    }

    #[test]
    fn undeclared_variable() {
        let err = parse("app T\ninit\n  a := 1\nreturn").unwrap_err();

        assert!(matches!(
            err,
            ParserError::SemaError(SemaError::NotDeclared { ref name, .. }) if name == "a"
        ));
        assert_eq!(err.kind(), ErrorKind::Semantic);
        assert_eq!(err.line(), 3);
    }

    #[test]
    fn undeclared_in_expression() {
        let err = parse("app T var integer a init a := b + 1 return").unwrap_err();

        assert!(matches!(
            err,
            ParserError::SemaError(SemaError::NotDeclared { ref name, .. }) if name == "b"
        ));
    }

    #[test]
    fn widening_assignment() {
        assert!(parse("app T var real r init r := 1 + 2 return").is_ok());

        let err = parse("app T var integer i init i := 2.5 return").unwrap_err();
        assert!(matches!(
            err,
            ParserError::SemaError(SemaError::TypeMismatch {
                found: ValueType::Real,
                ..
            })
        ));
    }

    #[test]
    fn mixed_arithmetic_is_real() {
        let err = parse("app T var integer i init i := 1 + 2 * 3 - 4 / 2.0 return").unwrap_err();

        assert!(matches!(
            err,
            ParserError::SemaError(SemaError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn program_name_misuse() {
        let err = parse("app T var integer a init T := 1 return").unwrap_err();
        assert!(matches!(
            err,
            ParserError::SemaError(SemaError::ProgramNameMisuse { .. })
        ));

        let err = parse("app T var integer a init a := T + 1 return").unwrap_err();
        assert!(matches!(
            err,
            ParserError::SemaError(SemaError::ProgramNameMisuse { .. })
        ));

        let err = parse("app T init read(T) return").unwrap_err();
        assert!(matches!(
            err,
            ParserError::SemaError(SemaError::ProgramNameMisuse { .. })
        ));
    }

    #[test]
    fn redeclaration() {
        for src in [
            "app T var integer a; integer a init a := 1 return",
            "app T var integer a; real a init a := 1 return",
            "app T var integer a, a init a := 1 return",
            "app T var real T init write({x}) return",
        ] {
            assert!(
                matches!(
                    parse(src),
                    Err(ParserError::SemaError(SemaError::AlreadyDeclared { .. }))
                ),
                "{src}"
            );
        }
    }

    #[test]
    fn conditions_must_be_boolean() {
        let err = parse("app T var integer a init if a then a := 1 end return").unwrap_err();
        assert!(matches!(
            err,
            ParserError::SemaError(SemaError::NotBoolean {
                found: ValueType::Integer,
                ..
            })
        ));

        let err = parse("app T var integer a init repeat a := 1 until a + 1 return").unwrap_err();
        assert!(matches!(
            err,
            ParserError::SemaError(SemaError::NotBoolean { .. })
        ));

        let err = parse("app T var integer a init if !a then a := 1 end return").unwrap_err();
        assert!(matches!(
            err,
            ParserError::SemaError(SemaError::NotBoolean { .. })
        ));
    }

    #[test]
    fn boolean_operands() {
        assert!(parse("app T var integer a init if (a < 1) && (a > 0) then a := 1 end return")
            .is_ok());

        let err =
            parse("app T var integer a init if a < 1 && a then a := 1 end return").unwrap_err();
        assert!(matches!(
            err,
            ParserError::SemaError(SemaError::TypeMismatch { .. })
        ));

        let err = parse("app T var integer a init a := -(a < 1) return").unwrap_err();
        assert!(matches!(
            err,
            ParserError::SemaError(SemaError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn unexpected_lexeme() {
        let err = parse("app T var integer a init a = 1 return").unwrap_err();

        assert!(matches!(
            err,
            ParserError::UnexpectedLexeme { ref lexeme, line: 1, .. } if lexeme == "="
        ));
        assert_eq!(err.kind(), ErrorKind::Syntax);
    }

    #[test]
    fn keyword_is_not_a_variable_name() {
        let err = parse("app T var integer if init write({x}) return").unwrap_err();

        assert!(matches!(
            err,
            ParserError::UnexpectedLexeme { ref lexeme, .. } if lexeme == "if"
        ));
    }

    #[test]
    fn unexpected_end_of_file() {
        let err = parse("app T var integer a\ninit a := 1\n").unwrap_err();

        assert!(matches!(err, ParserError::UnexpectedEof { line: 3, .. }));
    }

    #[test]
    fn trailing_input() {
        let err = parse("app T init write({x}) return return").unwrap_err();

        assert!(matches!(
            err,
            ParserError::UnexpectedLexeme { ref lexeme, .. } if lexeme == "return"
        ));
    }

    #[test]
    fn semicolon_must_precede_a_statement() {
        assert!(parse("app T var integer a; init a := 1 return").is_ok());

        for src in [
            "app T var integer a init a := 1; return",
            "app T var integer a init if a > 0 then a := 1; else a := 2 end return",
            "app T var integer a init if a > 0 then a := 1 else a := 2; end return",
            "app T var integer a init repeat a := a - 1; until a < 0 return",
        ] {
            let err = parse(src).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Syntax, "{src}");
            assert!(
                matches!(err, ParserError::UnexpectedLexeme { .. }),
                "{src}"
            );
        }
    }

    #[test]
    fn lexical_errors_surface() {
        let err = parse("app T var integer a init a := 1 & 2 return").unwrap_err();
        assert!(matches!(
            err,
            ParserError::LexerError(LexerError::InvalidToken { ref lexeme, .. }) if lexeme == "&"
        ));
        assert_eq!(err.kind(), ErrorKind::Lexical);

        let err = parse("app T var real a init a := 12. return").unwrap_err();
        assert!(matches!(
            err,
            ParserError::LexerError(LexerError::InvalidToken { ref lexeme, .. }) if lexeme == "12."
        ));

        let err = parse("app T init write({never closed\n\nreturn").unwrap_err();
        assert!(matches!(
            err,
            ParserError::LexerError(LexerError::UnterminatedText { line: 3, .. })
        ));
    }

    #[test]
    fn comments_are_ignored() {
        let src = "% header\napp T % name\nvar integer a % decls\ninit a := 1 % body\nreturn % end";

        assert!(parse(src).is_ok());
    }

    #[test]
    fn symbols_follow_scanning() {
        let mut parser = Parser::new("app T var integer b, a init a := 1; b := a return");
        parser.parse().unwrap();

        let symbols: Vec<_> = parser.symbols().iter().collect();
        assert_eq!(symbols, vec![("T", 0), ("b", 1), ("a", 2)]);
        assert_eq!(parser.vars().len(), 3);
    }

    #[test]
    fn trace_records_productions() {
        let mut parser = Parser::new("app T init write({x}) return").with_trace();
        parser.parse().unwrap();

        let trace = parser.trace();
        assert_eq!(trace[0], "program");
        assert_eq!(trace[1], "expected APP, found (\"app\", APP)");
        assert_eq!(trace[2], "advanced (\"app\", APP)");
        assert!(trace.iter().any(|line| line == "write-stmt"));
    }

    #[test]
    fn no_trace_by_default() {
        let mut parser = Parser::new("app T init write({x}) return");
        parser.parse().unwrap();

        assert!(parser.trace().is_empty());
    }
}
