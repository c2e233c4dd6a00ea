use std::io;

use appc::{
    CompileError, ErrorKind, Lexer, LexerError, Output, ParserError, SemaError, TokenKind,
    ValueType,
};

#[test]
fn test_accepts_simple_program() {
    let checked = appc::check("app T var integer a; init a := 1; write(a) return")
        .expect("program should be accepted");

    assert_eq!(checked.name, "T");
    assert_eq!(checked.vars.type_of("a"), Some(ValueType::Integer));
    assert_eq!(
        checked.outputs,
        vec![Output::Expr {
            source: "a",
            ty: ValueType::Integer
        }]
    );
}

#[test]
fn test_rejects_undeclared_assignment() {
    let err = appc::check("app T init a := 1 return").unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Semantic);
    assert_eq!(err.line(), 1);
    assert!(matches!(
        err,
        ParserError::SemaError(SemaError::NotDeclared { .. })
    ));
    assert_eq!(err.to_string(), "Variable 'a' not declared");
}

#[test]
fn test_average_demo() {
    let source = include_str!("../demos/average.app");
    let checked = appc::check(source).expect("demo should be accepted");

    let vars: Vec<_> = checked
        .vars
        .iter()
        .map(|var| (var.name.as_str(), var.ty))
        .collect();
    assert_eq!(
        vars,
        vec![
            ("Average", ValueType::Program),
            ("count", ValueType::Integer),
            ("value", ValueType::Integer),
            ("total", ValueType::Real),
            ("average", ValueType::Real),
        ]
    );
    assert_eq!(
        checked.outputs,
        vec![
            Output::Text("average: "),
            Output::Expr {
                source: "average",
                ty: ValueType::Real
            },
            Output::Text("no values"),
        ]
    );
}

#[test]
fn test_undeclared_demo() {
    let err = appc::check(include_str!("../demos/undeclared.app")).unwrap_err();

    assert!(matches!(
        err,
        ParserError::SemaError(SemaError::NotDeclared { ref name, .. }) if name == "b"
    ));
    assert_eq!(err.line(), 5);
}

#[test]
fn test_narrowing_demo() {
    let err = appc::check(include_str!("../demos/narrowing.app")).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Semantic);
    assert!(matches!(
        err,
        ParserError::SemaError(SemaError::TypeMismatch {
            expected: "integer",
            found: ValueType::Real,
            ..
        })
    ));
}

#[test]
fn test_unterminated_demo() {
    let source = include_str!("../demos/unterminated.app");
    let err = appc::check(source).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Lexical);
    assert!(matches!(
        err,
        ParserError::LexerError(LexerError::UnterminatedText { .. })
    ));
    assert_eq!(err.line(), source.lines().count() + 1);
}

#[test]
fn test_token_dump_order() {
    let mut lexer = Lexer::new("app T\ninit x1 := 12.5\nreturn");
    let mut dump = Vec::new();

    loop {
        let tok = lexer.next_token();
        dump.push(format!("{:02}: {}", lexer.line(), tok));
        if tok.kind == TokenKind::EndOfFile {
            break;
        }
    }

    assert_eq!(
        dump,
        vec![
            "01: (\"app\", APP)",
            "01: (\"T\", NAME)",
            "02: (\"init\", INIT)",
            "02: (\"x1\", NAME)",
            "02: (\":=\", ASSIGN)",
            "02: (\"12.5\", REAL_NUMBER)",
            "03: (\"return\", RETURN)",
            "03: (\"\", END_OF_FILE)",
        ]
    );
    assert_eq!(lexer.symbols().lookup("x1"), Some(1));
}

#[test]
fn test_repeated_parses_do_not_share_state() {
    let source = "app T var integer a init a := 1 return";

    assert!(appc::check(source).is_ok());
    assert!(appc::check(source).is_ok());
}

#[test]
fn test_error_kinds() {
    let syntax = appc::check("app T init return").unwrap_err();
    assert_eq!(syntax.kind(), ErrorKind::Syntax);

    let lexical = appc::check("app T init write(1 : 2) return").unwrap_err();
    assert_eq!(lexical.kind(), ErrorKind::Lexical);

    let semantic = appc::check("app T var real r init if r then r := 1 end return").unwrap_err();
    assert_eq!(semantic.kind(), ErrorKind::Semantic);
}

#[test]
fn test_semicolon_before_closing_keyword() {
    let err = appc::check("app T var integer a init\n  a := 1;\nreturn").unwrap_err();

    assert!(matches!(
        err,
        ParserError::UnexpectedLexeme { ref lexeme, line: 3, .. } if lexeme == "return"
    ));
    assert!(appc::check("app T var integer a; init a := 1 return").is_ok());
}

#[test]
fn test_input_failure_is_internal() {
    let err = CompileError::from(io::Error::new(io::ErrorKind::NotFound, "no such file"));

    assert!(matches!(err, CompileError::Io(_)));
    assert_eq!(err.to_string(), "internal error: no such file");
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn test_source_errors_keep_their_message() {
    let err = CompileError::from(appc::check("app T init a := 1 return").unwrap_err());

    assert!(matches!(
        err,
        CompileError::Source(ParserError::SemaError(SemaError::NotDeclared { .. }))
    ));
    assert_eq!(err.to_string(), "Variable 'a' not declared");
    assert_eq!(err.exit_code(), 1);

    let mut lexer = Lexer::new("{open");
    let tok = lexer.next_token();
    let err = CompileError::from(LexerError::from_token(&tok).unwrap());
    assert!(matches!(
        err,
        CompileError::Source(ParserError::LexerError(LexerError::UnterminatedText { .. }))
    ));
    assert_eq!(err.exit_code(), 1);
}
