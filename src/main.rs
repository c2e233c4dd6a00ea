use appc::{
    CompileError,
    lexer::{Lexer, LexerError, SymbolTable, TokenKind},
};
use clap::Parser;
use miette::{NamedSource, Report};
use std::{
    fs, io,
    path::{Path, PathBuf},
    process,
};

#[derive(clap::Parser, Debug)]
#[command(author, version, about)]
struct Args {
    #[arg(value_name = "FILE")]
    source: PathBuf,

    /// Stop after lexing and print every token
    #[arg(long, conflicts_with_all = ["vars", "trace"])]
    lex: bool,

    /// Print identifiers in the order they were first scanned
    #[arg(long)]
    symbols: bool,

    /// Print the variable table of an accepted program
    #[arg(long)]
    vars: bool,

    /// Print the parser trace to stderr
    #[arg(long)]
    trace: bool,

    /// Render diagnostics with source context
    #[arg(long)]
    pretty: bool,
}

fn main() {
    let args = Args::parse();

    let source = read_source(&args.source).unwrap_or_else(|e| fail(&args, "", e));
    if let Err(e) = run(&args, &source) {
        fail(&args, &source, e);
    }
}

fn fail(args: &Args, source: &str, err: CompileError) -> ! {
    let code = err.exit_code();
    match err {
        err @ CompileError::Io(_) => eprintln!("{err}"),
        CompileError::Source(e) if args.pretty => {
            let name = args.source.display().to_string();
            let report =
                Report::new(e).with_source_code(NamedSource::new(name, source.to_string()));
            eprintln!("{report:?}");
        }
        CompileError::Source(e) => eprintln!("{:02}: {}", e.line(), e),
    }
    process::exit(code);
}

fn read_source(path: &Path) -> Result<String, CompileError> {
    if !path.is_file() {
        return Err(io::Error::new(io::ErrorKind::InvalidInput, "input must be a file").into());
    }

    Ok(fs::read_to_string(path)?)
}

fn run(args: &Args, source: &str) -> Result<(), CompileError> {
    if args.lex {
        let mut lexer = Lexer::new(source);
        loop {
            let tok = lexer.next_token();
            println!("{:02}: {}", lexer.line(), tok);

            if let Some(err) = LexerError::from_token(&tok) {
                return Err(err.into());
            }
            if tok.kind == TokenKind::EndOfFile {
                break;
            }
        }

        if args.symbols {
            print_symbols(lexer.symbols());
        }
        return Ok(());
    }

    let mut parser = appc::Parser::new(source);
    if args.trace {
        parser = parser.with_trace();
    }

    let result = parser.parse();
    parser.trace().iter().for_each(|line| eprintln!("{line}"));
    result?;

    if args.symbols {
        print_symbols(parser.symbols());
    }
    if args.vars {
        parser
            .vars()
            .iter()
            .for_each(|var| println!("{}: {}", var.name, var.ty));
    }

    println!("accepted");
    Ok(())
}

fn print_symbols(symbols: &SymbolTable) {
    symbols
        .iter()
        .for_each(|(name, id)| println!("{name} -> {id}"));
}
