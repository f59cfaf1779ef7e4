//! Command‑line driver for the tlox interpreter.
//!
//! Exit codes follow the sysexits convention the test harness expects:
//! `65` for lex/parse/resolve errors, `70` for runtime errors, `0`
//! otherwise (including a script that stops via `exit`).

use std::fs::File;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser as ClapParser, Subcommand};
use log::info;
use memmap2::Mmap;

use tlox::ast_printer::AstPrinter;
use tlox::error::{Diagnostics, LoxError};
use tlox::interpreter::{Flow, Interpreter};
use tlox::parser::Parser;
use tlox::resolver::Resolver;
use tlox::scanner::Scanner;
use tlox::token::Token;

#[derive(ClapParser)]
#[command(name = "tlox", version, about = "Tree-walking interpreter for the tlox language")]
struct Cli {
    /// Write debug logs to `tlox.log` instead of stderr.
    #[arg(long, global = true)]
    log: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Scan a source file and dump its tokens.
    Tokenize {
        filename: PathBuf,

        /// Emit the token stream as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Parse a single expression and print its tree in prefix form.
    Parse { filename: PathBuf },

    /// Evaluate a single expression and print the resulting value.
    Evaluate { filename: PathBuf },

    /// Run a program.
    Run { filename: PathBuf },

    /// Start an interactive prompt (the default with no subcommand).
    Repl,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    init_logging(cli.log)?;

    match cli.command {
        Some(Command::Tokenize { filename, json }) => tokenize(&filename, json),
        Some(Command::Parse { filename }) => parse_expression(&filename),
        Some(Command::Evaluate { filename }) => evaluate(&filename),
        Some(Command::Run { filename }) => run(&filename),
        Some(Command::Repl) | None => repl(),
    }
}

fn init_logging(to_file: bool) -> anyhow::Result<()> {
    if !to_file {
        env_logger::init();
        return Ok(());
    }

    let file = File::create("tlox.log").context("failed to create tlox.log")?;

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .filter_level(log::LevelFilter::Debug)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {} {}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();

    Ok(())
}

/// Script bytes, memory‑mapped when possible.
enum Source {
    Mapped(Mmap),
    /// `mmap` rejects zero‑length files.
    Empty,
}

impl Source {
    fn bytes(&self) -> &[u8] {
        match self {
            Source::Mapped(mmap) => mmap,
            Source::Empty => b"",
        }
    }
}

fn map_source(path: &Path) -> anyhow::Result<Source> {
    let file =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;

    if file.metadata()?.len() == 0 {
        return Ok(Source::Empty);
    }

    // SAFETY: the file is opened read-only and the map lives only for the
    // duration of this run; concurrent truncation is not our failure mode.
    let mmap = unsafe { Mmap::map(&file) }
        .with_context(|| format!("failed to mmap {}", path.display()))?;

    info!("mapped {} ({} bytes)", path.display(), mmap.len());

    Ok(Source::Mapped(mmap))
}

/// Scripts must be valid UTF-8: the scanner slices lexemes out of the raw
/// bytes without re-checking, so bad input is rejected once, up front, with
/// the line of the first offending byte.
fn ensure_utf8(bytes: &[u8]) -> Result<(), LoxError> {
    match std::str::from_utf8(bytes) {
        Ok(_) => Ok(()),
        Err(e) => {
            let line = 1 + bytes[..e.valid_up_to()]
                .iter()
                .filter(|&&b| b == b'\n')
                .count();

            Err(LoxError::lex(line, "Source is not valid UTF-8"))
        }
    }
}

/// Collect every token, reporting lexical errors without stopping the scan.
fn scan<'a>(src: &'a [u8], diag: &mut Diagnostics) -> Vec<Token<'a>> {
    let mut tokens = Vec::new();

    for item in Scanner::new(src) {
        match item {
            Ok(token) => tokens.push(token),
            Err(e) => diag.report(e),
        }
    }

    tokens
}

fn report_all(diag: &Diagnostics) {
    for error in diag.iter() {
        eprintln!("{}", error);
    }
}

fn tokenize(path: &Path, json: bool) -> anyhow::Result<ExitCode> {
    let source = map_source(path)?;

    if let Err(e) = ensure_utf8(source.bytes()) {
        eprintln!("{}", e);
        return Ok(ExitCode::from(65));
    }

    let mut diag = Diagnostics::new();
    let tokens = scan(source.bytes(), &mut diag);

    report_all(&diag);

    if json {
        println!("{}", serde_json::to_string_pretty(&tokens)?);
    } else {
        for token in &tokens {
            println!("{}", token);
        }
    }

    if diag.is_clean() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(65))
    }
}

fn parse_expression(path: &Path) -> anyhow::Result<ExitCode> {
    let source = map_source(path)?;

    if let Err(e) = ensure_utf8(source.bytes()) {
        eprintln!("{}", e);
        return Ok(ExitCode::from(65));
    }

    let mut diag = Diagnostics::new();
    let tokens = scan(source.bytes(), &mut diag);
    let expr = Parser::new(&tokens, &mut diag).parse_expression();

    if !diag.is_clean() {
        report_all(&diag);
        return Ok(ExitCode::from(65));
    }

    if let Some(expr) = expr {
        println!("{}", AstPrinter::print(&expr));
    }

    Ok(ExitCode::SUCCESS)
}

fn evaluate(path: &Path) -> anyhow::Result<ExitCode> {
    let source = map_source(path)?;

    if let Err(e) = ensure_utf8(source.bytes()) {
        eprintln!("{}", e);
        return Ok(ExitCode::from(65));
    }

    let mut diag = Diagnostics::new();
    let tokens = scan(source.bytes(), &mut diag);
    let expr = Parser::new(&tokens, &mut diag).parse_expression();

    if !diag.is_clean() {
        report_all(&diag);
        return Ok(ExitCode::from(65));
    }

    let Some(expr) = expr else {
        return Ok(ExitCode::from(65));
    };

    let mut interpreter = Interpreter::new();

    match interpreter.interpret_expr(&expr) {
        Ok(value) => {
            println!("{}", value);
            Ok(ExitCode::SUCCESS)
        }
        Err(LoxError::ExitSignal) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            eprintln!("{}", e);
            Ok(ExitCode::from(70))
        }
    }
}

fn run(path: &Path) -> anyhow::Result<ExitCode> {
    let source = map_source(path)?;

    if let Err(e) = ensure_utf8(source.bytes()) {
        eprintln!("{}", e);
        return Ok(ExitCode::from(65));
    }

    let mut diag = Diagnostics::new();
    let tokens = scan(source.bytes(), &mut diag);
    let program = Parser::new(&tokens, &mut diag).parse();
    let locals = Resolver::new(&mut diag).resolve(&program);

    if !diag.is_clean() {
        report_all(&diag);
        return Ok(ExitCode::from(65));
    }

    let mut interpreter = Interpreter::new();
    interpreter.merge_locals(locals);

    match interpreter.interpret(&program) {
        Ok(_) => Ok(ExitCode::SUCCESS), // Flow::Exit still exits 0
        Err(e) => {
            eprintln!("{}", e);
            Ok(ExitCode::from(70))
        }
    }
}

/// Interactive prompt.
///
/// Each line is tried as an expression first (the result is echoed); if that
/// fails it is re-parsed as a program.  Errors never end the session, and
/// the interpreter persists, so definitions carry across lines.  Lines are
/// leaked to give their tokens the `'static` lifetime the long-lived
/// interpreter requires — a few bytes per line for the life of the session.
fn repl() -> anyhow::Result<ExitCode> {
    println!("tlox {} — interactive mode (Ctrl-D to quit)", env!("CARGO_PKG_VERSION"));

    let mut interpreter: Interpreter<'static> = Interpreter::new();

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }

        if line.trim().is_empty() {
            continue;
        }

        let line: &'static str = Box::leak(line.into_boxed_str());

        let mut diag = Diagnostics::new();
        let tokens: &'static [Token<'static>] =
            Vec::leak(scan(line.as_bytes(), &mut diag));

        if !diag.is_clean() {
            report_all(&diag);
            continue;
        }

        // Expression first: `1 + 2` echoes `3` without needing a semicolon.
        // The attempt uses a throwaway collector so its parse errors vanish
        // when the line turns out to be a statement.
        let mut expr_diag = Diagnostics::new();
        if let Some(expr) = Parser::new(tokens, &mut expr_diag).parse_expression() {
            match interpreter.interpret_expr(&expr) {
                Ok(value) => println!("{}", value),
                Err(LoxError::ExitSignal) => break,
                Err(e) => eprintln!("{}", e),
            }
            continue;
        }

        let program = Parser::new(tokens, &mut diag).parse();
        let locals = Resolver::new(&mut diag).resolve(&program);

        if !diag.is_clean() {
            report_all(&diag);
            continue;
        }

        interpreter.merge_locals(locals);

        match interpreter.interpret(&program) {
            Ok(Flow::Exit) => break,
            Ok(_) => {}
            Err(e) => eprintln!("{}", e),
        }
    }

    Ok(ExitCode::SUCCESS)
}
