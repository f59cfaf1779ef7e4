//! Centralised error hierarchy for the **tlox** interpreter.
//!
//! All subsystems (scanner, parser, resolver, runtime, CLI) must convert their
//! internal failure modes into one of the variants defined here.  This enables a
//! uniform `Result<T>` alias throughout the crate and ergonomic inter‑operation
//! with `anyhow`, while still preserving rich diagnostic detail.
//!
//! The module **does not** print diagnostics itself.  Front‑end passes push
//! their errors into a [`Diagnostics`] collector; whoever drives the pipeline
//! decides when (and whether) to surface them.

use std::io;
use thiserror::Error;

use log::info;

/// Canonical error type used throughout the interpreter.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoxError {
    /// Lexical (scanner) error with source line information.
    #[error("[line {line}] Error: {message}")]
    Lex {
        /// Human‑readable description.
        message: String,

        /// 1‑based line where the error occurred.
        line: usize,
    },

    /// Syntactic (parser) error.
    #[error("[line {line}] Error: {message}")]
    Parse { message: String, line: usize },

    /// Static‑analysis or resolution failure (e.g. early‑binding errors).
    #[error("[line {line}] Error: {message}")]
    Resolve { message: String, line: usize },

    /// Runtime evaluation error.  The only class that aborts execution of the
    /// current statement list.
    #[error("[line {line}] Runtime error: {message}")]
    Runtime { message: String, line: usize },

    /// Wrapper around `std::io::Error` (transparent).  Enables `?` on I/O ops.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Internal unwinding signal for the `exit` statement.  It rides the
    /// error channel so an `exit` buried inside a function call aborts the
    /// enclosing expression too; the interpreter intercepts it at the top of
    /// the run and it never reaches the user.
    #[error("exit")]
    ExitSignal,
}

impl LoxError {
    /// Helper constructor for the **scanner**.
    pub fn lex<S: Into<String>>(line: usize, msg: S) -> Self {
        LoxError::Lex {
            message: msg.into(),
            line,
        }
    }

    /// Helper constructor for the **parser**.
    pub fn parse<S: Into<String>>(line: usize, msg: S) -> Self {
        LoxError::Parse {
            message: msg.into(),
            line,
        }
    }

    /// Helper constructor for the **resolver**.
    pub fn resolve<S: Into<String>>(line: usize, msg: S) -> Self {
        LoxError::Resolve {
            message: msg.into(),
            line,
        }
    }

    /// Helper constructor for the **interpreter**.
    pub fn runtime<S: Into<String>>(line: usize, msg: S) -> Self {
        LoxError::Runtime {
            message: msg.into(),
            line,
        }
    }

    /// True for the variants the front end produces before execution starts.
    pub fn is_static(&self) -> bool {
        matches!(
            self,
            LoxError::Lex { .. } | LoxError::Parse { .. } | LoxError::Resolve { .. }
        )
    }
}

/// Crate‑wide `Result` alias.
pub type Result<T> = std::result::Result<T, LoxError>;

/// Accumulating diagnostics collector.
///
/// Every front‑end pass (scanner, parser, resolver) reports into one of these
/// and continues working, so a single run surfaces as many independent errors
/// as possible.  The decision to proceed to the next pass is an explicit
/// [`Diagnostics::is_clean`] check, never a shared flag.
#[derive(Debug, Default)]
pub struct Diagnostics {
    errors: Vec<LoxError>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one error.
    pub fn report(&mut self, error: LoxError) {
        info!("Diagnostic recorded: {}", error);

        self.errors.push(error);
    }

    /// No errors recorded so far?
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LoxError> {
        self.errors.iter()
    }

    /// Forget everything recorded.  The REPL calls this between lines.
    pub fn clear(&mut self) {
        self.errors.clear();
    }
}
