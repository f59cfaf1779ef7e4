//! **tlox** — a tree‑walking interpreter for a small dynamically‑typed
//! scripting language.
//!
//! The pipeline has four stages, each usable on its own:
//!
//! 1. [`scanner`]  — bytes → tokens (streaming, zero‑copy lexemes);
//! 2. [`parser`]   — tokens → AST, with panic‑mode error recovery;
//! 3. [`resolver`] — static analysis computing lexical scope distances;
//! 4. [`interpreter`] — direct AST execution with closures, classes and
//!    single inheritance.
//!
//! Front‑end stages report into an [`error::Diagnostics`] collector so a
//! single run surfaces every independent error; execution only starts when
//! the collector is clean.

pub mod ast_printer;
pub mod class;
pub mod environment;
pub mod error;
pub mod expr;
pub mod function;
pub mod interpreter;
pub mod parser;
pub mod resolver;
pub mod scanner;
pub mod stmt;
pub mod token;
pub mod value;
