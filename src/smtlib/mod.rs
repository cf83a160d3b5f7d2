//! The SMT-LIB front end: source positions and messages, the scanner, the parser, the interpreter, and the pretty printer.
//!
//! Errors of every kind --- lexical, syntactic, semantic --- are accumulated into a sorted, deduplicated [MessageSet] and reported at command boundaries; nothing aborts a script.
//! A broken construct leaves a [wrapper](crate::structures::symbol::SymbolKind::Wrapper) expression behind, which taints anything built over it and keeps the assertion set well-typed.

pub mod interp;
pub mod parser;
pub mod pretty;
pub mod scanner;
pub mod source;

pub use interp::{Interpreter, SymbolTable};
pub use source::{Message, MessageSet, Position};
