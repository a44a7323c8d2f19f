//! Lexer and parser for the Sapling source language.
//!
//! The language is a compact statement language: imports, `let`/`const`/`var`
//! declarations, function declarations, returns, and expression statements
//! over identifiers, literals, binary operators, calls, and assignment.
//!
//! Parsing produces a [`sapling_ast::Node::Program`]; errors carry a source
//! span and render through miette.

mod error;
mod lexer;
mod parser;

pub use error::{ParseError, Result};
pub use lexer::{Token, TokenKind};
pub use parser::parse;
