//! Parser module for building the common AST from Python sources.
//!
//! This module contains the parser that transforms a stream of tokens
//! into a module `CodeBlock`. It uses a Pratt parser for expressions
//! and handles:
//!
//! - Statement parsing (expression statements, annotated declarations and definitions)
//! - Expression parsing (constants, names, builtins, calls)
//! - Type parsing for annotations
//! - Reporting every other Python construct as unsupported, by its Python node name
//!
//! The parser uses NUD (null denotation) and LED (left denotation) functions
//! for expression parsing with binding power for precedence handling.

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;
pub mod types;
