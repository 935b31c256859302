//! Lexical analysis module for Python sources.
//!
//! This module contains the lexer (tokenizer) that converts source code
//! into a stream of tokens for parsing. It handles:
//!
//! - Tokenization of source code using regex patterns
//! - Recognition of keywords, identifiers, literals, and operators
//! - Logical lines: NEWLINE, INDENT and DEDENT tokens
//! - Token position tracking for error reporting
//! - Comments, blank lines and line joining

pub mod lexer;
pub mod tokens;
