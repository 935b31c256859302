//! Error types and error handling for konoha_ast.
//!
//! This module defines the errors raised while turning Python source into
//! the common AST, editing that AST and unparsing it again:
//!
//! - Error structures with source position information
//! - Error kinds for lexing, parsing, typing, tree editing and unparsing
//! - Human readable tips used by `display_error`

pub mod errors;

#[cfg(test)]
mod tests;
