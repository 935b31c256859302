//! Unparser module turning the common AST back into Python source.
//!
//! - Statements and code blocks, indented by levels of four spaces
//! - Expressions, with builtins rendering themselves
//! - Types in annotation form
//! - Optional canonical formatting of the result

pub mod unparser;

#[cfg(test)]
mod tests;
