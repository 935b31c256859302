//! Python builtins exposed as AST expressions.
//!
//! - builtins: the registry mapping builtin names to constructors
//! - print: the `print` builtin, a callable that unparses itself

pub mod builtins;
pub mod print;

#[cfg(test)]
mod tests;
