/// AST (Abstract Syntax Tree) module
/// Contains the common AST shared by every front and back end
///
/// Submodules:
/// - ast: Node traits, wrappers and tree traversal
/// - dump: JSON rendering of any node
/// - expressions: Definitions for the expression nodes
/// - slot: Typed expression slots and literal values
/// - statements: Definitions for the statement nodes
/// - types: The type hierarchy and its compatibility rules
pub mod ast;
pub mod dump;
pub mod expressions;
pub mod slot;
pub mod statements;
pub mod types;

#[cfg(test)]
mod tests;
