//! Utility macros for konoha_ast.
//!
//! This module defines helper macros used throughout the crate:
//!
//! - `MK_TOKEN!` - Creates a Token instance
//! - `MK_DEFAULT_HANDLER!` - Creates a default lexer handler for simple tokens
//! - `MK_LITERAL_EXPR!` - Implements `Expr` for a literal node
//!
//! These macros reduce boilerplate in the lexer and the AST.

/// Creates a Token instance.
///
/// # Arguments
///
/// * `$kind` - The TokenKind
/// * `$value` - The token's string value
/// * `$span` - The source span
///
/// # Example
///
/// ```ignore
/// let token = MK_TOKEN!(TokenKind::Number, "42".to_string(), span);
/// ```
#[macro_export]
macro_rules! MK_TOKEN {
    ($kind:expr, $value:expr, $span:expr) => {
        Token {
            kind: $kind,
            value: $value,
            span: $span,
        }
    };
}

/// Creates a default lexer handler for fixed operator and delimiter tokens.
///
/// The handler pushes a token with the given kind and moves the lexer past it.
///
/// # Example
///
/// ```ignore
/// RegexPattern {
///     regex: Regex::new("^\\*\\*").unwrap(),
///     handler: MK_DEFAULT_HANDLER!(TokenKind::DoubleStar, "**"),
/// }
/// ```
#[macro_export]
macro_rules! MK_DEFAULT_HANDLER {
    ($kind:expr, $value:literal) => {
        |lexer: &mut Lexer, _regex: &Regex| -> Result<(), Error> {
            let span = lexer.span_of($value.len());
            lexer.push(MK_TOKEN!($kind, String::from($value), span));
            lexer.advance_n($value.len());
            Ok(())
        }
    };
}

/// Implements `Expr` for a literal node with a single literal `value` slot.
///
/// # Arguments
///
/// * `$name` - The node struct, which needs `value: ExpressionSlot` and `span: Span`
/// * `$expr_type` - Its ExprType
/// * `$literal_type` - The literal TypeType of its value
#[macro_export]
macro_rules! MK_LITERAL_EXPR {
    ($name:ident, $expr_type:expr, $literal_type:expr) => {
        impl Expr for $name {
            fn get_expr_type(&self) -> ExprType {
                $expr_type
            }
            fn as_any(&self) -> &dyn Any {
                self
            }
            fn as_any_mut(&mut self) -> &mut dyn Any {
                self
            }
            fn get_type(&self) -> TypeWrapper {
                BasicType::wrap($literal_type)
            }
            fn clone_wrapper(&self) -> ExprWrapper {
                ExprWrapper::new(self.clone())
            }
            fn get_span(&self) -> &Span {
                &self.span
            }
            fn get_fields(&self) -> Vec<(&'static str, FieldRef<'_>)> {
                vec![("value", FieldRef::Slot(&self.value))]
            }
            fn get_field_mut(&mut self, field: &str) -> Option<FieldMut<'_>> {
                match field {
                    "value" => Some(FieldMut::Slot(&mut self.value)),
                    _ => None,
                }
            }
        }
    };
}
