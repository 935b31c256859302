use std::{any::Any, fmt::Debug, fmt::Display, ops::Deref};

use crate::{
    errors::errors::{Error, ErrorImpl},
    Span,
};

use super::{
    slot::{ExpressionSlot, VariadicField},
    statements::CodeBlock,
};

/// Statement Types
#[derive(PartialEq, Clone, Copy, Debug)]
pub enum StmtType {
    CodeBlock,
    ExpressionStmt,
    VariableDeclaration,
    VariableDefinition,
}

/// A borrowed view of one named field of a node.
#[derive(Debug, Clone, Copy)]
pub enum FieldRef<'a> {
    Slot(&'a ExpressionSlot),
    Variadic(&'a VariadicField),
}

/// A mutable view of one named field of a node.
#[derive(Debug)]
pub enum FieldMut<'a> {
    Slot(&'a mut ExpressionSlot),
    Variadic(&'a mut VariadicField),
}

/// Statement Trait
///
/// Defines the behavior of all statement types in the AST.
pub trait Stmt: Debug {
    /// Returns the type of the statement.
    fn get_stmt_type(&self) -> StmtType;
    /// Type conversion purposes - used with `.downcast_ref<T>()`
    fn as_any(&self) -> &dyn Any;
    /// Mutable counterpart of `as_any`, used with `.downcast_mut<T>()`
    fn as_any_mut(&mut self) -> &mut dyn Any;
    /// Clones the statement into a StmtWrapper.
    /// Clone cannot be derived for certain trait objects, so this method is necessary.
    fn clone_wrapper(&self) -> StmtWrapper;
    /// Returns the span of the statement.
    fn get_span(&self) -> &Span;
    /// Returns the expression fields of the statement, in declaration order.
    fn get_fields(&self) -> Vec<(&'static str, FieldRef<'_>)>;
    /// Looks up one expression field of the statement for editing.
    fn get_field_mut(&mut self, field: &str) -> Option<FieldMut<'_>>;

    /// Places an expression in the named field.
    fn add_field_expression(&mut self, field: &str, expression: ExprWrapper) -> Result<(), Error> {
        let node = format!("{:?}", self.get_stmt_type());
        add_to_field(self.get_field_mut(field), &node, field, expression)
    }
}

/// Statement Wrapper
///
/// A wrapper that allows for any statement kind to be stored with helper methods
#[derive(Debug)]
pub struct StmtWrapper(Box<dyn Stmt>);

impl StmtWrapper {
    pub fn new<T: Stmt + 'static>(stmt: T) -> Self {
        StmtWrapper(Box::new(stmt))
    }

    pub fn downcast_ref<T: Stmt + 'static>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Stmt + 'static>(&mut self) -> Option<&mut T> {
        self.0.as_any_mut().downcast_mut::<T>()
    }
}

impl Deref for StmtWrapper {
    type Target = Box<dyn Stmt>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Stmt for StmtWrapper {
    fn get_stmt_type(&self) -> StmtType {
        self.0.get_stmt_type()
    }
    fn as_any(&self) -> &dyn Any {
        self.0.as_any()
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self.0.as_any_mut()
    }
    fn clone_wrapper(&self) -> StmtWrapper {
        self.0.clone_wrapper()
    }
    fn get_span(&self) -> &Span {
        self.0.get_span()
    }
    fn get_fields(&self) -> Vec<(&'static str, FieldRef<'_>)> {
        self.0.get_fields()
    }
    fn get_field_mut(&mut self, field: &str) -> Option<FieldMut<'_>> {
        self.0.get_field_mut(field)
    }
    fn add_field_expression(&mut self, field: &str, expression: ExprWrapper) -> Result<(), Error> {
        self.0.add_field_expression(field, expression)
    }
}

impl Clone for StmtWrapper {
    fn clone(&self) -> Self {
        self.clone_wrapper()
    }
}

/// Expression Types
///
/// Defines the various kinds of expressions in the AST.
#[derive(PartialEq, Clone, Copy, Debug)]
pub enum ExprType {
    BoolLiteral,
    NoneLiteral,
    IntLiteral,
    FloatLiteral,
    StrLiteral,
    VariableLoader,
    Keyword,
    Call,
    /// A type used as a value, e.g. the annotation of a declaration
    Type,
    /// A builtin expression such as `print`, see `as_builtin`
    Builtin,
}

pub trait Expr: Debug {
    /// Returns the expression type of the expression.
    fn get_expr_type(&self) -> ExprType;
    /// Type conversion purposes - used with `.downcast_ref<T>()`
    fn as_any(&self) -> &dyn Any;
    /// Mutable counterpart of `as_any`
    fn as_any_mut(&mut self) -> &mut dyn Any;
    /// Returns the type of the value this expression evaluates to.
    fn get_type(&self) -> TypeWrapper;
    /// Clones the expression into an ExprWrapper.
    /// Clone cannot be derived for certain trait objects, so this method is necessary.
    fn clone_wrapper(&self) -> ExprWrapper;
    /// Returns the span of the expression.
    fn get_span(&self) -> &Span;
    /// Returns the expression fields, in declaration order.
    fn get_fields(&self) -> Vec<(&'static str, FieldRef<'_>)>;
    /// Looks up one expression field for editing.
    fn get_field_mut(&mut self, field: &str) -> Option<FieldMut<'_>>;

    /// Name used in diagnostics, `Call` or `print` for instance.
    fn get_name(&self) -> String {
        format!("{:?}", self.get_expr_type())
    }
    fn as_callable(&self) -> Option<&dyn CallableExpr> {
        None
    }
    fn as_callable_mut(&mut self) -> Option<&mut dyn CallableExpr> {
        None
    }
    fn as_builtin(&self) -> Option<&dyn BuiltinExpr> {
        None
    }
    fn add_field_expression(&mut self, field: &str, expression: ExprWrapper) -> Result<(), Error> {
        let node = self.get_name();
        add_to_field(self.get_field_mut(field), &node, field, expression)
    }
}

/// Expression Wrapper
///
/// A wrapper that allows for any expression kind to be stored with helper methods
#[derive(Debug)]
pub struct ExprWrapper(Box<dyn Expr>);

impl ExprWrapper {
    pub fn new<T: Expr + 'static>(expression: T) -> Self {
        ExprWrapper(Box::new(expression))
    }

    pub fn downcast_ref<T: Expr + 'static>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Expr + 'static>(&mut self) -> Option<&mut T> {
        self.0.as_any_mut().downcast_mut::<T>()
    }
}

impl Expr for ExprWrapper {
    fn as_any(&self) -> &dyn Any {
        self.0.as_any()
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self.0.as_any_mut()
    }
    fn get_expr_type(&self) -> ExprType {
        self.0.get_expr_type()
    }
    fn get_type(&self) -> TypeWrapper {
        self.0.get_type()
    }
    fn clone_wrapper(&self) -> ExprWrapper {
        self.0.clone_wrapper()
    }
    fn get_span(&self) -> &Span {
        self.0.get_span()
    }
    fn get_fields(&self) -> Vec<(&'static str, FieldRef<'_>)> {
        self.0.get_fields()
    }
    fn get_field_mut(&mut self, field: &str) -> Option<FieldMut<'_>> {
        self.0.get_field_mut(field)
    }
    fn get_name(&self) -> String {
        self.0.get_name()
    }
    fn as_callable(&self) -> Option<&dyn CallableExpr> {
        self.0.as_callable()
    }
    fn as_callable_mut(&mut self) -> Option<&mut dyn CallableExpr> {
        self.0.as_callable_mut()
    }
    fn as_builtin(&self) -> Option<&dyn BuiltinExpr> {
        self.0.as_builtin()
    }
    fn add_field_expression(&mut self, field: &str, expression: ExprWrapper) -> Result<(), Error> {
        self.0.add_field_expression(field, expression)
    }
}

impl Clone for ExprWrapper {
    fn clone(&self) -> Self {
        self.clone_wrapper()
    }
}

/// Expressions that accept call arguments.
///
/// `add_argument` and `add_keyword_argument` bind arguments the way a
/// Python call binds them to parameters.
pub trait CallableExpr: Expr {
    fn add_argument(&mut self, argument: ExprWrapper) -> Result<(), Error>;
    fn add_keyword_argument(&mut self, keyword: &str, argument: ExprWrapper) -> Result<(), Error>;
    /// Whether arguments have already been bound through a call.
    fn is_invoked(&self) -> bool;
    fn mark_invoked(&mut self);
}

/// Builtin expressions know their own Python source form.
pub trait BuiltinExpr: Expr {
    fn get_builtin_name(&self) -> &'static str;
    fn unparse(&self) -> Result<String, Error>;
}

/// Type Types
///
/// The classes of the type hierarchy. Every class except `Type` has exactly
/// one base, see `get_base`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeType {
    Type,
    Object,
    Bool,
    LiteralBool,
    NoneType,
    LiteralNoneType,
    Int,
    LiteralInt,
    Float,
    LiteralFloat,
    Str,
    LiteralStr,
    List,
    Callable,
    Function,
    VariadicArg,
    VariadicKeywordArg,
    KeywordOnlyArg,
    Keyword,
}

impl TypeType {
    pub fn get_base(&self) -> Option<TypeType> {
        match self {
            TypeType::Type => None,
            TypeType::Object
            | TypeType::VariadicArg
            | TypeType::VariadicKeywordArg
            | TypeType::KeywordOnlyArg
            | TypeType::Keyword => Some(TypeType::Type),
            TypeType::Bool
            | TypeType::NoneType
            | TypeType::Int
            | TypeType::Float
            | TypeType::Str
            | TypeType::List
            | TypeType::Callable => Some(TypeType::Object),
            TypeType::LiteralBool => Some(TypeType::Bool),
            TypeType::LiteralNoneType => Some(TypeType::NoneType),
            TypeType::LiteralInt => Some(TypeType::Int),
            TypeType::LiteralFloat => Some(TypeType::Float),
            TypeType::LiteralStr => Some(TypeType::Str),
            TypeType::Function => Some(TypeType::Callable),
        }
    }

    /// Whether `self` is `other` or derives from it.
    pub fn is_subclass_of(&self, other: TypeType) -> bool {
        let mut current = Some(*self);
        while let Some(type_type) = current {
            if type_type == other {
                return true;
            }
            current = type_type.get_base();
        }
        false
    }

    /// Slots of literal types hold raw values instead of expressions.
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            TypeType::LiteralBool
                | TypeType::LiteralNoneType
                | TypeType::LiteralInt
                | TypeType::LiteralFloat
                | TypeType::LiteralStr
        )
    }
}

/// Type Trait
///
/// Defines the behavior of all type kinds in the AST.
pub trait Type: Debug {
    /// Clones the type into a TypeWrapper.
    fn clone_wrapper(&self) -> TypeWrapper;
    /// Returns the class of the type.
    fn get_type_type(&self) -> TypeType;
    /// Type conversion purposes - used with `.downcast_ref<T>()`
    fn as_any(&self) -> &dyn Any;
    /// Checks whether a value of this type may be used where `other` is required.
    fn is_compatible_with(&self, other: &dyn Type) -> bool;
    /// Human readable name, used in diagnostics.
    fn get_name(&self) -> String;
}

/// Type Wrapper
///
/// A wrapper that allows for any type kind to be stored with helper methods
#[derive(Debug)]
pub struct TypeWrapper(Box<dyn Type>);

impl TypeWrapper {
    pub fn new<T: Type + 'static>(type_: T) -> Self {
        TypeWrapper(Box::new(type_))
    }

    pub fn downcast_ref<T: Type + 'static>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }
}

impl Type for TypeWrapper {
    fn clone_wrapper(&self) -> TypeWrapper {
        self.0.clone_wrapper()
    }
    fn get_type_type(&self) -> TypeType {
        self.0.get_type_type()
    }
    fn as_any(&self) -> &dyn Any {
        self.0.as_any()
    }
    fn is_compatible_with(&self, other: &dyn Type) -> bool {
        self.0.is_compatible_with(other)
    }
    fn get_name(&self) -> String {
        self.0.get_name()
    }
}

impl Clone for TypeWrapper {
    fn clone(&self) -> Self {
        self.clone_wrapper()
    }
}

impl Display for TypeWrapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.get_name())
    }
}

/// Whether a value of type `provided` may occupy a place requiring `required`.
pub fn check_type_compatibility(required: &dyn Type, provided: &dyn Type) -> bool {
    provided.is_compatible_with(required)
}

/// Shared implementation of `add_field_expression`.
///
/// Variadic fields grow by one slot holding the expression.
fn add_to_field(
    target: Option<FieldMut<'_>>,
    node: &str,
    field: &str,
    expression: ExprWrapper,
) -> Result<(), Error> {
    match target {
        Some(FieldMut::Slot(slot)) => slot.add_expression(expression),
        Some(FieldMut::Variadic(variadic)) => variadic.push_expression(expression),
        None => Err(Error::detached(ErrorImpl::UnknownField {
            node: node.to_string(),
            field: field.to_string(),
        })),
    }
}

/// A borrowed node of either kind, as yielded by tree traversal.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    Stmt(&'a dyn Stmt),
    Expr(&'a dyn Expr),
}

impl<'a> NodeRef<'a> {
    /// Node name such as `CodeBlock`, `IntLiteral` or `print`.
    pub fn get_name(&self) -> String {
        match *self {
            NodeRef::Stmt(stmt) => format!("{:?}", stmt.get_stmt_type()),
            NodeRef::Expr(expr) => expr.get_name(),
        }
    }

    pub fn get_span(&self) -> &'a Span {
        match *self {
            NodeRef::Stmt(stmt) => stmt.get_span(),
            NodeRef::Expr(expr) => expr.get_span(),
        }
    }

    pub fn get_fields(&self) -> Vec<(&'static str, FieldRef<'a>)> {
        match *self {
            NodeRef::Stmt(stmt) => stmt.get_fields(),
            NodeRef::Expr(expr) => expr.get_fields(),
        }
    }

    /// Direct sub nodes: code block children, then the expression held by
    /// every occupied slot, field by field.
    pub fn get_children(&self) -> Vec<NodeRef<'a>> {
        let mut children = vec![];

        if let NodeRef::Stmt(stmt) = *self {
            if let Some(block) = stmt.as_any().downcast_ref::<CodeBlock>() {
                children.extend(block.iter().map(|child| NodeRef::Stmt(child)));
            }
        }

        for (_, field) in self.get_fields() {
            match field {
                FieldRef::Slot(slot) => {
                    if let Some(expression) = slot.get_expression() {
                        children.push(NodeRef::Expr(expression));
                    }
                }
                FieldRef::Variadic(variadic) => {
                    for slot in variadic.iter() {
                        if let Some(expression) = slot.get_expression() {
                            children.push(NodeRef::Expr(expression));
                        }
                    }
                }
            }
        }

        children
    }
}

/// Yields the node, then every sub node in pre-order.
pub fn pre_order(node: NodeRef<'_>) -> Vec<NodeRef<'_>> {
    let mut nodes = vec![node];
    for child in node.get_children() {
        nodes.extend(pre_order(child));
    }
    nodes
}

/// Yields every sub node in post-order, then the node itself.
pub fn post_order(node: NodeRef<'_>) -> Vec<NodeRef<'_>> {
    let mut nodes = vec![];
    for child in node.get_children() {
        nodes.extend(post_order(child));
    }
    nodes.push(node);
    nodes
}
