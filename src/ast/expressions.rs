use std::any::Any;

use crate::{
    errors::errors::{Error, ErrorImpl},
    Span, MK_LITERAL_EXPR,
};

use super::{
    ast::{
        CallableExpr, Expr, ExprType, ExprWrapper, FieldMut, FieldRef, Type, TypeType,
        TypeWrapper,
    },
    slot::{ExpressionSlot, LiteralValue, VariadicField},
    types::BasicType,
};

// LITERALS

/// Bool Literal
/// `True` or `False`.
#[derive(Debug, Clone)]
pub struct BoolLiteral {
    pub value: ExpressionSlot,
    pub span: Span,
}

impl BoolLiteral {
    pub fn new(value: bool, span: Span) -> Self {
        BoolLiteral {
            value: ExpressionSlot::literal(LiteralValue::Bool(value)),
            span,
        }
    }

    pub fn get_value(&self) -> bool {
        matches!(self.value.get_literal(), Some(LiteralValue::Bool(true)))
    }
}

MK_LITERAL_EXPR!(BoolLiteral, ExprType::BoolLiteral, TypeType::LiteralBool);

/// None Literal
#[derive(Debug, Clone)]
pub struct NoneLiteral {
    pub value: ExpressionSlot,
    pub span: Span,
}

impl NoneLiteral {
    pub fn new(span: Span) -> Self {
        NoneLiteral {
            value: ExpressionSlot::literal(LiteralValue::None),
            span,
        }
    }
}

MK_LITERAL_EXPR!(NoneLiteral, ExprType::NoneLiteral, TypeType::LiteralNoneType);

/// Int Literal
#[derive(Debug, Clone)]
pub struct IntLiteral {
    pub value: ExpressionSlot,
    pub span: Span,
}

impl IntLiteral {
    pub fn new(value: i64, span: Span) -> Self {
        IntLiteral {
            value: ExpressionSlot::literal(LiteralValue::Int(value)),
            span,
        }
    }

    pub fn get_value(&self) -> i64 {
        match self.value.get_literal() {
            Some(LiteralValue::Int(value)) => *value,
            _ => 0,
        }
    }
}

MK_LITERAL_EXPR!(IntLiteral, ExprType::IntLiteral, TypeType::LiteralInt);

/// Float Literal
#[derive(Debug, Clone)]
pub struct FloatLiteral {
    pub value: ExpressionSlot,
    pub span: Span,
}

impl FloatLiteral {
    pub fn new(value: f64, span: Span) -> Self {
        FloatLiteral {
            value: ExpressionSlot::literal(LiteralValue::Float(value)),
            span,
        }
    }

    pub fn get_value(&self) -> f64 {
        match self.value.get_literal() {
            Some(LiteralValue::Float(value)) => *value,
            _ => 0.0,
        }
    }
}

MK_LITERAL_EXPR!(FloatLiteral, ExprType::FloatLiteral, TypeType::LiteralFloat);

/// Str Literal
#[derive(Debug, Clone)]
pub struct StrLiteral {
    pub value: ExpressionSlot,
    pub span: Span,
}

impl StrLiteral {
    pub fn new(value: &str, span: Span) -> Self {
        StrLiteral {
            value: ExpressionSlot::literal(LiteralValue::Str(value.to_string())),
            span,
        }
    }

    pub fn get_value(&self) -> &str {
        match self.value.get_literal() {
            Some(LiteralValue::Str(value)) => value,
            _ => "",
        }
    }
}

MK_LITERAL_EXPR!(StrLiteral, ExprType::StrLiteral, TypeType::LiteralStr);

/// Reads the string held by a `LiteralStr` slot.
pub(crate) fn literal_str(slot: &ExpressionSlot) -> &str {
    match slot.get_literal() {
        Some(LiteralValue::Str(value)) => value,
        _ => "",
    }
}

/// Variable Loader
/// Reads the value of a variable by name.
#[derive(Debug, Clone)]
pub struct VariableLoader {
    pub id: ExpressionSlot,
    pub span: Span,
}

impl VariableLoader {
    pub fn new(id: &str, span: Span) -> Self {
        VariableLoader {
            id: ExpressionSlot::literal(LiteralValue::Str(id.to_string())),
            span,
        }
    }

    pub fn get_id(&self) -> &str {
        literal_str(&self.id)
    }
}

impl Expr for VariableLoader {
    fn get_expr_type(&self) -> ExprType {
        ExprType::VariableLoader
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
    fn get_type(&self) -> TypeWrapper {
        BasicType::wrap(TypeType::Object)
    }
    fn clone_wrapper(&self) -> ExprWrapper {
        ExprWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
    fn get_fields(&self) -> Vec<(&'static str, FieldRef<'_>)> {
        vec![("id", FieldRef::Slot(&self.id))]
    }
    fn get_field_mut(&mut self, field: &str) -> Option<FieldMut<'_>> {
        match field {
            "id" => Some(FieldMut::Slot(&mut self.id)),
            _ => None,
        }
    }
}

/// Keyword
/// A `name=value` argument collected by a `**kwargs` parameter.
#[derive(Debug, Clone)]
pub struct Keyword {
    pub arg: ExpressionSlot,
    pub value: ExpressionSlot,
    pub span: Span,
}

impl Keyword {
    pub fn new(arg: &str, value: ExprWrapper, span: Span) -> Result<Self, Error> {
        let mut keyword = Keyword {
            arg: ExpressionSlot::literal(LiteralValue::Str(arg.to_string())),
            value: ExpressionSlot::new(BasicType::wrap(TypeType::Object)),
            span,
        };
        keyword.value.add_expression(value)?;
        Ok(keyword)
    }

    pub fn get_arg(&self) -> &str {
        literal_str(&self.arg)
    }
}

impl Expr for Keyword {
    fn get_expr_type(&self) -> ExprType {
        ExprType::Keyword
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
    fn get_type(&self) -> TypeWrapper {
        BasicType::wrap(TypeType::Keyword)
    }
    fn clone_wrapper(&self) -> ExprWrapper {
        ExprWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
    fn get_fields(&self) -> Vec<(&'static str, FieldRef<'_>)> {
        vec![
            ("arg", FieldRef::Slot(&self.arg)),
            ("value", FieldRef::Slot(&self.value)),
        ]
    }
    fn get_field_mut(&mut self, field: &str) -> Option<FieldMut<'_>> {
        match field {
            "arg" => Some(FieldMut::Slot(&mut self.arg)),
            "value" => Some(FieldMut::Slot(&mut self.value)),
            _ => None,
        }
    }
}

/// Type Expression
/// A type used as a value, such as the annotation of a declaration.
#[derive(Debug, Clone)]
pub struct TypeExpr {
    pub type_: TypeWrapper,
    pub span: Span,
}

impl TypeExpr {
    pub fn new(type_: TypeWrapper, span: Span) -> Self {
        TypeExpr { type_, span }
    }

    pub fn wrap(type_type: TypeType) -> ExprWrapper {
        ExprWrapper::new(TypeExpr::new(BasicType::wrap(type_type), Span::null()))
    }
}

impl Expr for TypeExpr {
    fn get_expr_type(&self) -> ExprType {
        ExprType::Type
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
    // Every type is an instance of `type`
    fn get_type(&self) -> TypeWrapper {
        BasicType::wrap(TypeType::Type)
    }
    fn clone_wrapper(&self) -> ExprWrapper {
        ExprWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
    fn get_fields(&self) -> Vec<(&'static str, FieldRef<'_>)> {
        vec![]
    }
    fn get_field_mut(&mut self, _field: &str) -> Option<FieldMut<'_>> {
        None
    }
    fn get_name(&self) -> String {
        self.type_.get_name()
    }
}

// CALLABLES

/// How a callable field takes its arguments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Parameter {
    Positional(&'static str),
    /// `*args`
    Variadic(&'static str),
    KeywordOnly(&'static str),
    /// `**kwargs`
    VariadicKeyword(&'static str),
}

/// Binds call arguments to the parameter fields of a callable expression.
///
/// Positional arguments fill positional fields in order, then pile up in the
/// variadic field. Once a keyword argument is bound, positional arguments are
/// rejected. Binding any argument marks the callable as invoked.
#[derive(Debug, Clone)]
pub struct ArgumentBinder {
    positional_index: Option<usize>,
    invoked: bool,
}

impl Default for ArgumentBinder {
    fn default() -> Self {
        ArgumentBinder {
            positional_index: Some(0),
            invoked: false,
        }
    }
}

fn find_field<'f, 'a>(
    fields: &'f mut [(&'static str, FieldMut<'a>)],
    name: &str,
) -> Option<&'f mut FieldMut<'a>> {
    fields
        .iter_mut()
        .find(|(field, _)| *field == name)
        .map(|(_, field)| field)
}

/// Turns a slot type mismatch into an argument type mismatch.
fn as_argument_error(error: Error, argument: &str) -> Error {
    match error.get_internal_error().clone() {
        ErrorImpl::TypeMatchError { expected, received } => Error::new(
            ErrorImpl::ArgumentTypeMatchError {
                argument: argument.to_string(),
                expected,
                received,
            },
            error.get_position().clone(),
        ),
        _ => error,
    }
}

impl ArgumentBinder {
    pub fn is_invoked(&self) -> bool {
        self.invoked
    }

    pub fn mark_invoked(&mut self) {
        self.invoked = true;
    }

    pub fn bind_argument(
        &mut self,
        callable: &str,
        parameters: &[Parameter],
        mut fields: Vec<(&'static str, FieldMut<'_>)>,
        argument: ExprWrapper,
    ) -> Result<(), Error> {
        self.invoked = true;
        let start = match self.positional_index {
            Some(index) => index,
            None => return Err(Error::detached(ErrorImpl::PositionalFollowsKeyword)),
        };

        let too_many = || {
            Error::detached(ErrorImpl::TooManyPositionalArguments {
                callable: callable.to_string(),
            })
        };

        let (index, parameter) = match parameters.iter().enumerate().nth(start) {
            Some(found) => found,
            None => return Err(too_many()),
        };

        match (parameter, find_field(&mut fields, parameter_name(parameter))) {
            (Parameter::Positional(name), Some(FieldMut::Slot(slot))) => {
                slot.add_expression(argument)
                    .map_err(|error| as_argument_error(error, name))?;
                self.positional_index = Some(index + 1);
                Ok(())
            }
            // The variadic field keeps the cursor, it takes every further argument
            (Parameter::Variadic(name), Some(FieldMut::Variadic(variadic))) => variadic
                .push_expression(argument)
                .map_err(|error| as_argument_error(error, name)),
            _ => Err(too_many()),
        }
    }

    pub fn bind_keyword_argument(
        &mut self,
        callable: &str,
        parameters: &[Parameter],
        mut fields: Vec<(&'static str, FieldMut<'_>)>,
        keyword: &str,
        argument: ExprWrapper,
    ) -> Result<(), Error> {
        self.invoked = true;
        self.positional_index = None;

        let keyword_only = parameters
            .iter()
            .any(|parameter| matches!(parameter, Parameter::KeywordOnly(name) if *name == keyword));

        if keyword_only {
            return match find_field(&mut fields, keyword) {
                Some(FieldMut::Slot(slot)) => {
                    if slot.is_occupied() {
                        return Err(Error::detached(ErrorImpl::RepeatedKeywordArgument {
                            keyword: keyword.to_string(),
                        }));
                    }
                    slot.add_expression(argument)
                        .map_err(|error| as_argument_error(error, keyword))
                }
                _ => Err(unexpected_keyword(callable, keyword)),
            };
        }

        let variadic_keyword = parameters.iter().find_map(|parameter| match parameter {
            Parameter::VariadicKeyword(name) => Some(*name),
            _ => None,
        });

        let Some(name) = variadic_keyword else {
            return Err(unexpected_keyword(callable, keyword));
        };

        match find_field(&mut fields, name) {
            Some(FieldMut::Variadic(variadic)) => {
                let repeated = variadic.iter().any(|slot| {
                    slot.get_expression()
                        .and_then(|expression| expression.downcast_ref::<Keyword>())
                        .map(|existing| existing.get_arg() == keyword)
                        .unwrap_or(false)
                });
                if repeated {
                    return Err(Error::detached(ErrorImpl::RepeatedKeywordArgument {
                        keyword: keyword.to_string(),
                    }));
                }

                let span = argument.get_span().clone();
                variadic.push_expression(ExprWrapper::new(Keyword::new(keyword, argument, span)?))
            }
            _ => Err(unexpected_keyword(callable, keyword)),
        }
    }
}

fn parameter_name(parameter: &Parameter) -> &'static str {
    match parameter {
        Parameter::Positional(name)
        | Parameter::Variadic(name)
        | Parameter::KeywordOnly(name)
        | Parameter::VariadicKeyword(name) => name,
    }
}

fn unexpected_keyword(callable: &str, keyword: &str) -> Error {
    Error::detached(ErrorImpl::UnexpectedKeywordArgument {
        callable: callable.to_string(),
        keyword: keyword.to_string(),
    })
}

/// Call
/// Calls `func` with positional `args` and `keywords`.
#[derive(Debug, Clone)]
pub struct Call {
    pub func: ExpressionSlot,
    pub args: VariadicField,
    pub keywords: VariadicField,
    pub span: Span,
    binder: ArgumentBinder,
}

const CALL_PARAMETERS: [Parameter; 2] = [
    Parameter::Variadic("args"),
    Parameter::VariadicKeyword("keywords"),
];

impl Call {
    pub fn new(span: Span) -> Self {
        Call {
            func: ExpressionSlot::new(BasicType::wrap(TypeType::Object)),
            args: VariadicField::new(BasicType::wrap(TypeType::Object)),
            keywords: VariadicField::new(BasicType::wrap(TypeType::Keyword)),
            span,
            binder: ArgumentBinder::default(),
        }
    }

    /// A call of `func` without arguments.
    pub fn with_func(func: ExprWrapper, span: Span) -> Result<Self, Error> {
        let mut call = Call::new(span);
        call.func.add_expression(func)?;
        Ok(call)
    }
}

impl Expr for Call {
    fn get_expr_type(&self) -> ExprType {
        ExprType::Call
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
    fn get_type(&self) -> TypeWrapper {
        BasicType::wrap(TypeType::Object)
    }
    fn clone_wrapper(&self) -> ExprWrapper {
        ExprWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
    fn get_fields(&self) -> Vec<(&'static str, FieldRef<'_>)> {
        vec![
            ("func", FieldRef::Slot(&self.func)),
            ("args", FieldRef::Variadic(&self.args)),
            ("keywords", FieldRef::Variadic(&self.keywords)),
        ]
    }
    fn get_field_mut(&mut self, field: &str) -> Option<FieldMut<'_>> {
        match field {
            "func" => Some(FieldMut::Slot(&mut self.func)),
            "args" => Some(FieldMut::Variadic(&mut self.args)),
            "keywords" => Some(FieldMut::Variadic(&mut self.keywords)),
            _ => None,
        }
    }
    fn as_callable(&self) -> Option<&dyn CallableExpr> {
        Some(self)
    }
    fn as_callable_mut(&mut self) -> Option<&mut dyn CallableExpr> {
        Some(self)
    }
}

impl CallableExpr for Call {
    fn add_argument(&mut self, argument: ExprWrapper) -> Result<(), Error> {
        let fields = vec![
            ("args", FieldMut::Variadic(&mut self.args)),
            ("keywords", FieldMut::Variadic(&mut self.keywords)),
        ];
        self.binder
            .bind_argument("Call", &CALL_PARAMETERS, fields, argument)
    }
    fn add_keyword_argument(&mut self, keyword: &str, argument: ExprWrapper) -> Result<(), Error> {
        let fields = vec![
            ("args", FieldMut::Variadic(&mut self.args)),
            ("keywords", FieldMut::Variadic(&mut self.keywords)),
        ];
        self.binder
            .bind_keyword_argument("Call", &CALL_PARAMETERS, fields, keyword, argument)
    }
    fn is_invoked(&self) -> bool {
        self.binder.is_invoked()
    }
    fn mark_invoked(&mut self) {
        self.binder.mark_invoked()
    }
}

/// The type held by a `TypeExpr`, if `expression` is one.
pub fn as_type(expression: &ExprWrapper) -> Option<&TypeWrapper> {
    expression
        .downcast_ref::<TypeExpr>()
        .map(|type_expr| &type_expr.type_)
}
