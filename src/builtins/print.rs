use std::any::Any;

use crate::{
    ast::{
        ast::{
            BuiltinExpr, CallableExpr, Expr, ExprType, ExprWrapper, FieldMut, FieldRef, TypeType,
            TypeWrapper,
        },
        expressions::{ArgumentBinder, Parameter},
        slot::{ExpressionSlot, VariadicField},
        types::{BasicType, CallableType, KeywordOnlyArgType},
    },
    errors::errors::Error,
    unparser::unparser::unparse_expression,
    Span,
};

const PRINT_PARAMETERS: [Parameter; 5] = [
    Parameter::Variadic("objects"),
    Parameter::KeywordOnly("sep"),
    Parameter::KeywordOnly("end"),
    Parameter::KeywordOnly("file"),
    Parameter::KeywordOnly("flush"),
];

/// `print(*objects, sep=' ', end='\n', file=None, flush=False)`
#[derive(Debug, Clone)]
pub struct Print {
    pub objects: VariadicField,
    pub sep: ExpressionSlot,
    pub end: ExpressionSlot,
    pub file: ExpressionSlot,
    pub flush: ExpressionSlot,
    pub span: Span,
    binder: ArgumentBinder,
}

impl Print {
    pub fn new(span: Span) -> Self {
        Print {
            objects: VariadicField::new(BasicType::wrap(TypeType::Object)),
            sep: ExpressionSlot::new(BasicType::wrap(TypeType::Str)),
            end: ExpressionSlot::new(BasicType::wrap(TypeType::Str)),
            file: ExpressionSlot::new(BasicType::wrap(TypeType::Object)),
            flush: ExpressionSlot::new(BasicType::wrap(TypeType::Bool)),
            span,
            binder: ArgumentBinder::default(),
        }
    }

    /// `Function[[*args, sep, end, file, flush], None]`
    pub fn function_type() -> TypeWrapper {
        let keyword = |name: &str, type_type: TypeType| {
            TypeWrapper::new(KeywordOnlyArgType::new(
                name,
                true,
                BasicType::wrap(type_type),
            ))
        };

        TypeWrapper::new(CallableType::function(
            vec![
                BasicType::wrap(TypeType::VariadicArg),
                keyword("sep", TypeType::Str),
                keyword("end", TypeType::Str),
                keyword("file", TypeType::Object),
                keyword("flush", TypeType::Bool),
            ],
            BasicType::wrap(TypeType::NoneType),
        ))
    }

    /// Whether any object or keyword slot is filled, however it was filled.
    pub fn has_arguments(&self) -> bool {
        !self.objects.is_empty()
            || self
                .keyword_slots()
                .iter()
                .any(|(_, slot)| slot.is_occupied())
    }

    fn keyword_slots(&self) -> [(&'static str, &ExpressionSlot); 4] {
        [
            ("sep", &self.sep),
            ("end", &self.end),
            ("file", &self.file),
            ("flush", &self.flush),
        ]
    }
}

impl Expr for Print {
    fn get_expr_type(&self) -> ExprType {
        ExprType::Builtin
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
    fn get_type(&self) -> TypeWrapper {
        Print::function_type()
    }
    fn clone_wrapper(&self) -> ExprWrapper {
        ExprWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
    fn get_fields(&self) -> Vec<(&'static str, FieldRef<'_>)> {
        vec![
            ("objects", FieldRef::Variadic(&self.objects)),
            ("sep", FieldRef::Slot(&self.sep)),
            ("end", FieldRef::Slot(&self.end)),
            ("file", FieldRef::Slot(&self.file)),
            ("flush", FieldRef::Slot(&self.flush)),
        ]
    }
    fn get_field_mut(&mut self, field: &str) -> Option<FieldMut<'_>> {
        match field {
            "objects" => Some(FieldMut::Variadic(&mut self.objects)),
            "sep" => Some(FieldMut::Slot(&mut self.sep)),
            "end" => Some(FieldMut::Slot(&mut self.end)),
            "file" => Some(FieldMut::Slot(&mut self.file)),
            "flush" => Some(FieldMut::Slot(&mut self.flush)),
            _ => None,
        }
    }
    fn get_name(&self) -> String {
        self.get_builtin_name().to_string()
    }
    fn as_callable(&self) -> Option<&dyn CallableExpr> {
        Some(self)
    }
    fn as_callable_mut(&mut self) -> Option<&mut dyn CallableExpr> {
        Some(self)
    }
    fn as_builtin(&self) -> Option<&dyn BuiltinExpr> {
        Some(self)
    }
}

impl CallableExpr for Print {
    fn add_argument(&mut self, argument: ExprWrapper) -> Result<(), Error> {
        let fields = vec![("objects", FieldMut::Variadic(&mut self.objects))];
        self.binder
            .bind_argument("print", &PRINT_PARAMETERS, fields, argument)
    }
    fn add_keyword_argument(&mut self, keyword: &str, argument: ExprWrapper) -> Result<(), Error> {
        let fields = vec![
            ("sep", FieldMut::Slot(&mut self.sep)),
            ("end", FieldMut::Slot(&mut self.end)),
            ("file", FieldMut::Slot(&mut self.file)),
            ("flush", FieldMut::Slot(&mut self.flush)),
        ];
        self.binder
            .bind_keyword_argument("print", &PRINT_PARAMETERS, fields, keyword, argument)
    }
    fn is_invoked(&self) -> bool {
        self.binder.is_invoked()
    }
    fn mark_invoked(&mut self) {
        self.binder.mark_invoked()
    }
}

impl BuiltinExpr for Print {
    fn get_builtin_name(&self) -> &'static str {
        "print"
    }

    /// Bare `print` unless the call was invoked or holds an argument.
    fn unparse(&self) -> Result<String, Error> {
        if !self.is_invoked() && !self.has_arguments() {
            return Ok(self.get_builtin_name().to_string());
        }

        let mut arguments = vec![];

        for slot in self.objects.iter() {
            if let Some(object) = slot.get_expression() {
                arguments.push(unparse_expression(object)?);
            }
        }

        for (keyword, slot) in self.keyword_slots() {
            if let Some(value) = slot.get_expression() {
                arguments.push(format!("{}={}", keyword, unparse_expression(value)?));
            }
        }

        Ok(format!("print({})", arguments.join(", ")))
    }
}
