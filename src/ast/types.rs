//! Type system definitions for the AST.
//!
//! This module defines the type hierarchy shared by every front end:
//!
//! - Plain classes (`type`, `object`, `bool`, `int`, ...) and their literal
//!   counterparts, see `BasicType`
//! - Parameterised types (`list[T]`, callables, keyword-only arguments)
//! - The compatibility rules used by slots to accept or reject expressions
//!
//! Types are expressions too: a type placed in a slot is wrapped in
//! `TypeExpr`, whose value type is always `type`.

use std::any::Any;

use super::ast::{Type, TypeType, TypeWrapper};

/// The data-less classes of the hierarchy.
///
/// `List`, `Callable`, `Function` and `KeywordOnlyArg` carry parameters and
/// are represented by their own structs instead.
#[derive(Debug, Clone)]
pub struct BasicType {
    pub type_type: TypeType,
}

impl BasicType {
    pub fn wrap(type_type: TypeType) -> TypeWrapper {
        match type_type {
            TypeType::List => TypeWrapper::new(ListType::default()),
            TypeType::Callable | TypeType::Function => TypeWrapper::new(CallableType {
                is_function: type_type == TypeType::Function,
                ..CallableType::default()
            }),
            _ => TypeWrapper::new(BasicType { type_type }),
        }
    }
}

/// Compatibility shared by every class deriving from `object`.
fn object_is_compatible_with(type_type: TypeType, other: &dyn Type) -> bool {
    let other_type = other.get_type_type();
    if other_type == TypeType::Type {
        return false;
    }
    type_type.is_subclass_of(other_type)
}

impl Type for BasicType {
    fn clone_wrapper(&self) -> TypeWrapper {
        TypeWrapper::new(self.clone())
    }
    fn get_type_type(&self) -> TypeType {
        self.type_type
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn is_compatible_with(&self, other: &dyn Type) -> bool {
        match self.type_type {
            TypeType::Type | TypeType::Keyword => other.get_type_type() == self.type_type,
            // Argument markers are matched by `CallableType` itself
            TypeType::VariadicArg | TypeType::VariadicKeywordArg | TypeType::KeywordOnlyArg => {
                false
            }
            type_type => object_is_compatible_with(type_type, other),
        }
    }
    fn get_name(&self) -> String {
        match self.type_type {
            TypeType::Type => "type".to_string(),
            TypeType::Object => "object".to_string(),
            TypeType::Bool => "bool".to_string(),
            TypeType::NoneType => "None".to_string(),
            TypeType::Int => "int".to_string(),
            TypeType::Float => "float".to_string(),
            TypeType::Str => "str".to_string(),
            TypeType::LiteralBool => "Literal[bool]".to_string(),
            TypeType::LiteralNoneType => "Literal[None]".to_string(),
            TypeType::LiteralInt => "Literal[int]".to_string(),
            TypeType::LiteralFloat => "Literal[float]".to_string(),
            TypeType::LiteralStr => "Literal[str]".to_string(),
            TypeType::VariadicArg => "*args".to_string(),
            TypeType::VariadicKeywordArg => "**kwargs".to_string(),
            TypeType::Keyword => "keyword".to_string(),
            other => format!("{:?}", other),
        }
    }
}

/// `list[item_type]`. Compatibility ignores the item type.
#[derive(Debug, Clone)]
pub struct ListType {
    pub item_type: TypeWrapper,
}

impl Default for ListType {
    fn default() -> Self {
        ListType {
            item_type: BasicType::wrap(TypeType::Object),
        }
    }
}

impl Type for ListType {
    fn clone_wrapper(&self) -> TypeWrapper {
        TypeWrapper::new(self.clone())
    }
    fn get_type_type(&self) -> TypeType {
        TypeType::List
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn is_compatible_with(&self, other: &dyn Type) -> bool {
        object_is_compatible_with(TypeType::List, other)
    }
    fn get_name(&self) -> String {
        format!("list[{}]", self.item_type.get_name())
    }
}

/// A parameter that can only be passed by keyword.
#[derive(Debug, Clone)]
pub struct KeywordOnlyArgType {
    pub keyword: String,
    pub optional: bool,
    pub arg_type: TypeWrapper,
}

impl KeywordOnlyArgType {
    pub fn new(keyword: &str, optional: bool, arg_type: TypeWrapper) -> Self {
        KeywordOnlyArgType {
            keyword: keyword.to_string(),
            optional,
            arg_type,
        }
    }
}

impl Type for KeywordOnlyArgType {
    fn clone_wrapper(&self) -> TypeWrapper {
        TypeWrapper::new(self.clone())
    }
    fn get_type_type(&self) -> TypeType {
        TypeType::KeywordOnlyArg
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn is_compatible_with(&self, _other: &dyn Type) -> bool {
        false
    }
    fn get_name(&self) -> String {
        if self.optional {
            format!("{}: {} = ...", self.keyword, self.arg_type.get_name())
        } else {
            format!("{}: {}", self.keyword, self.arg_type.get_name())
        }
    }
}

/// `Callable[[arg_types], return_type]`, or `Function[...]` when
/// `is_function` is set.
#[derive(Debug, Clone)]
pub struct CallableType {
    pub arg_types: Vec<TypeWrapper>,
    pub return_type: TypeWrapper,
    pub is_function: bool,
}

impl Default for CallableType {
    fn default() -> Self {
        CallableType {
            arg_types: vec![],
            return_type: BasicType::wrap(TypeType::Object),
            is_function: false,
        }
    }
}

fn is_keyword_marker(type_type: TypeType) -> bool {
    matches!(
        type_type,
        TypeType::KeywordOnlyArg | TypeType::VariadicKeywordArg
    )
}

impl CallableType {
    pub fn new(arg_types: Vec<TypeWrapper>, return_type: TypeWrapper) -> Self {
        CallableType {
            arg_types,
            return_type,
            is_function: false,
        }
    }

    pub fn function(arg_types: Vec<TypeWrapper>, return_type: TypeWrapper) -> Self {
        CallableType {
            arg_types,
            return_type,
            is_function: true,
        }
    }

    /// Checks whether `self` can be used where a callable with the
    /// signature of `other` is expected.
    fn is_signature_compatible_with(&self, other: &CallableType) -> bool {
        let mut self_index = 0;
        let mut other_index = 0;
        let mut both_keyword = false;

        while self_index < self.arg_types.len() {
            let self_arg = &self.arg_types[self_index];
            let self_kind = self_arg.get_type_type();

            if other_index >= other.arg_types.len() {
                match self_kind {
                    TypeType::VariadicArg | TypeType::VariadicKeywordArg => {}
                    TypeType::KeywordOnlyArg if is_optional_keyword(self_arg) => {}
                    _ => return false,
                }
                self_index += 1;
                continue;
            }

            let other_arg = &other.arg_types[other_index];
            let other_kind = other_arg.get_type_type();

            match (self_kind, other_kind) {
                (TypeType::VariadicArg, TypeType::VariadicArg) => {
                    self_index += 1;
                    other_index += 1;
                }
                // self may still take keywords further on
                (TypeType::VariadicArg, kind) if is_keyword_marker(kind) => self_index += 1,
                (TypeType::VariadicArg, _) => other_index += 1,
                (kind, TypeType::VariadicArg) if is_keyword_marker(kind) => other_index += 1,
                (self_kind, other_kind)
                    if is_keyword_marker(self_kind) && is_keyword_marker(other_kind) =>
                {
                    both_keyword = true;
                    break;
                }
                (self_kind, other_kind)
                    if is_keyword_marker(self_kind) || is_keyword_marker(other_kind) =>
                {
                    return false;
                }
                (_, TypeType::VariadicArg) => self_index += 1,
                _ => {
                    if !self_arg.is_compatible_with(other_arg) {
                        return false;
                    }
                    self_index += 1;
                    other_index += 1;
                }
            }
        }

        if both_keyword {
            let mut self_keywords = vec![];
            let mut self_variadic_keyword = false;
            for arg in &self.arg_types[self_index..] {
                match arg.downcast_ref::<KeywordOnlyArgType>() {
                    Some(keyword) => self_keywords.push(keyword),
                    None if arg.get_type_type() == TypeType::VariadicKeywordArg => {
                        self_variadic_keyword = true
                    }
                    None => return false,
                }
            }

            let mut other_required = vec![];
            let mut other_variadic_keyword = false;
            for arg in &other.arg_types[other_index..] {
                match arg.downcast_ref::<KeywordOnlyArgType>() {
                    Some(keyword) if !keyword.optional => other_required.push(keyword),
                    Some(_) => {}
                    None if arg.get_type_type() == TypeType::VariadicKeywordArg => {
                        other_variadic_keyword = true
                    }
                    None => return false,
                }
            }
            other_index = other.arg_types.len();

            // other may be called with any keyword, self must accept them all
            if other_variadic_keyword && !self_variadic_keyword {
                return false;
            }

            for required in other_required {
                match self_keywords.iter().find(|k| k.keyword == required.keyword) {
                    Some(own) => {
                        if !own.arg_type.is_compatible_with(&required.arg_type) {
                            return false;
                        }
                    }
                    None if self_variadic_keyword => {}
                    None => return false,
                }
            }
        }

        for other_arg in &other.arg_types[other_index..] {
            match other_arg.get_type_type() {
                TypeType::KeywordOnlyArg if is_optional_keyword(other_arg) => {}
                _ => return false,
            }
        }

        // Callers expecting `None` ignore the returned value
        if is_none_type(&other.return_type) {
            return true;
        }
        self.return_type.is_compatible_with(&other.return_type)
    }
}

fn is_optional_keyword(arg: &TypeWrapper) -> bool {
    arg.downcast_ref::<KeywordOnlyArgType>()
        .map(|keyword| keyword.optional)
        .unwrap_or(false)
}

fn is_none_type(type_: &TypeWrapper) -> bool {
    type_.get_type_type().is_subclass_of(TypeType::NoneType)
}

impl Type for CallableType {
    fn clone_wrapper(&self) -> TypeWrapper {
        TypeWrapper::new(self.clone())
    }
    fn get_type_type(&self) -> TypeType {
        if self.is_function {
            TypeType::Function
        } else {
            TypeType::Callable
        }
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn is_compatible_with(&self, other: &dyn Type) -> bool {
        match other.get_type_type() {
            TypeType::Type => false,
            TypeType::Object => true,
            _ => match other.as_any().downcast_ref::<CallableType>() {
                Some(callable) => self.is_signature_compatible_with(callable),
                None => false,
            },
        }
    }
    fn get_name(&self) -> String {
        let args = self
            .arg_types
            .iter()
            .map(|arg| arg.get_name())
            .collect::<Vec<String>>()
            .join(", ");
        let name = if self.is_function { "Function" } else { "Callable" };
        format!("{}[[{}], {}]", name, args, self.return_type.get_name())
    }
}
