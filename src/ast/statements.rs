use std::{
    any::Any,
    slice::{Iter, IterMut},
};

use crate::{
    errors::errors::{Error, ErrorImpl},
    Span,
};

use super::{
    ast::{ExprWrapper, FieldMut, FieldRef, Stmt, StmtType, StmtWrapper, TypeType, TypeWrapper},
    expressions::{as_type, literal_str, TypeExpr},
    slot::{ExpressionSlot, LiteralValue},
    types::BasicType,
};

/// Code Block
///
/// An ordered list of statements. Siblings are addressed by index.
#[derive(Debug, Clone)]
pub struct CodeBlock {
    pub body: Vec<StmtWrapper>,
    pub span: Span,
}

impl CodeBlock {
    pub fn new(span: Span) -> Self {
        CodeBlock { body: vec![], span }
    }

    pub fn iter(&self) -> Iter<'_, StmtWrapper> {
        self.body.iter()
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, StmtWrapper> {
        self.body.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn get_child(&self, index: usize) -> Option<&StmtWrapper> {
        self.body.get(index)
    }

    pub fn get_child_mut(&mut self, index: usize) -> Option<&mut StmtWrapper> {
        self.body.get_mut(index)
    }

    fn out_of_range(&self, index: usize) -> Error {
        Error::detached(ErrorImpl::IndexOutOfRange {
            index,
            len: self.body.len(),
        })
    }

    /// Overwrites the child at `index`, returning the previous one.
    pub fn set_child(&mut self, index: usize, child: StmtWrapper) -> Result<StmtWrapper, Error> {
        match self.body.get_mut(index) {
            Some(slot) => Ok(std::mem::replace(slot, child)),
            None => Err(self.out_of_range(index)),
        }
    }

    /// Inserts before `index`; `index == len` appends.
    pub fn insert_child(&mut self, index: usize, child: StmtWrapper) -> Result<(), Error> {
        if index > self.body.len() {
            return Err(self.out_of_range(index));
        }
        self.body.insert(index, child);
        Ok(())
    }

    pub fn append_child(&mut self, child: StmtWrapper) {
        self.body.push(child);
    }

    pub fn remove_child(&mut self, index: usize) -> Result<StmtWrapper, Error> {
        if index >= self.body.len() {
            return Err(self.out_of_range(index));
        }
        Ok(self.body.remove(index))
    }

    /// Splices `children` in place of the child at `index` and returns the
    /// replaced child. An empty list simply removes it.
    pub fn replace_child(
        &mut self,
        index: usize,
        children: Vec<StmtWrapper>,
    ) -> Result<StmtWrapper, Error> {
        if index >= self.body.len() {
            return Err(self.out_of_range(index));
        }
        let mut removed = self.body.splice(index..=index, children);
        match removed.next() {
            Some(child) => Ok(child),
            None => Err(Error::detached(ErrorImpl::IndexOutOfRange {
                index,
                len: 0,
            })),
        }
    }

    pub fn next_sibling(&self, index: usize) -> Option<&StmtWrapper> {
        self.body.get(index.checked_add(1)?)
    }

    pub fn prev_sibling(&self, index: usize) -> Option<&StmtWrapper> {
        self.body.get(index.checked_sub(1)?)
    }
}

impl Stmt for CodeBlock {
    fn get_stmt_type(&self) -> StmtType {
        StmtType::CodeBlock
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
    fn clone_wrapper(&self) -> StmtWrapper {
        StmtWrapper::new(self.clone())
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
}

/// Expression Statement
///
/// Evaluates `value` and discards the result.
#[derive(Debug, Clone)]
pub struct ExpressionStmt {
    pub value: ExpressionSlot,
    pub span: Span,
}

impl ExpressionStmt {
    pub fn new(value: ExprWrapper, span: Span) -> Result<Self, Error> {
        let mut stmt = ExpressionStmt {
            value: ExpressionSlot::new(BasicType::wrap(TypeType::Object)),
            span,
        };
        stmt.value.add_expression(value)?;
        Ok(stmt)
    }
}

impl Stmt for ExpressionStmt {
    fn get_stmt_type(&self) -> StmtType {
        StmtType::ExpressionStmt
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
    fn clone_wrapper(&self) -> StmtWrapper {
        StmtWrapper::new(self.clone())
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

fn id_slot(id: &str) -> ExpressionSlot {
    ExpressionSlot::literal(LiteralValue::Str(id.to_string()))
}

/// A `type` slot that starts out holding `object`.
fn object_type_slot() -> ExpressionSlot {
    let mut slot = ExpressionSlot::new(BasicType::wrap(TypeType::Type));
    // A fresh slot of type `type` always accepts a type expression
    let _ = slot.add_expression(TypeExpr::wrap(TypeType::Object));
    slot
}

/// Variable Declaration
///
/// `id: type` without a value.
#[derive(Debug, Clone)]
pub struct VariableDeclaration {
    pub id: ExpressionSlot,
    pub type_: ExpressionSlot,
    pub span: Span,
}

impl VariableDeclaration {
    pub fn new(id: &str, span: Span) -> Self {
        VariableDeclaration {
            id: id_slot(id),
            type_: object_type_slot(),
            span,
        }
    }

    pub fn get_id(&self) -> &str {
        literal_str(&self.id)
    }

    /// The declared type, if the type slot holds one.
    pub fn get_declared_type(&self) -> Option<&TypeWrapper> {
        self.type_.get_expression().and_then(as_type)
    }

    /// Replaces the declared type.
    pub fn set_type(&mut self, type_: TypeExpr) -> Result<(), Error> {
        self.type_.remove_expression();
        self.type_.add_expression(ExprWrapper::new(type_))
    }
}

impl Stmt for VariableDeclaration {
    fn get_stmt_type(&self) -> StmtType {
        StmtType::VariableDeclaration
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
    fn clone_wrapper(&self) -> StmtWrapper {
        StmtWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
    fn get_fields(&self) -> Vec<(&'static str, FieldRef<'_>)> {
        vec![
            ("id", FieldRef::Slot(&self.id)),
            ("type", FieldRef::Slot(&self.type_)),
        ]
    }
    fn get_field_mut(&mut self, field: &str) -> Option<FieldMut<'_>> {
        match field {
            "id" => Some(FieldMut::Slot(&mut self.id)),
            "type" => Some(FieldMut::Slot(&mut self.type_)),
            _ => None,
        }
    }
}

/// Variable Definition
///
/// `id: type = value`. The value slot is owned by the `type` slot, which
/// constrains it: the value slot always has the declared type, however the
/// type slot is edited.
#[derive(Debug, Clone)]
pub struct VariableDefinition {
    pub id: ExpressionSlot,
    type_: ExpressionSlot,
    pub span: Span,
}

impl VariableDefinition {
    pub fn new(id: &str, span: Span) -> Self {
        let mut type_ = object_type_slot();
        // A slot of type `type` always takes a constraint
        let _ = type_.set_constraint_slot(ExpressionSlot::new(BasicType::wrap(TypeType::Object)));

        VariableDefinition {
            id: id_slot(id),
            type_,
            span,
        }
    }

    pub fn get_id(&self) -> &str {
        literal_str(&self.id)
    }

    pub fn get_declared_type(&self) -> Option<&TypeWrapper> {
        self.type_.get_expression().and_then(as_type)
    }

    pub fn get_type_slot(&self) -> &ExpressionSlot {
        &self.type_
    }

    pub fn get_value_slot(&self) -> Option<&ExpressionSlot> {
        self.type_.get_constraint_slot()
    }

    pub fn get_value_slot_mut(&mut self) -> Option<&mut ExpressionSlot> {
        self.type_.get_constraint_slot_mut()
    }

    /// Replaces the declared type and re-types the value slot.
    ///
    /// Returns the value if it no longer fits the new type.
    pub fn set_type(&mut self, type_: TypeExpr) -> Result<Option<ExprWrapper>, Error> {
        self.type_.remove_expression();
        self.type_.place_expression(ExprWrapper::new(type_))
    }

    pub fn set_value(&mut self, value: ExprWrapper) -> Result<(), Error> {
        match self.get_value_slot_mut() {
            Some(slot) => slot.add_expression(value),
            None => Err(Error::detached(ErrorImpl::UnknownField {
                node: String::from("VariableDefinition"),
                field: String::from("value"),
            })),
        }
    }
}

impl Stmt for VariableDefinition {
    fn get_stmt_type(&self) -> StmtType {
        StmtType::VariableDefinition
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
    fn clone_wrapper(&self) -> StmtWrapper {
        StmtWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
    fn get_fields(&self) -> Vec<(&'static str, FieldRef<'_>)> {
        let mut fields = vec![
            ("id", FieldRef::Slot(&self.id)),
            ("type", FieldRef::Slot(&self.type_)),
        ];
        if let Some(value) = self.get_value_slot() {
            fields.push(("value", FieldRef::Slot(value)));
        }
        fields
    }
    fn get_field_mut(&mut self, field: &str) -> Option<FieldMut<'_>> {
        match field {
            "id" => Some(FieldMut::Slot(&mut self.id)),
            "type" => Some(FieldMut::Slot(&mut self.type_)),
            "value" => self.get_value_slot_mut().map(FieldMut::Slot),
            _ => None,
        }
    }
}
