//! Expression slots.
//!
//! Every child position of a node is an `ExpressionSlot`. A slot has a type
//! and holds nothing, a raw literal value (literal slot types only) or an
//! expression whose value type is compatible with the slot type.
//!
//! A slot of type `type` can own a second slot that it constrains: whenever
//! a type expression lands in the owner, the constrained slot is re-typed to
//! that type.

use std::{
    fmt::Display,
    slice::{Iter, IterMut},
};

use crate::errors::errors::{Error, ErrorImpl};

use super::{
    ast::{check_type_compatibility, Expr, ExprWrapper, Type, TypeType, TypeWrapper},
    expressions::as_type,
    types::BasicType,
};

/// A raw value stored in a literal slot.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Bool(bool),
    None,
    Int(i64),
    Float(f64),
    Str(String),
}

impl LiteralValue {
    /// The literal type a slot needs to hold this value.
    pub fn get_literal_type(&self) -> TypeType {
        match self {
            LiteralValue::Bool(_) => TypeType::LiteralBool,
            LiteralValue::None => TypeType::LiteralNoneType,
            LiteralValue::Int(_) => TypeType::LiteralInt,
            LiteralValue::Float(_) => TypeType::LiteralFloat,
            LiteralValue::Str(_) => TypeType::LiteralStr,
        }
    }
}

impl Display for LiteralValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LiteralValue::Bool(true) => write!(f, "True"),
            LiteralValue::Bool(false) => write!(f, "False"),
            LiteralValue::None => write!(f, "None"),
            LiteralValue::Int(value) => write!(f, "{}", value),
            LiteralValue::Float(value) => write!(f, "{:?}", value),
            LiteralValue::Str(value) => write!(f, "{:?}", value),
        }
    }
}

#[derive(Debug, Clone)]
pub enum SlotContent {
    Empty,
    Literal(LiteralValue),
    Expression(ExprWrapper),
}

#[derive(Debug, Clone)]
pub struct ExpressionSlot {
    slot_type: TypeWrapper,
    content: SlotContent,
    constraint_slot: Option<Box<ExpressionSlot>>,
}

impl ExpressionSlot {
    pub fn new(slot_type: TypeWrapper) -> Self {
        ExpressionSlot {
            slot_type,
            content: SlotContent::Empty,
            constraint_slot: None,
        }
    }

    /// A literal slot typed after the value it starts with.
    pub fn literal(value: LiteralValue) -> Self {
        ExpressionSlot {
            slot_type: BasicType::wrap(value.get_literal_type()),
            content: SlotContent::Literal(value),
            constraint_slot: None,
        }
    }

    pub fn get_type(&self) -> &TypeWrapper {
        &self.slot_type
    }

    pub fn get_content(&self) -> &SlotContent {
        &self.content
    }

    pub fn get_expression(&self) -> Option<&ExprWrapper> {
        match &self.content {
            SlotContent::Expression(expression) => Some(expression),
            _ => None,
        }
    }

    pub fn get_literal(&self) -> Option<&LiteralValue> {
        match &self.content {
            SlotContent::Literal(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_occupied(&self) -> bool {
        !matches!(self.content, SlotContent::Empty)
    }

    pub fn is_literal_slot(&self) -> bool {
        self.slot_type.get_type_type().is_literal()
    }

    /// Whether the expression's value type fits the slot type.
    pub fn is_compatible_with(&self, expression: &dyn Expr) -> bool {
        check_type_compatibility(&self.slot_type, &expression.get_type())
    }

    pub fn set_literal_expression(&mut self, value: LiteralValue) -> Result<(), Error> {
        let type_type = self.slot_type.get_type_type();
        if !type_type.is_literal() {
            return Err(Error::detached(ErrorImpl::NotLiteralSlot {
                slot_type: self.slot_type.get_name(),
            }));
        }

        if value.get_literal_type() != type_type {
            return Err(Error::detached(ErrorImpl::LiteralValueMismatch {
                slot_type: self.slot_type.get_name(),
                value: value.to_string(),
            }));
        }

        self.content = SlotContent::Literal(value);
        Ok(())
    }

    pub fn get_constraint_slot(&self) -> Option<&ExpressionSlot> {
        self.constraint_slot.as_deref()
    }

    pub fn get_constraint_slot_mut(&mut self) -> Option<&mut ExpressionSlot> {
        self.constraint_slot.as_deref_mut()
    }

    /// Makes this slot constrain `slot`. Only slots of type `type` can hold a
    /// constraint.
    ///
    /// Returns the expression evicted from `slot` if it does not fit the type
    /// held here.
    pub fn set_constraint_slot(
        &mut self,
        slot: ExpressionSlot,
    ) -> Result<Option<ExprWrapper>, Error> {
        if self.slot_type.get_type_type() != TypeType::Type {
            return Err(Error::detached(ErrorImpl::ConstraintNotAllowed {
                slot_type: self.slot_type.get_name(),
            }));
        }

        self.constraint_slot = Some(Box::new(slot));
        Ok(self.apply_constraint())
    }

    /// Places an expression in an empty, non-literal slot.
    pub fn add_expression(&mut self, expression: ExprWrapper) -> Result<(), Error> {
        self.place_expression(expression).map(|_| ())
    }

    /// Like `add_expression`, but hands back whatever the constrained slot
    /// evicted.
    pub(crate) fn place_expression(
        &mut self,
        expression: ExprWrapper,
    ) -> Result<Option<ExprWrapper>, Error> {
        if self.is_literal_slot() {
            return Err(Error::new(
                ErrorImpl::LiteralSlot {
                    slot_type: self.slot_type.get_name(),
                },
                expression.get_span().start.clone(),
            ));
        }

        if self.is_occupied() {
            return Err(Error::new(
                ErrorImpl::SlotOccupied {
                    slot_type: self.slot_type.get_name(),
                },
                expression.get_span().start.clone(),
            ));
        }

        if !self.is_compatible_with(&expression) {
            return Err(Error::new(
                ErrorImpl::TypeMatchError {
                    expected: self.slot_type.get_name(),
                    received: expression.get_type().get_name(),
                },
                expression.get_span().start.clone(),
            ));
        }

        self.content = SlotContent::Expression(expression);
        Ok(self.apply_constraint())
    }

    fn apply_constraint(&mut self) -> Option<ExprWrapper> {
        let constraint = self.get_expression().and_then(as_type)?.clone();
        self.constraint_slot.as_mut()?.constrain(constraint)
    }

    /// Takes the expression out of the slot. Literal values stay in place.
    /// A constrained slot keeps its current type.
    pub fn remove_expression(&mut self) -> Option<ExprWrapper> {
        if !matches!(self.content, SlotContent::Expression(_)) {
            return None;
        }

        match std::mem::replace(&mut self.content, SlotContent::Empty) {
            SlotContent::Expression(expression) => Some(expression),
            _ => None,
        }
    }

    /// Swaps the held expression for a new one and returns the old one.
    ///
    /// The slot is left untouched when the new expression does not fit.
    pub fn replace_expression(
        &mut self,
        expression: ExprWrapper,
    ) -> Result<Option<ExprWrapper>, Error> {
        if !self.is_literal_slot() && !self.is_compatible_with(&expression) {
            return Err(Error::new(
                ErrorImpl::TypeMatchError {
                    expected: self.slot_type.get_name(),
                    received: expression.get_type().get_name(),
                },
                expression.get_span().start.clone(),
            ));
        }

        let previous = self.remove_expression();
        self.add_expression(expression)?;
        Ok(previous)
    }

    /// Re-types the slot. A held expression that no longer fits is evicted
    /// and returned.
    pub fn constrain(&mut self, slot_type: TypeWrapper) -> Option<ExprWrapper> {
        self.slot_type = slot_type;

        let fits = match &self.content {
            SlotContent::Expression(expression) => self.is_compatible_with(expression),
            _ => true,
        };

        if fits {
            None
        } else {
            self.remove_expression()
        }
    }
}

/// A field holding any number of slots of one item type,
/// such as the `*args` of a call.
#[derive(Debug, Clone)]
pub struct VariadicField {
    item_type: TypeWrapper,
    slots: Vec<ExpressionSlot>,
}

impl VariadicField {
    pub fn new(item_type: TypeWrapper) -> Self {
        VariadicField {
            item_type,
            slots: vec![],
        }
    }

    pub fn get_item_type(&self) -> &TypeWrapper {
        &self.item_type
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ExpressionSlot> {
        self.slots.get(index)
    }

    pub fn iter(&self) -> Iter<'_, ExpressionSlot> {
        self.slots.iter()
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, ExpressionSlot> {
        self.slots.iter_mut()
    }

    /// Appends a new slot of the item type holding `expression`.
    pub fn push_expression(&mut self, expression: ExprWrapper) -> Result<(), Error> {
        let mut slot = ExpressionSlot::new(self.item_type.clone());
        slot.add_expression(expression)?;
        self.slots.push(slot);
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Result<ExpressionSlot, Error> {
        if index >= self.slots.len() {
            return Err(Error::detached(ErrorImpl::IndexOutOfRange {
                index,
                len: self.slots.len(),
            }));
        }

        Ok(self.slots.remove(index))
    }
}
