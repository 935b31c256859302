//! Type parsing implementation.
//!
//! This module handles parsing of type annotations. It supports:
//!
//! - Builtin type names (`object`, `bool`, `int`, `float`, `str`, `list`)
//! - `None` as the type of `None`
//! - Parametrised lists (`list[int]`)
//!
//! Similar to expression parsing, it uses NUD/LED handlers with
//! binding powers for parsing complex type expressions.

use std::collections::HashMap;

use crate::{
    ast::{
        ast::{Expr, Type, TypeType, TypeWrapper},
        expressions::{as_type, TypeExpr},
        types::{BasicType, ListType},
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    Span,
};

use super::{lookups::BindingPower, parser::Parser};

/// Type alias for type null denotation handler functions.
pub type TypeNUDHandler = fn(&mut Parser) -> Result<TypeWrapper, Error>;

/// Type alias for type left denotation handler functions.
pub type TypeLEDHandler = fn(&mut Parser, TypeWrapper, BindingPower) -> Result<TypeWrapper, Error>;

/// Type alias for type NUD lookup table.
pub type TypeNUDLookup = HashMap<TokenKind, TypeNUDHandler>;

/// Type alias for type LED lookup table.
pub type TypeLEDLookup = HashMap<TokenKind, TypeLEDHandler>;

/// Type alias for type binding power lookup table.
pub type TypeBPLookup = HashMap<TokenKind, BindingPower>;

/// Initializes the type parsing lookup tables.
pub fn create_token_type_lookups(parser: &mut Parser) {
    parser.type_nud(TokenKind::Identifier, parse_symbol_type);
    parser.type_nud(TokenKind::None, parse_none_type);
    parser.type_led(TokenKind::OpenBracket, BindingPower::Call, parse_subscript_type);
    parser.type_led(TokenKind::Pipe, BindingPower::Bitwise, parse_union_type);
}

/// A builtin name used as a type.
pub fn parse_symbol_type(parser: &mut Parser) -> Result<TypeWrapper, Error> {
    let token = parser.expect(TokenKind::Identifier)?;

    if !parser.get_builtins().is_builtin_expression(&token.value) {
        return Err(Error::new(
            ErrorImpl::UnknownType {
                type_: token.value.clone(),
            },
            token.span.start.clone(),
        ));
    }

    let expression = parser
        .get_builtins()
        .create_builtin_expression(&token.value, token.span.clone())?;

    match as_type(&expression) {
        Some(type_) => Ok(type_.clone()),
        None => Err(Error::new(
            ErrorImpl::TypeMatchError {
                expected: BasicType::wrap(TypeType::Type).get_name(),
                received: expression.get_type().get_name(),
            },
            token.span.start.clone(),
        )),
    }
}

pub fn parse_none_type(parser: &mut Parser) -> Result<TypeWrapper, Error> {
    parser.expect(TokenKind::None)?;
    Ok(BasicType::wrap(TypeType::NoneType))
}

/// `list[T]`, the only generic type.
pub fn parse_subscript_type(
    parser: &mut Parser,
    left: TypeWrapper,
    _bp: BindingPower,
) -> Result<TypeWrapper, Error> {
    let open = parser.expect(TokenKind::OpenBracket)?;

    if left.get_type_type() != TypeType::List {
        return Err(Error::new(
            ErrorImpl::TempNotSupported {
                feature: format!("subscripting type `{}`", left.get_name()),
            },
            open.span.start,
        ));
    }

    let item_type = parse_type(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseBracket)?;

    Ok(TypeWrapper::new(ListType { item_type }))
}

pub fn parse_union_type(
    parser: &mut Parser,
    _left: TypeWrapper,
    _bp: BindingPower,
) -> Result<TypeWrapper, Error> {
    let operator = parser.expect(TokenKind::Pipe)?;
    Err(Error::new(
        ErrorImpl::TempNotSupported {
            feature: String::from("union types"),
        },
        operator.span.start,
    ))
}

pub fn parse_type(parser: &mut Parser, bp: BindingPower) -> Result<TypeWrapper, Error> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let Some(nud_fn) = parser.get_type_nud_lookup().get(&token_kind).copied() else {
        return Err(parser.unexpected_token());
    };

    let mut left = nud_fn(parser)?;

    // While LED and current BP is less than BP of current token, continue parsing lhs
    while let Some(&next_bp) = parser.get_type_bp_lookup().get(&parser.current_token_kind()) {
        if next_bp <= bp {
            break;
        }

        let token_kind = parser.current_token_kind();
        let Some(led_fn) = parser.get_type_led_lookup().get(&token_kind).copied() else {
            return Err(parser.unexpected_token());
        };

        left = led_fn(parser, left, next_bp)?;
    }

    Ok(left)
}

/// Parses an annotation into a `TypeExpr` spanning its tokens.
pub fn parse_type_expr(parser: &mut Parser) -> Result<TypeExpr, Error> {
    let start = parser.get_position();
    let type_ = parse_type(parser, BindingPower::Default)?;

    Ok(TypeExpr::new(
        type_,
        Span {
            start,
            end: parser.get_previous_end(),
        },
    ))
}
