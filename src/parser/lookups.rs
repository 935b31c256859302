use std::collections::HashMap;

use crate::{
    ast::ast::{ExprWrapper, StmtWrapper},
    errors::errors::Error,
    lexer::tokens::TokenKind,
};

use super::{expr::*, parser::Parser, stmt::*};

#[derive(PartialEq, PartialOrd, Clone, Copy, Debug)]
pub enum BindingPower {
    Default,
    Comma,
    Assignment,
    Ternary,
    Logical,
    Relational,
    Bitwise,
    Additive,
    Multiplicative,
    Unary,
    Power,
    Call,
    Member,
    Primary,
}

pub type StmtHandler = fn(&mut Parser) -> Result<StmtWrapper, Error>;
pub type NUDHandler = fn(&mut Parser) -> Result<ExprWrapper, Error>;
pub type LEDHandler = fn(&mut Parser, ExprWrapper, BindingPower) -> Result<ExprWrapper, Error>;

pub fn create_token_lookups(parser: &mut Parser) {
    parser.led(TokenKind::Walrus, BindingPower::Assignment, parse_unsupported_led);
    parser.led(TokenKind::If, BindingPower::Ternary, parse_unsupported_led);

    // Logical
    parser.led(TokenKind::And, BindingPower::Logical, parse_unsupported_led);
    parser.led(TokenKind::Or, BindingPower::Logical, parse_unsupported_led);

    // Relational
    parser.led(TokenKind::Less, BindingPower::Relational, parse_unsupported_led);
    parser.led(TokenKind::LessEquals, BindingPower::Relational, parse_unsupported_led);
    parser.led(TokenKind::Greater, BindingPower::Relational, parse_unsupported_led);
    parser.led(TokenKind::GreaterEquals, BindingPower::Relational, parse_unsupported_led);
    parser.led(TokenKind::Equals, BindingPower::Relational, parse_unsupported_led);
    parser.led(TokenKind::NotEquals, BindingPower::Relational, parse_unsupported_led);
    parser.led(TokenKind::In, BindingPower::Relational, parse_unsupported_led);
    parser.led(TokenKind::Is, BindingPower::Relational, parse_unsupported_led);
    parser.led(TokenKind::Not, BindingPower::Relational, parse_unsupported_led);

    // Bitwise
    parser.led(TokenKind::Pipe, BindingPower::Bitwise, parse_unsupported_led);
    parser.led(TokenKind::Ampersand, BindingPower::Bitwise, parse_unsupported_led);
    parser.led(TokenKind::Caret, BindingPower::Bitwise, parse_unsupported_led);
    parser.led(TokenKind::LeftShift, BindingPower::Bitwise, parse_unsupported_led);
    parser.led(TokenKind::RightShift, BindingPower::Bitwise, parse_unsupported_led);

    // Additive and multiplicative
    parser.led(TokenKind::Plus, BindingPower::Additive, parse_unsupported_led);
    parser.led(TokenKind::Dash, BindingPower::Additive, parse_unsupported_led);
    parser.led(TokenKind::Star, BindingPower::Multiplicative, parse_unsupported_led);
    parser.led(TokenKind::Slash, BindingPower::Multiplicative, parse_unsupported_led);
    parser.led(TokenKind::DoubleSlash, BindingPower::Multiplicative, parse_unsupported_led);
    parser.led(TokenKind::Percent, BindingPower::Multiplicative, parse_unsupported_led);
    parser.led(TokenKind::At, BindingPower::Multiplicative, parse_unsupported_led);
    parser.led(TokenKind::DoubleStar, BindingPower::Power, parse_unsupported_led);

    parser.led(TokenKind::OpenParen, BindingPower::Call, parse_call_expr);

    // Member
    parser.led(TokenKind::Dot, BindingPower::Member, parse_unsupported_led);
    parser.led(TokenKind::OpenBracket, BindingPower::Member, parse_unsupported_led);

    // Literals and symbols
    parser.nud(TokenKind::Number, parse_constant_expr);
    parser.nud(TokenKind::String, parse_constant_expr);
    parser.nud(TokenKind::Bytes, parse_constant_expr);
    parser.nud(TokenKind::FString, parse_constant_expr);
    parser.nud(TokenKind::True, parse_constant_expr);
    parser.nud(TokenKind::False, parse_constant_expr);
    parser.nud(TokenKind::None, parse_constant_expr);
    parser.nud(TokenKind::Ellipsis, parse_constant_expr);
    parser.nud(TokenKind::Identifier, parse_name_expr);
    parser.nud(TokenKind::OpenParen, parse_grouping_expr);

    // Everything else that can start an expression
    parser.nud(TokenKind::OpenBracket, parse_unsupported_nud);
    parser.nud(TokenKind::OpenCurly, parse_unsupported_nud);
    parser.nud(TokenKind::Dash, parse_unsupported_nud);
    parser.nud(TokenKind::Plus, parse_unsupported_nud);
    parser.nud(TokenKind::Tilde, parse_unsupported_nud);
    parser.nud(TokenKind::Not, parse_unsupported_nud);
    parser.nud(TokenKind::Star, parse_unsupported_nud);
    parser.nud(TokenKind::Lambda, parse_unsupported_nud);
    parser.nud(TokenKind::Await, parse_unsupported_nud);
    parser.nud(TokenKind::Yield, parse_unsupported_nud);

    // Statements
    for kind in [
        TokenKind::Def,
        TokenKind::Class,
        TokenKind::At,
        TokenKind::Async,
        TokenKind::Return,
        TokenKind::Del,
        TokenKind::For,
        TokenKind::While,
        TokenKind::If,
        TokenKind::Elif,
        TokenKind::Else,
        TokenKind::With,
        TokenKind::Try,
        TokenKind::Except,
        TokenKind::Finally,
        TokenKind::Raise,
        TokenKind::Assert,
        TokenKind::Import,
        TokenKind::From,
        TokenKind::Global,
        TokenKind::Nonlocal,
        TokenKind::Pass,
        TokenKind::Break,
        TokenKind::Continue,
    ] {
        parser.stmt(kind, parse_unsupported_stmt);
    }
}

// Lookup tables inside parser struct, so it's easier
pub type StmtLookup = HashMap<TokenKind, StmtHandler>;
pub type NUDLookup = HashMap<TokenKind, NUDHandler>;
pub type LEDLookup = HashMap<TokenKind, LEDHandler>;
pub type BPLookup = HashMap<TokenKind, BindingPower>;
