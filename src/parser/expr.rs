use crate::{
    ast::{
        ast::{Expr, ExprWrapper},
        expressions::{
            BoolLiteral, Call, FloatLiteral, IntLiteral, NoneLiteral, StrLiteral, VariableLoader,
        },
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    Position, Span,
};

use super::{lookups::BindingPower, parser::Parser};

pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<ExprWrapper, Error> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let Some(nud_fn) = parser.get_nud_lookup().get(&token_kind).copied() else {
        return Err(parser.unexpected_token());
    };

    let mut left = nud_fn(parser)?;

    // While LED and current BP is less than BP of current token, continue parsing lhs
    while let Some(&next_bp) = parser.get_bp_lookup().get(&parser.current_token_kind()) {
        if next_bp <= bp {
            break;
        }

        let token_kind = parser.current_token_kind();
        let Some(led_fn) = parser.get_led_lookup().get(&token_kind).copied() else {
            return Err(parser.unexpected_token());
        };

        left = led_fn(parser, left, next_bp)?;
    }

    Ok(left)
}

/// An expression in value position, where a bare tuple is not allowed.
pub fn parse_value_expr(parser: &mut Parser) -> Result<ExprWrapper, Error> {
    let value = parse_expr(parser, BindingPower::Default)?;

    if parser.current_token_kind() == TokenKind::Comma {
        return Err(ast_not_supported("Tuple", value.get_span().start.clone()));
    }

    Ok(value)
}

pub fn parse_constant_expr(parser: &mut Parser) -> Result<ExprWrapper, Error> {
    match parser.current_token_kind() {
        TokenKind::True | TokenKind::False => {
            let token = parser.advance();
            Ok(ExprWrapper::new(BoolLiteral::new(
                token.kind == TokenKind::True,
                token.span.clone(),
            )))
        }
        TokenKind::None => Ok(ExprWrapper::new(NoneLiteral::new(
            parser.advance().span.clone(),
        ))),
        TokenKind::Number => parse_number(parser),
        TokenKind::String | TokenKind::Bytes | TokenKind::FString => parse_string(parser),
        TokenKind::Ellipsis => Err(Error::new(
            ErrorImpl::ConstantNotSupported {
                constant: String::from("ellipsis"),
            },
            parser.get_position(),
        )),
        _ => Err(parser.unexpected_token()),
    }
}

fn parse_number(parser: &mut Parser) -> Result<ExprWrapper, Error> {
    let token = parser.advance().clone();
    let text = token.value.replace('_', "").to_ascii_lowercase();
    let number_error = || {
        Error::new(
            ErrorImpl::NumberParseError {
                token: token.value.clone(),
            },
            token.span.start.clone(),
        )
    };

    if text.ends_with('j') {
        return Err(Error::new(
            ErrorImpl::ConstantNotSupported {
                constant: String::from("complex"),
            },
            token.span.start.clone(),
        ));
    }

    let radix = match text.get(..2) {
        Some("0x") => Some(16),
        Some("0o") => Some(8),
        Some("0b") => Some(2),
        _ => None,
    };

    if let Some(radix) = radix {
        let value = i64::from_str_radix(&text[2..], radix).map_err(|_| number_error())?;
        return Ok(ExprWrapper::new(IntLiteral::new(value, token.span.clone())));
    }

    if text.contains(|ch: char| ch == '.' || ch == 'e') {
        let value = text
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .ok_or_else(number_error)?;
        return Ok(ExprWrapper::new(FloatLiteral::new(value, token.span.clone())));
    }

    // Decimal integers only take leading zeros when every digit is zero
    if text.starts_with('0') && text.chars().any(|ch| ch != '0') {
        return Err(number_error());
    }

    let value = text.parse::<i64>().map_err(|_| number_error())?;
    Ok(ExprWrapper::new(IntLiteral::new(value, token.span.clone())))
}

/// Adjacent string literals are concatenated into one constant.
fn parse_string(parser: &mut Parser) -> Result<ExprWrapper, Error> {
    let start = parser.get_position();
    let mut end = start.clone();
    let mut value = String::new();
    let mut has_bytes = false;
    let mut has_text = false;
    let mut has_format = false;

    while matches!(
        parser.current_token_kind(),
        TokenKind::String | TokenKind::Bytes | TokenKind::FString
    ) {
        let token = parser.advance();
        match token.kind {
            TokenKind::Bytes => has_bytes = true,
            TokenKind::FString => {
                has_format = true;
                has_text = true;
            }
            _ => has_text = true,
        }
        value.push_str(&token.value);
        end = token.span.end.clone();
    }

    if has_bytes && has_text {
        return Err(Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: value,
                message: String::from("cannot mix bytes and nonbytes literals"),
            },
            start,
        ));
    }

    if has_bytes {
        return Err(Error::new(
            ErrorImpl::ConstantNotSupported {
                constant: String::from("bytes"),
            },
            start,
        ));
    }

    if has_format {
        return Err(ast_not_supported("JoinedStr", start));
    }

    Ok(ExprWrapper::new(StrLiteral::new(&value, Span { start, end })))
}

/// A name is either a registered builtin or a variable load.
pub fn parse_name_expr(parser: &mut Parser) -> Result<ExprWrapper, Error> {
    let token = parser.expect(TokenKind::Identifier)?;

    if parser.get_builtins().is_builtin_expression(&token.value) {
        return parser
            .get_builtins()
            .create_builtin_expression(&token.value, token.span);
    }

    Ok(ExprWrapper::new(VariableLoader::new(&token.value, token.span)))
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<ExprWrapper, Error> {
    let open = parser.expect(TokenKind::OpenParen)?;

    if parser.current_token_kind() == TokenKind::CloseParen {
        return Err(ast_not_supported("Tuple", open.span.start));
    }

    let expr = parse_expr(parser, BindingPower::Default)?;

    match parser.current_token_kind() {
        TokenKind::Comma => return Err(ast_not_supported("Tuple", open.span.start)),
        TokenKind::For => return Err(ast_not_supported("GeneratorExp", open.span.start)),
        _ => {}
    }

    parser.expect(TokenKind::CloseParen)?;

    Ok(expr)
}

/// Binds the arguments of `left(...)`.
///
/// A builtin callable that was not invoked yet receives the arguments itself,
/// anything else is wrapped in a `Call`.
pub fn parse_call_expr(
    parser: &mut Parser,
    left: ExprWrapper,
    _bp: BindingPower,
) -> Result<ExprWrapper, Error> {
    parser.expect(TokenKind::OpenParen)?;

    let mut arguments: Vec<(Option<String>, ExprWrapper)> = vec![];

    while parser.current_token_kind() != TokenKind::CloseParen {
        match parser.current_token_kind() {
            TokenKind::Star => {
                return Err(ast_not_supported("Starred", parser.get_position()));
            }
            TokenKind::DoubleStar => {
                return Err(Error::new(
                    ErrorImpl::TempNotSupported {
                        feature: String::from("keyword argument unpacking"),
                    },
                    parser.get_position(),
                ));
            }
            TokenKind::Identifier if parser.peek_kind(1) == TokenKind::Assignment => {
                let keyword = parser.advance().value.clone();
                parser.advance();
                let value = parse_expr(parser, BindingPower::Default)?;
                arguments.push((Some(keyword), value));
            }
            _ => {
                let value = parse_expr(parser, BindingPower::Default)?;
                if parser.current_token_kind() == TokenKind::For {
                    return Err(ast_not_supported(
                        "GeneratorExp",
                        value.get_span().start.clone(),
                    ));
                }
                arguments.push((None, value));
            }
        }

        if parser.current_token_kind() != TokenKind::Comma {
            break;
        }
        parser.advance();
    }

    let close = parser.expect(TokenKind::CloseParen)?;

    let reuse_callable = left
        .as_callable()
        .map(|callable| !callable.is_invoked())
        .unwrap_or(false);

    let mut callee = if reuse_callable {
        left
    } else {
        let start = left.get_span().start.clone();
        let span = Span {
            start: start.clone(),
            end: close.span.end.clone(),
        };
        ExprWrapper::new(Call::with_func(left, span).map_err(|error| error.at(start))?)
    };

    let Some(callable) = callee.as_callable_mut() else {
        return Err(ast_not_supported("Call", close.span.start));
    };

    for (keyword, value) in arguments {
        let position = value.get_span().start.clone();
        let bound = match keyword {
            Some(keyword) => callable.add_keyword_argument(&keyword, value),
            None => callable.add_argument(value),
        };
        bound.map_err(|error| error.at(position))?;
    }
    callable.mark_invoked();

    Ok(callee)
}

pub fn parse_unsupported_nud(parser: &mut Parser) -> Result<ExprWrapper, Error> {
    let node = match parser.current_token_kind() {
        TokenKind::OpenBracket => "List",
        TokenKind::OpenCurly => curly_node(parser),
        TokenKind::Dash | TokenKind::Plus | TokenKind::Tilde | TokenKind::Not => "UnaryOp",
        TokenKind::Star => "Starred",
        TokenKind::Lambda => "Lambda",
        TokenKind::Await => "Await",
        TokenKind::Yield => "Yield",
        _ => return Err(parser.unexpected_token()),
    };

    Err(ast_not_supported(node, parser.get_position()))
}

pub fn parse_unsupported_led(
    parser: &mut Parser,
    left: ExprWrapper,
    _bp: BindingPower,
) -> Result<ExprWrapper, Error> {
    let node = match parser.current_token_kind() {
        TokenKind::Dot => "Attribute",
        TokenKind::OpenBracket => "Subscript",
        TokenKind::If => "IfExp",
        TokenKind::Walrus => "NamedExpr",
        TokenKind::And | TokenKind::Or => "BoolOp",
        TokenKind::Less
        | TokenKind::LessEquals
        | TokenKind::Greater
        | TokenKind::GreaterEquals
        | TokenKind::Equals
        | TokenKind::NotEquals
        | TokenKind::In
        | TokenKind::Is
        | TokenKind::Not => "Compare",
        TokenKind::Plus
        | TokenKind::Dash
        | TokenKind::Star
        | TokenKind::DoubleStar
        | TokenKind::Slash
        | TokenKind::DoubleSlash
        | TokenKind::Percent
        | TokenKind::At
        | TokenKind::Pipe
        | TokenKind::Ampersand
        | TokenKind::Caret
        | TokenKind::LeftShift
        | TokenKind::RightShift => "BinOp",
        _ => return Err(parser.unexpected_token()),
    };

    Err(ast_not_supported(node, left.get_span().start.clone()))
}

/// `{}` and `{k: v}` are dicts, `{a, b}` is a set.
fn curly_node(parser: &Parser) -> &'static str {
    let mut depth = 0usize;

    for token in parser.remaining_tokens() {
        match token.kind {
            TokenKind::OpenCurly | TokenKind::OpenParen | TokenKind::OpenBracket => depth += 1,
            TokenKind::CloseCurly | TokenKind::CloseParen | TokenKind::CloseBracket => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    break;
                }
            }
            TokenKind::Colon | TokenKind::DoubleStar if depth == 1 => return "Dict",
            TokenKind::Comma if depth == 1 => return "Set",
            _ => {}
        }
    }

    match parser.peek_kind(1) {
        TokenKind::CloseCurly => "Dict",
        _ => "Set",
    }
}

pub(crate) fn ast_not_supported(node: &str, position: Position) -> Error {
    Error::new(
        ErrorImpl::AstNotSupported {
            node: node.to_string(),
        },
        position,
    )
}
