use crate::{
    ast::{
        ast::{Expr, StmtWrapper},
        statements::{ExpressionStmt, VariableDeclaration, VariableDefinition},
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    Span,
};

use super::{
    expr::{ast_not_supported, parse_value_expr},
    parser::Parser,
    types::parse_type_expr,
};

/// What a logical line turns out to be, judged by its top-level tokens.
enum LineKind {
    Expression,
    Annotated,
    Assignment(&'static str),
}

pub fn parse_stmt(parser: &mut Parser) -> Result<StmtWrapper, Error> {
    let token_kind = parser.current_token_kind();

    let stmt = if let Some(stmt_fn) = parser.get_stmt_lookup().get(&token_kind).copied() {
        stmt_fn(parser)?
    } else {
        match classify_line(parser) {
            LineKind::Annotated => parse_annotated_stmt(parser)?,
            LineKind::Assignment(node) => return Err(ast_not_supported(node, parser.get_position())),
            LineKind::Expression => parse_expression_stmt(parser)?,
        }
    };

    expect_line_end(parser)?;

    Ok(stmt)
}

/// Looks ahead over the current logical line, outside of brackets.
fn classify_line(parser: &Parser) -> LineKind {
    let mut depth = 0usize;
    let mut in_lambda = false;

    for token in parser.remaining_tokens() {
        match token.kind {
            TokenKind::OpenParen | TokenKind::OpenBracket | TokenKind::OpenCurly => depth += 1,
            TokenKind::CloseParen | TokenKind::CloseBracket | TokenKind::CloseCurly => {
                depth = depth.saturating_sub(1)
            }
            _ if depth > 0 => {}
            TokenKind::Newline | TokenKind::Semicolon | TokenKind::EOF => break,
            TokenKind::Lambda => in_lambda = true,
            TokenKind::Assignment if !in_lambda => return LineKind::Assignment("Assign"),
            TokenKind::AugAssign => return LineKind::Assignment("AugAssign"),
            TokenKind::Colon if !in_lambda => return LineKind::Annotated,
            _ => {}
        }
    }

    LineKind::Expression
}

/// A statement ends at a newline, a semicolon or the end of the file.
fn expect_line_end(parser: &mut Parser) -> Result<(), Error> {
    match parser.current_token_kind() {
        TokenKind::Semicolon => {
            parser.advance();
            if parser.current_token_kind() == TokenKind::Newline {
                parser.advance();
            }
            Ok(())
        }
        TokenKind::Newline => {
            parser.advance();
            Ok(())
        }
        TokenKind::EOF => Ok(()),
        _ => Err(parser.unexpected_token()),
    }
}

pub fn parse_expression_stmt(parser: &mut Parser) -> Result<StmtWrapper, Error> {
    let value = parse_value_expr(parser)?;
    let span = value.get_span().clone();
    let start = span.start.clone();

    let stmt = ExpressionStmt::new(value, span).map_err(|error| error.at(start))?;

    Ok(StmtWrapper::new(stmt))
}

/// `name: type` declares a variable, `name: type = value` defines it.
pub fn parse_annotated_stmt(parser: &mut Parser) -> Result<StmtWrapper, Error> {
    if parser.current_token_kind() != TokenKind::Identifier
        || parser.peek_kind(1) != TokenKind::Colon
    {
        return Err(Error::new(
            ErrorImpl::TempNotSupported {
                feature: String::from("annotated assignment to a non-name target"),
            },
            parser.get_position(),
        ));
    }

    let target = parser.expect(TokenKind::Identifier)?;
    parser.expect(TokenKind::Colon)?;
    let annotation = parse_type_expr(parser)?;

    if parser.current_token_kind() != TokenKind::Assignment {
        let span = Span {
            start: target.span.start.clone(),
            end: annotation.span.end.clone(),
        };
        let mut declaration = VariableDeclaration::new(&target.value, span);
        declaration.set_type(annotation)?;

        return Ok(StmtWrapper::new(declaration));
    }

    parser.expect(TokenKind::Assignment)?;
    let value = parse_value_expr(parser)?;
    let value_start = value.get_span().start.clone();

    let span = Span {
        start: target.span.start.clone(),
        end: value.get_span().end.clone(),
    };
    let mut definition = VariableDefinition::new(&target.value, span);
    definition.set_type(annotation)?;
    definition
        .set_value(value)
        .map_err(|error| error.at(value_start))?;

    Ok(StmtWrapper::new(definition))
}

/// Statements that start with a keyword are all compound or simple
/// statements the common AST has no node for.
pub fn parse_unsupported_stmt(parser: &mut Parser) -> Result<StmtWrapper, Error> {
    let node = match parser.current_token_kind() {
        TokenKind::Def => "FunctionDef",
        TokenKind::Class => "ClassDef",
        TokenKind::At => decorated_node(parser),
        TokenKind::Async => match parser.peek_kind(1) {
            TokenKind::For => "AsyncFor",
            TokenKind::With => "AsyncWith",
            _ => "AsyncFunctionDef",
        },
        TokenKind::Return => "Return",
        TokenKind::Del => "Delete",
        TokenKind::For => "For",
        TokenKind::While => "While",
        TokenKind::If | TokenKind::Elif | TokenKind::Else => "If",
        TokenKind::With => "With",
        TokenKind::Try | TokenKind::Except | TokenKind::Finally => "Try",
        TokenKind::Raise => "Raise",
        TokenKind::Assert => "Assert",
        TokenKind::Import => "Import",
        TokenKind::From => "ImportFrom",
        TokenKind::Global => "Global",
        TokenKind::Nonlocal => "Nonlocal",
        TokenKind::Pass => "Pass",
        TokenKind::Break => "Break",
        TokenKind::Continue => "Continue",
        _ => return Err(parser.unexpected_token()),
    };

    Err(ast_not_supported(node, parser.get_position()))
}

/// The node a decorator list belongs to.
fn decorated_node(parser: &Parser) -> &'static str {
    parser
        .remaining_tokens()
        .iter()
        .find_map(|token| match token.kind {
            TokenKind::Def => Some("FunctionDef"),
            TokenKind::Class => Some("ClassDef"),
            _ => None,
        })
        .unwrap_or("FunctionDef")
}
