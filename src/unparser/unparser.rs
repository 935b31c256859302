use tracing::trace;

use crate::{
    ast::{
        ast::{Expr, ExprType, ExprWrapper, NodeRef, Stmt, StmtType, Type, TypeType},
        expressions::{
            BoolLiteral, Call, FloatLiteral, IntLiteral, Keyword, StrLiteral, TypeExpr,
            VariableLoader,
        },
        slot::ExpressionSlot,
        statements::{CodeBlock, ExpressionStmt, VariableDeclaration, VariableDefinition},
        types::ListType,
    },
    errors::errors::{Error, ErrorImpl},
    Span,
};

pub const INDENTATION_STR: &str = "    ";

/// Unparses any node back to Python source.
///
/// Statements are indented by `indent` levels. With `need_format`, the result
/// is normalised by [`format_source`].
pub fn unparse(node: NodeRef<'_>, indent: usize, need_format: bool) -> Result<String, Error> {
    let code = match node {
        NodeRef::Stmt(stmt) => unparse_statement(stmt, indent, false)?,
        NodeRef::Expr(expression) => unparse_expression(expression)?,
    };
    trace!("Unparsed {} into {} bytes", node.get_name(), code.len());

    if need_format {
        Ok(format_source(&code))
    } else {
        Ok(code)
    }
}

pub fn unparse_statement(
    stmt: &dyn Stmt,
    indent: usize,
    need_format: bool,
) -> Result<String, Error> {
    let prefix = INDENTATION_STR.repeat(indent);

    let code = match stmt.get_stmt_type() {
        StmtType::CodeBlock => {
            let block = downcast_stmt::<CodeBlock>(stmt)?;
            return unparse_code_block(block, indent, need_format);
        }
        StmtType::ExpressionStmt => {
            let expression_stmt = downcast_stmt::<ExpressionStmt>(stmt)?;
            let value = required(
                &expression_stmt.value,
                "ExpressionStmt",
                "value",
                stmt.get_span(),
            )?;
            format!("{}{}", prefix, unparse_expression(value)?)
        }
        StmtType::VariableDeclaration => {
            let declaration = downcast_stmt::<VariableDeclaration>(stmt)?;
            let type_ = required(
                &declaration.type_,
                "VariableDeclaration",
                "type",
                stmt.get_span(),
            )?;
            format!(
                "{}{}: {}",
                prefix,
                declaration.get_id(),
                unparse_expression(type_)?
            )
        }
        StmtType::VariableDefinition => {
            let definition = downcast_stmt::<VariableDefinition>(stmt)?;
            let type_ = required(
                definition.get_type_slot(),
                "VariableDefinition",
                "type",
                stmt.get_span(),
            )?;
            let value = required(
                definition.get_value_slot(),
                "VariableDefinition",
                "value",
                stmt.get_span(),
            )?;
            format!(
                "{}{}: {} = {}",
                prefix,
                definition.get_id(),
                unparse_expression(type_)?,
                unparse_expression(value)?
            )
        }
    };

    if need_format {
        Ok(format_source(&code))
    } else {
        Ok(code)
    }
}

/// Children joined by newlines, without a trailing one.
pub fn unparse_code_block(
    block: &CodeBlock,
    indent: usize,
    need_format: bool,
) -> Result<String, Error> {
    let codes = block
        .iter()
        .map(|child| unparse_statement(child, indent, false))
        .collect::<Result<Vec<String>, Error>>()?;
    let code = codes.join("\n");

    if need_format {
        Ok(format_source(&code))
    } else {
        Ok(code)
    }
}

pub fn unparse_expression(expression: &dyn Expr) -> Result<String, Error> {
    match expression.get_expr_type() {
        ExprType::Builtin => match expression.as_builtin() {
            Some(builtin) => builtin.unparse(),
            None => Err(not_unparsable(&expression.get_name(), expression.get_span())),
        },
        ExprType::BoolLiteral => {
            let literal = downcast_expr::<BoolLiteral>(expression)?;
            Ok(if literal.get_value() { "True" } else { "False" }.to_string())
        }
        ExprType::NoneLiteral => Ok(String::from("None")),
        ExprType::IntLiteral => Ok(downcast_expr::<IntLiteral>(expression)?
            .get_value()
            .to_string()),
        ExprType::FloatLiteral => {
            let literal = downcast_expr::<FloatLiteral>(expression)?;
            unparse_float(literal.get_value())
                .ok_or_else(|| not_unparsable("FloatLiteral", expression.get_span()))
        }
        ExprType::StrLiteral => Ok(quote_str(
            downcast_expr::<StrLiteral>(expression)?.get_value(),
        )),
        ExprType::VariableLoader => Ok(downcast_expr::<VariableLoader>(expression)?
            .get_id()
            .to_string()),
        ExprType::Keyword => {
            let keyword = downcast_expr::<Keyword>(expression)?;
            let value = required(&keyword.value, "Keyword", "value", expression.get_span())?;
            Ok(format!("{}={}", keyword.get_arg(), unparse_expression(value)?))
        }
        ExprType::Call => {
            let call = downcast_expr::<Call>(expression)?;
            let func = required(&call.func, "Call", "func", expression.get_span())?;

            let mut arguments = vec![];
            for slot in call.args.iter().chain(call.keywords.iter()) {
                if let Some(argument) = slot.get_expression() {
                    arguments.push(unparse_expression(argument)?);
                }
            }

            Ok(format!(
                "{}({})",
                unparse_expression(func)?,
                arguments.join(", ")
            ))
        }
        ExprType::Type => {
            let type_expr = downcast_expr::<TypeExpr>(expression)?;
            unparse_type(&type_expr.type_)
                .ok_or_else(|| not_unparsable(&type_expr.type_.get_name(), expression.get_span()))
        }
    }
}

/// The annotation form of a type. Literal types read as their base class.
///
/// Callables and argument markers have no annotation form.
pub fn unparse_type(type_: &dyn Type) -> Option<String> {
    let name = match type_.get_type_type() {
        TypeType::Type => "type",
        TypeType::Object => "object",
        TypeType::Bool | TypeType::LiteralBool => "bool",
        TypeType::NoneType | TypeType::LiteralNoneType => "None",
        TypeType::Int | TypeType::LiteralInt => "int",
        TypeType::Float | TypeType::LiteralFloat => "float",
        TypeType::Str | TypeType::LiteralStr => "str",
        TypeType::List => {
            return match type_.as_any().downcast_ref::<ListType>() {
                Some(list) => Some(format!("list[{}]", unparse_type(&list.item_type)?)),
                None => Some(String::from("list")),
            };
        }
        TypeType::Callable
        | TypeType::Function
        | TypeType::VariadicArg
        | TypeType::VariadicKeywordArg
        | TypeType::KeywordOnlyArg
        | TypeType::Keyword => return None,
    };

    Some(name.to_string())
}

/// Python `repr` of a float: shortest round-trip digits, scientific notation
/// for exponents below -4 or from 16 on.
pub fn unparse_float(value: f64) -> Option<String> {
    if !value.is_finite() {
        return None;
    }

    let scientific = format!("{:e}", value);
    let (mantissa, exponent) = scientific.split_once('e')?;
    let exponent = exponent.parse::<i32>().ok()?;

    if !(-4..16).contains(&exponent) {
        let sign = if exponent < 0 { '-' } else { '+' };
        return Some(format!("{}e{}{:02}", mantissa, sign, exponent.abs()));
    }

    let fixed = value.to_string();
    if fixed.contains('.') {
        Some(fixed)
    } else {
        Some(format!("{}.0", fixed))
    }
}

/// A double-quoted Python string literal.
pub fn quote_str(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');

    for ch in value.chars() {
        match ch {
            '\\' => quoted.push_str("\\\\"),
            '"' => quoted.push_str("\\\""),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            ch if (ch as u32) < 0x20 || ch as u32 == 0x7f => {
                quoted.push_str(&format!("\\x{:02x}", ch as u32))
            }
            ch => quoted.push(ch),
        }
    }

    quoted.push('"');
    quoted
}

/// Canonical layout: no trailing whitespace, no trailing blank lines and
/// exactly one final newline. Empty sources stay empty.
pub fn format_source(code: &str) -> String {
    let lines = code.lines().map(str::trim_end).collect::<Vec<&str>>();
    let last = lines.iter().rposition(|line| !line.is_empty());

    match last {
        Some(last) => {
            let mut formatted = lines[..=last].join("\n");
            formatted.push('\n');
            formatted
        }
        None => String::new(),
    }
}

fn required<'a>(
    slot: impl Into<Option<&'a ExpressionSlot>>,
    node: &str,
    field: &str,
    span: &Span,
) -> Result<&'a ExprWrapper, Error> {
    slot.into().and_then(|slot| slot.get_expression()).ok_or_else(|| {
        Error::new(
            ErrorImpl::EmptySlot {
                node: node.to_string(),
                field: field.to_string(),
            },
            span.start.clone(),
        )
    })
}

fn downcast_stmt<T: Stmt + 'static>(stmt: &dyn Stmt) -> Result<&T, Error> {
    stmt.as_any().downcast_ref::<T>().ok_or_else(|| {
        not_unparsable(&format!("{:?}", stmt.get_stmt_type()), stmt.get_span())
    })
}

fn downcast_expr<T: Expr + 'static>(expression: &dyn Expr) -> Result<&T, Error> {
    expression
        .as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| not_unparsable(&expression.get_name(), expression.get_span()))
}

fn not_unparsable(node: &str, span: &Span) -> Error {
    Error::new(
        ErrorImpl::NotUnparsable {
            node: node.to_string(),
        },
        span.start.clone(),
    )
}
