//! JSON dump of AST nodes.
//!
//! Every node renders as `{"node": <kind>, "fields": {...}}`. Literal slots
//! render as JSON scalars, empty slots as `null`, variadic fields as arrays
//! and types as their names.

use serde_json::{json, Map, Value};

use super::{
    ast::{Expr, ExprType, FieldRef, NodeRef, Stmt},
    expressions::TypeExpr,
    slot::{ExpressionSlot, LiteralValue, SlotContent},
    statements::CodeBlock,
};

pub fn dump(node: NodeRef<'_>) -> Value {
    match node {
        NodeRef::Stmt(stmt) => dump_statement(stmt),
        NodeRef::Expr(expr) => dump_expression(expr),
    }
}

fn dump_statement(stmt: &dyn Stmt) -> Value {
    let mut fields = dump_fields(stmt.get_fields());

    if let Some(block) = stmt.as_any().downcast_ref::<CodeBlock>() {
        let body = block
            .iter()
            .map(|child| dump_statement(child))
            .collect::<Vec<Value>>();
        fields.insert("body".to_string(), Value::Array(body));
    }

    json!({
        "node": format!("{:?}", stmt.get_stmt_type()),
        "fields": fields,
    })
}

fn dump_expression(expr: &dyn Expr) -> Value {
    let mut fields = dump_fields(expr.get_fields());

    if let Some(type_expr) = expr.as_any().downcast_ref::<TypeExpr>() {
        fields.insert("type".to_string(), json!(type_expr.type_.to_string()));
    }

    let node = match expr.get_expr_type() {
        ExprType::Builtin => expr.get_name(),
        expr_type => format!("{:?}", expr_type),
    };

    json!({
        "node": node,
        "fields": fields,
    })
}

fn dump_fields(fields: Vec<(&'static str, FieldRef<'_>)>) -> Map<String, Value> {
    let mut map = Map::new();
    for (name, field) in fields {
        let value = match field {
            FieldRef::Slot(slot) => dump_slot(slot),
            FieldRef::Variadic(variadic) => {
                Value::Array(variadic.iter().map(dump_slot).collect())
            }
        };
        map.insert(name.to_string(), value);
    }
    map
}

fn dump_slot(slot: &ExpressionSlot) -> Value {
    match slot.get_content() {
        SlotContent::Empty => Value::Null,
        SlotContent::Literal(literal) => dump_literal(literal),
        SlotContent::Expression(expression) => dump_expression(expression),
    }
}

fn dump_literal(literal: &LiteralValue) -> Value {
    match literal {
        LiteralValue::Bool(value) => json!(value),
        LiteralValue::None => Value::Null,
        LiteralValue::Int(value) => json!(value),
        LiteralValue::Float(value) => json!(value),
        LiteralValue::Str(value) => json!(value),
    }
}
