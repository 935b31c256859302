use crate::{
    ast::{
        ast::{
            check_type_compatibility, post_order, pre_order, CallableExpr, Expr, ExprType,
            ExprWrapper, FieldMut, NodeRef, Stmt, StmtType, StmtWrapper, Type, TypeType,
            TypeWrapper,
        },
        dump::dump,
        expressions::{
            as_type, BoolLiteral, Call, FloatLiteral, IntLiteral, Keyword, NoneLiteral,
            StrLiteral, TypeExpr, VariableLoader,
        },
        slot::{ExpressionSlot, LiteralValue, SlotContent},
        statements::{CodeBlock, ExpressionStmt, VariableDeclaration, VariableDefinition},
        types::{BasicType, CallableType, KeywordOnlyArgType, ListType},
    },
    errors::errors::ErrorImpl,
    parser::parser::parse_python,
    Span,
};

fn basic(type_type: TypeType) -> TypeWrapper {
    BasicType::wrap(type_type)
}

fn callable(arg_types: Vec<TypeWrapper>, return_type: TypeType) -> TypeWrapper {
    TypeWrapper::new(CallableType::new(arg_types, basic(return_type)))
}

fn keyword_only(keyword: &str, optional: bool) -> TypeWrapper {
    TypeWrapper::new(KeywordOnlyArgType::new(
        keyword,
        optional,
        basic(TypeType::Object),
    ))
}

fn int_expr(value: i64) -> ExprWrapper {
    ExprWrapper::new(IntLiteral::new(value, Span::null()))
}

fn expression_stmt(expression: ExprWrapper) -> StmtWrapper {
    StmtWrapper::new(ExpressionStmt::new(expression, Span::null()).unwrap())
}

#[test]
fn test_instance_types() {
    let object = basic(TypeType::Object);
    let none = basic(TypeType::NoneType);

    for type_type in [
        TypeType::Bool,
        TypeType::NoneType,
        TypeType::Int,
        TypeType::Float,
        TypeType::Str,
    ] {
        assert!(basic(type_type).is_compatible_with(&object));
    }

    assert!(!basic(TypeType::Bool).is_compatible_with(&none));
    assert!(!basic(TypeType::Int).is_compatible_with(&basic(TypeType::Float)));
    assert!(!none.is_compatible_with(&basic(TypeType::Float)));
}

#[test]
fn test_class_types() {
    let type_ = basic(TypeType::Type);

    // Every type used as a value is an instance of `type`
    let meta = TypeExpr::wrap(TypeType::Object).get_type();
    assert!(meta.is_compatible_with(&type_));
    assert!(type_.is_compatible_with(&type_));

    for type_type in [
        TypeType::Object,
        TypeType::Bool,
        TypeType::NoneType,
        TypeType::Int,
        TypeType::Float,
        TypeType::Str,
    ] {
        assert!(!basic(type_type).is_compatible_with(&type_));
        assert!(TypeExpr::wrap(type_type).get_type().is_compatible_with(&type_));
    }
}

#[test]
fn test_literal_types() {
    assert!(basic(TypeType::LiteralInt).is_compatible_with(&basic(TypeType::Int)));
    assert!(basic(TypeType::LiteralInt).is_compatible_with(&basic(TypeType::Object)));
    assert!(!basic(TypeType::Int).is_compatible_with(&basic(TypeType::LiteralInt)));
    assert!(!basic(TypeType::LiteralStr).is_compatible_with(&basic(TypeType::LiteralInt)));
    assert!(check_type_compatibility(
        &basic(TypeType::Float),
        &basic(TypeType::LiteralFloat)
    ));
}

#[test]
fn test_list_type() {
    let list = TypeWrapper::new(ListType {
        item_type: basic(TypeType::Str),
    });

    assert_eq!(list.get_name(), "list[str]");
    assert!(list.is_compatible_with(&basic(TypeType::Object)));
    assert!(list.is_compatible_with(&basic(TypeType::List)));
    assert!(!list.is_compatible_with(&basic(TypeType::Type)));
    assert!(!basic(TypeType::Object).is_compatible_with(&list));
}

#[test]
fn test_argument_markers() {
    let object = basic(TypeType::Object);
    assert!(!basic(TypeType::VariadicArg).is_compatible_with(&object));
    assert!(!basic(TypeType::VariadicKeywordArg).is_compatible_with(&object));
    assert!(!keyword_only("a", true).is_compatible_with(&object));
    assert!(basic(TypeType::Keyword).is_compatible_with(&basic(TypeType::Keyword)));
    assert!(!basic(TypeType::Keyword).is_compatible_with(&object));
}

#[test]
fn test_positional_arg() {
    let callable1 = callable(vec![basic(TypeType::Str)], TypeType::NoneType);
    assert!(callable1.is_compatible_with(&callable1));

    let callable2 = callable(vec![basic(TypeType::Object)], TypeType::NoneType);
    assert!(callable1.is_compatible_with(&callable2));
    assert!(!callable2.is_compatible_with(&callable1));

    let callable3 = callable(
        vec![basic(TypeType::Str), basic(TypeType::Int)],
        TypeType::Float,
    );
    assert!(!callable3.is_compatible_with(&callable1));
    assert!(!callable1.is_compatible_with(&callable3));

    let callable4 = callable(
        vec![basic(TypeType::Str), basic(TypeType::Object)],
        TypeType::Float,
    );
    assert!(callable3.is_compatible_with(&callable4));
    assert!(!callable4.is_compatible_with(&callable3));

    let callable5 = callable(vec![basic(TypeType::VariadicArg)], TypeType::NoneType);
    assert!(!callable1.is_compatible_with(&callable5));
    assert!(!callable2.is_compatible_with(&callable5));
    assert!(!callable3.is_compatible_with(&callable5));
    assert!(!callable4.is_compatible_with(&callable5));

    let callable6 = callable(
        vec![basic(TypeType::Bool), basic(TypeType::VariadicArg)],
        TypeType::NoneType,
    );
    assert!(callable6.is_compatible_with(&callable5));
}

#[test]
fn test_void_callable() {
    let provided = callable(vec![], TypeType::Bool);
    let required = callable(vec![], TypeType::NoneType);
    assert!(provided.is_compatible_with(&required));
    assert!(!required.is_compatible_with(&callable(vec![], TypeType::Bool)));
}

#[test]
fn test_keyword_arg() {
    let callable1 = callable(
        vec![basic(TypeType::Int), keyword_only("a", true)],
        TypeType::NoneType,
    );
    let callable2 = callable(
        vec![
            basic(TypeType::Int),
            keyword_only("a", false),
            keyword_only("b", true),
        ],
        TypeType::NoneType,
    );
    let callable3 = callable(
        vec![
            basic(TypeType::VariadicArg),
            keyword_only("a", false),
            keyword_only("b", true),
            keyword_only("c", false),
        ],
        TypeType::NoneType,
    );
    assert!(callable1.is_compatible_with(&callable2));
    assert!(!callable1.is_compatible_with(&callable3));

    let callable4 = callable(
        vec![
            basic(TypeType::VariadicArg),
            keyword_only("a", false),
            basic(TypeType::VariadicKeywordArg),
        ],
        TypeType::NoneType,
    );
    assert!(!callable1.is_compatible_with(&callable4));

    let callable5 = callable(
        vec![
            basic(TypeType::VariadicArg),
            basic(TypeType::VariadicKeywordArg),
        ],
        TypeType::NoneType,
    );
    assert!(callable4.is_compatible_with(&callable5));
    assert!(callable5.is_compatible_with(&callable4));
}

#[test]
fn test_callable_against_plain_types() {
    let function = TypeWrapper::new(CallableType::function(vec![], basic(TypeType::NoneType)));
    assert_eq!(function.get_type_type(), TypeType::Function);
    assert!(function.is_compatible_with(&basic(TypeType::Object)));
    assert!(!function.is_compatible_with(&basic(TypeType::Type)));
    assert!(!function.is_compatible_with(&basic(TypeType::Int)));
    assert_eq!(
        callable(vec![basic(TypeType::Str)], TypeType::NoneType).get_name(),
        "Callable[[str], None]"
    );
}

#[test]
fn test_literal_slot() {
    let mut slot = ExpressionSlot::literal(LiteralValue::Int(3));
    assert!(slot.is_literal_slot());
    assert!(slot.is_occupied());
    assert_eq!(slot.get_literal(), Some(&LiteralValue::Int(3)));

    slot.set_literal_expression(LiteralValue::Int(7)).unwrap();
    assert_eq!(slot.get_literal(), Some(&LiteralValue::Int(7)));

    let error = slot
        .set_literal_expression(LiteralValue::Str("7".to_string()))
        .unwrap_err();
    assert!(matches!(
        error.get_internal_error(),
        ErrorImpl::LiteralValueMismatch { .. }
    ));

    let error = slot.add_expression(int_expr(1)).unwrap_err();
    assert!(matches!(
        error.get_internal_error(),
        ErrorImpl::LiteralSlot { .. }
    ));
}

#[test]
fn test_expression_slot() {
    let mut slot = ExpressionSlot::new(basic(TypeType::Int));
    assert!(!slot.is_occupied());

    let error = slot
        .set_literal_expression(LiteralValue::Int(1))
        .unwrap_err();
    assert!(matches!(
        error.get_internal_error(),
        ErrorImpl::NotLiteralSlot { .. }
    ));

    let text = ExprWrapper::new(StrLiteral::new("a", Span::null()));
    let error = slot.add_expression(text).unwrap_err();
    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::TypeMatchError {
            expected: "int".to_string(),
            received: "Literal[str]".to_string(),
        }
    );

    slot.add_expression(int_expr(1)).unwrap();
    assert!(slot.is_occupied());

    let error = slot.add_expression(int_expr(2)).unwrap_err();
    assert!(matches!(
        error.get_internal_error(),
        ErrorImpl::SlotOccupied { .. }
    ));

    let previous = slot.replace_expression(int_expr(2)).unwrap().unwrap();
    assert_eq!(previous.downcast_ref::<IntLiteral>().unwrap().get_value(), 1);

    // A rejected replacement keeps the old expression in place
    let float = ExprWrapper::new(FloatLiteral::new(1.5, Span::null()));
    assert!(slot.replace_expression(float).is_err());
    let held = slot.get_expression().unwrap();
    assert_eq!(held.downcast_ref::<IntLiteral>().unwrap().get_value(), 2);

    let removed = slot.remove_expression().unwrap();
    assert_eq!(removed.get_expr_type(), ExprType::IntLiteral);
    assert!(!slot.is_occupied());
    assert!(slot.remove_expression().is_none());
}

#[test]
fn test_constrain_slot() {
    let mut slot = ExpressionSlot::new(basic(TypeType::Object));
    slot.add_expression(int_expr(5)).unwrap();

    assert!(slot.constrain(basic(TypeType::Int)).is_none());
    assert!(slot.is_occupied());

    let evicted = slot.constrain(basic(TypeType::Str)).unwrap();
    assert_eq!(evicted.get_expr_type(), ExprType::IntLiteral);
    assert!(matches!(slot.get_content(), SlotContent::Empty));
    assert_eq!(slot.get_type().get_name(), "str");
}

#[test]
fn test_variable_declaration_defaults() {
    let declaration = VariableDeclaration::new("one_var", Span::null());
    assert_eq!(declaration.get_id(), "one_var");
    assert_eq!(
        declaration.get_declared_type().unwrap().get_type_type(),
        TypeType::Object
    );
    assert_eq!(declaration.get_stmt_type(), StmtType::VariableDeclaration);
}

#[test]
fn test_variable_definition_constraint() {
    let mut definition = VariableDefinition::new("two_var", Span::null());
    definition.set_value(int_expr(1)).unwrap();

    let evicted = definition
        .set_type(TypeExpr::new(basic(TypeType::Int), Span::null()))
        .unwrap();
    assert!(evicted.is_none());
    assert_eq!(value_type(&definition), TypeType::Int);

    let evicted = definition
        .set_type(TypeExpr::new(basic(TypeType::Str), Span::null()))
        .unwrap();
    assert!(evicted.is_some());
    assert!(!definition.get_value_slot().unwrap().is_occupied());
}

fn value_type(definition: &VariableDefinition) -> TypeType {
    definition
        .get_value_slot()
        .unwrap()
        .get_type()
        .get_type_type()
}

#[test]
fn test_replace_type_through_field_retypes_value() {
    let mut block = parse_python("x: int = 1\n", None).unwrap();
    let definition = block
        .get_child_mut(0)
        .unwrap()
        .downcast_mut::<VariableDefinition>()
        .unwrap();

    let Some(FieldMut::Slot(type_slot)) = definition.get_field_mut("type") else {
        panic!("type is a single slot");
    };
    let previous = type_slot
        .replace_expression(TypeExpr::wrap(TypeType::Str))
        .unwrap();
    assert_eq!(
        previous.as_ref().and_then(as_type).unwrap().get_type_type(),
        TypeType::Int
    );

    assert_eq!(
        definition.get_declared_type().unwrap().get_type_type(),
        TypeType::Str
    );
    assert_eq!(value_type(definition), TypeType::Str);
    assert!(!definition.get_value_slot().unwrap().is_occupied());
}

#[test]
fn test_remove_and_add_type_through_field_retypes_value() {
    let mut definition = VariableDefinition::new("flag", Span::null());
    definition.set_value(int_expr(0)).unwrap();

    let Some(FieldMut::Slot(type_slot)) = definition.get_field_mut("type") else {
        panic!("type is a single slot");
    };
    type_slot.remove_expression();
    type_slot.add_expression(TypeExpr::wrap(TypeType::Bool)).unwrap();

    assert_eq!(value_type(&definition), TypeType::Bool);
    assert!(!definition.get_value_slot().unwrap().is_occupied());

    let Some(FieldMut::Slot(type_slot)) = definition.get_field_mut("type") else {
        panic!("type is a single slot");
    };
    type_slot.remove_expression();
    type_slot.add_expression(TypeExpr::wrap(TypeType::Int)).unwrap();
    definition.set_value(int_expr(3)).unwrap();

    assert_eq!(value_type(&definition), TypeType::Int);
    assert!(definition.get_value_slot().unwrap().is_occupied());
}

#[test]
fn test_constraint_slot_requires_type_slot() {
    let mut slot = ExpressionSlot::new(basic(TypeType::Int));
    let error = slot
        .set_constraint_slot(ExpressionSlot::new(basic(TypeType::Object)))
        .unwrap_err();
    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::ConstraintNotAllowed {
            slot_type: "int".to_string()
        }
    );
    assert_eq!(error.get_error_name(), "ConstraintNotAllowed");
    assert!(slot.get_constraint_slot().is_none());
}

#[test]
fn test_constraint_slot_follows_held_type() {
    let mut slot = ExpressionSlot::new(basic(TypeType::Type));
    slot.add_expression(TypeExpr::wrap(TypeType::Int)).unwrap();

    let mut constrained = ExpressionSlot::new(basic(TypeType::Object));
    constrained.add_expression(int_expr(2)).unwrap();
    let evicted = slot.set_constraint_slot(constrained).unwrap();

    assert!(evicted.is_none());
    let constrained = slot.get_constraint_slot().unwrap();
    assert_eq!(constrained.get_type().get_type_type(), TypeType::Int);
    assert!(constrained.is_occupied());

    slot.remove_expression();
    assert_eq!(
        slot.get_constraint_slot().unwrap().get_type().get_type_type(),
        TypeType::Int
    );
}

#[test]
fn test_add_field_expression_applies_constraint() {
    let mut definition = VariableDefinition::new("x", Span::null());
    if let Some(FieldMut::Slot(type_slot)) = definition.get_field_mut("type") {
        type_slot.remove_expression();
    }

    definition
        .add_field_expression("type", TypeExpr::wrap(TypeType::Bool))
        .unwrap();
    assert_eq!(value_type(&definition), TypeType::Bool);

    let error = definition
        .add_field_expression("value", int_expr(1))
        .unwrap_err();
    assert!(matches!(
        error.get_internal_error(),
        ErrorImpl::TypeMatchError { .. }
    ));

    let error = definition
        .add_field_expression("missing", int_expr(1))
        .unwrap_err();
    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::UnknownField {
            node: "VariableDefinition".to_string(),
            field: "missing".to_string(),
        }
    );
}

#[test]
fn test_code_block_children() {
    let mut block = CodeBlock::new(Span::null());
    block.append_child(expression_stmt(int_expr(1)));
    block.append_child(expression_stmt(int_expr(3)));
    block.insert_child(1, expression_stmt(int_expr(2))).unwrap();
    assert_eq!(block.len(), 3);

    let value_of = |stmt: &StmtWrapper| {
        let stmt = stmt.downcast_ref::<ExpressionStmt>().unwrap();
        stmt.value
            .get_expression()
            .unwrap()
            .downcast_ref::<IntLiteral>()
            .unwrap()
            .get_value()
    };

    assert_eq!(value_of(block.next_sibling(0).unwrap()), 2);
    assert_eq!(value_of(block.prev_sibling(2).unwrap()), 2);
    assert!(block.prev_sibling(0).is_none());
    assert!(block.next_sibling(2).is_none());

    let replaced = block
        .replace_child(
            1,
            vec![expression_stmt(int_expr(20)), expression_stmt(int_expr(21))],
        )
        .unwrap();
    assert_eq!(value_of(&replaced), 2);
    assert_eq!(
        block.iter().map(value_of).collect::<Vec<i64>>(),
        vec![1, 20, 21, 3]
    );

    let removed = block.remove_child(0).unwrap();
    assert_eq!(value_of(&removed), 1);

    let previous = block.set_child(0, expression_stmt(int_expr(0))).unwrap();
    assert_eq!(value_of(&previous), 20);

    let error = block.remove_child(10).unwrap_err();
    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::IndexOutOfRange { index: 10, len: 3 }
    );
    assert!(block.insert_child(4, expression_stmt(int_expr(9))).is_err());
}

#[test]
fn test_call_binding() {
    let mut call = Call::with_func(
        ExprWrapper::new(VariableLoader::new("f", Span::null())),
        Span::null(),
    )
    .unwrap();

    call.add_argument(int_expr(1)).unwrap();
    call.add_argument(int_expr(2)).unwrap();
    call.add_keyword_argument("key", int_expr(3)).unwrap();
    assert_eq!(call.args.len(), 2);
    assert_eq!(call.keywords.len(), 1);

    let keyword = call.keywords.get(0).unwrap().get_expression().unwrap();
    assert_eq!(keyword.downcast_ref::<Keyword>().unwrap().get_arg(), "key");

    let error = call.add_argument(int_expr(4)).unwrap_err();
    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::PositionalFollowsKeyword
    );

    let error = call.add_keyword_argument("key", int_expr(5)).unwrap_err();
    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::RepeatedKeywordArgument {
            keyword: "key".to_string()
        }
    );
}

#[test]
fn test_traversal_order() {
    let mut call = Call::with_func(
        ExprWrapper::new(VariableLoader::new("f", Span::null())),
        Span::null(),
    )
    .unwrap();
    call.add_argument(ExprWrapper::new(BoolLiteral::new(true, Span::null())))
        .unwrap();

    let mut block = CodeBlock::new(Span::null());
    block.append_child(expression_stmt(ExprWrapper::new(call)));
    block.append_child(expression_stmt(ExprWrapper::new(NoneLiteral::new(
        Span::null(),
    ))));

    fn names(nodes: Vec<NodeRef<'_>>) -> Vec<String> {
        nodes.iter().map(|node| node.get_name()).collect()
    }

    assert_eq!(
        names(pre_order(NodeRef::Stmt(&block))),
        vec![
            "CodeBlock",
            "ExpressionStmt",
            "Call",
            "VariableLoader",
            "BoolLiteral",
            "ExpressionStmt",
            "NoneLiteral",
        ]
    );
    assert_eq!(
        names(post_order(NodeRef::Stmt(&block))),
        vec![
            "VariableLoader",
            "BoolLiteral",
            "Call",
            "ExpressionStmt",
            "NoneLiteral",
            "ExpressionStmt",
            "CodeBlock",
        ]
    );
}

#[test]
fn test_deep_clone() {
    let mut definition = VariableDefinition::new("x", Span::null());
    definition.set_value(int_expr(1)).unwrap();
    let original = StmtWrapper::new(definition);

    let mut copy = original.clone();
    copy.downcast_mut::<VariableDefinition>()
        .unwrap()
        .get_value_slot_mut()
        .unwrap()
        .remove_expression();

    let original = original.downcast_ref::<VariableDefinition>().unwrap();
    assert!(original.get_value_slot().unwrap().is_occupied());
}

#[test]
fn test_dump() {
    let mut definition = VariableDefinition::new("two_var", Span::null());
    definition
        .set_type(TypeExpr::new(basic(TypeType::Int), Span::null()))
        .unwrap();
    definition.set_value(int_expr(1)).unwrap();

    let value = dump(NodeRef::Stmt(&definition));
    assert_eq!(
        value,
        serde_json::json!({
            "node": "VariableDefinition",
            "fields": {
                "id": "two_var",
                "type": { "node": "Type", "fields": { "type": "int" } },
                "value": { "node": "IntLiteral", "fields": { "value": 1 } },
            }
        })
    );

    let mut block = CodeBlock::new(Span::null());
    block.append_child(StmtWrapper::new(definition));
    let value = dump(NodeRef::Stmt(&block));
    assert_eq!(value["fields"]["body"][0]["node"], "VariableDefinition");
}

#[test]
fn test_as_type() {
    let expression = TypeExpr::wrap(TypeType::Str);
    assert_eq!(as_type(&expression).unwrap().get_name(), "str");
    assert!(as_type(&int_expr(1)).is_none());
}
