use pretty_assertions::assert_eq;

use super::unparser::{
    format_source, quote_str, unparse, unparse_code_block, unparse_expression, unparse_float,
    unparse_statement, unparse_type,
};
use crate::{
    ast::{
        ast::{CallableExpr, ExprWrapper, NodeRef, StmtWrapper, TypeType, TypeWrapper},
        expressions::{
            BoolLiteral, Call, FloatLiteral, IntLiteral, NoneLiteral, StrLiteral, TypeExpr,
            VariableLoader,
        },
        statements::{CodeBlock, ExpressionStmt, VariableDeclaration, VariableDefinition},
        types::{BasicType, ListType},
    },
    builtins::print::Print,
    errors::errors::ErrorImpl,
    Span,
};

fn type_expr(type_: TypeWrapper) -> TypeExpr {
    TypeExpr::new(type_, Span::null())
}

fn str_expr(value: &str) -> ExprWrapper {
    ExprWrapper::new(StrLiteral::new(value, Span::null()))
}

#[test]
fn test_unparse_literals() {
    let cases = [
        (ExprWrapper::new(BoolLiteral::new(true, Span::null())), "True"),
        (ExprWrapper::new(BoolLiteral::new(false, Span::null())), "False"),
        (ExprWrapper::new(NoneLiteral::new(Span::null())), "None"),
        (ExprWrapper::new(IntLiteral::new(-13, Span::null())), "-13"),
        (ExprWrapper::new(FloatLiteral::new(34.45, Span::null())), "34.45"),
        (str_expr("hello python"), "\"hello python\""),
        (
            ExprWrapper::new(VariableLoader::new("one_var", Span::null())),
            "one_var",
        ),
    ];

    for (expression, expected) in cases {
        assert_eq!(unparse_expression(&expression).unwrap(), expected);
    }
}

#[test]
fn test_unparse_float_repr() {
    assert_eq!(unparse_float(1.0).unwrap(), "1.0");
    assert_eq!(unparse_float(0.32).unwrap(), "0.32");
    assert_eq!(unparse_float(-0.0).unwrap(), "-0.0");
    assert_eq!(unparse_float(0.0001).unwrap(), "0.0001");
    assert_eq!(unparse_float(0.00001).unwrap(), "1e-05");
    assert_eq!(unparse_float(1.5e-7).unwrap(), "1.5e-07");
    assert_eq!(unparse_float(123456789.0).unwrap(), "123456789.0");
    assert_eq!(unparse_float(1e16).unwrap(), "1e+16");
    assert_eq!(unparse_float(2.5e100).unwrap(), "2.5e+100");
    assert_eq!(unparse_float(f64::INFINITY), None);
    assert_eq!(unparse_float(f64::NAN), None);

    let error =
        unparse_expression(&ExprWrapper::new(FloatLiteral::new(f64::NAN, Span::null())))
            .unwrap_err();
    assert!(matches!(
        error.get_internal_error(),
        ErrorImpl::NotUnparsable { .. }
    ));
}

#[test]
fn test_quote_str() {
    assert_eq!(quote_str(""), "\"\"");
    assert_eq!(quote_str("it's"), "\"it's\"");
    assert_eq!(quote_str("say \"hi\""), "\"say \\\"hi\\\"\"");
    assert_eq!(quote_str("a\\b\nc\td"), "\"a\\\\b\\nc\\td\"");
    assert_eq!(quote_str("\u{1}é"), "\"\\x01é\"");
}

#[test]
fn test_unparse_types() {
    assert_eq!(unparse_type(&BasicType::wrap(TypeType::Int)).unwrap(), "int");
    assert_eq!(
        unparse_type(&BasicType::wrap(TypeType::LiteralStr)).unwrap(),
        "str"
    );
    assert_eq!(
        unparse_type(&BasicType::wrap(TypeType::NoneType)).unwrap(),
        "None"
    );
    assert_eq!(unparse_type(&BasicType::wrap(TypeType::Type)).unwrap(), "type");
    assert_eq!(
        unparse_type(&TypeWrapper::new(ListType {
            item_type: BasicType::wrap(TypeType::Float)
        }))
        .unwrap(),
        "list[float]"
    );
    assert_eq!(unparse_type(&Print::function_type()), None);
    assert_eq!(unparse_type(&BasicType::wrap(TypeType::VariadicArg)), None);

    let expression = ExprWrapper::new(type_expr(BasicType::wrap(TypeType::Bool)));
    assert_eq!(unparse_expression(&expression).unwrap(), "bool");
}

#[test]
fn test_unparse_call() {
    let func = ExprWrapper::new(VariableLoader::new("greet", Span::null()));
    let mut call = Call::with_func(func, Span::null()).unwrap();
    call.add_argument(str_expr("you")).unwrap();
    call.add_keyword_argument(
        "loud",
        ExprWrapper::new(BoolLiteral::new(true, Span::null())),
    )
    .unwrap();

    assert_eq!(
        unparse_expression(&call).unwrap(),
        "greet(\"you\", loud=True)"
    );
}

#[test]
fn test_unparse_statements() {
    let mut declaration = VariableDeclaration::new("one_var", Span::null());
    declaration
        .set_type(type_expr(BasicType::wrap(TypeType::Bool)))
        .unwrap();
    assert_eq!(
        unparse_statement(&declaration, 0, false).unwrap(),
        "one_var: bool"
    );
    assert_eq!(
        unparse_statement(&declaration, 2, false).unwrap(),
        "        one_var: bool"
    );

    let mut definition = VariableDefinition::new("two_var", Span::null());
    definition
        .set_type(type_expr(BasicType::wrap(TypeType::Int)))
        .unwrap();
    definition
        .set_value(ExprWrapper::new(IntLiteral::new(1, Span::null())))
        .unwrap();
    assert_eq!(
        unparse_statement(&definition, 1, false).unwrap(),
        "    two_var: int = 1"
    );

    let mut print = Print::new(Span::null());
    print.add_argument(str_expr("Hello world")).unwrap();
    let stmt = ExpressionStmt::new(ExprWrapper::new(print), Span::null()).unwrap();
    assert_eq!(
        unparse_statement(&stmt, 0, true).unwrap(),
        "print(\"Hello world\")\n"
    );
}

#[test]
fn test_unparse_default_declaration() {
    let declaration = VariableDeclaration::new("anything", Span::null());

    assert_eq!(
        unparse_statement(&declaration, 0, false).unwrap(),
        "anything: object"
    );
}

#[test]
fn test_unparse_empty_slot() {
    let mut definition = VariableDefinition::new("x", Span::null());
    definition
        .set_type(type_expr(BasicType::wrap(TypeType::Int)))
        .unwrap();

    let error = unparse_statement(&definition, 0, false).unwrap_err();
    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::EmptySlot {
            node: "VariableDefinition".to_string(),
            field: "value".to_string(),
        }
    );

    let call = Call::new(Span::null());
    assert!(matches!(
        unparse_expression(&call).unwrap_err().get_internal_error(),
        ErrorImpl::EmptySlot { .. }
    ));
}

#[test]
fn test_unparse_code_block() {
    let mut block = CodeBlock::new(Span::null());
    for value in [1, 2, 3] {
        let expression = ExprWrapper::new(IntLiteral::new(value, Span::null()));
        block.append_child(StmtWrapper::new(
            ExpressionStmt::new(expression, Span::null()).unwrap(),
        ));
    }

    assert_eq!(unparse_code_block(&block, 0, false).unwrap(), "1\n2\n3");
    assert_eq!(unparse_code_block(&block, 1, true).unwrap(), "    1\n    2\n    3\n");
    assert_eq!(
        unparse(NodeRef::Stmt(&block), 0, true).unwrap(),
        "1\n2\n3\n"
    );

    let empty = CodeBlock::new(Span::null());
    assert_eq!(unparse(NodeRef::Stmt(&empty), 0, true).unwrap(), "");
}

#[test]
fn test_format_source() {
    assert_eq!(format_source("a = 1"), "a = 1\n");
    assert_eq!(format_source("a  \n\n\nb\t\n\n\n"), "a\n\n\nb\n");
    assert_eq!(format_source("\n  \n"), "");
}
