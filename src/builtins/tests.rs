use crate::{
    ast::{
        ast::{BuiltinExpr, CallableExpr, Expr, ExprType, ExprWrapper, Type, TypeType},
        expressions::{as_type, IntLiteral, NoneLiteral, StrLiteral},
        types::{BasicType, CallableType},
    },
    errors::errors::ErrorImpl,
    Span,
};

use super::{
    builtins::{check_builtin_name_valid, BuiltinRegistry},
    print::Print,
};

fn str_expr(value: &str) -> ExprWrapper {
    ExprWrapper::new(StrLiteral::new(value, Span::null()))
}

#[test]
fn test_default_builtins() {
    let registry = BuiltinRegistry::default();

    assert_eq!(
        registry.get_names(),
        vec!["None", "bool", "float", "int", "list", "object", "print", "str"]
    );
    assert!(registry.is_builtin_expression("print"));
    assert!(!registry.is_builtin_expression("len"));
}

#[test]
fn test_create_builtin_expression() {
    let registry = BuiltinRegistry::new();

    let int = registry
        .create_builtin_expression("int", Span::null())
        .unwrap();
    assert_eq!(as_type(&int).unwrap().get_type_type(), TypeType::Int);

    let none = registry
        .create_builtin_expression("None", Span::null())
        .unwrap();
    assert!(none.downcast_ref::<NoneLiteral>().is_some());

    let print = registry
        .create_builtin_expression("print", Span::null())
        .unwrap();
    assert_eq!(print.get_expr_type(), ExprType::Builtin);
    assert_eq!(print.get_name(), "print");

    let error = registry
        .create_builtin_expression("len", Span::null())
        .unwrap_err();
    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::InvalidBuiltinName {
            name: "len".to_string()
        }
    );
}

#[test]
fn test_register_builtin() {
    let mut registry = BuiltinRegistry::new();

    registry
        .register("len", |span| ExprWrapper::new(IntLiteral::new(0, span)))
        .unwrap();
    assert!(registry.is_builtin_expression("len"));

    let error = registry
        .register("len", |span| ExprWrapper::new(IntLiteral::new(0, span)))
        .unwrap_err();
    assert!(matches!(
        error.get_internal_error(),
        ErrorImpl::BuiltinAlreadyRegistered { .. }
    ));

    for name in ["int", "True", "__doc__", "not_a_builtin"] {
        let error = registry
            .register(name, |span| ExprWrapper::new(IntLiteral::new(0, span)))
            .unwrap_err();
        assert!(matches!(
            error.get_internal_error(),
            ErrorImpl::InvalidBuiltinName { .. }
        ));
    }
}

#[test]
fn test_builtin_name_validity() {
    assert!(check_builtin_name_valid("print"));
    assert!(check_builtin_name_valid("len"));
    assert!(check_builtin_name_valid("ValueError"));
    assert!(!check_builtin_name_valid("object"));
    assert!(!check_builtin_name_valid("_"));
    assert!(!check_builtin_name_valid("printf"));
}

#[test]
fn test_print_binding() {
    let mut print = Print::new(Span::null());

    print.add_argument(str_expr("a")).unwrap();
    print
        .add_argument(ExprWrapper::new(IntLiteral::new(1, Span::null())))
        .unwrap();
    print.add_keyword_argument("sep", str_expr("-")).unwrap();

    assert_eq!(print.objects.len(), 2);
    assert!(print.sep.is_occupied());
    assert!(!print.end.is_occupied());

    let error = print.add_keyword_argument("sep", str_expr("+")).unwrap_err();
    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::RepeatedKeywordArgument {
            keyword: "sep".to_string()
        }
    );

    let error = print.add_keyword_argument("color", str_expr("red")).unwrap_err();
    assert_eq!(
        error.get_tip().to_string(),
        "`print` got an unexpected keyword argument `color`"
    );

    let error = print
        .add_keyword_argument("flush", str_expr("yes"))
        .unwrap_err();
    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::ArgumentTypeMatchError {
            argument: "flush".to_string(),
            expected: "bool".to_string(),
            received: "Literal[str]".to_string(),
        }
    );

    let error = print.add_argument(str_expr("late")).unwrap_err();
    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::PositionalFollowsKeyword
    );
}

#[test]
fn test_print_type() {
    let print_type = Print::function_type();

    assert_eq!(print_type.get_type_type(), TypeType::Function);
    assert!(print_type.is_compatible_with(&BasicType::wrap(TypeType::Object)));

    // Any callable taking `*args` and returning nothing can stand in for print
    let required = CallableType::new(
        vec![BasicType::wrap(TypeType::VariadicArg)],
        BasicType::wrap(TypeType::NoneType),
    );
    assert!(print_type.is_compatible_with(&required));
}

#[test]
fn test_print_unparse() {
    let mut print = Print::new(Span::null());
    assert_eq!(print.unparse().unwrap(), "print");

    print.mark_invoked();
    assert_eq!(print.unparse().unwrap(), "print()");

    print.add_argument(str_expr("Hello")).unwrap();
    print
        .add_argument(ExprWrapper::new(NoneLiteral::new(Span::null())))
        .unwrap();
    print.add_keyword_argument("end", str_expr("")).unwrap();

    assert_eq!(print.unparse().unwrap(), r#"print("Hello", None, end="")"#);
    assert_eq!(print.get_builtin_name(), "print");
}

#[test]
fn test_print_unparse_fields_filled_directly() {
    let mut print = Print::new(Span::null());
    print
        .add_field_expression("objects", str_expr("hi"))
        .unwrap();
    assert!(!print.is_invoked());
    assert_eq!(print.unparse().unwrap(), r#"print("hi")"#);

    let mut print = Print::new(Span::null());
    print.add_field_expression("sep", str_expr("-")).unwrap();
    assert_eq!(print.unparse().unwrap(), r#"print(sep="-")"#);
}
