//! Unit tests for error handling.
//!
//! This module contains tests for error kinds, positions and tips.

use crate::errors::errors::{Error, ErrorImpl, ErrorTip};
use crate::Position;
use std::rc::Rc;

#[test]
fn test_error_creation() {
    let error = Error::new(
        ErrorImpl::UnrecognisedToken {
            token: "$".to_string(),
        },
        Position(10, Rc::new("test.py".to_string())),
    );

    assert_eq!(error.get_error_name(), "UnrecognisedToken");
    assert!(matches!(error.get_tip(), ErrorTip::None));
}

#[test]
fn test_error_position() {
    let pos = Position(42, Rc::new("test.py".to_string()));
    let error = Error::new(
        ErrorImpl::UnexpectedToken {
            token: ")".to_string(),
        },
        pos.clone(),
    );

    assert_eq!(error.get_position().0, 42);
    assert_eq!(error.get_position().1.as_str(), "test.py");
}

#[test]
fn test_detached_error_uses_null_position() {
    let error = Error::detached(ErrorImpl::SlotOccupied {
        slot_type: "object".to_string(),
    });

    assert_eq!(error.get_position().0, 0);
    assert_eq!(error.get_position().1.as_str(), "<null>");

    let moved = error.at(Position(7, Rc::new("script.py".to_string())));
    assert_eq!(moved.get_position().0, 7);
    assert_eq!(moved.get_error_name(), "SlotOccupied");
}

#[test]
fn test_not_supported_errors() {
    let error = Error::detached(ErrorImpl::AstNotSupported {
        node: "FunctionDef".to_string(),
    });
    assert_eq!(error.get_error_name(), "ASTNotSupported");
    assert_eq!(error.to_string(), "FunctionDef is not supported");

    let error = Error::detached(ErrorImpl::ConstantNotSupported {
        constant: "bytes".to_string(),
    });
    assert_eq!(error.get_error_name(), "ConstantNotSupported");

    let error = Error::detached(ErrorImpl::TempNotSupported {
        feature: "attribute target".to_string(),
    });
    assert_eq!(error.get_error_name(), "TempNotSupported");
}

#[test]
fn test_type_mismatch_tip() {
    let error = Error::detached(ErrorImpl::TypeMatchError {
        expected: "int".to_string(),
        received: "str".to_string(),
    });

    assert_eq!(error.get_error_name(), "TypeMatchError");
    match error.get_tip() {
        ErrorTip::Suggestion(tip) => assert_eq!(tip, "Expected type `int`, received `str`"),
        ErrorTip::None => panic!("expected a suggestion"),
    }
}

#[test]
fn test_argument_binding_errors() {
    let error = Error::detached(ErrorImpl::TooManyPositionalArguments {
        callable: "Call".to_string(),
    });
    assert_eq!(error.to_string(), "too many positional argument for Call");

    let error = Error::detached(ErrorImpl::UnexpectedKeywordArgument {
        callable: "print".to_string(),
        keyword: "color".to_string(),
    });
    assert_eq!(error.get_error_name(), "UnexpectedKeywordArgument");
    assert_eq!(
        error.get_tip().to_string(),
        "`print` got an unexpected keyword argument `color`"
    );

    let error = Error::detached(ErrorImpl::RepeatedKeywordArgument {
        keyword: "a".to_string(),
    });
    assert_eq!(error.to_string(), "keyword argument repeated: a");
}

#[test]
fn test_error_tip_display() {
    assert_eq!(ErrorTip::None.to_string(), "");
    assert_eq!(
        ErrorTip::Suggestion("check the slot".to_string()).to_string(),
        "check the slot"
    );
}
