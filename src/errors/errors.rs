use std::fmt::Display;

use thiserror::Error;

use crate::Position;

#[derive(Debug, Clone)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    /// Creates an error that is not tied to any source text,
    /// such as a failed edit on a tree built in an editor.
    pub fn detached(error_impl: ErrorImpl) -> Self {
        Error::new(error_impl, Position::null())
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_internal_error(&self) -> &ErrorImpl {
        &self.internal_error
    }

    /// Moves the error to a source position, keeping the kind.
    pub fn at(self, position: Position) -> Self {
        Error {
            internal_error: self.internal_error,
            position,
        }
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::UnterminatedString => "UnterminatedString",
            ErrorImpl::InconsistentIndentation => "InconsistentIndentation",
            ErrorImpl::UnexpectedIndent => "UnexpectedIndent",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnexpectedTokenDetailed { .. } => "UnexpectedTokenDetailed",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::AstNotSupported { .. } => "ASTNotSupported",
            ErrorImpl::ConstantNotSupported { .. } => "ConstantNotSupported",
            ErrorImpl::TempNotSupported { .. } => "TempNotSupported",
            ErrorImpl::UnknownType { .. } => "UnknownType",
            ErrorImpl::TypeMatchError { .. } => "TypeMatchError",
            ErrorImpl::ArgumentTypeMatchError { .. } => "ArgumentTypeMatchError",
            ErrorImpl::TooManyPositionalArguments { .. } => "TooManyPositionalArguments",
            ErrorImpl::UnexpectedKeywordArgument { .. } => "UnexpectedKeywordArgument",
            ErrorImpl::RepeatedKeywordArgument { .. } => "RepeatedKeywordArgument",
            ErrorImpl::PositionalFollowsKeyword => "PositionalFollowsKeyword",
            ErrorImpl::SlotOccupied { .. } => "SlotOccupied",
            ErrorImpl::LiteralSlot { .. } => "LiteralSlot",
            ErrorImpl::NotLiteralSlot { .. } => "NotLiteralSlot",
            ErrorImpl::LiteralValueMismatch { .. } => "LiteralValueMismatch",
            ErrorImpl::UnknownField { .. } => "UnknownField",
            ErrorImpl::ConstraintNotAllowed { .. } => "ConstraintNotAllowed",
            ErrorImpl::IndexOutOfRange { .. } => "IndexOutOfRange",
            ErrorImpl::EmptySlot { .. } => "EmptySlot",
            ErrorImpl::NotUnparsable { .. } => "NotUnparsable",
            ErrorImpl::InvalidBuiltinName { .. } => "InvalidBuiltinName",
            ErrorImpl::BuiltinAlreadyRegistered { .. } => "BuiltinAlreadyRegistered",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::UnterminatedString => {
                ErrorTip::Suggestion(String::from("String literal is missing its closing quote"))
            }
            ErrorImpl::InconsistentIndentation => ErrorTip::Suggestion(String::from(
                "Dedent does not match any outer indentation level",
            )),
            ErrorImpl::UnexpectedIndent => {
                ErrorTip::Suggestion(String::from("Unexpected indent, only flat scripts are supported"))
            }
            ErrorImpl::UnexpectedToken { token } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`", token))
            }
            ErrorImpl::UnexpectedTokenDetailed { token, message } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`, {}", token, message))
            }
            ErrorImpl::NumberParseError { token } => ErrorTip::Suggestion(format!(
                "Invalid number: `{}`, is it above the integer limit?",
                token
            )),
            ErrorImpl::AstNotSupported { node } => {
                ErrorTip::Suggestion(format!("`{}` syntax cannot be represented yet", node))
            }
            ErrorImpl::ConstantNotSupported { constant } => {
                ErrorTip::Suggestion(format!("{} constants cannot be represented", constant))
            }
            ErrorImpl::TempNotSupported { feature } => {
                ErrorTip::Suggestion(format!("{} is not supported yet", feature))
            }
            ErrorImpl::UnknownType { type_ } => {
                ErrorTip::Suggestion(format!("Unknown type `{}` found", type_))
            }
            ErrorImpl::TypeMatchError { expected, received } => ErrorTip::Suggestion(format!(
                "Expected type `{}`, received `{}`",
                expected, received
            )),
            ErrorImpl::ArgumentTypeMatchError {
                argument,
                expected,
                received,
            } => ErrorTip::Suggestion(format!(
                "Argument `{}` expects type `{}`, received `{}`",
                argument, expected, received
            )),
            ErrorImpl::TooManyPositionalArguments { callable } => {
                ErrorTip::Suggestion(format!("Too many positional arguments for `{}`", callable))
            }
            ErrorImpl::UnexpectedKeywordArgument { callable, keyword } => ErrorTip::Suggestion(
                format!("`{}` got an unexpected keyword argument `{}`", callable, keyword),
            ),
            ErrorImpl::RepeatedKeywordArgument { keyword } => {
                ErrorTip::Suggestion(format!("Keyword argument repeated: `{}`", keyword))
            }
            ErrorImpl::PositionalFollowsKeyword => ErrorTip::Suggestion(String::from(
                "Positional arguments must come before keyword arguments",
            )),
            ErrorImpl::SlotOccupied { slot_type } => ErrorTip::Suggestion(format!(
                "Slot of type `{}` already holds an expression, remove it first",
                slot_type
            )),
            ErrorImpl::LiteralSlot { slot_type } => ErrorTip::Suggestion(format!(
                "Slot of type `{}` only holds literal values",
                slot_type
            )),
            ErrorImpl::NotLiteralSlot { slot_type } => ErrorTip::Suggestion(format!(
                "Slot of type `{}` cannot hold a literal value",
                slot_type
            )),
            ErrorImpl::LiteralValueMismatch { slot_type, value } => ErrorTip::Suggestion(format!(
                "Literal `{}` does not fit a slot of type `{}`",
                value, slot_type
            )),
            ErrorImpl::UnknownField { node, field } => {
                ErrorTip::Suggestion(format!("`{}` has no field `{}`", node, field))
            }
            ErrorImpl::ConstraintNotAllowed { slot_type } => ErrorTip::Suggestion(format!(
                "Only slots of type `type` can constrain another slot, found `{}`",
                slot_type
            )),
            ErrorImpl::IndexOutOfRange { index, len } => ErrorTip::Suggestion(format!(
                "Index {} is out of range for a block of {} statements",
                index, len
            )),
            ErrorImpl::EmptySlot { node, field } => {
                ErrorTip::Suggestion(format!("Field `{}` of `{}` is empty", field, node))
            }
            ErrorImpl::NotUnparsable { node } => {
                ErrorTip::Suggestion(format!("`{}` has no Python source form", node))
            }
            ErrorImpl::InvalidBuiltinName { name } => ErrorTip::Suggestion(format!(
                "`{}` is not a Python builtin that can be registered",
                name
            )),
            ErrorImpl::BuiltinAlreadyRegistered { name } => {
                ErrorTip::Suggestion(format!("Builtin `{}` is already registered", name))
            }
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.internal_error)
    }
}

impl std::error::Error for Error {}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    // Lexing
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unindent does not match any outer indentation level")]
    InconsistentIndentation,
    #[error("unexpected indent")]
    UnexpectedIndent,

    // Parsing
    #[error("unexpected token: {token:?}")]
    UnexpectedToken { token: String },
    #[error("unexpected token ({message:?}): {token:?}")]
    UnexpectedTokenDetailed { token: String, message: String },
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },
    #[error("{node} is not supported")]
    AstNotSupported { node: String },
    #[error("{constant} constant is not supported")]
    ConstantNotSupported { constant: String },
    #[error("{feature} is temporarily not supported")]
    TempNotSupported { feature: String },
    #[error("unknown type {type_} found")]
    UnknownType { type_: String },

    // Typing and argument binding
    #[error("types do not match: expected {expected:?}, received {received:?}")]
    TypeMatchError { expected: String, received: String },
    #[error("argument {argument:?} expects {expected:?}, received {received:?}")]
    ArgumentTypeMatchError {
        argument: String,
        expected: String,
        received: String,
    },
    #[error("too many positional argument for {callable}")]
    TooManyPositionalArguments { callable: String },
    #[error("{callable} got an unexpected keyword argument {keyword:?}")]
    UnexpectedKeywordArgument { callable: String, keyword: String },
    #[error("keyword argument repeated: {keyword}")]
    RepeatedKeywordArgument { keyword: String },
    #[error("positional argument follows keyword argument")]
    PositionalFollowsKeyword,

    // Tree editing
    #[error("slot of type {slot_type} is already occupied")]
    SlotOccupied { slot_type: String },
    #[error("slot of type {slot_type} only accepts literal values")]
    LiteralSlot { slot_type: String },
    #[error("slot of type {slot_type} is not a literal slot")]
    NotLiteralSlot { slot_type: String },
    #[error("literal {value} does not match slot type {slot_type}")]
    LiteralValueMismatch { slot_type: String, value: String },
    #[error("{node} has no field {field:?}")]
    UnknownField { node: String, field: String },
    #[error("constraint slot requires slot type `type`, found {slot_type}")]
    ConstraintNotAllowed { slot_type: String },
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    // Unparsing
    #[error("field {field:?} of {node} is empty")]
    EmptySlot { node: String, field: String },
    #[error("{node} cannot be unparsed")]
    NotUnparsable { node: String },

    // Builtins
    #[error("invalid builtin name {name:?}")]
    InvalidBuiltinName { name: String },
    #[error("builtin {name:?} already registered")]
    BuiltinAlreadyRegistered { name: String },
}
