use std::collections::{HashMap, HashSet};

use lazy_static::lazy_static;

use crate::{
    ast::{
        ast::{ExprWrapper, TypeType},
        expressions::{NoneLiteral, TypeExpr},
        types::BasicType,
    },
    errors::errors::{Error, ErrorImpl},
    Span,
};

use super::print::Print;

lazy_static! {
    /// Names found in Python's `builtins` module.
    static ref PYTHON_BUILTINS: HashSet<&'static str> = [
        "ArithmeticError", "AssertionError", "AttributeError", "BaseException",
        "BaseExceptionGroup", "BlockingIOError", "BrokenPipeError", "BufferError",
        "BytesWarning", "ChildProcessError", "ConnectionAbortedError", "ConnectionError",
        "ConnectionRefusedError", "ConnectionResetError", "DeprecationWarning", "EOFError",
        "Ellipsis", "EncodingWarning", "EnvironmentError", "Exception", "ExceptionGroup",
        "False", "FileExistsError", "FileNotFoundError", "FloatingPointError", "FutureWarning",
        "GeneratorExit", "IOError", "ImportError", "ImportWarning", "IndentationError",
        "IndexError", "InterruptedError", "IsADirectoryError", "KeyError", "KeyboardInterrupt",
        "LookupError", "MemoryError", "ModuleNotFoundError", "NameError", "None",
        "NotADirectoryError", "NotImplemented", "NotImplementedError", "OSError",
        "OverflowError", "PendingDeprecationWarning", "PermissionError", "ProcessLookupError",
        "RecursionError", "ReferenceError", "ResourceWarning", "RuntimeError", "RuntimeWarning",
        "StopAsyncIteration", "StopIteration", "SyntaxError", "SyntaxWarning", "SystemError",
        "SystemExit", "TabError", "TimeoutError", "True", "TypeError", "UnboundLocalError",
        "UnicodeDecodeError", "UnicodeEncodeError", "UnicodeError", "UnicodeTranslateError",
        "UnicodeWarning", "UserWarning", "ValueError", "Warning", "ZeroDivisionError",
        "_", "__build_class__", "__debug__", "__doc__", "__import__", "__loader__", "__name__",
        "__package__", "__spec__", "abs", "aiter", "all", "anext", "any", "ascii", "bin", "bool",
        "breakpoint", "bytearray", "bytes", "callable", "chr", "classmethod", "compile",
        "complex", "copyright", "credits", "delattr", "dict", "dir", "divmod", "enumerate",
        "eval", "exec", "exit", "filter", "float", "format", "frozenset", "getattr", "globals",
        "hasattr", "hash", "help", "hex", "id", "input", "int", "isinstance", "issubclass",
        "iter", "len", "license", "list", "locals", "map", "max", "memoryview", "min", "next",
        "object", "oct", "open", "ord", "pow", "print", "property", "quit", "range", "repr",
        "reversed", "round", "set", "setattr", "slice", "sorted", "staticmethod", "str", "sum",
        "super", "tuple", "type", "vars", "zip",
    ]
    .into_iter()
    .collect();

    /// Builtins that map onto core nodes or are never exposed as expressions.
    static ref IGNORED_NAMES: HashSet<&'static str> = [
        "object", "bool", "True", "False", "None", "int", "float", "str", "list", "_",
        "__build_class__", "__debug__", "__doc__", "__import__", "__loader__", "__name__",
        "__package__", "__spec__",
    ]
    .into_iter()
    .collect();
}

/// Builds a fresh builtin expression located at `span`.
pub type BuiltinConstructor = fn(Span) -> ExprWrapper;

fn type_constructor(type_type: TypeType, span: Span) -> ExprWrapper {
    ExprWrapper::new(TypeExpr::new(BasicType::wrap(type_type), span))
}

/// Maps builtin names to the expressions they stand for.
#[derive(Clone)]
pub struct BuiltinRegistry {
    constructors: HashMap<String, BuiltinConstructor>,
}

impl Default for BuiltinRegistry {
    fn default() -> Self {
        let mut constructors: HashMap<String, BuiltinConstructor> = HashMap::new();
        constructors.insert("object".to_string(), |span| {
            type_constructor(TypeType::Object, span)
        });
        constructors.insert("bool".to_string(), |span| type_constructor(TypeType::Bool, span));
        constructors.insert("int".to_string(), |span| type_constructor(TypeType::Int, span));
        constructors.insert("float".to_string(), |span| {
            type_constructor(TypeType::Float, span)
        });
        constructors.insert("str".to_string(), |span| type_constructor(TypeType::Str, span));
        constructors.insert("list".to_string(), |span| type_constructor(TypeType::List, span));
        constructors.insert("None".to_string(), |span| {
            ExprWrapper::new(NoneLiteral::new(span))
        });
        constructors.insert("print".to_string(), |span| ExprWrapper::new(Print::new(span)));

        BuiltinRegistry { constructors }
    }
}

impl std::fmt::Debug for BuiltinRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuiltinRegistry")
            .field("names", &self.get_names())
            .finish()
    }
}

impl BuiltinRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_builtin_expression(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    pub fn create_builtin_expression(&self, name: &str, span: Span) -> Result<ExprWrapper, Error> {
        match self.constructors.get(name) {
            Some(constructor) => Ok(constructor(span)),
            None => Err(Error::new(
                ErrorImpl::InvalidBuiltinName {
                    name: name.to_string(),
                },
                span.start,
            )),
        }
    }

    /// Exposes another Python builtin as an expression.
    ///
    /// Only names of Python's `builtins` module are accepted, except the ones
    /// already covered by core nodes.
    pub fn register(&mut self, name: &str, constructor: BuiltinConstructor) -> Result<(), Error> {
        if !check_builtin_name_valid(name) {
            return Err(Error::detached(ErrorImpl::InvalidBuiltinName {
                name: name.to_string(),
            }));
        }

        if self.constructors.contains_key(name) {
            return Err(Error::detached(ErrorImpl::BuiltinAlreadyRegistered {
                name: name.to_string(),
            }));
        }

        self.constructors.insert(name.to_string(), constructor);
        Ok(())
    }

    /// Registered names, sorted.
    pub fn get_names(&self) -> Vec<&str> {
        let mut names = self
            .constructors
            .keys()
            .map(|name| name.as_str())
            .collect::<Vec<&str>>();
        names.sort_unstable();
        names
    }
}

pub fn check_builtin_name_valid(name: &str) -> bool {
    !IGNORED_NAMES.contains(name) && PYTHON_BUILTINS.contains(name)
}
