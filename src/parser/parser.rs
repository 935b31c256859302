//! Parser implementation for building the common AST.
//!
//! This module contains the main Parser struct and parsing functions.
//! The parser uses a Pratt parser approach with NUD/LED handlers for
//! expression parsing and specialized functions for statement parsing.
//!
//! It maintains lookup tables for:
//! - Statement handlers
//! - NUD (null denotation) handlers for prefix expressions
//! - LED (left denotation) handlers for infix expressions
//! - Binding powers for operator precedence
//! - Type parsing handlers

use std::{collections::HashMap, rc::Rc};

use tracing::debug;

use crate::{
    ast::statements::CodeBlock,
    builtins::builtins::BuiltinRegistry,
    errors::errors::{Error, ErrorImpl},
    lexer::{
        lexer::tokenize,
        tokens::{Token, TokenKind},
    },
    Position, Span,
};

use super::{
    lookups::{
        create_token_lookups, BPLookup, BindingPower, LEDHandler, LEDLookup, NUDHandler, NUDLookup,
        StmtHandler, StmtLookup,
    },
    stmt::parse_stmt,
    types::{
        create_token_type_lookups, TypeBPLookup, TypeLEDHandler, TypeLEDLookup, TypeNUDHandler,
        TypeNUDLookup,
    },
};

/// The main parser structure that maintains parsing state.
///
/// This struct holds the token stream and maintains lookup tables for
/// parsing statements, expressions, and types. It tracks the current
/// position in the token stream and provides methods for token consumption.
pub struct Parser {
    /// The list of tokens to parse, always closed by an EOF token
    tokens: Vec<Token>,
    /// Current position in the token stream
    pos: usize,
    /// The name of the source file being parsed
    file: Rc<String>,
    /// Names that resolve to builtin expressions
    builtins: BuiltinRegistry,
    /// Lookup table for statement parsing handlers
    stmt_lookup: StmtLookup,
    /// Lookup table for null denotation (prefix) expression handlers
    nud_lookup: NUDLookup,
    /// Lookup table for left denotation (infix) expression handlers
    led_lookup: LEDLookup,
    /// Lookup table for expression binding powers (precedence)
    binding_power_lookup: BPLookup,
    /// Lookup table for type null denotation handlers
    type_nud_lookup: TypeNUDLookup,
    /// Lookup table for type left denotation handlers
    type_led_lookup: TypeLEDLookup,
    /// Lookup table for type binding powers
    type_binding_power_lookup: TypeBPLookup,
}

impl Parser {
    /// Creates a new Parser instance.
    ///
    /// # Arguments
    ///
    /// * `tokens` - Vector of tokens to parse
    /// * `file` - Reference-counted string containing the source file name
    /// * `builtins` - Registry used to resolve builtin names
    ///
    /// # Returns
    ///
    /// A new Parser instance ready to parse the token stream.
    pub fn new(mut tokens: Vec<Token>, file: Rc<String>, builtins: BuiltinRegistry) -> Self {
        if tokens.last().map(|token| token.kind) != Some(TokenKind::EOF) {
            let position = tokens
                .last()
                .map(|token| token.span.end.clone())
                .unwrap_or_else(|| Position(0, Rc::clone(&file)));
            tokens.push(Token {
                kind: TokenKind::EOF,
                value: String::from("EOF"),
                span: Span {
                    start: position.clone(),
                    end: position,
                },
            });
        }

        Parser {
            tokens,
            pos: 0,
            file,
            builtins,
            stmt_lookup: HashMap::new(),
            nud_lookup: HashMap::new(),
            led_lookup: HashMap::new(),
            binding_power_lookup: HashMap::new(),
            type_nud_lookup: HashMap::new(),
            type_led_lookup: HashMap::new(),
            type_binding_power_lookup: HashMap::new(),
        }
    }

    /// Returns the current token without advancing.
    pub fn current_token(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    /// Returns the kind of the current token.
    pub fn current_token_kind(&self) -> TokenKind {
        self.current_token().kind
    }

    /// Returns the kind of the token `offset` places ahead, EOF past the end.
    pub fn peek_kind(&self, offset: usize) -> TokenKind {
        self.tokens
            .get(self.pos + offset)
            .map(|token| token.kind)
            .unwrap_or(TokenKind::EOF)
    }

    /// Tokens from the current one up to EOF.
    pub fn remaining_tokens(&self) -> &[Token] {
        &self.tokens[self.pos.min(self.tokens.len() - 1)..]
    }

    /// Advances to the next token and returns the previous token.
    ///
    /// The parser never moves past the closing EOF token.
    pub fn advance(&mut self) -> &Token {
        let index = self.pos.min(self.tokens.len() - 1);
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        &self.tokens[index]
    }

    /// Expects a token of the specified kind, with optional custom error.
    ///
    /// # Arguments
    ///
    /// * `expected_kind` - The expected TokenKind
    /// * `error` - Optional custom error to return if expectation fails
    ///
    /// # Returns
    ///
    /// Returns Ok(Token) if the current token matches, otherwise returns an Error.
    pub fn expect_error(
        &mut self,
        expected_kind: TokenKind,
        error: Option<Error>,
    ) -> Result<Token, Error> {
        if self.current_token_kind() != expected_kind {
            match error {
                Some(error) => Err(error),
                None => Err(self.unexpected_token()),
            }
        } else {
            Ok(self.advance().clone())
        }
    }

    /// Expects a token of the specified kind with default error message.
    pub fn expect(&mut self, expected_kind: TokenKind) -> Result<Token, Error> {
        self.expect_error(expected_kind, None)
    }

    /// An `UnexpectedToken` error located at the current token.
    pub fn unexpected_token(&self) -> Error {
        let token = self.current_token();
        Error::new(
            ErrorImpl::UnexpectedToken {
                token: token.to_string(),
            },
            token.span.start.clone(),
        )
    }

    /// Checks if there are more tokens to parse.
    pub fn has_tokens(&self) -> bool {
        self.current_token_kind() != TokenKind::EOF
    }

    pub fn get_builtins(&self) -> &BuiltinRegistry {
        &self.builtins
    }

    /// Returns a reference to the statement lookup table.
    pub fn get_stmt_lookup(&self) -> &StmtLookup {
        &self.stmt_lookup
    }

    /// Returns a reference to the NUD (null denotation) lookup table.
    pub fn get_nud_lookup(&self) -> &NUDLookup {
        &self.nud_lookup
    }

    /// Returns a reference to the LED (left denotation) lookup table.
    pub fn get_led_lookup(&self) -> &LEDLookup {
        &self.led_lookup
    }

    /// Returns a reference to the binding power lookup table.
    pub fn get_bp_lookup(&self) -> &BPLookup {
        &self.binding_power_lookup
    }

    /// Returns a reference to the type binding power lookup table.
    pub fn get_type_bp_lookup(&self) -> &TypeBPLookup {
        &self.type_binding_power_lookup
    }

    /// Returns a reference to the type NUD lookup table.
    pub fn get_type_nud_lookup(&self) -> &TypeNUDLookup {
        &self.type_nud_lookup
    }

    /// Returns a reference to the type LED lookup table.
    pub fn get_type_led_lookup(&self) -> &TypeLEDLookup {
        &self.type_led_lookup
    }

    /// Registers a left denotation (infix) handler for a token.
    ///
    /// # Arguments
    ///
    /// * `kind` - The token kind to register
    /// * `binding_power` - The precedence/binding power for this operator
    /// * `led_fn` - The handler function for this infix operator
    pub fn led(&mut self, kind: TokenKind, binding_power: BindingPower, led_fn: LEDHandler) {
        self.binding_power_lookup.insert(kind, binding_power);
        self.led_lookup.insert(kind, led_fn);
    }

    /// Registers a null denotation (prefix) handler for a token.
    ///
    /// Tokens that also have an infix handler keep its binding power.
    pub fn nud(&mut self, kind: TokenKind, nud_fn: NUDHandler) {
        self.binding_power_lookup
            .entry(kind)
            .or_insert(BindingPower::Primary);
        self.nud_lookup.insert(kind, nud_fn);
    }

    /// Registers a statement handler for a token.
    pub fn stmt(&mut self, kind: TokenKind, stmt_fn: StmtHandler) {
        self.stmt_lookup.insert(kind, stmt_fn);
    }

    /// Registers a type left denotation handler.
    pub fn type_led(
        &mut self,
        kind: TokenKind,
        binding_power: BindingPower,
        led_fn: TypeLEDHandler,
    ) {
        self.type_binding_power_lookup.insert(kind, binding_power);
        self.type_led_lookup.insert(kind, led_fn);
    }

    /// Registers a type null denotation handler.
    pub fn type_nud(&mut self, kind: TokenKind, nud_fn: TypeNUDHandler) {
        self.type_binding_power_lookup
            .entry(kind)
            .or_insert(BindingPower::Primary);
        self.type_nud_lookup.insert(kind, nud_fn);
    }

    /// Returns the position of the current token in the source file.
    pub fn get_position(&self) -> Position {
        self.current_token().span.start.clone()
    }

    /// Returns the end position of the last consumed token.
    pub fn get_previous_end(&self) -> Position {
        match self.pos.checked_sub(1).and_then(|index| self.tokens.get(index)) {
            Some(token) => token.span.end.clone(),
            None => Position(0, Rc::clone(&self.file)),
        }
    }
}

/// Parses a stream of tokens into a module code block.
///
/// This is the main entry point for parsing. It creates a parser instance
/// with the default builtins, initializes all lookup tables, and parses all
/// statements until EOF.
///
/// # Returns
///
/// A tuple containing:
/// - The Parser instance (with state after parsing)
/// - Result containing either the module CodeBlock or an Error
pub fn parse(tokens: Vec<Token>, file: Rc<String>) -> (Parser, Result<CodeBlock, Error>) {
    parse_with_builtins(tokens, file, BuiltinRegistry::default())
}

/// Same as [`parse`], resolving names against a custom builtin registry.
pub fn parse_with_builtins(
    tokens: Vec<Token>,
    file: Rc<String>,
    builtins: BuiltinRegistry,
) -> (Parser, Result<CodeBlock, Error>) {
    let mut parser = Parser::new(tokens, Rc::clone(&file), builtins);
    create_token_lookups(&mut parser);
    create_token_type_lookups(&mut parser);

    let mut block = CodeBlock::new(Span {
        start: Position(0, Rc::clone(&file)),
        end: Position(0, Rc::clone(&file)),
    });

    while parser.has_tokens() {
        match parse_stmt(&mut parser) {
            Ok(stmt) => block.append_child(stmt),
            Err(error) => return (parser, Err(error)),
        }
    }

    block.span.end = parser.get_position();
    debug!("Parsed {} statements", block.len());

    (parser, Ok(block))
}

/// Tokenizes and parses a Python source into a module code block.
pub fn parse_python(source: &str, file: Option<String>) -> Result<CodeBlock, Error> {
    let file_name = Rc::new(file.clone().unwrap_or_else(|| String::from("shell")));
    let tokens = tokenize(source.to_string(), file)?;
    let (_, result) = parse(tokens, file_name);
    result
}
