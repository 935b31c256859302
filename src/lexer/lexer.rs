use std::{iter::Peekable, rc::Rc, str::Chars};

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::{
    errors::errors::{Error, ErrorImpl},
    Position, Span, MK_DEFAULT_HANDLER, MK_TOKEN,
};

use super::tokens::{Token, TokenKind, RESERVED_LOOKUP};

pub type RegexHandler = fn(&mut Lexer, &Regex) -> Result<(), Error>;

/// Columns a tab advances to, as in CPython's tokenizer.
const TAB_SIZE: usize = 8;

pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler,
}

fn pattern(regex: &str, handler: RegexHandler) -> RegexPattern {
    RegexPattern {
        regex: Regex::new(regex).unwrap(),
        handler,
    }
}

lazy_static! {
    /// Tried in order at the current offset, every regex is anchored.
    static ref PATTERNS: Vec<RegexPattern> = vec![
        pattern(r"^[ \t\x0c]+", skip_handler),
        pattern(r"^\\\r?\n", skip_handler),
        pattern(r"^#[^\r\n]*", skip_handler),
        pattern(r"^\r?\n", newline_handler),
        pattern(r#"^(?i:rb|br|fr|rf|r|b|u|f)?('''|"""|'|")"#, string_handler),
        pattern(
            r"^(?:0[xX](?:_?[0-9a-fA-F])+|0[oO](?:_?[0-7])+|0[bB](?:_?[01])+|(?:[0-9](?:_?[0-9])*\.(?:[0-9](?:_?[0-9])*)?|\.[0-9](?:_?[0-9])*)(?:[eE][+-]?[0-9](?:_?[0-9])*)?[jJ]?|[0-9](?:_?[0-9])*(?:[eE][+-]?[0-9](?:_?[0-9])*)?[jJ]?)",
            number_handler,
        ),
        pattern(r"^[\p{XID_Start}_]\p{XID_Continue}*", symbol_handler),
        pattern(r"^[(\[{]", open_bracket_handler),
        pattern(r"^[)\]}]", close_bracket_handler),
        pattern(r"^\.\.\.", MK_DEFAULT_HANDLER!(TokenKind::Ellipsis, "...")),
        pattern(r"^\*\*=", MK_DEFAULT_HANDLER!(TokenKind::AugAssign, "**=")),
        pattern(r"^//=", MK_DEFAULT_HANDLER!(TokenKind::AugAssign, "//=")),
        pattern(r"^>>=", MK_DEFAULT_HANDLER!(TokenKind::AugAssign, ">>=")),
        pattern(r"^<<=", MK_DEFAULT_HANDLER!(TokenKind::AugAssign, "<<=")),
        pattern(r"^->", MK_DEFAULT_HANDLER!(TokenKind::Arrow, "->")),
        pattern(r"^:=", MK_DEFAULT_HANDLER!(TokenKind::Walrus, ":=")),
        pattern(r"^==", MK_DEFAULT_HANDLER!(TokenKind::Equals, "==")),
        pattern(r"^!=", MK_DEFAULT_HANDLER!(TokenKind::NotEquals, "!=")),
        pattern(r"^<=", MK_DEFAULT_HANDLER!(TokenKind::LessEquals, "<=")),
        pattern(r"^>=", MK_DEFAULT_HANDLER!(TokenKind::GreaterEquals, ">=")),
        pattern(r"^\*\*", MK_DEFAULT_HANDLER!(TokenKind::DoubleStar, "**")),
        pattern(r"^//", MK_DEFAULT_HANDLER!(TokenKind::DoubleSlash, "//")),
        pattern(r"^<<", MK_DEFAULT_HANDLER!(TokenKind::LeftShift, "<<")),
        pattern(r"^>>", MK_DEFAULT_HANDLER!(TokenKind::RightShift, ">>")),
        pattern(r"^\+=", MK_DEFAULT_HANDLER!(TokenKind::AugAssign, "+=")),
        pattern(r"^-=", MK_DEFAULT_HANDLER!(TokenKind::AugAssign, "-=")),
        pattern(r"^\*=", MK_DEFAULT_HANDLER!(TokenKind::AugAssign, "*=")),
        pattern(r"^/=", MK_DEFAULT_HANDLER!(TokenKind::AugAssign, "/=")),
        pattern(r"^%=", MK_DEFAULT_HANDLER!(TokenKind::AugAssign, "%=")),
        pattern(r"^@=", MK_DEFAULT_HANDLER!(TokenKind::AugAssign, "@=")),
        pattern(r"^&=", MK_DEFAULT_HANDLER!(TokenKind::AugAssign, "&=")),
        pattern(r"^\|=", MK_DEFAULT_HANDLER!(TokenKind::AugAssign, "|=")),
        pattern(r"^\^=", MK_DEFAULT_HANDLER!(TokenKind::AugAssign, "^=")),
        pattern(r"^<", MK_DEFAULT_HANDLER!(TokenKind::Less, "<")),
        pattern(r"^>", MK_DEFAULT_HANDLER!(TokenKind::Greater, ">")),
        pattern(r"^=", MK_DEFAULT_HANDLER!(TokenKind::Assignment, "=")),
        pattern(r"^\+", MK_DEFAULT_HANDLER!(TokenKind::Plus, "+")),
        pattern(r"^-", MK_DEFAULT_HANDLER!(TokenKind::Dash, "-")),
        pattern(r"^\*", MK_DEFAULT_HANDLER!(TokenKind::Star, "*")),
        pattern(r"^/", MK_DEFAULT_HANDLER!(TokenKind::Slash, "/")),
        pattern(r"^%", MK_DEFAULT_HANDLER!(TokenKind::Percent, "%")),
        pattern(r"^@", MK_DEFAULT_HANDLER!(TokenKind::At, "@")),
        pattern(r"^\|", MK_DEFAULT_HANDLER!(TokenKind::Pipe, "|")),
        pattern(r"^&", MK_DEFAULT_HANDLER!(TokenKind::Ampersand, "&")),
        pattern(r"^\^", MK_DEFAULT_HANDLER!(TokenKind::Caret, "^")),
        pattern(r"^~", MK_DEFAULT_HANDLER!(TokenKind::Tilde, "~")),
        pattern(r"^\.", MK_DEFAULT_HANDLER!(TokenKind::Dot, ".")),
        pattern(r"^,", MK_DEFAULT_HANDLER!(TokenKind::Comma, ",")),
        pattern(r"^:", MK_DEFAULT_HANDLER!(TokenKind::Colon, ":")),
        pattern(r"^;", MK_DEFAULT_HANDLER!(TokenKind::Semicolon, ";")),
    ];
}

pub struct Lexer {
    tokens: Vec<Token>,
    source: String,
    pos: usize,
    file: Rc<String>,
    /// Columns of the enclosing indented blocks, starting with 0
    indent_stack: Vec<usize>,
    /// Newlines are insignificant inside brackets
    bracket_depth: usize,
    at_line_start: bool,
}

impl Lexer {
    pub fn new(source: String, file: Option<String>) -> Lexer {
        let file_name = if let Some(file) = file {
            Rc::new(file)
        } else {
            Rc::new(String::from("shell"))
        };

        Lexer {
            tokens: vec![],
            source,
            pos: 0,
            file: file_name,
            indent_stack: vec![0],
            bracket_depth: 0,
            at_line_start: true,
        }
    }

    pub fn advance_n(&mut self, n: usize) {
        self.pos += n;
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    pub fn at(&self) -> Option<char> {
        self.remainder().chars().next()
    }

    pub fn remainder(&self) -> &str {
        &self.source[self.pos..]
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    pub fn position(&self) -> Position {
        Position(self.pos as u32, Rc::clone(&self.file))
    }

    /// Span of the next `length` bytes.
    pub fn span_of(&self, length: usize) -> Span {
        Span {
            start: self.position(),
            end: Position((self.pos + length) as u32, Rc::clone(&self.file)),
        }
    }

    fn last_kind(&self) -> Option<TokenKind> {
        self.tokens.last().map(|token| token.kind)
    }

    fn unrecognised(&self) -> Error {
        let token = self.at().map(String::from).unwrap_or_default();
        Error::new(ErrorImpl::UnrecognisedToken { token }, self.position())
    }

    /// Measures the indentation of a logical line and emits INDENT or DEDENT
    /// tokens. Blank and comment-only lines leave the indentation untouched.
    fn handle_indentation(&mut self) -> Result<(), Error> {
        self.at_line_start = false;

        let mut column = 0;
        let mut length = 0;
        for ch in self.remainder().chars() {
            match ch {
                ' ' => column += 1,
                '\t' => column = (column / TAB_SIZE + 1) * TAB_SIZE,
                '\x0c' => column = 0,
                _ => break,
            }
            length += 1;
        }
        self.advance_n(length);

        if matches!(self.at(), None | Some('\n') | Some('\r') | Some('#')) {
            return Ok(());
        }

        let current = self.indent_stack.last().copied().unwrap_or(0);
        if column > current {
            let opens_block = self.tokens.len() >= 2
                && self.tokens[self.tokens.len() - 2].kind == TokenKind::Colon;
            if !opens_block {
                return Err(Error::new(ErrorImpl::UnexpectedIndent, self.position()));
            }

            self.indent_stack.push(column);
            let span = self.span_of(0);
            self.push(MK_TOKEN!(TokenKind::Indent, String::new(), span));
            return Ok(());
        }

        while let Some(&top) = self.indent_stack.last() {
            if column >= top {
                break;
            }
            self.indent_stack.pop();
            let span = self.span_of(0);
            self.push(MK_TOKEN!(TokenKind::Dedent, String::new(), span));
        }

        if self.indent_stack.last().copied().unwrap_or(0) != column {
            return Err(Error::new(
                ErrorImpl::InconsistentIndentation,
                self.position(),
            ));
        }

        Ok(())
    }

    /// Closes the last logical line and every open block.
    fn finish(&mut self) {
        if !matches!(self.last_kind(), None | Some(TokenKind::Newline)) {
            let span = self.span_of(0);
            self.push(MK_TOKEN!(TokenKind::Newline, String::new(), span));
        }

        while self.indent_stack.len() > 1 {
            self.indent_stack.pop();
            let span = self.span_of(0);
            self.push(MK_TOKEN!(TokenKind::Dedent, String::new(), span));
        }

        let span = self.span_of(0);
        self.push(MK_TOKEN!(TokenKind::EOF, String::from("EOF"), span));
    }
}

fn find_match<'a>(lexer: &'a Lexer, regex: &Regex) -> Result<&'a str, Error> {
    match regex.find(lexer.remainder()) {
        Some(matched) => Ok(matched.as_str()),
        None => Err(lexer.unrecognised()),
    }
}

fn skip_handler(lexer: &mut Lexer, regex: &Regex) -> Result<(), Error> {
    let length = find_match(lexer, regex)?.len();
    lexer.advance_n(length);
    Ok(())
}

fn newline_handler(lexer: &mut Lexer, regex: &Regex) -> Result<(), Error> {
    let length = find_match(lexer, regex)?.len();

    if lexer.bracket_depth == 0 {
        if !matches!(lexer.last_kind(), None | Some(TokenKind::Newline)) {
            let span = lexer.span_of(length);
            lexer.push(MK_TOKEN!(TokenKind::Newline, String::from("\n"), span));
        }
        lexer.at_line_start = true;
    }

    lexer.advance_n(length);
    Ok(())
}

fn number_handler(lexer: &mut Lexer, regex: &Regex) -> Result<(), Error> {
    let matched = find_match(lexer, regex)?.to_string();
    let span = lexer.span_of(matched.len());
    let length = matched.len();

    lexer.push(MK_TOKEN!(TokenKind::Number, matched, span));
    lexer.advance_n(length);
    Ok(())
}

fn symbol_handler(lexer: &mut Lexer, regex: &Regex) -> Result<(), Error> {
    let value = find_match(lexer, regex)?.to_string();
    let span = lexer.span_of(value.len());
    let length = value.len();

    let kind = RESERVED_LOOKUP
        .get(value.as_str())
        .copied()
        .unwrap_or(TokenKind::Identifier);

    lexer.push(MK_TOKEN!(kind, value, span));
    lexer.advance_n(length);
    Ok(())
}

fn open_bracket_handler(lexer: &mut Lexer, regex: &Regex) -> Result<(), Error> {
    let value = find_match(lexer, regex)?.to_string();
    let kind = match value.as_str() {
        "(" => TokenKind::OpenParen,
        "[" => TokenKind::OpenBracket,
        _ => TokenKind::OpenCurly,
    };

    let span = lexer.span_of(1);
    lexer.push(MK_TOKEN!(kind, value, span));
    lexer.bracket_depth += 1;
    lexer.advance_n(1);
    Ok(())
}

fn close_bracket_handler(lexer: &mut Lexer, regex: &Regex) -> Result<(), Error> {
    let value = find_match(lexer, regex)?.to_string();
    let kind = match value.as_str() {
        ")" => TokenKind::CloseParen,
        "]" => TokenKind::CloseBracket,
        _ => TokenKind::CloseCurly,
    };

    let span = lexer.span_of(1);
    lexer.push(MK_TOKEN!(kind, value, span));
    lexer.bracket_depth = lexer.bracket_depth.saturating_sub(1);
    lexer.advance_n(1);
    Ok(())
}

/// Scans a string literal of any prefix and quoting style.
///
/// The regex only matches the prefix and opening quote, the closing quote is
/// searched by hand so that escaped quotes are skipped.
fn string_handler(lexer: &mut Lexer, regex: &Regex) -> Result<(), Error> {
    let (prefix, quote) = match regex.captures(lexer.remainder()) {
        Some(captures) => match (captures.get(0), captures.get(1)) {
            (Some(whole), Some(quote)) => (
                whole.as_str()[..quote.start()].to_ascii_lowercase(),
                quote.as_str().to_string(),
            ),
            _ => return Err(lexer.unrecognised()),
        },
        None => return Err(lexer.unrecognised()),
    };

    let body_start = prefix.len() + quote.len();
    let rest = &lexer.remainder()[body_start..];
    let triple = quote.len() == 3;

    let mut end = None;
    let mut chars = rest.char_indices();
    while let Some((index, ch)) = chars.next() {
        match ch {
            '\\' => {
                chars.next();
            }
            '\n' if !triple => break,
            _ if rest[index..].starts_with(quote.as_str()) => {
                end = Some(index);
                break;
            }
            _ => {}
        }
    }

    let Some(end) = end else {
        return Err(Error::new(ErrorImpl::UnterminatedString, lexer.position()));
    };

    let body = &rest[..end];
    let is_bytes = prefix.contains('b');
    let value = if prefix.contains('r') {
        body.to_string()
    } else {
        unescape(body, is_bytes)
    };

    let kind = if is_bytes {
        TokenKind::Bytes
    } else if prefix.contains('f') {
        TokenKind::FString
    } else {
        TokenKind::String
    };

    let length = body_start + end + quote.len();
    let span = lexer.span_of(length);
    lexer.push(MK_TOKEN!(kind, value, span));
    lexer.advance_n(length);
    Ok(())
}

/// Reads exactly `digits` hex digits as a code point. On failure the consumed
/// digits are returned so they can be kept verbatim.
fn read_hex(chars: &mut Peekable<Chars>, digits: usize) -> Result<char, String> {
    let mut hex = String::new();
    while hex.len() < digits {
        match chars.peek() {
            Some(ch) if ch.is_ascii_hexdigit() => {
                hex.push(*ch);
                chars.next();
            }
            _ => break,
        }
    }

    if hex.len() < digits {
        return Err(hex);
    }

    u32::from_str_radix(&hex, 16)
        .ok()
        .and_then(char::from_u32)
        .ok_or(hex)
}

fn unescape(body: &str, is_bytes: bool) -> String {
    let mut result = String::new();
    let mut chars = body.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            result.push(ch);
            continue;
        }

        let Some(escaped) = chars.next() else {
            result.push('\\');
            break;
        };

        match escaped {
            '\n' => {}
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
            }
            '\\' | '\'' | '"' => result.push(escaped),
            'a' => result.push('\x07'),
            'b' => result.push('\x08'),
            'f' => result.push('\x0c'),
            'n' => result.push('\n'),
            'r' => result.push('\r'),
            't' => result.push('\t'),
            'v' => result.push('\x0b'),
            '0'..='7' => {
                let mut value = escaped.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match chars.peek().and_then(|next| next.to_digit(8)) {
                        Some(digit) => {
                            value = value * 8 + digit;
                            chars.next();
                        }
                        None => break,
                    }
                }
                result.extend(char::from_u32(value));
            }
            'x' | 'u' | 'U' if !(is_bytes && escaped != 'x') => {
                let digits = match escaped {
                    'x' => 2,
                    'u' => 4,
                    _ => 8,
                };
                match read_hex(&mut chars, digits) {
                    Ok(decoded) => result.push(decoded),
                    Err(consumed) => {
                        result.push('\\');
                        result.push(escaped);
                        result.push_str(&consumed);
                    }
                }
            }
            other => {
                result.push('\\');
                result.push(other);
            }
        }
    }

    result
}

pub fn tokenize(source: String, file: Option<String>) -> Result<Vec<Token>, Error> {
    let mut lex = Lexer::new(source, file);

    while !lex.at_eof() {
        if lex.at_line_start {
            lex.handle_indentation()?;
            if lex.at_eof() {
                break;
            }
        }

        let mut matched = false;

        for pattern in PATTERNS.iter() {
            if pattern.regex.is_match(lex.remainder()) {
                (pattern.handler)(&mut lex, &pattern.regex)?;
                matched = true;
                break;
            }
        }

        if !matched {
            return Err(lex.unrecognised());
        }
    }

    lex.finish();
    debug!(file = %lex.file, tokens = lex.tokens.len(), "tokenized");
    Ok(lex.tokens)
}
