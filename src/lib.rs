#![allow(clippy::module_inception)]

use std::rc::Rc;

use crate::errors::errors::{Error, ErrorTip};

pub mod ast;
pub mod builtins;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod unparser;

extern crate regex;

/// Byte offset into a source file, with the file name.
#[derive(Debug, Clone, PartialEq)]
pub struct Position(pub u32, pub Rc<String>);

impl Position {
    pub fn null() -> Self {
        Position(0, Rc::new(String::from("<null>")))
    }

    pub fn is_null(&self) -> bool {
        self.1.as_str() == "<null>"
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    /// Span of nodes built outside of any source.
    pub fn null() -> Self {
        Span {
            start: Position::null(),
            end: Position::null(),
        }
    }
}

/// Line number (from 1), line text and byte column of `position` in `content`.
///
/// The end of the content belongs to the last line.
pub fn get_line_at_position(content: &str, position: u32) -> Option<(usize, String, usize)> {
    let pos = position as usize;
    if pos > content.len() {
        return None;
    }

    let mut start = 0;
    let mut line_number = 1;
    let mut last_line = String::new();

    for line in content.split_inclusive('\n') {
        let end = start + line.len();

        if (start..end).contains(&pos) {
            return Some((line_number, line.to_string(), pos - start));
        }

        last_line = line.to_string();
        start = end;
        line_number += 1;
    }

    if last_line.ends_with('\n') || last_line.is_empty() {
        return Some((line_number, String::new(), 0));
    }

    Some((line_number - 1, last_line.clone(), last_line.len()))
}

/// Renders `error` with a caret under the offending column of `source`.
///
/// ```text
/// Error: ASTNotSupported (`Assign` syntax cannot be represented yet)
/// -> main.py
///   |
/// 1 | x = 1
///   | ^
/// ```
pub fn format_error(error: &Error, source: &str) -> String {
    let mut output = match error.get_tip() {
        ErrorTip::None => format!("Error: {}\n", error.get_error_name()),
        tip => format!("Error: {} ({})\n", error.get_error_name(), tip),
    };

    let position = error.get_position();
    if position.is_null() {
        return output;
    }
    output.push_str(&format!("-> {}\n", position.1));

    let Some((line, line_text, line_pos)) = get_line_at_position(source, position.0) else {
        return output;
    };

    let line_string = line.to_string();
    let padding = line_string.len() + 2;

    output.push_str(&format!("{:>padding$}\n", "|"));

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(&line_text);
    output.push_str(&format!("{} | {}\n", line_string, line_text_removed.trim_end()));

    let column = line_text
        .get(..line_pos)
        .map(|prefix| prefix.chars().count())
        .unwrap_or(line_pos);
    let arrows = column.saturating_sub(removed_whitespace) + 1;

    output.push_str(&format!("{:>padding$} {:->arrows$}\n", "|", "^"));
    output
}

pub fn display_error(error: &Error, source: &str) {
    print!("{}", format_error(error, source));
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let start = string
        .chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .count();

    (string.chars().skip(start).collect(), start)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{format_error, get_line_at_position, Position};
    use crate::{
        errors::errors::{Error, ErrorImpl},
        parser::parser::parse_python,
    };

    #[test]
    fn test_get_line_at_position() {
        let content = "Hello, world!\nSecond\n\nTesting { }\n";

        let (line_number, line, line_pos) = get_line_at_position(content, 10).unwrap();
        assert_eq!(line_number, 1);
        assert_eq!(line, "Hello, world!\n");
        assert_eq!(line_pos, 10);

        let (line_number, line, line_pos) = get_line_at_position(content, 30).unwrap();
        assert_eq!(line_number, 4);
        assert_eq!(line, "Testing { }\n");
        assert_eq!(line_pos, 8);

        assert_eq!(get_line_at_position(content, 100), None);
    }

    #[test]
    fn test_get_line_at_end_of_content() {
        assert_eq!(
            get_line_at_position("print(1", 7),
            Some((1, "print(1".to_string(), 7))
        );
        assert_eq!(get_line_at_position("x\n", 2), Some((2, String::new(), 0)));
        assert_eq!(get_line_at_position("", 0), Some((1, String::new(), 0)));
    }

    #[test]
    fn test_format_error() {
        let source = "print(1)\nx = 1\n";
        let error = parse_python(source, Some("main.py".to_string())).unwrap_err();

        assert_eq!(
            format_error(&error, source),
            "Error: ASTNotSupported (`Assign` syntax cannot be represented yet)\n\
             -> main.py\n\
            \x20 |\n\
             2 | x = 1\n\
            \x20 | ^\n"
        );
    }

    #[test]
    fn test_format_detached_error() {
        let error = Error::detached(ErrorImpl::PositionalFollowsKeyword);
        let formatted = format_error(&error, "");

        assert!(formatted.starts_with("Error: PositionalFollowsKeyword"));
        assert_eq!(formatted.lines().count(), 1);
        assert!(Position::null().is_null());
    }
}
