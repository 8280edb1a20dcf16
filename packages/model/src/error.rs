use regex::Regex;
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;

/// Fatal failure to turn text into a document tree
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct ParseError {
    pub message: String,
    pub line: Option<usize>,
    pub column: Option<usize>,
}

impl ParseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            line: None,
            column: None,
        }
    }

    pub fn at(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            message: message.into(),
            line: Some(line),
            column: Some(column),
        }
    }

    /// Content that could not be mapped to a known element,
    /// e.g. a document whose root is not `<definitions>`
    pub fn unparsable(element: &str, line: usize, column: usize, nested: impl fmt::Display) -> Self {
        Self::at(
            format!(
                "unparsable content <{element}> detected\n\tline: {line}\n\tcolumn: {column}\n\tnested error: {nested}"
            ),
            line,
            column,
        )
    }

    /// Add a hint to messages reporting unparsable content, which usually
    /// means the input is not a DMN 1.1 file at all
    pub fn refine(mut self) -> Self {
        static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
        let pattern = PATTERN
            .get_or_init(|| Regex::new(r"unparsable content <([^>]+)> detected([\s\S]*)$").ok());

        if let Some(pattern) = pattern {
            if let Some(caps) = pattern.captures(&self.message) {
                let element = caps.get(1).map_or("", |m| m.as_str());
                let rest = caps.get(2).map_or("", |m| m.as_str());
                self.message = format!(
                    "unparsable content <{element}> detected; this may indicate an invalid DMN 1.1 diagram file{rest}"
                );
            }
        }
        self
    }
}

/// Failure to turn a document tree back into text
#[derive(Error, Debug, Clone, PartialEq)]
#[error("failed to serialize document: {message}")]
pub struct SerializeError {
    pub message: String,
}

impl SerializeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Non-fatal structural problem found while parsing
#[derive(Debug, Clone, PartialEq)]
pub struct Warning {
    pub message: String,
    pub element_id: Option<String>,
    pub line: Option<usize>,
    pub column: Option<usize>,
}

impl Warning {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            element_id: None,
            line: None,
            column: None,
        }
    }

    pub fn with_element(mut self, id: impl Into<String>) -> Self {
        self.element_id = Some(id.into());
        self
    }

    pub fn with_position(mut self, line: usize, column: usize) -> Self {
        self.line = Some(line);
        self.column = Some(column);
        self
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let (Some(line), Some(column)) = (self.line, self.column) {
            write!(f, " (line {line}, column {column})")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refine_unparsable_content() {
        let err = ParseError::unparsable("Foo", 0, 0, "unrecognized element <Foo>").refine();
        assert!(err
            .message
            .starts_with("unparsable content <Foo> detected; this may indicate an invalid DMN 1.1 diagram file"));
        assert!(err.message.ends_with("nested error: unrecognized element <Foo>"));
        assert_eq!(err.line, Some(0));
    }

    #[test]
    fn test_refine_leaves_other_messages_alone() {
        let err = ParseError::new("unexpected end of file").refine();
        assert_eq!(err.message, "unexpected end of file");
    }

    #[test]
    fn test_warning_display_includes_position() {
        let warning = Warning::new("duplicate ID <d1>").with_position(3, 7);
        assert_eq!(warning.to_string(), "duplicate ID <d1> (line 3, column 7)");
    }
}
