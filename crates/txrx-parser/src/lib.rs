//! TXRX Parser
//!
//! Parses `.txrx` source into a [`Document`]: a map from top-level section
//! name to a [`Node`] holding that section's labels, labelled values,
//! unlabelled data rows and nested sections.
//!
//! ```text
//! begin_<shape> box
//! visible
//! height 10
//! pos 1 2 3
//! end_<shape>
//! ```
//!
//! # Example
//!
//! ```
//! use txrx_parser::{parse_str, Value};
//!
//! let doc = parse_str("begin_<shape> box\nheight 10\nend_<shape>\n").unwrap();
//! assert_eq!(doc["shape"].name.as_deref(), Some("box"));
//! assert_eq!(doc["shape"]["height"], Value::Int(10));
//! ```

pub mod ast;
pub mod classify;
pub mod parser;

use std::path::{Path, PathBuf};

pub use ast::{Document, Node, ParsedLine, Value};
pub use parser::Parser;

use txrx_lexer::{LexerError, Token};

/// Parser error with position information.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// A specific token (end of line, a matching end tag) was required.
    #[error("Parse error at line {line}, column {column}: expected {expected}, got {found}")]
    UnexpectedToken {
        expected: String,
        found: String,
        line: usize,
        column: usize,
    },

    /// Input ran out while the grammar still expected tokens.
    #[error("Parse error at line {line}, column {column}: unexpected end of input")]
    PrematureEnd { line: usize, column: usize },

    /// Something other than `begin_<...>` at the top level.
    #[error("Parse error at line {line}, column {column}: non-section token {found} at the top level")]
    MalformedTopLevel {
        found: String,
        line: usize,
        column: usize,
    },

    /// Two top-level sections share a name.
    #[error("Parse error at line {line}, column {column}: duplicate section name {name:?}")]
    DuplicateSectionName {
        name: String,
        line: usize,
        column: usize,
    },

    /// The source file could not be read.
    #[error("Could not read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Discriminant of [`ParseError`], for matching without the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UnexpectedToken,
    PrematureEnd,
    MalformedTopLevel,
    DuplicateSectionName,
    Io,
}

impl ParseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ParseError::UnexpectedToken { .. } => ErrorKind::UnexpectedToken,
            ParseError::PrematureEnd { .. } => ErrorKind::PrematureEnd,
            ParseError::MalformedTopLevel { .. } => ErrorKind::MalformedTopLevel,
            ParseError::DuplicateSectionName { .. } => ErrorKind::DuplicateSectionName,
            ParseError::Io { .. } => ErrorKind::Io,
        }
    }

    /// Source position of the error, if it came from the text itself.
    pub fn position(&self) -> Option<(usize, usize)> {
        match self {
            ParseError::UnexpectedToken { line, column, .. }
            | ParseError::PrematureEnd { line, column }
            | ParseError::MalformedTopLevel { line, column, .. }
            | ParseError::DuplicateSectionName { line, column, .. } => Some((*line, *column)),
            ParseError::Io { .. } => None,
        }
    }

    pub(crate) fn unexpected(expected: impl Into<String>, found: &Token) -> Self {
        ParseError::UnexpectedToken {
            expected: expected.into(),
            found: found.kind.to_string(),
            line: found.span.line,
            column: found.span.column,
        }
    }
}

impl From<LexerError> for ParseError {
    fn from(e: LexerError) -> Self {
        match e {
            LexerError::Exhausted { line, column } => ParseError::PrematureEnd { line, column },
        }
    }
}

/// Parse TXRX source text.
pub fn parse_str(source: &str) -> Result<Document, ParseError> {
    Parser::parse(source)
}

/// Read and parse a TXRX file.
pub fn parse_file(path: impl AsRef<Path>) -> Result<Document, ParseError> {
    let path = path.as_ref();
    tracing::debug!(path = %path.display(), "reading source");
    let source = std::fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Parser::parse(&source)
}
