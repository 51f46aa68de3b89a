//! TXRX Lexer
//!
//! Splits `.txrx` source into whitespace-delimited words, with an explicit
//! end-of-line token after every source line, and provides the one-token
//! lookahead [`Cursor`] the parser reads them through.
//!
//! # Example
//!
//! ```
//! use txrx_lexer::{Cursor, TokenKind, Tokenizer};
//!
//! let mut cursor = Cursor::new(Tokenizer::new("height 10\n"));
//! assert_eq!(cursor.peek().unwrap().kind, TokenKind::Word("height".into()));
//! assert_eq!(cursor.next_token().unwrap().as_word(), Some("height"));
//! ```

pub mod cursor;
pub mod token;
pub mod tokenizer;

pub use cursor::Cursor;
pub use token::{Span, Token, TokenKind, EOL_TEXT};
pub use tokenizer::Tokenizer;

/// Lexer error with position information.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexerError {
    /// The token stream ran out while more input was required.
    #[error("Unexpected end of input at line {line}, column {column}")]
    Exhausted { line: usize, column: usize },
}

impl LexerError {
    pub(crate) fn exhausted(at: Span) -> Self {
        LexerError::Exhausted {
            line: at.line,
            column: at.column,
        }
    }
}
