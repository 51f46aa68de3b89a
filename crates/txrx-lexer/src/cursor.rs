use std::iter::Fuse;

use crate::token::{Span, Token, TokenKind};
use crate::LexerError;

/// One-token lookahead over a forward-only token stream.
///
/// The cursor buffers at most one token pulled from the underlying iterator.
/// `peek` fills the buffer, `next_token` drains it (or pulls a fresh token),
/// and `has_next` fills it only to check for exhaustion. Running past the end
/// is an error rather than `None`, since every caller is a grammar rule that
/// still expects input.
pub struct Cursor<I: Iterator<Item = Token>> {
    tokens: Fuse<I>,
    peeked: Option<Token>,
    end: Span,
}

impl<I: Iterator<Item = Token>> Cursor<I> {
    /// Wrap a token stream.
    pub fn new(tokens: impl IntoIterator<Item = Token, IntoIter = I>) -> Self {
        Self {
            tokens: tokens.into_iter().fuse(),
            peeked: None,
            end: Span::new(1, 1),
        }
    }

    /// Whether at least one more token is available. Never consumes.
    pub fn has_next(&mut self) -> bool {
        self.fill();
        self.peeked.is_some()
    }

    /// The next token, without consuming it.
    pub fn peek(&mut self) -> Result<&Token, LexerError> {
        self.fill();
        let end = self.end;
        self.peeked.as_ref().ok_or_else(|| LexerError::exhausted(end))
    }

    /// Consume and return the next token.
    pub fn next_token(&mut self) -> Result<Token, LexerError> {
        self.fill();
        self.peeked.take().ok_or_else(|| LexerError::exhausted(self.end))
    }

    /// Position just past the last token pulled from the stream.
    pub fn position(&self) -> Span {
        self.end
    }

    fn fill(&mut self) {
        if self.peeked.is_some() {
            return;
        }
        if let Some(token) = self.tokens.next() {
            self.end = match &token.kind {
                TokenKind::Word(word) => {
                    Span::new(token.span.line, token.span.column + word.chars().count())
                }
                TokenKind::Eol => Span::new(token.span.line + 1, 1),
            };
            self.peeked = Some(token);
        }
    }
}
