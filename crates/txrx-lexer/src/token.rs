use std::fmt;

/// Textual rendering of the end-of-line marker.
pub const EOL_TEXT: &str = "\n";

/// A position in source text, tracking line and column for error reporting.
///
/// Lines and columns are 1-based. Columns count characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub line: usize,
    pub column: usize,
}

impl Span {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Token classification for TXRX source.
///
/// A line is a run of `Word`s followed by exactly one `Eol`. Since the
/// end-of-line marker is its own variant, no word can ever be mistaken for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// A whitespace-delimited run of characters.
    Word(String),
    /// End of a source line.
    Eol,
}

impl TokenKind {
    /// The word text, or `None` for the end-of-line marker.
    pub fn as_word(&self) -> Option<&str> {
        match self {
            TokenKind::Word(word) => Some(word),
            TokenKind::Eol => None,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Word(word) => write!(f, "{word:?}"),
            TokenKind::Eol => write!(f, "{EOL_TEXT:?}"),
        }
    }
}

/// A token produced by the TXRX tokenizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn word(text: impl Into<String>, span: Span) -> Self {
        Self::new(TokenKind::Word(text.into()), span)
    }

    pub fn eol(span: Span) -> Self {
        Self::new(TokenKind::Eol, span)
    }

    pub fn is_eol(&self) -> bool {
        matches!(self.kind, TokenKind::Eol)
    }

    pub fn as_word(&self) -> Option<&str> {
        self.kind.as_word()
    }
}
