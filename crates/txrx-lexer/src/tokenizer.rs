use std::iter::{Enumerate, FusedIterator};
use std::str::SplitWhitespace;

use crate::token::{Span, Token};

/// TXRX source tokenizer.
///
/// Walks the source one line at a time and yields the whitespace-delimited
/// words of each line followed by a single end-of-line token. Blank lines
/// still produce their end-of-line token. Lines end at `\n`, `\r\n` or a
/// lone `\r`. There is no quoting, escaping or
/// comment syntax, so tokenizing cannot fail.
///
/// The tokenizer is lazy and single-pass: tokens are produced on demand and
/// the iterator cannot be rewound.
pub struct Tokenizer<'a> {
    lines: Enumerate<SourceLines<'a>>,
    current: Option<Line<'a>>,
}

/// Splits source text into lines without their terminators.
/// A terminator at the very end does not start another line.
struct SourceLines<'a> {
    rest: &'a str,
}

impl<'a> Iterator for SourceLines<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.rest.is_empty() {
            return None;
        }
        let (line, rest) = match self.rest.find(['\n', '\r']) {
            Some(end) => {
                let width = if self.rest[end..].starts_with("\r\n") { 2 } else { 1 };
                (&self.rest[..end], &self.rest[end + width..])
            }
            None => (self.rest, ""),
        };
        self.rest = rest;
        Some(line)
    }
}

/// The line currently being split into words.
struct Line<'a> {
    number: usize,
    text: &'a str,
    words: SplitWhitespace<'a>,
}

impl<'a> Line<'a> {
    fn new(number: usize, text: &'a str) -> Self {
        Self {
            number,
            text,
            words: text.split_whitespace(),
        }
    }

    /// 1-based character column of `word`, which must be a slice of `self.text`.
    fn column_of(&self, word: &str) -> usize {
        let offset = word.as_ptr() as usize - self.text.as_ptr() as usize;
        self.text[..offset].chars().count() + 1
    }

    /// Column one past the last character of the line.
    fn end_column(&self) -> usize {
        self.text.chars().count() + 1
    }
}

impl<'a> Tokenizer<'a> {
    /// Create a new tokenizer for the given source.
    pub fn new(source: &'a str) -> Self {
        Self {
            lines: SourceLines { rest: source }.enumerate(),
            current: None,
        }
    }

    /// Tokenize the entire source into a vector of tokens.
    pub fn tokenize(source: &str) -> Vec<Token> {
        Tokenizer::new(source).collect()
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.current.is_none() {
            let (index, text) = self.lines.next()?;
            self.current = Some(Line::new(index + 1, text));
        }
        let line = self.current.as_mut()?;

        if let Some(word) = line.words.next() {
            let span = Span::new(line.number, line.column_of(word));
            return Some(Token::word(word, span));
        }

        let span = Span::new(line.number, line.end_column());
        self.current = None;
        Some(Token::eol(span))
    }
}

impl FusedIterator for Tokenizer<'_> {}
