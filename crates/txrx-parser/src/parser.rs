//! Document parser for TXRX.
//!
//! Reads tokens from `txrx-lexer` through a one-token lookahead cursor and
//! builds a [`Document`] by recursive descent:
//!
//! ```text
//! document   := node* EOF
//! node       := BEGIN_TAG NAME? EOL values END_TAG EOL
//! values     := (node | line_value)*
//! line_value := (STR | "yes" | "no" | INT | FLOAT)+ EOL
//! ```
//!
//! The first violation aborts the parse; no partial document is returned.

use tracing::{debug, trace};
use txrx_lexer::{Cursor, Token, TokenKind, Tokenizer, EOL_TEXT};

use crate::ast::{Document, Node, ParsedLine, Value};
use crate::classify::{begin_tag_name, classify, end_tag, end_tag_name};
use crate::ParseError;

/// What the next token opens or closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker {
    Begin,
    End,
    Line,
}

impl Marker {
    fn of(token: &Token) -> Self {
        match token.as_word() {
            Some(word) if begin_tag_name(word).is_some() => Marker::Begin,
            Some(word) if end_tag_name(word).is_some() => Marker::End,
            _ => Marker::Line,
        }
    }
}

/// TXRX document parser.
///
/// Owns the cursor over a single token stream; each parse gets its own.
pub struct Parser<I: Iterator<Item = Token>> {
    cursor: Cursor<I>,
}

impl<'a> Parser<Tokenizer<'a>> {
    /// Parse source text into a document.
    pub fn parse(source: &'a str) -> Result<Document, ParseError> {
        let mut parser = Parser::new(Tokenizer::new(source));
        parser.parse_document()
    }
}

impl<I: Iterator<Item = Token>> Parser<I> {
    /// Create a new parser for the given tokens.
    pub fn new(tokens: impl IntoIterator<Item = Token, IntoIter = I>) -> Self {
        Self {
            cursor: Cursor::new(tokens),
        }
    }

    /// Parse a full document. Every top-level token must open a section.
    pub fn parse_document(&mut self) -> Result<Document, ParseError> {
        let mut document = Document::new();

        while self.cursor.has_next() {
            let token = self.cursor.peek()?;
            if Marker::of(token) != Marker::Begin {
                return Err(ParseError::MalformedTopLevel {
                    found: token.kind.to_string(),
                    line: token.span.line,
                    column: token.span.column,
                });
            }
            let at = token.span;

            let (name, node) = self.parse_node()?;
            debug!(section = %name, line = at.line, "parsed section");
            document
                .try_insert(name, node)
                .map_err(|name| ParseError::DuplicateSectionName {
                    name,
                    line: at.line,
                    column: at.column,
                })?;
        }

        debug!(sections = document.len(), "parsed document");
        Ok(document)
    }

    /// Parse one `begin_<name>` ... `end_<name>` section.
    ///
    /// Returns the section name from the tags together with the node.
    pub fn parse_node(&mut self) -> Result<(String, Node), ParseError> {
        let begin = self.cursor.next_token()?;
        let section = match begin.as_word().and_then(begin_tag_name) {
            Some(section) => section.to_string(),
            None => return Err(ParseError::unexpected("\"begin_<...>\"", &begin)),
        };

        let mut node = Node::new();
        if !self.cursor.peek()?.is_eol() {
            if let TokenKind::Word(name) = self.cursor.next_token()?.kind {
                node.name = Some(name);
            }
        }
        self.expect_eol()?;

        for line in self.parse_values()? {
            trace!(section = %section, ?line, "collected line");
            node.push(line);
        }

        self.expect_word(&end_tag(&section))?;
        self.expect_eol()?;

        Ok((section, node))
    }

    /// Parse the body of a section, stopping before its end tag.
    ///
    /// Also stops when the tokens run out; the caller then fails on the
    /// missing end tag.
    pub fn parse_values(&mut self) -> Result<Vec<ParsedLine>, ParseError> {
        let mut lines = Vec::new();

        while self.cursor.has_next() {
            match Marker::of(self.cursor.peek()?) {
                Marker::End => break,
                Marker::Begin => {
                    let (name, node) = self.parse_node()?;
                    lines.push(ParsedLine::Nested(name, node));
                }
                Marker::Line => lines.push(self.parse_line_value()?),
            }
        }

        Ok(lines)
    }

    /// Parse one line of values up to and including its end-of-line token.
    pub fn parse_line_value(&mut self) -> Result<ParsedLine, ParseError> {
        let mut values: Vec<Value> = Vec::new();

        while self.cursor.has_next() && !self.cursor.peek()?.is_eol() {
            let token = self.cursor.next_token()?;
            if let TokenKind::Word(word) = &token.kind {
                values.push(classify(word));
            }
        }
        self.expect_eol()?;

        Ok(ParsedLine::from_values(values))
    }

    // =========================================================================
    // Token helpers
    // =========================================================================

    fn expect_eol(&mut self) -> Result<(), ParseError> {
        let token = self.cursor.next_token()?;
        if token.is_eol() {
            Ok(())
        } else {
            Err(ParseError::unexpected(format!("{EOL_TEXT:?}"), &token))
        }
    }

    fn expect_word(&mut self, expected: &str) -> Result<(), ParseError> {
        let token = self.cursor.next_token()?;
        if token.as_word() == Some(expected) {
            Ok(())
        } else {
            Err(ParseError::unexpected(format!("{expected:?}"), &token))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use pretty_assertions::assert_eq;

    fn parse(source: &str) -> Document {
        Parser::parse(source).unwrap()
    }

    fn parse_err(source: &str) -> ErrorKind {
        Parser::parse(source).unwrap_err().kind()
    }

    fn only_section(doc: &Document) -> &Node {
        assert_eq!(doc.len(), 1, "expected exactly one section");
        doc.iter().next().map(|(_, node)| node).unwrap()
    }

    // =========================================================================
    // Empty / simple
    // =========================================================================

    #[test]
    fn test_empty_document() {
        assert!(parse("").is_empty());
    }

    #[test]
    fn test_empty_section() {
        let doc = parse("begin_<x>\nend_<x>\n");
        assert_eq!(doc.names().collect::<Vec<_>>(), vec!["x"]);
        assert_eq!(doc["x"], Node::new());
        assert!(doc["x"].is_empty());
    }

    #[test]
    fn test_section_name() {
        let doc = parse("begin_<atoms> water\nend_<atoms>\n");
        assert_eq!(doc["atoms"].name.as_deref(), Some("water"));
    }

    #[test]
    fn test_missing_trailing_newline() {
        let doc = parse("begin_<x>\nend_<x>");
        assert!(doc.contains("x"));
    }

    #[test]
    fn test_multiple_sections() {
        let doc = parse("begin_<b>\nend_<b>\nbegin_<a>\nend_<a>\nbegin_<c>\nend_<c>\n");
        assert_eq!(doc.names().collect::<Vec<_>>(), vec!["b", "a", "c"]);
    }

    // =========================================================================
    // Line shapes
    // =========================================================================

    #[test]
    fn test_single_token_line_is_label() {
        let doc = parse("begin_<a>\nfoo\nend_<a>\n");
        let node = &doc["a"];
        assert_eq!(node.labels, vec!["foo"]);
        assert!(node.values.is_empty());
        assert!(node.data.is_empty());
    }

    #[test]
    fn test_two_token_line_is_value() {
        let doc = parse("begin_<a>\nheight 10\nend_<a>\n");
        assert_eq!(doc["a"]["height"], Value::Int(10));
        assert_eq!(doc["a"].values.len(), 1);
    }

    #[test]
    fn test_multi_token_line_is_list_value() {
        let doc = parse("begin_<a>\npos 1 2 3\nend_<a>\n");
        assert_eq!(
            doc["a"]["pos"],
            Value::List(vec![Value::Int(1), Value::Int(2), Value::Int(3)])
        );
    }

    #[test]
    fn test_typed_values() {
        let doc = parse("begin_<a>\nvisible yes\nhidden no\nscale 0.25\noffset -3\ntitle box\nend_<a>\n");
        let node = &doc["a"];
        assert_eq!(node["visible"], Value::Bool(true));
        assert_eq!(node["hidden"], Value::Bool(false));
        assert_eq!(node["scale"], Value::Float(0.25));
        assert_eq!(node["offset"], Value::Int(-3));
        assert_eq!(node["title"], Value::Str("box".into()));
    }

    #[test]
    fn test_unlabelled_rows_are_data() {
        let doc = parse("begin_<a>\n1 2\n0.5 x yes\nno\nend_<a>\n");
        assert_eq!(
            doc["a"].data,
            vec![
                vec![Value::Int(1), Value::Int(2)],
                vec![Value::Float(0.5), Value::Str("x".into()), Value::Bool(true)],
                vec![Value::Bool(false)],
            ]
        );
        assert!(doc["a"].labels.is_empty());
    }

    #[test]
    fn test_blank_line_in_section_is_empty_row() {
        let doc = parse("begin_<a>\nfoo\n\nend_<a>\n");
        assert_eq!(doc["a"].labels, vec!["foo"]);
        assert_eq!(doc["a"].data, vec![Vec::<Value>::new()]);
    }

    #[test]
    fn test_last_write_wins_on_labels() {
        let doc = parse("begin_<a>\nx 1\nx 2 3\nx 4\nend_<a>\n");
        assert_eq!(doc["a"]["x"], Value::Int(4));
    }

    #[test]
    fn test_string_data_pair_is_read_as_value() {
        let doc = parse("begin_<a>\nH 1\nH 2\nend_<a>\n");
        assert_eq!(doc["a"]["H"], Value::Int(2));
        assert!(doc["a"].data.is_empty());
    }

    // =========================================================================
    // Nesting
    // =========================================================================

    #[test]
    fn test_nested_section_is_child() {
        let doc = parse("begin_<a>\nbegin_<b>\nend_<b>\nend_<a>\n");
        let a = &doc["a"];
        assert_eq!(a.children, vec![("b".to_string(), Node::new())]);
        assert!(a.values.is_empty());
        assert!(a.labels.is_empty());
        assert!(a.data.is_empty());
        assert!(!doc.contains("b"));
    }

    #[test]
    fn test_nested_sections_keep_order_and_repeats() {
        let doc = parse(
            "begin_<mol> water\n\
             begin_<atom> O\nx 0.0\nend_<atom>\n\
             charge 0\n\
             begin_<atom> H\nx 0.96\nend_<atom>\n\
             begin_<atom> H\nx -0.24\nend_<atom>\n\
             end_<mol>\n",
        );
        let mol = only_section(&doc);
        assert_eq!(mol.name.as_deref(), Some("water"));
        assert_eq!(mol["charge"], Value::Int(0));

        let atoms: Vec<_> = mol
            .children_named("atom")
            .map(|atom| (atom.name.clone(), atom["x"].clone()))
            .collect();
        assert_eq!(
            atoms,
            vec![
                (Some("O".to_string()), Value::Float(0.0)),
                (Some("H".to_string()), Value::Float(0.96)),
                (Some("H".to_string()), Value::Float(-0.24)),
            ]
        );
    }

    #[test]
    fn test_deep_nesting() {
        let doc = parse("begin_<a>\nbegin_<b>\nbegin_<c>\nleaf\nend_<c>\nend_<b>\nend_<a>\n");
        let c = doc["a"].child("b").and_then(|b| b.child("c")).unwrap();
        assert_eq!(c.labels, vec!["leaf"]);
    }

    #[test]
    fn test_nested_names_may_repeat_top_level_names() {
        let doc = parse("begin_<a>\nbegin_<a>\nend_<a>\nend_<a>\n");
        assert_eq!(doc["a"].children.len(), 1);
    }

    // =========================================================================
    // Errors
    // =========================================================================

    #[test]
    fn test_mismatched_end_tag() {
        assert_eq!(parse_err("begin_<a>\nend_<b>\n"), ErrorKind::UnexpectedToken);
    }

    #[test]
    fn test_truncated_input() {
        assert_eq!(parse_err("begin_<a>\n"), ErrorKind::PrematureEnd);
        assert_eq!(parse_err("begin_<a>\nfoo\n"), ErrorKind::PrematureEnd);
    }

    #[test]
    fn test_duplicate_section_name() {
        let err = Parser::parse("begin_<a>\nend_<a>\nbegin_<a>\nend_<a>\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateSectionName);
        assert_eq!(err.position(), Some((3, 1)));
    }

    #[test]
    fn test_top_level_word() {
        assert_eq!(parse_err("foo\n"), ErrorKind::MalformedTopLevel);
        assert_eq!(parse_err("end_<a>\n"), ErrorKind::MalformedTopLevel);
    }

    #[test]
    fn test_blank_line_at_top_level() {
        assert_eq!(parse_err("begin_<a>\nend_<a>\n\n"), ErrorKind::MalformedTopLevel);
    }

    #[test]
    fn test_extra_token_after_section_name() {
        let err = Parser::parse("begin_<a> n extra\nend_<a>\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedToken);
        assert_eq!(err.position(), Some((1, 13)));
    }

    #[test]
    fn test_trailing_token_after_end_tag() {
        assert_eq!(parse_err("begin_<a>\nend_<a> x\n"), ErrorKind::UnexpectedToken);
    }

    #[test]
    fn test_wide_integer_still_parses() {
        let doc = parse("begin_<a>\nid 12345678901234567890\n-99999999999999999999 1\nend_<a>\n");
        assert_eq!(
            doc["a"]["id"],
            Value::BigInt("12345678901234567890".parse().unwrap())
        );
        assert_eq!(
            doc["a"].data,
            vec![vec![
                Value::BigInt("-99999999999999999999".parse().unwrap()),
                Value::Int(1)
            ]]
        );
    }

    #[test]
    fn test_inner_mismatch_aborts_whole_parse() {
        assert_eq!(
            parse_err("begin_<a>\nbegin_<b>\nend_<a>\nend_<a>\n"),
            ErrorKind::UnexpectedToken
        );
    }

    // =========================================================================
    // Lower-level entry points
    // =========================================================================

    #[test]
    fn test_parse_node_rejects_non_tag() {
        let mut parser = Parser::new(Tokenizer::new("foo\n"));
        let err = parser.parse_node().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedToken);
    }

    #[test]
    fn test_parse_line_value_directly() {
        let mut parser = Parser::new(Tokenizer::new("pos 1 2.5\nrest\n"));
        assert_eq!(
            parser.parse_line_value().unwrap(),
            ParsedLine::KeyValues("pos".into(), vec![Value::Int(1), Value::Float(2.5)])
        );
        assert_eq!(
            parser.parse_line_value().unwrap(),
            ParsedLine::Label("rest".into())
        );
    }

    #[test]
    fn test_parse_values_stops_at_end_tag() {
        let mut parser = Parser::new(Tokenizer::new("a\nend_<x>\nb\n"));
        assert_eq!(
            parser.parse_values().unwrap(),
            vec![ParsedLine::Label("a".into())]
        );
    }
}
