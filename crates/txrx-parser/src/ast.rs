//! Document tree for TXRX.
//!
//! A [`Document`] maps each top-level section name to its [`Node`]. A node
//! keeps the lines of its section sorted into labels, labelled values,
//! unlabelled data rows and nested child sections. Sections and labelled
//! values keep their source order.

use std::ops::Index;

use indexmap::map::{self, Entry, IndexMap};
use num_bigint::BigInt;
use serde::{Serialize, Serializer};

// ---------------------------------------------------------------------------
// Values
// ---------------------------------------------------------------------------

/// A typed scalar read from a line, or the tail of a multi-value line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    /// An integer too wide for `i64`. Serialized as a decimal string.
    BigInt(#[serde(serialize_with = "serialize_decimal")] BigInt),
    Float(f64),
    Str(String),
    /// The values following a label on a line with three or more tokens.
    List(Vec<Value>),
}

impl Value {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Any integer, whatever its width.
    pub fn as_big_int(&self) -> Option<BigInt> {
        match self {
            Value::Int(i) => Some(BigInt::from(*i)),
            Value::BigInt(n) => Some(n.clone()),
            _ => None,
        }
    }

    /// Floats as-is, `i64` integers widened.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }
}

fn serialize_decimal<S: Serializer>(n: &BigInt, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(n)
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<BigInt> for Value {
    fn from(n: BigInt) -> Self {
        Value::BigInt(n)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

// ---------------------------------------------------------------------------
// Parsed lines
// ---------------------------------------------------------------------------

/// One entry collected from the body of a section.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedLine {
    /// A line holding a single string token.
    Label(String),
    /// A string followed by exactly one value.
    KeyValue(String, Value),
    /// A string followed by two or more values.
    KeyValues(String, Vec<Value>),
    /// Anything that does not start with a string, including blank lines.
    Data(Vec<Value>),
    /// A nested `begin_<name>` / `end_<name>` section.
    Nested(String, Node),
}

impl ParsedLine {
    /// Sort the classified tokens of one line by shape.
    pub fn from_values(values: Vec<Value>) -> Self {
        let mut values = values.into_iter();
        match values.next() {
            Some(Value::Str(label)) => {
                let mut rest: Vec<Value> = values.collect();
                match rest.len() {
                    0 => ParsedLine::Label(label),
                    1 => ParsedLine::KeyValue(label, rest.remove(0)),
                    _ => ParsedLine::KeyValues(label, rest),
                }
            }
            first => ParsedLine::Data(first.into_iter().chain(values).collect()),
        }
    }
}

// ---------------------------------------------------------------------------
// Nodes
// ---------------------------------------------------------------------------

/// A parsed `begin_<...>` / `end_<...>` section.
///
/// `node["key"]` is shorthand for `node.values["key"]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Node {
    /// Optional name given after the opening tag, e.g. `begin_<atom> carbon`.
    pub name: Option<String>,
    pub values: IndexMap<String, Value>,
    pub labels: Vec<String>,
    pub data: Vec<Vec<Value>>,
    /// Nested sections in source order. Names may repeat.
    pub children: Vec<(String, Node)>,
}

impl Node {
    pub fn new() -> Self {
        Self::default()
    }

    /// A node carrying the name from its opening line.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// File a parsed line under the matching collection.
    /// A repeated label overwrites the earlier value.
    pub fn push(&mut self, line: ParsedLine) {
        match line {
            ParsedLine::Label(label) => self.labels.push(label),
            ParsedLine::KeyValue(label, value) => {
                self.values.insert(label, value);
            }
            ParsedLine::KeyValues(label, values) => {
                self.values.insert(label, Value::List(values));
            }
            ParsedLine::Data(row) => self.data.push(row),
            ParsedLine::Nested(name, node) => self.children.push((name, node)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Set a labelled value, returning the one it replaced.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(key.into(), value.into())
    }

    /// Drop a labelled value; the remaining values keep their order.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.shift_remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    /// The first nested section called `name`.
    pub fn child(&self, name: &str) -> Option<&Node> {
        self.children
            .iter()
            .find(|(child, _)| child == name)
            .map(|(_, node)| node)
    }

    /// Every nested section called `name`, in source order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Node> + 'a {
        self.children
            .iter()
            .filter(move |(child, _)| child == name)
            .map(|(_, node)| node)
    }

    /// True when the section had no name and no body.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.values.is_empty()
            && self.labels.is_empty()
            && self.data.is_empty()
            && self.children.is_empty()
    }
}

impl Index<&str> for Node {
    type Output = Value;

    fn index(&self, key: &str) -> &Value {
        match self.values.get(key) {
            Some(value) => value,
            None => panic!("no value labelled {key:?} in node"),
        }
    }
}

// ---------------------------------------------------------------------------
// Documents
// ---------------------------------------------------------------------------

/// A complete TXRX document: top-level section name to node.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Document {
    sections: IndexMap<String, Node>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a top-level section. Hands the name back if it is already taken.
    pub fn try_insert(&mut self, name: String, node: Node) -> Result<(), String> {
        match self.sections.entry(name) {
            Entry::Occupied(taken) => Err(taken.key().clone()),
            Entry::Vacant(slot) => {
                slot.insert(node);
                Ok(())
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Node> {
        self.sections.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.sections.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Section names in source order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    pub fn iter(&self) -> map::Iter<'_, String, Node> {
        self.sections.iter()
    }
}

impl Index<&str> for Document {
    type Output = Node;

    fn index(&self, name: &str) -> &Node {
        match self.sections.get(name) {
            Some(node) => node,
            None => panic!("no section named {name:?} in document"),
        }
    }
}

impl IntoIterator for Document {
    type Item = (String, Node);
    type IntoIter = map::IntoIter<String, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.sections.into_iter()
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = (&'a String, &'a Node);
    type IntoIter = map::Iter<'a, String, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.sections.iter()
    }
}
