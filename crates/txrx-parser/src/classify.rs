//! Token patterns and scalar typing.
//!
//! Every pattern matches a whole token. Tags carry their section name in the
//! `name` group.

use std::sync::LazyLock;

use num_bigint::BigInt;
use regex::Regex;

use crate::ast::Value;

const TRUE_LITERAL: &str = "yes";
const FALSE_LITERAL: &str = "no";

static BEGIN_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^begin_<(?P<name>\S*)>$").expect("valid begin tag pattern"));
static END_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^end_<(?P<name>\S*)>$").expect("valid end tag pattern"));
static FLOAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?[0-9]+\.[0-9]+$").expect("valid float pattern"));
static INT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?[0-9]+$").expect("valid integer pattern"));

/// Section name of a `begin_<name>` token.
pub fn begin_tag_name(token: &str) -> Option<&str> {
    tag_name(&BEGIN_TAG, token)
}

/// Section name of an `end_<name>` token.
pub fn end_tag_name(token: &str) -> Option<&str> {
    tag_name(&END_TAG, token)
}

/// The closing tag for section `name`.
pub fn end_tag(name: &str) -> String {
    format!("end_<{name}>")
}

fn tag_name<'a>(pattern: &Regex, token: &'a str) -> Option<&'a str> {
    pattern
        .captures(token)
        .and_then(|caps| caps.name("name"))
        .map(|name| name.as_str())
}

/// Type a single token.
///
/// First match wins: `yes`, `no`, float, integer, then plain string. The
/// float check runs before the integer one so `1.0` is never read as `1`.
/// Integers wider than `i64` become [`Value::BigInt`].
pub fn classify(token: &str) -> Value {
    if token == TRUE_LITERAL {
        return Value::Bool(true);
    }
    if token == FALSE_LITERAL {
        return Value::Bool(false);
    }
    if FLOAT.is_match(token) {
        return Value::Float(token.parse().expect("float pattern is valid f64 syntax"));
    }
    if INT.is_match(token) {
        return match token.parse::<i64>() {
            Ok(i) => Value::Int(i),
            Err(_) => Value::BigInt(
                token
                    .parse::<BigInt>()
                    .expect("integer pattern is valid BigInt syntax"),
            ),
        };
    }
    Value::Str(token.to_string())
}
