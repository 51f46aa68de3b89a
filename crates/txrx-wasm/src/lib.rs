//! WASM bindings for the TXRX parser.
//!
//! Exposes `parse()` and `sections()` to JavaScript via wasm-bindgen.
//! Documents cross the boundary as plain JS objects, and parse errors are
//! thrown as JS errors.

use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Parse TXRX source into a plain JS object.
///
/// Returns `{ [section]: { name, values, labels, data, children } }`.
/// Throws a JS error if the source is malformed.
#[wasm_bindgen]
pub fn parse(source: &str) -> Result<JsValue, JsError> {
    let doc = txrx_parser::parse_str(source).map_err(|e| JsError::new(&e.to_string()))?;

    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    doc.serialize(&serializer)
        .map_err(|e| JsError::new(&format!("Failed to convert document: {e}")))
}

/// List the top-level section names of TXRX source, in source order.
#[wasm_bindgen]
pub fn sections(source: &str) -> Result<js_sys::Array, JsError> {
    let names = section_names(source).map_err(|e| JsError::new(&e.to_string()))?;
    Ok(names.iter().map(|name| JsValue::from_str(name)).collect())
}

/// Get the parser version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn section_names(source: &str) -> Result<Vec<String>, txrx_parser::ParseError> {
    let doc = txrx_parser::parse_str(source)?;
    Ok(doc.names().map(str::to_string).collect())
}
