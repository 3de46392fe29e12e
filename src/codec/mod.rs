//! Fragment wire format.
//!
//! | Form | Pattern | Semantics |
//! |---|---|---|
//! | Empty | `` or `#` or `#!` | Canonical empty state `{}` |
//! | Standard | `#!<percent-encoded JSON object>` | Full replace |
//! | Legacy additive | `#!+<percent-encoded URL-safe JSON object>` | Merge, no reset |
//! | Remote reference | `#!<scheme>://<url>` | Fetch JSON object, full replace |

mod escape;
mod form;

pub use escape::{decode_component, encode_fragment, FRAGMENT_ESCAPE};
pub use form::{canonical_fragment, classify, FragmentForm, EMPTY_STATE_FRAGMENT};

use crate::error::{Result, UrlSyncError};
use serde_json::{Map, Value};

/// JSON text of the empty state.
pub const EMPTY_OBJECT: &str = "{}";

/// A serialized state: its JSON text and the fragment-escaped form of it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedState {
    pub json: String,
    pub escaped: String,
}

impl EncodedState {
    pub fn from_value(value: &Value) -> Self {
        let json = value.to_string();
        let escaped = encode_fragment(&json);
        Self { json, escaped }
    }

    pub fn is_empty_object(&self) -> bool {
        self.json == EMPTY_OBJECT
    }

    /// Fragment body to write (without the leading `#`): empty for `{}`,
    /// otherwise `!` followed by the escaped JSON.
    pub fn fragment_body(&self) -> String {
        if self.is_empty_object() {
            String::new()
        } else {
            format!("!{}", self.escaped)
        }
    }
}

/// Require `value` to be a JSON object.
pub fn verify_object(value: Value) -> Result<Map<String, Value>> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(UrlSyncError::Shape(format!(
            "got {}",
            json_type_name(&other)
        ))),
    }
}

/// Parse JSON text that must contain an object.
pub fn parse_object(text: &str) -> Result<Map<String, Value>> {
    verify_object(serde_json::from_str(text)?)
}

/// Parse URL-safe JSON text that must contain an object.
pub fn parse_url_safe_object(text: &str) -> Result<Map<String, Value>> {
    parse_object(&url_safe_to_json(text))
}

/// Convert URL-safe JSON to standard JSON.
///
/// URL-safe JSON may quote strings with `'` (where `\'` is a literal quote
/// and a bare `"` needs no escape). Double-quoted strings pass through.
pub fn url_safe_to_json(text: &str) -> String {
    #[derive(Clone, Copy)]
    enum Quote {
        None,
        Double,
        Single,
    }

    let mut out = String::with_capacity(text.len());
    let mut quote = Quote::None;
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        match quote {
            Quote::None => {
                match c {
                    '\'' => {
                        out.push('"');
                        quote = Quote::Single;
                        continue;
                    }
                    '"' => quote = Quote::Double,
                    _ => {}
                }
                out.push(c);
            }
            Quote::Double => {
                out.push(c);
                match c {
                    '\\' => {
                        if let Some(escaped) = chars.next() {
                            out.push(escaped);
                        }
                    }
                    '"' => quote = Quote::None,
                    _ => {}
                }
            }
            Quote::Single => match c {
                '\\' => match chars.next() {
                    Some('\'') => out.push('\''),
                    Some(escaped) => {
                        out.push('\\');
                        out.push(escaped);
                    }
                    None => out.push('\\'),
                },
                '"' => out.push_str("\\\""),
                '\'' => {
                    out.push('"');
                    quote = Quote::None;
                }
                _ => out.push(c),
            },
        }
    }

    out
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
