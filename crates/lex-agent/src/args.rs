//! Normalization of tool-call arguments into a JSON mapping.
//!
//! Mappings pass through unchanged. Text is decoded as JSON first; if that
//! fails, the narrow literal decoder in [`crate::literal`] gets a turn.

use serde_json::{Map, Value};

use crate::error::ArgsError;
use crate::events::ToolArgs;
use crate::literal::parse_literal;

/// Normalize the arguments of one tool call.
///
/// # Errors
///
/// Returns [`ArgsError`] if the arguments are absent, undecodable, or do not
/// decode to a mapping.
pub fn normalize_args(args: Option<&ToolArgs>) -> Result<Map<String, Value>, ArgsError> {
    match args {
        None => Err(ArgsError::Missing),
        Some(ToolArgs::Structured(map)) => Ok(map.clone()),
        Some(ToolArgs::Text(text)) => decode_text(text),
    }
}

fn decode_text(text: &str) -> Result<Map<String, Value>, ArgsError> {
    let value = match serde_json::from_str::<Value>(text) {
        Ok(value) => value,
        Err(json_err) => {
            tracing::debug!(error = %json_err, "tool arguments are not JSON, trying literal decode");
            parse_literal(text).map_err(|literal| ArgsError::Undecodable {
                json: json_err.to_string(),
                literal,
            })?
        }
    };

    match value {
        Value::Object(map) => Ok(map),
        other => Err(ArgsError::NotAMapping(kind_of(&other))),
    }
}

const fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}

/// A string argument as shown in a narrative: missing or null renders empty,
/// non-string values render as JSON.
#[must_use]
pub fn arg_text(args: &Map<String, Value>, key: &str) -> String {
    match args.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
