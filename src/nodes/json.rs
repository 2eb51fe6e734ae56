//! JSON lookup nodes.
//!
//! These never fail on bad text: unparsable input, a missing key or an out-of-range index all
//! yield empty/zero outputs. Values are re-serialized with `", "` / `": "` separators and
//! `\uXXXX` escapes for non-ASCII, so text round-trips unchanged through hosts that expect
//! Python's `json.dumps` output.

use std::io;

use serde_json::Value as Json;
use serde_json::ser::{Formatter, Serializer};

use crate::foundation::config::HostConfig;
use crate::foundation::error::NodeResult;
use crate::node::Node;
use crate::node::schema::{InputField, NodeSchema};
use crate::node::value::{Inputs, NodeOutput, Value, ValueKind};
use crate::nodes::convert::{float_repr, parse_float, trunc_to_int};

const CATEGORY: &str = "JSON";

struct SpacedAsciiFormatter;

impl Formatter for SpacedAsciiFormatter {
    fn begin_array_value<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_key<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b": ")
    }

    fn write_f64<W: ?Sized + io::Write>(&mut self, writer: &mut W, value: f64) -> io::Result<()> {
        writer.write_all(float_repr(value).as_bytes())
    }

    fn write_f32<W: ?Sized + io::Write>(&mut self, writer: &mut W, value: f32) -> io::Result<()> {
        self.write_f64(writer, f64::from(value))
    }

    fn write_string_fragment<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        fragment: &str,
    ) -> io::Result<()> {
        for ch in fragment.chars() {
            if ch.is_ascii() {
                writer.write_all(&[ch as u8])?;
            } else {
                let mut units = [0u16; 2];
                for unit in ch.encode_utf16(&mut units) {
                    write!(writer, "\\u{unit:04x}")?;
                }
            }
        }
        Ok(())
    }
}

/// Serialize `value` the way `json.dumps` does with default arguments.
pub fn dumps(value: &Json) -> String {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, SpacedAsciiFormatter);
    match serde::Serialize::serialize(value, &mut ser) {
        // The formatter only ever emits ASCII.
        Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
        Err(e) => {
            tracing::warn!(error = %e, "json re-serialization failed");
            String::new()
        }
    }
}

/// Value under `key` in a JSON object, re-serialized; `""` when absent or unparsable.
pub fn key_value(json_text: &str, key: &str) -> String {
    match serde_json::from_str::<Json>(json_text) {
        Ok(Json::Object(map)) => match map.get(key) {
            Some(v) => {
                tracing::debug!(key, "json key found");
                dumps(v)
            }
            None => {
                tracing::debug!(key, "json key not found");
                String::new()
            }
        },
        Ok(_) => String::new(),
        Err(e) => {
            tracing::debug!(error = %e, "invalid json text");
            String::new()
        }
    }
}

/// Element `index` of a JSON array, re-serialized; `""` when out of range or unparsable.
pub fn index_value(json_text: &str, index: i64) -> String {
    let Ok(Json::Array(items)) = serde_json::from_str::<Json>(json_text) else {
        return String::new();
    };
    usize::try_from(index)
        .ok()
        .and_then(|i| items.get(i))
        .map(dumps)
        .unwrap_or_default()
}

/// Boolean, integer, float and plain-string views of one JSON value.
#[derive(Clone, Debug, PartialEq)]
pub struct ValueViews {
    pub as_bool: bool,
    pub as_int: i64,
    pub as_float: f64,
    pub as_string: String,
}

impl Default for ValueViews {
    fn default() -> Self {
        Self {
            as_bool: false,
            as_int: 0,
            as_float: 0.0,
            as_string: String::new(),
        }
    }
}

fn truthy_text(s: &str) -> bool {
    !matches!(s.trim().to_lowercase().as_str(), "" | "false" | "0")
}

fn parse_int(s: &str) -> Option<i64> {
    s.trim().parse::<i64>().ok()
}

/// Coerce `text` into every view.
///
/// Text that is not JSON is taken as a raw string. A JSON boolean keeps its truth value but
/// maps to `0` / `0.0` numerically.
pub fn value_as(text: &str) -> ValueViews {
    let parsed = match serde_json::from_str::<Json>(text) {
        Ok(v) => v,
        Err(_) => {
            let raw = text.trim();
            return ValueViews {
                as_bool: !matches!(raw, "" | "false" | "0"),
                as_int: parse_int(text).unwrap_or(0),
                as_float: parse_float(text).unwrap_or(0.0),
                as_string: text.to_string(),
            };
        }
    };

    match parsed {
        Json::Bool(b) => ValueViews {
            as_bool: b,
            as_string: dumps(&Json::Bool(b)),
            ..ValueViews::default()
        },
        Json::Number(n) => {
            let (as_int, as_float) = match n.as_i64() {
                Some(i) => (i, i as f64),
                None => {
                    let f = n.as_f64().unwrap_or(0.0);
                    (trunc_to_int(f), f)
                }
            };
            ValueViews {
                as_bool: as_float != 0.0,
                as_int,
                as_float,
                as_string: dumps(&Json::Number(n)),
            }
        }
        Json::String(s) => ValueViews {
            as_bool: truthy_text(&s),
            as_int: parse_int(&s).unwrap_or(0),
            as_float: parse_float(&s).unwrap_or(0.0),
            as_string: s,
        },
        other => ValueViews {
            as_string: dumps(&other),
            ..ValueViews::default()
        },
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct GetKeyValue;

impl Node for GetKeyValue {
    fn schema(&self) -> NodeSchema {
        NodeSchema::new(
            CATEGORY,
            "Outputs the value under a key of a JSON object as JSON text, or an empty string.",
        )
        .required(InputField::string("json_string").default_value("{}"))
        .required(InputField::string("key").default_value(""))
        .output("value", ValueKind::String)
    }

    fn execute(&self, _host: &HostConfig, inputs: &Inputs) -> NodeResult<NodeOutput> {
        let out = key_value(inputs.str("json_string")?, inputs.str("key")?);
        Ok(NodeOutput::Values(vec![Value::String(out)]))
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct GetIndexValue;

impl Node for GetIndexValue {
    fn schema(&self) -> NodeSchema {
        NodeSchema::new(
            CATEGORY,
            "Outputs the element at a zero-based index of a JSON array as JSON text, or an \
             empty string.",
        )
        .required(
            InputField::string("json_string")
                .default_value("[]")
                .multiline(),
        )
        .required(
            InputField::int("index")
                .default_value(0)
                .range(0.0, f64::from(i32::MAX))
                .step(1.0)
                .display("number"),
        )
        .output("value", ValueKind::String)
    }

    fn execute(&self, _host: &HostConfig, inputs: &Inputs) -> NodeResult<NodeOutput> {
        let out = index_value(inputs.str("json_string")?, inputs.int("index")?);
        Ok(NodeOutput::Values(vec![Value::String(out)]))
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct GetValueAs;

impl Node for GetValueAs {
    fn schema(&self) -> NodeSchema {
        NodeSchema::new(
            CATEGORY,
            "Outputs a JSON value as boolean, integer, float and unquoted string.",
        )
        .required(InputField::string("json_value").default_value(""))
        .output("as_bool", ValueKind::Bool)
        .output("as_int", ValueKind::Int)
        .output("as_float", ValueKind::Float)
        .output("as_string", ValueKind::String)
    }

    fn execute(&self, _host: &HostConfig, inputs: &Inputs) -> NodeResult<NodeOutput> {
        let v = value_as(inputs.str("json_value")?);
        Ok(NodeOutput::Values(vec![
            Value::Bool(v.as_bool),
            Value::Int(v.as_int),
            Value::Float(v.as_float),
            Value::String(v.as_string),
        ]))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/nodes/json.rs"]
mod tests;
