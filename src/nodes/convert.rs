//! Numeric/text converters. Conversion failures fall back to zero values instead of erroring.

use crate::foundation::config::HostConfig;
use crate::foundation::error::NodeResult;
use crate::node::Node;
use crate::node::schema::{InputField, NodeSchema};
use crate::node::value::{Inputs, NodeOutput, Value, ValueKind};
use crate::nodes::input::FLOAT_LIMIT;

const CATEGORY: &str = "Converter";

/// Shortest round-trip text for `v`, spelled the way Python's `repr(float)` spells it:
/// `1.0`, `1e-05`, `1e+16`, `inf`, `nan`.
pub fn float_repr(v: f64) -> String {
    if v.is_nan() {
        return "nan".to_string();
    }
    let s = format!("{v:?}");
    let Some((mantissa, exp)) = s.split_once('e') else {
        return s;
    };
    let (sign, digits) = match exp.strip_prefix('-') {
        Some(d) => ('-', d),
        None => ('+', exp),
    };
    format!("{mantissa}e{sign}{digits:0>2}")
}

/// Truncate toward zero; non-finite values give 0.
pub fn trunc_to_int(v: f64) -> i64 {
    if v.is_finite() { v.trunc() as i64 } else { 0 }
}

/// Parse like Python's `float()`: surrounding whitespace allowed, `inf`/`nan` accepted.
pub fn parse_float(text: &str) -> Option<f64> {
    let t = text.trim();
    if t.is_empty() {
        return None;
    }
    t.parse::<f64>().ok()
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ConvInt;

impl Node for ConvInt {
    fn schema(&self) -> NodeSchema {
        NodeSchema::new(
            CATEGORY,
            "Takes an integer and outputs its string and float representations.",
        )
        .required(
            InputField::int("integer")
                .default_value(0)
                .range(f64::from(i32::MIN), f64::from(i32::MAX))
                .step(1.0)
                .display("number"),
        )
        .output("string", ValueKind::String)
        .output("float", ValueKind::Float)
    }

    fn execute(&self, _host: &HostConfig, inputs: &Inputs) -> NodeResult<NodeOutput> {
        let v = inputs.int("integer")?;
        Ok(NodeOutput::Values(vec![
            Value::String(v.to_string()),
            Value::Float(v as f64),
        ]))
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ConvFloat;

impl Node for ConvFloat {
    fn schema(&self) -> NodeSchema {
        NodeSchema::new(
            CATEGORY,
            "Takes a float and outputs its string form, its truncated integer and its integer \
             rounded half to even.",
        )
        .required(
            InputField::float("float")
                .default_value(0.0)
                .range(-FLOAT_LIMIT, FLOAT_LIMIT)
                .step(0.01)
                .display("number"),
        )
        .output("string", ValueKind::String)
        .output("int_base", ValueKind::Int)
        .output("int_round", ValueKind::Int)
    }

    fn execute(&self, _host: &HostConfig, inputs: &Inputs) -> NodeResult<NodeOutput> {
        let v = inputs.float("float")?;
        Ok(NodeOutput::Values(vec![
            Value::String(float_repr(v)),
            Value::Int(trunc_to_int(v)),
            Value::Int(trunc_to_int(v.round_ties_even())),
        ]))
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ConvString;

impl Node for ConvString {
    fn schema(&self) -> NodeSchema {
        NodeSchema::new(
            CATEGORY,
            "Takes a string and outputs its float and integer values, 0 when it does not parse.",
        )
        .required(
            InputField::string("string")
                .default_value("")
                .display("text"),
        )
        .output("float", ValueKind::Float)
        .output("int", ValueKind::Int)
    }

    fn execute(&self, _host: &HostConfig, inputs: &Inputs) -> NodeResult<NodeOutput> {
        let f = parse_float(inputs.str("string")?).unwrap_or(0.0);
        Ok(NodeOutput::Values(vec![
            Value::Float(f),
            Value::Int(trunc_to_int(f)),
        ]))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/nodes/convert.rs"]
mod tests;
