use std::collections::BTreeMap;

use serde::Serialize;

use crate::foundation::error::{NodeError, NodeResult};
use crate::pipeline::webm::UiResult;
use crate::tensor::batch::ImageBatch;

/// Socket type names as the host spells them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ValueKind {
    #[serde(rename = "INT")]
    Int,
    #[serde(rename = "FLOAT")]
    Float,
    #[serde(rename = "BOOLEAN")]
    Bool,
    #[serde(rename = "STRING")]
    String,
    #[serde(rename = "COLOR")]
    Color,
    #[serde(rename = "IMAGE")]
    Image,
    #[serde(rename = "FONT")]
    Font,
}

impl ValueKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Int => "INT",
            Self::Float => "FLOAT",
            Self::Bool => "BOOLEAN",
            Self::String => "STRING",
            Self::Color => "COLOR",
            Self::Image => "IMAGE",
            Self::Font => "FONT",
        }
    }
}

/// A value flowing over a node socket.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    String(String),
    Color([u8; 3]),
    Image(ImageBatch),
    /// Font file name or path, resolved against the host font directory by the consumer.
    Font(String),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Int(_) => ValueKind::Int,
            Self::Float(_) => ValueKind::Float,
            Self::Bool(_) => ValueKind::Bool,
            Self::String(_) => ValueKind::String,
            Self::Color(_) => ValueKind::Color,
            Self::Image(_) => ValueKind::Image,
            Self::Font(_) => ValueKind::Font,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Floats, widening integers.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            Self::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_image(&self) -> Option<&ImageBatch> {
        match self {
            Self::Image(v) => Some(v),
            _ => None,
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<[u8; 3]> for Value {
    fn from(v: [u8; 3]) -> Self {
        Self::Color(v)
    }
}

impl From<ImageBatch> for Value {
    fn from(v: ImageBatch) -> Self {
        Self::Image(v)
    }
}

/// Parse `#rrggbb` (leading `#` optional) into an RGB triple.
pub fn parse_hex_color(text: &str) -> NodeResult<[u8; 3]> {
    let hex = text.trim().trim_start_matches('#');
    let invalid = || NodeError::validation(format!("color '{text}' is not of the form #rrggbb"));
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    let mut rgb = [0u8; 3];
    for (i, out) in rgb.iter_mut().enumerate() {
        *out = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16).map_err(|_| invalid())?;
    }
    Ok(rgb)
}

/// Named input values for one node invocation.
#[derive(Clone, Debug, Default)]
pub struct Inputs {
    values: BTreeMap<String, Value>,
}

impl Inputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    fn required(&self, name: &str) -> NodeResult<&Value> {
        self.get(name)
            .ok_or_else(|| NodeError::validation(format!("missing input '{name}'")))
    }

    fn typed<'a, T>(
        &'a self,
        name: &str,
        want: ValueKind,
        pick: impl FnOnce(&'a Value) -> Option<T>,
    ) -> NodeResult<T> {
        let value = self.required(name)?;
        pick(value).ok_or_else(|| {
            NodeError::validation(format!(
                "input '{name}' expects {}, got {}",
                want.name(),
                value.kind().name()
            ))
        })
    }

    pub fn int(&self, name: &str) -> NodeResult<i64> {
        self.typed(name, ValueKind::Int, Value::as_int)
    }

    pub fn float(&self, name: &str) -> NodeResult<f64> {
        self.typed(name, ValueKind::Float, Value::as_float)
    }

    pub fn bool(&self, name: &str) -> NodeResult<bool> {
        self.typed(name, ValueKind::Bool, Value::as_bool)
    }

    pub fn str(&self, name: &str) -> NodeResult<&str> {
        self.typed(name, ValueKind::String, Value::as_str)
    }

    pub fn image(&self, name: &str) -> NodeResult<&ImageBatch> {
        self.typed(name, ValueKind::Image, Value::as_image)
    }

    pub fn optional_image(&self, name: &str) -> NodeResult<Option<&ImageBatch>> {
        match self.get(name) {
            None => Ok(None),
            Some(_) => self.image(name).map(Some),
        }
    }

    /// A font socket, or a font name typed as text.
    pub fn font(&self, name: &str) -> NodeResult<&str> {
        match self.required(name)? {
            Value::Font(font) | Value::String(font) => Ok(font.as_str()),
            other => Err(NodeError::validation(format!(
                "input '{name}' expects FONT, got {}",
                other.kind().name()
            ))),
        }
    }

    /// A color socket, or a hex string typed into the widget.
    pub fn color(&self, name: &str) -> NodeResult<[u8; 3]> {
        match self.required(name)? {
            Value::Color(rgb) => Ok(*rgb),
            Value::String(hex) => parse_hex_color(hex),
            other => Err(NodeError::validation(format!(
                "input '{name}' expects COLOR, got {}",
                other.kind().name()
            ))),
        }
    }
}

/// What a node hands back to the host.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeOutput {
    /// Positional socket values, matching the node's declared outputs.
    Values(Vec<Value>),
    /// Output-node result: display payload plus the run's diagnostic text.
    Ui { ui: Option<UiResult>, log: String },
}

impl NodeOutput {
    pub fn values(&self) -> &[Value] {
        match self {
            Self::Values(v) => v,
            Self::Ui { .. } => &[],
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/node/value.rs"]
mod tests;
