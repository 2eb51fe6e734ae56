use serde::Serialize;
use serde_json::{Map, Value as Json, json};

use crate::node::value::ValueKind;

/// Declaration of one input socket or widget.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct InputField {
    pub name: &'static str,
    pub kind: ValueKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Json>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub round: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<&'static str>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub multiline: bool,
    /// Fixed option list; the host renders it as a combo box instead of a typed socket.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub choices: Option<&'static [&'static str]>,
}

impl InputField {
    pub fn new(name: &'static str, kind: ValueKind) -> Self {
        Self {
            name,
            kind,
            default: None,
            min: None,
            max: None,
            step: None,
            round: None,
            display: None,
            multiline: false,
            choices: None,
        }
    }

    pub fn int(name: &'static str) -> Self {
        Self::new(name, ValueKind::Int)
    }

    pub fn float(name: &'static str) -> Self {
        Self::new(name, ValueKind::Float)
    }

    pub fn string(name: &'static str) -> Self {
        Self::new(name, ValueKind::String)
    }

    pub fn boolean(name: &'static str) -> Self {
        Self::new(name, ValueKind::Bool)
    }

    pub fn image(name: &'static str) -> Self {
        Self::new(name, ValueKind::Image)
    }

    pub fn color(name: &'static str) -> Self {
        Self::new(name, ValueKind::Color)
    }

    pub fn font(name: &'static str) -> Self {
        Self::new(name, ValueKind::Font)
    }

    /// String widget restricted to `options`; the first one is the default.
    pub fn choice(name: &'static str, options: &'static [&'static str]) -> Self {
        let mut field = Self::new(name, ValueKind::String);
        field.choices = Some(options);
        if let Some(first) = options.first() {
            field.default = Some(json!(first));
        }
        field
    }

    pub fn default_value(mut self, value: impl Into<Json>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    pub fn step(mut self, step: f64) -> Self {
        self.step = Some(step);
        self
    }

    pub fn round(mut self, round: f64) -> Self {
        self.round = Some(round);
        self
    }

    pub fn display(mut self, display: &'static str) -> Self {
        self.display = Some(display);
        self
    }

    pub fn multiline(mut self) -> Self {
        self.multiline = true;
        self
    }

    /// `[TYPE, {options}]`, or `[TYPE]` when there are no options. Combo fields put the option
    /// list where the type name would go.
    fn host_entry(&self) -> Json {
        let mut opts = Map::new();
        if let Some(v) = &self.default {
            opts.insert("default".into(), v.clone());
        }
        let num = |v: f64| {
            if self.kind == ValueKind::Int {
                json!(v as i64)
            } else {
                json!(v)
            }
        };
        if let Some(v) = self.min {
            opts.insert("min".into(), num(v));
        }
        if let Some(v) = self.max {
            opts.insert("max".into(), num(v));
        }
        if let Some(v) = self.step {
            opts.insert("step".into(), num(v));
        }
        if let Some(v) = self.round {
            opts.insert("round".into(), json!(v));
        }
        if let Some(v) = self.display {
            opts.insert("display".into(), json!(v));
        }
        if self.multiline {
            opts.insert("multiline".into(), json!(true));
        }
        let head = match self.choices {
            Some(options) => json!(options),
            None => json!(self.kind.name()),
        };
        if opts.is_empty() {
            json!([head])
        } else {
            json!([head, opts])
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OutputField {
    pub name: &'static str,
    pub kind: ValueKind,
}

/// Everything the host needs to present and wire a node.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NodeSchema {
    pub category: &'static str,
    pub description: &'static str,
    pub required: Vec<InputField>,
    pub optional: Vec<InputField>,
    pub outputs: Vec<OutputField>,
    pub output_node: bool,
}

impl NodeSchema {
    pub fn new(category: &'static str, description: &'static str) -> Self {
        Self {
            category,
            description,
            required: Vec::new(),
            optional: Vec::new(),
            outputs: Vec::new(),
            output_node: false,
        }
    }

    pub fn required(mut self, field: InputField) -> Self {
        self.required.push(field);
        self
    }

    pub fn optional(mut self, field: InputField) -> Self {
        self.optional.push(field);
        self
    }

    pub fn output(mut self, name: &'static str, kind: ValueKind) -> Self {
        self.outputs.push(OutputField { name, kind });
        self
    }

    pub fn output_node(mut self) -> Self {
        self.output_node = true;
        self
    }

    pub fn input(&self, name: &str) -> Option<&InputField> {
        self.required
            .iter()
            .chain(&self.optional)
            .find(|f| f.name == name)
    }

    /// Input declaration in the host's `{"required": {...}, "optional": {...}}` form.
    pub fn input_types(&self) -> Json {
        let group = |fields: &[InputField]| {
            fields
                .iter()
                .map(|f| (f.name.to_string(), f.host_entry()))
                .collect::<Map<_, _>>()
        };
        let mut out = Map::new();
        out.insert("required".into(), Json::Object(group(&self.required)));
        if !self.optional.is_empty() {
            out.insert("optional".into(), Json::Object(group(&self.optional)));
        }
        Json::Object(out)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/node/schema.rs"]
mod tests;
