use ndarray::{Array3, Axis};

use crate::foundation::config::HostConfig;
use crate::foundation::error::{NodeError, NodeResult};
use crate::node::Node;
use crate::node::schema::{InputField, NodeSchema};
use crate::node::value::{Inputs, NodeOutput, Value, ValueKind, parse_hex_color};
use crate::tensor::batch::ImageBatch;
use crate::tensor::raster::{from_raster, pad_to_four_channels};

const CATEGORY: &str = "Input";
const COLOR_CATEGORY: &str = "smn/input";

/// Edge length of the swatch emitted by [`InputColor`].
pub const COLOR_BLOCK_SIZE: usize = 50;

pub const FLOAT_LIMIT: f64 = 1e6;

#[derive(Clone, Copy, Debug, Default)]
pub struct InputString;

impl Node for InputString {
    fn schema(&self) -> NodeSchema {
        NodeSchema::new(CATEGORY, "Outputs the entered text.")
            .required(InputField::string("string").default_value(""))
            .output("value", ValueKind::String)
    }

    fn execute(&self, _host: &HostConfig, inputs: &Inputs) -> NodeResult<NodeOutput> {
        Ok(NodeOutput::Values(vec![inputs.str("string")?.into()]))
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct InputInt;

impl Node for InputInt {
    fn schema(&self) -> NodeSchema {
        NodeSchema::new(CATEGORY, "Outputs the entered integer.")
            .required(
                InputField::int("integer")
                    .default_value(0)
                    .range(f64::from(i32::MIN), f64::from(i32::MAX))
                    .step(1.0)
                    .display("number"),
            )
            .output("value", ValueKind::Int)
    }

    fn execute(&self, _host: &HostConfig, inputs: &Inputs) -> NodeResult<NodeOutput> {
        let v = inputs.int("integer")?;
        if i32::try_from(v).is_err() {
            return Err(NodeError::validation(format!(
                "integer {v} is outside the 32-bit range"
            )));
        }
        Ok(NodeOutput::Values(vec![Value::Int(v)]))
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct InputFloat;

impl Node for InputFloat {
    fn schema(&self) -> NodeSchema {
        NodeSchema::new(CATEGORY, "Outputs the entered float.")
            .required(
                InputField::float("float_value")
                    .default_value(0.0)
                    .range(-FLOAT_LIMIT, FLOAT_LIMIT)
                    .step(0.01)
                    .round(0.001)
                    .display("number"),
            )
            .output("value", ValueKind::Float)
    }

    fn execute(&self, _host: &HostConfig, inputs: &Inputs) -> NodeResult<NodeOutput> {
        let v = inputs.float("float_value")?;
        if !(-FLOAT_LIMIT..=FLOAT_LIMIT).contains(&v) {
            return Err(NodeError::validation(format!(
                "float {v} is outside -{FLOAT_LIMIT}..={FLOAT_LIMIT}"
            )));
        }
        Ok(NodeOutput::Values(vec![Value::Float(v)]))
    }
}

/// Hex color picker that also emits an opaque swatch image.
#[derive(Clone, Copy, Debug, Default)]
pub struct InputColor;

impl InputColor {
    /// One-frame RGBA batch of `COLOR_BLOCK_SIZE` square filled with `rgb`.
    pub fn color_block(rgb: [u8; 3]) -> NodeResult<ImageBatch> {
        let n = COLOR_BLOCK_SIZE;
        let rgb_raster = Array3::from_shape_fn((n, n, 3), |(_, _, c)| rgb[c]);
        let rgba = pad_to_four_channels(rgb_raster)?;
        Ok(ImageBatch::F32(
            from_raster(rgba.view()).insert_axis(Axis(0)).into_dyn(),
        ))
    }
}

impl Node for InputColor {
    fn schema(&self) -> NodeSchema {
        NodeSchema::new(
            COLOR_CATEGORY,
            "A node for referencing externally to set a color value, with a swatch preview.",
        )
        .required(InputField::string("color_field").default_value("#000000"))
        .output("color", ValueKind::Color)
        .output("image", ValueKind::Image)
    }

    fn execute(&self, _host: &HostConfig, inputs: &Inputs) -> NodeResult<NodeOutput> {
        let rgb = parse_hex_color(inputs.str("color_field")?)?;
        let block = Self::color_block(rgb)?;
        Ok(NodeOutput::Values(vec![Value::Color(rgb), Value::Image(block)]))
    }
}

/// Multi-line JSON text box. The text is passed on unparsed.
#[derive(Clone, Copy, Debug, Default)]
pub struct InputJson;

impl Node for InputJson {
    fn schema(&self) -> NodeSchema {
        NodeSchema::new(CATEGORY, "Outputs the entered JSON text.")
            .required(InputField::string("string").default_value("{}").multiline())
            .output("value", ValueKind::String)
    }

    fn execute(&self, _host: &HostConfig, inputs: &Inputs) -> NodeResult<NodeOutput> {
        Ok(NodeOutput::Values(vec![inputs.str("string")?.into()]))
    }
}

/// Passes a font name through to text nodes.
///
/// The name is either `default`, a file name inside the host font directory, or a path.
#[derive(Clone, Copy, Debug, Default)]
pub struct InputFont;

impl Node for InputFont {
    fn schema(&self) -> NodeSchema {
        NodeSchema::new(CATEGORY, "Selects a font file for text nodes.")
            .required(InputField::string("font_name").default_value("default"))
            .output("font", ValueKind::Font)
    }

    fn execute(&self, _host: &HostConfig, inputs: &Inputs) -> NodeResult<NodeOutput> {
        let name = inputs.str("font_name")?.trim();
        if name.is_empty() {
            return Err(NodeError::validation("font_name must not be empty"));
        }
        Ok(NodeOutput::Values(vec![Value::Font(name.to_string())]))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/nodes/input.rs"]
mod tests;
