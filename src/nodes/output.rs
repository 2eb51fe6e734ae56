use crate::encode::ffmpeg::{BITRATE_MB_RANGE, FRAMERATE_RANGE};
use crate::foundation::config::HostConfig;
use crate::foundation::error::NodeResult;
use crate::node::Node;
use crate::node::schema::{InputField, NodeSchema};
use crate::node::value::{Inputs, NodeOutput};
use crate::pipeline::webm::{DEFAULT_BITRATE_MB, DEFAULT_FRAMERATE, WebmRequest, run_webm};

/// Encodes an image batch to `<output_path>/<name>.webm` under the host output directory.
///
/// Encoder problems do not fail the node; they are reported in the returned log.
#[derive(Clone, Copy, Debug, Default)]
pub struct OutputWebm;

impl Node for OutputWebm {
    fn schema(&self) -> NodeSchema {
        NodeSchema::new("output", "A node that converts an image batch to WebM.")
            .required(InputField::image("images"))
            .required(
                InputField::int("framerate")
                    .default_value(DEFAULT_FRAMERATE)
                    .range(
                        f64::from(*FRAMERATE_RANGE.start()),
                        f64::from(*FRAMERATE_RANGE.end()),
                    )
                    .step(1.0),
            )
            .required(
                InputField::float("bitrate_mb")
                    .default_value(DEFAULT_BITRATE_MB)
                    .range(*BITRATE_MB_RANGE.start(), *BITRATE_MB_RANGE.end())
                    .step(1.0),
            )
            .required(InputField::string("output_path"))
            .optional(InputField::image("pass_through"))
            .output_node()
    }

    fn execute(&self, host: &HostConfig, inputs: &Inputs) -> NodeResult<NodeOutput> {
        let framerate = inputs.int("framerate")?;
        let mut req =
            WebmRequest::new(inputs.image("images")?.clone(), inputs.str("output_path")?);
        // Out-of-range values are rejected by the pipeline's validate stage and logged there.
        req.framerate = u32::try_from(framerate).unwrap_or(0);
        req.bitrate_mb = inputs.float("bitrate_mb")?;
        req.pass_through = inputs.optional_image("pass_through")?.cloned();

        let report = run_webm(host, &req);
        let log = report.log_text();
        tracing::info!(
            success = report.success(),
            output = %report.output_file.display(),
            "webm node finished"
        );
        Ok(NodeOutput::Ui { ui: report.ui, log })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/nodes/output.rs"]
mod tests;
