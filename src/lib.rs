#![deny(unsafe_code)]
//! Nodes for graph-based media hosts: value inputs and converters, JSON accessors, image-batch
//! prep, and export of image batches to WebM through an external `ffmpeg`.
//!
//! The core path is [`run_webm`]: batch → numbered PNG frames → `ffmpeg` → `.webm`, with a
//! staged, timestamped log of every step. Every node is reachable by id through [`registry`].

pub mod encode;
pub mod foundation;
pub mod node;
pub mod nodes;
pub mod pipeline;
pub mod tensor;

pub use encode::ffmpeg::{EncodeJob, EncodeOutcome, encode, is_ffmpeg_on_path};
pub use encode::frames::{PixelFormat, PreparedFrames, prepare_frames};
pub use foundation::config::HostConfig;
pub use foundation::error::{NodeError, NodeResult};
pub use node::Node;
pub use node::registry::{NodeRegistry, registry};
pub use node::schema::{InputField, NodeSchema, OutputField};
pub use node::value::{Inputs, NodeOutput, Value, ValueKind};
pub use pipeline::log::{RunLog, Stage};
pub use pipeline::webm::{FileLocator, UiResult, WebmReport, WebmRequest, run_webm};
pub use tensor::batch::{FrameLayout, ImageBatch};
pub use tensor::raster::{from_raster, pad_to_four_channels, to_raster};
