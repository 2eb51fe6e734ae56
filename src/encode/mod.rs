//! Frame materialization and the external encoder.

/// `ffmpeg` invocation over a numbered PNG sequence.
pub mod ffmpeg;
/// Writing image batches as numbered PNG files.
pub mod frames;
