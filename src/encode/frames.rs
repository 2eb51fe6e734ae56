use std::{
    fs::File,
    io::{BufWriter, Write as _},
    path::{Path, PathBuf},
};

use image::{
    ExtendedColorType, ImageEncoder as _,
    codecs::png::{CompressionType, FilterType, PngEncoder},
};
use ndarray::{Array3, Axis, s};

use crate::foundation::error::{NodeError, NodeResult};
use crate::tensor::batch::{ChannelOrder, FrameLayout, ImageBatch};
use crate::tensor::raster::{as_frame, raster_bytes, to_raster};

/// File-name prefix for the encoded frame sequence.
pub const MAIN_FRAME_PREFIX: &str = "frame_";
/// File-name prefix for the pass-through side channel.
pub const PASSTHROUGH_FRAME_PREFIX: &str = "pass_through_frame_";

const MIN_INDEX_WIDTH: usize = 2;

/// PNG pixel format chosen from a frame's channel count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelFormat {
    Gray,
    GrayAlpha,
    Rgb,
    Rgba,
}

impl PixelFormat {
    pub fn for_channels(channels: usize) -> Option<Self> {
        match channels {
            1 => Some(Self::Gray),
            2 => Some(Self::GrayAlpha),
            3 => Some(Self::Rgb),
            4 => Some(Self::Rgba),
            _ => None,
        }
    }

    pub fn channels(self) -> usize {
        match self {
            Self::Gray => 1,
            Self::GrayAlpha => 2,
            Self::Rgb => 3,
            Self::Rgba => 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Gray => "L",
            Self::GrayAlpha => "LA",
            Self::Rgb => "RGB",
            Self::Rgba => "RGBA",
        }
    }

    fn color_type(self) -> ExtendedColorType {
        match self {
            Self::Gray => ExtendedColorType::L8,
            Self::GrayAlpha => ExtendedColorType::La8,
            Self::Rgb => ExtendedColorType::Rgb8,
            Self::Rgba => ExtendedColorType::Rgba8,
        }
    }
}

/// Digits used for frame indices in a batch of `count` frames (at least two).
pub fn index_width(count: usize) -> usize {
    let mut last = count.saturating_sub(1);
    let mut digits = 1;
    while last >= 10 {
        last /= 10;
        digits += 1;
    }
    digits.max(MIN_INDEX_WIDTH)
}

pub fn frame_file_name(prefix: &str, idx: usize, width: usize) -> String {
    format!("{prefix}{idx:0width$}.png")
}

/// printf-style pattern matching [`frame_file_name`], as consumed by ffmpeg's image2 demuxer.
pub fn frame_pattern(prefix: &str, width: usize) -> String {
    format!("{prefix}%0{width}d.png")
}

/// Result of [`prepare_frames`].
#[derive(Clone, Debug, Default)]
pub struct PreparedFrames {
    /// Written files, in frame order.
    pub paths: Vec<PathBuf>,
    /// Zero-padding width used for the indices.
    pub index_width: usize,
    pub log: String,
}

/// Write every frame of `batch` as `{prefix}{index}.png` into a freshly recreated `target_dir`.
///
/// `target_dir` is deleted first if it exists. A frame that is not rank 3 after layout
/// normalization aborts the batch; files already written stay on disk.
pub fn prepare_frames(
    batch: &ImageBatch,
    target_dir: &Path,
    prefix: &str,
    layout: FrameLayout,
) -> NodeResult<PreparedFrames> {
    if batch.ndim() == 0 {
        return Err(NodeError::shape("image batch must have a leading frame axis"));
    }
    let order = layout.resolve(batch.shape());

    recreate_dir(target_dir)?;

    let count = batch.len();
    let width = index_width(count);
    let mut out = PreparedFrames {
        paths: Vec::with_capacity(count),
        index_width: width,
        log: String::from("\n\n[Saving frames]\n"),
    };

    for idx in 0..count {
        let raster = frame_raster(batch, idx, order)?;
        let (raster, lossy_from) = truncate_channels(raster);
        let (h, w, c) = raster.dim();
        let format = PixelFormat::for_channels(c).ok_or_else(|| {
            NodeError::shape(format!("frame {idx} has {c} channels (expected 1..=4)"))
        })?;

        let path = target_dir.join(frame_file_name(prefix, idx, width));
        write_png(&path, &raster, format)?;

        if let Some(original) = lossy_from {
            out.log.push_str(&format!(
                "Frame {idx}: {original} channels truncated to {} (lossy)\n",
                format.channels()
            ));
            tracing::warn!(frame = idx, channels = original, "truncated extra channels");
        }
        out.log.push_str(&format!(
            "Saved frame {}/{count} to {} ({}, {w}x{h})\n",
            idx + 1,
            path.display(),
            format.name()
        ));
        tracing::debug!(path = %path.display(), format = format.name(), "saved frame");
        out.paths.push(path);
    }

    Ok(out)
}

fn recreate_dir(dir: &Path) -> NodeResult<()> {
    if dir.is_dir() {
        std::fs::remove_dir_all(dir).map_err(|e| NodeError::io(dir, e))?;
    }
    std::fs::create_dir_all(dir).map_err(|e| NodeError::io(dir, e))
}

/// Byte raster of frame `idx` in `(height, width, channels)` order.
fn frame_raster(batch: &ImageBatch, idx: usize, order: ChannelOrder) -> NodeResult<Array3<u8>> {
    let raster = match batch {
        ImageBatch::F32(a) => to_raster(a.index_axis(Axis(0), idx))?,
        ImageBatch::U8(a) => as_frame(a.index_axis(Axis(0), idx))?.to_owned(),
    };
    Ok(match order {
        ChannelOrder::Last => raster,
        ChannelOrder::First => raster.permuted_axes([1, 2, 0]),
    })
}

/// Keep at most four channels; reports the original count when some were dropped.
fn truncate_channels(raster: Array3<u8>) -> (Array3<u8>, Option<usize>) {
    let c = raster.dim().2;
    if c <= 4 {
        return (raster, None);
    }
    (raster.slice(s![.., .., ..4]).to_owned(), Some(c))
}

fn write_png(path: &Path, raster: &Array3<u8>, format: PixelFormat) -> NodeResult<()> {
    let (h, w, _) = raster.dim();
    let file = File::create(path).map_err(|e| NodeError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    PngEncoder::new_with_quality(&mut writer, CompressionType::Default, FilterType::Adaptive)
        .write_image(
            &raster_bytes(raster.view()),
            w as u32,
            h as u32,
            format.color_type(),
        )
        .map_err(|e| NodeError::Io(format!("'{}': {e}", path.display())))?;
    writer.flush().map_err(|e| NodeError::io(path, e))
}

#[cfg(test)]
#[path = "../../tests/unit/encode/frames.rs"]
mod tests;
