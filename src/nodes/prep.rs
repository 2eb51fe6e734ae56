use image::{Rgba, RgbaImage, imageops};
use ndarray::{Array3, Array4, ArrayD, Axis, Slice, concatenate, s};

use crate::foundation::config::HostConfig;
use crate::foundation::error::{NodeError, NodeResult};
use crate::foundation::math::{Fnv1a64, blend_over_opaque, unit_to_u8};
use crate::node::Node;
use crate::node::schema::{InputField, NodeSchema};
use crate::node::value::{Inputs, NodeOutput, Value, ValueKind};
use crate::tensor::batch::{FrameLayout, ImageBatch};
use crate::tensor::raster::{from_raster, pad_to_four_channels, raster_bytes};

const CATEGORY: &str = "smn/prep";

const DEBUG_BACKDROP: [u8; 4] = [255, 0, 0, 255];

fn single_image(batch: ImageBatch) -> NodeResult<NodeOutput> {
    Ok(NodeOutput::Values(vec![Value::Image(batch)]))
}

/// Non-negative integer input.
fn dim_input(inputs: &Inputs, name: &str) -> NodeResult<usize> {
    let v = inputs.int(name)?;
    usize::try_from(v).map_err(|_| NodeError::validation(format!("{name} must be >= 0, got {v}")))
}

/// Bounding box `(y0, y1, x0, x1)` (exclusive ends) of pixels whose alpha exceeds `threshold`.
pub fn alpha_bounds(raster: &Array3<u8>, threshold: u8) -> Option<(usize, usize, usize, usize)> {
    if raster.dim().2 < 4 {
        return None;
    }
    let mut bounds: Option<(usize, usize, usize, usize)> = None;
    for ((y, x), &a) in raster.slice(s![.., .., 3]).indexed_iter() {
        if a <= threshold {
            continue;
        }
        bounds = Some(match bounds {
            None => (y, y + 1, x, x + 1),
            Some((y0, y1, x0, x1)) => (y0.min(y), y1.max(y + 1), x0.min(x), x1.max(x + 1)),
        });
    }
    bounds
}

/// Largest `(width, height)` with the aspect ratio of `src` that fits inside `target`.
pub fn fit_within(src: (usize, usize), target: (usize, usize)) -> (usize, usize) {
    let (sw, sh) = src;
    let (tw, th) = target;
    let aspect = sw as f64 / sh as f64;
    let mut w = tw;
    let mut h = (tw as f64 / aspect) as usize;
    if h > th {
        h = th;
        w = (th as f64 * aspect) as usize;
    }
    (w.clamp(1, tw), h.clamp(1, th))
}

fn debug_canvas_color(frame: usize) -> [u8; 4] {
    let mut h = Fnv1a64::new_default();
    h.write_u64(frame as u64);
    let [r, g, b, ..] = h.finish().to_le_bytes();
    [r, g, b, 255]
}

fn to_rgba_image(raster: &Array3<u8>) -> NodeResult<RgbaImage> {
    let (h, w, _) = raster.dim();
    RgbaImage::from_raw(w as u32, h as u32, raster_bytes(raster.view()))
        .ok_or_else(|| NodeError::shape(format!("raster {w}x{h} is not RGBA")))
}

/// Crops each frame to its visible content, scales it to fit the target box keeping aspect,
/// and centers it on a transparent canvas.
#[derive(Clone, Copy, Debug, Default)]
pub struct TrimScale;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrimScaleParams {
    pub padding: usize,
    pub threshold: u8,
    pub target_width: usize,
    pub target_height: usize,
    pub debug: bool,
}

impl TrimScale {
    pub fn apply(
        batch: &ImageBatch,
        layout: FrameLayout,
        p: TrimScaleParams,
    ) -> NodeResult<ImageBatch> {
        if p.target_width == 0 || p.target_height == 0 {
            return Err(NodeError::validation("target size must be non-zero"));
        }
        let frames = batch.to_nhwc_f32(layout)?;
        let (n, h, w, _) = frames.dim();
        if n > 0 && (h == 0 || w == 0) {
            return Err(NodeError::validation("frames have no pixels"));
        }
        let mut out = Array4::<f32>::zeros((n, p.target_height, p.target_width, 4));
        for (idx, (frame, mut dst)) in frames.outer_iter().zip(out.outer_iter_mut()).enumerate() {
            let raster = pad_to_four_channels(frame.mapv(unit_to_u8))?;
            dst.assign(&from_raster(Self::frame(&raster, idx, p)?.view()));
        }
        Ok(ImageBatch::F32(out.into_dyn()))
    }

    fn frame(raster: &Array3<u8>, idx: usize, p: TrimScaleParams) -> NodeResult<Array3<u8>> {
        let (h, w, _) = raster.dim();
        let mut trimmed = match alpha_bounds(raster, p.threshold) {
            Some((y0, y1, x0, x1)) => raster
                .slice(s![
                    y0.saturating_sub(p.padding)..(y1 + p.padding).min(h),
                    x0.saturating_sub(p.padding)..(x1 + p.padding).min(w),
                    ..
                ])
                .to_owned(),
            None => raster.clone(),
        };

        if p.debug {
            for mut px in trimmed.lanes_mut(Axis(2)) {
                if px[3] == 0 {
                    px.assign(&ndarray::aview1(&DEBUG_BACKDROP));
                }
            }
        }

        let (th, tw, _) = trimmed.dim();
        let (nw, nh) = fit_within((tw, th), (p.target_width, p.target_height));
        let scaled = imageops::resize(
            &to_rgba_image(&trimmed)?,
            nw as u32,
            nh as u32,
            imageops::FilterType::Triangle,
        );

        let fill = if p.debug {
            Rgba(debug_canvas_color(idx))
        } else {
            Rgba([0, 0, 0, 0])
        };
        let mut canvas = RgbaImage::from_pixel(p.target_width as u32, p.target_height as u32, fill);
        let x = (p.target_width - nw) / 2;
        let y = (p.target_height - nh) / 2;
        imageops::replace(&mut canvas, &scaled, x as i64, y as i64);

        Array3::from_shape_vec((p.target_height, p.target_width, 4), canvas.into_raw())
            .map_err(|e| NodeError::shape(format!("canvas reshape failed: {e}")))
    }
}

impl Node for TrimScale {
    fn schema(&self) -> NodeSchema {
        NodeSchema::new(
            CATEGORY,
            "Trims each image to its visible content, then scales it to fit the target size.",
        )
        .required(InputField::image("images"))
        .required(InputField::int("trim_padding").default_value(0).range(0.0, 4096.0))
        .required(InputField::int("trim_threshold").default_value(0).range(0.0, 255.0))
        .required(InputField::int("target_width").default_value(512).range(1.0, 8192.0))
        .required(InputField::int("target_height").default_value(512).range(1.0, 8192.0))
        .required(InputField::boolean("debug").default_value(false))
        .output("images", ValueKind::Image)
    }

    fn execute(&self, host: &HostConfig, inputs: &Inputs) -> NodeResult<NodeOutput> {
        let threshold = inputs.int("trim_threshold")?;
        let params = TrimScaleParams {
            padding: dim_input(inputs, "trim_padding")?,
            threshold: u8::try_from(threshold).map_err(|_| {
                NodeError::validation(format!("trim_threshold must be 0..=255, got {threshold}"))
            })?,
            target_width: dim_input(inputs, "target_width")?,
            target_height: dim_input(inputs, "target_height")?,
            debug: inputs.bool("debug")?,
        };
        single_image(Self::apply(inputs.image("images")?, host.frame_layout, params)?)
    }
}

/// Composites RGBA frames over an opaque background color, dropping alpha.
#[derive(Clone, Copy, Debug, Default)]
pub struct FlattenAlpha;

impl FlattenAlpha {
    pub fn apply(batch: &ImageBatch, layout: FrameLayout, bg: [u8; 3]) -> NodeResult<ImageBatch> {
        let src = batch.to_nhwc_f32(layout)?;
        let (n, h, w, c) = src.dim();
        if c != 4 {
            return Err(NodeError::validation(format!(
                "flatten expects RGBA frames, got {c} channels"
            )));
        }
        let out = Array4::from_shape_fn((n, h, w, 3), |(i, y, x, ch)| {
            let alpha = unit_to_u8(src[[i, y, x, 3]]);
            let v = blend_over_opaque(unit_to_u8(src[[i, y, x, ch]]), alpha, bg[ch]);
            f32::from(v) / 255.0
        });
        Ok(ImageBatch::F32(out.into_dyn()))
    }
}

impl Node for FlattenAlpha {
    fn schema(&self) -> NodeSchema {
        NodeSchema::new(
            CATEGORY,
            "Flattens images with alpha onto a background color, removing the alpha channel.",
        )
        .required(InputField::image("images"))
        .required(InputField::color("background_color").default_value("#000000"))
        .output("images", ValueKind::Image)
    }

    fn execute(&self, host: &HostConfig, inputs: &Inputs) -> NodeResult<NodeOutput> {
        let bg = inputs.color("background_color")?;
        single_image(Self::apply(inputs.image("images")?, host.frame_layout, bg)?)
    }
}

/// Concatenates two batches whose frames have the same shape.
#[derive(Clone, Copy, Debug, Default)]
pub struct AppendBatch;

impl AppendBatch {
    pub fn apply(a: &ImageBatch, b: &ImageBatch) -> NodeResult<ImageBatch> {
        let (sa, sb) = (a.shape(), b.shape());
        if sa.is_empty() || sb.is_empty() || sa[1..] != sb[1..] {
            return Err(NodeError::validation(format!(
                "image batches must match except for batch size, got {:?} and {:?}",
                sa, sb
            )));
        }
        let joined = match (a, b) {
            (ImageBatch::U8(x), ImageBatch::U8(y)) => {
                concatenate(Axis(0), &[x.view(), y.view()]).map(ImageBatch::U8)
            }
            _ => {
                let (x, y) = (a.to_f32(), b.to_f32());
                concatenate(Axis(0), &[x.view(), y.view()]).map(ImageBatch::F32)
            }
        };
        joined.map_err(|e| NodeError::shape(format!("append failed: {e}")))
    }
}

impl Node for AppendBatch {
    fn schema(&self) -> NodeSchema {
        NodeSchema::new(
            CATEGORY,
            "Appends one batch of images to another if they are the same size.",
        )
        .required(InputField::image("images_a"))
        .required(InputField::image("images_b"))
        .output("images", ValueKind::Image)
    }

    fn execute(&self, _host: &HostConfig, inputs: &Inputs) -> NodeResult<NodeOutput> {
        single_image(Self::apply(inputs.image("images_a")?, inputs.image("images_b")?)?)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ReverseBatch;

impl ReverseBatch {
    pub fn apply(batch: &ImageBatch) -> NodeResult<ImageBatch> {
        fn flip<T: Clone>(a: &ArrayD<T>) -> ArrayD<T> {
            a.slice_axis(Axis(0), Slice::new(0, None, -1)).to_owned()
        }
        if batch.ndim() == 0 {
            return Err(NodeError::shape("cannot reverse a batch without a frame axis"));
        }
        Ok(match batch {
            ImageBatch::F32(a) => ImageBatch::F32(flip(a)),
            ImageBatch::U8(a) => ImageBatch::U8(flip(a)),
        })
    }
}

impl Node for ReverseBatch {
    fn schema(&self) -> NodeSchema {
        NodeSchema::new(CATEGORY, "Reverses the order of the image batch.")
            .required(InputField::image("images"))
            .output("images", ValueKind::Image)
    }

    fn execute(&self, _host: &HostConfig, inputs: &Inputs) -> NodeResult<NodeOutput> {
        single_image(Self::apply(inputs.image("images")?)?)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/nodes/prep.rs"]
mod tests;
