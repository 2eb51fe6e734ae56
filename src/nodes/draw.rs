//! Text compositing onto image batches.
//!
//! Fonts come from files the host points at (`HostConfig::font_dir` / `default_font`); nothing
//! here searches the system for fonts.

use std::path::{Path, PathBuf};

use ab_glyph::{Font as _, FontVec, Glyph, PxScale, ScaleFont as _, point};
use ndarray::{Array3, Array4};

use crate::foundation::config::HostConfig;
use crate::foundation::error::{NodeError, NodeResult};
use crate::foundation::math::unit_to_u8;
use crate::node::Node;
use crate::node::schema::{InputField, NodeSchema};
use crate::node::value::{Inputs, NodeOutput, Value, ValueKind};
use crate::tensor::batch::{FrameLayout, ImageBatch};
use crate::tensor::raster::{from_raster, pad_to_four_channels};

const CATEGORY: &str = "smn/draw";

/// Font name that selects `HostConfig::default_font`.
pub const DEFAULT_FONT_NAME: &str = "default";

const DEBUG_OUTLINE: [u8; 4] = [255, 0, 0, 255];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl HAlign {
    pub const NAMES: &'static [&'static str] = &["left", "center", "right"];

    pub fn parse(text: &str) -> NodeResult<Self> {
        match text {
            "left" => Ok(Self::Left),
            "center" => Ok(Self::Center),
            "right" => Ok(Self::Right),
            other => Err(NodeError::validation(format!(
                "horizontal alignment must be left, center or right, got '{other}'"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VAlign {
    #[default]
    Top,
    Center,
    Bottom,
}

impl VAlign {
    pub const NAMES: &'static [&'static str] = &["top", "center", "bottom"];

    pub fn parse(text: &str) -> NodeResult<Self> {
        match text {
            "top" => Ok(Self::Top),
            "center" => Ok(Self::Center),
            "bottom" => Ok(Self::Bottom),
            other => Err(NodeError::validation(format!(
                "vertical alignment must be top, center or bottom, got '{other}'"
            ))),
        }
    }
}

/// Map a font name to a file: `default` uses the host default font, relative names are looked
/// up in the host font directory, anything else is taken as a path.
pub fn resolve_font(host: &HostConfig, name: &str) -> NodeResult<PathBuf> {
    let path = if name == DEFAULT_FONT_NAME {
        host.default_font.clone().ok_or_else(|| {
            NodeError::validation("no default font configured; set default_font or pick a font file")
        })?
    } else {
        let p = Path::new(name);
        match &host.font_dir {
            Some(dir) if p.is_relative() => dir.join(p),
            _ => p.to_path_buf(),
        }
    };
    if !path.is_file() {
        return Err(NodeError::validation(format!(
            "font file not found: '{}'",
            path.display()
        )));
    }
    Ok(path)
}

/// Top-left corner of a `size` box anchored at `anchor` with the given alignment.
///
/// Centering floors the half extent, so odd sizes lean left/up.
pub fn aligned_origin(anchor: (i64, i64), size: (f32, f32), h: HAlign, v: VAlign) -> (f32, f32) {
    let (x, y) = (anchor.0 as f32, anchor.1 as f32);
    let (w, ht) = size;
    let ox = match h {
        HAlign::Left => x,
        HAlign::Center => x - (w / 2.0).floor(),
        HAlign::Right => x - w,
    };
    let oy = match v {
        VAlign::Top => y,
        VAlign::Center => y - (ht / 2.0).floor(),
        VAlign::Bottom => y - ht,
    };
    (ox, oy)
}

/// Positioned glyphs relative to the text box's top-left corner.
#[derive(Clone, Debug)]
pub struct TextLayout {
    glyphs: Vec<Glyph>,
    pub width: f32,
    pub height: f32,
}

impl TextLayout {
    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }
}

/// A parsed font file.
pub struct TextFace {
    font: FontVec,
}

impl std::fmt::Debug for TextFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextFace").finish_non_exhaustive()
    }
}

impl TextFace {
    pub fn from_bytes(bytes: Vec<u8>) -> NodeResult<Self> {
        FontVec::try_from_vec(bytes)
            .map(|font| Self { font })
            .map_err(|e| NodeError::validation(format!("invalid font data: {e}")))
    }

    pub fn open(path: &Path) -> NodeResult<Self> {
        let bytes = std::fs::read(path).map_err(|e| NodeError::io(path, e))?;
        Self::from_bytes(bytes)
    }

    /// `size` is the em size in pixels.
    fn scale(&self, size: f32) -> PxScale {
        self.font
            .pt_to_px_scale(size)
            .unwrap_or_else(|| PxScale::from(size))
    }

    /// Lay out `text` (`\n` separates lines) with the box's top-left at the origin.
    pub fn layout(&self, text: &str, size: f32) -> TextLayout {
        let scale = self.scale(size);
        let scaled = self.font.as_scaled(scale);
        let line_height = scaled.ascent() - scaled.descent();
        let line_advance = line_height + scaled.line_gap();

        if text.is_empty() {
            return TextLayout {
                glyphs: Vec::new(),
                width: 0.0,
                height: 0.0,
            };
        }

        let mut glyphs = Vec::new();
        let mut width = 0.0f32;
        let mut rows = 0usize;
        for (row, line) in text.split('\n').enumerate() {
            let baseline = scaled.ascent() + row as f32 * line_advance;
            let mut caret = 0.0f32;
            let mut prev = None;
            for ch in line.trim_end_matches('\r').chars() {
                let id = scaled.glyph_id(ch);
                if let Some(p) = prev {
                    caret += scaled.kern(p, id);
                }
                glyphs.push(id.with_scale_and_position(scale, point(caret, baseline)));
                caret += scaled.h_advance(id);
                prev = Some(id);
            }
            width = width.max(caret);
            rows = row + 1;
        }

        TextLayout {
            glyphs,
            width,
            height: line_height + rows.saturating_sub(1) as f32 * line_advance,
        }
    }

    /// Rasterize `layout` at `origin` into an RGBA raster, blending every channel toward the
    /// opaque ink by glyph coverage.
    pub fn draw(&self, raster: &mut Array3<u8>, layout: &TextLayout, origin: (f32, f32), rgb: [u8; 3]) {
        let (h, w, c) = raster.dim();
        if c < 4 {
            return;
        }
        let ink = [rgb[0], rgb[1], rgb[2], 255];
        for glyph in &layout.glyphs {
            let mut g = glyph.clone();
            g.position = point(g.position.x + origin.0, g.position.y + origin.1);
            let Some(outlined) = self.font.outline_glyph(g) else {
                continue;
            };
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                let x = bounds.min.x as i64 + i64::from(gx);
                let y = bounds.min.y as i64 + i64::from(gy);
                if x < 0 || y < 0 || x >= w as i64 || y >= h as i64 {
                    return;
                }
                let (x, y) = (x as usize, y as usize);
                for (ch, &target) in ink.iter().enumerate() {
                    let v = &mut raster[[y, x, ch]];
                    *v = lerp_u8(*v, target, coverage);
                }
            });
        }
    }
}

fn lerp_u8(from: u8, to: u8, t: f32) -> u8 {
    let t = t.clamp(0.0, 1.0);
    (f32::from(from) + (f32::from(to) - f32::from(from)) * t).round() as u8
}

/// One-pixel rectangle outline, clipped to the raster.
fn outline_rect(raster: &mut Array3<u8>, origin: (f32, f32), size: (f32, f32), color: [u8; 4]) {
    let (h, w, _) = raster.dim();
    let x0 = origin.0.floor() as i64;
    let y0 = origin.1.floor() as i64;
    let x1 = (origin.0 + size.0).ceil() as i64;
    let y1 = (origin.1 + size.1).ceil() as i64;
    let mut put = |x: i64, y: i64| {
        if x >= 0 && y >= 0 && x < w as i64 && y < h as i64 {
            for (ch, &v) in color.iter().enumerate() {
                raster[[y as usize, x as usize, ch]] = v;
            }
        }
    };
    for x in x0..=x1 {
        put(x, y0);
        put(x, y1);
    }
    for y in y0..=y1 {
        put(x0, y);
        put(x1, y);
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawTextParams<'a> {
    pub text: &'a str,
    pub x: i64,
    pub y: i64,
    /// Em size in pixels.
    pub size: f32,
    pub color: [u8; 3],
    pub h_align: HAlign,
    pub v_align: VAlign,
    /// Outline the text box in red.
    pub debug: bool,
}

/// Draws one string onto every frame of a batch. Output frames are always RGBA.
#[derive(Clone, Copy, Debug, Default)]
pub struct DrawText;

impl DrawText {
    pub fn apply(
        batch: &ImageBatch,
        layout: FrameLayout,
        face: &TextFace,
        p: &DrawTextParams<'_>,
    ) -> NodeResult<ImageBatch> {
        if !(p.size.is_finite() && p.size > 0.0) {
            return Err(NodeError::validation("text size must be finite and > 0"));
        }
        let frames = batch.to_nhwc_f32(layout)?;
        let (n, h, w, _) = frames.dim();
        let text = face.layout(p.text, p.size);
        let origin = aligned_origin((p.x, p.y), text.size(), p.h_align, p.v_align);
        tracing::debug!(
            frames = n,
            width = text.width,
            height = text.height,
            x = origin.0,
            y = origin.1,
            "drawing text"
        );

        let mut out = Array4::<f32>::zeros((n, h, w, 4));
        for (frame, mut dst) in frames.outer_iter().zip(out.outer_iter_mut()) {
            let mut raster = pad_to_four_channels(frame.mapv(unit_to_u8))?;
            face.draw(&mut raster, &text, origin, p.color);
            if p.debug {
                outline_rect(&mut raster, origin, text.size(), DEBUG_OUTLINE);
            }
            dst.assign(&from_raster(raster.view()));
        }
        Ok(ImageBatch::F32(out.into_dyn()))
    }
}

impl Node for DrawText {
    fn schema(&self) -> NodeSchema {
        NodeSchema::new(CATEGORY, "A node for drawing text onto an image.")
            .required(InputField::image("image"))
            .required(InputField::string("text_content").default_value("Sample Text"))
            .required(InputField::int("text_pos_x").default_value(0))
            .required(InputField::int("text_pos_y").default_value(0))
            .required(InputField::int("text_size").default_value(12).range(1.0, 1024.0))
            .required(InputField::color("text_color").default_value("#FFFFFF"))
            .required(InputField::font("font_name"))
            .required(InputField::choice("text_align_horizontal", HAlign::NAMES))
            .required(InputField::choice("text_align_vertical", VAlign::NAMES))
            .required(InputField::boolean("debug").default_value(false))
            .output("image", ValueKind::Image)
    }

    fn execute(&self, host: &HostConfig, inputs: &Inputs) -> NodeResult<NodeOutput> {
        let size = inputs.int("text_size")?;
        if size <= 0 {
            return Err(NodeError::validation(format!(
                "text_size must be > 0, got {size}"
            )));
        }
        let params = DrawTextParams {
            text: inputs.str("text_content")?,
            x: inputs.int("text_pos_x")?,
            y: inputs.int("text_pos_y")?,
            size: size as f32,
            color: inputs.color("text_color")?,
            h_align: HAlign::parse(inputs.str("text_align_horizontal")?)?,
            v_align: VAlign::parse(inputs.str("text_align_vertical")?)?,
            debug: inputs.bool("debug")?,
        };
        let face = TextFace::open(&resolve_font(host, inputs.font("font_name")?)?)?;
        let out = Self::apply(inputs.image("image")?, host.frame_layout, &face, &params)?;
        Ok(NodeOutput::Values(vec![Value::Image(out)]))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/nodes/draw.rs"]
mod tests;
