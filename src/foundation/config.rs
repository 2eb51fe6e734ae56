use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::foundation::error::NodeResult;
use crate::tensor::batch::FrameLayout;

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_ffmpeg_bin() -> String {
    "ffmpeg".to_string()
}

/// Host-side settings shared by every node invocation.
///
/// Every field has a default, so `{}` is a valid config file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HostConfig {
    /// Root under which output nodes create their per-invocation directories.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Encoder executable, resolved through `PATH` when not absolute.
    #[serde(default = "default_ffmpeg_bin")]
    pub ffmpeg_bin: String,
    /// How image batches are interpreted when written to disk.
    #[serde(default)]
    pub frame_layout: FrameLayout,
    /// Directory that relative font names are looked up in.
    #[serde(default)]
    pub font_dir: Option<PathBuf>,
    /// Font file used when a node asks for the `default` font.
    #[serde(default)]
    pub default_font: Option<PathBuf>,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            ffmpeg_bin: default_ffmpeg_bin(),
            frame_layout: FrameLayout::default(),
            font_dir: None,
            default_font: None,
        }
    }
}

impl HostConfig {
    pub fn from_path(path: &Path) -> NodeResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading host config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_str(&text)
            .with_context(|| format!("parsing host config '{}'", path.display()))?;
        Ok(cfg)
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    pub fn with_ffmpeg_bin(mut self, ffmpeg_bin: impl Into<String>) -> Self {
        self.ffmpeg_bin = ffmpeg_bin.into();
        self
    }

    pub fn with_font_dir(mut self, font_dir: impl Into<PathBuf>) -> Self {
        self.font_dir = Some(font_dir.into());
        self
    }

    pub fn with_default_font(mut self, font: impl Into<PathBuf>) -> Self {
        self.default_font = Some(font.into());
        self
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/config.rs"]
mod tests;
