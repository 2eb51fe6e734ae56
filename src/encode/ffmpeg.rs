use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use crate::foundation::error::{NodeError, NodeResult};

pub const VIDEO_CODEC: &str = "libvpx";
pub const AUDIO_CODEC: &str = "libopus";

pub const FRAMERATE_RANGE: std::ops::RangeInclusive<u32> = 5..=60;
pub const BITRATE_MB_RANGE: std::ops::RangeInclusive<f64> = 1.0..=100.0;

/// One run of the encoder over a numbered PNG sequence.
///
/// Consumed by [`encode`]; build a new job per invocation.
#[derive(Clone, Debug)]
pub struct EncodeJob {
    /// Encoder executable (`ffmpeg` unless overridden by the host config).
    pub ffmpeg_bin: String,
    /// Directory holding the frame files.
    pub frames_dir: PathBuf,
    /// printf-style frame name pattern inside `frames_dir`, e.g. `frame_%02d.png`.
    pub pattern: String,
    pub framerate: u32,
    pub bitrate_mb: f64,
    pub width: u32,
    pub height: u32,
    pub out_path: PathBuf,
}

impl EncodeJob {
    pub fn validate(&self) -> NodeResult<()> {
        if !FRAMERATE_RANGE.contains(&self.framerate) {
            return Err(NodeError::validation(format!(
                "framerate {} outside {}..={}",
                self.framerate,
                FRAMERATE_RANGE.start(),
                FRAMERATE_RANGE.end()
            )));
        }
        if !BITRATE_MB_RANGE.contains(&self.bitrate_mb) {
            return Err(NodeError::validation(format!(
                "bitrate {}MB outside {}..={}",
                self.bitrate_mb,
                BITRATE_MB_RANGE.start(),
                BITRATE_MB_RANGE.end()
            )));
        }
        if self.width == 0 || self.height == 0 {
            return Err(NodeError::validation("encode width/height must be non-zero"));
        }
        Ok(())
    }

    pub fn input_path(&self) -> PathBuf {
        self.frames_dir.join(&self.pattern)
    }

    /// Encoder arguments, in order.
    pub fn args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = [
            "-y",
            "-framerate",
            &self.framerate.to_string(),
            "-pattern_type",
            "sequence",
            "-start_number",
            "0",
            "-i",
        ]
        .into_iter()
        .map(OsString::from)
        .collect();
        args.push(self.input_path().into_os_string());
        args.extend(
            [
                "-s",
                &format!("{}x{}", self.width, self.height),
                "-c:v",
                VIDEO_CODEC,
                "-b:v",
                &format!("{}M", self.bitrate_mb),
                "-c:a",
                AUDIO_CODEC,
                "-auto-alt-ref",
                "0",
            ]
            .into_iter()
            .map(OsString::from),
        );
        args.push(self.out_path.clone().into_os_string());
        args
    }

    /// Human-readable command line for logs.
    pub fn command_line(&self) -> String {
        std::iter::once(self.ffmpeg_bin.clone())
            .chain(self.args().iter().map(|a| a.to_string_lossy().into_owned()))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Exit status and console output of one encoder run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodeOutcome {
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    /// stdout followed by stderr.
    pub output: String,
}

impl EncodeOutcome {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Run the encoder to completion.
///
/// A non-zero exit is reported through [`EncodeOutcome`], not as an error; only a failure to
/// start the process is an error. There is no timeout.
pub fn encode(job: EncodeJob) -> NodeResult<EncodeOutcome> {
    tracing::info!(cmd = %job.command_line(), "running encoder");
    let output = Command::new(&job.ffmpeg_bin)
        .args(job.args())
        .stdin(Stdio::null())
        .output()
        .map_err(|e| {
            NodeError::encode(format!(
                "failed to spawn '{}' (is it installed and on PATH?): {e}",
                job.ffmpeg_bin
            ))
        })?;

    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(&output.stderr));

    Ok(EncodeOutcome {
        exit_code: output.status.code(),
        output: text,
    })
}

/// Return `true` when `bin -version` runs successfully.
pub fn is_ffmpeg_on_path(bin: &str) -> bool {
    Command::new(bin)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> NodeResult<()> {
    if let Some(parent) = path.parent() {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
