use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::encode::ffmpeg::{EncodeJob, EncodeOutcome, encode, ensure_parent_dir};
use crate::encode::frames::{
    MAIN_FRAME_PREFIX, PASSTHROUGH_FRAME_PREFIX, frame_pattern, index_width, prepare_frames,
};
use crate::foundation::config::HostConfig;
use crate::foundation::error::{NodeError, NodeResult};
use crate::pipeline::log::{RunLog, Stage};
use crate::tensor::batch::{FrameDims, FrameLayout, ImageBatch};

pub const DEFAULT_FRAMERATE: u32 = 25;
pub const DEFAULT_BITRATE_MB: f64 = 10.0;

const FRAMES_DIR: &str = "frames";
const PASSTHROUGH_DIR: &str = "pass_through";

/// Inputs of one WebM export.
#[derive(Clone, Debug)]
pub struct WebmRequest {
    pub images: ImageBatch,
    /// Optional side-channel frames, written next to the main sequence but never encoded.
    pub pass_through: Option<ImageBatch>,
    pub framerate: u32,
    pub bitrate_mb: f64,
    /// Relative to the host output directory.
    pub output_path: String,
    /// Overrides the host's layout when set.
    pub layout: Option<FrameLayout>,
}

impl WebmRequest {
    pub fn new(images: ImageBatch, output_path: impl Into<String>) -> Self {
        Self {
            images,
            pass_through: None,
            framerate: DEFAULT_FRAMERATE,
            bitrate_mb: DEFAULT_BITRATE_MB,
            output_path: output_path.into(),
            layout: None,
        }
    }
}

/// Filesystem locations derived from the host output directory and a request's `output_path`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WebmPaths {
    pub output_root: PathBuf,
    pub output_dir: PathBuf,
    pub frames_dir: PathBuf,
    pub pass_through_dir: PathBuf,
    pub output_file: PathBuf,
}

impl WebmPaths {
    pub fn resolve(output_root: &Path, output_path: &str) -> Self {
        let output_dir = output_root.join(output_path);
        let trimmed = output_path.trim_end_matches(['/', '\\']);
        let base = Path::new(trimmed)
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let output_file = output_dir.join(format!("{base}.webm"));
        Self {
            output_root: output_root.to_path_buf(),
            frames_dir: output_dir.join(FRAMES_DIR),
            pass_through_dir: output_dir.join(PASSTHROUGH_DIR),
            output_dir,
            output_file,
        }
    }
}

/// One entry of an output node's UI result.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FileLocator {
    pub filename: String,
    pub subfolder: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// What an output node hands back to the host for display.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UiResult {
    pub images: Vec<FileLocator>,
    pub animated: Vec<bool>,
}

impl UiResult {
    /// Single animated artifact at `file`, with `subfolder` relative to `output_root` when possible.
    pub fn animated_file(output_root: &Path, file: &Path) -> Self {
        let filename = file
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let parent = file.parent().unwrap_or(Path::new(""));
        let subfolder = parent.strip_prefix(output_root).unwrap_or(parent);
        Self {
            images: vec![FileLocator {
                filename,
                subfolder: subfolder.to_string_lossy().into_owned(),
                kind: "output".to_string(),
            }],
            animated: vec![true],
        }
    }
}

/// Outcome of [`run_webm`].
#[derive(Clone, Debug)]
pub struct WebmReport {
    pub log: RunLog,
    /// `None` when the run stopped before the encoder, or the encoder could not be started.
    pub outcome: Option<EncodeOutcome>,
    pub output_file: PathBuf,
    /// Present once the encoder stage has been reached.
    pub ui: Option<UiResult>,
}

impl WebmReport {
    pub fn success(&self) -> bool {
        self.outcome.as_ref().is_some_and(EncodeOutcome::success)
    }

    pub fn log_text(&self) -> String {
        self.log.render()
    }
}

/// Write `req.images` as PNG frames and encode them to `<output_path>/<base>.webm`.
///
/// Never fails: every problem is recorded in the returned log.
#[tracing::instrument(
    skip_all,
    fields(output_path = %req.output_path, framerate = req.framerate, bitrate_mb = req.bitrate_mb)
)]
pub fn run_webm(host: &HostConfig, req: &WebmRequest) -> WebmReport {
    let layout = req.layout.unwrap_or(host.frame_layout);
    let paths = WebmPaths::resolve(&host.output_dir, &req.output_path);
    let mut log = RunLog::new();
    let report = |log: RunLog, outcome: Option<EncodeOutcome>, ui: Option<UiResult>| {
        WebmReport {
            log,
            outcome,
            output_file: paths.output_file.clone(),
            ui,
        }
    };

    let t = log.begin(Stage::Validate);
    log.push(input_section(req, layout, &paths));
    let job = match validate(host, req, layout, &paths) {
        Ok(job) => job,
        Err(e) => {
            tracing::warn!(error = %e, "rejected webm request");
            log.push(format!("Error: {e}"));
            log.end(t);
            return report(log, None, None);
        }
    };
    log.push(format!("[ffmpeg Command]\n{}", job.command_line()));
    log.end(t);

    if let Some(pass_through) = &req.pass_through {
        let t = log.begin(Stage::PreparePassthroughFrames);
        match prepare_frames(
            pass_through,
            &paths.pass_through_dir,
            PASSTHROUGH_FRAME_PREFIX,
            layout,
        ) {
            Ok(prepared) => {
                log.push(prepared.log);
                log.push(format!(
                    "[Prepared {} pass-through frames]",
                    prepared.paths.len()
                ));
            }
            Err(e) => {
                tracing::warn!(error = %e, "pass-through frames skipped");
                log.push(format!("Warning: pass-through frames skipped: {e}"));
            }
        }
        log.end(t);
    }

    let t = log.begin(Stage::PrepareFrames);
    match prepare_frames(&req.images, &paths.frames_dir, MAIN_FRAME_PREFIX, layout) {
        Ok(prepared) => {
            log.push(prepared.log);
            log.push(format!("[Prepared {} frames for ffmpeg]", prepared.paths.len()));
            log.end(t);
        }
        Err(e) => {
            tracing::error!(error = %e, "frame preparation failed");
            log.push(format!("Error: {e}"));
            log.end(t);
            return report(log, None, None);
        }
    }

    let t = log.begin(Stage::Encode);
    log.push("[Running ffmpeg]");
    let outcome = match ensure_parent_dir(&paths.output_file).and_then(|()| encode(job)) {
        Ok(outcome) => {
            let code = outcome
                .exit_code
                .map_or_else(|| "none (terminated by signal)".to_string(), |c| c.to_string());
            log.push(format!("ffmpeg exit code: {code}"));
            log.push(format!("ffmpeg output:\n{}", outcome.output));
            if !outcome.success() {
                log.push("Error: ffmpeg reported a non-zero exit code.");
            }
            Some(outcome)
        }
        Err(e) => {
            tracing::error!(error = %e, "encoder did not start");
            log.push(format!("Error running ffmpeg: {e}"));
            None
        }
    };
    log.end(t);

    let t = log.begin(Stage::Finalize);
    if outcome.as_ref().is_some_and(EncodeOutcome::success) {
        log.push(format!(
            "[WebM file created successfully at {}]",
            paths.output_file.display()
        ));
    } else {
        log.push("[WebM file creation failed]");
    }
    log.end(t);

    let ui = UiResult::animated_file(&paths.output_root, &paths.output_file);
    report(log, outcome, Some(ui))
}

fn input_section(req: &WebmRequest, layout: FrameLayout, paths: &WebmPaths) -> String {
    let shape = req.images.shape();
    let mut s = String::from("[Input Data]\n");
    s.push_str(&format!(
        "Image Field: {shape:?} ({})\n",
        req.images.dtype_name()
    ));
    s.push_str(&format!(
        "Frame count: {}\n",
        shape.first().copied().unwrap_or(0)
    ));
    if let Some(dims) = req.images.dims(layout.resolve(shape)) {
        s.push_str(&format!("Size: {}x{}\n", dims.width, dims.height));
    }
    s.push_str(&format!("Framerate: {}\n", req.framerate));
    s.push_str(&format!("Bitrate: {}MB\n", req.bitrate_mb));
    s.push_str(&format!("Output Path: {}\n", req.output_path));
    s.push_str("\n[Working Directory]\n");
    s.push_str(&format!("Generated Output: {}\n", paths.output_dir.display()));
    s.push_str(&format!("Generated Frames: {}", paths.frames_dir.display()));
    s
}

fn validate(
    host: &HostConfig,
    req: &WebmRequest,
    layout: FrameLayout,
    paths: &WebmPaths,
) -> NodeResult<EncodeJob> {
    let order = layout.resolve(req.images.shape());
    let Some(FrameDims {
        count,
        height,
        width,
        channels,
    }) = req.images.dims(order)
    else {
        return Err(NodeError::shape(format!(
            "image batch must be 4-D, got shape {:?}",
            req.images.shape()
        )));
    };
    if !(1..=4).contains(&channels) {
        return Err(NodeError::shape(format!(
            "image batch has {channels} channels (expected 1..=4)"
        )));
    }
    if count == 0 {
        return Err(NodeError::validation("image batch has no frames"));
    }
    if req.output_path.trim_end_matches(['/', '\\']).is_empty() {
        return Err(NodeError::validation("output_path must name a directory"));
    }

    let dim = |n: usize, what: &str| {
        u32::try_from(n).map_err(|_| NodeError::validation(format!("{what} {n} is too large")))
    };
    let job = EncodeJob {
        ffmpeg_bin: host.ffmpeg_bin.clone(),
        frames_dir: paths.frames_dir.clone(),
        pattern: frame_pattern(MAIN_FRAME_PREFIX, index_width(count)),
        framerate: req.framerate,
        bitrate_mb: req.bitrate_mb,
        width: dim(width, "width")?,
        height: dim(height, "height")?,
        out_path: paths.output_file.clone(),
    };
    job.validate()?;
    Ok(job)
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/webm.rs"]
mod tests;
