use std::{fmt, time::Instant};

use chrono::{DateTime, Local};

const TIMESTAMP_FMT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Stages of a WebM run, in execution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Validate,
    PreparePassthroughFrames,
    PrepareFrames,
    Encode,
    Finalize,
}

impl Stage {
    pub fn name(self) -> &'static str {
        match self {
            Self::Validate => "Validate",
            Self::PreparePassthroughFrames => "PreparePassthroughFrames",
            Self::PrepareFrames => "PrepareFrames",
            Self::Encode => "Encode",
            Self::Finalize => "Finalize",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Debug)]
pub struct LogLine {
    pub at: DateTime<Local>,
    pub text: String,
}

/// Open stage returned by [`RunLog::begin`]; pass it back to [`RunLog::end`].
#[derive(Debug)]
#[must_use = "a stage must be closed with RunLog::end"]
pub struct StageTimer {
    stage: Stage,
    started: Instant,
}

impl StageTimer {
    pub fn stage(&self) -> Stage {
        self.stage
    }
}

/// Append-only diagnostics for a single pipeline run.
#[derive(Clone, Debug, Default)]
pub struct RunLog {
    lines: Vec<LogLine>,
}

impl RunLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, text: impl Into<String>) {
        self.lines.push(LogLine {
            at: Local::now(),
            text: text.into(),
        });
    }

    pub fn lines(&self) -> &[LogLine] {
        &self.lines
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|l| l.text.contains(needle))
    }

    pub fn begin(&mut self, stage: Stage) -> StageTimer {
        let now = Local::now();
        tracing::info!(stage = stage.name(), at = %now.format(TIMESTAMP_FMT), "stage start");
        self.lines.push(LogLine {
            at: now,
            text: format!("[Start {stage}] {}", now.format(TIMESTAMP_FMT)),
        });
        StageTimer {
            stage,
            started: Instant::now(),
        }
    }

    pub fn end(&mut self, timer: StageTimer) {
        let secs = timer.started.elapsed().as_secs_f64();
        tracing::info!(stage = timer.stage.name(), elapsed_s = secs, "stage end");
        self.push(format!("[End {}] {secs:.3}s", timer.stage));
    }

    /// One text blob, each entry prefixed with its wall-clock time.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(&format!("[{}] {}\n", line.at.format("%H:%M:%S%.3f"), line.text));
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/log.rs"]
mod tests;
