//! Transcoding engine boundary.
//!
//! The [`Engine`] trait is the only way the crate touches pixel data: it
//! takes an [`ExtractionPlan`] plus the resolved source file and returns the
//! encoded bytes. [`FfmpegEngine`] implements it by running the `ffmpeg`
//! binary with the plan translated into command-line arguments.
//!
//! The engine needs four capabilities:
//!
//! 1. seeking to a timecode,
//! 2. an optional `reverse` filter,
//! 3. single-frame capture as MJPEG,
//! 4. a `palettegen` / `paletteuse` filter graph for GIF clips.

use std::ffi::OsString;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;

use crate::error::FramecutError;
use crate::plan::{ExtractionMode, ExtractionPlan};

/// Executes extraction plans.
///
/// Implementations must give every call its own output buffer; the
/// [`Extractor`](crate::Extractor) runs many plans concurrently against one
/// engine value.
pub trait Engine: Send + Sync {
    /// Run `plan` against the video at `source` and return the encoded
    /// output.
    fn execute(
        &self,
        plan: &ExtractionPlan,
        source: &Path,
    ) -> impl Future<Output = Result<Vec<u8>, FramecutError>> + Send;
}

/// Label-based filter graph for clip extraction.
///
/// The input is optionally reversed, split in two, one branch feeds
/// `palettegen`, and `paletteuse` applies that palette to the other branch.
pub fn palette_filter_graph(reversed: bool) -> String {
    let reverse = if reversed { "reverse," } else { "" };
    format!("[0:v]{reverse}split[a][b];[a]palettegen[p];[b][p]paletteuse")
}

/// [`Engine`] backed by the `ffmpeg` command-line tool.
///
/// Output is written to the child's stdout (`pipe:1`) and collected in
/// memory. A non-zero exit status becomes
/// [`FramecutError::EngineExecutionError`] with ffmpeg's stderr attached.
#[derive(Debug, Clone)]
pub struct FfmpegEngine {
    binary: PathBuf,
}

impl FfmpegEngine {
    /// Use the `ffmpeg` executable at `binary` (a bare name is looked up on
    /// `PATH`).
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// The executable this engine runs.
    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Translate a plan into ffmpeg arguments.
    ///
    /// Seeking options precede `-i` so ffmpeg seeks the input instead of
    /// decoding and discarding everything before the start. The plan is
    /// taken as-is; `execute` rejects plans that fail
    /// [`ExtractionPlan::validate`] before building arguments.
    ///
    /// ```
    /// use framecut::{FfmpegEngine, VideoRef, plan_frame};
    ///
    /// let plan = plan_frame(VideoRef::new("ep01")?, 48, 24.0)?;
    /// let args = FfmpegEngine::arguments(&plan, "ep01.mp4".as_ref());
    /// let args: Vec<_> = args.iter().map(|a| a.to_string_lossy()).collect();
    /// assert_eq!(
    ///     args,
    ///     [
    ///         "-hide_banner", "-nostdin", "-loglevel", "error",
    ///         "-ss", "00:00:02.000", "-i", "ep01.mp4",
    ///         "-frames:v", "1", "-f", "image2", "-c:v", "mjpeg", "pipe:1",
    ///     ],
    /// );
    /// # Ok::<(), framecut::FramecutError>(())
    /// ```
    pub fn arguments(plan: &ExtractionPlan, source: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = ["-hide_banner", "-nostdin", "-loglevel", "error"]
            .into_iter()
            .map(OsString::from)
            .collect();

        args.push("-ss".into());
        args.push(plan.start.as_str().into());
        if let Some(end) = &plan.end {
            args.push("-to".into());
            args.push(end.as_str().into());
        }
        args.push("-i".into());
        args.push(source.as_os_str().to_owned());

        match plan.mode {
            ExtractionMode::SingleFrame => {
                args.extend(
                    ["-frames:v", "1", "-f", "image2", "-c:v", "mjpeg"]
                        .into_iter()
                        .map(OsString::from),
                );
            }
            ExtractionMode::RangedClip => {
                args.push("-filter_complex".into());
                args.push(palette_filter_graph(plan.reversed).into());
                args.extend(
                    ["-c:v", "gif", "-f", "gif"]
                        .into_iter()
                        .map(OsString::from),
                );
            }
        }

        args.push("pipe:1".into());
        args
    }
}

impl Default for FfmpegEngine {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

impl Engine for FfmpegEngine {
    async fn execute(
        &self,
        plan: &ExtractionPlan,
        source: &Path,
    ) -> Result<Vec<u8>, FramecutError> {
        plan.validate()?;
        let args = Self::arguments(plan, source);
        log::debug!("Running {} {:?}", self.binary.display(), args);

        let output = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                FramecutError::EngineExecutionError(format!(
                    "failed to run {}: {e}",
                    self.binary.display()
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(FramecutError::EngineExecutionError(format!(
                "{} exited with {}: {}",
                self.binary.display(),
                output.status,
                stderr.trim(),
            )));
        }

        log::debug!(
            "{} produced {} bytes for {} ({})",
            self.binary.display(),
            output.stdout.len(),
            plan.video,
            plan.mode,
        );
        Ok(output.stdout)
    }
}
