//! Time-bounded video metadata probing.
//!
//! [`MetadataProbe`] asks a [`ProbeBackend`] for the raw frame-count and
//! frame-rate text of a video, bounds the call with a timeout, and parses the
//! answer into [`VideoMetadata`]. Every failure mode comes back as a distinct
//! [`FramecutError`] variant; none of them abort the process.
//!
//! Two backends ship with the crate:
//!
//! - [`FfprobeBackend`] runs the `ffprobe` binary and reads its JSON output.
//! - `LibavBackend` (feature `libav`) reads the stream header in-process via
//!   `ffmpeg-next`.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use framecut::{FfprobeBackend, MetadataProbe};
//!
//! # async fn example() -> Result<(), framecut::FramecutError> {
//! let probe = MetadataProbe::new(FfprobeBackend::new("ffprobe"), Duration::from_secs(5));
//! let metadata = probe.probe_video("episode.mp4".as_ref()).await?;
//! println!("{} frames @ {}", metadata.frame_count, metadata.frame_rate);
//! # Ok(())
//! # }
//! ```

use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use serde::Deserialize;
use tokio::process::Command;

use crate::error::FramecutError;
use crate::metadata::{FrameCount, FrameRate, VideoMetadata};

/// Unparsed stream fields as reported by a probe backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawStreamInfo {
    /// Decimal frame count text (e.g. `"34176"`).
    pub frame_count: String,
    /// Frame rate text in `"<num>/<den>"` form (e.g. `"24000/1001"`).
    pub frame_rate: String,
}

/// A source of raw video stream information.
///
/// Implementations talk to whatever external service knows the frame count
/// and frame rate of a file. They are not responsible for timeouts;
/// [`MetadataProbe`] drops the returned future when its bound expires, so
/// backends should release their resources on drop.
///
/// A stream that does not record its frame count is reported with an empty
/// `frame_count`, which [`parse_stream_info`] rejects as a
/// [`FramecutError::ProbeParseError`]. Backends must not substitute `0`.
pub trait ProbeBackend: Send + Sync {
    /// Read the first video stream's frame count and frame rate.
    fn probe_raw(
        &self,
        path: &Path,
    ) -> impl Future<Output = Result<RawStreamInfo, FramecutError>> + Send;
}

/// Parses backend answers into [`VideoMetadata`] under a fixed time bound.
#[derive(Debug, Clone)]
pub struct MetadataProbe<B> {
    backend: B,
    timeout: Duration,
}

impl<B: ProbeBackend> MetadataProbe<B> {
    /// Wrap `backend`, failing any probe that takes longer than `timeout`.
    pub fn new(backend: B, timeout: Duration) -> Self {
        Self { backend, timeout }
    }

    /// The configured bound.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Borrow the underlying backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Probe `path` for its frame count and frame rate.
    ///
    /// # Errors
    ///
    /// - [`FramecutError::ProbeTimeout`] if the backend does not answer in
    ///   time.
    /// - [`FramecutError::ProbeParseError`] if either field is malformed.
    /// - Whatever the backend itself reports (typically
    ///   [`FramecutError::ProbeFailed`] or [`FramecutError::NoVideoStream`]).
    pub async fn probe_video(&self, path: &Path) -> Result<VideoMetadata, FramecutError> {
        log::debug!("Probing {} (timeout={:?})", path.display(), self.timeout);

        let raw = tokio::time::timeout(self.timeout, self.backend.probe_raw(path))
            .await
            .map_err(|_| FramecutError::ProbeTimeout {
                path: path.to_path_buf(),
                timeout: self.timeout,
            })??;

        let metadata = parse_stream_info(&raw)?;
        log::debug!(
            "Probed {}: {} frames @ {:.3} fps",
            path.display(),
            metadata.frame_count,
            metadata.frame_rate.frames_per_second(),
        );
        Ok(metadata)
    }
}

/// Parse raw probe text into [`VideoMetadata`].
///
/// # Errors
///
/// Returns [`FramecutError::ProbeParseError`] naming the malformed field.
pub fn parse_stream_info(raw: &RawStreamInfo) -> Result<VideoMetadata, FramecutError> {
    let frame_count = raw
        .frame_count
        .trim()
        .parse::<FrameCount>()
        .map_err(|_| FramecutError::ProbeParseError {
            field: "frame count",
            value: raw.frame_count.clone(),
        })?;

    let frame_rate =
        raw.frame_rate
            .parse::<FrameRate>()
            .map_err(|_| FramecutError::ProbeParseError {
                field: "frame rate",
                value: raw.frame_rate.clone(),
            })?;

    Ok(VideoMetadata {
        frame_count,
        frame_rate,
    })
}

/// Probe backend that shells out to `ffprobe`.
///
/// Runs
/// `ffprobe -v error -select_streams v:0 -show_entries stream=nb_frames,r_frame_rate -of json <path>`.
/// The child is killed if the probe future is dropped, which is what
/// happens when [`MetadataProbe`] times out.
#[derive(Debug, Clone)]
pub struct FfprobeBackend {
    binary: PathBuf,
}

impl FfprobeBackend {
    /// Use the `ffprobe` executable at `binary` (a bare name is looked up on
    /// `PATH`).
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// The executable this backend runs.
    pub fn binary(&self) -> &Path {
        &self.binary
    }
}

impl Default for FfprobeBackend {
    fn default() -> Self {
        Self::new("ffprobe")
    }
}

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    nb_frames: Option<String>,
    r_frame_rate: Option<String>,
}

impl ProbeBackend for FfprobeBackend {
    async fn probe_raw(&self, path: &Path) -> Result<RawStreamInfo, FramecutError> {
        let probe_failed = |reason: String| FramecutError::ProbeFailed {
            path: path.to_path_buf(),
            reason,
        };

        let output = Command::new(&self.binary)
            .args(["-v", "error", "-select_streams", "v:0"])
            .args(["-show_entries", "stream=nb_frames,r_frame_rate"])
            .args(["-of", "json"])
            .arg(path)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| probe_failed(format!("failed to run {}: {e}", self.binary.display())))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(probe_failed(format!(
                "ffprobe exited with {}: {}",
                output.status,
                stderr.trim(),
            )));
        }

        let parsed: FfprobeOutput = serde_json::from_slice(&output.stdout)
            .map_err(|e| probe_failed(format!("unreadable ffprobe output: {e}")))?;
        let stream = parsed
            .streams
            .into_iter()
            .next()
            .ok_or_else(|| FramecutError::NoVideoStream(path.to_path_buf()))?;

        Ok(RawStreamInfo {
            frame_count: stream.nb_frames.unwrap_or_default(),
            frame_rate: stream.r_frame_rate.unwrap_or_default(),
        })
    }
}

/// Probe backend that reads stream headers in-process with `ffmpeg-next`.
///
/// The demuxer is opened on a blocking thread. A timed-out probe returns
/// immediately, but the blocking thread runs to completion in the background.
#[cfg(feature = "libav")]
#[derive(Debug, Clone, Copy, Default)]
pub struct LibavBackend;

#[cfg(feature = "libav")]
impl ProbeBackend for LibavBackend {
    async fn probe_raw(&self, path: &Path) -> Result<RawStreamInfo, FramecutError> {
        let owned = path.to_path_buf();
        tokio::task::spawn_blocking(move || read_stream_header(&owned))
            .await
            .map_err(|e| FramecutError::ProbeFailed {
                path: path.to_path_buf(),
                reason: format!("probe thread failed: {e}"),
            })?
    }
}

#[cfg(feature = "libav")]
fn read_stream_header(path: &Path) -> Result<RawStreamInfo, FramecutError> {
    use ffmpeg_next::media::Type;

    ffmpeg_next::init()?;
    let input = ffmpeg_next::format::input(path).map_err(|e| FramecutError::ProbeFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let stream = input
        .streams()
        .best(Type::Video)
        .ok_or_else(|| FramecutError::NoVideoStream(path.to_path_buf()))?;
    let rate = stream.rate();
    let frames = stream.frames();

    Ok(RawStreamInfo {
        // libavformat reports 0 when the container has no frame count.
        frame_count: if frames > 0 {
            frames.to_string()
        } else {
            String::new()
        },
        frame_rate: format!("{}/{}", rate.numerator(), rate.denominator()),
    })
}
