//! Error types for the `framecut` crate.
//!
//! This module defines [`FramecutError`], the unified error type returned by
//! every fallible operation in the crate. Probe and engine failures are
//! ordinary values: one unreadable episode never takes down a host that is
//! serving other requests.

use std::{io::Error as IoError, path::PathBuf, time::Duration};

#[cfg(feature = "libav")]
use ffmpeg_next::Error as FfmpegError;
use thiserror::Error;

/// The unified error type for all `framecut` operations.
///
/// Every public method that can fail returns `Result<T, FramecutError>`.
/// Variants carry enough context to diagnose the problem without extra
/// logging at the call site.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FramecutError {
    /// A frame index was negative.
    #[error("Invalid frame number {0}: frame numbers must be non-negative")]
    InvalidFrameNumber(i64),

    /// A frame rate was zero, negative, non-finite, or unparsable.
    #[error("Invalid frame rate: {0}")]
    InvalidFrameRate(String),

    /// A planned frame lies past the end of the probed video.
    #[error("Frame {frame_number} is out of range (video has {total_frames} frames)")]
    FrameOutOfRange {
        /// The frame number that was requested.
        frame_number: i64,
        /// The total number of frames reported by the probe.
        total_frames: u64,
    },

    /// The episode identifier cannot name a file inside the library.
    #[error("Invalid episode identifier {0:?}")]
    InvalidEpisode(String),

    /// A timecode string did not match `HH:MM:SS.mmm`.
    #[error("Invalid timecode {0:?}")]
    InvalidTimecode(String),

    /// An extraction plan's fields contradict each other.
    #[error("Inconsistent extraction plan: {0}")]
    InvalidPlan(String),

    /// The probe backend did not answer within the configured bound.
    #[error("Probing {path} timed out after {timeout:?}")]
    ProbeTimeout {
        /// File that was being probed.
        path: PathBuf,
        /// The bound that expired.
        timeout: Duration,
    },

    /// The probe answered, but a field could not be parsed.
    #[error("Failed to parse probed {field} from {value:?}")]
    ProbeParseError {
        /// Which field was malformed (`"frame count"` or `"frame rate"`).
        field: &'static str,
        /// The raw text returned by the probe.
        value: String,
    },

    /// The probe backend could not run or reported a failure.
    #[error("Failed to probe {path}: {reason}")]
    ProbeFailed {
        /// File that was being probed.
        path: PathBuf,
        /// Underlying reason the probe failed.
        reason: String,
    },

    /// The probed file does not contain a video stream.
    #[error("No video stream found in {0}")]
    NoVideoStream(PathBuf),

    /// The transcoding engine failed or exited with a non-zero status.
    #[error("Engine execution failed: {0}")]
    EngineExecutionError(String),

    /// The extractor configuration is unusable.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// An I/O error occurred while talking to an external process.
    #[error("I/O error: {0}")]
    IoError(#[from] IoError),

    /// An error originating from the FFmpeg libraries.
    #[cfg(feature = "libav")]
    #[error("FFmpeg error: {0}")]
    FfmpegError(String),
}

#[cfg(feature = "libav")]
impl From<FfmpegError> for FramecutError {
    fn from(error: FfmpegError) -> Self {
        FramecutError::FfmpegError(error.to_string())
    }
}
