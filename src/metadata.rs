//! Video metadata types.
//!
//! This module defines the values produced by
//! [`MetadataProbe::probe_video`](crate::MetadataProbe::probe_video): the
//! rational [`FrameRate`] and the per-episode [`VideoMetadata`]. Metadata is
//! probed once per extraction session and never cached across requests.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FramecutError;

/// Index of a frame within a video, counted from zero.
///
/// Signed so that negative caller input can be rejected with
/// [`FramecutError::InvalidFrameNumber`] instead of wrapping.
pub type FrameIndex = i64;

/// Total number of decodable frames in a video.
pub type FrameCount = u64;

/// A positive rational frame rate such as `30000/1001`.
///
/// # Example
///
/// ```
/// use framecut::FrameRate;
///
/// let rate: FrameRate = "30000/1001".parse()?;
/// assert!((rate.frames_per_second() - 29.97).abs() < 0.01);
/// # Ok::<(), framecut::FramecutError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawFrameRate")]
pub struct FrameRate {
    numerator: f64,
    denominator: f64,
}

/// Wire form of [`FrameRate`], checked by [`FrameRate::new`] on the way in.
#[derive(Deserialize)]
struct RawFrameRate {
    numerator: f64,
    denominator: f64,
}

impl TryFrom<RawFrameRate> for FrameRate {
    type Error = FramecutError;

    fn try_from(raw: RawFrameRate) -> Result<Self, Self::Error> {
        Self::new(raw.numerator, raw.denominator)
    }
}

impl FrameRate {
    /// Build a frame rate from its two terms.
    ///
    /// # Errors
    ///
    /// Returns [`FramecutError::InvalidFrameRate`] if the denominator is zero
    /// or the ratio is not a finite positive number.
    pub fn new(numerator: f64, denominator: f64) -> Result<Self, FramecutError> {
        if denominator == 0.0 {
            return Err(FramecutError::InvalidFrameRate(format!(
                "{numerator}/{denominator} has a zero denominator"
            )));
        }
        let ratio = numerator / denominator;
        if !ratio.is_finite() || ratio <= 0.0 {
            return Err(FramecutError::InvalidFrameRate(format!(
                "{numerator}/{denominator} is not a positive rate"
            )));
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }

    /// Build a frame rate from a plain frames-per-second value.
    pub fn from_fps(frames_per_second: f64) -> Result<Self, FramecutError> {
        Self::new(frames_per_second, 1.0)
    }

    /// The numerator as parsed.
    pub fn numerator(&self) -> f64 {
        self.numerator
    }

    /// The denominator as parsed.
    pub fn denominator(&self) -> f64 {
        self.denominator
    }

    /// The ratio as frames per second. Always finite and positive.
    pub fn frames_per_second(&self) -> f64 {
        self.numerator / self.denominator
    }
}

impl Display for FrameRate {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

impl FromStr for FrameRate {
    type Err = FramecutError;

    /// Parse `"<num>/<den>"`, or a bare number as `n/1`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || FramecutError::InvalidFrameRate(format!("cannot parse {value:?}"));
        let trimmed = value.trim();

        let (numerator, denominator) = match trimmed.split_once('/') {
            Some((numerator, denominator)) => (numerator.trim(), denominator.trim()),
            None => (trimmed, "1"),
        };
        let numerator = numerator.parse::<f64>().map_err(|_| invalid())?;
        let denominator = denominator.parse::<f64>().map_err(|_| invalid())?;

        Self::new(numerator, denominator)
    }
}

/// Probed metadata for one episode video.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[must_use]
pub struct VideoMetadata {
    /// Total frames reported by the probe. Zero when the container does not
    /// record a frame count.
    pub frame_count: FrameCount,
    /// Nominal frame rate of the video stream.
    pub frame_rate: FrameRate,
}

impl VideoMetadata {
    /// Playback duration in seconds implied by the frame count and rate.
    pub fn duration_seconds(&self) -> f64 {
        self.frame_count as f64 / self.frame_rate.frames_per_second()
    }
}
