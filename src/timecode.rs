//! Frame-number to timecode conversion.
//!
//! Transcoding engines seek by elapsed playback time, while callers address
//! video by frame number. [`frame_to_time`] bridges the two, producing the
//! `HH:MM:SS.mmm` form that `ffmpeg -ss` / `-to` accept.
//!
//! # Example
//!
//! ```
//! use framecut::frame_to_time;
//!
//! let timecode = frame_to_time(1800, 30.0)?;
//! assert_eq!(timecode.as_str(), "00:01:00.000");
//! # Ok::<(), framecut::FramecutError>(())
//! ```

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FramecutError;
use crate::metadata::{FrameIndex, FrameRate};

const MILLIS_PER_SECOND: u64 = 1_000;
const MILLIS_PER_MINUTE: u64 = 60 * MILLIS_PER_SECOND;
const MILLIS_PER_HOUR: u64 = 60 * MILLIS_PER_MINUTE;

/// An elapsed playback position formatted as `HH:MM:SS.mmm`.
///
/// Hours are zero-padded to at least two digits and may grow wider; minutes
/// and seconds are always two digits; milliseconds always three.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Timecode(String);

impl Timecode {
    /// Convert a frame index using a validated [`FrameRate`].
    pub fn from_frame(frame: FrameIndex, rate: &FrameRate) -> Result<Self, FramecutError> {
        frame_to_time(frame, rate.frames_per_second())
    }

    /// Borrow the formatted string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Total elapsed seconds represented by this timecode.
    pub fn seconds(&self) -> f64 {
        // Inner string is always well-formed.
        parse_seconds(&self.0).unwrap_or_default()
    }
}

impl Display for Timecode {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Timecode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Timecode {
    type Err = FramecutError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        parse_seconds(value).ok_or_else(|| FramecutError::InvalidTimecode(value.to_string()))?;
        Ok(Self(value.to_string()))
    }
}

impl TryFrom<String> for Timecode {
    type Error = FramecutError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Timecode> for String {
    fn from(timecode: Timecode) -> Self {
        timecode.0
    }
}

/// Convert a frame index at `frames_per_second` into a [`Timecode`].
///
/// The displayed seconds are rounded to the nearest millisecond. Rounding
/// happens on the total before it is split into fields, so a value such as
/// `59.9996 s` becomes `00:01:00.000` rather than `00:00:60.000`.
///
/// # Errors
///
/// - [`FramecutError::InvalidFrameRate`] if `frames_per_second` is not a
///   finite positive number.
/// - [`FramecutError::InvalidFrameNumber`] if `frame` is negative.
pub fn frame_to_time(frame: FrameIndex, frames_per_second: f64) -> Result<Timecode, FramecutError> {
    if !frames_per_second.is_finite() || frames_per_second <= 0.0 {
        return Err(FramecutError::InvalidFrameRate(format!(
            "{frames_per_second} fps"
        )));
    }
    if frame < 0 {
        return Err(FramecutError::InvalidFrameNumber(frame));
    }

    let seconds = frame as f64 / frames_per_second;
    let total_millis = (seconds * MILLIS_PER_SECOND as f64).round();
    if !total_millis.is_finite() || total_millis >= u64::MAX as f64 {
        return Err(FramecutError::InvalidFrameRate(format!(
            "frame {frame} at {frames_per_second} fps overflows the timecode range"
        )));
    }

    Ok(Timecode(format_millis(total_millis as u64)))
}

fn format_millis(total_millis: u64) -> String {
    let hours = total_millis / MILLIS_PER_HOUR;
    let minutes = (total_millis % MILLIS_PER_HOUR) / MILLIS_PER_MINUTE;
    let seconds = (total_millis % MILLIS_PER_MINUTE) / MILLIS_PER_SECOND;
    let millis = total_millis % MILLIS_PER_SECOND;
    format!("{hours:02}:{minutes:02}:{seconds:02}.{millis:03}")
}

fn parse_seconds(value: &str) -> Option<f64> {
    let mut fields = value.split(':');
    let hours = fields.next()?;
    let minutes = fields.next()?;
    let seconds = fields.next()?;
    if fields.next().is_some() {
        return None;
    }

    let (whole, millis) = seconds.split_once('.')?;
    let all_digits = |text: &str| !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit());
    if hours.len() < 2
        || minutes.len() != 2
        || whole.len() != 2
        || millis.len() != 3
        || ![hours, minutes, whole, millis].into_iter().all(all_digits)
    {
        return None;
    }

    let minutes: u64 = minutes.parse().ok()?;
    let whole: u64 = whole.parse().ok()?;
    if minutes >= 60 || whole >= 60 {
        return None;
    }
    let hours: u64 = hours.parse().ok()?;
    let millis: u64 = millis.parse().ok()?;

    Some(hours as f64 * 3600.0 + minutes as f64 * 60.0 + whole as f64 + millis as f64 / 1000.0)
}
