//! Extraction plans.
//!
//! An [`ExtractionPlan`] is the complete, engine-independent description of
//! one request: which episode, which timecodes, still or clip, and whether the
//! clip plays backwards. Plans are built once by [`plan_frame`] or
//! [`plan_clip`] and handed to an [`Engine`](crate::Engine) exactly once.
//!
//! Ranged clips always go through the two-pass palette pipeline
//! (`palettegen` then `paletteuse`); there is no per-frame quantization mode.
//!
//! # Example
//!
//! ```
//! use framecut::{ExtractionMode, VideoRef, plan_clip};
//!
//! let plan = plan_clip(VideoRef::new("ep01")?, 300, 240, 24.0)?;
//! assert_eq!(plan.mode, ExtractionMode::RangedClip);
//! assert_eq!(plan.start.as_str(), "00:00:10.000");
//! assert!(plan.reversed);
//! # Ok::<(), framecut::FramecutError>(())
//! ```

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

use crate::error::FramecutError;
use crate::library::VideoRef;
use crate::metadata::{FrameCount, FrameIndex};
use crate::range::{FrameSpan, normalize};
use crate::timecode::{Timecode, frame_to_time};

/// What kind of output a plan produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMode {
    /// One still image, MJPEG encoded.
    SingleFrame,
    /// An animated GIF built with a generated palette.
    RangedClip,
}

impl ExtractionMode {
    /// File extension conventionally used for this mode's output.
    pub fn extension(self) -> &'static str {
        match self {
            ExtractionMode::SingleFrame => "jpg",
            ExtractionMode::RangedClip => "gif",
        }
    }

    /// MIME type of this mode's output.
    pub fn mime_type(self) -> &'static str {
        match self {
            ExtractionMode::SingleFrame => "image/jpeg",
            ExtractionMode::RangedClip => "image/gif",
        }
    }
}

impl Display for ExtractionMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ExtractionMode::SingleFrame => write!(f, "single frame"),
            ExtractionMode::RangedClip => write!(f, "ranged clip"),
        }
    }
}

/// Immutable description of one extraction.
///
/// Deserialized plans go through [`ExtractionPlan::validate`], so a plan read
/// from JSON has the same shape as one built by [`plan_frame`] or
/// [`plan_clip`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawExtractionPlan")]
#[must_use]
pub struct ExtractionPlan {
    /// Episode to read from.
    pub video: VideoRef,
    /// Still or clip.
    pub mode: ExtractionMode,
    /// First frame of the extraction.
    pub start_frame: FrameIndex,
    /// Last frame of a clip. `None` for stills.
    pub end_frame: Option<FrameIndex>,
    /// Seek position of `start_frame`.
    pub start: Timecode,
    /// Position of `end_frame`. `None` for stills.
    pub end: Option<Timecode>,
    /// Play the clip from `end` back to `start`. Always `false` for stills.
    pub reversed: bool,
}

#[derive(Deserialize)]
struct RawExtractionPlan {
    video: VideoRef,
    mode: ExtractionMode,
    start_frame: FrameIndex,
    end_frame: Option<FrameIndex>,
    start: Timecode,
    end: Option<Timecode>,
    reversed: bool,
}

impl TryFrom<RawExtractionPlan> for ExtractionPlan {
    type Error = FramecutError;

    fn try_from(raw: RawExtractionPlan) -> Result<Self, Self::Error> {
        let plan = ExtractionPlan {
            video: raw.video,
            mode: raw.mode,
            start_frame: raw.start_frame,
            end_frame: raw.end_frame,
            start: raw.start,
            end: raw.end,
            reversed: raw.reversed,
        };
        plan.validate()?;
        Ok(plan)
    }
}

impl ExtractionPlan {
    /// Check that the fields describe one coherent extraction.
    ///
    /// A still has no end and is never reversed. A clip has both ends, and
    /// its end frame lies after the start frame and its end timecode does not
    /// precede the start timecode. The
    /// frame rate is not part of a plan, so timecodes are only checked for
    /// order against their frames.
    ///
    /// # Errors
    ///
    /// - [`FramecutError::InvalidFrameNumber`] for a negative frame.
    /// - [`FramecutError::InvalidPlan`] for any other inconsistency.
    pub fn validate(&self) -> Result<(), FramecutError> {
        if self.start_frame < 0 {
            return Err(FramecutError::InvalidFrameNumber(self.start_frame));
        }
        let invalid = |reason: &str| Err(FramecutError::InvalidPlan(reason.to_string()));

        match (self.mode, self.end_frame, &self.end) {
            (ExtractionMode::SingleFrame, None, None) => {
                if self.reversed {
                    return invalid("a single frame cannot be reversed");
                }
            }
            (ExtractionMode::SingleFrame, _, _) => {
                return invalid("a single frame has no end");
            }
            (ExtractionMode::RangedClip, Some(end_frame), Some(end)) => {
                if end_frame <= self.start_frame {
                    return invalid("clip end frame must follow its start frame");
                }
                if end.seconds() < self.start.seconds() {
                    return invalid("clip end timecode precedes its start timecode");
                }
            }
            (ExtractionMode::RangedClip, _, _) => {
                return invalid("a ranged clip needs both an end frame and an end timecode");
            }
        }
        Ok(())
    }

    /// Whether the engine must build the palette filter graph.
    pub fn uses_palette(&self) -> bool {
        self.mode == ExtractionMode::RangedClip
    }

    /// Reject plans that reach past the last probed frame.
    ///
    /// A `frame_count` of zero means the container did not report one, and
    /// every plan passes.
    ///
    /// # Errors
    ///
    /// Returns [`FramecutError::FrameOutOfRange`] naming the highest planned
    /// frame when it is `>= frame_count`.
    pub fn check_bounds(&self, frame_count: FrameCount) -> Result<(), FramecutError> {
        if frame_count == 0 {
            return Ok(());
        }
        let last = self.end_frame.unwrap_or(self.start_frame);
        if last < 0 || last as u64 >= frame_count {
            return Err(FramecutError::FrameOutOfRange {
                frame_number: last,
                total_frames: frame_count,
            });
        }
        Ok(())
    }
}

/// Plan the extraction of a single still.
///
/// # Errors
///
/// - [`FramecutError::InvalidFrameNumber`] if `frame` is negative.
/// - [`FramecutError::InvalidFrameRate`] if `frames_per_second` is not a
///   finite positive number.
pub fn plan_frame(
    video: VideoRef,
    frame: FrameIndex,
    frames_per_second: f64,
) -> Result<ExtractionPlan, FramecutError> {
    if frame < 0 {
        return Err(FramecutError::InvalidFrameNumber(frame));
    }
    let start = frame_to_time(frame, frames_per_second)?;

    Ok(ExtractionPlan {
        video,
        mode: ExtractionMode::SingleFrame,
        start_frame: frame,
        end_frame: None,
        start,
        end: None,
        reversed: false,
    })
}

/// Plan the extraction of a GIF clip between two frames.
///
/// The ends may be given in either order; a descending pair produces a
/// reversed clip. Equal ends are not an error: the result is the same plan
/// [`plan_frame`] would build for that frame.
///
/// # Errors
///
/// Same as [`plan_frame`], for either end.
pub fn plan_clip(
    video: VideoRef,
    start_frame: FrameIndex,
    end_frame: FrameIndex,
    frames_per_second: f64,
) -> Result<ExtractionPlan, FramecutError> {
    let range = match normalize(start_frame, end_frame)? {
        FrameSpan::Single(frame) => return plan_frame(video, frame, frames_per_second),
        FrameSpan::Range(range) => range,
    };

    let start = frame_to_time(range.start, frames_per_second)?;
    let end = frame_to_time(range.end, frames_per_second)?;

    Ok(ExtractionPlan {
        video,
        mode: ExtractionMode::RangedClip,
        start_frame: range.start,
        end_frame: Some(range.end),
        start,
        end: Some(end),
        reversed: range.reversed,
    })
}
