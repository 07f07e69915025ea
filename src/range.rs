//! Frame range normalization.
//!
//! Callers may name a clip in either direction. [`normalize`] turns any raw
//! `(start, end)` pair into an ordered [`FrameRange`] that remembers whether
//! playback must be reversed, or into [`FrameSpan::Single`] when both ends
//! name the same frame.
//!
//! # Example
//!
//! ```
//! use framecut::{FrameRange, FrameSpan, normalize};
//!
//! let span = normalize(10, 5)?;
//! assert_eq!(
//!     span,
//!     FrameSpan::Range(FrameRange { start: 5, end: 10, reversed: true }),
//! );
//! assert_eq!(normalize(7, 7)?, FrameSpan::Single(7));
//! # Ok::<(), framecut::FramecutError>(())
//! ```

use serde::{Deserialize, Serialize};

use crate::error::FramecutError;
use crate::metadata::FrameIndex;

/// An ordered, non-empty frame range.
///
/// `start < end` always holds. `reversed` is `true` when the caller named
/// the range from its later frame to its earlier one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameRange {
    /// First frame (inclusive).
    pub start: FrameIndex,
    /// Last frame.
    pub end: FrameIndex,
    /// Whether the clip plays from `end` back to `start`.
    pub reversed: bool,
}

impl FrameRange {
    /// Number of frames spanned, counting both ends.
    pub fn len(&self) -> u64 {
        self.end.abs_diff(self.start) + 1
    }

    /// Always `false`: a normalized range holds at least two frames.
    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Result of normalizing a raw frame pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FrameSpan {
    /// Both ends named the same frame; extract a still instead of a clip.
    Single(FrameIndex),
    /// A proper clip.
    Range(FrameRange),
}

/// Order a raw `(start, end)` pair.
///
/// - `start > end` swaps the ends and marks the range reversed.
/// - `start == end` yields [`FrameSpan::Single`].
/// - No upper bound is applied here; see
///   [`ExtractionPlan::check_bounds`](crate::ExtractionPlan::check_bounds).
///
/// # Errors
///
/// Returns [`FramecutError::InvalidFrameNumber`] if either end is negative.
pub fn normalize(start: FrameIndex, end: FrameIndex) -> Result<FrameSpan, FramecutError> {
    let (low, high, reversed) = if start > end {
        (end, start, true)
    } else {
        (start, end, false)
    };

    if low < 0 {
        return Err(FramecutError::InvalidFrameNumber(low));
    }
    if low == high {
        return Ok(FrameSpan::Single(low));
    }

    Ok(FrameSpan::Range(FrameRange {
        start: low,
        end: high,
        reversed,
    }))
}
