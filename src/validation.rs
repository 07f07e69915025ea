//! Probed metadata sanity checks.
//!
//! [`validate_metadata`] inspects a [`VideoMetadata`] and returns a
//! [`ValidationReport`] describing anything that would make frame-addressed
//! extraction unreliable.
//!
//! # Example
//!
//! ```
//! use framecut::{VideoMetadata, validate_metadata};
//!
//! let metadata = VideoMetadata {
//!     frame_count: 34_176,
//!     frame_rate: "24000/1001".parse()?,
//! };
//! let report = validate_metadata(&metadata);
//! assert!(!report.has_warnings());
//! # Ok::<(), framecut::FramecutError>(())
//! ```

use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::metadata::VideoMetadata;

/// Frame rates above this are almost certainly a mis-reported time base.
const SUSPICIOUS_FRAME_RATE: f64 = 240.0;

/// Summary of metadata validation.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    /// Informational notices (not problems).
    pub info: Vec<String>,
    /// Issues that may affect extraction accuracy.
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// Returns `true` if any warning was raised.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Total number of entries (info + warnings).
    pub fn issue_count(&self) -> usize {
        self.info.len() + self.warnings.len()
    }
}

impl Display for ValidationReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        for item in &self.info {
            writeln!(f, "[INFO] {item}")?;
        }
        for item in &self.warnings {
            writeln!(f, "[WARN] {item}")?;
        }
        Ok(())
    }
}

/// Run sanity checks on probed metadata.
pub fn validate_metadata(metadata: &VideoMetadata) -> ValidationReport {
    let mut report = ValidationReport::default();
    let rate = metadata.frame_rate;
    let frames_per_second = rate.frames_per_second();

    // ── Frame count ────────────────────────────────────────────────
    if metadata.frame_count == 0 {
        report.warnings.push(
            "Frame count is zero (the container may not record it); bounds checks are skipped"
                .to_string(),
        );
    }

    // ── Frame rate ─────────────────────────────────────────────────
    if frames_per_second > SUSPICIOUS_FRAME_RATE {
        report.warnings.push(format!(
            "Unusually high frame rate ({frames_per_second:.1} fps); timecodes may be inaccurate",
        ));
    }

    if rate.denominator().fract() != 0.0 || rate.numerator().fract() != 0.0 {
        report.info.push(format!(
            "Frame rate {rate} is not an integer ratio; timecodes are rounded to the millisecond",
        ));
    }

    report.info.push(format!(
        "Video: ~{} frames @ {:.3} fps ({:.1} s)",
        metadata.frame_count,
        frames_per_second,
        metadata.duration_seconds(),
    ));

    report
}
