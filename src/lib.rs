//! # framecut
//!
//! Extract still frames and palette-optimized GIF clips from episode videos,
//! addressed by episode key and frame number instead of file path and
//! wall-clock time.
//!
//! `framecut` owns the frame/time arithmetic and request orchestration:
//! converting frame numbers to engine timecodes, normalizing reversed and
//! degenerate frame ranges, and deciding between a single-frame capture and a
//! two-pass palette GIF. Decoding and encoding are delegated to an
//! [`Engine`] (by default the `ffmpeg` binary) and metadata to a
//! [`ProbeBackend`] (by default `ffprobe`).
//!
//! ## Quick Start
//!
//! ### Extract a Frame
//!
//! ```no_run
//! use framecut::{Extractor, ExtractorConfig};
//!
//! # async fn example() -> Result<(), framecut::FramecutError> {
//! let extractor = Extractor::new(ExtractorConfig::new("/srv/media"));
//! let jpeg = extractor.extract_frame("ep01", 1200, 23.976).await?;
//! std::fs::write("frame.jpg", jpeg)?;
//! # Ok(())
//! # }
//! ```
//!
//! ### Extract a Reversed GIF
//!
//! ```no_run
//! use framecut::{Extractor, ExtractorConfig};
//!
//! # async fn example() -> Result<(), framecut::FramecutError> {
//! let extractor = Extractor::new(ExtractorConfig::new("/srv/media"));
//! // Start after end: the clip plays backwards.
//! let gif = extractor.extract_gif_probed("ep01", 1320, 1200).await?;
//! std::fs::write("clip.gif", gif)?;
//! # Ok(())
//! # }
//! ```
//!
//! ### Plan Without Running Anything
//!
//! ```
//! use framecut::{ExtractionMode, VideoRef, plan_clip};
//!
//! let plan = plan_clip(VideoRef::new("ep01")?, 7, 7, 24.0)?;
//! assert_eq!(plan.mode, ExtractionMode::SingleFrame);
//! # Ok::<(), framecut::FramecutError>(())
//! ```
//!
//! ## Features
//!
//! - **Timecodes**: `HH:MM:SS.mmm`, rounded to the millisecond
//! - **Range normalization**: reversed ranges become reversed clips, equal
//!   ends become stills
//! - **Serializable plans**: inspect or ship an [`ExtractionPlan`] as JSON
//! - **Bounded probing**: metadata probes time out (5 s by default) with a
//!   recoverable error
//! - **Bounds checking**: optional rejection of frames past the probed end
//!
//! ### Optional Features
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `libav` | `LibavBackend`, an in-process probe backend built on `ffmpeg-next` |

pub mod configuration;
pub mod engine;
pub mod error;
pub mod extractor;
pub mod library;
pub mod metadata;
pub mod plan;
pub mod probe;
pub mod range;
pub mod timecode;
pub mod validation;

pub use configuration::{
    DEFAULT_COLLECTION, DEFAULT_EXTENSION, DEFAULT_PROBE_TIMEOUT, ExtractorConfig,
};
pub use engine::{Engine, FfmpegEngine, palette_filter_graph};
pub use error::FramecutError;
pub use extractor::{Extractor, RequestState};
pub use library::{EpisodeLibrary, VideoRef};
pub use metadata::{FrameCount, FrameIndex, FrameRate, VideoMetadata};
pub use plan::{ExtractionMode, ExtractionPlan, plan_clip, plan_frame};
#[cfg(feature = "libav")]
pub use probe::LibavBackend;
pub use probe::{
    FfprobeBackend, MetadataProbe, ProbeBackend, RawStreamInfo, parse_stream_info,
};
pub use range::{FrameRange, FrameSpan, normalize};
pub use timecode::{Timecode, frame_to_time};
pub use validation::{ValidationReport, validate_metadata};
