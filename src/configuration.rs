//! Extractor configuration.
//!
//! [`ExtractorConfig`] is a builder that carries every process-wide setting:
//! the library root, the collection folder and file extension used to
//! resolve episodes, the external tool paths, the probe bound, and whether
//! planned frames are checked against the probed frame count. It is built
//! once at startup and moved into an [`Extractor`](crate::Extractor); nothing
//! deeper in the crate reads the environment.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//!
//! use framecut::ExtractorConfig;
//!
//! let config = ExtractorConfig::new("/srv/media")
//!     .with_collection("mygo-anime")
//!     .with_probe_timeout(Duration::from_secs(2))
//!     .with_bounds_check(false);
//! assert_eq!(config.probe_timeout(), Duration::from_secs(2));
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::FramecutError;
use crate::library::EpisodeLibrary;

/// Default folder under the root that holds episode files.
pub const DEFAULT_COLLECTION: &str = "mygo-anime";

/// Default episode file extension.
pub const DEFAULT_EXTENSION: &str = "mp4";

/// Default bound on a single metadata probe.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Configuration for an [`Extractor`](crate::Extractor).
///
/// Defaults: collection `mygo-anime`, extension `mp4`, tools `ffmpeg` and
/// `ffprobe` from `PATH`, 5 second probe timeout, bounds checking on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractorConfig {
    pub(crate) root: PathBuf,
    pub(crate) collection: String,
    pub(crate) extension: String,
    pub(crate) ffmpeg_path: PathBuf,
    pub(crate) ffprobe_path: PathBuf,
    pub(crate) probe_timeout: Duration,
    pub(crate) bounds_check: bool,
}

impl ExtractorConfig {
    /// Create a configuration rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            collection: DEFAULT_COLLECTION.to_string(),
            extension: DEFAULT_EXTENSION.to_string(),
            ffmpeg_path: PathBuf::from("ffmpeg"),
            ffprobe_path: PathBuf::from("ffprobe"),
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            bounds_check: true,
        }
    }

    /// Create a configuration rooted at the current user's home directory.
    ///
    /// The home directory comes from `HOME` on Unix-like systems and from
    /// the user profile on Windows. Call this once at startup.
    ///
    /// # Errors
    ///
    /// Returns [`FramecutError::Configuration`] if no home directory can be
    /// determined.
    pub fn from_home_directory() -> Result<Self, FramecutError> {
        let home = dirs::home_dir().ok_or_else(|| {
            FramecutError::Configuration("could not determine the home directory".to_string())
        })?;
        log::debug!("Using home directory {} as library root", home.display());
        Ok(Self::new(home))
    }

    /// Set the folder under the root that holds episode files.
    #[must_use]
    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    /// Set the episode file extension (without the dot).
    #[must_use]
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into().trim_start_matches('.').to_string();
        self
    }

    /// Set the `ffmpeg` executable.
    #[must_use]
    pub fn with_ffmpeg_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.ffmpeg_path = path.into();
        self
    }

    /// Set the `ffprobe` executable.
    #[must_use]
    pub fn with_ffprobe_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.ffprobe_path = path.into();
        self
    }

    /// Set the bound on each metadata probe. Zero is clamped to one
    /// millisecond.
    #[must_use]
    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout.max(Duration::from_millis(1));
        self
    }

    /// Enable or disable checking planned frames against the probed frame
    /// count.
    #[must_use]
    pub fn with_bounds_check(mut self, enabled: bool) -> Self {
        self.bounds_check = enabled;
        self
    }

    /// The library root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The `ffmpeg` executable.
    pub fn ffmpeg_path(&self) -> &Path {
        &self.ffmpeg_path
    }

    /// The `ffprobe` executable.
    pub fn ffprobe_path(&self) -> &Path {
        &self.ffprobe_path
    }

    /// The bound on each metadata probe.
    pub fn probe_timeout(&self) -> Duration {
        self.probe_timeout
    }

    /// Whether planned frames are checked against the probed frame count.
    pub fn bounds_check(&self) -> bool {
        self.bounds_check
    }

    /// Build the [`EpisodeLibrary`] described by this configuration.
    pub fn library(&self) -> EpisodeLibrary {
        EpisodeLibrary::new(&self.root, &self.collection, &self.extension)
    }
}
