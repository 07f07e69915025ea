//! Episode identifiers and their on-disk locations.
//!
//! A [`VideoRef`] is an opaque episode key such as `"ep03"`. The
//! [`EpisodeLibrary`] turns it into `<root>/<collection>/<key>.<extension>`
//! using values fixed at startup, so nothing below this layer reads the
//! environment or branches on the host platform.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::FramecutError;

/// Opaque episode identifier.
///
/// Keys are single path components: empty keys, keys containing `/` or
/// `\`, and the special names `.` and `..` are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VideoRef(String);

impl VideoRef {
    /// Validate and wrap an episode key.
    ///
    /// # Errors
    ///
    /// Returns [`FramecutError::InvalidEpisode`] if the key could escape the
    /// collection directory.
    pub fn new(episode: impl Into<String>) -> Result<Self, FramecutError> {
        let episode = episode.into();
        let escapes = episode.is_empty()
            || episode == "."
            || episode == ".."
            || episode.contains(['/', '\\', '\0']);
        if escapes {
            return Err(FramecutError::InvalidEpisode(episode));
        }
        Ok(Self(episode))
    }

    /// The episode key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for VideoRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for VideoRef {
    type Error = FramecutError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<VideoRef> for String {
    fn from(video: VideoRef) -> Self {
        video.0
    }
}

/// Maps episode keys to video files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeLibrary {
    root: PathBuf,
    collection: String,
    extension: String,
}

impl EpisodeLibrary {
    /// Create a library rooted at `root`.
    pub fn new(
        root: impl Into<PathBuf>,
        collection: impl Into<String>,
        extension: impl Into<String>,
    ) -> Self {
        Self {
            root: root.into(),
            collection: collection.into(),
            extension: extension.into(),
        }
    }

    /// The directory that holds the collection folder.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve an episode to its video file.
    ///
    /// ```
    /// use std::path::Path;
    ///
    /// use framecut::{EpisodeLibrary, VideoRef};
    ///
    /// let library = EpisodeLibrary::new("/srv", "mygo-anime", "mp4");
    /// let path = library.resolve(&VideoRef::new("ep01")?);
    /// assert_eq!(path, Path::new("/srv/mygo-anime/ep01.mp4"));
    /// # Ok::<(), framecut::FramecutError>(())
    /// ```
    pub fn resolve(&self, video: &VideoRef) -> PathBuf {
        self.root
            .join(&self.collection)
            .join(format!("{}.{}", video.as_str(), self.extension))
    }
}
