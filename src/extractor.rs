//! Request orchestration.
//!
//! [`Extractor`] is the main entry point for the crate. It resolves episode
//! keys through the configured [`EpisodeLibrary`], probes metadata when the
//! caller does not supply a frame rate, builds an [`ExtractionPlan`], and
//! hands it to an [`Engine`].
//!
//! Each request walks the [`RequestState`] machine
//! `Received → Probed → Planned → Executing → Completed | Failed`. There are
//! no retries; a failed request returns its error and no partial output.
//!
//! `Extractor` holds no mutable state, so one value can be shared (for
//! example behind an `Arc`) by any number of concurrent requests.

use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::configuration::ExtractorConfig;
use crate::engine::{Engine, FfmpegEngine};
use crate::error::FramecutError;
use crate::library::{EpisodeLibrary, VideoRef};
use crate::metadata::{FrameIndex, VideoMetadata};
use crate::plan::{ExtractionPlan, plan_clip, plan_frame};
use crate::probe::{FfprobeBackend, MetadataProbe, ProbeBackend};

/// Lifecycle of a single extraction request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestState {
    /// The request has been accepted.
    Received,
    /// Metadata has been probed.
    Probed,
    /// An [`ExtractionPlan`] has been built.
    Planned,
    /// The engine is running.
    Executing,
    /// The engine returned output.
    Completed,
    /// The request ended with an error.
    Failed,
}

impl RequestState {
    /// Whether no further transition is possible.
    pub fn is_terminal(self) -> bool {
        matches!(self, RequestState::Completed | RequestState::Failed)
    }

    /// Whether `self → next` is a legal transition.
    ///
    /// Probing is skipped when the caller supplies the frame rate, so
    /// `Received → Planned` is legal. Any non-terminal state may fail.
    pub fn can_transition_to(self, next: RequestState) -> bool {
        use RequestState::*;

        match (self, next) {
            (Completed | Failed, _) => false,
            (_, Failed) => true,
            (Received, Probed | Planned) => true,
            (Probed, Planned) => true,
            (Planned, Executing) => true,
            (Executing, Completed) => true,
            _ => false,
        }
    }
}

impl Display for RequestState {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let name = match self {
            RequestState::Received => "received",
            RequestState::Probed => "probed",
            RequestState::Planned => "planned",
            RequestState::Executing => "executing",
            RequestState::Completed => "completed",
            RequestState::Failed => "failed",
        };
        f.write_str(name)
    }
}

struct Request<'a> {
    episode: &'a str,
    state: RequestState,
}

impl<'a> Request<'a> {
    fn received(episode: &'a str) -> Self {
        log::trace!("Request for {episode}: {}", RequestState::Received);
        Self {
            episode,
            state: RequestState::Received,
        }
    }

    fn advance(&mut self, next: RequestState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal request transition {} -> {}",
            self.state,
            next,
        );
        log::trace!("Request for {}: {} -> {}", self.episode, self.state, next);
        self.state = next;
    }

    fn finish<T>(mut self, result: Result<T, FramecutError>) -> Result<T, FramecutError> {
        match &result {
            Ok(_) => self.advance(RequestState::Completed),
            Err(error) => {
                log::warn!(
                    "Extraction for {} failed while {}: {error}",
                    self.episode,
                    self.state,
                );
                self.advance(RequestState::Failed);
            }
        }
        result
    }
}

/// Frame and GIF extractor for a library of episode videos.
///
/// # Example
///
/// ```no_run
/// use framecut::{Extractor, ExtractorConfig};
///
/// # async fn example() -> Result<(), framecut::FramecutError> {
/// let extractor = Extractor::new(ExtractorConfig::from_home_directory()?);
///
/// // Frame rate supplied by the caller.
/// let jpeg = extractor.extract_frame("ep01", 1200, 23.976).await?;
///
/// // Frame rate probed from the file; frames checked against its length.
/// let gif = extractor.extract_gif_probed("ep01", 1320, 1200).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Extractor<P = FfprobeBackend, E = FfmpegEngine> {
    library: EpisodeLibrary,
    probe: MetadataProbe<P>,
    engine: E,
    bounds_check: bool,
}

impl Extractor {
    /// Create an extractor that uses the `ffprobe` and `ffmpeg` binaries
    /// named in `config`.
    pub fn new(config: ExtractorConfig) -> Self {
        let probe_backend = FfprobeBackend::new(config.ffprobe_path.clone());
        let engine = FfmpegEngine::new(config.ffmpeg_path.clone());
        Self::with_backends(config, probe_backend, engine)
    }
}

impl<P: ProbeBackend, E: Engine> Extractor<P, E> {
    /// Create an extractor with custom probe and engine implementations.
    ///
    /// The tool paths in `config` are ignored; everything else applies.
    pub fn with_backends(config: ExtractorConfig, probe_backend: P, engine: E) -> Self {
        Self {
            library: config.library(),
            probe: MetadataProbe::new(probe_backend, config.probe_timeout),
            engine,
            bounds_check: config.bounds_check,
        }
    }

    /// The episode library used to resolve keys.
    pub fn library(&self) -> &EpisodeLibrary {
        &self.library
    }

    /// The engine that executes plans.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Probe an episode's frame count and frame rate.
    ///
    /// # Errors
    ///
    /// [`FramecutError::InvalidEpisode`] for a bad key, otherwise whatever
    /// [`MetadataProbe::probe_video`] reports.
    pub async fn probe(&self, episode: &str) -> Result<VideoMetadata, FramecutError> {
        let video = VideoRef::new(episode)?;
        self.probe_video(&video).await
    }

    /// Plan a still without executing it.
    pub fn plan_frame(
        &self,
        episode: &str,
        frame: FrameIndex,
        frames_per_second: f64,
    ) -> Result<ExtractionPlan, FramecutError> {
        plan_frame(VideoRef::new(episode)?, frame, frames_per_second)
    }

    /// Plan a clip without executing it.
    pub fn plan_clip(
        &self,
        episode: &str,
        start_frame: FrameIndex,
        end_frame: FrameIndex,
        frames_per_second: f64,
    ) -> Result<ExtractionPlan, FramecutError> {
        plan_clip(
            VideoRef::new(episode)?,
            start_frame,
            end_frame,
            frames_per_second,
        )
    }

    /// Execute a previously built plan.
    ///
    /// # Errors
    ///
    /// [`FramecutError::InvalidPlan`] if the plan's fields were edited into
    /// an inconsistent shape, otherwise whatever the engine reports,
    /// typically [`FramecutError::EngineExecutionError`].
    pub async fn execute(&self, plan: &ExtractionPlan) -> Result<Vec<u8>, FramecutError> {
        plan.validate()?;
        let source = self.library.resolve(&plan.video);
        log::info!(
            "Extracting {} from {} (start={}, end={}, reversed={})",
            plan.mode,
            source.display(),
            plan.start,
            plan.end.as_ref().map_or("-", |end| end.as_str()),
            plan.reversed,
        );
        self.engine.execute(plan, &source).await
    }

    /// Extract one frame as a JPEG, using a caller-supplied frame rate.
    ///
    /// No probe runs, so the frame is not checked against the video length.
    ///
    /// # Errors
    ///
    /// - [`FramecutError::InvalidEpisode`], [`FramecutError::InvalidFrameNumber`],
    ///   [`FramecutError::InvalidFrameRate`] for bad input.
    /// - [`FramecutError::EngineExecutionError`] if the engine fails.
    pub async fn extract_frame(
        &self,
        episode: &str,
        frame: FrameIndex,
        frames_per_second: f64,
    ) -> Result<Vec<u8>, FramecutError> {
        let mut request = Request::received(episode);
        let result = async {
            let plan = self.plan_frame(episode, frame, frames_per_second)?;
            request.advance(RequestState::Planned);
            self.execute_request(&mut request, &plan).await
        }
        .await;
        request.finish(result)
    }

    /// Extract a GIF clip between two frames, using a caller-supplied frame
    /// rate.
    ///
    /// A descending pair produces a reversed clip. Equal ends produce a
    /// JPEG still, exactly as [`extract_frame`](Extractor::extract_frame)
    /// would.
    ///
    /// # Errors
    ///
    /// Same as [`extract_frame`](Extractor::extract_frame).
    pub async fn extract_gif(
        &self,
        episode: &str,
        start_frame: FrameIndex,
        end_frame: FrameIndex,
        frames_per_second: f64,
    ) -> Result<Vec<u8>, FramecutError> {
        let mut request = Request::received(episode);
        let result = async {
            let plan = self.plan_clip(episode, start_frame, end_frame, frames_per_second)?;
            request.advance(RequestState::Planned);
            self.execute_request(&mut request, &plan).await
        }
        .await;
        request.finish(result)
    }

    /// Extract one frame, probing the episode for its frame rate first.
    ///
    /// When bounds checking is enabled the frame must be below the probed
    /// frame count.
    ///
    /// # Errors
    ///
    /// Everything [`extract_frame`](Extractor::extract_frame) reports, plus
    /// probe errors and [`FramecutError::FrameOutOfRange`].
    pub async fn extract_frame_probed(
        &self,
        episode: &str,
        frame: FrameIndex,
    ) -> Result<Vec<u8>, FramecutError> {
        let mut request = Request::received(episode);
        let result = async {
            let video = VideoRef::new(episode)?;
            let metadata = self.probe_video(&video).await?;
            request.advance(RequestState::Probed);

            let plan = plan_frame(video, frame, metadata.frame_rate.frames_per_second())?;
            self.check_bounds(&plan, &metadata)?;
            request.advance(RequestState::Planned);

            self.execute_request(&mut request, &plan).await
        }
        .await;
        request.finish(result)
    }

    /// Extract a GIF clip, probing the episode for its frame rate first.
    ///
    /// # Errors
    ///
    /// Same as [`extract_frame_probed`](Extractor::extract_frame_probed).
    pub async fn extract_gif_probed(
        &self,
        episode: &str,
        start_frame: FrameIndex,
        end_frame: FrameIndex,
    ) -> Result<Vec<u8>, FramecutError> {
        let mut request = Request::received(episode);
        let result = async {
            let video = VideoRef::new(episode)?;
            let metadata = self.probe_video(&video).await?;
            request.advance(RequestState::Probed);

            let plan = plan_clip(
                video,
                start_frame,
                end_frame,
                metadata.frame_rate.frames_per_second(),
            )?;
            self.check_bounds(&plan, &metadata)?;
            request.advance(RequestState::Planned);

            self.execute_request(&mut request, &plan).await
        }
        .await;
        request.finish(result)
    }

    async fn probe_video(&self, video: &VideoRef) -> Result<VideoMetadata, FramecutError> {
        let path = self.library.resolve(video);
        self.probe.probe_video(&path).await
    }

    fn check_bounds(
        &self,
        plan: &ExtractionPlan,
        metadata: &VideoMetadata,
    ) -> Result<(), FramecutError> {
        if self.bounds_check {
            plan.check_bounds(metadata.frame_count)?;
        }
        Ok(())
    }

    async fn execute_request(
        &self,
        request: &mut Request<'_>,
        plan: &ExtractionPlan,
    ) -> Result<Vec<u8>, FramecutError> {
        request.advance(RequestState::Executing);
        self.execute(plan).await
    }
}
