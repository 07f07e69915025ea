//! Subprocess backend tests.
//!
//! Stand-in `ffprobe` / `ffmpeg` shell scripts are written to a temporary
//! directory so the real tools are not needed. Unix only.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

use framecut::{
    Engine, Extractor, ExtractorConfig, FfmpegEngine, FfprobeBackend, FramecutError,
    MetadataProbe, VideoRef, plan_clip, plan_frame,
};
use tempfile::TempDir;

struct Scripts {
    _directory: TempDir,
    bin: PathBuf,
}

impl Scripts {
    fn path(&self, name: &str) -> PathBuf {
        self.bin.join(name)
    }
}

const SCRIPTS: &[(&str, &str)] = &[
    (
        "ffprobe-ok",
        r#"echo '{"programs": [], "streams": [{"nb_frames": "34176", "r_frame_rate": "24000/1001"}]}'"#,
    ),
    (
        "ffprobe-no-frames",
        r#"echo '{"streams": [{"r_frame_rate": "24000/1001"}]}'"#,
    ),
    ("ffprobe-no-stream", r#"echo '{"streams": []}'"#),
    ("ffprobe-garbage", "echo 'not json'"),
    ("ffprobe-fail", "echo 'moov atom not found' >&2; exit 1"),
    ("ffprobe-stall", "sleep 30"),
    // Echo the arguments back, one per line, as the "encoded" output.
    ("ffmpeg-echo", r#"for arg in "$@"; do printf '%s\n' "$arg"; done"#),
    ("ffmpeg-fail", "echo 'Invalid data found when processing input' >&2; exit 1"),
];

/// All scripts are written before any test spawns a process, so no child can
/// inherit a script that is still open for writing.
fn scripts() -> &'static Scripts {
    static SCRIPTS_DIR: OnceLock<Scripts> = OnceLock::new();
    SCRIPTS_DIR.get_or_init(|| {
        let directory = tempfile::tempdir().expect("Failed to create temp dir");
        let bin = directory.path().join("bin");
        fs::create_dir(&bin).expect("Failed to create bin dir");
        for (name, body) in SCRIPTS {
            let path = bin.join(name);
            fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("Failed to write script");
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
                .expect("Failed to mark script executable");
        }
        Scripts {
            _directory: directory,
            bin,
        }
    })
}

fn probe(script: &str, timeout: Duration) -> MetadataProbe<FfprobeBackend> {
    MetadataProbe::new(FfprobeBackend::new(scripts().path(script)), timeout)
}

fn video() -> VideoRef {
    VideoRef::new("ep01").expect("valid episode key")
}

fn lines(bytes: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(bytes)
        .lines()
        .map(str::to_string)
        .collect()
}

// ── ffprobe backend ──────────────────────────────────────────────

#[tokio::test]
async fn ffprobe_output_is_parsed() {
    let metadata = probe("ffprobe-ok", Duration::from_secs(5))
        .probe_video(Path::new("ep01.mp4"))
        .await
        .unwrap();
    assert_eq!(metadata.frame_count, 34_176);
    assert!((metadata.frame_rate.frames_per_second() - 23.976).abs() < 0.001);
}

#[tokio::test]
async fn missing_frame_count_is_a_parse_error() {
    let result = probe("ffprobe-no-frames", Duration::from_secs(5))
        .probe_video(Path::new("ep01.mkv"))
        .await;
    assert!(matches!(
        result,
        Err(FramecutError::ProbeParseError {
            field: "frame count",
            ..
        })
    ));
}

#[tokio::test]
async fn missing_video_stream_is_reported() {
    let result = probe("ffprobe-no-stream", Duration::from_secs(5))
        .probe_video(Path::new("audio.m4a"))
        .await;
    assert!(matches!(result, Err(FramecutError::NoVideoStream(_))));
}

#[tokio::test]
async fn unreadable_probe_output_is_a_probe_failure() {
    let result = probe("ffprobe-garbage", Duration::from_secs(5))
        .probe_video(Path::new("ep01.mp4"))
        .await;
    assert!(matches!(result, Err(FramecutError::ProbeFailed { .. })));
}

#[tokio::test]
async fn failing_probe_carries_stderr() {
    let result = probe("ffprobe-fail", Duration::from_secs(5))
        .probe_video(Path::new("ep01.mp4"))
        .await;
    match result {
        Err(FramecutError::ProbeFailed { reason, .. }) => {
            assert!(reason.contains("moov atom not found"), "reason: {reason}");
        }
        other => panic!("expected ProbeFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_probe_binary_is_a_probe_failure() {
    let probe = MetadataProbe::new(
        FfprobeBackend::new(scripts().path("does-not-exist")),
        Duration::from_secs(5),
    );
    let result = probe.probe_video(Path::new("ep01.mp4")).await;
    assert!(matches!(result, Err(FramecutError::ProbeFailed { .. })));
}

#[tokio::test]
async fn stalled_ffprobe_times_out() {
    let started = std::time::Instant::now();
    let result = probe("ffprobe-stall", Duration::from_millis(200))
        .probe_video(Path::new("ep01.mp4"))
        .await;
    assert!(started.elapsed() < Duration::from_secs(10));
    assert!(matches!(result, Err(FramecutError::ProbeTimeout { .. })));
}

// ── ffmpeg engine ────────────────────────────────────────────────

#[tokio::test]
async fn engine_passes_still_arguments() {
    let engine = FfmpegEngine::new(scripts().path("ffmpeg-echo"));
    let plan = plan_frame(video(), 48, 24.0).unwrap();
    let source = Path::new("/srv/mygo-anime/ep01.mp4");
    let output = engine.execute(&plan, source).await.unwrap();

    let expected: Vec<String> = FfmpegEngine::arguments(&plan, source)
        .into_iter()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect();
    assert_eq!(lines(&output), expected);
}

#[tokio::test]
async fn engine_passes_reversal_through() {
    let engine = FfmpegEngine::new(scripts().path("ffmpeg-echo"));
    let plan = plan_clip(video(), 300, 240, 24.0).unwrap();
    let output = lines(
        &engine
            .execute(&plan, Path::new("ep01.mp4"))
            .await
            .unwrap(),
    );

    let graph = output
        .iter()
        .skip_while(|arg| *arg != "-filter_complex")
        .nth(1)
        .expect("filter graph argument");
    assert!(graph.starts_with("[0:v]reverse,"), "graph: {graph}");
}

#[tokio::test]
async fn engine_failure_carries_stderr() {
    let engine = FfmpegEngine::new(scripts().path("ffmpeg-fail"));
    let plan = plan_frame(video(), 0, 24.0).unwrap();
    match engine.execute(&plan, Path::new("ep01.mp4")).await {
        Err(FramecutError::EngineExecutionError(message)) => {
            assert!(message.contains("Invalid data found"), "message: {message}");
        }
        other => panic!("expected EngineExecutionError, got {other:?}"),
    }
}

#[tokio::test]
async fn engine_rejects_clip_without_end_before_spawning() {
    // The echo script would succeed; the plan must be refused first.
    let engine = FfmpegEngine::new(scripts().path("ffmpeg-echo"));
    let mut plan = plan_clip(video(), 240, 300, 24.0).unwrap();
    plan.end = None;
    assert!(matches!(
        engine.execute(&plan, Path::new("ep01.mp4")).await,
        Err(FramecutError::InvalidPlan(_))
    ));
}

#[tokio::test]
async fn missing_engine_binary_is_an_engine_error() {
    let engine = FfmpegEngine::new(scripts().path("does-not-exist"));
    let plan = plan_frame(video(), 0, 24.0).unwrap();
    assert!(matches!(
        engine.execute(&plan, Path::new("ep01.mp4")).await,
        Err(FramecutError::EngineExecutionError(_))
    ));
}

// ── End to end ───────────────────────────────────────────────────

#[tokio::test]
async fn extractor_runs_both_tools() {
    let config = ExtractorConfig::new("/srv")
        .with_ffprobe_path(scripts().path("ffprobe-ok"))
        .with_ffmpeg_path(scripts().path("ffmpeg-echo"));
    let extractor = Extractor::new(config);

    let output = lines(&extractor.extract_gif_probed("ep01", 1200, 1320).await.unwrap());
    assert!(output.contains(&"/srv/mygo-anime/ep01.mp4".to_string()));
    assert!(output.contains(&"gif".to_string()));

    let result = extractor.extract_frame_probed("ep01", 34_176).await;
    assert!(matches!(
        result,
        Err(FramecutError::FrameOutOfRange {
            frame_number: 34_176,
            total_frames: 34_176,
        })
    ));
}
