//! Print the extraction plan and ffmpeg command line for a frame range
//! without touching any media.
//!
//! Usage: `cargo run --example plan_only -- <episode> <start> <end> <fps>`

use framecut::{ExtractorConfig, FfmpegEngine, FramecutError, VideoRef, plan_clip};

fn main() -> Result<(), FramecutError> {
    let mut args = std::env::args().skip(1);
    let usage = "Usage: plan_only <episode> <start> <end> <fps>";
    let episode = VideoRef::new(args.next().expect(usage))?;
    let start: i64 = args.next().and_then(|v| v.parse().ok()).expect(usage);
    let end: i64 = args.next().and_then(|v| v.parse().ok()).expect(usage);
    let fps: framecut::FrameRate = args.next().expect(usage).parse()?;

    let plan = plan_clip(episode, start, end, fps.frames_per_second())?;
    println!("{plan:#?}");

    let source = ExtractorConfig::new("/srv").library().resolve(&plan.video);
    let args: Vec<String> = FfmpegEngine::arguments(&plan, &source)
        .iter()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect();
    println!("ffmpeg {}", args.join(" "));

    Ok(())
}
