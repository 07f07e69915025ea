//! Extract a GIF clip (and a still) from an episode.
//!
//! Usage: `cargo run --example extract_gif -- <root> <episode> <start> <end>`
//!
//! Expects `<root>/mygo-anime/<episode>.mp4` and `ffmpeg` / `ffprobe` on
//! `PATH`. A start frame greater than the end frame produces a reversed clip.

use framecut::{Extractor, ExtractorConfig, FramecutError};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), FramecutError> {
    let mut args = std::env::args().skip(1);
    let usage = "Usage: extract_gif <root> <episode> <start> <end>";
    let root = args.next().expect(usage);
    let episode = args.next().expect(usage);
    let start: i64 = args.next().and_then(|v| v.parse().ok()).expect(usage);
    let end: i64 = args.next().and_then(|v| v.parse().ok()).expect(usage);

    let extractor = Extractor::new(ExtractorConfig::new(root));

    let metadata = extractor.probe(&episode).await?;
    println!(
        "Input: {} frames @ {:.3} fps",
        metadata.frame_count,
        metadata.frame_rate.frames_per_second()
    );

    let gif = extractor.extract_gif_probed(&episode, start, end).await?;
    std::fs::write("output.gif", &gif)?;
    println!("GIF saved to output.gif ({} bytes)", gif.len());

    let still = extractor.extract_frame_probed(&episode, start).await?;
    std::fs::write("output.jpg", &still)?;
    println!("Still saved to output.jpg ({} bytes)", still.len());

    Ok(())
}
