use std::{
    io::Write,
    path::{Path, PathBuf},
    time::Duration,
};

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use framecut::{
    Extractor, ExtractorConfig, FrameIndex, FrameRate, FramecutError, validate_metadata,
};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;

const CLI_AFTER_HELP: &str = "Examples:\n  framecut probe ep01 --json\n  framecut frame ep01 1200 --out still.jpg\n  framecut gif ep01 1320 1200 --fps 23.976 --out clip.gif\n  framecut plan ep01 1200 1320 --fps 24000/1001\n  framecut completions zsh > _framecut";

#[derive(Debug, Parser)]
#[command(
    name = "framecut",
    version,
    about = "Extract frames and GIF clips from episode videos by frame number",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOptions,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Args, Clone, Default)]
struct GlobalOptions {
    /// Library root (defaults to the home directory).
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Folder under the root that holds episode files.
    #[arg(long, global = true)]
    collection: Option<String>,

    /// Episode file extension.
    #[arg(long, global = true)]
    extension: Option<String>,

    /// Path to the ffmpeg executable.
    #[arg(long, global = true)]
    ffmpeg: Option<PathBuf>,

    /// Path to the ffprobe executable.
    #[arg(long, global = true)]
    ffprobe: Option<PathBuf>,

    /// Metadata probe timeout in milliseconds.
    #[arg(long, global = true)]
    probe_timeout_ms: Option<u64>,

    /// Do not reject frames past the probed frame count.
    #[arg(long, global = true)]
    no_bounds_check: bool,

    /// Allow overwriting existing output files.
    #[arg(long, global = true)]
    overwrite: bool,

    /// Show additional logging output.
    #[arg(long, global = true)]
    verbose: bool,

    /// Show a spinner while the engine runs.
    #[arg(long, global = true)]
    progress: bool,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print frame count and frame rate for an episode.
    #[command(
        about = "Print episode metadata",
        visible_alias = "info",
        after_help = "Examples:\n  framecut probe ep01\n  framecut probe ep01 --json"
    )]
    Probe {
        /// Episode key.
        episode: String,

        /// Output metadata as machine-readable JSON.
        #[arg(long)]
        json: bool,
    },

    /// Extract a single frame as JPEG.
    #[command(
        about = "Extract one frame",
        after_help = "Examples:\n  framecut frame ep01 1200 --out still.jpg\n  framecut frame ep01 1200 --fps 23.976 --out - > still.jpg"
    )]
    Frame {
        /// Episode key.
        episode: String,
        /// Frame number.
        #[arg(allow_negative_numbers = true)]
        frame: FrameIndex,
        /// Frame rate (`24`, `23.976`, `24000/1001`). Probed when omitted.
        #[arg(long)]
        fps: Option<String>,
        /// Output file path, or `-` for stdout.
        #[arg(long)]
        out: PathBuf,
    },

    /// Extract a GIF clip between two frames.
    #[command(
        about = "Extract a GIF clip",
        after_help = "Examples:\n  framecut gif ep01 1200 1320 --out clip.gif\n  framecut gif ep01 1320 1200 --out reversed.gif"
    )]
    Gif {
        /// Episode key.
        episode: String,
        /// First frame. Greater than the end frame for a reversed clip.
        #[arg(allow_negative_numbers = true)]
        start: FrameIndex,
        /// Last frame.
        #[arg(allow_negative_numbers = true)]
        end: FrameIndex,
        /// Frame rate (`24`, `23.976`, `24000/1001`). Probed when omitted.
        #[arg(long)]
        fps: Option<String>,
        /// Output file path, or `-` for stdout.
        #[arg(long)]
        out: PathBuf,
    },

    /// Print the extraction plan as JSON without running the engine.
    #[command(
        about = "Show an extraction plan",
        after_help = "Examples:\n  framecut plan ep01 1200 --fps 24\n  framecut plan ep01 1320 1200 --fps 24000/1001"
    )]
    Plan {
        /// Episode key.
        episode: String,
        /// First frame (or the only frame).
        #[arg(allow_negative_numbers = true)]
        start: FrameIndex,
        /// Last frame, for a clip.
        #[arg(allow_negative_numbers = true)]
        end: Option<FrameIndex>,
        /// Frame rate (`24`, `23.976`, `24000/1001`). Probed when omitted.
        #[arg(long)]
        fps: Option<String>,
    },

    /// Generate shell completion scripts.
    #[command(about = "Generate shell completions")]
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn parse_frame_rate(value: &str) -> Result<f64, FramecutError> {
    value
        .parse::<FrameRate>()
        .map(|rate| rate.frames_per_second())
}

fn build_config(global: &GlobalOptions) -> Result<ExtractorConfig, FramecutError> {
    let mut config = match &global.root {
        Some(root) => ExtractorConfig::new(root),
        None => ExtractorConfig::from_home_directory()?,
    };

    if let Some(collection) = &global.collection {
        config = config.with_collection(collection);
    }
    if let Some(extension) = &global.extension {
        config = config.with_extension(extension);
    }
    if let Some(ffmpeg) = &global.ffmpeg {
        config = config.with_ffmpeg_path(ffmpeg);
    }
    if let Some(ffprobe) = &global.ffprobe {
        config = config.with_ffprobe_path(ffprobe);
    }
    if let Some(timeout) = global.probe_timeout_ms {
        config = config.with_probe_timeout(Duration::from_millis(timeout));
    }

    Ok(config.with_bounds_check(!global.no_bounds_check))
}

fn init_logging(global: &GlobalOptions) {
    let default_level = if global.verbose { "debug" } else { "warn" };
    let env = env_logger::Env::default().default_filter_or(default_level);
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .try_init();
}

fn ensure_writable_path(path: &Path, overwrite: bool) -> Result<(), Box<dyn std::error::Error>> {
    if is_stdout(path) {
        return Ok(());
    }
    if path.exists() {
        if overwrite {
            eprintln!(
                "{} {}",
                "warning:".yellow().bold(),
                format!("overwriting {}", path.display()).yellow()
            );
        } else {
            return Err(format!(
                "output already exists: {} (use --overwrite to replace)",
                path.display()
            )
            .into());
        }
    }
    Ok(())
}

fn is_stdout(path: &Path) -> bool {
    path == Path::new("-")
}

fn write_output(path: &Path, bytes: &[u8]) -> Result<(), Box<dyn std::error::Error>> {
    if is_stdout(path) {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(bytes)?;
        stdout.flush()?;
    } else {
        std::fs::write(path, bytes)?;
        eprintln!(
            "{} {} ({} bytes)",
            "saved".green().bold(),
            path.display(),
            bytes.len()
        );
    }
    Ok(())
}

fn spinner(enabled: bool, message: String) -> Option<ProgressBar> {
    if !enabled {
        return None;
    }
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg} [{elapsed}]") {
        bar.set_style(style);
    }
    bar.set_message(message);
    bar.enable_steady_tick(Duration::from_millis(100));
    Some(bar)
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(&cli.global);

    if let Commands::Completions { shell } = &cli.command {
        let mut command = Cli::command();
        clap_complete::generate(*shell, &mut command, "framecut", &mut std::io::stdout());
        return Ok(());
    }

    let extractor = Extractor::new(build_config(&cli.global)?);

    match cli.command {
        Commands::Probe { episode, json } => {
            let metadata = extractor.probe(&episode).await?;
            let report = validate_metadata(&metadata);
            if json {
                let payload = json!({
                    "episode": episode,
                    "path": extractor.library().resolve(&framecut::VideoRef::new(&episode)?),
                    "frame_count": metadata.frame_count,
                    "frame_rate": metadata.frame_rate.to_string(),
                    "fps": metadata.frame_rate.frames_per_second(),
                    "duration_seconds": metadata.duration_seconds(),
                    "warnings": report.warnings,
                });
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                println!("Episode: {episode}");
                println!("Frames: {}", metadata.frame_count);
                println!(
                    "Frame rate: {} ({:.3} fps)",
                    metadata.frame_rate,
                    metadata.frame_rate.frames_per_second()
                );
                print!("{report}");
            }
        }
        Commands::Frame {
            episode,
            frame,
            fps,
            out,
        } => {
            ensure_writable_path(&out, cli.global.overwrite)?;
            let bar = spinner(
                cli.global.progress,
                format!("extracting frame {frame} of {episode}"),
            );
            let result = match fps {
                Some(fps) => {
                    extractor
                        .extract_frame(&episode, frame, parse_frame_rate(&fps)?)
                        .await
                }
                None => extractor.extract_frame_probed(&episode, frame).await,
            };
            if let Some(bar) = bar {
                bar.finish_and_clear();
            }
            write_output(&out, &result?)?;
        }
        Commands::Gif {
            episode,
            start,
            end,
            fps,
            out,
        } => {
            ensure_writable_path(&out, cli.global.overwrite)?;
            let bar = spinner(
                cli.global.progress,
                format!("extracting frames {start}..{end} of {episode}"),
            );
            let result = match fps {
                Some(fps) => {
                    extractor
                        .extract_gif(&episode, start, end, parse_frame_rate(&fps)?)
                        .await
                }
                None => extractor.extract_gif_probed(&episode, start, end).await,
            };
            if let Some(bar) = bar {
                bar.finish_and_clear();
            }
            write_output(&out, &result?)?;
        }
        Commands::Plan {
            episode,
            start,
            end,
            fps,
        } => {
            let frames_per_second = match fps {
                Some(fps) => parse_frame_rate(&fps)?,
                None => extractor
                    .probe(&episode)
                    .await?
                    .frame_rate
                    .frames_per_second(),
            };
            let plan = match end {
                Some(end) => extractor.plan_clip(&episode, start, end, frames_per_second)?,
                None => extractor.plan_frame(&episode, start, frames_per_second)?,
            };
            println!("{}", serde_json::to_string_pretty(&plan)?);
        }
        Commands::Completions { .. } => {}
    }

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("{} {error}", "error:".red().bold());
        std::process::exit(1);
    }
}
