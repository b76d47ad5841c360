//! wavemark - command-line front end
//!
//! Exposes the watermarking and waveform operations of wavemark-core:
//! explicit watermarking, full-track previews, clip previews, envelope
//! extraction, and the composite upload pipeline.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wavemark_core::{waveform, Config, Watermarker};

/// Command-line arguments for wavemark
#[derive(Parser, Debug)]
#[command(name = "wavemark")]
#[command(about = "Audio watermarking and waveform extraction for track previews")]
#[command(version)]
struct Args {
    /// Path to the voice tag asset
    #[arg(long, env = "WAVEMARK_TAG_PATH", default_value = "assets/voice_tag.mp3")]
    tag_path: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Overlay the voice tag at explicit positions
    Watermark {
        /// Source audio file
        source: PathBuf,

        /// Position in seconds; repeat for multiple tags
        #[arg(short = 'a', long = "at", required = true)]
        positions: Vec<u64>,
    },

    /// Watermark an entire track at a fixed interval
    FullPreview {
        /// Source audio file
        source: PathBuf,
    },

    /// Extract a clip and watermark it
    ClipPreview {
        /// Source audio file
        source: PathBuf,

        /// Clip start within the source, seconds
        #[arg(long, default_value_t = 0)]
        start: u64,

        /// Clip length, seconds
        #[arg(long, default_value_t = wavemark_core::watermark::DEFAULT_CLIP_SECS)]
        duration: u64,
    },

    /// Print the amplitude envelope as JSON
    Waveform {
        /// Source audio file
        source: PathBuf,

        /// Number of envelope points
        #[arg(long, default_value_t = waveform::DEFAULT_NUM_POINTS)]
        points: usize,
    },

    /// Full upload pipeline: full preview + clip preview + waveform
    Process {
        /// Source audio file
        source: PathBuf,

        /// Clip preview start within the source, seconds
        #[arg(long, default_value_t = 0)]
        clip_start: u64,
    },
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wavemark=info,wavemark_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    info!("Voice tag: {}", args.tag_path.display());
    let marker = Watermarker::new(Config::new(&args.tag_path));

    match args.command {
        Command::Watermark { source, positions } => {
            let output = marker
                .watermark(&source, &positions)
                .context("watermarking failed")?;
            println!("{}", output.display());
        }

        Command::FullPreview { source } => {
            let output = marker
                .full_preview(&source)
                .context("full preview failed")?;
            println!("{}", output.display());
        }

        Command::ClipPreview {
            source,
            start,
            duration,
        } => {
            let output = marker
                .clip_preview(&source, start, duration)
                .context("clip preview failed")?;
            println!("{}", output.display());
        }

        Command::Waveform { source, points } => {
            let envelope =
                waveform::from_file(&source, points).context("waveform extraction failed")?;
            println!("{}", serde_json::to_string(&envelope)?);
        }

        Command::Process { source, clip_start } => {
            let artifacts = marker
                .process_upload(&source, clip_start)
                .context("upload processing failed")?;
            println!("{}", serde_json::to_string_pretty(&artifacts)?);
        }
    }

    Ok(())
}
