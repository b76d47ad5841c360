//! Watermark pipeline engine
//!
//! Ties decoding, tag loading, placement, overlay and MP3 encoding into
//! the operations callers consume. Each operation is synchronous and
//! request-local: the tag is loaded per request, the output file is a
//! fresh temp path owned by the request until handed back.

use crate::audio::{decode, encode, AudioBuffer, Resampler};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::watermark::{overlay, placement};
use crate::waveform;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// Default clip preview length, in seconds.
pub const DEFAULT_CLIP_SECS: u64 = 30;

/// Artifacts produced by the composite upload pipeline.
#[derive(Debug, Serialize)]
pub struct UploadArtifacts {
    /// Full-length watermarked preview (MP3)
    pub full_preview: PathBuf,
    /// Watermarked clip preview (MP3)
    pub clip_preview: PathBuf,
    /// Normalized amplitude envelope of the source
    pub waveform: Vec<f32>,
}

/// Watermarking engine holding the resolved configuration.
///
/// Holds no mutable state; safe to call from multiple workers at once.
pub struct Watermarker {
    config: Config,
}

impl Watermarker {
    /// Create an engine from an explicit configuration
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Overlay the voice tag at explicit positions (seconds).
    ///
    /// Positions past the end of the track are silently dropped. Returns
    /// the path of a newly written temporary MP3.
    pub fn watermark(&self, source: &Path, positions_secs: &[u64]) -> Result<PathBuf> {
        let primary = decode::decode_file(source)?;
        let offsets = placement::explicit(positions_secs);

        info!(
            "Watermarking {} at {} explicit position(s)",
            source.display(),
            offsets.len()
        );

        self.render(primary, &offsets)
    }

    /// Create a full-length watermarked preview of a track.
    ///
    /// The tag recurs at a fixed interval across the whole track; short
    /// tracks get a single midpoint tag, and very short tracks none.
    pub fn full_preview(&self, source: &Path) -> Result<PathBuf> {
        let primary = decode::decode_file(source)?;
        let offsets = placement::full_preview(primary.duration_seconds());

        info!(
            "Full preview of {} ({:.1}s): {} tag(s)",
            source.display(),
            primary.duration_seconds(),
            offsets.len()
        );

        self.render(primary, &offsets)
    }

    /// Extract a clip and watermark it for preview purposes.
    ///
    /// The clip runs from `start_secs` for `duration_secs`, clamped to the
    /// track's end. Tags land at the fixed clip offsets when the clip is
    /// long enough to hold them.
    pub fn clip_preview(
        &self,
        source: &Path,
        start_secs: u64,
        duration_secs: u64,
    ) -> Result<PathBuf> {
        let primary = decode::decode_file(source)?;
        let clip = primary.slice_ms(start_secs * 1000, duration_secs * 1000);

        info!(
            "Clip preview of {} [{}s + {}s] -> {}ms clip",
            source.display(),
            start_secs,
            duration_secs,
            clip.duration_ms()
        );

        self.render(clip, &placement::clip_preview())
    }

    /// Run the full upload pipeline on one source file: full preview,
    /// 30-second clip preview, and amplitude envelope.
    ///
    /// On failure, artifacts already written for this request are removed
    /// before the error propagates; no orphan temp output survives.
    pub fn process_upload(&self, source: &Path, clip_start_secs: u64) -> Result<UploadArtifacts> {
        let full_preview = self.full_preview(source)?;

        let clip_preview = match self.clip_preview(source, clip_start_secs, DEFAULT_CLIP_SECS) {
            Ok(path) => path,
            Err(e) => {
                let _ = std::fs::remove_file(&full_preview);
                return Err(e);
            }
        };

        let waveform = match waveform::from_file(source, waveform::DEFAULT_NUM_POINTS) {
            Ok(envelope) => envelope,
            Err(e) => {
                let _ = std::fs::remove_file(&full_preview);
                let _ = std::fs::remove_file(&clip_preview);
                return Err(e);
            }
        };

        Ok(UploadArtifacts {
            full_preview,
            clip_preview,
            waveform,
        })
    }

    /// Load the tag and conform it to the primary's sample rate.
    fn load_tag_for(&self, primary: &AudioBuffer) -> Result<AudioBuffer> {
        let tag = decode::decode_tag(&self.config.tag_path)?;

        if tag.sample_rate == primary.sample_rate {
            return Ok(tag);
        }

        let samples = Resampler::resample(
            &tag.samples,
            tag.sample_rate,
            primary.sample_rate,
            tag.channels,
        )?;
        Ok(AudioBuffer::new(samples, primary.sample_rate, tag.channels))
    }

    /// Mix the tag at the given offsets and encode the result to a fresh
    /// temporary MP3 path.
    fn render(&self, primary: AudioBuffer, offsets_ms: &[u64]) -> Result<PathBuf> {
        let tag = self.load_tag_for(&primary)?;
        let mixed = overlay::overlay(primary, &tag, offsets_ms);

        let output = temp_output_path()?;
        if let Err(e) = encode::encode_mp3(&mixed, &output) {
            let _ = std::fs::remove_file(&output);
            return Err(e);
        }
        Ok(output)
    }
}

/// Create a persisted temp file path for an MP3 output.
///
/// The file outlives the request; cleanup belongs to whoever receives the
/// path.
fn temp_output_path() -> Result<PathBuf> {
    let file = tempfile::Builder::new()
        .prefix("wavemark-")
        .suffix(".mp3")
        .tempfile()?;
    let (_, path) = file.keep().map_err(|e| Error::Io(e.error))?;
    Ok(path)
}
