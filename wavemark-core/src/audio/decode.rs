//! Audio decoding using symphonia
//!
//! Decodes a supported audio file into an [`AudioBuffer`] of interleaved
//! stereo f32 samples at the source's native sample rate.
//!
//! # Supported Formats
//!
//! The format is determined purely from the file extension, not content
//! sniffing. Allow-list: mp3, wav, ogg, flac, m4a, aac.
//!
//! # Sample Format
//!
//! - Output: stereo f32 samples (interleaved: [L, R, L, R, ...])
//! - Mono files: duplicated to stereo
//! - Multi-channel: downmixed to stereo

use crate::audio::AudioBuffer;
use crate::error::{Error, Result};
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::{debug, warn};

/// Extensions the codec adapter accepts for source files
pub const SUPPORTED_EXTENSIONS: [&str; 6] = ["mp3", "wav", "ogg", "flac", "m4a", "aac"];

/// Decode a source audio file to an AudioBuffer.
///
/// # Errors
/// - [`Error::FileNotFound`] if the path does not exist
/// - [`Error::UnsupportedFormat`] if the extension is not in the allow-list
/// - [`Error::Codec`] for any underlying symphonia failure
pub fn decode_file(path: &Path) -> Result<AudioBuffer> {
    if !path.is_file() {
        return Err(Error::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    if !SUPPORTED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(Error::UnsupportedFormat { extension });
    }

    decode_inner(path)
}

/// Decode the voice tag asset to an AudioBuffer.
///
/// Same decode path as [`decode_file`], but a missing file surfaces as
/// [`Error::TagNotFound`] and the extension allow-list is not applied
/// (the tag is a deployment asset, not user input).
pub fn decode_tag(path: &Path) -> Result<AudioBuffer> {
    if !path.is_file() {
        return Err(Error::TagNotFound {
            path: path.to_path_buf(),
        });
    }

    decode_inner(path)
}

/// Decode the whole file to interleaved stereo f32.
fn decode_inner(path: &Path) -> Result<AudioBuffer> {
    debug!("Decoding file: {}", path.display());

    let file = std::fs::File::open(path)
        .map_err(|e| Error::Codec(format!("failed to open {}: {}", path.display(), e)))?;

    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    // Hint the format registry with the file extension
    let mut hint = Hint::new();
    if let Some(extension) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(extension);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| Error::Codec(format!("failed to probe {}: {}", path.display(), e)))?;

    let mut format = probed.format;

    // Get the default audio track
    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| Error::Codec(format!("no audio track in {}", path.display())))?;

    let track_id = track.id;
    let codec_params = track.codec_params.clone();

    let sample_rate = codec_params
        .sample_rate
        .ok_or_else(|| Error::Codec(format!("sample rate not found in {}", path.display())))?;

    let channels = codec_params
        .channels
        .map(|c| c.count() as u16)
        .ok_or_else(|| Error::Codec(format!("channel count not found in {}", path.display())))?;

    debug!(
        "Audio format: sample_rate={}, channels={}",
        sample_rate, channels
    );

    let mut decoder = symphonia::default::get_codecs()
        .make(&codec_params, &DecoderOptions::default())
        .map_err(|e| Error::Codec(format!("failed to create decoder: {}", e)))?;

    // Decode all packets, interleaving each into a growing sample vector
    let mut samples = Vec::new();
    let mut sample_buf: Option<SampleBuffer<f32>> = None;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                debug!("Reached end of file");
                break;
            }
            Err(e) => {
                warn!("Error reading packet: {}", e);
                break;
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                if sample_buf.is_none() {
                    let spec = *decoded.spec();
                    let capacity = decoded.capacity() as u64;
                    sample_buf = Some(SampleBuffer::new(capacity, spec));
                }
                if let Some(buf) = sample_buf.as_mut() {
                    buf.copy_interleaved_ref(decoded);
                    samples.extend_from_slice(buf.samples());
                }
            }
            Err(e) => {
                warn!("Decode error: {}", e);
                continue;
            }
        }
    }

    let stereo = conform_to_stereo(samples, channels);

    debug!(
        "Decoded {} frames from {}",
        stereo.len() / 2,
        path.display()
    );

    Ok(AudioBuffer::new(stereo, sample_rate, 2))
}

/// Conform an interleaved signal of any channel count to stereo.
///
/// Mono is duplicated to both channels; more than two channels are
/// downmixed by averaging even-indexed channels into the left and
/// odd-indexed channels into the right.
fn conform_to_stereo(samples: Vec<f32>, channels: u16) -> Vec<f32> {
    match channels {
        2 => samples,
        1 => {
            let mut stereo = Vec::with_capacity(samples.len() * 2);
            for sample in samples {
                stereo.push(sample);
                stereo.push(sample);
            }
            stereo
        }
        n => {
            let ch = n as usize;
            let frames = samples.len() / ch;
            let halves = (ch as f32) / 2.0;
            let mut stereo = Vec::with_capacity(frames * 2);

            for frame in samples.chunks_exact(ch) {
                let mut left = 0.0f32;
                let mut right = 0.0f32;
                for (idx, &sample) in frame.iter().enumerate() {
                    if idx % 2 == 0 {
                        left += sample;
                    } else {
                        right += sample;
                    }
                }
                stereo.push(left / halves);
                stereo.push(right / halves);
            }
            stereo
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_nonexistent_file() {
        let result = decode_file(Path::new("/nonexistent/file.mp3"));
        assert!(matches!(result, Err(Error::FileNotFound { .. })));
    }

    #[test]
    fn test_decode_unsupported_extension() {
        // The extension gate runs before any content is read, so an existing
        // non-audio file is enough to exercise it
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"not audio").unwrap();

        let result = decode_file(&path);
        match result {
            Err(Error::UnsupportedFormat { extension }) => assert_eq!(extension, "txt"),
            other => panic!("expected UnsupportedFormat, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_missing_extension_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("noext");
        std::fs::write(&path, b"not audio").unwrap();

        assert!(matches!(
            decode_file(&path),
            Err(Error::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_decode_tag_missing_file() {
        let result = decode_tag(Path::new("/nonexistent/voice_tag.mp3"));
        assert!(matches!(result, Err(Error::TagNotFound { .. })));
    }

    #[test]
    fn test_conform_mono_to_stereo() {
        let stereo = conform_to_stereo(vec![0.1, 0.2, 0.3], 1);
        assert_eq!(stereo, vec![0.1, 0.1, 0.2, 0.2, 0.3, 0.3]);
    }

    #[test]
    fn test_conform_stereo_passthrough() {
        let samples = vec![0.1, 0.2, 0.3, 0.4];
        assert_eq!(conform_to_stereo(samples.clone(), 2), samples);
    }

    #[test]
    fn test_conform_quad_downmix() {
        // One 4-channel frame: FL=0.4, FR=0.2, RL=0.8, RR=0.6
        let stereo = conform_to_stereo(vec![0.4, 0.2, 0.8, 0.6], 4);
        assert_eq!(stereo.len(), 2);
        assert!((stereo[0] - 0.6).abs() < 1e-6); // (0.4 + 0.8) / 2
        assert!((stereo[1] - 0.4).abs() < 1e-6); // (0.2 + 0.6) / 2
    }
}
