//! Waveform envelope extraction
//!
//! Downsamples a decoded signal into a fixed-length, peak-normalized
//! amplitude envelope for waveform display. Lossy and deterministic:
//! identical input always yields an identical envelope.

use crate::audio::{decode, AudioBuffer};
use crate::error::{Error, Result};
use std::path::Path;
use tracing::debug;

/// Default number of envelope points
pub const DEFAULT_NUM_POINTS: usize = 200;

/// Extract a normalized amplitude envelope from a decoded buffer.
///
/// The signal is mixed down to mono, rectified, chunk-averaged down to
/// `num_points` values, peak-normalized into [0.0, 1.0] and rounded to 4
/// decimal places. An empty or silent signal yields all zeros.
///
/// # Errors
/// [`Error::InvalidArgument`] when `num_points` is zero.
pub fn extract(buffer: &AudioBuffer, num_points: usize) -> Result<Vec<f32>> {
    if num_points < 1 {
        return Err(Error::InvalidArgument(
            "num_points must be at least 1".into(),
        ));
    }

    let amplitude: Vec<f32> = buffer.to_mono().iter().map(|s| s.abs()).collect();
    if amplitude.is_empty() {
        return Ok(vec![0.0; num_points]);
    }

    // Truncate so the signal splits evenly; the trailing remainder is
    // dropped, never padded
    let chunk_size = (amplitude.len() / num_points).max(1);
    let trimmed = &amplitude[..(chunk_size * num_points).min(amplitude.len())];

    debug!(
        "Envelope: {} samples -> {} points (chunk size {})",
        amplitude.len(),
        num_points,
        chunk_size
    );

    let means = chunk_means(trimmed, num_points);

    let peak = means.iter().cloned().fold(0.0f32, f32::max);
    let normalized = means.into_iter().map(|mean| {
        if peak > 0.0 {
            round4(mean / peak)
        } else {
            round4(mean)
        }
    });

    Ok(normalized.collect())
}

/// Decode an audio file and extract its envelope.
///
/// Shares the codec adapter's contract: missing files fail with
/// [`Error::FileNotFound`], extensions outside the allow-list with
/// [`Error::UnsupportedFormat`].
pub fn from_file(path: &Path, num_points: usize) -> Result<Vec<f32>> {
    let buffer = decode::decode_file(path)?;
    extract(&buffer, num_points)
}

/// Mean of each of `num_points` as-equal-as-possible contiguous chunks.
///
/// The first `len % num_points` chunks carry one extra sample. When the
/// signal is shorter than `num_points`, the trailing chunks are empty and
/// contribute 0.0.
fn chunk_means(signal: &[f32], num_points: usize) -> Vec<f32> {
    let base = signal.len() / num_points;
    let remainder = signal.len() % num_points;

    let mut means = Vec::with_capacity(num_points);
    let mut cursor = 0;

    for i in 0..num_points {
        let len = base + usize::from(i < remainder);
        if len == 0 {
            means.push(0.0);
            continue;
        }
        let chunk = &signal[cursor..cursor + len];
        let sum: f32 = chunk.iter().sum();
        means.push(sum / len as f32);
        cursor += len;
    }

    means
}

fn round4(value: f32) -> f32 {
    (value * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mono_as_stereo(mono: &[f32], sample_rate: u32) -> AudioBuffer {
        let mut samples = Vec::with_capacity(mono.len() * 2);
        for &s in mono {
            samples.push(s);
            samples.push(s);
        }
        AudioBuffer::new(samples, sample_rate, 2)
    }

    #[test]
    fn test_zero_points_is_invalid() {
        let buffer = mono_as_stereo(&[0.5; 100], 44100);
        assert!(matches!(
            extract(&buffer, 0),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_empty_signal_yields_zeros() {
        let buffer = AudioBuffer::new(Vec::new(), 44100, 2);
        let envelope = extract(&buffer, 10).unwrap();
        assert_eq!(envelope, vec![0.0; 10]);
    }

    #[test]
    fn test_silent_signal_yields_zeros() {
        let buffer = mono_as_stereo(&[0.0; 4410], 44100);
        let envelope = extract(&buffer, 200).unwrap();
        assert_eq!(envelope.len(), 200);
        assert!(envelope.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_constant_signal_normalizes_to_ones() {
        let buffer = mono_as_stereo(&[0.3; 1000], 44100);
        let envelope = extract(&buffer, 10).unwrap();
        assert_eq!(envelope, vec![1.0; 10]);
    }

    #[test]
    fn test_single_point_is_whole_signal_mean() {
        // Mean of the rectified signal, normalized by itself -> 1.0
        let buffer = mono_as_stereo(&[0.2, -0.4, 0.6, -0.8], 44100);
        let envelope = extract(&buffer, 1).unwrap();
        assert_eq!(envelope, vec![1.0]);
    }

    #[test]
    fn test_peak_chunk_is_one_and_others_scaled() {
        // Two chunks: means 0.25 and 0.5 -> normalized 0.5 and 1.0
        let buffer = mono_as_stereo(&[0.25, 0.25, 0.5, 0.5], 44100);
        let envelope = extract(&buffer, 2).unwrap();
        assert_eq!(envelope, vec![0.5, 1.0]);
    }

    #[test]
    fn test_remainder_is_dropped() {
        // 10 samples into 3 points: chunk_size 3, last sample dropped.
        // A loud final sample must not leak into the envelope.
        let mut mono = vec![0.1; 9];
        mono.push(1.0);
        let buffer = mono_as_stereo(&mono, 44100);

        let envelope = extract(&buffer, 3).unwrap();
        assert_eq!(envelope, vec![1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_signal_shorter_than_points_pads_with_zeros() {
        let buffer = mono_as_stereo(&[0.5, 0.5], 44100);
        let envelope = extract(&buffer, 4).unwrap();
        assert_eq!(envelope, vec![1.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_negative_samples_are_rectified() {
        let buffer = mono_as_stereo(&[-0.5; 100], 44100);
        let envelope = extract(&buffer, 5).unwrap();
        assert_eq!(envelope, vec![1.0; 5]);
    }

    #[test]
    fn test_values_rounded_to_four_places() {
        // Means 1/3 and 1.0 -> 0.3333 after rounding
        let buffer = mono_as_stereo(&[1.0, 0.0, 0.0, 1.0, 1.0, 1.0], 44100);
        let envelope = extract(&buffer, 2).unwrap();
        assert_eq!(envelope, vec![0.3333, 1.0]);
    }

    #[test]
    fn test_deterministic() {
        let mono: Vec<f32> = (0..4410).map(|i| ((i as f32) * 0.01).sin()).collect();
        let buffer = mono_as_stereo(&mono, 44100);

        let first = extract(&buffer, 200).unwrap();
        let second = extract(&buffer, 200).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_all_values_within_unit_range() {
        let mono: Vec<f32> = (0..10_000).map(|i| ((i as f32) * 0.37).sin()).collect();
        let buffer = mono_as_stereo(&mono, 44100);

        let envelope = extract(&buffer, 200).unwrap();
        assert_eq!(envelope.len(), 200);
        assert!(envelope.iter().all(|&v| (0.0..=1.0).contains(&v)));
    }
}
