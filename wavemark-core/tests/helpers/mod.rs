//! Shared test fixtures
//!
//! Generates small WAV files on the fly so the suites need no binary
//! assets checked in.

#![allow(dead_code)]

use std::path::Path;

fn spec(channels: u16, sample_rate: u32) -> hound::WavSpec {
    hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    }
}

fn amplitude_to_i16(value: f32) -> i16 {
    (value.clamp(-1.0, 1.0) * i16::MAX as f32) as i16
}

/// Write a stereo 16-bit WAV containing a sine tone
pub fn write_sine_wav(path: &Path, seconds: f64, freq: f32, sample_rate: u32) {
    let mut writer = hound::WavWriter::create(path, spec(2, sample_rate)).unwrap();
    let frames = (seconds * sample_rate as f64) as usize;

    for i in 0..frames {
        let t = i as f32 / sample_rate as f32;
        let sample = amplitude_to_i16((2.0 * std::f32::consts::PI * freq * t).sin() * 0.5);
        writer.write_sample(sample).unwrap();
        writer.write_sample(sample).unwrap();
    }
    writer.finalize().unwrap();
}

/// Write a mono 16-bit WAV containing a sine tone
pub fn write_mono_sine_wav(path: &Path, seconds: f64, freq: f32, sample_rate: u32) {
    let mut writer = hound::WavWriter::create(path, spec(1, sample_rate)).unwrap();
    let frames = (seconds * sample_rate as f64) as usize;

    for i in 0..frames {
        let t = i as f32 / sample_rate as f32;
        let sample = amplitude_to_i16((2.0 * std::f32::consts::PI * freq * t).sin() * 0.5);
        writer.write_sample(sample).unwrap();
    }
    writer.finalize().unwrap();
}

/// Write a stereo 16-bit WAV of digital silence
pub fn write_silent_wav(path: &Path, seconds: f64, sample_rate: u32) {
    let mut writer = hound::WavWriter::create(path, spec(2, sample_rate)).unwrap();
    let frames = (seconds * sample_rate as f64) as usize;

    for _ in 0..frames {
        writer.write_sample(0i16).unwrap();
        writer.write_sample(0i16).unwrap();
    }
    writer.finalize().unwrap();
}

/// Write a stereo 16-bit WAV holding a constant positive amplitude
pub fn write_constant_wav(path: &Path, seconds: f64, value: f32, sample_rate: u32) {
    let mut writer = hound::WavWriter::create(path, spec(2, sample_rate)).unwrap();
    let frames = (seconds * sample_rate as f64) as usize;
    let sample = amplitude_to_i16(value);

    for _ in 0..frames {
        writer.write_sample(sample).unwrap();
        writer.write_sample(sample).unwrap();
    }
    writer.finalize().unwrap();
}
