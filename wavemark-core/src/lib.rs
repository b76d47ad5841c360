//! # wavemark-core
//!
//! Audio watermarking and waveform-envelope library.
//!
//! **Purpose:** Decode audio files into a uniform stereo f32 representation,
//! mix a short voice tag into the signal under one of three placement
//! policies, re-encode the result as MP3, and derive a fixed-length
//! normalized amplitude envelope for waveform display.
//!
//! **Architecture:** Single synchronous pipeline per request using
//! symphonia (decode) + rubato (tag conforming) + LAME (MP3 encode).
//! No shared mutable state; every buffer is request-local.

pub mod audio;
pub mod config;
pub mod error;
pub mod watermark;
pub mod waveform;

pub use config::Config;
pub use error::{Error, Result};
pub use watermark::Watermarker;
