//! MP3 encoding using LAME
//!
//! All pipeline outputs are MP3 regardless of the source format. This is a
//! policy decision of the preview pipeline, not a limitation of the stack.

use crate::audio::AudioBuffer;
use crate::error::{Error, Result};
use mp3lame_encoder::{Bitrate, Builder, DualPcm, FlushNoGap, Quality};
use std::path::Path;
use tracing::debug;

/// Output bitrate for every encoded preview
const OUTPUT_BITRATE: Bitrate = Bitrate::Kbps192;

/// Encode an AudioBuffer to an MP3 file at `path`.
///
/// Samples are clamped to [-1.0, 1.0] and quantized to i16 before
/// encoding. No side effects beyond the file write.
pub fn encode_mp3(buffer: &AudioBuffer, path: &Path) -> Result<()> {
    debug!(
        "Encoding {} frames at {}Hz to {}",
        buffer.frame_count(),
        buffer.sample_rate,
        path.display()
    );

    let (left, right) = split_to_i16(buffer);

    let mut builder =
        Builder::new().ok_or_else(|| Error::Codec("failed to allocate LAME encoder".into()))?;
    builder
        .set_num_channels(2)
        .map_err(|e| Error::Codec(format!("failed to set channels: {:?}", e)))?;
    builder
        .set_sample_rate(buffer.sample_rate)
        .map_err(|e| Error::Codec(format!("failed to set sample rate: {:?}", e)))?;
    builder
        .set_brate(OUTPUT_BITRATE)
        .map_err(|e| Error::Codec(format!("failed to set bitrate: {:?}", e)))?;
    builder
        .set_quality(Quality::Best)
        .map_err(|e| Error::Codec(format!("failed to set quality: {:?}", e)))?;

    let mut encoder = builder
        .build()
        .map_err(|e| Error::Codec(format!("failed to initialize LAME encoder: {:?}", e)))?;

    let input = DualPcm {
        left: &left,
        right: &right,
    };

    let mut mp3_out: Vec<u8> = Vec::new();
    mp3_out.reserve(mp3lame_encoder::max_required_buffer_size(left.len()));

    let encoded = encoder
        .encode(input, mp3_out.spare_capacity_mut())
        .map_err(|e| Error::Codec(format!("MP3 encode failed: {:?}", e)))?;
    // SAFETY: the encoder initialized exactly `encoded` bytes of the spare capacity
    unsafe {
        mp3_out.set_len(mp3_out.len() + encoded);
    }

    let flushed = encoder
        .flush::<FlushNoGap>(mp3_out.spare_capacity_mut())
        .map_err(|e| Error::Codec(format!("MP3 flush failed: {:?}", e)))?;
    // SAFETY: as above, for the flushed tail
    unsafe {
        mp3_out.set_len(mp3_out.len() + flushed);
    }

    std::fs::write(path, &mp3_out)?;

    debug!("Wrote {} bytes to {}", mp3_out.len(), path.display());
    Ok(())
}

/// Deinterleave stereo f32 into clamped i16 left/right channels
fn split_to_i16(buffer: &AudioBuffer) -> (Vec<i16>, Vec<i16>) {
    let frames = buffer.frame_count();
    let mut left = Vec::with_capacity(frames);
    let mut right = Vec::with_capacity(frames);

    for frame in buffer.samples.chunks_exact(2) {
        left.push(to_i16(frame[0]));
        right.push(to_i16(frame[1]));
    }

    (left, right)
}

fn to_i16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16
}
