//! Overlay engine
//!
//! Additively mixes a tag buffer into a primary buffer at millisecond
//! offsets. Summation only; no clamping here. Samples are clamped when
//! quantized at encode time.

use crate::audio::AudioBuffer;
use tracing::debug;

/// Mix `tag` into `primary` at each offset.
///
/// Offsets are processed in ascending order as an ordered fold: each mix
/// operates on the buffer produced by the previous one, so overlapping
/// offsets compound. Offsets at or past the primary's end are skipped
/// without error. The tag must already share the primary's sample rate
/// and channel layout.
pub fn overlay(primary: AudioBuffer, tag: &AudioBuffer, offsets_ms: &[u64]) -> AudioBuffer {
    let mut offsets = offsets_ms.to_vec();
    offsets.sort_unstable();

    offsets
        .into_iter()
        .fold(primary, |buffer, offset_ms| mix_at(buffer, tag, offset_ms))
}

/// One additive mix, truncated at the primary's end if the tag overruns.
fn mix_at(mut primary: AudioBuffer, tag: &AudioBuffer, offset_ms: u64) -> AudioBuffer {
    if offset_ms >= primary.duration_ms() {
        debug!(
            "Skipping overlay at {}ms (track is {}ms)",
            offset_ms,
            primary.duration_ms()
        );
        return primary;
    }

    let start = primary.frame_at_ms(offset_ms) * primary.channels as usize;
    let span = tag
        .samples
        .len()
        .min(primary.samples.len().saturating_sub(start));

    for i in 0..span {
        primary.samples[start + i] += tag.samples[i];
    }

    primary
}
