//! Tag placement policies
//!
//! Each policy produces a list of millisecond offsets fed to the overlay
//! engine. Policies never reject out-of-range positions; bounds filtering
//! is the overlay engine's job.

/// Interval between periodic full-preview tags, in seconds.
///
/// Target spacing is every 15-20 seconds; 17 is the fixed midpoint for
/// deterministic, even coverage.
pub const FULL_PREVIEW_INTERVAL_SECS: u64 = 17;

/// Tracks at or under this length (seconds) receive no full-preview tag.
pub const MIN_TAGGABLE_SECS: f64 = 5.0;

/// Fixed offsets into a clip preview, in seconds.
pub const CLIP_PREVIEW_OFFSETS_SECS: [u64; 2] = [10, 24];

/// Explicit placement: caller-supplied second-granularity positions,
/// converted to milliseconds and passed through unchanged.
pub fn explicit(positions_secs: &[u64]) -> Vec<u64> {
    positions_secs.iter().map(|p| p * 1000).collect()
}

/// Periodic whole-track placement: a tag every 17 seconds while within
/// the track. A short track still gets one tag at its midpoint (truncated
/// to a whole second) when it is longer than 5 seconds; anything at or
/// under 5 seconds gets none.
pub fn full_preview(duration_seconds: f64) -> Vec<u64> {
    let mut positions: Vec<u64> = Vec::new();

    let mut pos = FULL_PREVIEW_INTERVAL_SECS;
    while (pos as f64) < duration_seconds {
        positions.push(pos);
        pos += FULL_PREVIEW_INTERVAL_SECS;
    }

    if positions.is_empty() && duration_seconds > MIN_TAGGABLE_SECS {
        positions.push((duration_seconds / 2.0) as u64);
    }

    positions.into_iter().map(|p| p * 1000).collect()
}

/// Dual fixed placement for clip previews: 10s and 24s into the clip.
/// Offsets past the clip's end are dropped downstream by the overlay
/// bounds check, so short clips receive one tag or none.
pub fn clip_preview() -> Vec<u64> {
    CLIP_PREVIEW_OFFSETS_SECS.iter().map(|p| p * 1000).collect()
}
