//! Deterministic, order-preserving frame sampling.
//!
//! Indices are spread evenly over `[0, len)`: index `i` of `count` is
//! `i * (len - 1) / (count - 1)` rounded to nearest, halves up. The first
//! and last frames are always kept once `count >= 2`. When `count < len` the
//! step is at least 1, so the rounded indices are strictly increasing; when
//! `count >= len` every frame is kept. The result has exactly
//! `min(count, len)` entries.

use tracing::debug;

use super::frame::Frame;

/// Map the signed "negative means all frames" convention onto `Option`.
pub fn requested_frames(n: i64) -> Option<usize> {
    usize::try_from(n).ok()
}

/// Indices of the frames to keep from a sequence of `len` frames.
pub fn sample_indices(len: usize, count: usize) -> Vec<usize> {
    match (len, count) {
        (0, _) | (_, 0) => Vec::new(),
        (_, 1) => vec![0],
        _ if count >= len => (0..len).collect(),
        _ => {
            let span = (len - 1) as u128;
            let steps = (count - 1) as u128;
            (0..count as u128)
                .map(|i| ((2 * i * span + steps) / (2 * steps)) as usize)
                .collect()
        }
    }
}

/// Reduce `frames` to `count` evenly spaced frames, or return them unchanged
/// when `count` is `None`.
pub fn sample_frames(frames: Vec<Frame>, count: Option<usize>) -> Vec<Frame> {
    let Some(count) = count else {
        return frames;
    };

    let indices = sample_indices(frames.len(), count);
    debug!(total = frames.len(), count, kept = indices.len(), "sampling frames");

    let mut wanted = indices.into_iter().peekable();
    frames
        .into_iter()
        .enumerate()
        .filter_map(|(i, frame)| {
            if wanted.peek() == Some(&i) {
                wanted.next();
                Some(frame)
            } else {
                None
            }
        })
        .collect()
}
