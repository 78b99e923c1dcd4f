use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::RgbImage;
use ndarray::Array4;
use tracing::{info, warn};

use crate::error::VideoError;
use crate::render::FrameRenderer;
use crate::video::convert::{frames_to_images, frames_to_ndarray};
use crate::video::sample::sample_frames;
use crate::video::{Decoder, Frame};

/// Decode `path` and sample it down to `num_frames` (all frames when `None`).
///
/// Fails when zero frames are requested or when the video yields fewer
/// frames than requested; never returns a partial sequence.
pub fn load_frames(
    decoder: &dyn Decoder,
    path: &Path,
    num_frames: Option<usize>,
) -> Result<Vec<Frame>, VideoError> {
    if num_frames == Some(0) {
        return Err(VideoError::InvalidSampleCount {
            path: path.to_path_buf(),
            requested: 0,
        });
    }

    let frames = decoder.decode(path)?;
    let decoded = frames.len();
    let sampled = sample_frames(frames, num_frames);

    if let Some(requested) = num_frames {
        if sampled.len() < requested {
            warn!(?path, requested, actual = sampled.len(), "not enough frames");
            return Err(VideoError::InsufficientFrames {
                path: path.to_path_buf(),
                requested,
                actual: sampled.len(),
            });
        }
    }

    info!(?path, decoded, sampled = sampled.len(), "frames loaded");
    Ok(sampled)
}

/// Sampled frames of `path` stacked as (frames, height, width, 3).
pub fn video_to_ndarray(
    decoder: &dyn Decoder,
    path: &Path,
    num_frames: Option<usize>,
) -> Result<Array4<u8>, VideoError> {
    let frames = load_frames(decoder, path, num_frames)?;
    frames_to_ndarray(&frames)
}

/// Sampled frames of `path` as individual images.
pub fn video_to_images(
    decoder: &dyn Decoder,
    path: &Path,
    num_frames: Option<usize>,
) -> Result<Vec<RgbImage>, VideoError> {
    let frames = load_frames(decoder, path, num_frames)?;
    Ok(frames_to_images(frames))
}

/// Parameters for exporting sampled frames as PNG files.
#[derive(Debug, Clone, Default)]
pub struct ExtractConfig {
    /// Frames to sample, or None for the entire video.
    pub num_frames: Option<usize>,
    /// Draw the source frame number and timestamp onto each image.
    pub annotate: bool,
    /// Font used for annotations. Without one, annotation is skipped.
    pub font_path: Option<PathBuf>,
}

/// Decode, sample and write each frame to `output_dir/frame_XXXXXXXX.png`.
///
/// Files are named by source frame number. Returns the written paths in order.
pub fn run_extract(
    decoder: &dyn Decoder,
    input: &Path,
    output_dir: &Path,
    config: &ExtractConfig,
) -> Result<Vec<PathBuf>> {
    info!(
        ?input,
        ?output_dir,
        num_frames = ?config.num_frames,
        annotate = config.annotate,
        "extraction starting"
    );

    let frames = load_frames(decoder, input, config.num_frames)
        .with_context(|| format!("failed to load frames from {}", input.display()))?;

    std::fs::create_dir_all(output_dir).with_context(|| {
        format!("failed to create output directory {}", output_dir.display())
    })?;

    let renderer = FrameRenderer::new(config.font_path.as_deref());
    let written = frames
        .iter()
        .map(|frame| renderer.save_frame(frame, output_dir, config.annotate))
        .collect::<Result<Vec<_>>>()?;

    info!(frame_count = written.len(), ?output_dir, "extraction complete");
    Ok(written)
}
