use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Errors returned by decoding, sampling, conversion and asset resolution.
#[derive(Debug, Error)]
pub enum VideoError {
    #[error("no video stream found in {}", path.display())]
    NoVideoStream { path: PathBuf },

    #[error("could not process video file {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: DecodeFailure,
    },

    #[error(
        "could not read enough frames from video file {} (expected {requested} frames, got {actual})",
        path.display()
    )]
    InsufficientFrames {
        path: PathBuf,
        requested: usize,
        actual: usize,
    },

    #[error("invalid frame count {requested} requested for {}: at least one frame is required", path.display())]
    InvalidSampleCount { path: PathBuf, requested: usize },

    #[error("invalid asset name {name:?}: expected a plain file name")]
    InvalidAssetName { name: String },

    #[error("failed to fetch asset {name}: {source}")]
    Fetch {
        name: String,
        #[source]
        source: FetchError,
    },

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("frame {index} is {actual:?}, expected {expected:?} (height, width, channels)")]
    FrameShape {
        index: usize,
        expected: (usize, usize, usize),
        actual: (usize, usize, usize),
    },

    #[error("array shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

/// Why the external decoding engine could not produce frames.
#[derive(Debug, Error)]
pub enum DecodeFailure {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{program} exited with {status}: {stderr}")]
    Exit {
        program: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("unreadable ffprobe output: {0}")]
    ProbeOutput(#[from] serde_json::Error),

    #[error("invalid video dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("decoder produced no frames")]
    NoFrames,

    #[error("raw output of {len} bytes is not a whole number of {frame_bytes}-byte frames")]
    TruncatedFrame { len: usize, frame_bytes: usize },
}

/// Failure reported by an [`AssetStore`](crate::asset::AssetStore).
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("download of {url} failed with {status}: {stderr}")]
    Download {
        url: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("asset not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}
